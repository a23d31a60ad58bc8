use thiserror::Error as ThisError;

/// Error enumerates over all possible errors that this package
/// shall return.
#[derive(Debug, PartialEq, ThisError)]
pub enum Error<K> {
    /// Returned by lookup() API when key is not present in the index.
    #[error("key not found")]
    KeyNotFound(K),
    /// Malformed construction argument, the String component describes
    /// which argument was rejected.
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    /// Fatal case, index entries are not in sort-order. First component
    /// is the offending child key, second is its parent's key.
    #[error("keys out of sort order")]
    SortError(K, K),
    /// Fatal case, a parent back-reference does not match the child
    /// link pointing at the node.
    #[error("broken parent link: {0}")]
    BrokenLink(String),
    /// Fatal case, (counted, reachable) number of entries differ.
    #[error("count mismatch: counted {0} reachable {1}")]
    CountMismatch(usize, usize),
    /// Fatal case, red-black root must be black.
    #[error("red root")]
    RedRoot,
    /// Fatal case, a red node has a red child.
    #[error("consecutive reds")]
    ConsecutiveReds,
    /// Fatal case, black-height differs between two paths. The String
    /// component of this variant can be used for debugging.
    #[error("unbalanced blacks: {0}")]
    UnbalancedBlacks(String),
    /// Fatal case, cached AVL height is stale.
    #[error("bad height: {0}")]
    BadHeight(String),
    /// Fatal case, AVL balance factor outside [-1, 1].
    #[error("unbalanced: {0}")]
    Unbalanced(String),
    /// Fatal case, treap child carries a higher priority than its parent.
    #[error("heap order: {0}")]
    HeapOrder(String),
}
