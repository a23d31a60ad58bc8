use std::{
    cmp::Ordering,
    mem,
    ops::Range,
    time::{SystemTime, UNIX_EPOCH},
};

use rand::{rngs::SmallRng, Rng, SeedableRng};

use crate::{
    balance::Balance,
    error::Error,
    stats::Stats,
    tree::{Extreme, NodeId, Tree},
};

type TreapTree<K, V> = Tree<K, V, u64>;

/// Randomized priority strategy. Nodes carry a priority drawn once at
/// creation and the tree is kept a max-heap on priorities, independent
/// of key order. Insert and remove bypass the shared skeleton and work
/// on split / merge instead of rotations.
#[derive(Clone, Debug)]
pub struct Treap {
    rng: SmallRng,
    priorities: Range<u64>,
}

impl Default for Treap {
    fn default() -> Treap {
        Treap::new()
    }
}

impl Treap {
    /// Draw priorities from an entropy seeded generator.
    pub fn new() -> Treap {
        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or_default();
        Treap::with_seed(seed)
    }

    /// Reproducible priorities, same seed and same operations yield the
    /// same shape.
    pub fn with_seed(seed: u128) -> Treap {
        Treap {
            rng: SmallRng::from_seed(seed.to_le_bytes()),
            priorities: 0..u64::max_value(),
        }
    }

    /// Draw priorities uniformly from `priorities`, an empty range is
    /// rejected. `K` only names the key type of the returned [`Error`],
    /// [`Bst::with_priorities`] infers it from the tree instead:
    ///
    /// ```
    /// use bst_index::{Error, Treap, TreapTree};
    ///
    /// let mut index: TreapTree<u32, &str> =
    ///     TreapTree::with_priorities("treap", 0..1000, 42).unwrap();
    /// index.set(1, "one");
    /// assert!(index.validate().is_ok());
    ///
    /// let res = Treap::with_priorities::<u32>(10..10, 42);
    /// assert!(matches!(res, Err(Error::InvalidConfig(_))));
    /// ```
    ///
    /// [`Bst::with_priorities`]: crate::Bst::with_priorities
    pub fn with_priorities<K>(priorities: Range<u64>, seed: u128) -> Result<Treap, Error<K>> {
        if priorities.start >= priorities.end {
            let err = format!("empty priority range {:?}", priorities);
            return Err(Error::InvalidConfig(err));
        }
        let mut treap = Treap::with_seed(seed);
        treap.priorities = priorities;
        Ok(treap)
    }

    fn draw(&mut self) -> u64 {
        let (low, high) = (self.priorities.start, self.priorities.end);
        self.rng.gen_range(low, high)
    }
}

impl<K, V> Balance<K, V> for Treap {
    type Meta = u64;

    fn meta(&mut self) -> u64 {
        self.draw()
    }

    fn insert(&mut self, tree: &mut TreapTree<K, V>, key: K, value: V) -> Option<V> {
        if let Some(node) = tree.find(&key) {
            let old = mem::replace(&mut tree.node_mut(node).value, value);
            return Some(old);
        }

        let root = tree.root();
        let (left, right) = split(tree, root, &key);
        let priority = self.draw();
        let node = tree.alloc(key, value, priority);
        let left = merge(tree, left, Some(node));
        let root = merge(tree, left, right);
        tree.set_root(root);
        None
    }

    // a miss leaves the tree untouched.
    fn remove(&mut self, tree: &mut TreapTree<K, V>, key: &K) -> Option<(K, V)> {
        tree.find(key)?;

        let root = tree.root();
        let (left, right) = split(tree, root, key);
        let max = match left {
            Some(left) => Some(tree.find_extreme(left, Extreme::Rightmost)),
            None => None,
        };
        match max {
            Some(max) if tree.compare(&tree.node(max).key, key) == Ordering::Equal => {
                // the maximum has no right child, excise it from the
                // left part with the skeleton's transplant.
                tree.set_root(left);
                let gone = tree.remove_node(max);
                let left = tree.root();
                let root = merge(tree, left, right);
                tree.set_root(root);
                Some((gone.node.key, gone.node.value))
            }
            _ => {
                let root = merge(tree, left, right);
                tree.set_root(root);
                None
            }
        }
    }

    fn validate(&self, tree: &TreapTree<K, V>, _stats: &mut Stats) -> Result<(), Error<K>> {
        let mut stack: Vec<NodeId> = tree.root().into_iter().collect();
        while let Some(id) = stack.pop() {
            let priority = *tree.meta(id);
            for child in tree.left(id).into_iter().chain(tree.right(id)) {
                if *tree.meta(child) > priority {
                    let err = format!(
                        "child {} priority {} above parent {} priority {}",
                        child,
                        tree.meta(child),
                        id,
                        priority
                    );
                    return Err(Error::HeapOrder(err));
                }
                stack.push(child);
            }
        }
        Ok(())
    }
}

/// Partition the sub-tree under `node` into (keys <= key, keys > key).
/// Parent links of the two returned roots are stale, callers re-link
/// them.
pub(crate) fn split<K, V>(
    tree: &mut TreapTree<K, V>,
    node: Option<NodeId>,
    key: &K,
) -> (Option<NodeId>, Option<NodeId>) {
    let id = match node {
        Some(id) => id,
        None => return (None, None),
    };
    match tree.compare(&tree.node(id).key, key) {
        Ordering::Greater => {
            let left = tree.left(id);
            let (lower, upper) = split(tree, left, key);
            tree.set_left(id, upper);
            (lower, Some(id))
        }
        _ => {
            let right = tree.right(id);
            let (lower, upper) = split(tree, right, key);
            tree.set_right(id, lower);
            (Some(id), upper)
        }
    }
}

/// Join two sub-trees where every key under `left` is less than every
/// key under `right`. The higher priority root wins, ties go left.
pub(crate) fn merge<K, V>(
    tree: &mut TreapTree<K, V>,
    left: Option<NodeId>,
    right: Option<NodeId>,
) -> Option<NodeId> {
    let (l, r) = match (left, right) {
        (None, other) | (other, None) => return other,
        (Some(l), Some(r)) => (l, r),
    };
    if tree.meta(l) >= tree.meta(r) {
        let lr = tree.right(l);
        let merged = merge(tree, lr, Some(r));
        tree.set_right(l, merged);
        Some(l)
    } else {
        let rl = tree.left(r);
        let merged = merge(tree, Some(l), rl);
        tree.set_left(r, merged);
        Some(r)
    }
}
