use crate::{
    error::Error,
    stats::Stats,
    tree::{Detached, NodeId, Tree, Upsert},
};

/// Balance is the seam between the shared [`Tree`] engine and a
/// balancing strategy. The engine performs structural edits and calls
/// back into the strategy, which restores its own invariant using the
/// engine's rotation primitives.
///
/// `Meta` is the per-node payload the strategy needs, height, color
/// or priority.
pub trait Balance<K, V> {
    type Meta;

    /// Payload for a freshly created node.
    fn meta(&mut self) -> Self::Meta;

    /// Called once per structural insertion, with the new leaf.
    fn on_inserted(&mut self, _tree: &mut Tree<K, V, Self::Meta>, _node: NodeId) {}

    /// Called once per structural removal.
    fn on_removed(&mut self, _tree: &mut Tree<K, V, Self::Meta>, _gone: &Detached<K, V, Self::Meta>) {
    }

    /// Called after a lookup hit or an in-place value overwrite.
    fn on_accessed(&mut self, _tree: &mut Tree<K, V, Self::Meta>, _node: NodeId) {}

    /// Set `key` to `value`, return the old value if key was present.
    fn insert(&mut self, tree: &mut Tree<K, V, Self::Meta>, key: K, value: V) -> Option<V> {
        let meta = self.meta();
        match tree.insert(key, value, meta) {
            Upsert::Created(node) => {
                self.on_inserted(tree, node);
                None
            }
            Upsert::Updated(node, old) => {
                self.on_accessed(tree, node);
                Some(old)
            }
        }
    }

    /// Remove `key`, return its (key, value) if it was present.
    fn remove(&mut self, tree: &mut Tree<K, V, Self::Meta>, key: &K) -> Option<(K, V)> {
        let node = tree.find(key)?;
        let gone = tree.remove_node(node);
        self.on_removed(tree, &gone);
        Some((gone.node.key, gone.node.value))
    }

    /// Check the strategy's own invariant, structural invariants are
    /// checked by the engine before this is called.
    fn validate(&self, _tree: &Tree<K, V, Self::Meta>, _stats: &mut Stats) -> Result<(), Error<K>> {
        Ok(())
    }
}

/// Unbalanced binary search tree, shape follows insertion order.
#[derive(Clone, Copy, Debug, Default)]
pub struct Plain;

impl<K, V> Balance<K, V> for Plain {
    type Meta = ();

    fn meta(&mut self) -> Self::Meta {}
}
