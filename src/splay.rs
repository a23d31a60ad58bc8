use crate::{
    balance::Balance,
    tree::{NodeId, Tree},
};

/// Self adjusting strategy. Every insert, lookup hit and value overwrite
/// splays the touched node to the root, removal leaves the shape alone.
#[derive(Clone, Copy, Debug, Default)]
pub struct Splay;

impl<K, V> Balance<K, V> for Splay {
    type Meta = ();

    fn meta(&mut self) -> Self::Meta {}

    fn on_inserted(&mut self, tree: &mut Tree<K, V, ()>, node: NodeId) {
        splay(tree, node)
    }

    fn on_accessed(&mut self, tree: &mut Tree<K, V, ()>, node: NodeId) {
        splay(tree, node)
    }
}

/// Rotate `node` up until it becomes the root.
///
/// ```text
///   zig:       parent is root, one rotation.
///   zig-zig:   node and parent on the same side, rotate parent then node.
///   zig-zag:   node and parent on opposite sides, rotate node twice.
/// ```
pub fn splay<K, V, M>(tree: &mut Tree<K, V, M>, node: NodeId) {
    while let Some(parent) = tree.parent(node) {
        let node_left = tree.is_left_child(node);
        match tree.parent(parent) {
            None if node_left => tree.rotate_right(node),
            None => tree.rotate_left(node),
            Some(_) => match (node_left, tree.is_left_child(parent)) {
                (true, true) => tree.rotate_double_right(node),
                (false, false) => tree.rotate_double_left(node),
                (true, false) => tree.rotate_big_left(node),
                (false, true) => tree.rotate_big_right(node),
            },
        }
    }
}
