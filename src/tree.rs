use std::{cmp::Ordering, mem};

use crate::error::Error;

/// Handle to a node slot in a [`Tree`] arena.
pub type NodeId = usize;

/// Comparator over keys, fixed for the lifetime of a tree. Any
/// non-capturing closure coerces to it.
pub type Comparator<K> = fn(&K, &K) -> Ordering;

/// Node corresponds to a single entry in the tree. `meta` is the
/// per-node payload owned by the balancing strategy, height, color,
/// priority or nothing at all.
#[derive(Clone)]
pub struct Node<K, V, M> {
    pub key: K,
    pub value: V,
    pub meta: M,
    parent: Option<NodeId>, // non-owning back reference
    left: Option<NodeId>,
    right: Option<NodeId>,
}

impl<K, V, M> Node<K, V, M> {
    fn new(key: K, value: V, meta: M) -> Node<K, V, M> {
        Node {
            key,
            value,
            meta,
            parent: None,
            left: None,
            right: None,
        }
    }
}

/// Outcome of a skeleton insert.
pub enum Upsert<V> {
    /// New leaf was attached at this slot.
    Created(NodeId),
    /// Key was present, old value returned. No structural change.
    Updated(NodeId, V),
}

/// A node that was structurally removed from the tree, along with the
/// edge that took its place. Handed over to the strategy's post-remove
/// hook, after which the node is dropped.
pub struct Detached<K, V, M> {
    /// Parent of the removed position, None when the root was removed.
    pub parent: Option<NodeId>,
    /// Node that now sits in the removed position, if any.
    pub child: Option<NodeId>,
    /// Whether the removed position was the left slot of `parent`.
    pub was_left: bool,
    /// Removed node, carrying the removed key, value and meta.
    pub node: Node<K, V, M>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum Extreme {
    Leftmost,
    Rightmost,
}

/// Tree is the arena backed binary search tree engine shared by all
/// balancing strategies. It owns the nodes, the root handle, the entry
/// count and the comparator, and exposes the structural primitives
/// (rotations, transplant, extreme-find) that strategies build on.
///
/// Every primitive keeps the parent back-reference consistent with the
/// child links pointing at a node.
#[derive(Clone)]
pub struct Tree<K, V, M> {
    nodes: Vec<Option<Node<K, V, M>>>,
    free: Vec<NodeId>,
    root: Option<NodeId>,
    n_count: usize, // number of entries in the tree.
    cmp: Comparator<K>,
}

/// Construction and maintenance.
impl<K, V, M> Tree<K, V, M> {
    pub(crate) fn new(cmp: Comparator<K>) -> Tree<K, V, M> {
        Tree {
            nodes: Default::default(),
            free: Default::default(),
            root: Default::default(),
            n_count: Default::default(),
            cmp,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.n_count
    }

    #[inline]
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    #[inline]
    pub(crate) fn set_root(&mut self, root: Option<NodeId>) {
        self.root = root;
        if let Some(root) = root {
            self.node_mut(root).parent = None;
        }
    }

    #[inline]
    pub fn compare(&self, a: &K, b: &K) -> Ordering {
        (self.cmp)(a, b)
    }

    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
        self.free.clear();
        self.root = None;
        self.n_count = 0;
    }
}

/// Node access.
impl<K, V, M> Tree<K, V, M> {
    #[inline]
    pub fn node(&self, id: NodeId) -> &Node<K, V, M> {
        match self.nodes.get(id) {
            Some(Some(node)) => node,
            _ => panic!("node(): dangling handle {}, call the programmer", id),
        }
    }

    #[inline]
    pub fn node_mut(&mut self, id: NodeId) -> &mut Node<K, V, M> {
        match self.nodes.get_mut(id) {
            Some(Some(node)) => node,
            _ => panic!("node_mut(): dangling handle {}, call the programmer", id),
        }
    }

    #[inline]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    #[inline]
    pub fn left(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).left
    }

    #[inline]
    pub fn right(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).right
    }

    #[inline]
    pub fn meta(&self, id: NodeId) -> &M {
        &self.node(id).meta
    }

    #[inline]
    pub fn meta_mut(&mut self, id: NodeId) -> &mut M {
        &mut self.node_mut(id).meta
    }

    pub fn is_left_child(&self, id: NodeId) -> bool {
        match self.parent(id) {
            Some(parent) => self.left(parent) == Some(id),
            None => false,
        }
    }

    /// Link `child` as the left child of `parent`, fixing up the child's
    /// back-reference.
    pub(crate) fn set_left(&mut self, parent: NodeId, child: Option<NodeId>) {
        self.node_mut(parent).left = child;
        if let Some(child) = child {
            self.node_mut(child).parent = Some(parent);
        }
    }

    /// Link `child` as the right child of `parent`, fixing up the child's
    /// back-reference.
    pub(crate) fn set_right(&mut self, parent: NodeId, child: Option<NodeId>) {
        self.node_mut(parent).right = child;
        if let Some(child) = child {
            self.node_mut(child).parent = Some(parent);
        }
    }

    /// Allocate a detached node, counted as an entry from here on.
    pub(crate) fn alloc(&mut self, key: K, value: V, meta: M) -> NodeId {
        let node = Node::new(key, value, meta);
        self.n_count += 1;
        match self.free.pop() {
            Some(id) => {
                self.nodes[id] = Some(node);
                id
            }
            None => {
                self.nodes.push(Some(node));
                self.nodes.len() - 1
            }
        }
    }

    fn release(&mut self, id: NodeId) -> Node<K, V, M> {
        match self.nodes.get_mut(id).and_then(Option::take) {
            Some(node) => {
                self.free.push(id);
                self.n_count -= 1;
                node
            }
            None => panic!("release(): dangling handle {}, call the programmer", id),
        }
    }
}

/// Lookup and the shared insert/remove skeleton.
impl<K, V, M> Tree<K, V, M> {
    /// Comparator guided descent from the root.
    pub fn find(&self, key: &K) -> Option<NodeId> {
        let mut node = self.root;
        while let Some(id) = node {
            node = match self.compare(key, &self.node(id).key) {
                Ordering::Less => self.left(id),
                Ordering::Greater => self.right(id),
                Ordering::Equal => return Some(id),
            };
        }
        None
    }

    /// Descend from `id` always to the left, or always to the right.
    pub fn find_extreme(&self, id: NodeId, mode: Extreme) -> NodeId {
        let mut id = id;
        loop {
            let next = match mode {
                Extreme::Leftmost => self.left(id),
                Extreme::Rightmost => self.right(id),
            };
            match next {
                Some(next) => id = next,
                None => break id,
            }
        }
    }

    /// Overwrite the value in place when `key` is present, else attach
    /// a new leaf carrying `meta`. Does not rebalance.
    pub fn insert(&mut self, key: K, value: V, meta: M) -> Upsert<V> {
        let mut parent = match self.root {
            None => {
                let id = self.alloc(key, value, meta);
                self.root = Some(id);
                return Upsert::Created(id);
            }
            Some(root) => root,
        };

        loop {
            let (next, left) = match self.compare(&key, &self.node(parent).key) {
                Ordering::Less => (self.left(parent), true),
                Ordering::Greater => (self.right(parent), false),
                Ordering::Equal => {
                    let old = mem::replace(&mut self.node_mut(parent).value, value);
                    return Upsert::Updated(parent, old);
                }
            };
            match next {
                Some(next) => parent = next,
                None => {
                    let id = self.alloc(key, value, meta);
                    if left {
                        self.set_left(parent, Some(id));
                    } else {
                        self.set_right(parent, Some(id));
                    }
                    return Upsert::Created(id);
                }
            }
        }
    }

    /// Structurally remove node `id`. With two children the in-order
    /// predecessor's payload moves into `id` and the predecessor's slot
    /// is the one physically removed, so `id` keeps its position. The
    /// returned [`Detached`] carries the key and value that left the
    /// tree.
    pub fn remove_node(&mut self, id: NodeId) -> Detached<K, V, M> {
        let (left, right) = (self.left(id), self.right(id));
        let (target, child) = match (left, right) {
            (None, child) | (child, None) => (id, child),
            (Some(left), Some(_)) => {
                let pred = self.find_extreme(left, Extreme::Rightmost);
                (pred, self.left(pred))
            }
        };

        let parent = self.parent(target);
        let was_left = self.is_left_child(target);
        self.transplant(target, child);

        let mut node = self.release(target);
        if target != id {
            let keep = self.node_mut(id);
            mem::swap(&mut keep.key, &mut node.key);
            mem::swap(&mut keep.value, &mut node.value);
        }
        Detached {
            parent,
            child,
            was_left,
            node,
        }
    }
}

/// Structural primitives. Rotations take the node that moves *up* and
/// are no-ops when that node has no parent.
impl<K, V, M> Tree<K, V, M> {
    /// Put `v` in `u`'s position, root or parent slot. `u`'s children are
    /// left untouched.
    pub fn transplant(&mut self, u: NodeId, v: Option<NodeId>) {
        match self.parent(u) {
            None => self.root = v,
            Some(parent) if self.left(parent) == Some(u) => {
                self.node_mut(parent).left = v;
            }
            Some(parent) => self.node_mut(parent).right = v,
        }
        if let Some(v) = v {
            let parent = self.parent(u);
            self.node_mut(v).parent = parent;
        }
    }

    //              (i)                       (i)
    //               |                         |
    //               p                         x
    //              / \                       / \
    //             a   x          =>         p   xr
    //                / \                   / \
    //              xl   xr                a   xl
    //
    pub fn rotate_left(&mut self, x: NodeId) {
        let p = match self.parent(x) {
            Some(p) => p,
            None => return,
        };
        debug_assert_eq!(self.right(p), Some(x));
        let xl = self.left(x);
        self.set_right(p, xl);
        self.transplant(p, Some(x));
        self.set_left(x, Some(p));
    }

    //              (i)                       (i)
    //               |                         |
    //               p                         x
    //              / \                       / \
    //             x   a          =>        xl   p
    //            / \                           / \
    //          xl   xr                       xr   a
    //
    pub fn rotate_right(&mut self, x: NodeId) {
        let p = match self.parent(x) {
            Some(p) => p,
            None => return,
        };
        debug_assert_eq!(self.left(p), Some(x));
        let xr = self.right(x);
        self.set_left(p, xr);
        self.transplant(p, Some(x));
        self.set_right(x, Some(p));
    }

    /// `x` is the left child of a right child, lift it two levels.
    pub fn rotate_big_left(&mut self, x: NodeId) {
        self.rotate_right(x);
        self.rotate_left(x);
    }

    /// `x` is the right child of a left child, lift it two levels.
    pub fn rotate_big_right(&mut self, x: NodeId) {
        self.rotate_left(x);
        self.rotate_right(x);
    }

    /// Splay's zig-zig step: `x` is the right child of a right child.
    /// Rotate its parent left, then `x` itself. This is not the same as
    /// rotating `x` twice, which would leave the parent above the
    /// grand-parent.
    pub fn rotate_double_left(&mut self, x: NodeId) {
        if let Some(p) = self.parent(x) {
            self.rotate_left(p);
        }
        self.rotate_left(x);
    }

    /// Splay's zig-zig step: `x` is the left child of a left child.
    /// Rotate its parent right, then `x` itself. This is not the same as
    /// rotating `x` twice.
    pub fn rotate_double_right(&mut self, x: NodeId) {
        if let Some(p) = self.parent(x) {
            self.rotate_right(p);
        }
        self.rotate_right(x);
    }
}

/// Structural validation, invariants on links, order and count.
impl<K, V, M> Tree<K, V, M>
where
    K: Clone,
{
    pub(crate) fn validate_links(&self) -> Result<(), Error<K>> {
        let root = match self.root {
            None if self.n_count == 0 => return Ok(()),
            None => return Err(Error::CountMismatch(self.n_count, 0)),
            Some(root) => root,
        };
        if self.parent(root).is_some() {
            return Err(Error::BrokenLink(format!("root {} has a parent", root)));
        }

        let (mut stack, mut reachable) = (vec![root], 0);
        while let Some(id) = stack.pop() {
            reachable += 1;
            let node = self.node(id);
            for child in node.left.iter().chain(node.right.iter()) {
                if self.parent(*child) != Some(id) {
                    let err = format!("child {} of {} points elsewhere", child, id);
                    return Err(Error::BrokenLink(err));
                }
                stack.push(*child);
            }
            if let Some(left) = node.left {
                let lkey = &self.node(left).key;
                if self.compare(lkey, &node.key) != Ordering::Less {
                    return Err(Error::SortError(lkey.clone(), node.key.clone()));
                }
            }
            if let Some(right) = node.right {
                let rkey = &self.node(right).key;
                if self.compare(rkey, &node.key) != Ordering::Greater {
                    return Err(Error::SortError(rkey.clone(), node.key.clone()));
                }
            }
        }
        if reachable != self.n_count {
            return Err(Error::CountMismatch(self.n_count, reachable));
        }

        // parent-child ordering alone does not catch a key that strays
        // into a grand-parent's range, check the in-order sequence too.
        let mut prev: Option<&K> = None;
        for entry in crate::walk::Walk::new(self, Some(root), crate::walk::Order::InOrder) {
            if let Some(prev) = prev {
                if self.compare(prev, entry.key) != Ordering::Less {
                    return Err(Error::SortError(entry.key.clone(), prev.clone()));
                }
            }
            prev = Some(entry.key);
        }
        Ok(())
    }
}
