//! Iterative tree walks.
//!
//! A [`Walk`] reproduces the six recursive traversals using an explicit
//! stack of `(node, depth)` pairs as its only cursor state. Reverse
//! orders are the mirror image of their forward counterparts under a
//! left/right swap, hence `PreOrderReverse` runs the post-order machinery
//! mirrored, and `PostOrderReverse` runs the pre-order machinery
//! mirrored.

use crate::tree::{NodeId, Tree};

/// Traversal order for [`Walk`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Order {
    PreOrder,
    InOrder,
    PostOrder,
    PreOrderReverse,
    InOrderReverse,
    PostOrderReverse,
}

impl Order {
    pub const ALL: [Order; 6] = [
        Order::PreOrder,
        Order::InOrder,
        Order::PostOrder,
        Order::PreOrderReverse,
        Order::InOrderReverse,
        Order::PostOrderReverse,
    ];
}

/// Read-only projection of a node produced by a walk. `depth` counts
/// edges from the node the walk started at, not from the tree's root.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Entry<'a, K, V> {
    pub key: &'a K,
    pub value: &'a V,
    pub depth: usize,
}

#[derive(Clone, Copy)]
enum Kind {
    Pre,
    In,
    Post,
}

/// Lazy, finite, non-restartable traversal over a tree or sub-tree.
pub struct Walk<'a, K, V, M> {
    tree: &'a Tree<K, V, M>,
    root: Option<NodeId>,
    kind: Kind,
    flipped: bool,
    started: bool,
    stack: Vec<(NodeId, usize)>,
}

impl<'a, K, V, M> Walk<'a, K, V, M> {
    pub(crate) fn new(tree: &'a Tree<K, V, M>, root: Option<NodeId>, order: Order) -> Self {
        let (kind, flipped) = match order {
            Order::PreOrder => (Kind::Pre, false),
            Order::InOrder => (Kind::In, false),
            Order::PostOrder => (Kind::Post, false),
            Order::PreOrderReverse => (Kind::Post, true),
            Order::InOrderReverse => (Kind::In, true),
            Order::PostOrderReverse => (Kind::Pre, true),
        };
        Walk {
            tree,
            root,
            kind,
            flipped,
            started: false,
            stack: Vec::default(),
        }
    }

    // children in (near, far) order; near is visited first.
    #[inline]
    fn sides(&self, id: NodeId) -> (Option<NodeId>, Option<NodeId>) {
        let (left, right) = (self.tree.left(id), self.tree.right(id));
        if self.flipped {
            (right, left)
        } else {
            (left, right)
        }
    }

    fn push_near_chain(&mut self, mut node: Option<NodeId>, mut depth: usize) {
        while let Some(id) = node {
            self.stack.push((id, depth));
            depth += 1;
            node = self.sides(id).0;
        }
    }

    // near child when present, else far child, all the way down.
    fn push_leaf_chain(&mut self, mut node: Option<NodeId>, mut depth: usize) {
        while let Some(id) = node {
            self.stack.push((id, depth));
            depth += 1;
            let (near, far) = self.sides(id);
            node = near.or(far);
        }
    }

    fn start(&mut self) {
        self.started = true;
        match self.kind {
            Kind::Pre => self.stack.extend(self.root.map(|id| (id, 0))),
            Kind::In => self.push_near_chain(self.root, 0),
            Kind::Post => self.push_leaf_chain(self.root, 0),
        }
    }

    fn entry(&self, id: NodeId, depth: usize) -> Entry<'a, K, V> {
        let node = self.tree.node(id);
        Entry {
            key: &node.key,
            value: &node.value,
            depth,
        }
    }
}

impl<'a, K, V, M> Iterator for Walk<'a, K, V, M> {
    type Item = Entry<'a, K, V>;

    fn next(&mut self) -> Option<Self::Item> {
        if !self.started {
            self.start();
        }
        let (id, depth) = self.stack.pop()?;

        match self.kind {
            Kind::Pre => {
                let (near, far) = self.sides(id);
                self.stack.extend(far.map(|id| (id, depth + 1)));
                self.stack.extend(near.map(|id| (id, depth + 1)));
            }
            Kind::In => {
                let far = self.sides(id).1;
                self.push_near_chain(far, depth + 1);
            }
            // a node pops only after everything pushed above it; when it
            // is its parent's near child, the parent sits just below and
            // the parent's far sub-tree is the next one to descend.
            Kind::Post if depth > 0 => {
                if let Some(parent) = self.tree.parent(id) {
                    let (near, far) = self.sides(parent);
                    if near == Some(id) {
                        self.push_leaf_chain(far, depth);
                    }
                }
            }
            Kind::Post => (),
        }

        Some(self.entry(id, depth))
    }
}
