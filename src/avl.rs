use std::cmp;

use crate::{
    balance::Balance,
    error::Error,
    stats::Stats,
    tree::{Detached, NodeId, Tree},
};

type AvlTree<K, V> = Tree<K, V, usize>;

/// Height balanced strategy. Every node caches its height, a leaf has
/// height 1 and an absent child counts as 0. The heights of a node's two
/// sub-trees never differ by more than one.
#[derive(Clone, Copy, Debug, Default)]
pub struct Avl;

impl<K, V> Balance<K, V> for Avl {
    type Meta = usize;

    fn meta(&mut self) -> usize {
        1
    }

    // retracing stops as soon as a sub-tree's height is unchanged, which
    // after a rotation on insert is always the case.
    fn on_inserted(&mut self, tree: &mut AvlTree<K, V>, node: NodeId) {
        let mut cur = tree.parent(node);
        while let Some(id) = cur {
            let before = height(tree, Some(id));
            let top = rebalance(tree, id);
            if height(tree, Some(top)) == before {
                break;
            }
            cur = tree.parent(top);
        }
    }

    fn on_removed(&mut self, tree: &mut AvlTree<K, V>, gone: &Detached<K, V, usize>) {
        let mut cur = gone.parent;
        while let Some(id) = cur {
            let top = rebalance(tree, id);
            cur = tree.parent(top);
        }
    }

    fn validate(&self, tree: &AvlTree<K, V>, stats: &mut Stats) -> Result<(), Error<K>> {
        let root = match tree.root() {
            Some(root) => root,
            None => return Ok(()),
        };
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            let (left, right) = (tree.left(id), tree.right(id));
            let want = cmp::max(height(tree, left), height(tree, right)) + 1;
            if *tree.meta(id) != want {
                let err = format!("node {} height {} expected {}", id, tree.meta(id), want);
                return Err(Error::BadHeight(err));
            }
            let bf = balance_factor(tree, id);
            if bf < -1 || bf > 1 {
                return Err(Error::Unbalanced(format!("node {} factor {}", id, bf)));
            }
            stack.extend(left);
            stack.extend(right);
        }
        stats.set_height(height(tree, Some(root)));
        Ok(())
    }
}

#[inline]
fn height<K, V>(tree: &AvlTree<K, V>, node: Option<NodeId>) -> usize {
    node.map_or(0, |id| *tree.meta(id))
}

fn fix_height<K, V>(tree: &mut AvlTree<K, V>, id: NodeId) {
    let (left, right) = (tree.left(id), tree.right(id));
    *tree.meta_mut(id) = cmp::max(height(tree, left), height(tree, right)) + 1;
}

/// height(right) - height(left).
fn balance_factor<K, V>(tree: &AvlTree<K, V>, id: NodeId) -> isize {
    let (left, right) = (tree.left(id), tree.right(id));
    height(tree, right) as isize - height(tree, left) as isize
}

// Refresh `id`'s height and, when it is out of balance, restore it with
// one single or one double rotation picked by the heavy child's own
// factor. Return the node now rooting `id`'s old position.
//
//   RR: rotate_left(r)          RL: rotate_big_left(rl)
//   LL: rotate_right(l)         LR: rotate_big_right(lr)
//
fn rebalance<K, V>(tree: &mut AvlTree<K, V>, id: NodeId) -> NodeId {
    fix_height(tree, id);
    match balance_factor(tree, id) {
        bf if bf > 1 => {
            let r = heavy_child(tree.right(id));
            if balance_factor(tree, r) < 0 {
                let rl = heavy_child(tree.left(r));
                tree.rotate_big_left(rl);
                fix_heights(tree, &[id, r, rl]);
                rl
            } else {
                tree.rotate_left(r);
                fix_heights(tree, &[id, r]);
                r
            }
        }
        bf if bf < -1 => {
            let l = heavy_child(tree.left(id));
            if balance_factor(tree, l) > 0 {
                let lr = heavy_child(tree.right(l));
                tree.rotate_big_right(lr);
                fix_heights(tree, &[id, l, lr]);
                lr
            } else {
                tree.rotate_right(l);
                fix_heights(tree, &[id, l]);
                l
            }
        }
        _ => id,
    }
}

fn fix_heights<K, V>(tree: &mut AvlTree<K, V>, bottom_up: &[NodeId]) {
    bottom_up.iter().for_each(|id| fix_height(tree, *id));
}

fn heavy_child(node: Option<NodeId>) -> NodeId {
    match node {
        Some(id) => id,
        None => panic!("rebalance(): heavy side is empty, call the programmer"),
    }
}
