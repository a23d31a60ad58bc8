use crate::{
    balance::Balance,
    error::Error,
    stats::Stats,
    tree::{Detached, NodeId, Tree},
};

type RbTree<K, V> = Tree<K, V, Color>;

/// Node color for the red-black strategy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Color {
    Red,
    Black,
}

/// Color balanced strategy.
///
/// * Root is black.
/// * No red node has a red child.
/// * Every path from a node down to an absent child crosses the same
///   number of black nodes.
///
/// New nodes are inserted red.
#[derive(Clone, Copy, Debug, Default)]
pub struct RedBlack;

impl<K, V> Balance<K, V> for RedBlack {
    type Meta = Color;

    fn meta(&mut self) -> Color {
        Color::Red
    }

    fn on_inserted(&mut self, tree: &mut RbTree<K, V>, node: NodeId) {
        insert_fixup(tree, node)
    }

    fn on_removed(&mut self, tree: &mut RbTree<K, V>, gone: &Detached<K, V, Color>) {
        if gone.node.meta == Color::Red {
            return;
        }
        match gone.child {
            Some(child) if is_red(tree, Some(child)) => set_color(tree, child, Color::Black),
            child => remove_fixup(tree, gone.parent, child, gone.was_left),
        }
    }

    fn validate(&self, tree: &RbTree<K, V>, stats: &mut Stats) -> Result<(), Error<K>> {
        if is_red(tree, tree.root()) {
            return Err(Error::RedRoot);
        }
        let blacks = validate_tree(tree, tree.root(), false)?;
        stats.set_blacks(blacks);
        Ok(())
    }
}

#[inline]
fn is_red<K, V>(tree: &RbTree<K, V>, node: Option<NodeId>) -> bool {
    node.map_or(false, |id| *tree.meta(id) == Color::Red)
}

#[inline]
fn is_black<K, V>(tree: &RbTree<K, V>, node: Option<NodeId>) -> bool {
    !is_red(tree, node)
}

#[inline]
fn set_color<K, V>(tree: &mut RbTree<K, V>, id: NodeId, color: Color) {
    *tree.meta_mut(id) = color
}

// Lift `node` over its parent, whichever side it hangs on.
fn lift<K, V>(tree: &mut RbTree<K, V>, node: NodeId) {
    if tree.is_left_child(node) {
        tree.rotate_right(node)
    } else {
        tree.rotate_left(node)
    }
}

fn insert_fixup<K, V>(tree: &mut RbTree<K, V>, node: NodeId) {
    let mut node = node;
    loop {
        // case 1: node is root.
        let parent = match tree.parent(node) {
            Some(parent) => parent,
            None => break set_color(tree, node, Color::Black),
        };
        // case 2: parent is black.
        if is_black(tree, Some(parent)) {
            break;
        }
        let grand = match tree.parent(parent) {
            Some(grand) => grand,
            None => break set_color(tree, parent, Color::Black),
        };
        let parent_left = tree.is_left_child(parent);
        let uncle = if parent_left {
            tree.right(grand)
        } else {
            tree.left(grand)
        };

        // case 3: red uncle, push the red up to grand-parent.
        match uncle {
            Some(uncle) if is_red(tree, Some(uncle)) => {
                set_color(tree, parent, Color::Black);
                set_color(tree, uncle, Color::Black);
                set_color(tree, grand, Color::Red);
                node = grand;
                continue;
            }
            _ => (),
        }

        // case 4: inner grand-child, turn it into an outer one.
        let parent = if tree.is_left_child(node) != parent_left {
            lift(tree, node);
            node
        } else {
            parent
        };

        // case 5: outer grand-child.
        set_color(tree, parent, Color::Black);
        set_color(tree, grand, Color::Red);
        lift(tree, parent);
        break;
    }
}

// `node` (possibly absent) hangs on `parent`'s left when `left` and is
// one black short compared to its sibling.
fn remove_fixup<K, V>(
    tree: &mut RbTree<K, V>,
    parent: Option<NodeId>,
    node: Option<NodeId>,
    left: bool,
) {
    let (mut parent, mut node, mut left) = (parent, node, left);
    loop {
        let p = match parent {
            Some(p) if is_black(tree, node) => p,
            // red node or the root absorbs the missing black.
            _ => {
                if let Some(node) = node {
                    set_color(tree, node, Color::Black);
                }
                break;
            }
        };

        let sibling = move |tree: &RbTree<K, V>| {
            let s = if left { tree.right(p) } else { tree.left(p) };
            match s {
                Some(s) => s,
                None => panic!("remove_fixup(): missing sibling, call the programmer"),
            }
        };

        // red sibling: rotate it above parent so the new sibling is black.
        let mut s = sibling(tree);
        if is_red(tree, Some(s)) {
            set_color(tree, s, Color::Black);
            set_color(tree, p, Color::Red);
            lift(tree, s);
            s = sibling(tree);
        }

        let (near, far) = if left {
            (tree.left(s), tree.right(s))
        } else {
            (tree.right(s), tree.left(s))
        };

        if is_black(tree, near) && is_black(tree, far) {
            set_color(tree, s, Color::Red);
            if is_red(tree, Some(p)) {
                // red parent absorbs the defect.
                set_color(tree, p, Color::Black);
                break;
            }
            // black parent, push the defect one level up.
            left = tree.is_left_child(p);
            node = Some(p);
            parent = tree.parent(p);
            continue;
        }

        // near nephew red, far black: rotate near above sibling.
        let (s, far) = match near {
            Some(n) if is_black(tree, far) => {
                set_color(tree, n, Color::Black);
                set_color(tree, s, Color::Red);
                lift(tree, n);
                (n, Some(s))
            }
            _ => (s, far),
        };

        // far nephew red: rotate sibling above parent, done.
        let color = *tree.meta(p);
        set_color(tree, s, color);
        set_color(tree, p, Color::Black);
        if let Some(far) = far {
            set_color(tree, far, Color::Black);
        }
        lift(tree, s);
        break;
    }
}

// Return the number of blacks on every path below `node`.
fn validate_tree<K, V>(
    tree: &RbTree<K, V>,
    node: Option<NodeId>,
    fromred: bool,
) -> Result<usize, Error<K>> {
    let id = match node {
        None => return Ok(0),
        Some(id) => id,
    };
    let red = is_red(tree, node);
    if fromred && red {
        return Err(Error::ConsecutiveReds);
    }
    let lblacks = validate_tree(tree, tree.left(id), red)?;
    let rblacks = validate_tree(tree, tree.right(id), red)?;
    if lblacks != rblacks {
        let err = format!("node {} left: {} right: {}", id, lblacks, rblacks);
        return Err(Error::UnbalancedBlacks(err));
    }
    Ok(if red { lblacks } else { lblacks + 1 })
}
