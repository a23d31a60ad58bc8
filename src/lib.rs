//! Ordered key-value index backed by a binary search tree, with
//! pluggable balancing.
//!
//! All strategies share one arena backed engine, [`Tree`], which does
//! the structural edits and exposes rotation and transplant primitives.
//! A strategy implements [`Balance`] and restores its invariant from the
//! hooks the engine calls after each edit.
//!
//! ```
//! use bst_index::{AvlTree, Order};
//!
//! let mut index: AvlTree<i64, &str> = AvlTree::new("example");
//! index.set(10, "ten");
//! index.set(5, "five");
//! index.set(15, "fifteen");
//!
//! let keys: Vec<i64> = index.walk(Order::PreOrder).map(|e| *e.key).collect();
//! assert_eq!(keys, vec![10, 5, 15]);
//! assert_eq!(index.get(&5), Some(&"five"));
//! assert!(index.validate().is_ok());
//! ```

mod avl;
mod balance;
mod bst;
mod depth;
mod error;
mod red_black;
mod splay;
mod stats;
mod tree;
mod treap;
mod walk;

pub use crate::avl::Avl;
pub use crate::balance::{Balance, Plain};
pub use crate::bst::{Bst, Iter};
pub use crate::depth::Depth;
pub use crate::error::Error;
pub use crate::red_black::{Color, RedBlack};
pub use crate::splay::{splay, Splay};
pub use crate::stats::Stats;
pub use crate::tree::{Comparator, Detached, Extreme, Node, NodeId, Tree, Upsert};
pub use crate::treap::Treap;
pub use crate::walk::{Entry, Order, Walk};

/// Unbalanced binary search tree.
pub type PlainTree<K, V> = Bst<K, V, Plain>;
/// Height balanced (AVL) tree.
pub type AvlTree<K, V> = Bst<K, V, Avl>;
/// Color balanced (red-black) tree.
pub type RbTree<K, V> = Bst<K, V, RedBlack>;
/// Self adjusting (splay) tree.
pub type SplayTree<K, V> = Bst<K, V, Splay>;
/// Randomized priority tree.
pub type TreapTree<K, V> = Bst<K, V, Treap>;

#[cfg(test)]
mod bst_test;
#[cfg(test)]
mod splay_test;
