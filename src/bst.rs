use std::{iter::FromIterator, mem, ops::Range};

use crate::{
    balance::{Balance, Plain},
    depth::Depth,
    error::Error,
    stats::Stats,
    tree::{Comparator, Node, Tree},
    treap::Treap,
    walk::{Order, Walk},
};

/// Bst manage a single instance of in-memory index using a binary
/// search tree, balanced by the strategy `B`: [`Plain`], [`Avl`],
/// [`RedBlack`], [`Splay`] or [`Treap`].
///
/// Keys are ordered by a comparator fixed at construction, `Ord::cmp`
/// unless supplied otherwise.
///
/// [`Avl`]: crate::Avl
/// [`RedBlack`]: crate::RedBlack
/// [`Splay`]: crate::Splay
/// [`Treap`]: crate::Treap
pub struct Bst<K, V, B = Plain>
where
    B: Balance<K, V>,
{
    name: String,
    tree: Tree<K, V, B::Meta>,
    balance: B,
}

impl<K, V, B> Clone for Bst<K, V, B>
where
    K: Clone,
    V: Clone,
    B: Balance<K, V> + Clone,
    B::Meta: Clone,
{
    fn clone(&self) -> Self {
        Bst {
            name: self.name.clone(),
            tree: self.tree.clone(),
            balance: self.balance.clone(),
        }
    }
}

/// Different ways to construct a new Bst instance.
impl<K, V, B> Bst<K, V, B>
where
    K: Ord,
    B: Balance<K, V> + Default,
{
    /// Create an empty instance of Bst, identified by `name`, ordering
    /// keys by their natural order. Applications can choose unique names.
    pub fn new<S>(name: S) -> Bst<K, V, B>
    where
        S: AsRef<str>,
    {
        Bst::with_balance(name, <K as Ord>::cmp, B::default())
    }

    /// Create a new instance of Bst and load it with entries from
    /// `iter`. Later entries overwrite earlier ones with equal key.
    pub fn load_from<S, I>(name: S, iter: I) -> Bst<K, V, B>
    where
        S: AsRef<str>,
        I: IntoIterator<Item = (K, V)>,
    {
        let mut index = Bst::new(name);
        index.extend(iter);
        index
    }
}

impl<K, V, B> Bst<K, V, B>
where
    B: Balance<K, V>,
{
    /// Create an empty instance of Bst ordering keys with `cmp`.
    pub fn with_comparator<S>(name: S, cmp: Comparator<K>) -> Bst<K, V, B>
    where
        S: AsRef<str>,
        B: Default,
    {
        Bst::with_balance(name, cmp, B::default())
    }

    /// Create an empty instance of Bst with an explicitly configured
    /// balancing strategy, like a seeded [`Treap`](crate::Treap).
    pub fn with_balance<S>(name: S, cmp: Comparator<K>, balance: B) -> Bst<K, V, B>
    where
        S: AsRef<str>,
    {
        Bst {
            name: name.as_ref().to_string(),
            tree: Tree::new(cmp),
            balance,
        }
    }
}

/// Treap backed instance with a configured priority range.
impl<K, V> Bst<K, V, Treap>
where
    K: Ord,
{
    /// Create an empty treap ordered by `Ord::cmp`, drawing node
    /// priorities from `priorities` with a generator seeded by `seed`.
    /// An empty range is rejected with [`Error::InvalidConfig`].
    pub fn with_priorities<S>(
        name: S,
        priorities: Range<u64>,
        seed: u128,
    ) -> Result<Bst<K, V, Treap>, Error<K>>
    where
        S: AsRef<str>,
    {
        let treap = Treap::with_priorities::<K>(priorities, seed)?;
        Ok(Bst::with_balance(name, <K as Ord>::cmp, treap))
    }
}

/// Maintenance API.
impl<K, V, B> Bst<K, V, B>
where
    B: Balance<K, V>,
{
    /// Identify this instance. Applications can choose unique names while
    /// creating Bst instances.
    #[inline]
    pub fn id(&self) -> String {
        self.name.clone()
    }

    /// Return number of entries in this instance.
    #[inline]
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    /// Check whether this index is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tree.len() == 0
    }

    /// Return the key at the root of the tree. Exposed for white-box
    /// checks on the shape the balancing strategy maintains.
    pub fn root_key(&self) -> Option<&K> {
        self.tree.root().map(|id| &self.tree.node(id).key)
    }

    /// Return quickly with basic statisics, only entries() and
    /// node_size() are valid with this statisics.
    pub fn stats(&self) -> Stats {
        Stats::new(self.len(), mem::size_of::<Option<Node<K, V, B::Meta>>>())
    }

    /// Validate the tree with following rules:
    ///
    /// * Every child's parent link points back at its parent.
    /// * Keys are in sort order under the comparator.
    /// * Number of reachable nodes matches the entry count.
    /// * Balancing strategy's own invariant, heights for AVL, colors for
    ///   red-black, priorities for treap.
    ///
    /// Additionally return full statistics on the tree. Refer to [`Stats`]
    /// for more information.
    pub fn validate(&self) -> Result<Stats, Error<K>>
    where
        K: Clone,
    {
        self.tree.validate_links()?;

        let mut stats = self.stats();
        let mut depths = Depth::new();
        let mut stack: Vec<_> = self.tree.root().map(|id| (id, 0)).into_iter().collect();
        while let Some((id, depth)) = stack.pop() {
            let (left, right) = (self.tree.left(id), self.tree.right(id));
            if left.is_none() && right.is_none() {
                depths.sample(depth);
            }
            stack.extend(left.map(|id| (id, depth + 1)));
            stack.extend(right.map(|id| (id, depth + 1)));
        }
        stats.set_depths(depths);

        self.balance.validate(&self.tree, &mut stats)?;
        Ok(stats)
    }

    /// Discard every entry.
    pub fn clear(&mut self) {
        self.tree.clear()
    }
}

/// Write operations on Bst instance.
impl<K, V, B> Bst<K, V, B>
where
    B: Balance<K, V>,
{
    /// Set value for key. If there is an existing entry for key,
    /// overwrite the old value with new value and return the old value.
    pub fn set(&mut self, key: K, value: V) -> Option<V> {
        self.balance.insert(&mut self.tree, key, value)
    }

    /// Delete key from this instance and return its value. If key is
    /// not present, then delete is effectively a no-op.
    pub fn delete(&mut self, key: &K) -> Option<V> {
        self.balance.remove(&mut self.tree, key).map(|(_, value)| value)
    }

    /// Remove key from this instance, return whether it was present.
    pub fn remove(&mut self, key: &K) -> bool {
        self.delete(key).is_some()
    }
}

/// Read operations on Bst instance. Lookups take `&mut self`, a
/// [`Splay`](crate::Splay) tree moves the found entry to the root.
impl<K, V, B> Bst<K, V, B>
where
    B: Balance<K, V>,
{
    /// Get the value for key.
    pub fn get(&mut self, key: &K) -> Option<&V> {
        let id = self.tree.find(key)?;
        self.balance.on_accessed(&mut self.tree, id);
        Some(&self.tree.node(id).value)
    }

    /// Get the value for key, error when the key is missing.
    pub fn lookup(&mut self, key: &K) -> Result<&V, Error<K>>
    where
        K: Clone,
    {
        match self.tree.find(key) {
            Some(id) => {
                self.balance.on_accessed(&mut self.tree, id);
                Ok(&self.tree.node(id).value)
            }
            None => Err(Error::KeyNotFound(key.clone())),
        }
    }

    /// Check whether key is present.
    pub fn contains_key(&mut self, key: &K) -> bool {
        self.get(key).is_some()
    }

    /// All keys in ascending order.
    pub fn keys(&self) -> Vec<K>
    where
        K: Clone,
    {
        self.in_order().map(|entry| entry.key.clone()).collect()
    }

    /// All values in ascending order of their keys.
    pub fn values(&self) -> Vec<V>
    where
        V: Clone,
    {
        self.in_order().map(|entry| entry.value.clone()).collect()
    }

    /// Return an iterator over all entries in ascending key order.
    pub fn iter(&self) -> Iter<K, V, B::Meta> {
        Iter {
            walk: self.in_order(),
        }
    }

    /// Walk the whole tree in `order`.
    pub fn walk(&self, order: Order) -> Walk<K, V, B::Meta> {
        Walk::new(&self.tree, self.tree.root(), order)
    }

    /// Walk the sub-tree rooted at `key` in `order`, depths are counted
    /// from that node. Does not restructure the tree.
    pub fn subtree(&self, key: &K, order: Order) -> Option<Walk<K, V, B::Meta>> {
        let id = self.tree.find(key)?;
        Some(Walk::new(&self.tree, Some(id), order))
    }

    /// Walk the whole tree parent first, then left, then right.
    pub fn pre_order(&self) -> Walk<K, V, B::Meta> {
        self.walk(Order::PreOrder)
    }

    /// Walk the whole tree in ascending key order.
    pub fn in_order(&self) -> Walk<K, V, B::Meta> {
        self.walk(Order::InOrder)
    }

    /// Walk the whole tree left, then right, then parent.
    pub fn post_order(&self) -> Walk<K, V, B::Meta> {
        self.walk(Order::PostOrder)
    }

    /// Reverse of [`Bst::pre_order`], each parent after both its children, right side first.
    pub fn pre_order_rev(&self) -> Walk<K, V, B::Meta> {
        self.walk(Order::PreOrderReverse)
    }

    /// Walk the whole tree in descending key order.
    pub fn in_order_rev(&self) -> Walk<K, V, B::Meta> {
        self.walk(Order::InOrderReverse)
    }

    /// Reverse of [`Bst::post_order`], parent first, then right, then left.
    pub fn post_order_rev(&self) -> Walk<K, V, B::Meta> {
        self.walk(Order::PostOrderReverse)
    }
}

impl<K, V, B> Extend<(K, V)> for Bst<K, V, B>
where
    B: Balance<K, V>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.set(key, value);
        }
    }
}

impl<K, V, B> FromIterator<(K, V)> for Bst<K, V, B>
where
    K: Ord,
    B: Balance<K, V> + Default,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Bst::load_from("", iter)
    }
}

/// Ascending iterator over `(key, value)` references.
pub struct Iter<'a, K, V, M> {
    walk: Walk<'a, K, V, M>,
}

impl<'a, K, V, M> Iterator for Iter<'a, K, V, M> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        self.walk.next().map(|entry| (entry.key, entry.value))
    }
}

impl<'a, K, V, B> IntoIterator for &'a Bst<K, V, B>
where
    B: Balance<K, V>,
{
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V, B::Meta>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
