use crate::depth::Depth;

#[allow(unused_imports)]
use crate::Bst;

/// Statistics on [`Bst`] tree. Serves two purpose:
///
/// * To get partial but quick statistics via [`Bst::stats`] method.
/// * To get full statisics via [`Bst::validate`] method.
#[derive(Default, Debug, Clone)]
pub struct Stats {
    entries: usize, // number of entries in the tree.
    node_size: usize,
    height: Option<usize>,
    blacks: Option<usize>,
    depths: Option<Depth>,
}

impl Stats {
    pub(crate) fn new(entries: usize, node_size: usize) -> Stats {
        Stats {
            entries,
            node_size,
            height: Default::default(),
            blacks: Default::default(),
            depths: Default::default(),
        }
    }

    #[inline]
    pub(crate) fn set_height(&mut self, height: usize) {
        self.height = Some(height)
    }

    #[inline]
    pub(crate) fn set_blacks(&mut self, blacks: usize) {
        self.blacks = Some(blacks)
    }

    #[inline]
    pub(crate) fn set_depths(&mut self, depths: Depth) {
        self.depths = Some(depths)
    }

    /// Return number entries in [`Bst`] instance.
    #[inline]
    pub fn entries(&self) -> usize {
        self.entries
    }

    /// Return node-size, including over-head for the arena slot. Although
    /// the overhead is constant per strategy, the node size varies based
    /// on key and value types.
    #[inline]
    pub fn node_size(&self) -> usize {
        self.node_size
    }

    /// Return height of the tree as cached by the AVL strategy.
    #[inline]
    pub fn height(&self) -> Option<usize> {
        self.height
    }

    /// Return number of black nodes from root to leaf, on every path.
    /// Only red-black trees report this.
    #[inline]
    pub fn blacks(&self) -> Option<usize> {
        self.blacks
    }

    /// Return [`Depth`] statistics, None for an empty tree or when only
    /// quick statistics were gathered.
    pub fn depths(&self) -> Option<Depth> {
        match &self.depths {
            Some(depths) if depths.samples() > 0 => Some(depths.clone()),
            _ => None,
        }
    }
}
