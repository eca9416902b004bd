use core::borrow::Borrow;

use crate::{
    cursor::Cursor,
    iter::{Iter, Keys, Values},
    node::NodeRef,
    Dir, Link, NodeId, SearchTree, TreeError,
};

/// An ordered map based on an [AVL tree].
///
/// Every insertion and removal restores the AVL invariant before returning, so the height of the
/// tree stays within about `1.44 * log2(n)` and point operations complete in _O(log(n))_ time.
///
/// [AVL tree]: https://en.wikipedia.org/wiki/AVL_tree
pub struct AvlTree<K, V> {
    tree: SearchTree<K, V>,
}

impl<K, V> AvlTree<K, V> {
    /// Creates a new, empty `AvlTree`.
    pub fn new() -> Self {
        Self {
            tree: SearchTree::new(),
        }
    }

    /// Returns `true` if the map contains no elements.
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Returns the number of elements in the map.
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    /// Returns a handle to the root node.
    pub fn root(&self) -> Option<NodeRef<'_, K, V>> {
        self.tree.root()
    }

    /// Returns the height of the tree: 0 when empty, 1 for a single node.
    ///
    /// This operation completes in _O(1)_ time.
    pub fn height(&self) -> usize {
        self.height_of(self.tree.root_id()) as usize
    }

    /// Returns `true` if every node's subtrees differ in height by at most one.
    ///
    /// This always holds for an `AvlTree`; the check recomputes every height from scratch rather
    /// than trusting the stored ones.
    pub fn is_balanced(&self) -> bool {
        self.tree.is_balanced()
    }

    /// Returns the first key-value pair in the map.
    ///
    /// The returned key is the minimum key in the map.
    #[inline]
    pub fn first_key_value(&self) -> Option<(&K, &V)> {
        self.tree.first_key_value()
    }

    /// Removes and returns the first key-value pair in the map.
    ///
    /// The returned key is the minimum key in the map.
    pub fn pop_first(&mut self) -> Option<(K, V)> {
        let first = self.tree.first_id()?;
        Some(self.remove_at(first))
    }

    /// Returns the last key-value pair in the map.
    ///
    /// The returned key is the maximum key in the map.
    #[inline]
    pub fn last_key_value(&self) -> Option<(&K, &V)> {
        self.tree.last_key_value()
    }

    /// Removes and returns the last key-value pair in the map.
    ///
    /// The returned key is the maximum key in the map.
    pub fn pop_last(&mut self) -> Option<(K, V)> {
        let last = self.tree.last_id()?;
        Some(self.remove_at(last))
    }

    /// Clears the map, removing all elements.
    #[inline]
    pub fn clear(&mut self) {
        self.tree.clear();
    }

    /// Returns an iterator over the entries of the map in ascending key order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        self.tree.iter()
    }

    /// Returns an iterator over the keys of the map in ascending order.
    pub fn keys(&self) -> Keys<'_, K, V> {
        self.tree.keys()
    }

    /// Returns an iterator over the values of the map in ascending key order.
    pub fn values(&self) -> Values<'_, K, V> {
        self.tree.values()
    }

    /// Returns a cursor pointing at the minimum element.
    pub fn cursor_first(&self) -> Cursor<'_, K, V> {
        self.tree.cursor_first()
    }

    /// Returns a cursor pointing at the maximum element.
    pub fn cursor_last(&self) -> Cursor<'_, K, V> {
        self.tree.cursor_last()
    }

    /// Returns the underlying search tree.
    ///
    /// Useful as the template of a [`SearchTree::transform`].
    pub fn as_search_tree(&self) -> &SearchTree<K, V> {
        &self.tree
    }

    /// Converts the map into a plain search tree with the same shape.
    ///
    /// The resulting tree no longer rebalances itself.
    pub fn into_search_tree(self) -> SearchTree<K, V> {
        self.tree
    }

    // Rebalancing ============================================================

    #[inline]
    fn height_of(&self, link: Link) -> u32 {
        link.map_or(0, |node| self.tree.node(node).height)
    }

    #[inline]
    fn update_height(&mut self, node: NodeId) {
        let links = self.tree.node(node);
        let height = 1 + self.height_of(links.left()).max(self.height_of(links.right()));
        self.tree.node_mut(node).height = height;
    }

    #[inline]
    fn is_node_balanced(&self, node: NodeId) -> bool {
        let links = self.tree.node(node);
        self.height_of(links.left())
            .abs_diff(self.height_of(links.right()))
            <= 1
    }

    // Walks from the parent of the new leaf `node` towards the root, refreshing heights.
    //
    // The first unbalanced node found is fixed with one single or double rotation. That rotation
    // brings the subtree back to its height from before the insertion, so no ancestor above it
    // can be affected and the walk stops. The walk also stops early once a height is unchanged.
    fn rebalance_inserted(&mut self, node: NodeId) {
        let mut opt_cur = self.tree.node(node).parent();

        while let Some(cur) = opt_cur {
            let before = self.tree.node(cur).height;
            self.update_height(cur);

            if !self.is_node_balanced(cur) {
                self.rebalance_at(cur);
                return;
            }

            if self.tree.node(cur).height == before {
                return;
            }

            opt_cur = self.tree.node(cur).parent();
        }
    }

    // Restores the balance of `z`, whose subtrees differ in height by exactly two, and returns the
    // new root of its subtree.
    //
    // Let `c` be the child of `z` on the taller side. If the subtree of `c` on the same side
    // (outer) is at least as tall as the one on the opposite side (inner), a single rotation at
    // `z` lifts `c`. Otherwise the inner grandchild `g` is first rotated above `c`, then above `z`.
    //
    // Only `z`, `c` and the new subtree root gain or lose children, so only their heights are
    // recomputed, lowest first.
    fn rebalance_at(&mut self, z: NodeId) -> NodeId {
        let links = self.tree.node(z);
        let left = self.height_of(links.left());
        let right = self.height_of(links.right());
        debug_assert_eq!(left.abs_diff(right), 2);

        // Rotating towards `dir` lifts the taller `!dir` side.
        let dir = if right > left { Dir::Left } else { Dir::Right };

        let c = links
            .child(!dir)
            .expect("the taller side of an unbalanced node cannot be empty");
        let outer = self.height_of(self.tree.node(c).child(!dir));
        let inner = self.height_of(self.tree.node(c).child(dir));

        let top = if outer >= inner {
            #[cfg(feature = "tracing")]
            tracing::trace!(z = z.index(), ?dir, "single rotation");

            let top = self.tree.rotate(z, dir);
            self.update_height(z);
            top
        } else {
            #[cfg(feature = "tracing")]
            tracing::trace!(z = z.index(), c = c.index(), ?dir, "double rotation");

            self.tree.rotate(c, !dir);
            let top = self.tree.rotate(z, dir);
            self.update_height(z);
            self.update_height(c);
            top
        };

        self.update_height(top);
        top
    }

    // Removes `node`'s entry and rebalances.
    //
    // Unlike insertion, a removal can shorten a subtree by one at every level, and a rotation can
    // itself shorten the subtree it fixes. The walk therefore continues all the way to the root,
    // testing each ancestor independently.
    fn remove_at(&mut self, node: NodeId) -> (K, V) {
        let (key, value, parent) = self.tree.remove_node(node);

        let mut opt_cur = parent;
        while let Some(cur) = opt_cur {
            self.update_height(cur);

            let top = if self.is_node_balanced(cur) {
                cur
            } else {
                self.rebalance_at(cur)
            };

            opt_cur = self.tree.node(top).parent();
        }

        (key, value)
    }
}

impl<K: Ord, V> AvlTree<K, V> {
    /// Returns a handle to the node holding `key`.
    pub fn find<Q>(&self, key: &Q) -> Option<NodeRef<'_, K, V>>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.tree.find(key)
    }

    /// Returns `true` if the map contains a value associated with `key`.
    #[inline]
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.tree.contains_key(key)
    }

    /// Returns a reference to the value associated with `key`.
    #[inline]
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.tree.get(key)
    }

    /// Returns a mutable reference to the value associated with `key`.
    #[inline]
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.tree.get_mut(key)
    }

    /// Inserts `value` under `key`, rebalancing the tree.
    ///
    /// If `key` is already present only its value is replaced, and the previous value is
    /// returned; heights and shape are left alone.
    ///
    /// This operation completes in _O(log(n))_ time.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let (node, replaced) = self.tree.insert_entry(key, value);

        if replaced.is_none() {
            self.rebalance_inserted(node);
        }

        replaced
    }

    /// Removes `key` from the map, returning its value and rebalancing the tree.
    ///
    /// Removing an absent key does nothing and returns `None`.
    ///
    /// This operation completes in _O(log(n))_ time.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let node = self.tree.find_id(key)?;
        Some(self.remove_at(node).1)
    }

    /// Checks the invariants of the tree.
    ///
    /// In addition to [`SearchTree::validate`], verifies that every stored height is up to date
    /// and that every node is balanced.
    pub fn validate(&self) -> Result<(), TreeError> {
        self.tree.validate()?;

        for node in self.tree.nodes() {
            let left = self.height_of(node.left());
            let right = self.height_of(node.right());

            if node.height != 1 + left.max(right) {
                return Err(TreeError::InvariantViolation("stored height is stale"));
            }

            if left.abs_diff(right) > 1 {
                return Err(TreeError::InvariantViolation("node is out of balance"));
            }
        }

        Ok(())
    }

    #[doc(hidden)]
    #[track_caller]
    pub fn assert_invariants(&self) {
        if let Err(error) = self.validate() {
            panic!("{error}");
        }
    }
}

impl<K, V> Default for AvlTree<K, V> {
    fn default() -> Self {
        AvlTree::new()
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for AvlTree<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut tree = AvlTree::new();
        tree.extend(iter);
        tree
    }
}

impl<K: Ord, V> Extend<(K, V)> for AvlTree<K, V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<'tree, K, V> IntoIterator for &'tree AvlTree<K, V> {
    type Item = (&'tree K, &'tree V);
    type IntoIter = Iter<'tree, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
