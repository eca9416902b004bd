use core::{borrow::Borrow, cmp::Ordering, mem};

use slab::Slab;

use crate::{
    cursor::Cursor,
    iter::{Iter, Keys, Values},
    node::{Node, NodeRef},
    Dir, Link, NodeId, TreeError,
};

/// An unbalanced binary search tree mapping unique keys to values.
///
/// Nodes are kept in an arena owned by the tree. Inserting keys in sorted order degrades the tree
/// into a chain; use [`AvlTree`](crate::AvlTree) when logarithmic depth is needed, or reshape the
/// tree with rotations and [`SearchTree::transform`].
pub struct SearchTree<K, V> {
    nodes: Slab<Node<K, V>>,
    root: Link,
}

impl<K, V> SearchTree<K, V> {
    /// Returns a new empty tree.
    pub fn new() -> SearchTree<K, V> {
        SearchTree {
            nodes: Slab::new(),
            root: None,
        }
    }

    /// Returns the number of elements in the tree.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if the tree contains no elements.
    pub fn is_empty(&self) -> bool {
        let empty = self.len() == 0;
        debug_assert_eq!(empty, self.root.is_none());
        empty
    }

    /// Returns a handle to the root node.
    pub fn root(&self) -> Option<NodeRef<'_, K, V>> {
        self.root.map(|root| NodeRef::new(self, root))
    }

    /// Returns the minimum key and its value.
    pub fn first_key_value(&self) -> Option<(&K, &V)> {
        let node = self.node(self.first_id()?);
        Some((&node.key, &node.value))
    }

    /// Returns the maximum key and its value.
    pub fn last_key_value(&self) -> Option<(&K, &V)> {
        let node = self.node(self.last_id()?);
        Some((&node.key, &node.value))
    }

    /// Removes and returns the entry with the minimum key.
    pub fn pop_first(&mut self) -> Option<(K, V)> {
        let (key, value, _) = self.remove_node(self.first_id()?);
        Some((key, value))
    }

    /// Removes and returns the entry with the maximum key.
    pub fn pop_last(&mut self) -> Option<(K, V)> {
        let (key, value, _) = self.remove_node(self.last_id()?);
        Some((key, value))
    }

    /// Clears the tree, removing all elements.
    ///
    /// All nodes live in one arena, so this releases them at once rather than walking the tree.
    pub fn clear(&mut self) {
        #[cfg(feature = "tracing")]
        tracing::debug!(len = self.len(), "clearing tree");

        self.nodes.clear();
        self.root = None;
    }

    /// Returns the height of the tree: 0 when empty, 1 for a single node.
    ///
    /// This operation completes in _O(n)_ time.
    pub fn height(&self) -> usize {
        self.measure(false).unwrap_or(0) as usize
    }

    /// Returns `true` if every node's subtrees differ in height by at most one.
    ///
    /// Heights are computed in a single post-order pass, so this completes in _O(n)_ time.
    pub fn is_balanced(&self) -> bool {
        self.measure(true).is_some()
    }

    // Computes the height of every node bottom-up, each exactly once. With `require_balance`, gives
    // up and returns `None` at the first unbalanced node.
    //
    // Iterative so that degenerate chains cannot exhaust the call stack.
    fn measure(&self, require_balance: bool) -> Option<u32> {
        let Some(root) = self.root else {
            return Some(0);
        };

        // Slab keys are always below the arena's capacity.
        let mut heights = vec![0u32; self.nodes.capacity()];
        let mut stack = vec![(root, false)];

        while let Some((id, children_done)) = stack.pop() {
            let node = self.node(id);

            if !children_done {
                stack.push((id, true));
                stack.extend(
                    [node.left(), node.right()]
                        .into_iter()
                        .flatten()
                        .map(|c| (c, false)),
                );
                continue;
            }

            let left = node.left().map_or(0, |c| heights[c.index()]);
            let right = node.right().map_or(0, |c| heights[c.index()]);

            if require_balance && left.abs_diff(right) > 1 {
                return None;
            }

            heights[id.index()] = 1 + left.max(right);
        }

        Some(heights[root.index()])
    }

    /// Returns an iterator over the entries of the tree in ascending key order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(self)
    }

    /// Returns an iterator over the keys of the tree in ascending order.
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys::new(self.iter())
    }

    /// Returns an iterator over the values of the tree in ascending key order.
    pub fn values(&self) -> Values<'_, K, V> {
        Values::new(self.iter())
    }

    /// Returns a cursor pointing at the minimum element.
    pub fn cursor_first(&self) -> Cursor<'_, K, V> {
        Cursor::new(self, self.first_id())
    }

    /// Returns a cursor pointing at the maximum element.
    pub fn cursor_last(&self) -> Cursor<'_, K, V> {
        Cursor::new(self, self.last_id())
    }

    // Support methods ========================================================

    #[inline]
    pub(crate) fn node(&self, id: NodeId) -> &Node<K, V> {
        &self.nodes[id.index()]
    }

    #[inline]
    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node<K, V> {
        &mut self.nodes[id.index()]
    }

    #[inline]
    pub(crate) fn root_id(&self) -> Link {
        self.root
    }

    pub(crate) fn nodes(&self) -> impl Iterator<Item = &Node<K, V>> + '_ {
        self.nodes.iter().map(|(_, node)| node)
    }

    // Returns the node reached by following `dir` links from `from` until there are none.
    pub(crate) fn extreme(&self, from: NodeId, dir: Dir) -> NodeId {
        let mut cur = from;

        while let Some(next) = self.node(cur).child(dir) {
            cur = next;
        }

        cur
    }

    pub(crate) fn first_id(&self) -> Link {
        self.root.map(|root| self.extreme(root, Dir::Left))
    }

    pub(crate) fn last_id(&self) -> Link {
        self.root.map(|root| self.extreme(root, Dir::Right))
    }

    // Returns the in-order neighbor of `node` in direction `dir`: the successor for `Dir::Right`
    // and the predecessor for `Dir::Left`.
    pub(crate) fn step(&self, node: NodeId, dir: Dir) -> Link {
        if let Some(child) = self.node(node).child(dir) {
            return Some(self.extreme(child, !dir));
        }

        // Ascend until we arrive from the opposite side.
        let mut cur = node;
        while let Some(parent) = self.node(cur).parent() {
            if self.node(parent).child(!dir) == Some(cur) {
                return Some(parent);
            }

            cur = parent;
        }

        None
    }

    pub(crate) fn which_child(&self, parent: NodeId, child: NodeId) -> Dir {
        let links = self.node(parent);

        if links.left() == Some(child) {
            Dir::Left
        } else {
            debug_assert_eq!(
                links.right(),
                Some(child),
                "`child` must be a child of `parent`"
            );
            Dir::Right
        }
    }

    // Replaces the link pointing at `old_child`, either in `parent` or at the root, with
    // `new_child`.
    //
    // `new_child`'s parent link is not updated.
    pub(crate) fn replace_child_or_set_root(
        &mut self,
        parent: Link,
        old_child: NodeId,
        new_child: Link,
    ) {
        match parent {
            Some(parent) => {
                let dir = self.which_child(parent, old_child);
                self.node_mut(parent).set_child(dir, new_child);
            }
            None => self.root = new_child,
        }
    }

    // Removes `node`'s entry from the tree and returns it together with the parent of the slot
    // that was structurally unlinked. Heights are not updated.
    //
    // There are three cases:
    //
    // 1. `node` is a leaf. It is detached from its parent.
    // 2. `node` has one child. The child is spliced into `node`'s position.
    // 3. `node` has two children. Its entry is exchanged with its predecessor's, the rightmost
    //    node of its left subtree. The predecessor has no right child, so its slot is then
    //    removed as in case 1 or 2.
    pub(crate) fn remove_node(&mut self, node: NodeId) -> (K, V, Link) {
        let mut removed = node;

        if let (Some(left), Some(_)) = (self.node(node).left(), self.node(node).right()) {
            let predecessor = self.extreme(left, Dir::Right);
            self.swap_payload(node, predecessor);
            removed = predecessor;
        }

        let parent = self.node(removed).parent();
        let child = self.node(removed).left().or(self.node(removed).right());

        self.replace_child_or_set_root(parent, removed, child);
        if let Some(child) = child {
            self.node_mut(child).set_parent(parent);
        }

        let Node { key, value, .. } = self.nodes.remove(removed.index());
        (key, value, parent)
    }

    fn swap_payload(&mut self, a: NodeId, b: NodeId) {
        let (a, b) = self
            .nodes
            .get2_mut(a.index(), b.index())
            .expect("payload swap requires two distinct live nodes");

        mem::swap(&mut a.key, &mut b.key);
        mem::swap(&mut a.value, &mut b.value);
    }
}

impl<K: Ord, V> SearchTree<K, V> {
    pub(crate) fn find_id<Q>(&self, key: &Q) -> Link
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut opt_cur = self.root;

        loop {
            let cur = opt_cur?;
            let node = self.node(cur);

            match key.cmp(node.key.borrow()) {
                Ordering::Less => opt_cur = node.left(),
                Ordering::Equal => return Some(cur),
                Ordering::Greater => opt_cur = node.right(),
            }
        }
    }

    /// Returns a handle to the node holding `key`.
    pub fn find<Q>(&self, key: &Q) -> Option<NodeRef<'_, K, V>>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find_id(key).map(|id| NodeRef::new(self, id))
    }

    /// Returns a reference to the value associated with `key`.
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find_id(key).map(|id| &self.node(id).value)
    }

    /// Returns a mutable reference to the value associated with `key`.
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let id = self.find_id(key)?;
        Some(&mut self.node_mut(id).value)
    }

    /// Returns `true` if the tree contains a value associated with `key`.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find_id(key).is_some()
    }

    /// Inserts `value` under `key`.
    ///
    /// If `key` is already present its value is replaced in place, the stored key is kept, and
    /// the previous value is returned. The shape of the tree does not change in that case.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        self.insert_entry(key, value).1
    }

    // Inserts or updates an entry, returning the node holding `key` and the replaced value, if any.
    // A new node is always attached as a leaf.
    pub(crate) fn insert_entry(&mut self, key: K, value: V) -> (NodeId, Option<V>) {
        let mut opt_parent = None;
        let mut dir = Dir::Left;
        let mut opt_cur = self.root;

        // Descend the tree, looking for a vacant child link.
        while let Some(cur) = opt_cur {
            dir = match key.cmp(&self.node(cur).key) {
                Ordering::Less => Dir::Left,
                Ordering::Greater => Dir::Right,
                Ordering::Equal => {
                    let old = mem::replace(&mut self.node_mut(cur).value, value);
                    return (cur, Some(old));
                }
            };

            opt_parent = Some(cur);
            opt_cur = self.node(cur).child(dir);
        }

        let id = NodeId::new(self.nodes.insert(Node::new(key, value, opt_parent)));

        match opt_parent {
            Some(parent) => {
                self.node_mut(parent).set_child(dir, Some(id));
            }
            None => self.root = Some(id),
        }

        (id, None)
    }

    /// Removes `key` from the tree, returning its value.
    ///
    /// Removing an absent key does nothing and returns `None`.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let node = self.find_id(key)?;
        Some(self.remove_node(node).1)
    }

    /// Checks the structural invariants of the tree.
    ///
    /// Verifies that every child links back to its parent, that the root has no parent, that every
    /// node is reachable from the root, and that keys ascend strictly in order.
    pub fn validate(&self) -> Result<(), TreeError> {
        let Some(root) = self.root else {
            return if self.nodes.is_empty() {
                Ok(())
            } else {
                Err(TreeError::InvariantViolation("empty tree still owns nodes"))
            };
        };

        if self.node(root).parent().is_some() {
            return Err(TreeError::InvariantViolation("root has a parent link"));
        }

        let mut reached = 0;
        let mut stack = vec![root];

        while let Some(id) = stack.pop() {
            reached += 1;
            if reached > self.len() {
                return Err(TreeError::InvariantViolation("child links form a cycle"));
            }

            let node = self.node(id);
            for child in [node.left(), node.right()].into_iter().flatten() {
                let child_node = self
                    .nodes
                    .get(child.index())
                    .ok_or(TreeError::InvariantViolation("dangling child link"))?;

                if child_node.parent() != Some(id) {
                    return Err(TreeError::InvariantViolation(
                        "child does not link back to its parent",
                    ));
                }

                stack.push(child);
            }
        }

        if reached != self.len() {
            return Err(TreeError::InvariantViolation(
                "nodes unreachable from the root",
            ));
        }

        let mut keys = self.keys();
        if let Some(mut prev) = keys.next() {
            for key in keys {
                if key <= prev {
                    return Err(TreeError::InvariantViolation(
                        "in-order keys are not strictly increasing",
                    ));
                }
                prev = key;
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

impl<K, V> Default for SearchTree<K, V> {
    fn default() -> Self {
        SearchTree::new()
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for SearchTree<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut tree = SearchTree::new();
        tree.extend(iter);
        tree
    }
}

impl<K: Ord, V> Extend<(K, V)> for SearchTree<K, V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<'tree, K, V> IntoIterator for &'tree SearchTree<K, V> {
    type Item = (&'tree K, &'tree V);
    type IntoIter = Iter<'tree, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
