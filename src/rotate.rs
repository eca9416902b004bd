use core::borrow::Borrow;

use crate::{Dir, NodeId, SearchTree, TreeError};

impl<K, V> SearchTree<K, V> {
    // Performs a rotation towards `dir` at `pivot`.
    //
    // - `up`, the `!dir` child of `pivot`, takes `pivot`'s place under its parent (or as root).
    // - `pivot` becomes the `dir` child of `up`.
    // - `across`, formerly the `dir` child of `up`, becomes the `!dir` child of `pivot`.
    //
    // At most three parent links change. The in-order sequence is preserved. Heights are not
    // updated. Returns `up`, the new root of the subtree.
    pub(crate) fn rotate(&mut self, pivot: NodeId, dir: Dir) -> NodeId {
        let up = self
            .node(pivot)
            .child(!dir)
            .expect("rotation pivot must have a child on the rising side");
        let across = self.node(up).child(dir);
        let parent = self.node(pivot).parent();

        #[cfg(feature = "tracing")]
        tracing::trace!(pivot = pivot.index(), up = up.index(), ?dir, "rotate");

        self.node_mut(pivot).set_child(!dir, across);
        if let Some(across) = across {
            self.node_mut(across).set_parent(Some(pivot));
        }

        self.replace_child_or_set_root(parent, pivot, Some(up));
        self.node_mut(up).set_parent(parent);

        self.node_mut(up).set_child(dir, Some(pivot));
        self.node_mut(pivot).set_parent(Some(up));

        up
    }
}

impl<K: Ord, V> SearchTree<K, V> {
    /// Rotates left at the node holding `key`.
    ///
    /// The node's right child takes its place, and the node becomes that child's left child. The
    /// ascending key order is unchanged.
    ///
    /// Returns [`TreeError::KeyNotFound`] if `key` is absent and [`TreeError::MissingPivotChild`]
    /// if the node has no right child.
    pub fn rotate_left<Q>(&mut self, key: &Q) -> Result<(), TreeError>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.rotate_by_key(key, Dir::Left)
    }

    /// Rotates right at the node holding `key`.
    ///
    /// Mirror image of [`SearchTree::rotate_left`]; requires a left child.
    pub fn rotate_right<Q>(&mut self, key: &Q) -> Result<(), TreeError>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.rotate_by_key(key, Dir::Right)
    }

    fn rotate_by_key<Q>(&mut self, key: &Q, dir: Dir) -> Result<(), TreeError>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let pivot = self.find_id(key).ok_or(TreeError::KeyNotFound)?;

        if self.node(pivot).child(!dir).is_none() {
            return Err(TreeError::MissingPivotChild);
        }

        self.rotate(pivot, dir);
        Ok(())
    }
}
