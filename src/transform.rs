use crate::{Dir, Link, NodeId, SearchTree, TreeError};

// A position in a tree that holds a subtree: the `dir` child link of `parent`, or the root link
// when `parent` is `None`.
//
// Rotations inside a subtree never move the link that owns it, so a slot keeps naming the same
// key range while the nodes below it are rearranged.
#[derive(Copy, Clone, Debug)]
struct Slot {
    parent: Link,
    dir: Dir,
}

impl Slot {
    const ROOT: Slot = Slot {
        parent: None,
        dir: Dir::Left,
    };

    fn child_of(parent: NodeId, dir: Dir) -> Slot {
        Slot {
            parent: Some(parent),
            dir,
        }
    }
}

impl<K, V> SearchTree<K, V> {
    fn slot_child(&self, slot: Slot) -> Link {
        match slot.parent {
            Some(parent) => self.node(parent).child(slot.dir),
            None => self.root_id(),
        }
    }

    // Right-rotates every node in the subtree at `slot` until none of them has a left child.
    //
    // Afterwards the subtree is a right-leaning chain (a "vine") headed by its minimum key.
    fn degenerate_to_vine(&mut self, slot: Slot) {
        let mut slot = slot;

        while let Some(mut top) = self.slot_child(slot) {
            while self.node(top).left().is_some() {
                top = self.rotate(top, Dir::Right);
            }

            slot = Slot::child_of(top, Dir::Right);
        }
    }
}

impl<K: Ord, V> SearchTree<K, V> {
    /// Returns `true` if `self` and `other` hold exactly the same keys.
    pub fn same_keys<W>(&self, other: &SearchTree<K, W>) -> bool {
        self.len() == other.len() && self.keys().eq(other.keys())
    }

    /// Reshapes `target` so that it has the same shape as `self`, using only rotations.
    ///
    /// Both trees must hold the same keys. On success, every node in `target` has children with
    /// the same keys as the node with its key in `self`. Values are never moved between keys.
    ///
    /// If the key sets differ, returns [`TreeError::ShapeMismatch`] and leaves `target` untouched.
    ///
    /// Every subtree of `target` is first flattened into a vine, then rotated left from the head
    /// of the vine until the key at the corresponding position in `self` is on top; the two
    /// subtrees of that key are then processed the same way. This takes _O(n)_ rotations per level
    /// of `self`.
    pub fn transform<W>(&self, target: &mut SearchTree<K, W>) -> Result<(), TreeError> {
        if !self.same_keys(target) {
            return Err(TreeError::ShapeMismatch {
                expected: self.len(),
                found: target.len(),
            });
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(len = self.len(), "transforming tree shape");

        let mut work = vec![(self.root_id(), Slot::ROOT)];

        while let Some((template, slot)) = work.pop() {
            let Some(template) = template else {
                debug_assert!(target.slot_child(slot).is_none());
                continue;
            };

            let key = &self.node(template).key;

            target.degenerate_to_vine(slot);

            let mut top = target
                .slot_child(slot)
                .expect("matching key ranges must both be non-empty");

            while target.node(top).key != *key {
                assert!(
                    target.node(top).right().is_some(),
                    "template key is missing from the vine"
                );
                top = target.rotate(top, Dir::Left);
            }

            work.push((self.node(template).left(), Slot::child_of(top, Dir::Left)));
            work.push((self.node(template).right(), Slot::child_of(top, Dir::Right)));
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(height = target.height(), "tree shape transformed");

        Ok(())
    }
}
