use core::iter::FusedIterator;

use crate::{Dir, Link, SearchTree};

/// An iterator over the entries of a tree in ascending key order.
///
/// Each step follows in-order successor links, so a full traversal visits every edge at most
/// twice.
pub struct Iter<'tree, K, V> {
    tree: &'tree SearchTree<K, V>,

    front: Link,
    back: Link,

    len: usize,
}

impl<'tree, K, V> Iter<'tree, K, V> {
    pub(crate) fn new(tree: &'tree SearchTree<K, V>) -> Self {
        Iter {
            tree,

            front: tree.first_id(),
            back: tree.last_id(),
            len: tree.len(),
        }
    }
}

impl<'tree, K, V> Iterator for Iter<'tree, K, V> {
    type Item = (&'tree K, &'tree V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.len == 0 {
            return None;
        }

        let cur = self.front?;
        self.front = self.tree.step(cur, Dir::Right);
        self.len -= 1;

        let node = self.tree.node(cur);
        Some((&node.key, &node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }
}

impl<K, V> DoubleEndedIterator for Iter<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.len == 0 {
            return None;
        }

        let cur = self.back?;
        self.back = self.tree.step(cur, Dir::Left);
        self.len -= 1;

        let node = self.tree.node(cur);
        Some((&node.key, &node.value))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<K, V> FusedIterator for Iter<'_, K, V> {}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Iter { ..*self }
    }
}

/// An iterator over the keys of a tree in ascending order.
pub struct Keys<'tree, K, V> {
    inner: Iter<'tree, K, V>,
}

impl<'tree, K, V> Keys<'tree, K, V> {
    pub(crate) fn new(inner: Iter<'tree, K, V>) -> Self {
        Keys { inner }
    }
}

impl<'tree, K, V> Iterator for Keys<'tree, K, V> {
    type Item = &'tree K;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(key, _)| key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for Keys<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(key, _)| key)
    }
}

impl<K, V> ExactSizeIterator for Keys<'_, K, V> {}

impl<K, V> FusedIterator for Keys<'_, K, V> {}

/// An iterator over the values of a tree in ascending key order.
pub struct Values<'tree, K, V> {
    inner: Iter<'tree, K, V>,
}

impl<'tree, K, V> Values<'tree, K, V> {
    pub(crate) fn new(inner: Iter<'tree, K, V>) -> Self {
        Values { inner }
    }
}

impl<'tree, K, V> Iterator for Values<'tree, K, V> {
    type Item = &'tree V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, value)| value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for Values<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(_, value)| value)
    }
}

impl<K, V> ExactSizeIterator for Values<'_, K, V> {}

impl<K, V> FusedIterator for Values<'_, K, V> {}

#[cfg(test)]
mod tests {
    use crate::{AvlTree, SearchTree};

    #[test]
    fn iterates_in_key_order() {
        let tree: SearchTree<u32, char> = [(5, 'e'), (2, 'b'), (8, 'h'), (1, 'a'), (3, 'c')]
            .into_iter()
            .collect();

        let entries = tree.iter().map(|(&k, &v)| (k, v)).collect::<Vec<_>>();
        assert_eq!(entries, [(1, 'a'), (2, 'b'), (3, 'c'), (5, 'e'), (8, 'h')]);
        assert_eq!(tree.values().copied().collect::<String>(), "abceh");
    }

    #[test]
    fn iterates_backwards() {
        let tree: AvlTree<u32, ()> = (0..20).map(|k| (k, ())).collect();

        let keys = tree.keys().rev().copied().collect::<Vec<_>>();
        assert_eq!(keys, (0..20).rev().collect::<Vec<_>>());
    }

    #[test]
    fn front_and_back_meet_in_the_middle() {
        let tree: AvlTree<u32, ()> = (0..5).map(|k| (k, ())).collect();
        let mut keys = tree.keys();

        assert_eq!(keys.len(), 5);
        assert_eq!(keys.next(), Some(&0));
        assert_eq!(keys.next_back(), Some(&4));
        assert_eq!(keys.next(), Some(&1));
        assert_eq!(keys.next_back(), Some(&3));
        assert_eq!(keys.next(), Some(&2));
        assert_eq!(keys.next(), None);
        assert_eq!(keys.next_back(), None);
    }

    #[test]
    fn traversal_is_restartable() {
        let tree: SearchTree<u32, ()> = [(2, ()), (1, ()), (3, ())].into_iter().collect();

        let first = tree.keys().copied().collect::<Vec<_>>();
        let second = (&tree).into_iter().map(|(&k, _)| k).collect::<Vec<_>>();
        assert_eq!(first, second);
    }

    #[test]
    fn empty_tree_yields_nothing() {
        let tree: SearchTree<u32, ()> = SearchTree::new();

        assert_eq!(tree.iter().next(), None);
        assert_eq!(tree.iter().next_back(), None);
    }
}
