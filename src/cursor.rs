use crate::{Dir, Link, SearchTree};

/// A cursor over a [`SearchTree`] or [`AvlTree`](crate::AvlTree).
///
/// A cursor points either to an element of the tree or to a "ghost" non-element that connects the
/// last element to the first.
pub struct Cursor<'tree, K, V> {
    tree: &'tree SearchTree<K, V>,
    ptr: Link,
}

impl<'tree, K, V> Cursor<'tree, K, V> {
    pub(crate) fn new(tree: &'tree SearchTree<K, V>, ptr: Link) -> Cursor<'tree, K, V> {
        Cursor { tree, ptr }
    }

    /// Moves the cursor to the next element of the tree.
    ///
    /// If the cursor is pointing to the "ghost" non-element, this method moves it to the first
    /// element. If it is pointing to the last element, this method moves it to the "ghost"
    /// non-element.
    pub fn move_next(&mut self) {
        self.ptr = self.neighbor(Dir::Right);
    }

    /// Moves the cursor to the previous element of the tree.
    ///
    /// If the cursor is pointing to the "ghost" non-element, this method moves it to the last
    /// element. If it is pointing to the first element, this method moves it to the "ghost"
    /// non-element.
    pub fn move_prev(&mut self) {
        self.ptr = self.neighbor(Dir::Left);
    }

    /// Returns the entry pointed to by the cursor.
    ///
    /// This returns `None` if the cursor is currently pointing to the "ghost" non-element.
    pub fn get(&self) -> Option<(&'tree K, &'tree V)> {
        self.entry(self.ptr)
    }

    /// Returns the next entry.
    ///
    /// If the cursor is pointing to the "ghost" non-element, this method returns the first entry.
    /// If it is pointing to the last element, this method returns `None`.
    pub fn peek_next(&self) -> Option<(&'tree K, &'tree V)> {
        self.entry(self.neighbor(Dir::Right))
    }

    /// Returns the previous entry.
    ///
    /// If the cursor is pointing to the "ghost" non-element, this method returns the last entry.
    /// If it is pointing to the first element, this method returns `None`.
    pub fn peek_prev(&self) -> Option<(&'tree K, &'tree V)> {
        self.entry(self.neighbor(Dir::Left))
    }

    fn neighbor(&self, dir: Dir) -> Link {
        match self.ptr {
            Some(p) => self.tree.step(p, dir),
            None => match dir {
                Dir::Left => self.tree.last_id(),
                Dir::Right => self.tree.first_id(),
            },
        }
    }

    fn entry(&self, link: Link) -> Option<(&'tree K, &'tree V)> {
        let tree = self.tree;
        link.map(|id| {
            let node = tree.node(id);
            (&node.key, &node.value)
        })
    }
}

impl<K, V> Clone for Cursor<'_, K, V> {
    fn clone(&self) -> Self {
        Cursor { ..*self }
    }
}

#[cfg(test)]
mod tests {
    use crate::{AvlTree, SearchTree};

    fn key<V>(entry: Option<(&u32, V)>) -> Option<u32> {
        entry.map(|(k, _)| *k)
    }

    #[test]
    fn walks_forward_through_ghost() {
        let tree: AvlTree<u32, ()> = (1..=3).map(|k| (k, ())).collect();
        let mut cursor = tree.cursor_first();

        assert_eq!(key(cursor.get()), Some(1));
        assert_eq!(key(cursor.peek_prev()), None);
        cursor.move_next();
        cursor.move_next();
        assert_eq!(key(cursor.get()), Some(3));
        assert_eq!(key(cursor.peek_next()), None);

        cursor.move_next();
        assert_eq!(key(cursor.get()), None);
        assert_eq!(key(cursor.peek_next()), Some(1));
        assert_eq!(key(cursor.peek_prev()), Some(3));

        cursor.move_next();
        assert_eq!(key(cursor.get()), Some(1));
    }

    #[test]
    fn walks_backward_through_ghost() {
        let tree: SearchTree<u32, &str> = [(2, "b"), (1, "a"), (3, "c")].into_iter().collect();
        let mut cursor = tree.cursor_last();

        assert_eq!(cursor.get(), Some((&3, &"c")));
        cursor.move_prev();
        assert_eq!(cursor.get(), Some((&2, &"b")));
        cursor.move_prev();
        cursor.move_prev();
        assert_eq!(cursor.get(), None);
        cursor.move_prev();
        assert_eq!(cursor.get(), Some((&3, &"c")));
    }

    #[test]
    fn empty_tree_cursor_stays_on_ghost() {
        let tree: SearchTree<u32, ()> = SearchTree::new();
        let mut cursor = tree.cursor_first();

        assert!(cursor.get().is_none());
        cursor.move_next();
        assert!(cursor.get().is_none());
        cursor.move_prev();
        assert!(cursor.peek_next().is_none());
        assert!(cursor.peek_prev().is_none());
    }

    #[test]
    fn cursor_matches_iteration_order() {
        let tree: AvlTree<u32, ()> = [50, 20, 80, 10, 30, 70, 90, 25, 35]
            .into_iter()
            .map(|k| (k, ()))
            .collect();

        let mut cursor = tree.cursor_first();
        let mut seen = Vec::new();
        while let Some((k, _)) = cursor.get() {
            seen.push(*k);
            cursor.move_next();
        }

        assert_eq!(seen, tree.keys().copied().collect::<Vec<_>>());
    }
}
