use core::{fmt, mem};

use crate::{Dir, Link, SearchTree};

/// Stable handle of a node slot in a tree's arena.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) struct NodeId(usize);

impl NodeId {
    #[inline]
    pub(crate) fn new(index: usize) -> NodeId {
        NodeId(index)
    }

    #[inline]
    pub(crate) fn index(self) -> usize {
        self.0
    }
}

pub(crate) struct Node<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    parent: Link,
    children: [Link; 2],
    // Only maintained by `AvlTree`. Leaves are height 1; empty subtrees count as 0.
    pub(crate) height: u32,
}

impl<K, V> Node<K, V> {
    pub(crate) fn new(key: K, value: V, parent: Link) -> Self {
        Node {
            key,
            value,
            parent,
            children: [None; 2],
            height: 1,
        }
    }

    #[inline]
    pub(crate) fn is_leaf(&self) -> bool {
        self.left().is_none() && self.right().is_none()
    }

    #[inline]
    pub(crate) fn parent(&self) -> Link {
        self.parent
    }

    #[inline]
    pub(crate) fn child(&self, dir: Dir) -> Link {
        self.children[dir as usize]
    }

    #[inline]
    pub(crate) fn left(&self) -> Link {
        self.child(Dir::Left)
    }

    #[inline]
    pub(crate) fn right(&self) -> Link {
        self.child(Dir::Right)
    }

    #[inline]
    pub(crate) fn set_parent(&mut self, parent: Link) -> Link {
        mem::replace(&mut self.parent, parent)
    }

    #[inline]
    pub(crate) fn set_child(&mut self, dir: Dir, child: Link) -> Link {
        mem::replace(&mut self.children[dir as usize], child)
    }
}

/// A read-only handle to a node of a tree, as returned by `find` and `root`.
///
/// The handle borrows the tree, so the shape it observes cannot change while it is alive.
pub struct NodeRef<'tree, K, V> {
    tree: &'tree SearchTree<K, V>,
    id: NodeId,
}

impl<'tree, K, V> NodeRef<'tree, K, V> {
    pub(crate) fn new(tree: &'tree SearchTree<K, V>, id: NodeId) -> Self {
        NodeRef { tree, id }
    }

    fn node(&self) -> &'tree Node<K, V> {
        self.tree.node(self.id)
    }

    fn hop(&self, link: Link) -> Option<NodeRef<'tree, K, V>> {
        link.map(|id| NodeRef::new(self.tree, id))
    }

    pub fn key(&self) -> &'tree K {
        &self.node().key
    }

    pub fn value(&self) -> &'tree V {
        &self.node().value
    }

    /// Returns the key and value stored in this node.
    pub fn key_value(&self) -> (&'tree K, &'tree V) {
        let node = self.node();
        (&node.key, &node.value)
    }

    /// Returns the parent node, or `None` for the root.
    pub fn parent(&self) -> Option<NodeRef<'tree, K, V>> {
        self.hop(self.node().parent())
    }

    pub fn left(&self) -> Option<NodeRef<'tree, K, V>> {
        self.hop(self.node().left())
    }

    pub fn right(&self) -> Option<NodeRef<'tree, K, V>> {
        self.hop(self.node().right())
    }

    /// Returns `true` if this node has no children.
    pub fn is_leaf(&self) -> bool {
        self.node().is_leaf()
    }
}

impl<K, V> Clone for NodeRef<'_, K, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K, V> Copy for NodeRef<'_, K, V> {}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for NodeRef<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("key", self.key())
            .field("value", self.value())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_node_is_detached_leaf() {
        let node = Node::new(7u32, "seven", None);

        assert!(node.is_leaf());
        assert_eq!(node.parent(), None);
        assert_eq!(node.height, 1);
    }

    #[test]
    fn set_child_returns_previous_link() {
        let mut node = Node::new(1u32, (), None);

        assert_eq!(node.set_child(Dir::Left, Some(NodeId::new(3))), None);
        assert_eq!(node.left(), Some(NodeId::new(3)));
        assert_eq!(node.set_child(Dir::Left, None), Some(NodeId::new(3)));
        assert!(node.is_leaf());
    }
}
