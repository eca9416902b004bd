//! Ordered key-value trees in three layers: an unbalanced binary search tree, a rotation layer
//! able to reshape one tree into the shape of another, and a height-balanced AVL tree.

// Conventions used in comments:
// - The height of a node `x` is denoted `h(x)`. An empty subtree has height 0 and a leaf has
//   height 1, so `h(x) = 1 + max(h(left(x)), h(right(x)))`.
// - The parent of a node `x` is denoted `p(x)`.
// - A node is balanced if `|h(left(x)) - h(right(x))| <= 1`.
//
// Invariants of every tree in this crate:
// 1. Every key in the left subtree of `x` is less than the key of `x`, and every key in its right
//    subtree is greater.
// 2. `p(c) == x` iff `c` is a child of `x`. The root has no parent.
//
// Additional invariants of `AvlTree`:
// 3. Every node is balanced.
// 4. The stored height of every node equals `h(x)` whenever a public operation returns.
//
// Nodes are stored in an arena and addressed by `NodeId`. Child links own their subtree; the parent
// link is a plain back-reference and is never used to free anything.

use core::ops::Not;

mod avl;
mod bst;
mod cursor;
mod debug;
mod error;
mod iter;
mod node;
mod rotate;
mod transform;

#[cfg(any(test, feature = "model"))]
pub mod model;

#[cfg(test)]
mod tests;

pub use avl::AvlTree;
pub use bst::SearchTree;
pub use cursor::Cursor;
pub use error::TreeError;
pub use iter::{Iter, Keys, Values};
pub use node::NodeRef;

use node::NodeId;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Dir {
    Left = 0,
    Right = 1,
}

impl Not for Dir {
    type Output = Dir;

    fn not(self) -> Self::Output {
        match self {
            Dir::Left => Dir::Right,
            Dir::Right => Dir::Left,
        }
    }
}

type Link = Option<NodeId>;
