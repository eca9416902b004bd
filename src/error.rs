use thiserror::Error;

/// Errors reported by tree operations.
///
/// Absent keys on `find`/`remove` are not errors; those operations return `None`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Error)]
pub enum TreeError {
    #[error("key not found")]
    KeyNotFound,

    #[error("rotation pivot has no child on the rising side")]
    MissingPivotChild,

    /// The two trees given to a shape transform do not hold the same keys.
    ///
    /// `expected` and `found` are the element counts of the template and target trees.
    #[error("trees hold different key sets (template has {expected} keys, target has {found})")]
    ShapeMismatch { expected: usize, found: usize },

    /// A structural check failed. This always indicates a bug in the tree itself.
    #[error("tree invariant violated: {0}")]
    InvariantViolation(&'static str),
}
