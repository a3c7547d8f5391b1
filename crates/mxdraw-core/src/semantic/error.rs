use thiserror::Error;

use crate::identifier::Id;

/// Errors raised while resolving raw cells.
///
/// Broken references abort the whole diagram. An invalid style value only
/// concerns its own cell and is kept on the [`Diagram`](crate::semantic::Diagram).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ResolveError {
    /// A parent, source, target or label link names a cell that does not exist.
    #[error("cell `{cell}` references `{reference}`, which does not exist")]
    DanglingReference { cell: Id, reference: Id },

    /// A style value could not be interpreted.
    #[error("cell `{cell}` has an invalid `{key}` value: {message}")]
    InvalidStyleValue {
        cell: Id,
        key: String,
        message: String,
    },

    /// Following parent links from a cell leads back to the cell itself.
    #[error("cell `{cell}` is its own ancestor")]
    CyclicParent { cell: Id },
}

impl ResolveError {
    /// The cell the error was raised for
    pub fn cell(&self) -> Id {
        match self {
            Self::DanglingReference { cell, .. }
            | Self::InvalidStyleValue { cell, .. }
            | Self::CyclicParent { cell } => *cell,
        }
    }
}
