//! Error types for mxdraw operations.
//!
//! [`MxDrawError`] is returned by the [`DiagramBuilder`](crate::DiagramBuilder)
//! stages. [`LayoutError`] describes a single entity that could not be laid
//! out; those are collected in the layout rather than aborting it.

use std::io;

use thiserror::Error;

use mxdraw_core::{identifier::Id, semantic::ResolveError};
use mxdraw_parser::ParseError;

/// The main error type for mxdraw operations.
#[derive(Debug, Error)]
pub enum MxDrawError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Export error: {0}")]
    Export(#[from] crate::export::Error),
}

/// Which end of a connector an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectorEnd {
    Source,
    Target,
}

impl std::fmt::Display for ConnectorEnd {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Source => f.write_str("source"),
            Self::Target => f.write_str("target"),
        }
    }
}

/// A failure confined to one entity.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    #[error("connector `{connector}` has no resolvable {end} point")]
    UnresolvedEndpoint { connector: Id, end: ConnectorEnd },

    #[error("text of `{entity}` has an invalid alignment: {message}")]
    InvalidAlignment { entity: Id, message: String },

    #[error("node `{node}` uses shape `{shape}` which has no outline")]
    UnsupportedShape { node: Id, shape: String },

    /// A style value of the entity could not be interpreted
    #[error(transparent)]
    InvalidStyle(ResolveError),

    /// A relative label whose connector has no routed path
    #[error("label `{label}` is attached to connector `{connector}` which was not routed")]
    UnroutedConnector { label: Id, connector: Id },
}

impl LayoutError {
    /// The entity the failure belongs to
    pub fn entity(&self) -> Id {
        match self {
            Self::UnresolvedEndpoint { connector, .. } => *connector,
            Self::InvalidAlignment { entity, .. } => *entity,
            Self::UnsupportedShape { node, .. } => *node,
            Self::UnroutedConnector { label, .. } => *label,
            Self::InvalidStyle(err) => err.cell(),
        }
    }
}
