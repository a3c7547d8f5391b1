//! Errors raised while reading a draw.io document.

use thiserror::Error;

/// Error returned when a document cannot be read into raw cells.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("malformed XML: {0}")]
    Xml(#[from] roxmltree::Error),

    #[error("missing <{element}> inside <{parent}>")]
    MissingElement {
        element: &'static str,
        parent: String,
    },

    #[error("<{element}> has no `{attribute}` attribute")]
    MissingAttribute {
        element: String,
        attribute: &'static str,
    },

    /// The page payload is deflated and base64-encoded instead of plain XML
    #[error("page `{page}` is stored compressed")]
    CompressedPage { page: String },

    #[error("cell `{cell}` has an invalid number `{value}` in `{attribute}`")]
    InvalidNumber {
        cell: String,
        attribute: String,
        value: String,
    },

    #[error("no page `{page}` in document")]
    PageNotFound { page: String },

    #[error("invalid style string: {message}")]
    Style { message: String },
}
