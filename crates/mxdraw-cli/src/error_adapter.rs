//! Error adapter for converting MxDrawError to miette diagnostics.
//!
//! This module provides the bridge between the library's error types and
//! miette's report formatting used in the CLI. Each error gets a stable code
//! and, where the fix is known, a help line.

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan};

use mxdraw::{MxDrawError, ParseError, semantic::ResolveError};

/// Adapter rendering an [`MxDrawError`] as a miette diagnostic.
pub struct ErrorAdapter<'a>(pub &'a MxDrawError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match &self.0 {
            MxDrawError::Io(_) => "mxdraw::io",
            MxDrawError::Parse(_) => "mxdraw::parse",
            MxDrawError::Resolve(_) => "mxdraw::resolve",
            MxDrawError::Config(_) => "mxdraw::config",
            MxDrawError::Export(_) => "mxdraw::export",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let help = match &self.0 {
            MxDrawError::Parse(ParseError::CompressedPage { .. }) => {
                "save the diagram uncompressed: in draw.io, uncheck File > Properties > Compressed"
            }
            MxDrawError::Parse(ParseError::PageNotFound { .. }) => {
                "select an existing page with --page, by zero-based index or by name"
            }
            MxDrawError::Parse(ParseError::Xml(_)) => "the input must be a draw.io (.drawio) XML file",
            MxDrawError::Resolve(ResolveError::DanglingReference { .. }) => {
                "the document links to a cell that was deleted; re-save it in draw.io"
            }
            MxDrawError::Config(_) => {
                "configuration files are TOML with [defaults], [layout], [text] and [style] sections"
            }
            _ => return None,
        };
        Some(Box::new(help))
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        None
    }
}

/// Converts an [`MxDrawError`] into a reportable diagnostic.
pub fn to_reportable(err: &MxDrawError) -> ErrorAdapter<'_> {
    ErrorAdapter(err)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_per_variant() {
        let err = MxDrawError::Config("bad".to_string());
        let reportable = to_reportable(&err);
        assert_eq!(reportable.code().unwrap().to_string(), "mxdraw::config");
        assert!(reportable.help().is_some());
        assert_eq!(reportable.to_string(), "Configuration error: bad");
    }

    #[test]
    fn test_page_not_found_help() {
        let err = MxDrawError::Parse(ParseError::PageNotFound {
            page: "#3".to_string(),
        });
        let reportable = to_reportable(&err);
        assert_eq!(reportable.code().unwrap().to_string(), "mxdraw::parse");
        assert!(reportable.help().unwrap().to_string().contains("--page"));
    }

    #[test]
    fn test_io_error_has_no_help() {
        let err = MxDrawError::Io(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        let reportable = to_reportable(&err);
        assert_eq!(reportable.code().unwrap().to_string(), "mxdraw::io");
        assert!(reportable.help().is_none());
    }
}
