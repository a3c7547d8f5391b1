//! # mxdraw parser
//!
//! Reads draw.io documents into the raw cells consumed by
//! [`mxdraw_core::semantic::Diagram::resolve`], and provides the two small
//! languages embedded in them: `key=value;` style strings and the HTML
//! subset used by formatted labels.
//!
//! ```
//! # use mxdraw_parser::{parse_page, PageSelector, ParseError};
//! fn main() -> Result<(), ParseError> {
//!     let source = r#"<mxGraphModel><root>
//!         <mxCell id="0"/>
//!         <mxCell id="1" parent="0"/>
//!         <mxCell id="a" value="A" vertex="1" parent="1">
//!             <mxGeometry x="0" y="0" width="80" height="40" as="geometry"/>
//!         </mxCell>
//!     </root></mxGraphModel>"#;
//!
//!     let page = parse_page(source, &PageSelector::default())?;
//!     assert_eq!(page.cells.len(), 3);
//!     Ok(())
//! }
//! ```

mod error;
mod markup;
mod mxfile;
mod style;

pub use error::ParseError;
pub use markup::{RunToken, TextRun, tokenize_markup, tokenize_plain};
pub use mxfile::{PageSelector, RawPage, parse_document, parse_page};
pub use style::parse_style;
