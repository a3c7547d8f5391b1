//! mxdraw CLI library
//!
//! This module contains the core CLI logic for the mxdraw converter.

pub mod error_adapter;

mod args;
mod config;

pub use args::Args;

use std::fs;

use log::info;

use mxdraw::{DiagramBuilder, MxDrawError};

/// Run the mxdraw CLI application
///
/// This function converts the selected page of the input file and writes
/// the resulting SVG to the output file.
///
/// # Errors
///
/// Returns `MxDrawError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Parsing and resolution errors
/// - Rendering errors
pub fn run(args: &Args) -> Result<(), MxDrawError> {
    info!(
        input_path = args.input,
        output_path = args.output,
        page:% = args.page;
        "Processing diagram"
    );

    let app_config = config::load_config(args.config.as_ref())?;

    let source = fs::read_to_string(&args.input)?;

    let builder = DiagramBuilder::new(app_config);
    let diagram = builder.parse(&source, &args.page)?;
    let svg = builder.render_svg(&diagram)?;

    fs::write(&args.output, svg)?;

    info!(output_file = args.output; "SVG exported successfully");

    Ok(())
}
