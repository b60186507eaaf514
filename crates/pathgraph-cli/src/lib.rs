//! Pathgraph CLI library
//!
//! Loads a diagram document, opens a session on its root pathway and reports
//! the registered names, circular references and integrity findings.

pub mod error_adapter;

mod args;
mod config;
mod document;
mod report;

pub use args::Args;
pub use report::{CircularRef, Report};

use std::fs;

use log::{info, warn};

use pathgraph::PathgraphError;

/// Run the Pathgraph CLI application
///
/// Reads the input document, builds the diagram it describes and writes the
/// report to the output file, or to stdout when no output is given.
///
/// # Errors
///
/// Returns `PathgraphError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Malformed documents and unresolved references
/// - Scene edits the document asks for but the scene rejects
pub fn run(args: &Args) -> Result<(), PathgraphError> {
    info!(
        input_path = args.input,
        output_path:? = args.output;
        "Checking diagram"
    );

    let app_config = config::load_config(args.config.as_ref())?;

    let source = fs::read_to_string(&args.input)?;

    let loaded = document::load(&source, app_config)?;
    let report = Report::new(&loaded.diagram, loaded.root);
    if !report.is_clean() {
        warn!(
            circular = report.circular().len(),
            findings = report.findings().len();
            "Diagram has structural problems"
        );
    }

    match &args.output {
        Some(path) => {
            fs::write(path, report.to_string())?;
            info!(output_file = path; "Report written");
        }
        None => print!("{report}"),
    }

    Ok(())
}
