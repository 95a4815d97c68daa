//! CLI logic for the cohortflow diagram tool.
//!
//! This module contains the core CLI logic: reading a TOML diagram
//! document, merging its settings with command-line flags, and rendering
//! the diagram to files through the [`cohortflow`] library.

mod args;
mod input;

pub use args::Args;
pub use input::FlowDocument;

use std::{fs, io, path::Path};

use log::info;
use thiserror::Error;

use cohortflow::{ExportFormat, FlowError, RenderOptions, render_cohort_flow};

/// Errors surfaced by the cohortflow CLI
#[derive(Debug, Error)]
pub enum CliError {
    /// The input document could not be read.
    #[error("failed to read input `{path}`")]
    Input {
        path: String,
        #[source]
        source: io::Error,
    },
    /// The input document is not valid TOML.
    #[error("failed to parse input `{path}`")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    /// Rendering or exporting the diagram failed.
    #[error(transparent)]
    Flow(#[from] FlowError),
}

/// Run the cohortflow CLI application
///
/// Reads the input document, applies command-line overrides for title,
/// style, and background, and renders the diagram into the output
/// directory in every requested format.
///
/// # Errors
///
/// Returns `CliError` for:
/// - File I/O errors
/// - Input document parse errors
/// - Rendering and export errors
pub fn run(args: &Args) -> Result<(), CliError> {
    info!(
        input_path = args.input,
        output_dir = args.output_dir;
        "Processing diagram"
    );

    let source = fs::read_to_string(&args.input).map_err(|source| CliError::Input {
        path: args.input.clone(),
        source,
    })?;
    let document = FlowDocument::parse(&source).map_err(|source| CliError::Parse {
        path: args.input.clone(),
        source,
    })?;

    let formats = args
        .formats
        .iter()
        .map(|format| format.parse())
        .collect::<Result<Vec<ExportFormat>, FlowError>>()?;

    let base_name = match &args.name {
        Some(name) => name.clone(),
        None => input_stem(&args.input),
    };

    // Command-line settings win over their document counterparts.
    let style = args
        .style
        .as_deref()
        .or(document.style())
        .unwrap_or("white");
    let mut options = RenderOptions::new()
        .with_style(style)
        .with_transparent(args.transparent || document.transparent())
        .with_image_base_name(base_name)
        .with_save_dir(&args.output_dir)
        .with_export_formats(formats);

    if let Some(title) = args.title.as_deref().or(document.title()) {
        options = options.with_figure_title(title);
    }
    if let Some(path) = &args.style_config {
        options = options.with_style_config(path);
    }
    if let Some(dpi) = args.dpi {
        options = options.with_dpi(dpi);
    }

    render_cohort_flow(document.nodes(), options)?;

    info!(output_dir = args.output_dir; "Diagram exported successfully");

    Ok(())
}

/// Derives the default output base name from the input path.
fn input_stem(input: &str) -> String {
    Path::new(input)
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "cohortflow".to_string())
}
