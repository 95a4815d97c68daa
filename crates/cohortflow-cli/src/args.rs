//! Command-line argument definitions for the cohortflow CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments control the input document, output location and
//! formats, style selection, and logging verbosity. Settings given on the
//! command line take precedence over the same settings in the document.

use clap::Parser;

/// Command-line arguments for the cohort flow diagram tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the input TOML document describing the cohort sequence
    #[arg(help = "Path to the input file")]
    pub input: String,

    /// Directory the rendered files are written to
    #[arg(short, long, default_value = ".")]
    pub output_dir: String,

    /// Base name for output files (defaults to the input file stem)
    #[arg(short, long)]
    pub name: Option<String>,

    /// Output format, repeatable (svg, png)
    #[arg(short, long = "format", default_value = "svg")]
    pub formats: Vec<String>,

    /// Built-in style name (defaults to the document's style, then white)
    #[arg(short, long)]
    pub style: Option<String>,

    /// Path to a TOML file overriding individual style keys
    #[arg(long)]
    pub style_config: Option<String>,

    /// Title drawn above the diagram
    #[arg(short, long)]
    pub title: Option<String>,

    /// Leave the canvas background transparent
    #[arg(long)]
    pub transparent: bool,

    /// Resolution in pixels per layout unit
    #[arg(long)]
    pub dpi: Option<f32>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}
