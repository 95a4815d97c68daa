//! Error types for cohort flow rendering.
//!
//! This module provides the main error type [`FlowError`] which wraps the
//! error conditions that can occur while validating input data, loading
//! styles, and rendering or exporting a diagram.

use std::io;

use thiserror::Error;

use cohortflow_core::color::ColorError;

/// The main error type for cohort flow operations.
#[derive(Debug, Error)]
pub enum FlowError {
    /// The input slice had no nodes.
    #[error("data must contain at least one cohort node")]
    EmptyInput,

    /// A step reported more patients than the step before it.
    #[error("node {index} has more patients ({count}) than the previous step ({previous_count})")]
    Ordering {
        index: usize,
        count: u64,
        previous_count: u64,
    },

    /// The requested built-in style name does not exist.
    #[error("unknown built-in style `{name}`; available styles: {available:?}")]
    UnknownStyle {
        name: String,
        available: Vec<&'static str>,
    },

    /// A caller-supplied palette does not cover every node.
    #[error("{which} palette has {actual} entries but the diagram has {expected} nodes")]
    PaletteLength {
        which: &'static str,
        expected: usize,
        actual: usize,
    },

    /// A style override file could not be parsed.
    #[error("failed to parse style config `{path}`")]
    StyleParse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    /// A color value could not be parsed or violated the color policy.
    #[error(transparent)]
    Color(#[from] ColorError),

    /// The rendering could not be exported in the requested form.
    #[error("export error: {0}")]
    Export(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}
