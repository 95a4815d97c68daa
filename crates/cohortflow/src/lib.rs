//! Cohortflow - cohort flow diagram rendering for participant pipelines.
//!
//! A cohort flow diagram shows how a participant pool narrows through the
//! steps of a selection pipeline: one box per step stacked top to bottom,
//! arrows between them, and side branches showing how many participants were
//! excluded at each transition and why. This crate renders such diagrams to
//! SVG (and optionally PNG) from a sequence of [`CohortNode`] records.
//!
//! # Examples
//!
//! ```
//! use cohortflow::{CohortNode, RenderOptions, render_cohort_flow};
//!
//! let nodes = [
//!     CohortNode::new(1000).with_heading("Assessed for eligibility"),
//!     CohortNode::new(850).with_exclusion_description("Did not meet criteria"),
//!     CohortNode::new(820).with_exclusion_description("Declined to participate"),
//! ];
//!
//! let options = RenderOptions::new()
//!     .with_style("colorful")
//!     .with_figure_title("Trial enrollment");
//!
//! let rendering = render_cohort_flow(&nodes, options).expect("diagram renders");
//! let svg = rendering.to_svg_string();
//! assert!(svg.contains("Assessed for eligibility"));
//! ```
//!
//! Rendering into an existing SVG group instead of a standalone document is
//! supported through [`RenderOptions::with_drawing_area`]; see
//! [`surface::DrawingArea`].

pub mod error;
pub mod layout;
pub mod node;
pub mod options;
pub mod render;
pub mod style;
pub mod surface;

mod export;

pub use cohortflow_core::{color, draw, geometry, text};

pub use error::FlowError;
pub use node::CohortNode;
pub use options::{ExportFormat, RenderOptions};
pub use render::render_cohort_flow;
pub use style::{StyleConfig, load_style};
pub use surface::{DrawingArea, Rendering, SurfaceTarget};
