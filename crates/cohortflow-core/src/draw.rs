//! Drawable definitions for flow diagram elements.
//!
//! Each element of a cohort flow diagram has a definition type describing its
//! visual properties and a render method producing SVG nodes:
//!
//! - [`BoxDefinition`] renders the rounded step and exclusion boxes
//! - [`ConnectorDefinition`] and [`ConnectorDrawer`] render arrows and their
//!   shared marker definitions
//! - [`JunctionDefinition`] renders the dot where an exclusion branch leaves
//!   the main flow
//! - [`TextDefinition`] and [`TextBlock`] render multi-line labels
//!
//! Rendered nodes are collected into a [`LayeredOutput`] which groups them
//! by [`RenderLayer`] so stacking order is independent of draw order.

pub mod connector;
pub mod layer;
pub mod shape;
pub mod stroke;
pub mod text;

pub use connector::{ConnectorDefinition, ConnectorDrawer, HeadStyle, JunctionDefinition};
pub use layer::{LayeredOutput, RenderLayer, SvgNode};
pub use shape::BoxDefinition;
pub use stroke::StrokeDefinition;
pub use text::{FontStyle, FontWeight, TextAnchor, TextBlock, TextDefinition};
