//! cohortflow Core Types and Definitions
//!
//! This crate provides the foundational types for rendering cohort flow
//! diagrams. It includes:
//!
//! - **Colors**: Color handling with CSS color support, gradient palettes,
//!   and override resolution ([`color`] module)
//! - **Geometry**: Basic geometric types ([`geometry`] module)
//! - **Draw**: Visual definitions for diagram elements ([`draw`] module)
//! - **Text**: Character-based line wrapping for labels ([`text`] module)

pub mod color;
pub mod draw;
pub mod geometry;
pub mod text;
