//! Stroke styling for box outlines and connector lines.
//!
//! Flow diagrams draw every outline as a solid line, so a stroke is fully
//! described by its color and width. The [`apply_stroke!`](crate::apply_stroke)
//! macro applies a definition to any SVG element builder.

use crate::color::Color;

/// Defines the visual properties of a stroke.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeDefinition {
    color: Color,
    width: f32,
}

impl StrokeDefinition {
    /// Creates a new stroke with the given color and width.
    pub fn new(color: Color, width: f32) -> Self {
        Self { color, width }
    }

    /// Gets the stroke color.
    pub fn color(&self) -> Color {
        self.color
    }

    /// Gets the stroke width.
    pub fn width(&self) -> f32 {
        self.width
    }
}

impl Default for StrokeDefinition {
    fn default() -> Self {
        Self {
            color: Color::default(),
            width: 1.0,
        }
    }
}

/// Applies a [`StrokeDefinition`] to an SVG element builder.
///
/// Expands to the element with `stroke` and `stroke-width` attributes set.
///
/// # Example
///
/// ```
/// # use cohortflow_core::apply_stroke;
/// # use cohortflow_core::draw::StrokeDefinition;
/// # use svg::node::element::Rectangle;
/// let stroke = StrokeDefinition::default();
/// let rect = apply_stroke!(Rectangle::new(), stroke);
/// ```
#[macro_export]
macro_rules! apply_stroke {
    ($element:expr, $stroke:expr) => {
        $element
            .set("stroke", $stroke.color().to_string())
            .set("stroke-width", $stroke.width())
    };
}
