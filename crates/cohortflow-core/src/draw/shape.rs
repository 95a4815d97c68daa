//! Rounded box rendering for cohort steps and exclusions.

use svg::node::element as svg_element;

use crate::{
    apply_stroke,
    color::Color,
    draw::{StrokeDefinition, SvgNode},
    geometry::Bounds,
};

/// Defines the visual properties of a step or exclusion box.
///
/// Boxes are rounded rectangles with a fill color from the diagram palette
/// and a solid outline.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxDefinition {
    fill: Color,
    stroke: StrokeDefinition,
    corner_radius: f32,
}

impl BoxDefinition {
    /// Creates a new box definition.
    pub fn new(fill: Color, stroke: StrokeDefinition, corner_radius: f32) -> Self {
        Self {
            fill,
            stroke,
            corner_radius,
        }
    }

    /// Gets the fill color.
    pub fn fill(&self) -> Color {
        self.fill
    }

    /// Gets the outline stroke.
    pub fn stroke(&self) -> &StrokeDefinition {
        &self.stroke
    }

    /// Gets the corner rounding radius.
    pub fn corner_radius(&self) -> f32 {
        self.corner_radius
    }

    /// Renders this box over the given bounds as an SVG node.
    pub fn render_at(&self, bounds: Bounds) -> SvgNode {
        let rect = svg_element::Rectangle::new()
            .set("x", bounds.min_x())
            .set("y", bounds.min_y())
            .set("width", bounds.width())
            .set("height", bounds.height())
            .set("rx", self.corner_radius)
            .set("fill", &self.fill);

        Box::new(apply_stroke!(rect, self.stroke))
    }
}
