//! Connector arrows, arrowhead markers, and branch junction dots.
//!
//! Two kinds of connectors appear in a flow diagram: the vertical arrows
//! carrying the cohort from one step to the next, and the horizontal arrows
//! branching off to exclusion boxes. They differ only in arrowhead shape,
//! described by [`HeadStyle`].
//!
//! Arrowheads are SVG `<marker>` elements shared by every connector using
//! the same head style. [`ConnectorDrawer`] tracks which styles were actually
//! drawn so the final document only defines the markers it references.

use std::collections::HashMap;

use svg::node::element as svg_element;

use crate::{
    apply_stroke,
    color::Color,
    draw::{StrokeDefinition, SvgNode},
    geometry::Point,
};

/// Arrowhead shapes for flow connectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeadStyle {
    /// A V-shaped head of two strokes, used on the main flow arrows.
    Open,
    /// A solid triangular head, used on exclusion branch arrows.
    Filled,
}

impl HeadStyle {
    /// Returns the SVG marker element id for this head style.
    pub fn marker_id(self) -> &'static str {
        match self {
            Self::Open => "arrowhead-open",
            Self::Filled => "arrowhead-filled",
        }
    }

    fn marker_ref(self) -> String {
        format!("url(#{})", self.marker_id())
    }
}

/// Defines the visual properties of a connector arrow.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConnectorDefinition {
    stroke: StrokeDefinition,
    head: HeadStyle,
    head_size: f32,
}

impl ConnectorDefinition {
    /// Creates a new connector definition.
    ///
    /// `head_size` is the rendered arrowhead length in user units.
    pub fn new(stroke: StrokeDefinition, head: HeadStyle, head_size: f32) -> Self {
        Self {
            stroke,
            head,
            head_size,
        }
    }

    /// Gets the line stroke.
    pub fn stroke(&self) -> &StrokeDefinition {
        &self.stroke
    }

    /// Gets the arrowhead style.
    pub fn head(&self) -> HeadStyle {
        self.head
    }

    /// Gets the arrowhead length in user units.
    pub fn head_size(&self) -> f32 {
        self.head_size
    }
}

/// Draws connectors and collects the arrowhead markers they reference.
///
/// Markers are emitted once per [`HeadStyle`] by
/// [`marker_definitions`](ConnectorDrawer::marker_definitions), which should
/// be added to the document after all connectors have been drawn.
#[derive(Debug, Default)]
pub struct ConnectorDrawer {
    markers: HashMap<&'static str, (HeadStyle, Color, f32)>,
}

impl ConnectorDrawer {
    /// Creates a new drawer with no registered markers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Draws a straight connector from `source` to `destination`.
    ///
    /// The arrowhead sits at the destination end. The marker it references
    /// is registered on this drawer for later emission.
    pub fn draw(
        &mut self,
        definition: &ConnectorDefinition,
        source: Point,
        destination: Point,
    ) -> SvgNode {
        self.markers.insert(
            definition.head().marker_id(),
            (
                definition.head(),
                definition.stroke().color(),
                definition.head_size(),
            ),
        );

        let data = svg_element::path::Data::new()
            .move_to((source.x(), source.y()))
            .line_to((destination.x(), destination.y()));

        let path = svg_element::Path::new()
            .set("d", data)
            .set("fill", "none")
            .set("marker-end", definition.head().marker_ref());

        Box::new(apply_stroke!(path, definition.stroke()))
    }

    /// Builds the `<defs>` element containing every referenced marker.
    pub fn marker_definitions(&self) -> SvgNode {
        let mut defs = svg_element::Definitions::new();
        for (head, color, size) in self.markers.values() {
            defs = defs.add(create_marker(*head, *color, *size));
        }
        Box::new(defs)
    }

    /// Returns `true` if no connectors have been drawn yet.
    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }
}

fn create_marker(head: HeadStyle, color: Color, size: f32) -> svg_element::Marker {
    let marker = svg_element::Marker::new()
        .set("id", head.marker_id())
        .set("viewBox", "0 0 10 10")
        .set("refX", 9)
        .set("refY", 5)
        .set("markerUnits", "userSpaceOnUse")
        .set("markerWidth", size)
        .set("markerHeight", size)
        .set("orient", "auto");

    match head {
        HeadStyle::Filled => marker.add(
            svg_element::Path::new()
                .set("d", "M 0 0 L 10 5 L 0 10 z")
                .set("fill", color.to_string()),
        ),
        HeadStyle::Open => marker.add(
            svg_element::Path::new()
                .set("d", "M 1 1 L 9 5 L 1 9")
                .set("fill", "none")
                .set("stroke", color.to_string())
                .set("stroke-width", 1.2),
        ),
    }
}

/// Defines the dot drawn where an exclusion branch leaves the main flow.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JunctionDefinition {
    radius: f32,
    color: Color,
}

impl JunctionDefinition {
    /// Creates a new junction dot definition with the given radius in user
    /// units.
    pub fn new(radius: f32, color: Color) -> Self {
        Self { radius, color }
    }

    /// Gets the dot radius in user units.
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Gets the dot fill color.
    pub fn color(&self) -> Color {
        self.color
    }

    /// Renders this junction dot at the given center point.
    pub fn render_at(&self, center: Point) -> SvgNode {
        Box::new(
            svg_element::Circle::new()
                .set("cx", center.x())
                .set("cy", center.y())
                .set("r", self.radius)
                .set("fill", &self.color),
        )
    }
}
