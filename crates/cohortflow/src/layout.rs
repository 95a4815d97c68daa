//! Vertical layout of the diagram's boxes.
//!
//! The main column is centered on `x = 0` with boxes stacked top to bottom;
//! the exclusion column sits to its right. Gaps between consecutive steps
//! widen as needed so each exclusion box fits in its transition with
//! clearance above and below. All coordinates are in layout units with `y`
//! growing downward.

use cohortflow_core::geometry::{Bounds, Insets, Point, Size};

use crate::{node::ProcessedNode, style::StyleConfig};

/// Placement of every box in a diagram, in layout units.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    main_boxes: Vec<Bounds>,
    exclusion_boxes: Vec<Option<Bounds>>,
    gaps: Vec<f32>,
    total_height: f32,
    exclusion_x: f32,
    content: Bounds,
}

impl Layout {
    /// Returns the step box bounds, one per node.
    pub fn main_boxes(&self) -> &[Bounds] {
        &self.main_boxes
    }

    /// Returns the exclusion box bounds, one slot per node.
    ///
    /// The first slot is always `None`; later slots are `None` for steps
    /// without an exclusion branch.
    pub fn exclusion_boxes(&self) -> &[Option<Bounds>] {
        &self.exclusion_boxes
    }

    /// Returns the gap below each step except the last.
    pub fn gaps(&self) -> &[f32] {
        &self.gaps
    }

    /// Returns the full content height including top and bottom margins.
    pub fn total_height(&self) -> f32 {
        self.total_height
    }

    /// Returns the x coordinate of the exclusion column's center line.
    pub fn exclusion_x(&self) -> f32 {
        self.exclusion_x
    }

    /// Returns the bounds enclosing both columns plus horizontal padding.
    pub fn content(&self) -> Bounds {
        self.content
    }
}

/// Positions every box of the processed sequence.
///
/// Pure function of its inputs; callers pass at least one node.
pub fn compute_layout(processed: &[ProcessedNode], style: &StyleConfig) -> Layout {
    let layout = style.layout();
    let geometry = style.box_geometry();

    // Each transition gap starts at the base gap and widens to hold its
    // exclusion box plus clearance on both sides.
    let mut gaps = Vec::new();
    for node in processed.iter().skip(1) {
        let required = if node.has_exclusion() {
            node.exclusion_height() + 2.0 * geometry.clearance()
        } else {
            0.0
        };
        gaps.push(f32::max(layout.base_gap(), required));
    }

    let mut main_boxes = Vec::with_capacity(processed.len());
    let mut cursor = layout.top_margin();
    for (index, node) in processed.iter().enumerate() {
        if index > 0 {
            cursor += gaps[index - 1];
        }
        let center = Point::new(0.0, cursor + node.main_height() / 2.0);
        let size = Size::new(layout.main_box_width(), node.main_height());
        main_boxes.push(Bounds::new_from_center(center, size));
        cursor += node.main_height();
    }
    let total_height = cursor + layout.bottom_margin();

    let exclusion_x = layout.main_box_width() / 2.0
        + layout.side_gap()
        + layout.exclusion_box_width() / 2.0;

    // An exclusion box sits at the vertical midpoint of its transition.
    let mut exclusion_boxes = Vec::with_capacity(processed.len());
    for (index, node) in processed.iter().enumerate() {
        if index == 0 || !node.has_exclusion() {
            exclusion_boxes.push(None);
            continue;
        }
        let mid_y = (main_boxes[index - 1].max_y() + main_boxes[index].min_y()) / 2.0;
        let size = Size::new(layout.exclusion_box_width(), node.exclusion_height());
        exclusion_boxes.push(Some(Bounds::new_from_center(
            Point::new(exclusion_x, mid_y),
            size,
        )));
    }

    let main_column = Bounds::new_from_top_left(
        Point::new(-layout.main_box_width() / 2.0, 0.0),
        Size::new(layout.main_box_width(), total_height),
    );
    let exclusion_column = Bounds::new_from_top_left(
        Point::new(exclusion_x - layout.exclusion_box_width() / 2.0, 0.0),
        Size::new(layout.exclusion_box_width(), total_height),
    );
    let content = main_column
        .merge(&exclusion_column)
        .add_padding(Insets::new(0.0, layout.x_padding(), 0.0, layout.x_padding()));

    Layout {
        main_boxes,
        exclusion_boxes,
        gaps,
        total_height,
        exclusion_x,
        content,
    }
}
