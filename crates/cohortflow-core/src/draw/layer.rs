//! Layer-based rendering system for SVG output.
//!
//! This module provides a type-safe layer system that allows drawable
//! components to specify which z-order layer their SVG elements should be
//! rendered to.
//!
//! # Overview
//!
//! The layer system consists of:
//! - [`RenderLayer`]: An enum defining available rendering layers in order
//! - [`LayeredOutput`]: A structure for collecting SVG nodes by layer
//!
//! Stacking in a flow diagram matters: arrows must run underneath boxes so a
//! connector can start at one box center and end at another without crossing
//! their fills, the branch junction dot must cover the joint where an
//! exclusion arrow leaves the main flow, and labels always stay readable on
//! top.
//!
//! # Example
//!
//! ```
//! # use cohortflow_core::draw::{RenderLayer, LayeredOutput};
//! # use svg::node::element::Rectangle;
//!
//! let mut output = LayeredOutput::new();
//!
//! // Draw order does not matter; layer membership does.
//! let label = svg::node::element::Text::new("Step 1");
//! output.add_to_layer(RenderLayer::Text, Box::new(label));
//!
//! let step_box = Rectangle::new().set("fill", "#88ccff");
//! output.add_to_layer(RenderLayer::Box, Box::new(step_box));
//!
//! // Boxes come out before text even though the text was added first.
//! let svg_nodes = output.render();
//! assert_eq!(svg_nodes.len(), 2);
//! ```

use svg::node::element as svg_element;

/// Type alias for boxed SVG nodes.
pub type SvgNode = Box<dyn svg::Node>;

/// Defines the rendering layers for SVG output.
///
/// Layers are rendered from bottom to top in the order defined by variant
/// declaration. The `Ord` derive uses declaration order, so the first variant
/// renders first (bottom), and the last variant renders last (top).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RenderLayer {
    /// Flow and exclusion arrows - render first, underneath the boxes
    Connector,
    /// Step and exclusion boxes
    Box,
    /// Branch junction dots, covering the joint where a branch arrow
    /// leaves the flow line
    Junction,
    /// Headings, body text, and the figure title - render last, on top
    Text,
}

impl RenderLayer {
    /// Returns a human-readable name for this layer.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Connector => "connector",
            Self::Box => "box",
            Self::Junction => "junction",
            Self::Text => "text",
        }
    }
}

/// Represents SVG nodes grouped by rendering layer.
///
/// This struct collects SVG nodes and organizes them by layer. When rendered,
/// nodes are emitted in layer order (bottom to top), ensuring correct
/// z-ordering regardless of the order elements were drawn in.
#[derive(Debug, Default)]
pub struct LayeredOutput {
    items: Vec<(RenderLayer, SvgNode)>,
}

impl LayeredOutput {
    /// Creates a new empty `LayeredOutput`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a single node to the specified layer.
    ///
    /// Nodes are appended to the layer in the order they are added, so two
    /// nodes on the same layer keep their relative draw order.
    pub fn add_to_layer(&mut self, layer: RenderLayer, node: SvgNode) {
        self.items.push((layer, node));
    }

    /// Merges all layers from another `LayeredOutput` into this one.
    ///
    /// Nodes from the other output are appended to existing layers in this
    /// output. This is useful for combining the output of each diagram step.
    pub fn merge(&mut self, other: LayeredOutput) {
        self.items.extend(other.items);
    }

    /// Returns `true` if there are no nodes in any layer.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Renders all layers to SVG groups, consuming the output.
    ///
    /// Each non-empty layer becomes an SVG `<g>` element with a `data-layer`
    /// attribute identifying the layer. Empty layers are skipped.
    ///
    /// Layers are rendered from bottom to top based on the `Ord`
    /// implementation of `RenderLayer` (declaration order in the enum).
    ///
    /// This method consumes the `LayeredOutput` to avoid cloning SVG nodes.
    ///
    /// # Returns
    ///
    /// A vector of SVG group nodes, one per non-empty layer, in rendering
    /// order.
    pub fn render(mut self) -> Vec<SvgNode> {
        if self.is_empty() {
            return Vec::new();
        }

        // Sort all items by layer - Stable sorting
        self.items.sort_by_key(|(layer, _)| *layer);

        let mut result = Vec::new();
        let mut current_layer = self.items[0].0;
        let mut current_group = svg_element::Group::new().set("data-layer", current_layer.name());

        for (layer, node) in self.items {
            if layer != current_layer {
                // Finish previous layer group
                result.push(Box::new(current_group) as SvgNode);

                // Start new layer group
                current_layer = layer;
                current_group = svg_element::Group::new().set("data-layer", layer.name());
            }

            current_group = current_group.add(node);
        }

        // Add final group
        result.push(Box::new(current_group) as SvgNode);

        result
    }
}

#[cfg(test)]
mod tests {
    use svg::node::element::Rectangle;

    use super::*;

    #[test]
    fn test_layered_output_new() {
        let output = LayeredOutput::new();
        assert!(output.is_empty());
    }

    #[test]
    fn test_layered_output_add_to_layer() {
        let mut output = LayeredOutput::new();
        assert!(output.is_empty());

        output.add_to_layer(RenderLayer::Box, Box::new(Rectangle::new()));
        assert!(!output.is_empty());
    }

    #[test]
    fn test_layered_output_merge() {
        let mut output1 = LayeredOutput::new();
        output1.add_to_layer(RenderLayer::Box, Box::new(Rectangle::new()));

        let mut output2 = LayeredOutput::new();
        output2.add_to_layer(RenderLayer::Junction, Box::new(Rectangle::new()));

        output1.merge(output2);
        assert!(!output1.is_empty());

        let nodes = output1.render();
        assert_eq!(nodes.len(), 2);
    }

    #[test]
    fn test_layered_output_render_groups_per_layer() {
        let mut output = LayeredOutput::new();

        output.add_to_layer(RenderLayer::Connector, Box::new(Rectangle::new()));
        output.add_to_layer(RenderLayer::Box, Box::new(Rectangle::new()));
        output.add_to_layer(RenderLayer::Text, Box::new(Rectangle::new()));

        let svg_nodes = output.render();

        assert_eq!(svg_nodes.len(), 3);
    }

    #[test]
    fn test_layered_output_merge_same_layer() {
        let mut output1 = LayeredOutput::new();
        output1.add_to_layer(RenderLayer::Text, Box::new(Rectangle::new()));

        let mut output2 = LayeredOutput::new();
        output2.add_to_layer(RenderLayer::Text, Box::new(Rectangle::new()));

        output1.merge(output2);

        // Both nodes land in a single text layer group.
        let nodes = output1.render();
        assert_eq!(nodes.len(), 1);
    }

    #[test]
    fn test_layer_order_is_declaration_order() {
        assert!(RenderLayer::Connector < RenderLayer::Box);
        assert!(RenderLayer::Box < RenderLayer::Junction);
        assert!(RenderLayer::Junction < RenderLayer::Text);
    }

    #[test]
    fn test_layer_names() {
        assert_eq!(RenderLayer::Connector.name(), "connector");
        assert_eq!(RenderLayer::Box.name(), "box");
        assert_eq!(RenderLayer::Junction.name(), "junction");
        assert_eq!(RenderLayer::Text.name(), "text");
    }
}
