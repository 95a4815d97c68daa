//! Text rendering for box labels and figure titles.
//!
//! Labels arrive pre-wrapped as a list of lines (see
//! [`wrap_lines`](crate::text::wrap_lines)), so rendering only has to place
//! baselines. Vertical placement follows a fixed-metrics model: every line
//! advances by the definition's line height and the baseline sits at a fixed
//! fraction of the font size below the top of a line box. This keeps layout
//! independent of any font machinery while staying close to what browsers
//! draw for common sans-serif fonts.
//!
//! # Overview
//!
//! - [`TextDefinition`] - Reusable text style configuration
//! - [`TextBlock`] - A renderable block of lines bound to a [`TextDefinition`]
//! - [`TextAnchor`] - How the block attaches to its position vertically

use std::str::FromStr;

use svg::node::{Text as SvgText, element as svg_element};

use crate::{color::Color, draw::SvgNode, geometry::Point};

/// Fraction of the font size between the top of a line box and its baseline.
const ASCENT_RATIO: f32 = 0.8;

/// Font weight for rendered text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FontWeight {
    #[default]
    Normal,
    Bold,
}

impl FontWeight {
    /// Returns the SVG `font-weight` attribute value.
    pub fn to_svg_value(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Bold => "bold",
        }
    }
}

impl FromStr for FontWeight {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "normal" => Ok(Self::Normal),
            "bold" => Ok(Self::Bold),
            _ => Err(format!("invalid font weight `{s}`")),
        }
    }
}

/// Font slant for rendered text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FontStyle {
    #[default]
    Normal,
    Italic,
}

impl FontStyle {
    /// Returns the SVG `font-style` attribute value.
    pub fn to_svg_value(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Italic => "italic",
        }
    }
}

/// Vertical anchoring of a text block relative to its position.
///
/// Horizontally a block is always centered on the position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TextAnchor {
    /// The top of the first line sits at the position. Used for box
    /// headings placed just under the box's top edge.
    Top,
    /// The block is centered on the position. Used for exclusion labels
    /// beside their box center.
    #[default]
    Middle,
    /// The baseline of the last line sits at the position. Used for the
    /// figure title above the content.
    Bottom,
}

/// Reusable text style configuration.
///
/// A definition carries everything except the content: font, color, line
/// spacing, and vertical anchoring. Sizes are in user units.
#[derive(Debug, Clone, PartialEq)]
pub struct TextDefinition {
    font_size: f32,
    line_height: f32,
    font_family: String,
    weight: FontWeight,
    style: FontStyle,
    color: Color,
    anchor: TextAnchor,
}

impl TextDefinition {
    /// Creates a text definition with default settings: 12 unit sans-serif,
    /// normal weight and slant, black, middle-anchored.
    pub fn new() -> Self {
        Self {
            font_size: 12.0,
            line_height: 14.4,
            font_family: "sans-serif".to_string(),
            weight: FontWeight::default(),
            style: FontStyle::default(),
            color: Color::default(),
            anchor: TextAnchor::default(),
        }
    }

    /// Sets the font size in user units.
    pub fn set_font_size(&mut self, size: f32) {
        self.font_size = size;
    }

    /// Sets the baseline-to-baseline distance in user units.
    pub fn set_line_height(&mut self, line_height: f32) {
        self.line_height = line_height;
    }

    /// Sets the font family.
    pub fn set_font_family(&mut self, family: &str) {
        self.font_family = family.to_string();
    }

    /// Sets the font weight.
    pub fn set_weight(&mut self, weight: FontWeight) {
        self.weight = weight;
    }

    /// Sets the font slant.
    pub fn set_style(&mut self, style: FontStyle) {
        self.style = style;
    }

    /// Sets the text color.
    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    /// Sets the vertical anchoring.
    pub fn set_anchor(&mut self, anchor: TextAnchor) {
        self.anchor = anchor;
    }

    /// Gets the font size in user units.
    pub fn font_size(&self) -> f32 {
        self.font_size
    }

    /// Gets the baseline-to-baseline distance in user units.
    pub fn line_height(&self) -> f32 {
        self.line_height
    }

    /// Gets the font family.
    pub fn font_family(&self) -> &str {
        &self.font_family
    }

    /// Gets the font weight.
    pub fn weight(&self) -> FontWeight {
        self.weight
    }

    /// Gets the font slant.
    pub fn style(&self) -> FontStyle {
        self.style
    }

    /// Gets the text color.
    pub fn color(&self) -> Color {
        self.color
    }

    /// Gets the vertical anchoring.
    pub fn anchor(&self) -> TextAnchor {
        self.anchor
    }
}

impl Default for TextDefinition {
    fn default() -> Self {
        Self::new()
    }
}

/// A renderable block of pre-wrapped lines bound to a [`TextDefinition`].
#[derive(Debug)]
pub struct TextBlock<'a> {
    definition: &'a TextDefinition,
    lines: &'a [String],
}

impl<'a> TextBlock<'a> {
    /// Creates a new text block.
    pub fn new(definition: &'a TextDefinition, lines: &'a [String]) -> Self {
        Self { definition, lines }
    }

    /// Renders this block centered horizontally on `position`, with the
    /// vertical placement decided by the definition's [`TextAnchor`].
    ///
    /// An empty block renders to an empty group.
    pub fn render_at(&self, position: Point) -> SvgNode {
        if self.lines.is_empty() {
            return Box::new(svg_element::Group::new());
        }

        let font_size = self.definition.font_size();
        let line_height = self.definition.line_height();
        let line_count = self.lines.len() as f32;

        let first_baseline = match self.definition.anchor() {
            TextAnchor::Top => position.y() + ASCENT_RATIO * font_size,
            TextAnchor::Middle => {
                let block_height = font_size + (line_count - 1.0) * line_height;
                position.y() - block_height / 2.0 + ASCENT_RATIO * font_size
            }
            TextAnchor::Bottom => position.y() - (line_count - 1.0) * line_height,
        };

        // Each tspan advances one line height, so the text origin sits one
        // line above the first baseline.
        let mut rendered = svg_element::Text::new("")
            .set("x", position.x())
            .set("y", first_baseline - line_height)
            .set("text-anchor", "middle")
            .set("font-family", self.definition.font_family())
            .set("font-size", font_size)
            .set("fill", &self.definition.color());

        if self.definition.weight() != FontWeight::Normal {
            rendered = rendered.set("font-weight", self.definition.weight().to_svg_value());
        }
        if self.definition.style() != FontStyle::Normal {
            rendered = rendered.set("font-style", self.definition.style().to_svg_value());
        }

        for line in self.lines {
            let tspan = svg_element::TSpan::new("")
                .set("x", position.x())
                .set("dy", line_height)
                .add(SvgText::new(line));
            rendered = rendered.add(tspan);
        }

        Box::new(rendered)
    }
}
