//! Cohort node input records and their processed form.
//!
//! A [`CohortNode`] is one step of a participant pipeline as supplied by the
//! caller: a remaining count plus optional labels and color overrides.
//! [`process_nodes`] turns the sequence into [`ProcessedNode`]s, computing
//! the excluded count at each transition, wrapping all text to the style's
//! column widths, sizing the boxes, and resolving every color to canonical
//! hex.

use cohortflow_core::{color::resolve_color, text::wrap_lines};
use serde::Deserialize;

use crate::{error::FlowError, style::StyleConfig};

/// One step of a cohort pipeline.
///
/// Only the count is required. The `color`/`exclusion_color` fields take
/// precedence over their `*_name` aliases, which exist for callers that
/// keep named colors separate from hex values.
///
/// In TOML input the count may be spelled `count` or `N`.
///
/// # Example
///
/// ```
/// # use cohortflow::node::CohortNode;
/// let node = CohortNode::new(350)
///     .with_heading("Registered")
///     .with_exclusion_description("Declined consent");
/// assert_eq!(node.count(), 350);
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct CohortNode {
    #[serde(alias = "N")]
    count: u64,
    #[serde(default)]
    heading: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    exclusion_description: Option<String>,
    #[serde(default)]
    color: Option<String>,
    #[serde(default)]
    color_name: Option<String>,
    #[serde(default)]
    exclusion_color: Option<String>,
    #[serde(default)]
    exclusion_color_name: Option<String>,
}

impl CohortNode {
    /// Creates a node with the given remaining count and no labels.
    pub fn new(count: u64) -> Self {
        Self {
            count,
            heading: None,
            description: None,
            exclusion_description: None,
            color: None,
            color_name: None,
            exclusion_color: None,
            exclusion_color_name: None,
        }
    }

    /// Sets the step heading.
    pub fn with_heading(mut self, heading: impl Into<String>) -> Self {
        self.heading = Some(heading.into());
        self
    }

    /// Sets the step description shown under the occupancy line.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the label of the exclusion branch leading into this step.
    pub fn with_exclusion_description(mut self, description: impl Into<String>) -> Self {
        self.exclusion_description = Some(description.into());
        self
    }

    /// Sets the step box fill color.
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Sets the step box fill color by name.
    pub fn with_color_name(mut self, name: impl Into<String>) -> Self {
        self.color_name = Some(name.into());
        self
    }

    /// Sets the exclusion box fill color.
    pub fn with_exclusion_color(mut self, color: impl Into<String>) -> Self {
        self.exclusion_color = Some(color.into());
        self
    }

    /// Sets the exclusion box fill color by name.
    pub fn with_exclusion_color_name(mut self, name: impl Into<String>) -> Self {
        self.exclusion_color_name = Some(name.into());
        self
    }

    /// Returns the remaining participant count at this step.
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Returns the step heading, if set.
    pub fn heading(&self) -> Option<&str> {
        self.heading.as_deref()
    }

    /// Returns the step description, if set.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the exclusion branch label, if set.
    pub fn exclusion_description(&self) -> Option<&str> {
        self.exclusion_description.as_deref()
    }

    /// Returns the step fill override, preferring `color` over `color_name`.
    pub fn effective_color(&self) -> Option<&str> {
        self.color.as_deref().or(self.color_name.as_deref())
    }

    /// Returns the exclusion fill override, preferring `exclusion_color`
    /// over `exclusion_color_name`.
    pub fn effective_exclusion_color(&self) -> Option<&str> {
        self.exclusion_color
            .as_deref()
            .or(self.exclusion_color_name.as_deref())
    }
}

/// A cohort node with all derived rendering data attached.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedNode {
    count: u64,
    excluded: u64,
    title_lines: Vec<String>,
    body_lines: Vec<String>,
    exclusion_lines: Vec<String>,
    color: String,
    exclusion_color: String,
    main_height: f32,
    exclusion_height: f32,
}

impl ProcessedNode {
    /// Returns the remaining participant count at this step.
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Returns the count excluded between the previous step and this one.
    ///
    /// Always zero for the first step.
    pub fn excluded(&self) -> u64 {
        self.excluded
    }

    /// Returns the wrapped heading lines.
    pub fn title_lines(&self) -> &[String] {
        &self.title_lines
    }

    /// Returns the occupancy line followed by the wrapped description.
    pub fn body_lines(&self) -> &[String] {
        &self.body_lines
    }

    /// Returns the wrapped exclusion label followed by its count line.
    pub fn exclusion_lines(&self) -> &[String] {
        &self.exclusion_lines
    }

    /// Returns the step box fill as canonical hex.
    pub fn color(&self) -> &str {
        &self.color
    }

    /// Returns the exclusion box fill as canonical hex.
    pub fn exclusion_color(&self) -> &str {
        &self.exclusion_color
    }

    /// Returns the step box height in layout units.
    pub fn main_height(&self) -> f32 {
        self.main_height
    }

    /// Returns the exclusion box height in layout units.
    pub fn exclusion_height(&self) -> f32 {
        self.exclusion_height
    }

    /// Returns whether this step has an exclusion branch to draw.
    pub fn has_exclusion(&self) -> bool {
        self.excluded > 0
    }
}

/// Derives the rendering data for every node in the sequence.
///
/// The two palettes supply the default fill per index and must each hold one
/// entry per node; [`crate::render::render_cohort_flow`] precomputes them
/// from the style's gradient endpoints or the caller's override.
///
/// # Errors
///
/// Returns [`FlowError::EmptyInput`] for an empty sequence,
/// [`FlowError::Ordering`] when a count exceeds the previous step's count,
/// [`FlowError::PaletteLength`] when a palette does not match the sequence
/// length, and [`FlowError::Color`] when a fill cannot be resolved.
pub fn process_nodes(
    nodes: &[CohortNode],
    style: &StyleConfig,
    main_palette: &[String],
    exclusion_palette: &[String],
) -> Result<Vec<ProcessedNode>, FlowError> {
    if nodes.is_empty() {
        return Err(FlowError::EmptyInput);
    }
    if main_palette.len() != nodes.len() {
        return Err(FlowError::PaletteLength {
            which: "main",
            expected: nodes.len(),
            actual: main_palette.len(),
        });
    }
    if exclusion_palette.len() != nodes.len() {
        return Err(FlowError::PaletteLength {
            which: "exclusion",
            expected: nodes.len(),
            actual: exclusion_palette.len(),
        });
    }

    let layout = style.layout();
    let geometry = style.box_geometry();
    let allow_named = style.colors().allow_named_colors();

    let mut processed = Vec::with_capacity(nodes.len());
    for (index, node) in nodes.iter().enumerate() {
        let count = node.count();
        let previous_count = if index > 0 {
            nodes[index - 1].count()
        } else {
            count
        };
        let excluded = previous_count
            .checked_sub(count)
            .ok_or(FlowError::Ordering {
                index,
                count,
                previous_count,
            })?;

        let heading = node.heading().unwrap_or("").trim();
        let heading = if heading.is_empty() {
            format!("Step {}", index + 1)
        } else {
            heading.to_string()
        };
        let description = node.description().unwrap_or("").trim();
        // An absent key falls back to "Excluded"; an explicitly empty label
        // leaves only the count line.
        let exclusion_description = node.exclusion_description().unwrap_or("Excluded").trim();

        let title_lines = wrap_lines(&heading, layout.main_title_width());

        let mut body_lines = vec![format!("(n = {count})")];
        if !description.is_empty() {
            body_lines.push(String::new());
            body_lines.extend(wrap_lines(description, layout.main_text_width()));
        }

        let mut exclusion_lines = wrap_lines(exclusion_description, layout.exclusion_text_width());
        exclusion_lines.push(format!("(n = {excluded})"));

        let main_height = f32::max(
            geometry.min_main_height(),
            geometry.padding()
                + geometry.title_line_height() * title_lines.len().max(1) as f32
                + geometry.title_body_gap()
                + geometry.body_line_height() * body_lines.len().max(1) as f32,
        );
        let exclusion_height = f32::max(
            geometry.min_exclusion_height(),
            geometry.padding()
                + geometry.body_line_height() * exclusion_lines.len().max(1) as f32,
        );

        let color = resolve_color(node.effective_color(), &main_palette[index], allow_named)?;
        let exclusion_color = resolve_color(
            node.effective_exclusion_color(),
            &exclusion_palette[index],
            allow_named,
        )?;

        processed.push(ProcessedNode {
            count,
            excluded,
            title_lines,
            body_lines,
            exclusion_lines,
            color,
            exclusion_color,
            main_height,
            exclusion_height,
        });
    }

    Ok(processed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn white() -> StyleConfig {
        StyleConfig::default()
    }

    fn plain_palette(len: usize) -> Vec<String> {
        vec!["#ffffff".to_string(); len]
    }

    fn process(nodes: &[CohortNode]) -> Result<Vec<ProcessedNode>, FlowError> {
        let palette = plain_palette(nodes.len());
        process_nodes(nodes, &white(), &palette, &palette)
    }

    #[test]
    fn test_builder_and_effective_colors() {
        let node = CohortNode::new(42)
            .with_heading("Screened")
            .with_color("#112233")
            .with_color_name("blue");
        assert_eq!(node.count(), 42);
        assert_eq!(node.heading(), Some("Screened"));
        assert_eq!(node.effective_color(), Some("#112233"));
        assert_eq!(node.effective_exclusion_color(), None);

        let named_only = CohortNode::new(1).with_exclusion_color_name("salmon");
        assert_eq!(named_only.effective_exclusion_color(), Some("salmon"));
    }

    #[test]
    fn test_deserializes_count_alias() {
        let node: CohortNode = toml::from_str("N = 120\nheading = \"Analysed\"").unwrap();
        assert_eq!(node.count(), 120);
        assert_eq!(node.heading(), Some("Analysed"));

        let node: CohortNode = toml::from_str("count = 80").unwrap();
        assert_eq!(node.count(), 80);
        assert_eq!(node.description(), None);
    }

    #[test]
    fn test_excluded_counts_and_default_labels() {
        let nodes = [
            CohortNode::new(100),
            CohortNode::new(80),
            CohortNode::new(60),
        ];
        let processed = process(&nodes).unwrap();

        assert_eq!(processed.len(), 3);
        assert_eq!(processed[0].excluded(), 0);
        assert_eq!(processed[1].excluded(), 20);
        assert_eq!(processed[2].excluded(), 20);
        assert!(!processed[0].has_exclusion());
        assert!(processed[1].has_exclusion());

        assert_eq!(processed[0].title_lines(), ["Step 1"]);
        assert_eq!(processed[2].title_lines(), ["Step 3"]);
        assert_eq!(processed[0].body_lines(), ["(n = 100)"]);
        assert_eq!(processed[1].exclusion_lines(), ["Excluded", "(n = 20)"]);
    }

    #[test]
    fn test_description_appends_separator_and_wrapped_text() {
        let nodes = [
            CohortNode::new(100),
            CohortNode::new(80).with_description("Failed the inclusion criteria review"),
        ];
        let processed = process(&nodes).unwrap();

        let body = processed[1].body_lines();
        assert_eq!(body[0], "(n = 80)");
        assert_eq!(body[1], "");
        assert!(body.len() > 2);
        assert!(body[2].starts_with("Failed"));
    }

    #[test]
    fn test_empty_exclusion_description_keeps_count_line_only() {
        let nodes = [
            CohortNode::new(100),
            CohortNode::new(70).with_exclusion_description(""),
        ];
        let processed = process(&nodes).unwrap();
        assert_eq!(processed[1].exclusion_lines(), ["(n = 30)"]);
    }

    #[test]
    fn test_blank_heading_falls_back_to_step_number() {
        let nodes = [CohortNode::new(10).with_heading("   ")];
        let processed = process(&nodes).unwrap();
        assert_eq!(processed[0].title_lines(), ["Step 1"]);
    }

    #[test]
    fn test_increasing_count_is_an_ordering_error() {
        let nodes = [CohortNode::new(50), CohortNode::new(100)];
        let err = process(&nodes).unwrap_err();
        match err {
            FlowError::Ordering {
                index,
                count,
                previous_count,
            } => {
                assert_eq!(index, 1);
                assert_eq!(count, 100);
                assert_eq!(previous_count, 50);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_empty_input_is_an_error() {
        let err = process(&[]).unwrap_err();
        assert!(matches!(err, FlowError::EmptyInput));
    }

    #[test]
    fn test_short_content_sits_on_minimum_heights() {
        let nodes = [CohortNode::new(100), CohortNode::new(90)];
        let processed = process(&nodes).unwrap();
        assert_eq!(processed[0].main_height(), 1.6);
        assert_eq!(processed[1].exclusion_height(), 1.2);
    }

    #[test]
    fn test_long_description_grows_the_box() {
        let description = "A deliberately long description that wraps across \
                           several lines once the configured column width is \
                           applied to it";
        let nodes = [CohortNode::new(100).with_description(description)];
        let processed = process(&nodes).unwrap();

        let node = &processed[0];
        assert!(node.main_height() > 1.6);
        let geometry = white().box_geometry().clone();
        let expected = geometry.padding()
            + geometry.title_line_height() * node.title_lines().len() as f32
            + geometry.title_body_gap()
            + geometry.body_line_height() * node.body_lines().len() as f32;
        assert!((node.main_height() - expected).abs() < 1e-6);
    }

    #[test]
    fn test_node_color_overrides_palette() {
        let nodes = [CohortNode::new(100).with_color("red")];
        let palette = vec!["#336699".to_string()];
        let processed = process_nodes(&nodes, &white(), &palette, &palette).unwrap();
        assert_eq!(processed[0].color(), "#ff0000");
        assert_eq!(processed[0].exclusion_color(), "#336699");
    }

    #[test]
    fn test_named_override_rejected_when_disallowed() {
        let style: StyleConfig =
            toml::from_str("[colors]\nallow_named_colors = false\n").unwrap();
        let nodes = [CohortNode::new(100).with_color("red")];
        let palette = plain_palette(1);
        let err = process_nodes(&nodes, &style, &palette, &palette).unwrap_err();
        assert!(matches!(err, FlowError::Color(_)));
    }

    #[test]
    fn test_palette_length_mismatch() {
        let nodes = [CohortNode::new(100), CohortNode::new(90)];
        let err = process_nodes(&nodes, &white(), &plain_palette(3), &plain_palette(2));
        match err.unwrap_err() {
            FlowError::PaletteLength {
                which,
                expected,
                actual,
            } => {
                assert_eq!(which, "main");
                assert_eq!(expected, 2);
                assert_eq!(actual, 3);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
