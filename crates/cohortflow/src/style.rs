//! Style configuration for flow diagram rendering.
//!
//! Styles control every visual constant of a diagram: canvas sizing, column
//! widths, box geometry, font sizes, line widths, and fill palettes. A style
//! is loaded from one of the built-in TOML files bundled with the crate
//! ([`builtin_style_names`]) and a user-provided TOML file may be deep-merged
//! on top, so overrides only need to name the keys they change.
//!
//! All lengths in the `layout` and `box_geometry` sections are in layout
//! units (inches at the configured `dpi`); font sizes, line widths, and the
//! title pad are in points.
//!
//! # Example
//!
//! ```
//! # use cohortflow::style::load_style;
//! let style = load_style("white", None).unwrap();
//! assert_eq!(style.figure().dpi(), 200.0);
//! ```

use std::{fs, path::Path};

use log::warn;
use serde::Deserialize;
use toml::Value;

use crate::error::FlowError;

/// Built-in style names and their embedded TOML sources.
const BUILTIN_STYLES: [(&str, &str); 2] = [
    ("colorful", include_str!("../styles/colorful.toml")),
    ("white", include_str!("../styles/white.toml")),
];

/// Returns the names of the built-in styles, sorted alphabetically.
pub fn builtin_style_names() -> Vec<&'static str> {
    BUILTIN_STYLES.iter().map(|(name, _)| *name).collect()
}

/// Canvas and figure-level settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FigureConfig {
    dpi: f32,
    figsize_width: f32,
    figsize_height: f32,
    title_fontsize: f32,
    title_fontweight: String,
    title_pad: f32,
}

impl Default for FigureConfig {
    fn default() -> Self {
        Self {
            dpi: 200.0,
            figsize_width: 12.0,
            figsize_height: 8.0,
            title_fontsize: 16.0,
            title_fontweight: "bold".to_string(),
            title_pad: 20.0,
        }
    }
}

impl FigureConfig {
    /// Returns the raster resolution in pixels per layout unit.
    pub fn dpi(&self) -> f32 {
        self.dpi
    }

    /// Returns the minimum canvas width in layout units.
    pub fn figsize_width(&self) -> f32 {
        self.figsize_width
    }

    /// Returns the minimum canvas height in layout units.
    pub fn figsize_height(&self) -> f32 {
        self.figsize_height
    }

    /// Returns the figure title font size in points.
    pub fn title_fontsize(&self) -> f32 {
        self.title_fontsize
    }

    /// Returns the figure title font weight name.
    pub fn title_fontweight(&self) -> &str {
        &self.title_fontweight
    }

    /// Returns the gap between the figure title baseline and the content in
    /// points.
    pub fn title_pad(&self) -> f32 {
        self.title_pad
    }
}

/// Column placement and text wrapping settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    main_title_width: usize,
    main_text_width: usize,
    exclusion_text_width: usize,
    main_box_width: f32,
    exclusion_box_width: f32,
    base_gap: f32,
    side_gap: f32,
    top_margin: f32,
    bottom_margin: f32,
    x_padding: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            main_title_width: 26,
            main_text_width: 34,
            exclusion_text_width: 30,
            main_box_width: 2.8,
            exclusion_box_width: 2.6,
            base_gap: 0.8,
            side_gap: 1.2,
            top_margin: 0.8,
            bottom_margin: 0.8,
            x_padding: 0.6,
        }
    }
}

impl LayoutConfig {
    /// Returns the wrap width for step headings, in characters.
    pub fn main_title_width(&self) -> usize {
        self.main_title_width
    }

    /// Returns the wrap width for step descriptions, in characters.
    pub fn main_text_width(&self) -> usize {
        self.main_text_width
    }

    /// Returns the wrap width for exclusion labels, in characters.
    pub fn exclusion_text_width(&self) -> usize {
        self.exclusion_text_width
    }

    /// Returns the step box width in layout units.
    pub fn main_box_width(&self) -> f32 {
        self.main_box_width
    }

    /// Returns the exclusion box width in layout units.
    pub fn exclusion_box_width(&self) -> f32 {
        self.exclusion_box_width
    }

    /// Returns the minimum vertical gap between consecutive step boxes.
    pub fn base_gap(&self) -> f32 {
        self.base_gap
    }

    /// Returns the horizontal gap between the two columns.
    pub fn side_gap(&self) -> f32 {
        self.side_gap
    }

    /// Returns the margin above the first step box.
    pub fn top_margin(&self) -> f32 {
        self.top_margin
    }

    /// Returns the margin below the last step box.
    pub fn bottom_margin(&self) -> f32 {
        self.bottom_margin
    }

    /// Returns the horizontal padding added on both content edges.
    pub fn x_padding(&self) -> f32 {
        self.x_padding
    }
}

/// Box sizing and inner text placement settings, in layout units.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct BoxGeometryConfig {
    padding: f32,
    title_line_height: f32,
    body_line_height: f32,
    title_body_gap: f32,
    text_top_padding: f32,
    min_main_height: f32,
    min_exclusion_height: f32,
    clearance: f32,
    corner_radius: f32,
    pad_factor: f32,
}

impl Default for BoxGeometryConfig {
    fn default() -> Self {
        Self {
            padding: 0.52,
            title_line_height: 0.42,
            body_line_height: 0.33,
            title_body_gap: 0.16,
            text_top_padding: 0.24,
            min_main_height: 1.6,
            min_exclusion_height: 1.2,
            clearance: 0.2,
            corner_radius: 0.05,
            pad_factor: 0.03,
        }
    }
}

impl BoxGeometryConfig {
    /// Returns the vertical padding inside a box.
    pub fn padding(&self) -> f32 {
        self.padding
    }

    /// Returns the advance per heading line.
    pub fn title_line_height(&self) -> f32 {
        self.title_line_height
    }

    /// Returns the advance per body line.
    pub fn body_line_height(&self) -> f32 {
        self.body_line_height
    }

    /// Returns the gap between the heading block and the body block.
    pub fn title_body_gap(&self) -> f32 {
        self.title_body_gap
    }

    /// Returns the distance from a box's top edge to its heading.
    pub fn text_top_padding(&self) -> f32 {
        self.text_top_padding
    }

    /// Returns the minimum height of a step box.
    pub fn min_main_height(&self) -> f32 {
        self.min_main_height
    }

    /// Returns the minimum height of an exclusion box.
    pub fn min_exclusion_height(&self) -> f32 {
        self.min_exclusion_height
    }

    /// Returns the clearance kept above and below an exclusion box inside
    /// its transition gap.
    pub fn clearance(&self) -> f32 {
        self.clearance
    }

    /// Returns the corner rounding radius of boxes.
    pub fn corner_radius(&self) -> f32 {
        self.corner_radius
    }

    /// Returns how far box edges are inflated beyond their laid-out bounds.
    pub fn pad_factor(&self) -> f32 {
        self.pad_factor
    }
}

/// Font sizes, in points.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TextConfig {
    fontsize_title: f32,
    fontsize_main: f32,
    fontsize_exclusion: f32,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            fontsize_title: 12.0,
            fontsize_main: 10.0,
            fontsize_exclusion: 9.0,
        }
    }
}

impl TextConfig {
    /// Returns the step heading font size.
    pub fn fontsize_title(&self) -> f32 {
        self.fontsize_title
    }

    /// Returns the step body font size.
    pub fn fontsize_main(&self) -> f32 {
        self.fontsize_main
    }

    /// Returns the exclusion label font size.
    pub fn fontsize_exclusion(&self) -> f32 {
        self.fontsize_exclusion
    }
}

/// Line widths and connector decoration settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LinesConfig {
    box_linewidth: f32,
    connector_linewidth: f32,
    arrow_mutation_scale: f32,
    junction_radius: f32,
}

impl Default for LinesConfig {
    fn default() -> Self {
        Self {
            box_linewidth: 1.0,
            connector_linewidth: 1.0,
            arrow_mutation_scale: 20.0,
            junction_radius: 0.004,
        }
    }
}

impl LinesConfig {
    /// Returns the box outline width in points.
    pub fn box_linewidth(&self) -> f32 {
        self.box_linewidth
    }

    /// Returns the connector line width in points.
    pub fn connector_linewidth(&self) -> f32 {
        self.connector_linewidth
    }

    /// Returns the arrowhead scale factor.
    pub fn arrow_mutation_scale(&self) -> f32 {
        self.arrow_mutation_scale
    }

    /// Returns the branch junction dot radius in layout units.
    pub fn junction_radius(&self) -> f32 {
        self.junction_radius
    }
}

/// Fill palette endpoints and the color naming policy.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ColorsConfig {
    allow_named_colors: bool,
    main_start: String,
    main_end: String,
    exclusion_start: String,
    exclusion_end: String,
}

impl Default for ColorsConfig {
    fn default() -> Self {
        Self {
            allow_named_colors: true,
            main_start: "#ffffff".to_string(),
            main_end: "#ffffff".to_string(),
            exclusion_start: "#ffffff".to_string(),
            exclusion_end: "#ffffff".to_string(),
        }
    }
}

impl ColorsConfig {
    /// Returns whether CSS named colors are accepted in node overrides.
    pub fn allow_named_colors(&self) -> bool {
        self.allow_named_colors
    }

    /// Returns the first step's palette color.
    pub fn main_start(&self) -> &str {
        &self.main_start
    }

    /// Returns the last step's palette color.
    pub fn main_end(&self) -> &str {
        &self.main_end
    }

    /// Returns the first exclusion's palette color.
    pub fn exclusion_start(&self) -> &str {
        &self.exclusion_start
    }

    /// Returns the last exclusion's palette color.
    pub fn exclusion_end(&self) -> &str {
        &self.exclusion_end
    }
}

/// Complete visual configuration for a flow diagram.
///
/// Groups the six style sections. The default value matches the built-in
/// `white` style.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct StyleConfig {
    /// Canvas and figure title section.
    #[serde(default)]
    figure: FigureConfig,

    /// Column placement section.
    #[serde(default)]
    layout: LayoutConfig,

    /// Box sizing section.
    #[serde(default)]
    box_geometry: BoxGeometryConfig,

    /// Font size section.
    #[serde(default)]
    text: TextConfig,

    /// Line width section.
    #[serde(default)]
    lines: LinesConfig,

    /// Palette section.
    #[serde(default)]
    colors: ColorsConfig,
}

impl StyleConfig {
    /// Returns the figure configuration.
    pub fn figure(&self) -> &FigureConfig {
        &self.figure
    }

    /// Returns the layout configuration.
    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    /// Returns the box geometry configuration.
    pub fn box_geometry(&self) -> &BoxGeometryConfig {
        &self.box_geometry
    }

    /// Returns the text configuration.
    pub fn text(&self) -> &TextConfig {
        &self.text
    }

    /// Returns the lines configuration.
    pub fn lines(&self) -> &LinesConfig {
        &self.lines
    }

    /// Returns the colors configuration.
    pub fn colors(&self) -> &ColorsConfig {
        &self.colors
    }
}

/// Loads a built-in style, optionally deep-merging a user override file.
///
/// The override only needs to contain the keys it changes; every other value
/// is inherited from the built-in style. A missing override file is ignored
/// with a warning so a shared invocation works on machines without the
/// override in place.
///
/// # Errors
///
/// Returns [`FlowError::UnknownStyle`] for an unrecognized style name,
/// [`FlowError::StyleParse`] when the override file exists but cannot be
/// parsed or contains values of the wrong type, and [`FlowError::Io`] when
/// it cannot be read.
pub fn load_style(style: &str, override_path: Option<&Path>) -> Result<StyleConfig, FlowError> {
    let source = BUILTIN_STYLES
        .iter()
        .find(|(name, _)| *name == style)
        .map(|(_, source)| *source)
        .ok_or_else(|| FlowError::UnknownStyle {
            name: style.to_string(),
            available: builtin_style_names(),
        })?;

    // A bundled style that fails to parse falls back to the built-in
    // defaults instead of failing the render.
    let mut merged = toml::from_str::<Value>(source).unwrap_or_else(|err| {
        warn!(style = style, error:% = err; "built-in style failed to parse, using defaults");
        Value::Table(toml::Table::new())
    });

    let mut override_display = None;
    if let Some(path) = override_path {
        if path.exists() {
            let content = fs::read_to_string(path)?;
            let overlay =
                toml::from_str::<Value>(&content).map_err(|source| FlowError::StyleParse {
                    path: path.display().to_string(),
                    source,
                })?;
            merged = merge_values(merged, overlay);
            override_display = Some(path.display().to_string());
        } else {
            warn!(path:% = path.display(); "custom style config does not exist, ignoring");
        }
    }

    match merged.try_into::<StyleConfig>() {
        Ok(config) => Ok(config),
        Err(source) => match override_display {
            Some(path) => Err(FlowError::StyleParse { path, source }),
            None => {
                warn!(style = style, error:% = source; "built-in style contained invalid values, using defaults");
                Ok(StyleConfig::default())
            }
        },
    }
}

/// Recursively merges `overlay` onto `base`.
///
/// Tables merge key by key; any other value in the overlay replaces the
/// base value outright.
fn merge_values(base: Value, overlay: Value) -> Value {
    match (base, overlay) {
        (Value::Table(mut base), Value::Table(overlay)) => {
            for (key, value) in overlay {
                let merged = match base.remove(&key) {
                    Some(existing) => merge_values(existing, value),
                    None => value,
                };
                base.insert(key, merged);
            }
            Value::Table(base)
        }
        (_, overlay) => overlay,
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn override_file(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_white_style_matches_defaults() {
        let style = load_style("white", None).unwrap();
        assert_eq!(style, StyleConfig::default());
        assert_eq!(style.figure().dpi(), 200.0);
        assert_eq!(style.layout().main_box_width(), 2.8);
        assert_eq!(style.box_geometry().min_main_height(), 1.6);
        assert_eq!(style.text().fontsize_exclusion(), 9.0);
        assert_eq!(style.lines().arrow_mutation_scale(), 20.0);
        assert!(style.colors().allow_named_colors());
        assert_eq!(style.colors().main_start(), "#ffffff");
    }

    #[test]
    fn test_colorful_style_has_nonwhite_palette() {
        let style = load_style("colorful", None).unwrap();
        assert_ne!(style.colors().main_start(), "#ffffff");
        assert_ne!(style.colors().exclusion_start(), "#ffffff");
        // Geometry stays identical across built-in styles.
        assert_eq!(style.layout(), StyleConfig::default().layout());
    }

    #[test]
    fn test_unknown_style_lists_available() {
        let err = load_style("galaxy", None).unwrap_err();
        match err {
            FlowError::UnknownStyle { name, available } => {
                assert_eq!(name, "galaxy");
                assert_eq!(available, vec!["colorful", "white"]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_override_merges_deeply() {
        let file = override_file("[figure]\ndpi = 96\n\n[colors]\nmain_start = \"#123456\"\n");
        let style = load_style("white", Some(file.path())).unwrap();

        assert_eq!(style.figure().dpi(), 96.0);
        assert_eq!(style.colors().main_start(), "#123456");
        // Untouched keys keep their built-in values.
        assert_eq!(style.figure().figsize_width(), 12.0);
        assert_eq!(style.colors().main_end(), "#ffffff");
        assert_eq!(style.layout().base_gap(), 0.8);
    }

    #[test]
    fn test_missing_override_is_ignored() {
        let path = Path::new("/nonexistent/cohortflow-style-override.toml");
        let style = load_style("white", Some(path)).unwrap();
        assert_eq!(style, StyleConfig::default());
    }

    #[test]
    fn test_corrupt_override_is_an_error() {
        let file = override_file("not toml [");
        let err = load_style("white", Some(file.path())).unwrap_err();
        assert!(matches!(err, FlowError::StyleParse { .. }));
        assert!(err.to_string().contains("failed to parse style config"));
    }

    #[test]
    fn test_wrongly_typed_override_is_an_error() {
        let file = override_file("[figure]\ndpi = \"fast\"\n");
        let err = load_style("white", Some(file.path())).unwrap_err();
        assert!(matches!(err, FlowError::StyleParse { .. }));
    }

    #[test]
    fn test_merge_values_replaces_scalars_and_adds_keys() {
        let base = toml::from_str::<Value>("a = 1\n[t]\nx = 1\ny = 2\n").unwrap();
        let overlay = toml::from_str::<Value>("a = 5\nb = 7\n[t]\ny = 9\n").unwrap();

        let merged = merge_values(base, overlay);
        let table = merged.as_table().unwrap();
        assert_eq!(table["a"].as_integer(), Some(5));
        assert_eq!(table["b"].as_integer(), Some(7));

        let nested = table["t"].as_table().unwrap();
        assert_eq!(nested["x"].as_integer(), Some(1));
        assert_eq!(nested["y"].as_integer(), Some(9));
    }

    #[test]
    fn test_merge_values_overlay_wins_on_type_mismatch() {
        let base = toml::from_str::<Value>("[t]\nx = 1\n").unwrap();
        let overlay = toml::from_str::<Value>("t = 3\n").unwrap();

        let merged = merge_values(base, overlay);
        assert_eq!(merged.as_table().unwrap()["t"].as_integer(), Some(3));
    }
}
