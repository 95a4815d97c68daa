//! Per-render options.
//!
//! [`RenderOptions`] collects everything about a single render that is not
//! part of the visual style: the style to load, an optional override file,
//! the figure title, canvas and export settings, palette overrides, and the
//! target surface. Options are built with chained `with_*` calls and
//! consumed by [`crate::render::render_cohort_flow`].

use std::{
    path::{Path, PathBuf},
    str::FromStr,
};

use cohortflow_core::geometry::Size;

use crate::{
    error::FlowError,
    surface::{DrawingArea, SurfaceTarget},
};

/// A file format the exporter can write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Scalable vector graphics, written directly.
    Svg,
    /// Portable network graphics, rasterized from the SVG document.
    Png,
}

impl ExportFormat {
    /// Returns the file extension without a dot.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Svg => "svg",
            Self::Png => "png",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = FlowError;

    /// Parses a format name, tolerating a leading dot and any casing.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim_start_matches('.').to_lowercase().as_str() {
            "svg" => Ok(Self::Svg),
            "png" => Ok(Self::Png),
            _ => Err(FlowError::Export(format!(
                "unsupported export format `{s}`; supported formats: svg, png"
            ))),
        }
    }
}

/// Options for a single diagram render.
///
/// # Example
///
/// ```
/// # use cohortflow::options::{ExportFormat, RenderOptions};
/// let options = RenderOptions::new()
///     .with_style("colorful")
///     .with_figure_title("Trial enrollment")
///     .with_export_formats(vec![ExportFormat::Svg]);
/// assert_eq!(options.style(), "colorful");
/// ```
#[derive(Debug)]
pub struct RenderOptions {
    style: String,
    style_config: Option<PathBuf>,
    figure_title: Option<String>,
    transparent: bool,
    image_base_name: Option<String>,
    save_dir: Option<PathBuf>,
    export_formats: Vec<ExportFormat>,
    figure_size: Option<Size>,
    dpi: Option<f32>,
    main_palette: Option<Vec<String>>,
    exclusion_palette: Option<Vec<String>>,
    surface: SurfaceTarget,
}

impl RenderOptions {
    /// Creates options with the default style and no export.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the built-in style to load.
    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.style = style.into();
        self
    }

    /// Sets a TOML file whose keys override the loaded style.
    pub fn with_style_config(mut self, path: impl Into<PathBuf>) -> Self {
        self.style_config = Some(path.into());
        self
    }

    /// Sets the title drawn above the diagram.
    pub fn with_figure_title(mut self, title: impl Into<String>) -> Self {
        self.figure_title = Some(title.into());
        self
    }

    /// Sets whether the canvas background is left transparent.
    pub fn with_transparent(mut self, transparent: bool) -> Self {
        self.transparent = transparent;
        self
    }

    /// Sets the base file name for exports, enabling saving.
    pub fn with_image_base_name(mut self, name: impl Into<String>) -> Self {
        self.image_base_name = Some(name.into());
        self
    }

    /// Sets the directory exports are written to.
    pub fn with_save_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.save_dir = Some(dir.into());
        self
    }

    /// Sets the formats written when exporting.
    pub fn with_export_formats(mut self, formats: Vec<ExportFormat>) -> Self {
        self.export_formats = formats;
        self
    }

    /// Sets an explicit canvas size in layout units, replacing the style's
    /// minimum canvas heuristics.
    pub fn with_figure_size(mut self, size: Size) -> Self {
        self.figure_size = Some(size);
        self
    }

    /// Sets the resolution in pixels per layout unit, replacing the
    /// style's `dpi`.
    pub fn with_dpi(mut self, dpi: f32) -> Self {
        self.dpi = Some(dpi);
        self
    }

    /// Sets an explicit step fill per node, replacing the gradient palette.
    pub fn with_main_palette(mut self, palette: Vec<String>) -> Self {
        self.main_palette = Some(palette);
        self
    }

    /// Sets an explicit exclusion fill per node, replacing the gradient
    /// palette.
    pub fn with_exclusion_palette(mut self, palette: Vec<String>) -> Self {
        self.exclusion_palette = Some(palette);
        self
    }

    /// Sets the surface the diagram renders onto.
    pub fn with_surface(mut self, surface: SurfaceTarget) -> Self {
        self.surface = surface;
        self
    }

    /// Renders into the given drawing area instead of a new document.
    pub fn with_drawing_area(self, area: DrawingArea) -> Self {
        self.with_surface(SurfaceTarget::Borrowed(area))
    }

    /// Returns the style name.
    pub fn style(&self) -> &str {
        &self.style
    }

    /// Returns the style override file, if set.
    pub fn style_config(&self) -> Option<&Path> {
        self.style_config.as_deref()
    }

    /// Returns the figure title, if set.
    pub fn figure_title(&self) -> Option<&str> {
        self.figure_title.as_deref()
    }

    /// Returns whether the background is transparent.
    pub fn transparent(&self) -> bool {
        self.transparent
    }

    /// Returns the export base name, if set.
    pub fn image_base_name(&self) -> Option<&str> {
        self.image_base_name.as_deref()
    }

    /// Returns the export directory, if set.
    pub fn save_dir(&self) -> Option<&Path> {
        self.save_dir.as_deref()
    }

    /// Returns the formats written when exporting.
    pub fn export_formats(&self) -> &[ExportFormat] {
        &self.export_formats
    }

    /// Returns the explicit canvas size, if set.
    pub fn figure_size(&self) -> Option<Size> {
        self.figure_size
    }

    /// Returns the explicit resolution, if set.
    pub fn dpi(&self) -> Option<f32> {
        self.dpi
    }

    /// Returns the step palette override, if set.
    pub fn main_palette(&self) -> Option<&[String]> {
        self.main_palette.as_deref()
    }

    /// Returns the exclusion palette override, if set.
    pub fn exclusion_palette(&self) -> Option<&[String]> {
        self.exclusion_palette.as_deref()
    }

    /// Removes the surface target, leaving the default owned surface.
    pub(crate) fn take_surface(&mut self) -> SurfaceTarget {
        std::mem::take(&mut self.surface)
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            style: "white".to_string(),
            style_config: None,
            figure_title: None,
            transparent: false,
            image_base_name: None,
            save_dir: None,
            export_formats: vec![ExportFormat::Png],
            figure_size: None,
            dpi: None,
            main_palette: None,
            exclusion_palette: None,
            surface: SurfaceTarget::Owned,
        }
    }
}
