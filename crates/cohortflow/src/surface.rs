//! Render surfaces.
//!
//! A diagram renders either onto its own SVG document or into a caller's
//! [`DrawingArea`], so a flow diagram can become one panel of a larger
//! composite figure. The borrowed path adds content but never sizes the
//! canvas, draws a background, or exports files.

use std::{
    fmt,
    path::{Path, PathBuf},
};

use svg::{Document, node::element::Group};

use crate::{error::FlowError, export::save_document, options::ExportFormat};

/// Where a diagram's content should land.
#[derive(Debug, Default)]
pub enum SurfaceTarget {
    /// Render onto a new standalone SVG document.
    #[default]
    Owned,
    /// Render into an existing drawing area owned by the caller.
    Borrowed(DrawingArea),
}

/// A caller-owned SVG group that diagrams can render into.
///
/// # Example
///
/// ```
/// # use cohortflow::surface::DrawingArea;
/// let mut area = DrawingArea::new();
/// area.add(svg::node::element::Circle::new().set("r", 4));
/// assert!(area.to_svg_string().contains("circle"));
/// ```
pub struct DrawingArea {
    group: Group,
}

impl DrawingArea {
    /// Creates an empty drawing area.
    pub fn new() -> Self {
        Self {
            group: Group::new(),
        }
    }

    /// Wraps an existing group, keeping its attributes and children.
    pub fn from_group(group: Group) -> Self {
        Self { group }
    }

    /// Appends a node to the area.
    pub fn add(&mut self, node: impl Into<Box<dyn svg::Node>>) {
        let group = std::mem::replace(&mut self.group, Group::new());
        self.group = group.add(node);
    }

    /// Consumes the area and returns the underlying group.
    pub fn into_group(self) -> Group {
        self.group
    }

    /// Renders the area's content as an SVG fragment.
    pub fn to_svg_string(&self) -> String {
        self.group.to_string()
    }
}

impl Default for DrawingArea {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for DrawingArea {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DrawingArea").finish_non_exhaustive()
    }
}

/// The outcome of rendering a diagram.
pub enum Rendering {
    /// A standalone document with canvas sizing and background.
    Owned {
        /// The complete SVG document.
        document: Document,
    },
    /// The caller's drawing area with the diagram's content appended.
    Borrowed {
        /// The drawing area passed in through
        /// [`SurfaceTarget::Borrowed`].
        area: DrawingArea,
    },
}

impl Rendering {
    /// Renders the result as SVG text.
    ///
    /// For an owned rendering this is a complete document; for a borrowed
    /// one it is the caller's group as a fragment.
    pub fn to_svg_string(&self) -> String {
        match self {
            Self::Owned { document } => document.to_string(),
            Self::Borrowed { area } => area.to_svg_string(),
        }
    }

    /// Returns the document of an owned rendering.
    pub fn document(&self) -> Option<&Document> {
        match self {
            Self::Owned { document } => Some(document),
            Self::Borrowed { .. } => None,
        }
    }

    /// Returns the drawing area of a borrowed rendering.
    pub fn drawing_area(&self) -> Option<&DrawingArea> {
        match self {
            Self::Owned { .. } => None,
            Self::Borrowed { area } => Some(area),
        }
    }

    /// Consumes a borrowed rendering and hands the drawing area back.
    pub fn into_drawing_area(self) -> Option<DrawingArea> {
        match self {
            Self::Owned { .. } => None,
            Self::Borrowed { area } => Some(area),
        }
    }

    /// Writes an owned rendering under `save_dir` as `base_name` in each
    /// format, returning the paths written.
    ///
    /// # Errors
    ///
    /// Returns [`FlowError::Export`] for a borrowed rendering, which has no
    /// document of its own to write, plus any error from writing the files.
    pub fn save(
        &self,
        save_dir: Option<&Path>,
        base_name: &str,
        formats: &[ExportFormat],
    ) -> Result<Vec<PathBuf>, FlowError> {
        match self {
            Self::Owned { document } => save_document(document, save_dir, base_name, formats),
            Self::Borrowed { .. } => Err(FlowError::Export(
                "cannot export a rendering made into a caller-provided drawing area".to_string(),
            )),
        }
    }
}

impl fmt::Debug for Rendering {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Owned { .. } => f.debug_struct("Owned").finish_non_exhaustive(),
            Self::Borrowed { .. } => f.debug_struct("Borrowed").finish_non_exhaustive(),
        }
    }
}
