//! Writing rendered documents to disk.
//!
//! SVG files are written directly from the document; PNG files are
//! rasterized from the SVG text with `resvg` and require the `png` feature.

use std::{
    fs,
    path::{Path, PathBuf},
};

use log::info;
use svg::Document;

use crate::{error::FlowError, options::ExportFormat};

/// Writes the document under `save_dir` as `base_name` in each format.
///
/// The directory defaults to the current one and is created when missing.
/// Returns the paths written, in format order.
///
/// # Errors
///
/// Returns [`FlowError::Io`] when the directory or an SVG file cannot be
/// written and [`FlowError::Export`] when rasterization fails or PNG output
/// is requested without the `png` feature.
pub fn save_document(
    document: &Document,
    save_dir: Option<&Path>,
    base_name: &str,
    formats: &[ExportFormat],
) -> Result<Vec<PathBuf>, FlowError> {
    let dir = save_dir.unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(dir)?;

    let mut written = Vec::with_capacity(formats.len());
    for format in formats {
        let path = dir.join(format!("{base_name}.{}", format.extension()));
        match format {
            ExportFormat::Svg => svg::save(&path, document)?,
            ExportFormat::Png => write_png(&document.to_string(), &path)?,
        }
        info!(path:% = path.display(), format = format.extension(); "saved diagram");
        written.push(path);
    }

    Ok(written)
}

#[cfg(feature = "png")]
fn write_png(svg_text: &str, path: &Path) -> Result<(), FlowError> {
    let mut options = usvg::Options::default();
    options.font_family = "sans-serif".to_string();

    let tree = usvg::Tree::from_str(svg_text, &options)
        .map_err(|err| FlowError::Export(format!("failed to parse rendered SVG: {err}")))?;
    let size = tree.size().to_int_size();
    let mut pixmap =
        resvg::tiny_skia::Pixmap::new(size.width(), size.height()).ok_or_else(|| {
            FlowError::Export(format!(
                "failed to allocate a {}x{} pixmap",
                size.width(),
                size.height()
            ))
        })?;

    let mut pixmap_mut = pixmap.as_mut();
    resvg::render(&tree, resvg::tiny_skia::Transform::default(), &mut pixmap_mut);
    pixmap
        .save_png(path)
        .map_err(|err| FlowError::Export(format!("failed to write `{}`: {err}", path.display())))?;
    Ok(())
}

#[cfg(not(feature = "png"))]
fn write_png(_svg_text: &str, path: &Path) -> Result<(), FlowError> {
    Err(FlowError::Export(format!(
        "PNG export requires the `png` feature (requested for `{}`)",
        path.display()
    )))
}
