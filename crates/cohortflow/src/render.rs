//! Diagram assembly.
//!
//! [`render_cohort_flow`] is the crate's entry point. It validates the node
//! sequence, loads the style, derives per-node text and sizing, computes the
//! layout, draws every element in pixel space, and assembles either a
//! standalone SVG document or content for a caller's drawing area.

use std::str::FromStr;

use cohortflow_core::{
    color::{Color, gradient_palette},
    draw::{
        BoxDefinition, ConnectorDefinition, ConnectorDrawer, FontStyle, FontWeight, HeadStyle,
        JunctionDefinition, LayeredOutput, RenderLayer, StrokeDefinition, TextAnchor, TextBlock,
        TextDefinition,
    },
    geometry::{Insets, Point, Size},
};
use log::{debug, info, warn};
use svg::{
    Document,
    node::element::{Group, Rectangle},
};

use crate::{
    error::FlowError,
    export::save_document,
    layout::{Layout, compute_layout},
    node::{CohortNode, ProcessedNode, process_nodes},
    options::RenderOptions,
    style::{StyleConfig, load_style},
    surface::{Rendering, SurfaceTarget},
};

/// Fraction of the arrow scale one head occupies, in points.
const HEAD_LENGTH_RATIO: f32 = 0.4;

/// Extra leading applied to multi-line labels and the figure title.
const LINE_SPACING: f32 = 1.2;

const BACKGROUND_COLOR: &str = "#ffffff";

/// Converts layout units and point sizes to pixels at a fixed resolution.
#[derive(Debug, Clone, Copy)]
struct Scale {
    dpi: f32,
}

impl Scale {
    /// Converts layout units to pixels.
    fn px(self, units: f32) -> f32 {
        units * self.dpi
    }

    /// Converts a size in points to pixels.
    fn font_px(self, points: f32) -> f32 {
        points * self.dpi / 72.0
    }
}

/// Renders a cohort flow diagram.
///
/// The sequence flows top to bottom; every transition gets a downward arrow
/// and, when participants were excluded, a branch to an exclusion box on the
/// right. With the default [`SurfaceTarget::Owned`] the result is a complete
/// SVG document, exported to files when
/// [`image_base_name`](RenderOptions::with_image_base_name) is set. With a
/// borrowed surface the diagram's content is appended to the caller's
/// drawing area and export is skipped.
///
/// # Errors
///
/// Returns [`FlowError::EmptyInput`] for an empty sequence,
/// [`FlowError::Ordering`] when counts increase, palette, color, style, and
/// export errors as their respective variants.
///
/// # Example
///
/// ```
/// # use cohortflow::{node::CohortNode, options::RenderOptions, render::render_cohort_flow};
/// let nodes = [
///     CohortNode::new(120).with_heading("Screened"),
///     CohortNode::new(90).with_exclusion_description("Not eligible"),
/// ];
/// let rendering = render_cohort_flow(&nodes, RenderOptions::new()).unwrap();
/// assert!(rendering.to_svg_string().contains("data-layer"));
/// ```
pub fn render_cohort_flow(
    nodes: &[CohortNode],
    mut options: RenderOptions,
) -> Result<Rendering, FlowError> {
    if nodes.is_empty() {
        return Err(FlowError::EmptyInput);
    }

    let style = load_style(options.style(), options.style_config())?;
    let scale = Scale {
        dpi: options.dpi().unwrap_or(style.figure().dpi()),
    };

    let colors = style.colors();
    let main_palette = resolve_palette(
        "main",
        options.main_palette(),
        colors.main_start(),
        colors.main_end(),
        nodes.len(),
    )?;
    let exclusion_palette = resolve_palette(
        "exclusion",
        options.exclusion_palette(),
        colors.exclusion_start(),
        colors.exclusion_end(),
        nodes.len(),
    )?;

    let processed = process_nodes(nodes, &style, &main_palette, &exclusion_palette)?;
    let layout = compute_layout(&processed, &style);
    debug!(
        nodes = processed.len(),
        total_height = layout.total_height();
        "layout computed"
    );

    let mut drawer = ConnectorDrawer::new();
    let mut scene = draw_scene(&processed, &layout, &style, scale, &mut drawer)?;

    let content_px = layout.content().scale(scale.dpi);

    let figure = style.figure();
    let figure_title = options
        .figure_title()
        .map(str::trim)
        .filter(|title| !title.is_empty())
        .map(str::to_string);
    let title_band = if figure_title.is_some() {
        scale.font_px(figure.title_pad()) + scale.font_px(figure.title_fontsize()) * LINE_SPACING
    } else {
        0.0
    };

    if let Some(ref title) = figure_title {
        let weight = match FontWeight::from_str(figure.title_fontweight()) {
            Ok(weight) => weight,
            Err(_) => {
                warn!(
                    weight = figure.title_fontweight();
                    "unrecognized title font weight, using bold"
                );
                FontWeight::Bold
            }
        };

        let mut definition = TextDefinition::new();
        definition.set_font_size(scale.font_px(figure.title_fontsize()));
        definition.set_line_height(scale.font_px(figure.title_fontsize()) * LINE_SPACING);
        definition.set_weight(weight);
        definition.set_anchor(TextAnchor::Bottom);

        let lines = vec![title.clone()];
        let position = Point::new(
            content_px.center().x(),
            content_px.min_y() - scale.font_px(figure.title_pad()),
        );
        scene.add_to_layer(
            RenderLayer::Text,
            TextBlock::new(&definition, &lines).render_at(position),
        );
    }

    match options.take_surface() {
        SurfaceTarget::Owned => {
            let inner = content_px.to_size();
            let minimum = options
                .figure_size()
                .unwrap_or_else(|| {
                    Size::new(
                        f32::max(
                            figure.figsize_width(),
                            (layout.exclusion_x() + style.layout().exclusion_box_width()) * 1.5,
                        ),
                        f32::max(figure.figsize_height(), layout.total_height()),
                    )
                })
                .scale(scale.dpi);
            let canvas = inner.max(minimum);
            let margin_x = (canvas.width() - inner.width()) / 2.0;
            let margin_y = (canvas.height() - inner.height()) / 2.0;

            let document_size = Size::new(canvas.width(), canvas.height() + title_band);
            let mut document = Document::new()
                .set(
                    "viewBox",
                    format!("0 0 {} {}", document_size.width(), document_size.height()),
                )
                .set("width", document_size.width())
                .set("height", document_size.height());

            if !options.transparent() {
                document = document.add(
                    Rectangle::new()
                        .set("x", 0)
                        .set("y", 0)
                        .set("width", document_size.width())
                        .set("height", document_size.height())
                        .set("fill", BACKGROUND_COLOR),
                );
            }

            if !drawer.is_empty() {
                document = document.add(drawer.marker_definitions());
            }

            let mut scene_group = Group::new().set(
                "transform",
                format!(
                    "translate({}, {})",
                    margin_x - content_px.min_x(),
                    title_band + margin_y - content_px.min_y()
                ),
            );
            for node in scene.render() {
                scene_group = scene_group.add(node);
            }
            let document = document.add(scene_group);

            info!(
                nodes = processed.len(),
                width = document_size.width(),
                height = document_size.height();
                "rendered cohort flow diagram"
            );

            if let Some(base_name) = options.image_base_name() {
                save_document(
                    &document,
                    options.save_dir(),
                    base_name,
                    options.export_formats(),
                )?;
            }

            Ok(Rendering::Owned { document })
        }
        SurfaceTarget::Borrowed(mut area) => {
            if options.image_base_name().is_some() {
                warn!("export skipped: rendering into a caller-provided drawing area");
            }

            if !drawer.is_empty() {
                area.add(drawer.marker_definitions());
            }

            let mut scene_group = Group::new().set(
                "transform",
                format!(
                    "translate({}, {})",
                    -content_px.min_x(),
                    title_band - content_px.min_y()
                ),
            );
            for node in scene.render() {
                scene_group = scene_group.add(node);
            }
            area.add(scene_group);

            info!(nodes = processed.len(); "rendered cohort flow diagram into drawing area");

            Ok(Rendering::Borrowed { area })
        }
    }
}

/// Picks the caller's palette override or builds the style's gradient.
///
/// An empty override is treated as absent; a non-empty one must match the
/// node count exactly.
fn resolve_palette(
    which: &'static str,
    override_palette: Option<&[String]>,
    start: &str,
    end: &str,
    len: usize,
) -> Result<Vec<String>, FlowError> {
    match override_palette.filter(|palette| !palette.is_empty()) {
        Some(palette) => {
            if palette.len() != len {
                return Err(FlowError::PaletteLength {
                    which,
                    expected: len,
                    actual: palette.len(),
                });
            }
            Ok(palette.to_vec())
        }
        None => Ok(gradient_palette(start, end, len)?),
    }
}

/// Draws every box, label, connector, and junction into layered output.
///
/// All coordinates are produced in content pixel space, where the main
/// column's center line is `x = 0` and `y = 0` is the top content edge.
fn draw_scene(
    processed: &[ProcessedNode],
    layout: &Layout,
    style: &StyleConfig,
    scale: Scale,
    drawer: &mut ConnectorDrawer,
) -> Result<LayeredOutput, FlowError> {
    let geometry = style.box_geometry();
    let text = style.text();
    let lines = style.lines();
    let ink = Color::default();

    let box_stroke = StrokeDefinition::new(ink, scale.font_px(lines.box_linewidth()));
    let connector_stroke = StrokeDefinition::new(ink, scale.font_px(lines.connector_linewidth()));
    let head_size = scale.font_px(HEAD_LENGTH_RATIO * lines.arrow_mutation_scale());
    let flow_connector = ConnectorDefinition::new(connector_stroke, HeadStyle::Open, head_size);
    let branch_connector = ConnectorDefinition::new(connector_stroke, HeadStyle::Filled, head_size);
    let junction = JunctionDefinition::new(scale.px(lines.junction_radius()), ink);

    // Box edges are inflated beyond their laid-out bounds, like the text
    // padding of a rounded box style.
    let pad = Insets::uniform(geometry.pad_factor());
    let corner_radius = scale.px(geometry.corner_radius());

    let mut title_text = TextDefinition::new();
    title_text.set_font_size(scale.font_px(text.fontsize_title()));
    title_text.set_line_height(scale.px(geometry.title_line_height()));
    title_text.set_weight(FontWeight::Bold);
    title_text.set_anchor(TextAnchor::Top);

    let mut body_text = TextDefinition::new();
    body_text.set_font_size(scale.font_px(text.fontsize_main()));
    body_text.set_line_height(scale.px(geometry.body_line_height()));
    body_text.set_anchor(TextAnchor::Top);

    let mut exclusion_text = TextDefinition::new();
    exclusion_text.set_font_size(scale.font_px(text.fontsize_exclusion()));
    exclusion_text.set_line_height(scale.font_px(text.fontsize_exclusion()) * LINE_SPACING);
    exclusion_text.set_style(FontStyle::Italic);
    exclusion_text.set_anchor(TextAnchor::Middle);

    let mut output = LayeredOutput::new();
    for (index, node) in processed.iter().enumerate() {
        let bounds = layout.main_boxes()[index];
        let fill = Color::new(node.color())?;
        let shape = BoxDefinition::new(fill, box_stroke, corner_radius);
        output.add_to_layer(
            RenderLayer::Box,
            shape.render_at(bounds.add_padding(pad).scale(scale.dpi)),
        );

        let title_position = Point::new(
            bounds.center().x(),
            bounds.min_y() + geometry.text_top_padding(),
        );
        output.add_to_layer(
            RenderLayer::Text,
            TextBlock::new(&title_text, node.title_lines())
                .render_at(title_position.scale(scale.dpi)),
        );

        let body_offset = geometry.text_top_padding()
            + geometry.title_line_height() * node.title_lines().len().max(1) as f32
            + geometry.title_body_gap();
        let body_position = Point::new(bounds.center().x(), bounds.min_y() + body_offset);
        output.add_to_layer(
            RenderLayer::Text,
            TextBlock::new(&body_text, node.body_lines())
                .render_at(body_position.scale(scale.dpi)),
        );

        if index == 0 {
            continue;
        }

        let previous = layout.main_boxes()[index - 1];
        let source = Point::new(previous.center().x(), previous.max_y());
        let destination = Point::new(bounds.center().x(), bounds.min_y());
        output.add_to_layer(
            RenderLayer::Connector,
            drawer.draw(
                &flow_connector,
                source.scale(scale.dpi),
                destination.scale(scale.dpi),
            ),
        );

        if let Some(exclusion) = layout.exclusion_boxes()[index] {
            let branch_start = Point::new(previous.center().x(), exclusion.center().y());
            // The arrow stops at the padded left edge of the exclusion box.
            let branch_end = Point::new(
                exclusion.min_x() - geometry.pad_factor(),
                exclusion.center().y(),
            );
            output.add_to_layer(
                RenderLayer::Junction,
                junction.render_at(branch_start.scale(scale.dpi)),
            );
            output.add_to_layer(
                RenderLayer::Connector,
                drawer.draw(
                    &branch_connector,
                    branch_start.scale(scale.dpi),
                    branch_end.scale(scale.dpi),
                ),
            );

            let exclusion_fill = Color::new(node.exclusion_color())?;
            let exclusion_shape = BoxDefinition::new(exclusion_fill, box_stroke, corner_radius);
            output.add_to_layer(
                RenderLayer::Box,
                exclusion_shape.render_at(exclusion.add_padding(pad).scale(scale.dpi)),
            );
            output.add_to_layer(
                RenderLayer::Text,
                TextBlock::new(&exclusion_text, node.exclusion_lines())
                    .render_at(exclusion.center().scale(scale.dpi)),
            );
        }
    }

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn three_steps() -> Vec<CohortNode> {
        vec![
            CohortNode::new(100).with_heading("Assessed for eligibility"),
            CohortNode::new(80).with_exclusion_description("Not eligible"),
            CohortNode::new(60).with_exclusion_description("Withdrew"),
        ]
    }

    fn quiet_options() -> RenderOptions {
        // No image base name, so nothing is written to disk.
        RenderOptions::new()
    }

    #[test]
    fn test_three_step_scenario_structure() {
        let rendering = render_cohort_flow(&three_steps(), quiet_options()).unwrap();
        let svg_text = rendering.to_svg_string();

        // Three step boxes, two exclusion boxes, one background rectangle.
        assert_eq!(svg_text.matches("rx=").count(), 5);
        assert_eq!(svg_text.matches("<rect").count(), 6);
        // Headings, bodies, and exclusion labels.
        assert_eq!(svg_text.matches("<text").count(), 8);
        // Two flow arrows and two branch arrows.
        assert_eq!(svg_text.matches("marker-end").count(), 4);
        assert_eq!(svg_text.matches("<circle").count(), 2);

        for layer in ["connector", "box", "junction", "text"] {
            assert!(
                svg_text.contains(&format!("data-layer=\"{layer}\"")),
                "missing layer {layer}"
            );
        }
        assert!(svg_text.contains("arrowhead-open"));
        assert!(svg_text.contains("arrowhead-filled"));
        assert!(svg_text.contains("(n = 100)"));
        assert!(svg_text.contains("(n = 20)"));
        assert!(svg_text.contains("Not eligible"));
    }

    #[test]
    fn test_single_node_has_no_connectors() {
        let rendering =
            render_cohort_flow(&[CohortNode::new(42)], quiet_options()).unwrap();
        let svg_text = rendering.to_svg_string();

        assert_eq!(svg_text.matches("rx=").count(), 1);
        assert!(!svg_text.contains("marker-end"));
        assert!(!svg_text.contains("<defs"));
        assert!(!svg_text.contains("<circle"));
        assert!(svg_text.contains("Step 1"));
    }

    #[test]
    fn test_empty_input_is_rejected() {
        let err = render_cohort_flow(&[], quiet_options()).unwrap_err();
        assert!(matches!(err, FlowError::EmptyInput));
    }

    #[test]
    fn test_increasing_counts_are_rejected() {
        let nodes = [CohortNode::new(50), CohortNode::new(100)];
        let err = render_cohort_flow(&nodes, quiet_options()).unwrap_err();
        assert!(matches!(err, FlowError::Ordering { index: 1, .. }));
    }

    #[test]
    fn test_figure_title_adds_band_and_text() {
        let without = render_cohort_flow(&three_steps(), quiet_options()).unwrap();
        let with = render_cohort_flow(
            &three_steps(),
            quiet_options().with_figure_title("Trial enrollment"),
        )
        .unwrap();

        let with_text = with.to_svg_string();
        assert!(with_text.contains("Trial enrollment"));
        assert!(with_text.contains("font-weight=\"bold\""));
        assert_eq!(
            with_text.matches("<text").count(),
            without.to_svg_string().matches("<text").count() + 1
        );
    }

    #[test]
    fn test_blank_figure_title_is_ignored() {
        let rendering = render_cohort_flow(
            &three_steps(),
            quiet_options().with_figure_title("   "),
        )
        .unwrap();
        assert_eq!(rendering.to_svg_string().matches("<text").count(), 8);
    }

    #[test]
    fn test_transparent_skips_background() {
        let opaque = render_cohort_flow(&three_steps(), quiet_options()).unwrap();
        let transparent = render_cohort_flow(
            &three_steps(),
            quiet_options().with_transparent(true),
        )
        .unwrap();

        assert_eq!(opaque.to_svg_string().matches("<rect").count(), 6);
        assert_eq!(transparent.to_svg_string().matches("<rect").count(), 5);
    }

    #[test]
    fn test_explicit_figure_size_sets_canvas() {
        let rendering = render_cohort_flow(
            &three_steps(),
            quiet_options().with_figure_size(Size::new(30.0, 20.0)),
        )
        .unwrap();
        // 30 by 20 layout units at 200 dpi.
        let svg_text = rendering.to_svg_string();
        assert!(svg_text.contains("width=\"6000\""));
        assert!(svg_text.contains("height=\"4000\""));
    }

    #[test]
    fn test_dpi_override_scales_document() {
        let rendering = render_cohort_flow(
            &three_steps(),
            quiet_options()
                .with_dpi(100.0)
                .with_figure_size(Size::new(30.0, 20.0)),
        )
        .unwrap();
        assert!(rendering.to_svg_string().contains("width=\"3000\""));
    }

    #[test]
    fn test_borrowed_surface_renders_fragment() {
        let rendering = render_cohort_flow(
            &three_steps(),
            quiet_options().with_drawing_area(crate::surface::DrawingArea::new()),
        )
        .unwrap();

        assert!(matches!(rendering, Rendering::Borrowed { .. }));
        let svg_text = rendering.to_svg_string();
        assert!(svg_text.starts_with("<g"));
        assert!(!svg_text.contains("<svg"));
        // No background or canvas sizing on a borrowed surface.
        assert_eq!(svg_text.matches("<rect").count(), 5);
        assert!(svg_text.contains("data-layer=\"box\""));
        assert!(svg_text.contains("arrowhead-filled"));
    }

    #[test]
    fn test_palette_override_must_match_length() {
        let err = render_cohort_flow(
            &three_steps(),
            quiet_options().with_main_palette(vec!["#112233".to_string()]),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            FlowError::PaletteLength {
                which: "main",
                expected: 3,
                actual: 1,
            }
        ));
    }

    #[test]
    fn test_empty_palette_override_is_ignored() {
        let rendering = render_cohort_flow(
            &three_steps(),
            quiet_options().with_main_palette(Vec::new()),
        )
        .unwrap();
        assert!(rendering.document().is_some());
    }

    #[test]
    fn test_palette_override_fills_boxes() {
        let rendering = render_cohort_flow(
            &three_steps(),
            quiet_options().with_main_palette(vec![
                "#101010".to_string(),
                "#202020".to_string(),
                "#303030".to_string(),
            ]),
        )
        .unwrap();

        let svg_text = rendering.to_svg_string();
        assert!(svg_text.contains("fill=\"#101010\""));
        assert!(svg_text.contains("fill=\"#303030\""));
    }

    #[test]
    fn test_unknown_style_is_reported() {
        let err = render_cohort_flow(
            &three_steps(),
            quiet_options().with_style("nebula"),
        )
        .unwrap_err();
        assert!(matches!(err, FlowError::UnknownStyle { .. }));
    }
}
