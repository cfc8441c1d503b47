//! Rendering: stateless drawing primitives over a [`Surface`].
//!
//! These functions never read or write application state. Callers pass the
//! image, tag, or live selection to draw; the render cache composes them into
//! a full frame. The `draw_*` variants take a selection in CSS pixels and
//! return the canvas-space geometry they drew, which is what gets persisted.
//! The `redraw_*` variants replay already-persisted geometry.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use crate::config::TagStyle;
use crate::doc::{Tag, TagAnnotation, TagBox};
use crate::error::Result;
use crate::geometry::{
    AxisScales, CanvasParameters, Point, SelectionCoordinates, compute_axis_scales, compute_orientation,
    compute_path, compute_text_placement,
};
use crate::surface::Surface;

/// Scales mapping pointer coordinates onto this surface.
#[must_use]
pub fn axis_scales<S: Surface>(surface: &S) -> AxisScales {
    compute_axis_scales(surface.size(), surface.display_size())
}

/// Canvas-space rectangle for a selection on this surface.
#[must_use]
pub fn selection_path<S: Surface>(surface: &S, selection: SelectionCoordinates) -> CanvasParameters {
    compute_path(axis_scales(surface), selection)
}

/// Wipe the whole canvas.
pub fn clear<S: Surface>(surface: &mut S) {
    let size = surface.size();
    surface.clear_rect(CanvasParameters::covering(size));
}

/// Blit an image at its placement.
///
/// # Errors
///
/// Propagates surface failures.
pub fn draw_image<S: Surface>(surface: &mut S, image: &S::Image, params: CanvasParameters) -> Result<()> {
    surface.draw_image(image, params)
}

/// Translucent box over a live or just-confirmed selection.
pub fn draw_highlight_box<S: Surface>(
    surface: &mut S,
    style: &TagStyle,
    selection: SelectionCoordinates,
) -> CanvasParameters {
    let path = selection_path(surface, selection);

    surface.begin_path();
    surface.rect(path);
    surface.set_line_width(style.stroke_width);
    surface.set_stroke_style(&style.highlight_color);
    surface.stroke();
    surface.set_fill_style(&style.highlight_fill);
    surface.fill();
    surface.close_path();

    path
}

/// Outline a confirmed selection as a tag box and return the box drawn.
pub fn draw_tag_box<S: Surface>(surface: &mut S, style: &TagStyle, selection: SelectionCoordinates) -> TagBox {
    let path = selection_path(surface, selection);
    redraw_tag_box(surface, style, path);
    path
}

/// Outline a persisted tag box.
pub fn redraw_tag_box<S: Surface>(surface: &mut S, style: &TagStyle, tag_box: TagBox) {
    surface.begin_path();
    surface.rect(tag_box);
    surface.set_line_width(style.stroke_width);
    surface.set_stroke_style(&style.tag_color);
    surface.stroke();
    surface.close_path();
}

/// Label a confirmed selection and return where the label is anchored.
///
/// The anchor is the box's visual top-left corner regardless of which way
/// the selection was dragged.
///
/// # Errors
///
/// Propagates surface failures.
pub fn draw_tag_annotation<S: Surface>(
    surface: &mut S,
    style: &TagStyle,
    selection: SelectionCoordinates,
    text: &str,
) -> Result<Point> {
    let path = selection_path(surface, selection);
    let anchor = compute_text_placement(compute_orientation(selection), path);
    redraw_tag_annotation(
        surface,
        style,
        &TagAnnotation { text: text.to_owned(), x: anchor.x, y: anchor.y },
    )?;
    Ok(anchor)
}

/// Draw a persisted annotation, offset inside its box by the text gap.
///
/// # Errors
///
/// Propagates surface failures.
pub fn redraw_tag_annotation<S: Surface>(surface: &mut S, style: &TagStyle, annotation: &TagAnnotation) -> Result<()> {
    surface.set_font(&style.font());
    surface.set_fill_style(&style.tag_color);
    let at = Point::new(
        annotation.x + style.text_gap,
        annotation.y + style.text_gap + style.font_size,
    );
    surface.fill_text(&annotation.text, at)
}

/// Replay one persisted tag: its box, then its label.
///
/// # Errors
///
/// Propagates surface failures.
pub fn redraw_tag<S: Surface>(surface: &mut S, style: &TagStyle, tag: &Tag) -> Result<()> {
    redraw_tag_box(surface, style, tag.tag_box);
    redraw_tag_annotation(surface, style, &tag.annotation)
}
