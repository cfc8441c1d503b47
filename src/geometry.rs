//! Geometry: pointer coordinates, canvas rectangles, and placement math.
//!
//! Pointer events report positions in CSS pixels, while every drawing call
//! addresses the canvas's internal pixel grid. [`AxisScales`] bridges the two.
//! All functions here are pure; identical input always yields identical output.

#[cfg(test)]
#[path = "geometry_test.rs"]
mod geometry_test;

use serde::{Deserialize, Serialize};

/// A point in either CSS-pixel (pointer) or canvas-pixel (drawing) space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// The origin, `(0, 0)`.
    pub const ORIGIN: Self = Self { x: 0.0, y: 0.0 };

    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A width/height pair.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: f64,
    pub height: f64,
}

impl Dimensions {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// A rectangle anchored at `(x, y)`.
///
/// Width and height are signed: a selection dragged up or left produces
/// negative extents, and callers must not assume otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CanvasParameters {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl CanvasParameters {
    /// The empty rectangle at the origin.
    pub const ZERO: Self = Self { x: 0.0, y: 0.0, width: 0.0, height: 0.0 };

    #[must_use]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// A rectangle covering `dims` from the origin.
    #[must_use]
    pub fn covering(dims: Dimensions) -> Self {
        Self::new(0.0, 0.0, dims.width, dims.height)
    }
}

/// The two corners of a drag, in pointer order. Not normalized.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SelectionCoordinates {
    pub start: Point,
    pub end: Point,
}

impl SelectionCoordinates {
    #[must_use]
    pub fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }
}

/// Ratio of canvas pixels to CSS pixels on each axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisScales {
    pub x_scale: f64,
    pub y_scale: f64,
}

impl Default for AxisScales {
    fn default() -> Self {
        Self { x_scale: 1.0, y_scale: 1.0 }
    }
}

impl AxisScales {
    /// Map a canvas-pixel point back to CSS pixels.
    #[must_use]
    pub fn unscale(&self, canvas_pt: Point) -> Point {
        Point {
            x: canvas_pt.x / self.x_scale,
            y: canvas_pt.y / self.y_scale,
        }
    }
}

/// Horizontal direction of a drag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Horizontal {
    Left,
    Right,
}

/// Vertical direction of a drag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Vertical {
    Up,
    Down,
}

/// Quadrant a drag moved towards, derived from its corners.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Orientation {
    pub x: Horizontal,
    pub y: Vertical,
}

/// Compute the canvas-to-display scale on each axis.
///
/// `canvas` is the canvas's absolute pixel size; `display` is its on-screen
/// CSS size. An axis with no laid-out display extent scales by `1.0`.
#[must_use]
pub fn compute_axis_scales(canvas: Dimensions, display: Dimensions) -> AxisScales {
    let ratio = |absolute: f64, scaled: f64| if scaled > 0.0 { absolute / scaled } else { 1.0 };
    AxisScales {
        x_scale: ratio(canvas.width, display.width),
        y_scale: ratio(canvas.height, display.height),
    }
}

/// Convert a selection in CSS pixels into a canvas-pixel rectangle.
#[must_use]
pub fn compute_path(scales: AxisScales, selection: SelectionCoordinates) -> CanvasParameters {
    let SelectionCoordinates { start, end } = selection;
    CanvasParameters {
        x: start.x * scales.x_scale,
        y: start.y * scales.y_scale,
        width: (end.x - start.x) * scales.x_scale,
        height: (end.y - start.y) * scales.y_scale,
    }
}

/// Classify which way a drag went on each axis. Ties resolve to `Right`/`Down`.
#[must_use]
pub fn compute_orientation(selection: SelectionCoordinates) -> Orientation {
    let SelectionCoordinates { start, end } = selection;
    let x = if end.x < start.x { Horizontal::Left } else { Horizontal::Right };
    let y = if end.y < start.y { Vertical::Up } else { Vertical::Down };
    Orientation { x, y }
}

/// Anchor for a tag's annotation: the box's top-left corner in canvas space.
///
/// A drag towards the left or up starts at the right or bottom edge, so the
/// signed extent is added back to land on the visual top-left.
#[must_use]
pub fn compute_text_placement(orientation: Orientation, path: CanvasParameters) -> Point {
    let CanvasParameters { x, y, width, height } = path;
    match (orientation.x, orientation.y) {
        (Horizontal::Left, Vertical::Up) => Point::new(x + width, y + height),
        (Horizontal::Left, Vertical::Down) => Point::new(x + width, y),
        (Horizontal::Right, Vertical::Up) => Point::new(x, y + height),
        (Horizontal::Right, Vertical::Down) => Point::new(x, y),
    }
}

/// Scale `image` so its relatively larger side matches the canvas, keeping aspect ratio.
///
/// The result never exceeds the canvas on either axis, so nothing is cropped.
/// A degenerate image yields zero dimensions.
#[must_use]
pub fn resize_image_to_fit_canvas(image: Dimensions, canvas: Dimensions) -> Dimensions {
    if image.width <= 0.0 || image.height <= 0.0 || canvas.width <= 0.0 || canvas.height <= 0.0 {
        return Dimensions::default();
    }

    let height_ratio = image.height / canvas.height;
    let width_ratio = image.width / canvas.width;

    if height_ratio >= width_ratio {
        Dimensions {
            width: image.width / height_ratio,
            height: canvas.height,
        }
    } else {
        Dimensions {
            width: canvas.width,
            height: image.height / width_ratio,
        }
    }
}

/// Top-left corner that centres `dims` on the canvas.
#[must_use]
pub fn center_image_on_canvas(dims: Dimensions, canvas: Dimensions) -> Point {
    Point {
        x: (canvas.width - dims.width) / 2.0,
        y: (canvas.height - dims.height) / 2.0,
    }
}

/// Fit and centre an image of natural size `image` on the canvas.
#[must_use]
pub fn compute_image_canvas_parameters(image: Dimensions, canvas: Dimensions) -> CanvasParameters {
    let Dimensions { width, height } = resize_image_to_fit_canvas(image, canvas);
    let Point { x, y } = center_image_on_canvas(Dimensions { width, height }, canvas);
    CanvasParameters { x, y, width, height }
}

/// Side length of the square canvas: the larger available screen dimension.
#[must_use]
pub fn square_canvas_side(available_width: f64, available_height: f64) -> f64 {
    available_width.max(available_height)
}
