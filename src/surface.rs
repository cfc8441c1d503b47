//! The 2D drawing context the tagger renders into.
//!
//! The browser binds this to a `CanvasRenderingContext2d`; tests bind it to a
//! recorder. Implementations hold no tagger state of their own, so every
//! frame is a full clear-and-replay driven from the render cache.

use crate::error::Result;
use crate::geometry::{CanvasParameters, Dimensions, Point};

/// A fixed-size canvas with a 2D drawing context.
pub trait Surface {
    /// Decoded, drawable image handle.
    type Image;

    /// Absolute canvas size in canvas pixels.
    fn size(&self) -> Dimensions;

    /// On-screen size in CSS pixels.
    fn display_size(&self) -> Dimensions;

    fn clear_rect(&mut self, rect: CanvasParameters);

    /// Blit `image` scaled into `at`.
    ///
    /// # Errors
    ///
    /// Returns an error if the context rejects the image.
    fn draw_image(&mut self, image: &Self::Image, at: CanvasParameters) -> Result<()>;

    fn begin_path(&mut self);

    fn close_path(&mut self);

    /// Add a rectangle to the current path.
    fn rect(&mut self, rect: CanvasParameters);

    fn stroke(&mut self);

    fn fill(&mut self);

    fn set_stroke_style(&mut self, color: &str);

    fn set_fill_style(&mut self, color: &str);

    fn set_line_width(&mut self, width: f64);

    fn set_font(&mut self, font: &str);

    /// Draw `text` with its baseline starting at `at`.
    ///
    /// # Errors
    ///
    /// Returns an error if the context fails to render text.
    fn fill_text(&mut self, text: &str, at: Point) -> Result<()>;
}
