//! [`Surface`] over an `HtmlCanvasElement` and its 2D context.
//!
//! The canvas is sized once at startup to a square covering the larger screen
//! side and CSS scales it down, so the display size is read back from
//! the element on every call.

use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement, Window};

use super::dom_error;
use crate::error::{Error, Result};
use crate::geometry::{CanvasParameters, Dimensions, Point, square_canvas_side};
use crate::surface::Surface;

/// A canvas element and its 2D context.
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    /// Bind to `canvas`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Surface`] when the browser has no 2D context for it.
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self> {
        let ctx = canvas
            .get_context("2d")
            .map_err(|e| dom_error(&e))?
            .ok_or_else(|| Error::Surface("2d context unavailable".to_owned()))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| Error::Surface("context is not a CanvasRenderingContext2d".to_owned()))?;
        Ok(Self { canvas, ctx })
    }

    #[must_use]
    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    /// Make the canvas a square as large as the larger available screen side.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Dom`] when the screen cannot be queried.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn fit_to_screen(&self, window: &Window) -> Result<()> {
        let screen = window.screen().map_err(|e| dom_error(&e))?;
        let width = screen.avail_width().map_err(|e| dom_error(&e))?;
        let height = screen.avail_height().map_err(|e| dom_error(&e))?;
        let side = square_canvas_side(f64::from(width), f64::from(height)).max(0.0) as u32;
        self.canvas.set_width(side);
        self.canvas.set_height(side);
        log::debug!("surface: canvas is {side}x{side}");
        Ok(())
    }
}

impl Surface for CanvasSurface {
    type Image = HtmlImageElement;

    fn size(&self) -> Dimensions {
        Dimensions::new(f64::from(self.canvas.width()), f64::from(self.canvas.height()))
    }

    fn display_size(&self) -> Dimensions {
        Dimensions::new(f64::from(self.canvas.client_width()), f64::from(self.canvas.client_height()))
    }

    fn clear_rect(&mut self, rect: CanvasParameters) {
        self.ctx.clear_rect(rect.x, rect.y, rect.width, rect.height);
    }

    fn draw_image(&mut self, image: &HtmlImageElement, at: CanvasParameters) -> Result<()> {
        self.ctx
            .draw_image_with_html_image_element_and_dw_and_dh(image, at.x, at.y, at.width, at.height)
            .map_err(|e| Error::Surface(format!("drawImage failed: {e:?}")))
    }

    fn begin_path(&mut self) {
        self.ctx.begin_path();
    }

    fn close_path(&mut self) {
        self.ctx.close_path();
    }

    fn rect(&mut self, rect: CanvasParameters) {
        self.ctx.rect(rect.x, rect.y, rect.width, rect.height);
    }

    fn stroke(&mut self) {
        self.ctx.stroke();
    }

    fn fill(&mut self) {
        self.ctx.fill();
    }

    fn set_stroke_style(&mut self, color: &str) {
        self.ctx.set_stroke_style_str(color);
    }

    fn set_fill_style(&mut self, color: &str) {
        self.ctx.set_fill_style_str(color);
    }

    fn set_line_width(&mut self, width: f64) {
        self.ctx.set_line_width(width);
    }

    fn set_font(&mut self, font: &str) {
        self.ctx.set_font(font);
    }

    fn fill_text(&mut self, text: &str, at: Point) -> Result<()> {
        self.ctx
            .fill_text(text, at.x, at.y)
            .map_err(|e| Error::Surface(format!("fillText failed: {e:?}")))
    }
}
