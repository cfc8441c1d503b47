//! Capabilities the core borrows from its host.
//!
//! Each trait is one collaborator from the outside world: decoding images,
//! asking the user for text, waiting, and drawing the non-canvas parts of the
//! UI. The browser implements all four on one type; tests substitute doubles.
//! Everything runs on a single thread, so no future here needs to be `Send`.

use std::future::Future;

use crate::doc::Tag;
use crate::error::Result;
use crate::gallery::RenderParameters;
use crate::geometry::Dimensions;

/// Turns an encoded data URL into a drawable image handle.
pub trait ImageDecoder {
    type Image;

    /// Decode `data_url`.
    ///
    /// Implementations must resolve with an error for corrupt or unsupported
    /// data rather than never resolving.
    fn decode(&self, data_url: &str) -> impl Future<Output = Result<Self::Image>>;

    /// Natural size of a decoded image.
    fn dimensions(&self, image: &Self::Image) -> Dimensions;
}

/// Asks the user for annotation text.
pub trait AnnotationInput {
    /// `None` means the user cancelled; `Some("")` is an empty submission.
    fn request_text(&self, message: &str, default: &str) -> impl Future<Output = Option<String>>;
}

/// Cooperative delays.
pub trait Timer {
    fn sleep(&self, ms: u32) -> impl Future<Output = ()>;
}

/// Renders the image browser and tag sidebar.
pub trait View {
    /// Heading, pagination, and back/next/delete availability.
    ///
    /// # Errors
    ///
    /// Returns an error if the host UI cannot be updated.
    fn render_image_browser(&self, params: &RenderParameters) -> Result<()>;

    /// The tag list for the displayed image; `enabled` is false with no image.
    ///
    /// # Errors
    ///
    /// Returns an error if the host UI cannot be updated.
    fn render_tags(&self, tags: &[Tag], enabled: bool) -> Result<()>;
}

/// All host capabilities the orchestrator needs.
pub trait Host: ImageDecoder + AnnotationInput + Timer + View {}

impl<T: ImageDecoder + AnnotationInput + Timer + View> Host for T {}
