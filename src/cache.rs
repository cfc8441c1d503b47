//! Render cache: the in-memory mirror of what the canvas shows.
//!
//! Holds the displayed image handle, where it is placed, and a snapshot of its
//! tags, so the canvas can be repainted on every pointer move without a
//! storage round trip. It is never the source of truth: any persistence write
//! must be followed by a refresh from the store.
//!
//! All cache mutation goes through this type.

#[cfg(test)]
#[path = "cache_test.rs"]
mod cache_test;

use crate::config::TagStyle;
use crate::doc::{ImageRecord, Tag};
use crate::error::Result;
use crate::geometry::CanvasParameters;
use crate::render;
use crate::services::ImageDecoder;
use crate::surface::Surface;

/// Displayed image and tags, redrawable at any time.
#[derive(Debug)]
pub struct RenderCache<I> {
    image: Option<I>,
    parameters: CanvasParameters,
    tags: Vec<Tag>,
}

impl<I> Default for RenderCache<I> {
    fn default() -> Self {
        Self {
            image: None,
            parameters: CanvasParameters::ZERO,
            tags: Vec::new(),
        }
    }
}

impl<I> RenderCache<I> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn image(&self) -> Option<&I> {
        self.image.as_ref()
    }

    #[must_use]
    pub fn parameters(&self) -> CanvasParameters {
        self.parameters
    }

    #[must_use]
    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    /// Replace the displayed image and its placement.
    pub fn set_image(&mut self, image: I, parameters: CanvasParameters) {
        self.image = Some(image);
        self.parameters = parameters;
    }

    /// Replace the tag snapshot with a copy of `tags`.
    pub fn set_tags(&mut self, tags: &[Tag]) {
        self.tags = tags.to_vec();
    }

    /// Forget the image; nothing is drawn until a new one is set.
    pub fn reset_image(&mut self) {
        self.image = None;
        self.parameters = CanvasParameters::ZERO;
    }

    pub fn reset_tags(&mut self) {
        self.tags.clear();
    }

    /// Decode `record`'s image (or adopt `pre_decoded`), cache it, and redraw.
    ///
    /// Decoding happens before the cache is touched, so a decode failure
    /// leaves both the cache and the canvas as they were.
    ///
    /// # Errors
    ///
    /// Propagates decode and surface failures.
    pub async fn draw_tagged_image<R, D, S>(
        &mut self,
        surface: &mut S,
        decoder: &D,
        style: &TagStyle,
        record: &R,
        pre_decoded: Option<I>,
    ) -> Result<()>
    where
        R: ImageRecord,
        D: ImageDecoder<Image = I>,
        S: Surface<Image = I>,
    {
        let image = match pre_decoded {
            Some(image) => image,
            None => decoder.decode(&record.image().data_url).await?,
        };
        self.set_image(image, record.image().parameters());
        self.set_tags(record.tags());
        self.redraw(surface, style)
    }

    /// Clear the canvas and replay the cached image and every cached tag.
    ///
    /// Always a full repaint, so calling it repeatedly never accumulates
    /// artifacts.
    ///
    /// # Errors
    ///
    /// Propagates surface failures.
    pub fn redraw<S>(&self, surface: &mut S, style: &TagStyle) -> Result<()>
    where
        S: Surface<Image = I>,
    {
        render::clear(surface);
        if let Some(image) = &self.image {
            render::draw_image(surface, image, self.parameters)?;
        }
        for tag in &self.tags {
            render::redraw_tag(surface, style, tag)?;
        }
        Ok(())
    }
}
