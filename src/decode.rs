//! Native image decoding for hosts without a browser.
//!
//! The browser decodes through an `<img>` element; everywhere else the
//! `image` crate does the work. Either way a corrupt payload resolves to
//! [`Error::Decode`] rather than never completing.

#[cfg(test)]
#[path = "decode_test.rs"]
mod decode_test;

use image::DynamicImage;

use crate::data_url::{DataUrl, ImageFormat};
use crate::error::{Error, Result};
use crate::geometry::Dimensions;
use crate::services::ImageDecoder;

/// A decoded raster and the format it came from.
#[derive(Debug, Clone)]
pub struct RasterImage {
    pub format: ImageFormat,
    pub pixels: DynamicImage,
}

impl RasterImage {
    #[must_use]
    pub fn dimensions(&self) -> Dimensions {
        Dimensions::new(f64::from(self.pixels.width()), f64::from(self.pixels.height()))
    }
}

/// [`ImageDecoder`] backed by the `image` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct RasterDecoder;

impl RasterDecoder {
    /// Decode synchronously.
    ///
    /// # Errors
    ///
    /// Returns data URL errors for malformed input and [`Error::Decode`]
    /// when the bytes are not a valid image of the declared format.
    pub fn decode_now(data_url: &str) -> Result<RasterImage> {
        let url = DataUrl::parse(data_url)?;
        let bytes = url.bytes()?;
        let pixels = image::load_from_memory_with_format(&bytes, raster_format(url.format))
            .map_err(|e| Error::Decode(e.to_string()))?;
        log::debug!("decode: {} {}x{}", url.format.mime(), pixels.width(), pixels.height());
        Ok(RasterImage { format: url.format, pixels })
    }
}

fn raster_format(format: ImageFormat) -> image::ImageFormat {
    match format {
        ImageFormat::Jpeg => image::ImageFormat::Jpeg,
        ImageFormat::Png => image::ImageFormat::Png,
        ImageFormat::Gif => image::ImageFormat::Gif,
    }
}

impl ImageDecoder for RasterDecoder {
    type Image = RasterImage;

    async fn decode(&self, data_url: &str) -> Result<RasterImage> {
        Self::decode_now(data_url)
    }

    fn dimensions(&self, image: &RasterImage) -> Dimensions {
        image.dimensions()
    }
}
