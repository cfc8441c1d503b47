//! Parsing and building of base64 image data URLs.
//!
//! Images are persisted self-contained as `data:image/<fmt>;base64,<payload>`.
//! Only the raster formats the tagger accepts on upload are recognised.
//! Payload decoding is native-only; in the browser `<img>` does it.

#[cfg(test)]
#[path = "data_url_test.rs"]
mod data_url_test;

#[cfg(not(target_arch = "wasm32"))]
use base64::Engine as _;
#[cfg(not(target_arch = "wasm32"))]
use base64::engine::general_purpose::STANDARD;

use crate::error::{Error, Result};

/// Raster formats accepted for tagging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Jpeg,
    Png,
    Gif,
}

impl ImageFormat {
    /// The mime type used in the data URL header.
    #[must_use]
    pub fn mime(self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Gif => "image/gif",
        }
    }

    fn from_mime(mime: &str) -> Option<Self> {
        match mime {
            "image/jpeg" | "image/jpg" => Some(Self::Jpeg),
            "image/png" => Some(Self::Png),
            "image/gif" => Some(Self::Gif),
            _ => None,
        }
    }
}

/// A validated image data URL borrowing its payload from the source string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataUrl<'a> {
    pub format: ImageFormat,
    pub payload: &'a str,
}

impl<'a> DataUrl<'a> {
    /// Split and validate a data URL header.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDataUrl`] if the scheme, base64 marker, or
    /// payload is missing, and [`Error::UnsupportedFormat`] for any mime type
    /// other than jpeg, png, or gif.
    pub fn parse(source: &'a str) -> Result<Self> {
        let rest = source
            .strip_prefix("data:")
            .ok_or_else(|| Error::InvalidDataUrl("missing data: scheme".to_owned()))?;
        let (header, payload) = rest
            .split_once(',')
            .ok_or_else(|| Error::InvalidDataUrl("missing payload separator".to_owned()))?;
        let mime = header
            .strip_suffix(";base64")
            .ok_or_else(|| Error::InvalidDataUrl("payload is not base64".to_owned()))?;
        let format = ImageFormat::from_mime(mime).ok_or_else(|| Error::UnsupportedFormat(mime.to_owned()))?;
        if payload.is_empty() {
            return Err(Error::InvalidDataUrl("empty payload".to_owned()));
        }
        Ok(Self { format, payload })
    }

    /// Decode the base64 payload into raw image bytes.
    ///
    /// Native builds only; the browser hands the whole URL to `<img>`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDataUrl`] when the payload is not valid base64.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn bytes(&self) -> Result<Vec<u8>> {
        STANDARD
            .decode(self.payload)
            .map_err(|e| Error::InvalidDataUrl(format!("bad base64 payload: {e}")))
    }
}

/// Build a data URL for `bytes` in the given format.
#[cfg(not(target_arch = "wasm32"))]
#[must_use]
pub fn encode(format: ImageFormat, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", format.mime(), STANDARD.encode(bytes))
}
