//! Document model: tagged images, their tags, and pure tag-list transforms.
//!
//! A [`TaggedImage`] pairs one encoded image with zero or more [`Tag`]s. Its
//! `id` is assigned by the store and never touched here. Tags are addressed by
//! position, so insertion order is display order and every edit produces a new
//! list rather than patching in place.
//!
//! Records serialize to the same camelCase JSON shape the browser store keeps.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use serde::{Deserialize, Serialize};

use crate::consts::DEFAULT_TAG_PREFIX;
use crate::error::{Error, Result};
use crate::geometry::CanvasParameters;

/// Store-assigned identifier for a tagged image.
pub type ImageId = u32;

/// The rectangle enclosing a tagged region, in canvas pixels.
pub type TagBox = CanvasParameters;

/// A tag's label and the canvas position it is drawn at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagAnnotation {
    pub text: String,
    pub x: f64,
    pub y: f64,
}

/// One annotated region of an image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    pub annotation: TagAnnotation,
    #[serde(rename = "box")]
    pub tag_box: TagBox,
}

/// An encoded image together with its placement on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    pub data_url: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Image {
    /// Where and how large the image is drawn.
    #[must_use]
    pub fn parameters(&self) -> CanvasParameters {
        CanvasParameters::new(self.x, self.y, self.width, self.height)
    }
}

/// A persisted image and its tags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaggedImage {
    pub id: ImageId,
    pub image: Image,
    pub tags: Vec<Tag>,
}

/// A tagged image that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftTaggedImage {
    pub image: Image,
    pub tags: Vec<Tag>,
}

impl DraftTaggedImage {
    /// Attach the id handed out by the store.
    #[must_use]
    pub fn with_id(self, id: ImageId) -> TaggedImage {
        TaggedImage { id, image: self.image, tags: self.tags }
    }
}

/// Read access shared by persisted and draft records.
pub trait ImageRecord {
    fn image(&self) -> &Image;
    fn tags(&self) -> &[Tag];
}

impl ImageRecord for TaggedImage {
    fn image(&self) -> &Image {
        &self.image
    }

    fn tags(&self) -> &[Tag] {
        &self.tags
    }
}

impl ImageRecord for DraftTaggedImage {
    fn image(&self) -> &Image {
        &self.image
    }

    fn tags(&self) -> &[Tag] {
        &self.tags
    }
}

/// A pure edit to a tag list.
#[derive(Debug, Clone, PartialEq)]
pub enum TagEdit {
    /// Add a tag after all existing ones.
    Append(Tag),
    /// Replace the annotation text of the tag at `index`, keeping its position.
    Rename { index: usize, text: String },
    /// Drop the tag at `index`; later tags shift down by one.
    Remove(usize),
    /// Drop every tag.
    Clear,
}

impl TagEdit {
    /// Produce the edited list, leaving `tags` untouched.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TagIndexOutOfRange`] when a `Rename` or `Remove`
    /// index does not address an existing tag.
    pub fn apply(self, tags: &[Tag]) -> Result<Vec<Tag>> {
        match self {
            Self::Append(tag) => {
                let mut out = tags.to_vec();
                out.push(tag);
                Ok(out)
            }
            Self::Rename { index, text } => {
                check_index(index, tags.len())?;
                let mut out = tags.to_vec();
                out[index].annotation.text = text;
                Ok(out)
            }
            Self::Remove(index) => {
                check_index(index, tags.len())?;
                Ok(tags
                    .iter()
                    .enumerate()
                    .filter(|(i, _)| *i != index)
                    .map(|(_, tag)| tag.clone())
                    .collect())
            }
            Self::Clear => Ok(Vec::new()),
        }
    }
}

fn check_index(index: usize, len: usize) -> Result<()> {
    if index < len {
        Ok(())
    } else {
        Err(Error::TagIndexOutOfRange { index, len })
    }
}

/// Number embedded in a default annotation (`"Untitled tag 7"` -> `7`).
///
/// Only texts starting with the default prefix count. The number is taken
/// from the first occurrence of the prefix followed by digits anywhere in
/// the text; numbers too large for `u64` saturate.
#[must_use]
pub fn default_tag_number(text: &str) -> Option<u64> {
    if !text.starts_with(DEFAULT_TAG_PREFIX.trim_end()) {
        return None;
    }
    text.match_indices(DEFAULT_TAG_PREFIX).find_map(|(at, _)| {
        let rest = &text[at + DEFAULT_TAG_PREFIX.len()..];
        let digits = &rest[..rest.bytes().take_while(u8::is_ascii_digit).count()];
        (!digits.is_empty()).then(|| digits.parse::<u64>().unwrap_or(u64::MAX))
    })
}

/// Next default annotation: one past the largest default number in `tags`.
///
/// Scans the whole list every time, since tags may have been renamed or
/// removed since the last default was handed out.
#[must_use]
pub fn next_default_annotation(tags: &[Tag]) -> String {
    let next = tags
        .iter()
        .filter_map(|tag| default_tag_number(&tag.annotation.text))
        .max()
        .map_or(1, |max| max.saturating_add(1));
    format!("{DEFAULT_TAG_PREFIX}{next}")
}

/// Submitted annotation text, or the next default label when it is empty.
#[must_use]
pub fn resolve_annotation_text(submitted: String, tags: &[Tag]) -> String {
    if submitted.is_empty() {
        next_default_annotation(tags)
    } else {
        submitted
    }
}
