//! Image browser data: which stored image is shown, and its neighbours.
//!
//! The last viewed image id survives sessions; if it no longer exists the
//! first stored image is shown instead. Previous/next are computed from the
//! image actually displayed so navigation always works from what is on screen.

#[cfg(test)]
#[path = "gallery_test.rs"]
mod gallery_test;

use crate::doc::{ImageId, TaggedImage};

/// Everything the image browser, canvas, and sidebar need for one render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderParameters {
    pub image_count: usize,
    /// Position of the displayed image in ascending-id order.
    pub displayed_index: Option<usize>,
    pub displayed_id: Option<ImageId>,
    pub previous_id: Option<ImageId>,
    pub next_id: Option<ImageId>,
}

impl RenderParameters {
    /// Resolve the displayed image from the saved pointer, falling back to the first.
    #[must_use]
    pub fn compute(images: &[TaggedImage], saved_id: Option<ImageId>) -> Self {
        let saved_index = saved_id.and_then(|id| images.iter().position(|img| img.id == id));
        let displayed_index = saved_index.or(if images.is_empty() { None } else { Some(0) });

        let Some(index) = displayed_index else {
            return Self::default();
        };

        Self {
            image_count: images.len(),
            displayed_index: Some(index),
            displayed_id: Some(images[index].id),
            previous_id: index.checked_sub(1).map(|i| images[i].id),
            next_id: images.get(index + 1).map(|img| img.id),
        }
    }

    #[must_use]
    pub fn has_images(&self) -> bool {
        self.displayed_id.is_some()
    }

    /// The displayed record within the list these parameters were computed from.
    #[must_use]
    pub fn displayed<'a>(&self, images: &'a [TaggedImage]) -> Option<&'a TaggedImage> {
        self.displayed_index.and_then(|i| images.get(i))
    }

    /// Browser heading: `"Image 3"` or an upload hint.
    #[must_use]
    pub fn heading(&self) -> String {
        match self.displayed_id {
            Some(id) => format!("Image {id}"),
            None => "Upload an image to start".to_owned(),
        }
    }

    /// Browser pagination: `"2 of 5"` or `"No images"`.
    #[must_use]
    pub fn pagination(&self) -> String {
        match self.displayed_index {
            Some(i) => format!("{} of {}", i + 1, self.image_count),
            None => "No images".to_owned(),
        }
    }
}

/// Image to show after deleting the displayed one: previous, else next, else none.
#[must_use]
pub fn next_current_after_delete(previous: Option<ImageId>, next: Option<ImageId>) -> Option<ImageId> {
    previous.or(next)
}
