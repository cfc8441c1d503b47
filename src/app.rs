//! Application orchestrator.
//!
//! [`App`] owns one canvas and everything drawn on it: the surface, the
//! persistence store, the host services, the render cache, and the gesture
//! workflow. Every UI entry point (pointer events, animation frames, the
//! upload input, the image browser and tag sidebar buttons) lands on a method
//! here. Input handlers are synchronous; anything that waits on the store, the
//! decoder, a timer, or the user is `async` and ends in a full re-render.
//!
//! State lives in the value, not in globals, so several canvases (or tests)
//! can coexist.

#[cfg(test)]
#[path = "app_test.rs"]
mod app_test;

use crate::cache::RenderCache;
use crate::config::TaggerConfig;
use crate::data_url::DataUrl;
use crate::doc::{DraftTaggedImage, Image, ImageId, Tag, TagAnnotation, TagEdit, TaggedImage, resolve_annotation_text};
use crate::error::{Error, Result};
use crate::gallery::{RenderParameters, next_current_after_delete};
use crate::geometry::{SelectionCoordinates, compute_image_canvas_parameters};
use crate::input::PointerInput;
use crate::render;
use crate::services::Host;
use crate::store::{TaggedImageStore, modify_tags};
use crate::surface::Surface;
use crate::workflow::{Action, TagWorkflow};

/// How a completed pointer gesture ended.
#[derive(Debug, Clone, PartialEq)]
pub enum GestureOutcome {
    /// No gesture was in progress.
    Ignored,
    /// Too short or too small to be a selection.
    Rejected,
    /// The user dismissed the annotation prompt.
    Cancelled,
    /// A tag was persisted.
    Tagged(Tag),
}

/// One tagging canvas and its collaborators.
pub struct App<C: Surface, S, H> {
    surface: C,
    store: S,
    host: H,
    config: TaggerConfig,
    cache: RenderCache<C::Image>,
    workflow: TagWorkflow,
    params: RenderParameters,
}

impl<C, S, H> App<C, S, H>
where
    C: Surface,
    S: TaggedImageStore,
    H: Host<Image = C::Image>,
{
    #[must_use]
    pub fn new(surface: C, store: S, host: H, config: TaggerConfig) -> Self {
        let workflow = TagWorkflow::new(config.thresholds);
        Self {
            surface,
            store,
            host,
            config,
            cache: RenderCache::new(),
            workflow,
            params: RenderParameters::default(),
        }
    }

    #[must_use]
    pub fn surface(&self) -> &C {
        &self.surface
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    #[must_use]
    pub fn host(&self) -> &H {
        &self.host
    }

    #[must_use]
    pub fn config(&self) -> &TaggerConfig {
        &self.config
    }

    #[must_use]
    pub fn cache(&self) -> &RenderCache<C::Image> {
        &self.cache
    }

    #[must_use]
    pub fn workflow(&self) -> &TagWorkflow {
        &self.workflow
    }

    /// Parameters of the last successful render.
    #[must_use]
    pub fn render_parameters(&self) -> RenderParameters {
        self.params
    }

    #[must_use]
    pub fn displayed_id(&self) -> Option<ImageId> {
        self.params.displayed_id
    }

    // =============================================================
    // Rendering
    // =============================================================

    /// Re-render the image browser, canvas, and tag sidebar from the store.
    ///
    /// # Errors
    ///
    /// Propagates store, decode, surface, and view failures. Fetching and
    /// decoding happen before the canvas is touched, so on those failures
    /// the previous render stays on screen.
    pub async fn render_app(&mut self) -> Result<()> {
        self.refresh(None).await
    }

    async fn refresh(&mut self, uploaded: Option<(ImageId, C::Image)>) -> Result<()> {
        let images = self.store.get_all().await?;
        let params = RenderParameters::compute(&images, self.store.current_id());
        let style = &self.config.style;

        match params.displayed(&images) {
            Some(record) => {
                let image = match uploaded {
                    Some((id, image)) if id == record.id => image,
                    _ => self.host.decode(&record.image.data_url).await?,
                };
                self.cache
                    .draw_tagged_image(&mut self.surface, &self.host, style, record, Some(image))
                    .await?;
            }
            None => {
                self.cache.reset_image();
                self.cache.reset_tags();
                self.cache.redraw(&mut self.surface, style)?;
            }
        }

        if params.displayed_id != self.store.current_id() {
            self.store.set_current_id(params.displayed_id);
        }
        self.params = params;
        log::debug!("app: rendered {} images, displaying {:?}", params.image_count, params.displayed_id);

        self.host.render_image_browser(&params)?;
        self.host.render_tags(self.cache.tags(), params.has_images())
    }

    // =============================================================
    // Upload
    // =============================================================

    /// Persist a newly uploaded image, fitted and centred on the canvas, and show it.
    ///
    /// # Errors
    ///
    /// Returns data URL or decode errors before anything is stored, and
    /// propagates store and render failures afterwards.
    pub async fn upload_image(&mut self, data_url: String) -> Result<ImageId> {
        DataUrl::parse(&data_url)?;
        let decoded = self.host.decode(&data_url).await?;
        let placement = compute_image_canvas_parameters(self.host.dimensions(&decoded), self.surface.size());

        let draft = DraftTaggedImage {
            image: Image {
                data_url,
                x: placement.x,
                y: placement.y,
                width: placement.width,
                height: placement.height,
            },
            tags: Vec::new(),
        };
        let id = self.store.create(draft).await?;
        log::info!("app: uploaded image {id}");

        self.store.set_current_id(Some(id));
        self.refresh(Some((id, decoded))).await?;
        Ok(id)
    }

    // =============================================================
    // Pointer gestures
    // =============================================================

    /// Begin a selection. Ignored when no image is displayed.
    pub fn on_pointer_down(&mut self, input: PointerInput) -> Action {
        if !self.params.has_images() {
            return Action::None;
        }
        self.workflow.on_pointer_down(input)
    }

    /// Track the live selection; returns [`Action::FrameRequested`] when the
    /// host should schedule [`App::on_animation_frame`].
    pub fn on_pointer_move(&mut self, input: PointerInput) -> Action {
        self.workflow.on_pointer_move(input)
    }

    /// Coalesced live redraw: replay the cache, then highlight the selection.
    ///
    /// # Errors
    ///
    /// Propagates surface failures.
    pub fn on_animation_frame(&mut self) -> Result<()> {
        let Some(selection) = self.workflow.take_frame() else {
            return Ok(());
        };
        self.cache.redraw(&mut self.surface, &self.config.style)?;
        render::draw_highlight_box(&mut self.surface, &self.config.style, selection);
        Ok(())
    }

    /// Abandon a drag whose release was lost and wipe its highlight.
    ///
    /// # Errors
    ///
    /// Propagates surface failures.
    pub fn on_pointer_cancel(&mut self) -> Result<()> {
        if self.workflow.cancel() {
            self.cache.redraw(&mut self.surface, &self.config.style)?;
        }
        Ok(())
    }

    /// Finish a gesture: reject it, or confirm it, prompt for text, and persist the tag.
    ///
    /// Whatever the outcome, the workflow is back to idle afterwards. On
    /// failure the canvas is redrawn from cache so no stray highlight is left.
    ///
    /// # Errors
    ///
    /// Propagates store, surface, and render failures.
    pub async fn on_pointer_up(&mut self, input: PointerInput) -> Result<GestureOutcome> {
        match self.workflow.on_pointer_up(input) {
            Action::SelectionRejected => {
                self.cache.redraw(&mut self.surface, &self.config.style)?;
                Ok(GestureOutcome::Rejected)
            }
            Action::AnnotationRequested(selection) => {
                let result = self.complete_selection(selection).await;
                self.workflow.finish();
                if let Err(e) = &result {
                    log::error!("app: tagging failed: {e}");
                    if let Err(redraw) = self.cache.redraw(&mut self.surface, &self.config.style) {
                        log::warn!("app: redraw after failure: {redraw}");
                    }
                }
                result
            }
            Action::None | Action::FrameRequested => Ok(GestureOutcome::Ignored),
        }
    }

    async fn complete_selection(&mut self, selection: SelectionCoordinates) -> Result<GestureOutcome> {
        let Some(id) = self.params.displayed_id else {
            self.cache.redraw(&mut self.surface, &self.config.style)?;
            return Ok(GestureOutcome::Ignored);
        };

        self.cache.redraw(&mut self.surface, &self.config.style)?;
        render::draw_highlight_box(&mut self.surface, &self.config.style, selection);
        self.host.sleep(self.config.confirm_delay_ms).await;

        let Some(submitted) = self.host.request_text(&self.config.annotate_prompt, "").await else {
            log::debug!("app: annotation cancelled");
            self.cache.redraw(&mut self.surface, &self.config.style)?;
            return Ok(GestureOutcome::Cancelled);
        };

        let record = self.store.get_one(id).await?;
        let text = resolve_annotation_text(submitted, &record.tags);
        let style = &self.config.style;
        let tag_box = render::draw_tag_box(&mut self.surface, style, selection);
        let anchor = render::draw_tag_annotation(&mut self.surface, style, selection, &text)?;
        let tag = Tag {
            annotation: TagAnnotation { text, x: anchor.x, y: anchor.y },
            tag_box,
        };

        let tags = TagEdit::Append(tag.clone()).apply(&record.tags)?;
        let stored = self.store.update_one(TaggedImage { tags, ..record }, id).await?;
        log::info!("app: tagged image {id} with {:?}", tag.annotation.text);

        self.cache.set_tags(&stored.tags);
        self.render_app().await?;
        Ok(GestureOutcome::Tagged(tag))
    }

    // =============================================================
    // Tag sidebar
    // =============================================================

    /// Prompt for new text for the tag at `index`, pre-filled with its current text.
    ///
    /// Returns `false` when nothing changed (no image, or the prompt was
    /// cancelled). An empty submission becomes the next default label.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TagIndexOutOfRange`] for a bad index
    /// and propagates store and render failures.
    pub async fn edit_tag(&mut self, index: usize) -> Result<bool> {
        let Some(id) = self.params.displayed_id else {
            return Ok(false);
        };
        let current = match self.cache.tags().get(index) {
            Some(tag) => tag.annotation.text.clone(),
            None => return Err(Error::TagIndexOutOfRange { index, len: self.cache.tags().len() }),
        };

        self.host.sleep(self.config.edit_delay_ms).await;
        let Some(submitted) = self.host.request_text(&self.config.edit_prompt, &current).await else {
            return Ok(false);
        };

        self.apply_tag_edit(id, |tags| {
            let text = resolve_annotation_text(submitted, tags);
            TagEdit::Rename { index, text }.apply(tags)
        })
        .await?;
        Ok(true)
    }

    /// Delete the tag at `index`; later tags shift down.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TagIndexOutOfRange`] for a bad index
    /// and propagates store and render failures.
    pub async fn delete_tag(&mut self, index: usize) -> Result<()> {
        let Some(id) = self.params.displayed_id else {
            return Ok(());
        };
        self.apply_tag_edit(id, |tags| TagEdit::Remove(index).apply(tags)).await
    }

    /// Delete every tag on the displayed image.
    ///
    /// # Errors
    ///
    /// Propagates store and render failures.
    pub async fn clear_tags(&mut self) -> Result<()> {
        let Some(id) = self.params.displayed_id else {
            return Ok(());
        };
        self.apply_tag_edit(id, |tags| TagEdit::Clear.apply(tags)).await
    }

    async fn apply_tag_edit<F>(&mut self, id: ImageId, transform: F) -> Result<()>
    where
        F: FnOnce(&[Tag]) -> Result<Vec<Tag>>,
    {
        let stored = modify_tags(&self.store, id, transform).await?;
        self.cache.set_tags(&stored.tags);
        self.render_app().await
    }

    // =============================================================
    // Image browser
    // =============================================================

    /// Show the previous image, if any.
    ///
    /// # Errors
    ///
    /// Propagates render failures.
    pub async fn show_previous(&mut self) -> Result<()> {
        self.show(self.params.previous_id).await
    }

    /// Show the next image, if any.
    ///
    /// # Errors
    ///
    /// Propagates render failures.
    pub async fn show_next(&mut self) -> Result<()> {
        self.show(self.params.next_id).await
    }

    async fn show(&mut self, target: Option<ImageId>) -> Result<()> {
        let Some(id) = target else {
            return Ok(());
        };
        self.store.set_current_id(Some(id));
        self.render_app().await
    }

    /// Delete the displayed image and show its predecessor (or successor).
    ///
    /// # Errors
    ///
    /// Propagates store and render failures.
    pub async fn delete_image(&mut self) -> Result<()> {
        let Some(id) = self.params.displayed_id else {
            return Ok(());
        };
        self.store.delete_one(id).await?;
        log::info!("app: deleted image {id}");

        self.store
            .set_current_id(next_current_after_delete(self.params.previous_id, self.params.next_id));
        self.render_app().await
    }
}
