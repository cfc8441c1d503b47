//! Browser implementation of the host services.
//!
//! Decoding goes through an off-DOM `<img>`, whose load and error events are
//! bridged to a future with a oneshot channel. The tag list is rendered with
//! `data-action`/`data-index` attributes; clicks are handled by one delegated
//! listener in [`super::wiring`].

use std::cell::RefCell;
use std::rc::Rc;

use futures::channel::oneshot;
use gloo_timers::future::TimeoutFuture;
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::{Document, Element, HtmlButtonElement, HtmlElement, HtmlImageElement, Window};

use super::dom_error;
use crate::doc::Tag;
use crate::error::{Error, Result};
use crate::gallery::RenderParameters;
use crate::geometry::Dimensions;
use crate::services::{AnnotationInput, ImageDecoder, Timer, View};

pub const IMAGE_ID_HEADING: &str = "image-id";
pub const IMAGE_PAGINATION: &str = "image-pagination";
pub const IMAGE_BACK_BUTTON: &str = "image-back-button";
pub const IMAGE_NEXT_BUTTON: &str = "image-next-button";
pub const IMAGE_DELETE_BUTTON: &str = "image-delete-button";
pub const TAGS_LIST: &str = "tags";
pub const TAGS_CLEAR_BUTTON: &str = "tags-clear-button";

/// Attribute naming what a click on a tag-list element does.
pub const ACTION_ATTR: &str = "data-action";
/// Attribute carrying a tag's position in the list.
pub const INDEX_ATTR: &str = "data-index";
pub const ACTION_EDIT: &str = "edit";
pub const ACTION_DELETE: &str = "delete";

/// Look up an element by id and cast it.
///
/// # Errors
///
/// Returns [`Error::Dom`] when the element is missing or of another type.
pub fn element_by_id<T: JsCast>(document: &Document, id: &str) -> Result<T> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| Error::Dom(format!("missing #{id}")))?
        .dyn_into::<T>()
        .map_err(|_| Error::Dom(format!("#{id} has an unexpected element type")))
}

/// Elements the view writes to.
struct ViewElements {
    heading: HtmlElement,
    pagination: HtmlElement,
    back: HtmlButtonElement,
    next: HtmlButtonElement,
    delete: HtmlButtonElement,
    tags: Element,
    clear: HtmlButtonElement,
}

/// The browser window as a [`crate::services::Host`].
pub struct BrowserHost {
    window: Window,
    document: Document,
    elements: ViewElements,
}

impl BrowserHost {
    /// Resolve the view's elements up front so a broken page fails at startup.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Dom`] naming the first missing element.
    pub fn new(window: Window, document: Document) -> Result<Self> {
        let elements = ViewElements {
            heading: element_by_id(&document, IMAGE_ID_HEADING)?,
            pagination: element_by_id(&document, IMAGE_PAGINATION)?,
            back: element_by_id(&document, IMAGE_BACK_BUTTON)?,
            next: element_by_id(&document, IMAGE_NEXT_BUTTON)?,
            delete: element_by_id(&document, IMAGE_DELETE_BUTTON)?,
            tags: element_by_id(&document, TAGS_LIST)?,
            clear: element_by_id(&document, TAGS_CLEAR_BUTTON)?,
        };
        Ok(Self { window, document, elements })
    }

    fn tag_item(&self, index: usize, tag: &Tag, enabled: bool) -> Result<Element> {
        let item = self.document.create_element("li").map_err(|e| dom_error(&e))?;

        let annotation = self.document.create_element("div").map_err(|e| dom_error(&e))?;
        annotation.set_class_name("tag-annotation");
        annotation.set_text_content(Some(&tag.annotation.text));
        set_attr(&annotation, INDEX_ATTR, &index.to_string())?;
        if enabled {
            set_attr(&annotation, ACTION_ATTR, ACTION_EDIT)?;
        }

        let delete: HtmlButtonElement = self
            .document
            .create_element("button")
            .map_err(|e| dom_error(&e))?
            .dyn_into()
            .map_err(|_| Error::Dom("button element expected".to_owned()))?;
        delete.set_text_content(Some("Delete"));
        delete.set_disabled(!enabled);
        set_attr(&delete, INDEX_ATTR, &index.to_string())?;
        set_attr(&delete, ACTION_ATTR, ACTION_DELETE)?;

        item.append_child(&annotation).map_err(|e| dom_error(&e))?;
        item.append_child(&delete).map_err(|e| dom_error(&e))?;
        Ok(item)
    }
}

fn set_attr(element: &Element, name: &str, value: &str) -> Result<()> {
    element.set_attribute(name, value).map_err(|e| dom_error(&e))
}

fn set_button_enabled(button: &HtmlButtonElement, enabled: bool) -> Result<()> {
    button.set_disabled(!enabled);
    button
        .style()
        .set_property("opacity", if enabled { "1" } else { "0.5" })
        .map_err(|e| dom_error(&e))
}

impl ImageDecoder for BrowserHost {
    type Image = HtmlImageElement;

    async fn decode(&self, data_url: &str) -> Result<HtmlImageElement> {
        let image = HtmlImageElement::new().map_err(|e| dom_error(&e))?;
        let (tx, rx) = oneshot::channel::<Result<()>>();
        let tx = Rc::new(RefCell::new(Some(tx)));

        let on_load = {
            let tx = Rc::clone(&tx);
            Closure::wrap(Box::new(move || settle(&tx, Ok(()))) as Box<dyn FnMut()>)
        };
        let on_error = {
            let tx = Rc::clone(&tx);
            Closure::wrap(Box::new(move || {
                settle(&tx, Err(Error::Decode("browser could not decode image".to_owned())));
            }) as Box<dyn FnMut()>)
        };
        image.set_onload(Some(on_load.as_ref().unchecked_ref()));
        image.set_onerror(Some(on_error.as_ref().unchecked_ref()));
        image.set_src(data_url);

        let outcome = rx.await;
        image.set_onload(None);
        image.set_onerror(None);

        match outcome {
            Ok(Ok(())) => Ok(image),
            Ok(Err(e)) => Err(e),
            Err(oneshot::Canceled) => Err(Error::Decode("image load abandoned".to_owned())),
        }
    }

    fn dimensions(&self, image: &HtmlImageElement) -> Dimensions {
        Dimensions::new(f64::from(image.natural_width()), f64::from(image.natural_height()))
    }
}

/// Resolve a pending load exactly once; later events are ignored.
fn settle(tx: &Rc<RefCell<Option<oneshot::Sender<Result<()>>>>>, outcome: Result<()>) {
    if let Some(tx) = tx.borrow_mut().take() {
        if tx.send(outcome).is_err() {
            log::debug!("host: image settled after its decode was dropped");
        }
    }
}

impl AnnotationInput for BrowserHost {
    async fn request_text(&self, message: &str, default: &str) -> Option<String> {
        match self.window.prompt_with_message_and_default(message, default) {
            Ok(answer) => answer,
            Err(e) => {
                log::warn!("host: prompt failed: {e:?}");
                None
            }
        }
    }
}

impl Timer for BrowserHost {
    async fn sleep(&self, ms: u32) {
        TimeoutFuture::new(ms).await;
    }
}

impl View for BrowserHost {
    fn render_image_browser(&self, params: &RenderParameters) -> Result<()> {
        let el = &self.elements;
        el.heading.set_inner_text(&params.heading());
        el.pagination.set_inner_text(&params.pagination());

        let has_images = params.has_images();
        set_button_enabled(&el.back, params.previous_id.is_some())?;
        set_button_enabled(&el.next, params.next_id.is_some())?;
        set_button_enabled(&el.delete, has_images)?;
        Ok(())
    }

    fn render_tags(&self, tags: &[Tag], enabled: bool) -> Result<()> {
        let list = &self.elements.tags;
        list.set_inner_html("");
        for (index, tag) in tags.iter().enumerate() {
            let item = self.tag_item(index, tag, enabled)?;
            list.append_child(&item).map_err(|e| dom_error(&e))?;
        }
        set_button_enabled(&self.elements.clear, enabled && !tags.is_empty())
    }
}
