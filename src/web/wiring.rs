//! DOM event wiring.
//!
//! Synchronous pointer events go straight to the [`App`]. Everything that
//! awaits becomes a [`Command`] run on `spawn_local`. The app sits in an
//! `Rc<RefCell<..>>`; an event that finds it borrowed by a running command
//! is dropped, which is how gestures during a pending annotation are ignored.
//!
//! Only mouse pointers draw selections. The canvas captures the pointer on
//! press so the release arrives even outside it; a drag whose release is lost
//! anyway (app busy, or `pointercancel`) is abandoned on the next buttonless
//! move.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use futures::channel::oneshot;
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Document, Element, Event, EventTarget, FileReader, HtmlCanvasElement, HtmlInputElement, PointerEvent};

use super::dom_error;
use super::host::{
    ACTION_ATTR, ACTION_DELETE, ACTION_EDIT, BrowserHost, IMAGE_BACK_BUTTON, IMAGE_DELETE_BUTTON, IMAGE_NEXT_BUTTON,
    INDEX_ATTR, TAGS_CLEAR_BUTTON, TAGS_LIST, element_by_id,
};
use super::store::LocalStorageStore;
use super::surface::CanvasSurface;
use crate::app::App;
use crate::config::TaggerConfig;
use crate::error::{Error, Result};
use crate::input::{PointerInput, PointerKind};
use crate::workflow::{Action, Phase};

pub const CANVAS: &str = "canvas";
pub const UPLOAD_INPUT: &str = "image-upload-input";
/// `MouseEvent.buttons` bit for the primary button.
const PRIMARY_BUTTON: u16 = 1;
/// Canvas attribute holding a JSON [`TaggerConfig`] override.
pub const CONFIG_ATTR: &str = "data-config";

type TaggerApp = App<CanvasSurface, LocalStorageStore, BrowserHost>;
type SharedApp = Rc<RefCell<TaggerApp>>;

/// Async operations triggered from the DOM.
enum Command {
    Render,
    Upload(String),
    PointerUp(PointerInput),
    EditTag(usize),
    DeleteTag(usize),
    ClearTags,
    ShowPrevious,
    ShowNext,
    DeleteImage,
}

impl Command {
    fn label(&self) -> &'static str {
        match self {
            Self::Render => "render",
            Self::Upload(_) => "upload",
            Self::PointerUp(_) => "pointer up",
            Self::EditTag(_) => "edit tag",
            Self::DeleteTag(_) => "delete tag",
            Self::ClearTags => "clear tags",
            Self::ShowPrevious => "show previous",
            Self::ShowNext => "show next",
            Self::DeleteImage => "delete image",
        }
    }
}

/// Build the app from the page and attach every listener.
///
/// # Errors
///
/// Returns DOM errors for missing elements and
/// [`Error::StorageUnavailable`] when `localStorage` cannot be opened.
pub fn mount() -> Result<()> {
    let window = web_sys::window().ok_or_else(|| Error::Dom("no window".to_owned()))?;
    let document = window.document().ok_or_else(|| Error::Dom("no document".to_owned()))?;

    let canvas: HtmlCanvasElement = element_by_id(&document, CANVAS)?;
    let config = read_config(&canvas)?;
    let surface = CanvasSurface::new(canvas.clone())?;
    surface.fit_to_screen(&window)?;
    let store = LocalStorageStore::open(&window)?;
    let host = BrowserHost::new(window, document.clone())?;

    let app: SharedApp = Rc::new(RefCell::new(App::new(surface, store, host, config)));
    let frame_pending = Rc::new(Cell::new(false));

    attach_pointer_listeners(&canvas, &app, &frame_pending)?;
    attach_upload_listener(&document, &app)?;
    attach_button_listeners(&document, &app)?;
    attach_tag_list_listener(&document, &app)?;

    dispatch(&app, Command::Render);
    log::info!("canvas-tagger mounted");
    Ok(())
}

fn read_config(canvas: &HtmlCanvasElement) -> Result<TaggerConfig> {
    match canvas.get_attribute(CONFIG_ATTR) {
        Some(json) => TaggerConfig::from_json(&json),
        None => Ok(TaggerConfig::default()),
    }
}

fn listen<F>(target: &EventTarget, event: &str, handler: F) -> Result<()>
where
    F: FnMut(Event) + 'static,
{
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
    target
        .add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
        .map_err(|e| dom_error(&e))?;
    // Listeners live as long as the page.
    closure.forget();
    Ok(())
}

/// Mouse pointer events only; touch and pen input never starts a selection.
fn mouse_event(event: &Event) -> Option<&PointerEvent> {
    let event = event.dyn_ref::<PointerEvent>()?;
    if !PointerKind::from_pointer_type(&event.pointer_type()).can_select() {
        log::debug!("wiring: ignored {} input", event.pointer_type());
        return None;
    }
    Some(event)
}

fn pointer_input(event: &PointerEvent) -> PointerInput {
    PointerInput::new(f64::from(event.offset_x()), f64::from(event.offset_y()), event.time_stamp())
}

// =============================================================
// Pointer
// =============================================================

fn attach_pointer_listeners(canvas: &HtmlCanvasElement, app: &SharedApp, frame_pending: &Rc<Cell<bool>>) -> Result<()> {
    {
        let app = Rc::clone(app);
        let target = canvas.clone();
        listen(canvas, "pointerdown", move |event: Event| {
            let Some(event) = mouse_event(&event) else {
                return;
            };
            let Ok(mut tagger) = app.try_borrow_mut() else {
                log::debug!("wiring: pointerdown dropped, app busy");
                return;
            };
            tagger.on_pointer_down(pointer_input(event));
            if tagger.workflow().phase() == Phase::Dragging {
                // Releases outside the canvas still reach it.
                if let Err(e) = target.set_pointer_capture(event.pointer_id()) {
                    log::debug!("wiring: pointer capture failed: {e:?}");
                }
            }
        })?;
    }
    {
        let app = Rc::clone(app);
        let frame_pending = Rc::clone(frame_pending);
        listen(canvas, "pointermove", move |event: Event| {
            let Some(event) = mouse_event(&event) else {
                return;
            };
            let action = {
                let Ok(mut tagger) = app.try_borrow_mut() else {
                    return;
                };
                if event.buttons() & PRIMARY_BUTTON == 0 && tagger.workflow().phase() == Phase::Dragging {
                    cancel_drag(&mut tagger);
                    return;
                }
                tagger.on_pointer_move(pointer_input(event))
            };
            if action == Action::FrameRequested {
                request_frame(&app, &frame_pending);
            }
        })?;
    }
    {
        let app = Rc::clone(app);
        listen(canvas, "pointerup", move |event: Event| {
            if let Some(event) = mouse_event(&event) {
                dispatch(&app, Command::PointerUp(pointer_input(event)));
            }
        })?;
    }
    {
        let app = Rc::clone(app);
        listen(canvas, "pointercancel", move |_| {
            if let Ok(mut tagger) = app.try_borrow_mut() {
                cancel_drag(&mut tagger);
            }
        })?;
    }
    Ok(())
}

/// Drop a drag whose release was lost (moved with no button held, or the
/// browser cancelled the pointer).
fn cancel_drag(tagger: &mut TaggerApp) {
    if let Err(e) = tagger.on_pointer_cancel() {
        log::warn!("wiring: redraw after cancelled drag failed: {e}");
    }
}

/// Schedule one live redraw on the next animation frame.
fn request_frame(app: &SharedApp, frame_pending: &Rc<Cell<bool>>) {
    if frame_pending.get() {
        return;
    }
    frame_pending.set(true);

    let Some(window) = web_sys::window() else {
        frame_pending.set(false);
        draw_frame(app);
        return;
    };

    let app_for_cb = Rc::clone(app);
    let pending_for_cb = Rc::clone(frame_pending);
    let holder: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>> = Rc::new(RefCell::new(None));
    let holder_for_cb = Rc::clone(&holder);
    let cb = Closure::wrap(Box::new(move |_ts: f64| {
        pending_for_cb.set(false);
        draw_frame(&app_for_cb);
        holder_for_cb.borrow_mut().take();
    }) as Box<dyn FnMut(f64)>);

    if window.request_animation_frame(cb.as_ref().unchecked_ref()).is_ok() {
        *holder.borrow_mut() = Some(cb);
    } else {
        frame_pending.set(false);
        draw_frame(app);
    }
}

fn draw_frame(app: &SharedApp) {
    let Ok(mut app) = app.try_borrow_mut() else {
        return;
    };
    if let Err(e) = app.on_animation_frame() {
        log::warn!("wiring: live redraw failed: {e}");
    }
}

// =============================================================
// Upload
// =============================================================

fn attach_upload_listener(document: &Document, app: &SharedApp) -> Result<()> {
    let input: HtmlInputElement = element_by_id(document, UPLOAD_INPUT)?;
    let app = Rc::clone(app);
    let input_for_cb = input.clone();
    listen(&input, "change", move |_| {
        let Some(file) = input_for_cb.files().and_then(|files| files.get(0)) else {
            return;
        };
        // Allow re-selecting the same file.
        input_for_cb.set_value("");
        let app = Rc::clone(&app);
        spawn_local(async move {
            match read_as_data_url(&file).await {
                Ok(data_url) => run(app, Command::Upload(data_url)).await,
                Err(e) => log::error!("wiring: reading {} failed: {e}", file.name()),
            }
        });
    })
}

/// Read a file into a data URL with a `FileReader`.
async fn read_as_data_url(file: &web_sys::File) -> Result<String> {
    let reader = FileReader::new().map_err(|e| dom_error(&e))?;
    let (tx, rx) = oneshot::channel::<()>();
    let tx = RefCell::new(Some(tx));
    let on_load_end = Closure::wrap(Box::new(move || {
        if let Some(tx) = tx.borrow_mut().take() {
            if tx.send(()).is_err() {
                log::debug!("wiring: file read finished after its reader was dropped");
            }
        }
    }) as Box<dyn FnMut()>);
    reader.set_onloadend(Some(on_load_end.as_ref().unchecked_ref()));
    reader.read_as_data_url(file).map_err(|e| dom_error(&e))?;

    if rx.await.is_err() {
        return Err(Error::Dom("file read abandoned".to_owned()));
    }
    reader.set_onloadend(None);
    reader
        .result()
        .map_err(|e| dom_error(&e))?
        .as_string()
        .ok_or_else(|| Error::InvalidDataUrl("file reader returned no text".to_owned()))
}

// =============================================================
// Buttons
// =============================================================

fn attach_button_listeners(document: &Document, app: &SharedApp) -> Result<()> {
    let buttons: [(&str, fn() -> Command); 4] = [
        (IMAGE_BACK_BUTTON, || Command::ShowPrevious),
        (IMAGE_NEXT_BUTTON, || Command::ShowNext),
        (IMAGE_DELETE_BUTTON, || Command::DeleteImage),
        (TAGS_CLEAR_BUTTON, || Command::ClearTags),
    ];
    for (id, command) in buttons {
        let button: Element = element_by_id(document, id)?;
        let app = Rc::clone(app);
        listen(&button, "click", move |_| dispatch(&app, command()))?;
    }
    Ok(())
}

/// One delegated listener for every edit/delete control in the tag list.
fn attach_tag_list_listener(document: &Document, app: &SharedApp) -> Result<()> {
    let list: Element = element_by_id(document, TAGS_LIST)?;
    let app = Rc::clone(app);
    listen(&list, "click", move |event: Event| {
        let Some(target) = event.target() else {
            return;
        };
        let Ok(target) = target.dyn_into::<Element>() else {
            return;
        };
        let Some(Ok(index)) = target.get_attribute(INDEX_ATTR).map(|raw| raw.parse::<usize>()) else {
            return;
        };
        match target.get_attribute(ACTION_ATTR).as_deref() {
            Some(ACTION_EDIT) => dispatch(&app, Command::EditTag(index)),
            Some(ACTION_DELETE) => dispatch(&app, Command::DeleteTag(index)),
            _ => {}
        }
    })
}

// =============================================================
// Async dispatch
// =============================================================

fn dispatch(app: &SharedApp, command: Command) {
    spawn_local(run(Rc::clone(app), command));
}

// The borrow is held across awaits so that events arriving mid-command find
// the app busy and are dropped.
#[allow(clippy::await_holding_refcell_ref)]
async fn run(app: SharedApp, command: Command) {
    let Ok(mut app) = app.try_borrow_mut() else {
        log::debug!("wiring: dropped {}, app busy", command.label());
        return;
    };
    let label = command.label();
    let result = match command {
        Command::Render => app.render_app().await,
        Command::Upload(data_url) => app.upload_image(data_url).await.map(|id| log::debug!("wiring: stored image {id}")),
        Command::PointerUp(input) => app.on_pointer_up(input).await.map(|outcome| log::debug!("wiring: {outcome:?}")),
        Command::EditTag(index) => app.edit_tag(index).await.map(|changed| log::debug!("wiring: edit changed={changed}")),
        Command::DeleteTag(index) => app.delete_tag(index).await,
        Command::ClearTags => app.clear_tags().await,
        Command::ShowPrevious => app.show_previous().await,
        Command::ShowNext => app.show_next().await,
        Command::DeleteImage => app.delete_image().await,
    };
    if let Err(e) = result {
        log::error!("wiring: {label} failed: {e}");
    }
}
