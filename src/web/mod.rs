//! Browser bindings: the canvas, `localStorage`, `<img>` decoding, prompts,
//! and the DOM around the canvas.
//!
//! Only compiled for `wasm32`. Everything here is glue; behaviour lives in
//! the core modules and is tested natively.
//!
//! | Module | Role |
//! |--------|------|
//! | [`surface`] | [`Surface`](crate::surface::Surface) over a 2D canvas context |
//! | [`host`] | Decoder, prompt, timer, and DOM view |
//! | [`store`] | `localStorage`-backed record store |
//! | [`wiring`] | Event listeners and async dispatch |

pub mod host;
pub mod store;
pub mod surface;
pub mod wiring;

use wasm_bindgen::prelude::*;

use crate::error::Error;

pub use host::BrowserHost;
pub use store::LocalStorageStore;
pub use surface::CanvasSurface;

impl From<Error> for JsValue {
    fn from(e: Error) -> Self {
        JsValue::from_str(&e.to_string())
    }
}

/// Render a JS exception as a DOM error.
pub(crate) fn dom_error(e: &JsValue) -> Error {
    Error::Dom(format!("{e:?}"))
}

/// Module entry point: install logging and mount the tagger on `#canvas`.
///
/// # Errors
///
/// Rejects when the page is missing required elements or storage is
/// unavailable; nothing is mounted in that case.
#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    if let Err(e) = console_log::init_with_level(log::Level::Debug) {
        log::warn!("logger already installed: {e}");
    }

    match wiring::mount() {
        Ok(()) => Ok(()),
        Err(e) => {
            log::error!("canvas-tagger failed to start: {e}");
            Err(e.into())
        }
    }
}
