//! Browser image tagger: draw boxes on an uploaded image and label them.
//!
//! Compiled to WebAssembly for the page, and natively for tests. The core is
//! browser-independent: pointer events go in, drawing calls on a [`surface::Surface`]
//! and whole-record writes to a [`store::TaggedImageStore`] come out. The
//! `web` module (wasm32 only) binds those seams to the canvas, `localStorage`,
//! and the DOM.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`app`] | Orchestrator owning the canvas, store, host, cache, and workflow |
//! | [`workflow`] | Selection-to-tag state machine |
//! | [`input`] | Pointer button, gesture timer, and live selection |
//! | [`cache`] | In-memory mirror of the displayed image and tags |
//! | [`render`] | Stateless drawing primitives |
//! | [`geometry`] | Scaling, orientation, text placement, image fitting |
//! | [`surface`] | 2D drawing context trait |
//! | [`services`] | Decoder, prompt, timer, and view traits |
//! | [`store`] | Record store trait, in-memory and key-value stores |
//! | [`doc`] | Tagged image records and tag-list edits |
//! | [`gallery`] | Image browser parameters |
//! | [`data_url`] | Image data URL parsing |
//! | [`decode`] | Native image decoding (not built for wasm32) |
//! | [`config`] | Tunable thresholds, delays, and styling |
//! | [`consts`] | Defaults for the above, and storage keys |
//! | [`error`] | Crate error type |

pub mod app;
pub mod cache;
pub mod config;
pub mod consts;
pub mod data_url;
#[cfg(not(target_arch = "wasm32"))]
pub mod decode;
pub mod doc;
pub mod error;
pub mod gallery;
pub mod geometry;
pub mod input;
pub mod render;
pub mod services;
pub mod store;
pub mod surface;
pub mod workflow;

#[cfg(target_arch = "wasm32")]
pub mod web;

#[cfg(test)]
pub(crate) mod testing;
