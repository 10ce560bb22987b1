//! Canvas engine for the wedding-invitation editor: an ordered element
//! document, topmost-wins hit testing, a full-redraw 2D render pass, and the
//! pointer interaction state machine, exposed to the host page over
//! wasm-bindgen. The host owns the DOM chrome; the engine owns the design.

pub mod types;
pub mod element;
pub mod engine;
pub mod commands;
pub mod geometry;
pub mod render;
pub mod input;
pub mod images;
pub mod io;
pub mod api;

pub use engine::DesignEngine;
pub use element::{Element, ElementKind};
pub use types::*;
