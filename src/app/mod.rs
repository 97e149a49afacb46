//! Application layer: the state coordinator and everything it owns.
//!
//! - `settings` - the JSON preference store (load at startup, save at exit)
//! - `document` / `tab_manager` - one open document per tab
//! - `encoding` - heuristic text decoding for file open
//! - `highlight` - pure viewport-scoped scanning (no FLTK types)
//! - `highlight_controller` - debounce timer, poll drain, worker hand-off
//! - `state` - the main coordinator driven by the dispatch loop

pub mod buffer_utils;
pub mod document;
pub mod encoding;
pub mod error;
pub mod highlight;
pub mod highlight_controller;
pub mod messages;
pub mod settings;
pub mod state;
pub mod tab_manager;
pub mod text_ops;
