//! JotPad: a small tabbed notepad with viewport-scoped syntax highlighting.
//!
//! Split into an application layer (`app`, state and pure logic) and a UI
//! layer (`ui`, FLTK widget construction). The binary wires the two together
//! with a message channel and a dispatch loop.

pub mod app;
pub mod ui;
