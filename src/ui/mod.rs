//! Terminal User Interface module.
//!
//! The TUI only renders state and forwards input; every decision lives in
//! `App` and the state machines it owns.
//!
//! # Module Structure
//!
//! - `loop_runner` - Main event loop and terminal management
//! - `input` - Keyboard input handling
//! - `events` - Background task events and state-machine notifications
//! - `render` - Layout and overlay dispatch
//! - `card` - Article card (For You / Random tabs)
//! - `lists` - Following and History tabs
//! - `topics` - Topic picker overlay
//! - `status` - Status bar widget
//! - `help` - Keybinding overlay

mod card;
mod events;
mod help;
mod input;
mod lists;
mod loop_runner;
mod render;
mod status;
mod topics;

// Re-export the public API
pub use events::{drain_notifications, handle_app_event};
pub use input::handle_input;
pub use loop_runner::{run, Action};
