//! ScrollScholar: an infinite-scroll knowledge feed for the terminal.
//!
//! The core is two synchronous state machines:
//!
//! - [`feed::FeedNavigator`] walks a loaded article list with wrap-around and
//!   random jumps.
//! - [`topics::TopicSelector`] drives the topic picker through
//!   open → submit → confirmation → close, handing delayed transitions back to
//!   the caller as [`topics::Scheduled`] values.
//!
//! [`app::App`] owns both, runs their background work on tokio, and [`ui`]
//! renders the result with ratatui.

pub mod app;
pub mod catalog;
pub mod config;
pub mod feed;
pub mod keybindings;
pub mod notify;
pub mod timers;
pub mod topics;
pub mod typewriter;
pub mod ui;
pub mod util;
