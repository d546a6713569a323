//! Client side of the map: keeps the markers of one session in sync with the
//! server and with whatever draws them.
//!
//! Browser facilities (the map widget, dialogs, clipboard, address bar) are
//! reached through the traits in [`ui`], so the managers run the same against
//! a real front end and against test doubles.

pub mod api;
pub mod config;
pub mod image_host;
pub mod marker_manager;
pub mod session_manager;
pub mod ui;

#[cfg(test)]
mod testing;

pub use marker_manager::{MarkerManager, MarkerView};
pub use session_manager::SessionManager;
