//! Terminal popup for LeetSearch.
//!
//! [`surface::TerminalSurface`] implements the core `PopupView` with ratatui;
//! [`app::handle_key`] maps key presses onto controller operations.

pub mod app;
pub mod colors;
pub mod fields;
pub mod surface;
