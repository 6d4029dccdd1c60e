//! Core library for the LeetSearch popup.
//!
//! [`PopupController`] ties together a [`config::ConfigStore`], a
//! [`backend::SearchBackend`] and a [`view::PopupView`]. The TUI and CLI
//! crates only provide surfaces and wiring.

pub mod backend;
pub mod config;
pub mod filter;
pub mod view;

mod controller;
mod error;

#[cfg(test)]
mod tests;

pub use controller::{PopupController, SearchOutcome};
pub use error::{Error, Result};

pub use leetsearch_types::*;
