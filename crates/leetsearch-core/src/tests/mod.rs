//! Test module for leetsearch-core
//!
//! - Popup controller flows (search, redirect persistence, filtering)
//! - View-model building and rank formatting
//! - Filter matching rules
//! - Config stores (file and memory)
//! - HTTP backend against a stub server

mod fixtures;
