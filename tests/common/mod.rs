//! Shared test utilities for metaview
//!
//! - Live table fixtures and a preloaded host context
//! - TUI rendering helpers over ratatui's TestBackend

#![allow(dead_code)]

pub mod fixtures;
pub mod terminal;

pub use fixtures::*;
pub use terminal::*;
