//! Integration tests for metaview
//!
//! These tests drive the meta views together with the host context, the
//! dispatcher and the live tables they observe.

#[path = "../common/mod.rs"]
pub mod common;

pub mod bulk_edits;
pub mod catalog_load;
pub mod meta_views;
pub mod option_scopes;
