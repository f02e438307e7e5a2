//! Meta views: tables whose rows are derived from the application's own state
//!
//! Each view is a [`MetaView`] over one kind of live entity (fields, options,
//! status entries) or, for the command catalog, a published snapshot. All of
//! them implement [`Sheet`] so one renderer and one dispatcher serve them.

pub mod adapter;
pub mod catalog;
pub mod columns;
pub mod options;
pub mod render;
pub mod sheet;
pub mod status;
pub mod view;

pub use adapter::{AttrColumn, ColumnKind, ColumnSet};
pub use catalog::{CatalogRow, CatalogSnapshot, CommandCatalog};
pub use columns::{ColumnsView, JOIN_SEPARATOR};
pub use options::OptionsView;
pub use render::{sheet_table, Palette};
pub use sheet::{ColumnHeader, RowHint, Sheet};
pub use status::StatusView;
pub use view::MetaView;

/// Asks the user for a line of input
pub trait Prompt {
    /// Show `label` with `seed` pre-filled. `None` means cancelled.
    fn edit(&mut self, label: &str, seed: &str) -> Option<String>;
}

impl<F> Prompt for F
where
    F: FnMut(&str, &str) -> Option<String>,
{
    fn edit(&mut self, label: &str, seed: &str) -> Option<String> {
        self(label, seed)
    }
}
