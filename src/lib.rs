//! Live, editable meta views over a tabular viewer's own state
//!
//! The views show the columns of open tables, options at global or table
//! scope, the commands reachable from a view and the status history. Edits
//! write straight through to the live objects and can be undone.

pub mod commands;
pub mod config;
pub mod context;
pub mod dispatch;
pub mod error;
pub mod meta;
pub mod model;
pub mod options;
pub mod status;
pub mod undo;
pub mod util;

pub use commands::{BindingRegistry, CommandRegistry, CommandSpec, MetaAction, ReferenceSource};
pub use config::{Config, KeySequence};
pub use context::HostContext;
pub use dispatch::{edit_cell, run_command, run_keys, CommandOutcome, Focus, MetaSheet};
pub use error::{MetaError, Result};
pub use meta::{
    sheet_table, CatalogSnapshot, ColumnsView, CommandCatalog, OptionsView, Prompt, Sheet,
    StatusView,
};
pub use model::{CellValue, Field, FieldType, LiveTable, TableId};
pub use options::{OptionRegistry, OptionValue, Scope, SharedOptions};
pub use status::{CoalescePolicy, Priority, StatusLog};
pub use undo::{UndoRecord, UndoStack};
pub use util::init_file_logging;
