//! Command and key binding registries
//!
//! Commands are registered per owner context. Contexts form an inheritance
//! chain (`ColumnsSheet -> Sheet -> BaseSheet -> global`) that decides which
//! commands and bindings are reachable from a given view.

mod action;
mod reference;
mod registry;

pub use action::{register_builtin_commands, MetaAction};
pub use reference::{ReferenceEntry, ReferenceSource, ReferenceTable, PACKAGED_REFERENCE};
pub use registry::{BindingRegistry, CommandRegistry, CommandSpec, KeyBinding};

/// Owner context names used by the built-in commands
pub mod contexts {
    pub const GLOBAL: &str = "global";
    pub const BASE_SHEET: &str = "BaseSheet";
    pub const SHEET: &str = "Sheet";
    pub const COLUMNS_SHEET: &str = "ColumnsSheet";
    pub const OPTIONS_SHEET: &str = "OptionsSheet";
    pub const STATUS_SHEET: &str = "StatusSheet";
    pub const HELP_SHEET: &str = "HelpSheet";
}
