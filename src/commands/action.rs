//! Built-in meta view commands
//!
//! Each action has a stable longname used for binding and dispatch, an
//! owner context and a help string.

use std::fmt;
use std::str::FromStr;

use super::contexts::{
    BASE_SHEET, COLUMNS_SHEET, GLOBAL, HELP_SHEET, OPTIONS_SHEET, SHEET, STATUS_SHEET,
};
use super::registry::{CommandRegistry, CommandSpec};
use crate::model::FieldType;

/// All commands provided by the meta views
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetaAction {
    // ========== Opening views ==========
    /// Open the status history
    Statuses,
    /// Open the columns of every table
    ColumnsAll,
    /// Open options scoped to the current table
    OptionsSheet,
    /// Open global options
    OptionsGlobal,
    /// Open the columns of the current table
    ColumnsSheet,
    /// Open the commands reachable from the current view
    HelpCommands,

    // ========== Options ==========
    /// Toggle or edit the focused option
    EditOption,

    // ========== Columns ==========
    /// Size selected fields to fit their name and visible values
    ResizeSourceRowsMax,
    /// Add a field joining the selected fields
    JoinCols,
    /// Make selected fields key fields
    KeySelected,
    /// Remove selected fields from the key
    KeyOffSelected,
    /// Hide selected fields
    HideSelected,
    /// Retype selected fields
    TypeSelected(FieldType),
}

impl MetaAction {
    pub const ALL: [MetaAction; 19] = [
        MetaAction::Statuses,
        MetaAction::ColumnsAll,
        MetaAction::OptionsSheet,
        MetaAction::OptionsGlobal,
        MetaAction::ColumnsSheet,
        MetaAction::HelpCommands,
        MetaAction::EditOption,
        MetaAction::ResizeSourceRowsMax,
        MetaAction::JoinCols,
        MetaAction::KeySelected,
        MetaAction::KeyOffSelected,
        MetaAction::HideSelected,
        MetaAction::TypeSelected(FieldType::Float),
        MetaAction::TypeSelected(FieldType::Integer),
        MetaAction::TypeSelected(FieldType::Length),
        MetaAction::TypeSelected(FieldType::Date),
        MetaAction::TypeSelected(FieldType::Currency),
        MetaAction::TypeSelected(FieldType::String),
        MetaAction::TypeSelected(FieldType::Untyped),
    ];

    pub fn longname(&self) -> &'static str {
        match self {
            MetaAction::Statuses => "statuses",
            MetaAction::ColumnsAll => "columns-all",
            MetaAction::OptionsSheet => "options-sheet",
            MetaAction::OptionsGlobal => "options-global",
            MetaAction::ColumnsSheet => "columns-sheet",
            MetaAction::HelpCommands => "help-commands",
            MetaAction::EditOption => "edit-option",
            MetaAction::ResizeSourceRowsMax => "resize-source-rows-max",
            MetaAction::JoinCols => "join-cols",
            MetaAction::KeySelected => "key-selected",
            MetaAction::KeyOffSelected => "key-off-selected",
            MetaAction::HideSelected => "hide-selected",
            MetaAction::TypeSelected(ty) => match ty {
                FieldType::Float => "type-float-selected",
                FieldType::Integer => "type-int-selected",
                FieldType::Length => "type-len-selected",
                FieldType::Date => "type-date-selected",
                FieldType::Currency => "type-currency-selected",
                FieldType::String => "type-string-selected",
                FieldType::Untyped => "type-any-selected",
            },
        }
    }

    /// Context that owns the command
    pub fn context(&self) -> &'static str {
        match self {
            MetaAction::Statuses | MetaAction::ColumnsAll | MetaAction::OptionsGlobal => GLOBAL,
            MetaAction::OptionsSheet | MetaAction::HelpCommands => BASE_SHEET,
            MetaAction::ColumnsSheet => SHEET,
            MetaAction::EditOption => OPTIONS_SHEET,
            _ => COLUMNS_SHEET,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            MetaAction::Statuses => "open the status history",
            MetaAction::ColumnsAll => "open the columns of every table",
            MetaAction::OptionsSheet => "open options for the current table",
            MetaAction::OptionsGlobal => "open global options",
            MetaAction::ColumnsSheet => "open the columns of the current table",
            MetaAction::HelpCommands => "open the commands available here",
            MetaAction::EditOption => "toggle or edit the current option",
            MetaAction::ResizeSourceRowsMax => "size selected columns to fit their visible values",
            MetaAction::JoinCols => "add a column joining the selected columns",
            MetaAction::KeySelected => "make selected columns key columns",
            MetaAction::KeyOffSelected => "remove selected columns from the key",
            MetaAction::HideSelected => "hide selected columns",
            MetaAction::TypeSelected(ty) => match ty {
                FieldType::Float => "type selected columns as float",
                FieldType::Integer => "type selected columns as int",
                FieldType::Length => "type selected columns as length of value",
                FieldType::Date => "type selected columns as date",
                FieldType::Currency => "type selected columns as currency",
                FieldType::String => "type selected columns as string",
                FieldType::Untyped => "remove the type of selected columns",
            },
        }
    }

    /// Readable form of what the command runs, shown in the catalog
    pub fn execstr(&self) -> String {
        match self {
            MetaAction::Statuses => "open StatusView(status_history)".to_string(),
            MetaAction::ColumnsAll => "open ColumnsView(all tables)".to_string(),
            MetaAction::OptionsSheet => "open OptionsView(current table)".to_string(),
            MetaAction::OptionsGlobal => "open OptionsView(global)".to_string(),
            MetaAction::ColumnsSheet => "open ColumnsView(current table)".to_string(),
            MetaAction::HelpCommands => "open CommandCatalog(current context)".to_string(),
            MetaAction::EditOption => "edit_option(cursor row)".to_string(),
            MetaAction::ResizeSourceRowsMax => "width = fit_width(visible rows)".to_string(),
            MetaAction::JoinCols => "insert join(selected, \" \") before first".to_string(),
            MetaAction::KeySelected => "set_keys(selected)".to_string(),
            MetaAction::KeyOffSelected => "unset_keys(selected)".to_string(),
            MetaAction::HideSelected => "hidden = true, for selected".to_string(),
            MetaAction::TypeSelected(ty) => format!("type = {}, for selected", ty.name()),
        }
    }

    /// Whether the command is recorded for replay
    pub fn replayable(&self) -> bool {
        !matches!(self, MetaAction::Statuses | MetaAction::HelpCommands)
    }

    pub fn spec(&self) -> CommandSpec {
        CommandSpec {
            context: self.context().to_string(),
            longname: self.longname().to_string(),
            execstr: self.execstr(),
            helpstr: self.description().to_string(),
            replayable: self.replayable(),
        }
    }
}

impl fmt::Display for MetaAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.longname())
    }
}

impl FromStr for MetaAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MetaAction::ALL
            .iter()
            .copied()
            .find(|action| action.longname() == s)
            .ok_or_else(|| s.to_string())
    }
}

/// Register the context chain of the meta views and all built-in commands
pub fn register_builtin_commands(registry: &mut CommandRegistry) {
    registry.set_parent(BASE_SHEET, GLOBAL);
    registry.set_parent(SHEET, BASE_SHEET);
    for context in [COLUMNS_SHEET, OPTIONS_SHEET, STATUS_SHEET, HELP_SHEET] {
        registry.set_parent(context, SHEET);
    }
    for action in MetaAction::ALL {
        registry.add(action.spec());
    }
}
