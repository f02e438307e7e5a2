//! Default keybindings
//!
//! This module defines the default keybindings that are used
//! when no user configuration is present.

use crate::commands::contexts::{BASE_SHEET, COLUMNS_SHEET, GLOBAL, OPTIONS_SHEET, SHEET};
use crate::commands::{BindingRegistry, MetaAction};
use crate::model::FieldType;

/// Helper to insert a keybinding
fn bind(registry: &mut BindingRegistry, context: &str, keys: &str, action: MetaAction) {
    if let Err(e) = registry.bind(keys, action.longname(), context) {
        tracing::warn!(keys, error = %e, "Skipping unparseable default binding");
    }
}

/// Install the default keybindings of the meta views
pub fn default_bindings(registry: &mut BindingRegistry) {
    // ========== Global Keybindings ==========
    bind(registry, GLOBAL, "C-p", MetaAction::Statuses);
    bind(registry, GLOBAL, "g C", MetaAction::ColumnsAll);
    bind(registry, GLOBAL, "O", MetaAction::OptionsGlobal);

    // ========== Any Sheet ==========
    bind(registry, BASE_SHEET, "z O", MetaAction::OptionsSheet);
    bind(registry, BASE_SHEET, "z C-h", MetaAction::HelpCommands);
    bind(registry, SHEET, "C", MetaAction::ColumnsSheet);

    // ========== Options Sheet ==========
    bind(registry, OPTIONS_SHEET, "e", MetaAction::EditOption);
    bind(registry, OPTIONS_SHEET, "<CR>", MetaAction::EditOption);

    // ========== Columns Sheet ==========
    bind(registry, COLUMNS_SHEET, "g !", MetaAction::KeySelected);
    bind(registry, COLUMNS_SHEET, "g z !", MetaAction::KeyOffSelected);
    bind(registry, COLUMNS_SHEET, "g -", MetaAction::HideSelected);
    bind(registry, COLUMNS_SHEET, "&", MetaAction::JoinCols);

    // Retyping
    let types = [
        ("g %", FieldType::Float),
        ("g #", FieldType::Integer),
        ("g z #", FieldType::Length),
        ("g @", FieldType::Date),
        ("g $", FieldType::Currency),
        ("g ~", FieldType::String),
        ("g z ~", FieldType::Untyped),
    ];
    for (keys, ty) in types {
        bind(registry, COLUMNS_SHEET, keys, MetaAction::TypeSelected(ty));
    }
}
