//! Options view: every registered option resolved at one scope
//!
//! The value column of the global view shows the raw global value. A view
//! scoped to a table shows the effective value only where it differs from
//! the declared default, so overrides stand out. Edits are written at the
//! view's own scope.

use std::sync::Arc;

use super::adapter::{AttrColumn, ColumnSet};
use super::sheet::{ColumnHeader, RowHint, Sheet};
use super::view::MetaView;
use super::Prompt;
use crate::commands::contexts::OPTIONS_SHEET;
use crate::error::{MetaError, Result};
use crate::model::{CellValue, FieldType};
use crate::options::{OptionInfo, OptionValue, Scope, SharedOptions};
use crate::undo::{Restore, UndoRecord};

/// Value shown in the value column of a view at `scope`
pub fn diffed_value(options: &SharedOptions, scope: Scope, info: &OptionInfo) -> CellValue {
    let Ok(effective) = options.read().get(&info.name, scope) else {
        return CellValue::Null;
    };
    if scope.is_global() || effective != info.default {
        effective.into()
    } else {
        CellValue::Null
    }
}

fn option_columns(options: &SharedOptions, scope: Scope) -> ColumnSet<Arc<OptionInfo>> {
    let value_header = if scope.is_global() { "global_value" } else { "sheet_value" };
    let options = options.clone();

    let columns = vec![
        AttrColumn::computed("option", FieldType::String, |o: &Arc<OptionInfo>| {
            CellValue::from(o.name.as_str())
        }),
        AttrColumn::computed(value_header, FieldType::Untyped, move |o: &Arc<OptionInfo>| {
            diffed_value(&options, scope, o)
        }),
        AttrColumn::computed("default", FieldType::Untyped, |o: &Arc<OptionInfo>| {
            o.default.clone().into()
        }),
        AttrColumn::computed("description", FieldType::String, |o: &Arc<OptionInfo>| {
            CellValue::from(o.helpstr.as_str())
        })
        .with_width(40),
        AttrColumn::computed("replayable", FieldType::Untyped, |o: &Arc<OptionInfo>| {
            CellValue::Bool(o.replayable)
        }),
    ];
    ColumnSet::new(columns, 1)
}

#[derive(Debug)]
pub struct OptionsView {
    view: MetaView<Arc<OptionInfo>>,
    options: SharedOptions,
    scope: Scope,
}

impl OptionsView {
    pub fn new(options: SharedOptions, scope: Scope, name: impl Into<String>) -> Self {
        let mut view = Self {
            view: MetaView::new(name, option_columns(&options, scope)),
            options,
            scope,
        };
        view.reload();
        view
    }

    pub fn global(options: SharedOptions) -> Self {
        Self::new(options, Scope::Global, "global_options")
    }

    pub fn scope(&self) -> Scope {
        self.scope
    }

    pub fn view(&self) -> &MetaView<Arc<OptionInfo>> {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut MetaView<Arc<OptionInfo>> {
        &mut self.view
    }

    pub fn reload(&mut self) {
        let rows: Vec<Arc<OptionInfo>> = {
            let options = self.options.read();
            options
                .keys()
                .iter()
                .filter_map(|name| options.describe(name).ok())
                .collect()
        };
        tracing::debug!(scope = ?self.scope, rows = rows.len(), "Options reloaded");
        self.view.set_rows(rows);
    }

    /// Row index of option `name`
    pub fn position(&self, name: &str) -> Option<usize> {
        self.view.rows().iter().position(|o| o.name == name)
    }

    /// Display of the value column for option `name`
    pub fn value_display(&self, name: &str) -> Option<String> {
        self.position(name).map(|row| self.view.cell_display(row, 1))
    }

    /// Display of the default column for option `name`
    pub fn default_display(&self, name: &str) -> Option<String> {
        self.position(name).map(|row| self.view.cell_display(row, 2))
    }

    /// Parse `input` and store it at this view's scope
    pub fn set_value(&self, row: usize, input: &str) -> Result<UndoRecord> {
        let info = self.view.row(row).cloned().ok_or(MetaError::NothingSelected)?;
        let previous = self.options.write().set_str(&info.name, input, self.scope)?;
        Ok(self.undo_record(&info.name, previous))
    }

    /// Toggle a boolean option in place, or prompt for a new value seeded
    /// with the current one. Returns `None` when the prompt is cancelled.
    pub fn edit_option(&self, row: usize, prompt: &mut dyn Prompt) -> Result<Option<UndoRecord>> {
        let info = self.view.row(row).cloned().ok_or(MetaError::NothingSelected)?;
        let current = self.options.read().get(&info.name, self.scope)?;

        let previous = match current {
            OptionValue::Bool(b) => self
                .options
                .write()
                .set(&info.name, OptionValue::Bool(!b), self.scope)?,
            other => {
                let label = format!("{}: ", info.name);
                let Some(input) = prompt.edit(&label, &other.to_string()) else {
                    return Ok(None);
                };
                self.options.write().set_str(&info.name, &input, self.scope)?
            }
        };
        Ok(Some(self.undo_record(&info.name, previous)))
    }

    fn undo_record(&self, name: &str, previous: Option<OptionValue>) -> UndoRecord {
        UndoRecord::new(
            "edit-option",
            Restore::OptionValue {
                options: self.options.clone(),
                scope: self.scope,
                name: name.to_string(),
                previous,
            },
        )
    }
}

impl Sheet for OptionsView {
    fn name(&self) -> String {
        self.view.name()
    }

    fn context(&self) -> &'static str {
        OPTIONS_SHEET
    }

    fn headers(&self) -> Vec<ColumnHeader> {
        self.view.headers()
    }

    fn row_count(&self) -> usize {
        self.view.rows().len()
    }

    fn cell_display(&self, row: usize, col: usize) -> String {
        self.view.cell_display(row, col)
    }

    /// Value edits go through the scoped path so undo restores the exact
    /// prior state at this scope
    fn set_cell(&mut self, row: usize, col: usize, input: &str) -> Result<UndoRecord> {
        if col == 1 {
            self.set_value(row, input)
        } else {
            self.view.edit_cell(row, col, input)
        }
    }

    fn cursor(&self) -> usize {
        self.view.cursor()
    }

    fn set_cursor(&mut self, row: usize) {
        self.view.set_cursor(row);
    }

    fn selection(&self) -> Vec<usize> {
        self.view.selection()
    }

    fn row_hint(&self, row: usize) -> RowHint {
        let Some(info) = self.view.row(row) else {
            return RowHint::None;
        };
        if self.options.read().get_explicit(&info.name, self.scope).is_some() {
            RowHint::Key
        } else {
            RowHint::None
        }
    }

    fn reload(&mut self) {
        OptionsView::reload(self);
    }
}
