//! Status view: the status log, most recent first

use std::sync::Arc;

use super::adapter::{AttrColumn, ColumnSet};
use super::sheet::{ColumnHeader, RowHint, Sheet};
use super::view::MetaView;
use crate::commands::contexts::STATUS_SHEET;
use crate::error::{MetaError, Result};
use crate::model::{CellValue, FieldType, TableId};
use crate::options::{Scope, SharedOptions};
use crate::status::{compose_status, StatusEntry, StatusLevel, StatusLog};
use crate::undo::UndoRecord;

fn status_columns(options: &SharedOptions) -> ColumnSet<Arc<StatusEntry>> {
    let options = options.clone();
    let columns = vec![
        AttrColumn::computed("priority", FieldType::Integer, |e: &Arc<StatusEntry>| {
            CellValue::Int(i64::from(e.priority.0))
        })
        .hidden(),
        AttrColumn::computed("nrepeats", FieldType::Integer, |e: &Arc<StatusEntry>| {
            CellValue::Int(i64::from(e.repeats()))
        })
        .hidden(),
        AttrColumn::computed("args", FieldType::String, |e: &Arc<StatusEntry>| {
            CellValue::from(format!("{:?}", e.args))
        })
        .hidden(),
        AttrColumn::computed("message", FieldType::String, move |e: &Arc<StatusEntry>| {
            let show_count = options
                .read()
                .get("show_repeat_counts", Scope::Global)
                .ok()
                .and_then(|v| v.as_bool())
                .unwrap_or(true);
            CellValue::from(compose_status(&e.args, e.repeats(), show_count))
        }),
    ];
    ColumnSet::new(columns, 0)
}

#[derive(Debug)]
pub struct StatusView {
    view: MetaView<Arc<StatusEntry>>,
    log: Arc<StatusLog>,
}

impl StatusView {
    pub fn new(log: Arc<StatusLog>, options: &SharedOptions) -> Self {
        let mut view = Self {
            view: MetaView::new("status_history", status_columns(options)),
            log,
        };
        view.reload();
        view
    }

    pub fn id(&self) -> TableId {
        self.view.id()
    }

    pub fn entries(&self) -> &[Arc<StatusEntry>] {
        self.view.rows()
    }

    pub fn view_mut(&mut self) -> &mut MetaView<Arc<StatusEntry>> {
        &mut self.view
    }

    pub fn reload(&mut self) {
        let mut rows = self.log.entries();
        rows.reverse();
        self.view.set_rows(rows);
    }

    /// Composed message of each row, in display order
    pub fn messages(&self) -> Vec<String> {
        let col = self.view.columns().position("message").unwrap_or(0);
        (0..self.view.rows().len())
            .map(|row| self.view.cell_display(row, col))
            .collect()
    }
}

impl Sheet for StatusView {
    fn name(&self) -> String {
        self.view.name()
    }

    fn context(&self) -> &'static str {
        STATUS_SHEET
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

    fn set_cell(&mut self, _row: usize, col: usize, _input: &str) -> Result<UndoRecord> {
        let name = self
            .view
            .columns()
            .get(col)
            .map(|c| c.name.clone())
            .unwrap_or_else(|| "status".to_string());
        Err(MetaError::ReadOnly(name))
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
        match self.view.row(row).map(|e| e.priority.level()) {
            Some(StatusLevel::Error) => RowHint::Error,
            Some(StatusLevel::Warning) => RowHint::Warning,
            _ => RowHint::None,
        }
    }

    fn reload(&mut self) {
        StatusView::reload(self);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::{shared_with_builtins, OptionValue};
    use crate::status::Priority;

    #[test]
    fn test_most_recent_first_with_hints() {
        let log = Arc::new(StatusLog::default());
        log.status("loaded");
        log.warning("slow");
        log.append(Priority::ERROR, ["boom"]);
        let view = StatusView::new(log, &shared_with_builtins());
        assert_eq!(view.messages(), vec!["boom", "slow", "loaded"]);
        assert_eq!(view.row_hint(0), RowHint::Error);
        assert_eq!(view.row_hint(1), RowHint::Warning);
        assert_eq!(view.row_hint(2), RowHint::None);
    }

    #[test]
    fn test_repeat_count_follows_option() {
        let log = Arc::new(StatusLog::default());
        log.warning("disk full");
        log.warning("disk full");
        let options = shared_with_builtins();
        let view = StatusView::new(log, &options);
        assert_eq!(view.messages(), vec!["disk full (×2)"]);

        options
            .write()
            .set("show_repeat_counts", OptionValue::Bool(false), Scope::Global)
            .unwrap();
        assert_eq!(view.messages(), vec!["disk full"]);
    }

    #[test]
    fn test_rows_follow_repeats_without_reload() {
        let log = Arc::new(StatusLog::default());
        log.warning("disk full");
        let view = StatusView::new(log.clone(), &shared_with_builtins());
        log.warning("disk full");
        assert_eq!(view.messages(), vec!["disk full (×2)"]);
        assert_eq!(view.cell_display(0, 1), "2");
    }

    #[test]
    fn test_rows_are_read_only() {
        let log = Arc::new(StatusLog::default());
        log.status("x");
        let mut view = StatusView::new(log, &shared_with_builtins());
        assert!(matches!(view.set_cell(0, 3, "y"), Err(MetaError::ReadOnly(_))));
    }
}
