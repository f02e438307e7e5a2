//! Columns view: the fields of one or more live tables
//!
//! With one source the rows are every field of that table in order, and the
//! `sheet` column is hidden. With several sources the rows are the visible
//! fields of each, skipping this view's own table. Bulk commands work on the
//! selected rows (or the focused row) and return an undo record.

use std::sync::{Arc, Weak};

use super::adapter::{AttrColumn, ColumnSet};
use super::sheet::{ColumnHeader, RowHint, Sheet};
use super::view::MetaView;
use crate::commands::contexts::COLUMNS_SHEET;
use crate::error::{MetaError, Result};
use crate::model::{CellValue, Field, FieldAttrs, FieldSource, FieldType, LiveTable, TableId};
use crate::undo::{FieldAttrValue, Restore, UndoRecord};

/// Separator used when joining fields
pub const JOIN_SEPARATOR: &str = " ";

fn width_value(value: CellValue, attr: &str) -> Result<Option<usize>> {
    match value {
        CellValue::Null => Ok(None),
        CellValue::Int(i) => usize::try_from(i)
            .map(Some)
            .map_err(|_| MetaError::coercion(attr, i.to_string(), "non-negative int")),
        other => Err(MetaError::coercion(attr, other.to_string(), "int")),
    }
}

fn bool_value(value: &CellValue) -> Option<bool> {
    match value {
        CellValue::Bool(b) => Some(*b),
        CellValue::Int(i) => Some(*i != 0),
        CellValue::Str(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "1" => Some(true),
            "false" | "no" | "0" | "" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

fn millis(d: std::time::Duration) -> CellValue {
    CellValue::Float(d.as_secs_f64() * 1000.0)
}

fn field_columns() -> ColumnSet<Arc<Field>> {
    let columns = vec![
        AttrColumn::computed("sheet", FieldType::String, |f: &Arc<Field>| {
            CellValue::from(f.owner_name())
        }),
        AttrColumn::plain(
            "name",
            FieldType::String,
            |f: &Arc<Field>| CellValue::from(f.name()),
            |f: &Arc<Field>, v| {
                f.set_name(v.to_string());
                Ok(())
            },
        ),
        AttrColumn::plain(
            "width",
            FieldType::Integer,
            |f: &Arc<Field>| f.width().map(CellValue::from).unwrap_or_default(),
            |f: &Arc<Field>, v| {
                f.set_width(width_value(v, "width")?);
                Ok(())
            },
        ),
        AttrColumn::plain(
            "height",
            FieldType::Integer,
            |f: &Arc<Field>| CellValue::from(f.height()),
            |f: &Arc<Field>, v| {
                f.set_height(width_value(v, "height")?.unwrap_or(1));
                Ok(())
            },
        )
        .hidden(),
        AttrColumn::plain(
            "type",
            FieldType::String,
            |f: &Arc<Field>| CellValue::from(f.field_type().name()),
            |f: &Arc<Field>, v| {
                let input = v.to_string();
                let ty: FieldType = input
                    .parse()
                    .map_err(|_| MetaError::coercion("type", input.as_str(), "type name"))?;
                f.set_type(ty);
                Ok(())
            },
        ),
        AttrColumn::plain(
            "fmtstr",
            FieldType::String,
            |f: &Arc<Field>| CellValue::from(f.fmtstr()),
            |f: &Arc<Field>, v| {
                f.set_fmtstr(v.to_string());
                Ok(())
            },
        ),
        AttrColumn::cursor(
            "value",
            |f: &Arc<Field>| f.value_at_cursor(),
            |f: &Arc<Field>| f.display_at_cursor(),
            |f: &Arc<Field>, v| f.set_at_cursor(v),
        ),
        AttrColumn::plain(
            "keycol",
            FieldType::Integer,
            |f: &Arc<Field>| CellValue::from(f.key_ordinal()),
            |f: &Arc<Field>, v| {
                f.set_key_ordinal(width_value(v, "keycol")?.unwrap_or(0));
                Ok(())
            },
        ),
        AttrColumn::plain(
            "hidden",
            FieldType::Untyped,
            |f: &Arc<Field>| CellValue::Bool(f.is_hidden()),
            |f: &Arc<Field>, v| {
                let hidden = bool_value(&v)
                    .ok_or_else(|| MetaError::coercion("hidden", v.to_string(), "bool"))?;
                f.set_hidden(hidden);
                Ok(())
            },
        ),
        AttrColumn::computed("ncalcs", FieldType::Integer, |f: &Arc<Field>| {
            CellValue::Int(i64::try_from(f.calls()).unwrap_or(i64::MAX))
        })
        .hidden(),
        AttrColumn::computed("maxtime", FieldType::Float, |f: &Arc<Field>| {
            millis(f.max_time())
        })
        .hidden(),
        AttrColumn::computed("totaltime", FieldType::Float, |f: &Arc<Field>| {
            millis(f.total_time())
        })
        .hidden(),
    ];
    ColumnSet::new(columns, 2)
}

#[derive(Debug)]
pub struct ColumnsView {
    view: MetaView<Arc<Field>>,
    sources: Vec<Weak<LiveTable>>,
}

impl ColumnsView {
    pub fn new(sources: &[Arc<LiveTable>]) -> Self {
        Self::with_id(TableId::new(), sources)
    }

    /// View with a fixed identity, for hosts that list the view among their
    /// own tables
    pub fn with_id(id: TableId, sources: &[Arc<LiveTable>]) -> Self {
        let name = match sources {
            [single] => format!("{}_columns", single.name()),
            _ => "all_columns".to_string(),
        };
        let mut view = Self {
            view: MetaView::with_id(id, name, field_columns()),
            sources: sources.iter().map(Arc::downgrade).collect(),
        };
        view.reload();
        if let [single] = sources {
            view.view.set_cursor(single.cursor_field_index());
        }
        view
    }

    pub fn id(&self) -> TableId {
        self.view.id()
    }

    pub fn view(&self) -> &MetaView<Arc<Field>> {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut MetaView<Arc<Field>> {
        &mut self.view
    }

    pub fn fields(&self) -> &[Arc<Field>] {
        self.view.rows()
    }

    fn live_sources(&self) -> Vec<Arc<LiveTable>> {
        self.sources
            .iter()
            .filter_map(Weak::upgrade)
            .filter(|t| t.is_alive())
            .collect()
    }

    fn set_sheet_column_width(&mut self, width: Option<usize>) {
        if let Ok(column) = self.view.columns_mut().find_mut("sheet") {
            column.width = width;
        }
    }

    /// Rebuild rows from the source tables. Dead sources give no rows.
    pub fn reload(&mut self) {
        let live = self.live_sources();
        if self.sources.len() == 1 {
            self.set_sheet_column_width(Some(0));
            match live.first() {
                Some(table) => self.view.set_rows(table.fields()),
                None => self.view.set_rows(Vec::new()),
            }
        } else {
            self.set_sheet_column_width(None);
            let own = self.view.id();
            let rows: Vec<Arc<Field>> = live
                .iter()
                .filter(|t| t.id() != own)
                .flat_map(|t| t.visible_fields())
                .collect();
            self.view.set_rows(rows);
        }
        tracing::debug!(
            view = %self.view.name(),
            rows = self.view.rows().len(),
            "Columns reloaded"
        );
    }

    /// Add a field to the first source table
    pub fn new_row(&mut self) -> Result<Arc<Field>> {
        let table = self
            .sources
            .first()
            .and_then(Weak::upgrade)
            .filter(|t| t.is_alive())
            .ok_or_else(|| MetaError::StaleSource(self.view.name()))?;
        let source = FieldSource::Item(table.next_item_index());
        let field = table.add_field(FieldAttrs::named(""), source);
        self.reload();
        Ok(field)
    }

    fn snapshot(fields: &[Arc<Field>], attr: impl Fn(&Field) -> FieldAttrValue) -> Restore {
        Restore::FieldAttrs(fields.iter().map(|f| (f.clone(), attr(f.as_ref()))).collect())
    }

    /// Make the target fields keys, numbering them after existing keys
    pub fn set_keys(&mut self) -> Result<UndoRecord> {
        let targets = self.view.targets()?;
        let restore = Self::snapshot(&targets, |f| FieldAttrValue::KeyOrdinal(f.key_ordinal()));
        for field in targets.iter().filter(|f| !f.is_key()) {
            let ordinal = field.table().map(|t| t.next_key_ordinal()).unwrap_or(1);
            field.set_key_ordinal(ordinal);
        }
        self.reload();
        Ok(UndoRecord::new("key-selected", restore))
    }

    /// Drop the target fields from the keys. Remaining keys of each owning
    /// table move up to close the gap.
    pub fn unset_keys(&mut self) -> Result<UndoRecord> {
        let targets = self.view.targets()?;
        let mut tables: Vec<Arc<LiveTable>> = Vec::new();
        for table in targets.iter().filter_map(|f| f.table()) {
            if !tables.iter().any(|t| t.id() == table.id()) {
                tables.push(table);
            }
        }
        let mut touched = targets.clone();
        for field in tables.iter().flat_map(|t| t.fields()) {
            if field.is_key() && !touched.iter().any(|f| Arc::ptr_eq(f, &field)) {
                touched.push(field);
            }
        }
        let restore = Self::snapshot(&touched, |f| FieldAttrValue::KeyOrdinal(f.key_ordinal()));
        for field in &targets {
            field.set_key_ordinal(0);
        }
        for table in &tables {
            table.renumber_keys();
        }
        self.reload();
        Ok(UndoRecord::new("key-off-selected", restore))
    }

    pub fn hide(&mut self) -> Result<UndoRecord> {
        let targets = self.view.targets()?;
        let restore = Self::snapshot(&targets, |f| FieldAttrValue::Hidden(f.is_hidden()));
        for field in &targets {
            field.set_hidden(true);
        }
        self.reload();
        Ok(UndoRecord::new("hide-selected", restore))
    }

    pub fn set_type(&mut self, field_type: FieldType) -> Result<UndoRecord> {
        let targets = self.view.targets()?;
        let restore = Self::snapshot(&targets, |f| FieldAttrValue::Type(f.field_type()));
        for field in &targets {
            field.set_type(field_type);
        }
        tracing::debug!(count = targets.len(), field_type = %field_type, "Fields retyped");
        Ok(UndoRecord::new(
            crate::commands::MetaAction::TypeSelected(field_type).longname(),
            restore,
        ))
    }

    /// Size each target field to fit its name and its widest value among the
    /// source table's visible rows. Fields without a live owner are skipped.
    pub fn resize_to_visible_max(&mut self) -> Result<UndoRecord> {
        let targets = self.view.targets()?;
        let restore = Self::snapshot(&targets, |f| FieldAttrValue::Width(f.width()));
        for field in &targets {
            let Some(table) = field.table() else {
                continue;
            };
            field.set_width(Some(field.fit_width(&table.visible_rows())));
        }
        Ok(UndoRecord::new("resize-source-rows-max", restore))
    }

    /// Add a field showing the target fields' display values joined by
    /// `separator`, placed before the first target in its table
    pub fn join(&mut self, separator: &str) -> Result<UndoRecord> {
        let targets = self.view.targets()?;
        let first = targets.first().ok_or(MetaError::NothingSelected)?;
        let table = first
            .table()
            .filter(|t| t.is_alive())
            .ok_or_else(|| MetaError::StaleSource(first.name()))?;

        let name = targets.iter().map(|f| f.name()).collect::<Vec<_>>().join("+");
        let position = table.field_position(first).unwrap_or(0);
        let joined = table.new_field(
            FieldAttrs::named(name.as_str()),
            FieldSource::Joined {
                parts: targets.clone(),
                separator: separator.to_string(),
            },
        );
        table.insert_field(position, joined.clone());
        tracing::debug!(field = %name, position, "Joined fields");
        self.reload();

        Ok(UndoRecord::new(
            "join-cols",
            Restore::RemoveField { table, field: joined },
        ))
    }
}

impl Sheet for ColumnsView {
    fn name(&self) -> String {
        self.view.name()
    }

    fn context(&self) -> &'static str {
        COLUMNS_SHEET
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

    fn set_cell(&mut self, row: usize, col: usize, input: &str) -> Result<UndoRecord> {
        self.view.edit_cell(row, col, input)
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
        match self.view.row(row) {
            Some(field) if field.is_key() => RowHint::Key,
            Some(field) if field.is_hidden() => RowHint::Hidden,
            _ => RowHint::None,
        }
    }

    fn reload(&mut self) {
        ColumnsView::reload(self);
    }
}
