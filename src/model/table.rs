//! Live tables observed by meta views

use std::fmt;
use std::ops::Range;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use uuid::Uuid;

use super::field::{Field, FieldAttrs, FieldSource};
use super::value::CellValue;
use crate::error::{MetaError, Result};

/// Stable identity of a table, also used as an option scope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TableId(Uuid);

impl TableId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TableId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A table of the host application: ordered fields over a list of rows
#[derive(Debug)]
pub struct LiveTable {
    id: TableId,
    name: RwLock<String>,
    fields: RwLock<Vec<Arc<Field>>>,
    rows: RwLock<Vec<Vec<CellValue>>>,
    cursor_row: AtomicUsize,
    cursor_field: AtomicUsize,
    /// Rows currently on screen; `None` means all of them
    viewport: RwLock<Option<Range<usize>>>,
    alive: AtomicBool,
}

impl LiveTable {
    pub fn new(name: impl Into<String>) -> Arc<Self> {
        Self::with_id(TableId::new(), name)
    }

    pub fn with_id(id: TableId, name: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            id,
            name: RwLock::new(name.into()),
            fields: RwLock::new(Vec::new()),
            rows: RwLock::new(Vec::new()),
            cursor_row: AtomicUsize::new(0),
            cursor_field: AtomicUsize::new(0),
            viewport: RwLock::new(None),
            alive: AtomicBool::new(true),
        })
    }

    /// Build a table with one untyped field per name, reading row items in order
    pub fn with_columns(name: impl Into<String>, columns: &[&str]) -> Arc<Self> {
        let table = Self::new(name);
        for (index, column) in columns.iter().enumerate() {
            table.add_field(FieldAttrs::named(*column), FieldSource::Item(index));
        }
        table
    }

    pub fn id(&self) -> TableId {
        self.id
    }

    pub fn name(&self) -> String {
        self.name.read().clone()
    }

    pub fn set_name(&self, name: impl Into<String>) {
        *self.name.write() = name.into();
    }

    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::Acquire)
    }

    /// Tear the table down. Its fields are dropped and observers see an empty table.
    pub fn teardown(&self) {
        self.alive.store(false, Ordering::Release);
        self.fields.write().clear();
        self.rows.write().clear();
        tracing::debug!(table = %self.name(), "Table torn down");
    }

    /// Create a field bound to this table and append it
    pub fn add_field(self: &Arc<Self>, attrs: FieldAttrs, source: FieldSource) -> Arc<Field> {
        let field = self.new_field(attrs, source);
        self.fields.write().push(field.clone());
        field
    }

    /// Create a field bound to this table without adding it to the field list
    pub fn new_field(self: &Arc<Self>, attrs: FieldAttrs, source: FieldSource) -> Arc<Field> {
        Arc::new(Field::new(Arc::downgrade(self), attrs, source))
    }

    /// Insert a field at `index` (clamped to the end)
    pub fn insert_field(&self, index: usize, field: Arc<Field>) {
        let mut fields = self.fields.write();
        let index = index.min(fields.len());
        fields.insert(index, field);
    }

    /// Remove a field, returning the position it had
    pub fn remove_field(&self, field: &Arc<Field>) -> Option<usize> {
        let mut fields = self.fields.write();
        let index = fields.iter().position(|f| Arc::ptr_eq(f, field))?;
        fields.remove(index);
        Some(index)
    }

    pub fn fields(&self) -> Vec<Arc<Field>> {
        self.fields.read().clone()
    }

    pub fn visible_fields(&self) -> Vec<Arc<Field>> {
        self.fields
            .read()
            .iter()
            .filter(|f| !f.is_hidden())
            .cloned()
            .collect()
    }

    pub fn field_position(&self, field: &Arc<Field>) -> Option<usize> {
        self.fields.read().iter().position(|f| Arc::ptr_eq(f, field))
    }

    /// Next free key ordinal
    pub fn next_key_ordinal(&self) -> usize {
        self.fields
            .read()
            .iter()
            .map(|f| f.key_ordinal())
            .max()
            .unwrap_or(0)
            + 1
    }

    /// Close gaps in key ordinals, keeping the key order
    pub fn renumber_keys(&self) {
        let mut keys: Vec<Arc<Field>> = self
            .fields
            .read()
            .iter()
            .filter(|f| f.is_key())
            .cloned()
            .collect();
        keys.sort_by_key(|f| f.key_ordinal());
        for (i, field) in keys.iter().enumerate() {
            field.set_key_ordinal(i + 1);
        }
    }

    /// Next unused row item index, for fields created without a source
    pub fn next_item_index(&self) -> usize {
        let from_fields = self
            .fields
            .read()
            .iter()
            .filter_map(|f| match f.source() {
                FieldSource::Item(index) => Some(index + 1),
                FieldSource::Joined { .. } => None,
            })
            .max()
            .unwrap_or(0);
        let from_rows = self.rows.read().iter().map(Vec::len).max().unwrap_or(0);
        from_fields.max(from_rows)
    }

    pub fn add_row(&self, row: Vec<CellValue>) -> usize {
        let mut rows = self.rows.write();
        rows.push(row);
        rows.len() - 1
    }

    pub fn row_count(&self) -> usize {
        self.rows.read().len()
    }

    pub fn row(&self, index: usize) -> Option<Vec<CellValue>> {
        self.rows.read().get(index).cloned()
    }

    pub fn with_row_mut<T>(
        &self,
        index: usize,
        f: impl FnOnce(&mut Vec<CellValue>) -> T,
    ) -> Result<T> {
        let mut rows = self.rows.write();
        let row = rows
            .get_mut(index)
            .ok_or_else(|| MetaError::StaleSource(format!("{} row {}", self.name(), index)))?;
        Ok(f(row))
    }

    /// Index of the focused row, `None` when the table has no rows
    pub fn cursor_row_index(&self) -> Option<usize> {
        let count = self.row_count();
        if count == 0 {
            return None;
        }
        Some(self.cursor_row.load(Ordering::Relaxed).min(count - 1))
    }

    pub fn set_cursor_row(&self, index: usize) {
        self.cursor_row.store(index, Ordering::Relaxed);
    }

    pub fn cursor_row(&self) -> Option<Vec<CellValue>> {
        self.cursor_row_index().and_then(|index| self.row(index))
    }

    /// Index of the focused field
    pub fn cursor_field_index(&self) -> usize {
        self.cursor_field.load(Ordering::Relaxed)
    }

    pub fn set_cursor_field(&self, index: usize) {
        self.cursor_field.store(index, Ordering::Relaxed);
    }

    pub fn set_viewport(&self, viewport: Option<Range<usize>>) {
        *self.viewport.write() = viewport;
    }

    /// Rows currently on screen
    pub fn visible_rows(&self) -> Vec<Vec<CellValue>> {
        let rows = self.rows.read();
        match self.viewport.read().clone() {
            Some(range) => {
                let end = range.end.min(rows.len());
                let start = range.start.min(end);
                rows[start..end].to_vec()
            }
            None => rows.clone(),
        }
    }
}
