//! Field descriptors of live tables
//!
//! A [`Field`] is owned by its table and shared (as `Arc<Field>`) with every
//! observer, meta views included. All attribute writes go through interior
//! mutability so an edit made in one view is seen by every other holder of
//! the same field immediately.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::time::{Duration, Instant};

use parking_lot::RwLock;
use unicode_width::UnicodeWidthStr;

use super::table::LiveTable;
use super::types::FieldType;
use super::value::CellValue;
use crate::error::{MetaError, Result};

/// Blank columns added around an auto-sized field
const COLUMN_PADDING: usize = 2;

/// Where a field's value comes from
#[derive(Debug, Clone)]
pub enum FieldSource {
    /// The item at this position of each row
    Item(usize),
    /// The display values of other fields joined with a separator
    Joined {
        parts: Vec<Arc<Field>>,
        separator: String,
    },
}

/// Editable attributes of a field
#[derive(Debug, Clone, PartialEq)]
pub struct FieldAttrs {
    pub name: String,
    pub field_type: FieldType,
    /// Display width; `None` lets the renderer decide
    pub width: Option<usize>,
    pub height: usize,
    pub fmtstr: String,
    /// Position among the table's key fields, 0 when not a key
    pub key_ordinal: usize,
    pub hidden: bool,
}

impl FieldAttrs {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            field_type: FieldType::Untyped,
            width: None,
            height: 1,
            fmtstr: String::new(),
            key_ordinal: 0,
            hidden: false,
        }
    }
}

/// Informational counters updated on every value computation
#[derive(Debug, Default)]
struct FieldStats {
    calls: AtomicU64,
    max_nanos: AtomicU64,
    total_nanos: AtomicU64,
}

impl FieldStats {
    fn record(&self, elapsed: Duration) {
        let nanos = u64::try_from(elapsed.as_nanos()).unwrap_or(u64::MAX);
        self.calls.fetch_add(1, Ordering::Relaxed);
        self.total_nanos.fetch_add(nanos, Ordering::Relaxed);
        self.max_nanos.fetch_max(nanos, Ordering::Relaxed);
    }
}

/// One column of a live table
#[derive(Debug)]
pub struct Field {
    table: Weak<LiveTable>,
    attrs: RwLock<FieldAttrs>,
    source: FieldSource,
    stats: FieldStats,
}

impl Field {
    pub fn new(table: Weak<LiveTable>, attrs: FieldAttrs, source: FieldSource) -> Self {
        Self {
            table,
            attrs: RwLock::new(attrs),
            source,
            stats: FieldStats::default(),
        }
    }

    /// The owning table, if it still exists
    pub fn table(&self) -> Option<Arc<LiveTable>> {
        self.table.upgrade()
    }

    /// Name of the owning table, empty once the table is gone
    pub fn owner_name(&self) -> String {
        self.table().map(|t| t.name()).unwrap_or_default()
    }

    pub fn source(&self) -> &FieldSource {
        &self.source
    }

    pub fn name(&self) -> String {
        self.attrs.read().name.clone()
    }

    pub fn set_name(&self, name: impl Into<String>) {
        self.attrs.write().name = name.into();
    }

    pub fn field_type(&self) -> FieldType {
        self.attrs.read().field_type
    }

    pub fn set_type(&self, field_type: FieldType) {
        self.attrs.write().field_type = field_type;
    }

    pub fn width(&self) -> Option<usize> {
        self.attrs.read().width
    }

    pub fn set_width(&self, width: Option<usize>) {
        self.attrs.write().width = width;
    }

    pub fn height(&self) -> usize {
        self.attrs.read().height
    }

    pub fn set_height(&self, height: usize) {
        self.attrs.write().height = height;
    }

    pub fn fmtstr(&self) -> String {
        self.attrs.read().fmtstr.clone()
    }

    pub fn set_fmtstr(&self, fmtstr: impl Into<String>) {
        self.attrs.write().fmtstr = fmtstr.into();
    }

    pub fn key_ordinal(&self) -> usize {
        self.attrs.read().key_ordinal
    }

    pub fn set_key_ordinal(&self, ordinal: usize) {
        self.attrs.write().key_ordinal = ordinal;
    }

    pub fn is_key(&self) -> bool {
        self.key_ordinal() > 0
    }

    pub fn is_hidden(&self) -> bool {
        self.attrs.read().hidden
    }

    pub fn set_hidden(&self, hidden: bool) {
        self.attrs.write().hidden = hidden;
    }

    pub fn calls(&self) -> u64 {
        self.stats.calls.load(Ordering::Relaxed)
    }

    pub fn max_time(&self) -> Duration {
        Duration::from_nanos(self.stats.max_nanos.load(Ordering::Relaxed))
    }

    pub fn total_time(&self) -> Duration {
        Duration::from_nanos(self.stats.total_nanos.load(Ordering::Relaxed))
    }

    /// Raw value for a row before type conversion
    pub fn raw_value(&self, row: &[CellValue]) -> CellValue {
        match &self.source {
            FieldSource::Item(index) => row.get(*index).cloned().unwrap_or_default(),
            FieldSource::Joined { parts, separator } => {
                let joined: Vec<String> = parts.iter().map(|part| part.display(row)).collect();
                CellValue::Str(joined.join(separator))
            }
        }
    }

    /// Typed value for a row; `None` when the raw value does not convert
    pub fn value(&self, row: &[CellValue]) -> Option<CellValue> {
        let start = Instant::now();
        let raw = self.raw_value(row);
        let typed = self.field_type().coerce(&raw);
        self.stats.record(start.elapsed());
        typed
    }

    /// Display text for a row. Values that do not convert show their raw text.
    pub fn display(&self, row: &[CellValue]) -> String {
        let (field_type, fmtstr) = {
            let attrs = self.attrs.read();
            (attrs.field_type, attrs.fmtstr.clone())
        };
        match self.value(row) {
            Some(value) => field_type.format(&value, &fmtstr),
            None => self.raw_value(row).to_string(),
        }
    }

    /// Store a value into a row after converting it to the field's type.
    ///
    /// The row is left untouched when conversion fails.
    pub fn set_value(&self, row: &mut Vec<CellValue>, input: CellValue) -> Result<()> {
        let index = match &self.source {
            FieldSource::Item(index) => *index,
            FieldSource::Joined { .. } => return Err(MetaError::ReadOnly(self.name())),
        };
        let field_type = self.field_type();
        let value = field_type
            .coerce(&input)
            .ok_or_else(|| MetaError::coercion(self.name(), input.to_string(), field_type.name()))?;
        if row.len() <= index {
            row.resize(index + 1, CellValue::Null);
        }
        row[index] = value;
        Ok(())
    }

    /// Display text of this field for the owning table's focused row
    pub fn display_at_cursor(&self) -> String {
        let Some(table) = self.table() else {
            return String::new();
        };
        table
            .cursor_row()
            .map(|row| self.display(&row))
            .unwrap_or_default()
    }

    /// Typed value of this field for the owning table's focused row
    pub fn value_at_cursor(&self) -> CellValue {
        self.table()
            .and_then(|table| table.cursor_row())
            .and_then(|row| self.value(&row))
            .unwrap_or_default()
    }

    /// Write into the owning table's focused row
    pub fn set_at_cursor(&self, input: CellValue) -> Result<()> {
        let table = self
            .table()
            .ok_or_else(|| MetaError::StaleSource(self.name()))?;
        let index = table.cursor_row_index().ok_or(MetaError::NothingSelected)?;
        table.with_row_mut(index, |row| self.set_value(row, input))?
    }

    /// Widest rendered value across the given rows, `None` if there are none
    pub fn max_display_width(&self, rows: &[Vec<CellValue>]) -> Option<usize> {
        rows.iter()
            .map(|row| UnicodeWidthStr::width(self.display(row).as_str()))
            .max()
    }

    /// Width that fits the name and every given row, plus padding
    pub fn fit_width(&self, rows: &[Vec<CellValue>]) -> usize {
        let name = UnicodeWidthStr::width(self.name().as_str());
        self.max_display_width(rows).unwrap_or(0).max(name) + COLUMN_PADDING
    }
}
