//! Generic meta view: rows derived from live entities

use std::collections::BTreeSet;

use super::adapter::ColumnSet;
use super::sheet::ColumnHeader;
use crate::error::{MetaError, Result};
use crate::model::TableId;
use crate::undo::{Restore, UndoRecord};

/// Rows of entities shown through a [`ColumnSet`].
///
/// Rows are handles to the entities, never copies of their attributes, so a
/// cell always shows the entity's current value.
#[derive(Debug)]
pub struct MetaView<E> {
    id: TableId,
    name: String,
    rows: Vec<E>,
    columns: ColumnSet<E>,
    cursor: usize,
    selected: BTreeSet<usize>,
}

impl<E: Clone + Send + Sync + 'static> MetaView<E> {
    pub fn new(name: impl Into<String>, columns: ColumnSet<E>) -> Self {
        Self::with_id(TableId::new(), name, columns)
    }

    pub fn with_id(id: TableId, name: impl Into<String>, columns: ColumnSet<E>) -> Self {
        Self {
            id,
            name: name.into(),
            rows: Vec::new(),
            columns,
            cursor: 0,
            selected: BTreeSet::new(),
        }
    }

    pub fn id(&self) -> TableId {
        self.id
    }

    pub fn name(&self) -> String {
        self.name.clone()
    }

    pub fn rows(&self) -> &[E] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&E> {
        self.rows.get(index)
    }

    pub fn columns(&self) -> &ColumnSet<E> {
        &self.columns
    }

    pub fn columns_mut(&mut self) -> &mut ColumnSet<E> {
        &mut self.columns
    }

    /// Replace the row set. Selection outside the new rows is dropped.
    pub fn set_rows(&mut self, rows: Vec<E>) {
        let count = rows.len();
        self.rows = rows;
        self.selected.retain(|&i| i < count);
        self.cursor = self.cursor.min(count.saturating_sub(1));
    }

    pub fn headers(&self) -> Vec<ColumnHeader> {
        self.columns
            .iter()
            .enumerate()
            .map(|(i, column)| ColumnHeader {
                name: column.name.clone(),
                width: column.width,
                key: self.columns.is_key(i),
            })
            .collect()
    }

    pub fn cell_display(&self, row: usize, col: usize) -> String {
        match (self.rows.get(row), self.columns.get(col)) {
            (Some(entity), Some(column)) => column.display(entity),
            _ => String::new(),
        }
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Focused row index, `None` when there are no rows
    pub fn cursor_row(&self) -> Option<usize> {
        (!self.rows.is_empty()).then_some(self.cursor)
    }

    pub fn set_cursor(&mut self, row: usize) {
        self.cursor = row.min(self.rows.len().saturating_sub(1));
    }

    pub fn select(&mut self, row: usize) {
        if row < self.rows.len() {
            self.selected.insert(row);
        }
    }

    pub fn selection(&self) -> Vec<usize> {
        self.selected.iter().copied().collect()
    }

    /// Rows a bulk command works on: the selection, else the focused row
    pub fn targets(&self) -> Result<Vec<E>> {
        if !self.selected.is_empty() {
            return Ok(self.selected.iter().map(|&i| self.rows[i].clone()).collect());
        }
        self.cursor_row()
            .and_then(|i| self.rows.get(i))
            .map(|entity| vec![entity.clone()])
            .ok_or(MetaError::NothingSelected)
    }

    /// Write user input through a column's setter.
    ///
    /// The undo record writes the previous value back through the same setter.
    pub fn edit_cell(&self, row: usize, col: usize, input: &str) -> Result<UndoRecord> {
        let entity = self.rows.get(row).cloned().ok_or(MetaError::NothingSelected)?;
        let column = self
            .columns
            .get(col)
            .cloned()
            .ok_or_else(|| MetaError::UnknownAttribute(format!("column {}", col)))?;

        let previous = column.get(&entity);
        column.set(&entity, input)?;
        tracing::debug!(view = %self.name, attr = %column.name, row, "Cell edited");

        let command = format!("edit {}", column.name);
        Ok(UndoRecord::new(
            command,
            Restore::Custom(Box::new(move || column.set_value(&entity, previous))),
        ))
    }
}
