//! Row adapter: named accessor pairs per entity kind
//!
//! A [`ColumnSet`] is the table of attributes a meta view shows for one kind
//! of entity. Each [`AttrColumn`] reads the entity through a getter and, when
//! writable, converts user input to its declared type before calling the
//! setter. Nothing is cached: every read goes to the live entity.

use std::fmt;
use std::sync::Arc;

use crate::error::{MetaError, Result};
use crate::model::{CellValue, FieldType};

pub type Getter<E> = Arc<dyn Fn(&E) -> CellValue + Send + Sync>;
pub type Setter<E> = Arc<dyn Fn(&E, CellValue) -> Result<()> + Send + Sync>;
pub type Formatter<E> = Arc<dyn Fn(&E) -> String + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// Reads and writes an attribute of the entity itself
    Plain,
    /// Derived from the entity; read-only unless given a setter
    Computed,
    /// Shows the value the entity names in another table's focused row
    CursorPassthrough,
}

pub struct AttrColumn<E> {
    pub name: String,
    /// Display width; `Some(0)` hides the column at low visibility
    pub width: Option<usize>,
    pub kind: ColumnKind,
    /// Type user input is converted to before the setter sees it
    pub value_type: FieldType,
    getter: Getter<E>,
    setter: Option<Setter<E>>,
    formatter: Option<Formatter<E>>,
}

impl<E> Clone for AttrColumn<E> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            width: self.width,
            kind: self.kind,
            value_type: self.value_type,
            getter: self.getter.clone(),
            setter: self.setter.clone(),
            formatter: self.formatter.clone(),
        }
    }
}

impl<E> fmt::Debug for AttrColumn<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttrColumn")
            .field("name", &self.name)
            .field("width", &self.width)
            .field("kind", &self.kind)
            .field("value_type", &self.value_type)
            .field("writable", &self.setter.is_some())
            .finish()
    }
}

impl<E> AttrColumn<E> {
    pub fn new(
        name: &str,
        kind: ColumnKind,
        value_type: FieldType,
        getter: impl Fn(&E) -> CellValue + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.to_string(),
            width: None,
            kind,
            value_type,
            getter: Arc::new(getter),
            setter: None,
            formatter: None,
        }
    }

    /// Read/write attribute
    pub fn plain(
        name: &str,
        value_type: FieldType,
        getter: impl Fn(&E) -> CellValue + Send + Sync + 'static,
        setter: impl Fn(&E, CellValue) -> Result<()> + Send + Sync + 'static,
    ) -> Self {
        Self::new(name, ColumnKind::Plain, value_type, getter).with_setter(setter)
    }

    /// Read-only derived value
    pub fn computed(
        name: &str,
        value_type: FieldType,
        getter: impl Fn(&E) -> CellValue + Send + Sync + 'static,
    ) -> Self {
        Self::new(name, ColumnKind::Computed, value_type, getter)
    }

    /// Value of another table's focused row, shown with that table's formatting
    pub fn cursor(
        name: &str,
        getter: impl Fn(&E) -> CellValue + Send + Sync + 'static,
        formatter: impl Fn(&E) -> String + Send + Sync + 'static,
        setter: impl Fn(&E, CellValue) -> Result<()> + Send + Sync + 'static,
    ) -> Self {
        Self::new(name, ColumnKind::CursorPassthrough, FieldType::Untyped, getter)
            .with_formatter(formatter)
            .with_setter(setter)
    }

    pub fn with_setter(
        mut self,
        setter: impl Fn(&E, CellValue) -> Result<()> + Send + Sync + 'static,
    ) -> Self {
        self.setter = Some(Arc::new(setter));
        self
    }

    pub fn with_formatter(
        mut self,
        formatter: impl Fn(&E) -> String + Send + Sync + 'static,
    ) -> Self {
        self.formatter = Some(Arc::new(formatter));
        self
    }

    pub fn with_width(mut self, width: usize) -> Self {
        self.width = Some(width);
        self
    }

    pub fn hidden(self) -> Self {
        self.with_width(0)
    }

    pub fn is_hidden(&self) -> bool {
        self.width == Some(0)
    }

    pub fn is_writable(&self) -> bool {
        self.setter.is_some()
    }

    pub fn get(&self, entity: &E) -> CellValue {
        (self.getter)(entity)
    }

    pub fn display(&self, entity: &E) -> String {
        match &self.formatter {
            Some(formatter) => formatter(entity),
            None => self.value_type.format(&self.get(entity), ""),
        }
    }

    /// Convert user input to the column's type and write it through
    pub fn set(&self, entity: &E, input: &str) -> Result<()> {
        let value = self
            .value_type
            .coerce(&CellValue::from(input))
            .ok_or_else(|| MetaError::coercion(&self.name, input, self.value_type.name()))?;
        self.set_value(entity, value)
    }

    /// Write an already typed value
    pub fn set_value(&self, entity: &E, value: CellValue) -> Result<()> {
        let setter = self
            .setter
            .as_ref()
            .ok_or_else(|| MetaError::ReadOnly(self.name.clone()))?;
        setter(entity, value)
    }
}

/// Ordered columns for one entity kind
pub struct ColumnSet<E> {
    columns: Vec<AttrColumn<E>>,
    /// Leading columns that identify a row
    pub key_count: usize,
}

impl<E> Clone for ColumnSet<E> {
    fn clone(&self) -> Self {
        Self {
            columns: self.columns.clone(),
            key_count: self.key_count,
        }
    }
}

impl<E> fmt::Debug for ColumnSet<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnSet")
            .field("columns", &self.columns)
            .field("key_count", &self.key_count)
            .finish()
    }
}

impl<E> ColumnSet<E> {
    pub fn new(columns: Vec<AttrColumn<E>>, key_count: usize) -> Self {
        Self { columns, key_count }
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AttrColumn<E>> {
        self.columns.iter()
    }

    pub fn get(&self, index: usize) -> Option<&AttrColumn<E>> {
        self.columns.get(index)
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    pub fn find(&self, name: &str) -> Result<&AttrColumn<E>> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .ok_or_else(|| MetaError::UnknownAttribute(name.to_string()))
    }

    pub fn find_mut(&mut self, name: &str) -> Result<&mut AttrColumn<E>> {
        self.columns
            .iter_mut()
            .find(|c| c.name == name)
            .ok_or_else(|| MetaError::UnknownAttribute(name.to_string()))
    }

    pub fn is_key(&self, index: usize) -> bool {
        index < self.key_count
    }
}
