//! Undo records for meta view edits
//!
//! Every mutating command produces one [`UndoRecord`] holding enough state to
//! put the affected entities back exactly as they were.

use std::fmt;
use std::sync::Arc;

use crate::error::Result;
use crate::model::{Field, FieldType, LiveTable};
use crate::options::{OptionValue, Scope, SharedOptions};

/// Prior value of one field attribute
#[derive(Debug, Clone, PartialEq)]
pub enum FieldAttrValue {
    Type(FieldType),
    KeyOrdinal(usize),
    Hidden(bool),
    Width(Option<usize>),
}

impl FieldAttrValue {
    fn restore(&self, field: &Field) {
        match self {
            FieldAttrValue::Type(ty) => field.set_type(*ty),
            FieldAttrValue::KeyOrdinal(ordinal) => field.set_key_ordinal(*ordinal),
            FieldAttrValue::Hidden(hidden) => field.set_hidden(*hidden),
            FieldAttrValue::Width(width) => field.set_width(*width),
        }
    }
}

pub type RestoreFn = Box<dyn FnOnce() -> Result<()> + Send>;

/// How to reverse an edit
pub enum Restore {
    /// Put each field's attribute back
    FieldAttrs(Vec<(Arc<Field>, FieldAttrValue)>),
    /// Put an option back at exactly the scope it was edited in
    OptionValue {
        options: SharedOptions,
        scope: Scope,
        name: String,
        /// Explicit value held at `scope` before the edit, `None` if unset
        previous: Option<OptionValue>,
    },
    /// Take an inserted field out of its table again
    RemoveField {
        table: Arc<LiveTable>,
        field: Arc<Field>,
    },
    /// Arbitrary restore action
    Custom(RestoreFn),
}

impl fmt::Debug for Restore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Restore::FieldAttrs(fields) => f
                .debug_list()
                .entries(fields.iter().map(|(field, value)| (field.name(), value)))
                .finish(),
            Restore::OptionValue {
                scope,
                name,
                previous,
                ..
            } => f
                .debug_struct("OptionValue")
                .field("scope", scope)
                .field("name", name)
                .field("previous", previous)
                .finish(),
            Restore::RemoveField { field, .. } => {
                f.debug_tuple("RemoveField").field(&field.name()).finish()
            }
            Restore::Custom(_) => f.write_str("Custom"),
        }
    }
}

#[derive(Debug)]
pub struct UndoRecord {
    /// Longname of the command that made the edit
    pub command: String,
    pub restore: Restore,
}

impl UndoRecord {
    pub fn new(command: impl Into<String>, restore: Restore) -> Self {
        Self {
            command: command.into(),
            restore,
        }
    }

    /// Reverse the edit
    pub fn apply(self) -> Result<()> {
        match self.restore {
            Restore::FieldAttrs(fields) => {
                for (field, value) in &fields {
                    value.restore(field);
                }
            }
            Restore::OptionValue {
                options,
                scope,
                name,
                previous,
            } => {
                let mut options = options.write();
                match previous {
                    Some(value) => {
                        options.set(&name, value, scope)?;
                    }
                    None => {
                        options.unset(&name, scope);
                    }
                }
            }
            Restore::RemoveField { table, field } => {
                table.remove_field(&field);
            }
            Restore::Custom(restore) => restore()?,
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct UndoStack {
    records: Vec<UndoRecord>,
}

impl UndoStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: UndoRecord) {
        tracing::debug!(command = %record.command, depth = self.records.len() + 1, "Undo recorded");
        self.records.push(record);
    }

    /// Reverse the most recent edit, returning its command name
    pub fn undo(&mut self) -> Result<Option<String>> {
        let Some(record) = self.records.pop() else {
            return Ok(None);
        };
        let command = record.command.clone();
        record.apply()?;
        tracing::debug!(command = %command, "Undone");
        Ok(Some(command))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
