//! Scoped configuration registry
//!
//! Lookups walk three tiers: a value set explicitly for the table context,
//! then a value set explicitly at global scope, then the declared default.

use std::collections::HashMap;
use std::sync::Arc;

use super::value::{OptionType, OptionValue};
use crate::error::{MetaError, Result};
use crate::model::TableId;

/// Where an option value is read from or written to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    Global,
    Context(TableId),
}

impl Scope {
    pub fn is_global(&self) -> bool {
        matches!(self, Scope::Global)
    }
}

/// Static registration data of an option
#[derive(Debug, Clone, PartialEq)]
pub struct OptionInfo {
    pub name: String,
    pub default: OptionValue,
    pub helpstr: String,
    pub replayable: bool,
}

impl OptionInfo {
    pub fn value_type(&self) -> OptionType {
        self.default.value_type()
    }
}

#[derive(Debug, Default)]
pub struct OptionRegistry {
    declared: Vec<Arc<OptionInfo>>,
    index: HashMap<String, usize>,
    global: HashMap<String, OptionValue>,
    scoped: HashMap<TableId, HashMap<String, OptionValue>>,
}

impl OptionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare an option. Re-declaring replaces the registration in place.
    pub fn declare(
        &mut self,
        name: &str,
        default: impl Into<OptionValue>,
        helpstr: &str,
        replayable: bool,
    ) -> Arc<OptionInfo> {
        let info = Arc::new(OptionInfo {
            name: name.to_string(),
            default: default.into(),
            helpstr: helpstr.to_string(),
            replayable,
        });
        match self.index.get(name) {
            Some(&slot) => self.declared[slot] = info.clone(),
            None => {
                self.index.insert(name.to_string(), self.declared.len());
                self.declared.push(info.clone());
            }
        }
        info
    }

    /// Option names in declaration order
    pub fn keys(&self) -> Vec<String> {
        self.declared.iter().map(|info| info.name.clone()).collect()
    }

    pub fn describe(&self, name: &str) -> Result<Arc<OptionInfo>> {
        self.index
            .get(name)
            .map(|&slot| self.declared[slot].clone())
            .ok_or_else(|| MetaError::UnknownOption(name.to_string()))
    }

    /// Effective value of `name` at `scope`
    pub fn get(&self, name: &str, scope: Scope) -> Result<OptionValue> {
        let info = self.describe(name)?;
        if let Scope::Context(id) = scope {
            if let Some(value) = self.scoped.get(&id).and_then(|values| values.get(name)) {
                return Ok(value.clone());
            }
        }
        Ok(self
            .global
            .get(name)
            .cloned()
            .unwrap_or_else(|| info.default.clone()))
    }

    /// Value set explicitly at exactly this scope, if any
    pub fn get_explicit(&self, name: &str, scope: Scope) -> Option<OptionValue> {
        match scope {
            Scope::Global => self.global.get(name).cloned(),
            Scope::Context(id) => self.scoped.get(&id).and_then(|v| v.get(name)).cloned(),
        }
    }

    /// Set `name` at `scope`, converting to the declared type.
    ///
    /// Returns the explicit value previously held at that scope.
    pub fn set(
        &mut self,
        name: &str,
        value: OptionValue,
        scope: Scope,
    ) -> Result<Option<OptionValue>> {
        let info = self.describe(name)?;
        let value = value.coerce_to(info.value_type(), name)?;
        tracing::debug!(option = name, value = %value, ?scope, "Option set");
        let previous = match scope {
            Scope::Global => self.global.insert(name.to_string(), value),
            Scope::Context(id) => self
                .scoped
                .entry(id)
                .or_default()
                .insert(name.to_string(), value),
        };
        Ok(previous)
    }

    /// Parse user input and set it
    pub fn set_str(
        &mut self,
        name: &str,
        input: &str,
        scope: Scope,
    ) -> Result<Option<OptionValue>> {
        let info = self.describe(name)?;
        let value = OptionValue::parse_as(input, info.value_type(), name)?;
        self.set(name, value, scope)
    }

    /// Remove the explicit value at `scope`
    pub fn unset(&mut self, name: &str, scope: Scope) -> Option<OptionValue> {
        match scope {
            Scope::Global => self.global.remove(name),
            Scope::Context(id) => {
                let values = self.scoped.get_mut(&id)?;
                let previous = values.remove(name);
                if values.is_empty() {
                    self.scoped.remove(&id);
                }
                previous
            }
        }
    }

    /// Forget every override of a context
    pub fn drop_context(&mut self, id: TableId) {
        self.scoped.remove(&id);
    }
}
