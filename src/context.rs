//! Host context shared by every meta view
//!
//! One explicitly passed handle to the process-wide state: options, status
//! log, command and binding registries, undo stack and the open tables.
//! Tests build isolated instances with [`HostContext::new`].

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};

use crate::commands::{register_builtin_commands, BindingRegistry, CommandRegistry, ReferenceSource};
use crate::config::{default_bindings, Config};
use crate::error::{MetaError, Result};
use crate::model::{LiveTable, TableId};
use crate::options::{shared_with_builtins, OptionValue, Scope, SharedOptions};
use crate::status::StatusLog;
use crate::undo::UndoStack;

#[derive(Debug, Clone)]
pub struct HostContext {
    pub options: SharedOptions,
    pub status: Arc<StatusLog>,
    pub commands: Arc<RwLock<CommandRegistry>>,
    pub bindings: Arc<RwLock<BindingRegistry>>,
    pub undo: Arc<Mutex<UndoStack>>,
    tables: Arc<RwLock<Vec<Arc<LiveTable>>>>,
    reference: Arc<RwLock<ReferenceSource>>,
    /// Option overrides applied to tables by name when they are registered
    overrides: Arc<RwLock<HashMap<String, Vec<(String, OptionValue)>>>>,
}

impl Default for HostContext {
    fn default() -> Self {
        Self::new()
    }
}

impl HostContext {
    /// Context with built-in options, commands and default keybindings
    pub fn new() -> Self {
        let mut commands = CommandRegistry::new();
        register_builtin_commands(&mut commands);
        let mut bindings = BindingRegistry::new();
        default_bindings(&mut bindings);

        Self {
            options: shared_with_builtins(),
            status: Arc::new(StatusLog::default()),
            commands: Arc::new(RwLock::new(commands)),
            bindings: Arc::new(RwLock::new(bindings)),
            undo: Arc::new(Mutex::new(UndoStack::new())),
            tables: Arc::new(RwLock::new(Vec::new())),
            reference: Arc::new(RwLock::new(ReferenceSource::default())),
            overrides: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        let ctx = Self::new();
        config.apply(&ctx);
        ctx
    }

    /// Track a table and apply any configured overrides for its name
    pub fn register_table(&self, table: &Arc<LiveTable>) {
        let overrides = self.overrides.read().get(&table.name()).cloned();
        if let Some(values) = overrides {
            self.apply_overrides(table.id(), &values);
        }
        tracing::debug!(table = %table.name(), id = %table.id(), "Table registered");
        self.tables.write().push(table.clone());
    }

    /// Registered tables that are still alive
    pub fn tables(&self) -> Vec<Arc<LiveTable>> {
        let mut tables = self.tables.write();
        tables.retain(|t| t.is_alive());
        tables.clone()
    }

    pub fn find_table(&self, name: &str) -> Option<Arc<LiveTable>> {
        self.tables().into_iter().find(|t| t.name() == name)
    }

    /// Close a table: tear it down and forget its option overrides
    pub fn remove_table(&self, id: TableId) -> Option<Arc<LiveTable>> {
        let table = {
            let mut tables = self.tables.write();
            let index = tables.iter().position(|t| t.id() == id)?;
            tables.remove(index)
        };
        table.teardown();
        self.options.write().drop_context(id);
        Some(table)
    }

    /// Remember overrides for tables named `table_name`.
    ///
    /// Values that do not fit a registered option are returned and skipped.
    pub fn set_context_overrides(
        &self,
        table_name: &str,
        values: Vec<(String, OptionValue)>,
    ) -> Vec<MetaError> {
        let mut errors = Vec::new();
        let mut accepted = Vec::new();
        {
            let options = self.options.read();
            for (name, value) in values {
                let checked = options
                    .describe(&name)
                    .and_then(|info| value.coerce_to(info.value_type(), &name));
                match checked {
                    Ok(value) => accepted.push((name, value)),
                    Err(e) => errors.push(e),
                }
            }
        }

        for table in self.tables().iter().filter(|t| t.name() == table_name) {
            self.apply_overrides(table.id(), &accepted);
        }
        self.overrides.write().insert(table_name.to_string(), accepted);
        errors
    }

    fn apply_overrides(&self, id: TableId, values: &[(String, OptionValue)]) {
        let mut options = self.options.write();
        for (name, value) in values {
            if let Err(e) = options.set(name, value.clone(), Scope::Context(id)) {
                tracing::warn!(option = %name, error = %e, "Override rejected");
            }
        }
    }

    pub fn reference(&self) -> ReferenceSource {
        self.reference.read().clone()
    }

    pub fn set_reference(&self, source: ReferenceSource) {
        *self.reference.write() = source;
    }

    /// Report an error to the user as an error-level status entry
    pub fn report(&self, error: &MetaError) {
        self.status.error(error.to_string());
    }

    /// Undo the most recent edit. Failures are reported, never propagated.
    pub fn undo(&self) -> Result<Option<String>> {
        let result = self.undo.lock().undo();
        match &result {
            Ok(Some(command)) => {
                self.status.status(format!("undid {}", command));
            }
            Ok(None) => {
                self.status.warning("nothing to undo");
            }
            Err(e) => self.report(e),
        }
        result
    }
}
