//! Command catalog: commands reachable from a context with keys and help
//!
//! Reloading runs on a tokio task. The task builds a complete
//! [`CatalogSnapshot`] (rows, help lookup and reverse key index) and then
//! publishes it by swapping one `Arc`. Readers always see either the empty
//! initial snapshot or a complete one, never a half-built index. A load that
//! has been superseded by a newer reload never publishes.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use super::adapter::{AttrColumn, ColumnSet};
use super::sheet::{ColumnHeader, Sheet};
use crate::commands::contexts::HELP_SHEET;
use crate::commands::{
    BindingRegistry, CommandRegistry, CommandSpec, ReferenceSource, ReferenceTable,
};
use crate::context::HostContext;
use crate::error::{MetaError, Result};
use crate::model::{CellValue, FieldType};
use crate::status::StatusLog;
use crate::undo::UndoRecord;

/// One reachable command
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogRow {
    /// Context that owns the command
    pub sheet: String,
    pub spec: Arc<CommandSpec>,
}

/// Everything one catalog load produced
#[derive(Debug, Default)]
pub struct CatalogSnapshot {
    pub generation: u64,
    pub rows: Vec<CatalogRow>,
    /// Help table keyed by (owner context, longname)
    pub cmddict: ReferenceTable,
    /// Nearest keystrokes per longname
    pub revbinds: HashMap<String, String>,
    /// The reference table could not be loaded
    pub degraded: bool,
}

impl CatalogSnapshot {
    pub fn keystrokes(&self, longname: &str) -> Option<&str> {
        self.revbinds.get(longname).map(String::as_str)
    }

    pub fn description(&self, sheet: &str, longname: &str) -> Option<&str> {
        self.cmddict.helpstr(sheet, longname)
    }

    /// Build the catalog of `target`. Without a reference table the help and
    /// keystroke columns stay empty.
    pub fn build(
        commands: &CommandRegistry,
        bindings: &BindingRegistry,
        target: &str,
        reference: Option<ReferenceTable>,
        generation: u64,
    ) -> Self {
        let rows = commands
            .iter(target)
            .into_iter()
            .map(|(sheet, spec)| CatalogRow { sheet, spec })
            .collect();

        let degraded = reference.is_none();
        let mut revbinds = HashMap::new();
        if !degraded {
            for binding in bindings.iter(&commands.chain(target)) {
                revbinds
                    .entry(binding.longname.clone())
                    .or_insert_with(|| binding.keys.to_string());
            }
        }

        Self {
            generation,
            rows,
            cmddict: reference.unwrap_or_default(),
            revbinds,
            degraded,
        }
    }
}

type Entry = (Arc<CatalogSnapshot>, CatalogRow);

fn catalog_columns() -> ColumnSet<Entry> {
    let columns = vec![
        AttrColumn::computed("sheet", FieldType::String, |(_, row): &Entry| {
            CellValue::from(row.sheet.as_str())
        }),
        AttrColumn::computed("longname", FieldType::String, |(_, row): &Entry| {
            CellValue::from(row.spec.longname.as_str())
        }),
        AttrColumn::computed("keystrokes", FieldType::String, |(snap, row): &Entry| {
            CellValue::from(snap.keystrokes(&row.spec.longname).unwrap_or_default())
        }),
        AttrColumn::computed("description", FieldType::String, |(snap, row): &Entry| {
            CellValue::from(snap.description(&row.sheet, &row.spec.longname).unwrap_or_default())
        }),
        AttrColumn::computed("execstr", FieldType::String, |(_, row): &Entry| {
            CellValue::from(row.spec.execstr.as_str())
        })
        .hidden(),
        AttrColumn::computed("replayable", FieldType::Untyped, |(_, row): &Entry| {
            CellValue::Bool(row.spec.replayable)
        })
        .hidden(),
    ];
    ColumnSet::new(columns, 2)
}

#[derive(Debug)]
pub struct CommandCatalog {
    target: String,
    commands: Arc<RwLock<CommandRegistry>>,
    bindings: Arc<RwLock<BindingRegistry>>,
    reference: ReferenceSource,
    status: Arc<StatusLog>,
    columns: ColumnSet<Entry>,
    published: Arc<RwLock<Arc<CatalogSnapshot>>>,
    requested: Arc<AtomicU64>,
    done: Arc<watch::Sender<u64>>,
    cursor: usize,
}

impl CommandCatalog {
    /// Catalog of the commands reachable from `target`. Empty until the
    /// first [`reload`](Self::reload) completes.
    pub fn new(ctx: &HostContext, target: &str) -> Self {
        let (done, _) = watch::channel(0);
        Self {
            target: target.to_string(),
            commands: ctx.commands.clone(),
            bindings: ctx.bindings.clone(),
            reference: ctx.reference(),
            status: ctx.status.clone(),
            columns: catalog_columns(),
            published: Arc::new(RwLock::new(Arc::new(CatalogSnapshot::default()))),
            requested: Arc::new(AtomicU64::new(0)),
            done: Arc::new(done),
            cursor: 0,
        }
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    /// The most recently published snapshot
    pub fn snapshot(&self) -> Arc<CatalogSnapshot> {
        self.published.read().clone()
    }

    /// Receives the generation of every published snapshot
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.done.subscribe()
    }

    pub fn is_loading(&self) -> bool {
        self.requested.load(Ordering::Acquire) > self.snapshot().generation
    }

    /// Start a background load. Must be called inside a tokio runtime.
    pub fn reload(&self) -> JoinHandle<()> {
        let generation = self.requested.fetch_add(1, Ordering::AcqRel) + 1;
        let target = self.target.clone();
        let commands = self.commands.clone();
        let bindings = self.bindings.clone();
        let source = self.reference.clone();
        let status = self.status.clone();
        let published = self.published.clone();
        let requested = self.requested.clone();
        let done = self.done.clone();

        tracing::debug!(context = %target, generation, "Catalog reload started");
        tokio::spawn(async move {
            let reference = match source.load().await {
                Ok(table) => Some(table),
                Err(e) => {
                    status.warning(e.to_string());
                    None
                }
            };

            let snapshot = CatalogSnapshot::build(
                &commands.read(),
                &bindings.read(),
                &target,
                reference,
                generation,
            );

            let mut slot = published.write();
            if requested.load(Ordering::Acquire) != generation || slot.generation >= generation {
                tracing::debug!(context = %target, generation, "Catalog load superseded");
                return;
            }
            let rows = snapshot.rows.len();
            *slot = Arc::new(snapshot);
            drop(slot);
            done.send_replace(generation);
            tracing::debug!(context = %target, generation, rows, "Catalog published");
        })
    }

    /// Reload and wait for the result to be published
    pub async fn reload_and_wait(&self) -> Arc<CatalogSnapshot> {
        if let Err(e) = self.reload().await {
            tracing::warn!(error = %e, "Catalog load task failed");
        }
        self.snapshot()
    }

    fn entry(&self, row: usize) -> Option<Entry> {
        let snapshot = self.snapshot();
        let item = snapshot.rows.get(row)?.clone();
        Some((snapshot, item))
    }

    pub fn longnames(&self) -> Vec<String> {
        self.snapshot()
            .rows
            .iter()
            .map(|r| r.spec.longname.clone())
            .collect()
    }
}

impl Sheet for CommandCatalog {
    fn name(&self) -> String {
        format!("{}_commands", self.target)
    }

    fn context(&self) -> &'static str {
        HELP_SHEET
    }

    fn headers(&self) -> Vec<ColumnHeader> {
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

    fn row_count(&self) -> usize {
        self.snapshot().rows.len()
    }

    fn cell_display(&self, row: usize, col: usize) -> String {
        match (self.entry(row), self.columns.get(col)) {
            (Some(entry), Some(column)) => column.display(&entry),
            _ => String::new(),
        }
    }

    fn set_cell(&mut self, _row: usize, col: usize, _input: &str) -> Result<UndoRecord> {
        let name = self
            .columns
            .get(col)
            .map(|c| c.name.clone())
            .unwrap_or_else(|| "command".to_string());
        Err(MetaError::ReadOnly(name))
    }

    fn cursor(&self) -> usize {
        self.cursor.min(self.row_count().saturating_sub(1))
    }

    fn set_cursor(&mut self, row: usize) {
        self.cursor = row;
    }

    /// Catalog rows are browsed, not selected
    fn selection(&self) -> Vec<usize> {
        Vec::new()
    }

    /// Starts a background load when a runtime is available
    fn reload(&mut self) {
        if tokio::runtime::Handle::try_current().is_ok() {
            drop(CommandCatalog::reload(self));
        } else {
            tracing::warn!(context = %self.target, "No runtime for catalog reload");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::contexts::COLUMNS_SHEET;

    #[tokio::test]
    async fn test_catalog_lists_reachable_commands() {
        let ctx = HostContext::new();
        let catalog = CommandCatalog::new(&ctx, COLUMNS_SHEET);
        assert_eq!(catalog.row_count(), 0);

        let snapshot = catalog.reload_and_wait().await;
        assert!(!snapshot.degraded);
        let names = catalog.longnames();
        assert!(names.contains(&"type-date-selected".to_string()));
        assert!(names.contains(&"statuses".to_string()));
        assert!(!names.contains(&"edit-option".to_string()));
        assert_eq!(snapshot.keystrokes("hide-selected"), Some("g -"));
        assert_eq!(snapshot.keystrokes("statuses"), Some("C-p"));
        assert_eq!(
            snapshot.description("ColumnsSheet", "join-cols"),
            Some("add a column joining the selected columns")
        );
        assert!(!catalog.is_loading());
    }

    #[tokio::test]
    async fn test_nearest_binding_wins() {
        let ctx = HostContext::new();
        ctx.bindings
            .write()
            .bind("C-s", "statuses", COLUMNS_SHEET)
            .unwrap();
        let catalog = CommandCatalog::new(&ctx, COLUMNS_SHEET);
        let snapshot = catalog.reload_and_wait().await;
        assert_eq!(snapshot.keystrokes("statuses"), Some("C-s"));
    }

    #[tokio::test]
    async fn test_missing_reference_degrades_to_empty_columns() {
        let ctx = HostContext::new();
        ctx.set_reference(ReferenceSource::File("/nonexistent/commands.tsv".into()));
        let catalog = CommandCatalog::new(&ctx, COLUMNS_SHEET);
        let snapshot = catalog.reload_and_wait().await;

        assert!(snapshot.degraded);
        assert!(!snapshot.rows.is_empty());
        assert_eq!(catalog.cell_display(0, 2), "");
        assert_eq!(catalog.cell_display(0, 3), "");
        assert_eq!(ctx.status.len(), 1);
        assert_eq!(
            ctx.status.last().map(|e| e.priority),
            Some(crate::status::Priority::WARNING)
        );
    }

    #[tokio::test]
    async fn test_completion_is_signalled() {
        let ctx = HostContext::new();
        let catalog = CommandCatalog::new(&ctx, "global");
        let mut rx = catalog.subscribe();
        let _load = catalog.reload();
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow(), 1);
        assert_eq!(catalog.snapshot().generation, 1);
    }
}
