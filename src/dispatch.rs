//! Command dispatch for the meta views
//!
//! [`run_command`] resolves a longname through the context chain of the
//! focused view, runs the matching [`MetaAction`] and pushes its undo record.
//! Failures are reported as error status entries and never escape.

use std::str::FromStr;
use std::sync::Arc;

use crate::commands::contexts::{GLOBAL, SHEET};
use crate::commands::MetaAction;
use crate::config::KeySequence;
use crate::context::HostContext;
use crate::error::{MetaError, Result};
use crate::meta::columns::JOIN_SEPARATOR;
use crate::meta::{ColumnsView, CommandCatalog, OptionsView, Prompt, Sheet, StatusView};
use crate::model::{LiveTable, TableId};
use crate::options::Scope;
use crate::undo::UndoRecord;

/// A meta view the host can show and route commands to
#[derive(Debug)]
pub enum MetaSheet {
    Status(StatusView),
    Columns(ColumnsView),
    Options(OptionsView),
    Catalog(CommandCatalog),
}

impl MetaSheet {
    pub fn as_sheet(&self) -> &dyn Sheet {
        match self {
            MetaSheet::Status(v) => v,
            MetaSheet::Columns(v) => v,
            MetaSheet::Options(v) => v,
            MetaSheet::Catalog(v) => v,
        }
    }

    pub fn as_sheet_mut(&mut self) -> &mut dyn Sheet {
        match self {
            MetaSheet::Status(v) => v,
            MetaSheet::Columns(v) => v,
            MetaSheet::Options(v) => v,
            MetaSheet::Catalog(v) => v,
        }
    }

    /// Identity usable as an option scope. The catalog has none.
    pub fn id(&self) -> Option<TableId> {
        match self {
            MetaSheet::Status(v) => Some(v.id()),
            MetaSheet::Columns(v) => Some(v.id()),
            MetaSheet::Options(v) => Some(v.view().id()),
            MetaSheet::Catalog(_) => None,
        }
    }
}

/// What the user is looking at when a command runs
#[derive(Debug)]
pub enum Focus<'a> {
    Table(&'a Arc<LiveTable>),
    Meta(&'a mut MetaSheet),
    None,
}

impl Focus<'_> {
    /// Owner context commands are resolved from
    pub fn context(&self) -> &'static str {
        match self {
            Focus::Table(_) => SHEET,
            Focus::Meta(sheet) => sheet.as_sheet().context(),
            Focus::None => GLOBAL,
        }
    }

    fn name(&self) -> String {
        match self {
            Focus::Table(table) => table.name(),
            Focus::Meta(sheet) => sheet.as_sheet().name(),
            Focus::None => GLOBAL.to_string(),
        }
    }
}

/// Result of one dispatched command
#[derive(Debug)]
pub enum CommandOutcome {
    /// A new view should be pushed
    Opened(MetaSheet),
    /// The focused view changed something; the name is the undo label
    Edited(String),
    /// The user backed out of a prompt
    Cancelled,
    /// The command failed and was reported to the status log
    Failed(MetaError),
}

/// Run `longname` against `focus`.
///
/// The command must be reachable from the focused view's context. Errors are
/// turned into error-level status entries.
pub fn run_command(
    ctx: &HostContext,
    focus: Focus<'_>,
    longname: &str,
    prompt: &mut dyn Prompt,
) -> CommandOutcome {
    let context = focus.context();
    tracing::debug!(command = %longname, context, "Running command");

    match execute(ctx, focus, context, longname, prompt) {
        Ok(Step::Open(sheet)) => CommandOutcome::Opened(sheet),
        Ok(Step::Edit(record)) => {
            let label = record.command.clone();
            ctx.undo.lock().push(record);
            CommandOutcome::Edited(label)
        }
        Ok(Step::Cancel) => CommandOutcome::Cancelled,
        Err(e) => {
            tracing::debug!(command = %longname, error = %e, "Command failed");
            ctx.report(&e);
            CommandOutcome::Failed(e)
        }
    }
}

/// Look up the command bound to `keys` from the focused view and run it
pub fn run_keys(
    ctx: &HostContext,
    focus: Focus<'_>,
    keys: &KeySequence,
    prompt: &mut dyn Prompt,
) -> Option<CommandOutcome> {
    let chain = ctx.commands.read().chain(focus.context());
    let longname = ctx.bindings.read().resolve(keys, &chain)?;
    Some(run_command(ctx, focus, &longname, prompt))
}

enum Step {
    Open(MetaSheet),
    Edit(UndoRecord),
    Cancel,
}

fn execute(
    ctx: &HostContext,
    focus: Focus<'_>,
    context: &str,
    longname: &str,
    prompt: &mut dyn Prompt,
) -> Result<Step> {
    if ctx.commands.read().resolve(context, longname).is_none() {
        return Err(MetaError::UnknownCommand(longname.to_string()));
    }
    let action = MetaAction::from_str(longname).map_err(MetaError::UnknownCommand)?;

    match action {
        MetaAction::Statuses => Ok(Step::Open(MetaSheet::Status(StatusView::new(
            ctx.status.clone(),
            &ctx.options,
        )))),
        MetaAction::ColumnsAll => Ok(Step::Open(MetaSheet::Columns(ColumnsView::new(
            &ctx.tables(),
        )))),
        MetaAction::OptionsGlobal => Ok(Step::Open(MetaSheet::Options(OptionsView::global(
            ctx.options.clone(),
        )))),
        MetaAction::ColumnsSheet => match focus {
            Focus::Table(table) => {
                let view = ColumnsView::new(&[table.clone()]);
                Ok(Step::Open(MetaSheet::Columns(view)))
            }
            other => Err(MetaError::UnknownCommand(format!("{} on {}", longname, other.name()))),
        },
        MetaAction::OptionsSheet => {
            let id = match &focus {
                Focus::Table(table) => Some(table.id()),
                Focus::Meta(sheet) => sheet.id(),
                Focus::None => None,
            };
            let view = match id {
                Some(id) => OptionsView::new(
                    ctx.options.clone(),
                    Scope::Context(id),
                    format!("{}_options", focus.name()),
                ),
                None => OptionsView::global(ctx.options.clone()),
            };
            Ok(Step::Open(MetaSheet::Options(view)))
        }
        MetaAction::HelpCommands => {
            let mut catalog = CommandCatalog::new(ctx, context);
            Sheet::reload(&mut catalog);
            Ok(Step::Open(MetaSheet::Catalog(catalog)))
        }
        MetaAction::EditOption => {
            let Focus::Meta(MetaSheet::Options(view)) = focus else {
                return Err(MetaError::UnknownCommand(longname.to_string()));
            };
            let row = view.view().cursor_row().ok_or(MetaError::NothingSelected)?;
            match view.edit_option(row, prompt)? {
                Some(record) => {
                    view.reload();
                    Ok(Step::Edit(record))
                }
                None => Ok(Step::Cancel),
            }
        }
        MetaAction::ResizeSourceRowsMax
        | MetaAction::JoinCols
        | MetaAction::KeySelected
        | MetaAction::KeyOffSelected
        | MetaAction::HideSelected
        | MetaAction::TypeSelected(_) => {
            let Focus::Meta(MetaSheet::Columns(view)) = focus else {
                return Err(MetaError::UnknownCommand(longname.to_string()));
            };
            let record = match action {
                MetaAction::ResizeSourceRowsMax => view.resize_to_visible_max()?,
                MetaAction::JoinCols => view.join(JOIN_SEPARATOR)?,
                MetaAction::KeySelected => view.set_keys()?,
                MetaAction::KeyOffSelected => view.unset_keys()?,
                MetaAction::HideSelected => view.hide()?,
                MetaAction::TypeSelected(field_type) => view.set_type(field_type)?,
                _ => return Err(MetaError::UnknownCommand(longname.to_string())),
            };
            Ok(Step::Edit(record))
        }
    }
}

/// Edit one cell of a meta view and record the undo
pub fn edit_cell(
    ctx: &HostContext,
    sheet: &mut MetaSheet,
    row: usize,
    col: usize,
    input: &str,
) -> Result<()> {
    match sheet.as_sheet_mut().set_cell(row, col, input) {
        Ok(record) => {
            ctx.undo.lock().push(record);
            Ok(())
        }
        Err(e) => {
            ctx.report(&e);
            Err(e)
        }
    }
}
