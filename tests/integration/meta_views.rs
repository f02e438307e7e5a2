//! Meta views observed through the dispatcher and the renderer

use super::common::*;
use metaview::{run_command, CommandOutcome, Focus, MetaSheet, OptionsView, Sheet, StatusView};

fn open(ctx: &metaview::HostContext, focus: Focus<'_>, longname: &str) -> MetaSheet {
    match run_command(ctx, focus, longname, &mut cancel) {
        CommandOutcome::Opened(sheet) => sheet,
        other => panic!("{} did not open a view: {:?}", longname, other),
    }
}

#[test]
fn test_columns_sheet_dump() {
    let (ctx, people, _) = host();
    let sheet = open(&ctx, Focus::Table(&people), "columns-sheet");
    insta::assert_snapshot!(dump(sheet.as_sheet()), @r"
    name | width | type | fmtstr | value | keycol | hidden
    first |  | anytype |  | Ada | 0 | false
    last |  | anytype |  | Lovelace | 0 | false
    born |  | anytype |  | 1815-12-10 | 0 | false
    ");
}

#[test]
fn test_columns_view_follows_live_edits() {
    let (ctx, people, _) = host();
    let sheet = open(&ctx, Focus::Table(&people), "columns-sheet");

    people.fields()[0].set_name("given");
    people.set_cursor_row(1);
    let sheet = sheet.as_sheet();
    assert_eq!(sheet.cell_display(0, 1), "given");
    assert_eq!(sheet.cell_display(0, 6), "Alan");
}

#[test]
fn test_columns_all_lists_visible_fields_with_owner() {
    let (ctx, people, orders) = host();
    people.fields()[1].set_hidden(true);
    let sheet = open(&ctx, Focus::None, "columns-all");
    let sheet = sheet.as_sheet();

    assert_eq!(sheet.row_count(), 2 + orders.fields().len());
    assert!(!sheet.headers()[0].is_hidden());
    assert_eq!(sheet.cell_display(0, 0), "people");
    assert_eq!(sheet.cell_display(2, 0), "orders");
    assert_eq!(sheet.cell_display(2, 1), "id");
}

#[test]
fn test_closed_table_empties_its_columns_view() {
    let (ctx, people, _) = host();
    let mut sheet = open(&ctx, Focus::Table(&people), "columns-sheet");
    ctx.remove_table(people.id());
    sheet.as_sheet_mut().reload();
    assert_eq!(sheet.as_sheet().row_count(), 0);
}

#[test]
fn test_global_options_dump() {
    let ctx = metaview::HostContext::new();
    let view = OptionsView::global(ctx.options.clone());
    insta::assert_snapshot!(dump(&view), @r"
    option | global_value | default | description | replayable
    default_width | 20 | 20 | default column width | true
    visibility | 0 | 0 | visibility level (0=low, 1=high) | true
    show_repeat_counts | true | true | append repeat counts to collapsed status messages | false
    color_error | red | red | color of error status rows | false
    color_warning | yellow | yellow | color of warning status rows | false
    color_key_col | cyan | cyan | color of key field rows | false
    color_hidden_col | darkgray | darkgray | color of hidden field rows | false
    ");
}

#[test]
fn test_status_view_dump_newest_first() {
    let ctx = metaview::HostContext::new();
    ctx.status.status("opened people.csv");
    ctx.status.warning("3 rows skipped");
    ctx.status.warning("3 rows skipped");
    ctx.status.error("type mismatch");
    let view = StatusView::new(ctx.status.clone(), &ctx.options);
    insta::assert_snapshot!(dump(&view), @r"
    message
    type mismatch
    3 rows skipped (×2)
    opened people.csv
    ");
}

#[test]
fn test_status_view_renders_messages() {
    let ctx = metaview::HostContext::new();
    ctx.status.status("opened people.csv");
    ctx.status.error("type mismatch");
    let view = StatusView::new(ctx.status.clone(), &ctx.options);

    let terminal = render_sheet(&view, &ctx.options, 40, 5);
    let buffer = terminal.backend().buffer();
    assert!(buffer_contains(buffer, "message"));
    assert!(buffer_contains(buffer, "type mismatch"));
    assert!(!buffer_contains(buffer, "nrepeats"));
}

#[test]
fn test_columns_view_renders_without_hidden_columns() {
    let (ctx, people, _) = host();
    let sheet = open(&ctx, Focus::Table(&people), "columns-sheet");
    let terminal = render_sheet(sheet.as_sheet(), &ctx.options, 160, 6);
    let text = buffer_to_trimmed_string(terminal.backend().buffer());
    assert!(text.contains("Lovelace"));
    assert!(!text.contains("ncalcs"));
    assert!(!text.contains("people"));
}
