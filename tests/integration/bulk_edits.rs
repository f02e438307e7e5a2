//! Bulk field edits from the columns view, with undo

use super::common::*;
use metaview::status::Priority;
use metaview::{
    run_command, run_keys, CellValue, CommandOutcome, FieldType, Focus, HostContext, KeySequence,
    LiveTable, MetaSheet,
};
use std::sync::Arc;

fn columns_of(ctx: &HostContext, table: &Arc<LiveTable>) -> MetaSheet {
    match run_command(ctx, Focus::Table(table), "columns-sheet", &mut cancel) {
        CommandOutcome::Opened(sheet) => sheet,
        other => panic!("columns-sheet did not open: {:?}", other),
    }
}

fn select(sheet: &mut MetaSheet, rows: &[usize]) {
    let MetaSheet::Columns(view) = sheet else {
        panic!("not a columns view");
    };
    for &row in rows {
        view.view_mut().select(row);
    }
}

fn types(table: &LiveTable) -> Vec<FieldType> {
    table.fields().iter().map(|f| f.field_type()).collect()
}

#[test]
fn test_retype_selection_to_date_and_undo() {
    let (ctx, _, orders) = host();
    let mut sheet = columns_of(&ctx, &orders);
    select(&mut sheet, &[1, 2, 3]);

    let outcome = run_command(&ctx, Focus::Meta(&mut sheet), "type-date-selected", &mut cancel);
    assert!(matches!(outcome, CommandOutcome::Edited(_)));
    assert_eq!(
        types(&orders),
        vec![
            FieldType::Untyped,
            FieldType::Date,
            FieldType::Date,
            FieldType::Date,
            FieldType::Untyped
        ]
    );
    let row = orders.row(0).unwrap();
    let placed = chrono::NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
    assert_eq!(orders.fields()[1].value(&row), Some(CellValue::Date(placed)));

    assert_eq!(ctx.undo().unwrap().as_deref(), Some("type-date-selected"));
    assert_eq!(types(&orders), vec![FieldType::Untyped; 5]);
}

#[test]
fn test_retype_by_key_on_focused_row() {
    let (ctx, _, orders) = host();
    let mut sheet = columns_of(&ctx, &orders);
    sheet.as_sheet_mut().set_cursor(0);

    let keys: KeySequence = "g #".parse().unwrap();
    let outcome = run_keys(&ctx, Focus::Meta(&mut sheet), &keys, &mut cancel).unwrap();
    assert!(matches!(outcome, CommandOutcome::Edited(_)));
    assert_eq!(orders.fields()[0].field_type(), FieldType::Integer);
    assert_eq!(orders.fields()[1].field_type(), FieldType::Untyped);
}

#[test]
fn test_join_first_and_last() {
    let (ctx, people, _) = host();
    let mut sheet = columns_of(&ctx, &people);
    select(&mut sheet, &[0, 1]);

    let outcome = run_command(&ctx, Focus::Meta(&mut sheet), "join-cols", &mut cancel);
    assert!(matches!(outcome, CommandOutcome::Edited(_)));

    let fields = people.fields();
    assert_eq!(fields.len(), 4);
    assert_eq!(fields[0].name(), "first+last");
    assert_eq!(fields[0].display(&people.row(0).unwrap()), "Ada Lovelace");
    assert_eq!(fields[0].display(&people.row(1).unwrap()), "Alan Turing");
    assert_eq!(sheet.as_sheet().row_count(), 4);

    ctx.undo().unwrap();
    let names: Vec<String> = people.fields().iter().map(|f| f.name()).collect();
    assert_eq!(names, vec!["first", "last", "born"]);
}

#[test]
fn test_joined_field_follows_part_edits() {
    let (ctx, people, _) = host();
    let mut sheet = columns_of(&ctx, &people);
    select(&mut sheet, &[0, 1]);
    run_command(&ctx, Focus::Meta(&mut sheet), "join-cols", &mut cancel);

    people
        .with_row_mut(0, |row| row[0] = CellValue::from("Augusta"))
        .unwrap();
    assert_eq!(people.fields()[0].display(&people.row(0).unwrap()), "Augusta Lovelace");
}

#[test]
fn test_resize_uses_visible_rows_only() {
    let (ctx, _, orders) = host();
    let mut sheet = columns_of(&ctx, &orders);
    sheet.as_sheet_mut().set_cursor(4);

    orders.set_viewport(Some(0..1));
    run_command(&ctx, Focus::Meta(&mut sheet), "resize-source-rows-max", &mut cancel);
    assert_eq!(orders.fields()[4].width(), Some(6));

    orders.set_viewport(None);
    run_command(&ctx, Focus::Meta(&mut sheet), "resize-source-rows-max", &mut cancel);
    assert_eq!(orders.fields()[4].width(), Some(18));

    ctx.undo().unwrap();
    assert_eq!(orders.fields()[4].width(), Some(6));
    ctx.undo().unwrap();
    assert_eq!(orders.fields()[4].width(), None);
}

#[test]
fn test_key_and_hide_selection() {
    let (ctx, people, _) = host();
    let mut sheet = columns_of(&ctx, &people);
    select(&mut sheet, &[2, 0]);

    run_command(&ctx, Focus::Meta(&mut sheet), "key-selected", &mut cancel);
    let ordinals: Vec<usize> = people.fields().iter().map(|f| f.key_ordinal()).collect();
    assert_eq!(ordinals, vec![1, 0, 2]);

    run_command(&ctx, Focus::Meta(&mut sheet), "hide-selected", &mut cancel);
    assert_eq!(people.visible_fields().len(), 1);

    run_command(&ctx, Focus::Meta(&mut sheet), "key-off-selected", &mut cancel);
    assert!(people.fields().iter().all(|f| !f.is_key()));

    assert_eq!(ctx.undo.lock().len(), 3);
}

#[test]
fn test_repeated_failure_collapses_in_status_log() {
    let ctx = HostContext::new();
    let empty = LiveTable::new("empty");
    ctx.register_table(&empty);
    let mut sheet = columns_of(&ctx, &empty);

    for _ in 0..2 {
        let outcome = run_command(&ctx, Focus::Meta(&mut sheet), "join-cols", &mut cancel);
        assert!(matches!(outcome, CommandOutcome::Failed(_)));
    }

    assert_eq!(ctx.status.len(), 1);
    let entry = ctx.status.last().unwrap();
    assert_eq!(entry.priority, Priority::ERROR);
    assert_eq!(entry.repeats(), 2);
    assert_eq!(entry.message(), "nothing to operate on (×2)");
    assert!(ctx.undo.lock().is_empty());
}
