//! Live tables and host contexts shared by the integration suites

use std::sync::Arc;

use metaview::{HostContext, LiveTable};

/// Three fields, two rows
pub fn people() -> Arc<LiveTable> {
    let table = LiveTable::with_columns("people", &["first", "last", "born"]);
    table.add_row(vec!["Ada".into(), "Lovelace".into(), "1815-12-10".into()]);
    table.add_row(vec!["Alan".into(), "Turing".into(), "1912-06-23".into()]);
    table
}

/// Five fields, three rows of differing widths
pub fn orders() -> Arc<LiveTable> {
    let table = LiveTable::with_columns("orders", &["id", "placed", "shipped", "due", "note"]);
    table.add_row(vec![
        "1".into(),
        "2024-01-05".into(),
        "2024-01-07".into(),
        "2024-02-01".into(),
        "rush".into(),
    ]);
    table.add_row(vec![
        "2".into(),
        "2024-03-11".into(),
        "2024-03-12".into(),
        "2024-04-01".into(),
        "gift wrap please".into(),
    ]);
    table.add_row(vec![
        "3".into(),
        "2024-05-20".into(),
        "".into(),
        "2024-06-01".into(),
        "".into(),
    ]);
    table
}

/// A host context with `people` and `orders` registered
pub fn host() -> (HostContext, Arc<LiveTable>, Arc<LiveTable>) {
    let ctx = HostContext::new();
    let people = people();
    let orders = orders();
    ctx.register_table(&people);
    ctx.register_table(&orders);
    (ctx, people, orders)
}

/// Prompt that always cancels
pub fn cancel(_: &str, _: &str) -> Option<String> {
    None
}

/// Tab separated dump with tabs shown as ` | ` for readable snapshots
pub fn dump(sheet: &dyn metaview::Sheet) -> String {
    sheet.text_dump(false).replace('\t', " | ")
}
