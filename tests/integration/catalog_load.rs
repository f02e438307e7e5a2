//! Background loading of the command catalog

use std::sync::Arc;
use std::time::Duration;

use super::common::*;
use metaview::commands::contexts::{COLUMNS_SHEET, OPTIONS_SHEET};
use metaview::status::Priority;
use metaview::{
    run_command, CommandCatalog, CommandOutcome, Focus, HostContext, MetaSheet, ReferenceSource,
    Sheet,
};

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_readers_never_see_a_partial_catalog() {
    let ctx = HostContext::new();
    let catalog = CommandCatalog::new(&ctx, COLUMNS_SHEET);
    let expected = ctx.commands.read().iter(COLUMNS_SHEET).len();

    // The load cannot read the registry while it is write-locked here
    let registry = ctx.commands.write();
    let load = catalog.reload();
    for _ in 0..10 {
        tokio::time::sleep(Duration::from_millis(2)).await;
        let snapshot = catalog.snapshot();
        assert_eq!(snapshot.generation, 0);
        assert!(snapshot.rows.is_empty());
        assert!(snapshot.revbinds.is_empty());
        assert!(catalog.is_loading());
    }
    drop(registry);

    load.await.unwrap();
    let snapshot = catalog.snapshot();
    assert_eq!(snapshot.generation, 1);
    assert_eq!(snapshot.rows.len(), expected);
    assert!(!snapshot.revbinds.is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_readers_keep_previous_catalog_during_reload() {
    let ctx = HostContext::new();
    let catalog = CommandCatalog::new(&ctx, COLUMNS_SHEET);
    let first = catalog.reload_and_wait().await;
    assert_eq!(first.generation, 1);

    let registry = ctx.commands.write();
    let load = catalog.reload();
    for _ in 0..10 {
        tokio::time::sleep(Duration::from_millis(2)).await;
        assert!(Arc::ptr_eq(&catalog.snapshot(), &first));
        assert_eq!(catalog.row_count(), first.rows.len());
    }
    drop(registry);

    load.await.unwrap();
    assert_eq!(catalog.snapshot().generation, 2);
    assert_eq!(catalog.row_count(), first.rows.len());
}

#[tokio::test]
async fn test_superseded_load_does_not_publish() {
    let ctx = HostContext::new();
    let catalog = CommandCatalog::new(&ctx, COLUMNS_SHEET);
    let mut done = catalog.subscribe();

    let first = catalog.reload();
    let second = catalog.reload();
    first.await.unwrap();
    second.await.unwrap();

    assert_eq!(catalog.snapshot().generation, 2);
    assert!(!catalog.is_loading());
    tokio::time::timeout(Duration::from_secs(5), done.wait_for(|g| *g == 2))
        .await
        .unwrap()
        .unwrap();
}

#[tokio::test]
async fn test_catalog_reflects_registry_at_reload() {
    let ctx = HostContext::new();
    let catalog = CommandCatalog::new(&ctx, OPTIONS_SHEET);
    let before = catalog.reload_and_wait().await;
    assert_eq!(before.keystrokes("edit-option"), Some("e"));

    ctx.bindings.write().bind("C-e", "edit-option", OPTIONS_SHEET).unwrap();
    let after = catalog.reload_and_wait().await;
    assert_eq!(before.keystrokes("edit-option"), Some("e"));
    assert!(after.generation > before.generation);
    assert!(after.keystrokes("edit-option").is_some());
}

#[tokio::test]
async fn test_bad_reference_degrades_with_warning() {
    let ctx = HostContext::new();
    ctx.set_reference(ReferenceSource::Text("name\tdescription\nstatuses\tx\n".to_string()));
    let catalog = CommandCatalog::new(&ctx, COLUMNS_SHEET);
    let snapshot = catalog.reload_and_wait().await;

    assert!(snapshot.degraded);
    assert!(snapshot.revbinds.is_empty());
    assert!(catalog.row_count() > 0);
    assert_eq!(ctx.status.last().unwrap().priority, Priority::WARNING);

    let longname = catalog.headers().iter().position(|h| h.name == "longname").unwrap();
    let keystrokes = catalog.headers().iter().position(|h| h.name == "keystrokes").unwrap();
    assert!(!catalog.cell_display(0, longname).is_empty());
    assert_eq!(catalog.cell_display(0, keystrokes), "");
}

#[tokio::test]
async fn test_help_commands_opens_catalog_for_focused_view() {
    let (ctx, people, _) = host();
    let CommandOutcome::Opened(mut columns) =
        run_command(&ctx, Focus::Table(&people), "columns-sheet", &mut cancel)
    else {
        panic!("expected columns view");
    };
    let CommandOutcome::Opened(MetaSheet::Catalog(catalog)) =
        run_command(&ctx, Focus::Meta(&mut columns), "help-commands", &mut cancel)
    else {
        panic!("expected catalog");
    };
    assert_eq!(catalog.target(), COLUMNS_SHEET);

    let mut done = catalog.subscribe();
    tokio::time::timeout(Duration::from_secs(5), done.wait_for(|g| *g >= 1))
        .await
        .unwrap()
        .unwrap();
    assert!(catalog.longnames().iter().any(|n| n == "join-cols"));
    assert!(!catalog.longnames().iter().any(|n| n == "edit-option"));
}
