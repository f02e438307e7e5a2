//! Option resolution across global and table scopes

use std::collections::HashMap;

use super::common::*;
use metaview::options::shared_with_builtins;
use metaview::{
    run_command, CommandOutcome, Config, Focus, HostContext, MetaSheet, OptionValue, OptionsView,
    Scope, Sheet, TableId,
};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Set(usize, i64),
    Unset(usize),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0usize..3, 0i64..40).prop_map(|(scope, value)| Op::Set(scope, value)),
        (0usize..3).prop_map(Op::Unset),
    ]
}

proptest! {
    #[test]
    fn test_resolution_matches_three_tier_model(ops in prop::collection::vec(op(), 0..24)) {
        let options = shared_with_builtins();
        let scopes = [
            Scope::Global,
            Scope::Context(TableId::new()),
            Scope::Context(TableId::new()),
        ];
        let mut explicit: HashMap<usize, i64> = HashMap::new();

        for op in &ops {
            match *op {
                Op::Set(i, value) => {
                    options
                        .write()
                        .set("default_width", OptionValue::Int(value), scopes[i])
                        .unwrap();
                    explicit.insert(i, value);
                }
                Op::Unset(i) => {
                    options.write().unset("default_width", scopes[i]);
                    explicit.remove(&i);
                }
            }
        }

        let global = explicit.get(&0).copied().unwrap_or(20);
        let resolved = options.read().get("default_width", scopes[0]).unwrap();
        prop_assert_eq!(resolved, OptionValue::Int(global));
        for i in 1..3 {
            let expected = explicit.get(&i).copied().unwrap_or(global);
            let resolved = options.read().get("default_width", scopes[i]).unwrap();
            prop_assert_eq!(resolved, OptionValue::Int(expected));
        }
    }

    #[test]
    fn test_edit_then_undo_restores_exact_state(
        preset_global in prop::option::of(0i64..40),
        preset_context in prop::option::of(0i64..40),
        edit_context in any::<bool>(),
        value in 0i64..40,
    ) {
        let ctx = HostContext::new();
        let id = TableId::new();
        {
            let mut options = ctx.options.write();
            if let Some(v) = preset_global {
                options.set("default_width", OptionValue::Int(v), Scope::Global).unwrap();
            }
            if let Some(v) = preset_context {
                options.set("default_width", OptionValue::Int(v), Scope::Context(id)).unwrap();
            }
        }
        let scope = if edit_context { Scope::Context(id) } else { Scope::Global };
        let view = OptionsView::new(ctx.options.clone(), scope, "t_options");
        let row = view.position("default_width").unwrap();

        let record = view.set_value(row, &value.to_string()).unwrap();
        ctx.undo.lock().push(record);
        prop_assert_eq!(
            ctx.options.read().get_explicit("default_width", scope),
            Some(OptionValue::Int(value))
        );

        ctx.undo().unwrap();
        let options = ctx.options.read();
        prop_assert_eq!(
            options.get_explicit("default_width", Scope::Global),
            preset_global.map(OptionValue::Int)
        );
        prop_assert_eq!(
            options.get_explicit("default_width", Scope::Context(id)),
            preset_context.map(OptionValue::Int)
        );
    }
}

#[test]
fn test_table_scoped_view_flags_only_overrides() {
    let (ctx, people, _) = host();
    let CommandOutcome::Opened(MetaSheet::Options(view)) =
        run_command(&ctx, Focus::Table(&people), "options-sheet", &mut cancel)
    else {
        panic!("expected options view");
    };
    assert_eq!(view.headers()[1].name, "sheet_value");
    assert_eq!(view.value_display("default_width").unwrap(), "");

    ctx.options
        .write()
        .set("default_width", OptionValue::Int(30), Scope::Global)
        .unwrap();
    assert_eq!(view.value_display("default_width").unwrap(), "30");
    assert_eq!(view.default_display("default_width").unwrap(), "20");

    ctx.options
        .write()
        .set("default_width", OptionValue::Int(20), Scope::Context(people.id()))
        .unwrap();
    assert_eq!(view.value_display("default_width").unwrap(), "");
}

#[test]
fn test_edit_writes_only_the_views_scope() {
    let (ctx, people, orders) = host();
    let CommandOutcome::Opened(mut sheet) =
        run_command(&ctx, Focus::Table(&people), "options-sheet", &mut cancel)
    else {
        panic!("expected options view");
    };
    let MetaSheet::Options(view) = &mut sheet else {
        panic!("expected options view");
    };
    let row = view.position("default_width").unwrap();
    view.view_mut().set_cursor(row);

    let mut answer = |_: &str, seed: &str| -> Option<String> {
        assert_eq!(seed, "20");
        Some("8".to_string())
    };
    let outcome = run_command(&ctx, Focus::Meta(&mut sheet), "edit-option", &mut answer);
    assert!(matches!(outcome, CommandOutcome::Edited(_)));

    let options = ctx.options.read();
    let width = |id: TableId| options.get("default_width", Scope::Context(id));
    assert_eq!(width(people.id()).unwrap(), OptionValue::Int(8));
    assert_eq!(width(orders.id()).unwrap(), OptionValue::Int(20));
    assert_eq!(options.get_explicit("default_width", Scope::Global), None);
}

#[test]
fn test_config_overrides_apply_when_table_opens() {
    let config = Config::from_toml_str(
        r#"
        [options]
        default_width = 14

        [options.context.orders]
        default_width = 9
        visibility = "high"
        "#,
    )
    .unwrap();

    let ctx = HostContext::from_config(&config);
    assert_eq!(ctx.status.len(), 1);

    let orders = orders();
    let people = people();
    ctx.register_table(&orders);
    ctx.register_table(&people);

    let options = ctx.options.read();
    let width = |id: TableId| options.get("default_width", Scope::Context(id));
    assert_eq!(width(orders.id()).unwrap(), OptionValue::Int(9));
    assert_eq!(width(people.id()).unwrap(), OptionValue::Int(14));
}

#[test]
fn test_closing_a_table_forgets_its_overrides() {
    let (ctx, people, _) = host();
    ctx.options
        .write()
        .set("visibility", OptionValue::Int(1), Scope::Context(people.id()))
        .unwrap();
    ctx.remove_table(people.id());
    assert_eq!(ctx.options.read().get_explicit("visibility", Scope::Context(people.id())), None);
}
