//! Tests for value resolution, directly and through a binder.

mod common;

use formbinder::prelude::*;
use formbinder::value::resolve_value;
use serde_json::json;

use common::{Recording, field};

// ============================================================================
// resolve_value
// ============================================================================

#[test]
fn test_nothing_declared_omits_value() {
    assert_eq!(resolve_value(None, None, None), None);
    assert_eq!(resolve_value(None, Some(&json!("")), None), None);
}

#[test]
fn test_builtin_default_yields_to_context() {
    let default = json!("");
    assert_eq!(
        resolve_value(Some(&json!("")), Some(&default), Some(json!("x"))),
        Some(json!("x"))
    );
}

#[test]
fn test_builtin_default_kept_without_context_value() {
    let default = json!(0);
    assert_eq!(resolve_value(Some(&json!(0)), Some(&default), None), Some(json!(0)));
}

#[test]
fn test_declared_value_wins_over_context() {
    assert_eq!(
        resolve_value(Some(&json!("y")), Some(&json!("")), Some(json!("x"))),
        Some(json!("y"))
    );
}

#[test]
fn test_declared_value_without_builtin_default() {
    assert_eq!(resolve_value(Some(&json!("y")), None, Some(json!("x"))), Some(json!("y")));
}

#[test]
fn test_context_value_used_when_nothing_declared() {
    assert_eq!(resolve_value(None, None, Some(json!([1, 2]))), Some(json!([1, 2])));
}

// ============================================================================
// Through a binder
// ============================================================================

fn held(value: serde_json::Value) -> std::sync::Arc<Recording> {
    Recording::with_form(MemoryForm::new().with_data(json!({ "city": value })))
}

#[test]
fn test_binder_takes_over_widget_default() {
    let ctx = held(json!("x"));
    let widget = WidgetProps::new()
        .with_config(FieldConfig::new().name("city"))
        .with_default_value("")
        .with_value("");

    let binder = Binder::new(ctx, FieldConfig::new(), [widget]).unwrap();

    assert_eq!(binder.render().value, Some(json!("x")));
}

#[test]
fn test_binder_respects_widget_override() {
    let ctx = held(json!("x"));
    let widget = WidgetProps::new()
        .with_config(FieldConfig::new().name("city"))
        .with_default_value("")
        .with_value("y");

    let binder = Binder::new(ctx, FieldConfig::new(), [widget]).unwrap();

    assert_eq!(binder.render_widget().value, Some(json!("y")));
}

#[test]
fn test_binder_omits_value_when_neither_defined() {
    let ctx = Recording::new();
    let binder = Binder::new(ctx.clone(), FieldConfig::new().name("city"), [WidgetProps::new()])
        .unwrap();

    let patch = binder.render();

    assert_eq!(patch.value, None);
    assert!(patch.attrs.is_empty());
    assert!(ctx.form.get_value(&field("city")).is_none());
}
