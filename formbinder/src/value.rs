//! Value resolution: which value a bound widget displays.

use serde_json::Value;

/// Pick the value handed to the widget for this render.
///
/// - `declared`: the value explicitly declared on the widget, if any
/// - `builtin_default`: the widget type's own default value
/// - `held`: the value the form context holds for the field
///
/// Returns `None` when the value prop should be omitted, leaving the widget
/// to manage its own state. A declared value equal to the widget's built-in
/// default is a placeholder and yields to a held value; any other declared
/// value wins over the context.
pub fn resolve_value(
    declared: Option<&Value>,
    builtin_default: Option<&Value>,
    held: Option<Value>,
) -> Option<Value> {
    match (declared, held) {
        (None, None) => None,
        (Some(own), Some(held)) if builtin_default == Some(own) => Some(held),
        (Some(own), _) => Some(own.clone()),
        (None, held) => held,
    }
}
