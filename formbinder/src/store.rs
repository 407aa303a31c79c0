//! In-memory form context.
//!
//! `MemoryForm` keeps the form data as a single JSON tree addressed by dotted
//! field paths (`"user.address.city"`, `"items.0.sku"`), a per-field error
//! map and the rule registry. Validation itself is delegated to a
//! [`ValidationEngine`] supplied by the caller.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use log::{debug, trace};
use serde_json::{Map, Value};

use crate::context::{ErrorList, FieldName, FormContext, WidgetHandle};
use crate::rules::RuleSet;

/// Validates one field's value against its rules.
///
/// Receives the field, its current value (if any) and its rules; returns the
/// failures, empty when the value is valid.
pub type ValidationEngine =
    Arc<dyn Fn(&FieldName, Option<&Value>, &RuleSet) -> ErrorList + Send + Sync>;

/// A registry entry.
#[derive(Debug, Clone, PartialEq)]
pub struct RegisteredField {
    pub rules: RuleSet,
    pub handle: WidgetHandle,
}

/// A [`FormContext`] that keeps everything in memory.
#[derive(Default)]
pub struct MemoryForm {
    data: RwLock<Value>,
    errors: RwLock<HashMap<FieldName, ErrorList>>,
    registry: RwLock<HashMap<FieldName, RegisteredField>>,
    engine: Option<ValidationEngine>,
}

impl MemoryForm {
    /// Create an empty form with no validation engine.
    ///
    /// Without an engine `validate` is a no-op.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `engine` to validate fields.
    pub fn with_engine<F>(mut self, engine: F) -> Self
    where
        F: Fn(&FieldName, Option<&Value>, &RuleSet) -> ErrorList + Send + Sync + 'static,
    {
        self.engine = Some(Arc::new(engine));
        self
    }

    /// Start from existing form data.
    pub fn with_data(self, data: Value) -> Self {
        match self.data.write() {
            Ok(mut guard) => *guard = data,
            Err(poisoned) => *poisoned.into_inner() = data,
        }
        self
    }

    /// Snapshot of the whole data tree.
    pub fn data(&self) -> Value {
        self.data
            .read()
            .map(|guard| guard.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }

    /// The registry entry for `name`.
    pub fn registration(&self, name: &FieldName) -> Option<RegisteredField> {
        self.registry.read().ok()?.get(name).cloned()
    }

    pub fn is_registered(&self, name: &FieldName) -> bool {
        self.registry
            .read()
            .map(|registry| registry.contains_key(name))
            .unwrap_or(false)
    }

    /// Names of all registered fields, sorted.
    pub fn registered_names(&self) -> Vec<FieldName> {
        let mut names: Vec<_> = self
            .registry
            .read()
            .map(|registry| registry.keys().cloned().collect())
            .unwrap_or_default();
        names.sort();
        names
    }

    /// Overwrite the errors for `name` (e.g. from a server response).
    pub fn set_errors(&self, name: &FieldName, errors: ErrorList) {
        if let Ok(mut map) = self.errors.write() {
            if errors.is_empty() {
                map.remove(name);
            } else {
                map.insert(name.clone(), errors);
            }
        }
    }

    /// Validate every registered field. Returns true if all pass.
    pub fn validate_all(&self) -> bool {
        let entries: Vec<_> = match self.registry.read() {
            Ok(registry) => registry
                .iter()
                .map(|(name, entry)| (name.clone(), entry.rules.clone()))
                .collect(),
            Err(_) => return false,
        };

        let mut valid = true;
        for (name, rules) in entries {
            self.validate(&name, &rules);
            if !self.get_error(&name).is_empty() {
                valid = false;
            }
        }
        valid
    }

    /// Handle of the first invalid registered field, in name order.
    pub fn first_invalid(&self) -> Option<WidgetHandle> {
        self.registered_names()
            .into_iter()
            .find(|name| !self.get_error(name).is_empty())
            .and_then(|name| self.registration(&name))
            .map(|entry| entry.handle)
    }
}

impl FormContext for MemoryForm {
    fn get_error(&self, name: &FieldName) -> ErrorList {
        self.errors
            .read()
            .ok()
            .and_then(|map| map.get(name).cloned())
            .unwrap_or_default()
    }

    fn get_value(&self, name: &FieldName) -> Option<Value> {
        let data = self.data.read().ok()?;
        lookup(&data, name).cloned()
    }

    fn set_value(&self, name: &FieldName, value: Value) {
        trace!("set '{}' = {}", name, value);
        if let Ok(mut data) = self.data.write() {
            if !assign(&mut data, name, value) {
                debug!("Rejected write to '{}': array index out of range", name);
            }
        }
    }

    fn validate(&self, name: &FieldName, rules: &RuleSet) {
        let Some(engine) = &self.engine else {
            return;
        };
        let value = self.get_value(name);
        let errors = engine(name, value.as_ref(), rules);
        debug!("Validated '{}': {} error(s)", name, errors.len());
        self.set_errors(name, errors);
    }

    fn add_validate(&self, name: &FieldName, rules: &RuleSet, handle: &WidgetHandle) {
        if let Ok(mut registry) = self.registry.write() {
            registry.insert(
                name.clone(),
                RegisteredField {
                    rules: rules.clone(),
                    handle: handle.clone(),
                },
            );
        }
    }

    fn remove_validate(&self, name: &FieldName) {
        if let Ok(mut registry) = self.registry.write() {
            registry.remove(name);
        }
        if let Ok(mut errors) = self.errors.write() {
            errors.remove(name);
        }
    }
}

// =============================================================================
// Path helpers
// =============================================================================

fn lookup<'a>(root: &'a Value, name: &FieldName) -> Option<&'a Value> {
    name.segments().try_fold(root, |node, segment| match node {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}

/// Furthest an array index may reach past the end of an existing array.
const MAX_ARRAY_GAP: usize = 1024;

/// Write `value` at `name`, creating objects along the way. Existing arrays
/// are indexed (and padded with nulls); any other non-object is replaced.
///
/// Returns false, leaving the tree untouched, when an index lies more than
/// [`MAX_ARRAY_GAP`] past the end of its array.
fn assign(root: &mut Value, name: &FieldName, value: Value) -> bool {
    if !within_bounds(root, name) {
        return false;
    }

    let mut node = root;
    for segment in name.segments() {
        node = child_mut(node, segment);
    }
    *node = value;
    true
}

fn within_bounds(root: &Value, name: &FieldName) -> bool {
    let mut node = Some(root);
    for segment in name.segments() {
        let Some(current) = node else {
            return true;
        };
        node = match (current, segment.parse::<usize>()) {
            (Value::Array(items), Ok(index)) => {
                if index.saturating_sub(items.len()) > MAX_ARRAY_GAP {
                    return false;
                }
                items.get(index)
            }
            (Value::Object(map), _) => map.get(segment),
            _ => None,
        };
    }
    true
}

fn child_mut<'a>(node: &'a mut Value, segment: &str) -> &'a mut Value {
    let index = segment.parse::<usize>().ok();
    if let (Value::Array(items), Some(index)) = (&mut *node, index) {
        if items.len() <= index {
            items.resize(index + 1, Value::Null);
        }
    } else if !node.is_object() {
        *node = Value::Object(Map::new());
    }

    match index {
        Some(index) if node.is_array() => &mut node[index],
        _ => &mut node[segment],
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn name(path: &str) -> FieldName {
        FieldName::new(path).unwrap()
    }

    #[test]
    fn test_lookup_nested() {
        let data = json!({"user": {"tags": ["a", "b"], "email": "x@y.z"}});
        assert_eq!(lookup(&data, &name("user.email")), Some(&json!("x@y.z")));
        assert_eq!(lookup(&data, &name("user.tags.1")), Some(&json!("b")));
        assert_eq!(lookup(&data, &name("user.missing")), None);
        assert_eq!(lookup(&data, &name("user.email.deeper")), None);
    }

    #[test]
    fn test_assign_creates_objects() {
        let mut data = Value::Null;
        assign(&mut data, &name("user.address.city"), json!("Ghent"));
        assert_eq!(data, json!({"user": {"address": {"city": "Ghent"}}}));
    }

    #[test]
    fn test_assign_into_array() {
        let mut data = json!({"items": ["a"]});
        assign(&mut data, &name("items.2"), json!("c"));
        assert_eq!(data, json!({"items": ["a", null, "c"]}));
    }

    #[test]
    fn test_assign_rejects_index_far_past_end() {
        let mut data = json!({"items": ["a"]});
        assert!(!assign(&mut data, &name("items.18446744073709551615"), json!(1)));
        assert!(!assign(&mut data, &name("items.1000000000"), json!(1)));
        assert_eq!(data, json!({"items": ["a"]}));

        assert!(assign(&mut data, &name("items.1025"), json!(1)));
        assert_eq!(data["items"].as_array().map(Vec::len), Some(1026));
    }
}
