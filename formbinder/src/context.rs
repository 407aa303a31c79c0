//! The form context a binder talks to.
//!
//! A form context owns the shared state of one form tree: the value store,
//! the per-field error lists and the registry of validation rules. Binders
//! never own this state; they read and write it through [`FormContext`].

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::rules::RuleSet;

// =============================================================================
// FieldName
// =============================================================================

/// Path of a field within the form's data tree (e.g. `"user.email"`).
///
/// Always non-empty.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldName(String);

impl FieldName {
    /// Create a field name. Returns `None` for an empty path.
    pub fn new(path: impl Into<String>) -> Option<Self> {
        let path = path.into();
        if path.is_empty() { None } else { Some(Self(path)) }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Path segments, split on `.`.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('.')
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for FieldName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// =============================================================================
// Errors
// =============================================================================

/// A single validation failure for a field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// The field that failed validation.
    pub field: String,
    /// Human-readable message.
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Current validation failures for one field, in order. Empty when valid.
pub type ErrorList = Vec<FieldError>;

// =============================================================================
// WidgetHandle
// =============================================================================

/// Identifies the widget a rule registration belongs to.
///
/// Contexts use this to focus or scroll to the first invalid widget.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WidgetHandle(String);

impl WidgetHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn id(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WidgetHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// FormContext
// =============================================================================

/// Shared registry and value store for every binder in one form tree.
///
/// All operations take `&self`; implementations use interior mutability so
/// that event handlers can hold the context behind an `Arc`. Mutations are
/// keyed by field name, and a binder only ever writes its own name.
///
/// `validate` may do its work asynchronously. Results surface later through
/// `get_error`; callers never wait on them.
pub trait FormContext: Send + Sync {
    /// Current errors for `name`. Empty if none.
    fn get_error(&self, name: &FieldName) -> ErrorList;

    /// The value held for `name`, if any.
    fn get_value(&self, name: &FieldName) -> Option<Value>;

    /// Store `value` under `name`.
    fn set_value(&self, name: &FieldName, value: Value);

    /// Run validation for `name` against `rules`.
    fn validate(&self, name: &FieldName, rules: &RuleSet);

    /// Register (or overwrite) the rule binding for `name`.
    fn add_validate(&self, name: &FieldName, rules: &RuleSet, handle: &WidgetHandle);

    /// Drop the rule binding for `name`.
    fn remove_validate(&self, name: &FieldName);
}
