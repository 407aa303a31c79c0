//! Field configuration.
//!
//! The same `FieldConfig` type describes what is declared on a binder and
//! what is declared on the widget it wraps. Binder-level values win key by
//! key; see [`extract_rules`](crate::extract::extract_rules) for how rule
//! tags are merged.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::context::FieldName;
use crate::events::{ErrorStatePropsGenerator, Trigger, ValueFormatter};
use crate::rules::{CustomValidator, FieldType, Pattern, Rule, RuleSet, RuleSpec, RuleTag, Transform};

/// Configuration keys recognized on a binder or a widget.
///
/// # Example
///
/// ```
/// use formbinder::config::FieldConfig;
/// use formbinder::events::Trigger;
///
/// let config = FieldConfig::new()
///     .name("user.email")
///     .required(true)
///     .message("Email is required")
///     .trigger(Trigger::Blur);
/// ```
#[derive(Debug, Clone, Default)]
pub struct FieldConfig {
    /// Path of the field in the form data.
    pub name: Option<String>,

    /// Explicit rules. When present, per-tag values are ignored.
    pub rules: Option<RuleSet>,

    /// Per-tag values, one per tag at most.
    pub tags: Rule,

    /// Builds error-state attributes while the field has errors.
    pub error_state_props_generator: Option<ErrorStatePropsGenerator>,

    /// Converts change-event arguments into the stored value.
    pub value_formatter: Option<ValueFormatter>,

    /// Event that fires validation (change when unset).
    pub trigger_type: Option<Trigger>,
}

impl FieldConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the field path.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set explicit rules, bypassing per-tag merging.
    pub fn rules(mut self, rules: impl Into<RuleSet>) -> Self {
        self.rules = Some(rules.into());
        self
    }

    /// Declare a single tag value.
    pub fn rule(mut self, spec: RuleSpec) -> Self {
        self.tags.insert(spec);
        self
    }

    pub fn required(self, required: bool) -> Self {
        self.rule(RuleSpec::Required(required))
    }

    pub fn pattern(self, pattern: Pattern) -> Self {
        self.rule(RuleSpec::Pattern(pattern))
    }

    pub fn min(self, min: f64) -> Self {
        self.rule(RuleSpec::Min(min))
    }

    pub fn max(self, max: f64) -> Self {
        self.rule(RuleSpec::Max(max))
    }

    pub fn len(self, len: usize) -> Self {
        self.rule(RuleSpec::Len(len))
    }

    /// Restrict the value to one of `values`.
    pub fn one_of(self, values: Vec<Value>) -> Self {
        self.rule(RuleSpec::Enum(values))
    }

    pub fn whitespace(self, whitespace: bool) -> Self {
        self.rule(RuleSpec::Whitespace(whitespace))
    }

    /// Rules for nested fields.
    pub fn fields(self, fields: BTreeMap<String, RuleSet>) -> Self {
        self.rule(RuleSpec::Fields(fields))
    }

    pub fn transform(self, transform: Transform) -> Self {
        self.rule(RuleSpec::Transform(transform))
    }

    pub fn message(self, message: impl Into<String>) -> Self {
        self.rule(RuleSpec::Message(message.into()))
    }

    pub fn validator(self, validator: CustomValidator) -> Self {
        self.rule(RuleSpec::Validator(validator))
    }

    pub fn field_type(self, field_type: FieldType) -> Self {
        self.rule(RuleSpec::Type(field_type))
    }

    pub fn error_state_props_generator(mut self, generator: ErrorStatePropsGenerator) -> Self {
        self.error_state_props_generator = Some(generator);
        self
    }

    pub fn value_formatter(mut self, formatter: ValueFormatter) -> Self {
        self.value_formatter = Some(formatter);
        self
    }

    /// Set the event that fires validation.
    pub fn trigger(mut self, trigger: Trigger) -> Self {
        self.trigger_type = Some(trigger.canonical());
        self
    }

    /// The value declared for `tag`, if any.
    pub fn get(&self, tag: RuleTag) -> Option<&RuleSpec> {
        self.tags.get(tag)
    }

    /// The declared name as a field path. Empty names count as undeclared.
    pub fn field_name(&self) -> Option<FieldName> {
        self.name.clone().and_then(FieldName::new)
    }
}
