//! Shared test doubles.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use formbinder::prelude::*;
use serde_json::Value;

/// A context operation, as seen by the context.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    GetError(String),
    GetValue(String),
    SetValue(String, Value),
    Validate(String, RuleSet),
    AddValidate(String, RuleSet, String),
    RemoveValidate(String),
}

impl Call {
    fn is_read(&self) -> bool {
        matches!(self, Call::GetError(_) | Call::GetValue(_))
    }
}

/// A `MemoryForm` that records every call made to it.
pub struct Recording {
    pub form: MemoryForm,
    calls: Mutex<Vec<Call>>,
}

impl Recording {
    pub fn new() -> Arc<Self> {
        Self::with_form(MemoryForm::new())
    }

    pub fn with_form(form: MemoryForm) -> Arc<Self> {
        Arc::new(Self {
            form,
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// Calls that change the context, in order.
    pub fn writes(&self) -> Vec<Call> {
        self.calls().into_iter().filter(|c| !c.is_read()).collect()
    }

    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls().iter().filter(|c| pred(c)).count()
    }

    pub fn registrations(&self) -> usize {
        self.count(|c| matches!(c, Call::AddValidate(..)))
    }

    pub fn removals(&self) -> usize {
        self.count(|c| matches!(c, Call::RemoveValidate(_)))
    }

    pub fn validations(&self) -> usize {
        self.count(|c| matches!(c, Call::Validate(..)))
    }

    pub fn clear(&self) {
        self.calls.lock().unwrap().clear();
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

impl FormContext for Recording {
    fn get_error(&self, name: &FieldName) -> ErrorList {
        self.record(Call::GetError(name.to_string()));
        self.form.get_error(name)
    }

    fn get_value(&self, name: &FieldName) -> Option<Value> {
        self.record(Call::GetValue(name.to_string()));
        self.form.get_value(name)
    }

    fn set_value(&self, name: &FieldName, value: Value) {
        self.record(Call::SetValue(name.to_string(), value.clone()));
        self.form.set_value(name, value);
    }

    fn validate(&self, name: &FieldName, rules: &RuleSet) {
        self.record(Call::Validate(name.to_string(), rules.clone()));
        self.form.validate(name, rules);
    }

    fn add_validate(&self, name: &FieldName, rules: &RuleSet, handle: &WidgetHandle) {
        self.record(Call::AddValidate(
            name.to_string(),
            rules.clone(),
            handle.id().to_string(),
        ));
        self.form.add_validate(name, rules, handle);
    }

    fn remove_validate(&self, name: &FieldName) {
        self.record(Call::RemoveValidate(name.to_string()));
        self.form.remove_validate(name);
    }
}

pub fn field(path: &str) -> FieldName {
    FieldName::new(path).unwrap()
}

/// A text-input-like widget named `name`.
pub fn input(name: &str) -> WidgetProps {
    WidgetProps::new()
        .with_id(format!("input-{name}"))
        .with_config(FieldConfig::new().name(name))
}

/// Engine that rejects empty or missing values for required rules.
pub fn required_engine(name: &FieldName, value: Option<&Value>, rules: &RuleSet) -> ErrorList {
    let empty = match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        _ => false,
    };
    rules
        .iter()
        .filter(|rule| rule.is_required() && empty)
        .map(|rule| FieldError::new(name.as_str(), rule.message().unwrap_or("required")))
        .collect()
}
