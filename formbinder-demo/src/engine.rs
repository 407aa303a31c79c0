//! A small validation engine for the demo.
//!
//! Understands `required`, `min`/`max` (string length), `pattern` and the
//! `email` type. Each failing rule reports its message once.

use std::sync::LazyLock;

use formbinder::prelude::*;
use regex::Regex;
use serde_json::Value;

static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email regex"));

pub fn check(name: &FieldName, value: Option<&Value>, rules: &RuleSet) -> ErrorList {
    let text = match value {
        Some(Value::String(s)) => s.as_str(),
        _ => "",
    };

    rules
        .iter()
        .filter(|rule| !passes(rule, text))
        .map(|rule| FieldError::new(name.as_str(), rule.message().unwrap_or("invalid value")))
        .collect()
}

fn passes(rule: &Rule, text: &str) -> bool {
    if text.is_empty() {
        return !rule.is_required();
    }

    let len = text.chars().count() as f64;
    rule.iter().all(|spec| match spec {
        RuleSpec::Min(min) => len >= *min,
        RuleSpec::Max(max) => len <= *max,
        RuleSpec::Pattern(pattern) => pattern.is_match(text),
        RuleSpec::Type(FieldType::Email) => EMAIL.is_match(text),
        RuleSpec::Validator(validator) => validator.check(&Value::String(text.to_string())).is_ok(),
        _ => true,
    })
}
