//! Rule extraction.

use crate::config::FieldConfig;
use crate::rules::{Rule, RuleSet, RuleTag};

/// Derive a field's rules from binder-level and widget-level configuration.
///
/// Explicit `rules` are returned verbatim, the binder's taking priority over
/// the widget's; the two are never merged. Otherwise every tag in
/// [`RuleTag::ALL`] is resolved independently (binder value, else widget
/// value) and the results are combined into one composite rule. Nothing
/// declared yields an empty set.
pub fn extract_rules(local: &FieldConfig, widget: &FieldConfig) -> RuleSet {
    if let Some(rules) = local.rules.as_ref().or(widget.rules.as_ref()) {
        return rules.clone();
    }

    let merged: Rule = RuleTag::ALL
        .iter()
        .filter_map(|&tag| local.get(tag).or_else(|| widget.get(tag)))
        .cloned()
        .collect();

    if merged.is_empty() {
        RuleSet::new()
    } else {
        RuleSet::single(merged)
    }
}
