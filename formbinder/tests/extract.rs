//! Tests for rule extraction.

use std::collections::BTreeMap;

use formbinder::extract::extract_rules;
use formbinder::prelude::*;
use serde_json::json;

// ============================================================================
// Per-tag merge
// ============================================================================

#[test]
fn test_nothing_declared_is_empty() {
    let rules = extract_rules(&FieldConfig::new(), &FieldConfig::new().name("email"));
    assert!(rules.is_empty());
}

#[test]
fn test_binder_value_wins_per_tag() {
    let local = FieldConfig::new().required(true);
    let widget = FieldConfig::new().required(false);

    let rules = extract_rules(&local, &widget);

    assert_eq!(rules.len(), 1);
    assert_eq!(rules.rules()[0].get(RuleTag::Required), Some(&RuleSpec::Required(true)));
    assert!(rules.is_required());
}

#[test]
fn test_tags_merge_independently() {
    let local = FieldConfig::new().min(2.0).message("too short");
    let widget = FieldConfig::new()
        .min(0.0)
        .max(10.0)
        .field_type(FieldType::String);

    let rules = extract_rules(&local, &widget);
    let expected = Rule::new()
        .with(RuleSpec::Min(2.0))
        .with(RuleSpec::Max(10.0))
        .with(RuleSpec::Message("too short".into()))
        .with(RuleSpec::Type(FieldType::String));

    assert_eq!(rules, RuleSet::single(expected));
}

#[test]
fn test_merged_rule_follows_tag_order() {
    let local = FieldConfig::new()
        .field_type(FieldType::Email)
        .message("bad email")
        .required(true);
    let widget = FieldConfig::new().whitespace(true).len(5);

    let rules = extract_rules(&local, &widget);
    let tags: Vec<_> = rules.rules()[0].tags().collect();

    assert_eq!(
        tags,
        vec![
            RuleTag::Required,
            RuleTag::Len,
            RuleTag::Whitespace,
            RuleTag::Message,
            RuleTag::Type,
        ]
    );
}

#[test]
fn test_every_tag_is_recognized() {
    let upper = Transform::new(|v| json!(v.as_str().map(str::to_uppercase)));
    let no_admin = CustomValidator::new(|v| {
        if v == "admin" { Err("reserved".into()) } else { Ok(()) }
    });
    let nested = BTreeMap::from([(
        "city".to_string(),
        RuleSet::single(Rule::new().with(RuleSpec::Required(true))),
    )]);

    let widget = FieldConfig::new()
        .required(true)
        .pattern(Pattern::new("^[a-z]+$").unwrap())
        .min(1.0)
        .max(8.0)
        .len(4)
        .one_of(vec![json!("abcd"), json!("wxyz")])
        .whitespace(false)
        .fields(nested)
        .transform(upper)
        .message("nope")
        .validator(no_admin)
        .field_type(FieldType::String);

    let rules = extract_rules(&FieldConfig::new(), &widget);
    let tags: Vec<_> = rules.rules()[0].tags().collect();

    assert_eq!(tags, RuleTag::ALL.to_vec());
}

// ============================================================================
// Explicit rules
// ============================================================================

#[test]
fn test_binder_rules_returned_verbatim() {
    let explicit = RuleSet::from(vec![
        Rule::new().with(RuleSpec::Required(true)).with(RuleSpec::Message("required".into())),
        Rule::new().with(RuleSpec::Min(3.0)),
        Rule::new().with(RuleSpec::Type(FieldType::Email)),
    ]);
    let local = FieldConfig::new().rules(explicit.clone()).required(false);
    let widget = FieldConfig::new().max(5.0);

    let rules = extract_rules(&local, &widget);

    assert_eq!(rules, explicit);
    assert_eq!(rules.len(), 3);
}

#[test]
fn test_widget_rules_used_when_binder_has_none() {
    let explicit = RuleSet::from(vec![Rule::new().with(RuleSpec::Len(4))]);
    let local = FieldConfig::new().required(true);
    let widget = FieldConfig::new().rules(explicit.clone());

    assert_eq!(extract_rules(&local, &widget), explicit);
}

#[test]
fn test_binder_rules_not_merged_with_widget_rules() {
    let mine = RuleSet::from(vec![Rule::new().with(RuleSpec::Required(true))]);
    let theirs = RuleSet::from(vec![Rule::new().with(RuleSpec::Max(1.0))]);

    let rules = extract_rules(
        &FieldConfig::new().rules(mine.clone()),
        &FieldConfig::new().rules(theirs),
    );

    assert_eq!(rules, mine);
}

#[test]
fn test_empty_explicit_rules_stay_empty() {
    let rules = extract_rules(
        &FieldConfig::new().rules(RuleSet::new()),
        &FieldConfig::new().required(true),
    );
    assert!(rules.is_empty());
}

// ============================================================================
// Stability
// ============================================================================

#[test]
fn test_same_config_yields_equal_rules() {
    let validator = CustomValidator::new(|_| Ok(()));
    let local = FieldConfig::new().required(true).validator(validator);
    let widget = FieldConfig::new().pattern(Pattern::new(r"\d+").unwrap());

    assert_eq!(extract_rules(&local, &widget), extract_rules(&local, &widget));
}
