//! Validation rule model.
//!
//! A field's constraints are described by a [`RuleSet`]: an ordered list of
//! composite [`Rule`]s. Each rule holds at most one [`RuleSpec`] per
//! [`RuleTag`], kept in the fixed tag order so that two rules built from the
//! same declarations compare equal regardless of insertion order.
//!
//! The rule engine that interprets these specs lives behind the form
//! context; this module only describes them.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

// =============================================================================
// RuleTag
// =============================================================================

/// A recognized validation tag.
///
/// The declaration order is the scan order used when merging configuration
/// into a single composite rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleTag {
    Required,
    Pattern,
    Min,
    Max,
    Len,
    Enum,
    Whitespace,
    Fields,
    Transform,
    Message,
    Validator,
    Type,
}

impl RuleTag {
    /// Every tag, in scan order.
    pub const ALL: [RuleTag; 12] = [
        RuleTag::Required,
        RuleTag::Pattern,
        RuleTag::Min,
        RuleTag::Max,
        RuleTag::Len,
        RuleTag::Enum,
        RuleTag::Whitespace,
        RuleTag::Fields,
        RuleTag::Transform,
        RuleTag::Message,
        RuleTag::Validator,
        RuleTag::Type,
    ];

    /// The configuration key for this tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleTag::Required => "required",
            RuleTag::Pattern => "pattern",
            RuleTag::Min => "min",
            RuleTag::Max => "max",
            RuleTag::Len => "len",
            RuleTag::Enum => "enum",
            RuleTag::Whitespace => "whitespace",
            RuleTag::Fields => "fields",
            RuleTag::Transform => "transform",
            RuleTag::Message => "message",
            RuleTag::Validator => "validator",
            RuleTag::Type => "type",
        }
    }
}

impl fmt::Display for RuleTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Parameter types
// =============================================================================

/// Expected data type of a field value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    String,
    Number,
    Boolean,
    Method,
    Regexp,
    Integer,
    Float,
    Array,
    Object,
    Enum,
    Date,
    Url,
    Hex,
    Email,
}

/// A regular expression constraint.
///
/// Two patterns are equal when their source text is equal.
#[derive(Clone)]
pub struct Pattern(regex::Regex);

impl Pattern {
    /// Compile a pattern.
    pub fn new(source: &str) -> Result<Self, regex::Error> {
        regex::Regex::new(source).map(Self)
    }

    /// The pattern's source text.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Check whether `text` matches.
    pub fn is_match(&self, text: &str) -> bool {
        self.0.is_match(text)
    }
}

impl From<regex::Regex> for Pattern {
    fn from(re: regex::Regex) -> Self {
        Self(re)
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Pattern").field(&self.as_str()).finish()
    }
}

/// Value transformation applied before validation.
///
/// Equality is identity of the shared closure: clones of one `Transform`
/// are equal, two separately built closures are not.
#[derive(Clone)]
pub struct Transform(Arc<dyn Fn(&Value) -> Value + Send + Sync>);

impl Transform {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Value) -> Value + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    pub fn apply(&self, value: &Value) -> Value {
        (self.0)(value)
    }
}

impl PartialEq for Transform {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Transform(..)")
    }
}

/// Custom validation callback.
///
/// Returns `Err(message)` when the value is rejected. Compared by identity,
/// like [`Transform`].
#[derive(Clone)]
pub struct CustomValidator(Arc<dyn Fn(&Value) -> Result<(), String> + Send + Sync>);

impl CustomValidator {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Value) -> Result<(), String> + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    pub fn check(&self, value: &Value) -> Result<(), String> {
        (self.0)(value)
    }
}

impl PartialEq for CustomValidator {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for CustomValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CustomValidator(..)")
    }
}

// =============================================================================
// RuleSpec
// =============================================================================

/// A single validation constraint: one tag with its parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum RuleSpec {
    /// The field must have a value.
    Required(bool),
    /// String values must match.
    Pattern(Pattern),
    /// Lower bound (length for strings and arrays, magnitude for numbers).
    Min(f64),
    /// Upper bound, same interpretation as `Min`.
    Max(f64),
    /// Exact length.
    Len(usize),
    /// The value must be one of these.
    Enum(Vec<Value>),
    /// Whether a value consisting only of whitespace is rejected.
    Whitespace(bool),
    /// Rules for nested fields, keyed by sub-path.
    Fields(BTreeMap<String, RuleSet>),
    Transform(Transform),
    /// Message shown when the rule fails.
    Message(String),
    Validator(CustomValidator),
    Type(FieldType),
}

impl RuleSpec {
    /// The tag this constraint belongs to.
    pub fn tag(&self) -> RuleTag {
        match self {
            RuleSpec::Required(_) => RuleTag::Required,
            RuleSpec::Pattern(_) => RuleTag::Pattern,
            RuleSpec::Min(_) => RuleTag::Min,
            RuleSpec::Max(_) => RuleTag::Max,
            RuleSpec::Len(_) => RuleTag::Len,
            RuleSpec::Enum(_) => RuleTag::Enum,
            RuleSpec::Whitespace(_) => RuleTag::Whitespace,
            RuleSpec::Fields(_) => RuleTag::Fields,
            RuleSpec::Transform(_) => RuleTag::Transform,
            RuleSpec::Message(_) => RuleTag::Message,
            RuleSpec::Validator(_) => RuleTag::Validator,
            RuleSpec::Type(_) => RuleTag::Type,
        }
    }
}

// =============================================================================
// Rule
// =============================================================================

/// A composite rule: at most one [`RuleSpec`] per tag, in tag order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Rule {
    specs: Vec<RuleSpec>,
}

impl Rule {
    /// Create an empty rule.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a constraint, replacing any existing one with the same tag.
    pub fn with(mut self, spec: RuleSpec) -> Self {
        self.insert(spec);
        self
    }

    /// Insert a constraint. Returns the constraint it replaced, if any.
    pub fn insert(&mut self, spec: RuleSpec) -> Option<RuleSpec> {
        match self.specs.binary_search_by_key(&spec.tag(), RuleSpec::tag) {
            Ok(i) => Some(std::mem::replace(&mut self.specs[i], spec)),
            Err(i) => {
                self.specs.insert(i, spec);
                None
            }
        }
    }

    /// Remove the constraint for `tag`.
    pub fn remove(&mut self, tag: RuleTag) -> Option<RuleSpec> {
        self.specs
            .binary_search_by_key(&tag, RuleSpec::tag)
            .ok()
            .map(|i| self.specs.remove(i))
    }

    /// Get the constraint for `tag`.
    pub fn get(&self, tag: RuleTag) -> Option<&RuleSpec> {
        self.specs
            .binary_search_by_key(&tag, RuleSpec::tag)
            .ok()
            .map(|i| &self.specs[i])
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RuleSpec> {
        self.specs.iter()
    }

    /// Tags present in this rule, in scan order.
    pub fn tags(&self) -> impl Iterator<Item = RuleTag> + '_ {
        self.specs.iter().map(RuleSpec::tag)
    }

    /// Check if this rule marks the field as required.
    pub fn is_required(&self) -> bool {
        matches!(self.get(RuleTag::Required), Some(RuleSpec::Required(true)))
    }

    /// The failure message, if one was declared.
    pub fn message(&self) -> Option<&str> {
        match self.get(RuleTag::Message) {
            Some(RuleSpec::Message(msg)) => Some(msg),
            _ => None,
        }
    }
}

impl FromIterator<RuleSpec> for Rule {
    fn from_iter<I: IntoIterator<Item = RuleSpec>>(iter: I) -> Self {
        let mut rule = Rule::new();
        for spec in iter {
            rule.insert(spec);
        }
        rule
    }
}

impl<'a> IntoIterator for &'a Rule {
    type Item = &'a RuleSpec;
    type IntoIter = std::slice::Iter<'a, RuleSpec>;

    fn into_iter(self) -> Self::IntoIter {
        self.specs.iter()
    }
}

// =============================================================================
// RuleSet
// =============================================================================

/// Ordered validation rules for one field. Empty means unvalidated.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    /// Create an empty rule set.
    pub fn new() -> Self {
        Self::default()
    }

    /// A rule set holding exactly one rule.
    pub fn single(rule: Rule) -> Self {
        Self { rules: vec![rule] }
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter()
    }

    /// Check if any rule marks the field as required.
    pub fn is_required(&self) -> bool {
        self.rules.iter().any(Rule::is_required)
    }
}

impl From<Vec<Rule>> for RuleSet {
    fn from(rules: Vec<Rule>) -> Self {
        Self { rules }
    }
}

impl FromIterator<Rule> for RuleSet {
    fn from_iter<I: IntoIterator<Item = Rule>>(iter: I) -> Self {
        Self {
            rules: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a RuleSet {
    type Item = &'a Rule;
    type IntoIter = std::slice::Iter<'a, Rule>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_keeps_tag_order() {
        let rule = Rule::new()
            .with(RuleSpec::Message("bad".into()))
            .with(RuleSpec::Min(2.0))
            .with(RuleSpec::Required(true));

        let tags: Vec<_> = rule.tags().collect();
        assert_eq!(tags, vec![RuleTag::Required, RuleTag::Min, RuleTag::Message]);
    }

    #[test]
    fn test_insert_replaces_same_tag() {
        let mut rule = Rule::new().with(RuleSpec::Max(3.0));
        let old = rule.insert(RuleSpec::Max(5.0));

        assert_eq!(old, Some(RuleSpec::Max(3.0)));
        assert_eq!(rule.len(), 1);
        assert_eq!(rule.get(RuleTag::Max), Some(&RuleSpec::Max(5.0)));
    }

    #[test]
    fn test_remove() {
        let mut rule = Rule::new().with(RuleSpec::Len(4)).with(RuleSpec::Whitespace(true));
        assert_eq!(rule.remove(RuleTag::Len), Some(RuleSpec::Len(4)));
        assert_eq!(rule.remove(RuleTag::Len), None);
        assert_eq!(rule.len(), 1);
    }

    #[test]
    fn test_all_is_sorted() {
        let mut sorted = RuleTag::ALL;
        sorted.sort();
        assert_eq!(sorted, RuleTag::ALL);
    }

    #[test]
    fn test_callable_equality_is_identity() {
        let upper = Transform::new(|v| v.clone());
        let same = upper.clone();
        let other = Transform::new(|v| v.clone());

        assert_eq!(RuleSpec::Transform(upper.clone()), RuleSpec::Transform(same));
        assert_ne!(RuleSpec::Transform(upper), RuleSpec::Transform(other));
    }

    #[test]
    fn test_pattern_equality_by_source() {
        let a = Pattern::new(r"^\d+$").unwrap();
        let b = Pattern::new(r"^\d+$").unwrap();
        assert_eq!(a, b);
        assert!(a.is_match("123"));
        assert!(!a.is_match("12a"));
    }
}
