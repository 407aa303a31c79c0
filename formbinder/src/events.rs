//! Event interception for bound widgets.
//!
//! This module provides:
//! - `Trigger`: the widget event names a binder can hook
//! - `Handler` / `Handlers`: widget event callbacks
//! - `ValueFormatter` and `ErrorStatePropsGenerator`: per-field overrides
//! - `EventInterceptor`: wraps a widget's handlers with value propagation and
//!   validation
//!
//! Within one handler invocation the order is fixed: the widget's own
//! handler runs first, then the formatted value is written to the context,
//! then validation runs and sees the value just written.

use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use log::trace;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::context::{ErrorList, FieldName, FormContext};
use crate::lifecycle::CurrentRules;
use crate::widget::{Attrs, CLASS_NAME, WidgetProps};

/// Class appended to a widget's `class_name` while its field has errors.
pub const ERROR_CLASS: &str = "this-field-has-error";

// =============================================================================
// Trigger
// =============================================================================

/// A widget event a binder can hook.
///
/// Events are identified by handler name: `Custom("on_blur")` is the same
/// event as `Blur`, compares equal to it and hashes the same. Serialized as
/// the handler name.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Trigger {
    /// Value changed.
    #[default]
    Change,
    /// Widget lost focus.
    Blur,
    /// Widget gained focus.
    Focus,
    /// Enter pressed / form submitted from the widget.
    Submit,
    /// Any other widget event, by name.
    Custom(String),
}

impl Trigger {
    /// Parse a handler name, mapping built-in names onto their variants.
    pub fn from_name(name: impl Into<String>) -> Self {
        let name = name.into();
        match name.as_str() {
            "on_change" => Trigger::Change,
            "on_blur" => Trigger::Blur,
            "on_focus" => Trigger::Focus,
            "on_submit" => Trigger::Submit,
            _ => Trigger::Custom(name),
        }
    }

    /// Handler name for this event (`"on_change"`, `"on_blur"`, ...).
    pub fn as_str(&self) -> &str {
        match self {
            Trigger::Change => "on_change",
            Trigger::Blur => "on_blur",
            Trigger::Focus => "on_focus",
            Trigger::Submit => "on_submit",
            Trigger::Custom(name) => name,
        }
    }

    pub fn is_change(&self) -> bool {
        self.as_str() == Trigger::Change.as_str()
    }

    /// The built-in variant when this is a custom alias of one.
    pub fn canonical(self) -> Self {
        match self {
            Trigger::Custom(name) => Trigger::from_name(name),
            builtin => builtin,
        }
    }
}

impl PartialEq for Trigger {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Eq for Trigger {}

impl Hash for Trigger {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_str().hash(state);
    }
}

impl From<String> for Trigger {
    fn from(name: String) -> Self {
        Trigger::from_name(name)
    }
}

impl From<&str> for Trigger {
    fn from(name: &str) -> Self {
        Trigger::from_name(name)
    }
}

impl From<Trigger> for String {
    fn from(trigger: Trigger) -> Self {
        trigger.as_str().to_string()
    }
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Handler Types
// =============================================================================

/// A widget event callback. Receives the event's arguments.
pub type Handler = Arc<dyn Fn(&[Value]) + Send + Sync>;

/// Widget event callbacks keyed by event.
pub type Handlers = HashMap<Trigger, Handler>;

/// Converts a change event's arguments into the value stored in the context.
#[derive(Clone)]
pub struct ValueFormatter(Arc<dyn Fn(&[Value]) -> Value + Send + Sync>);

impl ValueFormatter {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&[Value]) -> Value + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    pub fn format(&self, args: &[Value]) -> Value {
        (self.0)(args)
    }
}

impl Default for ValueFormatter {
    /// Takes the first argument, or `null` when there is none.
    fn default() -> Self {
        Self::new(|args| args.first().cloned().unwrap_or(Value::Null))
    }
}

impl fmt::Debug for ValueFormatter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ValueFormatter(..)")
    }
}

/// Builds the extra attributes applied to a widget whose field has errors.
#[derive(Clone)]
pub struct ErrorStatePropsGenerator(Arc<dyn Fn(&ErrorList, &WidgetProps) -> Attrs + Send + Sync>);

impl ErrorStatePropsGenerator {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&ErrorList, &WidgetProps) -> Attrs + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    pub fn generate(&self, errors: &ErrorList, widget: &WidgetProps) -> Attrs {
        (self.0)(errors, widget)
    }
}

impl Default for ErrorStatePropsGenerator {
    /// Appends [`ERROR_CLASS`] to the widget's `class_name`.
    fn default() -> Self {
        Self::new(|_, widget| {
            let class = match widget.class_name() {
                Some(existing) if !existing.is_empty() => format!("{existing} {ERROR_CLASS}"),
                _ => ERROR_CLASS.to_string(),
            };
            Attrs::from([(CLASS_NAME.to_string(), class)])
        })
    }
}

impl fmt::Debug for ErrorStatePropsGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ErrorStatePropsGenerator(..)")
    }
}

// =============================================================================
// EventInterceptor
// =============================================================================

/// Wraps a widget's handlers so events reach the form context.
///
/// The rules consulted by the generated handlers are read from the shared
/// [`CurrentRules`] cell when the handler runs, not when it is built, so a
/// re-registration between render and event is observed.
pub struct EventInterceptor<C: FormContext + ?Sized> {
    context: Arc<C>,
    name: FieldName,
    trigger: Trigger,
    formatter: ValueFormatter,
    error_state: ErrorStatePropsGenerator,
    rules: CurrentRules,
}

impl<C: FormContext + ?Sized + 'static> EventInterceptor<C> {
    pub fn new(context: Arc<C>, name: FieldName, rules: CurrentRules) -> Self {
        Self {
            context,
            name,
            trigger: Trigger::default(),
            formatter: ValueFormatter::default(),
            error_state: ErrorStatePropsGenerator::default(),
            rules,
        }
    }

    /// Set the event that fires validation.
    pub fn trigger(mut self, trigger: Trigger) -> Self {
        self.trigger = trigger.canonical();
        self
    }

    /// Set the change-value formatter.
    pub fn formatter(mut self, formatter: ValueFormatter) -> Self {
        self.formatter = formatter;
        self
    }

    /// Set the error-state generator.
    pub fn error_state_generator(mut self, generator: ErrorStatePropsGenerator) -> Self {
        self.error_state = generator;
        self
    }

    /// Error-state attributes for the widget, or `None` when `errors` is empty.
    pub fn error_state(&self, errors: &ErrorList, widget: &WidgetProps) -> Option<Attrs> {
        if errors.is_empty() {
            None
        } else {
            Some(self.error_state.generate(errors, widget))
        }
    }

    /// Build replacement handlers for the widget's `original` handlers.
    ///
    /// The result always contains a change handler. When the trigger is some
    /// other event it also contains a handler for that event.
    pub fn intercept(&self, original: &Handlers) -> Handlers {
        let mut handlers = Handlers::new();

        if !self.trigger.is_change() {
            handlers.insert(self.trigger.clone(), self.trigger_handler(original));
        }
        handlers.insert(Trigger::Change, self.change_handler(original));

        handlers
    }

    fn trigger_handler(&self, original: &Handlers) -> Handler {
        let own = original.get(&self.trigger).cloned();
        let context = Arc::clone(&self.context);
        let name = self.name.clone();
        let trigger = self.trigger.clone();
        let rules = self.rules.clone();

        Arc::new(move |args: &[Value]| {
            trace!("{} fired for '{}'", trigger, name);
            if let Some(own) = &own {
                own(args);
            }

            if !rules.is_empty() {
                context.validate(&name, &rules.get());
            }
        })
    }

    fn change_handler(&self, original: &Handlers) -> Handler {
        let own = original.get(&Trigger::Change).cloned();
        let context = Arc::clone(&self.context);
        let name = self.name.clone();
        let validate_on_change = self.trigger.is_change();
        let formatter = self.formatter.clone();
        let rules = self.rules.clone();

        Arc::new(move |args: &[Value]| {
            trace!("on_change fired for '{}'", name);
            if let Some(own) = &own {
                own(args);
            }

            context.set_value(&name, formatter.format(args));

            if validate_on_change && !rules.is_empty() {
                context.validate(&name, &rules.get());
            }
        })
    }
}
