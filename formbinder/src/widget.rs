//! Widget props and the patch a binder applies to them.
//!
//! A binder never renders its widget. It describes the widget's declared
//! props with [`WidgetProps`], computes a [`PropsPatch`] each render, and the
//! caller applies the patch before constructing the real widget.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::config::FieldConfig;
use crate::events::{Handler, Handlers, Trigger};

/// Attribute key holding the widget's style class list.
pub const CLASS_NAME: &str = "class_name";

/// Plain widget attributes (class names, styles, aria labels, ...).
pub type Attrs = BTreeMap<String, String>;

// =============================================================================
// WidgetProps
// =============================================================================

/// Everything a binder reads from the widget it wraps.
#[derive(Clone, Default)]
pub struct WidgetProps {
    /// Widget id, used as the registration handle.
    pub id: Option<String>,
    /// Field configuration declared on the widget itself.
    pub config: FieldConfig,
    /// Explicitly declared value (`None` = the widget manages its own state).
    pub value: Option<Value>,
    /// The widget type's built-in default value.
    pub default_value: Option<Value>,
    pub attrs: Attrs,
    pub handlers: Handlers,
}

impl WidgetProps {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_config(mut self, config: FieldConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_value(mut self, value: impl Into<Value>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Declare the widget type's built-in default value.
    ///
    /// A declared value equal to this default is treated as a placeholder,
    /// so a value held by the form context takes over.
    pub fn with_default_value(mut self, value: impl Into<Value>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(key.into(), value.into());
        self
    }

    pub fn with_class_name(self, class: impl Into<String>) -> Self {
        self.with_attr(CLASS_NAME, class)
    }

    /// Attach a handler for `trigger`.
    pub fn on<F>(mut self, trigger: Trigger, f: F) -> Self
    where
        F: Fn(&[Value]) + Send + Sync + 'static,
    {
        self.handlers.insert(trigger, Arc::new(f));
        self
    }

    pub fn class_name(&self) -> Option<&str> {
        self.attrs.get(CLASS_NAME).map(String::as_str)
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attrs.get(key).map(String::as_str)
    }

    pub fn handler(&self, trigger: &Trigger) -> Option<&Handler> {
        self.handlers.get(trigger)
    }

    /// Invoke the handler for `trigger`. Returns false if there is none.
    pub fn fire(&self, trigger: &Trigger, args: &[Value]) -> bool {
        match self.handlers.get(trigger) {
            Some(handler) => {
                handler(args);
                true
            }
            None => false,
        }
    }
}

impl fmt::Debug for WidgetProps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut handlers: Vec<_> = self.handlers.keys().map(Trigger::as_str).collect();
        handlers.sort_unstable();
        f.debug_struct("WidgetProps")
            .field("id", &self.id)
            .field("config", &self.config)
            .field("value", &self.value)
            .field("default_value", &self.default_value)
            .field("attrs", &self.attrs)
            .field("handlers", &handlers)
            .finish()
    }
}

// =============================================================================
// PropsPatch
// =============================================================================

/// Props a binder injects into its widget for one render.
#[derive(Clone, Default)]
pub struct PropsPatch {
    /// Error-state attributes (empty while the field has no errors).
    pub attrs: Attrs,
    /// The value to pass. `None` means the value prop is omitted.
    pub value: Option<Value>,
    /// Replacement handlers.
    pub handlers: Handlers,
}

impl PropsPatch {
    pub fn is_empty(&self) -> bool {
        self.attrs.is_empty() && self.value.is_none() && self.handlers.is_empty()
    }

    /// Merge this patch over `widget`'s props.
    ///
    /// Patch attributes and handlers replace the widget's entries with the
    /// same key. An omitted value leaves the widget's declared value as is.
    pub fn apply(self, widget: &WidgetProps) -> WidgetProps {
        let mut props = widget.clone();
        props.attrs.extend(self.attrs);
        if let Some(value) = self.value {
            props.value = Some(value);
        }
        props.handlers.extend(self.handlers);
        props
    }
}

impl fmt::Debug for PropsPatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut handlers: Vec<_> = self.handlers.keys().map(Trigger::as_str).collect();
        handlers.sort_unstable();
        f.debug_struct("PropsPatch")
            .field("attrs", &self.attrs)
            .field("value", &self.value)
            .field("handlers", &handlers)
            .finish()
    }
}
