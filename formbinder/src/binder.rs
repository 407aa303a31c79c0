//! The binder: one widget bound to one field of a form context.

use std::sync::Arc;

use log::warn;

use crate::config::FieldConfig;
use crate::context::{FieldName, FormContext, WidgetHandle};
use crate::error::BindError;
use crate::events::{EventInterceptor, Trigger};
use crate::extract::extract_rules;
use crate::lifecycle::{LifecycleSync, SyncState};
use crate::rules::RuleSet;
use crate::value::resolve_value;
use crate::widget::{PropsPatch, WidgetProps};

/// Mediates between a single widget and a shared form context.
///
/// The binder derives the widget's validation rules, keeps the context's
/// registry in step with its own lifecycle, and on every render produces a
/// [`PropsPatch`] (value, error-state attributes, wrapped handlers) for the
/// caller to apply to the widget.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
///
/// use formbinder::prelude::*;
/// use serde_json::json;
///
/// let form = Arc::new(MemoryForm::new());
/// let widget = WidgetProps::new().with_config(FieldConfig::new().name("email"));
///
/// let mut binder = Binder::new(Arc::clone(&form), FieldConfig::new().required(true), [widget])?;
/// binder.mount()?;
///
/// let props = binder.render_widget();
/// props.fire(&Trigger::Change, &[json!("me@example.com")]);
/// assert_eq!(form.data(), json!({"email": "me@example.com"}));
///
/// binder.unmount()?;
/// # Ok::<(), BindError>(())
/// ```
pub struct Binder<C: FormContext + ?Sized> {
    context: Arc<C>,
    config: FieldConfig,
    widget: WidgetProps,
    sync: LifecycleSync<C>,
}

impl<C: FormContext + ?Sized + 'static> Binder<C> {
    /// Wrap exactly one widget.
    pub fn new(
        context: Arc<C>,
        config: FieldConfig,
        children: impl IntoIterator<Item = WidgetProps>,
    ) -> Result<Self, BindError> {
        let widget = only_child(children)?;
        Ok(Self {
            sync: LifecycleSync::new(Arc::clone(&context)),
            context,
            config,
            widget,
        })
    }

    /// The field this binder is bound to: binder name, else widget name.
    pub fn name(&self) -> Option<FieldName> {
        self.config
            .field_name()
            .or_else(|| self.widget.config.field_name())
    }

    /// Rules derived from the current configuration.
    pub fn rules(&self) -> RuleSet {
        extract_rules(&self.config, &self.widget.config)
    }

    /// Rules most recently registered with the context.
    pub fn current_rules(&self) -> RuleSet {
        self.sync.current().get()
    }

    pub fn state(&self) -> &SyncState {
        self.sync.state()
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    pub fn widget(&self) -> &WidgetProps {
        &self.widget
    }

    /// The event that fires validation for this field.
    pub fn trigger(&self) -> Trigger {
        self.config
            .trigger_type
            .clone()
            .or_else(|| self.widget.config.trigger_type.clone())
            .unwrap_or_default()
    }

    /// First activation. Registers the field's rules if it has any.
    pub fn mount(&mut self) -> Result<(), BindError> {
        let name = self.name();
        if name.is_none() {
            warn!("Binder mounted without a field name; widget is not bound");
        }
        let handle = self.handle(name.as_ref());
        let rules = self.rules();
        self.sync.activate(name.as_ref(), rules, &handle)
    }

    /// New configuration (and widget) for a mounted binder.
    pub fn update(
        &mut self,
        config: FieldConfig,
        children: impl IntoIterator<Item = WidgetProps>,
    ) -> Result<(), BindError> {
        let widget = only_child(children)?;
        self.config = config;
        self.widget = widget;

        let name = self.name();
        let handle = self.handle(name.as_ref());
        let rules = self.rules();
        self.sync.update(name.as_ref(), rules, &handle)
    }

    /// Deactivate. Drops the registration if one is held.
    pub fn unmount(mut self) -> Result<(), BindError> {
        self.sync.deactivate()
    }

    /// Compute the props patch for this render.
    ///
    /// An unnamed binder returns an empty patch: the widget keeps its own
    /// value and handlers.
    pub fn render(&self) -> PropsPatch {
        let Some(name) = self.name() else {
            return PropsPatch::default();
        };

        let mut interceptor =
            EventInterceptor::new(Arc::clone(&self.context), name.clone(), self.sync.current())
                .trigger(self.trigger());
        if let Some(formatter) = self
            .config
            .value_formatter
            .clone()
            .or_else(|| self.widget.config.value_formatter.clone())
        {
            interceptor = interceptor.formatter(formatter);
        }
        if let Some(generator) = self
            .config
            .error_state_props_generator
            .clone()
            .or_else(|| self.widget.config.error_state_props_generator.clone())
        {
            interceptor = interceptor.error_state_generator(generator);
        }

        let errors = self.context.get_error(&name);
        let attrs = interceptor
            .error_state(&errors, &self.widget)
            .unwrap_or_default();

        let value = resolve_value(
            self.widget.value.as_ref(),
            self.widget.default_value.as_ref(),
            self.context.get_value(&name),
        );

        PropsPatch {
            attrs,
            value,
            handlers: interceptor.intercept(&self.widget.handlers),
        }
    }

    /// Render and apply the patch to the wrapped widget's props.
    pub fn render_widget(&self) -> WidgetProps {
        self.render().apply(&self.widget)
    }

    fn handle(&self, name: Option<&FieldName>) -> WidgetHandle {
        match (&self.widget.id, name) {
            (Some(id), _) => WidgetHandle::new(id.clone()),
            (None, Some(name)) => WidgetHandle::new(name.as_str()),
            (None, None) => WidgetHandle::new(""),
        }
    }
}

fn only_child(children: impl IntoIterator<Item = WidgetProps>) -> Result<WidgetProps, BindError> {
    let mut children = children.into_iter();
    match (children.next(), children.next()) {
        (Some(widget), None) => Ok(widget),
        (None, _) => Err(BindError::ChildCount(0)),
        (Some(_), Some(_)) => Err(BindError::ChildCount(2 + children.count())),
    }
}
