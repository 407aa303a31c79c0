//! Prelude module for convenient imports.
//!
//! ```ignore
//! use formbinder::prelude::*;
//! ```

pub use crate::binder::Binder;
pub use crate::config::FieldConfig;
pub use crate::context::{ErrorList, FieldError, FieldName, FormContext, WidgetHandle};
pub use crate::error::BindError;
pub use crate::events::{ErrorStatePropsGenerator, Handler, Handlers, Trigger, ValueFormatter};
pub use crate::rules::{
    CustomValidator, FieldType, Pattern, Rule, RuleSet, RuleSpec, RuleTag, Transform,
};
pub use crate::store::MemoryForm;
pub use crate::widget::{Attrs, PropsPatch, WidgetProps};
