//! Binder configuration errors.

use thiserror::Error;

/// Errors reported when a binder is configured or driven incorrectly.
///
/// Failed validation is never an error here; it surfaces as an
/// [`ErrorList`](crate::context::ErrorList) through the form context.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindError {
    /// The binder was given zero or several widgets.
    #[error("binder must wrap exactly one widget, got {0}")]
    ChildCount(usize),

    /// Validation rules were declared but neither the binder nor the widget
    /// declares a field name.
    #[error("field has validation rules but no name")]
    MissingName,

    /// `mount` was called on a binder that is already mounted.
    #[error("binder is already mounted")]
    AlreadyMounted,

    /// The binder is not mounted (never mounted, or already unmounted).
    #[error("binder is not mounted")]
    NotMounted,
}
