//! Binds a single input widget to a shared form context.
//!
//! A [`Binder`](binder::Binder) derives the widget's validation rules from
//! binder-level and widget-level [`FieldConfig`](config::FieldConfig), keeps
//! the context's rule registry in step with its mount/update/unmount
//! lifecycle, picks the value the widget displays, and wraps the widget's
//! event handlers so changes reach the context and fire validation.
//!
//! The validation engine and widget rendering are outside this crate: the
//! engine sits behind [`FormContext`](context::FormContext), and the caller
//! applies each render's [`PropsPatch`](widget::PropsPatch) to its widget.

pub mod binder;
pub mod config;
pub mod context;
pub mod error;
pub mod events;
pub mod extract;
pub mod lifecycle;
pub mod prelude;
pub mod rules;
pub mod store;
pub mod value;
pub mod widget;

pub use binder::Binder;
pub use error::BindError;
