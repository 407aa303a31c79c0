//! Keeps a binder's rule registration in step with its lifecycle.
//!
//! `LifecycleSync` is driven through three transitions: `activate` (mount),
//! `update` (configuration changed) and `deactivate` (unmount). On each it
//! compares the freshly extracted [`RuleSet`] with the one it registered last
//! and only talks to the form context when something actually changed.

use std::sync::{Arc, RwLock};

use log::{debug, trace};

use crate::context::{FieldName, FormContext, WidgetHandle};
use crate::error::BindError;
use crate::rules::RuleSet;

// =============================================================================
// CurrentRules
// =============================================================================

/// The rule set most recently registered by a binder.
///
/// Shared between the binder and the event handlers it hands out, so a
/// handler built during one render sees registrations made after it.
#[derive(Debug, Clone, Default)]
pub struct CurrentRules {
    inner: Arc<RwLock<RuleSet>>,
}

impl CurrentRules {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a clone of the current rules.
    pub fn get(&self) -> RuleSet {
        self.inner
            .read()
            .map(|guard| guard.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }

    /// Replace the current rules.
    pub fn set(&self, rules: RuleSet) {
        match self.inner.write() {
            Ok(mut guard) => *guard = rules,
            Err(poisoned) => *poisoned.into_inner() = rules,
        }
    }

    /// Check the current rules against `rules` without cloning.
    pub fn matches(&self, rules: &RuleSet) -> bool {
        match self.inner.read() {
            Ok(guard) => *guard == *rules,
            Err(poisoned) => *poisoned.into_inner() == *rules,
        }
    }

    pub fn is_empty(&self) -> bool {
        match self.inner.read() {
            Ok(guard) => guard.is_empty(),
            Err(poisoned) => poisoned.into_inner().is_empty(),
        }
    }
}

// =============================================================================
// SyncState
// =============================================================================

/// Where a binder is in its lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SyncState {
    /// Not yet mounted.
    #[default]
    Inactive,
    /// Mounted, no rules registered.
    Unregistered,
    /// Mounted, rules registered under this name.
    Registered(FieldName),
    /// Unmounted. Terminal.
    Unmounted,
}

impl SyncState {
    pub fn is_mounted(&self) -> bool {
        matches!(self, SyncState::Unregistered | SyncState::Registered(_))
    }

    /// The name currently registered, if any.
    pub fn registered_name(&self) -> Option<&FieldName> {
        match self {
            SyncState::Registered(name) => Some(name),
            _ => None,
        }
    }
}

// =============================================================================
// LifecycleSync
// =============================================================================

/// Drives the form context's registry across mount, update and unmount.
///
/// Holds at most one registration at a time. Re-registering an unchanged
/// rule set is a no-op.
pub struct LifecycleSync<C: FormContext + ?Sized> {
    context: Arc<C>,
    state: SyncState,
    current: CurrentRules,
}

impl<C: FormContext + ?Sized> LifecycleSync<C> {
    pub fn new(context: Arc<C>) -> Self {
        Self {
            context,
            state: SyncState::Inactive,
            current: CurrentRules::new(),
        }
    }

    pub fn state(&self) -> &SyncState {
        &self.state
    }

    /// Handle to the registered rules, for event handlers.
    pub fn current(&self) -> CurrentRules {
        self.current.clone()
    }

    /// First activation: register `rules` if there are any.
    pub fn activate(
        &mut self,
        name: Option<&FieldName>,
        rules: RuleSet,
        handle: &WidgetHandle,
    ) -> Result<(), BindError> {
        if self.state != SyncState::Inactive {
            return Err(BindError::AlreadyMounted);
        }

        if rules.is_empty() {
            debug!("Field {:?} has no rules, not registering", name.map(FieldName::as_str));
            self.state = SyncState::Unregistered;
            self.current.set(rules);
            return Ok(());
        }

        let name = name.ok_or(BindError::MissingName)?;
        self.register(name, rules, handle);
        Ok(())
    }

    /// Configuration changed: re-register if the rules differ.
    ///
    /// A changed name drops the old registration before adding the new one.
    /// Going from some rules to none retracts the registration.
    pub fn update(
        &mut self,
        name: Option<&FieldName>,
        rules: RuleSet,
        handle: &WidgetHandle,
    ) -> Result<(), BindError> {
        if !self.state.is_mounted() {
            return Err(BindError::NotMounted);
        }

        if rules.is_empty() {
            self.retract();
            return Ok(());
        }

        let name = name.ok_or(BindError::MissingName)?;

        if let Some(old) = self.state.registered_name() {
            if old != name {
                debug!("Field renamed '{}' -> '{}'", old, name);
                self.context.remove_validate(old);
            } else if self.current.matches(&rules) {
                trace!("Rules for '{}' unchanged, skipping registration", name);
                return Ok(());
            }
        }

        self.register(name, rules, handle);
        Ok(())
    }

    /// Unmount: drop the registration if one is held.
    pub fn deactivate(&mut self) -> Result<(), BindError> {
        if !self.state.is_mounted() {
            return Err(BindError::NotMounted);
        }

        if let Some(name) = self.state.registered_name() {
            debug!("Removing validation for '{}'", name);
            self.context.remove_validate(name);
        }

        self.state = SyncState::Unmounted;
        self.current.set(RuleSet::new());
        Ok(())
    }

    fn register(&mut self, name: &FieldName, rules: RuleSet, handle: &WidgetHandle) {
        debug!("Registering {} rule(s) for '{}' (widget {})", rules.len(), name, handle);
        self.context.add_validate(name, &rules, handle);
        self.state = SyncState::Registered(name.clone());
        self.current.set(rules);
    }

    fn retract(&mut self) {
        if let Some(name) = self.state.registered_name() {
            debug!("Rules for '{}' cleared, retracting registration", name);
            self.context.remove_validate(name);
        }
        self.state = SyncState::Unregistered;
        self.current.set(RuleSet::new());
    }
}
