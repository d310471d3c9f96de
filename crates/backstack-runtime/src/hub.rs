#![forbid(unsafe_code)]

//! Keyed state hub with publish/subscribe semantics.
//!
//! The hub is the one place the rest of the client reads "current state"
//! from. It holds the last published value for each of a fixed set of keys
//! and notifies the subscribers of a key synchronously on every publish.
//!
//! # Invariants
//!
//! 1. `publish` stores the value before any subscriber runs, so a
//!    subscriber (or the caller, after `publish` returns) reading the same
//!    key observes the new value.
//! 2. Subscribers of a key run in registration order; a panicking subscriber
//!    is logged and the rest still run.
//! 3. `sync_states` notifies each affected key exactly once, with the last
//!    value given for it, in order of first appearance.
//! 4. Subscribing does not replay the current value.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use backstack_core::{ListenerSet, Subscription};

use crate::navigation::NavigationState;
use crate::wizard::FormsState;

/// Keys of the hub's slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HubKey {
    Navigation,
    Forms,
    Ui,
    DataCache,
}

impl HubKey {
    pub const ALL: [HubKey; 4] = [HubKey::Navigation, HubKey::Forms, HubKey::Ui, HubKey::DataCache];

    const fn slot(self) -> usize {
        match self {
            Self::Navigation => 0,
            Self::Forms => 1,
            Self::Ui => 2,
            Self::DataCache => 3,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Navigation => "navigation",
            Self::Forms => "forms",
            Self::Ui => "ui",
            Self::DataCache => "data-cache",
        }
    }
}

/// Transient UI flags shared across screens.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UiState {
    pub is_loading: bool,
    /// Message for the surrounding UI to surface, if any.
    pub toast: Option<String>,
}

/// Small string-keyed cache of fetched values.
pub type DataCache = BTreeMap<String, String>;

/// A value stored in the hub. The key is implied by the variant.
#[derive(Debug, Clone, PartialEq)]
pub enum HubValue {
    Navigation(NavigationState),
    Forms(Box<FormsState>),
    Ui(UiState),
    DataCache(DataCache),
}

impl HubValue {
    #[must_use]
    pub fn key(&self) -> HubKey {
        match self {
            Self::Navigation(_) => HubKey::Navigation,
            Self::Forms(_) => HubKey::Forms,
            Self::Ui(_) => HubKey::Ui,
            Self::DataCache(_) => HubKey::DataCache,
        }
    }
}

impl From<NavigationState> for HubValue {
    fn from(value: NavigationState) -> Self {
        Self::Navigation(value)
    }
}

impl From<FormsState> for HubValue {
    fn from(value: FormsState) -> Self {
        Self::Forms(Box::new(value))
    }
}

impl From<UiState> for HubValue {
    fn from(value: UiState) -> Self {
        Self::Ui(value)
    }
}

impl From<DataCache> for HubValue {
    fn from(value: DataCache) -> Self {
        Self::DataCache(value)
    }
}

const SLOTS: usize = HubKey::ALL.len();

struct HubInner {
    values: RefCell<[Option<HubValue>; SLOTS]>,
    listeners: [ListenerSet<HubValue>; SLOTS],
}

/// Shared handle to the state hub.
#[derive(Clone)]
pub struct StateHub {
    inner: Rc<HubInner>,
}

impl Default for StateHub {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for StateHub {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let values = self.inner.values.borrow();
        let present: Vec<&str> = HubKey::ALL
            .iter()
            .filter(|k| values[k.slot()].is_some())
            .map(|k| k.as_str())
            .collect();
        f.debug_struct("StateHub").field("present", &present).finish()
    }
}

impl StateHub {
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Rc::new(HubInner {
                values: RefCell::new(Default::default()),
                listeners: Default::default(),
            }),
        }
    }

    /// Store `value` under its key and notify that key's subscribers.
    pub fn publish(&self, value: impl Into<HubValue>) {
        let value = value.into();
        let key = value.key();
        self.inner.values.borrow_mut()[key.slot()] = Some(value.clone());
        self.dispatch(key, &value);
    }

    /// Register `callback` for `key`.
    pub fn subscribe(&self, key: HubKey, callback: impl Fn(&HubValue) + 'static) -> Subscription {
        self.inner.listeners[key.slot()].subscribe(callback)
    }

    /// Last value published under `key`.
    #[must_use]
    pub fn get_state(&self, key: HubKey) -> Option<HubValue> {
        self.inner.values.borrow()[key.slot()].clone()
    }

    /// Publish several values as one batch.
    ///
    /// Every value is stored first; then each affected key is notified once
    /// with its final value.
    pub fn sync_states(&self, values: impl IntoIterator<Item = HubValue>) {
        let mut order: Vec<HubKey> = Vec::new();
        {
            let mut slots = self.inner.values.borrow_mut();
            for value in values {
                let key = value.key();
                if !order.contains(&key) {
                    order.push(key);
                }
                slots[key.slot()] = Some(value);
            }
        }
        tracing::trace!(target: "backstack.hub", keys = order.len(), "sync");
        for key in order {
            if let Some(value) = self.get_state(key) {
                self.dispatch(key, &value);
            }
        }
    }

    /// Drop the value and every subscriber of `key`.
    pub fn clear_state(&self, key: HubKey) {
        self.inner.values.borrow_mut()[key.slot()] = None;
        self.inner.listeners[key.slot()].clear();
        tracing::debug!(target: "backstack.hub", key = key.as_str(), "cleared");
    }

    /// Drop every value and subscriber.
    pub fn clear_all_states(&self) {
        for key in HubKey::ALL {
            self.clear_state(key);
        }
    }

    // ========================================================================
    // Typed getters
    // ========================================================================

    #[must_use]
    pub fn navigation(&self) -> Option<NavigationState> {
        match self.get_state(HubKey::Navigation) {
            Some(HubValue::Navigation(nav)) => Some(nav),
            _ => None,
        }
    }

    #[must_use]
    pub fn forms(&self) -> Option<FormsState> {
        match self.get_state(HubKey::Forms) {
            Some(HubValue::Forms(forms)) => Some(*forms),
            _ => None,
        }
    }

    #[must_use]
    pub fn ui(&self) -> Option<UiState> {
        match self.get_state(HubKey::Ui) {
            Some(HubValue::Ui(ui)) => Some(ui),
            _ => None,
        }
    }

    #[must_use]
    pub fn data_cache(&self) -> Option<DataCache> {
        match self.get_state(HubKey::DataCache) {
            Some(HubValue::DataCache(cache)) => Some(cache),
            _ => None,
        }
    }

    fn dispatch(&self, key: HubKey, value: &HubValue) {
        let delivered = self.inner.listeners[key.slot()].notify(key.as_str(), value);
        tracing::trace!(target: "backstack.hub", key = key.as_str(), delivered, "publish");
    }
}
