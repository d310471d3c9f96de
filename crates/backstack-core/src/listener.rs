#![forbid(unsafe_code)]

//! Ordered listener lists with RAII subscription guards.
//!
//! [`ListenerSet<T>`] is the notification primitive shared by the event bus,
//! the history store, the step machines, and the state hub. Callbacks are
//! kept alive by the [`Subscription`] guard handed back to the subscriber;
//! the set itself only holds weak references, so dropping (or explicitly
//! unsubscribing) the guard removes the listener without touching the set.
//!
//! # Invariants
//!
//! 1. Listeners are invoked in registration order.
//! 2. No internal borrow is held while a listener runs, so listeners may
//!    subscribe, unsubscribe, or trigger further notifications.
//! 3. A panicking listener is caught and logged; the remaining listeners
//!    still run and the notifier never observes the panic.

use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::rc::{Rc, Weak};

type CallbackRc<T> = Rc<dyn Fn(&T)>;
type CallbackWeak<T> = Weak<dyn Fn(&T)>;

/// An ordered set of weakly held listener callbacks.
pub struct ListenerSet<T: ?Sized> {
    entries: RefCell<Vec<CallbackWeak<T>>>,
}

impl<T: ?Sized> Default for ListenerSet<T> {
    fn default() -> Self {
        Self {
            entries: RefCell::new(Vec::new()),
        }
    }
}

impl<T: ?Sized + 'static> fmt::Debug for ListenerSet<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerSet")
            .field("live", &self.live_count())
            .finish()
    }
}

impl<T: ?Sized + 'static> ListenerSet<T> {
    /// Create an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback. The callback stays registered for as long as the
    /// returned guard is alive and has not been unsubscribed.
    pub fn subscribe(&self, callback: impl Fn(&T) + 'static) -> Subscription {
        let strong: CallbackRc<T> = Rc::new(callback);
        self.entries.borrow_mut().push(Rc::downgrade(&strong));
        Subscription {
            guard: Some(Box::new(strong)),
        }
    }

    /// Invoke every live listener with `value`, pruning dead entries.
    ///
    /// `channel` names the notification source in panic logs. Returns the
    /// number of listeners that were invoked.
    pub fn notify(&self, channel: &'static str, value: &T) -> usize {
        let callbacks: Vec<CallbackRc<T>> = {
            let mut entries = self.entries.borrow_mut();
            entries.retain(|w| w.strong_count() > 0);
            entries.iter().filter_map(Weak::upgrade).collect()
        };

        for (position, callback) in callbacks.iter().enumerate() {
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| callback(value)));
            if let Err(payload) = outcome {
                tracing::error!(
                    target: "backstack.listener",
                    channel,
                    position,
                    reason = %panic_message(payload.as_ref()),
                    "listener panicked; continuing with remaining listeners"
                );
            }
        }
        callbacks.len()
    }

    /// Number of listeners whose guards are still alive.
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.entries
            .borrow()
            .iter()
            .filter(|w| w.strong_count() > 0)
            .count()
    }

    /// Forget every registered listener. Outstanding guards become inert.
    pub fn clear(&self) {
        self.entries.borrow_mut().clear();
    }
}

/// Text of a caught panic payload.
#[must_use]
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

/// Guard for a registered listener.
///
/// Dropping the guard unsubscribes. [`Subscription::unsubscribe`] does the
/// same eagerly and may be called any number of times.
#[must_use = "dropping a Subscription unsubscribes its listener"]
pub struct Subscription {
    guard: Option<Box<dyn Any>>,
}

impl Subscription {
    /// Stop receiving notifications. Idempotent.
    pub fn unsubscribe(&mut self) {
        self.guard = None;
    }

    /// Whether the listener is still registered.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.guard.is_some()
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.is_active())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn notifies_in_registration_order() {
        let set = ListenerSet::<u32>::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        let l1 = Rc::clone(&log);
        let _a = set.subscribe(move |v| l1.borrow_mut().push(("a", *v)));
        let l2 = Rc::clone(&log);
        let _b = set.subscribe(move |v| l2.borrow_mut().push(("b", *v)));

        assert_eq!(set.notify("test", &7), 2);
        assert_eq!(*log.borrow(), vec![("a", 7), ("b", 7)]);
    }

    #[test]
    fn unsubscribe_is_idempotent() {
        let set = ListenerSet::<u32>::new();
        let hits = Rc::new(Cell::new(0));
        let h = Rc::clone(&hits);
        let mut sub = set.subscribe(move |_| h.set(h.get() + 1));

        set.notify("test", &1);
        sub.unsubscribe();
        sub.unsubscribe();
        assert!(!sub.is_active());
        set.notify("test", &2);

        assert_eq!(hits.get(), 1);
        assert_eq!(set.live_count(), 0);
    }

    #[test]
    fn dropped_guard_stops_delivery() {
        let set = ListenerSet::<u32>::new();
        let hits = Rc::new(Cell::new(0));
        {
            let h = Rc::clone(&hits);
            let _sub = set.subscribe(move |_| h.set(h.get() + 1));
            set.notify("test", &1);
        }
        set.notify("test", &2);
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn panicking_listener_does_not_block_others() {
        let set = ListenerSet::<u32>::new();
        let hits = Rc::new(Cell::new(0));
        let _bad = set.subscribe(|_| panic!("boom"));
        let h = Rc::clone(&hits);
        let _good = set.subscribe(move |_| h.set(h.get() + 1));

        assert_eq!(set.notify("test", &1), 2);
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn listener_may_subscribe_during_notify() {
        let set = Rc::new(ListenerSet::<u32>::new());
        let late = Rc::new(RefCell::new(Vec::new()));

        let s = Rc::clone(&set);
        let keep = Rc::clone(&late);
        let _outer = set.subscribe(move |_| {
            let sub = s.subscribe(|_| {});
            keep.borrow_mut().push(sub);
        });

        set.notify("test", &1);
        assert_eq!(set.live_count(), 2);
    }

    #[test]
    fn clear_makes_guards_inert() {
        let set = ListenerSet::<u32>::new();
        let hits = Rc::new(Cell::new(0));
        let h = Rc::clone(&hits);
        let sub = set.subscribe(move |_| h.set(h.get() + 1));
        set.clear();
        set.notify("test", &1);
        assert_eq!(hits.get(), 0);
        assert!(sub.is_active());
    }
}
