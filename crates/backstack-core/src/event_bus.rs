#![forbid(unsafe_code)]

//! Typed, synchronous publish/subscribe channel for navigation events.
//!
//! The bus is an explicitly constructed handle: one instance per session is
//! cloned into every component that emits or listens. Clones share the same
//! listener lists.
//!
//! Delivery is synchronous and at-most-once per subscriber per emission;
//! listeners of one [`EventKind`] run in registration order before
//! [`EventBus::emit`] returns. Nothing is buffered: a listener registered
//! after an emission never sees it.

use std::fmt;
use std::rc::Rc;

use crate::listener::{ListenerSet, Subscription};
use crate::step::{AnyStep, WizardId};
use crate::sub_page::SubPageId;

/// Discriminant of a [`NavEvent`], used to pick a topic when subscribing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    FormStateChanged,
    NavigationChanged,
    SubPageClosed,
}

impl EventKind {
    const COUNT: usize = 3;

    const fn slot(self) -> usize {
        match self {
            Self::FormStateChanged => 0,
            Self::NavigationChanged => 1,
            Self::SubPageClosed => 2,
        }
    }

    /// Topic name used in logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FormStateChanged => "formStateChanged",
            Self::NavigationChanged => "navigationChanged",
            Self::SubPageClosed => "subPageClosed",
        }
    }
}

/// Events exchanged between the navigation components.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavEvent {
    /// A step machine accepted a mutation.
    FormStateChanged {
        wizard: WizardId,
        /// Step after the mutation.
        step: AnyStep,
        /// Step before the mutation; equal to `step` for data-only changes.
        previous: AnyStep,
    },
    /// The active tab or the open sub-page changed.
    NavigationChanged {
        sub_page: Option<SubPageId>,
        active_tab: usize,
    },
    /// A resolved `close` action was applied.
    SubPageClosed { active_tab: usize },
}

impl NavEvent {
    #[must_use]
    pub fn kind(&self) -> EventKind {
        match self {
            Self::FormStateChanged { .. } => EventKind::FormStateChanged,
            Self::NavigationChanged { .. } => EventKind::NavigationChanged,
            Self::SubPageClosed { .. } => EventKind::SubPageClosed,
        }
    }
}

struct BusInner {
    topics: [ListenerSet<NavEvent>; EventKind::COUNT],
}

/// Shared handle to the navigation event bus.
#[derive(Clone)]
pub struct EventBus {
    inner: Rc<BusInner>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("form_state_listeners", &self.listener_count(EventKind::FormStateChanged))
            .field("navigation_listeners", &self.listener_count(EventKind::NavigationChanged))
            .field("closed_listeners", &self.listener_count(EventKind::SubPageClosed))
            .finish()
    }
}

impl EventBus {
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Rc::new(BusInner {
                topics: Default::default(),
            }),
        }
    }

    /// Listen to every event of `kind`.
    pub fn subscribe(
        &self,
        kind: EventKind,
        callback: impl Fn(&NavEvent) + 'static,
    ) -> Subscription {
        self.inner.topics[kind.slot()].subscribe(callback)
    }

    /// Deliver `event` to the listeners of its kind. Returns how many
    /// listeners were invoked.
    pub fn emit(&self, event: NavEvent) -> usize {
        let kind = event.kind();
        tracing::trace!(
            target: "backstack.bus",
            topic = kind.as_str(),
            event = ?event,
            "emit"
        );
        self.inner.topics[kind.slot()].notify(kind.as_str(), &event)
    }

    /// Live listeners registered for `kind`.
    #[must_use]
    pub fn listener_count(&self, kind: EventKind) -> usize {
        self.inner.topics[kind.slot()].live_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::step::EnrollmentStep;
    use std::cell::RefCell;

    fn step_event() -> NavEvent {
        NavEvent::FormStateChanged {
            wizard: WizardId::Enrollment,
            step: EnrollmentStep::ClassSelection.into(),
            previous: EnrollmentStep::AcademySelection.into(),
        }
    }

    #[test]
    fn delivers_only_to_matching_topic() {
        let bus = EventBus::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let s = Rc::clone(&seen);
        let _forms = bus.subscribe(EventKind::FormStateChanged, move |e| {
            s.borrow_mut().push(e.kind());
        });
        let s = Rc::clone(&seen);
        let _closed = bus.subscribe(EventKind::SubPageClosed, move |e| {
            s.borrow_mut().push(e.kind());
        });

        assert_eq!(bus.emit(step_event()), 1);
        assert_eq!(*seen.borrow(), vec![EventKind::FormStateChanged]);
    }

    #[test]
    fn clones_share_listeners() {
        let bus = EventBus::new();
        let other = bus.clone();
        let hits = Rc::new(RefCell::new(0));
        let h = Rc::clone(&hits);
        let _sub = other.subscribe(EventKind::SubPageClosed, move |_| *h.borrow_mut() += 1);

        bus.emit(NavEvent::SubPageClosed { active_tab: 0 });
        assert_eq!(*hits.borrow(), 1);
        assert_eq!(bus.listener_count(EventKind::SubPageClosed), 1);
    }

    #[test]
    fn emit_without_listeners_is_a_no_op() {
        let bus = EventBus::new();
        assert_eq!(
            bus.emit(NavEvent::NavigationChanged {
                sub_page: None,
                active_tab: 2
            }),
            0
        );
    }

    #[test]
    fn listeners_run_in_registration_order() {
        let bus = EventBus::new();
        let order = Rc::new(RefCell::new(Vec::new()));
        let mut subs = Vec::new();
        for id in 0..4 {
            let o = Rc::clone(&order);
            subs.push(bus.subscribe(EventKind::FormStateChanged, move |_| {
                o.borrow_mut().push(id);
            }));
        }
        bus.emit(step_event());
        assert_eq!(*order.borrow(), vec![0, 1, 2, 3]);
    }
}
