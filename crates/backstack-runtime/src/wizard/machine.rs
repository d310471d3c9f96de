#![forbid(unsafe_code)]

//! Generic step machine shared by every wizard.
//!
//! A [`StepMachine<W>`] owns one [`WizardStepState<W>`] exclusively. All
//! mutation goes through its methods, each of which announces the change on
//! the injected [`EventBus`] (as [`NavEvent::FormStateChanged`]) and then
//! notifies local subscribers.
//!
//! # Step adjacency
//!
//! `set_current_step` only accepts the current step or one of its direct
//! neighbours in the wizard's declared sequence. Anything further away is
//! dropped silently: state is unchanged, nothing is emitted, and the call
//! returns `false`. This keeps stale UI references from driving a wizard
//! into an invalid mid-state, and must not be turned into an error.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use backstack_core::{EventBus, ListenerSet, NavEvent, Subscription, WizardId, WizardStep};

/// Shallow merge of a partial update into a data struct.
pub trait MergePatch {
    /// Partial update; `None` fields leave the target untouched.
    type Patch;

    fn merge(&mut self, patch: Self::Patch);
}

/// Static description of a wizard: its id, step sequence, and domain data.
pub trait Wizard: 'static {
    const ID: WizardId;
    type Step: WizardStep;
    type Data: Clone + Default + fmt::Debug + PartialEq + MergePatch;
}

/// Current step plus domain fields of one wizard.
pub struct WizardStepState<W: Wizard> {
    pub current_step: W::Step,
    pub data: W::Data,
}

impl<W: Wizard> WizardStepState<W> {
    /// State at `step` with empty data.
    #[must_use]
    pub fn at(step: W::Step) -> Self {
        Self {
            current_step: step,
            data: W::Data::default(),
        }
    }

    #[must_use]
    pub fn is_at_first_step(&self) -> bool {
        self.current_step.index() == 0
    }
}

impl<W: Wizard> Default for WizardStepState<W> {
    fn default() -> Self {
        Self::at(W::Step::first())
    }
}

impl<W: Wizard> Clone for WizardStepState<W> {
    fn clone(&self) -> Self {
        Self {
            current_step: self.current_step,
            data: self.data.clone(),
        }
    }
}

impl<W: Wizard> PartialEq for WizardStepState<W> {
    fn eq(&self, other: &Self) -> bool {
        self.current_step == other.current_step && self.data == other.data
    }
}

impl<W: Wizard> fmt::Debug for WizardStepState<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WizardStepState")
            .field("wizard", &W::ID)
            .field("current_step", &self.current_step)
            .field("data", &self.data)
            .finish()
    }
}

struct MachineInner<W: Wizard> {
    state: RefCell<WizardStepState<W>>,
    initial: WizardStepState<W>,
    bus: EventBus,
    listeners: ListenerSet<WizardStepState<W>>,
}

/// Shared handle to one wizard's step machine.
pub struct StepMachine<W: Wizard> {
    inner: Rc<MachineInner<W>>,
}

impl<W: Wizard> Clone for StepMachine<W> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<W: Wizard> fmt::Debug for StepMachine<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StepMachine")
            .field("state", &*self.inner.state.borrow())
            .field("listeners", &self.inner.listeners.live_count())
            .finish()
    }
}

impl<W: Wizard> StepMachine<W> {
    /// Machine starting at the wizard's first step with default data.
    #[must_use]
    pub fn new(bus: EventBus) -> Self {
        Self::with_initial(bus, WizardStepState::default())
    }

    /// Machine starting from `initial`; `reset` returns here.
    #[must_use]
    pub fn with_initial(bus: EventBus, initial: WizardStepState<W>) -> Self {
        Self {
            inner: Rc::new(MachineInner {
                state: RefCell::new(initial.clone()),
                initial,
                bus,
                listeners: ListenerSet::new(),
            }),
        }
    }

    /// Copy of the current state.
    #[must_use]
    pub fn state(&self) -> WizardStepState<W> {
        self.inner.state.borrow().clone()
    }

    #[must_use]
    pub fn current_step(&self) -> W::Step {
        self.inner.state.borrow().current_step
    }

    /// Copy of the current domain data.
    #[must_use]
    pub fn data(&self) -> W::Data {
        self.inner.state.borrow().data.clone()
    }

    /// Move to `step` if it is adjacent to the current step.
    ///
    /// Returns `false`, without emitting, when the request is rejected.
    pub fn set_current_step(&self, step: W::Step) -> bool {
        let previous = {
            let mut state = self.inner.state.borrow_mut();
            let current = state.current_step;
            if !current.is_adjacent_to(step) {
                tracing::debug!(
                    target: "backstack.wizard",
                    wizard = %W::ID,
                    current = current.as_str(),
                    requested = step.as_str(),
                    "rejected non-adjacent step"
                );
                return false;
            }
            state.current_step = step;
            current
        };
        self.commit(previous);
        true
    }

    /// Shallow-merge `patch` into the domain data.
    pub fn set_data(&self, patch: <W::Data as MergePatch>::Patch) {
        let previous = {
            let mut state = self.inner.state.borrow_mut();
            state.data.merge(patch);
            state.current_step
        };
        self.commit(previous);
    }

    /// Edit the domain data in place.
    pub fn update_data(&self, f: impl FnOnce(&mut W::Data)) {
        let previous = {
            let mut state = self.inner.state.borrow_mut();
            f(&mut state.data);
            state.current_step
        };
        self.commit(previous);
    }

    /// Restore the initial state.
    pub fn reset(&self) {
        let previous = {
            let mut state = self.inner.state.borrow_mut();
            let previous = state.current_step;
            *state = self.inner.initial.clone();
            previous
        };
        self.commit(previous);
    }

    /// Observe every accepted mutation.
    pub fn subscribe(&self, callback: impl Fn(&WizardStepState<W>) + 'static) -> Subscription {
        self.inner.listeners.subscribe(callback)
    }

    fn commit(&self, previous: W::Step) {
        let snapshot = self.state();
        tracing::debug!(
            target: "backstack.wizard",
            wizard = %W::ID,
            from = previous.as_str(),
            to = snapshot.current_step.as_str(),
            "form state changed"
        );
        self.inner.bus.emit(NavEvent::FormStateChanged {
            wizard: W::ID,
            step: snapshot.current_step.into_any(),
            previous: previous.into_any(),
        });
        self.inner.listeners.notify(W::ID.as_str(), &snapshot);
    }
}
