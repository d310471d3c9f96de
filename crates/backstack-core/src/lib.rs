#![forbid(unsafe_code)]

//! Backstack Core
//!
//! Leaf building blocks of the academy client's navigation engine.
//!
//! # Key Components
//!
//! - [`HistoryStore`] - branchable, size-bounded virtual back-stack
//! - [`EventBus`] - typed synchronous publish/subscribe for [`NavEvent`]s
//! - [`ListenerSet`] / [`Subscription`] - ordered listener lists with RAII guards
//! - [`WizardId`], [`WizardStep`], [`AnyStep`] - the closed step vocabulary of
//!   every multi-step wizard
//! - [`SubPageId`] - sub-page overlay identifiers
//!
//! # Role in Backstack
//! `backstack-core` holds pure data structures. The state hub, step
//! machines, and back resolver that coordinate them live in
//! `backstack-runtime`.

pub mod event_bus;
pub mod history;
pub mod listener;
pub mod step;
pub mod sub_page;

pub use event_bus::{EventBus, EventKind, NavEvent};
pub use history::{
    EntryId, EntryKind, EntryPayload, HistoryConfig, HistoryEntry, HistoryState, HistoryStore,
};
pub use listener::{ListenerSet, Subscription, panic_message};
pub use step::{
    AnyStep, ClassCreationStep, EnrollmentModificationStep, EnrollmentStep, PersonManagementStep,
    PrincipalClassCreationStep, PrincipalPersonManagementStep, SignupStep, WizardId, WizardStep,
};
pub use sub_page::SubPageId;
