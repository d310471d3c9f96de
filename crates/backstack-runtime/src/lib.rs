#![forbid(unsafe_code)]

//! Backstack Runtime
//!
//! Coordinates the core data structures into a working back-navigation
//! engine for the academy client.
//!
//! # Key Components
//!
//! - [`StateHub`] - keyed latest-value store with per-key subscribers
//! - [`StepMachine`] / [`Wizards`] - adjacency-checked wizard step machines
//! - [`BackResolver`] - ordered strategy chain deciding what "back" means
//! - [`NavigationSession`] - composition root that records history and
//!   applies back resolutions
//! - [`NavSimulator`] - scripted driver for end-to-end tests
//! - [`SessionConfig`] - tunables, loadable from TOML/JSON with
//!   `session-config`
//!
//! # Role in Backstack
//! `backstack-runtime` sits between the UI and `backstack-core`. Screens
//! drive wizard machines and open sub-pages through a session; the back
//! button calls [`NavigationSession::handle_back`]; everything else reads
//! the hub.

pub mod config;
pub mod hub;
#[cfg(feature = "tracing-json")]
pub mod logging;
pub mod navigation;
pub mod resolver;
pub mod session;
pub mod simulator;
pub mod wizard;

pub use config::{HistorySection, SessionConfig, SessionConfigError};
pub use hub::{DataCache, HubKey, HubValue, StateHub, UiState};
pub use navigation::NavigationState;
pub use resolver::{
    BackAction, BackData, BackResolver, BackStrategy, GoBackResult, ResolveContext, ResolveError,
    ResolverConfig,
};
pub use session::NavigationSession;
pub use simulator::{NavInput, NavSimulator, SimOutcome, SimRecord};
pub use wizard::{FormsState, MergePatch, StepMachine, Wizard, WizardStepState, Wizards};
