#![forbid(unsafe_code)]

//! Backstack public facade crate.
//!
//! Re-exports the types most applications need from the core and runtime
//! crates and offers a prelude for day-to-day use.
//!
//! ```ignore
//! use backstack::prelude::*;
//!
//! let session = NavigationSession::new(SessionConfig::default());
//! session.open_sub_page(SubPageId::ENROLL);
//! session.wizards().enrollment.set_current_step(EnrollmentStep::ClassSelection);
//! assert!(session.handle_back());
//! ```

use std::fmt;

// --- Core re-exports -------------------------------------------------------

pub use backstack_core::{
    AnyStep, ClassCreationStep, EnrollmentModificationStep, EnrollmentStep, EntryKind,
    EntryPayload, EventBus, EventKind, HistoryConfig, HistoryEntry, HistoryState, HistoryStore,
    NavEvent, PersonManagementStep, PrincipalClassCreationStep, PrincipalPersonManagementStep,
    SignupStep, SubPageId, Subscription, WizardId, WizardStep,
};

// --- Runtime re-exports ----------------------------------------------------

pub use backstack_runtime::{
    BackAction, BackData, BackResolver, BackStrategy, FormsState, GoBackResult, HubKey, HubValue,
    NavInput, NavSimulator, NavigationSession, NavigationState, ResolveContext, ResolveError,
    SessionConfig, SessionConfigError, StateHub, StepMachine, UiState, Wizard, Wizards,
};

// --- Errors ---------------------------------------------------------------

/// Top-level error type for Backstack applications.
///
/// Back requests never fail with an error: strategy errors are reported in
/// the returned [`GoBackResult`].
#[derive(Debug)]
pub enum Error {
    /// Configuration could not be loaded or failed validation.
    Config(SessionConfigError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
        }
    }
}

impl From<SessionConfigError> for Error {
    fn from(err: SessionConfigError) -> Self {
        Self::Config(err)
    }
}

/// Standard result type for Backstack APIs.
pub type Result<T> = std::result::Result<T, Error>;

/// Build a session from a validated config.
pub fn session(config: SessionConfig) -> Result<NavigationSession> {
    Ok(NavigationSession::new(config.validated()?))
}

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        AnyStep, BackAction, EnrollmentStep, Error, EventKind, GoBackResult, NavEvent,
        NavigationSession, NavigationState, Result, SessionConfig, SubPageId, WizardId, WizardStep,
    };

    pub use crate::{core, runtime};
}

pub use backstack_core as core;
pub use backstack_runtime as runtime;
