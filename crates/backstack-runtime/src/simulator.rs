#![forbid(unsafe_code)]

//! Scripted driver for end-to-end navigation tests.
//!
//! [`NavSimulator`] feeds a list of [`NavInput`]s through a
//! [`NavigationSession`] and keeps one [`SimRecord`] per input: what the
//! input returned, and the navigation and history cursor it left behind.
//!
//! ```ignore
//! let mut sim = NavSimulator::new(NavigationSession::new(SessionConfig::default()));
//! sim.run([
//!     NavInput::OpenSubPage(SubPageId::ENROLL),
//!     NavInput::Step(EnrollmentStep::ClassSelection.into()),
//!     NavInput::Back,
//!     NavInput::Back,
//! ]);
//! assert_eq!(sim.back_actions(), [BackAction::HistoryBack, BackAction::Close]);
//! ```

use backstack_core::{AnyStep, SubPageId};
use web_time::{Duration, Instant};

use crate::navigation::NavigationState;
use crate::resolver::{BackAction, GoBackResult};
use crate::session::NavigationSession;

/// One scripted user action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavInput {
    SelectTab(usize),
    OpenSubPage(SubPageId),
    /// Ask the owning wizard to move to this step.
    Step(AnyStep),
    Back,
    Reset,
}

/// What an input returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimOutcome {
    /// A tab switch or reset.
    Done,
    /// An open or step request and whether it was accepted.
    Accepted(bool),
    /// A back request; `None` when it was dropped as re-entrant.
    Back(Option<GoBackResult>),
}

/// State after one input.
#[derive(Debug, Clone)]
pub struct SimRecord {
    pub input: NavInput,
    pub outcome: SimOutcome,
    pub navigation: NavigationState,
    pub history_len: usize,
    pub cursor: Option<usize>,
    /// Time since the simulator started.
    pub at: Duration,
}

impl SimRecord {
    /// Action of a back input.
    #[must_use]
    pub fn back_action(&self) -> Option<BackAction> {
        match &self.outcome {
            SimOutcome::Back(Some(result)) => Some(result.action),
            _ => None,
        }
    }
}

/// Drives a session input by input.
#[derive(Debug)]
pub struct NavSimulator {
    session: NavigationSession,
    records: Vec<SimRecord>,
    started: Instant,
}

impl NavSimulator {
    #[must_use]
    pub fn new(session: NavigationSession) -> Self {
        Self {
            session,
            records: Vec::new(),
            started: Instant::now(),
        }
    }

    #[must_use]
    pub fn session(&self) -> &NavigationSession {
        &self.session
    }

    /// Apply one input and record the result.
    pub fn apply(&mut self, input: NavInput) -> &SimRecord {
        let outcome = match &input {
            NavInput::SelectTab(tab) => {
                self.session.select_tab(*tab);
                SimOutcome::Done
            }
            NavInput::OpenSubPage(sub_page) => {
                SimOutcome::Accepted(self.session.open_sub_page(sub_page.clone()))
            }
            NavInput::Step(step) => SimOutcome::Accepted(self.session.wizards().set_step(*step)),
            NavInput::Back => SimOutcome::Back(self.session.go_back()),
            NavInput::Reset => {
                self.session.reset();
                SimOutcome::Done
            }
        };
        tracing::trace!(target: "backstack.session", input = ?input, outcome = ?outcome, "sim");

        let history = self.session.history();
        let record = SimRecord {
            input,
            outcome,
            navigation: self.session.navigation(),
            history_len: history.len(),
            cursor: history.current_index(),
            at: self.started.elapsed(),
        };
        self.records.push(record);
        &self.records[self.records.len() - 1]
    }

    /// Apply every input in order.
    pub fn run(&mut self, inputs: impl IntoIterator<Item = NavInput>) {
        for input in inputs {
            self.apply(input);
        }
    }

    #[must_use]
    pub fn records(&self) -> &[SimRecord] {
        &self.records
    }

    #[must_use]
    pub fn last(&self) -> Option<&SimRecord> {
        self.records.last()
    }

    /// Actions of every back input that was resolved, in order.
    #[must_use]
    pub fn back_actions(&self) -> Vec<BackAction> {
        self.records.iter().filter_map(SimRecord::back_action).collect()
    }

    /// Forget the records, keeping the session as is.
    pub fn clear_records(&mut self) {
        self.records.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SessionConfig;
    use backstack_core::{EnrollmentStep, SignupStep};

    fn sim() -> NavSimulator {
        NavSimulator::new(NavigationSession::new(SessionConfig::default()))
    }

    #[test]
    fn records_one_entry_per_input() {
        let mut sim = sim();
        sim.run([
            NavInput::SelectTab(1),
            NavInput::OpenSubPage(SubPageId::SIGNUP),
            NavInput::Step(SignupStep::AccountInfo.into()),
        ]);
        assert_eq!(sim.records().len(), 3);
        let last = sim.last().expect("record");
        assert_eq!(last.outcome, SimOutcome::Accepted(true));
        assert_eq!(last.history_len, 4);
        assert_eq!(last.cursor, Some(3));
    }

    #[test]
    fn rejected_step_is_recorded_as_not_accepted() {
        let mut sim = sim();
        sim.apply(NavInput::OpenSubPage(SubPageId::ENROLL));
        let record = sim.apply(NavInput::Step(EnrollmentStep::Payment.into()));
        assert_eq!(record.outcome, SimOutcome::Accepted(false));
        assert_eq!(record.history_len, 1);
    }

    #[test]
    fn back_actions_skip_non_back_inputs() {
        let mut sim = sim();
        sim.run([
            NavInput::OpenSubPage(SubPageId::ENROLL),
            NavInput::Step(EnrollmentStep::ClassSelection.into()),
            NavInput::Back,
            NavInput::Back,
            NavInput::Back,
        ]);
        assert_eq!(
            sim.back_actions(),
            vec![BackAction::HistoryBack, BackAction::Close, BackAction::None]
        );
    }

    #[test]
    fn reset_input_clears_history() {
        let mut sim = sim();
        sim.run([NavInput::SelectTab(2), NavInput::Reset]);
        let last = sim.last().expect("record");
        assert_eq!(last.history_len, 0);
        assert_eq!(last.cursor, None);
        assert_eq!(last.outcome, SimOutcome::Done);
        sim.clear_records();
        assert!(sim.records().is_empty());
    }
}
