#![forbid(unsafe_code)]

//! Property tests for back navigation through a [`NavigationSession`].
//!
//! Validates, for random sequences of tab switches, sub-page opens, wizard
//! moves and back presses:
//! - The cursor always satisfies `-1 <= cursor < len` (as `Option<usize>`).
//! - A back press never grows history.
//! - A back press leaves the session settled and the hub in sync.
//! - A wizard whose host sub-page is not showing stays at its first step
//!   across back presses.

use proptest::prelude::*;

use backstack_core::{EnrollmentStep, SignupStep, SubPageId, WizardId, WizardStep};
use backstack_runtime::{HistorySection, NavigationSession, SessionConfig};

// ============================================================================
// Strategy helpers
// ============================================================================

#[derive(Debug, Clone)]
enum Op {
    Tab(usize),
    Open(SubPageId),
    Enroll(EnrollmentStep),
    Signup(SignupStep),
    Back,
}

fn sub_page_strategy() -> impl Strategy<Value = SubPageId> {
    prop_oneof![
        Just(SubPageId::ENROLL),
        Just(SubPageId::SIGNUP),
        Just(SubPageId::new("profile")),
        Just(SubPageId::new("class-detail")),
    ]
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        1 => (0usize..4).prop_map(Op::Tab),
        2 => sub_page_strategy().prop_map(Op::Open),
        3 => prop::sample::select(EnrollmentStep::SEQUENCE).prop_map(Op::Enroll),
        2 => prop::sample::select(SignupStep::SEQUENCE).prop_map(Op::Signup),
        5 => Just(Op::Back),
    ]
}

fn ops_strategy(max_len: usize) -> impl Strategy<Value = Vec<Op>> {
    prop::collection::vec(op_strategy(), 1..=max_len)
}

fn session(max_size: usize) -> NavigationSession {
    NavigationSession::new(SessionConfig {
        history: HistorySection { max_size },
        ..SessionConfig::default()
    })
}

fn apply(session: &NavigationSession, op: &Op) {
    match op {
        Op::Tab(tab) => session.select_tab(*tab),
        Op::Open(sub_page) => {
            session.open_sub_page(sub_page.clone());
        }
        Op::Enroll(step) => {
            session.wizards().enrollment.set_current_step(*step);
        }
        Op::Signup(step) => {
            session.wizards().signup.set_current_step(*step);
        }
        Op::Back => {
            session.handle_back();
        }
    }
}

fn cursor_in_bounds(session: &NavigationSession) -> bool {
    let history = session.history();
    match history.current_index() {
        None => history.is_empty(),
        Some(i) => i < history.len(),
    }
}

// ============================================================================
// Invariant 1: cursor bounds and no growth on back
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn back_keeps_cursor_in_bounds_and_never_grows_history(
        max_size in 1usize..10,
        ops in ops_strategy(60)
    ) {
        let s = session(max_size);
        for op in &ops {
            let before = s.history().len();
            apply(&s, op);
            prop_assert!(cursor_in_bounds(&s));
            prop_assert!(s.history().len() <= max_size);
            if matches!(op, Op::Back) {
                prop_assert!(s.history().len() <= before);
            }
        }
    }
}

// ============================================================================
// Invariant 2: every back press settles
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn back_leaves_session_settled_and_published(ops in ops_strategy(50)) {
        let s = session(200);
        for op in &ops {
            apply(&s, op);
            if matches!(op, Op::Back) {
                let nav = s.navigation();
                prop_assert!(!nav.is_transitioning);
                prop_assert!(!s.is_handling_back());
                prop_assert_eq!(s.hub().navigation(), Some(nav));
                prop_assert_eq!(s.hub().forms(), Some(s.forms()));
            }
        }
    }
}

// ============================================================================
// Invariant 3: back never moves a wizard that is not showing
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn hidden_wizards_stay_at_first_step_on_back(ops in ops_strategy(50)) {
        let s = session(200);
        for op in &ops {
            let showing = s.navigation().active_wizard();
            let hidden_at_first: Vec<WizardId> = [WizardId::Enrollment, WizardId::Signup]
                .into_iter()
                .filter(|w| showing != Some(*w) && s.forms().is_at_first_step(*w))
                .collect();
            apply(&s, op);
            if matches!(op, Op::Back) {
                let now_showing = s.navigation().active_wizard();
                for wizard in hidden_at_first {
                    if now_showing != Some(wizard) {
                        prop_assert!(s.forms().is_at_first_step(wizard));
                    }
                }
            }
        }
    }
}
