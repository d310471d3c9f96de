#![forbid(unsafe_code)]

//! The ordered strategies that make up the back-resolution chain.
//!
//! Each strategy inspects the snapshot in a [`ResolveContext`] and either
//! claims the request (returning `Some`) or passes (returning `None`).
//! Strategies that claim a request by moving through history perform that
//! cursor move themselves; they never touch wizard or navigation state.
//!
//! | Priority | Strategy             | Claims when                                        |
//! |----------|----------------------|----------------------------------------------------|
//! | 1        | [`FormStepRollback`] | the active wizard's previous step is behind        |
//! | 2        | [`FirstStepExit`]    | the open sub-page's wizard is at its first step    |
//! | 3        | [`SubPageHistory`]   | a sub-page entry is immediately behind             |
//! | 4        | [`CloseSubPage`]     | any sub-page is open                               |

use backstack_core::{EntryKind, EntryPayload, HistoryEntry, HistoryStore};

use super::{GoBackResult, ResolveError};
use crate::navigation::NavigationState;
use crate::wizard::FormsState;

/// Read-only snapshot plus the live history a strategy may move.
#[derive(Debug, Clone, Copy)]
pub struct ResolveContext<'a> {
    pub navigation: &'a NavigationState,
    pub forms: &'a FormsState,
    pub history: &'a HistoryStore,
}

/// One link of the back-resolution chain.
pub trait BackStrategy {
    /// Name used in logs.
    fn name(&self) -> &'static str;

    /// Claim the request with a result, or pass with `None`.
    fn resolve(&self, cx: &ResolveContext<'_>) -> Result<Option<GoBackResult>, ResolveError>;
}

/// The default chain, highest priority first.
#[must_use]
pub fn default_chain() -> Vec<Box<dyn BackStrategy>> {
    vec![
        Box::new(FormStepRollback),
        Box::new(FirstStepExit),
        Box::new(SubPageHistory),
        Box::new(CloseSubPage),
    ]
}

fn step_back(cx: &ResolveContext<'_>, strategy: &'static str) -> Result<(), ResolveError> {
    if cx.history.go_back() {
        Ok(())
    } else {
        Err(ResolveError::CursorUnchanged { strategy })
    }
}

fn expect_entry(history: &HistoryStore, index: usize) -> Result<HistoryEntry, ResolveError> {
    history.get(index).ok_or(ResolveError::MissingEntry { index })
}

/// Undo within a wizard before anything else.
///
/// Claims when history can go back and the entry right behind the cursor
/// records a form step, provided that step belongs to the wizard hosted by
/// the open sub-page (or no sub-page is open). The entry under the cursor
/// must record the step that wizard currently shows; steps left behind by
/// an abandoned or reset wizard are never replayed.
#[derive(Debug, Clone, Copy, Default)]
pub struct FormStepRollback;

impl BackStrategy for FormStepRollback {
    fn name(&self) -> &'static str {
        "form-step-rollback"
    }

    fn resolve(&self, cx: &ResolveContext<'_>) -> Result<Option<GoBackResult>, ResolveError> {
        if !cx.history.can_go_back() {
            return Ok(None);
        }
        let Some(step) = cx.history.previous_entry().and_then(|e| e.form_step()) else {
            return Ok(None);
        };
        let wizard = step.wizard();
        if cx.navigation.has_sub_page() && cx.navigation.active_wizard() != Some(wizard) {
            return Ok(None);
        }
        let head = cx.history.current_entry().and_then(|e| e.form_step());
        if head != Some(cx.forms.step_of(wizard)) {
            return Ok(None);
        }
        step_back(cx, self.name())?;
        Ok(Some(GoBackResult::history_back_to_step(step)))
    }
}

/// Leave a wizard that is already at its first step.
///
/// Navigates to the closest earlier sub-page entry for a different sub-page
/// when one exists (rewinding the cursor onto it); otherwise closes the
/// current sub-page.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstStepExit;

impl BackStrategy for FirstStepExit {
    fn name(&self) -> &'static str {
        "first-step-exit"
    }

    fn resolve(&self, cx: &ResolveContext<'_>) -> Result<Option<GoBackResult>, ResolveError> {
        let Some(current) = cx.navigation.sub_page.as_ref() else {
            return Ok(None);
        };
        let Some(wizard) = current.wizard() else {
            return Ok(None);
        };
        if !cx.forms.is_at_first_step(wizard) {
            return Ok(None);
        }

        let earlier = cx
            .history
            .rposition_before_cursor(|e| e.sub_page().is_some_and(|p| p != current));
        let Some(index) = earlier else {
            return Ok(Some(GoBackResult::close(cx.navigation.active_tab)));
        };

        let entry = expect_entry(cx.history, index)?;
        let EntryPayload::SubPage {
            sub_page,
            active_tab,
        } = entry.payload
        else {
            return Err(ResolveError::UnexpectedEntry {
                index,
                expected: EntryKind::SubPage,
                found: entry.kind(),
            });
        };
        if !cx.history.rewind_to(index) {
            return Err(ResolveError::CursorUnchanged {
                strategy: self.name(),
            });
        }
        Ok(Some(GoBackResult::navigate(sub_page, active_tab)))
    }
}

/// Step back onto the sub-page recorded right behind the cursor.
#[derive(Debug, Clone, Copy, Default)]
pub struct SubPageHistory;

impl BackStrategy for SubPageHistory {
    fn name(&self) -> &'static str {
        "sub-page-history"
    }

    fn resolve(&self, cx: &ResolveContext<'_>) -> Result<Option<GoBackResult>, ResolveError> {
        if !cx.history.can_go_back() {
            return Ok(None);
        }
        let Some(previous) = cx.history.previous_entry() else {
            return Ok(None);
        };
        let EntryPayload::SubPage {
            sub_page,
            active_tab,
        } = previous.payload
        else {
            return Ok(None);
        };
        step_back(cx, self.name())?;
        Ok(Some(GoBackResult::history_back_to_sub_page(
            sub_page, active_tab,
        )))
    }
}

/// Close whatever sub-page is open.
#[derive(Debug, Clone, Copy, Default)]
pub struct CloseSubPage;

impl BackStrategy for CloseSubPage {
    fn name(&self) -> &'static str {
        "close-sub-page"
    }

    fn resolve(&self, cx: &ResolveContext<'_>) -> Result<Option<GoBackResult>, ResolveError> {
        Ok(cx
            .navigation
            .has_sub_page()
            .then(|| GoBackResult::close(cx.navigation.active_tab)))
    }
}
