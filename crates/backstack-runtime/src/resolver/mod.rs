#![forbid(unsafe_code)]

//! Back-button resolution.
//!
//! [`BackResolver`] decides what "back" means for the current navigation and
//! wizard snapshot by running an ordered chain of [`BackStrategy`] objects
//! (see [`strategy`]). The first strategy that claims the request wins; if
//! none does, the resolver reports a failed result with the configured
//! fallback message.
//!
//! The resolver owns the history cursor moves that a decision implies. It
//! does not apply the decision to wizards or navigation; that is the
//! caller's job (see `NavigationSession`).

pub mod strategy;

use std::fmt;
use std::panic::{self, AssertUnwindSafe};

use backstack_core::{
    AnyStep, EntryKind, EntryPayload, HistoryEntry, HistoryStore, SubPageId, panic_message,
};

use crate::hub::StateHub;
use crate::navigation::NavigationState;
use crate::wizard::FormsState;

pub use strategy::{
    BackStrategy, CloseSubPage, FirstStepExit, FormStepRollback, ResolveContext, SubPageHistory,
    default_chain,
};

/// What the caller should do with a resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackAction {
    /// Show the sub-page (or tab) in the result data.
    Navigate,
    /// Close the open sub-page and return to the tab.
    Close,
    /// Move a wizard one step back without a history move. Only produced by
    /// application strategies.
    StepBack,
    /// History moved back; restore the state of the new current entry.
    HistoryBack,
    /// Nothing to do.
    None,
}

impl BackAction {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Navigate => "navigate",
            Self::Close => "close",
            Self::StepBack => "step-back",
            Self::HistoryBack => "history-back",
            Self::None => "none",
        }
    }
}

impl fmt::Display for BackAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Target of a resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackData {
    /// A wizard step to restore.
    Step(AnyStep),
    /// A navigation target; `sub_page: None` means "the bare tab".
    SubPage {
        sub_page: Option<SubPageId>,
        active_tab: usize,
    },
}

/// Outcome of a back request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoBackResult {
    pub success: bool,
    pub action: BackAction,
    pub data: Option<BackData>,
    pub message: Option<String>,
}

impl GoBackResult {
    /// History moved back onto a form step.
    #[must_use]
    pub fn history_back_to_step(step: AnyStep) -> Self {
        Self::succeeded(BackAction::HistoryBack, BackData::Step(step))
    }

    /// History moved back onto a sub-page entry.
    #[must_use]
    pub fn history_back_to_sub_page(sub_page: SubPageId, active_tab: usize) -> Self {
        Self::succeeded(
            BackAction::HistoryBack,
            BackData::SubPage {
                sub_page: Some(sub_page),
                active_tab,
            },
        )
    }

    /// Show an earlier sub-page.
    #[must_use]
    pub fn navigate(sub_page: SubPageId, active_tab: usize) -> Self {
        Self::succeeded(
            BackAction::Navigate,
            BackData::SubPage {
                sub_page: Some(sub_page),
                active_tab,
            },
        )
    }

    /// Close the open sub-page, staying on `active_tab`.
    #[must_use]
    pub fn close(active_tab: usize) -> Self {
        Self::succeeded(
            BackAction::Close,
            BackData::SubPage {
                sub_page: None,
                active_tab,
            },
        )
    }

    /// Move a wizard back one step in place.
    #[must_use]
    pub fn step_back(step: AnyStep) -> Self {
        Self::succeeded(BackAction::StepBack, BackData::Step(step))
    }

    /// Nothing could be done.
    #[must_use]
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            action: BackAction::None,
            data: None,
            message: Some(message.into()),
        }
    }

    fn succeeded(action: BackAction, data: BackData) -> Self {
        Self {
            success: true,
            action,
            data: Some(data),
            message: None,
        }
    }

    /// The step carried by the result, if any.
    #[must_use]
    pub fn step(&self) -> Option<AnyStep> {
        match self.data {
            Some(BackData::Step(step)) => Some(step),
            _ => None,
        }
    }
}

/// Error raised by a strategy while acting on history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// A strategy expected to move the cursor but the store refused.
    CursorUnchanged { strategy: &'static str },
    /// An index reported by the store no longer resolves to an entry.
    MissingEntry { index: usize },
    /// The entry at `index` is not of the kind the strategy matched on.
    UnexpectedEntry {
        index: usize,
        expected: EntryKind,
        found: EntryKind,
    },
}

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CursorUnchanged { strategy } => {
                write!(f, "{strategy}: history cursor did not move")
            }
            Self::MissingEntry { index } => write!(f, "no history entry at index {index}"),
            Self::UnexpectedEntry {
                index,
                expected,
                found,
            } => write!(
                f,
                "history entry {index} is {found:?}, expected {expected:?}"
            ),
        }
    }
}

impl std::error::Error for ResolveError {}

/// Resolver settings.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "session-config",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct ResolverConfig {
    /// Message of the failed result when no strategy applies.
    pub empty_message: String,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            empty_message: "nothing to go back to".to_string(),
        }
    }
}

/// Runs the strategy chain against a snapshot.
pub struct BackResolver {
    history: HistoryStore,
    hub: StateHub,
    strategies: Vec<Box<dyn BackStrategy>>,
    config: ResolverConfig,
}

impl fmt::Debug for BackResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackResolver")
            .field("strategies", &self.strategy_names())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl BackResolver {
    /// Resolver over `history` with the default chain.
    #[must_use]
    pub fn new(history: HistoryStore, hub: StateHub, config: ResolverConfig) -> Self {
        Self {
            history,
            hub,
            strategies: default_chain(),
            config,
        }
    }

    /// Append `strategy` after the existing chain.
    #[must_use]
    pub fn with_strategy(mut self, strategy: Box<dyn BackStrategy>) -> Self {
        self.strategies.push(strategy);
        self
    }

    #[must_use]
    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    #[must_use]
    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    #[must_use]
    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    // ========================================================================
    // Resolution
    // ========================================================================

    /// Resolve against the snapshots currently published in the hub.
    ///
    /// Without both snapshots only the minimal rule applies: close the
    /// sub-page if navigation says one is open, otherwise fail.
    pub fn execute_go_back(&self) -> GoBackResult {
        match (self.hub.navigation(), self.hub.forms()) {
            (Some(navigation), Some(forms)) => self.execute_go_back_with_state(&navigation, &forms),
            (navigation, _) => {
                tracing::warn!(
                    target: "backstack.resolver",
                    has_navigation = navigation.is_some(),
                    "resolving without full snapshot"
                );
                match navigation {
                    Some(nav) if nav.has_sub_page() => GoBackResult::close(nav.active_tab),
                    _ => GoBackResult::failed(self.config.empty_message.clone()),
                }
            }
        }
    }

    /// Resolve against an explicit snapshot.
    ///
    /// A strategy that returns an error or panics ends the chain with a
    /// failed result carrying the error text.
    pub fn execute_go_back_with_state(
        &self,
        navigation: &NavigationState,
        forms: &FormsState,
    ) -> GoBackResult {
        let span = tracing::debug_span!(
            target: "backstack.resolver",
            "resolve",
            tab = navigation.active_tab,
            sub_page = navigation.sub_page.as_ref().map(SubPageId::as_str),
            cursor = ?self.history.current_index(),
        );
        let _guard = span.enter();

        let cx = ResolveContext {
            navigation,
            forms,
            history: &self.history,
        };
        for strategy in &self.strategies {
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| strategy.resolve(&cx)));
            let outcome = match outcome {
                Ok(outcome) => outcome,
                Err(payload) => {
                    let reason = panic_message(payload.as_ref());
                    tracing::error!(
                        target: "backstack.resolver",
                        strategy = strategy.name(),
                        reason = %reason,
                        "strategy panicked"
                    );
                    return GoBackResult::failed(format!("{}: {reason}", strategy.name()));
                }
            };
            match outcome {
                Ok(Some(result)) => {
                    tracing::debug!(
                        target: "backstack.resolver",
                        strategy = strategy.name(),
                        action = result.action.as_str(),
                        "resolved"
                    );
                    return result;
                }
                Ok(None) => {}
                Err(err) => {
                    tracing::error!(
                        target: "backstack.resolver",
                        strategy = strategy.name(),
                        error = %err,
                        "strategy failed"
                    );
                    return GoBackResult::failed(err.to_string());
                }
            }
        }
        tracing::debug!(target: "backstack.resolver", "nothing to resolve");
        GoBackResult::failed(self.config.empty_message.clone())
    }

    // ========================================================================
    // History recording
    // ========================================================================

    pub fn push_sub_page(&self, sub_page: SubPageId, active_tab: usize) -> HistoryEntry {
        self.history.push(EntryPayload::SubPage {
            sub_page,
            active_tab,
        })
    }

    pub fn push_form_step(&self, step: AnyStep) -> HistoryEntry {
        self.history.push(EntryPayload::FormStep { step })
    }

    pub fn push_navigation(&self, active_tab: usize) -> HistoryEntry {
        self.history.push(EntryPayload::Navigation { active_tab })
    }

    /// Take `sub_page` off the back path.
    ///
    /// Rewinds the cursor to just before the latest entry recording
    /// `sub_page` (at or before the cursor), so its form steps are no longer
    /// reachable by going back. Returns whether the cursor moved.
    pub fn close_sub_page(&self, sub_page: &SubPageId) -> bool {
        let Some(index) = self.latest_entry_for(sub_page) else {
            return false;
        };
        let moved = self.history.rewind_to(index.saturating_sub(1));
        tracing::debug!(
            target: "backstack.resolver",
            sub_page = sub_page.as_str(),
            index,
            moved,
            "close sub-page"
        );
        moved
    }

    /// Drop the steps taken inside `sub_page` from the back path.
    ///
    /// Rewinds the cursor onto the latest entry recording `sub_page`, so the
    /// next push truncates its form steps while the sub-page itself stays
    /// reachable. Returns whether the cursor moved.
    pub fn abandon_sub_page(&self, sub_page: &SubPageId) -> bool {
        let Some(index) = self.latest_entry_for(sub_page) else {
            return false;
        };
        let moved = self.history.rewind_to(index);
        tracing::debug!(
            target: "backstack.resolver",
            sub_page = sub_page.as_str(),
            index,
            moved,
            "abandon sub-page"
        );
        moved
    }

    /// Index of the latest entry at or before the cursor recording `sub_page`.
    fn latest_entry_for(&self, sub_page: &SubPageId) -> Option<usize> {
        let cursor = self.history.current_index()?;
        let records = |e: &HistoryEntry| e.sub_page() == Some(sub_page);
        match self.history.get(cursor) {
            Some(entry) if records(&entry) => Some(cursor),
            _ => self.history.rposition_before_cursor(records),
        }
    }

    pub fn clear_history(&self) {
        self.history.clear();
    }
}
