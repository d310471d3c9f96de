#![forbid(unsafe_code)]

//! Composition root: one navigation session per client.
//!
//! [`NavigationSession`] owns the event bus, history store, state hub,
//! wizard machines, navigation state and back resolver, and wires them
//! together:
//!
//! ```text
//!   StepMachine ──FormStateChanged──▶ session ──push FORM_STEP──▶ HistoryStore
//!                                        │                            │
//!                                        ▼                            ▼
//!                                    StateHub ◀──── can_go_back ──────┘
//!
//!   handle_back() ─▶ BackResolver ─▶ GoBackResult ─▶ apply (recording off)
//! ```
//!
//! # Invariants
//!
//! 1. Form-step recording is suppressed while a back action is applied, so
//!    undoing a step never records the undo.
//! 2. `handle_back` is not re-entrant: a request that arrives while one is
//!    being handled (for example from a listener reacting to the first)
//!    returns `false` without touching any state.
//! 3. No internal borrow is held while the bus, the hub, or the history
//!    store notifies.
//! 4. The hub's `navigation` and `forms` slots always hold the session's
//!    current state once a call returns.
//! 5. A wizard past its first step with no sub-page open gets the sub-page
//!    that hosts it shown, so leaving the wizard always has something to
//!    close and back never moves a wizard nobody can see.
//! 6. A resolution that cannot be applied leaves the cursor where it was
//!    and is reported as a failure.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use backstack_core::{
    AnyStep, EventBus, EventKind, HistoryEntry, HistoryStore, NavEvent, SubPageId, Subscription,
};

use crate::config::SessionConfig;
use crate::hub::{HubValue, StateHub};
use crate::navigation::NavigationState;
use crate::resolver::{BackAction, BackData, BackResolver, GoBackResult};
use crate::wizard::{FormsState, Wizards};

type AccessPredicate = Box<dyn Fn(&SubPageId) -> bool>;

struct SessionInner {
    config: SessionConfig,
    bus: EventBus,
    history: HistoryStore,
    hub: StateHub,
    wizards: Wizards,
    resolver: BackResolver,
    navigation: RefCell<NavigationState>,
    can_access: AccessPredicate,
    recording_suppressed: Cell<bool>,
    handling_back: Cell<bool>,
    subscriptions: RefCell<Vec<Subscription>>,
}

/// Shared handle to a navigation session.
#[derive(Clone)]
pub struct NavigationSession {
    inner: Rc<SessionInner>,
}

impl fmt::Debug for NavigationSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NavigationSession")
            .field("navigation", &*self.inner.navigation.borrow())
            .field("history", &self.inner.history)
            .field("handling_back", &self.inner.handling_back.get())
            .finish_non_exhaustive()
    }
}

/// Clears a `Cell<bool>` flag when dropped.
struct FlagGuard<'a>(&'a Cell<bool>);

impl Drop for FlagGuard<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

impl NavigationSession {
    /// Session in which every sub-page is accessible.
    #[must_use]
    pub fn new(config: SessionConfig) -> Self {
        Self::with_access(config, |_| true)
    }

    /// Session that consults `can_access` before opening a sub-page.
    #[must_use]
    pub fn with_access(
        config: SessionConfig,
        can_access: impl Fn(&SubPageId) -> bool + 'static,
    ) -> Self {
        Self::with_resolver(config, can_access, |resolver| resolver)
    }

    /// Session whose resolver is passed through `configure` before use,
    /// typically to append application
    /// [`BackStrategy`](crate::resolver::BackStrategy) objects.
    #[must_use]
    pub fn with_resolver(
        config: SessionConfig,
        can_access: impl Fn(&SubPageId) -> bool + 'static,
        configure: impl FnOnce(BackResolver) -> BackResolver,
    ) -> Self {
        let bus = EventBus::new();
        let history = HistoryStore::new(config.to_history_config());
        let hub = StateHub::new();
        let wizards = Wizards::new(&bus);
        let resolver = configure(BackResolver::new(
            history.clone(),
            hub.clone(),
            config.resolver.clone(),
        ));
        let navigation = NavigationState::on_tab(config.initial_tab);

        let session = Self {
            inner: Rc::new(SessionInner {
                config,
                bus,
                history,
                hub,
                wizards,
                resolver,
                navigation: RefCell::new(navigation),
                can_access: Box::new(can_access),
                recording_suppressed: Cell::new(false),
                handling_back: Cell::new(false),
                subscriptions: RefCell::new(Vec::new()),
            }),
        };
        session.wire();
        session.publish_all();
        session
    }

    fn wire(&self) {
        let weak = Rc::downgrade(&self.inner);
        let on_form = self
            .inner
            .bus
            .subscribe(EventKind::FormStateChanged, move |event| {
                if let NavEvent::FormStateChanged { step, previous, .. } = event
                    && let Some(session) = Self::upgrade(&weak)
                {
                    session.record_form_step(*step, *previous);
                }
            });

        let weak = Rc::downgrade(&self.inner);
        let on_history = self.inner.history.subscribe(move |state| {
            if let Some(session) = Self::upgrade(&weak) {
                session.refresh_can_go_back(state.can_go_back());
            }
        });

        self.inner
            .subscriptions
            .borrow_mut()
            .extend([on_form, on_history]);
    }

    fn upgrade(weak: &Weak<SessionInner>) -> Option<Self> {
        weak.upgrade().map(|inner| Self { inner })
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn bus(&self) -> &EventBus {
        &self.inner.bus
    }

    #[must_use]
    pub fn history(&self) -> &HistoryStore {
        &self.inner.history
    }

    #[must_use]
    pub fn hub(&self) -> &StateHub {
        &self.inner.hub
    }

    #[must_use]
    pub fn wizards(&self) -> &Wizards {
        &self.inner.wizards
    }

    #[must_use]
    pub fn resolver(&self) -> &BackResolver {
        &self.inner.resolver
    }

    /// Current navigation state.
    #[must_use]
    pub fn navigation(&self) -> NavigationState {
        self.inner.navigation.borrow().clone()
    }

    /// Snapshot of every wizard.
    #[must_use]
    pub fn forms(&self) -> FormsState {
        self.inner.wizards.snapshot()
    }

    #[must_use]
    pub fn is_handling_back(&self) -> bool {
        self.inner.handling_back.get()
    }

    // ========================================================================
    // Navigation
    // ========================================================================

    /// Switch to `tab`, abandoning any open sub-page.
    ///
    /// The abandoned sub-page stays on the back path but the steps taken
    /// inside it do not, and its wizard starts over.
    pub fn select_tab(&self, tab: usize) {
        let abandoned = {
            let mut nav = self.inner.navigation.borrow_mut();
            nav.active_tab = tab;
            nav.sub_page.take()
        };
        if let Some(abandoned) = abandoned.as_ref() {
            self.inner.resolver.abandon_sub_page(abandoned);
            if let Some(wizard) = abandoned.wizard() {
                self.without_recording(|| self.inner.wizards.reset(wizard));
            }
        }
        tracing::debug!(
            target: "backstack.session",
            tab,
            abandoned = abandoned.as_ref().map(SubPageId::as_str),
            "select tab"
        );
        self.inner.resolver.push_navigation(tab);
        self.inner.bus.emit(NavEvent::NavigationChanged {
            sub_page: None,
            active_tab: tab,
        });
        self.publish_all();
    }

    /// Open `sub_page` over the active tab. Returns `false` when access is
    /// denied.
    pub fn open_sub_page(&self, sub_page: impl Into<SubPageId>) -> bool {
        let sub_page = sub_page.into();
        if !(self.inner.can_access)(&sub_page) {
            tracing::warn!(
                target: "backstack.session",
                sub_page = sub_page.as_str(),
                "access denied"
            );
            return false;
        }
        let tab = {
            let mut nav = self.inner.navigation.borrow_mut();
            nav.sub_page = Some(sub_page.clone());
            nav.active_tab
        };
        tracing::debug!(
            target: "backstack.session",
            sub_page = sub_page.as_str(),
            tab,
            "open sub-page"
        );
        self.inner.resolver.push_sub_page(sub_page.clone(), tab);
        self.inner.bus.emit(NavEvent::NavigationChanged {
            sub_page: Some(sub_page),
            active_tab: tab,
        });
        self.publish_navigation();
        true
    }

    /// Back-button entry point. Returns whether anything happened.
    pub fn handle_back(&self) -> bool {
        self.go_back().is_some_and(|result| result.success)
    }

    /// Resolve and apply one back request.
    ///
    /// Returns `None` when a request is already being handled.
    pub fn go_back(&self) -> Option<GoBackResult> {
        if self.inner.handling_back.replace(true) {
            tracing::debug!(target: "backstack.session", "back ignored: already handling");
            return None;
        }
        let _handling = FlagGuard(&self.inner.handling_back);

        self.inner.navigation.borrow_mut().is_transitioning = true;
        let cursor = self.inner.history.current_index();
        let mut result = self.inner.resolver.execute_go_back();
        let applied = result.success && self.apply(&result);
        if result.success && !applied {
            tracing::warn!(
                target: "backstack.session",
                action = result.action.as_str(),
                "resolved action could not be applied"
            );
            if let Some(index) = cursor {
                self.inner.history.restore_cursor(index);
            }
            result = GoBackResult::failed(format!("{} could not be applied", result.action));
        }

        let settled = {
            let mut nav = self.inner.navigation.borrow_mut();
            nav.is_transitioning = false;
            nav.clone()
        };
        if applied {
            self.publish_all();
        } else if self.inner.hub.navigation().as_ref() != Some(&settled) {
            self.publish_navigation();
        }
        Some(result)
    }

    /// Clear history, reset every wizard, and return to the initial tab.
    pub fn reset(&self) {
        self.without_recording(|| self.inner.wizards.reset_all());
        self.inner.resolver.clear_history();
        *self.inner.navigation.borrow_mut() = NavigationState::on_tab(self.inner.config.initial_tab);
        tracing::debug!(target: "backstack.session", "reset");
        self.publish_all();
    }

    // ========================================================================
    // Applying resolutions
    // ========================================================================

    // Only called from `go_back`, which publishes once afterwards.

    fn apply(&self, result: &GoBackResult) -> bool {
        match (result.action, &result.data) {
            (BackAction::HistoryBack | BackAction::StepBack, Some(BackData::Step(step))) => {
                let moved = self.without_recording(|| self.inner.wizards.set_step(*step));
                if moved && let Some((host, tab)) = self.reveal_host_sub_page(*step) {
                    self.inner.bus.emit(NavEvent::NavigationChanged {
                        sub_page: Some(host),
                        active_tab: tab,
                    });
                }
                moved
            }
            (
                BackAction::HistoryBack | BackAction::Navigate,
                Some(BackData::SubPage {
                    sub_page: Some(sub_page),
                    active_tab,
                }),
            ) => {
                self.show_sub_page(sub_page.clone(), *active_tab);
                true
            }
            (
                BackAction::Close,
                Some(BackData::SubPage {
                    sub_page: None,
                    active_tab,
                }),
            ) => {
                self.close_sub_page(*active_tab);
                true
            }
            _ => false,
        }
    }

    fn show_sub_page(&self, sub_page: SubPageId, tab: usize) {
        let departed = {
            let mut nav = self.inner.navigation.borrow_mut();
            nav.active_tab = tab;
            nav.sub_page.replace(sub_page.clone())
        };
        if let Some(departed) = departed.filter(|d| *d != sub_page)
            && let Some(wizard) = departed.wizard()
        {
            self.without_recording(|| self.inner.wizards.reset(wizard));
        }
        self.inner.bus.emit(NavEvent::NavigationChanged {
            sub_page: Some(sub_page),
            active_tab: tab,
        });
    }

    fn close_sub_page(&self, tab: usize) {
        let closed = {
            let mut nav = self.inner.navigation.borrow_mut();
            nav.active_tab = tab;
            nav.sub_page.take()
        };
        if let Some(closed) = closed.as_ref() {
            self.inner.resolver.close_sub_page(closed);
            if let Some(wizard) = closed.wizard() {
                self.without_recording(|| self.inner.wizards.reset(wizard));
            }
        }
        self.inner
            .bus
            .emit(NavEvent::SubPageClosed { active_tab: tab });
        self.inner.bus.emit(NavEvent::NavigationChanged {
            sub_page: None,
            active_tab: tab,
        });
    }

    // ========================================================================
    // Recording
    // ========================================================================

    fn record_form_step(&self, step: AnyStep, previous: AnyStep) {
        if self.inner.recording_suppressed.get() {
            return;
        }
        if step == previous {
            self.publish_forms();
            return;
        }
        let opened_host = match self.reveal_host_sub_page(step) {
            Some((host, tab)) => {
                self.inner.resolver.push_sub_page(host.clone(), tab);
                self.inner.bus.emit(NavEvent::NavigationChanged {
                    sub_page: Some(host),
                    active_tab: tab,
                });
                true
            }
            None => false,
        };
        let head = self
            .inner
            .history
            .current_entry()
            .as_ref()
            .and_then(HistoryEntry::form_step);
        if head == Some(step) {
            self.publish_forms();
            return;
        }
        if head.map(AnyStep::wizard) != Some(step.wizard()) {
            self.inner.resolver.push_form_step(previous);
        }
        self.inner.resolver.push_form_step(step);
        tracing::debug!(
            target: "backstack.session",
            step = %step,
            previous = %previous,
            "recorded form step"
        );
        if opened_host {
            self.publish_all();
        } else {
            self.publish_forms();
        }
    }

    /// Show the sub-page hosting `step`'s wizard when the wizard sits past
    /// its first step while no sub-page is open. Returns the host and tab.
    fn reveal_host_sub_page(&self, step: AnyStep) -> Option<(SubPageId, usize)> {
        if step.is_first() || self.inner.navigation.borrow().has_sub_page() {
            return None;
        }
        let host = SubPageId::for_wizard(step.wizard());
        if !(self.inner.can_access)(&host) {
            return None;
        }
        let tab = {
            let mut nav = self.inner.navigation.borrow_mut();
            nav.sub_page = Some(host.clone());
            nav.active_tab
        };
        tracing::debug!(
            target: "backstack.session",
            sub_page = host.as_str(),
            tab,
            "show host sub-page"
        );
        Some((host, tab))
    }

    fn without_recording<R>(&self, f: impl FnOnce() -> R) -> R {
        let was = self.inner.recording_suppressed.replace(true);
        let out = f();
        self.inner.recording_suppressed.set(was);
        out
    }

    fn refresh_can_go_back(&self, can_go_back: bool) {
        let changed = {
            let mut nav = self.inner.navigation.borrow_mut();
            let changed = nav.can_go_back != can_go_back;
            nav.can_go_back = can_go_back;
            changed
        };
        if changed {
            self.publish_navigation();
        }
    }

    // ========================================================================
    // Publishing
    // ========================================================================

    fn publish_navigation(&self) {
        let nav = self.navigation();
        self.inner.hub.publish(nav);
    }

    fn publish_forms(&self) {
        self.inner.hub.publish(self.forms());
    }

    fn publish_all(&self) {
        let nav = self.navigation();
        self.inner
            .hub
            .sync_states([HubValue::from(nav), HubValue::from(self.forms())]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hub::HubKey;
    use crate::resolver::{BackStrategy, ResolveContext, ResolveError};
    use backstack_core::{EnrollmentStep, EntryKind, SignupStep, WizardId};

    /// Moves the cursor back and asks for a step the wizard cannot reach.
    struct Overshoot;

    impl BackStrategy for Overshoot {
        fn name(&self) -> &'static str {
            "overshoot"
        }

        fn resolve(&self, cx: &ResolveContext<'_>) -> Result<Option<GoBackResult>, ResolveError> {
            if !cx.history.go_back() {
                return Ok(None);
            }
            Ok(Some(GoBackResult::step_back(
                EnrollmentStep::DateSelection.into(),
            )))
        }
    }

    struct Exploding;

    impl BackStrategy for Exploding {
        fn name(&self) -> &'static str {
            "exploding"
        }

        fn resolve(&self, _cx: &ResolveContext<'_>) -> Result<Option<GoBackResult>, ResolveError> {
            panic!("lookup table missing")
        }
    }

    fn session_with(strategy: Box<dyn BackStrategy>) -> NavigationSession {
        NavigationSession::with_resolver(SessionConfig::default(), |_| true, |resolver| {
            resolver.with_strategy(strategy)
        })
    }

    fn session() -> NavigationSession {
        NavigationSession::new(SessionConfig::default())
    }

    fn kinds(session: &NavigationSession) -> Vec<EntryKind> {
        session
            .history()
            .state()
            .entries
            .iter()
            .map(HistoryEntry::kind)
            .collect()
    }

    #[test]
    fn fresh_session_publishes_snapshots() {
        let s = session();
        assert_eq!(s.hub().navigation(), Some(NavigationState::on_tab(0)));
        assert_eq!(s.hub().forms(), Some(FormsState::default()));
        assert!(s.history().is_empty());
    }

    #[test]
    fn first_step_move_anchors_previous_step() {
        let s = session();
        assert!(s.open_sub_page(SubPageId::ENROLL));
        assert!(
            s.wizards()
                .enrollment
                .set_current_step(EnrollmentStep::ClassSelection)
        );
        assert_eq!(
            kinds(&s),
            vec![EntryKind::SubPage, EntryKind::FormStep, EntryKind::FormStep]
        );
        assert_eq!(
            s.history().previous_entry().and_then(|e| e.form_step()),
            Some(EnrollmentStep::AcademySelection.into())
        );
    }

    #[test]
    fn further_moves_record_one_entry_each() {
        let s = session();
        s.open_sub_page(SubPageId::ENROLL);
        s.wizards().enrollment.set_current_step(EnrollmentStep::ClassSelection);
        s.wizards().enrollment.set_current_step(EnrollmentStep::DateSelection);
        assert_eq!(s.history().len(), 4);
    }

    #[test]
    fn data_edits_do_not_record() {
        let s = session();
        s.open_sub_page(SubPageId::ENROLL);
        s.wizards().enrollment.update_data(|d| d.amount = 30_000);
        s.wizards().enrollment.set_current_step(EnrollmentStep::AcademySelection);
        assert_eq!(kinds(&s), vec![EntryKind::SubPage]);
        assert_eq!(s.hub().forms().map(|f| f.enrollment.data.amount), Some(30_000));
    }

    #[test]
    fn can_go_back_tracks_history() {
        let s = session();
        s.open_sub_page("profile");
        assert!(!s.navigation().can_go_back);
        s.open_sub_page("notifications");
        assert!(s.navigation().can_go_back);
        assert_eq!(s.hub().navigation().map(|n| n.can_go_back), Some(true));
    }

    #[test]
    fn back_rolls_back_step_then_closes() {
        let s = session();
        s.open_sub_page(SubPageId::ENROLL);
        s.wizards().enrollment.set_current_step(EnrollmentStep::ClassSelection);

        let first = s.go_back().expect("not re-entrant");
        assert_eq!(first.action, BackAction::HistoryBack);
        assert_eq!(
            s.wizards().enrollment.current_step(),
            EnrollmentStep::AcademySelection
        );
        assert_eq!(s.history().len(), 3);

        let second = s.go_back().expect("not re-entrant");
        assert_eq!(second.action, BackAction::Close);
        assert!(!s.navigation().has_sub_page());
        assert!(!s.navigation().is_transitioning);
    }

    #[test]
    fn select_tab_abandons_sub_page_and_resets_wizard() {
        let s = session();
        s.open_sub_page(SubPageId::SIGNUP);
        s.wizards().signup.set_current_step(SignupStep::AccountInfo);
        s.select_tab(2);

        let nav = s.navigation();
        assert_eq!(nav.active_tab, 2);
        assert!(nav.sub_page.is_none());
        assert!(s.forms().is_at_first_step(WizardId::Signup));
        assert_eq!(s.history().current_entry().map(|e| e.kind()), Some(EntryKind::Navigation));
    }

    #[test]
    fn select_tab_drops_abandoned_steps_from_history() {
        let s = session();
        s.open_sub_page(SubPageId::ENROLL);
        s.wizards().enrollment.set_current_step(EnrollmentStep::ClassSelection);
        s.wizards().enrollment.set_current_step(EnrollmentStep::DateSelection);
        s.select_tab(1);

        assert_eq!(kinds(&s), vec![EntryKind::SubPage, EntryKind::Navigation]);
        assert_eq!(s.history().current_index(), Some(1));
    }

    #[test]
    fn wizard_move_without_sub_page_opens_its_host() {
        let s = session();
        let opened = Rc::new(RefCell::new(Vec::new()));
        let o = Rc::clone(&opened);
        let _sub = s.bus().subscribe(EventKind::NavigationChanged, move |event| {
            if let NavEvent::NavigationChanged { sub_page, .. } = event {
                o.borrow_mut().push(sub_page.clone());
            }
        });

        assert!(
            s.wizards()
                .enrollment
                .set_current_step(EnrollmentStep::ClassSelection)
        );
        assert_eq!(s.navigation().sub_page, Some(SubPageId::ENROLL));
        assert_eq!(s.hub().navigation(), Some(s.navigation()));
        assert_eq!(*opened.borrow(), vec![Some(SubPageId::ENROLL)]);
        assert_eq!(
            kinds(&s),
            vec![EntryKind::SubPage, EntryKind::FormStep, EntryKind::FormStep]
        );
    }

    #[test]
    fn wizard_reset_without_sub_page_opens_nothing() {
        let s = session();
        s.wizards().signup.reset();
        assert!(!s.navigation().has_sub_page());
    }

    #[test]
    fn denied_host_is_not_opened_implicitly() {
        let s = NavigationSession::with_access(SessionConfig::default(), |p| {
            p != &SubPageId::ENROLL
        });
        s.wizards().enrollment.set_current_step(EnrollmentStep::ClassSelection);
        assert!(!s.navigation().has_sub_page());
        assert_eq!(kinds(&s), vec![EntryKind::FormStep, EntryKind::FormStep]);
    }

    #[test]
    fn step_change_alone_rolls_back_then_closes() {
        let s = session();
        s.wizards().enrollment.set_current_step(EnrollmentStep::ClassSelection);

        let first = s.go_back().expect("not re-entrant");
        assert_eq!(first.action, BackAction::HistoryBack);
        assert_eq!(first.step(), Some(EnrollmentStep::AcademySelection.into()));

        let second = s.go_back().expect("not re-entrant");
        assert_eq!(second.action, BackAction::Close);
        assert_eq!(
            second.data,
            Some(BackData::SubPage {
                sub_page: None,
                active_tab: 0
            })
        );
        assert!(!s.handle_back());
    }

    #[test]
    fn unappliable_resolution_fails_and_keeps_cursor() {
        let s = session_with(Box::new(Overshoot));
        s.select_tab(0);
        s.select_tab(1);

        let result = s.go_back().expect("not re-entrant");
        assert!(!result.success);
        assert_eq!(result.action, BackAction::None);
        assert_eq!(
            result.message.as_deref(),
            Some("step-back could not be applied")
        );
        assert_eq!(s.history().current_index(), Some(1));
        assert_eq!(
            s.wizards().enrollment.current_step(),
            EnrollmentStep::AcademySelection
        );
        assert_eq!(s.hub().navigation(), Some(s.navigation()));
    }

    #[test]
    fn panicking_strategy_leaves_session_settled() {
        let s = session_with(Box::new(Exploding));
        assert!(!s.handle_back());

        let nav = s.navigation();
        assert!(!nav.is_transitioning);
        assert_eq!(s.hub().navigation(), Some(nav));
        assert!(!s.is_handling_back());
    }

    #[test]
    fn back_publishes_navigation_once() {
        let s = session();
        s.open_sub_page(SubPageId::ENROLL);
        s.wizards().enrollment.set_current_step(EnrollmentStep::ClassSelection);
        s.wizards().enrollment.set_current_step(EnrollmentStep::DateSelection);

        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let _sub = s.hub().subscribe(HubKey::Navigation, move |value| {
            if let HubValue::Navigation(nav) = value {
                sink.borrow_mut().push(nav.is_transitioning);
            }
        });

        assert!(s.handle_back());
        assert_eq!(*seen.borrow(), vec![false]);

        seen.borrow_mut().clear();
        let idle = session();
        let _idle_sub = idle.hub().subscribe(HubKey::Navigation, {
            let sink = Rc::clone(&seen);
            move |_| sink.borrow_mut().push(true)
        });
        assert!(!idle.handle_back());
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn denied_sub_page_changes_nothing() {
        let s = NavigationSession::with_access(SessionConfig::default(), |p| {
            p != &SubPageId::MANAGE_MEMBERS
        });
        assert!(!s.open_sub_page(SubPageId::MANAGE_MEMBERS));
        assert!(s.history().is_empty());
        assert!(!s.navigation().has_sub_page());
    }

    #[test]
    fn back_with_nothing_to_do_fails() {
        let s = session();
        let result = s.go_back().expect("not re-entrant");
        assert!(!result.success);
        assert!(!s.handle_back());
    }

    #[test]
    fn reset_returns_to_initial_tab() {
        let s = NavigationSession::new(SessionConfig {
            initial_tab: 1,
            ..SessionConfig::default()
        });
        s.select_tab(3);
        s.open_sub_page(SubPageId::ENROLL);
        s.wizards().enrollment.set_current_step(EnrollmentStep::ClassSelection);
        s.reset();

        assert_eq!(s.navigation(), NavigationState::on_tab(1));
        assert!(s.history().is_empty());
        assert_eq!(s.forms(), FormsState::default());
        assert_eq!(s.hub().navigation(), Some(NavigationState::on_tab(1)));
    }

    #[test]
    fn dropping_session_releases_internal_subscriptions() {
        let s = session();
        let bus = s.bus().clone();
        assert_eq!(bus.listener_count(EventKind::FormStateChanged), 1);
        drop(s);
        assert_eq!(bus.listener_count(EventKind::FormStateChanged), 0);
    }
}
