#![forbid(unsafe_code)]

//! Branchable, size-bounded navigation history.
//!
//! [`HistoryStore`] keeps an ordered sequence of immutable
//! [`HistoryEntry`] values and a single cursor. It knows nothing about what
//! a tab or a wizard is; it only records entries and moves the cursor.
//!
//! # Invariants
//!
//! 1. `entries.is_empty()` if and only if `current_index` is `None`.
//! 2. `current_index < entries.len()` whenever it is `Some`.
//! 3. `entries.len() <= max_size` after every operation.
//! 4. A push while the cursor is not at the tail discards every entry after
//!    the cursor (branch truncation) before appending.
//!
//! ```text
//! [A, B, C]  cursor=C
//! go_back()              -> [A, B, C]  cursor=B
//! push(D)                -> [A, B, D]  cursor=D   (C discarded)
//! ```
//!
//! Every operation is total: "could not proceed" is reported with `false`
//! or `None`, never with an error.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;

use web_time::SystemTime;

use crate::listener::{ListenerSet, Subscription};
use crate::step::{AnyStep, WizardId};
use crate::sub_page::SubPageId;

/// Configuration for a [`HistoryStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryConfig {
    /// Maximum number of retained entries. Values below 1 are treated as 1.
    pub max_size: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self { max_size: 50 }
    }
}

impl HistoryConfig {
    #[must_use]
    pub fn new(max_size: usize) -> Self {
        Self { max_size }
    }
}

/// Opaque identifier of a history entry, unique within its store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryId(u64);

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "nav-{}", self.0)
    }
}

/// What kind of navigation an entry records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    Navigation,
    SubPage,
    FormStep,
}

/// Kind-specific entry data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryPayload {
    /// A top-level tab became active.
    Navigation { active_tab: usize },
    /// A sub-page was opened from `active_tab`.
    SubPage {
        sub_page: SubPageId,
        active_tab: usize,
    },
    /// A wizard reached `step`.
    FormStep { step: AnyStep },
}

impl EntryPayload {
    #[must_use]
    pub fn kind(&self) -> EntryKind {
        match self {
            Self::Navigation { .. } => EntryKind::Navigation,
            Self::SubPage { .. } => EntryKind::SubPage,
            Self::FormStep { .. } => EntryKind::FormStep,
        }
    }
}

/// One recorded navigation event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub id: EntryId,
    pub timestamp: SystemTime,
    pub payload: EntryPayload,
}

impl HistoryEntry {
    #[must_use]
    pub fn kind(&self) -> EntryKind {
        self.payload.kind()
    }

    /// The recorded step, for form-step entries.
    #[must_use]
    pub fn form_step(&self) -> Option<AnyStep> {
        match self.payload {
            EntryPayload::FormStep { step } => Some(step),
            _ => None,
        }
    }

    /// The wizard of a form-step entry.
    #[must_use]
    pub fn wizard(&self) -> Option<WizardId> {
        self.form_step().map(AnyStep::wizard)
    }

    /// The recorded sub-page, for sub-page entries.
    #[must_use]
    pub fn sub_page(&self) -> Option<&SubPageId> {
        match &self.payload {
            EntryPayload::SubPage { sub_page, .. } => Some(sub_page),
            _ => None,
        }
    }
}

/// Snapshot of a store's contents, handed to subscribers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryState {
    pub entries: Vec<HistoryEntry>,
    pub current_index: Option<usize>,
    pub max_size: usize,
}

impl HistoryState {
    #[must_use]
    pub fn can_go_back(&self) -> bool {
        self.current_index.is_some_and(|i| i > 0)
    }

    #[must_use]
    pub fn can_go_forward(&self) -> bool {
        self.current_index
            .is_some_and(|i| i + 1 < self.entries.len())
    }

    #[must_use]
    pub fn current_entry(&self) -> Option<&HistoryEntry> {
        self.current_index.and_then(|i| self.entries.get(i))
    }
}

struct Entries {
    entries: VecDeque<HistoryEntry>,
    current: Option<usize>,
}

struct HistoryInner {
    data: RefCell<Entries>,
    max_size: usize,
    next_id: Cell<u64>,
    listeners: ListenerSet<HistoryState>,
}

/// Shared handle to a navigation history.
///
/// Cloning yields another handle to the same history.
#[derive(Clone)]
pub struct HistoryStore {
    inner: Rc<HistoryInner>,
}

impl fmt::Debug for HistoryStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let data = self.inner.data.borrow();
        f.debug_struct("HistoryStore")
            .field("len", &data.entries.len())
            .field("current_index", &data.current)
            .field("max_size", &self.inner.max_size)
            .finish()
    }
}

impl Default for HistoryStore {
    fn default() -> Self {
        Self::new(HistoryConfig::default())
    }
}

impl HistoryStore {
    #[must_use]
    pub fn new(config: HistoryConfig) -> Self {
        Self {
            inner: Rc::new(HistoryInner {
                data: RefCell::new(Entries {
                    entries: VecDeque::new(),
                    current: None,
                }),
                max_size: config.max_size.max(1),
                next_id: Cell::new(1),
                listeners: ListenerSet::new(),
            }),
        }
    }

    // ========================================================================
    // Mutation
    // ========================================================================

    /// Record a new entry at the cursor, truncating any forward branch and
    /// evicting the oldest entry when over capacity.
    pub fn push(&self, payload: EntryPayload) -> HistoryEntry {
        let id = EntryId(self.inner.next_id.get());
        self.inner.next_id.set(id.0 + 1);
        let entry = HistoryEntry {
            id,
            timestamp: SystemTime::now(),
            payload,
        };

        let (truncated, evicted) = {
            let mut guard = self.inner.data.borrow_mut();
            let data = &mut *guard;
            let keep = data.current.map_or(0, |i| i + 1);
            let truncated = data.entries.len() - keep;
            data.entries.truncate(keep);
            data.entries.push_back(entry.clone());
            data.current = Some(data.entries.len() - 1);

            let mut evicted = 0usize;
            while data.entries.len() > self.inner.max_size {
                data.entries.pop_front();
                data.current = data.current.map(|i| i.saturating_sub(1));
                evicted += 1;
            }
            (truncated, evicted)
        };

        tracing::debug!(
            target: "backstack.history",
            id = %entry.id,
            kind = ?entry.kind(),
            truncated,
            evicted,
            "push"
        );
        self.notify();
        entry
    }

    /// Move the cursor one entry back. Returns `false` when already at the
    /// first entry or when empty.
    pub fn go_back(&self) -> bool {
        let moved = {
            let mut data = self.inner.data.borrow_mut();
            match data.current {
                Some(i) if i > 0 => {
                    data.current = Some(i - 1);
                    true
                }
                _ => false,
            }
        };
        if moved {
            tracing::debug!(target: "backstack.history", "go_back");
            self.notify();
        }
        moved
    }

    /// Move the cursor one entry forward. Returns `false` at the tail.
    pub fn go_forward(&self) -> bool {
        let moved = {
            let mut data = self.inner.data.borrow_mut();
            match data.current {
                Some(i) if i + 1 < data.entries.len() => {
                    data.current = Some(i + 1);
                    true
                }
                _ => false,
            }
        };
        if moved {
            tracing::debug!(target: "backstack.history", "go_forward");
            self.notify();
        }
        moved
    }

    /// Move the cursor back to `index`. Only backwards moves to an existing
    /// entry are allowed; anything else returns `false`.
    pub fn rewind_to(&self, index: usize) -> bool {
        let moved = {
            let mut data = self.inner.data.borrow_mut();
            match data.current {
                Some(i) if index < i => {
                    data.current = Some(index);
                    true
                }
                _ => false,
            }
        };
        if moved {
            tracing::debug!(target: "backstack.history", index, "rewind");
            self.notify();
        }
        moved
    }

    /// Put the cursor back on an existing `index`, in either direction.
    /// Used to undo a cursor move whose effect could not be carried out.
    pub fn restore_cursor(&self, index: usize) -> bool {
        let moved = {
            let mut data = self.inner.data.borrow_mut();
            if index < data.entries.len() && data.current != Some(index) {
                data.current = Some(index);
                true
            } else {
                false
            }
        };
        if moved {
            tracing::debug!(target: "backstack.history", index, "restore cursor");
            self.notify();
        }
        moved
    }

    /// Reset to the empty initial state.
    pub fn clear(&self) {
        {
            let mut data = self.inner.data.borrow_mut();
            data.entries.clear();
            data.current = None;
        }
        tracing::debug!(target: "backstack.history", "clear");
        self.notify();
    }

    // ========================================================================
    // Queries
    // ========================================================================

    #[must_use]
    pub fn can_go_back(&self) -> bool {
        self.inner.data.borrow().current.is_some_and(|i| i > 0)
    }

    #[must_use]
    pub fn can_go_forward(&self) -> bool {
        let data = self.inner.data.borrow();
        data.current.is_some_and(|i| i + 1 < data.entries.len())
    }

    /// Entry under the cursor.
    #[must_use]
    pub fn current_entry(&self) -> Option<HistoryEntry> {
        let data = self.inner.data.borrow();
        data.current.and_then(|i| data.entries.get(i)).cloned()
    }

    /// Entry immediately before the cursor.
    #[must_use]
    pub fn previous_entry(&self) -> Option<HistoryEntry> {
        let data = self.inner.data.borrow();
        data.current
            .and_then(|i| i.checked_sub(1))
            .and_then(|i| data.entries.get(i))
            .cloned()
    }

    /// Index of the closest entry strictly before the cursor matching `pred`.
    pub fn rposition_before_cursor(&self, pred: impl Fn(&HistoryEntry) -> bool) -> Option<usize> {
        let data = self.inner.data.borrow();
        let end = data.current?;
        data.entries.range(..end).rposition(pred)
    }

    /// Entry at an absolute index.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<HistoryEntry> {
        self.inner.data.borrow().entries.get(index).cloned()
    }

    #[must_use]
    pub fn current_index(&self) -> Option<usize> {
        self.inner.data.borrow().current
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.data.borrow().entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.data.borrow().entries.is_empty()
    }

    #[must_use]
    pub fn max_size(&self) -> usize {
        self.inner.max_size
    }

    /// Snapshot of entries and cursor.
    #[must_use]
    pub fn state(&self) -> HistoryState {
        let data = self.inner.data.borrow();
        HistoryState {
            entries: data.entries.iter().cloned().collect(),
            current_index: data.current,
            max_size: self.inner.max_size,
        }
    }

    // ========================================================================
    // Subscription
    // ========================================================================

    /// Observe every mutation. The callback receives the post-mutation state.
    pub fn subscribe(&self, callback: impl Fn(&HistoryState) + 'static) -> Subscription {
        self.inner.listeners.subscribe(callback)
    }

    fn notify(&self) {
        if self.inner.listeners.live_count() == 0 {
            return;
        }
        let snapshot = self.state();
        self.inner.listeners.notify("history", &snapshot);
    }
}
