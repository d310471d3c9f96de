#![forbid(unsafe_code)]

//! Top-level navigation state: active tab and open sub-page.

use backstack_core::{SubPageId, WizardId};

/// Which tab is active and which sub-page (if any) is layered over it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavigationState {
    pub active_tab: usize,
    pub sub_page: Option<SubPageId>,
    /// Cached view of the history cursor; refreshed after every history change.
    pub can_go_back: bool,
    /// Set while a resolved back action is being applied.
    pub is_transitioning: bool,
}

impl NavigationState {
    /// State for `active_tab` with nothing open.
    #[must_use]
    pub fn on_tab(active_tab: usize) -> Self {
        Self {
            active_tab,
            ..Self::default()
        }
    }

    /// Builder-style sub-page setter.
    #[must_use]
    pub fn with_sub_page(mut self, sub_page: impl Into<SubPageId>) -> Self {
        self.sub_page = Some(sub_page.into());
        self
    }

    #[must_use]
    pub fn has_sub_page(&self) -> bool {
        self.sub_page.is_some()
    }

    /// Wizard hosted by the open sub-page.
    #[must_use]
    pub fn active_wizard(&self) -> Option<WizardId> {
        self.sub_page.as_ref().and_then(SubPageId::wizard)
    }
}
