#![forbid(unsafe_code)]

//! Current/last-selected tab tracking.
//!
//! Explicit state object with a single writer: created with the engine,
//! written only by the tab-selection event, read only by the `tabs.prevsel`
//! operator. Replaces ad hoc module-level caches.

use crate::capabilities::TabId;

/// Tracks which tab is selected now and which was selected before it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TabTracker {
    current: Option<TabId>,
    last: Option<TabId>,
}

impl TabTracker {
    /// Create an empty tracker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a tab selection. The previous current tab becomes the
    /// last-selected tab.
    pub fn on_selected(&mut self, tab: TabId) {
        if self.current == Some(tab) {
            return;
        }
        if let Some(prev) = self.current {
            self.last = Some(prev);
        }
        self.current = Some(tab);
    }

    /// Forget a closed tab. The last-selected slot is cleared if it pointed
    /// at the closed tab; identity reuse is untracked.
    pub fn on_removed(&mut self, tab: TabId) {
        if self.current == Some(tab) {
            self.current = None;
        }
        if self.last == Some(tab) {
            self.last = None;
        }
    }

    /// The currently selected tab, if one has been observed.
    #[must_use]
    pub fn current(&self) -> Option<TabId> {
        self.current
    }

    /// The previously selected tab, for `tabs.prevsel`.
    #[must_use]
    pub fn last_selected(&self) -> Option<TabId> {
        self.last
    }
}
