#![forbid(unsafe_code)]

//! Mark registry: named scroll positions.
//!
//! Lowercase labels are Local marks, keyed by `(tab, label)` and dropped
//! when their tab closes. Uppercase labels are Global marks, keyed by label
//! alone; they record the URL and origin that set them and survive any tab,
//! resolving to whichever open tab shows the matching origin, or to a fresh
//! tab when none does.
//!
//! Jumping never mutates the registry: [`MarkRegistry::jump`] returns a
//! [`JumpPlan`] for the engine to execute, so a racing duplicate jump can at
//! worst open one tab too many, never corrupt a stored position.

use std::fmt;

use ahash::AHashMap;
use url::Url;

use crate::capabilities::{Tab, TabId};

/// An absolute document scroll position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    /// Horizontal offset in CSS pixels.
    pub x: i32,
    /// Vertical offset in CSS pixels.
    pub y: i32,
}

impl Position {
    /// Create a position.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// A Global mark: position plus the document that recorded it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobalMark {
    /// URL of the document when the mark was set.
    pub url: Url,
    /// Serialized origin of that document, used to find a matching tab.
    pub origin: String,
    /// Stored scroll position.
    pub position: Position,
}

/// Mark failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkError {
    /// The label is not a letter.
    InvalidLabel(char),

    /// No mark is set under this label (for Local marks: in this tab).
    NotFound(char),
}

impl fmt::Display for MarkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidLabel(c) => write!(f, "'{c}' is not a valid mark label"),
            Self::NotFound(c) => write!(f, "mark '{c}' is not set"),
        }
    }
}

impl std::error::Error for MarkError {}

/// How the engine should carry out a jump.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JumpPlan {
    /// Scroll the current tab.
    ScrollCurrent(Position),

    /// Activate another open tab, then scroll it.
    ActivateTab {
        /// Tab to activate.
        tab: TabId,
        /// Position to scroll to after activation.
        position: Position,
    },

    /// Open a new tab at the stored URL; scroll once its load completes.
    OpenTab {
        /// URL recorded by the mark.
        url: Url,
        /// Position to scroll to after the load completes.
        position: Position,
    },
}

/// The serialized origin of a URL (`scheme://host[:port]`).
#[must_use]
pub fn origin_of(url: &Url) -> String {
    url.origin().ascii_serialization()
}

/// Local and Global mark storage.
#[derive(Debug, Clone, Default)]
pub struct MarkRegistry {
    local: AHashMap<(TabId, char), Position>,
    global: AHashMap<char, GlobalMark>,
}

impl MarkRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a mark. Lowercase → Local in `tab`; uppercase → Global,
    /// overwriting any prior holder of the label.
    pub fn set(
        &mut self,
        label: char,
        tab: TabId,
        position: Position,
        url: &Url,
    ) -> Result<(), MarkError> {
        if label.is_ascii_lowercase() {
            self.local.insert((tab, label), position);
            Ok(())
        } else if label.is_ascii_uppercase() {
            self.global.insert(
                label,
                GlobalMark {
                    url: url.clone(),
                    origin: origin_of(url),
                    position,
                },
            );
            Ok(())
        } else {
            Err(MarkError::InvalidLabel(label))
        }
    }

    /// Plan a jump from `current` tab. `tabs` is the live tab snapshot used
    /// to resolve Global marks by origin; the scan-else-create decision is
    /// taken here as one step.
    pub fn jump(
        &self,
        label: char,
        current: TabId,
        tabs: &[Tab],
    ) -> Result<JumpPlan, MarkError> {
        if label.is_ascii_lowercase() {
            let position = self
                .local
                .get(&(current, label))
                .copied()
                .ok_or(MarkError::NotFound(label))?;
            return Ok(JumpPlan::ScrollCurrent(position));
        }
        if !label.is_ascii_uppercase() {
            return Err(MarkError::InvalidLabel(label));
        }

        let mark = self.global.get(&label).ok_or(MarkError::NotFound(label))?;
        match tabs.iter().find(|t| origin_of(&t.url) == mark.origin) {
            Some(tab) => Ok(JumpPlan::ActivateTab {
                tab: tab.id,
                position: mark.position,
            }),
            None => Ok(JumpPlan::OpenTab {
                url: mark.url.clone(),
                position: mark.position,
            }),
        }
    }

    /// Drop everything a closed tab owned: its Local marks only. Global
    /// marks are untouched even if this tab set them.
    pub fn remove_tab(&mut self, tab: TabId) {
        self.local.retain(|(t, _), _| *t != tab);
    }

    /// Number of Local marks (all tabs).
    #[must_use]
    pub fn local_len(&self) -> usize {
        self.local.len()
    }

    /// Number of Global marks.
    #[must_use]
    pub fn global_len(&self) -> usize {
        self.global.len()
    }
}

/// Scroll requests waiting for a tab to finish loading.
///
/// Filled by the Global-mark OpenTab path, consumed by the load-completed
/// event, cancelled by tab removal.
#[derive(Debug, Clone, Default)]
pub struct PendingScrolls {
    waiting: AHashMap<TabId, Position>,
}

impl PendingScrolls {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a scroll to run when `tab` finishes loading.
    pub fn insert(&mut self, tab: TabId, position: Position) {
        self.waiting.insert(tab, position);
    }

    /// Take the pending scroll for a tab that finished loading.
    pub fn take(&mut self, tab: TabId) -> Option<Position> {
        self.waiting.remove(&tab)
    }

    /// Cancel the pending scroll of a closed tab.
    pub fn remove_tab(&mut self, tab: TabId) {
        self.waiting.remove(&tab);
    }

    /// Whether any scroll is outstanding.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.waiting.is_empty()
    }
}
