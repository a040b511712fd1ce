#![forbid(unsafe_code)]

//! Capability traits for the browser surfaces the engine consumes.
//!
//! The engine never talks to a browser API directly; it calls through these
//! narrow traits. Tab identifiers are opaque and stable only within a tab's
//! lifetime. All failures surface as an opaque [`CapabilityError`] message;
//! one reported failure per user action, never retried.

use std::fmt;

use url::Url;

/// Opaque tab identifier, stable for the tab's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TabId(pub u32);

impl fmt::Display for TabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Snapshot of one browser tab.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tab {
    /// Opaque identifier.
    pub id: TabId,

    /// Position in the tab strip, 0-based.
    pub index: usize,

    /// Current document URL.
    pub url: Url,

    /// Document title.
    pub title: String,

    /// Whether this tab is the active one in its window.
    pub active: bool,

    /// Whether the tab is pinned.
    pub pinned: bool,
}

/// Failure reported by a capability implementation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapabilityError(String);

impl CapabilityError {
    /// Wrap a failure message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

impl fmt::Display for CapabilityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for CapabilityError {}

impl From<&str> for CapabilityError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

/// Result alias for capability calls.
pub type CapResult<T> = Result<T, CapabilityError>;

/// Tab and window management.
pub trait TabOps {
    /// The active tab of the current window.
    fn current(&self) -> CapResult<Tab>;

    /// Every open tab, in tab-strip order.
    fn all(&self) -> CapResult<Vec<Tab>>;

    /// Activate a tab.
    fn select(&self, id: TabId) -> CapResult<()>;

    /// Close tabs.
    fn remove(&self, ids: &[TabId]) -> CapResult<()>;

    /// Open a new tab and return it.
    fn create(&self, url: &Url) -> CapResult<Tab>;

    /// Open a new window and return its tab.
    fn create_window(&self, url: &Url) -> CapResult<Tab>;

    /// Navigate an existing tab.
    fn navigate(&self, id: TabId, url: &Url) -> CapResult<()>;

    /// Duplicate a tab.
    fn duplicate(&self, id: TabId) -> CapResult<Tab>;

    /// Reload a tab, optionally bypassing the cache.
    fn reload(&self, id: TabId, bypass_cache: bool) -> CapResult<()>;

    /// Restore the most recently closed tab.
    fn reopen(&self) -> CapResult<()>;

    /// Pin or unpin a tab.
    fn set_pinned(&self, id: TabId, pinned: bool) -> CapResult<()>;

    /// Current zoom factor of a tab.
    fn zoom(&self, id: TabId) -> CapResult<f64>;

    /// Set the zoom factor of a tab.
    fn set_zoom(&self, id: TabId, factor: f64) -> CapResult<()>;
}

/// Console overlay surface.
pub trait ConsoleOps {
    /// Show the command console with prefilled text.
    fn show_command(&self, tab: TabId, prefill: &str) -> CapResult<()>;

    /// Show the find console.
    fn show_find(&self, tab: TabId) -> CapResult<()>;

    /// Hide the console.
    fn hide(&self, tab: TabId) -> CapResult<()>;
}

/// Page content access for the active document of a tab.
pub trait ContentOps {
    /// Scroll the document to an absolute position.
    fn scroll_to(&self, tab: TabId, x: i32, y: i32) -> CapResult<()>;

    /// Current scroll position of the document.
    fn scroll_position(&self, tab: TabId) -> CapResult<(i32, i32)>;

    /// Size of the visible viewport, in CSS pixels.
    fn viewport_size(&self, tab: TabId) -> CapResult<(i32, i32)>;

    /// Full size of the document, in CSS pixels.
    fn page_size(&self, tab: TabId) -> CapResult<(i32, i32)>;

    /// Move through the tab's session history (negative = back).
    fn history_go(&self, tab: TabId, delta: i32) -> CapResult<()>;
}
