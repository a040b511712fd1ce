#![forbid(unsafe_code)]

//! The closed set of dispatchable operations.
//!
//! Settings bind chords to operations by dotted type name:
//!
//! ```json
//! { "j": { "type": "scroll.vertically", "count": 1 },
//!   "d": { "type": "tabs.close" } }
//! ```
//!
//! The enum is closed and the dispatcher matches it exhaustively, so adding
//! an operation is a compile-time change; an unknown name can only appear in
//! settings input, where it is skipped with a warning at load time.

use serde::{Deserialize, Serialize};

const fn default_count() -> i32 {
    1
}

const fn default_page_count() -> f64 {
    1.0
}

/// One dispatchable action, tagged by its settings name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Operation {
    /// Scroll vertically by `count` steps (negative = up).
    #[serde(rename = "scroll.vertically")]
    ScrollVertically {
        /// Signed per-press step count.
        #[serde(default = "default_count")]
        count: i32,
    },

    /// Scroll horizontally by `count` steps (negative = left).
    #[serde(rename = "scroll.horizonally")]
    ScrollHorizontally {
        /// Signed per-press step count.
        #[serde(default = "default_count")]
        count: i32,
    },

    /// Scroll by viewport pages (fractional allowed, negative = up).
    #[serde(rename = "scroll.pages")]
    ScrollPages {
        /// Signed per-press page count.
        #[serde(default = "default_page_count")]
        count: f64,
    },

    /// Scroll to the top of the document.
    #[serde(rename = "scroll.top")]
    ScrollTop,

    /// Scroll to the bottom of the document.
    #[serde(rename = "scroll.bottom")]
    ScrollBottom,

    /// Scroll to the leftmost column.
    #[serde(rename = "scroll.home")]
    ScrollHome,

    /// Scroll to the rightmost column.
    #[serde(rename = "scroll.end")]
    ScrollEnd,

    /// Close the current tab (pinned tabs are kept).
    #[serde(rename = "tabs.close")]
    TabClose,

    /// Close the current tab even when pinned.
    #[serde(rename = "tabs.close.force")]
    TabCloseForce,

    /// Restore the most recently closed tab.
    #[serde(rename = "tabs.reopen")]
    TabReopen,

    /// Select the previous tab, wrapping.
    #[serde(rename = "tabs.prev")]
    TabPrev,

    /// Select the next tab, wrapping.
    #[serde(rename = "tabs.next")]
    TabNext,

    /// Select the first tab.
    #[serde(rename = "tabs.first")]
    TabFirst,

    /// Select the last tab.
    #[serde(rename = "tabs.last")]
    TabLast,

    /// Select the previously selected tab.
    #[serde(rename = "tabs.prevsel")]
    TabPrevSel,

    /// Reload the current tab.
    #[serde(rename = "tabs.reload")]
    TabReload {
        /// Bypass the cache when true.
        #[serde(default)]
        cache: bool,
    },

    /// Pin the current tab.
    #[serde(rename = "tabs.pin")]
    TabPin,

    /// Unpin the current tab.
    #[serde(rename = "tabs.unpin")]
    TabUnpin,

    /// Toggle the current tab's pinned state.
    #[serde(rename = "tabs.pin.toggle")]
    TabTogglePinned,

    /// Duplicate the current tab.
    #[serde(rename = "tabs.duplicate")]
    TabDuplicate,

    /// Zoom in one step on the factor ladder.
    #[serde(rename = "zoom.in")]
    ZoomIn,

    /// Zoom out one step on the factor ladder.
    #[serde(rename = "zoom.out")]
    ZoomOut,

    /// Reset zoom to 100%.
    #[serde(rename = "zoom.neutral")]
    ZoomNeutral,

    /// Go back in session history.
    #[serde(rename = "navigate.history.prev")]
    HistoryPrev,

    /// Go forward in session history.
    #[serde(rename = "navigate.history.next")]
    HistoryNext,

    /// Navigate to the parent resource of the current URL.
    #[serde(rename = "navigate.parent")]
    NavigateParent,

    /// Navigate to the root of the current origin.
    #[serde(rename = "navigate.root")]
    NavigateRoot,

    /// Open the page source of the current tab in a new tab.
    #[serde(rename = "page.source")]
    PageSource,

    /// Treat the next key as a mark label to set.
    #[serde(rename = "mark.set.prefix")]
    MarkSetPrefix,

    /// Treat the next key as a mark label to jump to.
    #[serde(rename = "mark.jump.prefix")]
    MarkJumpPrefix,

    /// Show the command console, empty.
    #[serde(rename = "command.show")]
    CommandShow,

    /// Show the console prefilled with `open `.
    #[serde(rename = "command.show.open")]
    CommandShowOpen {
        /// Prefill the current URL after the command.
        #[serde(default)]
        alter: bool,
    },

    /// Show the console prefilled with `tabopen `.
    #[serde(rename = "command.show.tabopen")]
    CommandShowTabopen {
        /// Prefill the current URL after the command.
        #[serde(default)]
        alter: bool,
    },

    /// Show the console prefilled with `winopen `.
    #[serde(rename = "command.show.winopen")]
    CommandShowWinopen {
        /// Prefill the current URL after the command.
        #[serde(default)]
        alter: bool,
    },

    /// Show the console prefilled with `buffer `.
    #[serde(rename = "command.show.buffer")]
    CommandShowBuffer,

    /// Show the find console.
    #[serde(rename = "find.start")]
    FindStart,

    /// Toggle the whole engine on or off for all pages.
    #[serde(rename = "addon.toggle.enabled")]
    AddonToggleEnabled,
}

impl Operation {
    /// The dotted settings name of this operation.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::ScrollVertically { .. } => "scroll.vertically",
            Self::ScrollHorizontally { .. } => "scroll.horizonally",
            Self::ScrollPages { .. } => "scroll.pages",
            Self::ScrollTop => "scroll.top",
            Self::ScrollBottom => "scroll.bottom",
            Self::ScrollHome => "scroll.home",
            Self::ScrollEnd => "scroll.end",
            Self::TabClose => "tabs.close",
            Self::TabCloseForce => "tabs.close.force",
            Self::TabReopen => "tabs.reopen",
            Self::TabPrev => "tabs.prev",
            Self::TabNext => "tabs.next",
            Self::TabFirst => "tabs.first",
            Self::TabLast => "tabs.last",
            Self::TabPrevSel => "tabs.prevsel",
            Self::TabReload { .. } => "tabs.reload",
            Self::TabPin => "tabs.pin",
            Self::TabUnpin => "tabs.unpin",
            Self::TabTogglePinned => "tabs.pin.toggle",
            Self::TabDuplicate => "tabs.duplicate",
            Self::ZoomIn => "zoom.in",
            Self::ZoomOut => "zoom.out",
            Self::ZoomNeutral => "zoom.neutral",
            Self::HistoryPrev => "navigate.history.prev",
            Self::HistoryNext => "navigate.history.next",
            Self::NavigateParent => "navigate.parent",
            Self::NavigateRoot => "navigate.root",
            Self::PageSource => "page.source",
            Self::MarkSetPrefix => "mark.set.prefix",
            Self::MarkJumpPrefix => "mark.jump.prefix",
            Self::CommandShow => "command.show",
            Self::CommandShowOpen { .. } => "command.show.open",
            Self::CommandShowTabopen { .. } => "command.show.tabopen",
            Self::CommandShowWinopen { .. } => "command.show.winopen",
            Self::CommandShowBuffer => "command.show.buffer",
            Self::FindStart => "find.start",
            Self::AddonToggleEnabled => "addon.toggle.enabled",
        }
    }
}
