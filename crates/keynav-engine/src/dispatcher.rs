#![forbid(unsafe_code)]

//! Operation and ex-command execution.
//!
//! One dispatch call executes exactly one operator against the capability
//! traits; nothing is retried, because operations are not idempotent
//! (opening a tab twice on a transient failure must not happen). The chord
//! count multiplies an operation's own per-press magnitude; operations
//! without a magnitude ignore it.

use tracing::debug;
use url::Url;

use keynav_console::{resolve, ExCommand, SearchEngines};

use crate::capabilities::{ConsoleOps, ContentOps, Tab, TabOps};
use crate::error::EngineError;
use crate::operation::Operation;
use crate::tabs::TabTracker;

/// Pixels per scroll step.
const SCROLL_STEP: i32 = 64;

/// Zoom factor ladder for `zoom.in` / `zoom.out`.
const ZOOM_LEVELS: [f64; 14] = [
    0.33, 0.50, 0.66, 0.75, 0.80, 0.90, 1.00, 1.10, 1.25, 1.50, 1.75, 2.00, 2.50, 3.00,
];

const ZOOM_EPSILON: f64 = 0.001;

/// Borrowed view of the engine used to execute one action.
pub struct Dispatcher<'a, T, C, P> {
    /// Tab capability.
    pub tabs: &'a T,
    /// Console capability.
    pub console: &'a C,
    /// Page content capability.
    pub content: &'a P,
    /// Current/last tab selection state.
    pub tracker: &'a TabTracker,
    /// Registered search engines for command resolution.
    pub engines: &'a SearchEngines,
}

impl<T: TabOps, C: ConsoleOps, P: ContentOps> Dispatcher<'_, T, C, P> {
    /// Execute one keymap operation with its chord count.
    ///
    /// Mark prefixes and the addon toggle never reach this point; the
    /// engine resolves them before dispatch.
    pub fn run(&self, op: &Operation, count: u32) -> Result<(), EngineError> {
        debug!(operation = op.name(), count, "dispatch");
        let n = i64::from(count);
        match op {
            Operation::ScrollVertically { count: step } => {
                let tab = self.current()?;
                let (x, y) = self.content.scroll_position(tab.id)?;
                let delta = i64::from(*step) * n * i64::from(SCROLL_STEP);
                self.content.scroll_to(tab.id, x, clamp_axis(i64::from(y) + delta))?;
                Ok(())
            }
            Operation::ScrollHorizontally { count: step } => {
                let tab = self.current()?;
                let (x, y) = self.content.scroll_position(tab.id)?;
                let delta = i64::from(*step) * n * i64::from(SCROLL_STEP);
                self.content.scroll_to(tab.id, clamp_axis(i64::from(x) + delta), y)?;
                Ok(())
            }
            Operation::ScrollPages { count: pages } => {
                let tab = self.current()?;
                let (x, y) = self.content.scroll_position(tab.id)?;
                let (_, view_h) = self.content.viewport_size(tab.id)?;
                #[allow(clippy::cast_possible_truncation)]
                let delta = (pages * count as f64 * f64::from(view_h)) as i64;
                self.content.scroll_to(tab.id, x, clamp_axis(i64::from(y) + delta))?;
                Ok(())
            }
            Operation::ScrollTop => {
                let tab = self.current()?;
                let (x, _) = self.content.scroll_position(tab.id)?;
                self.content.scroll_to(tab.id, x, 0)?;
                Ok(())
            }
            Operation::ScrollBottom => {
                let tab = self.current()?;
                let (x, _) = self.content.scroll_position(tab.id)?;
                let (_, view_h) = self.content.viewport_size(tab.id)?;
                let (_, page_h) = self.content.page_size(tab.id)?;
                self.content
                    .scroll_to(tab.id, x, (page_h - view_h).max(0))?;
                Ok(())
            }
            Operation::ScrollHome => {
                let tab = self.current()?;
                let (_, y) = self.content.scroll_position(tab.id)?;
                self.content.scroll_to(tab.id, 0, y)?;
                Ok(())
            }
            Operation::ScrollEnd => {
                let tab = self.current()?;
                let (_, y) = self.content.scroll_position(tab.id)?;
                let (view_w, _) = self.content.viewport_size(tab.id)?;
                let (page_w, _) = self.content.page_size(tab.id)?;
                self.content
                    .scroll_to(tab.id, (page_w - view_w).max(0), y)?;
                Ok(())
            }
            Operation::TabClose => {
                let tab = self.current()?;
                if tab.pinned {
                    return Ok(());
                }
                self.tabs.remove(&[tab.id])?;
                Ok(())
            }
            Operation::TabCloseForce => {
                let tab = self.current()?;
                self.tabs.remove(&[tab.id])?;
                Ok(())
            }
            Operation::TabReopen => {
                self.tabs.reopen()?;
                Ok(())
            }
            Operation::TabPrev => self.cycle_tabs(-n),
            Operation::TabNext => self.cycle_tabs(n),
            Operation::TabFirst => {
                let tabs = self.tabs.all()?;
                if let Some(first) = tabs.first() {
                    self.tabs.select(first.id)?;
                }
                Ok(())
            }
            Operation::TabLast => {
                let tabs = self.tabs.all()?;
                if let Some(last) = tabs.last() {
                    self.tabs.select(last.id)?;
                }
                Ok(())
            }
            Operation::TabPrevSel => {
                if let Some(last) = self.tracker.last_selected() {
                    self.tabs.select(last)?;
                }
                Ok(())
            }
            Operation::TabReload { cache } => {
                let tab = self.current()?;
                self.tabs.reload(tab.id, *cache)?;
                Ok(())
            }
            Operation::TabPin => self.pin(true),
            Operation::TabUnpin => self.pin(false),
            Operation::TabTogglePinned => {
                let tab = self.current()?;
                self.tabs.set_pinned(tab.id, !tab.pinned)?;
                Ok(())
            }
            Operation::TabDuplicate => {
                let tab = self.current()?;
                self.tabs.duplicate(tab.id)?;
                Ok(())
            }
            Operation::ZoomIn => self.zoom_step(true),
            Operation::ZoomOut => self.zoom_step(false),
            Operation::ZoomNeutral => {
                let tab = self.current()?;
                self.tabs.set_zoom(tab.id, 1.0)?;
                Ok(())
            }
            Operation::HistoryPrev => {
                let tab = self.current()?;
                #[allow(clippy::cast_possible_wrap)]
                self.content.history_go(tab.id, -(count as i32))?;
                Ok(())
            }
            Operation::HistoryNext => {
                let tab = self.current()?;
                #[allow(clippy::cast_possible_wrap)]
                self.content.history_go(tab.id, count as i32)?;
                Ok(())
            }
            Operation::NavigateParent => {
                let tab = self.current()?;
                if let Some(parent) = parent_url(&tab.url) {
                    self.tabs.navigate(tab.id, &parent)?;
                }
                Ok(())
            }
            Operation::NavigateRoot => {
                let tab = self.current()?;
                let mut root = tab.url.clone();
                if root.cannot_be_a_base() {
                    return Ok(());
                }
                root.set_path("/");
                root.set_query(None);
                root.set_fragment(None);
                self.tabs.navigate(tab.id, &root)?;
                Ok(())
            }
            Operation::PageSource => {
                let tab = self.current()?;
                if let Ok(source) = Url::parse(&format!("view-source:{}", tab.url)) {
                    self.tabs.create(&source)?;
                }
                Ok(())
            }
            Operation::CommandShow => self.show_command("", false),
            Operation::CommandShowOpen { alter } => self.show_command("open ", *alter),
            Operation::CommandShowTabopen { alter } => self.show_command("tabopen ", *alter),
            Operation::CommandShowWinopen { alter } => self.show_command("winopen ", *alter),
            Operation::CommandShowBuffer => self.show_command("buffer ", false),
            Operation::FindStart => {
                let tab = self.current()?;
                self.console.show_find(tab.id)?;
                Ok(())
            }
            // Resolved by the engine before dispatch.
            Operation::MarkSetPrefix
            | Operation::MarkJumpPrefix
            | Operation::AddonToggleEnabled => Ok(()),
        }
    }

    /// Execute one console command line.
    pub fn run_command(&self, cmd: &ExCommand) -> Result<(), EngineError> {
        debug!(name = %cmd.name, args = %cmd.raw_args, "console command");
        match cmd.name.as_str() {
            // Blank submit: close the console, do nothing.
            "" => {
                let tab = self.current()?;
                self.console.hide(tab.id)?;
                Ok(())
            }
            "open" => {
                let url = resolve(&cmd.raw_args, self.engines)?;
                let tab = self.current()?;
                self.tabs.navigate(tab.id, &url)?;
                Ok(())
            }
            "tabopen" | "t" => {
                let url = resolve(&cmd.raw_args, self.engines)?;
                self.tabs.create(&url)?;
                Ok(())
            }
            "winopen" | "w" => {
                let url = resolve(&cmd.raw_args, self.engines)?;
                self.tabs.create_window(&url)?;
                Ok(())
            }
            "buffer" | "b" => self.select_buffer(&cmd.raw_args),
            "quit" | "q" => self.run(&Operation::TabClose, 1),
            "qall" => {
                let ids: Vec<_> = self.tabs.all()?.iter().map(|t| t.id).collect();
                self.tabs.remove(&ids)?;
                Ok(())
            }
            name => Err(EngineError::UnknownCommand(name.to_string())),
        }
    }

    fn current(&self) -> Result<Tab, EngineError> {
        Ok(self.tabs.current()?)
    }

    fn cycle_tabs(&self, steps: i64) -> Result<(), EngineError> {
        let tabs = self.tabs.all()?;
        let len = tabs.len() as i64;
        if len < 2 {
            return Ok(());
        }
        let Some(active) = tabs.iter().position(|t| t.active) else {
            return Ok(());
        };
        let target = (active as i64 + steps).rem_euclid(len);
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        self.tabs.select(tabs[target as usize].id)?;
        Ok(())
    }

    fn pin(&self, pinned: bool) -> Result<(), EngineError> {
        let tab = self.current()?;
        self.tabs.set_pinned(tab.id, pinned)?;
        Ok(())
    }

    fn zoom_step(&self, zoom_in: bool) -> Result<(), EngineError> {
        let tab = self.current()?;
        let current = self.tabs.zoom(tab.id)?;
        let next = if zoom_in {
            ZOOM_LEVELS.iter().find(|f| **f > current + ZOOM_EPSILON)
        } else {
            ZOOM_LEVELS
                .iter()
                .rev()
                .find(|f| **f < current - ZOOM_EPSILON)
        };
        if let Some(factor) = next {
            self.tabs.set_zoom(tab.id, *factor)?;
        }
        Ok(())
    }

    fn show_command(&self, command: &str, alter: bool) -> Result<(), EngineError> {
        let tab = self.current()?;
        let prefill = if alter {
            format!("{command}{}", tab.url)
        } else {
            command.to_string()
        };
        self.console.show_command(tab.id, &prefill)?;
        Ok(())
    }

    fn select_buffer(&self, keyword: &str) -> Result<(), EngineError> {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            return Ok(());
        }
        let tabs = self.tabs.all()?;

        if let Ok(index) = keyword.parse::<usize>() {
            // 1-based, matching the tab strip numbering.
            let tab = tabs
                .get(index.wrapping_sub(1))
                .ok_or_else(|| EngineError::TabNotFound(keyword.to_string()))?;
            self.tabs.select(tab.id)?;
            return Ok(());
        }

        let needle = keyword.to_lowercase();
        let start = tabs.iter().position(|t| t.active).map_or(0, |i| i + 1);
        let hit = (0..tabs.len())
            .map(|offset| &tabs[(start + offset) % tabs.len()])
            .find(|t| {
                t.title.to_lowercase().contains(&needle)
                    || t.url.as_str().to_lowercase().contains(&needle)
            })
            .ok_or_else(|| EngineError::TabNotFound(keyword.to_string()))?;
        self.tabs.select(hit.id)?;
        Ok(())
    }
}

fn clamp_axis(value: i64) -> i32 {
    value.clamp(0, i64::from(i32::MAX)) as i32
}

/// The parent resource of a URL: drop the fragment, else the query, else
/// the last path segment. `None` when already at the root.
fn parent_url(url: &Url) -> Option<Url> {
    let mut parent = url.clone();
    if parent.fragment().is_some() {
        parent.set_fragment(None);
        return Some(parent);
    }
    if parent.query().is_some() {
        parent.set_query(None);
        return Some(parent);
    }
    if url.cannot_be_a_base() || url.path() == "/" {
        return None;
    }
    {
        let mut segments = parent.path_segments_mut().ok()?;
        segments.pop_if_empty().pop();
    }
    Some(parent)
}
