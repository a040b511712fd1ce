#![forbid(unsafe_code)]

//! Engine facade: one object that owns all navigation state and receives
//! browser events.
//!
//! ```text
//!            key ──► on_key ──► mark capture ──► mark registry
//!                        │
//!                        ▼
//!              sequence interpreter ──► dispatcher ──► capabilities
//!
//!   navigated ──► blacklist gate        load done ──► pending scrolls
//! ```
//!
//! The host forwards every relevant browser event to exactly one of the
//! `on_*` methods and reports any returned error to the user surface. The
//! engine itself never panics on bad input; a failed action leaves state
//! consistent for the next one.

use tracing::{debug, warn};
use web_time::Instant;

use ahash::AHashMap;
use url::Url;

use keynav_console::ex;
use keynav_input::{InterpreterOutput, Key, KeyCode, SequenceInterpreter};

use crate::capabilities::{ConsoleOps, ContentOps, TabId, TabOps};
use crate::dispatcher::Dispatcher;
use crate::error::EngineError;
use crate::marks::{JumpPlan, MarkRegistry, PendingScrolls, Position};
use crate::operation::Operation;
use crate::settings::Settings;
use crate::tabs::TabTracker;

/// What the host should do with a key after the engine has seen it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyDisposition {
    /// The engine handled the key; suppress it from the page.
    Consumed,

    /// The key belongs to the page; deliver it unmodified.
    PassThrough,
}

// Which kind of mark operation armed the one-key label capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MarkPrefix {
    Set,
    Jump,
}

/// The navigation engine.
///
/// Generic over the three capability surfaces so tests can drive it with
/// in-memory fakes.
pub struct Engine<T, C, P> {
    settings: Settings,
    interpreter: SequenceInterpreter,
    marks: MarkRegistry,
    pending: PendingScrolls,
    tracker: TabTracker,
    blacklisted: AHashMap<TabId, bool>,
    mark_capture: Option<MarkPrefix>,
    addon_enabled: bool,
    tabs: T,
    console: C,
    content: P,
}

impl<T: TabOps, C: ConsoleOps, P: ContentOps> Engine<T, C, P> {
    /// Create an engine over the given capability implementations.
    pub fn new(settings: Settings, tabs: T, console: C, content: P) -> Self {
        Self {
            settings,
            interpreter: SequenceInterpreter::with_defaults(),
            marks: MarkRegistry::new(),
            pending: PendingScrolls::new(),
            tracker: TabTracker::new(),
            blacklisted: AHashMap::new(),
            mark_capture: None,
            addon_enabled: true,
            tabs,
            console,
            content,
        }
    }

    /// Replace the interpreter, e.g. to change the chord timeout.
    #[must_use]
    pub fn with_interpreter(mut self, interpreter: SequenceInterpreter) -> Self {
        self.interpreter = interpreter;
        self.update_gate();
        self
    }

    /// The active settings.
    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Swap in new settings. Pending chord state and armed mark captures
    /// are discarded; marks and pending scrolls survive. Already-loaded
    /// pages are re-gated against the new blacklist on their next
    /// navigation.
    pub fn set_settings(&mut self, settings: Settings) {
        self.settings = settings;
        self.interpreter.reset();
        self.mark_capture = None;
    }

    /// Process one key event.
    pub fn on_key(&mut self, key: Key, now: Instant) -> Result<KeyDisposition, EngineError> {
        if let Some(prefix) = self.mark_capture.take() {
            return self.capture_mark_label(prefix, &key);
        }

        // While the addon is toggled off, only the toggle chords remain
        // bound; everything else reaches the page untouched.
        let keymap = if self.addon_enabled {
            &self.settings.keymap
        } else {
            &self.settings.disabled_keymap
        };
        match self.interpreter.feed(keymap, &key, now) {
            InterpreterOutput::Matched { value, count } => {
                self.execute(&value, count)?;
                Ok(KeyDisposition::Consumed)
            }
            InterpreterOutput::Continue => Ok(KeyDisposition::Consumed),
            InterpreterOutput::Reset { pass_through } => Ok(if pass_through {
                KeyDisposition::PassThrough
            } else {
                KeyDisposition::Consumed
            }),
        }
    }

    /// Pump the chord timeout. Returns true when a stale prefix was
    /// discarded.
    pub fn check_timeout(&mut self, now: Instant) -> bool {
        self.interpreter.check_timeout(now)
    }

    /// A line was submitted in the command console.
    pub fn on_console_submit(&mut self, line: &str) -> Result<(), EngineError> {
        let cmd = ex::parse(line);
        self.dispatcher().run_command(&cmd)
    }

    /// A tab committed a navigation to `url`.
    pub fn on_navigated(&mut self, tab: TabId, url: &Url) {
        let hit = self.settings.blacklist.matches(url);
        if hit {
            debug!(%tab, %url, "page is blacklisted, keys pass through");
        }
        self.blacklisted.insert(tab, hit);
        self.update_gate();
    }

    /// A tab became active.
    pub fn on_tab_selected(&mut self, tab: TabId) {
        self.tracker.on_selected(tab);
        self.interpreter.reset();
        self.mark_capture = None;
        self.update_gate();
    }

    /// A tab was closed.
    pub fn on_tab_removed(&mut self, tab: TabId) {
        self.marks.remove_tab(tab);
        self.pending.remove_tab(tab);
        self.blacklisted.remove(&tab);
        self.tracker.on_removed(tab);
        self.update_gate();
    }

    /// A tab finished loading its document.
    pub fn on_load_completed(&mut self, tab: TabId) -> Result<(), EngineError> {
        if let Some(position) = self.pending.take(tab) {
            self.content.scroll_to(tab, position.x, position.y)?;
        }
        Ok(())
    }

    /// Whether keys are currently being interpreted (addon enabled and the
    /// active page not blacklisted).
    #[must_use]
    pub fn is_listening(&self) -> bool {
        self.addon_enabled && self.interpreter.is_enabled()
    }

    /// The mark registry, read-only.
    #[must_use]
    pub fn marks(&self) -> &MarkRegistry {
        &self.marks
    }

    fn execute(&mut self, op: &Operation, count: u32) -> Result<(), EngineError> {
        match op {
            Operation::MarkSetPrefix => {
                self.mark_capture = Some(MarkPrefix::Set);
                Ok(())
            }
            Operation::MarkJumpPrefix => {
                self.mark_capture = Some(MarkPrefix::Jump);
                Ok(())
            }
            Operation::AddonToggleEnabled => {
                self.addon_enabled = !self.addon_enabled;
                debug!(enabled = self.addon_enabled, "addon toggled");
                self.interpreter.reset();
                self.mark_capture = None;
                Ok(())
            }
            _ => self.dispatcher().run(op, count),
        }
    }

    // The key following a mark prefix is the label; it is consumed even
    // when invalid, so a typo never scrolls the page.
    fn capture_mark_label(
        &mut self,
        prefix: MarkPrefix,
        key: &Key,
    ) -> Result<KeyDisposition, EngineError> {
        let label = match key.code {
            KeyCode::Char(c) if key.modifiers.is_empty() => c,
            _ => {
                warn!("mark label must be a plain letter key");
                return Ok(KeyDisposition::Consumed);
            }
        };
        match prefix {
            MarkPrefix::Set => self.set_mark(label)?,
            MarkPrefix::Jump => self.jump_mark(label)?,
        }
        Ok(KeyDisposition::Consumed)
    }

    fn set_mark(&mut self, label: char) -> Result<(), EngineError> {
        let tab = self.tabs.current()?;
        let (x, y) = self.content.scroll_position(tab.id)?;
        self.marks.set(label, tab.id, Position::new(x, y), &tab.url)?;
        debug!(%label, tab = %tab.id, "mark set");
        Ok(())
    }

    fn jump_mark(&mut self, label: char) -> Result<(), EngineError> {
        let current = self.tabs.current()?;
        let all = self.tabs.all()?;
        match self.marks.jump(label, current.id, &all)? {
            JumpPlan::ScrollCurrent(p) => {
                self.content.scroll_to(current.id, p.x, p.y)?;
            }
            JumpPlan::ActivateTab { tab, position } => {
                self.tabs.select(tab)?;
                self.content.scroll_to(tab, position.x, position.y)?;
            }
            JumpPlan::OpenTab { url, position } => {
                let opened = self.tabs.create(&url)?;
                self.pending.insert(opened.id, position);
            }
        }
        Ok(())
    }

    fn dispatcher(&self) -> Dispatcher<'_, T, C, P> {
        Dispatcher {
            tabs: &self.tabs,
            console: &self.console,
            content: &self.content,
            tracker: &self.tracker,
            engines: &self.settings.engines,
        }
    }

    // The blacklist fully disables interpretation for the active page; the
    // addon toggle only shrinks the keymap, so it can be toggled back on.
    fn update_gate(&mut self) {
        let page_blocked = self
            .tracker
            .current()
            .and_then(|t| self.blacklisted.get(&t))
            .copied()
            .unwrap_or(false);
        self.interpreter.set_enabled(!page_blocked);
    }
}
