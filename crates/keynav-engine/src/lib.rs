#![forbid(unsafe_code)]

//! Keyboard-driven browser navigation engine.
//!
//! Ties the chord interpreter ([`keynav_input`]) and the console/search
//! layer ([`keynav_console`]) to a browser through three narrow capability
//! traits, and adds everything stateful on top: the mark registry, the
//! blacklist gate, tab-selection history, and the operator dispatcher.
//!
//! # Layout
//!
//! | Module | Responsibility |
//! |--------|----------------|
//! | [`capabilities`] | Traits the host browser implements |
//! | [`operation`] | The closed set of bindable operations |
//! | [`dispatcher`] | Executes one operation or console command |
//! | [`marks`] | Local/Global marks and deferred scrolls |
//! | [`blacklist`] | URL patterns that disable key handling |
//! | [`tabs`] | Current/last tab-selection tracking |
//! | [`settings`] | JSON settings document (keymap, engines, blacklist) |
//! | [`engine`] | The facade the host drives with browser events |
//!
//! # Example
//!
//! ```ignore
//! let mut engine = Engine::new(Settings::default(), tabs, console, content);
//! match engine.on_key(Key::char('j'), Instant::now())? {
//!     KeyDisposition::Consumed => suppress_event(),
//!     KeyDisposition::PassThrough => deliver_to_page(),
//! }
//! ```

pub mod blacklist;
pub mod capabilities;
pub mod dispatcher;
pub mod engine;
pub mod error;
pub mod marks;
pub mod operation;
pub mod settings;
pub mod tabs;

pub use blacklist::{Blacklist, Pattern, PatternError};
pub use capabilities::{CapResult, CapabilityError, ConsoleOps, ContentOps, Tab, TabId, TabOps};
pub use engine::{Engine, KeyDisposition};
pub use error::EngineError;
pub use marks::{GlobalMark, JumpPlan, MarkError, MarkRegistry, PendingScrolls, Position};
pub use operation::Operation;
pub use settings::{Settings, SettingsError, DEFAULT_SETTINGS_JSON};
pub use tabs::TabTracker;
