#![forbid(unsafe_code)]

//! Settings input: keymaps, blacklist, and search engines.
//!
//! The settings object arrives as JSON from the host's storage layer:
//!
//! ```json
//! {
//!   "keymaps": { "j": { "type": "scroll.vertically", "count": 1 } },
//!   "blacklist": [ "example.com/mail" ],
//!   "search": { "default": "google", "engines": { "google": "https://google.com/search?q={}" } }
//! }
//! ```
//!
//! Loading is lenient per entry: a malformed chord, an unknown operation
//! type, an unparsable pattern, or a template without `{}` is skipped with a
//! `tracing` warning. Only top-level malformed JSON is a hard error.

use std::fmt;

use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use keynav_console::SearchEngines;
use keynav_input::{parse_chord, Keymap};

use crate::blacklist::{Blacklist, Pattern};
use crate::operation::Operation;

/// Fatal settings failure: the document itself is not valid JSON.
#[derive(Debug)]
pub enum SettingsError {
    /// Top-level JSON parse failure.
    Json(serde_json::Error),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json(e) => write!(f, "settings are not valid JSON: {e}"),
        }
    }
}

impl std::error::Error for SettingsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Json(e) => Some(e),
        }
    }
}

fn default_engine_name() -> String {
    "google".to_string()
}

#[derive(Debug, Deserialize)]
struct RawSearch {
    #[serde(default = "default_engine_name")]
    default: String,
    #[serde(default)]
    engines: serde_json::Map<String, Value>,
}

impl Default for RawSearch {
    fn default() -> Self {
        Self {
            default: default_engine_name(),
            engines: serde_json::Map::new(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct RawSettings {
    #[serde(default)]
    keymaps: serde_json::Map<String, Value>,
    #[serde(default)]
    blacklist: Vec<Value>,
    #[serde(default)]
    search: RawSearch,
}

/// Loaded engine configuration.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Chord bindings.
    pub keymap: Keymap<Operation>,

    /// The bindings still live while the addon is toggled off (just the
    /// toggle chords themselves).
    pub disabled_keymap: Keymap<Operation>,

    /// Origins/paths where the engine is disabled.
    pub blacklist: Blacklist,

    /// Registered search engines.
    pub engines: SearchEngines,
}

impl Settings {
    /// Load settings from a JSON document, skipping malformed entries.
    pub fn from_json_str(json: &str) -> Result<Self, SettingsError> {
        let raw: RawSettings = serde_json::from_str(json).map_err(SettingsError::Json)?;
        Ok(Self::from_raw(raw))
    }

    /// Settings with nothing bound and no engines.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            keymap: Keymap::new(),
            disabled_keymap: Keymap::new(),
            blacklist: Blacklist::new(),
            engines: SearchEngines::new(default_engine_name()),
        }
    }

    fn from_raw(raw: RawSettings) -> Self {
        let mut keymap = Keymap::new();
        let mut disabled_keymap = Keymap::new();
        for (chord, entry) in raw.keymaps {
            let path = match parse_chord(&chord) {
                Ok(path) => path,
                Err(e) => {
                    warn!(chord = %chord, error = %e, "skipping keymap entry");
                    continue;
                }
            };
            let op: Operation = match serde_json::from_value(entry) {
                Ok(op) => op,
                Err(e) => {
                    warn!(chord = %chord, error = %e, "skipping keymap entry");
                    continue;
                }
            };
            // The toggle chord must keep working while the addon is off,
            // so it also goes into the reduced map used in that state.
            if op == Operation::AddonToggleEnabled {
                disabled_keymap.insert(&path, op.clone());
            }
            if keymap.insert(&path, op).is_some() {
                warn!(chord = %chord, "duplicate keymap entry replaced");
            }
        }

        let mut blacklist = Blacklist::new();
        for entry in raw.blacklist {
            let Some(text) = entry.as_str() else {
                warn!(?entry, "skipping non-string blacklist entry");
                continue;
            };
            match Pattern::parse(text) {
                Ok(pattern) => blacklist.push(pattern),
                Err(e) => warn!(pattern = %text, error = %e, "skipping blacklist entry"),
            }
        }

        let mut engines = SearchEngines::new(raw.search.default);
        for (name, template) in raw.search.engines {
            let Some(template) = template.as_str() else {
                warn!(engine = %name, "skipping non-string engine template");
                continue;
            };
            if let Err(e) = engines.insert(&name, template) {
                warn!(engine = %name, error = %e, "skipping search engine");
            }
        }

        Self {
            keymap,
            disabled_keymap,
            blacklist,
            engines,
        }
    }
}

/// The stock configuration shipped with the engine.
pub const DEFAULT_SETTINGS_JSON: &str = r#"{
  "keymaps": {
    ":": { "type": "command.show" },
    "o": { "type": "command.show.open", "alter": false },
    "O": { "type": "command.show.open", "alter": true },
    "t": { "type": "command.show.tabopen", "alter": false },
    "T": { "type": "command.show.tabopen", "alter": true },
    "w": { "type": "command.show.winopen", "alter": false },
    "W": { "type": "command.show.winopen", "alter": true },
    "b": { "type": "command.show.buffer" },
    "k": { "type": "scroll.vertically", "count": -1 },
    "j": { "type": "scroll.vertically", "count": 1 },
    "h": { "type": "scroll.horizonally", "count": -1 },
    "l": { "type": "scroll.horizonally", "count": 1 },
    "gg": { "type": "scroll.top" },
    "G": { "type": "scroll.bottom" },
    "0": { "type": "scroll.home" },
    "$": { "type": "scroll.end" },
    "<C-u>": { "type": "scroll.pages", "count": -0.5 },
    "<C-d>": { "type": "scroll.pages", "count": 0.5 },
    "<C-b>": { "type": "scroll.pages", "count": -1 },
    "<C-f>": { "type": "scroll.pages", "count": 1 },
    "d": { "type": "tabs.close" },
    "D": { "type": "tabs.close.force" },
    "u": { "type": "tabs.reopen" },
    "K": { "type": "tabs.prev" },
    "J": { "type": "tabs.next" },
    "g0": { "type": "tabs.first" },
    "g$": { "type": "tabs.last" },
    "<C-6>": { "type": "tabs.prevsel" },
    "r": { "type": "tabs.reload", "cache": false },
    "R": { "type": "tabs.reload", "cache": true },
    "zp": { "type": "tabs.pin.toggle" },
    "zd": { "type": "tabs.duplicate" },
    "zi": { "type": "zoom.in" },
    "zo": { "type": "zoom.out" },
    "zz": { "type": "zoom.neutral" },
    "H": { "type": "navigate.history.prev" },
    "L": { "type": "navigate.history.next" },
    "gu": { "type": "navigate.parent" },
    "gU": { "type": "navigate.root" },
    "gf": { "type": "page.source" },
    "m": { "type": "mark.set.prefix" },
    "'": { "type": "mark.jump.prefix" },
    "/": { "type": "find.start" },
    "<S-Esc>": { "type": "addon.toggle.enabled" }
  },
  "blacklist": [],
  "search": {
    "default": "google",
    "engines": {
      "google": "https://google.com/search?q={}",
      "yahoo": "https://search.yahoo.com/search?p={}",
      "bing": "https://www.bing.com/search?q={}",
      "duckduckgo": "https://duckduckgo.com/?q={}",
      "twitter": "https://twitter.com/search?q={}",
      "wikipedia": "https://en.wikipedia.org/w/index.php?search={}"
    }
  }
}"#;

impl Default for Settings {
    fn default() -> Self {
        Self::from_json_str(DEFAULT_SETTINGS_JSON).unwrap_or_else(|_| Self::empty())
    }
}
