#![forbid(unsafe_code)]

//! Key sequence interpreter.
//!
//! State machine that accumulates counted multi-key chords and resolves them
//! against a [`Keymap`]. One interpreter exists per input context; any
//! resolution, mismatch, timeout, or disable clears all pending state.
//!
//! # State Machine
//!
//! ```text
//!             digit (no chord key yet)
//!            ┌────────────────────────┐
//!            ▼                        │
//! ┌──────────────────┐  chord key  ┌──┴───────────────┐
//! │ counting/idle    │────────────▶│ pending chord    │
//! └──────────────────┘             └──────────────────┘
//!            ▲      exact match → Matched   │
//!            │      no match   → Reset      │
//!            └──────timeout    → Reset──────┘
//! ```
//!
//! # Example
//!
//! ```
//! use web_time::Instant;
//! use keynav_input::{parse_chord, InterpreterConfig, InterpreterOutput, Keymap,
//!     SequenceInterpreter, Key};
//!
//! let mut map = Keymap::new();
//! map.insert(&parse_chord("gg").unwrap(), "top");
//!
//! let mut interp = SequenceInterpreter::new(InterpreterConfig::default());
//! let now = Instant::now();
//!
//! assert_eq!(interp.feed(&map, &Key::char('g'), now), InterpreterOutput::Continue);
//! assert_eq!(
//!     interp.feed(&map, &Key::char('g'), now),
//!     InterpreterOutput::Matched { value: "top", count: 1 },
//! );
//! ```

use web_time::{Duration, Instant};

use crate::event::Key;
use crate::keymap::{Keymap, Lookup};

/// Default inter-key chord timeout.
pub const DEFAULT_CHORD_TIMEOUT_MS: u64 = 1000;

/// Minimum allowed chord timeout.
pub const MIN_CHORD_TIMEOUT_MS: u64 = 100;

/// Maximum allowed chord timeout.
pub const MAX_CHORD_TIMEOUT_MS: u64 = 10_000;

/// Configuration for the sequence interpreter.
#[derive(Debug, Clone)]
pub struct InterpreterConfig {
    /// Maximum gap between keys while a chord is pending. The window
    /// restarts on every accepted key. Default: 1000ms.
    pub chord_timeout: Duration,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        Self {
            chord_timeout: Duration::from_millis(DEFAULT_CHORD_TIMEOUT_MS),
        }
    }
}

impl InterpreterConfig {
    /// Create a config with a custom timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.chord_timeout = timeout;
        self
    }

    /// Validate and clamp the timeout to the 100ms-10s range.
    #[must_use]
    pub fn validated(mut self) -> Self {
        let ms = u64::try_from(self.chord_timeout.as_millis()).unwrap_or(MAX_CHORD_TIMEOUT_MS);
        let clamped = ms.clamp(MIN_CHORD_TIMEOUT_MS, MAX_CHORD_TIMEOUT_MS);
        self.chord_timeout = Duration::from_millis(clamped);
        self
    }
}

/// Output of feeding one key into the interpreter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterpreterOutput<T> {
    /// A chord resolved: the bound value plus the accumulated count
    /// (1 when no count prefix was typed).
    Matched {
        /// Value bound to the completed chord path.
        value: T,
        /// Accumulated count prefix, defaulting to 1.
        count: u32,
    },

    /// The pending path is a prefix of at least one binding; keep typing.
    Continue,

    /// Pending state was cleared without resolving.
    Reset {
        /// True when the key should be passed through to the page
        /// unhandled (the very first key of a fresh sequence matched
        /// nothing, i.e. ordinary typing).
        pass_through: bool,
    },
}

/// Chord accumulation state machine.
///
/// Feed key events with [`feed`](Self::feed); pump
/// [`check_timeout`](Self::check_timeout) from the host timer so stale
/// prefixes do not leak into later keystrokes. The `enabled` gate
/// (driven by the blacklist matcher in the engine) makes `feed` a no-op.
#[derive(Debug)]
pub struct SequenceInterpreter {
    config: InterpreterConfig,
    keys: Vec<Key>,
    count: Option<u32>,
    deadline: Option<Instant>,
    enabled: bool,
}

impl SequenceInterpreter {
    /// Create an interpreter with the given configuration.
    #[must_use]
    pub fn new(config: InterpreterConfig) -> Self {
        Self {
            config: config.validated(),
            keys: Vec::new(),
            count: None,
            deadline: None,
            enabled: true,
        }
    }

    /// Create an interpreter with default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(InterpreterConfig::default())
    }

    /// Process one key against the keymap.
    pub fn feed<T: Clone>(
        &mut self,
        keymap: &Keymap<T>,
        key: &Key,
        now: Instant,
    ) -> InterpreterOutput<T> {
        if !self.enabled {
            self.clear();
            return InterpreterOutput::Reset { pass_through: true };
        }

        // Count prefix: digits accumulate until the first chord key.
        // A leading 0 is a literal chord key, never a count.
        if self.keys.is_empty()
            && let Some(d) = key.digit()
            && (d != 0 || self.count.is_some())
        {
            let so_far = self.count.unwrap_or(0);
            self.count = Some(so_far.saturating_mul(10).saturating_add(d));
            self.deadline = Some(now + self.config.chord_timeout);
            return InterpreterOutput::Continue;
        }

        let fresh = self.keys.is_empty() && self.count.is_none();
        self.keys.push(*key);

        match keymap.lookup(&self.keys) {
            Lookup::Exact(value) => {
                let value = value.clone();
                let count = self.count.unwrap_or(1).max(1);
                self.clear();
                InterpreterOutput::Matched { value, count }
            }
            Lookup::Ambiguous(_) | Lookup::Prefix => {
                self.deadline = Some(now + self.config.chord_timeout);
                InterpreterOutput::Continue
            }
            Lookup::None => {
                self.clear();
                InterpreterOutput::Reset { pass_through: fresh }
            }
        }
    }

    /// Reset if the inter-key deadline has passed.
    ///
    /// Returns true when pending state was discarded.
    pub fn check_timeout(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.clear();
                true
            }
            _ => false,
        }
    }

    /// Whether a count or partial chord is outstanding.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        !self.keys.is_empty() || self.count.is_some()
    }

    /// The keys accumulated so far.
    #[must_use]
    pub fn pending_keys(&self) -> &[Key] {
        &self.keys
    }

    /// Discard all pending state.
    pub fn reset(&mut self) {
        self.clear();
    }

    /// Gate the interpreter. Disabling clears pending state; while
    /// disabled, every key passes through untouched.
    pub fn set_enabled(&mut self, enabled: bool) {
        if self.enabled != enabled {
            self.clear();
        }
        self.enabled = enabled;
    }

    /// Whether the interpreter is currently accepting keys.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn clear(&mut self) {
        self.keys.clear();
        self.count = None;
        self.deadline = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notation::parse_chord;

    fn map(entries: &[(&str, &'static str)]) -> Keymap<&'static str> {
        let mut m = Keymap::new();
        for (chord, v) in entries {
            m.insert(&parse_chord(chord).unwrap(), *v);
        }
        m
    }

    fn now() -> Instant {
        Instant::now()
    }

    #[test]
    fn single_key_resolves() {
        let m = map(&[("j", "down")]);
        let mut i = SequenceInterpreter::with_defaults();
        assert_eq!(
            i.feed(&m, &Key::char('j'), now()),
            InterpreterOutput::Matched {
                value: "down",
                count: 1
            }
        );
        assert!(!i.is_pending());
    }

    #[test]
    fn strict_prefix_continues_without_emitting() {
        let m = map(&[("g", "short"), ("gg", "top")]);
        let mut i = SequenceInterpreter::with_defaults();
        // "g" is bound but extended by "gg": must not emit yet.
        assert_eq!(i.feed(&m, &Key::char('g'), now()), InterpreterOutput::Continue);
        assert_eq!(
            i.feed(&m, &Key::char('g'), now()),
            InterpreterOutput::Matched {
                value: "top",
                count: 1
            }
        );
    }

    #[test]
    fn count_prefix_multiplies() {
        let m = map(&[("j", "down")]);
        let mut i = SequenceInterpreter::with_defaults();
        assert_eq!(i.feed(&m, &Key::char('1'), now()), InterpreterOutput::Continue);
        assert_eq!(i.feed(&m, &Key::char('2'), now()), InterpreterOutput::Continue);
        assert_eq!(
            i.feed(&m, &Key::char('j'), now()),
            InterpreterOutput::Matched {
                value: "down",
                count: 12
            }
        );
    }

    #[test]
    fn zero_after_digit_extends_count() {
        let m = map(&[("j", "down")]);
        let mut i = SequenceInterpreter::with_defaults();
        i.feed(&m, &Key::char('1'), now());
        i.feed(&m, &Key::char('0'), now());
        assert_eq!(
            i.feed(&m, &Key::char('j'), now()),
            InterpreterOutput::Matched {
                value: "down",
                count: 10
            }
        );
    }

    #[test]
    fn leading_zero_is_a_chord_key() {
        let m = map(&[("0", "home")]);
        let mut i = SequenceInterpreter::with_defaults();
        assert_eq!(
            i.feed(&m, &Key::char('0'), now()),
            InterpreterOutput::Matched {
                value: "home",
                count: 1
            }
        );
    }

    #[test]
    fn digit_after_chord_key_is_literal() {
        let m = map(&[("g2", "weird")]);
        let mut i = SequenceInterpreter::with_defaults();
        assert_eq!(i.feed(&m, &Key::char('g'), now()), InterpreterOutput::Continue);
        assert_eq!(
            i.feed(&m, &Key::char('2'), now()),
            InterpreterOutput::Matched {
                value: "weird",
                count: 1
            }
        );
    }

    #[test]
    fn first_key_miss_passes_through() {
        let m = map(&[("gg", "top")]);
        let mut i = SequenceInterpreter::with_defaults();
        assert_eq!(
            i.feed(&m, &Key::char('x'), now()),
            InterpreterOutput::Reset { pass_through: true }
        );
    }

    #[test]
    fn mid_chord_miss_is_consumed() {
        let m = map(&[("gg", "top")]);
        let mut i = SequenceInterpreter::with_defaults();
        i.feed(&m, &Key::char('g'), now());
        assert_eq!(
            i.feed(&m, &Key::char('x'), now()),
            InterpreterOutput::Reset {
                pass_through: false
            }
        );
        assert!(!i.is_pending());
    }

    #[test]
    fn miss_after_count_is_consumed() {
        let m = map(&[("j", "down")]);
        let mut i = SequenceInterpreter::with_defaults();
        i.feed(&m, &Key::char('3'), now());
        assert_eq!(
            i.feed(&m, &Key::char('x'), now()),
            InterpreterOutput::Reset {
                pass_through: false
            }
        );
    }

    #[test]
    fn timeout_resets_without_emitting() {
        let m = map(&[("gg", "top")]);
        let mut i = SequenceInterpreter::with_defaults();
        let t = now();
        i.feed(&m, &Key::char('g'), t);
        assert!(!i.check_timeout(t + Duration::from_millis(999)));
        assert!(i.is_pending());
        assert!(i.check_timeout(t + Duration::from_millis(1000)));
        assert!(!i.is_pending());
        // The sequence starts over cleanly afterwards.
        assert_eq!(i.feed(&m, &Key::char('g'), t), InterpreterOutput::Continue);
    }

    #[test]
    fn deadline_rearms_on_each_key() {
        let m = map(&[("ggg", "deep")]);
        let mut i = SequenceInterpreter::with_defaults();
        let t = now();
        i.feed(&m, &Key::char('g'), t);
        let t2 = t + Duration::from_millis(800);
        i.feed(&m, &Key::char('g'), t2);
        // 1000ms after the first key but only 200ms after the second.
        assert!(!i.check_timeout(t + Duration::from_millis(1000)));
        assert!(i.check_timeout(t2 + Duration::from_millis(1000)));
    }

    #[test]
    fn disabled_interpreter_passes_everything_through() {
        let m = map(&[("j", "down")]);
        let mut i = SequenceInterpreter::with_defaults();
        i.set_enabled(false);
        assert_eq!(
            i.feed(&m, &Key::char('j'), now()),
            InterpreterOutput::Reset { pass_through: true }
        );
    }

    #[test]
    fn disabling_clears_pending_state() {
        let m = map(&[("gg", "top")]);
        let mut i = SequenceInterpreter::with_defaults();
        i.feed(&m, &Key::char('g'), now());
        assert!(i.is_pending());
        i.set_enabled(false);
        assert!(!i.is_pending());
        i.set_enabled(true);
        assert_eq!(i.feed(&m, &Key::char('g'), now()), InterpreterOutput::Continue);
    }

    #[test]
    fn ambiguous_prefix_times_out_silently() {
        let m = map(&[("g", "short"), ("gg", "top")]);
        let mut i = SequenceInterpreter::with_defaults();
        let t = now();
        i.feed(&m, &Key::char('g'), t);
        assert!(i.check_timeout(t + Duration::from_millis(1500)));
        assert!(!i.is_pending());
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            // Any typed count followed by a bound key resolves with that count.
            #[test]
            fn typed_count_is_honored(n in 1u32..100_000) {
                let m = map(&[("j", "down")]);
                let mut i = SequenceInterpreter::with_defaults();
                let t = now();
                for c in n.to_string().chars() {
                    prop_assert_eq!(
                        i.feed(&m, &Key::char(c), t),
                        InterpreterOutput::Continue
                    );
                }
                prop_assert_eq!(
                    i.feed(&m, &Key::char('j'), t),
                    InterpreterOutput::Matched { value: "down", count: n }
                );
            }

            // No input stream leaves stale state behind a terminal output.
            #[test]
            fn resolution_and_mismatch_always_clear_state(s in "[a-z0-9]{0,16}") {
                let m = map(&[("g", "short"), ("gg", "top"), ("zz", "zoom")]);
                let mut i = SequenceInterpreter::with_defaults();
                let t = now();
                for c in s.chars() {
                    match i.feed(&m, &Key::char(c), t) {
                        InterpreterOutput::Matched { .. }
                        | InterpreterOutput::Reset { .. } => {
                            prop_assert!(!i.is_pending());
                        }
                        InterpreterOutput::Continue => {}
                    }
                }
            }
        }
    }

    #[test]
    fn config_clamps_timeout() {
        let config = InterpreterConfig::default()
            .with_timeout(Duration::from_millis(50))
            .validated();
        assert_eq!(config.chord_timeout, Duration::from_millis(100));

        let config = InterpreterConfig::default()
            .with_timeout(Duration::from_secs(60))
            .validated();
        assert_eq!(config.chord_timeout, Duration::from_millis(10_000));
    }
}
