#![forbid(unsafe_code)]

//! Canonical key event types.
//!
//! A [`Key`] is the normalized form of a host key event: a [`KeyCode`] plus
//! held [`Modifiers`]. All types derive `Clone`, `PartialEq`, `Eq`, and
//! `Hash` so keys can serve as trie edges and appear in tests directly.
//!
//! # Design Notes
//!
//! - Letter case is carried in the character itself: `Key::char('G')` is the
//!   shifted form of `g`, with no separate SHIFT flag. The SHIFT flag is
//!   meaningful only for named keys (`<S-Esc>`).
//! - Only key-down events exist; the host never delivers repeats or releases
//!   to this layer.

use bitflags::bitflags;

/// A single normalized key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Key {
    /// The key that was pressed.
    pub code: KeyCode,

    /// Modifier keys held during the press.
    pub modifiers: Modifiers,
}

impl Key {
    /// Create a key with no modifiers.
    #[must_use]
    pub const fn new(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: Modifiers::NONE,
        }
    }

    /// Create a plain character key.
    #[must_use]
    pub const fn char(c: char) -> Self {
        Self::new(KeyCode::Char(c))
    }

    /// Create a Ctrl+char key.
    #[must_use]
    pub const fn ctrl(c: char) -> Self {
        Self::new(KeyCode::Char(c)).with_modifiers(Modifiers::CTRL)
    }

    /// Attach modifiers.
    #[must_use]
    pub const fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Check if this is a specific unmodified character key.
    #[must_use]
    pub fn is_char(&self, c: char) -> bool {
        self.modifiers.is_empty() && matches!(self.code, KeyCode::Char(ch) if ch == c)
    }

    /// The decimal value of this key if it is an unmodified digit key.
    #[must_use]
    pub fn digit(&self) -> Option<u32> {
        if !self.modifiers.is_empty() {
            return None;
        }
        match self.code {
            KeyCode::Char(c) => c.to_digit(10),
            _ => None,
        }
    }
}

/// Key codes for normalized key events.
///
/// Covers printable characters plus the named keys a web page can observe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// A regular character key. Case-sensitive: `Char('G')` is shifted `g`.
    Char(char),

    /// Enter/Return key.
    Enter,

    /// Escape key.
    Escape,

    /// Backspace key.
    Backspace,

    /// Tab key.
    Tab,

    /// Delete key.
    Delete,

    /// Home key.
    Home,

    /// End key.
    End,

    /// Page Up key.
    PageUp,

    /// Page Down key.
    PageDown,

    /// Up arrow key.
    Up,

    /// Down arrow key.
    Down,

    /// Left arrow key.
    Left,

    /// Right arrow key.
    Right,

    /// Function key (F1-F12).
    F(u8),
}

bitflags! {
    /// Modifier keys that can be held during a key event.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        /// No modifiers.
        const NONE  = 0b0000;
        /// Shift key (named keys only; characters carry their own case).
        const SHIFT = 0b0001;
        /// Alt/Option key.
        const ALT   = 0b0010;
        /// Control key.
        const CTRL  = 0b0100;
        /// Meta/Command key.
        const META  = 0b1000;
    }
}

impl Default for Modifiers {
    fn default() -> Self {
        Self::NONE
    }
}
