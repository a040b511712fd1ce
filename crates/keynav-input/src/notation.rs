#![forbid(unsafe_code)]

//! Textual chord notation.
//!
//! Keymap entries in settings are written as chord strings: a run of plain
//! characters, with bracketed groups for modified or named keys.
//!
//! ```text
//! gg          two plain keys: g, g
//! <C-u>       Ctrl+u
//! m<S-Esc>    m, then Shift+Escape
//! <F2>        function key
//! ```
//!
//! Modifier prefixes inside brackets: `C-` (Ctrl), `S-` (Shift), `A-` (Alt),
//! `M-` (Meta). Letter case outside brackets is significant (`G` is shifted
//! `g`); the `S-` prefix is for named keys.

use std::fmt;

use crate::event::{Key, KeyCode, Modifiers};

/// Error raised while parsing a chord string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotationError {
    /// The chord string was empty.
    EmptyChord,

    /// A `<` group was never closed.
    UnclosedBracket,

    /// A bracket group contained no key name.
    EmptyBracket,

    /// The key name inside a bracket group was not recognized.
    UnknownKeyName(String),
}

impl fmt::Display for NotationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyChord => write!(f, "empty chord string"),
            Self::UnclosedBracket => write!(f, "unclosed '<' in chord string"),
            Self::EmptyBracket => write!(f, "empty '<>' group in chord string"),
            Self::UnknownKeyName(name) => write!(f, "unknown key name '{name}'"),
        }
    }
}

impl std::error::Error for NotationError {}

/// Parse a chord string into a key sequence.
pub fn parse_chord(s: &str) -> Result<Vec<Key>, NotationError> {
    let mut keys = Vec::new();
    let mut chars = s.chars();

    while let Some(c) = chars.next() {
        if c == '<' {
            let mut group = String::new();
            let mut closed = false;
            for g in chars.by_ref() {
                if g == '>' {
                    closed = true;
                    break;
                }
                group.push(g);
            }
            if !closed {
                return Err(NotationError::UnclosedBracket);
            }
            keys.push(parse_group(&group)?);
        } else {
            keys.push(Key::char(c));
        }
    }

    if keys.is_empty() {
        return Err(NotationError::EmptyChord);
    }
    Ok(keys)
}

/// Parse the inside of one `<...>` group.
fn parse_group(group: &str) -> Result<Key, NotationError> {
    if group.is_empty() {
        return Err(NotationError::EmptyBracket);
    }

    let mut modifiers = Modifiers::NONE;
    let mut rest = group;

    loop {
        let Some((prefix, tail)) = rest.split_once('-') else {
            break;
        };
        let flag = match prefix {
            "C" | "c" => Modifiers::CTRL,
            "S" | "s" => Modifiers::SHIFT,
            "A" | "a" => Modifiers::ALT,
            "M" | "m" => Modifiers::META,
            _ => break,
        };
        // A trailing '-' key like <C--> keeps its final dash as the key.
        if tail.is_empty() {
            break;
        }
        modifiers |= flag;
        rest = tail;
    }

    let code = parse_key_name(rest)?;
    Ok(Key::new(code).with_modifiers(modifiers))
}

fn parse_key_name(name: &str) -> Result<KeyCode, NotationError> {
    let mut chars = name.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        return Ok(KeyCode::Char(c));
    }

    let code = match name.to_ascii_lowercase().as_str() {
        "esc" | "escape" => KeyCode::Escape,
        "cr" | "enter" | "return" => KeyCode::Enter,
        "space" => KeyCode::Char(' '),
        "tab" => KeyCode::Tab,
        "bs" | "backspace" => KeyCode::Backspace,
        "del" | "delete" => KeyCode::Delete,
        "home" => KeyCode::Home,
        "end" => KeyCode::End,
        "pageup" => KeyCode::PageUp,
        "pagedown" => KeyCode::PageDown,
        "up" => KeyCode::Up,
        "down" => KeyCode::Down,
        "left" => KeyCode::Left,
        "right" => KeyCode::Right,
        lower => {
            if let Some(n) = lower.strip_prefix('f')
                && let Ok(n) = n.parse::<u8>()
                && (1..=12).contains(&n)
            {
                KeyCode::F(n)
            } else {
                return Err(NotationError::UnknownKeyName(name.to_string()));
            }
        }
    };
    Ok(code)
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self.code {
            KeyCode::Char(' ') => "Space".to_string(),
            KeyCode::Char(c) => c.to_string(),
            KeyCode::Enter => "Enter".to_string(),
            KeyCode::Escape => "Esc".to_string(),
            KeyCode::Backspace => "BS".to_string(),
            KeyCode::Tab => "Tab".to_string(),
            KeyCode::Delete => "Del".to_string(),
            KeyCode::Home => "Home".to_string(),
            KeyCode::End => "End".to_string(),
            KeyCode::PageUp => "PageUp".to_string(),
            KeyCode::PageDown => "PageDown".to_string(),
            KeyCode::Up => "Up".to_string(),
            KeyCode::Down => "Down".to_string(),
            KeyCode::Left => "Left".to_string(),
            KeyCode::Right => "Right".to_string(),
            KeyCode::F(n) => format!("F{n}"),
        };
        let plain_char = matches!(self.code, KeyCode::Char(c) if c != ' ');

        if self.modifiers.is_empty() && plain_char {
            return write!(f, "{name}");
        }
        write!(f, "<")?;
        if self.modifiers.contains(Modifiers::CTRL) {
            write!(f, "C-")?;
        }
        if self.modifiers.contains(Modifiers::SHIFT) {
            write!(f, "S-")?;
        }
        if self.modifiers.contains(Modifiers::ALT) {
            write!(f, "A-")?;
        }
        if self.modifiers.contains(Modifiers::META) {
            write!(f, "M-")?;
        }
        write!(f, "{name}>")
    }
}

/// Render a key sequence back to chord notation.
#[must_use]
pub fn format_chord(keys: &[Key]) -> String {
    keys.iter().map(ToString::to_string).collect()
}
