#![forbid(unsafe_code)]

//! Input layer: key model, chord notation, keymap trie, and the sequence
//! interpreter.
//!
//! # Role in keynav
//! `keynav-input` turns a stream of raw key events into resolved keymap
//! values. It owns the canonical [`Key`](event::Key) type, the textual chord
//! notation (`gg`, `<C-u>`), the [`Keymap`](keymap::Keymap) trie, and the
//! [`SequenceInterpreter`](interpreter::SequenceInterpreter) state machine
//! that accumulates counted multi-key chords against a keymap.
//!
//! # How it fits in the system
//! The engine crate (`keynav-engine`) feeds browser key events into the
//! interpreter and executes whatever operation the keymap resolves. This
//! crate knows nothing about tabs, consoles, or URLs.

pub mod event;
pub mod interpreter;
pub mod keymap;
pub mod notation;

pub use event::{Key, KeyCode, Modifiers};
pub use interpreter::{InterpreterConfig, InterpreterOutput, SequenceInterpreter};
pub use keymap::{Keymap, Lookup};
pub use notation::{parse_chord, NotationError};
