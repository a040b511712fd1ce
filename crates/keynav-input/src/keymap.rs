#![forbid(unsafe_code)]

//! Keymap trie.
//!
//! Maps ordered key sequences (chord paths) to values. Lookup distinguishes
//! the four cases the interpreter needs:
//!
//! - [`Lookup::Exact`]: the path is bound and nothing longer extends it.
//! - [`Lookup::Ambiguous`]: the path is bound but longer entries extend it,
//!   so the interpreter must keep waiting.
//! - [`Lookup::Prefix`]: the path is unbound but some entry extends it.
//! - [`Lookup::None`]: no entry starts with this path.
//!
//! Insertion order carries no precedence; binding the same full path twice
//! replaces the earlier value.

use ahash::AHashMap;

use crate::event::Key;

/// Outcome of looking up a chord path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup<'a, T> {
    /// Bound, and no longer entry extends the path.
    Exact(&'a T),

    /// Bound, but at least one longer entry extends the path.
    Ambiguous(&'a T),

    /// Unbound strict prefix of at least one entry.
    Prefix,

    /// No entry starts with this path.
    None,
}

#[derive(Debug, Clone)]
struct Node<T> {
    value: Option<T>,
    children: AHashMap<Key, Node<T>>,
}

impl<T> Default for Node<T> {
    fn default() -> Self {
        Self {
            value: None,
            children: AHashMap::new(),
        }
    }
}

/// Trie from key sequences to values.
#[derive(Debug, Clone)]
pub struct Keymap<T> {
    root: Node<T>,
    len: usize,
}

impl<T> Default for Keymap<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Keymap<T> {
    /// Create an empty keymap.
    #[must_use]
    pub fn new() -> Self {
        Self {
            root: Node::default(),
            len: 0,
        }
    }

    /// Number of bound chord paths.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether no paths are bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Bind a chord path to a value.
    ///
    /// Returns the previously bound value if the full path was already
    /// taken. Binding an empty path is a no-op returning `None`.
    pub fn insert(&mut self, path: &[Key], value: T) -> Option<T> {
        if path.is_empty() {
            return None;
        }
        let mut node = &mut self.root;
        for key in path {
            node = node.children.entry(*key).or_default();
        }
        let old = node.value.replace(value);
        if old.is_none() {
            self.len += 1;
        }
        old
    }

    /// Look up a chord path.
    #[must_use]
    pub fn lookup(&self, path: &[Key]) -> Lookup<'_, T> {
        let mut node = &self.root;
        for key in path {
            match node.children.get(key) {
                Some(child) => node = child,
                None => return Lookup::None,
            }
        }
        match (&node.value, node.children.is_empty()) {
            (Some(v), true) => Lookup::Exact(v),
            (Some(v), false) => Lookup::Ambiguous(v),
            (None, false) => Lookup::Prefix,
            // Unreachable for non-empty paths (leaves always hold values),
            // but an empty path lands here on an empty keymap.
            (None, true) => Lookup::None,
        }
    }
}
