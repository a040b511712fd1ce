#![forbid(unsafe_code)]

//! Blacklist pattern matching.
//!
//! A pattern is `host[:port][/path]`, with `*` wildcards allowed. The host
//! component must equal the URL's `host[:port]`; no substring containment.
//! A path component blacklists that exact path and its segment children:
//! `example.com/a` matches `/a` and `/a/b` but never `/ab`. A pattern with
//! no path matches every path on its host.
//!
//! A matching URL disables the whole key sequence engine for that page.

use std::fmt;

use url::Url;

/// Error parsing a blacklist pattern string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternError {
    /// The pattern was empty or had an empty host component.
    EmptyHost,
}

impl fmt::Display for PatternError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyHost => write!(f, "blacklist pattern has an empty host"),
        }
    }
}

impl std::error::Error for PatternError {}

/// One parsed blacklist pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    host: String,
    path: Option<String>,
}

impl Pattern {
    /// Parse a `host[:port][/path]` pattern.
    ///
    /// A scheme prefix (`https://`) is tolerated and stripped. A trailing
    /// slash on the path is ignored; a bare trailing `/` means "any path",
    /// same as no path at all.
    pub fn parse(pattern: &str) -> Result<Self, PatternError> {
        let pattern = pattern.trim();
        let pattern = pattern
            .split_once("://")
            .map_or(pattern, |(_, rest)| rest);

        let (host, path) = match pattern.split_once('/') {
            Some((host, path)) => (host, Some(format!("/{path}"))),
            None => (pattern, None),
        };
        if host.is_empty() {
            return Err(PatternError::EmptyHost);
        }

        let path = path
            .map(|p| {
                let trimmed = p.trim_end_matches('/');
                if trimmed.is_empty() {
                    "/".to_string()
                } else {
                    trimmed.to_string()
                }
            })
            .filter(|p| p != "/");

        Ok(Self {
            host: host.to_ascii_lowercase(),
            path,
        })
    }

    /// Whether this pattern matches the URL.
    #[must_use]
    pub fn matches(&self, url: &Url) -> bool {
        let Some(host) = url.host_str() else {
            return false;
        };
        let host_port = match url.port() {
            Some(port) => format!("{host}:{port}"),
            None => host.to_string(),
        };
        if !glob_eq(&self.host, &host_port.to_ascii_lowercase()) {
            return false;
        }

        match &self.path {
            None => true,
            Some(pat) => path_matches(pat, url.path()),
        }
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.path {
            Some(path) => write!(f, "{}{}", self.host, path),
            None => write!(f, "{}", self.host),
        }
    }
}

/// Segment-boundary-aware path prefix match, with `*` globbing.
///
/// `/a` matches `/a` and `/a/b`, never `/ab`.
fn path_matches(pattern: &str, path: &str) -> bool {
    if pattern.contains('*') {
        return glob_eq(pattern, path) || glob_eq(&format!("{pattern}/*"), path);
    }
    path == pattern || path.strip_prefix(pattern).is_some_and(|rest| rest.starts_with('/'))
}

/// Whole-string glob equality where `*` spans any run of characters.
fn glob_eq(pattern: &str, text: &str) -> bool {
    if !pattern.contains('*') {
        return pattern == text;
    }
    let mut remaining = text;
    let mut parts = pattern.split('*').peekable();
    let mut first = true;
    while let Some(part) = parts.next() {
        let last = parts.peek().is_none();
        if first && !remaining.starts_with(part) {
            return false;
        }
        if last {
            return if first {
                remaining == part
            } else {
                remaining.ends_with(part)
            };
        }
        if first {
            remaining = &remaining[part.len()..];
        } else if part.is_empty() {
            // consecutive stars collapse
        } else if let Some(idx) = remaining.find(part) {
            remaining = &remaining[idx + part.len()..];
        } else {
            return false;
        }
        first = false;
    }
    true
}

/// An ordered set of blacklist patterns.
#[derive(Debug, Clone, Default)]
pub struct Blacklist {
    patterns: Vec<Pattern>,
}

impl Blacklist {
    /// Create an empty blacklist.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from parsed patterns.
    #[must_use]
    pub fn from_patterns(patterns: Vec<Pattern>) -> Self {
        Self { patterns }
    }

    /// Add one pattern.
    pub fn push(&mut self, pattern: Pattern) {
        self.patterns.push(pattern);
    }

    /// Number of patterns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// Whether the blacklist is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Whether any pattern matches the URL.
    #[must_use]
    pub fn matches(&self, url: &Url) -> bool {
        self.patterns.iter().any(|p| p.matches(url))
    }
}
