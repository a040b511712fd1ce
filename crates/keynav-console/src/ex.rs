#![forbid(unsafe_code)]

//! Ex-command line splitting.
//!
//! A console line is split on its first whitespace run: the text before it
//! is the command name (case-sensitive), everything after is the raw
//! argument string with internal whitespace preserved verbatim. Name
//! validation happens at dispatch, not here; every line parses.

/// A parsed console line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExCommand {
    /// First whitespace-delimited token, empty for a blank line.
    pub name: String,

    /// Remainder of the line, trimmed at both ends, inner whitespace kept.
    pub raw_args: String,
}

impl ExCommand {
    /// Whether the line was blank (the caller treats this as "close the
    /// console, do nothing").
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_empty()
    }
}

/// Split a console line into name and raw arguments.
#[must_use]
pub fn parse(line: &str) -> ExCommand {
    let line = line.trim();
    match line.split_once(char::is_whitespace) {
        Some((name, rest)) => ExCommand {
            name: name.to_string(),
            raw_args: rest.trim().to_string(),
        },
        None => ExCommand {
            name: line.to_string(),
            raw_args: String::new(),
        },
    }
}
