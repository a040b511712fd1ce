#![forbid(unsafe_code)]

//! Engine error taxonomy.
//!
//! Every user action fails at most once, with one of these reported to the
//! console surface; engine state stays consistent afterwards, so the next
//! action is unaffected.

use std::fmt;

use keynav_console::ResolveError;

use crate::capabilities::CapabilityError;
use crate::marks::MarkError;

/// A reported failure of one user action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// Console command name not in the command set.
    UnknownCommand(String),

    /// Operation name not in the operation set (settings input only; the
    /// dispatch path is a closed enum).
    UnknownOperation(String),

    /// `buffer` selector matched no open tab.
    TabNotFound(String),

    /// Mark lookup or label failure.
    Mark(MarkError),

    /// Search/URL resolution failure.
    Resolve(ResolveError),

    /// A capability call failed.
    Capability(CapabilityError),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownCommand(name) => write!(f, "unknown command '{name}'"),
            Self::UnknownOperation(name) => write!(f, "unknown operation '{name}'"),
            Self::TabNotFound(keyword) => write!(f, "no tab matching '{keyword}'"),
            Self::Mark(e) => write!(f, "{e}"),
            Self::Resolve(e) => write!(f, "{e}"),
            Self::Capability(e) => write!(f, "browser error: {e}"),
        }
    }
}

impl std::error::Error for EngineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Mark(e) => Some(e),
            Self::Resolve(e) => Some(e),
            Self::Capability(e) => Some(e),
            Self::UnknownCommand(_) | Self::UnknownOperation(_) | Self::TabNotFound(_) => None,
        }
    }
}

impl From<MarkError> for EngineError {
    fn from(e: MarkError) -> Self {
        Self::Mark(e)
    }
}

impl From<ResolveError> for EngineError {
    fn from(e: ResolveError) -> Self {
        Self::Resolve(e)
    }
}

impl From<CapabilityError> for EngineError {
    fn from(e: CapabilityError) -> Self {
        Self::Capability(e)
    }
}
