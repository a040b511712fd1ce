#![forbid(unsafe_code)]

//! Console layer: ex-command parsing and search/URL resolution.
//!
//! # Role in keynav
//! A console line like `tabopen yahoo an apple` is split by [`ex::parse`]
//! into a command name and raw arguments, and the arguments are turned into
//! a concrete navigation URL by [`search::resolve`], which disambiguates an
//! explicit engine search, an absolute URL, a bare domain, and an implicit
//! default-engine search.
//!
//! Both halves are pure: no browser state, no I/O.

pub mod ex;
pub mod search;

pub use ex::ExCommand;
pub use search::{resolve, ResolveError, SearchEngines, TemplateError};
