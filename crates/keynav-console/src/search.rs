#![forbid(unsafe_code)]

//! Search engine and URL resolution.
//!
//! Turns the raw argument string of a console command into a navigation
//! URL. The precedence is fixed, first match wins:
//!
//! 1. empty arguments → default engine, empty query
//! 2. leading token names a registered engine → that engine, remainder as
//!    the query (possibly empty)
//! 3. the whole string is an absolute URL → navigate to it unchanged
//! 4. the whole string is a single dotted token → `https://` + token
//! 5. anything else → default engine, whole string as the query
//!
//! The ordering is the disambiguation rule; there is no "ambiguous" error.
//! Resolution is pure: the same arguments always produce the same URL.

use std::fmt;

use ahash::AHashMap;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use url::Url;

/// Placeholder in engine URL templates replaced by the encoded query.
pub const QUERY_PLACEHOLDER: &str = "{}";

/// Encode everything except RFC 3986 unreserved characters, so a space
/// always becomes `%20`.
const QUERY_ENCODE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Schemes accepted as navigation targets even without an authority.
const OPAQUE_SCHEMES: &[&str] = &["about", "data", "javascript", "view-source", "file", "mailto"];

/// Registered search engines: name → URL template, plus a default engine.
#[derive(Debug, Clone, Default)]
pub struct SearchEngines {
    default_name: String,
    templates: AHashMap<String, String>,
}

/// Error registering an engine template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    /// The template has no `{}` placeholder.
    MissingPlaceholder,
}

impl fmt::Display for TemplateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingPlaceholder => {
                write!(f, "engine template has no '{QUERY_PLACEHOLDER}' placeholder")
            }
        }
    }
}

impl std::error::Error for TemplateError {}

impl SearchEngines {
    /// Create an empty table with the given default engine name.
    #[must_use]
    pub fn new(default_name: impl Into<String>) -> Self {
        Self {
            default_name: default_name.into(),
            templates: AHashMap::new(),
        }
    }

    /// Register an engine. Replaces an existing engine of the same name.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        template: impl Into<String>,
    ) -> Result<(), TemplateError> {
        let template = template.into();
        if !template.contains(QUERY_PLACEHOLDER) {
            return Err(TemplateError::MissingPlaceholder);
        }
        self.templates.insert(name.into(), template);
        Ok(())
    }

    /// Whether an engine of this name is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.templates.contains_key(name)
    }

    /// The designated default engine name.
    #[must_use]
    pub fn default_name(&self) -> &str {
        &self.default_name
    }

    /// Number of registered engines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    /// Whether no engines are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    fn template(&self, name: &str) -> Option<&str> {
        self.templates.get(name).map(String::as_str)
    }
}

/// Error resolving arguments to a navigation URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// The engine table has no registered default engine.
    NoDefaultEngine,

    /// An engine template did not produce a parsable URL.
    InvalidTemplate {
        /// Name of the offending engine.
        engine: String,
    },
}

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoDefaultEngine => write!(f, "no default search engine is registered"),
            Self::InvalidTemplate { engine } => {
                write!(f, "search engine '{engine}' has an invalid URL template")
            }
        }
    }
}

impl std::error::Error for ResolveError {}

/// Resolve a raw argument string to a navigation URL.
pub fn resolve(raw_args: &str, engines: &SearchEngines) -> Result<Url, ResolveError> {
    let args = raw_args.trim();
    if args.is_empty() {
        return search_url(engines, engines.default_name(), "");
    }

    // An explicit engine selector wins over every other reading, with or
    // without keywords after it.
    if let Some((first, rest)) = split_first_token(args)
        && engines.contains(first)
    {
        return search_url(engines, first, rest);
    }

    if !args.contains(char::is_whitespace) {
        if let Some(url) = parse_absolute(args) {
            return Ok(url);
        }
        if args.contains('.')
            && let Ok(url) = Url::parse(&format!("https://{args}"))
        {
            return Ok(url);
        }
    }

    search_url(engines, engines.default_name(), args)
}

/// Split off the first whitespace-delimited token; `None` for a single
/// token with nothing after it.
fn split_first_token(args: &str) -> Option<(&str, &str)> {
    match args.split_once(char::is_whitespace) {
        Some((first, rest)) => Some((first, rest.trim_start())),
        None => Some((args, "")),
    }
}

/// Parse as an absolute URL usable as a navigation target.
///
/// Requires a host, or one of the schemes that are meaningful without an
/// authority. This keeps `localhost:8080`-ish strings from being read as
/// scheme + opaque path.
fn parse_absolute(s: &str) -> Option<Url> {
    let url = Url::parse(s).ok()?;
    if url.has_host() || OPAQUE_SCHEMES.contains(&url.scheme()) {
        Some(url)
    } else {
        None
    }
}

fn search_url(engines: &SearchEngines, name: &str, query: &str) -> Result<Url, ResolveError> {
    let Some(template) = engines.template(name) else {
        return Err(ResolveError::NoDefaultEngine);
    };
    let encoded = utf8_percent_encode(query, QUERY_ENCODE).to_string();
    let filled = template.replacen(QUERY_PLACEHOLDER, &encoded, 1);
    Url::parse(&filled).map_err(|_| ResolveError::InvalidTemplate {
        engine: name.to_string(),
    })
}
