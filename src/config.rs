use std::fmt;
use std::sync::Arc;

use axum::extract::Request;
use axum::http::request::Parts;
use axum::response::Response;

use crate::error::ValidationError;
use crate::response::default_error_handler;
use crate::rules::Restrictor;

/// Predicate deciding whether a request skips validation entirely.
pub type NextFn = Arc<dyn Fn(&Request) -> bool + Send + Sync>;

/// Builds the response for a failed validation.
pub type ErrorHandler = Arc<dyn Fn(&Parts, ValidationError) -> Response + Send + Sync>;

/// Largest body buffered for validation unless configured otherwise (2 MiB).
pub const DEFAULT_BODY_LIMIT: usize = 2 * 1024 * 1024;

/// Configuration for the validation middleware.
///
/// `Config::default()` has no rules (every request passes), no bypass
/// predicate, the content-type aware error handler, no context key, and a
/// 2 MiB body limit. Each middleware instance takes its own copy.
///
/// # Examples
///
/// ```
/// use body_validator::{Config, RestrictNumberOnly, RestrictUnicode};
///
/// let config = Config::default()
///     .rule(RestrictUnicode::new(["name", "email"]))
///     .rule(RestrictNumberOnly::new(["age"]).max(120))
///     .with_context_key("validation")
///     .with_next(|request| request.uri().path() == "/health");
///
/// assert_eq!(config.rules().len(), 2);
/// assert_eq!(config.context_key(), Some("validation"));
/// ```
#[derive(Clone)]
pub struct Config {
    rules: Vec<Arc<dyn Restrictor>>,
    next: Option<NextFn>,
    error_handler: ErrorHandler,
    context_key: Option<String>,
    body_limit: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rules: Vec::new(),
            next: None,
            error_handler: Arc::new(default_error_handler),
            context_key: None,
            body_limit: DEFAULT_BODY_LIMIT,
        }
    }
}

impl Config {
    /// Replaces the rule chain.
    pub fn with_rules(mut self, rules: Vec<Arc<dyn Restrictor>>) -> Self {
        self.rules = rules;
        self
    }

    /// Appends a rule to the chain.
    pub fn rule(mut self, rule: impl Restrictor + 'static) -> Self {
        self.rules.push(Arc::new(rule));
        self
    }

    /// Skips validation for requests where `next` returns `true`.
    pub fn with_next<F>(mut self, next: F) -> Self
    where
        F: Fn(&Request) -> bool + Send + Sync + 'static,
    {
        self.next = Some(Arc::new(next));
        self
    }

    /// Replaces the default error formatting.
    ///
    /// The handler receives the request parts and the failure and has full
    /// control over the response.
    pub fn with_error_handler<F>(mut self, handler: F) -> Self
    where
        F: Fn(&Parts, ValidationError) -> Response + Send + Sync + 'static,
    {
        self.error_handler = Arc::new(handler);
        self
    }

    /// Stores each request's verdict under `key` in its [`ValidationLocals`].
    ///
    /// [`ValidationLocals`]: crate::web::ValidationLocals
    pub fn with_context_key(mut self, key: impl Into<String>) -> Self {
        self.context_key = Some(key.into());
        self
    }

    /// Sets the largest body, in bytes, buffered for validation.
    pub fn with_body_limit(mut self, limit: usize) -> Self {
        self.body_limit = limit;
        self
    }

    /// Returns the configured rule chain.
    pub fn rules(&self) -> &[Arc<dyn Restrictor>] {
        &self.rules
    }

    /// Returns the configured context key.
    pub fn context_key(&self) -> Option<&str> {
        self.context_key.as_deref()
    }

    /// Returns the body limit in bytes.
    pub fn body_limit(&self) -> usize {
        self.body_limit
    }

    pub(crate) fn next(&self) -> Option<&NextFn> {
        self.next.as_ref()
    }

    pub(crate) fn error_handler(&self) -> &ErrorHandler {
        &self.error_handler
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rules: Vec<&str> = self.rules.iter().map(|rule| rule.name()).collect();
        f.debug_struct("Config")
            .field("rules", &rules)
            .field("next", &self.next.is_some())
            .field("context_key", &self.context_key)
            .field("body_limit", &self.body_limit)
            .finish_non_exhaustive()
    }
}
