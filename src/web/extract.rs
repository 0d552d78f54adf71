//! Verdicts left on the request for downstream handlers.

use std::collections::HashMap;
use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::Extensions;

use crate::error::ValidationError;

/// Marker extension inserted when every rule passed.
///
/// # Examples
///
/// ```
/// use axum::extract::Request;
/// use body_validator::web::Validated;
///
/// async fn handler(request: Request) -> &'static str {
///     if request.extensions().get::<Validated>().is_some() {
///         "validated"
///     } else {
///         "not validated"
///     }
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Validated;

/// Validation verdicts stored by context key.
///
/// When the middleware is configured with a context key it records the
/// outcome of the chain here: `None` if the body passed, the failure
/// otherwise. The value is available as a request extension and as an
/// extractor that never rejects.
///
/// # Examples
///
/// ```
/// use body_validator::web::ValidationLocals;
///
/// async fn handler(locals: ValidationLocals) -> String {
///     match locals.get("validation") {
///         Some(None) => "passed".to_string(),
///         Some(Some(err)) => format!("failed: {}", err),
///         None => "not validated".to_string(),
///     }
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationLocals {
    verdicts: HashMap<String, Option<ValidationError>>,
}

impl ValidationLocals {
    /// Returns the verdict stored under `key`.
    ///
    /// The outer `Option` is `None` when nothing was stored under `key`; the
    /// inner one is `None` when the body passed.
    pub fn get(&self, key: &str) -> Option<Option<&ValidationError>> {
        self.verdicts.get(key).map(Option::as_ref)
    }

    /// Returns the failure stored under `key`, if any.
    pub fn error(&self, key: &str) -> Option<&ValidationError> {
        self.get(key).flatten()
    }

    /// Returns `true` if a verdict was stored under `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.verdicts.contains_key(key)
    }

    /// Stores a verdict, replacing any earlier one under the same key.
    pub fn insert(&mut self, key: impl Into<String>, verdict: Option<ValidationError>) {
        self.verdicts.insert(key.into(), verdict);
    }

    /// Stores a verdict in the locals of `extensions`, creating them if needed.
    pub(crate) fn record(
        extensions: &mut Extensions,
        key: &str,
        verdict: Option<ValidationError>,
    ) {
        match extensions.get_mut::<ValidationLocals>() {
            Some(locals) => locals.insert(key, verdict),
            None => {
                let mut locals = ValidationLocals::default();
                locals.insert(key, verdict);
                extensions.insert(locals);
            }
        }
    }
}

impl<S> FromRequestParts<S> for ValidationLocals
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts
            .extensions
            .get::<ValidationLocals>()
            .cloned()
            .unwrap_or_default())
    }
}
