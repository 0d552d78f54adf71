//! Tower layer running the rule chain in front of a service.
//!
//! # Request Flow
//!
//! ```text
//! Request
//!   ↓
//! Bypass predicate → true: forwarded untouched
//!   ↓
//! Body buffered (up to the body limit)
//!   ↓
//! Rule chain over (Content-Type, body)
//!   ↓                         ↓
//! pass: verdict stored,     fail: verdict stored,
//! Validated inserted,       error handler answers,
//! body restored, forwarded  inner service never called
//! ```

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::body::Body;
use axum::extract::Request;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use tower::{Layer, Service};

use super::{Validated, ValidationLocals};
use crate::config::Config;
use crate::error::Error;
use crate::request::RequestBody;
use crate::validator::Validator;

/// Layer that validates request bodies before they reach the inner service.
///
/// # Examples
///
/// ```
/// use axum::{routing::post, Router};
/// use body_validator::{Config, RestrictUnicode, ValidatorLayer};
///
/// let app: Router = Router::new()
///     .route("/users", post(|| async { "created" }))
///     .layer(ValidatorLayer::new(
///         Config::default().rule(RestrictUnicode::new(["name", "email"])),
///     ));
/// ```
#[derive(Debug, Clone)]
pub struct ValidatorLayer {
    validator: Arc<Validator>,
}

impl ValidatorLayer {
    /// Creates the layer from a configuration.
    pub fn new(config: Config) -> Self {
        Self {
            validator: Arc::new(Validator::new(config)),
        }
    }

    /// Returns the validator shared by every service this layer builds.
    pub fn validator(&self) -> &Validator {
        &self.validator
    }
}

impl Default for ValidatorLayer {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl<S> Layer<S> for ValidatorLayer {
    type Service = ValidatorService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        ValidatorService {
            inner,
            validator: Arc::clone(&self.validator),
        }
    }
}

/// Service produced by [`ValidatorLayer`].
#[derive(Debug, Clone)]
pub struct ValidatorService<S> {
    inner: S,
    validator: Arc<Validator>,
}

impl<S> Service<Request> for ValidatorService<S>
where
    S: Service<Request, Response = Response> + Clone + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request) -> Self::Future {
        // Keep the service that was polled ready; leave a fresh clone behind.
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);
        let validator = Arc::clone(&self.validator);

        Box::pin(async move {
            if validator.should_skip(&request) {
                tracing::debug!(uri = %request.uri(), "validation skipped");
                return inner.call(request).await;
            }

            let (mut parts, body) = request.into_parts();
            let bytes = match axum::body::to_bytes(body, validator.config().body_limit()).await {
                Ok(bytes) => bytes,
                Err(err) => {
                    let err = Error::from(err);
                    tracing::warn!(uri = %parts.uri, error = %err, "could not buffer request body");
                    return Ok(err.into_response());
                }
            };

            let content_type = parts
                .headers
                .get(header::CONTENT_TYPE)
                .and_then(|value| value.to_str().ok());
            let verdict = validator.validate(&RequestBody::new(content_type, &bytes[..]));

            if let Some(key) = validator.config().context_key() {
                ValidationLocals::record(&mut parts.extensions, key, verdict.clone().err());
            }

            match verdict {
                Ok(()) => {
                    parts.extensions.insert(Validated);
                    inner
                        .call(Request::from_parts(parts, Body::from(bytes)))
                        .await
                }
                Err(err) => Ok(validator.error_response(&parts, err)),
            }
        })
    }
}
