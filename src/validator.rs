use axum::extract::Request;
use axum::http::request::Parts;
use axum::response::Response;

use crate::config::Config;
use crate::error::ValidationError;
use crate::request::RequestBody;

/// Runs a rule chain against request bodies.
///
/// `Validator` is the framework-agnostic half of the middleware: it holds
/// the configuration and decides, for one request, whether the chain is
/// skipped, which rule fails first, and how the failure is answered.
///
/// # Examples
///
/// ```
/// use body_validator::{Config, RequestBody, RestrictNumberOnly, RestrictUnicode, Validator};
///
/// let validator = Validator::new(
///     Config::default()
///         .rule(RestrictUnicode::new(["name"]))
///         .rule(RestrictNumberOnly::new(["age"]).max(100)),
/// );
///
/// let ok = RequestBody::new(Some("application/json"), br#"{"name":"Gopher","age":30}"#);
/// assert!(validator.validate(&ok).is_ok());
///
/// let bad = RequestBody::new(Some("application/json"), br#"{"name":"Gopher","age":130}"#);
/// let err = validator.validate(&bad).unwrap_err();
/// assert_eq!(err.message(), "The 'age' field must not exceed 100");
/// ```
#[derive(Debug, Clone)]
pub struct Validator {
    config: Config,
}

impl Validator {
    /// Creates a validator from its configuration.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns `true` if the bypass predicate skips this request.
    pub fn should_skip(&self, request: &Request) -> bool {
        self.config.next().is_some_and(|next| next(request))
    }

    /// Evaluates every rule in order, stopping at the first failure.
    ///
    /// # Errors
    ///
    /// Returns the failure of the first rule that rejects the body.
    pub fn validate(&self, request: &RequestBody<'_>) -> Result<(), ValidationError> {
        for rule in self.config.rules() {
            if let Err(err) = rule.restrict(request) {
                if err.kind().is_malformed_body() {
                    tracing::debug!(
                        rule = rule.name(),
                        branch = %request.branch(),
                        "request body could not be decoded"
                    );
                } else {
                    tracing::info!(
                        rule = rule.name(),
                        branch = %request.branch(),
                        status = err.status().as_u16(),
                        kind = %err.kind(),
                        "request body rejected"
                    );
                }
                return Err(err);
            }
        }
        tracing::debug!(rules = self.config.rules().len(), "request body accepted");
        Ok(())
    }

    /// Builds the response for a failure using the configured error handler.
    pub fn error_response(&self, parts: &Parts, err: ValidationError) -> Response {
        (self.config.error_handler())(parts, err)
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{RestrictNumberOnly, RestrictUnicode, Restrictor};
    use axum::body::Body;
    use axum::http::{header, StatusCode};
    use axum::response::IntoResponse;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct Counting {
        calls: Arc<AtomicUsize>,
        fail: bool,
    }

    impl Restrictor for Counting {
        fn restrict(&self, _request: &RequestBody<'_>) -> Result<(), ValidationError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(ValidationError::new(StatusCode::BAD_REQUEST, "counted"))
            } else {
                Ok(())
            }
        }
    }

    fn counting(fail: bool) -> (Counting, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        (
            Counting {
                calls: Arc::clone(&calls),
                fail,
            },
            calls,
        )
    }

    #[test]
    fn empty_chain_passes() {
        let validator = Validator::default();
        let request = RequestBody::new(Some("application/json"), b"not even json");

        assert!(validator.validate(&request).is_ok());
    }

    #[test]
    fn stops_at_first_failure() {
        let (first, first_calls) = counting(false);
        let (second, second_calls) = counting(true);
        let (third, third_calls) = counting(false);

        let validator = Validator::new(Config::default().rule(first).rule(second).rule(third));
        let err = validator
            .validate(&RequestBody::new(None, b""))
            .unwrap_err();

        assert_eq!(err.message(), "counted");
        assert_eq!(first_calls.load(Ordering::SeqCst), 1);
        assert_eq!(second_calls.load(Ordering::SeqCst), 1);
        assert_eq!(third_calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn later_rule_failure_is_reported() {
        let validator = Validator::new(
            Config::default()
                .rule(RestrictUnicode::new(["name"]))
                .rule(RestrictNumberOnly::new(["age"])),
        );

        let err = validator
            .validate(&RequestBody::new(
                Some("application/json"),
                br#"{"name":"Gopher","age":"abc"}"#,
            ))
            .unwrap_err();

        assert_eq!(err.message(), "The 'age' field must contain only numbers");
    }

    #[test]
    fn malformed_body_stops_the_chain() {
        let (after, after_calls) = counting(false);
        let validator = Validator::new(
            Config::default()
                .rule(RestrictUnicode::new(["name"]))
                .rule(after),
        );

        let err = validator
            .validate(&RequestBody::new(Some("application/xml"), b"<data><name>"))
            .unwrap_err();

        assert!(err.kind().is_malformed_body());
        assert_eq!(after_calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn skip_without_predicate_is_false() {
        let validator = Validator::default();
        let request = Request::builder().body(Body::empty()).unwrap();

        assert!(!validator.should_skip(&request));
    }

    #[test]
    fn skip_follows_predicate() {
        let validator = Validator::new(
            Config::default().with_next(|request| request.headers().contains_key("x-skip")),
        );

        let skipped = Request::builder()
            .header("x-skip", "1")
            .body(Body::empty())
            .unwrap();
        let checked = Request::builder().body(Body::empty()).unwrap();

        assert!(validator.should_skip(&skipped));
        assert!(!validator.should_skip(&checked));
    }

    #[test]
    fn error_response_uses_default_handler() {
        let validator = Validator::default();
        let (parts, _) = Request::builder()
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::empty())
            .unwrap()
            .into_parts();

        let response = validator.error_response(&parts, ValidationError::not_numeric("age"));

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/json"
        );
    }

    #[test]
    fn error_response_uses_custom_handler() {
        let validator = Validator::new(Config::default().with_error_handler(|_parts, err| {
            (StatusCode::UNPROCESSABLE_ENTITY, err.to_string()).into_response()
        }));
        let (parts, _) = Request::builder().body(Body::empty()).unwrap().into_parts();

        let response = validator.error_response(&parts, ValidationError::not_numeric("age"));

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
