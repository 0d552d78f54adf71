use std::fmt;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Message for a JSON body that could not be decoded into an object.
pub const ERR_INVALID_JSON_BODY: &str = "Invalid JSON request body";

/// Message for an XML body that is not well-formed.
pub const ERR_INVALID_XML_BODY: &str = "Invalid XML request body";

/// Errors raised outside of rule evaluation.
#[derive(Debug)]
pub enum Error {
    /// The request body could not be buffered.
    BodyRead(axum::Error),
}

impl Error {
    /// Returns `true` if the body was rejected for exceeding the configured limit.
    pub fn is_length_limit(&self) -> bool {
        match self {
            Error::BodyRead(err) => {
                let mut source: Option<&(dyn std::error::Error + 'static)> = Some(err);
                while let Some(current) = source {
                    if current.is::<http_body_util::LengthLimitError>() {
                        return true;
                    }
                    source = current.source();
                }
                false
            }
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::BodyRead(err) => write!(f, "Failed to read request body: {}", err),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::BodyRead(err) => Some(err),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = if self.is_length_limit() {
            StatusCode::PAYLOAD_TOO_LARGE
        } else {
            StatusCode::BAD_REQUEST
        };
        (status, self.to_string()).into_response()
    }
}

impl From<axum::Error> for Error {
    fn from(err: axum::Error) -> Self {
        Error::BodyRead(err)
    }
}

/// A rule failure with the status and message sent back to the client.
///
/// # Examples
///
/// ```
/// use axum::http::StatusCode;
/// use body_validator::{ErrorKind, ValidationError};
///
/// let err = ValidationError::unicode_not_allowed("name");
/// assert_eq!(err.status(), StatusCode::BAD_REQUEST);
/// assert_eq!(err.kind(), ErrorKind::UnicodeNotAllowed);
/// assert_eq!(err.message(), "Unicode characters are not allowed in the 'name' field");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    status: StatusCode,
    kind: ErrorKind,
    message: String,
}

impl ValidationError {
    /// Creates a failure with an explicit status, for custom rules.
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            kind: ErrorKind::Custom,
            message: message.into(),
        }
    }

    fn bad_request(kind: ErrorKind, message: String) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            kind,
            message,
        }
    }

    pub(crate) fn invalid_json_body() -> Self {
        Self::bad_request(ErrorKind::InvalidJsonBody, ERR_INVALID_JSON_BODY.to_string())
    }

    pub(crate) fn invalid_xml_body() -> Self {
        Self::bad_request(ErrorKind::InvalidXmlBody, ERR_INVALID_XML_BODY.to_string())
    }

    /// Failure for a field holding characters outside 7-bit ASCII.
    pub fn unicode_not_allowed(field: &str) -> Self {
        Self::bad_request(
            ErrorKind::UnicodeNotAllowed,
            format!("Unicode characters are not allowed in the '{}' field", field),
        )
    }

    /// Failure for a field that is not made of digits only.
    pub fn not_numeric(field: &str) -> Self {
        Self::bad_request(
            ErrorKind::NotNumeric,
            format!("The '{}' field must contain only numbers", field),
        )
    }

    /// Failure for a numeric field with too many digits.
    pub fn exceeds_max_digits(field: &str, max_digits: usize) -> Self {
        Self::bad_request(
            ErrorKind::ExceedsMaxDigits,
            format!("The '{}' field must not exceed {} digits", field, max_digits),
        )
    }

    /// Failure for a numeric field above its maximum value.
    pub fn exceeds_max_value(field: &str, max: i64) -> Self {
        Self::bad_request(
            ErrorKind::ExceedsMaxValue,
            format!("The '{}' field must not exceed {}", field, max),
        )
    }

    /// Failure for a string field longer than its maximum length.
    pub fn exceeds_max_length(field: &str, max_length: usize) -> Self {
        Self::bad_request(
            ErrorKind::ExceedsMaxLength,
            format!(
                "The '{}' field must not exceed {} characters",
                field, max_length
            ),
        )
    }

    /// Returns the HTTP status for the response.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Returns the failure category.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the client-facing message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ValidationError {}

/// The category of a [`ValidationError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// JSON body did not decode into an object
    InvalidJsonBody,
    /// XML body is not well-formed
    InvalidXmlBody,
    /// Field contains non-ASCII characters
    UnicodeNotAllowed,
    /// Field is not made of digits only
    NotNumeric,
    /// Numeric field has more digits than allowed
    ExceedsMaxDigits,
    /// Numeric field is above the allowed maximum
    ExceedsMaxValue,
    /// String field is longer than allowed
    ExceedsMaxLength,
    /// Raised by a user-defined rule
    Custom,
}

impl ErrorKind {
    /// Returns `true` for failures caused by an undecodable body.
    pub fn is_malformed_body(self) -> bool {
        matches!(self, ErrorKind::InvalidJsonBody | ErrorKind::InvalidXmlBody)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::InvalidJsonBody => write!(f, "invalid json body"),
            ErrorKind::InvalidXmlBody => write!(f, "invalid xml body"),
            ErrorKind::UnicodeNotAllowed => write!(f, "unicode not allowed"),
            ErrorKind::NotNumeric => write!(f, "not numeric"),
            ErrorKind::ExceedsMaxDigits => write!(f, "exceeds max digits"),
            ErrorKind::ExceedsMaxValue => write!(f, "exceeds max value"),
            ErrorKind::ExceedsMaxLength => write!(f, "exceeds max length"),
            ErrorKind::Custom => write!(f, "custom"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_field() {
        assert_eq!(
            ValidationError::not_numeric("age").message(),
            "The 'age' field must contain only numbers"
        );
        assert_eq!(
            ValidationError::exceeds_max_digits("age", 3).message(),
            "The 'age' field must not exceed 3 digits"
        );
        assert_eq!(
            ValidationError::exceeds_max_value("age", 100).message(),
            "The 'age' field must not exceed 100"
        );
        assert_eq!(
            ValidationError::exceeds_max_length("bio", 20).message(),
            "The 'bio' field must not exceed 20 characters"
        );
    }

    #[test]
    fn built_in_failures_are_bad_requests() {
        for err in [
            ValidationError::invalid_json_body(),
            ValidationError::invalid_xml_body(),
            ValidationError::unicode_not_allowed("x"),
            ValidationError::not_numeric("x"),
        ] {
            assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        }
    }

    #[test]
    fn custom_failure_keeps_status() {
        let err = ValidationError::new(StatusCode::UNPROCESSABLE_ENTITY, "nope");

        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.kind(), ErrorKind::Custom);
        assert_eq!(format!("{}", err), "nope");
    }

    #[test]
    fn malformed_body_kinds() {
        assert!(ErrorKind::InvalidJsonBody.is_malformed_body());
        assert!(ErrorKind::InvalidXmlBody.is_malformed_body());
        assert!(!ErrorKind::NotNumeric.is_malformed_body());
    }

    #[test]
    fn body_read_error_display() {
        let err = Error::from(axum::Error::new("connection reset"));
        assert!(format!("{}", err).contains("connection reset"));
        assert!(!err.is_length_limit());
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }
}
