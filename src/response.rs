//! Error responses shaped after the request's content type.
//!
//! - JSON requests get `{"error":"<message>"}`
//! - XML requests get `<xmlError><error>message</error></xmlError>`
//! - anything else gets the message as plain text
//!
//! The status always comes from the failure.

use axum::http::request::Parts;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::content_type::ContentTypeBranch;
use crate::error::ValidationError;

/// A formatted error response, ready to be written by the host.
///
/// # Examples
///
/// ```
/// use body_validator::{ContentTypeBranch, ErrorResponse, ValidationError};
///
/// let err = ValidationError::exceeds_max_value("age", 100);
/// let response = ErrorResponse::format(&err, ContentTypeBranch::Xml);
///
/// assert_eq!(response.status().as_u16(), 400);
/// assert_eq!(
///     response.body(),
///     "<xmlError><error>The &#39;age&#39; field must not exceed 100</error></xmlError>"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorResponse {
    status: StatusCode,
    branch: ContentTypeBranch,
    body: String,
}

impl ErrorResponse {
    /// Formats `err` for a request of the given branch.
    pub fn format(err: &ValidationError, branch: ContentTypeBranch) -> Self {
        let body = match branch {
            ContentTypeBranch::Json => json_body(err.message()),
            ContentTypeBranch::Xml => xml_body(err.message()),
            ContentTypeBranch::Other => err.message().to_string(),
        };

        Self {
            status: err.status(),
            branch,
            body,
        }
    }

    /// Returns the response status.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Returns the value of the `Content-Type` response header.
    pub fn content_type(&self) -> &'static str {
        self.branch.response_content_type()
    }

    /// Returns the response body.
    pub fn body(&self) -> &str {
        &self.body
    }
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> Response {
        let content_type = HeaderValue::from_static(self.content_type());
        (self.status, [(header::CONTENT_TYPE, content_type)], self.body).into_response()
    }
}

/// The error handler used when none is configured.
///
/// Formats the failure after the request's `Content-Type` header.
pub fn default_error_handler(parts: &Parts, err: ValidationError) -> Response {
    let branch = ContentTypeBranch::from_headers(&parts.headers);
    ErrorResponse::format(&err, branch).into_response()
}

fn json_body(message: &str) -> String {
    serde_json::json!({ "error": message }).to_string()
}

fn xml_body(message: &str) -> String {
    let mut body = String::with_capacity(message.len() + 35);
    body.push_str("<xmlError><error>");
    escape_xml_text(message, &mut body);
    body.push_str("</error></xmlError>");
    body
}

/// Escapes character data using numeric references for quotes and
/// line-control characters.
fn escape_xml_text(text: &str, out: &mut String) {
    for c in text.chars() {
        match c {
            '"' => out.push_str("&#34;"),
            '\'' => out.push_str("&#39;"),
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\t' => out.push_str("&#x9;"),
            '\n' => out.push_str("&#xA;"),
            '\r' => out.push_str("&#xD;"),
            c => out.push(c),
        }
    }
}
