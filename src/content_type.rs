//! Content-type classification.
//!
//! Every rule decides how to read the body from the declared content type.
//! Only the media type essence matters; parameters such as `charset` are
//! ignored and anything unrecognised is read as unstructured text.

use std::fmt;

/// The body encoding a rule reads the request with.
///
/// # Examples
///
/// ```
/// use body_validator::ContentTypeBranch;
///
/// assert_eq!(
///     ContentTypeBranch::classify(Some("application/json; charset=utf-8")),
///     ContentTypeBranch::Json
/// );
/// assert_eq!(ContentTypeBranch::classify(Some("text/xml")), ContentTypeBranch::Xml);
/// assert_eq!(ContentTypeBranch::classify(None), ContentTypeBranch::Other);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentTypeBranch {
    /// `application/json`
    Json,
    /// `application/xml` or `text/xml`
    Xml,
    /// Plain text, form-encoded, or no content type at all
    Other,
}

impl ContentTypeBranch {
    /// Classifies a `Content-Type` header value.
    pub fn classify(content_type: Option<&str>) -> Self {
        let Some(value) = content_type else {
            return ContentTypeBranch::Other;
        };

        let essence = value.split(';').next().unwrap_or_default().trim();

        if essence.eq_ignore_ascii_case("application/json") {
            ContentTypeBranch::Json
        } else if essence.eq_ignore_ascii_case("application/xml")
            || essence.eq_ignore_ascii_case("text/xml")
        {
            ContentTypeBranch::Xml
        } else {
            ContentTypeBranch::Other
        }
    }

    /// Classifies the `Content-Type` header of a request.
    ///
    /// A header that is not visible ASCII is treated as absent.
    pub fn from_headers(headers: &axum::http::HeaderMap) -> Self {
        let value = headers
            .get(axum::http::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok());
        Self::classify(value)
    }

    /// Returns the content type written on error responses for this branch.
    pub fn response_content_type(self) -> &'static str {
        match self {
            ContentTypeBranch::Json => "application/json",
            ContentTypeBranch::Xml => "application/xml",
            ContentTypeBranch::Other => "text/plain; charset=utf-8",
        }
    }
}

impl fmt::Display for ContentTypeBranch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentTypeBranch::Json => write!(f, "json"),
            ContentTypeBranch::Xml => write!(f, "xml"),
            ContentTypeBranch::Other => write!(f, "other"),
        }
    }
}
