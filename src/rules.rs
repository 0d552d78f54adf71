//! Field constraint rules.
//!
//! This module provides:
//! - `Restrictor`: the trait every rule in a chain implements
//! - `RestrictUnicode`: rejects non-ASCII characters
//! - `RestrictNumberOnly`: requires digits, with optional value and digit bounds
//! - `RestrictStringLength`: bounds the length of string fields
//!
//! The built-in rules read the body according to its content type: a JSON
//! object, first-level XML elements, or field lookup in unstructured text.
//! A body that cannot be decoded fails before any field is checked.
//!
//! Every rule reports the first violation it finds, walking fields in the
//! order they were configured. Fields missing from the body always pass.

mod number;
mod string_length;
mod unicode;

pub use number::RestrictNumberOnly;
pub use string_length::RestrictStringLength;
pub use unicode::RestrictUnicode;

use serde_json::{Map, Value};

use crate::content_type::ContentTypeBranch;
use crate::error::ValidationError;
use crate::request::RequestBody;
use crate::xml::XmlFields;

/// A validation rule run against one request body.
///
/// Implementations must be immutable once built: the same rule instance is
/// shared by every request the middleware handles.
///
/// # Examples
///
/// ```
/// use axum::http::StatusCode;
/// use body_validator::{RequestBody, Restrictor, ValidationError};
///
/// struct NonEmptyBody;
///
/// impl Restrictor for NonEmptyBody {
///     fn restrict(&self, request: &RequestBody<'_>) -> Result<(), ValidationError> {
///         if request.body().is_empty() {
///             return Err(ValidationError::new(StatusCode::BAD_REQUEST, "Request body is empty"));
///         }
///         Ok(())
///     }
/// }
///
/// let rule = NonEmptyBody;
/// assert!(rule.restrict(&RequestBody::new(None, b"")).is_err());
/// assert!(rule.restrict(&RequestBody::new(None, b"x")).is_ok());
/// ```
pub trait Restrictor: Send + Sync {
    /// Checks the request, returning the first violation found.
    fn restrict(&self, request: &RequestBody<'_>) -> Result<(), ValidationError>;

    /// A short name for logs.
    fn name(&self) -> &'static str {
        "custom"
    }
}

/// Per-branch checks shared by the built-in rules.
pub(crate) trait BranchRestrictor {
    /// The configured field names.
    fn fields(&self) -> &[String];

    fn restrict_json(&self, body: &Map<String, Value>) -> Result<(), ValidationError>;

    fn restrict_xml(&self, body: &XmlFields) -> Result<(), ValidationError>;

    fn restrict_other(&self, body: &str) -> Result<(), ValidationError>;
}

/// Decodes the body for the request's branch and runs the matching check.
pub(crate) fn restrict_by_content_type<R>(
    rule: &R,
    request: &RequestBody<'_>,
) -> Result<(), ValidationError>
where
    R: BranchRestrictor + ?Sized,
{
    match request.branch() {
        ContentTypeBranch::Json => rule.restrict_json(&request.json_object()?),
        ContentTypeBranch::Xml => rule.restrict_xml(&request.xml_fields(rule.fields())?),
        ContentTypeBranch::Other => rule.restrict_other(&request.text()),
    }
}

fn collect_fields<I, S>(fields: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    fields.into_iter().map(Into::into).collect()
}
