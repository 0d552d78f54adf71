//! Rejects fields holding characters outside 7-bit ASCII.

use serde_json::{Map, Value};

use super::{collect_fields, restrict_by_content_type, BranchRestrictor, Restrictor};
use crate::error::ValidationError;
use crate::extract::{contains_unicode, extract_field_value};
use crate::request::RequestBody;
use crate::xml::XmlFields;

/// Rejects configured fields that contain non-ASCII characters.
///
/// Only string values are inspected in JSON bodies.
///
/// # Examples
///
/// ```
/// use body_validator::{RequestBody, RestrictUnicode, Restrictor};
///
/// let rule = RestrictUnicode::new(["name", "email"]);
///
/// let ok = RequestBody::new(Some("application/json"), br#"{"name":"Gopher"}"#);
/// assert!(rule.restrict(&ok).is_ok());
///
/// let bad = RequestBody::new(Some("text/plain"), "name=Gøpher&email=a@b.com".as_bytes());
/// let err = rule.restrict(&bad).unwrap_err();
/// assert_eq!(err.message(), "Unicode characters are not allowed in the 'name' field");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestrictUnicode {
    fields: Vec<String>,
}

impl RestrictUnicode {
    /// Creates the rule for the given fields.
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: collect_fields(fields),
        }
    }

    fn check(field: &str, value: Option<&str>) -> Result<(), ValidationError> {
        match value {
            Some(value) if contains_unicode(value) => {
                Err(ValidationError::unicode_not_allowed(field))
            }
            _ => Ok(()),
        }
    }
}

impl BranchRestrictor for RestrictUnicode {
    fn fields(&self) -> &[String] {
        &self.fields
    }

    fn restrict_json(&self, body: &Map<String, Value>) -> Result<(), ValidationError> {
        for field in &self.fields {
            Self::check(field, body.get(field).and_then(Value::as_str))?;
        }
        Ok(())
    }

    fn restrict_xml(&self, body: &XmlFields) -> Result<(), ValidationError> {
        for (field, value) in body.iter() {
            Self::check(field, value)?;
        }
        Ok(())
    }

    fn restrict_other(&self, body: &str) -> Result<(), ValidationError> {
        for field in &self.fields {
            Self::check(field, extract_field_value(body, field, &self.fields))?;
        }
        Ok(())
    }
}

impl Restrictor for RestrictUnicode {
    fn restrict(&self, request: &RequestBody<'_>) -> Result<(), ValidationError> {
        restrict_by_content_type(self, request)
    }

    fn name(&self) -> &'static str {
        "restrict_unicode"
    }
}
