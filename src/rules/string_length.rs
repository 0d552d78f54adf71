//! Bounds the length of string fields.

use serde_json::{Map, Value};

use super::{collect_fields, restrict_by_content_type, BranchRestrictor, Restrictor};
use crate::error::ValidationError;
use crate::extract::extract_field_value;
use crate::request::RequestBody;
use crate::xml::XmlFields;

/// Rejects configured string fields longer than `max_length`.
///
/// Length is the UTF-8 byte length of the value, so `"Gøpher"` is 7 long.
/// Non-string JSON values are not checked. Without a `max_length` the rule only checks that the body
/// decodes.
///
/// # Examples
///
/// ```
/// use body_validator::{RequestBody, RestrictStringLength, Restrictor};
///
/// let rule = RestrictStringLength::new(["name"]).max_length(5);
///
/// let request = RequestBody::new(Some("application/json"), br#"{"name":"Gopher"}"#);
/// let err = rule.restrict(&request).unwrap_err();
/// assert_eq!(err.message(), "The 'name' field must not exceed 5 characters");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestrictStringLength {
    fields: Vec<String>,
    max_length: Option<usize>,
}

impl RestrictStringLength {
    /// Creates the rule for the given fields with no length bound.
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: collect_fields(fields),
            max_length: None,
        }
    }

    /// Sets the longest accepted value, in bytes.
    pub fn max_length(mut self, max_length: usize) -> Self {
        self.max_length = Some(max_length);
        self
    }

    fn check(&self, field: &str, value: Option<&str>) -> Result<(), ValidationError> {
        match (self.max_length, value) {
            (Some(max_length), Some(value)) if value.len() > max_length => {
                Err(ValidationError::exceeds_max_length(field, max_length))
            }
            _ => Ok(()),
        }
    }
}

impl BranchRestrictor for RestrictStringLength {
    fn fields(&self) -> &[String] {
        &self.fields
    }

    fn restrict_json(&self, body: &Map<String, Value>) -> Result<(), ValidationError> {
        for field in &self.fields {
            self.check(field, body.get(field).and_then(Value::as_str))?;
        }
        Ok(())
    }

    fn restrict_xml(&self, body: &XmlFields) -> Result<(), ValidationError> {
        for (field, value) in body.iter() {
            self.check(field, value)?;
        }
        Ok(())
    }

    fn restrict_other(&self, body: &str) -> Result<(), ValidationError> {
        for field in &self.fields {
            self.check(field, extract_field_value(body, field, &self.fields))?;
        }
        Ok(())
    }
}

impl Restrictor for RestrictStringLength {
    fn restrict(&self, request: &RequestBody<'_>) -> Result<(), ValidationError> {
        restrict_by_content_type(self, request)
    }

    fn name(&self) -> &'static str {
        "restrict_string_length"
    }
}
