//! Requires fields to be numeric, with optional value and digit bounds.

use serde_json::{Map, Number, Value};

use super::{collect_fields, restrict_by_content_type, BranchRestrictor, Restrictor};
use crate::error::ValidationError;
use crate::extract::{extract_number_field_value, is_number_only};
use crate::request::RequestBody;
use crate::xml::XmlFields;

/// Requires configured fields to hold only digits.
///
/// JSON numbers are accepted as they are and checked by their integer value.
/// Any other JSON type, and any text with a non-digit character, fails.
/// For each field the checks run as: digits only, then `max_digits`, then
/// `max`. A present but empty value has no digits to bound and passes.
///
/// # Examples
///
/// ```
/// use body_validator::{RequestBody, RestrictNumberOnly, Restrictor};
///
/// let rule = RestrictNumberOnly::new(["age"]).max(100);
///
/// let request = RequestBody::new(Some("application/xml"), b"<data><age>120</age></data>");
/// let err = rule.restrict(&request).unwrap_err();
/// assert_eq!(err.message(), "The 'age' field must not exceed 100");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestrictNumberOnly {
    fields: Vec<String>,
    max: Option<i64>,
    max_digits: Option<usize>,
}

impl RestrictNumberOnly {
    /// Creates the rule for the given fields with no bounds.
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: collect_fields(fields),
            max: None,
            max_digits: None,
        }
    }

    /// Sets the largest accepted value.
    pub fn max(mut self, max: i64) -> Self {
        self.max = Some(max);
        self
    }

    /// Sets the largest accepted number of digits.
    ///
    /// For JSON numbers a leading `-` counts as a digit.
    pub fn max_digits(mut self, max_digits: usize) -> Self {
        self.max_digits = Some(max_digits);
        self
    }

    fn check_bounds(&self, field: &str, value: i64, digits: usize) -> Result<(), ValidationError> {
        if let Some(max_digits) = self.max_digits {
            if digits > max_digits {
                return Err(ValidationError::exceeds_max_digits(field, max_digits));
            }
        }
        if let Some(max) = self.max {
            if value > max {
                return Err(ValidationError::exceeds_max_value(field, max));
            }
        }
        Ok(())
    }

    fn check_text(&self, field: &str, value: Option<&str>) -> Result<(), ValidationError> {
        let Some(value) = value else {
            return Ok(());
        };
        if !is_number_only(value) {
            return Err(ValidationError::not_numeric(field));
        }
        if value.is_empty() {
            return Ok(());
        }
        // Only overflow can fail here; such a value exceeds any bound.
        let parsed = value.parse::<i64>().unwrap_or(i64::MAX);
        self.check_bounds(field, parsed, value.len())
    }

    fn check_json_number(&self, field: &str, number: &Number) -> Result<(), ValidationError> {
        let (value, digits) = json_integer(number);
        self.check_bounds(field, value, digits)
    }
}

/// Integer part of a JSON number and the length of its decimal rendering.
///
/// Fractions are truncated. The value saturates at the `i64` range; the
/// length does not, and includes a leading `-`.
fn json_integer(number: &Number) -> (i64, usize) {
    if let Some(value) = number.as_i64() {
        (value, value.to_string().len())
    } else if let Some(value) = number.as_u64() {
        (i64::MAX, value.to_string().len())
    } else {
        let truncated = number.as_f64().map_or(0.0, f64::trunc);
        // -0.5 truncates to -0.0, which renders as "-0".
        let truncated = if truncated == 0.0 { 0.0 } else { truncated };
        (truncated as i64, format!("{:.0}", truncated).len())
    }
}

impl BranchRestrictor for RestrictNumberOnly {
    fn fields(&self) -> &[String] {
        &self.fields
    }

    fn restrict_json(&self, body: &Map<String, Value>) -> Result<(), ValidationError> {
        for field in &self.fields {
            match body.get(field) {
                None => continue,
                Some(Value::String(text)) => self.check_text(field, Some(text))?,
                Some(Value::Number(number)) => self.check_json_number(field, number)?,
                Some(_) => return Err(ValidationError::not_numeric(field)),
            }
        }
        Ok(())
    }

    fn restrict_xml(&self, body: &XmlFields) -> Result<(), ValidationError> {
        for (field, value) in body.iter() {
            self.check_text(field, value)?;
        }
        Ok(())
    }

    fn restrict_other(&self, body: &str) -> Result<(), ValidationError> {
        for field in &self.fields {
            self.check_text(field, extract_number_field_value(body, field))?;
        }
        Ok(())
    }
}

impl Restrictor for RestrictNumberOnly {
    fn restrict(&self, request: &RequestBody<'_>) -> Result<(), ValidationError> {
        restrict_by_content_type(self, request)
    }

    fn name(&self) -> &'static str {
        "restrict_number_only"
    }
}
