use std::borrow::Cow;

use serde_json::{Map, Value};

use crate::content_type::ContentTypeBranch;
use crate::error::ValidationError;
use crate::xml::XmlFields;

/// A borrowed view of the parts of a request that rules inspect.
///
/// Hosts build one per request from the `Content-Type` header and the
/// buffered body. It holds no state of its own, so every rule decodes the
/// body independently.
///
/// # Examples
///
/// ```
/// use body_validator::{ContentTypeBranch, RequestBody};
///
/// let request = RequestBody::new(Some("application/json"), br#"{"age":30}"#);
/// assert_eq!(request.branch(), ContentTypeBranch::Json);
///
/// let object = request.json_object().expect("valid json");
/// assert_eq!(object["age"], 30);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct RequestBody<'a> {
    content_type: Option<&'a str>,
    body: &'a [u8],
}

impl<'a> RequestBody<'a> {
    /// Creates a view from a content type and raw body.
    pub fn new(content_type: Option<&'a str>, body: &'a [u8]) -> Self {
        Self { content_type, body }
    }

    /// Returns the declared content type, if any.
    pub fn content_type(&self) -> Option<&'a str> {
        self.content_type
    }

    /// Returns the raw body bytes.
    pub fn body(&self) -> &'a [u8] {
        self.body
    }

    /// Classifies the declared content type.
    pub fn branch(&self) -> ContentTypeBranch {
        ContentTypeBranch::classify(self.content_type)
    }

    /// Decodes the body as a JSON object.
    ///
    /// # Errors
    ///
    /// Returns the "Invalid JSON request body" failure if the body is not a
    /// JSON object.
    pub fn json_object(&self) -> Result<Map<String, Value>, ValidationError> {
        serde_json::from_slice(self.body).map_err(|err| {
            tracing::trace!(error = %err, "json body rejected");
            ValidationError::invalid_json_body()
        })
    }

    /// Decodes the configured `fields` from an XML body.
    ///
    /// # Errors
    ///
    /// Returns the "Invalid XML request body" failure if the body is not
    /// well-formed XML.
    pub fn xml_fields(&self, fields: &[String]) -> Result<XmlFields, ValidationError> {
        XmlFields::decode(self.body, fields).map_err(|err| {
            tracing::trace!(error = %err, "xml body rejected");
            ValidationError::invalid_xml_body()
        })
    }

    /// Returns the body as text, replacing invalid UTF-8 sequences.
    pub fn text(&self) -> Cow<'a, str> {
        String::from_utf8_lossy(self.body)
    }
}
