//! Reading named fields out of an XML body.
//!
//! Rules are configured with field names only, so there is no document type
//! to deserialize into. Instead the body is streamed through `quick-xml` and
//! the text of every first-level element whose name matches a configured
//! field is collected into an ordered map.

use std::fmt;

use quick_xml::events::attributes::AttrError;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// Why an XML body could not be read.
#[derive(Debug)]
pub enum XmlDecodeError {
    /// The body is not valid UTF-8.
    NotUtf8(std::str::Utf8Error),
    /// The tokenizer rejected the document.
    Syntax(quick_xml::Error),
    /// An element carries a malformed attribute.
    Attribute(AttrError),
    /// The body holds no element at all.
    NoRootElement,
    /// The body ended before the root element was closed.
    UnclosedElement,
}

impl fmt::Display for XmlDecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            XmlDecodeError::NotUtf8(err) => write!(f, "body is not valid UTF-8: {}", err),
            XmlDecodeError::Syntax(err) => write!(f, "malformed XML: {}", err),
            XmlDecodeError::Attribute(err) => write!(f, "malformed attribute: {}", err),
            XmlDecodeError::NoRootElement => write!(f, "no root element"),
            XmlDecodeError::UnclosedElement => write!(f, "root element is not closed"),
        }
    }
}

impl std::error::Error for XmlDecodeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            XmlDecodeError::NotUtf8(err) => Some(err),
            XmlDecodeError::Syntax(err) => Some(err),
            XmlDecodeError::Attribute(err) => Some(err),
            XmlDecodeError::NoRootElement | XmlDecodeError::UnclosedElement => None,
        }
    }
}

impl From<std::str::Utf8Error> for XmlDecodeError {
    fn from(err: std::str::Utf8Error) -> Self {
        XmlDecodeError::NotUtf8(err)
    }
}

impl From<quick_xml::Error> for XmlDecodeError {
    fn from(err: quick_xml::Error) -> Self {
        XmlDecodeError::Syntax(err)
    }
}

impl From<AttrError> for XmlDecodeError {
    fn from(err: AttrError) -> Self {
        XmlDecodeError::Attribute(err)
    }
}

/// String values of configured fields, in configured order.
///
/// A field maps to a direct child of the root element with the same local
/// name (ASCII case-insensitive). Its value is the text and CDATA directly
/// inside that element; nested elements are skipped. Fields with no matching
/// element are absent.
///
/// # Examples
///
/// ```
/// use body_validator::xml::XmlFields;
///
/// let fields = vec!["name".to_string(), "age".to_string()];
/// let body = b"<data><name>Gopher &amp; co</name></data>";
///
/// let decoded = XmlFields::decode(body, &fields).expect("well-formed");
/// assert_eq!(decoded.get("name"), Some("Gopher & co"));
/// assert_eq!(decoded.get("age"), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlFields {
    values: Vec<(String, Option<String>)>,
}

impl XmlFields {
    /// Decodes `body`, collecting the values of `fields`.
    ///
    /// # Errors
    ///
    /// Returns `XmlDecodeError` if the body is not well-formed up to the end
    /// of its root element. Anything after the root element is not read.
    pub fn decode(body: &[u8], fields: &[String]) -> Result<Self, XmlDecodeError> {
        let mut decoded = XmlFields {
            values: fields.iter().map(|f| (f.clone(), None)).collect(),
        };

        let text = std::str::from_utf8(body)?;
        let mut reader = Reader::from_str(text);

        let mut depth = 0usize;
        let mut capturing: Option<usize> = None;
        let mut value = String::new();

        loop {
            match reader.read_event()? {
                Event::Start(element) => {
                    check_attributes(&element)?;
                    depth += 1;
                    if depth == 2 {
                        capturing = decoded.position(&element);
                        value.clear();
                    }
                }
                Event::Empty(element) => {
                    check_attributes(&element)?;
                    match depth {
                        // A self-closing root is a complete, empty document.
                        0 => return Ok(decoded),
                        1 => {
                            if let Some(index) = decoded.position(&element) {
                                decoded.values[index].1 = Some(String::new());
                            }
                        }
                        _ => {}
                    }
                }
                Event::End(_) => {
                    if depth == 2 {
                        if let Some(index) = capturing.take() {
                            decoded.values[index].1 = Some(std::mem::take(&mut value));
                        }
                    }
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        return Ok(decoded);
                    }
                }
                Event::Text(text) => {
                    let unescaped = text.unescape()?;
                    if depth == 2 && capturing.is_some() {
                        value.push_str(&unescaped);
                    }
                }
                Event::CData(cdata) => {
                    if depth == 2 && capturing.is_some() {
                        value.push_str(&String::from_utf8_lossy(&cdata));
                    }
                }
                Event::Eof => {
                    return Err(if depth == 0 {
                        XmlDecodeError::NoRootElement
                    } else {
                        XmlDecodeError::UnclosedElement
                    });
                }
                _ => {}
            }
        }
    }

    /// Returns the value of a configured field, or `None` if it was absent.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.values
            .iter()
            .find(|(name, _)| name == field)
            .and_then(|(_, value)| value.as_deref())
    }

    /// Iterates over configured fields and their values in configured order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.values
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_deref()))
    }

    fn position(&self, element: &BytesStart<'_>) -> Option<usize> {
        let local = element.local_name();
        self.values
            .iter()
            .position(|(name, _)| name.as_bytes().eq_ignore_ascii_case(local.as_ref()))
    }
}

fn check_attributes(element: &BytesStart<'_>) -> Result<(), XmlDecodeError> {
    for attribute in element.attributes() {
        attribute?;
    }
    Ok(())
}
