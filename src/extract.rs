//! Field lookup in unstructured bodies.
//!
//! Plain-text and form-encoded bodies have no grammar we can rely on, so a
//! field's value is found by searching for the field name and scanning for
//! where the value ends. Matching is ASCII case-insensitive; lowercasing only
//! ASCII keeps byte offsets aligned with the original body, so every value
//! returned is a slice of it.

/// Characters allowed between a field name and its value.
const SEPARATORS: [u8; 3] = [b' ', b':', b'='];

/// Characters that end a numeric value.
const NUMBER_TERMINATORS: [u8; 3] = [b'&', b'\n', b'\r'];

/// Locates `field` and returns the byte offset where its value starts.
///
/// `haystack` must be the ASCII-lowercased body.
fn value_start(haystack: &str, field: &str) -> Option<usize> {
    if field.is_empty() {
        return None;
    }

    let needle = field.to_ascii_lowercase();
    let found = haystack.find(&needle)?;

    let bytes = haystack.as_bytes();
    let mut start = found + needle.len();
    while start < bytes.len() && SEPARATORS.contains(&bytes[start]) {
        start += 1;
    }
    Some(start)
}

/// Extracts a field whose value runs until the next other configured field.
///
/// The value ends where the earliest other name from `fields` appears after
/// the value start, or at the end of the body. Surrounding whitespace is
/// trimmed. Returns `None` when the field name does not occur in the body.
///
/// # Examples
///
/// ```
/// use body_validator::extract::extract_field_value;
///
/// let fields = vec!["name".to_string(), "email".to_string()];
/// let body = "name: Gopher email: gopher@example.com";
///
/// assert_eq!(extract_field_value(body, "name", &fields), Some("Gopher"));
/// assert_eq!(extract_field_value(body, "email", &fields), Some("gopher@example.com"));
/// assert_eq!(extract_field_value(body, "age", &fields), None);
/// ```
pub fn extract_field_value<'a>(body: &'a str, field: &str, fields: &[String]) -> Option<&'a str> {
    let haystack = body.to_ascii_lowercase();
    let start = value_start(&haystack, field)?;

    let end = fields
        .iter()
        .filter(|other| !other.is_empty() && !other.eq_ignore_ascii_case(field))
        .filter_map(|other| haystack[start..].find(&other.to_ascii_lowercase()))
        .min()
        .map_or(body.len(), |offset| start + offset);

    Some(body[start..end].trim())
}

/// Extracts a field whose value runs until `&`, a line break, or the end.
///
/// Used for numeric fields in form-encoded bodies such as `age=30&score=80`.
///
/// # Examples
///
/// ```
/// use body_validator::extract::extract_number_field_value;
///
/// assert_eq!(extract_number_field_value("age=30&score=80", "score"), Some("80"));
/// assert_eq!(extract_number_field_value("AGE = 30\r\n", "age"), Some("30"));
/// ```
pub fn extract_number_field_value<'a>(body: &'a str, field: &str) -> Option<&'a str> {
    let haystack = body.to_ascii_lowercase();
    let start = value_start(&haystack, field)?;

    let end = body.as_bytes()[start..]
        .iter()
        .position(|b| NUMBER_TERMINATORS.contains(b))
        .map_or(body.len(), |offset| start + offset);

    Some(body[start..end].trim())
}

/// Returns `true` if `value` has any character outside 7-bit ASCII.
pub fn contains_unicode(value: &str) -> bool {
    !value.is_ascii()
}

/// Returns `true` if every character of `value` is an ASCII digit.
///
/// The empty string is vacuously numeric.
pub fn is_number_only(value: &str) -> bool {
    value.bytes().all(|b| b.is_ascii_digit())
}
