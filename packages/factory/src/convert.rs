//! Converters that turn raw tag text into typed values.
//!
//! Converters are plain functions over a [`Field`]: the raw text and
//! attributes of the tag, plus the property name and parent path needed to
//! report a qualified error. They are pure and may be called any number of
//! times.

use crate::error::{NsError, Result};
use crate::tree::Attributes;
use crate::value::Value;

/// Raw input for a single property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field<'a> {
    /// Output property name.
    pub property: &'a str,
    /// Dotted path of the enclosing product, if nested.
    pub parent: Option<&'a str>,
    /// Raw text; `None` when the tag had no text.
    pub raw: Option<&'a str>,
    /// Attributes of the tag being converted, if any.
    pub attributes: Option<&'a Attributes>,
}

impl<'a> Field<'a> {
    /// Create a top-level field.
    #[must_use]
    pub fn new(property: &'a str, raw: Option<&'a str>) -> Self {
        Self {
            property,
            parent: None,
            raw,
            attributes: None,
        }
    }

    /// Set the parent path.
    #[must_use]
    pub fn within(mut self, parent: Option<&'a str>) -> Self {
        self.parent = parent;
        self
    }

    /// Attach the attributes of the tag.
    #[must_use]
    pub fn with_attributes(mut self, attributes: &'a Attributes) -> Self {
        self.attributes = Some(attributes);
        self
    }

    /// Look up an attribute of the tag.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&'a str> {
        self.attributes.and_then(|attributes| attributes.get(name))
    }

    /// Trimmed raw text, or `PropertyMissing` if there is none.
    pub fn require(&self) -> Result<&'a str> {
        self.raw
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| self.missing())
    }

    #[must_use]
    pub fn missing(&self) -> NsError {
        NsError::missing(self.property, self.parent)
    }

    #[must_use]
    pub fn invalid(&self, value: &str) -> NsError {
        NsError::invalid(self.property, value, self.parent)
    }
}

/// Signature shared by all converters.
pub type Converter = dyn Fn(&Field<'_>) -> Result<Value>;

/// Keep the text as is.
pub fn text(field: &Field<'_>) -> Result<Value> {
    field.require().map(Value::from)
}

/// Parse a decimal number.
///
/// # Examples
/// ```
/// use nationscript_factory::convert::{number, Field};
/// use nationscript_factory::Value;
///
/// let value = number(&Field::new("bank", Some("12.5"))).unwrap();
/// assert_eq!(value, Value::Number(12.5));
/// assert!(number(&Field::new("bank", Some("twelve"))).is_err());
/// ```
pub fn number(field: &Field<'_>) -> Result<Value> {
    let raw = field.require()?;
    match raw.parse::<f64>() {
        Ok(n) if n.is_finite() => Ok(Value::Number(n)),
        _ => Err(field.invalid(raw)),
    }
}

/// Parse a whole number, such as a unix timestamp or an id.
pub fn integer(field: &Field<'_>) -> Result<Value> {
    let raw = field.require()?;
    raw.parse::<i64>()
        .map(Value::Integer)
        .map_err(|_| field.invalid(raw))
}

/// Parse `1`/`0`/`true`/`false`, ignoring case.
pub fn boolean(field: &Field<'_>) -> Result<Value> {
    let raw = field.require()?;
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" => Ok(Value::Bool(true)),
        "0" | "false" => Ok(Value::Bool(false)),
        _ => Err(field.invalid(raw)),
    }
}

/// `true` when the text equals `sentinel`, `false` for anything else.
///
/// Never fails, not even on absent text.
pub fn equals(sentinel: &'static str) -> impl Fn(&Field<'_>) -> Result<Value> {
    move |field: &Field<'_>| Ok(Value::Bool(field.raw.map(str::trim) == Some(sentinel)))
}

/// Accept only one of `allowed`, stored as text.
///
/// Strict counterpart of [`equals`] for enumerated tags.
pub fn one_of(allowed: &'static [&'static str]) -> impl Fn(&Field<'_>) -> Result<Value> {
    move |field: &Field<'_>| {
        let raw = field.require()?;
        if allowed.iter().any(|option| *option == raw) {
            Ok(Value::from(raw))
        } else {
            Err(field.invalid(raw))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn field(raw: Option<&str>) -> Field<'_> {
        Field::new("bank", raw)
    }

    #[test]
    fn test_number_parses_numerals() {
        let cases = [
            ("12.5", 12.5),
            ("20", 20.0),
            ("-3", -3.0),
            (" 8.5 ", 8.5),
            ("1e3", 1000.0),
        ];
        for (raw, expected) in cases {
            assert_eq!(
                number(&field(Some(raw))).unwrap(),
                Value::Number(expected),
                "{raw}"
            );
        }
    }

    #[test]
    fn test_number_rejects_non_numerals() {
        for raw in ["twelve", "12,5", "NaN", "inf", "0x10"] {
            let err = number(&field(Some(raw))).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::PropertyInvalid, "{raw}");
        }
    }

    #[test]
    fn test_number_absent_is_missing() {
        assert_eq!(number(&field(None)).unwrap_err().kind(), ErrorKind::PropertyMissing);
        assert_eq!(number(&field(Some("  "))).unwrap_err().kind(), ErrorKind::PropertyMissing);
    }

    #[test]
    fn test_invalid_message_carries_parent() {
        let f = Field::new("government", Some("lots")).within(Some("sectors"));
        assert_eq!(
            number(&f).unwrap_err().to_string(),
            "Invalid property: sectors.government (lots)"
        );
    }

    #[test]
    fn test_integer() {
        assert_eq!(integer(&field(Some("1000"))).unwrap(), Value::Integer(1000));
        assert_eq!(integer(&field(Some("10.5"))).unwrap_err().kind(), ErrorKind::PropertyInvalid);
    }

    #[test]
    fn test_boolean() {
        assert_eq!(boolean(&field(Some("1"))).unwrap(), Value::Bool(true));
        assert_eq!(boolean(&field(Some("FALSE"))).unwrap(), Value::Bool(false));
        assert!(boolean(&field(Some("maybe"))).is_err());
    }

    #[test]
    fn test_equals_never_fails() {
        let is_ask = equals("ask");
        assert_eq!(is_ask(&field(Some("ask"))).unwrap(), Value::Bool(true));
        assert_eq!(is_ask(&field(Some("bid"))).unwrap(), Value::Bool(false));
        assert_eq!(is_ask(&field(Some("ASK"))).unwrap(), Value::Bool(false));
        assert_eq!(is_ask(&field(None)).unwrap(), Value::Bool(false));
    }

    #[test]
    fn test_one_of() {
        let side = one_of(&["ask", "bid"]);
        assert_eq!(side(&field(Some("bid"))).unwrap(), Value::from("bid"));
        let err = side(&field(Some("swap"))).unwrap_err();
        assert_eq!(err.to_string(), "Invalid property: bank (swap)");
    }

    #[test]
    fn test_field_exposes_attributes() {
        let attributes: Attributes = [("id", "7")].into_iter().collect();
        let f = Field::new("scale", Some("12")).with_attributes(&attributes);
        assert_eq!(f.attribute("id"), Some("7"));
        assert_eq!(f.attribute("unit"), None);
        assert_eq!(field(Some("12")).attribute("id"), None);
    }

    #[test]
    fn test_text() {
        assert_eq!(text(&field(Some(" testland "))).unwrap(), Value::from("testland"));
        assert_eq!(text(&field(None)).unwrap_err().kind(), ErrorKind::PropertyMissing);
    }
}
