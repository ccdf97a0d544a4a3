//! Built values and the products that hold them.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::error::{qualify, NsError, Result};

/// A value stored under a product property.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    Integer(i64),
    Number(f64),
    Text(String),
    /// Product of a nested factory.
    Object(Product),
    /// Products of a repeated nested tag, in document order.
    List(Vec<Value>),
}

impl Value {
    /// Short name of the variant, used in `PropertyMalformed` messages.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Bool(_) => "boolean",
            Value::Integer(_) => "integer",
            Value::Number(_) => "number",
            Value::Text(_) => "text",
            Value::Object(_) => "object",
            Value::List(_) => "list",
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Integers widen to `f64`.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            Value::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{b}"),
            Value::Integer(i) => write!(f, "{i}"),
            Value::Number(n) => write!(f, "{n}"),
            Value::Text(s) => f.write_str(s),
            Value::Object(_) => f.write_str("<object>"),
            Value::List(items) => write!(f, "<list of {}>", items.len()),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Number(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<Product> for Value {
    fn from(value: Product) -> Self {
        Value::Object(value)
    }
}

/// The finished output of a factory: property name to built value.
///
/// Typed accessors raise `PropertyMissing` for absent properties and
/// `PropertyMalformed` for values of the wrong variant, qualified with the
/// product's parent path when it has one.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct Product {
    properties: BTreeMap<String, Value>,
    #[serde(skip)]
    parent: Option<String>,
}

impl Product {
    /// Create an empty top-level product.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty product nested under `parent`.
    #[must_use]
    pub fn nested(parent: Option<String>) -> Self {
        Self {
            properties: BTreeMap::new(),
            parent,
        }
    }

    /// Dotted path of the property this product was built for, if nested.
    #[must_use]
    pub fn parent(&self) -> Option<&str> {
        self.parent.as_deref()
    }

    pub(crate) fn set_parent(&mut self, parent: Option<String>) {
        self.parent = parent;
    }

    /// Store a value, returning any value it replaced.
    pub fn insert(
        &mut self,
        property: impl Into<String>,
        value: impl Into<Value>,
    ) -> Option<Value> {
        self.properties.insert(property.into(), value.into())
    }

    #[must_use]
    pub fn get(&self, property: &str) -> Option<&Value> {
        self.properties.get(property)
    }

    #[must_use]
    pub fn contains(&self, property: &str) -> bool {
        self.properties.contains_key(property)
    }

    /// Remove a value, taking ownership of it.
    pub fn take(&mut self, property: &str) -> Option<Value> {
        self.properties.remove(property)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Iterate over `(property, value)` pairs in property name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.properties.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn text(&self, property: &str) -> Result<&str> {
        let value = self.require(property)?;
        value
            .as_str()
            .ok_or_else(|| self.mismatch(property, "text", value))
    }

    pub fn number(&self, property: &str) -> Result<f64> {
        let value = self.require(property)?;
        value
            .as_f64()
            .ok_or_else(|| self.mismatch(property, "number", value))
    }

    pub fn integer(&self, property: &str) -> Result<i64> {
        let value = self.require(property)?;
        value
            .as_i64()
            .ok_or_else(|| self.mismatch(property, "integer", value))
    }

    pub fn bool(&self, property: &str) -> Result<bool> {
        let value = self.require(property)?;
        value
            .as_bool()
            .ok_or_else(|| self.mismatch(property, "boolean", value))
    }

    /// Take a nested product out of this one.
    ///
    /// On a type mismatch the property is left in place.
    pub fn object(&mut self, property: &str) -> Result<Product> {
        match self.require(property)? {
            Value::Object(_) => {}
            other => return Err(self.mismatch(property, "object", other)),
        }
        match self.take(property) {
            Some(Value::Object(product)) => Ok(product),
            _ => Err(NsError::internal()),
        }
    }

    /// Take a list out of this one.
    ///
    /// On a type mismatch the property is left in place.
    pub fn list(&mut self, property: &str) -> Result<Vec<Value>> {
        match self.require(property)? {
            Value::List(_) => {}
            other => return Err(self.mismatch(property, "list", other)),
        }
        match self.take(property) {
            Some(Value::List(items)) => Ok(items),
            _ => Err(NsError::internal()),
        }
    }

    /// Take a list of nested products out of this one.
    pub fn objects(&mut self, property: &str) -> Result<Vec<Product>> {
        let path = qualify(self.parent(), property);
        self.list(property)?
            .into_iter()
            .enumerate()
            .map(|(index, item)| match item {
                Value::Object(product) => Ok(product),
                other => Err(NsError::malformed(
                    format!("{path}[{index}]"),
                    "object",
                    other.type_name(),
                )),
            })
            .collect()
    }

    pub fn opt_text(&self, property: &str) -> Result<Option<&str>> {
        self.optional(property, |p| self.text(p))
    }

    pub fn opt_number(&self, property: &str) -> Result<Option<f64>> {
        self.optional(property, |p| self.number(p))
    }

    pub fn opt_integer(&self, property: &str) -> Result<Option<i64>> {
        self.optional(property, |p| self.integer(p))
    }

    pub fn opt_bool(&self, property: &str) -> Result<Option<bool>> {
        self.optional(property, |p| self.bool(p))
    }

    pub fn opt_object(&mut self, property: &str) -> Result<Option<Product>> {
        if self.contains(property) {
            self.object(property).map(Some)
        } else {
            Ok(None)
        }
    }

    fn optional<T>(
        &self,
        property: &str,
        get: impl FnOnce(&str) -> Result<T>,
    ) -> Result<Option<T>> {
        if self.contains(property) {
            get(property).map(Some)
        } else {
            Ok(None)
        }
    }

    fn require(&self, property: &str) -> Result<&Value> {
        self.get(property)
            .ok_or_else(|| NsError::missing(property, self.parent()))
    }

    fn mismatch(&self, property: &str, expected: &str, supplied: &Value) -> NsError {
        NsError::malformed(
            qualify(self.parent(), property),
            expected,
            supplied.type_name(),
        )
    }
}

// The parent path is diagnostic only.
impl PartialEq for Product {
    fn eq(&self, other: &Self) -> bool {
        self.properties == other.properties
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Product {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            properties: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            parent: None,
        }
    }
}
