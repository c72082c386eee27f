//! Lenient scalar attributes.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Boolean attribute accepting `true`, `"true"`, `1` and `"1"`.
///
/// Anything else (including absence) reads as unset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Flag(bool);

impl Flag {
    pub fn new(set: bool) -> Self {
        Self(set)
    }

    pub fn is_set(self) -> bool {
        self.0
    }

    /// Interpret an arbitrary JSON value as a flag.
    pub fn from_value(value: &Value) -> Self {
        let set = match value {
            Value::Bool(b) => *b,
            Value::String(s) => s == "true" || s == "1",
            Value::Number(n) => n.as_i64() == Some(1),
            _ => false,
        };
        Self(set)
    }
}

impl From<bool> for Flag {
    fn from(set: bool) -> Self {
        Self(set)
    }
}

impl<'de> Deserialize<'de> for Flag {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(Self::from_value(&value))
    }
}

/// String-or-number attribute, stored as its textual form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scalar(String);

impl Scalar {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The attribute text when present and non-empty.
    pub fn present(scalar: &Option<Scalar>) -> Option<&str> {
        scalar.as_ref().map(Scalar::as_str).filter(|s| !s.is_empty())
    }
}

impl From<&str> for Scalar {
    fn from(text: &str) -> Self {
        Self(text.to_string())
    }
}

impl<'de> Deserialize<'de> for Scalar {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::String(s) => Ok(Self(s)),
            Value::Number(n) => Ok(Self(n.to_string())),
            Value::Bool(b) => Ok(Self(b.to_string())),
            other => Err(D::Error::custom(format!(
                "expected a string or number, got {other}"
            ))),
        }
    }
}
