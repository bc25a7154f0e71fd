//! Field values carried by STIX objects.

use indexmap::IndexMap;

use crate::util::datetime::{format_timestamp, Precision};

/// Ordered field-value mapping, keyed by property name.
pub type Fields = IndexMap<String, Value>;

/// Value type tags, used in error messages and by property descriptors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    String,
    Integer,
    Float,
    Boolean,
    Timestamp,
    List,
    Dictionary,
}

/// A property value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// UTF-8 string. Identifiers and references are strings too.
    String(String),

    /// Signed integer.
    Integer(i64),

    /// 64-bit float.
    Float(f64),

    /// Boolean.
    Boolean(bool),

    /// UTC timestamp.
    Timestamp {
        /// Microseconds since the Unix epoch.
        epoch_micros: i64,
        /// Precision used when the timestamp is rendered.
        precision: Precision,
    },

    /// Homogeneous list.
    List(Vec<Value>),

    /// Ordered string-keyed dictionary.
    Dictionary(IndexMap<String, Value>),
}

impl Value {
    /// Returns the kind tag of this value.
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::String(_) => ValueKind::String,
            Value::Integer(_) => ValueKind::Integer,
            Value::Float(_) => ValueKind::Float,
            Value::Boolean(_) => ValueKind::Boolean,
            Value::Timestamp { .. } => ValueKind::Timestamp,
            Value::List(_) => ValueKind::List,
            Value::Dictionary(_) => ValueKind::Dictionary,
        }
    }

    /// Creates a timestamp value with `Precision::Any`.
    pub fn timestamp(epoch_micros: i64) -> Self {
        Value::Timestamp {
            epoch_micros,
            precision: Precision::Any,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the epoch microseconds of a timestamp value.
    pub fn as_timestamp(&self) -> Option<i64> {
        match self {
            Value::Timestamp { epoch_micros, .. } => Some(*epoch_micros),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_dictionary(&self) -> Option<&IndexMap<String, Value>> {
        match self {
            Value::Dictionary(map) => Some(map),
            _ => None,
        }
    }

    /// Renders a timestamp value as RFC 3339 in its precision.
    pub fn format_timestamp(&self) -> Option<String> {
        match self {
            Value::Timestamp {
                epoch_micros,
                precision,
            } => Some(format_timestamp(*epoch_micros, *precision)),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Boolean(v)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}

/// Collects `(name, value)` pairs into [`Fields`].
pub fn fields<K, V, I>(pairs: I) -> Fields
where
    K: Into<String>,
    V: Into<Value>,
    I: IntoIterator<Item = (K, V)>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind() {
        assert_eq!(Value::from("a").kind(), ValueKind::String);
        assert_eq!(Value::from(1i64).kind(), ValueKind::Integer);
        assert_eq!(Value::from(vec!["a", "b"]).kind(), ValueKind::List);
        assert_eq!(Value::timestamp(0).kind(), ValueKind::Timestamp);
    }

    #[test]
    fn test_fields_keep_order() {
        let f = fields([("b", Value::from(1i64)), ("a", Value::from(2i64))]);
        let keys: Vec<_> = f.keys().map(String::as_str).collect();
        assert_eq!(keys, ["b", "a"]);
    }

    #[test]
    fn test_format_timestamp_value() {
        let v = Value::Timestamp {
            epoch_micros: 1_500_000,
            precision: Precision::Millisecond,
        };
        assert_eq!(v.format_timestamp().as_deref(), Some("1970-01-01T00:00:01.500Z"));
        assert!(Value::from("x").format_timestamp().is_none());
    }
}
