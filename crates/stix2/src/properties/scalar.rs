//! Scalar property descriptors.

use crate::error::PropertyError;
use crate::model::Value;
use crate::properties::{describe, CapabilitySet, Property};
use crate::util::datetime::{now_micros, parse_timestamp, timestamp_in_range, Precision};

/// A string property, optionally fixed to a single value.
#[derive(Debug, Clone, Default)]
pub struct StringProperty {
    required: bool,
    fixed: Option<String>,
}

impl StringProperty {
    pub fn new() -> Self {
        Self::default()
    }

    /// A property that only accepts (and defaults to) `value`.
    pub fn fixed(value: impl Into<String>) -> Self {
        Self {
            required: false,
            fixed: Some(value.into()),
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

impl Property for StringProperty {
    fn capabilities(&self) -> CapabilitySet {
        CapabilitySet::empty()
    }

    fn is_required(&self) -> bool {
        self.required
    }

    fn default_value(&self) -> Option<Value> {
        self.fixed.clone().map(Value::String)
    }

    fn clean(&self, value: Value) -> Result<Value, PropertyError> {
        let Value::String(s) = value else {
            return Err(PropertyError::new(format!(
                "must be a string, got {}",
                describe(&value)
            )));
        };
        if let Some(fixed) = &self.fixed {
            if &s != fixed {
                return Err(PropertyError::new(format!("must equal '{}'", fixed)));
            }
        }
        Ok(Value::String(s))
    }
}

/// An integer property with optional inclusive bounds.
#[derive(Debug, Clone, Default)]
pub struct IntegerProperty {
    required: bool,
    min: Option<i64>,
    max: Option<i64>,
}

impl IntegerProperty {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn min(mut self, min: i64) -> Self {
        self.min = Some(min);
        self
    }

    pub fn max(mut self, max: i64) -> Self {
        self.max = Some(max);
        self
    }
}

impl Property for IntegerProperty {
    fn capabilities(&self) -> CapabilitySet {
        CapabilitySet::empty()
    }

    fn is_required(&self) -> bool {
        self.required
    }

    fn clean(&self, value: Value) -> Result<Value, PropertyError> {
        let n = match value {
            Value::Integer(n) => n,
            Value::String(ref s) => s
                .trim()
                .parse::<i64>()
                .map_err(|_| PropertyError::new("must be an integer"))?,
            other => {
                return Err(PropertyError::new(format!(
                    "must be an integer, got {}",
                    describe(&other)
                )));
            }
        };
        if let Some(min) = self.min {
            if n < min {
                return Err(PropertyError::new(format!("minimum value is {}", min)));
            }
        }
        if let Some(max) = self.max {
            if n > max {
                return Err(PropertyError::new(format!("maximum value is {}", max)));
            }
        }
        Ok(Value::Integer(n))
    }
}

/// A float property. Integers are widened.
#[derive(Debug, Clone, Default)]
pub struct FloatProperty {
    required: bool,
}

impl FloatProperty {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

impl Property for FloatProperty {
    fn capabilities(&self) -> CapabilitySet {
        CapabilitySet::empty()
    }

    fn is_required(&self) -> bool {
        self.required
    }

    fn clean(&self, value: Value) -> Result<Value, PropertyError> {
        let f = match value {
            Value::Float(f) => f,
            Value::Integer(n) => n as f64,
            other => {
                return Err(PropertyError::new(format!(
                    "must be a number, got {}",
                    describe(&other)
                )));
            }
        };
        if f.is_nan() {
            return Err(PropertyError::new("NaN is not allowed"));
        }
        Ok(Value::Float(f))
    }
}

/// A boolean property with an optional default.
#[derive(Debug, Clone, Default)]
pub struct BooleanProperty {
    required: bool,
    default: Option<bool>,
}

impl BooleanProperty {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_default(mut self, value: bool) -> Self {
        self.default = Some(value);
        self
    }
}

impl Property for BooleanProperty {
    fn capabilities(&self) -> CapabilitySet {
        CapabilitySet::empty()
    }

    fn is_required(&self) -> bool {
        self.required
    }

    fn default_value(&self) -> Option<Value> {
        self.default.map(Value::Boolean)
    }

    fn clean(&self, value: Value) -> Result<Value, PropertyError> {
        match value {
            Value::Boolean(b) => Ok(Value::Boolean(b)),
            Value::Integer(1) => Ok(Value::Boolean(true)),
            Value::Integer(0) => Ok(Value::Boolean(false)),
            Value::String(ref s) => match s.to_ascii_lowercase().as_str() {
                "true" | "t" | "1" => Ok(Value::Boolean(true)),
                "false" | "f" | "0" => Ok(Value::Boolean(false)),
                _ => Err(PropertyError::new("must be a boolean value")),
            },
            other => Err(PropertyError::new(format!(
                "must be a boolean value, got {}",
                describe(&other)
            ))),
        }
    }
}

/// A string property restricted to a fixed vocabulary.
#[derive(Debug, Clone, Default)]
pub struct EnumProperty {
    required: bool,
    allowed: Vec<String>,
}

impl EnumProperty {
    pub fn new<S: Into<String>>(allowed: impl IntoIterator<Item = S>) -> Self {
        Self {
            required: false,
            allowed: allowed.into_iter().map(Into::into).collect(),
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

impl Property for EnumProperty {
    fn capabilities(&self) -> CapabilitySet {
        CapabilitySet::empty()
    }

    fn is_required(&self) -> bool {
        self.required
    }

    fn clean(&self, value: Value) -> Result<Value, PropertyError> {
        match value {
            Value::String(s) if self.allowed.iter().any(|a| a == &s) => Ok(Value::String(s)),
            Value::String(s) => Err(PropertyError::new(format!(
                "value '{}' is not one of: {}",
                s,
                self.allowed.join(", ")
            ))),
            other => Err(PropertyError::new(format!(
                "must be a string, got {}",
                describe(&other)
            ))),
        }
    }
}

/// An RFC 3339 timestamp property.
#[derive(Debug, Clone, Default)]
pub struct TimestampProperty {
    required: bool,
    precision: Precision,
    default_now: bool,
}

impl TimestampProperty {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn precision(mut self, precision: Precision) -> Self {
        self.precision = precision;
        self
    }

    /// Defaults to the current time when no value is supplied.
    pub fn default_now(mut self) -> Self {
        self.default_now = true;
        self
    }
}

impl Property for TimestampProperty {
    fn capabilities(&self) -> CapabilitySet {
        CapabilitySet::TIMESTAMP
    }

    fn is_required(&self) -> bool {
        self.required
    }

    fn default_value(&self) -> Option<Value> {
        self.default_value_at(now_micros())
    }

    fn default_value_at(&self, now: i64) -> Option<Value> {
        if !self.default_now {
            return None;
        }
        Some(Value::Timestamp {
            epoch_micros: self.precision.truncate(now)?,
            precision: self.precision,
        })
    }

    fn clean(&self, value: Value) -> Result<Value, PropertyError> {
        let epoch_micros = match value {
            Value::Timestamp { epoch_micros, .. } => epoch_micros,
            Value::String(ref s) => {
                parse_timestamp(s).map_err(|e| PropertyError::new(e.message))?
            }
            other => {
                return Err(PropertyError::new(format!(
                    "must be a timestamp, got {}",
                    describe(&other)
                )));
            }
        };
        let out_of_range = || PropertyError::new("timestamp is out of range");
        if !timestamp_in_range(epoch_micros) {
            return Err(out_of_range());
        }
        Ok(Value::Timestamp {
            epoch_micros: self.precision.truncate(epoch_micros).ok_or_else(out_of_range)?,
            precision: self.precision,
        })
    }
}
