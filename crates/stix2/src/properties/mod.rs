//! Property descriptors.
//!
//! A property descriptor declares how one field of a STIX type is cleaned,
//! defaulted, and whether it is required. The custom type builders only
//! look at two things: a descriptor's [`CapabilitySet`] and, for lists, the
//! descriptor of the contained element.

mod compound;
mod identity;
mod scalar;

use std::fmt;

use indexmap::IndexMap;

use crate::error::PropertyError;
use crate::model::Value;

pub use compound::{DictionaryProperty, ListProperty};
pub use identity::{IdProperty, ReferenceProperty, TypeProperty};
pub use scalar::{
    BooleanProperty, EnumProperty, FloatProperty, IntegerProperty, StringProperty,
    TimestampProperty,
};

bitflags::bitflags! {
    /// Capabilities a property descriptor can expose.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct CapabilitySet: u32 {
        /// Values identify another object by reference.
        const OBJECT_REFERENCE = 1 << 0;
        /// Values are lists of a contained element descriptor.
        const LIST = 1 << 1;
        /// Values are string-keyed dictionaries.
        const DICTIONARY = 1 << 2;
        /// Values are timestamps.
        const TIMESTAMP = 1 << 3;
        /// Values are identifiers of the object itself.
        const IDENTIFIER = 1 << 4;
        /// Values are the object's type name.
        const TYPE_NAME = 1 << 5;
    }
}

/// A property descriptor.
pub trait Property: fmt::Debug + Send + Sync {
    /// Capability tags of this descriptor.
    fn capabilities(&self) -> CapabilitySet;

    /// The element descriptor of a list-shaped property.
    fn contained(&self) -> Option<&dyn Property> {
        None
    }

    /// Whether a value must be present after defaults are applied.
    fn is_required(&self) -> bool {
        false
    }

    /// Value used when the caller supplies none.
    fn default_value(&self) -> Option<Value> {
        None
    }

    /// Default for an object being constructed at `now` (epoch microseconds).
    ///
    /// All defaults of one object see the same `now`.
    fn default_value_at(&self, now: i64) -> Option<Value> {
        let _ = now;
        self.default_value()
    }

    /// Validates and normalizes a supplied value.
    fn clean(&self, value: Value) -> Result<Value, PropertyError>;

    /// Boxes this descriptor for use in a property list.
    fn boxed(self) -> Box<dyn Property>
    where
        Self: Sized + 'static,
    {
        Box::new(self)
    }
}

/// Ordered `(name, descriptor)` pairs as supplied by a caller.
pub type PropertyList = Vec<(String, Box<dyn Property>)>;

/// Ordered name → descriptor mapping installed on a custom type.
pub type PropertySchema = IndexMap<String, Box<dyn Property>>;

/// Returns true if `property` exposes every capability in `capability`.
pub fn has_capability(property: &dyn Property, capability: CapabilitySet) -> bool {
    property.capabilities().contains(capability)
}

/// Returns the element descriptor of a list-shaped property.
pub fn element_of(property: &dyn Property) -> Option<&dyn Property> {
    property.contained()
}

/// Describes the kind of a value for error messages.
pub(crate) fn describe(value: &Value) -> &'static str {
    match value {
        Value::String(_) => "a string",
        Value::Integer(_) => "an integer",
        Value::Float(_) => "a float",
        Value::Boolean(_) => "a boolean",
        Value::Timestamp { .. } => "a timestamp",
        Value::List(_) => "a list",
        Value::Dictionary(_) => "a dictionary",
    }
}
