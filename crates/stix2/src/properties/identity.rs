//! Type, identifier, and reference descriptors.

use crate::error::PropertyError;
use crate::model::id::{generate_id, parse_id};
use crate::model::Value;
use crate::properties::{describe, CapabilitySet, Property};

/// The `type` property: fixed to the owning type's name.
#[derive(Debug, Clone)]
pub struct TypeProperty {
    type_name: String,
}

impl TypeProperty {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
        }
    }
}

impl Property for TypeProperty {
    fn capabilities(&self) -> CapabilitySet {
        CapabilitySet::TYPE_NAME
    }

    fn default_value(&self) -> Option<Value> {
        Some(Value::String(self.type_name.clone()))
    }

    fn clean(&self, value: Value) -> Result<Value, PropertyError> {
        match value {
            Value::String(s) if s == self.type_name => Ok(Value::String(s)),
            _ => Err(PropertyError::new(format!("must equal '{}'", self.type_name))),
        }
    }
}

/// The `id` property: `<type>--<uuid>`, generated when absent.
#[derive(Debug, Clone)]
pub struct IdProperty {
    type_name: String,
}

impl IdProperty {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
        }
    }
}

impl Property for IdProperty {
    fn capabilities(&self) -> CapabilitySet {
        CapabilitySet::IDENTIFIER
    }

    fn default_value(&self) -> Option<Value> {
        Some(Value::String(generate_id(&self.type_name)))
    }

    fn clean(&self, value: Value) -> Result<Value, PropertyError> {
        let Value::String(id) = value else {
            return Err(PropertyError::new(format!(
                "must be an identifier string, got {}",
                describe(&value)
            )));
        };
        match parse_id(&id) {
            Some((type_name, _)) if type_name == self.type_name => Ok(Value::String(id)),
            Some(_) => Err(PropertyError::new(format!(
                "must start with '{}--'",
                self.type_name
            ))),
            None => Err(PropertyError::new(format!(
                "must be an identifier of the form '{}--<UUID>'",
                self.type_name
            ))),
        }
    }
}

/// A reference to another object by identifier.
#[derive(Debug, Clone, Default)]
pub struct ReferenceProperty {
    required: bool,
    valid_types: Vec<String>,
}

impl ReferenceProperty {
    /// A reference to an object of any type.
    pub fn new() -> Self {
        Self::default()
    }

    /// A reference restricted to the given object types.
    pub fn to_types<S: Into<String>>(types: impl IntoIterator<Item = S>) -> Self {
        Self {
            required: false,
            valid_types: types.into_iter().map(Into::into).collect(),
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

impl Property for ReferenceProperty {
    fn capabilities(&self) -> CapabilitySet {
        CapabilitySet::OBJECT_REFERENCE
    }

    fn is_required(&self) -> bool {
        self.required
    }

    fn clean(&self, value: Value) -> Result<Value, PropertyError> {
        let Value::String(reference) = value else {
            return Err(PropertyError::new(format!(
                "must be an identifier string, got {}",
                describe(&value)
            )));
        };
        let Some((target, _)) = parse_id(&reference) else {
            return Err(PropertyError::new(format!(
                "'{}' is not a valid identifier",
                reference
            )));
        };
        if !self.valid_types.is_empty() && !self.valid_types.iter().any(|t| t == target) {
            return Err(PropertyError::new(format!(
                "must reference one of: {}",
                self.valid_types.join(", ")
            )));
        }
        Ok(Value::String(reference))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const IDENTITY: &str = "identity--311b2d2d-f010-4473-83ec-1edf84858f4c";

    #[test]
    fn test_type_property() {
        let p = TypeProperty::new("x-thing");
        assert_eq!(p.default_value(), Some(Value::from("x-thing")));
        assert!(p.clean(Value::from("x-other")).is_err());
    }

    #[test]
    fn test_id_property_default_and_check() {
        let p = IdProperty::new("x-thing");
        let Some(Value::String(id)) = p.default_value() else {
            panic!("expected a generated id");
        };
        assert!(id.starts_with("x-thing--"));
        assert!(p.clean(Value::String(id)).is_ok());
        assert!(p.clean(Value::from(IDENTITY)).is_err());
        assert!(p.clean(Value::from("x-thing--1234")).is_err());
    }

    #[test]
    fn test_reference_valid_types() {
        let any = ReferenceProperty::new();
        assert!(any.clean(Value::from(IDENTITY)).is_ok());
        assert!(any.clean(Value::from("not-an-id")).is_err());
        assert!(any.clean(Value::Integer(0)).is_err());

        let marking = ReferenceProperty::to_types(["marking-definition"]);
        let err = marking.clean(Value::from(IDENTITY)).unwrap_err();
        assert_eq!(err.reason, "must reference one of: marking-definition");
    }
}
