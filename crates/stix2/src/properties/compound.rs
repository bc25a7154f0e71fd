//! List and dictionary descriptors.

use crate::error::PropertyError;
use crate::model::Value;
use crate::properties::{describe, CapabilitySet, Property};
use crate::rules::TYPE_NAME_MAX_LEN;

/// A non-empty list whose elements are cleaned by a contained descriptor.
#[derive(Debug)]
pub struct ListProperty {
    required: bool,
    contained: Box<dyn Property>,
}

impl ListProperty {
    pub fn new(contained: impl Property + 'static) -> Self {
        Self {
            required: false,
            contained: Box::new(contained),
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

impl Property for ListProperty {
    fn capabilities(&self) -> CapabilitySet {
        CapabilitySet::LIST
    }

    fn contained(&self) -> Option<&dyn Property> {
        Some(self.contained.as_ref())
    }

    fn is_required(&self) -> bool {
        self.required
    }

    fn clean(&self, value: Value) -> Result<Value, PropertyError> {
        // A bare element is accepted as a one-element list.
        let items = match value {
            Value::List(items) => items,
            other => vec![other],
        };
        if items.is_empty() {
            return Err(PropertyError::new("must be a non-empty list"));
        }
        items
            .into_iter()
            .enumerate()
            .map(|(i, item)| {
                self.contained
                    .clean(item)
                    .map_err(|e| PropertyError::new(format!("item {}: {}", i, e.reason)))
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Value::List)
    }
}

/// A non-empty string-keyed dictionary.
#[derive(Debug, Clone, Default)]
pub struct DictionaryProperty {
    required: bool,
}

impl DictionaryProperty {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

impl Property for DictionaryProperty {
    fn capabilities(&self) -> CapabilitySet {
        CapabilitySet::DICTIONARY
    }

    fn is_required(&self) -> bool {
        self.required
    }

    fn clean(&self, value: Value) -> Result<Value, PropertyError> {
        let Value::Dictionary(map) = value else {
            return Err(PropertyError::new(format!(
                "must be a dictionary, got {}",
                describe(&value)
            )));
        };
        if map.is_empty() {
            return Err(PropertyError::new("must contain a non-empty dictionary"));
        }
        if let Some(key) = map
            .keys()
            .find(|k| k.is_empty() || k.chars().count() > TYPE_NAME_MAX_LEN)
        {
            return Err(PropertyError::new(format!(
                "dictionary key '{}' must be between 1 and {} characters",
                key, TYPE_NAME_MAX_LEN
            )));
        }
        Ok(Value::Dictionary(map))
    }
}
