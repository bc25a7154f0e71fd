//! Base behaviors of the four object kinds.
//!
//! A base behavior is the framework half of a custom type's constructor.
//! It enforces the schema independently of any user code:
//! - no properties outside the schema
//! - every supplied value cleans against its descriptor
//! - defaults are applied for absent values, all computed at one instant
//! - required properties are present
//! - kind-specific object constraints hold

use crate::error::ConstructionError;
use crate::model::{Fields, ObjectKind};
use crate::properties::PropertySchema;
use crate::util::datetime::now_micros;

/// Construction contract shared by all kinds.
pub trait BaseBehavior: Send + Sync {
    /// The kind this behavior constructs.
    fn kind(&self) -> ObjectKind;

    /// Checks constraints spanning several fields.
    ///
    /// `supplied` is the number of properties the caller supplied.
    fn check_object_constraints(
        &self,
        type_name: &str,
        fields: &Fields,
        supplied: usize,
    ) -> Result<(), ConstructionError> {
        let _ = (type_name, fields, supplied);
        Ok(())
    }

    /// Builds the validated fields of a new object, in schema order.
    fn construct(
        &self,
        type_name: &str,
        schema: &PropertySchema,
        fields: Fields,
    ) -> Result<Fields, ConstructionError> {
        let extra: Vec<String> = fields
            .keys()
            .filter(|name| !schema.contains_key(name.as_str()))
            .cloned()
            .collect();
        if !extra.is_empty() {
            return Err(ConstructionError::ExtraProperties {
                type_name: type_name.to_string(),
                properties: extra,
            });
        }

        let supplied = fields.len();
        let now = now_micros();
        let mut fields = fields;
        let mut cleaned = Fields::with_capacity(schema.len());
        let mut missing = Vec::new();

        for (name, property) in schema {
            let value = match fields.swap_remove(name) {
                Some(value) => Some(property.clean(value).map_err(|source| {
                    ConstructionError::InvalidValue {
                        type_name: type_name.to_string(),
                        property: name.clone(),
                        source,
                    }
                })?),
                None => property.default_value_at(now),
            };
            match value {
                Some(value) => {
                    cleaned.insert(name.clone(), value);
                }
                None if property.is_required() => missing.push(name.clone()),
                None => {}
            }
        }

        if !missing.is_empty() {
            return Err(ConstructionError::MissingProperties {
                type_name: type_name.to_string(),
                properties: missing,
            });
        }

        self.check_object_constraints(type_name, &cleaned, supplied)?;
        Ok(cleaned)
    }
}

/// Base behavior of domain objects.
#[derive(Debug, Clone, Copy, Default)]
pub struct DomainObjectBase;

impl BaseBehavior for DomainObjectBase {
    fn kind(&self) -> ObjectKind {
        ObjectKind::DomainObject
    }

    fn check_object_constraints(
        &self,
        type_name: &str,
        fields: &Fields,
        _supplied: usize,
    ) -> Result<(), ConstructionError> {
        let created = fields.get("created").and_then(|v| v.as_timestamp());
        let modified = fields.get("modified").and_then(|v| v.as_timestamp());
        if let (Some(created), Some(modified)) = (created, modified) {
            if modified < created {
                return Err(ConstructionError::ModifiedBeforeCreated {
                    type_name: type_name.to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Base behavior of marking definitions.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkingBase;

impl BaseBehavior for MarkingBase {
    fn kind(&self) -> ObjectKind {
        ObjectKind::Marking
    }
}

/// Base behavior of observables.
#[derive(Debug, Clone, Copy, Default)]
pub struct ObservableBase;

impl BaseBehavior for ObservableBase {
    fn kind(&self) -> ObjectKind {
        ObjectKind::Observable
    }
}

/// Base behavior of observable extensions.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExtensionBase;

impl BaseBehavior for ExtensionBase {
    fn kind(&self) -> ObjectKind {
        ObjectKind::Extension
    }

    fn check_object_constraints(
        &self,
        type_name: &str,
        _fields: &Fields,
        supplied: usize,
    ) -> Result<(), ConstructionError> {
        if supplied == 0 {
            return Err(ConstructionError::AtLeastOneProperty {
                type_name: type_name.to_string(),
            });
        }
        Ok(())
    }
}

/// Returns the base behavior for `kind`.
pub fn base_for(kind: ObjectKind) -> &'static dyn BaseBehavior {
    match kind {
        ObjectKind::DomainObject => &DomainObjectBase,
        ObjectKind::Marking => &MarkingBase,
        ObjectKind::Observable => &ObservableBase,
        ObjectKind::Extension => &ExtensionBase,
    }
}
