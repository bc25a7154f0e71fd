//! Build-time validation of custom type declarations.
//!
//! Checks run in this order before a custom type is composed:
//! - binding (extensions only): the extension names a valid observable type
//! - name and shape: the type name follows the naming rules and at least
//!   one property is declared
//! - reference conventions (observables and extensions only): see [`refs`]
//!
//! All are pure; a failure here never touches a registry. A
//! [`ValidatedSchema`] can only be obtained from [`validate_shape`], so every
//! composed type has passed all of them.

pub mod refs;

use crate::custom::StixType;
use crate::error::{CustomTypeError, NameRule};
use crate::model::ObjectKind;
use crate::properties::{PropertyList, PropertySchema};
use crate::rules::{matches_type_name_pattern, within_type_name_length};

pub use refs::check_reference_properties;

/// A type declaration that passed validation.
#[derive(Debug)]
pub struct ValidatedSchema {
    kind: ObjectKind,
    type_name: String,
    properties: PropertySchema,
    observable_type: Option<String>,
}

impl ValidatedSchema {
    pub fn kind(&self) -> ObjectKind {
        self.kind
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn properties(&self) -> &PropertySchema {
        &self.properties
    }

    /// The observable type an extension is bound to.
    pub fn observable_type(&self) -> Option<&str> {
        self.observable_type.as_deref()
    }

    pub(crate) fn into_parts(self) -> (ObjectKind, String, PropertySchema, Option<String>) {
        (self.kind, self.type_name, self.properties, self.observable_type)
    }
}

/// Checks `name` against the pattern rule, then the length rule.
pub fn validate_type_name(kind: ObjectKind, name: &str) -> Result<(), CustomTypeError> {
    let rule = if !matches_type_name_pattern(name) {
        NameRule::Pattern
    } else if !within_type_name_length(name) {
        NameRule::Length
    } else {
        return Ok(());
    };
    Err(CustomTypeError::InvalidTypeName {
        kind,
        name: name.to_string(),
        rule,
    })
}

/// Checks that `observable` is a usable binding for `extension`.
///
/// Returns the observable's type name.
pub fn validate_binding(
    extension: &str,
    observable: Option<&dyn StixType>,
) -> Result<String, CustomTypeError> {
    let Some(observable) = observable else {
        return Err(CustomTypeError::MissingObservableBinding {
            extension: extension.to_string(),
        });
    };
    if observable.kind() != ObjectKind::Observable || observable.type_name().is_empty() {
        return Err(CustomTypeError::InvalidObservableBinding {
            extension: extension.to_string(),
            found: observable.kind(),
            found_type: observable.type_name().to_string(),
        });
    }
    Ok(observable.type_name().to_string())
}

/// Validates a type declaration.
///
/// `observable` is the binding of an extension and is ignored for other
/// kinds. Markings skip the name rules unless `check_marking_name` is set.
/// Properties keep the caller's order; a repeated name keeps its first
/// position and takes the last descriptor.
pub fn validate_shape(
    kind: ObjectKind,
    type_name: &str,
    properties: PropertyList,
    observable: Option<&dyn StixType>,
    check_marking_name: bool,
) -> Result<ValidatedSchema, CustomTypeError> {
    let observable_type = if kind == ObjectKind::Extension {
        Some(validate_binding(type_name, observable)?)
    } else {
        None
    };

    if kind != ObjectKind::Marking || check_marking_name {
        validate_type_name(kind, type_name)?;
    }

    if properties.is_empty() {
        return Err(CustomTypeError::EmptyPropertySchema {
            kind,
            type_name: type_name.to_string(),
        });
    }

    let properties: PropertySchema = properties.into_iter().collect();
    if kind.checks_reference_names() {
        check_reference_properties(&properties)?;
    }

    Ok(ValidatedSchema {
        kind,
        type_name: type_name.to_string(),
        properties,
        observable_type,
    })
}
