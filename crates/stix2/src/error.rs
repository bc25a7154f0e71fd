//! Error types for custom type building, construction, and registration.

use std::error::Error as StdError;
use std::fmt;

use thiserror::Error;

use crate::model::ObjectKind;
use crate::version::SpecVersion;

/// Error raised by user code, carried through unchanged.
pub type UserError = Box<dyn StdError + Send + Sync + 'static>;

/// Broad category of a build-time failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Type name or property list is malformed.
    Shape,
    /// A `_ref`/`_refs` property does not carry the reference capability.
    Convention,
    /// An extension is not bound to an observable.
    Binding,
    /// The registry refused a second type under the same key.
    Collision,
}

/// The type name rule that was violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameRule {
    /// Only a-z, 0-9 and hyphen are allowed.
    Pattern,
    /// Length must be within the configured bounds.
    Length,
}

impl fmt::Display for NameRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NameRule::Pattern => f.write_str(
                "must only contain the characters a-z (lowercase ASCII), 0-9, and hyphen (-)",
            ),
            NameRule::Length => write!(
                f,
                "must be between {} and {} characters",
                crate::rules::TYPE_NAME_MIN_LEN,
                crate::rules::TYPE_NAME_MAX_LEN
            ),
        }
    }
}

/// Error while building or registering a custom type.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CustomTypeError {
    #[error("invalid {kind} type name '{name}': {rule}")]
    InvalidTypeName {
        kind: ObjectKind,
        name: String,
        rule: NameRule,
    },

    #[error("custom {kind} type '{type_name}' must declare at least one property")]
    EmptyPropertySchema { kind: ObjectKind, type_name: String },

    #[error("'{0}' is named like an object reference property but is not an object reference property")]
    BadReferenceProperty(String),

    #[error("'{0}' is named like an object reference list property but is not a list of object reference properties")]
    BadReferenceListProperty(String),

    #[error("extension '{extension}' must be bound to a valid observable type, got {found} '{found_type}'")]
    InvalidObservableBinding {
        extension: String,
        found: ObjectKind,
        found_type: String,
    },

    #[error("extension '{extension}' is not bound to an observable type")]
    MissingObservableBinding { extension: String },

    #[error("{kind} type '{type_name}' is already registered for version {version}")]
    DuplicateType {
        kind: ObjectKind,
        type_name: String,
        version: SpecVersion,
    },
}

impl CustomTypeError {
    /// Returns the category of this error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            CustomTypeError::InvalidTypeName { .. } | CustomTypeError::EmptyPropertySchema { .. } => {
                ErrorCategory::Shape
            }
            CustomTypeError::BadReferenceProperty(_)
            | CustomTypeError::BadReferenceListProperty(_) => ErrorCategory::Convention,
            CustomTypeError::InvalidObservableBinding { .. }
            | CustomTypeError::MissingObservableBinding { .. } => ErrorCategory::Binding,
            CustomTypeError::DuplicateType { .. } => ErrorCategory::Collision,
        }
    }
}

/// Why a single value was rejected by its property descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{reason}")]
pub struct PropertyError {
    pub reason: String,
}

impl PropertyError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Error raised by a kind's base behavior while constructing an object.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConstructionError {
    #[error("unexpected properties for {type_name}: {}", .properties.join(", "))]
    ExtraProperties {
        type_name: String,
        properties: Vec<String>,
    },

    #[error("no values for required properties for {type_name}: {}", .properties.join(", "))]
    MissingProperties {
        type_name: String,
        properties: Vec<String>,
    },

    #[error("invalid value for {type_name} '{property}': {source}")]
    InvalidValue {
        type_name: String,
        property: String,
        source: PropertyError,
    },

    #[error("at least one property must be populated for {type_name}")]
    AtLeastOneProperty { type_name: String },

    #[error("{type_name} 'modified' must be later than or equal to 'created'")]
    ModifiedBeforeCreated { type_name: String },
}

/// Outcome of a user constructor that did not succeed.
///
/// The first two variants mean the implementation carries no construction
/// logic and are treated as success by the composer.
#[derive(Debug, Error)]
pub enum InitError {
    #[error("implementation defines no constructor")]
    NoConstructor,

    #[error("implementation constructor takes no parameters")]
    TakesNoParameters,

    #[error(transparent)]
    Failed(UserError),
}

impl InitError {
    /// Wraps a user error.
    pub fn failed(err: impl Into<UserError>) -> Self {
        InitError::Failed(err.into())
    }

    /// Returns true if this outcome only signals missing customization.
    pub fn is_absent_constructor(&self) -> bool {
        matches!(self, InitError::NoConstructor | InitError::TakesNoParameters)
    }
}

/// Error while creating an instance of a custom type.
#[derive(Debug, Error)]
pub enum CreateError {
    #[error(transparent)]
    Base(#[from] ConstructionError),

    /// Raised by the user constructor; displayed exactly as the user's error.
    #[error(transparent)]
    User(UserError),

    #[error("no {kind} type '{type_name}' registered for version {version}")]
    UnknownType {
        kind: ObjectKind,
        type_name: String,
        version: SpecVersion,
    },
}

impl CreateError {
    /// Returns the user's error, if this failure came from user code.
    pub fn user_error(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        match self {
            CreateError::User(err) => Some(err.as_ref()),
            _ => None,
        }
    }

    /// Consumes the error and returns the user's error, if any.
    pub fn into_user_error(self) -> Option<UserError> {
        match self {
            CreateError::User(err) => Some(err),
            _ => None,
        }
    }

    /// Returns the base behavior error, if any.
    pub fn construction_error(&self) -> Option<&ConstructionError> {
        match self {
            CreateError::Base(err) => Some(err),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_type_name_messages() {
        let err = CustomTypeError::InvalidTypeName {
            kind: ObjectKind::Observable,
            name: "X".to_string(),
            rule: NameRule::Pattern,
        };
        assert_eq!(
            err.to_string(),
            "invalid observable type name 'X': must only contain the characters a-z (lowercase ASCII), 0-9, and hyphen (-)"
        );

        let err = CustomTypeError::InvalidTypeName {
            kind: ObjectKind::Extension,
            name: "xy".to_string(),
            rule: NameRule::Length,
        };
        assert_eq!(
            err.to_string(),
            "invalid extension type name 'xy': must be between 3 and 250 characters"
        );
    }

    #[test]
    fn test_categories() {
        assert_eq!(
            CustomTypeError::BadReferenceProperty("a_ref".into()).category(),
            ErrorCategory::Convention
        );
        assert_eq!(
            CustomTypeError::EmptyPropertySchema {
                kind: ObjectKind::Marking,
                type_name: "x-m".into()
            }
            .category(),
            ErrorCategory::Shape
        );
    }

    #[test]
    fn test_user_error_is_transparent() {
        #[derive(Debug, Error)]
        #[error("'property2' is too small.")]
        struct TooSmall;

        let err = CreateError::User(Box::new(TooSmall));
        assert_eq!(err.to_string(), "'property2' is too small.");
        assert!(err.user_error().unwrap().downcast_ref::<TooSmall>().is_some());
        assert!(err.construction_error().is_none());
    }

    #[test]
    fn test_construction_error_lists_properties() {
        let err = ConstructionError::MissingProperties {
            type_name: "x-thing".into(),
            properties: vec!["a".into(), "b".into()],
        };
        assert_eq!(
            err.to_string(),
            "no values for required properties for x-thing: a, b"
        );
    }
}
