//! STIX 2 custom types: builders and registries for user-defined domain
//! objects, markings, observables, and observable extensions.
//!
//! # Overview
//!
//! A custom type is declared with a type name, an ordered list of property
//! descriptors, and a user implementation. Building it:
//! - validates the type name and that the property list is not empty
//! - checks the `_ref` / `_refs` naming convention (observables and extensions)
//! - composes the user implementation with the base behavior of its kind
//! - registers the result under `(kind, type name, spec version)`
//!
//! Instances are created from field values. The base behavior cleans and
//! defaults them first, then the user's constructor runs. An implementation
//! without a constructor just gets the base behavior.
//!
//! # Quick Start
//!
//! ```rust
//! use stix2::properties::{IntegerProperty, Property, StringProperty};
//! use stix2::{fields, registry, CustomBehavior, Fields, InitError, ObjectKind, SpecVersion, Value};
//!
//! struct NewObject;
//!
//! impl CustomBehavior for NewObject {
//!     fn init(&self, fields: &Fields) -> Result<(), InitError> {
//!         if fields.get("property2").and_then(|v| v.as_i64()).is_some_and(|v| v < 10) {
//!             return Err(InitError::failed("'property2' is too small."));
//!         }
//!         Ok(())
//!     }
//! }
//!
//! stix2::build_custom_object(
//!     NewObject,
//!     "x-quickstart-object",
//!     vec![
//!         ("property1", StringProperty::new().required().boxed()),
//!         ("property2", IntegerProperty::new().boxed()),
//!     ],
//!     SpecVersion::V20,
//! )
//! .unwrap();
//!
//! let err = registry::instantiate(
//!     ObjectKind::DomainObject,
//!     "x-quickstart-object",
//!     &SpecVersion::V20,
//!     fields([("property1", Value::from("something")), ("property2", Value::from(5i64))]),
//! )
//! .unwrap_err();
//! assert_eq!(err.to_string(), "'property2' is too small.");
//! ```
//!
//! # Modules
//!
//! - [`custom`]: Builders, user implementations, and type composition
//! - [`registry`]: Per-kind registries and the process-wide registry
//! - [`properties`]: Property descriptors and capabilities
//! - [`base`]: Base behavior of each kind
//! - [`validate`]: Build-time validation
//! - [`v21`]: STIX 2.1 builders and common object properties
//! - [`model`]: Object kinds, identifiers, and values
//! - [`error`]: Error types
//! - [`rules`]: Naming rules and limits

pub mod base;
pub mod custom;
pub mod error;
pub mod model;
pub mod properties;
pub mod registry;
pub mod rules;
pub mod util;
pub mod v21;
pub mod validate;
pub mod version;

// Re-export commonly used types at crate root
pub use custom::{
    build_custom_extension, build_custom_marking, build_custom_object, build_custom_observable,
    from_fn, BuiltinType, CustomBehavior, CustomType, StixObject, StixType,
};
pub use error::{
    ConstructionError, CreateError, CustomTypeError, ErrorCategory, InitError, NameRule,
    PropertyError, UserError,
};
pub use model::{fields, Fields, ObjectKind, Value, ValueKind};
pub use properties::{CapabilitySet, Property, PropertyList};
pub use registry::{DuplicatePolicy, Registry, RegistryConfig, RegistryKey};
pub use validate::ValidatedSchema;
pub use version::SpecVersion;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
