//! Custom type builders.
//!
//! Each builder validates a type declaration, composes the user
//! implementation with the base behavior of its kind, and registers the
//! result in the process-wide registry. Nothing is registered when
//! validation fails.
//!
//! ```rust
//! use stix2::custom::build_custom_observable;
//! use stix2::properties::{Property, ReferenceProperty, StringProperty};
//! use stix2::SpecVersion;
//!
//! let ty = build_custom_observable(
//!     (),
//!     "x-doc-observable",
//!     vec![
//!         ("value", StringProperty::new().boxed()),
//!         ("parent_ref", ReferenceProperty::new().boxed()),
//!     ],
//!     SpecVersion::V21,
//! )
//! .unwrap();
//! assert_eq!(ty.property_names().collect::<Vec<_>>(), ["value", "parent_ref"]);
//! ```

pub mod behavior;
pub mod compose;

use std::sync::Arc;

use crate::error::CustomTypeError;
use crate::properties::Property;
use crate::registry::with_global_mut;
use crate::version::SpecVersion;

pub use behavior::{from_fn, CustomBehavior, FnBehavior};
pub use compose::{compose, BuiltinType, CustomType, StixObject, StixType};

/// Builds a custom domain object type and registers it globally.
pub fn build_custom_object<T, S, I>(
    imp: T,
    type_name: &str,
    properties: I,
    version: SpecVersion,
) -> Result<Arc<CustomType>, CustomTypeError>
where
    T: CustomBehavior,
    S: Into<String>,
    I: IntoIterator<Item = (S, Box<dyn Property>)>,
{
    with_global_mut(|reg| reg.build_custom_object(imp, type_name, properties, version))
}

/// Builds a custom marking type and registers it globally.
pub fn build_custom_marking<T, S, I>(
    imp: T,
    type_name: &str,
    properties: I,
    version: SpecVersion,
) -> Result<Arc<CustomType>, CustomTypeError>
where
    T: CustomBehavior,
    S: Into<String>,
    I: IntoIterator<Item = (S, Box<dyn Property>)>,
{
    with_global_mut(|reg| reg.build_custom_marking(imp, type_name, properties, version))
}

/// Builds a custom observable type and registers it globally.
pub fn build_custom_observable<T, S, I>(
    imp: T,
    type_name: &str,
    properties: I,
    version: SpecVersion,
) -> Result<Arc<CustomType>, CustomTypeError>
where
    T: CustomBehavior,
    S: Into<String>,
    I: IntoIterator<Item = (S, Box<dyn Property>)>,
{
    with_global_mut(|reg| reg.build_custom_observable(imp, type_name, properties, version))
}

/// Builds an extension of `observable` and registers it globally.
pub fn build_custom_extension<T, S, I>(
    imp: T,
    observable: &dyn StixType,
    type_name: &str,
    properties: I,
    version: SpecVersion,
) -> Result<Arc<CustomType>, CustomTypeError>
where
    T: CustomBehavior,
    S: Into<String>,
    I: IntoIterator<Item = (S, Box<dyn Property>)>,
{
    with_global_mut(|reg| {
        reg.build_custom_extension(imp, observable, type_name, properties, version)
    })
}
