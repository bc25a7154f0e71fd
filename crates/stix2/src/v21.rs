//! STIX 2.1 custom types.
//!
//! The builders here pin the spec version to 2.1. Custom domain objects
//! built through [`custom_object`] also receive the common 2.1 object
//! properties around the caller's own.

use std::sync::Arc;

use crate::custom::{self, CustomBehavior, CustomType, StixType};
use crate::error::CustomTypeError;
use crate::properties::{
    BooleanProperty, DictionaryProperty, IdProperty, IntegerProperty, ListProperty, Property,
    PropertyList, ReferenceProperty, StringProperty, TimestampProperty, TypeProperty,
};
use crate::rules::CUSTOM_PROPERTY_PREFIX;
use crate::util::datetime::Precision;
use crate::version::SpecVersion;

/// Value of the `spec_version` property.
pub const SPEC_VERSION: &str = "2.1";

fn timestamp_ms() -> TimestampProperty {
    TimestampProperty::new()
        .precision(Precision::Millisecond)
        .default_now()
}

/// Surrounds `properties` with the common 2.1 domain object properties.
///
/// Common leading properties come first, then the caller's properties in
/// their order, then the common trailing properties. Properties starting
/// with `x_` are moved to the end, sorted by name.
pub fn object_properties(type_name: &str, properties: PropertyList) -> PropertyList {
    let (mut custom, plain): (PropertyList, PropertyList) = properties
        .into_iter()
        .partition(|(name, _)| name.starts_with(CUSTOM_PROPERTY_PREFIX));
    custom.sort_by(|(a, _), (b, _)| a.cmp(b));

    let mut out: PropertyList = Vec::with_capacity(plain.len() + custom.len() + 14);
    let mut push = |name: &str, property: Box<dyn Property>| out.push((name.to_string(), property));

    push("type", TypeProperty::new(type_name).boxed());
    push("spec_version", StringProperty::fixed(SPEC_VERSION).boxed());
    push("id", IdProperty::new(type_name).boxed());
    push("created_by_ref", ReferenceProperty::to_types(["identity"]).boxed());
    push("created", timestamp_ms().boxed());
    push("modified", timestamp_ms().boxed());
    for (name, property) in plain {
        push(&name, property);
    }
    push("revoked", BooleanProperty::new().with_default(false).boxed());
    push("labels", ListProperty::new(StringProperty::new()).boxed());
    push("confidence", IntegerProperty::new().min(0).max(100).boxed());
    push("lang", StringProperty::new().boxed());
    push("external_references", ListProperty::new(DictionaryProperty::new()).boxed());
    push(
        "object_marking_refs",
        ListProperty::new(ReferenceProperty::to_types(["marking-definition"])).boxed(),
    );
    push("granular_markings", ListProperty::new(DictionaryProperty::new()).boxed());
    for (name, property) in custom {
        push(&name, property);
    }
    out
}

fn collect<S, I>(properties: I) -> PropertyList
where
    S: Into<String>,
    I: IntoIterator<Item = (S, Box<dyn Property>)>,
{
    properties
        .into_iter()
        .map(|(name, property)| (name.into(), property))
        .collect()
}

/// Builds a 2.1 custom domain object with the common object properties.
pub fn custom_object<T, S, I>(
    imp: T,
    type_name: &str,
    properties: I,
) -> Result<Arc<CustomType>, CustomTypeError>
where
    T: CustomBehavior,
    S: Into<String>,
    I: IntoIterator<Item = (S, Box<dyn Property>)>,
{
    let properties = object_properties(type_name, collect(properties));
    custom::build_custom_object(imp, type_name, properties, SpecVersion::V21)
}

/// Builds a 2.1 custom marking.
pub fn custom_marking<T, S, I>(
    imp: T,
    type_name: &str,
    properties: I,
) -> Result<Arc<CustomType>, CustomTypeError>
where
    T: CustomBehavior,
    S: Into<String>,
    I: IntoIterator<Item = (S, Box<dyn Property>)>,
{
    custom::build_custom_marking(imp, type_name, properties, SpecVersion::V21)
}

/// Builds a 2.1 custom observable.
pub fn custom_observable<T, S, I>(
    imp: T,
    type_name: &str,
    properties: I,
) -> Result<Arc<CustomType>, CustomTypeError>
where
    T: CustomBehavior,
    S: Into<String>,
    I: IntoIterator<Item = (S, Box<dyn Property>)>,
{
    custom::build_custom_observable(imp, type_name, properties, SpecVersion::V21)
}

/// Builds a 2.1 extension of `observable`.
pub fn custom_extension<T, S, I>(
    imp: T,
    observable: &dyn StixType,
    type_name: &str,
    properties: I,
) -> Result<Arc<CustomType>, CustomTypeError>
where
    T: CustomBehavior,
    S: Into<String>,
    I: IntoIterator<Item = (S, Box<dyn Property>)>,
{
    custom::build_custom_extension(imp, observable, type_name, properties, SpecVersion::V21)
}
