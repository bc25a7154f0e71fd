//! Composition of a user implementation with a kind's base behavior.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::base::{base_for, BaseBehavior};
use crate::custom::behavior::CustomBehavior;
use crate::error::{CreateError, InitError};
use crate::model::{Fields, ObjectKind, Value};
use crate::properties::PropertySchema;
use crate::registry::RegistryKey;
use crate::validate::ValidatedSchema;
use crate::version::SpecVersion;

/// Something with a STIX kind and type name, such as a registered type.
///
/// Extensions are bound to an observable through this trait.
pub trait StixType {
    fn kind(&self) -> ObjectKind;
    fn type_name(&self) -> &str;
}

/// A type defined outside the custom type registries, named by kind and type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltinType {
    kind: ObjectKind,
    type_name: String,
}

impl BuiltinType {
    pub fn new(kind: ObjectKind, type_name: impl Into<String>) -> Self {
        Self {
            kind,
            type_name: type_name.into(),
        }
    }

    /// A built-in observable such as `file` or `network-traffic`.
    pub fn observable(type_name: impl Into<String>) -> Self {
        Self::new(ObjectKind::Observable, type_name)
    }
}

impl StixType for BuiltinType {
    fn kind(&self) -> ObjectKind {
        self.kind
    }

    fn type_name(&self) -> &str {
        &self.type_name
    }
}

/// A composed custom type.
///
/// Holds the validated type name and property schema, the spec version it
/// was built for, the observable it extends (extensions only), and the
/// user implementation. Immutable once composed.
pub struct CustomType {
    kind: ObjectKind,
    type_name: String,
    properties: PropertySchema,
    version: SpecVersion,
    observable_type: Option<String>,
    behavior: Arc<dyn CustomBehavior>,
    implementation: Arc<dyn Any + Send + Sync>,
    implementation_name: &'static str,
}

/// Composes `imp` with the base behavior of the validated schema's kind.
///
/// Performs no registry mutation. Extensions stay bound to the observable
/// recorded during validation.
pub fn compose<T: CustomBehavior>(
    imp: T,
    validated: ValidatedSchema,
    version: SpecVersion,
) -> CustomType {
    let (kind, type_name, properties, observable_type) = validated.into_parts();
    let imp = Arc::new(imp);
    CustomType {
        kind,
        type_name,
        properties,
        version,
        observable_type,
        behavior: imp.clone(),
        implementation: imp,
        implementation_name: std::any::type_name::<T>(),
    }
}

impl CustomType {
    pub fn kind(&self) -> ObjectKind {
        self.kind
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// The property schema, in declaration order.
    pub fn properties(&self) -> &PropertySchema {
        &self.properties
    }

    /// Property names, in declaration order.
    pub fn property_names(&self) -> impl Iterator<Item = &str> {
        self.properties.keys().map(String::as_str)
    }

    pub fn version(&self) -> &SpecVersion {
        &self.version
    }

    /// The observable type an extension is bound to.
    pub fn observable_type(&self) -> Option<&str> {
        self.observable_type.as_deref()
    }

    /// The base behavior this type was composed with.
    pub fn base(&self) -> &'static dyn BaseBehavior {
        base_for(self.kind)
    }

    /// The user implementation, if it is a `T`.
    pub fn implementation<T: CustomBehavior>(&self) -> Option<&T> {
        self.implementation.downcast_ref::<T>()
    }

    /// The key this type is filed under.
    pub fn registry_key(&self) -> RegistryKey {
        match self.kind {
            ObjectKind::Extension => RegistryKey::Extension {
                observable_type: self.observable_type.clone().unwrap_or_default(),
                extension_type: self.type_name.clone(),
                version: self.version.clone(),
            },
            kind => RegistryKey::Type {
                kind,
                type_name: self.type_name.clone(),
                version: self.version.clone(),
            },
        }
    }

    /// Creates an instance from caller-supplied field values.
    ///
    /// The base behavior runs first and always; its errors are returned as
    /// [`CreateError::Base`]. The user constructor then runs with the same
    /// values. An implementation without a constructor is not an error;
    /// any other user error is returned unchanged as [`CreateError::User`].
    pub fn create(self: &Arc<Self>, fields: Fields) -> Result<StixObject, CreateError> {
        let supplied = fields.clone();
        let fields = self.base().construct(&self.type_name, &self.properties, fields)?;

        match self.behavior.init(&supplied) {
            Ok(()) => {}
            Err(InitError::NoConstructor | InitError::TakesNoParameters) => {
                tracing::trace!(
                    type_name = %self.type_name,
                    implementation = self.implementation_name,
                    "no custom constructor, using base behavior only"
                );
            }
            Err(InitError::Failed(err)) => return Err(CreateError::User(err)),
        }

        Ok(StixObject {
            ty: Arc::clone(self),
            fields,
        })
    }
}

impl StixType for CustomType {
    fn kind(&self) -> ObjectKind {
        self.kind
    }

    fn type_name(&self) -> &str {
        &self.type_name
    }
}

impl fmt::Debug for CustomType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomType")
            .field("kind", &self.kind)
            .field("type_name", &self.type_name)
            .field("properties", &self.properties.keys().collect::<Vec<_>>())
            .field("version", &self.version)
            .field("observable_type", &self.observable_type)
            .field("implementation", &self.implementation_name)
            .finish()
    }
}

/// An instance of a custom type.
#[derive(Debug, Clone)]
pub struct StixObject {
    ty: Arc<CustomType>,
    fields: Fields,
}

impl StixObject {
    /// The type this object was created from.
    pub fn custom_type(&self) -> &Arc<CustomType> {
        &self.ty
    }

    pub fn kind(&self) -> ObjectKind {
        self.ty.kind
    }

    pub fn type_name(&self) -> &str {
        &self.ty.type_name
    }

    pub fn spec_version(&self) -> &SpecVersion {
        &self.ty.version
    }

    /// The `id` field, for kinds that carry one.
    pub fn id(&self) -> Option<&str> {
        self.fields.get("id").and_then(Value::as_str)
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// All fields, in schema order.
    pub fn fields(&self) -> &Fields {
        &self.fields
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// The user implementation, if it is a `T`.
    pub fn implementation<T: CustomBehavior>(&self) -> Option<&T> {
        self.ty.implementation::<T>()
    }

    pub fn into_fields(self) -> Fields {
        self.fields
    }
}

impl std::ops::Index<&str> for StixObject {
    type Output = Value;

    fn index(&self, name: &str) -> &Value {
        &self.fields[name]
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use thiserror::Error;

    use super::*;
    use crate::custom::behavior::from_fn;
    use crate::error::ConstructionError;
    use crate::model::fields;
    use crate::properties::{IntegerProperty, Property, PropertyList, StringProperty};
    use crate::validate::validate_shape;

    #[derive(Debug, Error)]
    #[error("'property2' is too small.")]
    struct TooSmall;

    struct CheckSize;

    impl CustomBehavior for CheckSize {
        fn init(&self, fields: &Fields) -> Result<(), InitError> {
            match fields.get("property2").and_then(Value::as_i64) {
                Some(v) if v < 10 => Err(InitError::failed(TooSmall)),
                _ => Ok(()),
            }
        }
    }

    struct NoArgs;

    impl CustomBehavior for NoArgs {
        fn init(&self, _fields: &Fields) -> Result<(), InitError> {
            Err(InitError::TakesNoParameters)
        }
    }

    fn props() -> PropertyList {
        vec![
            ("property1".to_string(), StringProperty::new().required().boxed()),
            ("property2".to_string(), IntegerProperty::new().boxed()),
        ]
    }

    fn composed<T: CustomBehavior>(imp: T) -> Arc<CustomType> {
        let validated = validate_shape(ObjectKind::DomainObject, "x-new-type", props(), None, false)
            .expect("valid schema");
        Arc::new(compose(imp, validated, SpecVersion::V21))
    }

    #[test]
    fn test_no_constructor_fields_equal_base() {
        let ty = composed(());
        let input = fields([("property1", Value::from("a")), ("property2", Value::from(5i64))]);
        let expected = ty
            .base()
            .construct("x-new-type", ty.properties(), input.clone())
            .unwrap();
        let obj = ty.create(input).unwrap();
        assert_eq!(obj.fields(), &expected);
    }

    #[test]
    fn test_takes_no_parameters_suppressed() {
        let ty = composed(NoArgs);
        assert!(ty.create(fields([("property1", "a")])).is_ok());
    }

    #[test]
    fn test_user_error_surfaces_unchanged() {
        let ty = composed(CheckSize);
        let err = ty
            .create(fields([("property1", Value::from("a")), ("property2", Value::from(5i64))]))
            .unwrap_err();
        assert_eq!(err.to_string(), "'property2' is too small.");
        let user = err.into_user_error().expect("user error");
        assert!(user.downcast_ref::<TooSmall>().is_some());

        assert!(ty
            .create(fields([("property1", Value::from("a")), ("property2", Value::from(50i64))]))
            .is_ok());
    }

    #[test]
    fn test_base_runs_before_user_constructor() {
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&calls);
        let ty = composed(from_fn(move |_| {
            seen.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }));

        // Missing required property: the user constructor never runs.
        let err = ty.create(fields([("property2", 5i64)])).unwrap_err();
        assert!(matches!(
            err.construction_error(),
            Some(ConstructionError::MissingProperties { .. })
        ));
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        ty.create(fields([("property1", "a")])).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_user_sees_supplied_values() {
        let ty = composed(from_fn(|fields: &Fields| {
            // Defaults are not part of the supplied values.
            assert!(fields.get("property2").is_none());
            assert_eq!(fields.len(), 1);
            Ok(())
        }));
        ty.create(fields([("property1", "a")])).unwrap();
    }

    #[test]
    fn test_instance_accessors() {
        let ty = composed(CheckSize);
        let obj = ty.create(fields([("property1", "a")])).unwrap();
        assert_eq!(obj.type_name(), "x-new-type");
        assert_eq!(obj.kind(), ObjectKind::DomainObject);
        assert_eq!(obj.spec_version(), &SpecVersion::V21);
        assert_eq!(obj["property1"], Value::from("a"));
        assert!(obj.implementation::<CheckSize>().is_some());
        assert!(obj.implementation::<NoArgs>().is_none());
        assert!(obj.id().is_none());
    }

    #[test]
    fn test_registry_key() {
        let ty = composed(());
        assert_eq!(
            ty.registry_key(),
            RegistryKey::Type {
                kind: ObjectKind::DomainObject,
                type_name: "x-new-type".into(),
                version: SpecVersion::V21,
            }
        );
    }
}
