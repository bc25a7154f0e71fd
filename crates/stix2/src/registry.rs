//! Registries of custom types.
//!
//! Domain objects, markings, and observables are filed by
//! `(type name, version)` in one table per kind. Extensions are filed by
//! `(observable type, extension type, version)`.
//!
//! A [`Registry`] can be owned directly. The free functions in this module
//! and the crate-level builders use a process-wide registry instead, which
//! is meant to be populated during startup and only read afterwards.
//! Registering the same key twice replaces the earlier type unless the
//! registry is configured with [`DuplicatePolicy::Reject`].

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use lazy_static::lazy_static;
use rustc_hash::FxHashMap;

use crate::custom::{compose, BuiltinType, CustomBehavior, CustomType, StixObject, StixType};
use crate::error::{CreateError, CustomTypeError};
use crate::model::{Fields, ObjectKind};
use crate::properties::Property;
use crate::validate::validate_shape;
use crate::version::SpecVersion;

/// What happens when a type is registered under an occupied key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicatePolicy {
    /// Replace the earlier type.
    #[default]
    LastWins,
    /// Keep the earlier type and fail with `DuplicateType`.
    Reject,
}

/// Registry settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RegistryConfig {
    pub duplicate_policy: DuplicatePolicy,
    /// Apply the type name rules to markings as well.
    pub strict_marking_names: bool,
}

/// The key a custom type is filed under.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RegistryKey {
    Type {
        kind: ObjectKind,
        type_name: String,
        version: SpecVersion,
    },
    Extension {
        observable_type: String,
        extension_type: String,
        version: SpecVersion,
    },
}

type TypeTable = FxHashMap<String, Arc<CustomType>>;

/// Custom types by kind and spec version.
#[derive(Debug, Default)]
pub struct Registry {
    config: RegistryConfig,
    objects: FxHashMap<SpecVersion, TypeTable>,
    markings: FxHashMap<SpecVersion, TypeTable>,
    observables: FxHashMap<SpecVersion, TypeTable>,
    extensions: FxHashMap<SpecVersion, FxHashMap<String, TypeTable>>,
}

impl Registry {
    /// Creates an empty registry with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty registry with `config`.
    pub fn with_config(config: RegistryConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> RegistryConfig {
        self.config
    }

    pub fn set_config(&mut self, config: RegistryConfig) {
        self.config = config;
    }

    // =========================================================================
    // Builders
    // =========================================================================

    /// Builds and registers a custom domain object type.
    pub fn build_custom_object<T, S, I>(
        &mut self,
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
        self.build(ObjectKind::DomainObject, imp, None, type_name, properties, version)
    }

    /// Builds and registers a custom marking type.
    ///
    /// The type name rules are skipped unless `strict_marking_names` is set.
    pub fn build_custom_marking<T, S, I>(
        &mut self,
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
        self.build(ObjectKind::Marking, imp, None, type_name, properties, version)
    }

    /// Builds and registers a custom observable type.
    pub fn build_custom_observable<T, S, I>(
        &mut self,
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
        self.build(ObjectKind::Observable, imp, None, type_name, properties, version)
    }

    /// Builds and registers an extension of `observable`.
    ///
    /// `observable` must be an observable type; this is checked before
    /// anything else, see [`validate_shape`].
    pub fn build_custom_extension<T, S, I>(
        &mut self,
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
        self.build(ObjectKind::Extension, imp, Some(observable), type_name, properties, version)
    }

    fn build<T, S, I>(
        &mut self,
        kind: ObjectKind,
        imp: T,
        observable: Option<&dyn StixType>,
        type_name: &str,
        properties: I,
        version: SpecVersion,
    ) -> Result<Arc<CustomType>, CustomTypeError>
    where
        T: CustomBehavior,
        S: Into<String>,
        I: IntoIterator<Item = (S, Box<dyn Property>)>,
    {
        let properties = properties
            .into_iter()
            .map(|(name, property)| (name.into(), property))
            .collect();
        let validated = validate_shape(
            kind,
            type_name,
            properties,
            observable,
            self.config.strict_marking_names,
        )?;
        self.register(Arc::new(compose(imp, validated, version)))
    }

    // =========================================================================
    // Registration and lookup
    // =========================================================================

    /// Files `ty` under its registry key and returns it.
    ///
    /// A [`CustomType`] can only be composed from a validated declaration,
    /// so everything filed here has passed the name, shape, reference, and
    /// binding checks.
    pub fn register(&mut self, ty: Arc<CustomType>) -> Result<Arc<CustomType>, CustomTypeError> {
        let policy = self.config.duplicate_policy;
        let table = self.table_mut(&ty);

        if policy == DuplicatePolicy::Reject && table.contains_key(ty.type_name()) {
            return Err(CustomTypeError::DuplicateType {
                kind: ty.kind(),
                type_name: ty.type_name().to_string(),
                version: ty.version().clone(),
            });
        }

        let replaced = table.insert(ty.type_name().to_string(), Arc::clone(&ty));
        if replaced.is_some() {
            tracing::warn!(
                kind = %ty.kind(),
                type_name = %ty.type_name(),
                version = %ty.version(),
                observable_type = ty.observable_type(),
                "custom type registration replaced an existing type"
            );
        } else {
            tracing::debug!(
                kind = %ty.kind(),
                type_name = %ty.type_name(),
                version = %ty.version(),
                observable_type = ty.observable_type(),
                "registered custom type"
            );
        }
        Ok(ty)
    }

    fn table_mut(&mut self, ty: &CustomType) -> &mut TypeTable {
        let version = ty.version().clone();
        match ty.kind() {
            ObjectKind::DomainObject => self.objects.entry(version).or_default(),
            ObjectKind::Marking => self.markings.entry(version).or_default(),
            ObjectKind::Observable => self.observables.entry(version).or_default(),
            ObjectKind::Extension => self
                .extensions
                .entry(version)
                .or_default()
                .entry(ty.observable_type().unwrap_or_default().to_string())
                .or_default(),
        }
    }

    fn table(&self, kind: ObjectKind, version: &SpecVersion) -> Option<&TypeTable> {
        match kind {
            ObjectKind::DomainObject => self.objects.get(version),
            ObjectKind::Marking => self.markings.get(version),
            ObjectKind::Observable => self.observables.get(version),
            ObjectKind::Extension => None,
        }
    }

    /// Looks up a domain object, marking, or observable type.
    ///
    /// Extensions are scoped to an observable; use [`Registry::lookup_extension`].
    pub fn lookup(
        &self,
        kind: ObjectKind,
        type_name: &str,
        version: &SpecVersion,
    ) -> Option<Arc<CustomType>> {
        self.table(kind, version)?.get(type_name).cloned()
    }

    /// Looks up an extension of `observable_type`.
    pub fn lookup_extension(
        &self,
        observable_type: &str,
        extension_type: &str,
        version: &SpecVersion,
    ) -> Option<Arc<CustomType>> {
        self.extensions
            .get(version)?
            .get(observable_type)?
            .get(extension_type)
            .cloned()
    }

    /// Looks up the type filed under `key`.
    pub fn get(&self, key: &RegistryKey) -> Option<Arc<CustomType>> {
        match key {
            RegistryKey::Type {
                kind,
                type_name,
                version,
            } => self.lookup(*kind, type_name, version),
            RegistryKey::Extension {
                observable_type,
                extension_type,
                version,
            } => self.lookup_extension(observable_type, extension_type, version),
        }
    }

    /// All extensions registered for `observable_type`, sorted by name.
    pub fn extensions_for(
        &self,
        observable_type: &str,
        version: &SpecVersion,
    ) -> Vec<Arc<CustomType>> {
        let mut found: Vec<_> = self
            .extensions
            .get(version)
            .and_then(|by_observable| by_observable.get(observable_type))
            .map(|table| table.values().cloned().collect())
            .unwrap_or_default();
        found.sort_by(|a, b| a.type_name().cmp(b.type_name()));
        found
    }

    /// Number of registered types across all kinds and versions.
    pub fn len(&self) -> usize {
        let flat = |m: &FxHashMap<SpecVersion, TypeTable>| m.values().map(|t| t.len()).sum::<usize>();
        flat(&self.objects)
            + flat(&self.markings)
            + flat(&self.observables)
            + self
                .extensions
                .values()
                .flat_map(|by_observable| by_observable.values())
                .map(|t| t.len())
                .sum::<usize>()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Creates an instance of a registered domain object, marking, or observable type.
    pub fn instantiate(
        &self,
        kind: ObjectKind,
        type_name: &str,
        version: &SpecVersion,
        fields: Fields,
    ) -> Result<StixObject, CreateError> {
        let ty = self
            .lookup(kind, type_name, version)
            .ok_or_else(|| CreateError::UnknownType {
                kind,
                type_name: type_name.to_string(),
                version: version.clone(),
            })?;
        ty.create(fields)
    }

    /// Creates an instance of a registered extension of `observable_type`.
    pub fn instantiate_extension(
        &self,
        observable_type: &str,
        extension_type: &str,
        version: &SpecVersion,
        fields: Fields,
    ) -> Result<StixObject, CreateError> {
        let ty = self
            .lookup_extension(observable_type, extension_type, version)
            .ok_or_else(|| CreateError::UnknownType {
                kind: ObjectKind::Extension,
                type_name: extension_type.to_string(),
                version: version.clone(),
            })?;
        ty.create(fields)
    }
}

// =============================================================================
// Process-wide registry
// =============================================================================

lazy_static! {
    static ref GLOBAL: RwLock<Registry> = RwLock::new(Registry::new());
}

fn read_global() -> RwLockReadGuard<'static, Registry> {
    GLOBAL.read().unwrap_or_else(PoisonError::into_inner)
}

fn write_global() -> RwLockWriteGuard<'static, Registry> {
    GLOBAL.write().unwrap_or_else(PoisonError::into_inner)
}

/// Runs `f` with exclusive access to the process-wide registry.
pub fn with_global_mut<R>(f: impl FnOnce(&mut Registry) -> R) -> R {
    f(&mut write_global())
}

/// Replaces the configuration of the process-wide registry.
pub fn configure_global(config: RegistryConfig) {
    write_global().set_config(config);
}

/// Looks up a type in the process-wide registry.
pub fn lookup(kind: ObjectKind, type_name: &str, version: &SpecVersion) -> Option<Arc<CustomType>> {
    read_global().lookup(kind, type_name, version)
}

/// Looks up an extension in the process-wide registry.
pub fn lookup_extension(
    observable_type: &str,
    extension_type: &str,
    version: &SpecVersion,
) -> Option<Arc<CustomType>> {
    read_global().lookup_extension(observable_type, extension_type, version)
}

/// Creates an instance of a type in the process-wide registry.
///
/// The registry lock is released before the type's constructor runs.
pub fn instantiate(
    kind: ObjectKind,
    type_name: &str,
    version: &SpecVersion,
    fields: Fields,
) -> Result<StixObject, CreateError> {
    let ty = lookup(kind, type_name, version).ok_or_else(|| CreateError::UnknownType {
        kind,
        type_name: type_name.to_string(),
        version: version.clone(),
    })?;
    ty.create(fields)
}

/// Observables that extensions can be bound to without a custom type.
pub fn builtin_observable(type_name: &str) -> BuiltinType {
    BuiltinType::observable(type_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fields;
    use crate::properties::{ListProperty, ReferenceProperty, StringProperty};

    fn value_props() -> Vec<(&'static str, Box<dyn Property>)> {
        vec![("value", StringProperty::new().boxed())]
    }

    #[test]
    fn test_register_accepts_only_validated_declarations() {
        use crate::properties::PropertyList;

        let string_ref = || -> PropertyList {
            vec![("parent_ref".to_string(), StringProperty::new().boxed())]
        };
        let err = validate_shape(ObjectKind::Observable, "x-low-obs", string_ref(), None, false)
            .unwrap_err();
        assert_eq!(err, CustomTypeError::BadReferenceProperty("parent_ref".into()));

        let note = || -> PropertyList { vec![("note".to_string(), StringProperty::new().boxed())] };
        let err = validate_shape(ObjectKind::Extension, "x-low-ext", note(), None, false)
            .unwrap_err();
        assert!(matches!(err, CustomTypeError::MissingObservableBinding { .. }));

        let mut reg = Registry::new();
        let file = builtin_observable("file");
        let validated =
            validate_shape(ObjectKind::Extension, "x-low-ext", note(), Some(&file), false).unwrap();
        let ty = reg
            .register(Arc::new(compose((), validated, SpecVersion::V21)))
            .unwrap();
        assert_eq!(ty.observable_type(), Some("file"));
        assert!(reg.lookup_extension("file", "x-low-ext", &SpecVersion::V21).is_some());
        assert!(reg.lookup_extension("", "x-low-ext", &SpecVersion::V21).is_none());
    }

    #[test]
    fn test_configure_global() {
        configure_global(RegistryConfig {
            duplicate_policy: DuplicatePolicy::Reject,
            strict_marking_names: true,
        });

        let first = crate::custom::build_custom_object(
            (),
            "x-configured-once",
            value_props(),
            SpecVersion::V21,
        );
        let second = crate::custom::build_custom_object(
            (),
            "x-configured-once",
            value_props(),
            SpecVersion::V21,
        );
        let marking = crate::custom::build_custom_marking(
            (),
            "Configured Marking",
            value_props(),
            SpecVersion::V21,
        );
        let config = with_global_mut(|reg| reg.config());
        configure_global(RegistryConfig::default());

        assert!(first.is_ok());
        assert!(matches!(second, Err(CustomTypeError::DuplicateType { .. })));
        assert!(matches!(marking, Err(CustomTypeError::InvalidTypeName { .. })));
        assert_eq!(config.duplicate_policy, DuplicatePolicy::Reject);
        assert!(lookup(ObjectKind::Marking, "Configured Marking", &SpecVersion::V21).is_none());
    }

    #[test]
    fn test_register_and_lookup_by_kind_and_version() {
        let mut reg = Registry::new();
        let ty = reg
            .build_custom_object((), "x-thing", value_props(), SpecVersion::V21)
            .unwrap();
        assert!(Arc::ptr_eq(
            &reg.lookup(ObjectKind::DomainObject, "x-thing", &SpecVersion::V21).unwrap(),
            &ty
        ));
        assert!(reg.lookup(ObjectKind::DomainObject, "x-thing", &SpecVersion::V20).is_none());
        assert!(reg.lookup(ObjectKind::Observable, "x-thing", &SpecVersion::V21).is_none());
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn test_last_registration_wins() {
        let mut reg = Registry::new();
        reg.build_custom_marking((), "x-mark", value_props(), SpecVersion::V20)
            .unwrap();
        let second = reg
            .build_custom_marking(
                (),
                "x-mark",
                vec![("other", StringProperty::new().boxed())],
                SpecVersion::V20,
            )
            .unwrap();

        let found = reg.lookup(ObjectKind::Marking, "x-mark", &SpecVersion::V20).unwrap();
        assert!(Arc::ptr_eq(&found, &second));
        assert_eq!(found.property_names().collect::<Vec<_>>(), ["other"]);
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn test_reject_policy() {
        let mut reg = Registry::with_config(RegistryConfig {
            duplicate_policy: DuplicatePolicy::Reject,
            ..RegistryConfig::default()
        });
        let first = reg
            .build_custom_observable((), "x-obs", value_props(), SpecVersion::V21)
            .unwrap();
        let err = reg
            .build_custom_observable((), "x-obs", value_props(), SpecVersion::V21)
            .unwrap_err();
        assert!(matches!(err, CustomTypeError::DuplicateType { .. }));

        let found = reg.lookup(ObjectKind::Observable, "x-obs", &SpecVersion::V21).unwrap();
        assert!(Arc::ptr_eq(&found, &first));
    }

    #[test]
    fn test_strict_marking_names() {
        let mut reg = Registry::new();
        assert!(reg
            .build_custom_marking((), "X Mark", value_props(), SpecVersion::V21)
            .is_ok());

        reg.set_config(RegistryConfig {
            strict_marking_names: true,
            ..RegistryConfig::default()
        });
        let err = reg
            .build_custom_marking((), "Y Mark", value_props(), SpecVersion::V21)
            .unwrap_err();
        assert!(matches!(err, CustomTypeError::InvalidTypeName { .. }));
    }

    #[test]
    fn test_failed_build_leaves_registry_untouched() {
        let mut reg = Registry::new();
        let err = reg
            .build_custom_observable(
                (),
                "x-obs",
                vec![("parent_ref", StringProperty::new().boxed())],
                SpecVersion::V21,
            )
            .unwrap_err();
        assert_eq!(err, CustomTypeError::BadReferenceProperty("parent_ref".into()));
        assert!(reg.is_empty());

        let err = reg
            .build_custom_object((), "x", value_props(), SpecVersion::V21)
            .unwrap_err();
        assert!(matches!(err, CustomTypeError::InvalidTypeName { .. }));
        assert!(reg.is_empty());
    }

    #[test]
    fn test_domain_objects_skip_reference_convention() {
        let mut reg = Registry::new();
        assert!(reg
            .build_custom_object(
                (),
                "x-thing",
                vec![("parent_ref", StringProperty::new().boxed())],
                SpecVersion::V21,
            )
            .is_ok());
    }

    #[test]
    fn test_extensions_scoped_to_observable() {
        let mut reg = Registry::new();
        let file = builtin_observable("file");
        let ext = reg
            .build_custom_extension(
                (),
                &file,
                "x-file-ext",
                vec![
                    ("note", StringProperty::new().boxed()),
                    ("related_refs", ListProperty::new(ReferenceProperty::new()).boxed()),
                ],
                SpecVersion::V21,
            )
            .unwrap();
        assert_eq!(ext.observable_type(), Some("file"));

        assert!(reg.lookup_extension("file", "x-file-ext", &SpecVersion::V21).is_some());
        assert!(reg.lookup_extension("process", "x-file-ext", &SpecVersion::V21).is_none());
        assert!(reg.lookup(ObjectKind::Extension, "x-file-ext", &SpecVersion::V21).is_none());
        assert!(reg.get(&ext.registry_key()).is_some());
        assert_eq!(reg.extensions_for("file", &SpecVersion::V21).len(), 1);
    }

    #[test]
    fn test_extension_requires_observable_binding() {
        let mut reg = Registry::new();
        let domain = reg
            .build_custom_object((), "x-thing", value_props(), SpecVersion::V21)
            .unwrap();

        // Checked before the (invalid) name is looked at.
        let err = reg
            .build_custom_extension(
                (),
                domain.as_ref(),
                "X",
                Vec::<(String, Box<dyn Property>)>::new(),
                SpecVersion::V21,
            )
            .unwrap_err();
        assert!(matches!(
            err,
            CustomTypeError::InvalidObservableBinding { found: ObjectKind::DomainObject, .. }
        ));
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn test_instantiate() {
        let mut reg = Registry::new();
        reg.build_custom_observable((), "x-obs", value_props(), SpecVersion::V21)
            .unwrap();

        let obj = reg
            .instantiate(ObjectKind::Observable, "x-obs", &SpecVersion::V21, fields([("value", "v")]))
            .unwrap();
        assert_eq!(obj.type_name(), "x-obs");

        let err = reg
            .instantiate(ObjectKind::Observable, "x-missing", &SpecVersion::V21, Fields::new())
            .unwrap_err();
        assert!(matches!(err, CreateError::UnknownType { .. }));
    }
}
