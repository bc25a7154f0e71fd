//! Reference naming convention.
//!
//! On observables and extensions, a property named `*_ref` must be an
//! object reference, and a property named `*_refs` must be a list of
//! object references.

use crate::error::CustomTypeError;
use crate::properties::{element_of, has_capability, CapabilitySet, PropertySchema};
use crate::rules::{REFS_SUFFIX, REF_SUFFIX};

/// Checks every property against the reference naming convention.
///
/// Returns the first violation in schema order.
pub fn check_reference_properties(schema: &PropertySchema) -> Result<(), CustomTypeError> {
    for (name, property) in schema {
        let property = property.as_ref();
        if name.ends_with(REF_SUFFIX) {
            if !has_capability(property, CapabilitySet::OBJECT_REFERENCE) {
                return Err(CustomTypeError::BadReferenceProperty(name.clone()));
            }
        } else if name.ends_with(REFS_SUFFIX) {
            let element_is_reference = element_of(property)
                .is_some_and(|e| has_capability(e, CapabilitySet::OBJECT_REFERENCE));
            if !has_capability(property, CapabilitySet::LIST) || !element_is_reference {
                return Err(CustomTypeError::BadReferenceListProperty(name.clone()));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::properties::{
        DictionaryProperty, ListProperty, Property, ReferenceProperty, StringProperty,
    };

    fn schema(entries: Vec<(&str, Box<dyn Property>)>) -> PropertySchema {
        entries
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect()
    }

    #[test]
    fn test_ref_must_be_reference() {
        let ok = schema(vec![("parent_ref", ReferenceProperty::new().boxed())]);
        assert!(check_reference_properties(&ok).is_ok());

        let bad = schema(vec![
            ("value", StringProperty::new().boxed()),
            ("parent_ref", StringProperty::new().boxed()),
        ]);
        assert_eq!(
            check_reference_properties(&bad),
            Err(CustomTypeError::BadReferenceProperty("parent_ref".into()))
        );
    }

    #[test]
    fn test_refs_must_be_list_of_references() {
        let ok = schema(vec![(
            "child_refs",
            ListProperty::new(ReferenceProperty::new()).boxed(),
        )]);
        assert!(check_reference_properties(&ok).is_ok());

        let list_of_strings = schema(vec![(
            "child_refs",
            ListProperty::new(StringProperty::new()).boxed(),
        )]);
        assert_eq!(
            check_reference_properties(&list_of_strings),
            Err(CustomTypeError::BadReferenceListProperty("child_refs".into()))
        );

        // A bare reference is not a list.
        let bare = schema(vec![("child_refs", ReferenceProperty::new().boxed())]);
        assert_eq!(
            check_reference_properties(&bare),
            Err(CustomTypeError::BadReferenceListProperty("child_refs".into()))
        );
    }

    #[test]
    fn test_other_names_unconstrained() {
        let s = schema(vec![
            ("reference", StringProperty::new().boxed()),
            ("refs_count", StringProperty::new().boxed()),
            ("ref", DictionaryProperty::new().boxed()),
        ]);
        assert!(check_reference_properties(&s).is_ok());
    }

    proptest! {
        #[test]
        fn prop_ref_without_capability_rejected(stem in "[a-z]{1,10}") {
            let name = format!("{}_ref", stem);
            let s = schema(vec![(name.as_str(), StringProperty::new().boxed())]);
            prop_assert_eq!(
                check_reference_properties(&s),
                Err(CustomTypeError::BadReferenceProperty(name.clone()))
            );

            let s = schema(vec![(name.as_str(), ReferenceProperty::new().boxed())]);
            prop_assert!(check_reference_properties(&s).is_ok());
        }

        #[test]
        fn prop_refs_element_must_be_reference(stem in "[a-z]{1,10}") {
            let name = format!("{}_refs", stem);
            let s = schema(vec![(name.as_str(), ListProperty::new(StringProperty::new()).boxed())]);
            prop_assert_eq!(
                check_reference_properties(&s),
                Err(CustomTypeError::BadReferenceListProperty(name.clone()))
            );

            let s = schema(vec![(name.as_str(), ListProperty::new(ReferenceProperty::new()).boxed())]);
            prop_assert!(check_reference_properties(&s).is_ok());
        }
    }
}
