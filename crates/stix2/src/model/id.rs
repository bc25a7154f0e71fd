//! STIX identifiers.
//!
//! An identifier is `<object-type>--<UUID>`, for example
//! `indicator--8e2e2d2b-17d4-4cbf-938f-98ee46b3cd3f`.

use uuid::Uuid;

use crate::rules::{matches_type_name_pattern, ID_SEPARATOR};

/// Generates a fresh random (v4) identifier for `type_name`.
pub fn generate_id(type_name: &str) -> String {
    format_id(type_name, &Uuid::new_v4())
}

/// Formats an identifier from its parts.
pub fn format_id(type_name: &str, uuid: &Uuid) -> String {
    format!("{}{}{}", type_name, ID_SEPARATOR, uuid.hyphenated())
}

/// Splits an identifier into its type and UUID.
///
/// Returns `None` if the type part is not a valid type name or the UUID
/// part does not parse.
pub fn parse_id(id: &str) -> Option<(&str, Uuid)> {
    let (type_name, uuid) = id.split_once(ID_SEPARATOR)?;
    if !matches_type_name_pattern(type_name) {
        return None;
    }
    let uuid = Uuid::parse_str(uuid).ok()?;
    Some((type_name, uuid))
}

/// Returns the type part of an identifier, if it parses.
pub fn id_type(id: &str) -> Option<&str> {
    parse_id(id).map(|(type_name, _)| type_name)
}
