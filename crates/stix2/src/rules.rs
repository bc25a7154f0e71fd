//! Naming rules shared by every custom type builder.
//!
//! These are the constants the builders check type names and reference
//! property names against.

/// Minimum length of a custom type name.
pub const TYPE_NAME_MIN_LEN: usize = 3;

/// Maximum length of a custom type name.
pub const TYPE_NAME_MAX_LEN: usize = 250;

/// Suffix marking a property as a single object reference.
pub const REF_SUFFIX: &str = "_ref";

/// Suffix marking a property as a list of object references.
pub const REFS_SUFFIX: &str = "_refs";

/// Prefix of custom properties that are placed after the common ones.
pub const CUSTOM_PROPERTY_PREFIX: &str = "x_";

/// Separator between the type and the UUID of an identifier.
pub const ID_SEPARATOR: &str = "--";

/// Returns true if `b` may appear in a type name (a-z, 0-9, `-`).
#[inline]
pub fn is_type_name_byte(b: u8) -> bool {
    b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-'
}

/// Returns true if `name` satisfies the type name character rule.
///
/// The empty string does not match.
pub fn matches_type_name_pattern(name: &str) -> bool {
    !name.is_empty() && name.bytes().all(is_type_name_byte)
}

/// Returns true if `name` satisfies the type name length rule.
pub fn within_type_name_length(name: &str) -> bool {
    let len = name.chars().count();
    (TYPE_NAME_MIN_LEN..=TYPE_NAME_MAX_LEN).contains(&len)
}
