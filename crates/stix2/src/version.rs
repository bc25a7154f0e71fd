//! Spec version tokens.

use std::borrow::Cow;
use std::fmt;

/// Revision of the STIX specification a type is registered against.
///
/// The registries only compare and hash versions; the token itself is
/// never interpreted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SpecVersion(Cow<'static, str>);

impl SpecVersion {
    /// STIX 2.0.
    pub const V20: SpecVersion = SpecVersion(Cow::Borrowed("2.0"));

    /// STIX 2.1.
    pub const V21: SpecVersion = SpecVersion(Cow::Borrowed("2.1"));

    /// Creates a version token from any string.
    pub fn new(version: impl Into<Cow<'static, str>>) -> Self {
        Self(version.into())
    }

    /// Returns the token as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SpecVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for SpecVersion {
    fn from(version: &'static str) -> Self {
        Self(Cow::Borrowed(version))
    }
}

impl From<String> for SpecVersion {
    fn from(version: String) -> Self {
        Self(Cow::Owned(version))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_borrowed_and_owned_compare_equal() {
        assert_eq!(SpecVersion::V21, SpecVersion::from("2.1".to_string()));
        assert_eq!(SpecVersion::new("2.0"), SpecVersion::V20);
        assert_ne!(SpecVersion::V20, SpecVersion::V21);
    }

    #[test]
    fn test_display() {
        assert_eq!(SpecVersion::V21.to_string(), "2.1");
        assert_eq!(SpecVersion::new("9.9-draft").as_str(), "9.9-draft");
    }
}
