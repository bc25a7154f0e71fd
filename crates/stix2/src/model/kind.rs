//! Object kinds.

use std::fmt;

/// The four kinds of STIX type a custom type can be registered as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    /// Top-level domain object (indicator, campaign, ...).
    DomainObject,
    /// Marking definition.
    Marking,
    /// Cyber observable.
    Observable,
    /// Extension attached to an observable type.
    Extension,
}

impl ObjectKind {
    /// All kinds, in registry order.
    pub const ALL: [ObjectKind; 4] = [
        ObjectKind::DomainObject,
        ObjectKind::Marking,
        ObjectKind::Observable,
        ObjectKind::Extension,
    ];

    /// Returns true if the reference naming convention applies to this kind.
    pub fn checks_reference_names(self) -> bool {
        matches!(self, ObjectKind::Observable | ObjectKind::Extension)
    }

    /// Human-readable name used in error messages.
    pub fn as_str(self) -> &'static str {
        match self {
            ObjectKind::DomainObject => "object",
            ObjectKind::Marking => "marking",
            ObjectKind::Observable => "observable",
            ObjectKind::Extension => "extension",
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
