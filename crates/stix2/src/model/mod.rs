//! Data model types for STIX content.
//!
//! This module contains the core types shared by every custom type:
//! - Object kinds (domain object, marking, observable, extension)
//! - Identifiers (`<type>--<uuid>`)
//! - Values (typed field contents)

pub mod id;
pub mod kind;
pub mod value;

pub use id::{format_id, generate_id, id_type, parse_id};
pub use kind::ObjectKind;
pub use value::{fields, Fields, Value, ValueKind};
