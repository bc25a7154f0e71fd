//! Utility modules.

pub mod datetime;

pub use datetime::{format_timestamp, now_micros, parse_timestamp, DateTimeParseError, Precision};
