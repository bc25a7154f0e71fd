//! User implementations of custom types.

use crate::error::{InitError, UserError};
use crate::model::Fields;

/// The user half of a custom type.
///
/// `init` is the implementation's own constructor. It receives the field
/// values the caller supplied, after the base behavior has accepted them.
/// Implementations without construction logic keep the default, which
/// reports [`InitError::NoConstructor`] and is treated as success.
///
/// ```rust
/// use stix2::{CustomBehavior, Fields, InitError};
///
/// struct MyNewObjectType;
///
/// impl CustomBehavior for MyNewObjectType {
///     fn init(&self, fields: &Fields) -> Result<(), InitError> {
///         let small = fields
///             .get("property2")
///             .and_then(|v| v.as_i64())
///             .is_some_and(|v| v < 10);
///         if small {
///             return Err(InitError::failed("'property2' is too small."));
///         }
///         Ok(())
///     }
/// }
/// ```
pub trait CustomBehavior: Send + Sync + 'static {
    fn init(&self, fields: &Fields) -> Result<(), InitError> {
        let _ = fields;
        Err(InitError::NoConstructor)
    }
}

/// No customization at all.
impl CustomBehavior for () {}

/// A behavior whose constructor is a closure.
pub struct FnBehavior<F>(F);

impl<F> CustomBehavior for FnBehavior<F>
where
    F: Fn(&Fields) -> Result<(), UserError> + Send + Sync + 'static,
{
    fn init(&self, fields: &Fields) -> Result<(), InitError> {
        (self.0)(fields).map_err(InitError::Failed)
    }
}

/// Wraps a closure as a [`CustomBehavior`] constructor.
pub fn from_fn<F>(f: F) -> FnBehavior<F>
where
    F: Fn(&Fields) -> Result<(), UserError> + Send + Sync + 'static,
{
    FnBehavior(f)
}
