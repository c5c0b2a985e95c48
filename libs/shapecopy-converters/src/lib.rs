//! Ready-made converters for common type pairs.
//!
//! Every converter here checks its input type itself and fails with
//! "value is not {expected}: {actual}" on a mismatch, so it stays safe when
//! invoked outside the engine.

mod any;
mod id;
mod numeric;

use shapecopy::{BoxError, Converter, Descriptor, Shape, Value};

pub use any::{any_to_string, string_to_any};
pub use id::{string_to_uuid, uuid_to_string};
pub use numeric::{int_to_string, string_to_int};

/// Names accepted by [`by_name`], in the order they are listed.
pub const BUILTIN_NAMES: &[&str] = &[
    "int_to_string",
    "string_to_int",
    "any_to_string",
    "string_to_any",
    "uuid_to_string",
    "string_to_uuid",
];

/// Look up a built-in converter by its configuration name.
pub fn by_name(name: &str) -> Option<Converter> {
    let converter = match name {
        "int_to_string" => int_to_string(),
        "string_to_int" => string_to_int(),
        "any_to_string" => any_to_string(),
        "string_to_any" => string_to_any(),
        "uuid_to_string" => uuid_to_string(),
        "string_to_uuid" => string_to_uuid(),
        _ => return None,
    };
    Some(converter.named(name.to_string()))
}

#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    #[error("value is not {expected}: {actual}")]
    UnexpectedType { expected: String, actual: String },

    #[error(transparent)]
    ParseInt(#[from] std::num::ParseIntError),

    #[error("failed to parse uuid from string: {0}")]
    ParseUuid(#[from] ::uuid::Error),
}

impl ConvertError {
    fn unexpected(expected: &Descriptor, value: &Value) -> Self {
        ConvertError::UnexpectedType {
            expected: expected.to_string(),
            actual: value.type_name(),
        }
    }
}

/// Lift `value` into `T`, looking through `Any` boxes.
fn lift<T: Shape>(value: &Value) -> Result<T, BoxError> {
    let inner = value.unwrap_any();
    if inner.descriptor() != T::descriptor() {
        return Err(ConvertError::unexpected(&T::descriptor(), value).into());
    }
    Ok(T::from_value(inner.clone())?)
}
