use std::fmt;

/// Error returned by a converter's conversion function.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Copy error. The first error anywhere in the walk aborts the whole copy.
///
/// There is no invalid-destination or invalid-source case: a `&mut Value`
/// is always a writable slot and a `&Value` always a readable source.
#[derive(Debug, thiserror::Error)]
pub enum CopyError {
    /// Kind or concrete type mismatch. `expected` is the source side.
    #[error("src and dst fields has different types: expected {expected}, actual {actual}")]
    DifferentTypes { expected: String, actual: String },

    /// Destination slot exists but is read-only.
    #[error("can not set value: {src} to {dst}")]
    CannotSetValue { src: String, dst: String },

    /// Surfaced verbatim from a converter.
    #[error(transparent)]
    Convert(BoxError),

    /// A value tree could not be lifted back into a typed Rust value.
    #[error("shape error: {0}")]
    Shape(String),
}

impl CopyError {
    pub fn different_types(expected: impl fmt::Display, actual: impl fmt::Display) -> Self {
        CopyError::DifferentTypes {
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }

    pub fn cannot_set(src: impl fmt::Display, dst: impl fmt::Display) -> Self {
        CopyError::CannotSetValue {
            src: src.to_string(),
            dst: dst.to_string(),
        }
    }

    pub fn shape(msg: impl Into<String>) -> Self {
        CopyError::Shape(msg.into())
    }

    /// Add context to the error.
    ///
    /// Only `Shape` messages are prefixed; every other variant is returned
    /// unchanged so converter errors stay verbatim.
    pub fn with_context(self, ctx: impl fmt::Display) -> Self {
        match self {
            CopyError::Shape(msg) => CopyError::Shape(format!("{ctx}: {msg}")),
            other => other,
        }
    }
}
