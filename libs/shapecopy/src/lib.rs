//! Recursive value copying between structurally related shapes.
//!
//! A [`Copier`] copies a source value into a destination of a possibly
//! different type. Where the shapes diverge, user-supplied [`Converter`]s
//! bridge specific type pairs; everywhere else the engine recurses through
//! sequences, arrays, maps, records and optionals.
//!
//! ```ignore
//! use shapecopy::{copy, Converter, Shape};
//!
//! #[derive(Shape)]
//! struct Source { id: String, name: String }
//!
//! #[derive(Shape, Default)]
//! struct Target { id: i64, name: String }
//!
//! let mut dst = Target::default();
//! let src = Source { id: "100".into(), name: "John".into() };
//! copy(&mut dst, &src, [Converter::typed(|s: String| s.parse::<i64>())])?;
//! ```

pub mod converter;
pub mod descriptor;
pub mod engine;
pub mod error;
pub mod logger;
pub mod shape;
pub mod value;

pub use converter::{Converter, ConverterRegistry};
pub use descriptor::{Descriptor, FieldDescriptor, Kind, RecordDescriptor, ScalarType};
pub use engine::{copy, Copier};
pub use error::{BoxError, CopyError};
pub use logger::{Logger, NoopLogger, TracingLogger};
pub use shape::Shape;
pub use shapecopy_derive::Shape;
pub use value::{FieldValue, Record, Scalar, ScalarData, Value};
