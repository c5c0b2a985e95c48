use std::borrow::Cow;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::value::{FieldValue, Record, Scalar, ScalarData, Value};

/// Structural kind of a value, independent of its concrete type.
///
/// Kind mismatches are reported before concrete type mismatches, so
/// `i64 -> String` fails with `int`/`string` while `i32 -> i64` fails
/// with the type names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Bool,
    Int,
    Uint,
    Float,
    Char,
    String,
    Bytes,
    Sequence,
    Array,
    Map,
    Record,
    Optional,
    Any,
}

impl Kind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Kind::Bool => "bool",
            Kind::Int => "int",
            Kind::Uint => "uint",
            Kind::Float => "float",
            Kind::Char => "char",
            Kind::String => "string",
            Kind::Bytes => "bytes",
            Kind::Sequence => "sequence",
            Kind::Array => "array",
            Kind::Map => "map",
            Kind::Record => "record",
            Kind::Optional => "optional",
            Kind::Any => "any",
        }
    }

    pub fn is_scalar(&self) -> bool {
        matches!(
            self,
            Kind::Bool
                | Kind::Int
                | Kind::Uint
                | Kind::Float
                | Kind::Char
                | Kind::String
                | Kind::Bytes
        )
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Concrete scalar type: structural kind plus type identity.
///
/// Examples:
/// - `{ kind: Int, name: "i64" }`
/// - `{ kind: String, name: "String" }`
/// - `{ kind: Bytes, name: "Uuid" }`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ScalarType {
    pub kind: Kind,
    pub name: Cow<'static, str>,
}

impl ScalarType {
    pub const fn new(kind: Kind, name: &'static str) -> Self {
        Self {
            kind,
            name: Cow::Borrowed(name),
        }
    }

    pub fn named(kind: Kind, name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            kind,
            name: name.into(),
        }
    }

    /// Zero payload for this scalar's kind.
    pub fn zero(&self) -> ScalarData {
        match self.kind {
            Kind::Bool => ScalarData::Bool(false),
            Kind::Int => ScalarData::Int(0),
            Kind::Uint => ScalarData::Uint(0),
            Kind::Float => ScalarData::Float(0.0),
            Kind::Char => ScalarData::Char('\0'),
            Kind::String => ScalarData::String(String::new()),
            _ => ScalarData::Bytes(Vec::new()),
        }
    }
}

/// A single field of a record type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldDescriptor {
    pub name: Cow<'static, str>,
    pub descriptor: Descriptor,
    /// Read-only fields reject writes with `CannotSetValue`.
    pub readonly: bool,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<Cow<'static, str>>, descriptor: Descriptor, readonly: bool) -> Self {
        Self {
            name: name.into(),
            descriptor,
            readonly,
        }
    }
}

#[derive(Clone)]
enum FieldList {
    /// Resolved on demand, so self-referential types stay describable.
    Lazy(fn() -> Vec<FieldDescriptor>),
    Owned(Arc<[FieldDescriptor]>),
}

/// Record (struct) type.
///
/// Records are nominal: two descriptors are equal iff their names are
/// equal. Field layout only matters when a zero value is built.
#[derive(Clone)]
pub struct RecordDescriptor {
    name: Cow<'static, str>,
    fields: FieldList,
}

impl RecordDescriptor {
    pub fn new(name: impl Into<Cow<'static, str>>, fields: Vec<FieldDescriptor>) -> Self {
        Self {
            name: name.into(),
            fields: FieldList::Owned(fields.into()),
        }
    }

    /// Record type whose fields are produced by `fields` when first needed.
    /// Used by `#[derive(Shape)]`.
    pub fn lazy(name: impl Into<Cow<'static, str>>, fields: fn() -> Vec<FieldDescriptor>) -> Self {
        Self {
            name: name.into(),
            fields: FieldList::Lazy(fields),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> Arc<[FieldDescriptor]> {
        match &self.fields {
            FieldList::Lazy(fields) => fields().into(),
            FieldList::Owned(fields) => Arc::clone(fields),
        }
    }

    pub fn zero_value(&self) -> Record {
        let fields = self
            .fields()
            .iter()
            .map(|field| FieldValue {
                name: field.name.clone(),
                value: field.descriptor.zero_value(),
                readonly: field.readonly,
            })
            .collect();
        Record {
            ty: self.clone(),
            fields,
        }
    }
}

impl PartialEq for RecordDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for RecordDescriptor {}

impl Hash for RecordDescriptor {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl fmt::Debug for RecordDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RecordDescriptor").field(&self.name).finish()
    }
}

/// Runtime description of a value's shape.
///
/// Used everywhere a decision depends on types: converter lookup, kind and
/// type checks, and allocation of fresh destination values.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Descriptor {
    /// Untyped slot; holds any value.
    Any,
    Scalar(ScalarType),
    /// Growable sequence (`Vec<T>`).
    Sequence(Box<Descriptor>),
    /// Fixed-size array (`[T; N]`).
    Array(Box<Descriptor>, usize),
    Map(Box<Descriptor>, Box<Descriptor>),
    Record(RecordDescriptor),
    /// Nullable wrapper (`Option<T>`).
    Optional(Box<Descriptor>),
}

impl Descriptor {
    pub fn sequence(elem: Descriptor) -> Self {
        Descriptor::Sequence(Box::new(elem))
    }

    pub fn array(elem: Descriptor, len: usize) -> Self {
        Descriptor::Array(Box::new(elem), len)
    }

    pub fn map(key: Descriptor, value: Descriptor) -> Self {
        Descriptor::Map(Box::new(key), Box::new(value))
    }

    pub fn optional(inner: Descriptor) -> Self {
        Descriptor::Optional(Box::new(inner))
    }

    pub fn kind(&self) -> Kind {
        match self {
            Descriptor::Any => Kind::Any,
            Descriptor::Scalar(ty) => ty.kind,
            Descriptor::Sequence(_) => Kind::Sequence,
            Descriptor::Array(..) => Kind::Array,
            Descriptor::Map(..) => Kind::Map,
            Descriptor::Record(_) => Kind::Record,
            Descriptor::Optional(_) => Kind::Optional,
        }
    }

    /// Strips one optional level, if any.
    pub fn pointee(&self) -> &Descriptor {
        match self {
            Descriptor::Optional(inner) => inner,
            other => other,
        }
    }

    /// Zero value of this shape: `0`, `""`, nil containers, `None`
    /// optionals, records of zero fields and arrays of zero elements.
    pub fn zero_value(&self) -> Value {
        match self {
            Descriptor::Any => Value::Any(None),
            Descriptor::Scalar(ty) => Value::Scalar(Scalar {
                ty: ty.clone(),
                data: ty.zero(),
            }),
            Descriptor::Sequence(elem) => Value::Sequence {
                elem: (**elem).clone(),
                items: None,
            },
            Descriptor::Array(elem, len) => Value::Array {
                elem: (**elem).clone(),
                items: (0..*len).map(|_| elem.zero_value()).collect(),
            },
            Descriptor::Map(key, value) => Value::Map {
                key: (**key).clone(),
                value: (**value).clone(),
                entries: None,
            },
            Descriptor::Record(record) => Value::Record(record.zero_value()),
            Descriptor::Optional(inner) => Value::Optional {
                inner: (**inner).clone(),
                value: None,
            },
        }
    }
}

impl fmt::Display for Descriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Descriptor::Any => f.write_str("any"),
            Descriptor::Scalar(ty) => f.write_str(&ty.name),
            Descriptor::Sequence(elem) => write!(f, "Vec<{elem}>"),
            Descriptor::Array(elem, len) => write!(f, "[{elem}; {len}]"),
            Descriptor::Map(key, value) => write!(f, "Map<{key}, {value}>"),
            Descriptor::Record(record) => f.write_str(record.name()),
            Descriptor::Optional(inner) => write!(f, "Option<{inner}>"),
        }
    }
}
