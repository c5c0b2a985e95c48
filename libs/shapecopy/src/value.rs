use std::borrow::Cow;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::mem;

use crate::descriptor::{Descriptor, Kind, RecordDescriptor, ScalarType};
use crate::error::CopyError;

/// Scalar payload.
///
/// Widths collapse into the widest representation of each kind; the
/// concrete type lives in [`ScalarType`].
#[derive(Debug, Clone, PartialEq)]
pub enum ScalarData {
    Bool(bool),
    Int(i64),
    Uint(u64),
    Float(f64),
    Char(char),
    String(String),
    /// Opaque binary data (ids, hashes, ...).
    Bytes(Vec<u8>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Scalar {
    pub ty: ScalarType,
    pub data: ScalarData,
}

/// One named field of a record value.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldValue {
    pub name: Cow<'static, str>,
    pub value: Value,
    pub readonly: bool,
}

impl FieldValue {
    pub fn new(name: impl Into<Cow<'static, str>>, value: Value, readonly: bool) -> Self {
        Self {
            name: name.into(),
            value,
            readonly,
        }
    }
}

/// Record value. Fields are kept in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub ty: RecordDescriptor,
    pub fields: Vec<FieldValue>,
}

impl Record {
    pub fn new(ty: RecordDescriptor, fields: Vec<FieldValue>) -> Self {
        Self { ty, fields }
    }

    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn field_mut(&mut self, name: &str) -> Option<&mut FieldValue> {
        self.fields.iter_mut().find(|f| f.name == name)
    }

    /// Remove a field and return its value.
    pub fn take(&mut self, name: &str) -> Result<Value, CopyError> {
        let index = self
            .fields
            .iter()
            .position(|f| f.name == name)
            .ok_or_else(|| {
                CopyError::shape(format!("record '{}' has no field '{name}'", self.ty.name()))
            })?;
        Ok(self.fields.remove(index).value)
    }
}

/// Dynamic value tree.
///
/// Every node carries enough type information to rebuild its
/// [`Descriptor`], including empty and nil containers: a nil sequence
/// still knows its element type, so the engine can allocate elements.
///
/// Nil and empty are distinct for sequences and maps (`None` vs
/// `Some(vec![])`).
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Scalar(Scalar),
    Sequence {
        elem: Descriptor,
        items: Option<Vec<Value>>,
    },
    Array {
        elem: Descriptor,
        items: Vec<Value>,
    },
    /// Entries are unique by key; insertion order is kept.
    Map {
        key: Descriptor,
        value: Descriptor,
        entries: Option<Vec<(Value, Value)>>,
    },
    Record(Record),
    Optional {
        inner: Descriptor,
        value: Option<Box<Value>>,
    },
    /// Any-typed slot. `Any(None)` is the untyped nil.
    Any(Option<Box<Value>>),
}

impl Value {
    pub fn kind(&self) -> Kind {
        match self {
            Value::Scalar(scalar) => scalar.ty.kind,
            Value::Sequence { .. } => Kind::Sequence,
            Value::Array { .. } => Kind::Array,
            Value::Map { .. } => Kind::Map,
            Value::Record(_) => Kind::Record,
            Value::Optional { .. } => Kind::Optional,
            Value::Any(_) => Kind::Any,
        }
    }

    pub fn descriptor(&self) -> Descriptor {
        match self {
            Value::Scalar(scalar) => Descriptor::Scalar(scalar.ty.clone()),
            Value::Sequence { elem, .. } => Descriptor::sequence(elem.clone()),
            Value::Array { elem, items } => Descriptor::array(elem.clone(), items.len()),
            Value::Map { key, value, .. } => Descriptor::map(key.clone(), value.clone()),
            Value::Record(record) => Descriptor::Record(record.ty.clone()),
            Value::Optional { inner, .. } => Descriptor::optional(inner.clone()),
            Value::Any(_) => Descriptor::Any,
        }
    }

    /// `true` for a `None` optional, the untyped nil, and nil containers.
    pub fn is_nil(&self) -> bool {
        matches!(
            self,
            Value::Optional { value: None, .. }
                | Value::Any(None)
                | Value::Sequence { items: None, .. }
                | Value::Map { entries: None, .. }
        )
    }

    /// Length of a sequence, array or map; `0` when nil.
    pub fn len(&self) -> usize {
        match self {
            Value::Sequence { items, .. } => items.as_ref().map_or(0, Vec::len),
            Value::Array { items, .. } => items.len(),
            Value::Map { entries, .. } => entries.as_ref().map_or(0, Vec::len),
            _ => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Follow `Any` boxes down to the concrete value.
    pub fn unwrap_any(&self) -> &Value {
        match self {
            Value::Any(Some(inner)) => inner.unwrap_any(),
            other => other,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Scalar(Scalar {
                data: ScalarData::Bool(v),
                ..
            }) => Some(*v),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Scalar(Scalar {
                data: ScalarData::Int(v),
                ..
            }) => Some(*v),
            _ => None,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Value::Scalar(Scalar {
                data: ScalarData::Uint(v),
                ..
            }) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Scalar(Scalar {
                data: ScalarData::Float(v),
                ..
            }) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Scalar(Scalar {
                data: ScalarData::String(v),
                ..
            }) => Some(v),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Scalar(Scalar {
                data: ScalarData::Bytes(v),
                ..
            }) => Some(v),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Value::Record(record) => Some(record),
            _ => None,
        }
    }

    pub fn into_record(self) -> Result<Record, CopyError> {
        match self {
            Value::Record(record) => Ok(record),
            other => Err(CopyError::shape(format!(
                "expected record, got {}",
                other.descriptor()
            ))),
        }
    }

    /// Dynamic type name, looking through `Any` boxes; `nil` for untyped nil.
    pub fn type_name(&self) -> String {
        match self.unwrap_any() {
            Value::Any(None) => "nil".to_string(),
            other => other.descriptor().to_string(),
        }
    }

    /// Feed the payload into `state`. Values that compare equal hash equal,
    /// so the hash can index map keys.
    pub fn hash_key<H: Hasher>(&self, state: &mut H) {
        mem::discriminant(self).hash(state);
        match self {
            Value::Scalar(scalar) => scalar.data.hash_key(state),
            Value::Sequence { items, .. } => {
                items.is_some().hash(state);
                for item in items.iter().flatten() {
                    item.hash_key(state);
                }
            }
            Value::Array { items, .. } => {
                for item in items {
                    item.hash_key(state);
                }
            }
            Value::Map { entries, .. } => {
                entries.is_some().hash(state);
                for (k, v) in entries.iter().flatten() {
                    k.hash_key(state);
                    v.hash_key(state);
                }
            }
            Value::Record(record) => {
                record.ty.name().hash(state);
                for field in &record.fields {
                    field.name.hash(state);
                    field.value.hash_key(state);
                }
            }
            Value::Optional { value, .. } | Value::Any(value) => {
                if let Some(inner) = value {
                    inner.hash_key(state);
                }
            }
        }
    }
}

impl ScalarData {
    fn hash_key<H: Hasher>(&self, state: &mut H) {
        mem::discriminant(self).hash(state);
        match self {
            ScalarData::Bool(v) => v.hash(state),
            ScalarData::Int(v) => v.hash(state),
            ScalarData::Uint(v) => v.hash(state),
            // 0.0 == -0.0
            ScalarData::Float(v) if *v == 0.0 => 0u64.hash(state),
            ScalarData::Float(v) => v.to_bits().hash(state),
            ScalarData::Char(v) => v.hash(state),
            ScalarData::String(v) => v.hash(state),
            ScalarData::Bytes(v) => v.hash(state),
        }
    }
}

impl fmt::Display for ScalarData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalarData::Bool(v) => write!(f, "{v}"),
            ScalarData::Int(v) => write!(f, "{v}"),
            ScalarData::Uint(v) => write!(f, "{v}"),
            ScalarData::Float(v) => write!(f, "{v}"),
            ScalarData::Char(v) => write!(f, "{v}"),
            ScalarData::String(v) => f.write_str(v),
            ScalarData::Bytes(v) => write!(f, "{v:?}"),
        }
    }
}

fn write_list<'a>(
    f: &mut fmt::Formatter<'_>,
    items: impl IntoIterator<Item = &'a Value>,
) -> fmt::Result {
    f.write_str("[")?;
    for (i, item) in items.into_iter().enumerate() {
        if i > 0 {
            f.write_str(" ")?;
        }
        write!(f, "{item}")?;
    }
    f.write_str("]")
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Scalar(scalar) => write!(f, "{}", scalar.data),
            Value::Sequence { items: None, .. }
            | Value::Map { entries: None, .. }
            | Value::Optional { value: None, .. }
            | Value::Any(None) => f.write_str("nil"),
            Value::Sequence {
                items: Some(items), ..
            } => write_list(f, items),
            Value::Array { items, .. } => write_list(f, items),
            Value::Map {
                entries: Some(entries),
                ..
            } => {
                f.write_str("map[")?;
                for (i, (k, v)) in entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{k}:{v}")?;
                }
                f.write_str("]")
            }
            Value::Record(record) => {
                f.write_str("{")?;
                for (i, field) in record.fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{}:{}", field.name, field.value)?;
                }
                f.write_str("}")
            }
            Value::Optional {
                value: Some(inner), ..
            }
            | Value::Any(Some(inner)) => write!(f, "{inner}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int(v: i64) -> Value {
        Value::Scalar(Scalar {
            ty: ScalarType::new(Kind::Int, "i64"),
            data: ScalarData::Int(v),
        })
    }

    fn key_hash(value: &Value) -> u64 {
        let mut hasher = std::hash::DefaultHasher::new();
        value.hash_key(&mut hasher);
        hasher.finish()
    }

    fn float(v: f64) -> Value {
        Value::Scalar(Scalar {
            ty: ScalarType::new(Kind::Float, "f64"),
            data: ScalarData::Float(v),
        })
    }

    #[test]
    fn test_equal_keys_hash_equal() {
        assert_eq!(float(0.0), float(-0.0));
        assert_eq!(key_hash(&float(0.0)), key_hash(&float(-0.0)));
        assert_eq!(key_hash(&int(7)), key_hash(&int(7)));
        assert_ne!(key_hash(&int(7)), key_hash(&int(8)));

        let boxed = Value::Any(Some(Box::new(int(1))));
        assert_eq!(key_hash(&boxed), key_hash(&boxed.clone()));
    }

    #[test]
    fn test_descriptor_of_array_uses_length() {
        let value = Value::Array {
            elem: int(0).descriptor(),
            items: vec![int(1), int(2)],
        };
        assert_eq!(value.descriptor().to_string(), "[i64; 2]");
        assert_eq!(value.len(), 2);
    }

    #[test]
    fn test_nil_and_empty_differ() {
        let nil = Value::Sequence {
            elem: int(0).descriptor(),
            items: None,
        };
        let empty = Value::Sequence {
            elem: int(0).descriptor(),
            items: Some(Vec::new()),
        };
        assert!(nil.is_nil());
        assert!(!empty.is_nil());
        assert!(empty.is_empty());
        assert_ne!(nil, empty);
    }

    #[test]
    fn test_type_name_looks_through_any() {
        assert_eq!(Value::Any(None).type_name(), "nil");
        assert_eq!(Value::Any(Some(Box::new(int(3)))).type_name(), "i64");
    }

    #[test]
    fn test_record_take() {
        let ty = RecordDescriptor::new("Point", vec![]);
        let mut record = Record::new(
            ty,
            vec![FieldValue::new("x", int(1), false), FieldValue::new("y", int(2), false)],
        );
        assert_eq!(record.take("y").unwrap(), int(2));
        assert!(record.take("y").is_err());
        assert_eq!(record.fields.len(), 1);
    }

    #[test]
    fn test_display() {
        let value = Value::Sequence {
            elem: int(0).descriptor(),
            items: Some(vec![int(1), int(2)]),
        };
        assert_eq!(value.to_string(), "[1 2]");
        assert_eq!(Value::Any(None).to_string(), "nil");
    }
}
