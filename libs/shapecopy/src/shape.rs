use std::collections::{BTreeMap, HashMap};
use std::hash::{BuildHasher, Hash};

use crate::descriptor::{Descriptor, Kind, ScalarType};
use crate::error::CopyError;
use crate::value::{Scalar, ScalarData, Value};

/// A Rust type the engine can copy from and into.
///
/// Lowers a typed value into a [`Value`] tree and lifts it back. Records
/// get an implementation from `#[derive(Shape)]`.
pub trait Shape: Sized {
    fn descriptor() -> Descriptor;

    fn to_value(&self) -> Value;

    fn from_value(value: Value) -> Result<Self, CopyError>;
}

fn unexpected<T: Shape>(value: &Value) -> CopyError {
    CopyError::shape(format!(
        "expected {}, got {}",
        T::descriptor(),
        value.descriptor()
    ))
}

macro_rules! scalar_shape {
    ($kind:ident, $variant:ident, $wide:ty: $($ty:ty),*) => {$(
        impl Shape for $ty {
            fn descriptor() -> Descriptor {
                Descriptor::Scalar(ScalarType::new(Kind::$kind, stringify!($ty)))
            }

            fn to_value(&self) -> Value {
                Value::Scalar(Scalar {
                    ty: ScalarType::new(Kind::$kind, stringify!($ty)),
                    data: ScalarData::$variant(*self as $wide),
                })
            }

            fn from_value(value: Value) -> Result<Self, CopyError> {
                match value {
                    Value::Scalar(Scalar { ty, data: ScalarData::$variant(v) })
                        if ty.name == stringify!($ty) =>
                    {
                        <$ty>::try_from(v).map_err(|e| {
                            CopyError::shape(format!("{} out of range: {e}", stringify!($ty)))
                        })
                    }
                    other => Err(unexpected::<Self>(&other)),
                }
            }
        }
    )*};
}

scalar_shape!(Int, Int, i64: i8, i16, i32, i64, isize);
scalar_shape!(Uint, Uint, u64: u8, u16, u32, u64, usize);

impl Shape for f64 {
    fn descriptor() -> Descriptor {
        Descriptor::Scalar(ScalarType::new(Kind::Float, "f64"))
    }

    fn to_value(&self) -> Value {
        Value::Scalar(Scalar {
            ty: ScalarType::new(Kind::Float, "f64"),
            data: ScalarData::Float(*self),
        })
    }

    fn from_value(value: Value) -> Result<Self, CopyError> {
        match value {
            Value::Scalar(Scalar {
                ty,
                data: ScalarData::Float(v),
            }) if ty.name == "f64" => Ok(v),
            other => Err(unexpected::<Self>(&other)),
        }
    }
}

impl Shape for f32 {
    fn descriptor() -> Descriptor {
        Descriptor::Scalar(ScalarType::new(Kind::Float, "f32"))
    }

    fn to_value(&self) -> Value {
        Value::Scalar(Scalar {
            ty: ScalarType::new(Kind::Float, "f32"),
            data: ScalarData::Float(f64::from(*self)),
        })
    }

    fn from_value(value: Value) -> Result<Self, CopyError> {
        match value {
            Value::Scalar(Scalar {
                ty,
                data: ScalarData::Float(v),
            }) if ty.name == "f32" => Ok(v as f32),
            other => Err(unexpected::<Self>(&other)),
        }
    }
}

impl Shape for bool {
    fn descriptor() -> Descriptor {
        Descriptor::Scalar(ScalarType::new(Kind::Bool, "bool"))
    }

    fn to_value(&self) -> Value {
        Value::Scalar(Scalar {
            ty: ScalarType::new(Kind::Bool, "bool"),
            data: ScalarData::Bool(*self),
        })
    }

    fn from_value(value: Value) -> Result<Self, CopyError> {
        match value {
            Value::Scalar(Scalar {
                data: ScalarData::Bool(v),
                ..
            }) => Ok(v),
            other => Err(unexpected::<Self>(&other)),
        }
    }
}

impl Shape for char {
    fn descriptor() -> Descriptor {
        Descriptor::Scalar(ScalarType::new(Kind::Char, "char"))
    }

    fn to_value(&self) -> Value {
        Value::Scalar(Scalar {
            ty: ScalarType::new(Kind::Char, "char"),
            data: ScalarData::Char(*self),
        })
    }

    fn from_value(value: Value) -> Result<Self, CopyError> {
        match value {
            Value::Scalar(Scalar {
                data: ScalarData::Char(v),
                ..
            }) => Ok(v),
            other => Err(unexpected::<Self>(&other)),
        }
    }
}

impl Shape for String {
    fn descriptor() -> Descriptor {
        Descriptor::Scalar(ScalarType::new(Kind::String, "String"))
    }

    fn to_value(&self) -> Value {
        Value::Scalar(Scalar {
            ty: ScalarType::new(Kind::String, "String"),
            data: ScalarData::String(self.clone()),
        })
    }

    fn from_value(value: Value) -> Result<Self, CopyError> {
        match value {
            Value::Scalar(Scalar {
                data: ScalarData::String(v),
                ..
            }) => Ok(v),
            other => Err(unexpected::<Self>(&other)),
        }
    }
}

// Empty collections lower to nil: a Rust `Vec`/map has no separate nil state.

impl<T: Shape> Shape for Vec<T> {
    fn descriptor() -> Descriptor {
        Descriptor::sequence(T::descriptor())
    }

    fn to_value(&self) -> Value {
        Value::Sequence {
            elem: T::descriptor(),
            items: (!self.is_empty()).then(|| self.iter().map(Shape::to_value).collect()),
        }
    }

    fn from_value(value: Value) -> Result<Self, CopyError> {
        match value {
            Value::Sequence { items, .. } => items
                .unwrap_or_default()
                .into_iter()
                .map(T::from_value)
                .collect(),
            other => Err(unexpected::<Self>(&other)),
        }
    }
}

impl<T: Shape, const N: usize> Shape for [T; N] {
    fn descriptor() -> Descriptor {
        Descriptor::array(T::descriptor(), N)
    }

    fn to_value(&self) -> Value {
        Value::Array {
            elem: T::descriptor(),
            items: self.iter().map(Shape::to_value).collect(),
        }
    }

    fn from_value(value: Value) -> Result<Self, CopyError> {
        match value {
            Value::Array { items, .. } => {
                let items = items
                    .into_iter()
                    .map(T::from_value)
                    .collect::<Result<Vec<T>, CopyError>>()?;
                let len = items.len();
                items
                    .try_into()
                    .map_err(|_| CopyError::shape(format!("expected {N} elements, got {len}")))
            }
            other => Err(unexpected::<Self>(&other)),
        }
    }
}

fn map_entries<'a, K, V>(iter: impl Iterator<Item = (&'a K, &'a V)>) -> Vec<(Value, Value)>
where
    K: Shape + 'a,
    V: Shape + 'a,
{
    iter.map(|(k, v)| (k.to_value(), v.to_value())).collect()
}

impl<K, V, S> Shape for HashMap<K, V, S>
where
    K: Shape + Eq + Hash,
    V: Shape,
    S: BuildHasher + Default,
{
    fn descriptor() -> Descriptor {
        Descriptor::map(K::descriptor(), V::descriptor())
    }

    fn to_value(&self) -> Value {
        Value::Map {
            key: K::descriptor(),
            value: V::descriptor(),
            entries: (!self.is_empty()).then(|| map_entries(self.iter())),
        }
    }

    fn from_value(value: Value) -> Result<Self, CopyError> {
        match value {
            Value::Map { entries, .. } => entries
                .unwrap_or_default()
                .into_iter()
                .map(|(k, v)| Ok::<_, CopyError>((K::from_value(k)?, V::from_value(v)?)))
                .collect(),
            other => Err(unexpected::<Self>(&other)),
        }
    }
}

impl<K, V> Shape for BTreeMap<K, V>
where
    K: Shape + Ord,
    V: Shape,
{
    fn descriptor() -> Descriptor {
        Descriptor::map(K::descriptor(), V::descriptor())
    }

    fn to_value(&self) -> Value {
        Value::Map {
            key: K::descriptor(),
            value: V::descriptor(),
            entries: (!self.is_empty()).then(|| map_entries(self.iter())),
        }
    }

    fn from_value(value: Value) -> Result<Self, CopyError> {
        match value {
            Value::Map { entries, .. } => entries
                .unwrap_or_default()
                .into_iter()
                .map(|(k, v)| Ok::<_, CopyError>((K::from_value(k)?, V::from_value(v)?)))
                .collect(),
            other => Err(unexpected::<Self>(&other)),
        }
    }
}

impl<T: Shape> Shape for Option<T> {
    fn descriptor() -> Descriptor {
        Descriptor::optional(T::descriptor())
    }

    fn to_value(&self) -> Value {
        Value::Optional {
            inner: T::descriptor(),
            value: self.as_ref().map(|v| Box::new(v.to_value())),
        }
    }

    fn from_value(value: Value) -> Result<Self, CopyError> {
        match value {
            Value::Optional { value, .. } => value.map(|v| T::from_value(*v)).transpose(),
            other => Err(unexpected::<Self>(&other)),
        }
    }
}

/// Boxes are transparent: a `Box<T>` is never nil, so it has `T`'s shape.
impl<T: Shape> Shape for Box<T> {
    fn descriptor() -> Descriptor {
        T::descriptor()
    }

    fn to_value(&self) -> Value {
        (**self).to_value()
    }

    fn from_value(value: Value) -> Result<Self, CopyError> {
        T::from_value(value).map(Box::new)
    }
}

/// `Value` itself is the any-typed slot.
impl Shape for Value {
    fn descriptor() -> Descriptor {
        Descriptor::Any
    }

    fn to_value(&self) -> Value {
        match self {
            Value::Any(_) => self.clone(),
            other => Value::Any(Some(Box::new(other.clone()))),
        }
    }

    fn from_value(value: Value) -> Result<Self, CopyError> {
        match value {
            Value::Any(Some(inner)) => Ok(*inner),
            other => Ok(other),
        }
    }
}

#[cfg(feature = "uuid")]
impl Shape for uuid::Uuid {
    fn descriptor() -> Descriptor {
        Descriptor::Scalar(ScalarType::new(Kind::Bytes, "Uuid"))
    }

    fn to_value(&self) -> Value {
        Value::Scalar(Scalar {
            ty: ScalarType::new(Kind::Bytes, "Uuid"),
            data: ScalarData::Bytes(self.as_bytes().to_vec()),
        })
    }

    /// A zero-length payload (the zero value) lifts to the nil id.
    fn from_value(value: Value) -> Result<Self, CopyError> {
        match value {
            Value::Scalar(Scalar {
                ty,
                data: ScalarData::Bytes(bytes),
            }) if ty.name == "Uuid" => {
                if bytes.is_empty() {
                    return Ok(uuid::Uuid::nil());
                }
                uuid::Uuid::from_slice(&bytes).map_err(|e| CopyError::shape(e.to_string()))
            }
            other => Err(unexpected::<Self>(&other)),
        }
    }
}
