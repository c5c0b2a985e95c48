//! Bridge between JSON documents and value trees.

use serde_json::{Map, Number, Value as Json};
use shapecopy::{
    Descriptor, FieldDescriptor, FieldValue, Record, RecordDescriptor, Scalar, ScalarData, Shape,
    Value,
};

/// Record type name given to every JSON object.
pub const OBJECT: &str = "object";

/// Infer a source value from a JSON document.
///
/// Objects become records with fields in document order. Arrays become
/// sequences of the common element type, or of `any` when elements differ.
/// `null` is a nil optional, so it never overwrites a destination.
pub fn infer(json: &Json) -> Value {
    match json {
        Json::Null => Value::Optional {
            inner: Descriptor::Any,
            value: None,
        },
        Json::Bool(b) => b.to_value(),
        Json::Number(n) => infer_number(n),
        Json::String(s) => s.to_value(),
        Json::Array(items) => {
            let items: Vec<Value> = items.iter().map(infer).collect();
            let elem = common_descriptor(&items);
            let items = if elem == Descriptor::Any {
                items.into_iter().map(|v| v.to_value()).collect()
            } else {
                items
            };
            Value::Sequence {
                elem,
                items: Some(items),
            }
        }
        Json::Object(object) => {
            let fields: Vec<FieldValue> = object
                .iter()
                .map(|(name, value)| FieldValue::new(name.clone(), infer(value), false))
                .collect();
            let descriptors = fields
                .iter()
                .map(|f| FieldDescriptor::new(f.name.clone(), f.value.descriptor(), false))
                .collect();
            let ty = RecordDescriptor::new(OBJECT, descriptors);
            Value::Record(Record::new(ty, fields))
        }
    }
}

fn infer_number(n: &Number) -> Value {
    if let Some(i) = n.as_i64() {
        i.to_value()
    } else if let Some(u) = n.as_u64() {
        u.to_value()
    } else {
        n.as_f64().unwrap_or_default().to_value()
    }
}

fn common_descriptor(items: &[Value]) -> Descriptor {
    let mut descriptors = items.iter().map(Value::descriptor);
    let Some(first) = descriptors.next() else {
        return Descriptor::Any;
    };
    if descriptors.all(|d| d == first) {
        first
    } else {
        Descriptor::Any
    }
}

/// Render a value tree as JSON. Nil containers and optionals render as `null`.
pub fn render(value: &Value) -> Json {
    match value {
        Value::Scalar(scalar) => render_scalar(scalar),
        Value::Sequence { items: None, .. }
        | Value::Map { entries: None, .. }
        | Value::Optional { value: None, .. }
        | Value::Any(None) => Json::Null,
        Value::Sequence {
            items: Some(items), ..
        }
        | Value::Array { items, .. } => Json::Array(items.iter().map(render).collect()),
        Value::Map {
            entries: Some(entries),
            ..
        } => {
            let object: Map<String, Json> = entries
                .iter()
                .map(|(k, v)| (render_key(k), render(v)))
                .collect();
            Json::Object(object)
        }
        Value::Record(record) => {
            let object: Map<String, Json> = record
                .fields
                .iter()
                .map(|f| (f.name.to_string(), render(&f.value)))
                .collect();
            Json::Object(object)
        }
        Value::Optional {
            value: Some(inner), ..
        }
        | Value::Any(Some(inner)) => render(inner),
    }
}

fn render_scalar(scalar: &Scalar) -> Json {
    match &scalar.data {
        ScalarData::Bool(b) => Json::Bool(*b),
        ScalarData::Int(i) => Json::from(*i),
        ScalarData::Uint(u) => Json::from(*u),
        ScalarData::Float(f) => Number::from_f64(*f).map_or(Json::Null, Json::Number),
        ScalarData::Char(c) => Json::String(c.to_string()),
        ScalarData::String(s) => Json::String(s.clone()),
        ScalarData::Bytes(bytes) => match uuid::Uuid::from_value(Value::Scalar(scalar.clone())) {
            Ok(id) => Json::String(id.to_string()),
            Err(_) => Json::Array(bytes.iter().map(|b| Json::from(*b)).collect()),
        },
    }
}

/// JSON object keys are strings: string keys are used as-is, anything else
/// through its display form.
fn render_key(key: &Value) -> String {
    match key.unwrap_any().as_str() {
        Some(s) => s.to_string(),
        None => key.to_string(),
    }
}
