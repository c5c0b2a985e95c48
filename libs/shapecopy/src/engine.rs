use std::collections::HashMap;
use std::hash::{DefaultHasher, Hasher};
use std::sync::Arc;

use crate::converter::{Converter, ConverterRegistry};
use crate::descriptor::{Descriptor, Kind};
use crate::error::CopyError;
use crate::logger::{Logger, NoopLogger, TracingLogger};
use crate::shape::Shape;
use crate::value::{Record, Value};

/// Recursive copy engine.
///
/// Walks the source value in lock-step with the destination. At every node
/// the converter registry is asked first; without a match the engine falls
/// back to structural recursion over sequences, arrays, maps, records,
/// optionals and scalars.
///
/// Holds no mutable state between calls, so one instance can be shared
/// across threads.
///
/// Record copy stops at the first source field that has no destination
/// counterpart: the omission is logged and the copy still succeeds, but
/// fields declared after it are never copied.
pub struct Copier {
    registry: ConverterRegistry,
    logger: Arc<dyn Logger>,
}

impl std::fmt::Debug for Copier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Copier")
            .field("registry", &self.registry)
            .finish()
    }
}

impl Default for Copier {
    fn default() -> Self {
        Self::new()
    }
}

/// Copy `src` into `dst` with a one-off [`Copier`].
///
/// Uses [`TracingLogger`] for diagnostics.
pub fn copy<D, S>(
    dst: &mut D,
    src: &S,
    converters: impl IntoIterator<Item = Converter>,
) -> Result<(), CopyError>
where
    D: Shape,
    S: Shape,
{
    let mut copier = Copier::with_logger(TracingLogger);
    copier.set_converters(converters);
    copier.copy(dst, src)
}

impl Copier {
    pub fn new() -> Self {
        Self::with_logger(NoopLogger)
    }

    pub fn with_logger(logger: impl Logger + 'static) -> Self {
        Self {
            registry: ConverterRegistry::new(),
            logger: Arc::new(logger),
        }
    }

    /// Replace the active converter list.
    pub fn set_converters(&mut self, converters: impl IntoIterator<Item = Converter>) {
        self.registry.set(converters);
    }

    /// Append a converter with the lowest priority.
    pub fn add_converter(&mut self, converter: Converter) {
        self.registry.push(converter);
    }

    pub fn converters(&self) -> &ConverterRegistry {
        &self.registry
    }

    /// Copy a typed value into a typed destination.
    ///
    /// On error the destination keeps whatever was written before the
    /// failure; there is no rollback.
    pub fn copy<D: Shape, S: Shape>(&self, dst: &mut D, src: &S) -> Result<(), CopyError> {
        let source = src.to_value();
        let mut target = dst.to_value();
        let outcome = self.copy_value(&mut target, &source);
        *dst = D::from_value(target)?;
        outcome
    }

    /// Copy between value trees.
    ///
    /// An untyped nil (`Value::Any(None)`) destination is an empty any slot:
    /// it accepts converter output or another any value.
    pub fn copy_value(&self, dst: &mut Value, src: &Value) -> Result<(), CopyError> {
        self.copy_node(dst, true, src)
    }

    fn copy_node(&self, dst: &mut Value, writable: bool, src: &Value) -> Result<(), CopyError> {
        if let Value::Optional { value: None, .. } = src {
            return Ok(());
        }
        if let Some(converter) = self.find_converter(dst, src) {
            return self.apply_converter(converter, dst, writable, src);
        }
        match src {
            Value::Sequence { items, .. } => {
                self.copy_sequence(dst, writable, src, items.as_deref().unwrap_or_default())
            }
            Value::Array { items, .. } => self.copy_sequence(dst, writable, src, items),
            Value::Map { key, value, entries } => self.copy_map(
                dst,
                writable,
                src,
                (key, value),
                entries.as_deref().unwrap_or_default(),
            ),
            Value::Record(record) => self.copy_record(dst, writable, src, record),
            Value::Optional {
                value: Some(inner), ..
            } => self.copy_optional(dst, writable, inner),
            _ => self.copy_element(dst, writable, src),
        }
    }

    fn find_converter(&self, dst: &Value, src: &Value) -> Option<&Converter> {
        if self.registry.is_empty() {
            return None;
        }
        let target = dst.descriptor();
        self.registry.find(&src.descriptor(), target.pointee())
    }

    fn apply_converter(
        &self,
        converter: &Converter,
        dst: &mut Value,
        writable: bool,
        src: &Value,
    ) -> Result<(), CopyError> {
        tracing::trace!(converter = %converter.name(), "applying converter");
        let converted = converter.convert(src).map_err(CopyError::Convert)?;
        let declared = dst.descriptor();
        let (produced, expected) = (converted.descriptor(), declared.pointee());
        if &produced != expected {
            return Err(CopyError::different_types(produced, expected));
        }
        let target = pointee_mut(dst, writable, src)?;
        if !writable {
            return Err(CopyError::cannot_set(&converted, target));
        }
        *target = converted;
        Ok(())
    }

    fn copy_sequence(
        &self,
        dst: &mut Value,
        writable: bool,
        src: &Value,
        src_items: &[Value],
    ) -> Result<(), CopyError> {
        if src_items.is_empty() {
            return Ok(());
        }
        let kind = pointee_kind(dst);
        if kind != Kind::Sequence && kind != Kind::Array {
            return Err(CopyError::different_types(src.kind(), kind));
        }
        match pointee_mut(dst, writable, src)? {
            Value::Sequence { elem, items } => {
                let current = items.as_ref().map_or(0, Vec::len);
                if src_items.len() > current {
                    if !writable {
                        return Err(CopyError::cannot_set(src, Descriptor::sequence(elem.clone())));
                    }
                    let mut grown: Vec<Value> =
                        (0..src_items.len()).map(|_| elem.zero_value()).collect();
                    self.copy_elements(&mut grown, writable, src_items)?;
                    *items = Some(grown);
                    Ok(())
                } else {
                    let existing = items.as_deref_mut().unwrap_or_default();
                    self.copy_elements(existing, writable, src_items)
                }
            }
            Value::Array { items, .. } => self.copy_elements(items, writable, src_items),
            other => Err(CopyError::different_types(src.kind(), other.kind())),
        }
    }

    /// Copies index by index up to the shorter of the two lengths.
    fn copy_elements(
        &self,
        dst: &mut [Value],
        writable: bool,
        src: &[Value],
    ) -> Result<(), CopyError> {
        for (slot, item) in dst.iter_mut().zip(src) {
            self.copy_node(slot, writable, item)?;
        }
        Ok(())
    }

    fn copy_map(
        &self,
        dst: &mut Value,
        writable: bool,
        src: &Value,
        (src_key, src_value): (&Descriptor, &Descriptor),
        src_entries: &[(Value, Value)],
    ) -> Result<(), CopyError> {
        let kind = pointee_kind(dst);
        if kind != Kind::Map {
            return Err(CopyError::different_types(src.kind(), kind));
        }
        if !writable {
            return Err(CopyError::cannot_set(src, &*dst));
        }
        let Value::Map {
            key,
            value,
            entries,
        } = pointee_mut(dst, writable, src)?
        else {
            return Err(CopyError::different_types(src.kind(), kind));
        };
        let entries = entries.get_or_insert_with(|| Vec::with_capacity(src_entries.len()));
        let mut index: HashMap<u64, Vec<usize>> =
            HashMap::with_capacity(entries.len() + src_entries.len());
        for (position, (existing, _)) in entries.iter().enumerate() {
            index.entry(key_hash(existing)).or_default().push(position);
        }

        for (k, v) in src_entries {
            let new_key = if src_key != key {
                let mut fresh = key.zero_value();
                self.copy_node(&mut fresh, true, k)?;
                fresh
            } else {
                k.clone()
            };
            let new_value = if src_value != value {
                let mut fresh = value.zero_value();
                self.copy_node(&mut fresh, true, v)?;
                fresh
            } else {
                v.clone()
            };
            let bucket = index.entry(key_hash(&new_key)).or_default();
            match bucket.iter().copied().find(|&i| entries[i].0 == new_key) {
                Some(position) => entries[position].1 = new_value,
                None => {
                    bucket.push(entries.len());
                    entries.push((new_key, new_value));
                }
            }
        }
        Ok(())
    }

    fn copy_record(
        &self,
        dst: &mut Value,
        writable: bool,
        src: &Value,
        record: &Record,
    ) -> Result<(), CopyError> {
        let kind = pointee_kind(dst);
        if kind != Kind::Record {
            return Err(CopyError::different_types(src.kind(), kind));
        }
        let Value::Record(target) = pointee_mut(dst, writable, src)? else {
            return Err(CopyError::different_types(src.kind(), kind));
        };

        for field in &record.fields {
            let Some(slot) = target.field_mut(&field.name) else {
                self.logger.field_not_found(record.ty.name(), &field.name);
                return Ok(());
            };
            let field_writable = writable && !slot.readonly;
            self.copy_node(&mut slot.value, field_writable, &field.value)?;
        }
        Ok(())
    }

    /// Source optional holds a value: overwrite a set destination pointee,
    /// allocate a nil one, or copy straight into a plain destination.
    fn copy_optional(&self, dst: &mut Value, writable: bool, src: &Value) -> Result<(), CopyError> {
        let target = pointee_mut(dst, writable, src)?;
        self.copy_node(target, writable, src)
    }

    fn copy_element(&self, dst: &mut Value, writable: bool, src: &Value) -> Result<(), CopyError> {
        if let Value::Optional { .. } = dst {
            let target = pointee_mut(dst, writable, src)?;
            return self.copy_node(target, writable, src);
        }
        let (src_kind, dst_kind) = (src.kind(), dst.kind());
        if src_kind != dst_kind {
            return Err(CopyError::different_types(src_kind, dst_kind));
        }
        let (src_ty, dst_ty) = (src.descriptor(), dst.descriptor());
        if src_ty != dst_ty {
            return Err(CopyError::different_types(src_ty, dst_ty));
        }
        if !writable {
            return Err(CopyError::cannot_set(src, &*dst));
        }
        *dst = src.clone();
        Ok(())
    }
}

fn key_hash(key: &Value) -> u64 {
    let mut hasher = DefaultHasher::new();
    key.hash_key(&mut hasher);
    hasher.finish()
}

fn pointee_kind(dst: &Value) -> Kind {
    match dst {
        Value::Optional { inner, .. } => inner.kind(),
        other => other.kind(),
    }
}

/// Follows one optional level on the destination, allocating a zero
/// pointee when it is nil.
fn pointee_mut<'a>(
    dst: &'a mut Value,
    writable: bool,
    src: &Value,
) -> Result<&'a mut Value, CopyError> {
    match dst {
        Value::Optional { inner, value } => {
            if value.is_none() && !writable {
                return Err(CopyError::cannot_set(src, "nil"));
            }
            Ok(&mut **value.get_or_insert_with(|| Box::new(inner.zero_value())))
        }
        other => Ok(other),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::{BTreeMap, HashMap};
    use std::sync::Mutex;

    use super::*;
    use crate::descriptor::{FieldDescriptor, RecordDescriptor};
    use crate::value::FieldValue;

    fn string_to_int() -> Converter {
        Converter::typed(|s: String| s.parse::<i64>())
    }

    fn int_to_string() -> Converter {
        Converter::typed(|i: i64| Ok::<_, std::convert::Infallible>(i.to_string()))
    }

    fn copier(converters: Vec<Converter>) -> Copier {
        let mut copier = Copier::new();
        copier.set_converters(converters);
        copier
    }

    #[derive(Default)]
    struct MemoryLogger(Mutex<Vec<String>>);

    impl Logger for Arc<MemoryLogger> {
        fn field_not_found(&self, record: &str, field: &str) {
            self.0.lock().unwrap().push(format!("{record}.{field}"));
        }
    }

    fn string_to_any() -> Converter {
        Converter::new(Some(String::descriptor()), None, |v| {
            Ok(Value::Any(Some(Box::new(v.clone()))))
        })
    }

    #[test]
    fn test_untyped_nil_destination_takes_converter_output() {
        let copier = copier(vec![string_to_any()]);
        let mut dst = Value::Any(None);
        copier.copy_value(&mut dst, &"x".to_string().to_value()).unwrap();
        assert_eq!(dst, Value::Any(Some(Box::new("x".to_string().to_value()))));

        let mut dst = Value::Any(None);
        copier.copy(&mut dst, &"y".to_string()).unwrap();
        assert_eq!(dst.as_str(), Some("y"));
    }

    #[test]
    fn test_untyped_nil_destination_without_converter() {
        let mut dst = Value::Any(None);
        let err = Copier::new()
            .copy_value(&mut dst, &"x".to_string().to_value())
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "src and dst fields has different types: expected string, actual any"
        );
        assert_eq!(dst, Value::Any(None));
    }

    #[test]
    fn test_untyped_nil_source() {
        let copier = Copier::new();
        let mut dst = Value::Any(Some(Box::new(1i64.to_value())));
        copier.copy_value(&mut dst, &Value::Any(None)).unwrap();
        assert_eq!(dst, Value::Any(None));

        let mut dst = String::new().to_value();
        let err = copier.copy_value(&mut dst, &Value::Any(None)).unwrap_err();
        assert!(matches!(err, CopyError::DifferentTypes { .. }));
    }

    #[test]
    fn test_scalar_copy() {
        let mut dst = String::new();
        Copier::new().copy(&mut dst, &"Lorem ipsum".to_string()).unwrap();
        assert_eq!(dst, "Lorem ipsum");
    }

    #[test]
    fn test_kind_mismatch() {
        let mut dst = String::new();
        let err = Copier::new().copy(&mut dst, &100i64).unwrap_err();
        assert_eq!(
            err.to_string(),
            "src and dst fields has different types: expected int, actual string"
        );
        assert_eq!(dst, "");
    }

    #[test]
    fn test_type_mismatch_within_kind() {
        let mut dst = 0i64;
        let err = Copier::new().copy(&mut dst, &7i32).unwrap_err();
        assert_eq!(
            err.to_string(),
            "src and dst fields has different types: expected i32, actual i64"
        );
    }

    #[test]
    fn test_converter_bridges_types() {
        let mut dst = String::new();
        copier(vec![int_to_string()]).copy(&mut dst, &100i64).unwrap();
        assert_eq!(dst, "100");

        let mut dst = 0i64;
        copier(vec![string_to_int()])
            .copy(&mut dst, &"100".to_string())
            .unwrap();
        assert_eq!(dst, 100);
    }

    #[test]
    fn test_converter_error_is_verbatim() {
        let mut dst = 0i64;
        let err = copier(vec![string_to_int()])
            .copy(&mut dst, &"Lorem".to_string())
            .unwrap_err();
        assert!(matches!(err, CopyError::Convert(_)));
        assert_eq!(err.to_string(), "invalid digit found in string");
        assert_eq!(dst, 0);
    }

    #[test]
    fn test_converter_output_must_match_destination() {
        let liar = Converter::new(Some(String::descriptor()), Some(i64::descriptor()), |_| {
            Ok(true.to_value())
        });
        let mut dst = 0i64;
        let err = copier(vec![liar])
            .copy(&mut dst, &"1".to_string())
            .unwrap_err();
        assert!(matches!(err, CopyError::DifferentTypes { .. }));
    }

    #[test]
    fn test_rejected_converter_output_leaves_optional_nil() {
        let liar = Converter::new(Some(String::descriptor()), Some(i64::descriptor()), |_| {
            Ok(true.to_value())
        });
        let mut dst: Option<i64> = None;
        let err = copier(vec![liar])
            .copy(&mut dst, &"1".to_string())
            .unwrap_err();
        assert!(matches!(err, CopyError::DifferentTypes { .. }));
        assert_eq!(dst, None);
    }

    #[test]
    fn test_converter_matches_through_optional_destination() {
        let copier = copier(vec![string_to_int()]);
        let mut dst: Option<i64> = None;
        copier.copy(&mut dst, &"5".to_string()).unwrap();
        assert_eq!(dst, Some(5));

        let mut dst = Some(1i64);
        copier.copy(&mut dst, &"7".to_string()).unwrap();
        assert_eq!(dst, Some(7));
    }

    #[test]
    fn test_map_copy_with_many_keys() {
        let src: HashMap<String, String> = (0..20_000)
            .map(|i| (format!("k{i}"), i.to_string()))
            .collect();
        let mut dst: HashMap<String, i64> = HashMap::new();
        copier(vec![string_to_int()]).copy(&mut dst, &src).unwrap();
        assert_eq!(dst.len(), 20_000);
        assert_eq!(dst["k0"], 0);
        assert_eq!(dst["k19999"], 19_999);
    }

    #[test]
    fn test_converted_keys_that_collide_replace() {
        let src: BTreeMap<String, String> = [("1", "a"), ("01", "b")]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let mut dst: HashMap<i64, String> = HashMap::new();
        copier(vec![string_to_int()]).copy(&mut dst, &src).unwrap();
        assert_eq!(dst, HashMap::from([(1, "a".to_string())]));
    }

    #[test]
    fn test_empty_source_sequence_keeps_nil_destination() {
        let mut dst = Value::Sequence {
            elem: String::descriptor(),
            items: None,
        };
        let src = Value::Sequence {
            elem: String::descriptor(),
            items: Some(Vec::new()),
        };
        Copier::new().copy_value(&mut dst, &src).unwrap();
        assert_eq!(
            dst,
            Value::Sequence {
                elem: String::descriptor(),
                items: None
            }
        );
    }

    #[test]
    fn test_sequence_grows_to_source_length() {
        let mut dst: Vec<i64> = vec![9];
        let src: Vec<String> = ["100", "200", "300"].map(String::from).to_vec();
        copier(vec![string_to_int()]).copy(&mut dst, &src).unwrap();
        assert_eq!(dst, vec![100, 200, 300]);
    }

    #[test]
    fn test_longer_destination_is_written_in_place() {
        let mut dst: Vec<i64> = vec![1, 2, 3];
        copier(vec![string_to_int()])
            .copy(&mut dst, &vec!["7".to_string()])
            .unwrap();
        assert_eq!(dst, vec![7, 2, 3]);
    }

    #[test]
    fn test_failed_growth_leaves_sequence_unassigned() {
        let mut dst: Vec<i64> = Vec::new();
        let src: Vec<String> = ["1", "x"].map(String::from).to_vec();
        assert!(copier(vec![string_to_int()]).copy(&mut dst, &src).is_err());
        assert!(dst.is_empty());
    }

    #[test]
    fn test_sequence_into_fixed_array() {
        let mut dst = [0i64; 3];
        let src: Vec<String> = ["1", "2", "3", "4"].map(String::from).to_vec();
        copier(vec![string_to_int()]).copy(&mut dst, &src).unwrap();
        assert_eq!(dst, [1, 2, 3]);
    }

    #[test]
    fn test_sequence_into_scalar_fails() {
        let mut dst = String::new();
        let err = Copier::new()
            .copy(&mut dst, &vec!["a".to_string()])
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "src and dst fields has different types: expected sequence, actual string"
        );
    }

    #[test]
    fn test_map_values_are_converted() {
        let src: HashMap<String, String> = [("a".to_string(), "1".to_string())]
            .into_iter()
            .collect();
        let mut dst: HashMap<String, i64> = HashMap::new();
        copier(vec![string_to_int()]).copy(&mut dst, &src).unwrap();
        assert_eq!(dst, HashMap::from([("a".to_string(), 1)]));
    }

    #[test]
    fn test_map_keys_are_converted() {
        let src: BTreeMap<String, String> = [("1", "100"), ("20", "300")]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let mut dst: BTreeMap<i64, i64> = BTreeMap::new();
        copier(vec![string_to_int()]).copy(&mut dst, &src).unwrap();
        assert_eq!(dst, BTreeMap::from([(1, 100), (20, 300)]));
    }

    #[test]
    fn test_map_is_initialised_before_entries_fail() {
        let src = BTreeMap::from([("a".to_string(), "1".to_string())]).to_value();
        let mut dst = Descriptor::map(String::descriptor(), i64::descriptor()).zero_value();
        let err = Copier::new().copy_value(&mut dst, &src).unwrap_err();
        assert_eq!(
            err.to_string(),
            "src and dst fields has different types: expected string, actual int"
        );
        assert!(!dst.is_nil());
        assert!(dst.is_empty());
    }

    #[test]
    fn test_map_into_sequence_fails() {
        let src = BTreeMap::from([("a".to_string(), "1".to_string())]);
        let mut dst: Vec<String> = Vec::new();
        let err = Copier::new().copy(&mut dst, &src).unwrap_err();
        assert_eq!(
            err.to_string(),
            "src and dst fields has different types: expected map, actual sequence"
        );
    }

    fn record(name: &'static str, fields: Vec<(&'static str, Value)>) -> Value {
        let ty = RecordDescriptor::new(
            name,
            fields
                .iter()
                .map(|(n, v)| FieldDescriptor::new(*n, v.descriptor(), false))
                .collect(),
        );
        Value::Record(Record::new(
            ty,
            fields
                .into_iter()
                .map(|(n, v)| FieldValue::new(n, v, false))
                .collect(),
        ))
    }

    #[test]
    fn test_record_stops_at_first_missing_field() {
        let logger = Arc::new(MemoryLogger::default());
        let mut copier = Copier::with_logger(Arc::clone(&logger));
        copier.add_converter(string_to_int());

        let src = record(
            "A",
            vec![
                ("ID", "100".to_string().to_value()),
                ("Type", "skip".to_string().to_value()),
                ("Name", "John".to_string().to_value()),
            ],
        );
        let mut dst = record(
            "B",
            vec![("ID", 0i64.to_value()), ("Name", String::new().to_value())],
        );
        copier.copy_value(&mut dst, &src).unwrap();

        let dst = dst.as_record().unwrap();
        assert_eq!(dst.field("ID").unwrap().value, 100i64.to_value());
        assert_eq!(dst.field("Name").unwrap().value, String::new().to_value());
        assert_eq!(*logger.0.lock().unwrap(), vec!["A.Type".to_string()]);
    }

    #[test]
    fn test_readonly_field_cannot_be_set() {
        let ty = RecordDescriptor::new("Locked", vec![]);
        let mut dst = Value::Record(Record::new(
            ty,
            vec![FieldValue::new("id", 0i64.to_value(), true)],
        ));
        let src = record("Open", vec![("id", 5i64.to_value())]);
        let err = Copier::new().copy_value(&mut dst, &src).unwrap_err();
        assert_eq!(err.to_string(), "can not set value: 5 to 0");
    }

    #[test]
    fn test_nil_optional_source_is_noop() {
        let mut dst = 42i64;
        Copier::new().copy(&mut dst, &None::<i64>).unwrap();
        assert_eq!(dst, 42);
    }

    #[test]
    fn test_optional_into_plain_destination() {
        let mut dst = String::new();
        Copier::new()
            .copy(&mut dst, &Some("Bill".to_string()))
            .unwrap();
        assert_eq!(dst, "Bill");
    }

    #[test]
    fn test_optional_into_nil_optional_allocates() {
        let mut dst: Option<i64> = None;
        copier(vec![string_to_int()])
            .copy(&mut dst, &Some("100".to_string()))
            .unwrap();
        assert_eq!(dst, Some(100));
    }

    #[test]
    fn test_optional_into_set_optional_overwrites() {
        let mut dst = Some("old".to_string());
        Copier::new()
            .copy(&mut dst, &Some("new".to_string()))
            .unwrap();
        assert_eq!(dst.as_deref(), Some("new"));
    }

    #[test]
    fn test_scalar_into_nil_optional_allocates() {
        let mut dst: Option<String> = None;
        Copier::new().copy(&mut dst, &"x".to_string()).unwrap();
        assert_eq!(dst.as_deref(), Some("x"));
    }

    #[test]
    fn test_any_slot() {
        let mut dst = Value::Any(Some(Box::new(0i64.to_value())));
        let src = Value::Any(Some(Box::new("x".to_string().to_value())));
        Copier::new().copy_value(&mut dst, &src).unwrap();
        assert_eq!(dst, src);
    }

    #[test]
    fn test_copy_is_idempotent() {
        let copier = copier(vec![string_to_int()]);
        let src: HashMap<String, Vec<String>> =
            HashMap::from([("k".to_string(), vec!["1".to_string(), "2".to_string()])]);

        let mut first: HashMap<String, Vec<i64>> = HashMap::new();
        let mut second: HashMap<String, Vec<i64>> = HashMap::new();
        copier.copy(&mut first, &src).unwrap();
        copier.copy(&mut second, &src).unwrap();
        assert_eq!(first, second);
        assert_eq!(first["k"], vec![1, 2]);
    }

    #[test]
    fn test_free_function() {
        let src: HashMap<String, String> = HashMap::from([("a".to_string(), "1".to_string())]);
        let mut dst: HashMap<String, i64> = HashMap::new();
        copy(&mut dst, &src, [string_to_int()]).unwrap();
        assert_eq!(dst, HashMap::from([("a".to_string(), 1)]));
    }
}
