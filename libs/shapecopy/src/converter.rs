use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use crate::descriptor::Descriptor;
use crate::error::BoxError;
use crate::shape::Shape;
use crate::value::Value;

type ConvertFn = dyn Fn(&Value) -> Result<Value, BoxError> + Send + Sync;

/// Type-pair-specific conversion rule.
///
/// Solves one task: turn a value of the `src` type into a value of the
/// `dst` type. Structural recursion handles everything else; a converter
/// only bridges a specific pair the engine can not copy on its own.
///
/// An omitted source or destination type is [`Descriptor::Any`].
#[derive(Clone)]
pub struct Converter {
    name: Cow<'static, str>,
    src: Descriptor,
    dst: Descriptor,
    convert: Arc<ConvertFn>,
}

impl Converter {
    pub fn new<F>(src: Option<Descriptor>, dst: Option<Descriptor>, convert: F) -> Self
    where
        F: Fn(&Value) -> Result<Value, BoxError> + Send + Sync + 'static,
    {
        let src = src.unwrap_or(Descriptor::Any);
        let dst = dst.unwrap_or(Descriptor::Any);
        Self {
            name: Cow::Owned(format!("{src} -> {dst}")),
            src,
            dst,
            convert: Arc::new(convert),
        }
    }

    /// Converter between two Rust types.
    ///
    /// ```ignore
    /// let parse = Converter::typed(|s: String| s.parse::<i64>());
    /// ```
    pub fn typed<S, D, E, F>(convert: F) -> Self
    where
        S: Shape,
        D: Shape,
        E: Into<BoxError>,
        F: Fn(S) -> Result<D, E> + Send + Sync + 'static,
    {
        Self::new(Some(S::descriptor()), Some(D::descriptor()), move |value| {
            let input = S::from_value(value.clone())?;
            let output = convert(input).map_err(Into::<BoxError>::into)?;
            Ok(output.to_value())
        })
    }

    pub fn named(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.name = name.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn src(&self) -> &Descriptor {
        &self.src
    }

    pub fn dst(&self) -> &Descriptor {
        &self.dst
    }

    pub fn matches(&self, src: &Descriptor, dst: &Descriptor) -> bool {
        &self.src == src && &self.dst == dst
    }

    pub fn convert(&self, value: &Value) -> Result<Value, BoxError> {
        (self.convert)(value)
    }
}

impl fmt::Debug for Converter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Converter")
            .field("name", &self.name)
            .field("src", &self.src)
            .field("dst", &self.dst)
            .finish()
    }
}

/// Ordered converter list. Registration order is match priority.
#[derive(Debug, Clone, Default)]
pub struct ConverterRegistry {
    converters: Vec<Converter>,
}

impl ConverterRegistry {
    pub fn new() -> Self {
        Self {
            converters: Vec::new(),
        }
    }

    /// Replace the whole list.
    pub fn set(&mut self, converters: impl IntoIterator<Item = Converter>) {
        self.converters = converters.into_iter().collect();
    }

    pub fn push(&mut self, converter: Converter) {
        self.converters.push(converter);
    }

    /// First converter registered for exactly `(src, dst)`.
    ///
    /// `dst` is the destination with one optional level already stripped.
    pub fn find(&self, src: &Descriptor, dst: &Descriptor) -> Option<&Converter> {
        self.converters.iter().find(|c| c.matches(src, dst))
    }

    pub fn len(&self) -> usize {
        self.converters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.converters.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Converter> {
        self.converters.iter()
    }
}

impl FromIterator<Converter> for ConverterRegistry {
    fn from_iter<I: IntoIterator<Item = Converter>>(iter: I) -> Self {
        Self {
            converters: iter.into_iter().collect(),
        }
    }
}
