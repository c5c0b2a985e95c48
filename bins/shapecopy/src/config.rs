use serde::Deserialize;
use shapecopy::{Converter, Descriptor, FieldDescriptor, RecordDescriptor, Shape};

use crate::error::CliError;

/// Top-level configuration.
///
/// ```toml
/// converters = ["string_to_int"]
///
/// [target]
/// type = "record"
/// name = "User"
/// fields = [
///     { name = "id", shape = { type = "int" } },
///     { name = "name", shape = { type = "string" } },
/// ]
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct CopyConfig {
    /// Built-in converter names, highest priority first.
    #[serde(default)]
    pub converters: Vec<String>,
    pub target: ShapeSpec,
}

/// Declarative destination shape.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ShapeSpec {
    Bool,
    Int,
    Uint,
    Float,
    Char,
    String,
    Uuid,
    Any,
    Sequence {
        elem: Box<ShapeSpec>,
    },
    Array {
        elem: Box<ShapeSpec>,
        len: usize,
    },
    Map {
        key: Box<ShapeSpec>,
        value: Box<ShapeSpec>,
    },
    Record {
        name: String,
        #[serde(default)]
        fields: Vec<FieldSpec>,
    },
    Optional {
        inner: Box<ShapeSpec>,
    },
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    pub shape: ShapeSpec,
    #[serde(default)]
    pub readonly: bool,
}

impl CopyConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &str) -> Result<Self, CliError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| CliError::Config(format!("{path}: {e}")))?;
        Self::parse(&content).map_err(|e| e.with_context(path))
    }

    /// Parse configuration from a TOML string.
    pub fn parse(toml_str: &str) -> Result<Self, CliError> {
        toml::from_str(toml_str).map_err(|e| CliError::Config(e.to_string()))
    }

    /// Resolve converter names against the built-in set, keeping order.
    pub fn converters(&self) -> Result<Vec<Converter>, CliError> {
        self.converters
            .iter()
            .map(|name| {
                shapecopy_converters::by_name(name).ok_or_else(|| CliError::UnknownConverter {
                    name: name.clone(),
                    available: shapecopy_converters::BUILTIN_NAMES.join(", "),
                })
            })
            .collect()
    }
}

impl ShapeSpec {
    pub fn descriptor(&self) -> Descriptor {
        match self {
            ShapeSpec::Bool => bool::descriptor(),
            ShapeSpec::Int => i64::descriptor(),
            ShapeSpec::Uint => u64::descriptor(),
            ShapeSpec::Float => f64::descriptor(),
            ShapeSpec::Char => char::descriptor(),
            ShapeSpec::String => String::descriptor(),
            ShapeSpec::Uuid => uuid::Uuid::descriptor(),
            ShapeSpec::Any => Descriptor::Any,
            ShapeSpec::Sequence { elem } => Descriptor::sequence(elem.descriptor()),
            ShapeSpec::Array { elem, len } => Descriptor::array(elem.descriptor(), *len),
            ShapeSpec::Map { key, value } => Descriptor::map(key.descriptor(), value.descriptor()),
            ShapeSpec::Record { name, fields } => {
                let fields = fields
                    .iter()
                    .map(|f| FieldDescriptor::new(f.name.clone(), f.shape.descriptor(), f.readonly))
                    .collect();
                Descriptor::Record(RecordDescriptor::new(name.clone(), fields))
            }
            ShapeSpec::Optional { inner } => Descriptor::optional(inner.descriptor()),
        }
    }
}
