//! Typed view of a JSON-decoded Avro schema.
//!
//! Only the keys the generator needs are read: `type`, `name`, `fields`,
//! `items`, `values` and `symbols`. Everything else (namespaces, docs,
//! logical types, defaults) is ignored.

use crate::error::{GeneratorError, Result};
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::fmt;

pub const NULL_TYPE: &str = "null";
pub const BOOLEAN_TYPE: &str = "boolean";
pub const INT_TYPE: &str = "int";
pub const LONG_TYPE: &str = "long";
pub const FLOAT_TYPE: &str = "float";
pub const DOUBLE_TYPE: &str = "double";
pub const STRING_TYPE: &str = "string";
pub const RECORD_TYPE: &str = "record";
pub const ENUM_TYPE: &str = "enum";
pub const ARRAY_TYPE: &str = "array";
pub const MAP_TYPE: &str = "map";

/// The type of a schema node.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaType {
    Null,
    Boolean,
    Int,
    Long,
    Float,
    Double,
    String,
    /// Any other type tag (`bytes`, `fixed`, a named type reference, ...).
    /// Generated like a string.
    Other(String),
    Enum {
        symbols: Vec<String>,
    },
    Record {
        fields: Vec<RecordField>,
    },
    Array {
        items: Box<SchemaNode>,
    },
    Map {
        values: Box<SchemaNode>,
    },
    /// Ordered list of alternatives
    Union(Vec<SchemaType>),
    /// A type definition inlined at its point of use (`"type": {"type": ..}`)
    Nested(Box<SchemaNode>),
}

/// A named field of a record.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordField {
    pub name: String,
    pub schema: SchemaType,
}

impl RecordField {
    pub fn new(name: impl Into<String>, schema: SchemaType) -> Self {
        Self {
            name: name.into(),
            schema,
        }
    }

    /// Parse one entry of a record's `fields`. Every field needs a unique
    /// `name` within its record.
    fn from_json(decoded: &Value, seen: &mut HashSet<String>) -> Result<Self> {
        let node = SchemaNode::from_json(decoded)?;
        let name = node.name.ok_or_else(|| {
            GeneratorError::UnsupportedAvroSchemaType(format!(
                "Record field must contain name attribute, got \"{decoded}\"."
            ))
        })?;
        if !seen.insert(name.clone()) {
            return Err(GeneratorError::UnsupportedAvroSchemaType(format!(
                "Record field \"{name}\" is defined more than once."
            )));
        }
        Ok(Self {
            name,
            schema: node.schema,
        })
    }
}

/// A schema node: an optional field name plus its type.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaNode {
    pub name: Option<String>,
    pub schema: SchemaType,
}

impl SchemaNode {
    pub fn new(name: Option<&str>, schema: SchemaType) -> Self {
        Self {
            name: name.map(str::to_string),
            schema,
        }
    }

    /// Parse a decoded schema node.
    ///
    /// A bare type tag such as `"string"` is treated as `{"type": "string"}`.
    pub fn from_json(decoded: &Value) -> Result<Self> {
        match decoded {
            Value::String(_) => Ok(Self {
                name: None,
                schema: parse_type(decoded, &Map::new())?,
            }),
            Value::Object(node) => {
                let ty = node.get("type").ok_or_else(|| {
                    GeneratorError::UnsupportedAvroSchemaType(
                        "Schema must contain type attribute.".to_string(),
                    )
                })?;
                Ok(Self {
                    name: node.get("name").and_then(Value::as_str).map(str::to_string),
                    schema: parse_type(ty, node)?,
                })
            }
            other => Err(GeneratorError::UnsupportedAvroSchemaType(format!(
                "Schema node must be a type name or an object, got \"{other}\"."
            ))),
        }
    }

    /// Parse a decoded root schema and check that its type can be generated.
    pub fn parse_root(decoded: &Value) -> Result<Self> {
        let node = Self::from_json(decoded)?;
        if let SchemaType::Other(tag) = &node.schema {
            return Err(unsupported_tag(tag));
        }
        Ok(node)
    }
}

impl SchemaType {
    /// Whether values of this type are produced by the resolver directly.
    pub fn is_leaf(&self) -> bool {
        matches!(
            self,
            SchemaType::Null
                | SchemaType::Boolean
                | SchemaType::Int
                | SchemaType::Long
                | SchemaType::Float
                | SchemaType::Double
                | SchemaType::String
                | SchemaType::Other(_)
                | SchemaType::Enum { .. }
        )
    }
}

impl fmt::Display for SchemaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaType::Null => f.write_str(NULL_TYPE),
            SchemaType::Boolean => f.write_str(BOOLEAN_TYPE),
            SchemaType::Int => f.write_str(INT_TYPE),
            SchemaType::Long => f.write_str(LONG_TYPE),
            SchemaType::Float => f.write_str(FLOAT_TYPE),
            SchemaType::Double => f.write_str(DOUBLE_TYPE),
            SchemaType::String => f.write_str(STRING_TYPE),
            SchemaType::Other(tag) => f.write_str(tag),
            SchemaType::Enum { .. } => f.write_str(ENUM_TYPE),
            SchemaType::Record { .. } => f.write_str(RECORD_TYPE),
            SchemaType::Array { .. } => f.write_str(ARRAY_TYPE),
            SchemaType::Map { .. } => f.write_str(MAP_TYPE),
            SchemaType::Union(alternatives) => {
                let names: Vec<String> = alternatives.iter().map(ToString::to_string).collect();
                write!(f, "[{}]", names.join(", "))
            }
            SchemaType::Nested(inner) => inner.schema.fmt(f),
        }
    }
}

/// Parse the `type` value of `node`.
///
/// Composite tags read their payload (`fields`, `items`, `values`, `symbols`)
/// from `node`, which is also what union alternatives are resolved against.
fn parse_type(ty: &Value, node: &Map<String, Value>) -> Result<SchemaType> {
    match ty {
        Value::String(tag) => parse_tag(tag, node),
        Value::Array(alternatives) => {
            if alternatives.is_empty() {
                return Err(GeneratorError::UnsupportedAvroSchemaType(
                    "Union schema must contain at least one type.".to_string(),
                ));
            }
            alternatives
                .iter()
                .map(|alternative| parse_type(alternative, node))
                .collect::<Result<Vec<_>>>()
                .map(SchemaType::Union)
        }
        Value::Object(inner) => {
            if !inner.contains_key("type") {
                return Err(GeneratorError::UnsupportedAvroSchemaType(format!(
                    "Schema type \"{ty}\" is not supported."
                )));
            }
            Ok(SchemaType::Nested(Box::new(SchemaNode::from_json(ty)?)))
        }
        other => Err(GeneratorError::UnsupportedAvroSchemaType(format!(
            "Schema type \"{other}\" is not supported."
        ))),
    }
}

fn parse_tag(tag: &str, node: &Map<String, Value>) -> Result<SchemaType> {
    let schema = match tag {
        NULL_TYPE => SchemaType::Null,
        BOOLEAN_TYPE => SchemaType::Boolean,
        INT_TYPE => SchemaType::Int,
        LONG_TYPE => SchemaType::Long,
        FLOAT_TYPE => SchemaType::Float,
        DOUBLE_TYPE => SchemaType::Double,
        STRING_TYPE => SchemaType::String,
        ENUM_TYPE => {
            let symbols: Vec<String> = node
                .get("symbols")
                .and_then(Value::as_array)
                .map(|symbols| {
                    symbols
                        .iter()
                        .filter_map(|symbol| symbol.as_str().map(str::to_string))
                        .collect()
                })
                .unwrap_or_default();
            if symbols.is_empty() {
                return Err(missing_attribute(ENUM_TYPE, "symbols"));
            }
            SchemaType::Enum { symbols }
        }
        RECORD_TYPE => {
            let fields = node
                .get("fields")
                .and_then(Value::as_array)
                .ok_or_else(|| missing_attribute(RECORD_TYPE, "fields"))?;
            let mut seen = HashSet::with_capacity(fields.len());
            SchemaType::Record {
                fields: fields
                    .iter()
                    .map(|field| RecordField::from_json(field, &mut seen))
                    .collect::<Result<Vec<_>>>()?,
            }
        }
        ARRAY_TYPE => {
            let items = node
                .get("items")
                .ok_or_else(|| missing_attribute(ARRAY_TYPE, "items"))?;
            SchemaType::Array {
                items: Box::new(SchemaNode::from_json(items)?),
            }
        }
        MAP_TYPE => {
            let values = node
                .get("values")
                .ok_or_else(|| missing_attribute(MAP_TYPE, "values"))?;
            SchemaType::Map {
                values: Box::new(SchemaNode::from_json(values)?),
            }
        }
        other => SchemaType::Other(other.to_string()),
    };
    Ok(schema)
}

fn missing_attribute(tag: &str, attribute: &str) -> GeneratorError {
    GeneratorError::UnsupportedAvroSchemaType(format!(
        "Schema type \"{tag}\" must contain {attribute} attribute."
    ))
}

fn unsupported_tag(tag: &str) -> GeneratorError {
    GeneratorError::UnsupportedAvroSchemaType(format!("Schema type \"{tag}\" is not supported."))
}
