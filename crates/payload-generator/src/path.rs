//! Position of a node in the schema tree.

use data_definition::FieldAddress;
use serde_json::Value;
use std::fmt;

/// One level of a [`FieldPath`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// A named record field, array or map
    Field(String),
    /// An unnamed composite (array items, map values, anonymous branches)
    Positional,
    /// The synthetic key of a map entry
    MapKey,
}

impl PathSegment {
    pub fn from_name(name: Option<&str>) -> Self {
        match name {
            Some(name) => PathSegment::Field(name.to_string()),
            None => PathSegment::Positional,
        }
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Field(name) => f.write_str(name),
            PathSegment::Positional => f.write_str("0"),
            PathSegment::MapKey => f.write_str("$key"),
        }
    }
}

/// Immutable path from the schema root to the current node.
///
/// [`child`](Self::child) returns a new path, so sibling branches of the walk
/// never observe each other's segments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldPath {
    segments: Vec<PathSegment>,
}

impl FieldPath {
    /// The empty path of the schema root.
    pub fn root() -> Self {
        Self::default()
    }

    pub fn child(&self, segment: PathSegment) -> Self {
        let mut segments = self.segments.clone();
        segments.push(segment);
        Self { segments }
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Dotted override address of `field` at this path, e.g. `address.street`.
    ///
    /// At the root the field address is returned unchanged, so a positional
    /// field stays positional.
    pub fn dotted_address(&self, field: &FieldAddress) -> FieldAddress {
        if self.is_empty() {
            return field.clone();
        }
        let mut parts: Vec<String> = self.segments.iter().map(ToString::to_string).collect();
        parts.push(field.to_string());
        FieldAddress::Named(parts.join(".").trim_matches('.').to_string())
    }

    /// Follow this path through a predefined payload.
    ///
    /// Named segments step into JSON objects, positional segments into the
    /// first element of a JSON array. Returns the value reached at the end of
    /// the path.
    pub fn probe<'a>(&self, payload: &'a Value) -> Option<&'a Value> {
        let mut current = payload;
        for segment in &self.segments {
            current = match (segment, current) {
                (PathSegment::Field(name), Value::Object(object)) => object.get(name)?,
                (PathSegment::Positional, Value::Array(items)) => items.first()?,
                _ => return None,
            };
        }
        Some(current)
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.segments.iter().map(ToString::to_string).collect();
        f.write_str(&parts.join("."))
    }
}
