//! Addresses used to look up override entries.

use serde_json::Value;
use std::fmt;

/// Key of a [`DataDefinition`](crate::DataDefinition) entry.
///
/// Schema nodes without a `name` (array items, map values, anonymous union
/// branches, an unnamed root) are addressed positionally. `Positional` is a
/// separate variant so it can never collide with a field literally named `"0"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldAddress {
    /// A field name or a dotted path such as `address.street`
    Named(String),
    /// The anonymous address
    Positional,
}

impl FieldAddress {
    /// Address for an optional schema field name.
    pub fn from_name(name: Option<&str>) -> Self {
        match name {
            Some(name) => FieldAddress::Named(name.to_string()),
            None => FieldAddress::Positional,
        }
    }

    /// Address for a JSON object/array key.
    ///
    /// Only strings and integers are addresses. The integer `0` is the
    /// positional address, other integers become their decimal name.
    pub fn from_json_key(key: &Value) -> Option<Self> {
        match key {
            Value::String(s) => Some(FieldAddress::Named(s.clone())),
            Value::Number(n) => match n.as_u64() {
                Some(0) => Some(FieldAddress::Positional),
                Some(i) => Some(FieldAddress::Named(i.to_string())),
                None => n.as_i64().map(|i| FieldAddress::Named(i.to_string())),
            },
            _ => None,
        }
    }

    /// Address of the element at `index` in a definition array.
    pub fn from_index(index: usize) -> Self {
        if index == 0 {
            FieldAddress::Positional
        } else {
            FieldAddress::Named(index.to_string())
        }
    }
}

impl fmt::Display for FieldAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldAddress::Named(name) => f.write_str(name),
            FieldAddress::Positional => f.write_str("0"),
        }
    }
}

impl From<&str> for FieldAddress {
    fn from(name: &str) -> Self {
        FieldAddress::Named(name.to_string())
    }
}

impl From<String> for FieldAddress {
    fn from(name: String) -> Self {
        FieldAddress::Named(name)
    }
}
