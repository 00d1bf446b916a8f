//! Override table mapping field addresses to override entries.

use crate::address::FieldAddress;
use crate::command::FakeValueProvider;
use crate::error::{DefinitionError, Result};
use crate::field::DataDefinitionField;
use serde_json::Value;
use std::collections::HashMap;

/// Address → override table for one topic (or the global fallback).
///
/// Immutable once built.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataDefinition {
    fields: HashMap<FieldAddress, DataDefinitionField>,
}

impl DataDefinition {
    /// Build a definition from a decoded definition document.
    ///
    /// A document that is itself a valid field (`{"value": ..}` or
    /// `{"command": ..}`) becomes a single entry at the positional address.
    /// Otherwise every member of the object, or element of the array, must be
    /// a valid field.
    pub fn from_json(decoded: &Value) -> Result<Self> {
        if let Ok(field) = DataDefinitionField::from_json(decoded) {
            let mut fields = HashMap::with_capacity(1);
            fields.insert(FieldAddress::Positional, field);
            return Ok(Self { fields });
        }

        let fields = match decoded {
            Value::Object(entries) => entries
                .iter()
                .map(|(key, entry)| {
                    parse_entry(key, entry).map(|field| (FieldAddress::from(key.as_str()), field))
                })
                .collect::<Result<HashMap<_, _>>>()?,
            Value::Array(entries) => entries
                .iter()
                .enumerate()
                .map(|(index, entry)| {
                    let address = FieldAddress::from_index(index);
                    parse_entry(&address.to_string(), entry).map(|field| (address, field))
                })
                .collect::<Result<HashMap<_, _>>>()?,
            other => {
                return Err(DefinitionError::InvalidDataDefinitionStructure(format!(
                    "Data definition must be a JSON object or array, got {}.",
                    json_kind(other)
                )))
            }
        };

        Ok(Self { fields })
    }

    pub fn contains(&self, address: &FieldAddress) -> bool {
        self.fields.contains_key(address)
    }

    /// Presence check for a raw JSON key.
    ///
    /// Only string and integer keys can address an entry; anything else is
    /// reported as absent.
    pub fn contains_key(&self, key: &Value) -> bool {
        FieldAddress::from_json_key(key)
            .map(|address| self.contains(&address))
            .unwrap_or(false)
    }

    pub fn get(&self, address: &FieldAddress) -> Option<&DataDefinitionField> {
        self.fields.get(address)
    }

    /// Entries whose command `provider` does not know, sorted by address.
    pub fn unsupported_commands(
        &self,
        provider: &dyn FakeValueProvider,
    ) -> Vec<(&FieldAddress, &str)> {
        let mut unsupported: Vec<(&FieldAddress, &str)> = self
            .fields
            .iter()
            .filter_map(|(address, field)| Some((address, field.command_name()?)))
            .filter(|(_, command)| !provider.supports(command))
            .collect();
        unsupported.sort_by_key(|(address, _)| address.to_string());
        unsupported
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

fn parse_entry(key: &str, entry: &Value) -> Result<DataDefinitionField> {
    DataDefinitionField::from_json(entry).map_err(|err| match err {
        DefinitionError::InvalidDataDefinitionField(message) => {
            DefinitionError::InvalidDataDefinitionField(format!("{key}: {message}"))
        }
        other => other,
    })
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
