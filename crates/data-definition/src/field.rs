//! A single override instruction and its validation.

use crate::command::FakeValueProvider;
use crate::error::{DefinitionError, Result};
use rand::RngCore;
use serde_json::{Map, Value};

pub const VALUE_FIELD: &str = "value";
pub const COMMAND_FIELD: &str = "command";
pub const ARGUMENTS_FIELD: &str = "arguments";

const SUPPORTED_FIELDS: [&str; 3] = [VALUE_FIELD, COMMAND_FIELD, ARGUMENTS_FIELD];

/// One override entry of a data definition.
#[derive(Debug, Clone, PartialEq)]
pub enum DataDefinitionField {
    /// A literal, used as-is (may be `null`)
    Value(Value),
    /// A fake value command with positional arguments
    Command {
        command: String,
        arguments: Vec<Value>,
    },
}

impl DataDefinitionField {
    /// Build a literal field.
    pub fn value(value: impl Into<Value>) -> Self {
        DataDefinitionField::Value(value.into())
    }

    /// Build a command field without arguments.
    pub fn command(command: impl Into<String>) -> Self {
        DataDefinitionField::Command {
            command: command.into(),
            arguments: Vec::new(),
        }
    }

    /// Build a command field with arguments.
    pub fn command_with_arguments(command: impl Into<String>, arguments: Vec<Value>) -> Self {
        DataDefinitionField::Command {
            command: command.into(),
            arguments,
        }
    }

    /// Validate a decoded JSON entry and build the field from it.
    pub fn from_json(decoded: &Value) -> Result<Self> {
        let object = decoded.as_object().ok_or_else(|| {
            DefinitionError::InvalidDataDefinitionField(
                "Data definition field must be a JSON object.".to_string(),
            )
        })?;

        validate(object)?;

        if let Some(value) = object.get(VALUE_FIELD) {
            return Ok(DataDefinitionField::Value(value.clone()));
        }

        // validate() guarantees a non-empty string command here
        let command = object
            .get(COMMAND_FIELD)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        let arguments = object
            .get(ARGUMENTS_FIELD)
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();

        Ok(DataDefinitionField::Command { command, arguments })
    }

    /// Produce the value for this field.
    ///
    /// Literals are returned directly. Commands are dispatched to `provider`
    /// and fail with [`DefinitionError::MissingCommandExecutor`] when there is
    /// none.
    pub fn resolve(
        &self,
        provider: Option<&dyn FakeValueProvider>,
        rng: &mut dyn RngCore,
    ) -> Result<Value> {
        match self {
            DataDefinitionField::Value(value) => Ok(value.clone()),
            DataDefinitionField::Command { command, arguments } => {
                let provider = provider
                    .ok_or_else(|| DefinitionError::MissingCommandExecutor(command.clone()))?;
                Ok(provider.invoke(command, arguments, rng)?)
            }
        }
    }

    /// Name of the command, `None` for a literal.
    pub fn command_name(&self) -> Option<&str> {
        match self {
            DataDefinitionField::Command { command, .. } => Some(command),
            DataDefinitionField::Value(_) => None,
        }
    }
}

/// Check a decoded entry against the value/command contract.
pub fn validate(object: &Map<String, Value>) -> Result<()> {
    if object
        .keys()
        .any(|key| !SUPPORTED_FIELDS.contains(&key.as_str()))
    {
        return Err(DefinitionError::InvalidDataDefinitionField(format!(
            "Data definition field can contain following fields: {}.",
            SUPPORTED_FIELDS.join(", ")
        )));
    }

    if object.contains_key(VALUE_FIELD) {
        if object.len() != 1 {
            return Err(DefinitionError::InvalidDataDefinitionField(format!(
                "Data definition field of type \"{VALUE_FIELD}\" can not contain other fields."
            )));
        }
        return Ok(());
    }

    if let Some(command) = object.get(COMMAND_FIELD) {
        match command.as_str() {
            Some(command) if !command.trim().is_empty() => {}
            _ => {
                return Err(DefinitionError::InvalidDataDefinitionField(format!(
                    "Data definition field \"{COMMAND_FIELD}\" must be a non-empty string."
                )))
            }
        }

        if let Some(arguments) = object.get(ARGUMENTS_FIELD) {
            if !arguments.is_array() {
                return Err(DefinitionError::InvalidDataDefinitionField(format!(
                    "Data definition field \"{ARGUMENTS_FIELD}\" must be an array."
                )));
            }
        }

        return Ok(());
    }

    Err(DefinitionError::InvalidDataDefinitionField(format!(
        "Data definition field must contain either \"{VALUE_FIELD}\" or \"{COMMAND_FIELD}\" field."
    )))
}
