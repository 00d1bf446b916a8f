//! Error types for the data-definition crate.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by a [`FakeValueProvider`](crate::FakeValueProvider) command.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FakeError {
    #[error("Unknown fake value command: {0}")]
    UnknownCommand(String),

    #[error("Invalid arguments for command '{command}': {message}")]
    InvalidArguments { command: String, message: String },
}

/// Why a data definition file could not be turned into JSON.
#[derive(Error, Debug)]
pub enum IncorrectJsonReason {
    #[error("file is empty")]
    Empty,

    #[error("file is not readable: {0}")]
    Unreadable(#[source] std::io::Error),

    #[error("malformed JSON: {0}")]
    Malformed(#[source] serde_json::Error),
}

/// Errors that can occur while building, loading or resolving data definitions.
#[derive(Error, Debug)]
pub enum DefinitionError {
    /// A single field entry violates the value/command contract
    #[error("Invalid data definition field: {0}")]
    InvalidDataDefinitionField(String),

    /// The decoded definition document is neither an object nor an array
    #[error("Invalid data definition structure: {0}")]
    InvalidDataDefinitionStructure(String),

    /// A command field was resolved without a fake value provider
    #[error("Command '{0}' requires a fake value provider, but none was supplied")]
    MissingCommandExecutor(String),

    /// A named definition was requested but never loaded
    #[error("Data definition {0} does not exist")]
    UnexistingDataDefinition(String),

    /// A definition file could not be read or decoded
    #[error("Incorrect data definition JSON in {}: {reason}", path.display())]
    IncorrectDataDefinitionJson {
        path: PathBuf,
        reason: IncorrectJsonReason,
    },

    /// The definitions directory itself could not be listed
    #[error("Failed to read data definition directory {}: {source}", path.display())]
    Directory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The fake value provider rejected a command
    #[error(transparent)]
    Command(#[from] FakeError),
}

/// Result type alias for data-definition operations.
pub type Result<T> = std::result::Result<T, DefinitionError>;
