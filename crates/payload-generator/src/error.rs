//! Error types for payload generation.

use data_definition::{DefinitionError, FakeError};
use thiserror::Error;

/// Errors that can occur while walking a schema and resolving field values.
#[derive(Error, Debug)]
pub enum GeneratorError {
    /// The schema node is missing a type or uses a type shape the walker
    /// cannot handle
    #[error("Unsupported Avro schema type: {0}")]
    UnsupportedAvroSchemaType(String),

    /// An override entry could not be resolved
    #[error("Failed to resolve value for '{address}': {source}")]
    Resolution {
        address: String,
        #[source]
        source: DefinitionError,
    },

    /// The fake value provider failed while synthesizing a value
    #[error("Failed to synthesize value for '{address}': {source}")]
    Synthesis {
        address: String,
        #[source]
        source: FakeError,
    },
}

/// Result type alias for generator operations.
pub type Result<T> = std::result::Result<T, GeneratorError>;
