//! Field override definitions for avro-fixture.
//!
//! A data definition tells the payload generator which value to use for a
//! field instead of a synthetic one. Each entry is either a literal or a
//! named fake value command:
//!
//! ```json
//! {
//!   "id": { "value": "fixed-id" },
//!   "address.street": { "command": "streetName" },
//!   "rating": { "command": "numberBetween", "arguments": [1, 5] }
//! }
//! ```
//!
//! # Modules
//!
//! - [`field`] - [`DataDefinitionField`] and its validation
//! - [`definition`] - [`DataDefinition`], the address → field table
//! - [`provider`] - [`DataDefinitionProvider`], a directory of definition files
//! - [`command`] - [`FakeValueProvider`], the capability used to run commands
//! - [`error`] - Error types
//!
//! # Example
//!
//! ```rust
//! use data_definition::{DataDefinition, DataDefinitionField, FieldAddress};
//! use serde_json::json;
//!
//! let definition = DataDefinition::from_json(&json!({
//!     "id": { "value": "fixed-id" }
//! })).unwrap();
//!
//! assert_eq!(
//!     definition.get(&FieldAddress::from("id")),
//!     Some(&DataDefinitionField::value("fixed-id"))
//! );
//! ```

pub mod address;
pub mod command;
pub mod definition;
pub mod error;
pub mod field;
pub mod provider;

// Re-exports for convenience
pub use address::FieldAddress;
pub use command::FakeValueProvider;
pub use definition::DataDefinition;
pub use error::{DefinitionError, FakeError, IncorrectJsonReason, Result};
pub use field::DataDefinitionField;
pub use provider::{DataDefinitionProvider, GLOBAL_DATA_DEFINITION_NAME};
