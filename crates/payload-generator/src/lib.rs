//! Schema-driven synthetic payloads.
//!
//! [`PayloadGenerator`] walks a JSON-decoded Avro schema and builds a value
//! for it. Leaf values come from a [`FieldValueResolver`]; the default
//! [`SchemaFieldValueResolver`] takes them from a predefined payload, a
//! per-topic [`DataDefinition`](data_definition::DataDefinition), the global
//! definition or, failing all of those, from the [`Faker`].
//!
//! # Example
//!
//! ```rust
//! use payload_generator::{Faker, PayloadGenerator, SchemaFieldValueResolver};
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! let schema = json!({
//!     "type": "record",
//!     "name": "order",
//!     "fields": [{ "name": "id", "type": "string" }]
//! });
//!
//! let resolver = SchemaFieldValueResolver::new(Arc::new(Faker::new()))
//!     .with_predefined_payload(json!({ "id": "order-1" }));
//!
//! let payload = PayloadGenerator::with_seed(7)
//!     .generate(&schema, &resolver)
//!     .unwrap();
//! assert_eq!(payload, json!({ "id": "order-1" }));
//! ```

pub mod error;
pub mod faker;
pub mod generator;
pub mod path;
pub mod resolver;
pub mod schema;
pub mod synthetic;

pub use error::{GeneratorError, Result};
pub use faker::Faker;
pub use generator::PayloadGenerator;
pub use path::{FieldPath, PathSegment};
pub use resolver::{
    FieldValueResolver, SchemaFieldValueResolver, SchemaFieldValueResolverFactory, SchemaLeaf,
};
pub use schema::{RecordField, SchemaNode, SchemaType};
