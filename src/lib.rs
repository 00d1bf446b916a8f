//! avro-fixture
//!
//! Generates synthetic Avro messages for topics: the schema is read from a
//! [`SchemaRegistry`], a payload is generated for it with overrides taken
//! from per-topic and global data definitions, and the result is encoded by a
//! [`RecordEncoder`].
//!
//! # Crates
//!
//! - `data_definition` - override definitions and the definition directory
//! - `payload_generator` - schema walker, value resolver and fake value catalog
//!
//! # CLI Usage
//!
//! ```bash
//! # Three JSON payloads for the value schema of "orders"
//! avro-fixture generate --topic orders \
//!   --schemas-dir fixtures/schemas \
//!   --definitions-dir fixtures/definitions \
//!   --count 3
//!
//! # Avro-encoded key with a predefined payload
//! avro-fixture generate --topic orders --key --format avro-base64 --payload '"order-1"'
//!
//! # Validate every definition file
//! avro-fixture check-definitions --definitions-dir fixtures/definitions
//! ```

pub mod config;
pub mod encoder;
pub mod message;
pub mod registry;

pub use config::{ConfigError, GeneratorConfig};
pub use encoder::{AvroDatumEncoder, EncodeError, JsonRecordEncoder, RecordEncoder};
pub use message::{EncodedMessage, MessageError, MessageGenerator};
pub use registry::{FileSchemaRegistry, RegistryError, SchemaKind, SchemaRegistry};

pub use data_definition;
pub use payload_generator;
