//! Turning generated payloads into message bytes.

use apache_avro::types::Value as AvroValue;
use apache_avro::{to_avro_datum, Schema};
use serde_json::Value;

#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    #[error("Invalid Avro schema '{schema_name}': {source}")]
    Schema {
        schema_name: String,
        #[source]
        source: apache_avro::Error,
    },

    #[error("Payload does not match Avro schema '{schema_name}': {source}")]
    Resolve {
        schema_name: String,
        #[source]
        source: apache_avro::Error,
    },

    #[error("Failed to encode payload for '{schema_name}': {source}")]
    Avro {
        schema_name: String,
        #[source]
        source: apache_avro::Error,
    },

    #[error("Failed to serialize payload as JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Encodes a generated payload together with the schema it was generated
/// from.
pub trait RecordEncoder {
    fn encode(
        &self,
        schema_name: &str,
        schema: &str,
        payload: &Value,
    ) -> Result<Vec<u8>, EncodeError>;
}

/// Raw Avro binary datum, without container header or registry framing.
#[derive(Debug, Clone, Copy, Default)]
pub struct AvroDatumEncoder;

impl RecordEncoder for AvroDatumEncoder {
    fn encode(
        &self,
        schema_name: &str,
        schema: &str,
        payload: &Value,
    ) -> Result<Vec<u8>, EncodeError> {
        let parsed = Schema::parse_str(schema).map_err(|source| EncodeError::Schema {
            schema_name: schema_name.to_string(),
            source,
        })?;

        let value = AvroValue::from(payload.clone())
            .resolve(&parsed)
            .map_err(|source| EncodeError::Resolve {
                schema_name: schema_name.to_string(),
                source,
            })?;

        to_avro_datum(&parsed, value).map_err(|source| EncodeError::Avro {
            schema_name: schema_name.to_string(),
            source,
        })
    }
}

/// Plain JSON, for inspecting payloads.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonRecordEncoder;

impl RecordEncoder for JsonRecordEncoder {
    fn encode(&self, _: &str, _: &str, payload: &Value) -> Result<Vec<u8>, EncodeError> {
        Ok(serde_json::to_vec(payload)?)
    }
}
