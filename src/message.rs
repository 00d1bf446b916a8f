//! Whole messages: schema lookup, payload generation and encoding.

use crate::encoder::{EncodeError, RecordEncoder};
use crate::registry::{RegistryError, SchemaKind, SchemaRegistry};
use payload_generator::{GeneratorError, PayloadGenerator, SchemaFieldValueResolverFactory};
use serde_json::Value;

#[derive(Debug, thiserror::Error)]
pub enum MessageError {
    #[error("Was unable to load definition for schema {subject}")]
    MissingSchemaDefinition { subject: String },

    #[error("Schema {subject} is not valid JSON: {source}")]
    InvalidSchemaJson {
        subject: String,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("Failed to generate payload for schema {subject}: {source}")]
    Generator {
        subject: String,
        #[source]
        source: GeneratorError,
    },

    #[error(transparent)]
    Encode(#[from] EncodeError),
}

/// A generated message part and its encoded form.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedMessage {
    /// Registry subject the schema was read from
    pub subject: String,
    pub payload: Value,
    pub bytes: Vec<u8>,
}

/// Generates encoded message keys and bodies for topics.
pub struct MessageGenerator {
    registry: Box<dyn SchemaRegistry>,
    encoder: Box<dyn RecordEncoder>,
    resolvers: SchemaFieldValueResolverFactory,
    generator: PayloadGenerator,
}

impl MessageGenerator {
    pub fn new(
        registry: Box<dyn SchemaRegistry>,
        encoder: Box<dyn RecordEncoder>,
        resolvers: SchemaFieldValueResolverFactory,
        generator: PayloadGenerator,
    ) -> Self {
        Self {
            registry,
            encoder,
            resolvers,
            generator,
        }
    }

    pub fn generate_message_body(
        &mut self,
        topic: &str,
        predefined_payload: Option<Value>,
    ) -> Result<EncodedMessage, MessageError> {
        self.generate(topic, SchemaKind::Value, predefined_payload)
    }

    pub fn generate_message_key(
        &mut self,
        topic: &str,
        predefined_payload: Option<Value>,
    ) -> Result<EncodedMessage, MessageError> {
        self.generate(topic, SchemaKind::Key, predefined_payload)
    }

    pub fn generate(
        &mut self,
        topic: &str,
        kind: SchemaKind,
        predefined_payload: Option<Value>,
    ) -> Result<EncodedMessage, MessageError> {
        let subject = kind.subject(topic);
        let schema = self
            .registry
            .schema(topic, kind)?
            .ok_or_else(|| MessageError::MissingSchemaDefinition {
                subject: subject.clone(),
            })?;

        let decoded: Value =
            serde_json::from_str(&schema).map_err(|source| MessageError::InvalidSchemaJson {
                subject: subject.clone(),
                source,
            })?;

        let resolver = self.resolvers.create(topic, predefined_payload);
        let payload = self
            .generator
            .generate(&decoded, &resolver)
            .map_err(|source| MessageError::Generator {
                subject: subject.clone(),
                source,
            })?;

        let bytes = self.encoder.encode(&subject, &schema, &payload)?;
        tracing::debug!("Generated {} byte message for {}", bytes.len(), subject);

        Ok(EncodedMessage {
            subject,
            payload,
            bytes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::JsonRecordEncoder;
    use data_definition::{DataDefinition, DataDefinitionProvider};
    use payload_generator::Faker;
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::Arc;

    #[derive(Default)]
    struct InMemoryRegistry {
        schemas: HashMap<String, String>,
    }

    impl SchemaRegistry for InMemoryRegistry {
        fn schema(&self, topic: &str, kind: SchemaKind) -> Result<Option<String>, RegistryError> {
            Ok(self.schemas.get(&kind.subject(topic)).cloned())
        }
    }

    fn message_generator(
        schemas: &[(&str, Value)],
        provider: DataDefinitionProvider,
    ) -> MessageGenerator {
        let registry = InMemoryRegistry {
            schemas: schemas
                .iter()
                .map(|(subject, schema)| (subject.to_string(), schema.to_string()))
                .collect(),
        };
        let resolvers =
            SchemaFieldValueResolverFactory::new(Arc::new(Faker::new()), Arc::new(provider));
        MessageGenerator::new(
            Box::new(registry),
            Box::new(JsonRecordEncoder),
            resolvers,
            PayloadGenerator::with_seed(42),
        )
    }

    fn order_schema() -> Value {
        json!({
            "type": "record",
            "name": "order",
            "fields": [{ "name": "id", "type": "string" }]
        })
    }

    #[test]
    fn test_generate_body_with_definition() {
        let mut provider = DataDefinitionProvider::new("/unused");
        provider.insert(
            "orders",
            DataDefinition::from_json(&json!({ "id": { "value": "fixed-id" } })).unwrap(),
        );
        let mut generator = message_generator(&[("orders-value", order_schema())], provider);

        let message = generator.generate_message_body("orders", None).unwrap();
        assert_eq!(message.subject, "orders-value");
        assert_eq!(message.payload, json!({ "id": "fixed-id" }));
        assert_eq!(message.bytes, br#"{"id":"fixed-id"}"#);
    }

    #[test]
    fn test_generate_key_with_predefined_payload() {
        let mut generator = message_generator(
            &[("orders-key", json!({ "type": "string", "name": "key" }))],
            DataDefinitionProvider::new("/unused"),
        );

        let message = generator
            .generate_message_key("orders", Some(json!("order-7")))
            .unwrap();
        assert_eq!(message.subject, "orders-key");
        assert_eq!(message.payload, json!("order-7"));
    }

    #[test]
    fn test_missing_schema() {
        let mut generator = message_generator(
            &[("orders-value", order_schema())],
            DataDefinitionProvider::new("/unused"),
        );

        match generator.generate_message_key("orders", None) {
            Err(MessageError::MissingSchemaDefinition { subject }) => {
                assert_eq!(subject, "orders-key")
            }
            other => panic!("Expected MissingSchemaDefinition, got {other:?}"),
        }
    }

    #[test]
    fn test_unsupported_schema() {
        let mut generator = message_generator(
            &[("orders-value", json!({ "type": "bytes" }))],
            DataDefinitionProvider::new("/unused"),
        );

        assert!(matches!(
            generator.generate_message_body("orders", None),
            Err(MessageError::Generator {
                source: GeneratorError::UnsupportedAvroSchemaType(_),
                ..
            })
        ));
    }
}
