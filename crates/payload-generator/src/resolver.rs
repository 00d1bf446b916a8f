//! Value source selection for schema leaves.
//!
//! For every leaf the resolver picks the first available source:
//!
//! 1. the predefined payload (the whole payload at the root, the matching
//!    entry of the reached object below it)
//! 2. the per-topic data definition (bare name at the root, dotted path below)
//! 3. the global data definition, by bare name
//! 4. a synthetic value for the leaf type

use crate::error::{GeneratorError, Result};
use crate::path::FieldPath;
use crate::schema::SchemaType;
use crate::synthetic::synthesize;
use data_definition::{
    DataDefinition, DataDefinitionField, DataDefinitionProvider, DefinitionError,
    FakeValueProvider, FieldAddress,
};
use rand::RngCore;
use serde_json::Value;
use std::sync::Arc;

/// A leaf schema node handed to the resolver.
#[derive(Debug, Clone, Copy)]
pub struct SchemaLeaf<'a> {
    pub name: Option<&'a str>,
    pub schema: &'a SchemaType,
}

impl<'a> SchemaLeaf<'a> {
    pub fn new(name: Option<&'a str>, schema: &'a SchemaType) -> Self {
        Self { name, schema }
    }

    pub fn address(&self) -> FieldAddress {
        FieldAddress::from_name(self.name)
    }
}

/// Produces the value of a single schema leaf.
pub trait FieldValueResolver {
    fn resolve(
        &self,
        leaf: SchemaLeaf<'_>,
        path: &FieldPath,
        is_root: bool,
        rng: &mut dyn RngCore,
    ) -> Result<Value>;
}

/// Resolver bound to the override sources of one generation request.
///
/// Never mutated while resolving, so one instance can serve concurrent
/// generators.
#[derive(Clone)]
pub struct SchemaFieldValueResolver {
    faker: Arc<dyn FakeValueProvider>,
    data_definition: Option<Arc<DataDefinition>>,
    global_data_definition: Option<Arc<DataDefinition>>,
    predefined_payload: Option<Value>,
}

impl SchemaFieldValueResolver {
    pub fn new(faker: Arc<dyn FakeValueProvider>) -> Self {
        Self {
            faker,
            data_definition: None,
            global_data_definition: None,
            predefined_payload: None,
        }
    }

    pub fn with_data_definition(mut self, definition: Arc<DataDefinition>) -> Self {
        self.data_definition = Some(definition);
        self
    }

    pub fn with_global_data_definition(mut self, definition: Arc<DataDefinition>) -> Self {
        self.global_data_definition = Some(definition);
        self
    }

    /// Set the predefined payload. `Value::Null` is an explicit null payload,
    /// not an absent one.
    pub fn with_predefined_payload(mut self, payload: Value) -> Self {
        self.predefined_payload = Some(payload);
        self
    }

    fn topic_field(&self, address: &FieldAddress) -> Option<&DataDefinitionField> {
        self.data_definition
            .as_deref()
            .and_then(|definition| definition.get(address))
    }

    fn global_field(&self, address: &FieldAddress) -> Option<&DataDefinitionField> {
        self.global_data_definition
            .as_deref()
            .and_then(|definition| definition.get(address))
    }

    fn resolve_field(
        &self,
        field: &DataDefinitionField,
        address: &FieldAddress,
        rng: &mut dyn RngCore,
    ) -> Result<Value> {
        field
            .resolve(Some(self.faker.as_ref()), rng)
            .map_err(|source| GeneratorError::Resolution {
                address: address.to_string(),
                source,
            })
    }

    /// Raw value of the field in the predefined payload, looked up in the
    /// value reached by `path`: by name in an object, as the first element of
    /// an array for a positional field.
    fn predefined_value(&self, address: &FieldAddress, path: &FieldPath) -> Option<&Value> {
        let payload = self.predefined_payload.as_ref()?;
        match (address, path.probe(payload)?) {
            (FieldAddress::Named(name), Value::Object(object)) => object.get(name),
            (FieldAddress::Positional, Value::Array(items)) => items.first(),
            _ => None,
        }
    }
}

impl FieldValueResolver for SchemaFieldValueResolver {
    fn resolve(
        &self,
        leaf: SchemaLeaf<'_>,
        path: &FieldPath,
        is_root: bool,
        rng: &mut dyn RngCore,
    ) -> Result<Value> {
        let address = leaf.address();

        if is_root {
            if let Some(payload) = &self.predefined_payload {
                tracing::trace!("Using predefined payload for root '{address}'");
                return Ok(payload.clone());
            }
            if let Some(field) = self.topic_field(&address) {
                tracing::trace!("Using topic definition for root '{address}'");
                return self.resolve_field(field, &address, rng);
            }
        } else {
            if let Some(value) = self.predefined_value(&address, path) {
                tracing::trace!("Using predefined value for '{address}' at '{path}'");
                return Ok(value.clone());
            }
            let dotted = path.dotted_address(&address);
            if let Some(field) = self.topic_field(&dotted) {
                tracing::trace!("Using topic definition for '{dotted}'");
                return self.resolve_field(field, &dotted, rng);
            }
        }

        if let Some(field) = self.global_field(&address) {
            tracing::trace!("Using global definition for '{address}'");
            return self.resolve_field(field, &address, rng);
        }

        synthesize(leaf.schema, self.faker.as_ref(), rng).map_err(|source| {
            GeneratorError::Synthesis {
                address: path.dotted_address(&address).to_string(),
                source,
            }
        })
    }
}

/// Builds resolvers for topics from a loaded [`DataDefinitionProvider`].
#[derive(Clone)]
pub struct SchemaFieldValueResolverFactory {
    faker: Arc<dyn FakeValueProvider>,
    provider: Arc<DataDefinitionProvider>,
}

impl SchemaFieldValueResolverFactory {
    pub fn new(faker: Arc<dyn FakeValueProvider>, provider: Arc<DataDefinitionProvider>) -> Self {
        Self { faker, provider }
    }

    /// Resolver for `topic`. A topic or global definition that was never
    /// loaded just means there are no overrides from that source.
    pub fn create(
        &self,
        topic: &str,
        predefined_payload: Option<Value>,
    ) -> SchemaFieldValueResolver {
        let mut resolver = SchemaFieldValueResolver::new(Arc::clone(&self.faker));

        match self.provider.get_data_definition(topic) {
            Ok(definition) => resolver = resolver.with_data_definition(definition),
            Err(DefinitionError::UnexistingDataDefinition(_)) => {
                tracing::debug!("No data definition for topic '{topic}'");
            }
            Err(e) => tracing::warn!("Ignoring data definition for topic '{topic}': {e}"),
        }

        match self.provider.global() {
            Some(global) => resolver = resolver.with_global_data_definition(global),
            None => tracing::debug!(
                "No global data definition '{}'",
                self.provider.global_name()
            ),
        }

        if let Some(payload) = predefined_payload {
            resolver = resolver.with_predefined_payload(payload);
        }

        resolver
    }
}
