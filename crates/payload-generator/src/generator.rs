//! Recursive schema walker.

use crate::error::Result;
use crate::path::{FieldPath, PathSegment};
use crate::resolver::{FieldValueResolver, SchemaLeaf};
use crate::schema::{SchemaNode, SchemaType};
use data_definition::FieldAddress;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::{Map, Value};

/// Builds a payload for an Avro schema, asking a [`FieldValueResolver`] for
/// every leaf value.
///
/// Arrays get exactly one element and maps exactly one entry. For unions every
/// alternative is generated and one of them is picked uniformly at random.
pub struct PayloadGenerator {
    rng: StdRng,
}

impl Default for PayloadGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl PayloadGenerator {
    /// Generator seeded from system entropy.
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Generator with a fixed seed, for reproducible output.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Generate a payload for a JSON-decoded schema.
    pub fn generate(
        &mut self,
        schema: &Value,
        resolver: &dyn FieldValueResolver,
    ) -> Result<Value> {
        let node = SchemaNode::parse_root(schema)?;
        self.generate_node(&node, resolver)
    }

    /// Generate a payload for an already parsed schema.
    pub fn generate_node(
        &mut self,
        node: &SchemaNode,
        resolver: &dyn FieldValueResolver,
    ) -> Result<Value> {
        self.walk(
            node.name.as_deref(),
            &node.schema,
            &FieldPath::root(),
            true,
            resolver,
        )
    }

    fn walk(
        &mut self,
        name: Option<&str>,
        schema: &SchemaType,
        path: &FieldPath,
        is_root: bool,
        resolver: &dyn FieldValueResolver,
    ) -> Result<Value> {
        if schema.is_leaf() {
            let leaf = SchemaLeaf::new(name, schema);
            return resolver.resolve(leaf, path, is_root, &mut self.rng);
        }

        match schema {
            // Unions and inlined types do not occupy an address level
            SchemaType::Union(alternatives) => {
                self.walk_union(name, alternatives, path, is_root, resolver)
            }
            SchemaType::Nested(inner) => self.walk(name, &inner.schema, path, is_root, resolver),
            composite => {
                let path = if is_root {
                    path.clone()
                } else {
                    path.child(PathSegment::from_name(name))
                };
                self.walk_composite(composite, &path, resolver)
            }
        }
    }

    fn walk_union(
        &mut self,
        name: Option<&str>,
        alternatives: &[SchemaType],
        path: &FieldPath,
        is_root: bool,
        resolver: &dyn FieldValueResolver,
    ) -> Result<Value> {
        let mut candidates = alternatives
            .iter()
            .map(|alternative| self.walk(name, alternative, path, is_root, resolver))
            .collect::<Result<Vec<_>>>()?;

        let index = self.rng.gen_range(0..candidates.len());
        tracing::debug!(
            "Picked union alternative {} of {} for '{}'",
            index,
            candidates.len(),
            path.dotted_address(&FieldAddress::from_name(name))
        );
        Ok(candidates.swap_remove(index))
    }

    fn walk_composite(
        &mut self,
        schema: &SchemaType,
        path: &FieldPath,
        resolver: &dyn FieldValueResolver,
    ) -> Result<Value> {
        match schema {
            SchemaType::Record { fields } => {
                let mut record = Map::with_capacity(fields.len());
                for field in fields {
                    let name = Some(field.name.as_str());
                    let value = self.walk(name, &field.schema, path, false, resolver)?;
                    record.insert(field.name.clone(), value);
                }
                Ok(Value::Object(record))
            }
            SchemaType::Array { items } => {
                let item = self.walk(items.name.as_deref(), &items.schema, path, false, resolver)?;
                Ok(Value::Array(vec![item]))
            }
            SchemaType::Map { values } => {
                let key = resolver.resolve(
                    SchemaLeaf::new(None, &SchemaType::String),
                    &path.child(PathSegment::MapKey),
                    false,
                    &mut self.rng,
                )?;
                let key = match key {
                    Value::String(key) => key,
                    other => other.to_string(),
                };
                let value =
                    self.walk(values.name.as_deref(), &values.schema, path, false, resolver)?;

                let mut map = Map::with_capacity(1);
                map.insert(key, value);
                Ok(Value::Object(map))
            }
            // walk() dispatches leaves, unions and inlined types itself
            other => self.walk(None, other, path, false, resolver),
        }
    }
}
