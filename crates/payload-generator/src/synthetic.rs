//! Values generated from the schema type alone.

use crate::schema::SchemaType;
use data_definition::{FakeError, FakeValueProvider};
use rand::seq::SliceRandom;
use rand::{Rng, RngCore};
use serde_json::Value;

/// Command used for strings and any type without a dedicated generator.
pub const DEFAULT_COMMAND: &str = "word";

/// Generate a value for a leaf type without consulting any overrides.
pub fn synthesize(
    schema: &SchemaType,
    faker: &dyn FakeValueProvider,
    rng: &mut dyn RngCore,
) -> Result<Value, FakeError> {
    match schema {
        SchemaType::Null => Ok(Value::Null),
        SchemaType::Boolean => Ok(Value::Bool(rng.gen_bool(0.5))),
        SchemaType::Int | SchemaType::Long => Ok(Value::from(rng.gen_range(0..=9))),
        SchemaType::Float | SchemaType::Double => Ok(generate_float(rng)),
        SchemaType::Enum { symbols } => Ok(symbols
            .choose(rng)
            .map(|symbol| Value::String(symbol.clone()))
            .unwrap_or(Value::Null)),
        _ => faker.invoke(DEFAULT_COMMAND, &[], rng),
    }
}

/// Float with two decimal places.
fn generate_float(rng: &mut dyn RngCore) -> Value {
    let value: f64 = rng.gen_range(0.0..=100.0);
    Value::from((value * 100.0).round() / 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::faker::Faker;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn generate(schema: SchemaType) -> Value {
        let mut rng = StdRng::seed_from_u64(42);
        synthesize(&schema, &Faker::new(), &mut rng).unwrap()
    }

    #[test]
    fn test_primitive_kinds() {
        assert!(generate(SchemaType::Null).is_null());
        assert!(generate(SchemaType::Boolean).is_boolean());
        assert!(generate(SchemaType::Int).is_i64());
        assert!(generate(SchemaType::Long).is_i64());
        assert!(generate(SchemaType::Float).is_f64());
        assert!(generate(SchemaType::Double).is_f64());
        assert!(generate(SchemaType::String).is_string());
        assert!(generate(SchemaType::Other("bytes".to_string())).is_string());
    }

    #[test]
    fn test_int_is_a_digit() {
        let faker = Faker::new();
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..100 {
            let value = synthesize(&SchemaType::Int, &faker, &mut rng).unwrap();
            assert!((0..=9).contains(&value.as_i64().unwrap()));
        }
    }

    #[test]
    fn test_float_precision() {
        let faker = Faker::new();
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..100 {
            let value = synthesize(&SchemaType::Double, &faker, &mut rng)
                .unwrap()
                .as_f64()
                .unwrap();
            assert!((0.0..=100.0).contains(&value));
            assert_eq!((value * 100.0).round() / 100.0, value);
        }
    }

    #[test]
    fn test_enum_single_symbol() {
        let schema = SchemaType::Enum {
            symbols: vec!["TEST".to_string()],
        };
        assert_eq!(generate(schema), Value::String("TEST".to_string()));
    }

    #[test]
    fn test_enum_is_uniform() {
        let schema = SchemaType::Enum {
            symbols: vec!["A".to_string(), "B".to_string(), "C".to_string()],
        };
        let faker = Faker::new();
        let mut rng = StdRng::seed_from_u64(42);
        let mut counts = [0usize; 3];
        for _ in 0..3000 {
            match synthesize(&schema, &faker, &mut rng).unwrap().as_str() {
                Some("A") => counts[0] += 1,
                Some("B") => counts[1] += 1,
                Some("C") => counts[2] += 1,
                other => panic!("Unexpected symbol {other:?}"),
            }
        }
        assert!(counts.iter().all(|count| (800..=1200).contains(count)));
    }
}
