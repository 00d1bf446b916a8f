//! Registry of named fake value commands.
//!
//! Commands are plain functions looked up by name; arguments are positional
//! JSON values, as written in the `arguments` array of a data definition.

use chrono::{FixedOffset, TimeZone, Utc};
use data_definition::{FakeError, FakeValueProvider};
use fake::faker::address::en::{CityName, CountryCode, CountryName, PostCode, StreetName};
use fake::faker::company::en::CompanyName;
use fake::faker::internet::en::{FreeEmail, SafeEmail, Username};
use fake::faker::lorem::en::{Sentence, Word, Words};
use fake::faker::name::en::{FirstName, LastName, Name};
use fake::Fake;
use rand::seq::SliceRandom;
use rand::{Rng, RngCore};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use uuid::Uuid;

/// Signature shared by every registered command.
pub type CommandFn = fn(Args<'_>, &mut dyn RngCore) -> Result<Value, FakeError>;

/// Positional arguments of one command invocation.
#[derive(Debug, Clone, Copy)]
pub struct Args<'a> {
    command: &'a str,
    values: &'a [Value],
}

impl<'a> Args<'a> {
    pub fn new(command: &'a str, values: &'a [Value]) -> Self {
        Self { command, values }
    }

    pub fn get(&self, index: usize) -> Option<&'a Value> {
        self.values.get(index).filter(|value| !value.is_null())
    }

    pub fn u64_or(&self, index: usize, default: u64) -> Result<u64, FakeError> {
        match self.get(index) {
            None => Ok(default),
            Some(value) => value.as_u64().ok_or_else(|| {
                self.invalid(format!("argument {index} must be a non-negative integer"))
            }),
        }
    }

    pub fn i64_or(&self, index: usize, default: i64) -> Result<i64, FakeError> {
        match self.get(index) {
            None => Ok(default),
            Some(value) => value
                .as_i64()
                .ok_or_else(|| self.invalid(format!("argument {index} must be an integer"))),
        }
    }

    pub fn f64_or(&self, index: usize, default: f64) -> Result<f64, FakeError> {
        match self.get(index) {
            None => Ok(default),
            Some(value) => value
                .as_f64()
                .ok_or_else(|| self.invalid(format!("argument {index} must be a number"))),
        }
    }

    pub fn bool_or(&self, index: usize, default: bool) -> Result<bool, FakeError> {
        match self.get(index) {
            None => Ok(default),
            Some(value) => value
                .as_bool()
                .ok_or_else(|| self.invalid(format!("argument {index} must be a boolean"))),
        }
    }

    pub fn array(&self, index: usize) -> Result<&'a [Value], FakeError> {
        self.get(index)
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .ok_or_else(|| self.invalid(format!("argument {index} must be an array")))
    }

    pub fn invalid(&self, message: impl Into<String>) -> FakeError {
        FakeError::InvalidArguments {
            command: self.command.to_string(),
            message: message.into(),
        }
    }
}

/// Default [`FakeValueProvider`] backed by the `fake` crate.
#[derive(Clone)]
pub struct Faker {
    commands: HashMap<&'static str, CommandFn>,
}

impl fmt::Debug for Faker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Faker")
            .field("commands", &self.commands())
            .finish()
    }
}

impl Default for Faker {
    fn default() -> Self {
        Self::new()
    }
}

impl Faker {
    pub fn new() -> Self {
        let builtin: [(&'static str, CommandFn); 28] = [
            ("word", word),
            ("words", words),
            ("sentence", sentence),
            ("uuid", uuid),
            ("randomDigit", random_digit),
            ("randomDigitNotNull", random_digit_not_null),
            ("randomNumber", random_number),
            ("numberBetween", number_between),
            ("randomFloat", random_float),
            ("boolean", boolean),
            ("randomElement", random_element),
            ("shuffle", shuffle),
            ("name", name),
            ("firstName", first_name),
            ("lastName", last_name),
            ("userName", user_name),
            ("email", email),
            ("safeEmail", safe_email),
            ("city", city),
            ("streetName", street_name),
            ("postcode", postcode),
            ("country", country),
            ("countryCode", country_code),
            ("companyName", company_name),
            ("iso8601", iso8601),
            ("unixTime", unix_time),
            ("latitude", latitude),
            ("longitude", longitude),
        ];

        Self {
            commands: builtin.into_iter().collect(),
        }
    }

    /// Add or replace a command.
    pub fn register(&mut self, command: &'static str, function: CommandFn) {
        self.commands.insert(command, function);
    }

    /// Registered command names, sorted.
    pub fn commands(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self.commands.keys().copied().collect();
        names.sort_unstable();
        names
    }
}

impl FakeValueProvider for Faker {
    fn invoke(
        &self,
        command: &str,
        arguments: &[Value],
        rng: &mut dyn RngCore,
    ) -> Result<Value, FakeError> {
        let function = self
            .commands
            .get(command)
            .ok_or_else(|| FakeError::UnknownCommand(command.to_string()))?;
        function(Args::new(command, arguments), rng)
    }

    fn supports(&self, command: &str) -> bool {
        self.commands.contains_key(command)
    }
}

fn word(_: Args<'_>, mut rng: &mut dyn RngCore) -> Result<Value, FakeError> {
    Ok(Value::String(Word().fake_with_rng(&mut rng)))
}

/// Upper bound for the word count of `words` and `sentence`.
const MAX_WORDS: u64 = 1024;

fn word_count(args: &Args<'_>, default: u64) -> Result<usize, FakeError> {
    let count = args.u64_or(0, default)?;
    if count > MAX_WORDS {
        return Err(args.invalid(format!("word count must not exceed {MAX_WORDS}")));
    }
    Ok(count as usize)
}

fn words(args: Args<'_>, mut rng: &mut dyn RngCore) -> Result<Value, FakeError> {
    let count = word_count(&args, 3)?;
    let as_text = args.bool_or(1, false)?;
    let words: Vec<String> = Words(count..count + 1).fake_with_rng(&mut rng);
    if as_text {
        Ok(Value::String(words.join(" ")))
    } else {
        Ok(Value::from(words))
    }
}

fn sentence(args: Args<'_>, mut rng: &mut dyn RngCore) -> Result<Value, FakeError> {
    let count = word_count(&args, 6)?.max(1);
    Ok(Value::String(
        Sentence(count..count + 1).fake_with_rng(&mut rng),
    ))
}

/// Random UUID v4 drawn from the generator's own RNG.
fn uuid(_: Args<'_>, rng: &mut dyn RngCore) -> Result<Value, FakeError> {
    let mut bytes = [0u8; 16];
    rng.fill_bytes(&mut bytes);

    // Version 4, RFC 4122 variant
    bytes[6] = (bytes[6] & 0x0f) | 0x40;
    bytes[8] = (bytes[8] & 0x3f) | 0x80;

    Ok(Value::String(Uuid::from_bytes(bytes).to_string()))
}

fn random_digit(_: Args<'_>, rng: &mut dyn RngCore) -> Result<Value, FakeError> {
    Ok(Value::from(rng.gen_range(0..=9)))
}

fn random_digit_not_null(_: Args<'_>, rng: &mut dyn RngCore) -> Result<Value, FakeError> {
    Ok(Value::from(rng.gen_range(1..=9)))
}

/// Number with up to `digits` digits; exactly that many when `strict` is set.
fn random_number(args: Args<'_>, rng: &mut dyn RngCore) -> Result<Value, FakeError> {
    let digits = match args.get(0) {
        Some(_) => args.u64_or(0, 0)? as u32,
        None => rng.gen_range(1..=9),
    };
    if digits == 0 || digits > 18 {
        return Err(args.invalid("digit count must be between 1 and 18"));
    }
    let strict = args.bool_or(1, false)?;
    let max = 10_i64.pow(digits) - 1;
    let min = if strict { 10_i64.pow(digits - 1) } else { 0 };
    Ok(Value::from(rng.gen_range(min..=max)))
}

fn number_between(args: Args<'_>, rng: &mut dyn RngCore) -> Result<Value, FakeError> {
    let min = args.i64_or(0, 0)?;
    let max = args.i64_or(1, i64::from(i32::MAX))?;
    if min > max {
        return Err(args.invalid(format!("minimum {min} is greater than maximum {max}")));
    }
    Ok(Value::from(rng.gen_range(min..=max)))
}

/// Float rounded to `decimals` places within `[min, max]`.
fn random_float(args: Args<'_>, rng: &mut dyn RngCore) -> Result<Value, FakeError> {
    let decimals = args.u64_or(0, 2)?.min(15) as i32;
    let min = args.f64_or(1, 0.0)?;
    let max = args.f64_or(2, 1000.0)?;
    if min > max {
        return Err(args.invalid(format!("minimum {min} is greater than maximum {max}")));
    }
    if !(max - min).is_finite() {
        return Err(args.invalid(format!("range {min}..{max} is too wide")));
    }
    let scale = 10_f64.powi(decimals);
    let value = (rng.gen_range(min..=max) * scale).round() / scale;
    Ok(Value::from(value))
}

/// `true` with the given percentage chance (50 by default).
fn boolean(args: Args<'_>, rng: &mut dyn RngCore) -> Result<Value, FakeError> {
    let chance = args.u64_or(0, 50)?;
    if chance > 100 {
        return Err(args.invalid("chance must be between 0 and 100"));
    }
    Ok(Value::Bool(rng.gen_bool(chance as f64 / 100.0)))
}

fn random_element(args: Args<'_>, rng: &mut dyn RngCore) -> Result<Value, FakeError> {
    let elements = args.array(0)?;
    elements
        .choose(rng)
        .cloned()
        .ok_or_else(|| args.invalid("element list must not be empty"))
}

fn shuffle(args: Args<'_>, rng: &mut dyn RngCore) -> Result<Value, FakeError> {
    match args.get(0) {
        Some(Value::String(text)) => {
            let mut chars: Vec<char> = text.chars().collect();
            chars.shuffle(rng);
            Ok(Value::String(chars.into_iter().collect()))
        }
        _ => {
            let mut elements = args.array(0)?.to_vec();
            elements.shuffle(rng);
            Ok(Value::Array(elements))
        }
    }
}

fn name(_: Args<'_>, mut rng: &mut dyn RngCore) -> Result<Value, FakeError> {
    Ok(Value::String(Name().fake_with_rng(&mut rng)))
}

fn first_name(_: Args<'_>, mut rng: &mut dyn RngCore) -> Result<Value, FakeError> {
    Ok(Value::String(FirstName().fake_with_rng(&mut rng)))
}

fn last_name(_: Args<'_>, mut rng: &mut dyn RngCore) -> Result<Value, FakeError> {
    Ok(Value::String(LastName().fake_with_rng(&mut rng)))
}

fn user_name(_: Args<'_>, mut rng: &mut dyn RngCore) -> Result<Value, FakeError> {
    Ok(Value::String(Username().fake_with_rng(&mut rng)))
}

fn email(_: Args<'_>, mut rng: &mut dyn RngCore) -> Result<Value, FakeError> {
    Ok(Value::String(FreeEmail().fake_with_rng(&mut rng)))
}

fn safe_email(_: Args<'_>, mut rng: &mut dyn RngCore) -> Result<Value, FakeError> {
    Ok(Value::String(SafeEmail().fake_with_rng(&mut rng)))
}

fn city(_: Args<'_>, mut rng: &mut dyn RngCore) -> Result<Value, FakeError> {
    Ok(Value::String(CityName().fake_with_rng(&mut rng)))
}

fn street_name(_: Args<'_>, mut rng: &mut dyn RngCore) -> Result<Value, FakeError> {
    Ok(Value::String(StreetName().fake_with_rng(&mut rng)))
}

fn postcode(_: Args<'_>, mut rng: &mut dyn RngCore) -> Result<Value, FakeError> {
    Ok(Value::String(PostCode().fake_with_rng(&mut rng)))
}

fn country(_: Args<'_>, mut rng: &mut dyn RngCore) -> Result<Value, FakeError> {
    Ok(Value::String(CountryName().fake_with_rng(&mut rng)))
}

fn country_code(_: Args<'_>, mut rng: &mut dyn RngCore) -> Result<Value, FakeError> {
    Ok(Value::String(CountryCode().fake_with_rng(&mut rng)))
}

fn company_name(_: Args<'_>, mut rng: &mut dyn RngCore) -> Result<Value, FakeError> {
    Ok(Value::String(CompanyName().fake_with_rng(&mut rng)))
}

/// Timestamp between the epoch and now, `[max]` as unix seconds.
fn unix_seconds(args: &Args<'_>, rng: &mut dyn RngCore) -> Result<i64, FakeError> {
    let max = args.i64_or(0, Utc::now().timestamp())?;
    if max < 0 {
        return Err(args.invalid("maximum timestamp must not be negative"));
    }
    Ok(rng.gen_range(0..=max))
}

fn iso8601(args: Args<'_>, rng: &mut dyn RngCore) -> Result<Value, FakeError> {
    let seconds = unix_seconds(&args, rng)?;
    let offset_hours = rng.gen_range(-11..=12);
    let offset = FixedOffset::east_opt(offset_hours * 3600)
        .ok_or_else(|| args.invalid(format!("invalid timezone offset {offset_hours}")))?;
    let timestamp = offset
        .timestamp_opt(seconds, 0)
        .single()
        .ok_or_else(|| args.invalid(format!("timestamp {seconds} is out of range")))?;
    Ok(Value::String(
        timestamp.format("%Y-%m-%dT%H:%M:%S%z").to_string(),
    ))
}

fn unix_time(args: Args<'_>, rng: &mut dyn RngCore) -> Result<Value, FakeError> {
    Ok(Value::from(unix_seconds(&args, rng)?))
}

fn coordinate(rng: &mut dyn RngCore, limit: f64) -> Value {
    let value = rng.gen_range(-limit..=limit);
    Value::from((value * 1_000_000.0).round() / 1_000_000.0)
}

fn latitude(_: Args<'_>, rng: &mut dyn RngCore) -> Result<Value, FakeError> {
    Ok(coordinate(rng, 90.0))
}

fn longitude(_: Args<'_>, rng: &mut dyn RngCore) -> Result<Value, FakeError> {
    Ok(coordinate(rng, 180.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use serde_json::json;

    fn invoke(command: &str, arguments: Value) -> Result<Value, FakeError> {
        let mut rng = StdRng::seed_from_u64(42);
        let arguments = arguments.as_array().cloned().unwrap_or_default();
        Faker::new().invoke(command, &arguments, &mut rng)
    }

    #[test]
    fn test_unknown_command() {
        let result = invoke("definitelyNotACommand", json!([]));
        assert_eq!(
            result,
            Err(FakeError::UnknownCommand("definitelyNotACommand".to_string()))
        );
        assert!(!Faker::new().supports("definitelyNotACommand"));
        assert!(Faker::new().supports("word"));
    }

    #[test]
    fn test_every_command_runs_without_arguments() {
        let faker = Faker::new();
        let mut rng = StdRng::seed_from_u64(7);
        for command in faker.commands() {
            let result = faker.invoke(command, &[], &mut rng);
            match command {
                "randomElement" | "shuffle" => assert!(result.is_err(), "{command}"),
                _ => assert!(result.is_ok(), "{command} failed: {result:?}"),
            }
        }
    }

    #[test]
    fn test_word() {
        let value = invoke("word", json!([])).unwrap();
        assert!(!value.as_str().unwrap().is_empty());
    }

    #[test]
    fn test_words() {
        assert_eq!(invoke("words", json!([4])).unwrap().as_array().unwrap().len(), 4);
        let text = invoke("words", json!([2, true])).unwrap();
        assert_eq!(text.as_str().unwrap().split(' ').count(), 2);
    }

    #[test]
    fn test_words_count_is_capped() {
        assert!(matches!(
            invoke("words", json!([u64::MAX])),
            Err(FakeError::InvalidArguments { .. })
        ));
        assert!(matches!(
            invoke("words", json!([MAX_WORDS + 1, true])),
            Err(FakeError::InvalidArguments { .. })
        ));
        let text = invoke("words", json!([MAX_WORDS, true])).unwrap();
        assert_eq!(text.as_str().unwrap().split(' ').count(), MAX_WORDS as usize);
    }

    #[test]
    fn test_sentence_count_is_capped() {
        assert!(invoke("sentence", json!([4])).unwrap().is_string());
        assert!(matches!(
            invoke("sentence", json!([u64::MAX])),
            Err(FakeError::InvalidArguments { .. })
        ));
    }

    #[test]
    fn test_uuid() {
        let value = invoke("uuid", json!([])).unwrap();
        let parsed = Uuid::parse_str(value.as_str().unwrap()).unwrap();
        assert_eq!(parsed.get_version_num(), 4);
    }

    #[test]
    fn test_uuid_deterministic() {
        assert_eq!(invoke("uuid", json!([])), invoke("uuid", json!([])));
    }

    #[test]
    fn test_number_between() {
        let faker = Faker::new();
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..100 {
            let value = faker
                .invoke("numberBetween", &[json!(10), json!(20)], &mut rng)
                .unwrap();
            assert!((10..=20).contains(&value.as_i64().unwrap()));
        }

        assert!(matches!(
            invoke("numberBetween", json!([5, 1])),
            Err(FakeError::InvalidArguments { .. })
        ));
        assert!(matches!(
            invoke("numberBetween", json!(["one", 5])),
            Err(FakeError::InvalidArguments { .. })
        ));
    }

    #[test]
    fn test_random_number_strict() {
        let faker = Faker::new();
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..50 {
            let value = faker
                .invoke("randomNumber", &[json!(3), json!(true)], &mut rng)
                .unwrap();
            assert!((100..=999).contains(&value.as_i64().unwrap()));
        }
    }

    #[test]
    fn test_random_float() {
        let value = invoke("randomFloat", json!([1, 0, 10])).unwrap();
        let value = value.as_f64().unwrap();
        assert!((0.0..=10.0).contains(&value));
        assert_eq!((value * 10.0).round() / 10.0, value);
    }

    #[test]
    fn test_random_float_rejects_unbounded_range() {
        assert!(matches!(
            invoke("randomFloat", json!([2, -1e308, 1e308])),
            Err(FakeError::InvalidArguments { .. })
        ));
        assert!(matches!(
            invoke("randomFloat", json!([2, 5, 1])),
            Err(FakeError::InvalidArguments { .. })
        ));
    }

    #[test]
    fn test_random_element() {
        let value = invoke("randomElement", json!([["a", "b", "c"]])).unwrap();
        assert!(["a", "b", "c"].contains(&value.as_str().unwrap()));
        assert!(invoke("randomElement", json!([[]])).is_err());
    }

    #[test]
    fn test_shuffle() {
        let value = invoke("shuffle", json!([[1, 2, 3]])).unwrap();
        let mut sorted: Vec<i64> = value
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_i64().unwrap())
            .collect();
        sorted.sort_unstable();
        assert_eq!(sorted, vec![1, 2, 3]);

        let text = invoke("shuffle", json!(["abc"])).unwrap();
        assert_eq!(text.as_str().unwrap().len(), 3);
    }

    #[test]
    fn test_iso8601() {
        let value = invoke("iso8601", json!([])).unwrap();
        let parsed =
            chrono::DateTime::parse_from_str(value.as_str().unwrap(), "%Y-%m-%dT%H:%M:%S%z");
        assert!(parsed.is_ok(), "{value}");
    }

    #[test]
    fn test_boolean_chance() {
        assert_eq!(invoke("boolean", json!([100])).unwrap(), json!(true));
        assert_eq!(invoke("boolean", json!([0])).unwrap(), json!(false));
        assert!(invoke("boolean", json!([150])).is_err());
    }

    #[test]
    fn test_register_custom_command() {
        fn constant(_: Args<'_>, _: &mut dyn RngCore) -> Result<Value, FakeError> {
            Ok(json!("constant"))
        }

        let mut faker = Faker::new();
        faker.register("constant", constant);
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(
            faker.invoke("constant", &[], &mut rng).unwrap(),
            json!("constant")
        );
    }
}
