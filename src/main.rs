//! Command-line interface for avro-fixture
//!
//! # Usage Examples
//!
//! ```bash
//! # One JSON payload for the value schema of "orders"
//! avro-fixture generate --topic orders \
//!   --schemas-dir fixtures/schemas \
//!   --definitions-dir fixtures/definitions
//!
//! # Reproducible Avro-encoded keys
//! avro-fixture generate --topic orders --key --count 10 --seed 42 --format avro-base64
//!
//! # Load every definition file and report its entries
//! avro-fixture check-definitions --definitions-dir fixtures/definitions
//! ```
//!
//! Settings can also be read from a YAML file passed with `--config`; flags
//! given on the command line win.

use anyhow::Context;
use avro_fixture::{
    AvroDatumEncoder, FileSchemaRegistry, GeneratorConfig, JsonRecordEncoder, MessageGenerator,
    RecordEncoder, SchemaKind,
};
use base64::Engine;
use clap::{Args, Parser, Subcommand, ValueEnum};
use payload_generator::{Faker, PayloadGenerator, SchemaFieldValueResolverFactory};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "avro-fixture")]
#[command(about = "Generate synthetic Avro payloads for messaging topics")]
#[command(long_about = None)]
struct Cli {
    /// Path to a YAML configuration file
    #[arg(long, short = 'c', global = true, env = "AVRO_FIXTURE_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate payloads for a topic
    Generate(GenerateArgs),

    /// Load every data definition, report its entries and flag unknown commands
    CheckDefinitions(DefinitionArgs),
}

#[derive(Args, Clone, Debug)]
struct DefinitionArgs {
    /// Directory with one data definition file per topic
    #[arg(long, env = "AVRO_FIXTURE_DEFINITIONS_DIR")]
    definitions_dir: Option<PathBuf>,

    /// Extension of data definition files
    #[arg(long)]
    definitions_extension: Option<String>,

    /// Name of the definition used as fallback for every topic
    #[arg(long)]
    global_definition: Option<String>,
}

#[derive(Args, Clone, Debug)]
struct GenerateArgs {
    /// Topic to generate payloads for
    #[arg(long, short = 't')]
    topic: String,

    /// Directory with `<topic>-value.avsc` and `<topic>-key.avsc` schemas
    #[arg(long, env = "AVRO_FIXTURE_SCHEMAS_DIR")]
    schemas_dir: Option<PathBuf>,

    #[command(flatten)]
    definitions: DefinitionArgs,

    /// Predefined payload as JSON, used instead of generated values
    #[arg(long)]
    payload: Option<String>,

    /// Number of payloads to generate
    #[arg(long, default_value = "1")]
    count: usize,

    /// Random seed for reproducible payloads (same seed = same data)
    #[arg(long)]
    seed: Option<u64>,

    /// Output format, one payload per line
    #[arg(long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Generate the message key instead of the message body
    #[arg(long)]
    key: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    /// JSON payload
    Json,
    /// Avro binary datum, base64 encoded
    AvroBase64,
}

impl DefinitionArgs {
    fn apply(&self, config: &mut GeneratorConfig) {
        if let Some(dir) = &self.definitions_dir {
            config.definitions_dir = dir.clone();
        }
        if let Some(extension) = &self.definitions_extension {
            config.definitions_extension = extension.clone();
        }
        if let Some(name) = &self.global_definition {
            config.global_definition = name.clone();
        }
    }
}

impl GenerateArgs {
    fn apply(&self, config: &mut GeneratorConfig) {
        self.definitions.apply(config);
        if let Some(dir) = &self.schemas_dir {
            config.schemas_dir = dir.clone();
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
    }
}

fn main() -> anyhow::Result<()> {
    if let Err(e) = run() {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}

fn run() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => GeneratorConfig::from_file(path)
            .with_context(|| format!("Failed to load config from {path:?}"))?,
        None => GeneratorConfig::default(),
    };

    match cli.command {
        Commands::Generate(args) => {
            args.apply(&mut config);
            run_generate(&args, &config)
        }
        Commands::CheckDefinitions(args) => {
            args.apply(&mut config);
            run_check_definitions(&config)
        }
    }
}

fn run_generate(args: &GenerateArgs, config: &GeneratorConfig) -> anyhow::Result<()> {
    let predefined_payload = args
        .payload
        .as_deref()
        .map(serde_json::from_str::<serde_json::Value>)
        .transpose()
        .context("Predefined payload is not valid JSON")?;

    let mut provider = config.definition_provider();
    provider.load().with_context(|| {
        format!(
            "Failed to load data definitions from {:?}",
            config.definitions_dir
        )
    })?;

    let encoder: Box<dyn RecordEncoder> = match args.format {
        OutputFormat::Json => Box::new(JsonRecordEncoder),
        OutputFormat::AvroBase64 => Box::new(AvroDatumEncoder),
    };
    let generator = match config.seed {
        Some(seed) => PayloadGenerator::with_seed(seed),
        None => PayloadGenerator::new(),
    };
    let mut messages = MessageGenerator::new(
        Box::new(FileSchemaRegistry::new(&config.schemas_dir)),
        encoder,
        SchemaFieldValueResolverFactory::new(Arc::new(Faker::new()), Arc::new(provider)),
        generator,
    );

    let kind = if args.key {
        SchemaKind::Key
    } else {
        SchemaKind::Value
    };

    tracing::info!(
        "Generating {} payload(s) for {}",
        args.count,
        kind.subject(&args.topic)
    );

    for _ in 0..args.count {
        let message = messages
            .generate(&args.topic, kind, predefined_payload.clone())
            .with_context(|| format!("Failed to generate message for topic '{}'", args.topic))?;

        match args.format {
            OutputFormat::Json => {
                let line =
                    String::from_utf8(message.bytes).context("Encoded payload is not UTF-8")?;
                println!("{line}");
            }
            OutputFormat::AvroBase64 => {
                println!(
                    "{}",
                    base64::engine::general_purpose::STANDARD.encode(&message.bytes)
                );
            }
        }
    }

    Ok(())
}

fn run_check_definitions(config: &GeneratorConfig) -> anyhow::Result<()> {
    let mut provider = config.definition_provider();
    provider.load().with_context(|| {
        format!(
            "Failed to load data definitions from {:?}",
            config.definitions_dir
        )
    })?;

    let names = provider.names();
    if names.is_empty() {
        tracing::warn!("No data definitions found in {:?}", config.definitions_dir);
    }

    let faker = Faker::new();
    let mut unsupported_total = 0;
    for name in names {
        let definition = provider.get_data_definition(name)?;
        let marker = if name == provider.global_name() {
            " (global)"
        } else {
            ""
        };
        println!("{name}{marker}: {} entries", definition.len());

        for (address, command) in definition.unsupported_commands(&faker) {
            tracing::warn!("{name}: '{address}' uses unknown command '{command}'");
            unsupported_total += 1;
        }
    }

    if unsupported_total > 0 {
        anyhow::bail!("{unsupported_total} definition entries use unknown commands");
    }

    Ok(())
}
