//! Generator configuration.
//!
//! ```yaml
//! definitions_dir: fixtures/definitions
//! definitions_extension: json
//! global_definition: global
//! schemas_dir: fixtures/schemas
//! seed: 42
//! ```
//!
//! Every key is optional. Command-line flags take precedence over values
//! read from the file.

use data_definition::provider::DATA_DEFINITION_FILES_EXTENSION;
use data_definition::{DataDefinitionProvider, GLOBAL_DATA_DEFINITION_NAME};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Error reading the configuration file
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    /// Error parsing YAML
    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Directory holding one data definition file per topic
    pub definitions_dir: PathBuf,

    /// Extension of data definition files, without the dot
    pub definitions_extension: String,

    /// Name of the definition consulted for every topic
    pub global_definition: String,

    /// Directory holding `<topic>-value.avsc` / `<topic>-key.avsc` files
    pub schemas_dir: PathBuf,

    /// Fixed seed for reproducible payloads
    pub seed: Option<u64>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            definitions_dir: PathBuf::from("definitions"),
            definitions_extension: DATA_DEFINITION_FILES_EXTENSION.to_string(),
            global_definition: GLOBAL_DATA_DEFINITION_NAME.to_string(),
            schemas_dir: PathBuf::from("schemas"),
            seed: None,
        }
    }
}

impl GeneratorConfig {
    /// Load configuration from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// A provider for the configured definitions directory. Not loaded yet.
    pub fn definition_provider(&self) -> DataDefinitionProvider {
        DataDefinitionProvider::new(&self.definitions_dir)
            .with_extension(&self.definitions_extension)
            .with_global_name(&self.global_definition)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_full_config() {
        let config = GeneratorConfig::from_yaml(
            r#"
definitions_dir: fixtures/definitions
definitions_extension: def
global_definition: shared
schemas_dir: fixtures/schemas
seed: 42
"#,
        )
        .unwrap();

        assert_eq!(config.definitions_dir, PathBuf::from("fixtures/definitions"));
        assert_eq!(config.definitions_extension, "def");
        assert_eq!(config.global_definition, "shared");
        assert_eq!(config.schemas_dir, PathBuf::from("fixtures/schemas"));
        assert_eq!(config.seed, Some(42));

        let provider = config.definition_provider();
        assert_eq!(provider.root_dir(), Path::new("fixtures/definitions"));
        assert_eq!(provider.global_name(), "shared");
    }

    #[test]
    fn test_defaults() {
        let config = GeneratorConfig::from_yaml("seed: 7").unwrap();
        assert_eq!(
            config,
            GeneratorConfig {
                seed: Some(7),
                ..GeneratorConfig::default()
            }
        );
        assert_eq!(config.definitions_extension, "json");
        assert_eq!(config.global_definition, "global");
    }

    #[test]
    fn test_unknown_key_rejected() {
        let result = GeneratorConfig::from_yaml("definition_dir: typo");
        assert!(matches!(result, Err(ConfigError::YamlError(_))));
    }

    #[test]
    fn test_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("avro-fixture.yaml");
        fs::write(&path, "schemas_dir: /tmp/schemas\n").unwrap();

        let config = GeneratorConfig::from_file(&path).unwrap();
        assert_eq!(config.schemas_dir, PathBuf::from("/tmp/schemas"));

        let missing = GeneratorConfig::from_file(dir.path().join("missing.yaml"));
        assert!(matches!(missing, Err(ConfigError::IoError(_))));
    }
}
