//! Loads data definitions from a directory of JSON files.

use crate::definition::DataDefinition;
use crate::error::{DefinitionError, IncorrectJsonReason, Result};
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Name of the definition consulted as a fallback for every topic.
pub const GLOBAL_DATA_DEFINITION_NAME: &str = "global";

/// Default extension of definition files.
pub const DATA_DEFINITION_FILES_EXTENSION: &str = "json";

/// Directory-backed table of named data definitions.
///
/// One file per topic; the file stem is the definition name. Nothing is read
/// until [`load`](Self::load) is called.
#[derive(Debug, Clone)]
pub struct DataDefinitionProvider {
    root_dir: PathBuf,
    extension: String,
    global_name: String,
    definitions: HashMap<String, Arc<DataDefinition>>,
}

impl DataDefinitionProvider {
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
            extension: DATA_DEFINITION_FILES_EXTENSION.to_string(),
            global_name: GLOBAL_DATA_DEFINITION_NAME.to_string(),
            definitions: HashMap::new(),
        }
    }

    /// Use a different file extension (without the leading dot).
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into().trim_start_matches('.').to_string();
        self
    }

    /// Use a different name for the global definition.
    pub fn with_global_name(mut self, name: impl Into<String>) -> Self {
        self.global_name = name.into();
        self
    }

    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    pub fn global_name(&self) -> &str {
        &self.global_name
    }

    /// Scan the root directory and decode every definition file.
    ///
    /// Subdirectories and files with another extension are skipped. Files
    /// are processed in name order so failures are reported consistently.
    pub fn load(&mut self) -> Result<()> {
        let entries = fs::read_dir(&self.root_dir).map_err(|source| DefinitionError::Directory {
            path: self.root_dir.clone(),
            source,
        })?;

        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| DefinitionError::Directory {
                path: self.root_dir.clone(),
                source,
            })?;
            let path = entry.path();

            if !path.is_file() {
                continue;
            }

            if path.extension().and_then(|ext| ext.to_str()) != Some(self.extension.as_str()) {
                tracing::debug!("Skipping non-definition file: {}", path.display());
                continue;
            }

            paths.push(path);
        }
        paths.sort();

        for path in paths {
            let Some(name) = path.file_stem().and_then(|stem| stem.to_str()) else {
                tracing::warn!(
                    "Skipping definition file with non UTF-8 name: {}",
                    path.display()
                );
                continue;
            };
            let name = name.to_string();

            let decoded = read_definition_json(&path)?;
            let definition = DataDefinition::from_json(&decoded)?;

            tracing::debug!(
                "Loaded data definition '{}' with {} entries from {}",
                name,
                definition.len(),
                path.display()
            );

            self.definitions.insert(name, Arc::new(definition));
        }

        Ok(())
    }

    /// Register a definition without going through the filesystem.
    pub fn insert(&mut self, name: impl Into<String>, definition: DataDefinition) {
        self.definitions.insert(name.into(), Arc::new(definition));
    }

    pub fn get_data_definition(&self, name: &str) -> Result<Arc<DataDefinition>> {
        self.definitions
            .get(name)
            .cloned()
            .ok_or_else(|| DefinitionError::UnexistingDataDefinition(name.to_string()))
    }

    /// The global fallback definition, if one was loaded.
    pub fn global(&self) -> Option<Arc<DataDefinition>> {
        self.definitions.get(&self.global_name).cloned()
    }

    /// Names of all loaded definitions, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.definitions.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

fn read_definition_json(path: &Path) -> Result<Value> {
    let incorrect = |reason| DefinitionError::IncorrectDataDefinitionJson {
        path: path.to_path_buf(),
        reason,
    };

    let content =
        fs::read_to_string(path).map_err(|e| incorrect(IncorrectJsonReason::Unreadable(e)))?;

    if content.trim().is_empty() {
        return Err(incorrect(IncorrectJsonReason::Empty));
    }

    serde_json::from_str(&content).map_err(|e| incorrect(IncorrectJsonReason::Malformed(e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::FieldAddress;
    use crate::field::DataDefinitionField;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, content: &str) {
        fs::write(dir.path().join(name), content).unwrap();
    }

    #[test]
    fn test_load_definitions() {
        let dir = TempDir::new().unwrap();
        write(&dir, "orders.json", r#"{"id": {"value": "order-1"}}"#);
        write(&dir, "global.json", r#"{"createdAt": {"command": "iso8601"}}"#);
        write(&dir, "notes.txt", "not a definition");
        fs::create_dir(dir.path().join("nested")).unwrap();
        write(&dir, "nested/ignored.json", "{ broken");

        let mut provider = DataDefinitionProvider::new(dir.path());
        provider.load().unwrap();

        assert_eq!(provider.names(), vec!["global", "orders"]);

        let orders = provider.get_data_definition("orders").unwrap();
        assert_eq!(
            orders.get(&FieldAddress::from("id")),
            Some(&DataDefinitionField::value("order-1"))
        );

        let global = provider.global().unwrap();
        assert!(global.contains(&FieldAddress::from("createdAt")));
    }

    #[test]
    fn test_unexisting_definition() {
        let dir = TempDir::new().unwrap();
        let mut provider = DataDefinitionProvider::new(dir.path());
        provider.load().unwrap();

        let result = provider.get_data_definition("orders");
        assert!(matches!(
            result,
            Err(DefinitionError::UnexistingDataDefinition(ref name)) if name == "orders"
        ));
        assert!(provider.global().is_none());
    }

    #[test]
    fn test_empty_file() {
        let dir = TempDir::new().unwrap();
        write(&dir, "orders.json", "  \n");

        let mut provider = DataDefinitionProvider::new(dir.path());
        match provider.load() {
            Err(DefinitionError::IncorrectDataDefinitionJson { path, reason }) => {
                assert!(path.ends_with("orders.json"));
                assert!(matches!(reason, IncorrectJsonReason::Empty));
            }
            other => panic!("Expected IncorrectDataDefinitionJson, got {other:?}"),
        }
    }

    #[test]
    fn test_malformed_json() {
        let dir = TempDir::new().unwrap();
        write(&dir, "orders.json", r#"{"id": {"value": "#);

        let mut provider = DataDefinitionProvider::new(dir.path());
        match provider.load() {
            Err(DefinitionError::IncorrectDataDefinitionJson { path, reason }) => {
                assert!(path.ends_with("orders.json"));
                assert!(matches!(reason, IncorrectJsonReason::Malformed(_)));
            }
            other => panic!("Expected IncorrectDataDefinitionJson, got {other:?}"),
        }
    }

    #[test]
    fn test_invalid_field_fails_load() {
        let dir = TempDir::new().unwrap();
        write(&dir, "orders.json", r#"{"id": {"value": "x", "command": "y"}}"#);

        let mut provider = DataDefinitionProvider::new(dir.path());
        assert!(matches!(
            provider.load(),
            Err(DefinitionError::InvalidDataDefinitionField(_))
        ));
    }

    #[test]
    fn test_custom_extension_and_global_name() {
        let dir = TempDir::new().unwrap();
        write(&dir, "shared.def", r#"{"id": {"value": "shared"}}"#);
        write(&dir, "orders.json", r#"{"id": {"value": "skipped"}}"#);

        let mut provider = DataDefinitionProvider::new(dir.path())
            .with_extension(".def")
            .with_global_name("shared");
        provider.load().unwrap();

        assert_eq!(provider.names(), vec!["shared"]);
        assert!(provider.global().is_some());
    }

    #[test]
    fn test_missing_directory() {
        let mut provider = DataDefinitionProvider::new("/nonexistent/definitions");
        assert!(matches!(
            provider.load(),
            Err(DefinitionError::Directory { .. })
        ));
    }
}
