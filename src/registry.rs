//! Schema lookup by topic.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Which of a topic's two schemas is requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaKind {
    Key,
    Value,
}

impl SchemaKind {
    /// Subject name under the topic naming strategy, e.g. `orders-value`.
    pub fn subject(&self, topic: &str) -> String {
        format!("{topic}-{self}")
    }
}

impl fmt::Display for SchemaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaKind::Key => f.write_str("key"),
            SchemaKind::Value => f.write_str("value"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("Failed to read schema '{subject}' from {path}: {source}")]
    Io {
        subject: String,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Source of schema text for topics.
pub trait SchemaRegistry {
    /// Schema text for the topic, or `None` when the topic has no such schema.
    fn schema(&self, topic: &str, kind: SchemaKind) -> Result<Option<String>, RegistryError>;
}

/// Registry backed by `<dir>/<subject>.avsc` files.
#[derive(Debug, Clone)]
pub struct FileSchemaRegistry {
    dir: PathBuf,
}

impl FileSchemaRegistry {
    pub const EXTENSION: &'static str = "avsc";

    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn schema_path(&self, topic: &str, kind: SchemaKind) -> PathBuf {
        self.dir.join(format!("{}.{}", kind.subject(topic), Self::EXTENSION))
    }
}

impl SchemaRegistry for FileSchemaRegistry {
    fn schema(&self, topic: &str, kind: SchemaKind) -> Result<Option<String>, RegistryError> {
        let path = self.schema_path(topic, kind);
        match fs::read_to_string(&path) {
            Ok(schema) => {
                tracing::debug!("Read schema '{}' from {}", kind.subject(topic), path.display());
                Ok(Some(schema))
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(RegistryError::Io {
                subject: kind.subject(topic),
                path,
                source,
            }),
        }
    }
}
