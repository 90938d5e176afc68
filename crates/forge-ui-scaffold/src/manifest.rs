//! Package manifest rewriting
//!
//! The manifest is treated as opaque JSON except for its `name` field. Keys
//! keep their original order (serde_json `preserve_order`).

use crate::error::{Error, Result};
use camino::Utf8Path;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::debug;

/// A parsed package manifest
#[derive(Debug, Clone, PartialEq)]
pub struct Manifest {
    fields: Map<String, Value>,
}

impl Manifest {
    /// Parse manifest text; the top level must be a JSON object
    pub fn parse(content: &str, path: &Utf8Path) -> Result<Self> {
        let value: Value = serde_json::from_str(content)
            .map_err(|e| Error::invalid_manifest(path.as_str(), e.to_string()))?;

        match value {
            Value::Object(fields) => Ok(Self { fields }),
            _ => Err(Error::invalid_manifest(
                path.as_str(),
                "top-level value is not an object",
            )),
        }
    }

    /// Read and parse the manifest at `path`
    pub async fn load(path: &Utf8Path) -> Result<Self> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| Error::filesystem(path.as_str(), e))?;
        Self::parse(&content, path)
    }

    /// Package name, if present
    pub fn name(&self) -> Option<&str> {
        self.fields.get("name").and_then(Value::as_str)
    }

    /// Package version, if present
    pub fn version(&self) -> Option<&str> {
        self.fields.get("version").and_then(Value::as_str)
    }

    /// Replace the name in place, or append it when absent
    pub fn set_name(&mut self, name: &str) {
        self.fields
            .insert("name".to_string(), Value::String(name.to_string()));
    }

    /// All fields in file order
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Serialize with tab indentation and a trailing newline
    pub fn to_pretty_string(&self) -> Result<String> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"\t");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.fields.serialize(&mut serializer)?;
        buf.push(b'\n');

        // serde_json only emits UTF-8
        String::from_utf8(buf).map_err(|e| Error::invalid_manifest("<memory>", e.to_string()))
    }

    /// Overwrite the manifest file at `path`
    pub async fn save(&self, path: &Utf8Path) -> Result<()> {
        let content = self.to_pretty_string()?;
        tokio::fs::write(path, content)
            .await
            .map_err(|e| Error::filesystem(path.as_str(), e))
    }
}

/// Set the manifest's name field at `path` and write it back
pub async fn rename_manifest(path: &Utf8Path, name: &str) -> Result<Manifest> {
    let mut manifest = Manifest::load(path).await?;
    debug!(
        "Renaming manifest {} from {:?} to {}",
        path,
        manifest.name(),
        name
    );
    manifest.set_name(name);
    manifest.save(path).await?;
    Ok(manifest)
}
