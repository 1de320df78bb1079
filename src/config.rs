//! Group configuration and source tables
//!
//! `GroupConfig` describes one cache namespace. `SourceTable` is the
//! key/value table the demo binary loads from disk to act as the slow
//! source of truth behind a group.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::cache::DEFAULT_CAPACITY;
use crate::error::{Error, Result};

/// Configuration for one cache group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupConfig {
    /// Unique group name
    pub name: String,
    /// Maximum cache usage in bytes (0 = unbounded)
    pub capacity_bytes: i64,
}

impl Default for GroupConfig {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            capacity_bytes: DEFAULT_CAPACITY,
        }
    }
}

impl GroupConfig {
    /// Create a config with the given name and capacity
    pub fn new(name: impl Into<String>, capacity_bytes: i64) -> Self {
        Self {
            name: name.into(),
            capacity_bytes,
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::Config("group name must not be empty".into()));
        }
        if self.capacity_bytes < 0 {
            return Err(Error::Config(format!(
                "capacity must be non-negative, got {}",
                self.capacity_bytes
            )));
        }
        Ok(())
    }
}

/// In-memory key -> text table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourceTable {
    rows: BTreeMap<String, String>,
}

impl SourceTable {
    /// Sample table used when no source file is given
    pub fn sample() -> Self {
        [("Tom", "630"), ("Jack", "589"), ("Sam", "567")]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    /// Load a table from a JSON or YAML file (chosen by extension)
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json(&raw),
            Some("yaml") | Some("yml") => Self::from_yaml(&raw),
            other => Err(Error::Parse(format!(
                "unsupported source format {:?} for {}",
                other.unwrap_or(""),
                path.display()
            ))),
        }
    }

    /// Parse a JSON object of string values
    pub fn from_json(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).map_err(|e| Error::Parse(e.to_string()))
    }

    /// Parse a YAML mapping of string values
    pub fn from_yaml(raw: &str) -> Result<Self> {
        serde_yaml::from_str(raw).map_err(|e| Error::Parse(e.to_string()))
    }

    /// Look up a row
    pub fn get(&self, key: &str) -> Option<&str> {
        self.rows.get(key).map(String::as_str)
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if the table has no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl FromIterator<(String, String)> for SourceTable {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            rows: iter.into_iter().collect(),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
