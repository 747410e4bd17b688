//! The data-provider seam.
//!
//! The engine never fetches anything itself: a [`CatalogSource`] hands it a
//! [`Dataset`] holding the record streams, and [`crate::catalog::Catalog::load`]
//! validates and indexes them. [`JsonFileSource`] is the file-backed provider
//! used by the CLI.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::model::{
    AuspiciousRecord, NayinRecord, PreferenceRecord, RelationRecord, SymbolismRecord,
};

/// Raw record streams as delivered by a data provider.
///
/// Entities are not part of the dataset; they are fixed by the registry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub nayin: Vec<NayinRecord>,
    #[serde(default, alias = "guanxi")]
    pub relations: Vec<RelationRecord>,
    #[serde(default, alias = "xiangyi")]
    pub symbolism: Vec<SymbolismRecord>,
    #[serde(default, alias = "shensha")]
    pub auspicious: Vec<AuspiciousRecord>,
    #[serde(default, alias = "xiji")]
    pub preferences: Vec<PreferenceRecord>,
}

impl Dataset {
    /// Parse a dataset from JSON text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a valid dataset document.
    pub fn from_json_str(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("parse dataset JSON")
    }
}

/// External collaborator that produces the raw record streams.
pub trait CatalogSource {
    /// Fetch the current dataset.
    ///
    /// # Errors
    ///
    /// Implementations report I/O or decoding failures.
    fn fetch(&self) -> Result<Dataset>;
}

/// Reads a dataset from a JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CatalogSource for JsonFileSource {
    #[instrument(skip(self), fields(path = %self.path.display()))]
    fn fetch(&self) -> Result<Dataset> {
        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read {}", self.path.display()))?;
        let dataset = Dataset::from_json_str(&content)
            .with_context(|| format!("Failed to parse {}", self.path.display()))?;
        debug!(
            nayin = dataset.nayin.len(),
            relations = dataset.relations.len(),
            symbolism = dataset.symbolism.len(),
            auspicious = dataset.auspicious.len(),
            preferences = dataset.preferences.len(),
            "dataset loaded"
        );
        Ok(dataset)
    }
}

impl CatalogSource for Dataset {
    fn fetch(&self) -> Result<Dataset> {
        Ok(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_streams_default_to_empty() {
        let dataset = Dataset::from_json_str("{}").expect("empty object parses");
        assert_eq!(dataset, Dataset::default());
    }

    #[test]
    fn legacy_stream_names_are_accepted() {
        let json = r#"{"guanxi":[{"ganzhi1":"甲子","ganzhi2":"庚午","relation_type":"六冲"}]}"#;
        let dataset = Dataset::from_json_str(json).expect("parses");
        assert_eq!(dataset.relations.len(), 1);
    }

    #[test]
    fn file_source_reads_json() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("catalog.json");
        std::fs::write(
            &path,
            r#"{"nayin":[{"ganzhi":"甲子","name":"海中金","element":"金","stage":"死","magnitude":"小弱"}]}"#,
        )
        .expect("write dataset");

        let dataset = JsonFileSource::new(&path).fetch().expect("fetch");
        assert_eq!(dataset.nayin.len(), 1);
        assert_eq!(dataset.nayin[0].name, "海中金");
    }

    #[test]
    fn file_source_reports_missing_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = JsonFileSource::new(dir.path().join("nope.json"))
            .fetch()
            .unwrap_err();
        assert!(err.to_string().contains("Failed to read"));
    }
}
