//! The loaded catalog: registry plus validated, per-entity indexed records.
//!
//! # Load-time invariants
//!
//! [`Catalog::load`] is the single place where provider data is checked
//! against the registry:
//!
//! - every record must name a registered ganzhi (relations: both ends),
//!   otherwise loading fails with [`EngineError::UnknownEntity`];
//! - at most one nayin record per ganzhi, otherwise
//!   [`EngineError::InconsistentData`].
//!
//! A ganzhi with *no* nayin record does not fail the load. The gap is logged
//! and surfaces as `InconsistentData` only from operations that need it, so
//! one bad record never takes down the other fifty-nine entities.

pub mod relations;

use std::collections::HashMap;

use anyhow::Context;
use tracing::{error, info, instrument, warn};

use crate::error::EngineError;
use crate::model::{
    AuspiciousRecord, EntityScoped, NayinRecord, PreferenceRecord, RelationRecord,
    SymbolismRecord,
};
use crate::registry::EntityRegistry;
use crate::source::{CatalogSource, Dataset};

pub use relations::RelationCatalog;

/// Registry and records, ready for the read-only engine operations.
#[derive(Debug, Clone)]
pub struct Catalog {
    registry: EntityRegistry,
    nayin: HashMap<String, NayinRecord>,
    relations: RelationCatalog,
    symbolism: HashMap<String, Vec<SymbolismRecord>>,
    auspicious: HashMap<String, Vec<AuspiciousRecord>>,
    preferences: HashMap<String, Vec<PreferenceRecord>>,
}

impl Catalog {
    /// Validate `dataset` against `registry` and index it.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::UnknownEntity`] if any record references a name
    /// outside the registry, or [`EngineError::InconsistentData`] if a ganzhi
    /// has more than one nayin record.
    #[instrument(skip_all)]
    pub fn load(registry: EntityRegistry, dataset: Dataset) -> Result<Self, EngineError> {
        let Dataset {
            nayin,
            relations,
            symbolism,
            auspicious,
            preferences,
        } = dataset;

        let mut nayin_by_name = HashMap::with_capacity(nayin.len());
        for record in nayin {
            ensure_registered(&registry, record.ganzhi(), "nayin record")?;
            let name = record.ganzhi.clone();
            if nayin_by_name.insert(name.clone(), record).is_some() {
                error!(ganzhi = %name, "duplicate nayin record");
                return Err(EngineError::InconsistentData {
                    name,
                    detail: "more than one nayin record".to_string(),
                });
            }
        }

        for record in &relations {
            ensure_registered(&registry, &record.source, "relation record")?;
            ensure_registered(&registry, &record.target, "relation record")?;
        }

        let catalog = Self {
            nayin: nayin_by_name,
            relations: RelationCatalog::new(relations),
            symbolism: group_by_entity(&registry, symbolism, "symbolism record")?,
            auspicious: group_by_entity(&registry, auspicious, "auspicious record")?,
            preferences: group_by_entity(&registry, preferences, "preference record")?,
            registry,
        };

        let missing = catalog.missing_nayin();
        if !missing.is_empty() {
            warn!(
                count = missing.len(),
                ganzhi = %missing.join(","),
                "ganzhi without nayin record"
            );
        }

        info!(
            nayin = catalog.nayin.len(),
            relations = catalog.relations.len(),
            "catalog loaded"
        );
        Ok(catalog)
    }

    /// Build the registry, fetch from `source` and load.
    ///
    /// # Errors
    ///
    /// Returns an error if the registry is invalid, the source fails, or the
    /// dataset violates a load-time invariant.
    pub fn from_source(source: &dyn CatalogSource) -> anyhow::Result<Self> {
        let registry = EntityRegistry::build()?;
        let dataset = source.fetch().context("fetch dataset from catalog source")?;
        Ok(Self::load(registry, dataset)?)
    }

    #[must_use]
    pub const fn registry(&self) -> &EntityRegistry {
        &self.registry
    }

    #[must_use]
    pub const fn relations(&self) -> &RelationCatalog {
        &self.relations
    }

    #[must_use]
    pub fn nayin(&self, name: &str) -> Option<&NayinRecord> {
        self.nayin.get(name)
    }

    #[must_use]
    pub fn symbolism(&self, name: &str) -> &[SymbolismRecord] {
        self.symbolism.get(name).map_or(&[], Vec::as_slice)
    }

    #[must_use]
    pub fn auspicious(&self, name: &str) -> &[AuspiciousRecord] {
        self.auspicious.get(name).map_or(&[], Vec::as_slice)
    }

    #[must_use]
    pub fn preferences(&self, name: &str) -> &[PreferenceRecord] {
        self.preferences.get(name).map_or(&[], Vec::as_slice)
    }

    /// Registered ganzhi lacking a nayin record, in cycle order.
    #[must_use]
    pub fn missing_nayin(&self) -> Vec<&str> {
        self.registry
            .list_all()
            .iter()
            .filter(|e| !self.nayin.contains_key(&e.name))
            .map(|e| e.name.as_str())
            .collect()
    }

    /// Append a relation after load, keeping the load-time invariant.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::UnknownEntity`] if either endpoint is unregistered.
    pub fn add_relation(&mut self, record: RelationRecord) -> Result<(), EngineError> {
        ensure_registered(&self.registry, &record.source, "relation record")?;
        ensure_registered(&self.registry, &record.target, "relation record")?;
        self.relations.push(record);
        Ok(())
    }
}

fn ensure_registered(
    registry: &EntityRegistry,
    name: &str,
    context: &'static str,
) -> Result<(), EngineError> {
    if registry.contains(name) {
        Ok(())
    } else {
        error!(ganzhi = %name, context, "record references unknown ganzhi");
        Err(EngineError::UnknownEntity {
            name: name.to_string(),
            context,
        })
    }
}

fn group_by_entity<R: EntityScoped>(
    registry: &EntityRegistry,
    records: Vec<R>,
    context: &'static str,
) -> Result<HashMap<String, Vec<R>>, EngineError> {
    let mut grouped: HashMap<String, Vec<R>> = HashMap::new();
    for record in records {
        ensure_registered(registry, record.ganzhi(), context)?;
        grouped
            .entry(record.ganzhi().to_string())
            .or_default()
            .push(record);
    }
    Ok(grouped)
}
