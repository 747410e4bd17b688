//! The fixed registry of the sixty sexagenary entities.
//!
//! # Construction
//!
//! [`EntityRegistry::build`] walks the full 10 × 12 stem/branch grid, keeps
//! the pairs that satisfy the parity rule and orders them by cycle position
//! (甲子, 乙丑, … 癸亥). Anything other than exactly sixty unique names is an
//! [`EngineError::InvalidRegistry`]: callers treat it as fatal at start-up,
//! not as a per-call failure.

use std::collections::HashMap;

use tracing::{debug, instrument};

use crate::error::EngineError;
use crate::model::cycle::{Branch, Stem, pairs_with};
use crate::model::Entity;

/// Number of entities in the cycle.
pub const CYCLE_LEN: usize = 60;

/// Immutable, ordered collection of the sixty entities.
#[derive(Debug, Clone)]
pub struct EntityRegistry {
    entities: Vec<Entity>,
    by_name: HashMap<String, usize>,
}

impl EntityRegistry {
    /// Build and validate the registry.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidRegistry`] if the pairing rule does not
    /// yield exactly sixty unique names.
    #[instrument]
    pub fn build() -> Result<Self, EngineError> {
        let mut pairs: Vec<(usize, Stem, Branch)> = Stem::ALL
            .iter()
            .flat_map(|&stem| Branch::ALL.iter().map(move |&branch| (stem, branch)))
            .filter(|&(stem, branch)| pairs_with(stem, branch))
            .map(|(stem, branch)| (cycle_position(stem, branch), stem, branch))
            .collect();
        pairs.sort_by_key(|&(position, _, _)| position);

        let entities: Vec<Entity> = pairs
            .into_iter()
            .map(|(position, stem, branch)| Entity::new(position, stem, branch))
            .collect();

        Self::from_entities(entities)
    }

    fn from_entities(entities: Vec<Entity>) -> Result<Self, EngineError> {
        if entities.len() != CYCLE_LEN {
            return Err(EngineError::InvalidRegistry(format!(
                "expected {CYCLE_LEN} entities, pairing rule produced {}",
                entities.len()
            )));
        }

        let mut by_name = HashMap::with_capacity(entities.len());
        for (idx, entity) in entities.iter().enumerate() {
            if entity.cycle_index != idx {
                return Err(EngineError::InvalidRegistry(format!(
                    "{} sits at position {idx} but claims cycle index {}",
                    entity.name, entity.cycle_index
                )));
            }
            if by_name.insert(entity.name.clone(), idx).is_some() {
                return Err(EngineError::InvalidRegistry(format!(
                    "duplicate name {}",
                    entity.name
                )));
            }
        }

        debug!(count = entities.len(), "entity registry built");
        Ok(Self { entities, by_name })
    }

    /// All sixty entities in cycle order.
    #[must_use]
    pub fn list_all(&self) -> &[Entity] {
        &self.entities
    }

    /// Look up an entity by name.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::NotFound`] for a name outside the cycle.
    pub fn find(&self, name: &str) -> Result<&Entity, EngineError> {
        self.get(name).ok_or_else(|| EngineError::not_found(name))
    }

    /// Non-failing lookup.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Entity> {
        self.by_name.get(name).map(|&idx| &self.entities[idx])
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Split a name into its stem and branch.
    ///
    /// Returns `None` unless the name is exactly one stem followed by one
    /// branch of matching parity.
    #[must_use]
    pub fn decompose(name: &str) -> Option<(Stem, Branch)> {
        let mut chars = name.chars();
        let stem = chars.next()?.to_string().parse::<Stem>().ok()?;
        let branch = chars.next()?.to_string().parse::<Branch>().ok()?;
        if chars.next().is_some() || !pairs_with(stem, branch) {
            return None;
        }
        Some((stem, branch))
    }

    /// Entities whose name, stem or branch contains `query`, in cycle order.
    ///
    /// An empty (or all-whitespace) query matches everything.
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<&Entity> {
        let query = query.trim();
        self.entities
            .iter()
            .filter(|e| {
                query.is_empty()
                    || e.name.contains(query)
                    || e.stem.label().contains(query)
                    || e.branch.label().contains(query)
            })
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

/// Position of a (stem, branch) pair in the sixty-step cycle.
///
/// Solves `n ≡ stem (mod 10)`, `n ≡ branch (mod 12)` for `n < 60`; only
/// meaningful for pairs that satisfy the parity rule.
fn cycle_position(stem: Stem, branch: Branch) -> usize {
    (0..CYCLE_LEN)
        .find(|n| n % 10 == stem.index() && n % 12 == branch.index())
        .unwrap_or(CYCLE_LEN)
}
