//! Relation catalog: the flat list of pairwise relation records.
//!
//! ## Pair lookups return lists
//!
//! A pair of ganzhi can be linked by several relation types at once (for
//! example 六合 and 同位), so [`RelationCatalog::find`] returns every record
//! between the two, never a single optional one.
//!
//! ## Distinct-type cache
//!
//! [`RelationCatalog::distinct_types`] scans the records once and memoizes the
//! result in a [`OnceLock`]. Appending through [`RelationCatalog::push`]
//! requires `&mut self` and resets the cache, so readers sharing a catalog
//! across threads never observe a stale set.

use std::collections::BTreeSet;
use std::sync::OnceLock;

use crate::model::{RelationRecord, RelationType};

#[derive(Debug, Default)]
pub struct RelationCatalog {
    records: Vec<RelationRecord>,
    types: OnceLock<BTreeSet<RelationType>>,
}

impl Clone for RelationCatalog {
    fn clone(&self) -> Self {
        Self {
            records: self.records.clone(),
            types: OnceLock::new(),
        }
    }
}

impl RelationCatalog {
    #[must_use]
    pub fn new(records: Vec<RelationRecord>) -> Self {
        Self {
            records,
            types: OnceLock::new(),
        }
    }

    /// Append a record, invalidating the distinct-type cache.
    pub fn push(&mut self, record: RelationRecord) {
        self.records.push(record);
        self.types = OnceLock::new();
    }

    /// All records in insertion order.
    #[must_use]
    pub fn records(&self) -> &[RelationRecord] {
        &self.records
    }

    /// Records where `name` is source or target, in insertion order.
    pub fn relations_for<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a RelationRecord> {
        self.records.iter().filter(move |r| r.involves(name))
    }

    /// Every record linking `a` and `b`, in either direction.
    #[must_use]
    pub fn find(&self, a: &str, b: &str) -> Vec<&RelationRecord> {
        self.records.iter().filter(|r| r.connects(a, b)).collect()
    }

    /// Records of a single type, in insertion order.
    #[must_use]
    pub fn of_type(&self, relation_type: &RelationType) -> Vec<&RelationRecord> {
        self.records
            .iter()
            .filter(|r| &r.relation_type == relation_type)
            .collect()
    }

    /// The set of relation types present, computed once per revision.
    pub fn distinct_types(&self) -> &BTreeSet<RelationType> {
        self.types.get_or_init(|| {
            self.records
                .iter()
                .map(|r| r.relation_type.clone())
                .collect()
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl FromIterator<RelationRecord> for RelationCatalog {
    fn from_iter<I: IntoIterator<Item = RelationRecord>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> RelationCatalog {
        RelationCatalog::new(vec![
            RelationRecord::new("甲子", "庚午", RelationType::SixClash),
            RelationRecord::new("甲子", "乙丑", RelationType::SixCombination),
            RelationRecord::new("乙丑", "甲子", RelationType::SamePosition),
            RelationRecord::new("丙寅", "丁卯", RelationType::HalfCombination),
        ])
    }

    #[test]
    fn relations_for_covers_both_directions_in_order() {
        let catalog = sample();
        let types: Vec<_> = catalog
            .relations_for("甲子")
            .map(|r| r.relation_type.clone())
            .collect();
        assert_eq!(
            types,
            vec![
                RelationType::SixClash,
                RelationType::SixCombination,
                RelationType::SamePosition,
            ]
        );
    }

    #[test]
    fn find_returns_every_record_for_a_pair() {
        let catalog = sample();
        assert_eq!(catalog.find("甲子", "乙丑").len(), 2);
        assert_eq!(catalog.find("乙丑", "甲子").len(), 2);
        assert!(catalog.find("甲子", "丁卯").is_empty());
    }

    #[test]
    fn distinct_types_is_cached_until_push() {
        let mut catalog = sample();
        assert_eq!(catalog.distinct_types().len(), 4);
        assert!(!catalog.distinct_types().contains(&RelationType::SixHarm));

        catalog.push(RelationRecord::new("丁卯", "戊辰", RelationType::SixHarm));
        assert_eq!(catalog.distinct_types().len(), 5);
        assert!(catalog.distinct_types().contains(&RelationType::SixHarm));
    }

    #[test]
    fn of_type_filters_exactly() {
        let catalog = sample();
        assert_eq!(catalog.of_type(&RelationType::SixClash).len(), 1);
        assert!(catalog.of_type(&RelationType::SixHarm).is_empty());
    }

    #[test]
    fn empty_catalog_has_no_types() {
        let catalog = RelationCatalog::default();
        assert!(catalog.is_empty());
        assert!(catalog.distinct_types().is_empty());
    }
}
