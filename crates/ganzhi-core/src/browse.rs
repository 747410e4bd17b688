//! Catalog-wide browse queries: nayin groupings, status and magnitude
//! filters, and reverse lookup of auspicious entities.
//!
//! Every result is ordered by cycle position so repeated queries render
//! identically.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::catalog::Catalog;
use crate::model::{Element, Entity, LifeStage, Magnitude, NayinRecord};

/// A ganzhi paired with its nayin record.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct NayinEntry<'a> {
    pub ganzhi: &'a str,
    pub nayin: &'a NayinRecord,
}

/// All ganzhi sharing one nayin name.
#[derive(Debug, Clone, Serialize)]
pub struct NayinGroup<'a> {
    pub name: &'a str,
    pub element: Element,
    pub magnitude: Magnitude,
    pub members: Vec<NayinEntry<'a>>,
}

/// A ganzhi carrying a given auspicious entity.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Carrier<'a> {
    pub ganzhi: &'a str,
    pub self_seated: bool,
}

/// Read-only browse view over a [`Catalog`].
#[derive(Debug, Clone, Copy)]
pub struct Browser<'a> {
    catalog: &'a Catalog,
}

impl<'a> Browser<'a> {
    #[must_use]
    pub const fn new(catalog: &'a Catalog) -> Self {
        Self { catalog }
    }

    fn entries(self) -> impl Iterator<Item = NayinEntry<'a>> {
        let catalog = self.catalog;
        catalog
            .registry()
            .list_all()
            .iter()
            .filter_map(move |e: &'a Entity| {
                catalog.nayin(&e.name).map(|nayin| NayinEntry {
                    ganzhi: e.name.as_str(),
                    nayin,
                })
            })
    }

    /// Ganzhi grouped by nayin name; groups appear in the cycle order of
    /// their first member.
    #[must_use]
    pub fn nayin_groups(&self) -> Vec<NayinGroup<'a>> {
        let mut groups: Vec<NayinGroup<'a>> = Vec::new();
        for entry in self.entries() {
            if let Some(group) = groups.iter_mut().find(|g| g.name == entry.nayin.name) {
                group.members.push(entry);
            } else {
                groups.push(NayinGroup {
                    name: &entry.nayin.name,
                    element: entry.nayin.element,
                    magnitude: entry.nayin.magnitude,
                    members: vec![entry],
                });
            }
        }
        groups
    }

    /// Entries whose nayin name contains `query`.
    #[must_use]
    pub fn by_nayin_name(&self, query: &str) -> Vec<NayinEntry<'a>> {
        self.entries()
            .filter(|e| e.nayin.name.contains(query.trim()))
            .collect()
    }

    /// Life-cycle stages present in the catalog, in canonical stage order.
    #[must_use]
    pub fn statuses(&self) -> Vec<LifeStage> {
        self.entries()
            .map(|e| e.nayin.stage)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    #[must_use]
    pub fn by_status(&self, stage: LifeStage) -> Vec<NayinEntry<'a>> {
        self.entries().filter(|e| e.nayin.stage == stage).collect()
    }

    #[must_use]
    pub fn by_magnitude(&self, magnitude: Magnitude) -> Vec<NayinEntry<'a>> {
        self.entries()
            .filter(|e| e.nayin.magnitude == magnitude)
            .collect()
    }

    /// Distinct auspicious-entity names, sorted.
    #[must_use]
    pub fn auspicious_names(&self) -> BTreeSet<&'a str> {
        let catalog = self.catalog;
        catalog
            .registry()
            .list_all()
            .iter()
            .flat_map(|e| catalog.auspicious(&e.name))
            .map(|r| r.name.as_str())
            .collect()
    }

    /// Ganzhi carrying the auspicious entity `name`, in cycle order.
    #[must_use]
    pub fn carriers_of(&self, name: &str) -> Vec<Carrier<'a>> {
        let catalog = self.catalog;
        catalog
            .registry()
            .list_all()
            .iter()
            .filter_map(|e| {
                catalog
                    .auspicious(&e.name)
                    .iter()
                    .find(|r| r.name == name)
                    .map(|r| Carrier {
                        ganzhi: e.name.as_str(),
                        self_seated: r.self_seated,
                    })
            })
            .collect()
    }
}
