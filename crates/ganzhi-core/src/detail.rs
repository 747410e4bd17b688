//! Per-entity detail aggregation.
//!
//! [`DetailAggregator`] is the one place where an entity's heterogeneous
//! collections are merged into a single [`DetailView`]. Both the single-entity
//! page and [`crate::compare::ComparisonMatrixBuilder`] consume that view, the
//! latter through the [`DetailProvider`] trait.

use serde::Serialize;
use tracing::{error, instrument};

use crate::catalog::Catalog;
use crate::error::EngineError;
use crate::model::{
    AuspiciousRecord, Entity, NayinRecord, PreferenceRecord, RelationType, SymbolismRecord,
};

/// A relation seen from one participant: `other` is the navigable target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelatedEntity {
    pub other: String,
    pub relation_type: RelationType,
    /// True when the subject was the record's source.
    pub outgoing: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remark: Option<String>,
}

/// Everything known about one ganzhi.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailView {
    pub entity: Entity,
    pub nayin: NayinRecord,
    pub symbolism: Vec<SymbolismRecord>,
    pub auspicious: Vec<AuspiciousRecord>,
    pub preferences: Vec<PreferenceRecord>,
    pub relations: Vec<RelatedEntity>,
}

impl DetailView {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.entity.name
    }
}

/// Anything that can resolve a name to a [`DetailView`].
pub trait DetailProvider {
    /// # Errors
    ///
    /// [`EngineError::NotFound`] for unknown names,
    /// [`EngineError::InconsistentData`] for registered names whose required
    /// data is missing.
    fn detail(&self, name: &str) -> Result<DetailView, EngineError>;

    /// Base attributes alone; available even when [`Self::detail`] fails
    /// with `InconsistentData`.
    fn entity(&self, name: &str) -> Option<Entity>;
}

/// Merges registry attributes with catalog records.
#[derive(Debug, Clone, Copy)]
pub struct DetailAggregator<'a> {
    catalog: &'a Catalog,
}

impl<'a> DetailAggregator<'a> {
    #[must_use]
    pub const fn new(catalog: &'a Catalog) -> Self {
        Self { catalog }
    }

    /// Build the detail view for `name`.
    ///
    /// Relations from both directions are merged in catalog order; a
    /// self-relation lists the entity itself as `other`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::NotFound`] if `name` is not registered and
    /// [`EngineError::InconsistentData`] if it has no nayin record. No
    /// partially populated view is ever returned.
    #[instrument(skip(self))]
    pub fn aggregate(&self, name: &str) -> Result<DetailView, EngineError> {
        let entity = self.catalog.registry().find(name)?;

        let Some(nayin) = self.catalog.nayin(name) else {
            error!(ganzhi = %name, "registered ganzhi has no nayin record");
            return Err(EngineError::InconsistentData {
                name: name.to_string(),
                detail: "missing nayin record".to_string(),
            });
        };

        let relations = self
            .catalog
            .relations()
            .relations_for(name)
            .filter_map(|record| {
                record.other_end(name).map(|other| RelatedEntity {
                    other: other.to_string(),
                    relation_type: record.relation_type.clone(),
                    outgoing: record.source == name,
                    remark: record.remark.clone(),
                })
            })
            .collect();

        Ok(DetailView {
            entity: entity.clone(),
            nayin: nayin.clone(),
            symbolism: self.catalog.symbolism(name).to_vec(),
            auspicious: self.catalog.auspicious(name).to_vec(),
            preferences: self.catalog.preferences(name).to_vec(),
            relations,
        })
    }
}

impl DetailProvider for DetailAggregator<'_> {
    fn detail(&self, name: &str) -> Result<DetailView, EngineError> {
        self.aggregate(name)
    }

    fn entity(&self, name: &str) -> Option<Entity> {
        self.catalog.registry().get(name).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        Element, Fortune, LifeStage, Magnitude, Preference, Provenance, RelationRecord,
        SymbolTier,
    };
    use crate::registry::EntityRegistry;
    use crate::source::Dataset;

    fn catalog() -> Catalog {
        let dataset = Dataset {
            nayin: vec![NayinRecord {
                ganzhi: "甲子".into(),
                name: "海中金".into(),
                element: Element::Metal,
                stage: LifeStage::Death,
                magnitude: Magnitude::Small,
                stage_note: None,
            }],
            relations: vec![
                RelationRecord::new("甲子", "庚午", RelationType::SixClash),
                RelationRecord::new("乙丑", "甲子", RelationType::SixCombination)
                    .with_remark("子丑合"),
                RelationRecord::new("丙寅", "丁卯", RelationType::HalfCombination),
            ],
            symbolism: vec![SymbolismRecord {
                ganzhi: "甲子".into(),
                tier: SymbolTier::Core,
                category: "综合".into(),
                content: "海水".into(),
                description: None,
                provenance: Provenance::Classical,
                confidence: 1.0,
            }],
            auspicious: vec![AuspiciousRecord {
                ganzhi: "甲子".into(),
                name: "金舆".into(),
                kind: "字形神煞".into(),
                fortune: Fortune::Auspicious,
                description: None,
                self_seated: false,
            }],
            preferences: vec![PreferenceRecord {
                ganzhi: "甲子".into(),
                preference: Preference::Favorable,
                target_kind: "五行".into(),
                target_value: "火".into(),
                remark: None,
            }],
        };
        Catalog::load(EntityRegistry::build().expect("registry"), dataset).expect("load")
    }

    #[test]
    fn merges_everything_for_an_entity() {
        let catalog = catalog();
        let view = DetailAggregator::new(&catalog)
            .aggregate("甲子")
            .expect("甲子 aggregates");

        assert_eq!(view.name(), "甲子");
        assert_eq!(view.nayin.name, "海中金");
        assert_eq!(view.symbolism.len(), 1);
        assert_eq!(view.auspicious.len(), 1);
        assert_eq!(view.preferences.len(), 1);

        let others: Vec<&str> = view.relations.iter().map(|r| r.other.as_str()).collect();
        assert_eq!(others, vec!["庚午", "乙丑"]);
        assert!(view.relations[0].outgoing);
        assert!(!view.relations[1].outgoing);
        assert_eq!(view.relations[1].remark.as_deref(), Some("子丑合"));
    }

    #[test]
    fn unknown_name_is_not_found() {
        let catalog = catalog();
        let err = DetailAggregator::new(&catalog).aggregate("无效").unwrap_err();
        assert!(matches!(err, EngineError::NotFound { .. }));
    }

    #[test]
    fn missing_nayin_is_inconsistent_data() {
        let catalog = catalog();
        let err = DetailAggregator::new(&catalog).aggregate("乙丑").unwrap_err();
        assert!(matches!(err, EngineError::InconsistentData { ref name, .. } if name == "乙丑"));
    }

    #[test]
    fn provider_entity_survives_missing_nayin() {
        let catalog = catalog();
        let agg = DetailAggregator::new(&catalog);
        assert_eq!(agg.entity("乙丑").map(|e| e.name), Some("乙丑".to_string()));
        assert!(agg.entity("无效").is_none());
    }
}
