//! Relation and node colors.
//!
//! The default palette covers the nine known relation types and the three
//! node categories. Project config may override any relation color by label,
//! including labels outside the known set.

use std::collections::BTreeMap;

use ganzhi_core::model::RelationType;
use tracing::warn;

use crate::build::NodeCategory;

/// Color lookup for a graph render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleSheet {
    relation_colors: BTreeMap<RelationType, String>,
    stem_color: String,
    branch_color: String,
    balanced_color: String,
}

impl Default for StyleSheet {
    fn default() -> Self {
        let relation_colors = [
            (RelationType::SixCombination, "#52c41a"),
            (RelationType::ThreeCombination, "#1890ff"),
            (RelationType::HalfCombination, "#13c2c2"),
            (RelationType::SixClash, "#f5222d"),
            (RelationType::SixHarm, "#faad14"),
            (RelationType::ThreePunishment, "#eb2f96"),
            (RelationType::SelfPunishment, "#722ed1"),
            (RelationType::SamePosition, "#fa8c16"),
            (RelationType::BegetsAfterEight, "#2f54eb"),
        ]
        .into_iter()
        .map(|(t, c)| (t, c.to_string()))
        .collect();

        Self {
            relation_colors,
            stem_color: "#1890ff".to_string(),
            branch_color: "#52c41a".to_string(),
            balanced_color: "#722ed1".to_string(),
        }
    }
}

impl StyleSheet {
    /// Color for relation types with no palette entry.
    pub const DEFAULT_RELATION_COLOR: &'static str = "#999999";

    /// The default palette with `overrides` applied.
    ///
    /// Keys are relation labels or aliases; values must look like `#rrggbb`.
    /// Malformed colors are skipped with a warning.
    #[must_use]
    pub fn with_overrides(overrides: &BTreeMap<String, String>) -> Self {
        let mut sheet = Self::default();
        for (key, color) in overrides {
            if !is_hex_color(color) {
                warn!(relation = %key, color = %color, "ignoring malformed graph color");
                continue;
            }
            sheet
                .relation_colors
                .insert(RelationType::parse(key), color.clone());
        }
        sheet
    }

    #[must_use]
    pub fn relation_color(&self, relation_type: &RelationType) -> &str {
        self.relation_colors
            .get(relation_type)
            .map_or(Self::DEFAULT_RELATION_COLOR, String::as_str)
    }

    #[must_use]
    pub fn category_color(&self, category: NodeCategory) -> &str {
        match category {
            NodeCategory::Stem => &self.stem_color,
            NodeCategory::Branch => &self.branch_color,
            NodeCategory::Balanced => &self.balanced_color,
        }
    }

    /// `(relation type, color)` pairs in canonical type order, for legends.
    pub fn legend(&self) -> impl Iterator<Item = (&RelationType, &str)> {
        self.relation_colors.iter().map(|(t, c)| (t, c.as_str()))
    }
}

fn is_hex_color(raw: &str) -> bool {
    raw.strip_prefix('#').is_some_and(|hex| {
        matches!(hex.len(), 3 | 6) && hex.chars().all(|c| c.is_ascii_hexdigit())
    })
}
