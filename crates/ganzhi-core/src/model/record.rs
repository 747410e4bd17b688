//! Records supplied by the catalog source.
//!
//! Field names accept the legacy export spellings as serde aliases
//! (`ganzhi1`/`ganzhi2`, `nayin_name`, `zhuangtai`, …) so existing dumps load
//! without a conversion step.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::cycle::Element;

// ---------------------------------------------------------------------------
// Nayin
// ---------------------------------------------------------------------------

labeled_enum! {
    /// The twelve life-cycle stages (十二长生).
    pub enum LifeStage ("life stage") {
        Birth => "长生" | "birth",
        Bath => "沐浴" | "bath",
        Capping => "冠带" | "capping",
        Office => "临官" | "office",
        Prime => "帝旺" | "prime",
        Decline => "衰" | "decline",
        Sickness => "病" | "sickness",
        Death => "死" | "death",
        Tomb => "墓" | "tomb",
        Extinction => "绝" | "extinction",
        Conception => "胎" | "conception",
        Nurture => "养" | "nurture",
    }
}

labeled_enum! {
    /// Binary magnitude of a nayin (盛大 / 小弱).
    pub enum Magnitude ("magnitude") {
        Grand => "盛大" | "grand",
        Small => "小弱" | "small",
    }
}

/// Nayin classification of one ganzhi (1:1).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NayinRecord {
    pub ganzhi: String,
    #[serde(alias = "nayin_name")]
    pub name: String,
    #[serde(alias = "nayin_wuxing")]
    pub element: Element,
    #[serde(alias = "zhuangtai")]
    pub stage: LifeStage,
    #[serde(alias = "shengda_xiaoruo")]
    pub magnitude: Magnitude,
    #[serde(default, alias = "zhuangtai_desc", skip_serializing_if = "Option::is_none")]
    pub stage_note: Option<String>,
}

// ---------------------------------------------------------------------------
// Relations
// ---------------------------------------------------------------------------

/// Classification of a pairwise relation.
///
/// The closed set covers every type the catalog is expected to carry; a value
/// outside it is kept verbatim in [`RelationType::Other`] so downstream
/// styling can fall back to a default instead of rejecting the record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RelationType {
    SixCombination,
    ThreeCombination,
    HalfCombination,
    SixClash,
    SixHarm,
    ThreePunishment,
    SelfPunishment,
    SamePosition,
    BegetsAfterEight,
    Other(String),
}

impl RelationType {
    /// The closed set, in canonical order.
    pub const KNOWN: [Self; 9] = [
        Self::SixCombination,
        Self::ThreeCombination,
        Self::HalfCombination,
        Self::SixClash,
        Self::SixHarm,
        Self::ThreePunishment,
        Self::SelfPunishment,
        Self::SamePosition,
        Self::BegetsAfterEight,
    ];

    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::SixCombination => "六合",
            Self::ThreeCombination => "三合",
            Self::HalfCombination => "半合",
            Self::SixClash => "六冲",
            Self::SixHarm => "六害",
            Self::ThreePunishment => "三刑",
            Self::SelfPunishment => "自刑",
            Self::SamePosition => "同位",
            Self::BegetsAfterEight => "隔八生子",
            Self::Other(raw) => raw,
        }
    }

    const fn alias(&self) -> Option<&'static str> {
        match self {
            Self::SixCombination => Some("six_combination"),
            Self::ThreeCombination => Some("three_combination"),
            Self::HalfCombination => Some("half_combination"),
            Self::SixClash => Some("six_clash"),
            Self::SixHarm => Some("six_harm"),
            Self::ThreePunishment => Some("three_punishment"),
            Self::SelfPunishment => Some("self_punishment"),
            Self::SamePosition => Some("same_position"),
            Self::BegetsAfterEight => Some("begets_after_eight"),
            Self::Other(_) => None,
        }
    }

    /// Whether this type belongs to the closed set.
    #[must_use]
    pub const fn is_known(&self) -> bool {
        !matches!(self, Self::Other(_))
    }

    /// Parse a label or alias; never fails, unknown input becomes `Other`.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        Self::KNOWN
            .into_iter()
            .find(|t| {
                t.label() == trimmed
                    || t.alias().is_some_and(|a| a.eq_ignore_ascii_case(trimmed))
            })
            .unwrap_or_else(|| Self::Other(trimmed.to_string()))
    }
}

impl fmt::Display for RelationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl From<String> for RelationType {
    fn from(raw: String) -> Self {
        Self::parse(&raw)
    }
}

impl From<RelationType> for String {
    fn from(value: RelationType) -> Self {
        value.label().to_string()
    }
}

/// A pairwise relation between two ganzhi.
///
/// Self-relations (自刑) have `source == target`. Several records may exist
/// for the same pair with different types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationRecord {
    #[serde(alias = "ganzhi1")]
    pub source: String,
    #[serde(alias = "ganzhi2")]
    pub target: String,
    pub relation_type: RelationType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remark: Option<String>,
}

impl RelationRecord {
    pub fn new(
        source: impl Into<String>,
        target: impl Into<String>,
        relation_type: RelationType,
    ) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            relation_type,
            remark: None,
        }
    }

    #[must_use]
    pub fn with_remark(mut self, remark: impl Into<String>) -> Self {
        self.remark = Some(remark.into());
        self
    }

    /// True if `name` is either endpoint.
    #[must_use]
    pub fn involves(&self, name: &str) -> bool {
        self.source == name || self.target == name
    }

    /// The endpoint opposite `name`, or `None` if `name` is not an endpoint.
    #[must_use]
    pub fn other_end(&self, name: &str) -> Option<&str> {
        if self.source == name {
            Some(&self.target)
        } else if self.target == name {
            Some(&self.source)
        } else {
            None
        }
    }

    /// True if the record links `a` and `b` in either direction.
    #[must_use]
    pub fn connects(&self, a: &str, b: &str) -> bool {
        (self.source == a && self.target == b) || (self.source == b && self.target == a)
    }
}

// ---------------------------------------------------------------------------
// Annotations
// ---------------------------------------------------------------------------

labeled_enum! {
    /// Depth of a symbolism entry.
    pub enum SymbolTier ("symbol tier") {
        Core => "核心" | "core",
        Detailed => "细分" | "detailed",
        Combined => "组合" | "combined",
    }
}

labeled_enum! {
    /// Where a symbolism entry comes from.
    pub enum Provenance ("provenance") {
        Classical => "原文" | "classical",
        Inferred => "推理" | "inferred",
    }
}

labeled_enum! {
    /// Fortune attached to an auspicious entity (神煞).
    pub enum Fortune ("fortune") {
        Auspicious => "吉" | "auspicious",
        Inauspicious => "凶" | "inauspicious",
        Neutral => "平" | "neutral",
    }
}

labeled_enum! {
    /// Favorable (喜) or unfavorable (忌).
    pub enum Preference ("preference") {
        Favorable => "喜" | "favorable",
        Unfavorable => "忌" | "unfavorable",
    }
}

/// A symbolic meaning (象意) attached to a ganzhi.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolismRecord {
    pub ganzhi: String,
    #[serde(alias = "type")]
    pub tier: SymbolTier,
    pub category: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default = "default_provenance", alias = "source")]
    pub provenance: Provenance,
    #[serde(default = "default_confidence")]
    pub confidence: f64,
}

/// An auspicious or inauspicious entity (神煞) carried by a ganzhi.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuspiciousRecord {
    pub ganzhi: String,
    pub name: String,
    #[serde(default, alias = "type")]
    pub kind: String,
    #[serde(alias = "jixiong")]
    pub fortune: Fortune,
    #[serde(default, alias = "modern_desc", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// The entity sits in the ganzhi's own pillar (自坐).
    #[serde(default, alias = "is_zixing")]
    pub self_seated: bool,
}

/// A favorable/unfavorable annotation (喜忌) for a ganzhi.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreferenceRecord {
    pub ganzhi: String,
    #[serde(alias = "type")]
    pub preference: Preference,
    pub target_kind: String,
    pub target_value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remark: Option<String>,
}

const fn default_provenance() -> Provenance {
    Provenance::Classical
}

const fn default_confidence() -> f64 {
    1.0
}

/// Records owned by exactly one ganzhi.
pub trait EntityScoped {
    /// Name of the owning ganzhi.
    fn ganzhi(&self) -> &str;
}

impl EntityScoped for NayinRecord {
    fn ganzhi(&self) -> &str {
        &self.ganzhi
    }
}

impl EntityScoped for SymbolismRecord {
    fn ganzhi(&self) -> &str {
        &self.ganzhi
    }
}

impl EntityScoped for AuspiciousRecord {
    fn ganzhi(&self) -> &str {
        &self.ganzhi
    }
}

impl EntityScoped for PreferenceRecord {
    fn ganzhi(&self) -> &str {
        &self.ganzhi
    }
}
