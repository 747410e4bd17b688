use serde::Serialize;

use super::cycle::{Branch, Direction, Element, Polarity, Season, Stem};

/// One of the sixty sexagenary combinations.
///
/// Entities are created once by [`crate::registry::EntityRegistry`] and never
/// mutated; identity is the two-character [`Entity::name`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entity {
    /// Stem followed by branch, e.g. `甲子`.
    pub name: String,
    /// Zero-based position in the cycle (甲子 = 0, 癸亥 = 59).
    pub cycle_index: usize,
    pub stem: Stem,
    pub branch: Branch,
    pub stem_element: Element,
    pub branch_element: Element,
    /// Polarity of the stem; the pairing rule makes the branch agree.
    pub polarity: Polarity,
    pub direction: Direction,
    pub season: Season,
    /// Lunar month of the branch (正月 … 十二月).
    pub month: &'static str,
}

impl Entity {
    pub(crate) fn new(cycle_index: usize, stem: Stem, branch: Branch) -> Self {
        Self {
            name: format!("{}{}", stem.label(), branch.label()),
            cycle_index,
            stem,
            branch,
            stem_element: stem.element(),
            branch_element: branch.element(),
            polarity: stem.polarity(),
            direction: branch.direction(),
            season: branch.season(),
            month: branch.month(),
        }
    }
}
