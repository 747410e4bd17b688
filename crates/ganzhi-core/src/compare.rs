//! Side-by-side comparison matrices.
//!
//! # Shape
//!
//! A [`ComparisonMatrix`] has one row per [`CompareField`] (always all of
//! them, in [`CompareField::ALL`] order) and one column per selected name, in
//! the order the caller supplied. Reordering the selection reorders the
//! columns and nothing else.
//!
//! # Caller contract
//!
//! [`ComparisonMatrixBuilder::build`] expects 2–10 distinct names but does not
//! check: callers that accept user input run [`validate_selection`] first.
//! An unregistered name yields a column of [`Cell::Unavailable`]. A
//! registered name whose aggregation fails keeps its base attributes and
//! only the nayin rows go unavailable.

use std::collections::HashSet;

use serde::Serialize;
use tracing::{debug, instrument, warn};

use crate::detail::{DetailProvider, DetailView};
use crate::error::EngineError;
use crate::model::{Entity, NayinRecord};

// ---------------------------------------------------------------------------
// Fields
// ---------------------------------------------------------------------------

/// Display fields of the comparison table, in canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CompareField {
    Stem,
    Branch,
    StemElement,
    BranchElement,
    Polarity,
    Direction,
    Season,
    NayinName,
    NayinElement,
    LifeStage,
    /// Pseudo-field reserved for UI affordances (e.g. a "view details" link).
    Action,
}

/// Where a field's value comes from.
#[derive(Clone, Copy)]
enum Extractor {
    Entity(fn(&Entity) -> String),
    Nayin(fn(&NayinRecord) -> String),
}

impl CompareField {
    pub const ALL: [Self; 11] = [
        Self::Stem,
        Self::Branch,
        Self::StemElement,
        Self::BranchElement,
        Self::Polarity,
        Self::Direction,
        Self::Season,
        Self::NayinName,
        Self::NayinElement,
        Self::LifeStage,
        Self::Action,
    ];

    /// Row heading shown to users.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Stem => "天干",
            Self::Branch => "地支",
            Self::StemElement => "天干五行",
            Self::BranchElement => "地支五行",
            Self::Polarity => "阴阳",
            Self::Direction => "方位",
            Self::Season => "季节",
            Self::NayinName => "纳音",
            Self::NayinElement => "纳音五行",
            Self::LifeStage => "长生状态",
            Self::Action => "操作",
        }
    }

    /// Value extractor; `None` for fields that carry no data.
    fn extractor(self) -> Option<Extractor> {
        let f = match self {
            Self::Stem => Extractor::Entity(|e: &Entity| e.stem.label().to_string()),
            Self::Branch => Extractor::Entity(|e: &Entity| e.branch.label().to_string()),
            Self::StemElement => Extractor::Entity(|e: &Entity| e.stem_element.label().to_string()),
            Self::BranchElement => Extractor::Entity(|e: &Entity| e.branch_element.label().to_string()),
            Self::Polarity => Extractor::Entity(|e: &Entity| e.polarity.label().to_string()),
            Self::Direction => Extractor::Entity(|e: &Entity| e.direction.label().to_string()),
            Self::Season => Extractor::Entity(|e: &Entity| e.season.label().to_string()),
            Self::NayinName => Extractor::Nayin(|n: &NayinRecord| n.name.clone()),
            Self::NayinElement => Extractor::Nayin(|n: &NayinRecord| n.element.label().to_string()),
            Self::LifeStage => Extractor::Nayin(|n: &NayinRecord| n.stage.label().to_string()),
            Self::Action => return None,
        };
        Some(f)
    }
}

/// What one column resolved to.
#[derive(Debug)]
enum Column {
    Detail(DetailView),
    /// Registered, but aggregation failed.
    Base(Entity),
    Missing,
}

impl Column {
    fn resolve(name: &str, provider: &dyn DetailProvider) -> Self {
        match provider.detail(name) {
            Ok(view) => Self::Detail(view),
            Err(err @ EngineError::InconsistentData { .. }) => {
                warn!(ganzhi = %name, error = %err, "comparison column limited to base attributes");
                provider.entity(name).map_or(Self::Missing, Self::Base)
            }
            Err(err) => {
                warn!(ganzhi = %name, error = %err, "comparison column unavailable");
                Self::Missing
            }
        }
    }

    const fn entity(&self) -> Option<&Entity> {
        match self {
            Self::Detail(view) => Some(&view.entity),
            Self::Base(entity) => Some(entity),
            Self::Missing => None,
        }
    }

    const fn nayin(&self) -> Option<&NayinRecord> {
        match self {
            Self::Detail(view) => Some(&view.nayin),
            Self::Base(_) | Self::Missing => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Matrix
// ---------------------------------------------------------------------------

/// One table cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Cell {
    Value(String),
    /// No data: unknown entity, missing nayin, or a blank field.
    Unavailable,
    /// Slot for a UI affordance.
    Action,
}

impl Cell {
    /// Text for plain renderers.
    #[must_use]
    pub fn display(&self) -> &str {
        match self {
            Self::Value(v) => v,
            Self::Unavailable => "-",
            Self::Action => "",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompareRow {
    pub field: CompareField,
    pub label: &'static str,
    /// One cell per column, aligned with [`ComparisonMatrix::columns`].
    pub cells: Vec<Cell>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComparisonMatrix {
    pub columns: Vec<String>,
    pub rows: Vec<CompareRow>,
}

impl ComparisonMatrix {
    #[must_use]
    pub fn row(&self, field: CompareField) -> Option<&CompareRow> {
        self.rows.iter().find(|r| r.field == field)
    }

    /// Cell for `field` in the column named `name`.
    #[must_use]
    pub fn cell(&self, field: CompareField, name: &str) -> Option<&Cell> {
        let col = self.columns.iter().position(|c| c == name)?;
        self.row(field)?.cells.get(col)
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Pivots detail views into a field × entity table.
#[derive(Debug, Clone, Copy, Default)]
pub struct ComparisonMatrixBuilder;

impl ComparisonMatrixBuilder {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Build the matrix for `selected`, resolving each column through
    /// `provider` once (plus an entity lookup when aggregation fails).
    #[instrument(skip_all, fields(columns = selected.len()))]
    pub fn build<S: AsRef<str>>(
        &self,
        selected: &[S],
        provider: &dyn DetailProvider,
    ) -> ComparisonMatrix {
        let columns: Vec<Column> = selected
            .iter()
            .map(|name| Column::resolve(name.as_ref(), provider))
            .collect();

        let rows = CompareField::ALL
            .iter()
            .map(|&field| CompareRow {
                field,
                label: field.label(),
                cells: columns.iter().map(|c| resolve_cell(field, c)).collect(),
            })
            .collect();

        debug!(rows = CompareField::ALL.len(), "comparison matrix built");
        ComparisonMatrix {
            columns: selected
                .iter()
                .map(|s| <S as AsRef<str>>::as_ref(s).to_owned())
                .collect(),
            rows,
        }
    }
}

fn resolve_cell(field: CompareField, column: &Column) -> Cell {
    let Some(extract) = field.extractor() else {
        return Cell::Action;
    };
    let value = match extract {
        Extractor::Entity(f) => column.entity().map(f),
        Extractor::Nayin(f) => column.nayin().map(f),
    };
    match value {
        Some(value) if !value.trim().is_empty() => Cell::Value(value),
        _ => Cell::Unavailable,
    }
}

// ---------------------------------------------------------------------------
// Selection validation
// ---------------------------------------------------------------------------

/// Bounds on how many entities a comparison may hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionLimits {
    pub min: usize,
    pub max: usize,
}

impl Default for SelectionLimits {
    fn default() -> Self {
        Self { min: 2, max: 10 }
    }
}

/// Check the caller contract of [`ComparisonMatrixBuilder::build`].
///
/// # Errors
///
/// Returns [`EngineError::InvalidSelection`] if the selection is outside
/// `limits` or names an entity twice.
pub fn validate_selection<S: AsRef<str>>(
    selected: &[S],
    limits: SelectionLimits,
) -> Result<(), EngineError> {
    if selected.len() < limits.min {
        return Err(EngineError::InvalidSelection(format!(
            "select at least {} ganzhi to compare (got {})",
            limits.min,
            selected.len()
        )));
    }
    if selected.len() > limits.max {
        return Err(EngineError::InvalidSelection(format!(
            "at most {} ganzhi can be compared (got {})",
            limits.max,
            selected.len()
        )));
    }
    let mut seen = HashSet::with_capacity(selected.len());
    for name in selected {
        let name: &str = name.as_ref();
        if !seen.insert(name) {
            return Err(EngineError::InvalidSelection(format!(
                "'{name}' is selected more than once"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::detail::DetailAggregator;
    use crate::model::{Element, LifeStage, Magnitude, NayinRecord};
    use crate::registry::EntityRegistry;
    use crate::source::Dataset;

    fn nayin(ganzhi: &str, name: &str, stage: LifeStage) -> NayinRecord {
        NayinRecord {
            ganzhi: ganzhi.into(),
            name: name.into(),
            element: Element::Metal,
            stage,
            magnitude: Magnitude::Small,
            stage_note: None,
        }
    }

    fn catalog() -> Catalog {
        let dataset = Dataset {
            nayin: vec![
                nayin("甲子", "海中金", LifeStage::Death),
                nayin("乙丑", "海中金", LifeStage::Tomb),
                nayin("丙寅", "", LifeStage::Birth),
            ],
            ..Dataset::default()
        };
        Catalog::load(EntityRegistry::build().expect("registry"), dataset).expect("load")
    }

    #[test]
    fn one_row_per_field_one_column_per_selection() {
        let catalog = catalog();
        let agg = DetailAggregator::new(&catalog);
        let matrix = ComparisonMatrixBuilder::new().build(&["乙丑", "甲子", "庚午"], &agg);

        assert_eq!(matrix.columns, vec!["乙丑", "甲子", "庚午"]);
        assert_eq!(matrix.rows.len(), CompareField::ALL.len());
        for (row, field) in matrix.rows.iter().zip(CompareField::ALL) {
            assert_eq!(row.field, field);
            assert_eq!(row.cells.len(), 3);
        }
    }

    #[test]
    fn stem_element_row_matches_example() {
        let catalog = catalog();
        let agg = DetailAggregator::new(&catalog);
        let matrix = ComparisonMatrixBuilder::new().build(&["甲子", "乙丑"], &agg);
        let row = matrix.row(CompareField::StemElement).expect("row");
        assert_eq!(
            row.cells,
            vec![Cell::Value("木".into()), Cell::Value("木".into())]
        );
        assert_eq!(
            matrix.cell(CompareField::LifeStage, "乙丑"),
            Some(&Cell::Value("墓".into()))
        );
    }

    #[test]
    fn missing_data_is_unavailable_not_blank() {
        let catalog = catalog();
        let agg = DetailAggregator::new(&catalog);
        // 无效 is not registered, 丙寅 has a blank nayin name.
        let matrix = ComparisonMatrixBuilder::new().build(&["无效", "丙寅"], &agg);
        let stems = &matrix.row(CompareField::Stem).expect("row").cells;
        assert_eq!(stems[0], Cell::Unavailable);
        assert_eq!(stems[1], Cell::Value("丙".into()));
        assert_eq!(
            matrix.cell(CompareField::NayinName, "无效"),
            Some(&Cell::Unavailable)
        );
        assert_eq!(
            matrix.cell(CompareField::NayinName, "丙寅"),
            Some(&Cell::Unavailable)
        );
        assert_eq!(
            matrix.cell(CompareField::LifeStage, "丙寅"),
            Some(&Cell::Value("长生".into()))
        );
    }

    #[test]
    fn missing_nayin_keeps_base_attributes() {
        let catalog = catalog();
        let agg = DetailAggregator::new(&catalog);
        // 庚午 is registered but has no nayin record.
        let matrix = ComparisonMatrixBuilder::new().build(&["甲子", "庚午"], &agg);
        assert_eq!(
            matrix.cell(CompareField::Stem, "庚午"),
            Some(&Cell::Value("庚".into()))
        );
        assert_eq!(
            matrix.cell(CompareField::BranchElement, "庚午"),
            Some(&Cell::Value("火".into()))
        );
        for field in [
            CompareField::NayinName,
            CompareField::NayinElement,
            CompareField::LifeStage,
        ] {
            assert_eq!(matrix.cell(field, "庚午"), Some(&Cell::Unavailable));
            assert!(matches!(matrix.cell(field, "甲子"), Some(Cell::Value(_))));
        }
    }

    #[test]
    fn registry_only_catalog_still_compares_base_attributes() {
        let catalog = Catalog::load(EntityRegistry::build().expect("registry"), Dataset::default())
            .expect("load");
        let agg = DetailAggregator::new(&catalog);
        let matrix = ComparisonMatrixBuilder::new().build(&["甲子", "乙丑"], &agg);
        assert_eq!(
            matrix.row(CompareField::Stem).expect("row").cells,
            vec![Cell::Value("甲".into()), Cell::Value("乙".into())]
        );
        assert_eq!(
            matrix.row(CompareField::StemElement).expect("row").cells,
            vec![Cell::Value("木".into()), Cell::Value("木".into())]
        );
        assert_eq!(
            matrix.row(CompareField::NayinName).expect("row").cells,
            vec![Cell::Unavailable, Cell::Unavailable]
        );
    }

    #[test]
    fn action_row_is_reserved() {
        let catalog = catalog();
        let agg = DetailAggregator::new(&catalog);
        let matrix = ComparisonMatrixBuilder::new().build(&["甲子", "乙丑"], &agg);
        let action = matrix.rows.last().expect("rows");
        assert_eq!(action.field, CompareField::Action);
        assert!(action.cells.iter().all(|c| *c == Cell::Action));
    }

    #[test]
    fn build_is_idempotent() {
        let catalog = catalog();
        let agg = DetailAggregator::new(&catalog);
        let builder = ComparisonMatrixBuilder::new();
        assert_eq!(
            builder.build(&["甲子", "乙丑"], &agg),
            builder.build(&["甲子", "乙丑"], &agg)
        );
    }

    #[test]
    fn selection_validation() {
        let limits = SelectionLimits::default();
        assert!(validate_selection(&["甲子"], limits).is_err());
        assert!(validate_selection(&["甲子", "乙丑"], limits).is_ok());
        assert!(validate_selection(&["甲子", "甲子"], limits).is_err());
        let eleven: Vec<String> = (0..11).map(|i| format!("n{i}")).collect();
        assert!(validate_selection(&eleven, limits).is_err());
    }

    #[test]
    fn cells_serialize_with_kind_tag() {
        assert_eq!(
            serde_json::to_string(&Cell::Value("木".into())).unwrap(),
            r#"{"kind":"value","value":"木"}"#
        );
        assert_eq!(
            serde_json::to_string(&Cell::Unavailable).unwrap(),
            r#"{"kind":"unavailable"}"#
        );
    }
}
