//! Property tests for the registry and the comparison matrix shape.

use std::collections::HashSet;

use proptest::prelude::*;

use ganzhi_core::model::{Element, LifeStage, Magnitude, NayinRecord};
use ganzhi_core::{
    Catalog, CompareField, ComparisonMatrixBuilder, Dataset, DetailAggregator, EntityRegistry,
};

fn full_catalog() -> Catalog {
    let registry = EntityRegistry::build().expect("registry");
    let nayin = registry
        .list_all()
        .iter()
        .map(|e| NayinRecord {
            ganzhi: e.name.clone(),
            name: format!("纳音{}", e.cycle_index / 2),
            element: Element::ALL[e.cycle_index % 5],
            stage: LifeStage::ALL[e.cycle_index % 12],
            magnitude: if e.cycle_index % 2 == 0 {
                Magnitude::Grand
            } else {
                Magnitude::Small
            },
            stage_note: None,
        })
        .collect();
    Catalog::load(
        registry,
        Dataset {
            nayin,
            ..Dataset::default()
        },
    )
    .expect("load")
}

#[test]
fn registry_has_sixty_unique_decomposable_names() {
    let registry = EntityRegistry::build().expect("registry");
    let names: HashSet<&str> = registry.list_all().iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names.len(), 60);

    for entity in registry.list_all() {
        let (stem, branch) =
            EntityRegistry::decompose(&entity.name).expect("registered names decompose");
        assert_eq!((stem, branch), (entity.stem, entity.branch));
        assert_eq!(format!("{stem}{branch}"), entity.name);
    }
}

#[test]
fn registry_builds_identically_twice() {
    let a = EntityRegistry::build().expect("registry");
    let b = EntityRegistry::build().expect("registry");
    assert_eq!(a.list_all(), b.list_all());
}

proptest! {
    #[test]
    fn matrix_columns_follow_selection_order(
        picks in proptest::sample::subsequence((0usize..60).collect::<Vec<_>>(), 2..=10)
            .prop_shuffle()
    ) {
        let catalog = full_catalog();
        let names: Vec<String> = picks
            .iter()
            .map(|&i| catalog.registry().list_all()[i].name.clone())
            .collect();

        let agg = DetailAggregator::new(&catalog);
        let matrix = ComparisonMatrixBuilder::new().build(&names, &agg);

        prop_assert_eq!(&matrix.columns, &names);
        prop_assert_eq!(matrix.rows.len(), CompareField::ALL.len());
        for row in &matrix.rows {
            prop_assert_eq!(row.cells.len(), names.len());
        }
        for (col, name) in names.iter().enumerate() {
            let entity = catalog.registry().find(name).expect("registered");
            let stem = &matrix.row(CompareField::Stem).expect("stem row").cells[col];
            prop_assert_eq!(stem.display(), entity.stem.label());
        }
    }

    #[test]
    fn unknown_names_never_resolve(name in "\\PC{1,4}") {
        let registry = EntityRegistry::build().expect("registry");
        prop_assert_eq!(
            registry.find(&name).is_ok(),
            EntityRegistry::decompose(&name).is_some()
        );
    }
}
