//! `gz types`: relation types present in the catalog.

use std::io::{self, Write};

use serde::Serialize;

use ganzhi_core::model::RelationType;
use ganzhi_graph::StyleSheet;

use crate::cmd::Context;
use crate::output::{Renderable, pad, render_list};

#[derive(Debug, Serialize)]
pub struct TypeRow {
    pub relation_type: RelationType,
    pub count: usize,
    pub color: String,
    /// False for types outside the standard nine.
    pub known: bool,
}

impl Renderable for TypeRow {
    fn render_human(&self, w: &mut dyn Write) -> io::Result<()> {
        let marker = if self.known { "" } else { "  (custom)" };
        writeln!(
            w,
            "{} {:>4}  {}{marker}",
            pad(self.relation_type.label(), 10),
            self.count,
            self.color
        )
    }

    fn render_table(&self, w: &mut dyn Write) -> io::Result<()> {
        writeln!(
            w,
            "{}\t{}\t{}\t{}",
            self.relation_type, self.count, self.color, self.known
        )
    }

    fn table_headers() -> &'static [&'static str] {
        &["relation_type", "count", "color", "known"]
    }
}

/// Execute `gz types`.
///
/// # Errors
///
/// Returns an error if the dataset fails to load or output fails.
pub fn run_types(ctx: &Context) -> anyhow::Result<()> {
    let catalog = ctx.catalog()?;
    let relations = catalog.relations();
    let styles = StyleSheet::with_overrides(&ctx.config.project.graph.colors);

    let rows: Vec<TypeRow> = relations
        .distinct_types()
        .iter()
        .map(|t| TypeRow {
            relation_type: t.clone(),
            count: relations.of_type(t).len(),
            color: styles.relation_color(t).to_string(),
            known: t.is_known(),
        })
        .collect();

    render_list(&rows, ctx.output)
}
