//! `gz list`: the sixty ganzhi with their base attributes.

use std::io::{self, Write};

use clap::Args;
use serde::Serialize;

use ganzhi_core::model::{Element, Entity};

use crate::cmd::{Context, parse_arg};
use crate::output::{Renderable, pad, render_list};

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Only names containing this text (either character, or both).
    #[arg(long, short)]
    pub search: Option<String>,

    /// Only ganzhi whose stem element matches (木, 火, … or wood, fire, …).
    #[arg(long)]
    pub element: Option<String>,
}

/// One row of `gz list` output.
#[derive(Debug, Serialize)]
pub struct ListRow<'a> {
    #[serde(flatten)]
    pub entity: &'a Entity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nayin: Option<&'a str>,
}

impl Renderable for ListRow<'_> {
    fn render_human(&self, w: &mut dyn Write) -> io::Result<()> {
        let e = self.entity;
        writeln!(
            w,
            "{:>2}  {}  {}{}  {}  {}  {}{}",
            e.cycle_index + 1,
            e.name,
            e.stem_element,
            e.branch_element,
            e.polarity,
            pad(e.direction.label(), 4),
            e.season,
            self.nayin.map(|n| format!("  {n}")).unwrap_or_default(),
        )
    }

    fn render_table(&self, w: &mut dyn Write) -> io::Result<()> {
        let e = self.entity;
        writeln!(
            w,
            "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
            e.name,
            e.stem_element,
            e.branch_element,
            e.polarity,
            e.direction,
            e.season,
            e.month,
            self.nayin.unwrap_or("-"),
        )
    }

    fn table_headers() -> &'static [&'static str] {
        &[
            "name",
            "stem_element",
            "branch_element",
            "polarity",
            "direction",
            "season",
            "month",
            "nayin",
        ]
    }
}

/// Execute `gz list`.
///
/// Works without a dataset; nayin names are shown when one is configured.
///
/// # Errors
///
/// Returns an error if a configured dataset fails to load or output fails.
pub fn run_list(args: &ListArgs, ctx: &Context) -> anyhow::Result<()> {
    let element: Option<Element> = args
        .element
        .as_deref()
        .map(|raw| parse_arg(ctx.output, raw))
        .transpose()?;

    let catalog = ctx.catalog_or_registry()?;
    let registry = catalog.registry();
    let entities: Vec<&Entity> = match args.search.as_deref() {
        Some(query) => registry.search(query),
        None => registry.list_all().iter().collect(),
    };

    let rows: Vec<ListRow<'_>> = entities
        .into_iter()
        .filter(|e| element.is_none_or(|el| e.stem_element == el))
        .map(|entity| ListRow {
            entity,
            nayin: catalog.nayin(&entity.name).map(|n| n.name.as_str()),
        })
        .collect();

    render_list(&rows, ctx.output)
}
