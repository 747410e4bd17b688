//! `gz graph`: relation graph for force-directed renderers.
//!
//! - `gz graph`: every relation in the catalog
//! - `gz graph --type 六冲`: only one relation type
//!
//! Nodes are exactly the endpoints of the retained relations, so a narrower
//! filter also drops nodes. A filter with no matches prints an empty graph
//! and exits successfully.

use std::io::{self, Write};

use clap::Args;
use serde::Serialize;

use ganzhi_core::model::RelationType;
use ganzhi_graph::{GraphBuilder, GraphStats, GraphView, StyleSheet};

use crate::cmd::Context;
use crate::output::{fail, pad, pretty_kv, pretty_section, render_mode};

// ---------------------------------------------------------------------------
// Clap types
// ---------------------------------------------------------------------------

#[derive(Args, Debug)]
pub struct GraphArgs {
    /// Keep only this relation type (六合, 六冲, … or six_clash, …).
    #[arg(long = "type", short = 't', value_name = "TYPE")]
    pub relation_type: Option<String>,

    /// Include summary statistics.
    #[arg(long)]
    pub stats: bool,
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct GraphOutput {
    pub filter: Option<RelationType>,
    pub content_hash: String,
    #[serde(flatten)]
    pub view: GraphView,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<GraphStats>,
}

/// Execute `gz graph`.
///
/// # Errors
///
/// Returns an error if the dataset fails to load, a relation names an
/// unknown ganzhi, or output rendering fails.
pub fn run_graph(args: &GraphArgs, ctx: &Context) -> anyhow::Result<()> {
    let filter = args.relation_type.as_deref().map(RelationType::parse);
    let catalog = ctx.catalog()?;

    let graph = GraphBuilder::new(catalog.registry())
        .build_from_catalog(catalog.relations(), filter.as_ref())
        .map_err(|err| fail(ctx.output, &err))?;

    let styles = StyleSheet::with_overrides(&ctx.config.project.graph.colors);
    let output = GraphOutput {
        filter,
        content_hash: graph.content_hash.clone(),
        view: graph.view(&styles),
        stats: args.stats.then(|| GraphStats::from_graph(&graph)),
    };

    render_mode(ctx.output, &output, render_text, render_pretty)
}

fn render_text(out: &GraphOutput, w: &mut dyn Write) -> io::Result<()> {
    for node in &out.view.nodes {
        writeln!(w, "node\t{}\t{}\t{}", node.name, node.category.label(), node.color)?;
    }
    for link in &out.view.links {
        writeln!(
            w,
            "link\t{}\t{}\t{}\t{}",
            link.source, link.target, link.relation_type, link.color
        )?;
    }
    if let Some(stats) = &out.stats {
        writeln!(
            w,
            "stats\tnodes={}\tedges={}\tcomponents={}\tdensity={:.3}",
            stats.node_count, stats.edge_count, stats.component_count, stats.density
        )?;
    }
    Ok(())
}

fn render_pretty(out: &GraphOutput, w: &mut dyn Write) -> io::Result<()> {
    let scope = out
        .filter
        .as_ref()
        .map_or_else(|| "全部关系".to_string(), ToString::to_string);

    if out.view.nodes.is_empty() {
        writeln!(w, "no relations match filter '{scope}'")?;
        return Ok(());
    }

    pretty_section(
        w,
        &format!(
            "关系图 ({scope}): {} nodes, {} links",
            out.view.nodes.len(),
            out.view.links.len()
        ),
    )?;
    for link in &out.view.links {
        writeln!(
            w,
            "{}  {} ── {}",
            pad(link.relation_type.label(), 10),
            link.source,
            link.target
        )?;
    }

    if let Some(stats) = &out.stats {
        writeln!(w)?;
        pretty_section(w, "统计")?;
        pretty_kv(w, "nodes", stats.node_count.to_string())?;
        pretty_kv(w, "edges", stats.edge_count.to_string())?;
        pretty_kv(w, "components", stats.component_count.to_string())?;
        pretty_kv(w, "density", format!("{:.3}", stats.density))?;
        pretty_kv(w, "self loops", stats.self_loop_count.to_string())?;
        if let Some(hub) = &stats.hub {
            pretty_kv(w, "hub", format!("{hub} (degree {})", stats.max_degree))?;
        }
        for (label, count) in &stats.edges_by_type {
            pretty_kv(w, label, count.to_string())?;
        }
    }
    Ok(())
}
