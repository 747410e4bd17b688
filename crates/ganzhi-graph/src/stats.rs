//! Summary statistics for a relation graph.
//!
//! Relations are symmetric, so degree and density treat the graph as
//! undirected. Density counts distinct unordered pairs and ignores self
//! loops: `density = pairs / (n * (n - 1) / 2)`. Parallel edges raise
//! `edge_count` but not density.

use std::collections::{BTreeMap, HashSet};

use petgraph::Direction;
use petgraph::algo::connected_components;
use petgraph::visit::{EdgeRef, IntoNodeIdentifiers};
use serde::Serialize;

use crate::build::{NodeCategory, RelationGraph};

// ---------------------------------------------------------------------------
// GraphStats
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphStats {
    pub node_count: usize,
    pub edge_count: usize,
    /// Linked pairs over possible pairs, 0.0 for fewer than two nodes.
    pub density: f64,
    /// Connected components, ignoring edge orientation.
    pub component_count: usize,
    /// Edges whose source and target coincide (自刑).
    pub self_loop_count: usize,
    /// Highest undirected degree; a self loop counts twice.
    pub max_degree: usize,
    /// The node holding `max_degree`, earliest in node order on ties.
    pub hub: Option<String>,
    /// Edge count per relation label.
    pub edges_by_type: BTreeMap<String, usize>,
    /// Node count per category label.
    pub nodes_by_category: BTreeMap<&'static str, usize>,
}

impl GraphStats {
    #[must_use]
    pub fn from_graph(rg: &RelationGraph) -> Self {
        let g = &rg.graph;
        let node_count = g.node_count();
        let edge_count = g.edge_count();

        let mut pairs = HashSet::new();
        let mut self_loop_count = 0;
        let mut edges_by_type: BTreeMap<String, usize> = BTreeMap::new();
        for edge in g.edge_references() {
            let (a, b) = (edge.source(), edge.target());
            if a == b {
                self_loop_count += 1;
            } else {
                pairs.insert((a.min(b), a.max(b)));
            }
            *edges_by_type
                .entry(edge.weight().relation_type.label().to_string())
                .or_default() += 1;
        }

        let mut max_degree = 0;
        let mut hub = None;
        for idx in g.node_identifiers() {
            let degree = g.edges_directed(idx, Direction::Outgoing).count()
                + g.edges_directed(idx, Direction::Incoming).count();
            if degree > max_degree {
                max_degree = degree;
                hub = Some(g[idx].name.clone());
            }
        }

        let mut nodes_by_category: BTreeMap<&'static str, usize> = BTreeMap::new();
        for node in g.node_weights() {
            *nodes_by_category.entry(node.category.label()).or_default() += 1;
        }

        Self {
            node_count,
            edge_count,
            density: compute_density(node_count, pairs.len()),
            component_count: connected_components(g),
            self_loop_count,
            max_degree,
            hub,
            edges_by_type,
            nodes_by_category,
        }
    }

    #[must_use]
    pub fn category_count(&self, category: NodeCategory) -> usize {
        self.nodes_by_category
            .get(category.label())
            .copied()
            .unwrap_or(0)
    }
}

// ---------------------------------------------------------------------------
// Internal helpers (cast precision suppressed at function scope)
// ---------------------------------------------------------------------------

#[allow(clippy::cast_precision_loss)]
fn compute_density(node_count: usize, pair_count: usize) -> f64 {
    if node_count < 2 {
        return 0.0_f64;
    }
    let max_pairs = (node_count * (node_count - 1) / 2) as f64;
    pair_count as f64 / max_pairs
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
