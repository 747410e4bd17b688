//! Relation graph construction.
//!
//! # Overview
//!
//! [`GraphBuilder::build`] turns the flat list of relation records into a
//! [`petgraph`] directed graph ready for a force-directed layout. An edge
//! `A → B` is the record `(source = A, target = B)`; orientation is kept only
//! so renderers can draw the record as written, the relation itself is
//! symmetric.
//!
//! ## Node derivation
//!
//! A node exists **iff** it is an endpoint of at least one retained record.
//! Entities with no relation under the active filter are absent, even though
//! the registry still knows them, so changing the filter changes the node set
//! as well as the edge set. A filter that matches nothing produces an empty
//! graph, which is a valid result rather than an error.
//!
//! ## Ordering
//!
//! Nodes are indexed in order of first appearance in the retained records and
//! edges in record order. Parallel edges are kept: a pair linked by both 六合
//! and 同位 has two edges, and repeated records stay repeated.
//!
//! ## Cache Invalidation
//!
//! [`RelationGraph::content_hash`] is a BLAKE3 hash of the retained edge list.
//! Renderers can compare it with the previous value to skip a redraw.

#![allow(clippy::module_name_repetitions)]

use std::collections::HashMap;

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use serde::Serialize;
use tracing::{debug, error, instrument};

use ganzhi_core::model::{Element, Entity, RelationRecord, RelationType};
use ganzhi_core::{EngineError, EntityRegistry, RelationCatalog};

use crate::style::StyleSheet;

// ---------------------------------------------------------------------------
// Node categories
// ---------------------------------------------------------------------------

/// Which half of a ganzhi dominates, used only for color-coding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum NodeCategory {
    /// The stem controls the branch, or the branch feeds the stem.
    #[serde(rename = "天干")]
    Stem,
    /// The branch controls the stem, or the stem feeds the branch.
    #[serde(rename = "地支")]
    Branch,
    /// Stem and branch share one element.
    #[serde(rename = "同气")]
    Balanced,
}

impl NodeCategory {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Stem => "天干",
            Self::Branch => "地支",
            Self::Balanced => "同气",
        }
    }

    /// Classify an entity from its stem and branch elements.
    #[must_use]
    pub fn of(entity: &Entity) -> Self {
        Self::from_elements(entity.stem_element, entity.branch_element)
    }

    #[must_use]
    pub fn from_elements(stem: Element, branch: Element) -> Self {
        if stem == branch {
            Self::Balanced
        } else if stem.controls() == branch || branch.generates() == stem {
            Self::Stem
        } else {
            Self::Branch
        }
    }
}

// ---------------------------------------------------------------------------
// RelationGraph
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphNode {
    pub name: String,
    pub category: NodeCategory,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphEdge {
    pub relation_type: RelationType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remark: Option<String>,
}

/// A relation graph derived from a catalog and an optional type filter.
///
/// Always built fresh; never mutated after [`GraphBuilder::build`] returns.
#[derive(Debug, Clone)]
pub struct RelationGraph {
    /// Nodes are ganzhi, edges are relation records.
    pub graph: DiGraph<GraphNode, GraphEdge>,
    /// Mapping from ganzhi name to petgraph `NodeIndex`.
    pub node_map: HashMap<String, NodeIndex>,
    /// The filter the graph was built with.
    pub filter: Option<RelationType>,
    /// BLAKE3 content hash of the retained edge list.
    pub content_hash: String,
}

impl RelationGraph {
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// True when the filter retained no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    #[must_use]
    pub fn node_index(&self, name: &str) -> Option<NodeIndex> {
        self.node_map.get(name).copied()
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.node_map.contains_key(name)
    }

    /// Nodes in index (first-appearance) order.
    pub fn nodes(&self) -> impl Iterator<Item = &GraphNode> {
        self.graph.node_weights()
    }

    /// `(source, target, edge)` triples in record order.
    pub fn edges(&self) -> impl Iterator<Item = (&str, &str, &GraphEdge)> {
        self.graph.edge_references().map(|e| {
            (
                self.graph[e.source()].name.as_str(),
                self.graph[e.target()].name.as_str(),
                e.weight(),
            )
        })
    }

    /// Render-ready nodes and links with colors resolved from `styles`.
    #[must_use]
    pub fn view(&self, styles: &StyleSheet) -> GraphView {
        let nodes = self
            .nodes()
            .map(|n| NodeView {
                name: n.name.clone(),
                category: n.category,
                color: styles.category_color(n.category).to_string(),
            })
            .collect();

        let links = self
            .edges()
            .map(|(source, target, edge)| LinkView {
                source: source.to_string(),
                target: target.to_string(),
                relation_type: edge.relation_type.clone(),
                color: styles.relation_color(&edge.relation_type).to_string(),
                remark: edge.remark.clone(),
            })
            .collect();

        GraphView { nodes, links }
    }
}

/// A node as handed to a renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeView {
    pub name: String,
    pub category: NodeCategory,
    pub color: String,
}

/// An edge as handed to a renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkView {
    pub source: String,
    pub target: String,
    pub relation_type: RelationType,
    pub color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remark: Option<String>,
}

/// Serializable graph for force-directed renderers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphView {
    pub nodes: Vec<NodeView>,
    pub links: Vec<LinkView>,
}

// ---------------------------------------------------------------------------
// GraphBuilder
// ---------------------------------------------------------------------------

/// Builds [`RelationGraph`]s against a registry.
///
/// Holds no state between calls, so concurrent builds over the same records
/// with different filters are independent.
#[derive(Debug, Clone, Copy)]
pub struct GraphBuilder<'a> {
    registry: &'a EntityRegistry,
}

impl<'a> GraphBuilder<'a> {
    #[must_use]
    pub const fn new(registry: &'a EntityRegistry) -> Self {
        Self { registry }
    }

    /// Build a graph from `records`, keeping only `filter`'s type if given.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::UnknownEntity`] if a retained record names a
    /// ganzhi outside the registry. The catalog loader already rejects such
    /// records, so this only fires for hand-assembled record lists.
    #[instrument(skip(self, records), fields(records = records.len()))]
    pub fn build(
        &self,
        records: &[RelationRecord],
        filter: Option<&RelationType>,
    ) -> Result<RelationGraph, EngineError> {
        let retained: Vec<&RelationRecord> = records
            .iter()
            .filter(|r| filter.is_none_or(|t| &r.relation_type == t))
            .collect();

        let mut graph = DiGraph::<GraphNode, GraphEdge>::new();
        let mut node_map: HashMap<String, NodeIndex> = HashMap::new();

        for record in &retained {
            let source = self.ensure_node(&mut graph, &mut node_map, &record.source)?;
            let target = self.ensure_node(&mut graph, &mut node_map, &record.target)?;
            graph.add_edge(
                source,
                target,
                GraphEdge {
                    relation_type: record.relation_type.clone(),
                    remark: record.remark.clone(),
                },
            );
        }

        let content_hash = compute_edge_hash(&retained);
        debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "relation graph built"
        );

        Ok(RelationGraph {
            graph,
            node_map,
            filter: filter.cloned(),
            content_hash,
        })
    }

    /// Build from a catalog's records.
    ///
    /// # Errors
    ///
    /// See [`GraphBuilder::build`].
    pub fn build_from_catalog(
        &self,
        catalog: &RelationCatalog,
        filter: Option<&RelationType>,
    ) -> Result<RelationGraph, EngineError> {
        self.build(catalog.records(), filter)
    }

    fn ensure_node(
        &self,
        graph: &mut DiGraph<GraphNode, GraphEdge>,
        node_map: &mut HashMap<String, NodeIndex>,
        name: &str,
    ) -> Result<NodeIndex, EngineError> {
        if let Some(&idx) = node_map.get(name) {
            return Ok(idx);
        }
        let Some(entity) = self.registry.get(name) else {
            error!(ganzhi = %name, "relation record references unknown ganzhi");
            return Err(EngineError::UnknownEntity {
                name: name.to_string(),
                context: "relation record",
            });
        };
        let idx = graph.add_node(GraphNode {
            name: entity.name.clone(),
            category: NodeCategory::of(entity),
        });
        node_map.insert(entity.name.clone(), idx);
        Ok(idx)
    }
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

/// Compute a BLAKE3 hash of the retained edge list.
fn compute_edge_hash(edges: &[&RelationRecord]) -> String {
    let mut hasher = blake3::Hasher::new();
    for record in edges {
        hasher.update(record.source.as_bytes());
        hasher.update(b"\x00");
        hasher.update(record.target.as_bytes());
        hasher.update(b"\x00");
        hasher.update(record.relation_type.label().as_bytes());
        hasher.update(b"\x00");
    }
    format!("blake3:{}", hasher.finalize())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
