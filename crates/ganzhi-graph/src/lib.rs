#![forbid(unsafe_code)]
//! Relation graph for the sexagenary cycle.
//!
//! ```text
//! RelationCatalog records + optional RelationType filter
//!        ↓  build::GraphBuilder::build()
//! RelationGraph (petgraph DiGraph, nodes derived from retained edges)
//!        ├─ view(&StyleSheet) → GraphView { nodes, links } for renderers
//!        └─ stats::GraphStats::from_graph()
//! ```
//!
//! # Conventions
//!
//! - **Errors**: building returns [`ganzhi_core::EngineError`].
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).

pub mod build;
pub mod stats;
pub mod style;

pub use build::{
    GraphBuilder, GraphEdge, GraphNode, GraphView, LinkView, NodeCategory, NodeView, RelationGraph,
};
pub use stats::GraphStats;
pub use style::StyleSheet;
