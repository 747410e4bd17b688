#![forbid(unsafe_code)]
//! ganzhi-core library.
//!
//! Registry, catalog and the per-entity transformations of the sexagenary
//! reference engine. Everything here is a pure function of already-loaded
//! data; the only I/O lives behind [`source::CatalogSource`] and in
//! [`config`].
//!
//! # Conventions
//!
//! - **Errors**: engine operations return [`error::EngineError`]; loaders and
//!   config helpers use `anyhow::Result`.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).

pub mod browse;
pub mod catalog;
pub mod compare;
pub mod config;
pub mod detail;
pub mod error;
pub mod model;
pub mod registry;
pub mod source;

pub use catalog::{Catalog, RelationCatalog};
pub use compare::{
    Cell, CompareField, CompareRow, ComparisonMatrix, ComparisonMatrixBuilder, SelectionLimits,
    validate_selection,
};
pub use detail::{DetailAggregator, DetailProvider, DetailView, RelatedEntity};
pub use error::{EngineError, ErrorCode};
pub use registry::EntityRegistry;
pub use source::{CatalogSource, Dataset, JsonFileSource};
