//! # Muster
//!
//! Tenant-scoped identity directory listing over RediSearch.
//!
//! Muster turns a small per-field filter DSL into parameterized engine
//! queries and orchestrates the listing read path: per-audience index
//! resolution, query execution with deterministic pagination and sort, and
//! hydration of matches with tenant-scoped attribute metadata.
//!
//! The workspace splits into two crates, both re-exported here:
//!
//! - [`query`] ([`muster_query`]) — the pure filter-query compiler: field
//!   resolution, expression AST, criterion compilation, query assembly.
//! - [`directory`] ([`muster_directory`]) — the orchestration layer: index
//!   registry, RediSearch execution, metadata hydration, `ListService`.
//!
//! ## Quick example
//!
//! ```rust
//! use muster::prelude::*;
//! use indexmap::IndexMap;
//!
//! let mut filter = IndexMap::new();
//! filter.insert("city".to_string(), FilterCriterion::value("Berlin"));
//!
//! let compiled = assemble(&filter).unwrap();
//! assert_eq!(compiled.text, "@city:{$tag_city}");
//! ```

pub use muster_directory as directory;
pub use muster_query as query;

/// Commonly used items.
pub mod prelude {
	pub use muster_directory::{
		DirectoryConfig, DirectoryError, DirectoryResult, IndexDescriptor, IndexRegistry,
		ListRequest, ListResult, ListService, MetadataStore, SearchEngine, UserEntry,
	};
	pub use muster_query::{
		CompiledQuery, FilterCriterion, FilterOp, FilterValue, OperatorSpec, QueryError,
		QueryResult, assemble,
	};
}
