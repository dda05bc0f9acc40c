//! # muster-directory
//!
//! Listing orchestration for the Muster identity directory: resolve the
//! audience's provisioned search index, compile the request filter with
//! [`muster_query`], execute it against RediSearch, apply deterministic
//! pagination and sort, and hydrate matches with tenant-scoped attribute
//! metadata.
//!
//! Collaborators are explicitly injected trait objects with explicit connect
//! lifecycles; there are no module-level singletons. The whole listing path
//! is a pure read: reentrant, idempotent, safe for callers to retry.
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use muster_directory::{DirectoryConfig, IndexDescriptor, IndexRegistry, ListService};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let registry = Arc::new(IndexRegistry::new());
//! registry.publish(IndexDescriptor::new("app", ["username", "firstName", "lastName"]));
//!
//! let service = ListService::connect(&DirectoryConfig::default(), registry).await?;
//! let request = serde_json::from_str(
//!     r#"{"audience": "app", "criteria": "username", "limit": 25,
//!         "filter": {"firstName": {"match": "Joh"}}}"#,
//! )?;
//! let result = service.list(&request).await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod metadata;
pub mod registry;
pub mod service;
pub mod types;

pub use config::DirectoryConfig;
pub use engine::{RediSearchEngine, SearchEngine, SearchHit};
pub use error::{DirectoryError, DirectoryResult};
pub use metadata::{MetadataStore, RedisMetadataStore};
pub use registry::{IndexDescriptor, IndexRegistry};
pub use service::{ListService, MAX_LIMIT};
pub use types::{AttributeMap, ListRequest, ListResult, UserEntry};
