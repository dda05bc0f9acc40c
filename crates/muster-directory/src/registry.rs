//! Per-audience index registry.
//!
//! Indexes are provisioned out-of-band, at tenant-provisioning time. The
//! registry only answers read-only lookups and fails closed when an audience
//! has no index: lookups never block on provisioning and never create one.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::{DirectoryError, DirectoryResult};

/// A provisioned per-audience search index. Immutable once published.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexDescriptor {
	/// The audience this index belongs to.
	pub audience: String,

	/// Name of the index on the engine side.
	pub index_name: String,

	/// Fields the index carries; filter properties must resolve into this
	/// set (or be one of the reserved names).
	pub indexed_fields: HashSet<String>,
}

impl IndexDescriptor {
	/// Create a descriptor with the conventional `idx:<audience>` engine
	/// name.
	pub fn new<I, S>(audience: impl Into<String>, indexed_fields: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		let audience = audience.into();
		Self {
			index_name: format!("idx:{}", audience),
			audience,
			indexed_fields: indexed_fields.into_iter().map(Into::into).collect(),
		}
	}

	/// Override the engine-side index name.
	pub fn with_index_name(mut self, name: impl Into<String>) -> Self {
		self.index_name = name.into();
		self
	}
}

/// Read-mostly table of provisioned indexes.
///
/// Publication swaps a fresh snapshot map rather than mutating in place, so
/// a concurrent reader always observes either the old table or the new one,
/// never a partially-updated descriptor.
#[derive(Debug, Default)]
pub struct IndexRegistry {
	indexes: RwLock<Arc<HashMap<String, Arc<IndexDescriptor>>>>,
}

impl IndexRegistry {
	/// Create an empty registry.
	pub fn new() -> Self {
		Self::default()
	}

	/// Look up the index provisioned for `audience`.
	///
	/// # Errors
	///
	/// Returns [`DirectoryError::IndexNotRegistered`] naming the audience
	/// when none is provisioned.
	pub fn resolve(&self, audience: &str) -> DirectoryResult<Arc<IndexDescriptor>> {
		let snapshot = self.indexes.read().clone();
		snapshot
			.get(audience)
			.cloned()
			.ok_or_else(|| DirectoryError::IndexNotRegistered(audience.to_string()))
	}

	/// Publish a descriptor, replacing any previous one for its audience.
	pub fn publish(&self, descriptor: IndexDescriptor) {
		let mut guard = self.indexes.write();
		let mut next: HashMap<String, Arc<IndexDescriptor>> = (**guard).clone();
		next.insert(descriptor.audience.clone(), Arc::new(descriptor));
		*guard = Arc::new(next);
	}

	/// Number of provisioned indexes.
	pub fn len(&self) -> usize {
		self.indexes.read().len()
	}

	/// Check whether no index is provisioned.
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}
}
