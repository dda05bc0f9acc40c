//! Metadata-store collaborator: tenant-scoped attribute hydration.

use async_trait::async_trait;
use redis::AsyncCommands;
use redis::aio::ConnectionManager;
use std::collections::HashMap;

use crate::error::{DirectoryError, DirectoryResult};
use crate::types::AttributeMap;

/// Default key prefix for metadata hashes.
pub const DEFAULT_KEY_PREFIX: &str = "metadata";

/// Fetches attribute records for one identity, scoped per audience.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MetadataStore: Send + Sync {
	/// Fetch `id`'s attributes for each audience in `audiences`. Audiences
	/// without a record yield an empty mapping, not an error.
	async fn fetch(&self, id: &str, audiences: &[String]) -> DirectoryResult<AttributeMap>;
}

/// Redis-hash-backed metadata store: one hash per `(audience, identity)` at
/// `<prefix>:<audience>:<id>`.
#[derive(Clone)]
pub struct RedisMetadataStore {
	connection: ConnectionManager,
	key_prefix: String,
}

impl RedisMetadataStore {
	/// Connect to the store at `url`.
	pub async fn connect(url: impl Into<String>) -> DirectoryResult<Self> {
		let client = redis::Client::open(url.into())
			.map_err(|e| DirectoryError::Connection(format!("invalid store URL: {}", e)))?;
		let connection = ConnectionManager::new(client)
			.await
			.map_err(|e| DirectoryError::Connection(format!("store connection failed: {}", e)))?;
		Ok(Self {
			connection,
			key_prefix: DEFAULT_KEY_PREFIX.to_string(),
		})
	}

	/// Build from an existing managed connection.
	pub fn from_connection(connection: ConnectionManager) -> Self {
		Self {
			connection,
			key_prefix: DEFAULT_KEY_PREFIX.to_string(),
		}
	}

	/// Override the key prefix.
	pub fn with_key_prefix(mut self, prefix: impl Into<String>) -> Self {
		self.key_prefix = prefix.into();
		self
	}

	fn build_key(&self, audience: &str, id: &str) -> String {
		metadata_key(&self.key_prefix, audience, id)
	}
}

/// Key of the metadata hash for `(audience, id)`.
fn metadata_key(prefix: &str, audience: &str, id: &str) -> String {
	format!("{}:{}:{}", prefix, audience, id)
}

#[async_trait]
impl MetadataStore for RedisMetadataStore {
	async fn fetch(&self, id: &str, audiences: &[String]) -> DirectoryResult<AttributeMap> {
		let mut connection = self.connection.clone();
		let mut result = AttributeMap::new();
		for audience in audiences {
			let key = self.build_key(audience, id);
			let record: HashMap<String, String> = connection
				.hgetall(&key)
				.await
				.map_err(|e| DirectoryError::Connection(e.to_string()))?;
			result.insert(audience.clone(), record);
		}
		Ok(result)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_metadata_key_scopes_by_audience_and_id() {
		assert_eq!(
			metadata_key(DEFAULT_KEY_PREFIX, "app", "ann@gmail.org"),
			"metadata:app:ann@gmail.org"
		);
	}
}
