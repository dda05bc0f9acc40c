//! Directory configuration.

use serde::Deserialize;

use crate::service::MAX_LIMIT;

/// Settings for the directory collaborators and the listing service.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DirectoryConfig {
	/// Connection URL for the engine and metadata store.
	pub url: String,

	/// Key prefix of the metadata hashes.
	pub key_prefix: String,

	/// Upper bound for the request `limit`.
	pub max_limit: i64,

	/// Secondary audience hydrated alongside the request audience, when set.
	pub default_audience: Option<String>,
}

impl Default for DirectoryConfig {
	fn default() -> Self {
		Self {
			url: "redis://127.0.0.1:6379".to_string(),
			key_prefix: crate::metadata::DEFAULT_KEY_PREFIX.to_string(),
			max_limit: MAX_LIMIT,
			default_audience: None,
		}
	}
}
