//! Error types for the directory listing path.

use muster_query::QueryError;
use thiserror::Error;

/// Errors that can occur while listing identities.
#[derive(Debug, Error)]
pub enum DirectoryError {
	/// The request is malformed: bad pagination, an unsupported filter
	/// operator, or a filter property the target index does not carry.
	#[error("Validation error: {0}")]
	Validation(String),

	/// The audience has no provisioned search index. Provisioning happens
	/// out-of-band; this is a hard not-found, never retried here.
	#[error("no search index registered for audience: {0}")]
	IndexNotRegistered(String),

	/// The engine rejected or failed the compiled query at execution time.
	/// The listing path catches this and downgrades it to an empty result.
	#[error("Query execution error: {0}")]
	Execution(String),

	/// Failure reaching the engine or the metadata store.
	#[error("Connection error: {0}")]
	Connection(String),

	/// A compiler or orchestration invariant was violated.
	#[error("Internal error: {0}")]
	Internal(String),
}

impl From<QueryError> for DirectoryError {
	fn from(error: QueryError) -> Self {
		match error {
			QueryError::Validation(msg) => Self::Validation(msg),
			QueryError::Internal(msg) => Self::Internal(msg),
		}
	}
}

/// Result type alias for directory operations.
pub type DirectoryResult<T> = Result<T, DirectoryError>;
