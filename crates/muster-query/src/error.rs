//! Error types for the query compiler.

use thiserror::Error;

/// Errors that can occur while compiling a filter into query text.
#[derive(Debug, Error)]
pub enum QueryError {
	/// The filter input is malformed or uses an unsupported construct.
	#[error("Validation error: {0}")]
	Validation(String),

	/// A compiler invariant was violated. Indicates a bug, not bad input.
	#[error("Internal error: {0}")]
	Internal(String),
}

/// Result type alias for compiler operations.
pub type QueryResult<T> = Result<T, QueryError>;
