//! Search-engine execution boundary.
//!
//! [`SearchEngine`] is the seam between the compiled query and the concrete
//! engine. The production implementation speaks the RediSearch `FT.SEARCH`
//! protocol; parameter bindings travel as `PARAMS` name/value pairs and are
//! substituted by the engine, never interpolated into the query text.

use async_trait::async_trait;
use muster_query::CompiledQuery;
use redis::aio::ConnectionManager;

use crate::error::{DirectoryError, DirectoryResult};
use crate::registry::IndexDescriptor;

/// One matched document: identity plus the value of the sort field, when the
/// document carries it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
	/// Identity of the matched document.
	pub id: String,
	/// String form of the sort field, used by the fallback sort path.
	pub sort_key: Option<String>,
}

/// Executes a compiled query against a provisioned index.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SearchEngine: Send + Sync {
	/// Run `query` against `index` with pagination and ascending sort over
	/// `sort_by`, returning matched hits in engine order.
	async fn search(
		&self,
		index: &IndexDescriptor,
		query: &CompiledQuery,
		offset: u64,
		limit: u64,
		sort_by: &str,
	) -> DirectoryResult<Vec<SearchHit>>;
}

/// RediSearch-backed engine over a managed connection.
#[derive(Clone)]
pub struct RediSearchEngine {
	connection: ConnectionManager,
}

impl RediSearchEngine {
	/// Connect to the engine at `url`.
	pub async fn connect(url: impl Into<String>) -> DirectoryResult<Self> {
		let client = redis::Client::open(url.into())
			.map_err(|e| DirectoryError::Connection(format!("invalid engine URL: {}", e)))?;
		let connection = ConnectionManager::new(client)
			.await
			.map_err(|e| DirectoryError::Connection(format!("engine connection failed: {}", e)))?;
		Ok(Self { connection })
	}

	/// Build from an existing managed connection (shared with the metadata
	/// store when both live on the same instance).
	pub fn from_connection(connection: ConnectionManager) -> Self {
		Self { connection }
	}
}

#[async_trait]
impl SearchEngine for RediSearchEngine {
	async fn search(
		&self,
		index: &IndexDescriptor,
		query: &CompiledQuery,
		offset: u64,
		limit: u64,
		sort_by: &str,
	) -> DirectoryResult<Vec<SearchHit>> {
		let mut cmd = redis::cmd("FT.SEARCH");
		cmd.arg(&index.index_name)
			.arg(&query.text)
			.arg("LIMIT")
			.arg(offset)
			.arg(limit)
			.arg("SORTBY")
			.arg(sort_by)
			.arg("ASC")
			.arg("RETURN")
			.arg(1)
			.arg(sort_by);
		if !query.params.is_empty() {
			cmd.arg("PARAMS").arg(query.params.len() * 2);
			for (name, value) in &query.params {
				cmd.arg(name).arg(value);
			}
		}
		cmd.arg("DIALECT").arg(2);

		let mut connection = self.connection.clone();
		let reply: redis::Value = cmd
			.query_async(&mut connection)
			.await
			.map_err(|e| DirectoryError::Execution(e.to_string()))?;

		parse_search_reply(&reply, sort_by)
	}
}

/// Parse an `FT.SEARCH` reply: total count followed by alternating document
/// id and field/value array.
fn parse_search_reply(reply: &redis::Value, sort_by: &str) -> DirectoryResult<Vec<SearchHit>> {
	let redis::Value::Array(items) = reply else {
		return Err(DirectoryError::Execution(
			"unexpected search reply shape".to_string(),
		));
	};

	let mut hits = Vec::new();
	// items[0] is the total match count.
	let mut rest = items.iter().skip(1);
	while let Some(id_value) = rest.next() {
		let id = value_as_string(id_value).ok_or_else(|| {
			DirectoryError::Execution("non-string document id in search reply".to_string())
		})?;
		let sort_key = rest.next().and_then(|fields| field_value(fields, sort_by));
		hits.push(SearchHit { id, sort_key });
	}
	Ok(hits)
}

/// Extract the value of `name` from an alternating field/value array.
fn field_value(fields: &redis::Value, name: &str) -> Option<String> {
	let redis::Value::Array(pairs) = fields else {
		return None;
	};
	let mut iter = pairs.iter();
	while let (Some(key), Some(value)) = (iter.next(), iter.next()) {
		if value_as_string(key).as_deref() == Some(name) {
			return value_as_string(value);
		}
	}
	None
}

fn value_as_string(value: &redis::Value) -> Option<String> {
	match value {
		redis::Value::BulkString(bytes) => Some(String::from_utf8_lossy(bytes).into_owned()),
		redis::Value::SimpleString(s) => Some(s.clone()),
		redis::Value::Int(i) => Some(i.to_string()),
		redis::Value::Double(d) => Some(d.to_string()),
		_ => None,
	}
}
