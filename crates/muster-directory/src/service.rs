//! Listing orchestration.
//!
//! `ListService` is the root of the read path: it validates pagination,
//! resolves the audience's index, compiles the filter, executes it, applies
//! the deterministic sort, and hydrates matches with tenant-scoped metadata.
//! The whole path is read-only and reentrant; there is no retry logic
//! because a caller can safely retry at will.

use std::cmp::Ordering;
use std::sync::Arc;

use muster_query::{FilterCriterion, IDENTITY_FIELD, assemble, resolve};

use crate::config::DirectoryConfig;
use crate::engine::{RediSearchEngine, SearchEngine, SearchHit};
use crate::error::{DirectoryError, DirectoryResult};
use crate::metadata::{MetadataStore, RedisMetadataStore};
use crate::registry::{IndexDescriptor, IndexRegistry};
use crate::types::{ListRequest, ListResult, UserEntry};

/// Default upper bound for the request `limit`.
pub const MAX_LIMIT: i64 = 100;

/// Root orchestrator of the listing read path.
pub struct ListService {
	registry: Arc<IndexRegistry>,
	engine: Arc<dyn SearchEngine>,
	metadata: Arc<dyn MetadataStore>,
	default_audience: Option<String>,
	max_limit: i64,
}

impl ListService {
	/// Build a service from explicitly injected collaborators.
	pub fn new(
		registry: Arc<IndexRegistry>,
		engine: Arc<dyn SearchEngine>,
		metadata: Arc<dyn MetadataStore>,
	) -> Self {
		Self {
			registry,
			engine,
			metadata,
			default_audience: None,
			max_limit: MAX_LIMIT,
		}
	}

	/// Connect the Redis-backed collaborators described by `config` and
	/// build a service around them.
	pub async fn connect(
		config: &DirectoryConfig,
		registry: Arc<IndexRegistry>,
	) -> DirectoryResult<Self> {
		let engine = RediSearchEngine::connect(config.url.clone()).await?;
		let metadata = RedisMetadataStore::connect(config.url.clone())
			.await?
			.with_key_prefix(config.key_prefix.clone());

		let mut service = Self::new(registry, Arc::new(engine), Arc::new(metadata));
		service.max_limit = config.max_limit;
		service.default_audience = config.default_audience.clone();
		Ok(service)
	}

	/// Also hydrate this audience's metadata alongside each request's own.
	pub fn with_default_audience(mut self, audience: impl Into<String>) -> Self {
		self.default_audience = Some(audience.into());
		self
	}

	/// Override the page-size upper bound.
	pub fn with_max_limit(mut self, max_limit: i64) -> Self {
		self.max_limit = max_limit;
		self
	}

	/// List identities of `request.audience` matching `request.filter`.
	///
	/// # Errors
	///
	/// - [`DirectoryError::Validation`] for bad pagination or filters;
	/// - [`DirectoryError::IndexNotRegistered`] when the audience has no
	///   provisioned index (propagated verbatim, never downgraded).
	///
	/// Engine execution failures are logged and downgraded to an empty
	/// result: user input must never hard-fail the listing path.
	pub async fn list(&self, request: &ListRequest) -> DirectoryResult<ListResult> {
		if request.offset < 0 {
			return Err(DirectoryError::Validation(
				"offset must be non-negative".to_string(),
			));
		}
		if request.limit <= 0 || request.limit > self.max_limit {
			return Err(DirectoryError::Validation(format!(
				"limit must be in 1..={}",
				self.max_limit
			)));
		}

		let index = self.registry.resolve(&request.audience)?;
		validate_filter_fields(request, &index)?;

		let compiled = assemble(&request.filter)?;
		tracing::debug!(
			audience = %request.audience,
			query = %compiled.text,
			params = compiled.params.len(),
			"executing identity listing"
		);

		let mut hits = match self
			.engine
			.search(
				&index,
				&compiled,
				request.offset as u64,
				request.limit as u64,
				&request.criteria,
			)
			.await
		{
			Ok(hits) => hits,
			Err(DirectoryError::Execution(reason)) => {
				tracing::warn!(
					audience = %request.audience,
					query = %compiled.text,
					%reason,
					"search execution failed, returning empty result"
				);
				return Ok(ListResult::default());
			}
			Err(other) => return Err(other),
		};

		// Engine order is re-checked locally so pagination stays stable even
		// when the engine fell back to a sort it cannot apply natively.
		hits.sort_by(page_order);

		let audiences = self.hydration_audiences(&request.audience);
		let mut users = Vec::with_capacity(hits.len());
		for hit in hits {
			let metadata = self.metadata.fetch(&hit.id, &audiences).await?;
			users.push(UserEntry {
				id: hit.id,
				metadata,
			});
		}

		Ok(ListResult { users })
	}

	/// Audiences whose metadata is hydrated: the request's own, plus the
	/// configured default audience when distinct.
	fn hydration_audiences(&self, audience: &str) -> Vec<String> {
		let mut audiences = vec![audience.to_string()];
		if let Some(default) = &self.default_audience {
			if default != audience {
				audiences.push(default.clone());
			}
		}
		audiences
	}
}

/// Every filter property must resolve to physical fields the target index
/// carries. Resolution itself (reserved names, union well-formedness) is the
/// compiler's; only the indexed-ness check belongs here.
fn validate_filter_fields(request: &ListRequest, index: &IndexDescriptor) -> DirectoryResult<()> {
	for (prop, criterion) in &request.filter {
		let extra_fields = match criterion {
			FilterCriterion::Operator(spec) => spec.fields.as_deref(),
			FilterCriterion::Value(_) => None,
		};
		let field = resolve(prop, extra_fields)?;
		for name in field.fields() {
			require_indexed(name, index)?;
		}
	}
	Ok(())
}

fn require_indexed(field: &str, index: &IndexDescriptor) -> DirectoryResult<()> {
	if field == IDENTITY_FIELD || index.indexed_fields.contains(field) {
		Ok(())
	} else {
		Err(DirectoryError::Validation(format!(
			"filter field is not indexed for this audience: {}",
			field
		)))
	}
}

/// Deterministic page order: ascending, case-insensitive over the sort key's
/// string form, ties broken by ascending identity.
fn page_order(a: &SearchHit, b: &SearchHit) -> Ordering {
	let left = a.sort_key.as_deref().unwrap_or("").to_lowercase();
	let right = b.sort_key.as_deref().unwrap_or("").to_lowercase();
	left.cmp(&right).then_with(|| a.id.cmp(&b.id))
}
