//! Request and result types for the listing call.

use std::collections::HashMap;

use indexmap::IndexMap;
use muster_query::FilterCriterion;
use serde::{Deserialize, Serialize};

/// Attribute metadata for one identity: audience → (field → value).
pub type AttributeMap = HashMap<String, HashMap<String, String>>;

/// A request to list identities of one audience.
#[derive(Debug, Clone, Deserialize)]
pub struct ListRequest {
	/// Tenant namespace whose index and metadata are queried.
	pub audience: String,

	/// Sort-field name. Results are ascending over this field's string form,
	/// ties broken by ascending identity.
	pub criteria: String,

	/// Zero-based pagination offset.
	#[serde(default)]
	pub offset: i64,

	/// Page size.
	pub limit: i64,

	/// Filter mapping, property name → criterion. Iterated in insertion
	/// order so compiled output is deterministic.
	#[serde(default)]
	pub filter: IndexMap<String, FilterCriterion>,
}

/// One matched identity with its hydrated attribute metadata.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserEntry {
	/// Identity of the matched user.
	pub id: String,

	/// Tenant-scoped attributes, keyed by audience.
	pub metadata: AttributeMap,
}

/// Ordered listing result. An empty match set is a valid, non-error result.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ListResult {
	/// Matched identities in sort order.
	pub users: Vec<UserEntry>,
}
