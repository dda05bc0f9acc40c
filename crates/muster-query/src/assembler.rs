//! Assembly of a full filter mapping into one conjunctive query.

use indexmap::IndexMap;

use crate::criterion::{self, FilterCriterion};
use crate::error::{QueryError, QueryResult};
use crate::expr::QueryExpr;

/// A fully assembled query: conjunctive clause text plus the deduplicated,
/// ordered parameter list.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledQuery {
	/// Engine query text. `*` when the filter mapping is empty.
	pub text: String,
	/// Parameter bindings in encounter order.
	pub params: Vec<(String, String)>,
}

impl CompiledQuery {
	/// The unconditional match-all query.
	pub fn match_all() -> Self {
		let (text, params) = QueryExpr::All.to_query();
		Self { text, params }
	}
}

/// Compile every criterion of `filter` and combine them with implicit
/// conjunction, preserving the mapping's insertion order.
///
/// Deterministic per-criterion parameter naming means names cannot collide
/// across criteria; a collision is therefore reported as
/// [`QueryError::Internal`], not a user-facing validation failure.
pub fn assemble(filter: &IndexMap<String, FilterCriterion>) -> QueryResult<CompiledQuery> {
	if filter.is_empty() {
		return Ok(CompiledQuery::match_all());
	}

	let mut clauses = Vec::with_capacity(filter.len());
	for (prop, spec) in filter {
		clauses.push(criterion::build(prop, spec)?);
	}
	let (text, params) = QueryExpr::And(clauses).to_query();

	for (i, (name, _)) in params.iter().enumerate() {
		if params[..i].iter().any(|(existing, _)| existing == name) {
			return Err(QueryError::Internal(format!(
				"duplicate parameter name: {}",
				name
			)));
		}
	}

	Ok(CompiledQuery { text, params })
}
