//! Field references and logical-to-physical field resolution.
//!
//! Filter properties are logical names. Most map one-to-one onto physical
//! index fields; two reserved names do not: `#` addresses the identity field
//! and `#multi` addresses an ordered union of fields searched together.

use crate::error::{QueryError, QueryResult};

/// Physical field name of the identity attribute, addressed as `#` in filters.
pub const IDENTITY_FIELD: &str = "username";

/// Reserved property name for the identity field.
pub const IDENTITY_PROP: &str = "#";

/// Reserved property name for multi-field search.
pub const MULTI_PROP: &str = "#multi";

/// Separator the engine uses between members of a field union.
pub const UNION_SEPARATOR: char = '|';

/// A resolved reference to one or more physical index fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldRef {
	/// A single index field.
	Single(String),
	/// An ordered union of index fields, matched as "any of these".
	Union(Vec<String>),
}

impl FieldRef {
	/// Engine-syntax rendering: union members joined by [`UNION_SEPARATOR`].
	pub fn render(&self) -> String {
		match self {
			Self::Single(name) => name.clone(),
			Self::Union(names) => names.join(&UNION_SEPARATOR.to_string()),
		}
	}

	/// Rendering with union separators normalized to `_`, safe for use
	/// inside a parameter identifier.
	pub fn param_stem(&self) -> String {
		match self {
			Self::Single(name) => name.clone(),
			Self::Union(names) => names.join("_"),
		}
	}

	/// The physical fields this reference covers, in order.
	pub fn fields(&self) -> Vec<&str> {
		match self {
			Self::Single(name) => vec![name.as_str()],
			Self::Union(names) => names.iter().map(String::as_str).collect(),
		}
	}
}

/// Resolve a logical filter property name to a physical field reference.
///
/// `extra_fields` carries the ordered field list of a `#multi` criterion and
/// is ignored for every other property name.
///
/// # Errors
///
/// Returns [`QueryError::Validation`] when `#multi` carries fewer than two
/// fields; a union needs at least two members to mean anything.
pub fn resolve(prop: &str, extra_fields: Option<&[String]>) -> QueryResult<FieldRef> {
	match prop {
		IDENTITY_PROP => Ok(FieldRef::Single(IDENTITY_FIELD.to_string())),
		MULTI_PROP => match extra_fields {
			Some(fields) if fields.len() >= 2 => Ok(FieldRef::Union(fields.to_vec())),
			_ => Err(QueryError::Validation(
				"malformed multi-field filter".to_string(),
			)),
		},
		name => Ok(FieldRef::Single(name.to_string())),
	}
}
