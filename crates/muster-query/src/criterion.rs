//! Filter criteria and their compilation into query clauses.
//!
//! A filter is a mapping from property name to criterion. A criterion is
//! either a plain value (exact-tag equality) or an operator object carrying
//! exactly one recognized operator, with `gte`/`lte` allowed to pair into a
//! closed range. Operator objects arrive as JSON and are normalized into the
//! closed [`FilterOp`] enum before compilation, so an unsupported operator is
//! an explicit error case rather than a silent default.

use serde::{Deserialize, Serialize};

use crate::error::{QueryError, QueryResult};
use crate::expr::{EMPTY_MARKER, QueryExpr};
use crate::field::{self, FieldRef, MULTI_PROP};

/// A scalar comparison value. Bound as its string form; the engine's own
/// tokenization of stored tags decides what it matches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
	/// String value.
	Str(String),
	/// Numeric value.
	Num(f64),
	/// Boolean value.
	Bool(bool),
}

impl FilterValue {
	/// The literal form bound as a parameter value.
	pub fn as_binding(&self) -> String {
		match self {
			Self::Str(s) => s.clone(),
			Self::Num(n) => format!("{}", n),
			Self::Bool(b) => b.to_string(),
		}
	}
}

impl From<&str> for FilterValue {
	fn from(s: &str) -> Self {
		Self::Str(s.to_string())
	}
}

/// One criterion of a filter mapping: a plain value or an operator object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterCriterion {
	/// Exact-tag equality against a plain value.
	Value(FilterValue),
	/// An operator object (`{"gte": 18}`, `{"match": "Joe"}`, ...).
	Operator(OperatorSpec),
}

impl FilterCriterion {
	/// Shorthand for a plain string criterion.
	pub fn value(v: impl Into<FilterValue>) -> Self {
		Self::Value(v.into())
	}

	/// Shorthand for an operator criterion.
	pub fn op(spec: OperatorSpec) -> Self {
		Self::Operator(spec)
	}
}

/// Raw operator object as it arrives over the wire.
///
/// Exactly one operator key must be set, except `gte`/`lte` which may
/// co-occur; `fields` is not an operator but the field list of a `#multi`
/// criterion. [`OperatorSpec::to_op`] enforces the combination rules.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OperatorSpec {
	/// Exact-tag equality.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub eq: Option<FilterValue>,
	/// Negated exact-tag equality.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub ne: Option<FilterValue>,
	/// Token match, prefix-capable.
	#[serde(default, rename = "match", skip_serializing_if = "Option::is_none")]
	pub matches: Option<String>,
	/// Lower range bound, inclusive.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub gte: Option<f64>,
	/// Upper range bound, inclusive.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub lte: Option<f64>,
	/// Field holds a non-empty value.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub exists: Option<bool>,
	/// Field is absent/empty.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub isempty: Option<bool>,
	/// Ordered field list for `#multi` criteria.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub fields: Option<Vec<String>>,
}

impl OperatorSpec {
	/// Normalize into the closed operator enum, rejecting unsupported
	/// combinations.
	pub fn to_op(&self) -> QueryResult<FilterOp> {
		let unsupported = || QueryError::Validation("unsupported filter operator".to_string());

		let mut op = None;
		let mut set = |candidate: FilterOp| -> QueryResult<()> {
			if op.is_some() {
				return Err(unsupported());
			}
			op = Some(candidate);
			Ok(())
		};

		if let Some(value) = &self.eq {
			set(FilterOp::Eq(value.clone()))?;
		}
		if let Some(value) = &self.ne {
			set(FilterOp::Ne(value.clone()))?;
		}
		if let Some(text) = &self.matches {
			set(FilterOp::Match(text.clone()))?;
		}
		if self.gte.is_some() || self.lte.is_some() {
			set(FilterOp::Range {
				gte: self.gte,
				lte: self.lte,
			})?;
		}
		if let Some(flag) = self.exists {
			if !flag {
				return Err(unsupported());
			}
			set(FilterOp::Exists)?;
		}
		if let Some(flag) = self.isempty {
			if !flag {
				return Err(unsupported());
			}
			set(FilterOp::IsEmpty)?;
		}

		op.ok_or_else(unsupported)
	}
}

/// Closed enumeration of recognized filter operators.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterOp {
	/// Exact-tag equality.
	Eq(FilterValue),
	/// Negated exact-tag equality. The comparison value is bound into the
	/// negated clause.
	Ne(FilterValue),
	/// Prefix-capable token match.
	Match(String),
	/// Inclusive numeric range; at least one bound is present.
	Range {
		/// Lower bound.
		gte: Option<f64>,
		/// Upper bound.
		lte: Option<f64>,
	},
	/// Field holds a non-empty value.
	Exists,
	/// Field is absent/empty.
	IsEmpty,
}

/// One compiled clause: engine-syntax text plus its parameter bindings.
///
/// Parameter names derive deterministically from `(field, operator)`, so
/// re-compiling the same criterion always yields the same name and distinct
/// operators on one field never collide.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledClause {
	/// Engine-syntax fragment.
	pub text: String,
	/// Ordered `(name, value)` bindings referenced by `text`.
	pub params: Vec<(String, String)>,
}

/// Compile one filter criterion into a clause.
///
/// # Errors
///
/// Returns [`QueryError::Validation`] for malformed `#multi` specs,
/// unsupported operator combinations, and non-finite range bounds.
pub fn compile(prop: &str, criterion: &FilterCriterion) -> QueryResult<CompiledClause> {
	let (text, params) = build(prop, criterion)?.to_query();
	Ok(CompiledClause { text, params })
}

/// Build the expression tree for one criterion. The assembler combines these
/// into a conjunction before rendering, so one criterion renders identically
/// alone or inside a full filter.
pub(crate) fn build(prop: &str, criterion: &FilterCriterion) -> QueryResult<QueryExpr> {
	let extra_fields = match criterion {
		FilterCriterion::Operator(spec) => spec.fields.as_deref(),
		FilterCriterion::Value(_) => None,
	};
	if extra_fields.is_some() && prop != MULTI_PROP {
		return Err(QueryError::Validation(
			"unexpected field list for single-field property".to_string(),
		));
	}
	let field = field::resolve(prop, extra_fields)?;

	let expr = match criterion {
		FilterCriterion::Value(value) => {
			tag_equality(&field, "tag", value)?
		}
		FilterCriterion::Operator(spec) => match spec.to_op()? {
			FilterOp::Eq(value) => tag_equality(&field, "eq", &value)?,
			FilterOp::Ne(value) => {
				QueryExpr::Not(Box::new(tag_equality(&field, "ne", &value)?))
			}
			FilterOp::Match(text) => QueryExpr::Clause(
				field.clone(),
				Box::new(QueryExpr::Prefix(Box::new(QueryExpr::Param(
					format!("match_{}", field.param_stem()),
					text,
				)))),
			),
			FilterOp::Range { gte, lte } => {
				single_field_only(&field)?;
				for bound in [gte, lte].into_iter().flatten() {
					if !bound.is_finite() {
						return Err(QueryError::Validation(
							"invalid numeric range bound".to_string(),
						));
					}
				}
				QueryExpr::Clause(field.clone(), Box::new(QueryExpr::Range(gte, lte)))
			}
			FilterOp::Exists => {
				single_field_only(&field)?;
				QueryExpr::Not(Box::new(empty_marker_equality(&field)))
			}
			FilterOp::IsEmpty => {
				single_field_only(&field)?;
				empty_marker_equality(&field)
			}
		},
	};

	Ok(expr)
}

/// Tag-equality clause with a parameter named `<op>_<field>`.
fn tag_equality(field: &FieldRef, op: &str, value: &FilterValue) -> QueryResult<QueryExpr> {
	single_field_only(field)?;
	Ok(QueryExpr::Clause(
		field.clone(),
		Box::new(QueryExpr::Tag(Box::new(QueryExpr::Param(
			format!("{}_{}", op, field.param_stem()),
			value.as_binding(),
		)))),
	))
}

/// Tag equality against the fixed empty marker. A literal, not a parameter:
/// the marker is a compiler constant, never user input.
fn empty_marker_equality(field: &FieldRef) -> QueryExpr {
	QueryExpr::Clause(
		field.clone(),
		Box::new(QueryExpr::Tag(Box::new(QueryExpr::Literal(
			EMPTY_MARKER.to_string(),
		)))),
	)
}

/// Multi-field unions only support token matching.
fn single_field_only(field: &FieldRef) -> QueryResult<()> {
	match field {
		FieldRef::Single(_) => Ok(()),
		FieldRef::Union(_) => Err(QueryError::Validation(
			"malformed multi-field filter".to_string(),
		)),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	fn multi(fields: &[&str], matches: &str) -> FilterCriterion {
		FilterCriterion::Operator(OperatorSpec {
			fields: Some(fields.iter().map(|s| s.to_string()).collect()),
			matches: Some(matches.to_string()),
			..OperatorSpec::default()
		})
	}

	#[rstest]
	fn test_compile_plain_value() {
		let clause = compile("city", &FilterCriterion::value("Berlin")).unwrap();
		assert_eq!(clause.text, "@city:{$tag_city}");
		assert_eq!(
			clause.params,
			vec![("tag_city".to_string(), "Berlin".to_string())]
		);
	}

	#[rstest]
	fn test_compile_is_deterministic() {
		let criterion = FilterCriterion::value("Berlin");
		let first = compile("city", &criterion).unwrap();
		let second = compile("city", &criterion).unwrap();
		assert_eq!(first, second);
	}

	#[rstest]
	fn test_compile_eq_operator_qualified_name() {
		let spec = OperatorSpec {
			eq: Some(FilterValue::from("Berlin")),
			..OperatorSpec::default()
		};
		let clause = compile("city", &FilterCriterion::Operator(spec)).unwrap();
		assert_eq!(clause.text, "@city:{$eq_city}");
	}

	/// `ne` binds its comparison value into the negated clause. The clause
	/// asserts "field ≠ value", not merely "field is set".
	#[rstest]
	fn test_compile_ne_binds_value() {
		let spec = OperatorSpec {
			ne: Some(FilterValue::from("Berlin")),
			..OperatorSpec::default()
		};
		let clause = compile("city", &FilterCriterion::Operator(spec)).unwrap();
		assert_eq!(clause.text, "-@city:{$ne_city}");
		assert_eq!(
			clause.params,
			vec![("ne_city".to_string(), "Berlin".to_string())]
		);
	}

	#[rstest]
	fn test_compile_match_single_field() {
		let spec = OperatorSpec {
			matches: Some("Johhny".to_string()),
			..OperatorSpec::default()
		};
		let clause = compile("firstName", &FilterCriterion::Operator(spec)).unwrap();
		assert_eq!(clause.text, "@firstName:($match_firstName*)");
		assert_eq!(
			clause.params,
			vec![("match_firstName".to_string(), "Johhny".to_string())]
		);
	}

	#[rstest]
	fn test_compile_multi_field_match() {
		let clause = compile(MULTI_PROP, &multi(&["firstName", "lastName"], "Joe")).unwrap();
		assert_eq!(
			clause.text,
			"@firstName|lastName:($match_firstName_lastName*)"
		);
		assert_eq!(
			clause.params,
			vec![("match_firstName_lastName".to_string(), "Joe".to_string())]
		);
	}

	#[rstest]
	fn test_compile_multi_without_fields_fails() {
		let spec = OperatorSpec {
			matches: Some("Joe".to_string()),
			..OperatorSpec::default()
		};
		let error = compile(MULTI_PROP, &FilterCriterion::Operator(spec)).unwrap_err();
		assert!(matches!(error, QueryError::Validation(_)));
	}

	/// A one-element `fields` list is not a union; it must be written as a
	/// plain single-field criterion instead.
	#[rstest]
	fn test_compile_multi_single_field_rejected() {
		let error = compile(MULTI_PROP, &multi(&["firstName"], "Joe")).unwrap_err();
		assert_eq!(
			error.to_string(),
			"Validation error: malformed multi-field filter"
		);
	}

	#[rstest]
	fn test_compile_rejects_fields_on_plain_property() {
		let spec = OperatorSpec {
			fields: Some(vec!["lastName".to_string(), "city".to_string()]),
			matches: Some("Joe".to_string()),
			..OperatorSpec::default()
		};
		let error = compile("firstName", &FilterCriterion::Operator(spec)).unwrap_err();
		assert_eq!(
			error.to_string(),
			"Validation error: unexpected field list for single-field property"
		);
	}

	#[rstest]
	#[case(Some(18.0), Some(65.0), "@age:[18 65]")]
	#[case(Some(18.0), None, "@age:[18 +inf]")]
	#[case(None, Some(65.0), "@age:[-inf 65]")]
	fn test_compile_range(
		#[case] gte: Option<f64>,
		#[case] lte: Option<f64>,
		#[case] expected: &str,
	) {
		let spec = OperatorSpec {
			gte,
			lte,
			..OperatorSpec::default()
		};
		let clause = compile("age", &FilterCriterion::Operator(spec)).unwrap();
		assert_eq!(clause.text, expected);
		assert!(clause.params.is_empty());
	}

	#[rstest]
	#[case(f64::NAN)]
	#[case(f64::INFINITY)]
	#[case(f64::NEG_INFINITY)]
	fn test_compile_range_rejects_non_finite(#[case] bound: f64) {
		let spec = OperatorSpec {
			gte: Some(bound),
			..OperatorSpec::default()
		};
		let error = compile("age", &FilterCriterion::Operator(spec)).unwrap_err();
		assert_eq!(
			error.to_string(),
			"Validation error: invalid numeric range bound"
		);
	}

	#[rstest]
	fn test_compile_exists_and_isempty_are_complements() {
		let exists = OperatorSpec {
			exists: Some(true),
			..OperatorSpec::default()
		};
		let isempty = OperatorSpec {
			isempty: Some(true),
			..OperatorSpec::default()
		};

		let exists_clause = compile("city", &FilterCriterion::Operator(exists)).unwrap();
		let isempty_clause = compile("city", &FilterCriterion::Operator(isempty)).unwrap();

		assert_eq!(exists_clause.text, "-@city:{__empty__}");
		assert_eq!(isempty_clause.text, "@city:{__empty__}");
		assert_eq!(format!("-{}", isempty_clause.text), exists_clause.text);
		assert!(exists_clause.params.is_empty());
	}

	#[rstest]
	fn test_compile_identity_prop() {
		let clause = compile("#", &FilterCriterion::value("ann@gmail.org")).unwrap();
		assert_eq!(clause.text, "@username:{$tag_username}");
	}

	#[rstest]
	fn test_operator_combination_rejected() {
		let spec = OperatorSpec {
			eq: Some(FilterValue::from("a")),
			matches: Some("b".to_string()),
			..OperatorSpec::default()
		};
		let error = spec.to_op().unwrap_err();
		assert_eq!(
			error.to_string(),
			"Validation error: unsupported filter operator"
		);
	}

	#[rstest]
	fn test_gte_lte_pair_allowed() {
		let spec = OperatorSpec {
			gte: Some(1.0),
			lte: Some(2.0),
			..OperatorSpec::default()
		};
		assert_eq!(
			spec.to_op().unwrap(),
			FilterOp::Range {
				gte: Some(1.0),
				lte: Some(2.0)
			}
		);
	}

	#[rstest]
	fn test_empty_operator_object_rejected() {
		let error = OperatorSpec::default().to_op().unwrap_err();
		assert!(matches!(error, QueryError::Validation(_)));
	}

	#[rstest]
	fn test_criterion_deserializes_from_json() {
		let plain: FilterCriterion = serde_json::from_str(r#""Berlin""#).unwrap();
		assert_eq!(plain, FilterCriterion::value("Berlin"));

		let ranged: FilterCriterion = serde_json::from_str(r#"{"gte": 18, "lte": 65}"#).unwrap();
		let FilterCriterion::Operator(spec) = ranged else {
			panic!("expected operator criterion");
		};
		assert_eq!(spec.gte, Some(18.0));
		assert_eq!(spec.lte, Some(65.0));

		let multi: FilterCriterion = serde_json::from_str(
			r#"{"fields": ["firstName", "lastName"], "match": "Joe"}"#,
		)
		.unwrap();
		assert!(matches!(multi, FilterCriterion::Operator(_)));
	}
}
