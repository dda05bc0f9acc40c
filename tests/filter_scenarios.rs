//! End-to-end compilation scenarios over the public facade.

use indexmap::IndexMap;
use muster::prelude::*;
use rstest::rstest;

fn parse_filter(json: &str) -> IndexMap<String, FilterCriterion> {
	serde_json::from_str(json).unwrap()
}

#[rstest]
fn first_name_match_compiles_to_prefix_clause() {
	let filter = parse_filter(r#"{"firstName": {"match": "Johhny"}}"#);
	let compiled = assemble(&filter).unwrap();

	assert_eq!(compiled.text, "@firstName:($match_firstName*)");
	assert_eq!(
		compiled.params,
		vec![("match_firstName".to_string(), "Johhny".to_string())]
	);
}

#[rstest]
fn multi_field_match_compiles_to_union_clause() {
	let filter =
		parse_filter(r##"{"#multi": {"fields": ["firstName", "lastName"], "match": "Joe"}}"##);
	let compiled = assemble(&filter).unwrap();

	assert_eq!(
		compiled.text,
		"@firstName|lastName:($match_firstName_lastName*)"
	);
}

#[rstest]
fn quoted_eq_value_is_bound_verbatim() {
	// The quotes stay inside the binding; whether they match anything is the
	// engine's tag semantics, not the compiler's concern.
	let filter = parse_filter(r#"{"username": {"eq": "\"ann@gmail.org\""}}"#);
	let compiled = assemble(&filter).unwrap();

	assert_eq!(compiled.text, "@username:{$eq_username}");
	assert_eq!(compiled.params[0].1, "\"ann@gmail.org\"");
}

#[rstest]
fn mixed_filter_compiles_in_insertion_order() {
	let filter = parse_filter(
		r##"{
			"city": "Berlin",
			"age": {"gte": 21, "lte": 65},
			"team": {"exists": true},
			"#": "ann@gmail.org"
		}"##,
	);
	let compiled = assemble(&filter).unwrap();

	assert_eq!(
		compiled.text,
		"@city:{$tag_city} @age:[21 65] -@team:{__empty__} @username:{$tag_username}"
	);
	let names: Vec<&str> = compiled.params.iter().map(|(n, _)| n.as_str()).collect();
	assert_eq!(names, vec!["tag_city", "tag_username"]);
}

#[rstest]
fn recompilation_yields_identical_query() {
	let filter = parse_filter(r#"{"firstName": {"match": "Jo"}, "age": {"gte": 18}}"#);
	assert_eq!(assemble(&filter).unwrap(), assemble(&filter).unwrap());
}

#[rstest]
fn unsupported_operator_surfaces_as_validation_error() {
	let filter = parse_filter(r#"{"age": {}}"#);
	let error = assemble(&filter).unwrap_err();
	assert!(matches!(error, QueryError::Validation(_)));
}
