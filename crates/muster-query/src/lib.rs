//! # muster-query
//!
//! Filter-criterion compiler for the Muster directory: translates a small
//! per-field predicate DSL (operators, multi-field search, numeric ranges,
//! existence checks) into parameterized RediSearch query text.
//!
//! The compiler is pure and side-effect free. User-supplied values never
//! reach query text directly; they are collected as named parameter bindings
//! and substituted by the engine at execution time. The only literals
//! embedded in text are pre-validated numeric range bounds and the fixed
//! empty marker.
//!
//! ## Modules
//!
//! - [`field`]: logical property → physical field resolution (`#`, `#multi`)
//! - [`expr`]: the query expression AST
//! - [`writer`]: the single serializer rendering the AST
//! - [`criterion`]: criterion forms, operator normalization, compilation
//! - [`assembler`]: whole-filter assembly into one conjunctive query
//!
//! ## Quick start
//!
//! ```rust
//! use indexmap::IndexMap;
//! use muster_query::{FilterCriterion, OperatorSpec, assemble};
//!
//! let mut filter = IndexMap::new();
//! filter.insert("city".to_string(), FilterCriterion::value("Berlin"));
//! filter.insert(
//!     "age".to_string(),
//!     FilterCriterion::Operator(OperatorSpec {
//!         gte: Some(18.0),
//!         ..OperatorSpec::default()
//!     }),
//! );
//!
//! let query = assemble(&filter).unwrap();
//! assert_eq!(query.text, "@city:{$tag_city} @age:[18 +inf]");
//! assert_eq!(query.params, vec![("tag_city".to_string(), "Berlin".to_string())]);
//! ```

pub mod assembler;
pub mod criterion;
pub mod error;
pub mod expr;
pub mod field;
pub mod writer;

pub use assembler::{CompiledQuery, assemble};
pub use criterion::{CompiledClause, FilterCriterion, FilterOp, FilterValue, OperatorSpec, compile};
pub use error::{QueryError, QueryResult};
pub use expr::{EMPTY_MARKER, QueryExpr};
pub use field::{FieldRef, IDENTITY_FIELD, IDENTITY_PROP, MULTI_PROP, UNION_SEPARATOR, resolve};
pub use writer::QueryWriter;
