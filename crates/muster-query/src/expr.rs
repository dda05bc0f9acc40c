//! Query expression AST.
//!
//! This module defines [`QueryExpr`], a small expression tree over the
//! engine's textual query language. Operator semantics live in the criterion
//! compiler; these are syntax constructors only, rendered by a single
//! serializer so escaping and parameter-binding rules sit in one place.
//!
//! Engine syntax reference:
//!
//! ```text
//! @<field>:<value-expr>      clause
//! {$<param>}                 exact tag equality
//! ($<param>*)                match any token, prefix-capable
//! [<lo> <hi>]                numeric range, -inf/+inf sentinels
//! -<clause>                  negation
//! @<f1>|<f2>:<value-expr>    field union
//! ```

use crate::field::FieldRef;
use crate::writer::QueryWriter;

/// The fixed literal the engine stores for an absent/empty field value.
///
/// Tag fields cannot hold an empty token, so ingestion writes this marker in
/// place of missing values; `exists`/`isempty` compare against it.
pub const EMPTY_MARKER: &str = "__empty__";

/// A node of the engine query expression tree.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryExpr {
	/// Match everything (`*`).
	All,

	/// A field clause (`@field:<value>`).
	Clause(FieldRef, Box<QueryExpr>),

	/// Exact-tag wrapper (`{...}`).
	Tag(Box<QueryExpr>),

	/// A named parameter reference (`$name`), carrying the value to bind.
	Param(String, String),

	/// A raw literal embedded in the text. Only the empty marker and
	/// pre-validated numeric bounds may take this path.
	Literal(String),

	/// "Matches any token, prefix-capable" wrapper (`(...*)`).
	Prefix(Box<QueryExpr>),

	/// Closed/open numeric range (`[lo hi]`); an absent side is unbounded.
	Range(Option<f64>, Option<f64>),

	/// Negation (`-...`).
	Not(Box<QueryExpr>),

	/// Implicit conjunction, space-joined.
	And(Vec<QueryExpr>),
}

impl QueryExpr {
	/// Render this expression into `writer`, collecting parameter bindings.
	pub fn render(&self, writer: &mut QueryWriter) {
		match self {
			Self::All => writer.push("*"),
			Self::Clause(field, value) => {
				writer.push_char('@');
				writer.push(&field.render());
				writer.push_char(':');
				value.render(writer);
			}
			Self::Tag(inner) => {
				writer.push_char('{');
				inner.render(writer);
				writer.push_char('}');
			}
			Self::Param(name, value) => writer.push_param(name, value),
			Self::Literal(text) => writer.push(text),
			Self::Prefix(inner) => {
				writer.push_char('(');
				inner.render(writer);
				writer.push("*)");
			}
			Self::Range(lower, upper) => {
				writer.push_char('[');
				writer.push(&lower.map_or_else(|| "-inf".to_string(), format_bound));
				writer.push_char(' ');
				writer.push(&upper.map_or_else(|| "+inf".to_string(), format_bound));
				writer.push_char(']');
			}
			Self::Not(inner) => {
				writer.push_char('-');
				inner.render(writer);
			}
			Self::And(parts) => {
				for (i, part) in parts.iter().enumerate() {
					if i > 0 {
						writer.push_char(' ');
					}
					part.render(writer);
				}
			}
		}
	}

	/// Render to `(text, params)` with a fresh writer.
	pub fn to_query(&self) -> (String, Vec<(String, String)>) {
		let mut writer = QueryWriter::new();
		self.render(&mut writer);
		writer.finish()
	}
}

/// Format a numeric range bound as a literal token.
///
/// Integral values render without a fractional part so the query text stays
/// byte-stable for the common integer case.
fn format_bound(value: f64) -> String {
	if value.fract() == 0.0 && value.abs() < 1e15 {
		format!("{}", value as i64)
	} else {
		format!("{}", value)
	}
}
