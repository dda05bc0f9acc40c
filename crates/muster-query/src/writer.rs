//! Query writer for constructing engine query strings.
//!
//! `QueryWriter` accumulates query text and the ordered parameter bindings
//! referenced by it. Parameters are the only path by which user-supplied
//! values enter a query; they are bound by name at execution time rather
//! than interpolated into the text.

/// Writer that builds query text and collects named parameter bindings.
#[derive(Debug, Clone, Default)]
pub struct QueryWriter {
	/// The query text being constructed.
	text: String,
	/// Parameter bindings in encounter order.
	params: Vec<(String, String)>,
}

impl QueryWriter {
	/// Create a new empty writer.
	pub fn new() -> Self {
		Self::default()
	}

	/// Push raw text.
	pub fn push(&mut self, s: &str) {
		self.text.push_str(s);
	}

	/// Push a single character.
	pub fn push_char(&mut self, c: char) {
		self.text.push(c);
	}

	/// Push a parameter reference (`$name`) and record its binding.
	pub fn push_param(&mut self, name: &str, value: &str) {
		self.text.push('$');
		self.text.push_str(name);
		self.params.push((name.to_string(), value.to_string()));
	}

	/// Current query text.
	pub fn text(&self) -> &str {
		&self.text
	}

	/// Collected parameter bindings.
	pub fn params(&self) -> &[(String, String)] {
		&self.params
	}

	/// Consume the writer and return `(text, params)`.
	pub fn finish(self) -> (String, Vec<(String, String)>) {
		(self.text, self.params)
	}
}
