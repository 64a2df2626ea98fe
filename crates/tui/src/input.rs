//! Single-line query input.

/// Minimal always-focused line editor for the search term.
///
/// The cursor stays at the end of the line; the session only ever needs the
/// full text, so no intra-line editing is supported.
#[derive(Debug, Clone, Default)]
pub struct QueryInput {
	text: String,
}

impl QueryInput {
	/// Construct an input pre-filled with `text`.
	#[must_use]
	pub fn new(text: impl Into<String>) -> Self {
		Self { text: text.into() }
	}

	/// Current input text.
	#[must_use]
	pub fn text(&self) -> &str {
		&self.text
	}

	/// Append one character.
	pub fn push(&mut self, ch: char) {
		self.text.push(ch);
	}

	/// Remove the trailing character, if any.
	pub fn pop(&mut self) {
		self.text.pop();
	}

	/// Clear the whole line.
	pub fn clear(&mut self) {
		self.text.clear();
	}
}
