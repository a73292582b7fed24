//! Pre-escaped HTML strings.

use crate::escape::escape_into;
use serde::Serialize;
use std::fmt;
use std::ops::Add;

/// A string that is already valid, escaped HTML.
///
/// Rendering emits a `SafeHtml` verbatim; it is never escaped again.
/// Concatenating two `SafeHtml` values keeps the mark, while concatenating
/// plain text escapes the text first.
///
/// # Examples
///
/// ```
/// use htmpl_core::{SafeHtml, raw};
///
/// let html = raw("<b>bold</b>") + " & more";
/// assert_eq!(html.as_str(), "<b>bold</b> &amp; more");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct SafeHtml(String);

impl SafeHtml {
	/// Marks `content` as safe without escaping it.
	pub fn new(content: impl Into<String>) -> Self {
		Self(content.into())
	}

	/// Escapes `text` and marks the result as safe.
	///
	/// # Examples
	///
	/// ```
	/// use htmpl_core::SafeHtml;
	///
	/// assert_eq!(SafeHtml::escaped("<i>").as_str(), "&lt;i&gt;");
	/// ```
	pub fn escaped(text: &str) -> Self {
		let mut out = String::with_capacity(text.len());
		escape_into(text, &mut out);
		Self(out)
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}

	pub fn into_string(self) -> String {
		self.0
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}
}

/// Marks a string as safe, pre-escaped HTML. The content is emitted verbatim,
/// so never pass untrusted input here.
pub fn raw(content: impl Into<String>) -> SafeHtml {
	SafeHtml::new(content)
}

impl fmt::Display for SafeHtml {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl AsRef<str> for SafeHtml {
	fn as_ref(&self) -> &str {
		&self.0
	}
}

impl From<SafeHtml> for String {
	fn from(html: SafeHtml) -> Self {
		html.0
	}
}

impl Add for SafeHtml {
	type Output = SafeHtml;

	fn add(mut self, rhs: SafeHtml) -> SafeHtml {
		self.0.push_str(&rhs.0);
		self
	}
}

impl Add<&SafeHtml> for SafeHtml {
	type Output = SafeHtml;

	fn add(mut self, rhs: &SafeHtml) -> SafeHtml {
		self.0.push_str(&rhs.0);
		self
	}
}

impl Add<&str> for SafeHtml {
	type Output = SafeHtml;

	fn add(mut self, rhs: &str) -> SafeHtml {
		escape_into(rhs, &mut self.0);
		self
	}
}

impl Add<String> for SafeHtml {
	type Output = SafeHtml;

	fn add(self, rhs: String) -> SafeHtml {
		self + rhs.as_str()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_concat_safe_keeps_markup() {
		let html = raw("<p>") + raw("</p>");
		assert_eq!(html, raw("<p></p>"));
	}

	#[rstest]
	fn test_concat_text_escapes_text_only() {
		let html = raw("<em>") + "<not a tag>";
		assert_eq!(html.as_str(), "<em>&lt;not a tag&gt;");
	}

	#[rstest]
	fn test_serializes_as_plain_string() {
		let json = serde_json::to_string(&raw("<br>")).unwrap();
		assert_eq!(json, "\"<br>\"");
	}

	#[rstest]
	fn test_empty() {
		assert!(SafeHtml::default().is_empty());
		assert_eq!(raw("ab").len(), 2);
	}
}
