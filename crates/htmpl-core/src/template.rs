//! Pre-parsed templates: trusted literal markup interleaved with values.

use crate::node::{Child, IntoChild};
use crate::safe::SafeHtml;
use std::borrow::Cow;

/// One segment of a [`Template`].
#[derive(Debug)]
pub enum TemplatePart {
	/// Trusted markup, emitted verbatim.
	Literal(Cow<'static, str>),
	/// A value rendered with the usual child rules.
	Value(Child),
}

/// Literal markup interleaved with escaped values.
///
/// Literal segments are the author's markup and are trusted; values go
/// through the renderer, so text is escaped and nested nodes, lists and
/// pending children are resolved. The rendered result is trimmed of
/// surrounding whitespace.
///
/// # Examples
///
/// ```
/// # tokio_test::block_on(async {
/// use htmpl_core::{Template, render};
///
/// let name = "<Ann>";
/// let tpl = Template::new()
///     .lit("\n  <p>Hello, ")
///     .value(name)
///     .lit("!</p>\n");
/// assert_eq!(render(tpl).await.unwrap().as_str(), "<p>Hello, &lt;Ann&gt;!</p>");
/// # });
/// ```
#[derive(Debug, Default)]
pub struct Template {
	parts: Vec<TemplatePart>,
}

impl Template {
	pub fn new() -> Self {
		Self::default()
	}

	/// Appends trusted literal markup.
	pub fn lit(mut self, markup: impl Into<Cow<'static, str>>) -> Self {
		self.parts.push(TemplatePart::Literal(markup.into()));
		self
	}

	/// Appends a value.
	pub fn value(mut self, value: impl IntoChild) -> Self {
		self.parts.push(TemplatePart::Value(value.into_child()));
		self
	}

	/// Appends pre-escaped markup as a value.
	pub fn safe(self, html: SafeHtml) -> Self {
		self.value(html)
	}

	pub fn parts(&self) -> &[TemplatePart] {
		&self.parts
	}

	pub fn into_parts(self) -> Vec<TemplatePart> {
		self.parts
	}
}

impl FromIterator<TemplatePart> for Template {
	fn from_iter<I: IntoIterator<Item = TemplatePart>>(iter: I) -> Self {
		Self {
			parts: iter.into_iter().collect(),
		}
	}
}
