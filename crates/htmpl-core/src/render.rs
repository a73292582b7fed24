//! Async rendering of element trees into HTML.
//!
//! The renderer walks the tree depth-first, left to right, appending to one
//! output buffer:
//!
//! - text is escaped, [`SafeHtml`] is copied verbatim;
//! - lists and fragments are flattened at any depth;
//! - pending children and components are awaited where they occur;
//! - `None` and `()` produce nothing.
//!
//! Pending siblings are resolved one after another in document order unless
//! [`RenderOptions::concurrent_siblings`] is set, in which case the pending
//! children of a single child list are awaited together. Output order is the
//! same either way.

use crate::escape::escape_into;
use crate::exception::{Error, Result};
use crate::node::{Child, IntoChild, Node};
use crate::safe::SafeHtml;
use crate::template::{Template, TemplatePart};
use futures::FutureExt;
use futures::future::{BoxFuture, try_join_all};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::str::FromStr;

/// How void elements are terminated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoidStyle {
	/// `<br />`
	#[default]
	SelfClosing,
	/// `<br>`
	Html5,
}

impl VoidStyle {
	fn terminator(self) -> &'static str {
		match self {
			VoidStyle::SelfClosing => " />",
			VoidStyle::Html5 => ">",
		}
	}
}

impl FromStr for VoidStyle {
	type Err = Error;

	fn from_str(s: &str) -> Result<Self> {
		match s.trim().to_ascii_lowercase().as_str() {
			"self_closing" | "self-closing" | "xhtml" => Ok(VoidStyle::SelfClosing),
			"html5" | "html" => Ok(VoidStyle::Html5),
			other => Err(Error::Config(format!("unknown void style `{other}`"))),
		}
	}
}

/// Renderer settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
	pub void_style: VoidStyle,
	/// Await the pending siblings of one child list concurrently.
	pub concurrent_siblings: bool,
}

impl RenderOptions {
	pub fn with_void_style(mut self, void_style: VoidStyle) -> Self {
		self.void_style = void_style;
		self
	}

	pub fn with_concurrent_siblings(mut self, enabled: bool) -> Self {
		self.concurrent_siblings = enabled;
		self
	}
}

/// Renders trees with a fixed set of [`RenderOptions`].
///
/// # Examples
///
/// ```
/// # tokio_test::block_on(async {
/// use htmpl_core::{RenderOptions, Renderer, VoidStyle, elements::br};
///
/// let renderer = Renderer::new(RenderOptions::default().with_void_style(VoidStyle::Html5));
/// assert_eq!(renderer.render(br()).await.unwrap().as_str(), "<br>");
/// # });
/// ```
#[derive(Debug, Clone, Default)]
pub struct Renderer {
	options: RenderOptions,
}

impl Renderer {
	pub fn new(options: RenderOptions) -> Self {
		Self { options }
	}

	pub fn options(&self) -> &RenderOptions {
		&self.options
	}

	/// Renders a tree into one HTML string.
	pub async fn render(&self, root: impl IntoChild) -> Result<SafeHtml> {
		let mut out = String::new();
		let mut path = Vec::new();
		tracing::trace!("render started");
		self.render_child(root.into_child(), &mut out, &mut path).await?;
		tracing::trace!(len = out.len(), "render finished");
		Ok(SafeHtml::new(out))
	}

	/// Renders a full page, prefixed with `<!DOCTYPE html>`.
	pub async fn render_document(&self, root: impl IntoChild) -> Result<SafeHtml> {
		let body = self.render(root).await?;
		Ok(SafeHtml::new("<!DOCTYPE html>") + body)
	}

	fn render_child<'a>(
		&'a self,
		child: Child,
		out: &'a mut String,
		path: &'a mut Vec<Cow<'static, str>>,
	) -> BoxFuture<'a, Result<()>> {
		async move {
			match child {
				Child::Text(text) => escape_into(&text, out),
				Child::Safe(html) => out.push_str(html.as_str()),
				Child::Node(node) => self.render_node(node, out, path).await?,
				Child::Fragment(fragment) => {
					self.render_children(fragment.into_children(), out, path)
						.await?
				}
				Child::List(items) => self.render_children(items, out, path).await?,
				Child::Template(template) => self.render_template(template, out, path).await?,
				Child::Pending(pending) => {
					let resolved = pending.await?;
					self.render_child(resolved, out, path).await?;
				}
				Child::Component(component) => {
					let resolved = component.render().await?;
					self.render_child(resolved, out, path).await?;
				}
				Child::Value(value) => render_value(value, out, path)?,
				Child::Empty => {}
			}
			Ok(())
		}
		.boxed()
	}

	async fn render_node(
		&self,
		node: Node,
		out: &mut String,
		path: &mut Vec<Cow<'static, str>>,
	) -> Result<()> {
		let (tag, attrs, children, is_void) = node.into_parts();

		out.push('<');
		out.push_str(&tag);
		attrs.write_to(out);

		if is_void {
			out.push_str(self.options.void_style.terminator());
			return Ok(());
		}

		out.push('>');
		path.push(tag.clone());
		self.render_children(children, out, path).await?;
		path.pop();
		out.push_str("</");
		out.push_str(&tag);
		out.push('>');
		Ok(())
	}

	async fn render_children(
		&self,
		children: Vec<Child>,
		out: &mut String,
		path: &mut Vec<Cow<'static, str>>,
	) -> Result<()> {
		let children = if self.options.concurrent_siblings {
			resolve_concurrently(children).await?
		} else {
			children
		};
		for child in children {
			self.render_child(child, out, path).await?;
		}
		Ok(())
	}

	async fn render_template(
		&self,
		template: Template,
		out: &mut String,
		path: &mut Vec<Cow<'static, str>>,
	) -> Result<()> {
		let mut buf = String::new();
		for part in template.into_parts() {
			match part {
				TemplatePart::Literal(markup) => buf.push_str(&markup),
				TemplatePart::Value(child) => self.render_child(child, &mut buf, path).await?,
			}
		}
		out.push_str(buf.trim());
		Ok(())
	}
}

/// Awaits every pending child and component of one child list together,
/// keeping their positions.
async fn resolve_concurrently(children: Vec<Child>) -> Result<Vec<Child>> {
	let pending = children
		.iter()
		.filter(|child| matches!(child, Child::Pending(_) | Child::Component(_)))
		.count();
	if pending < 2 {
		return Ok(children);
	}
	tracing::trace!(pending, "resolving siblings concurrently");
	try_join_all(children.into_iter().map(|child| async move {
		match child {
			Child::Pending(future) => future.await,
			Child::Component(component) => component.render().await,
			other => Ok(other),
		}
	}))
	.await
}

fn render_value(
	value: serde_json::Value,
	out: &mut String,
	path: &[Cow<'static, str>],
) -> Result<()> {
	use serde_json::Value;

	match value {
		Value::Null => {}
		Value::String(text) => escape_into(&text, out),
		Value::Number(number) => out.push_str(&number.to_string()),
		Value::Array(items) => {
			for item in items {
				render_value(item, out, path)?;
			}
		}
		Value::Bool(_) => return Err(unsupported("bool", path)),
		Value::Object(_) => return Err(unsupported("object", path)),
	}
	Ok(())
}

fn unsupported(type_name: &'static str, path: &[Cow<'static, str>]) -> Error {
	let path = if path.is_empty() {
		"<root>".to_string()
	} else {
		path.join(" > ")
	};
	Error::UnsupportedChildType { type_name, path }
}

/// Renders a tree with default options.
///
/// # Examples
///
/// ```
/// # tokio_test::block_on(async {
/// use htmpl_core::{render, elements::{div, span}};
///
/// let html = render(div(span("<hi>")).class("box")).await.unwrap();
/// assert_eq!(html.as_str(), "<div class=\"box\"><span>&lt;hi&gt;</span></div>");
/// # });
/// ```
pub async fn render(root: impl IntoChild) -> Result<SafeHtml> {
	Renderer::default().render(root).await
}

/// Renders a full page with default options.
pub async fn render_document(root: impl IntoChild) -> Result<SafeHtml> {
	Renderer::default().render_document(root).await
}
