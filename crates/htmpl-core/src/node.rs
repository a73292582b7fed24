//! The render tree: nodes, fragments, children and the `IntoChild` trait.

use crate::attrs::{AttrValue, Attributes};
use crate::exception::Result;
use crate::safe::SafeHtml;
use crate::template::Template;
use async_trait::async_trait;
use futures::FutureExt;
use futures::future::BoxFuture;
use std::borrow::Cow;
use std::future::Future;
use std::sync::Arc;

/// Tags that never have children or a closing tag.
pub const VOID_ELEMENTS: &[&str] = &[
	"area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
	"wbr",
];

/// Returns whether `tag` is a void element.
pub fn is_void_element(tag: &str) -> bool {
	matches!(
		tag,
		"area"
			| "base" | "br"
			| "col" | "embed"
			| "hr" | "img"
			| "input" | "link"
			| "meta" | "source"
			| "track" | "wbr"
	)
}

/// An asynchronous child, resolved by the renderer when it is reached.
pub type PendingChild = BoxFuture<'static, Result<Child>>;

/// Content that produces its children asynchronously.
///
/// Components are shared (`Arc`) and may be rendered any number of times.
///
/// # Examples
///
/// ```
/// use htmpl_core::{Child, Component, IntoChild, Result, elements::p};
/// use async_trait::async_trait;
///
/// struct Greeting(String);
///
/// #[async_trait]
/// impl Component for Greeting {
///     async fn render(&self) -> Result<Child> {
///         Ok(p(format!("Hello, {}!", self.0)).into_child())
///     }
/// }
/// ```
#[async_trait]
pub trait Component: Send + Sync {
	async fn render(&self) -> Result<Child>;
}

/// One child of a node, fragment or template.
pub enum Child {
	/// Plain text, escaped on output.
	Text(Cow<'static, str>),
	/// Pre-escaped markup, emitted verbatim.
	Safe(SafeHtml),
	Node(Node),
	Fragment(Fragment),
	/// A nested sequence of children, flattened on output.
	List(Vec<Child>),
	Template(Template),
	Pending(PendingChild),
	Component(Arc<dyn Component>),
	/// Dynamically-typed data.
	Value(serde_json::Value),
	/// Renders nothing.
	Empty,
}

impl std::fmt::Debug for Child {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Child::Text(text) => f.debug_tuple("Text").field(text).finish(),
			Child::Safe(html) => f.debug_tuple("Safe").field(html).finish(),
			Child::Node(node) => f.debug_tuple("Node").field(node).finish(),
			Child::Fragment(fragment) => f.debug_tuple("Fragment").field(fragment).finish(),
			Child::List(items) => f.debug_tuple("List").field(items).finish(),
			Child::Template(template) => f.debug_tuple("Template").field(template).finish(),
			Child::Pending(_) => f.write_str("Pending(..)"),
			Child::Component(_) => f.write_str("Component(..)"),
			Child::Value(value) => f.debug_tuple("Value").field(value).finish(),
			Child::Empty => f.write_str("Empty"),
		}
	}
}

impl Child {
	/// Creates a text child.
	pub fn text(content: impl Into<Cow<'static, str>>) -> Self {
		Child::Text(content.into())
	}

	/// Creates a pending child from a future.
	///
	/// The future runs when the renderer reaches this child, not before.
	pub fn pending<F, T>(future: F) -> Self
	where
		F: Future<Output = Result<T>> + Send + 'static,
		T: IntoChild,
	{
		Child::Pending(async move { future.await.map(IntoChild::into_child) }.boxed())
	}

	/// Wraps a component.
	pub fn component(component: impl Component + 'static) -> Self {
		Child::Component(Arc::new(component))
	}

	pub fn is_empty(&self) -> bool {
		matches!(self, Child::Empty)
	}
}

/// Conversion into a [`Child`].
///
/// Sequences (`Vec`, arrays, tuples) become lists that the renderer flattens,
/// `None` and `()` become [`Child::Empty`].
pub trait IntoChild {
	fn into_child(self) -> Child;
}

impl IntoChild for Child {
	fn into_child(self) -> Child {
		self
	}
}

impl IntoChild for &'static str {
	fn into_child(self) -> Child {
		Child::Text(Cow::Borrowed(self))
	}
}

impl IntoChild for String {
	fn into_child(self) -> Child {
		Child::Text(Cow::Owned(self))
	}
}

impl IntoChild for &String {
	fn into_child(self) -> Child {
		Child::Text(Cow::Owned(self.clone()))
	}
}

impl IntoChild for Cow<'static, str> {
	fn into_child(self) -> Child {
		Child::Text(self)
	}
}

impl IntoChild for SafeHtml {
	fn into_child(self) -> Child {
		Child::Safe(self)
	}
}

impl IntoChild for Node {
	fn into_child(self) -> Child {
		Child::Node(self)
	}
}

impl IntoChild for Fragment {
	fn into_child(self) -> Child {
		Child::Fragment(self)
	}
}

impl IntoChild for Template {
	fn into_child(self) -> Child {
		Child::Template(self)
	}
}

impl IntoChild for Arc<dyn Component> {
	fn into_child(self) -> Child {
		Child::Component(self)
	}
}

impl IntoChild for serde_json::Value {
	fn into_child(self) -> Child {
		Child::Value(self)
	}
}

impl IntoChild for () {
	fn into_child(self) -> Child {
		Child::Empty
	}
}

impl<T: IntoChild> IntoChild for Option<T> {
	fn into_child(self) -> Child {
		match self {
			Some(child) => child.into_child(),
			None => Child::Empty,
		}
	}
}

impl<T: IntoChild> IntoChild for Vec<T> {
	fn into_child(self) -> Child {
		Child::List(self.into_iter().map(IntoChild::into_child).collect())
	}
}

impl<T: IntoChild, const N: usize> IntoChild for [T; N] {
	fn into_child(self) -> Child {
		Child::List(self.into_iter().map(IntoChild::into_child).collect())
	}
}

macro_rules! display_child {
	($($ty:ty),*) => {
		$(
			impl IntoChild for $ty {
				fn into_child(self) -> Child {
					Child::Text(Cow::Owned(self.to_string()))
				}
			}
		)*
	};
}

display_child!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64, char);

macro_rules! tuple_child {
	($($name:ident),+) => {
		impl<$($name: IntoChild),+> IntoChild for ($($name,)+) {
			#[allow(non_snake_case)]
			fn into_child(self) -> Child {
				let ($($name,)+) = self;
				Child::List(vec![$($name.into_child()),+])
			}
		}
	};
}

tuple_child!(A);
tuple_child!(A, B);
tuple_child!(A, B, C);
tuple_child!(A, B, C, D);
tuple_child!(A, B, C, D, E);
tuple_child!(A, B, C, D, E, F);
tuple_child!(A, B, C, D, E, F, G);
tuple_child!(A, B, C, D, E, F, G, H);

/// Appends a child, splicing top-level lists so a node's direct children
/// can be inspected without unwrapping.
fn push_flat(children: &mut Vec<Child>, child: Child) {
	match child {
		Child::List(items) => children.extend(items),
		Child::Empty => {}
		other => children.push(other),
	}
}

/// An HTML element.
///
/// Built by the functions in [`elements`](crate::elements) or by
/// [`Node::new`]. Builder methods consume the node and return it, so a node
/// is never changed after it has been handed to a parent or the renderer.
#[derive(Debug)]
pub struct Node {
	tag: Cow<'static, str>,
	attrs: Attributes,
	children: Vec<Child>,
	is_void: bool,
}

impl Node {
	/// Creates a node for any tag.
	pub fn new(tag: impl Into<Cow<'static, str>>) -> Self {
		let tag = tag.into();
		let is_void = is_void_element(&tag);
		Self {
			tag,
			attrs: Attributes::new(),
			children: Vec::new(),
			is_void,
		}
	}

	/// Creates a node with the given children.
	pub fn with_children(tag: impl Into<Cow<'static, str>>, children: impl IntoChild) -> Self {
		Self::new(tag).child(children)
	}

	/// Sets an attribute. The name is normalized (see [`crate::attrs`]).
	pub fn attr(mut self, name: impl Into<Cow<'static, str>>, value: impl Into<AttrValue>) -> Self {
		self.attrs.set(name, value);
		self
	}

	/// Sets several attributes in order.
	pub fn attrs<K, V>(mut self, attrs: impl IntoIterator<Item = (K, V)>) -> Self
	where
		K: Into<Cow<'static, str>>,
		V: Into<AttrValue>,
	{
		self.attrs.extend(attrs);
		self
	}

	/// Shorthand for `.attr("class", value)`.
	pub fn class(self, value: impl Into<AttrValue>) -> Self {
		self.attr("class", value)
	}

	/// Shorthand for `.attr("id", value)`.
	pub fn id(self, value: impl Into<AttrValue>) -> Self {
		self.attr("id", value)
	}

	/// Adds a child. Children of void elements are never rendered.
	pub fn child(mut self, child: impl IntoChild) -> Self {
		push_flat(&mut self.children, child.into_child());
		self
	}

	/// Adds multiple children.
	pub fn children(mut self, children: impl IntoIterator<Item = impl IntoChild>) -> Self {
		for child in children {
			push_flat(&mut self.children, child.into_child());
		}
		self
	}

	pub fn tag_name(&self) -> &str {
		&self.tag
	}

	pub fn attributes(&self) -> &Attributes {
		&self.attrs
	}

	pub fn child_nodes(&self) -> &[Child] {
		&self.children
	}

	pub fn is_void(&self) -> bool {
		self.is_void
	}

	pub(crate) fn into_parts(self) -> (Cow<'static, str>, Attributes, Vec<Child>, bool) {
		(self.tag, self.attrs, self.children, self.is_void)
	}

	/// Renders this node with default options.
	pub async fn render(self) -> Result<SafeHtml> {
		crate::render::render(self).await
	}
}

/// Ordered children without a wrapping tag.
#[derive(Debug, Default)]
pub struct Fragment {
	children: Vec<Child>,
}

impl Fragment {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn child(mut self, child: impl IntoChild) -> Self {
		push_flat(&mut self.children, child.into_child());
		self
	}

	pub fn child_nodes(&self) -> &[Child] {
		&self.children
	}

	pub fn into_children(self) -> Vec<Child> {
		self.children
	}

	pub fn is_empty(&self) -> bool {
		self.children.is_empty()
	}

	/// Renders this fragment with default options.
	pub async fn render(self) -> Result<SafeHtml> {
		crate::render::render(self).await
	}
}

impl<T: IntoChild> FromIterator<T> for Fragment {
	fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
		iter.into_iter().fold(Fragment::new(), Fragment::child)
	}
}

/// Builds a fragment from any children.
///
/// # Examples
///
/// ```
/// use htmpl_core::{fragment, elements::{li, ul}};
///
/// let items = fragment((li("one"), li("two")));
/// assert_eq!(items.child_nodes().len(), 2);
/// let list = ul(items);
/// assert_eq!(list.child_nodes().len(), 1);
/// ```
pub fn fragment(children: impl IntoChild) -> Fragment {
	Fragment::new().child(children)
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_node_creation() {
		let node = Node::new("div");
		assert_eq!(node.tag_name(), "div");
		assert!(!node.is_void());
		assert!(node.attributes().is_empty());
		assert!(node.child_nodes().is_empty());
	}

	#[rstest]
	#[case("br", true)]
	#[case("img", true)]
	#[case("input", true)]
	#[case("wbr", true)]
	#[case("div", false)]
	#[case("span", false)]
	#[case("textarea", false)]
	fn test_void_element_detection(#[case] tag: &'static str, #[case] void: bool) {
		assert_eq!(Node::new(tag).is_void(), void);
		assert_eq!(VOID_ELEMENTS.contains(&tag), void);
	}

	#[rstest]
	fn test_children_are_spliced_and_none_dropped() {
		let node = Node::new("ul")
			.child(vec!["a", "b"])
			.child(None::<&str>)
			.child(("c", ()));
		assert_eq!(node.child_nodes().len(), 3);
	}

	#[rstest]
	fn test_attribute_names_are_normalized() {
		let node = Node::new("label").attr("for_", "email").attr("data_x", 1);
		assert_eq!(node.attributes().get("for"), Some(&AttrValue::from("email")));
		assert_eq!(node.attributes().get("data-x"), Some(&AttrValue::Int(1)));
	}

	#[rstest]
	fn test_option_into_child() {
		assert!(None::<String>.into_child().is_empty());
		assert!(matches!(Some("x").into_child(), Child::Text(_)));
	}

	#[rstest]
	fn test_numbers_become_text() {
		match 42.into_child() {
			Child::Text(text) => assert_eq!(text, "42"),
			other => panic!("unexpected child {other:?}"),
		}
	}
}
