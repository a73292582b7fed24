//! HTMX attribute builder.
//!
//! [`Hx`] collects `hx-*` attributes and attaches them to a node with
//! [`Node::hx`], or renders them as an attribute string for use inside a
//! [`Template`](crate::Template) literal.
//!
//! ```
//! use htmpl_core::htmx::{Hx, Swap};
//!
//! let hx = Hx::new().get("/api/data").target("#results").swap(Swap::InnerHtml);
//! assert_eq!(
//!     hx.to_html().as_str(),
//!     "hx-get=\"/api/data\" hx-target=\"#results\" hx-swap=\"innerHTML\""
//! );
//! ```

use crate::attrs::{AttrValue, Attributes};
use crate::node::Node;
use crate::safe::SafeHtml;
use std::borrow::Cow;
use std::fmt;

type Text = Option<Cow<'static, str>>;

/// Values of `hx-swap`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Swap {
	InnerHtml,
	OuterHtml,
	BeforeBegin,
	AfterBegin,
	BeforeEnd,
	AfterEnd,
	Delete,
	None,
}

impl Swap {
	pub fn as_str(self) -> &'static str {
		match self {
			Swap::InnerHtml => "innerHTML",
			Swap::OuterHtml => "outerHTML",
			Swap::BeforeBegin => "beforebegin",
			Swap::AfterBegin => "afterbegin",
			Swap::BeforeEnd => "beforeend",
			Swap::AfterEnd => "afterend",
			Swap::Delete => "delete",
			Swap::None => "none",
		}
	}
}

impl fmt::Display for Swap {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// HTMX attributes for one element. Unset fields emit nothing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Hx {
	get: Text,
	post: Text,
	put: Text,
	patch: Text,
	delete: Text,
	target: Text,
	swap: Option<Swap>,
	trigger: Text,
	push_url: Text,
	select: Text,
	select_oob: Text,
	swap_oob: Text,
	include: Text,
	vals: Text,
	confirm: Text,
	disable: bool,
	disabled_elt: Text,
	indicator: Text,
	boost: bool,
	preserve: bool,
	sync: Text,
	params: Text,
	encoding: Text,
	ext: Text,
	headers: Text,
	history: Option<bool>,
	history_elt: bool,
	on: Vec<(Cow<'static, str>, Cow<'static, str>)>,
}

macro_rules! text_setters {
	($($(#[$meta:meta])* $name:ident),* $(,)?) => {
		$(
			$(#[$meta])*
			pub fn $name(mut self, value: impl Into<Cow<'static, str>>) -> Self {
				self.$name = Some(value.into());
				self
			}
		)*
	};
}

impl Hx {
	pub fn new() -> Self {
		Self::default()
	}

	text_setters!(
		/// `hx-get`
		get,
		/// `hx-post`
		post,
		put,
		patch,
		delete,
		/// CSS selector of the element to swap, or `this`.
		target,
		/// Trigger specification, e.g. `input changed delay:300ms`.
		trigger,
		/// URL pushed into history.
		push_url,
		select,
		select_oob,
		swap_oob,
		include,
		/// JSON of extra values sent with the request.
		vals,
		confirm,
		disabled_elt,
		indicator,
		sync,
		params,
		encoding,
		ext,
		/// JSON of extra request headers.
		headers,
	);

	pub fn swap(mut self, swap: Swap) -> Self {
		self.swap = Some(swap);
		self
	}

	/// Sets `hx-push-url="true"`.
	pub fn push_url_enabled(self) -> Self {
		self.push_url("true")
	}

	pub fn disable(mut self, disable: bool) -> Self {
		self.disable = disable;
		self
	}

	pub fn boost(mut self, boost: bool) -> Self {
		self.boost = boost;
		self
	}

	pub fn preserve(mut self, preserve: bool) -> Self {
		self.preserve = preserve;
		self
	}

	pub fn history(mut self, history: bool) -> Self {
		self.history = Some(history);
		self
	}

	pub fn history_elt(mut self, history_elt: bool) -> Self {
		self.history_elt = history_elt;
		self
	}

	/// Adds an inline event handler, emitted as `hx-on:{event}`.
	pub fn on(
		mut self,
		event: impl Into<Cow<'static, str>>,
		handler: impl Into<Cow<'static, str>>,
	) -> Self {
		self.on.push((event.into(), handler.into()));
		self
	}

	/// The attributes in emission order.
	pub fn attributes(&self) -> Attributes {
		let text = |value: &Text| AttrValue::from(value.clone());
		let flag = |on: bool| if on { AttrValue::from("true") } else { AttrValue::Absent };

		let mut attrs: Attributes = [
			("hx-get", text(&self.get)),
			("hx-post", text(&self.post)),
			("hx-put", text(&self.put)),
			("hx-patch", text(&self.patch)),
			("hx-delete", text(&self.delete)),
			("hx-target", text(&self.target)),
			("hx-swap", AttrValue::from(self.swap.map(Swap::as_str))),
			("hx-trigger", text(&self.trigger)),
			("hx-push-url", text(&self.push_url)),
			("hx-select", text(&self.select)),
			("hx-select-oob", text(&self.select_oob)),
			("hx-swap-oob", text(&self.swap_oob)),
			("hx-include", text(&self.include)),
			("hx-vals", text(&self.vals)),
			("hx-confirm", text(&self.confirm)),
			("hx-disable", AttrValue::Bool(self.disable)),
			("hx-disabled-elt", text(&self.disabled_elt)),
			("hx-indicator", text(&self.indicator)),
			("hx-boost", flag(self.boost)),
			("hx-preserve", flag(self.preserve)),
			("hx-sync", text(&self.sync)),
			("hx-params", text(&self.params)),
			("hx-encoding", text(&self.encoding)),
			("hx-ext", text(&self.ext)),
			("hx-headers", text(&self.headers)),
			(
				"hx-history",
				AttrValue::from(self.history.map(|on| if on { "true" } else { "false" })),
			),
			("hx-history-elt", AttrValue::Bool(self.history_elt)),
		]
		.into_iter()
		.filter(|(_, value)| value.is_present())
		.collect();

		attrs.extend(self.on.iter().map(|(event, handler)| {
			(format!("hx-on:{event}"), AttrValue::from(handler.clone()))
		}));
		attrs
	}

	/// Renders the attributes as one space-separated string.
	pub fn to_html(&self) -> SafeHtml {
		let mut out = String::new();
		self.attributes().write_to(&mut out);
		SafeHtml::new(out.trim_start())
	}
}

impl fmt::Display for Hx {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.to_html().as_str())
	}
}

impl Node {
	/// Attaches HTMX attributes.
	pub fn hx(self, hx: Hx) -> Self {
		let attrs: Vec<(String, AttrValue)> = hx
			.attributes()
			.iter()
			.map(|(name, value)| (name.to_string(), value.clone()))
			.collect();
		self.attrs(attrs)
	}
}
