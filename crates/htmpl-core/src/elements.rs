//! One builder function per HTML tag.
//!
//! Non-void tags take their children directly; anything implementing
//! [`IntoChild`] works, including tuples and vectors for several children.
//! Void tags take no children. Attributes are added with [`Node::attr`].
//!
//! ```
//! # tokio_test::block_on(async {
//! use htmpl_core::elements::*;
//!
//! let page = div((
//!     h1("Users"),
//!     ul(vec![li("Ann"), li("Bob")]),
//!     img().attr("src", "x.png"),
//! ))
//! .class("container");
//!
//! assert_eq!(
//!     page.render().await.unwrap().as_str(),
//!     "<div class=\"container\"><h1>Users</h1><ul><li>Ann</li><li>Bob</li></ul>\
//!      <img src=\"x.png\" /></div>"
//! );
//! # });
//! ```

use crate::node::{IntoChild, Node};

macro_rules! define_element {
	($(#[$meta:meta])* $name:ident, $tag:literal) => {
		$(#[$meta])*
		pub fn $name(children: impl IntoChild) -> Node {
			Node::with_children($tag, children)
		}
	};
}

macro_rules! define_elements {
	($($name:ident => $tag:literal),* $(,)?) => {
		$(
			define_element!(
				#[doc = concat!("Creates a `<", $tag, ">` element.")]
				$name, $tag
			);
		)*
	};
}

macro_rules! define_void_element {
	($(#[$meta:meta])* $name:ident, $tag:literal) => {
		$(#[$meta])*
		pub fn $name() -> Node {
			Node::new($tag)
		}
	};
}

define_element!(
	/// Creates a `<div>` element
	///
	/// ## Example
	///
	/// ```
	/// use htmpl_core::elements::{div, p};
	///
	/// let container = div(p("Content")).class("container");
	/// assert_eq!(container.child_nodes().len(), 1);
	/// ```
	div, "div"
);

define_element!(
	/// Creates a `<main>` element. Named `main_` so a glob import does not
	/// shadow a binary's entry point.
	main_, "main"
);

define_element!(
	/// Creates a `<template>` element.
	template_, "template"
);

define_element!(
	/// Creates a `<button>` element
	///
	/// ## Example
	///
	/// ```
	/// use htmpl_core::elements::button;
	///
	/// let submit = button("Save").attr("type_", "submit").attr("disabled", false);
	/// assert_eq!(submit.tag_name(), "button");
	/// ```
	button, "button"
);

define_elements! {
	// Document structure
	html => "html",
	head => "head",
	body => "body",
	title => "title",
	style => "style",
	script => "script",
	noscript => "noscript",

	// Sections
	header => "header",
	footer => "footer",
	nav => "nav",
	section => "section",
	article => "article",
	aside => "aside",
	address => "address",
	hgroup => "hgroup",
	h1 => "h1",
	h2 => "h2",
	h3 => "h3",
	h4 => "h4",
	h5 => "h5",
	h6 => "h6",

	// Grouping
	p => "p",
	pre => "pre",
	blockquote => "blockquote",
	ol => "ol",
	ul => "ul",
	li => "li",
	dl => "dl",
	dt => "dt",
	dd => "dd",
	figure => "figure",
	figcaption => "figcaption",
	menu => "menu",
	search => "search",

	// Text-level
	a => "a",
	em => "em",
	strong => "strong",
	small => "small",
	s => "s",
	cite => "cite",
	q => "q",
	dfn => "dfn",
	abbr => "abbr",
	ruby => "ruby",
	rt => "rt",
	rp => "rp",
	data => "data",
	time => "time",
	code => "code",
	var => "var",
	samp => "samp",
	kbd => "kbd",
	sub => "sub",
	sup => "sup",
	i => "i",
	b => "b",
	u => "u",
	mark => "mark",
	bdi => "bdi",
	bdo => "bdo",
	span => "span",
	ins => "ins",
	del => "del",

	// Embedded content
	picture => "picture",
	iframe => "iframe",
	object => "object",
	video => "video",
	audio => "audio",
	map => "map",
	svg => "svg",
	canvas => "canvas",

	// Tables
	table => "table",
	caption => "caption",
	colgroup => "colgroup",
	thead => "thead",
	tbody => "tbody",
	tfoot => "tfoot",
	tr => "tr",
	td => "td",
	th => "th",

	// Forms
	form => "form",
	label => "label",
	select => "select",
	datalist => "datalist",
	optgroup => "optgroup",
	option => "option",
	textarea => "textarea",
	output => "output",
	progress => "progress",
	meter => "meter",
	fieldset => "fieldset",
	legend => "legend",

	// Interactive
	details => "details",
	summary => "summary",
	dialog => "dialog",
	slot => "slot",
}

define_void_element!(
	/// Creates an `<input>` element
	///
	/// ## Example
	///
	/// ```
	/// use htmpl_core::elements::input;
	///
	/// let email = input().attr("type_", "email").attr("name", "email").attr("required", true);
	/// assert!(email.is_void());
	/// ```
	input, "input"
);

define_void_element!(
	/// Creates an `<img>` element.
	img, "img"
);

define_void_element!(area, "area");
define_void_element!(base, "base");
define_void_element!(br, "br");
define_void_element!(col, "col");
define_void_element!(embed, "embed");
define_void_element!(hr, "hr");
define_void_element!(link, "link");
define_void_element!(meta, "meta");
define_void_element!(source, "source");
define_void_element!(track, "track");
define_void_element!(wbr, "wbr");
