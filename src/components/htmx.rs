//! Common HTMX interaction patterns.
//!
//! Each pattern sets its `hx-*` defaults; chain [`Node::hx`] to override
//! them or add more, since a repeated attribute keeps its position and takes
//! the new value.
//!
//! ```
//! # tokio_test::block_on(async {
//! use htmpl::components::loading_button;
//! use htmpl::htmx::Hx;
//! use htmpl::render;
//!
//! let delete = loading_button("Delete", "/items/7/delete").hx(Hx::new().confirm("Really?"));
//! assert_eq!(
//!     render(delete).await.unwrap().as_str(),
//!     "<button type=\"button\" hx-post=\"/items/7/delete\" hx-target=\"this\" \
//!      hx-swap=\"outerHTML\" hx-disabled-elt=\"this\" hx-confirm=\"Really?\">Delete</button>"
//! );
//! # });
//! ```

use htmpl_cache::{Memoized, cached};
use htmpl_core::elements::{button, div, input, script, span};
use htmpl_core::htmx::{Hx, Swap};
use htmpl_core::{AttrValue, IntoChild, Node, Result, SafeHtml, render};
use std::future::Future;
use std::pin::Pin;
use std::sync::LazyLock;
use std::time::Duration;

/// HTMX release loaded by [`htmx_scripts`] and [`htmx_extension`].
pub const HTMX_VERSION: &str = "2.0.4";

type ScriptFuture = Pin<Box<dyn Future<Output = Result<SafeHtml>> + Send>>;

static HTMX_SCRIPTS: LazyLock<Memoized<bool, SafeHtml, fn(bool) -> ScriptFuture>> =
	LazyLock::new(|| cached(htmx_script_tag as fn(bool) -> ScriptFuture));

fn htmx_script_tag(debug: bool) -> ScriptFuture {
	Box::pin(async move {
		let is_debug = debug;
		tracing::debug!(debug = is_debug, "rendering htmx script tag");
		let file = if debug { "htmx.js" } else { "htmx.min.js" };
		let src = format!("https://unpkg.com/htmx.org@{HTMX_VERSION}/dist/{file}");
		render(script(()).attr("src", src)).await
	})
}

/// The HTMX `<script>` tag, rendered once per `debug` value. Debug builds
/// load the unminified `htmx.js`.
///
/// ```
/// # tokio_test::block_on(async {
/// let tag = htmpl::components::htmx_scripts(false).await.unwrap();
/// assert_eq!(
///     tag.as_str(),
///     "<script src=\"https://unpkg.com/htmx.org@2.0.4/dist/htmx.min.js\"></script>"
/// );
/// # });
/// ```
pub async fn htmx_scripts(debug: bool) -> Result<SafeHtml> {
	HTMX_SCRIPTS.call(debug).await
}

/// The `<script>` tag for an HTMX extension such as `sse` or `ws`.
pub fn htmx_extension(name: &str) -> Node {
	script(()).attr(
		"src",
		format!("https://unpkg.com/htmx-ext-{name}@{HTMX_VERSION}/{name}.js"),
	)
}

/// A button that posts to `url` and replaces itself with the response,
/// disabled while the request is in flight.
pub fn loading_button(children: impl IntoChild, url: impl Into<AttrValue>) -> Node {
	let hx = Hx::new()
		.target("this")
		.swap(Swap::OuterHtml)
		.disabled_elt("this");
	button(children)
		.attr("type_", "button")
		.attr("hx_post", url)
		.hx(hx)
}

/// An empty trigger that loads the next page after itself once scrolled
/// into view.
pub fn infinite_scroll(url: impl Into<AttrValue>) -> Node {
	div(())
		.attr("hx_get", url)
		.hx(Hx::new().target("this").swap(Swap::AfterEnd).trigger("revealed"))
}

/// Content fetched after page load, replacing a placeholder.
///
/// Without a placeholder a busy `Loading...` span is shown.
pub fn lazy_load(url: impl Into<AttrValue>, placeholder: Option<impl IntoChild>) -> Node {
	let node = div(())
		.attr("hx_get", url)
		.hx(Hx::new().trigger("load").swap(Swap::OuterHtml));
	match placeholder {
		Some(placeholder) => node.child(placeholder),
		None => node.child(span("Loading...").attr("aria_busy", "true")),
	}
}

/// A container that refreshes its content from `url` every `interval`.
pub fn polling_content(
	url: impl Into<AttrValue>,
	interval: Duration,
	children: impl IntoChild,
) -> Node {
	div(children)
		.attr("hx_get", url)
		.hx(Hx::new()
			.trigger(format!("every {}s", interval.as_secs().max(1)))
			.swap(Swap::InnerHtml))
}

/// A search box that requests `url` after typing pauses for `debounce`
/// and writes the result into `target`.
pub fn search_input(
	name: impl Into<AttrValue>,
	url: impl Into<AttrValue>,
	target: &str,
	debounce: Duration,
) -> Node {
	input()
		.attr("type_", "search")
		.attr("name", name)
		.attr("placeholder", "Search...")
		.attr("hx_get", url)
		.hx(Hx::new()
			.target(target.to_string())
			.trigger(format!("input changed delay:{}ms, search", debounce.as_millis()))
			.swap(Swap::InnerHtml))
}

/// A container swapped into the element with the same `id`, outside the
/// main target of the response.
pub fn oob_swap(id: impl Into<AttrValue>, children: impl IntoChild, swap: Swap) -> Node {
	div(children).id(id).attr("hx_swap_oob", swap.as_str())
}
