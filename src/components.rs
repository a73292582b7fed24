//! Pico CSS components
//!
//! Layout, navigation and feedback pieces styled for
//! [Pico CSS](https://picocss.com), built from [`htmpl_core::elements`].
//! Every function returns a [`Node`], so callers can still add attributes:
//!
//! ```
//! # tokio_test::block_on(async {
//! use htmpl::components::{ButtonVariant, button};
//! use htmpl::render;
//!
//! let html = render(button("Cancel", ButtonVariant::Secondary).attr("type_", "button"))
//!     .await
//!     .unwrap();
//! assert_eq!(html.as_str(), "<button type=\"button\" class=\"secondary\">Cancel</button>");
//! # });
//! ```
//!
//! HTMX interaction patterns live in [`htmx`].

pub mod htmx;

pub use htmx::{
	htmx_extension, htmx_scripts, infinite_scroll, lazy_load, loading_button, oob_swap,
	polling_content, search_input,
};

use htmpl_cache::{Memoized, cached};
use htmpl_core::elements as el;
use htmpl_core::{AttrValue, Child, IntoChild, Node, Result, SafeHtml, render};
use std::future::Future;
use std::pin::Pin;
use std::sync::LazyLock;

/// Pico CSS stylesheet.
pub const PICO_CSS: &str = "https://cdn.jsdelivr.net/npm/@picocss/pico@2/css/pico.min.css";

const UTILITY_CSS: &str = ":root { --pico-font-size: 100%; }\
.grid-auto { grid-template-columns: repeat(auto-fit, minmax(280px, 1fr)); }\
.text-center { text-align: center; }\
.text-muted { opacity: 0.7; }\
.mt-1 { margin-top: 1rem; }\
.mb-1 { margin-bottom: 1rem; }\
.visually-hidden { position: absolute; width: 1px; height: 1px; padding: 0; margin: -1px; \
overflow: hidden; clip: rect(0, 0, 0, 0); border: 0; }";

/// Lucide icon script, loaded by [`lucide_scripts`].
pub const LUCIDE_JS: &str = "https://unpkg.com/lucide@latest";

type HtmlFuture = Pin<Box<dyn Future<Output = Result<SafeHtml>> + Send>>;

type IconArgs = (String, u32, Option<String>);

static ICONS: LazyLock<Memoized<IconArgs, SafeHtml, fn(IconArgs) -> HtmlFuture>> =
	LazyLock::new(|| cached(icon_tag as fn(IconArgs) -> HtmlFuture));

static LUCIDE_SCRIPTS: LazyLock<Memoized<(), SafeHtml, fn(()) -> HtmlFuture>> =
	LazyLock::new(|| cached(lucide_tags as fn(()) -> HtmlFuture));

/// Pico color scheme, set as `data-theme` on `<html>`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Theme {
	Light,
	#[default]
	Dark,
	/// Follows the browser preference.
	Auto,
}

impl Theme {
	pub fn as_str(self) -> &'static str {
		match self {
			Theme::Light => "light",
			Theme::Dark => "dark",
			Theme::Auto => "auto",
		}
	}
}

/// Button styles. Primary is Pico's unstyled default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ButtonVariant {
	#[default]
	Primary,
	Secondary,
	Contrast,
	Outline,
}

impl ButtonVariant {
	/// The class for this variant, `None` for primary.
	pub fn class(self) -> Option<&'static str> {
		match self {
			ButtonVariant::Primary => None,
			ButtonVariant::Secondary => Some("secondary"),
			ButtonVariant::Contrast => Some("contrast"),
			ButtonVariant::Outline => Some("outline"),
		}
	}
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AlertVariant {
	#[default]
	Info,
	Success,
	Warning,
	Error,
}

/// Options for [`document`].
#[derive(Debug, Default)]
pub struct DocumentOptions {
	pub theme: Theme,
	/// Content of `<meta name="description">`, omitted when `None`.
	pub description: Option<String>,
	/// Extra children appended to `<head>`.
	pub head: Option<Child>,
	/// Children appended to the end of `<body>`, typically scripts.
	pub scripts: Option<Child>,
}

impl DocumentOptions {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_theme(mut self, theme: Theme) -> Self {
		self.theme = theme;
		self
	}

	pub fn with_description(mut self, description: impl Into<String>) -> Self {
		self.description = Some(description.into());
		self
	}

	pub fn with_head(mut self, head: impl IntoChild) -> Self {
		self.head = Some(head.into_child());
		self
	}

	pub fn with_scripts(mut self, scripts: impl IntoChild) -> Self {
		self.scripts = Some(scripts.into_child());
		self
	}
}

/// Options for [`page`]. The theme defaults to [`Theme::Auto`].
#[derive(Debug)]
pub struct PageOptions {
	pub nav: Option<Child>,
	pub footer: Option<Child>,
	pub document: DocumentOptions,
}

impl Default for PageOptions {
	fn default() -> Self {
		Self {
			nav: None,
			footer: None,
			document: DocumentOptions::new().with_theme(Theme::Auto),
		}
	}
}

impl PageOptions {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_nav(mut self, nav: impl IntoChild) -> Self {
		self.nav = Some(nav.into_child());
		self
	}

	pub fn with_footer(mut self, footer: impl IntoChild) -> Self {
		self.footer = Some(footer.into_child());
		self
	}

	pub fn with_document(mut self, document: DocumentOptions) -> Self {
		self.document = document;
		self
	}
}

/// A complete `<html>` document with Pico CSS.
///
/// Render it with [`render_document`](htmpl_core::render_document) to get
/// the doctype prefix.
pub fn document(title: impl IntoChild, body: impl IntoChild, options: DocumentOptions) -> Node {
	let description = options
		.description
		.map(|content| el::meta().attr("name", "description").attr("content", content));

	let head = el::head((
		el::meta().attr("charset", "utf-8"),
		el::meta()
			.attr("name", "viewport")
			.attr("content", "width=device-width, initial-scale=1"),
		el::title(title),
		description,
		el::link().attr("rel", "stylesheet").attr("href", PICO_CSS),
		el::style(SafeHtml::new(UTILITY_CSS)),
		options.head,
	));

	el::html((head, el::body((body, options.scripts))))
		.attr("lang", "en")
		.attr("data_theme", options.theme.as_str())
}

/// [`document`] with optional navigation, a `main.container` and a footer.
pub fn page(title: impl IntoChild, body: impl IntoChild, options: PageOptions) -> Node {
	let content = (
		options.nav,
		el::main_(body).class("container"),
		options.footer,
	);
	document(title, content, options.document)
}

/// Primary navigation: the brand on the left, one link per `(label, href)`.
pub fn nav<L, H>(brand: impl IntoChild, items: impl IntoIterator<Item = (L, H)>) -> Node
where
	L: IntoChild,
	H: Into<AttrValue>,
{
	let links: Vec<Node> = items
		.into_iter()
		.map(|(label, href)| nav_link(label, href, false))
		.collect();
	el::nav((el::ul(el::li(el::strong(brand))), el::ul(links))).class("container")
}

/// A navigation item. The active link gets `aria-current="page"`.
pub fn nav_link(label: impl IntoChild, href: impl Into<AttrValue>, active: bool) -> Node {
	el::li(
		el::a(label)
			.attr("href", href)
			.attr("aria_current", active.then_some("page")),
	)
}

/// A dropdown menu item for a [`nav`] bar.
pub fn dropdown<L, H>(
	label: impl IntoChild,
	items: impl IntoIterator<Item = (L, H)>,
	align_right: bool,
) -> Node
where
	L: IntoChild,
	H: Into<AttrValue>,
{
	let entries: Vec<Node> = items
		.into_iter()
		.map(|(label, href)| el::li(el::a(label).attr("href", href)))
		.collect();
	el::li(
		el::details((
			el::summary(label),
			el::ul(entries).attr("dir", align_right.then_some("rtl")),
		))
		.class("dropdown"),
	)
}

/// A notice, using Pico's `ins`, `del` and `mark` styling.
pub fn alert(message: impl IntoChild, variant: AlertVariant) -> Node {
	match variant {
		AlertVariant::Success => el::ins(message),
		AlertVariant::Error => el::del(message),
		AlertVariant::Warning => el::mark(message),
		AlertVariant::Info => el::p(el::small(message)),
	}
}

/// An `<article>` card. `header` and `footer` are left out when `None`.
pub fn card(
	title: Option<impl IntoChild>,
	body: impl IntoChild,
	footer: Option<impl IntoChild>,
) -> Node {
	el::article((title.map(el::header), body, footer.map(el::footer)))
}

/// `div.grid`, or auto-fit columns with `auto`.
pub fn grid(children: impl IntoChild, auto: bool) -> Node {
	el::div(children).class(if auto { "grid grid-auto" } else { "grid" })
}

pub fn hgroup(title: impl IntoChild, subtitle: impl IntoChild) -> Node {
	el::hgroup((el::h1(title), el::p(subtitle)))
}

/// A submit button.
pub fn button(children: impl IntoChild, variant: ButtonVariant) -> Node {
	el::button(children)
		.attr("type_", "submit")
		.class(variant.class())
}

/// A link styled as a button.
pub fn button_link(
	children: impl IntoChild,
	href: impl Into<AttrValue>,
	variant: ButtonVariant,
) -> Node {
	el::a(children)
		.attr("href", href)
		.attr("role", "button")
		.class(variant.class())
}

/// A `<dialog>` with an optional title bar and close button.
pub fn modal(
	id: impl Into<AttrValue>,
	body: impl IntoChild,
	title: Option<impl IntoChild>,
	open: bool,
) -> Node {
	let header = title.map(|title| {
		el::header((
			el::button(())
				.attr("aria_label", "Close")
				.attr("rel", "prev")
				.attr("onclick", "this.closest('dialog').close()"),
			el::h3(title),
		))
	});
	el::dialog(el::article((header, body)))
		.id(id)
		.attr("open", open)
}

/// A table with one header row.
pub fn table<H, R, C>(
	headers: impl IntoIterator<Item = H>,
	rows: impl IntoIterator<Item = R>,
) -> Node
where
	H: IntoChild,
	R: IntoIterator<Item = C>,
	C: IntoChild,
{
	let head: Vec<Node> = headers.into_iter().map(el::th).collect();
	let body: Vec<Node> = rows
		.into_iter()
		.map(|row| el::tr(row.into_iter().map(el::td).collect::<Vec<_>>()))
		.collect();
	el::table((el::thead(el::tr(head)), el::tbody(body)))
}

/// A busy article, shown while content loads.
pub fn loading(text: impl IntoChild) -> Node {
	el::article(text).attr("aria_busy", "true")
}

pub fn skeleton(height: &str) -> Node {
	el::div(())
		.attr("aria_busy", "true")
		.attr("style", format!("height: {height}"))
}

/// Content for screen readers only.
pub fn visually_hidden(children: impl IntoChild) -> Node {
	el::span(children).class("visually-hidden")
}

fn icon_tag((name, size, label): IconArgs) -> HtmlFuture {
	Box::pin(async move {
		let node = el::i(())
			.attr("data_lucide", name)
			.attr("style", format!("width:{size}px;height:{size}px"));
		let node = match label {
			Some(label) => node.attr("aria_label", label),
			None => node.attr("aria_hidden", "true"),
		};
		render(node).await
	})
}

fn lucide_tags((): ()) -> HtmlFuture {
	Box::pin(async {
		render((
			el::script(()).attr("src", LUCIDE_JS),
			el::script(SafeHtml::new("lucide.createIcons();")),
		))
		.await
	})
}

/// A [Lucide](https://lucide.dev) icon, `size` pixels square.
///
/// Without a label the icon is hidden from screen readers. Each distinct
/// icon is rendered once and reused.
///
/// ```
/// # tokio_test::block_on(async {
/// let icon = htmpl::components::icon("trash", 16, Some("Delete")).await.unwrap();
/// assert_eq!(
///     icon.as_str(),
///     "<i data-lucide=\"trash\" style=\"width:16px;height:16px\" aria-label=\"Delete\"></i>"
/// );
/// # });
/// ```
pub async fn icon(name: &str, size: u32, label: Option<&str>) -> Result<SafeHtml> {
	ICONS
		.call((name.to_string(), size, label.map(str::to_string)))
		.await
}

/// The Lucide script and the call that replaces `<i data-lucide>` placeholders.
pub async fn lucide_scripts() -> Result<SafeHtml> {
	LUCIDE_SCRIPTS.call(()).await
}

#[cfg(test)]
mod tests {
	use super::*;
	use htmpl_core::{render, render_document};
	use rstest::rstest;

	async fn html(node: Node) -> String {
		render(node).await.unwrap().into_string()
	}

	#[rstest]
	#[tokio::test]
	async fn test_document_head_and_theme() {
		let doc = document(
			"Home <1>",
			el::p("hi"),
			DocumentOptions::new().with_description("About \"us\""),
		);
		let out = render_document(doc).await.unwrap().into_string();

		assert!(out.starts_with("<!DOCTYPE html><html lang=\"en\" data-theme=\"dark\"><head>"));
		assert!(out.contains("<meta charset=\"utf-8\" />"));
		assert!(out.contains("<title>Home &lt;1&gt;</title>"));
		assert!(out.contains("<meta name=\"description\" content=\"About &quot;us&quot;\" />"));
		assert!(out.contains(&format!("<link rel=\"stylesheet\" href=\"{PICO_CSS}\" />")));
		assert!(out.contains(".grid-auto {"));
		assert!(out.ends_with("</head><body><p>hi</p></body></html>"));
	}

	#[rstest]
	#[tokio::test]
	async fn test_document_without_description() {
		let out = html(document("t", (), DocumentOptions::new())).await;
		assert!(!out.contains("name=\"description\""));
	}

	#[rstest]
	#[tokio::test]
	async fn test_page_layout() {
		let options = PageOptions::new()
			.with_nav(nav("Acme", [("Docs", "/docs")]))
			.with_footer(el::footer("(c) Acme"));
		let out = html(page("Acme", el::h1("Welcome"), options)).await;

		assert!(out.starts_with("<html lang=\"en\" data-theme=\"auto\">"));
		assert!(out.contains(
			"<body><nav class=\"container\"><ul><li><strong>Acme</strong></li></ul>\
			 <ul><li><a href=\"/docs\">Docs</a></li></ul></nav>\
			 <main class=\"container\"><h1>Welcome</h1></main><footer>(c) Acme</footer></body>"
		));
	}

	#[rstest]
	#[case(true, "<li><a href=\"/\" aria-current=\"page\">Home</a></li>")]
	#[case(false, "<li><a href=\"/\">Home</a></li>")]
	#[tokio::test]
	async fn test_nav_link(#[case] active: bool, #[case] expected: &str) {
		assert_eq!(html(nav_link("Home", "/", active)).await, expected);
	}

	#[rstest]
	#[case(AlertVariant::Success, "<ins>saved</ins>")]
	#[case(AlertVariant::Error, "<del>saved</del>")]
	#[case(AlertVariant::Warning, "<mark>saved</mark>")]
	#[case(AlertVariant::Info, "<p><small>saved</small></p>")]
	#[tokio::test]
	async fn test_alert_variants(#[case] variant: AlertVariant, #[case] expected: &str) {
		assert_eq!(html(alert("saved", variant)).await, expected);
	}

	#[rstest]
	#[tokio::test]
	async fn test_card_parts_are_optional() {
		assert_eq!(
			html(card(Some("Title"), el::p("body"), Some("foot"))).await,
			"<article><header>Title</header><p>body</p><footer>foot</footer></article>"
		);
		assert_eq!(
			html(card(None::<&str>, "body", None::<&str>)).await,
			"<article>body</article>"
		);
	}

	#[rstest]
	#[case(ButtonVariant::Primary, "<button type=\"submit\">Go</button>")]
	#[case(ButtonVariant::Outline, "<button type=\"submit\" class=\"outline\">Go</button>")]
	#[tokio::test]
	async fn test_button_variant_class(#[case] variant: ButtonVariant, #[case] expected: &str) {
		assert_eq!(html(button("Go", variant)).await, expected);
	}

	#[rstest]
	#[tokio::test]
	async fn test_modal_and_table() {
		assert_eq!(
			html(modal("confirm", "Sure?", None::<&str>, true)).await,
			"<dialog id=\"confirm\" open><article>Sure?</article></dialog>"
		);
		assert_eq!(
			html(table(["Name", "Age"], [vec!["Ann".to_string(), "30".to_string()]])).await,
			"<table><thead><tr><th>Name</th><th>Age</th></tr></thead>\
			 <tbody><tr><td>Ann</td><td>30</td></tr></tbody></table>"
		);
	}

	#[rstest]
	#[tokio::test]
	async fn test_dropdown_alignment() {
		let out = html(dropdown("More", [("A", "/a")], true)).await;
		assert_eq!(
			out,
			"<li><details class=\"dropdown\"><summary>More</summary>\
			 <ul dir=\"rtl\"><li><a href=\"/a\">A</a></li></ul></details></li>"
		);
	}

	#[rstest]
	#[case(None, "aria-hidden=\"true\"")]
	#[case(Some("Close <x>"), "aria-label=\"Close &lt;x&gt;\"")]
	#[tokio::test]
	async fn test_icon_accessibility(#[case] label: Option<&str>, #[case] aria: &str) {
		let out = icon("x", 24, label).await.unwrap();
		assert_eq!(
			out.as_str(),
			format!("<i data-lucide=\"x\" style=\"width:24px;height:24px\" {aria}></i>")
		);
	}

	#[rstest]
	#[tokio::test]
	async fn test_icons_are_memoized() {
		let first = icon("memo-check", 32, None).await.unwrap();
		let hits = ICONS.cache_info().hits;
		let again = icon("memo-check", 32, None).await.unwrap();
		assert_eq!(again, first);
		assert!(ICONS.cache_info().hits > hits);
	}

	#[rstest]
	#[tokio::test]
	async fn test_lucide_scripts() {
		let out = lucide_scripts().await.unwrap();
		assert_eq!(
			out.as_str(),
			format!("<script src=\"{LUCIDE_JS}\"></script><script>lucide.createIcons();</script>")
		);
		assert_eq!(lucide_scripts().await.unwrap(), out);
	}
}
