//! Per-component stylesheets and scripts
//!
//! Components declare the assets they need once, in an [`AssetRegistry`].
//! While a page is assembled, an [`AssetCollector`] records which components
//! were used and emits each asset once, in first-use order, as `<head>` tags:
//!
//! ```
//! # tokio_test::block_on(async {
//! use htmpl::assets::{AssetCollector, AssetRegistry, ComponentAssets};
//! use htmpl::render;
//!
//! let registry = AssetRegistry::new();
//! registry
//!     .register(ComponentAssets::new("chart").css("/static/chart.css").js("/static/chart.js"))
//!     .unwrap();
//! registry
//!     .register(ComponentAssets::new("table").css("/static/chart.css"))
//!     .unwrap();
//!
//! let mut collector = AssetCollector::new();
//! collector.use_component(&registry, "chart");
//! collector.use_component(&registry, "table");
//!
//! assert_eq!(
//!     render(collector.head()).await.unwrap().as_str(),
//!     "<link rel=\"stylesheet\" href=\"/static/chart.css\" />\
//!      <script src=\"/static/chart.js\" defer></script>"
//! );
//! # });
//! ```
//!
//! Bundling is left to the build; URLs are emitted as declared.

use htmpl_core::elements::{link, script};
use htmpl_core::{Error, Fragment, Node, Result, fragment};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::LazyLock;

static GLOBAL: LazyLock<AssetRegistry> = LazyLock::new(AssetRegistry::new);

/// The process-wide registry.
pub fn registry() -> &'static AssetRegistry {
	&GLOBAL
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Asset {
	/// A stylesheet, emitted as `<link rel="stylesheet">`.
	Css(String),
	/// A script, emitted as `<script defer>`.
	Js(String),
}

impl Asset {
	pub fn url(&self) -> &str {
		match self {
			Asset::Css(url) | Asset::Js(url) => url,
		}
	}

	/// The `<head>` tag loading this asset.
	pub fn to_node(&self) -> Node {
		match self {
			Asset::Css(url) => link().attr("rel", "stylesheet").attr("href", url),
			Asset::Js(url) => script(()).attr("src", url).attr("defer", true),
		}
	}

	fn check(&self) -> Result<()> {
		let url = self.url();
		if url.trim().is_empty() {
			return Err(Error::Config("asset URL is empty".to_string()));
		}
		if url.split(['/', '\\']).any(|segment| segment == "..") {
			return Err(Error::Config(format!("asset URL `{url}` leaves its root")));
		}
		Ok(())
	}
}

/// The assets one component depends on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComponentAssets {
	pub name: String,
	pub assets: Vec<Asset>,
}

impl ComponentAssets {
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			assets: Vec::new(),
		}
	}

	pub fn css(mut self, url: impl Into<String>) -> Self {
		self.assets.push(Asset::Css(url.into()));
		self
	}

	pub fn js(mut self, url: impl Into<String>) -> Self {
		self.assets.push(Asset::Js(url.into()));
		self
	}
}

/// Asset declarations by component name.
#[derive(Debug, Default)]
pub struct AssetRegistry {
	components: RwLock<HashMap<String, ComponentAssets>>,
}

impl AssetRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	/// Declares a component's assets, replacing an earlier declaration with
	/// the same name.
	///
	/// # Errors
	///
	/// Returns [`Error::Config`] for an empty URL or one with a `..` segment.
	pub fn register(&self, component: ComponentAssets) -> Result<()> {
		for asset in &component.assets {
			asset.check()?;
		}
		tracing::debug!(
			component = %component.name,
			assets = component.assets.len(),
			"registered component assets"
		);
		self.components
			.write()
			.insert(component.name.clone(), component);
		Ok(())
	}

	pub fn get(&self, name: &str) -> Option<ComponentAssets> {
		self.components.read().get(name).cloned()
	}

	pub fn contains(&self, name: &str) -> bool {
		self.components.read().contains_key(name)
	}

	pub fn len(&self) -> usize {
		self.components.read().len()
	}

	pub fn is_empty(&self) -> bool {
		self.components.read().is_empty()
	}

	pub fn clear(&self) {
		self.components.write().clear();
	}
}

/// Assets gathered while building one page.
#[derive(Debug, Clone, Default)]
pub struct AssetCollector {
	css: Vec<String>,
	js: Vec<String>,
}

impl AssetCollector {
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds one asset; repeats are ignored.
	pub fn add(&mut self, asset: &Asset) {
		let list = match asset {
			Asset::Css(_) => &mut self.css,
			Asset::Js(_) => &mut self.js,
		};
		if !list.iter().any(|url| url == asset.url()) {
			list.push(asset.url().to_string());
		}
	}

	pub fn add_component(&mut self, component: &ComponentAssets) {
		for asset in &component.assets {
			self.add(asset);
		}
	}

	/// Adds the assets registered for `name`. Returns `false` when nothing is
	/// registered under it.
	pub fn use_component(&mut self, registry: &AssetRegistry, name: &str) -> bool {
		match registry.get(name) {
			Some(component) => {
				self.add_component(&component);
				true
			}
			None => {
				tracing::warn!(component = name, "no assets registered");
				false
			}
		}
	}

	pub fn css(&self) -> &[String] {
		&self.css
	}

	pub fn js(&self) -> &[String] {
		&self.js
	}

	pub fn is_empty(&self) -> bool {
		self.css.is_empty() && self.js.is_empty()
	}

	/// Stylesheet links followed by deferred scripts, for
	/// [`DocumentOptions::with_head`](crate::components::DocumentOptions::with_head).
	pub fn head(&self) -> Fragment {
		let css = self.css.iter().map(|url| Asset::Css(url.clone()).to_node());
		let js = self.js.iter().map(|url| Asset::Js(url.clone()).to_node());
		fragment(css.chain(js).collect::<Vec<Node>>())
	}
}
