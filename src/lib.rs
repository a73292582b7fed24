//! # htmpl
//!
//! Typed HTML elements rendered asynchronously, with memoized components,
//! schema-driven forms and an HTMX-friendly HTTP adapter.
//!
//! ## Core Principles
//!
//! - **Escaped by default**: text and attribute values are escaped on output;
//!   only [`SafeHtml`] passes through verbatim
//! - **Async all the way down**: futures and components can appear anywhere
//!   in the tree and are resolved while rendering
//! - **Plain functions**: elements and components are functions returning a
//!   [`Node`], composed with ordinary Rust
//!
//! ## Feature Flags
//!
//! - `minimal` - Element builder and renderer only
//! - `cache` - [`cached`], [`cached_lru`] and [`cached_ttl`] memoization
//! - `forms` - Schema-driven form rendering and validation
//! - `http` - hyper server, [`HtmlRouter`] and form routes (implies `forms`)
//! - `components` - Pico CSS and HTMX components and per-component assets
//!   (implies `cache`)
//! - `full` (default) - Everything above
//!
//! ## Quick Example
//!
//! ```
//! # tokio_test::block_on(async {
//! use htmpl::prelude::*;
//! use htmpl::components::{AlertVariant, alert, card};
//!
//! let user = "<ann>";
//! let html = render(card(
//!     Some("Profile"),
//!     p(("Signed in as ", strong(user))),
//!     Some(alert("Saved", AlertVariant::Success)),
//! ))
//! .await
//! .unwrap();
//!
//! assert_eq!(
//!     html.as_str(),
//!     "<article><header>Profile</header><p>Signed in as <strong>&lt;ann&gt;</strong></p>\
//!      <footer><ins>Saved</ins></footer></article>"
//! );
//! # });
//! ```

#[cfg(feature = "components")]
pub mod assets;
#[cfg(feature = "cache")]
pub mod cache;
#[cfg(feature = "components")]
pub mod components;
#[cfg(feature = "forms")]
pub mod forms;
#[cfg(feature = "http")]
pub mod http;

// Re-export the core crate's modules
pub use htmpl_core::{attrs, elements, escape, htmx, template};

// Re-export core types
pub use htmpl_core::{
	AttrValue, Attributes, Child, Component, Error, FieldErrors, Fragment, IntoChild, Node,
	PendingChild, RenderOptions, Renderer, Result, SafeHtml, Template, TemplatePart, VoidStyle,
	attr, fragment, raw, render, render_document,
};

// Re-export memoization
#[cfg(feature = "cache")]
pub use htmpl_cache::{Cache, CacheInfo, CacheKey, Memoized, Policy, cached, cached_lru, cached_ttl};

// Re-export forms
#[cfg(feature = "forms")]
pub use htmpl_forms::{
	FieldSchema, Form, FormLayout, FormModel, FormSchema, FormValues, RenderForm, validate,
};

// Re-export the HTTP adapter
#[cfg(feature = "http")]
pub use htmpl_http::{
	Handler, HtmlRouter, IntoResponse, Request, Response, Server, ServerSettings, serve,
};

/// Re-exports for glob import in view code.
pub mod prelude {
	pub use htmpl_core::prelude::*;

	#[cfg(feature = "cache")]
	pub use htmpl_cache::{cached, cached_lru, cached_ttl};

	#[cfg(feature = "forms")]
	pub use htmpl_forms::{FieldSchema, Form, FormModel, FormSchema, RenderForm};

	#[cfg(feature = "http")]
	pub use htmpl_http::{HtmlRouter, Request, Response, Server, ServerSettings};
}
