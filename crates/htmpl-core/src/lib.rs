//! # htmpl-core
//!
//! HTML elements as plain function calls, rendered asynchronously.
//!
//! ## Features
//!
//! - **Element builders**: one function per tag in [`elements`], returning an
//!   immutable [`Node`]
//! - **Automatic escaping**: text is escaped on output; [`SafeHtml`] marks
//!   markup that is already safe
//! - **Async children**: futures and [`Component`]s are resolved in place
//!   while rendering
//! - **Templates**: [`Template`] interleaves trusted literal markup with
//!   escaped values
//! - **HTMX**: the [`htmx::Hx`] attribute builder
//!
//! ## Example
//!
//! ```
//! # tokio_test::block_on(async {
//! use htmpl_core::prelude::*;
//!
//! let user = "<admin>";
//! let page = div((
//!     h1("Profile"),
//!     p(("Signed in as ", strong(user))),
//!     Child::pending(async { Ok::<_, Error>(span("loaded later")) }),
//! ))
//! .class("profile");
//!
//! let html = render(page).await.unwrap();
//! assert_eq!(
//!     html.as_str(),
//!     "<div class=\"profile\"><h1>Profile</h1>\
//!      <p>Signed in as <strong>&lt;admin&gt;</strong></p>\
//!      <span>loaded later</span></div>"
//! );
//! # });
//! ```

pub mod attrs;
pub mod elements;
pub mod escape;
pub mod exception;
pub mod htmx;
pub mod node;
pub mod render;
pub mod safe;
pub mod template;

pub use attrs::{AttrValue, Attributes, attr};
pub use escape::{escape, escape_into};
pub use exception::{Error, FieldErrors, Result};
pub use node::{Child, Component, Fragment, IntoChild, Node, PendingChild, fragment};
pub use render::{RenderOptions, Renderer, VoidStyle, render, render_document};
pub use safe::{SafeHtml, raw};
pub use template::{Template, TemplatePart};

/// Re-exports for glob import in view code.
pub mod prelude {
	pub use crate::elements::*;
	pub use crate::htmx::{Hx, Swap};
	pub use crate::{
		AttrValue, Child, Component, Error, Fragment, IntoChild, Node, Result, SafeHtml, Template,
		attr, escape, fragment, raw, render, render_document,
	};
}
