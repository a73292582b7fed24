//! Memoization for render functions.
//!
//! ```
//! # tokio_test::block_on(async {
//! use htmpl::cache::cached;
//! use htmpl::{SafeHtml, render};
//! use htmpl::elements::span;
//!
//! let badge = cached(|count: u32| async move { render(span(count).class("badge")).await });
//! let html: SafeHtml = badge.call(3).await.unwrap();
//! assert_eq!(html.as_str(), "<span class=\"badge\">3</span>");
//! # });
//! ```

pub use htmpl_cache::*;
