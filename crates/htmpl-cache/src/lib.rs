//! # htmpl-cache
//!
//! Memoization for render functions.
//!
//! [`cached`], [`cached_lru`] and [`cached_ttl`] wrap an async function in a
//! [`Memoized`] whose cache is keyed by the call arguments (see
//! [`CacheKey`]). [`Cache`] offers the same get-or-compute behavior for
//! callers that build keys themselves.
//!
//! Concurrent calls with equal arguments share one computation, and errors
//! are returned to every waiting caller without being cached.
//!
//! ```
//! # tokio_test::block_on(async {
//! use htmpl_cache::cached_lru;
//! use htmpl_core::{elements::li, render, SafeHtml};
//!
//! let row = cached_lru(128, |(id, name): (u32, String)| async move {
//!     render(li(name).attr("data_id", id)).await
//! });
//!
//! let html: SafeHtml = row.call((7, "Ann".into())).await.unwrap();
//! assert_eq!(html.as_str(), "<li data-id=\"7\">Ann</li>");
//! # });
//! ```

pub mod key;
pub mod memo;
pub mod store;

pub use key::CacheKey;
pub use memo::{Memoized, cached, cached_lru, cached_ttl};
pub use store::{Cache, CacheInfo, Policy};
