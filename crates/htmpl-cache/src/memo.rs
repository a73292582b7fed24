//! Memoizing wrappers around async render functions.

use crate::key::CacheKey;
use crate::store::{Cache, CacheInfo};
use htmpl_core::{Child, IntoChild, Result};
use serde::Serialize;
use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;

/// An async function paired with a cache keyed by its arguments.
///
/// Functions take one argument; use a tuple or a `Serialize` struct for
/// several. Synchronous functions can be wrapped as
/// `|args| async move { Ok(f(args)) }`.
pub struct Memoized<A, V, F> {
	cache: Cache<V>,
	func: F,
	_args: PhantomData<fn(A)>,
}

impl<A, V, F> std::fmt::Debug for Memoized<A, V, F> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Memoized").field("cache", &self.cache).finish()
	}
}

impl<A, V, F, Fut> Memoized<A, V, F>
where
	A: Serialize,
	V: Clone,
	F: Fn(A) -> Fut,
	Fut: Future<Output = Result<V>>,
{
	/// Wraps `func` with an existing cache.
	pub fn new(cache: Cache<V>, func: F) -> Self {
		Self {
			cache,
			func,
			_args: PhantomData,
		}
	}

	/// Calls the function, or returns the cached result for equal arguments.
	pub async fn call(&self, args: A) -> Result<V> {
		let key = CacheKey::from_args(&args)?;
		self.cache.get_or_compute(key, || (self.func)(args)).await
	}
}

impl<A, V, F> Memoized<A, V, F> {
	pub fn cache(&self) -> &Cache<V> {
		&self.cache
	}

	pub fn cache_info(&self) -> CacheInfo {
		self.cache.info()
	}

	pub fn cache_clear(&self) {
		self.cache.clear();
	}
}

impl<A, V, F, Fut> Memoized<A, V, F>
where
	A: Serialize + Send + 'static,
	V: Clone + IntoChild + Send + Sync + 'static,
	F: Fn(A) -> Fut + Send + Sync + 'static,
	Fut: Future<Output = Result<V>> + Send + 'static,
{
	/// A pending child that calls the function when the renderer reaches it.
	///
	/// # Examples
	///
	/// ```
	/// # tokio_test::block_on(async {
	/// use htmpl_cache::cached;
	/// use htmpl_core::{SafeHtml, elements::div, render};
	/// use std::sync::Arc;
	///
	/// let badge = Arc::new(cached(|count: u32| async move {
	///     Ok(SafeHtml::new(format!("<b>{count}</b>")))
	/// }));
	/// let html = render(div((badge.defer(3), badge.defer(3)))).await.unwrap();
	/// assert_eq!(html.as_str(), "<div><b>3</b><b>3</b></div>");
	/// assert_eq!(badge.cache_info().misses, 1);
	/// # });
	/// ```
	pub fn defer(self: &Arc<Self>, args: A) -> Child {
		let memo = Arc::clone(self);
		Child::pending(async move { memo.call(args).await })
	}
}

/// Memoizes `func` for the life of the returned wrapper.
///
/// # Examples
///
/// ```
/// # tokio_test::block_on(async {
/// use htmpl_cache::cached;
///
/// let greet = cached(|name: String| async move { Ok(format!("Hello, {name}")) });
/// assert_eq!(greet.call("Ann".into()).await.unwrap(), "Hello, Ann");
/// assert_eq!(greet.call("Ann".into()).await.unwrap(), "Hello, Ann");
/// assert_eq!(greet.cache_info().hits, 1);
/// # });
/// ```
pub fn cached<A, V, F, Fut>(func: F) -> Memoized<A, V, F>
where
	A: Serialize,
	V: Clone,
	F: Fn(A) -> Fut,
	Fut: Future<Output = Result<V>>,
{
	Memoized::new(Cache::unbounded(), func)
}

/// Memoizes `func`, keeping at most `maxsize` results.
pub fn cached_lru<A, V, F, Fut>(maxsize: usize, func: F) -> Memoized<A, V, F>
where
	A: Serialize,
	V: Clone,
	F: Fn(A) -> Fut,
	Fut: Future<Output = Result<V>>,
{
	Memoized::new(Cache::lru(maxsize), func)
}

/// Memoizes `func`, recomputing results older than `ttl`.
pub fn cached_ttl<A, V, F, Fut>(ttl: Duration, func: F) -> Memoized<A, V, F>
where
	A: Serialize,
	V: Clone,
	F: Fn(A) -> Fut,
	Fut: Future<Output = Result<V>>,
{
	Memoized::new(Cache::ttl(ttl), func)
}
