//! Get-or-compute cache with unbounded, LRU and TTL policies.
//!
//! Each key owns one slot holding a [`tokio::sync::OnceCell`]. The first
//! caller for a key fills the cell; callers arriving while the computation is
//! in flight wait on the same cell instead of starting another one. When the
//! computation fails, one waiting caller runs its own computation in the same
//! cell, so at most one computation per key is ever in flight. The store
//! mutex only guards the slot map and is released before any await.

use crate::key::CacheKey;
use htmpl_core::Result;
use parking_lot::Mutex;
use std::collections::{BTreeMap, HashMap};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::OnceCell;
use tokio::time::Instant;

/// Retention policy of a [`Cache`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
	/// Entries live as long as the cache.
	Unbounded,
	/// At most `maxsize` entries; the least recently used one is evicted.
	Lru { maxsize: usize },
	/// Entries expire `ttl` after they were computed.
	Ttl { ttl: Duration },
}

/// Counters reported by [`Cache::info`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheInfo {
	pub hits: u64,
	pub misses: u64,
	/// Number of slots, including computations still in flight.
	pub size: usize,
	pub maxsize: Option<usize>,
}

struct Entry<V> {
	value: V,
	inserted: Instant,
}

type Cell<V> = Arc<OnceCell<Entry<V>>>;

struct Slot<V> {
	cell: Cell<V>,
	tick: u64,
}

struct Store<V> {
	slots: HashMap<CacheKey, Slot<V>>,
	/// Recency order for LRU: tick -> key, oldest first.
	recency: BTreeMap<u64, CacheKey>,
	tick: u64,
	hits: u64,
	misses: u64,
}

impl<V> Default for Store<V> {
	fn default() -> Self {
		Self {
			slots: HashMap::new(),
			recency: BTreeMap::new(),
			tick: 0,
			hits: 0,
			misses: 0,
		}
	}
}

impl<V> Store<V> {
	fn touch(&mut self, key: &CacheKey) {
		self.tick += 1;
		let tick = self.tick;
		if let Some(slot) = self.slots.get_mut(key) {
			self.recency.remove(&slot.tick);
			slot.tick = tick;
			self.recency.insert(tick, key.clone());
		}
	}

	fn remove(&mut self, key: &CacheKey) -> Option<Slot<V>> {
		let slot = self.slots.remove(key)?;
		self.recency.remove(&slot.tick);
		Some(slot)
	}

	fn evict_over(&mut self, maxsize: usize) {
		while self.slots.len() > maxsize {
			let Some((_, key)) = self.recency.pop_first() else {
				break;
			};
			self.slots.remove(&key);
			tracing::debug!(key = %key, "cache entry evicted");
		}
	}
}

enum Lookup<V> {
	Hit(V),
	Wait(Cell<V>),
}

enum Found<V> {
	Fresh(V),
	InFlight(Cell<V>),
	Expired,
	Missing,
}

/// A concurrent get-or-compute cache.
///
/// # Examples
///
/// ```
/// # tokio_test::block_on(async {
/// use htmpl_cache::{Cache, CacheKey};
///
/// let cache = Cache::lru(2);
/// let key = CacheKey::from_args(&"home").unwrap();
///
/// let first = cache.get_or_compute(key.clone(), || async { Ok(String::from("rendered")) }).await;
/// let second = cache.get_or_compute(key, || async { Ok(String::from("not called")) }).await;
/// assert_eq!(first.unwrap(), "rendered");
/// assert_eq!(second.unwrap(), "rendered");
/// assert_eq!(cache.info().hits, 1);
/// # });
/// ```
pub struct Cache<V> {
	policy: Policy,
	store: Mutex<Store<V>>,
}

impl<V> std::fmt::Debug for Cache<V> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Cache")
			.field("policy", &self.policy)
			.field("info", &self.info())
			.finish()
	}
}

impl<V> Cache<V> {
	pub fn new(policy: Policy) -> Self {
		Self {
			policy,
			store: Mutex::new(Store::default()),
		}
	}

	/// A cache without a size limit.
	pub fn unbounded() -> Self {
		Self::new(Policy::Unbounded)
	}

	/// A cache holding at most `maxsize` entries.
	pub fn lru(maxsize: usize) -> Self {
		Self::new(Policy::Lru { maxsize })
	}

	/// A cache whose entries expire `ttl` after insertion.
	pub fn ttl(ttl: Duration) -> Self {
		Self::new(Policy::Ttl { ttl })
	}

	pub fn policy(&self) -> Policy {
		self.policy
	}

	fn maxsize(&self) -> Option<usize> {
		match self.policy {
			Policy::Lru { maxsize } => Some(maxsize),
			Policy::Unbounded | Policy::Ttl { .. } => None,
		}
	}

	fn is_expired(&self, entry: &Entry<V>, now: Instant) -> bool {
		match self.policy {
			Policy::Ttl { ttl } => entry
				.inserted
				.checked_add(ttl)
				.is_some_and(|deadline| now >= deadline),
			Policy::Unbounded | Policy::Lru { .. } => false,
		}
	}

	pub fn info(&self) -> CacheInfo {
		let store = self.store.lock();
		CacheInfo {
			hits: store.hits,
			misses: store.misses,
			size: store.slots.len(),
			maxsize: self.maxsize(),
		}
	}

	/// Drops every entry and resets the counters.
	pub fn clear(&self) {
		let mut store = self.store.lock();
		*store = Store::default();
	}

	pub fn len(&self) -> usize {
		self.store.lock().slots.len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Whether a computed, unexpired value is stored for `key`.
	pub fn contains(&self, key: &CacheKey) -> bool {
		let now = Instant::now();
		let store = self.store.lock();
		store
			.slots
			.get(key)
			.and_then(|slot| slot.cell.get())
			.is_some_and(|entry| !self.is_expired(entry, now))
	}

	/// Removes the entry for `key`, returning whether one existed.
	pub fn remove(&self, key: &CacheKey) -> bool {
		self.store.lock().remove(key).is_some()
	}

	/// Drops every expired entry. Expiry is otherwise only noticed when the
	/// expired key is looked up again.
	pub fn purge_expired(&self) -> usize {
		let now = Instant::now();
		let mut store = self.store.lock();
		let expired: Vec<CacheKey> = store
			.slots
			.iter()
			.filter(|(_, slot)| slot.cell.get().is_some_and(|e| self.is_expired(e, now)))
			.map(|(key, _)| key.clone())
			.collect();
		for key in &expired {
			store.remove(key);
		}
		expired.len()
	}

	/// Drops the slot of a failed computation unless other callers are still
	/// waiting on its cell. Those callers retry in the cell, and later callers
	/// must find it to join them. Holders of the cell are the slot itself and
	/// `cell`.
	fn discard_if_empty(&self, key: &CacheKey, cell: &Cell<V>) {
		let mut store = self.store.lock();
		let stale = store.slots.get(key).is_some_and(|slot| {
			Arc::ptr_eq(&slot.cell, cell)
				&& !slot.cell.initialized()
				&& Arc::strong_count(cell) == 2
		});
		if stale {
			store.remove(key);
		}
	}
}

impl<V: Clone> Cache<V> {
	fn lookup(&self, key: &CacheKey) -> Lookup<V> {
		let now = Instant::now();
		let mut guard = self.store.lock();
		let store = &mut *guard;

		let found = match store.slots.get(key) {
			None => Found::Missing,
			Some(slot) => match slot.cell.get() {
				Some(entry) if self.is_expired(entry, now) => Found::Expired,
				Some(entry) => Found::Fresh(entry.value.clone()),
				None => Found::InFlight(Arc::clone(&slot.cell)),
			},
		};

		match found {
			Found::Fresh(value) => {
				store.hits += 1;
				if self.maxsize().is_some() {
					store.touch(key);
				}
				tracing::debug!(key = %key, "cache hit");
				return Lookup::Hit(value);
			}
			Found::InFlight(cell) => {
				store.hits += 1;
				if self.maxsize().is_some() {
					store.touch(key);
				}
				tracing::debug!(key = %key, "joining in-flight computation");
				return Lookup::Wait(cell);
			}
			Found::Expired => {
				store.remove(key);
				tracing::debug!(key = %key, "cache entry expired");
			}
			Found::Missing => {}
		}

		store.misses += 1;
		tracing::debug!(key = %key, "cache miss");
		let cell: Cell<V> = Arc::new(OnceCell::new());
		store.slots.insert(
			key.clone(),
			Slot {
				cell: Arc::clone(&cell),
				tick: 0,
			},
		);
		if let Some(maxsize) = self.maxsize() {
			store.touch(key);
			store.evict_over(maxsize);
		}
		Lookup::Wait(cell)
	}

	/// Returns the cached value for `key`, computing it with `compute` when
	/// there is none.
	///
	/// Concurrent calls for the same key share one computation. A failed
	/// computation is not cached: its error is returned to its own caller
	/// only, and the next caller waiting on the key computes again.
	pub async fn get_or_compute<F, Fut>(&self, key: CacheKey, compute: F) -> Result<V>
	where
		F: FnOnce() -> Fut,
		Fut: Future<Output = Result<V>>,
	{
		let cell = match self.lookup(&key) {
			Lookup::Hit(value) => return Ok(value),
			Lookup::Wait(cell) => cell,
		};

		let outcome = cell
			.get_or_try_init(|| async move {
				let value = compute().await?;
				Ok(Entry {
					value,
					inserted: Instant::now(),
				})
			})
			.await;

		match outcome {
			Ok(entry) => Ok(entry.value.clone()),
			Err(err) => {
				self.discard_if_empty(&key, &cell);
				Err(err)
			}
		}
	}
}
