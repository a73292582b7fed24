//! Memoization integration tests
//!
//! Success Criteria:
//! 1. Equal arguments hit the cache, distinct arguments miss
//! 2. LRU keeps the most recently used entries
//! 3. TTL entries are recomputed only after expiry
//! 4. Concurrent identical calls run the wrapped function once
//! 5. Key construction failures surface as errors

use htmpl_cache::{cached, cached_lru, cached_ttl};
use htmpl_core::elements::{div, li, ul};
use htmpl_core::{Error, SafeHtml, render};
use rstest::*;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

// ============================================================================
// Fixtures
// ============================================================================

#[fixture]
fn calls() -> Arc<AtomicUsize> {
	Arc::new(AtomicUsize::new(0))
}

#[derive(Serialize)]
struct ListProps {
	title: String,
	items: Vec<String>,
}

// ============================================================================
// Happy Path
// ============================================================================

#[rstest]
#[tokio::test]
async fn test_cached_render_component(calls: Arc<AtomicUsize>) {
	let counter = calls.clone();
	let list = cached(move |props: ListProps| {
		let counter = counter.clone();
		async move {
			counter.fetch_add(1, Ordering::SeqCst);
			let items: Vec<_> = props.items.into_iter().map(li).collect();
			render(div((props.title, ul(items)))).await
		}
	});

	let props = || ListProps {
		title: "Fruit".into(),
		items: vec!["apple".into(), "<pear>".into()],
	};
	let first = list.call(props()).await.unwrap();
	let second = list.call(props()).await.unwrap();

	assert_eq!(first, second);
	assert_eq!(
		first.as_str(),
		"<div>Fruit<ul><li>apple</li><li>&lt;pear&gt;</li></ul></div>"
	);
	assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[rstest]
#[tokio::test]
async fn test_lru_maxsize_two(calls: Arc<AtomicUsize>) {
	let counter = calls.clone();
	let upper = cached_lru(2, move |name: &'static str| {
		let counter = counter.clone();
		async move {
			counter.fetch_add(1, Ordering::SeqCst);
			Ok(name.to_uppercase())
		}
	});

	for name in ["a", "b", "c"] {
		upper.call(name).await.unwrap();
	}
	assert_eq!(calls.load(Ordering::SeqCst), 3);

	// `b` is refreshed, so inserting `d` evicts `c`.
	upper.call("b").await.unwrap();
	upper.call("d").await.unwrap();
	assert_eq!(calls.load(Ordering::SeqCst), 4);

	upper.call("b").await.unwrap();
	assert_eq!(calls.load(Ordering::SeqCst), 4);
	upper.call("c").await.unwrap();
	assert_eq!(calls.load(Ordering::SeqCst), 5);

	let info = upper.cache_info();
	assert_eq!(info.size, 2);
	assert_eq!(info.maxsize, Some(2));
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn test_ttl_one_second(calls: Arc<AtomicUsize>) {
	let counter = calls.clone();
	let clock = cached_ttl(Duration::from_secs(1), move |_: ()| {
		let counter = counter.clone();
		async move { Ok(counter.fetch_add(1, Ordering::SeqCst)) }
	});

	assert_eq!(clock.call(()).await.unwrap(), 0);

	tokio::time::advance(Duration::from_millis(500)).await;
	assert_eq!(clock.call(()).await.unwrap(), 0);

	tokio::time::advance(Duration::from_millis(1000)).await;
	assert_eq!(clock.call(()).await.unwrap(), 1);
	assert_eq!(calls.load(Ordering::SeqCst), 2);
}

// ============================================================================
// Concurrency
// ============================================================================

#[rstest]
#[tokio::test(start_paused = true)]
async fn test_concurrent_identical_calls_run_once(calls: Arc<AtomicUsize>) {
	let counter = calls.clone();
	let slow = Arc::new(cached(move |id: u32| {
		let counter = counter.clone();
		async move {
			counter.fetch_add(1, Ordering::SeqCst);
			tokio::time::sleep(Duration::from_millis(100)).await;
			Ok(SafeHtml::new(format!("<p>{id}</p>")))
		}
	}));

	let (a, b) = tokio::join!(slow.call(1), slow.call(1));
	assert_eq!(a.unwrap(), b.unwrap());
	assert_eq!(calls.load(Ordering::SeqCst), 1);

	let tasks: Vec<_> = (0..8)
		.map(|_| {
			let slow = slow.clone();
			tokio::spawn(async move { slow.call(2).await })
		})
		.collect();
	for task in tasks {
		assert_eq!(task.await.unwrap().unwrap().as_str(), "<p>2</p>");
	}
	assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[rstest]
#[tokio::test]
async fn test_deferred_calls_share_cache(calls: Arc<AtomicUsize>) {
	let counter = calls.clone();
	let item = Arc::new(cached(move |name: String| {
		let counter = counter.clone();
		async move {
			counter.fetch_add(1, Ordering::SeqCst);
			render(li(name)).await
		}
	}));

	let tree = ul((
		item.defer("x".to_string()),
		item.defer("y".to_string()),
		item.defer("x".to_string()),
	));
	let html = render(tree).await.unwrap();
	assert_eq!(html.as_str(), "<ul><li>x</li><li>y</li><li>x</li></ul>");
	assert_eq!(calls.load(Ordering::SeqCst), 2);
}

// ============================================================================
// Error Path
// ============================================================================

#[rstest]
#[tokio::test]
async fn test_unhashable_arguments_are_rejected(calls: Arc<AtomicUsize>) {
	let counter = calls.clone();
	let memo = cached(move |_: HashMap<(u8, u8), u8>| {
		let counter = counter.clone();
		async move {
			counter.fetch_add(1, Ordering::SeqCst);
			Ok(())
		}
	});

	let args: HashMap<(u8, u8), u8> = [((1, 1), 1)].into_iter().collect();
	let err = memo.call(args).await.unwrap_err();
	assert!(matches!(err, Error::UnhashableArguments(_)));
	assert_eq!(calls.load(Ordering::SeqCst), 0);
	assert_eq!(memo.cache_info().size, 0);
}

#[rstest]
#[tokio::test]
async fn test_errors_are_not_cached(calls: Arc<AtomicUsize>) {
	let counter = calls.clone();
	let flaky = cached(move |_: ()| {
		let counter = counter.clone();
		async move {
			if counter.fetch_add(1, Ordering::SeqCst) == 0 {
				Err(Error::component("first attempt fails"))
			} else {
				Ok("ok")
			}
		}
	});

	assert!(flaky.call(()).await.is_err());
	assert_eq!(flaky.call(()).await.unwrap(), "ok");
	assert_eq!(flaky.call(()).await.unwrap(), "ok");
	assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[rstest]
#[tokio::test]
async fn test_cache_clear_forces_recompute(calls: Arc<AtomicUsize>) {
	let counter = calls.clone();
	let memo = cached(move |n: i64| {
		let counter = counter.clone();
		async move {
			counter.fetch_add(1, Ordering::SeqCst);
			Ok(n * 2)
		}
	});

	memo.call(21).await.unwrap();
	memo.cache_clear();
	assert_eq!(memo.call(21).await.unwrap(), 42);
	assert_eq!(calls.load(Ordering::SeqCst), 2);
}
