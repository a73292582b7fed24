use crate::request::Request;
use crate::response::{IntoResponse, Response};
use async_trait::async_trait;
use htmpl_core::Result;
use std::future::Future;
use std::sync::Arc;

/// Something that answers requests.
#[async_trait]
pub trait Handler: Send + Sync {
	async fn handle(&self, request: Request) -> Result<Response>;
}

#[async_trait]
impl<T: Handler + ?Sized> Handler for Arc<T> {
	async fn handle(&self, request: Request) -> Result<Response> {
		(**self).handle(request).await
	}
}

/// A [`Handler`] backed by an async closure whose output is converted with
/// [`IntoResponse`] using the request's renderer.
///
/// # Examples
///
/// ```
/// # tokio_test::block_on(async {
/// use htmpl_core::elements::h1;
/// use htmpl_http::{FnHandler, Handler, Request};
///
/// let hello = FnHandler::new(|req: Request| async move {
///     Ok(h1(format!("Hello from {}", req.path())))
/// });
/// let response = hello.handle(Request::builder().uri("/x").build().unwrap()).await.unwrap();
/// assert_eq!(response.text(), "<h1>Hello from /x</h1>");
/// # });
/// ```
pub struct FnHandler<F> {
	func: F,
}

impl<F> FnHandler<F> {
	pub fn new(func: F) -> Self {
		Self { func }
	}
}

#[async_trait]
impl<F, Fut, R> Handler for FnHandler<F>
where
	F: Fn(Request) -> Fut + Send + Sync,
	Fut: Future<Output = Result<R>> + Send + 'static,
	R: IntoResponse + 'static,
{
	async fn handle(&self, request: Request) -> Result<Response> {
		let renderer = request.renderer();
		let output = (self.func)(request).await?;
		output.into_response(&renderer).await
	}
}
