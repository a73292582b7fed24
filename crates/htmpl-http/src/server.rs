//! HTTP/1 server loop on hyper and tokio.

use crate::handler::Handler;
use crate::request::Request;
use crate::settings::ServerSettings;
use bytes::Bytes;
use htmpl_core::{Error, RenderOptions, Renderer, Result};
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::Service;
use hyper_util::rt::TokioIo;
use std::future::Future;
use std::net::SocketAddr;
use std::pin::Pin;
use std::sync::Arc;
use tokio::net::{TcpListener, TcpStream};

/// Serves a [`Handler`] over HTTP/1.1.
///
/// Every request carries the server's [`Renderer`] in its extensions, so
/// handlers render with the configured [`RenderOptions`].
///
/// ```no_run
/// use htmpl_core::elements::h1;
/// use htmpl_http::{HtmlRouter, Request, Server, ServerSettings};
///
/// # async fn example() -> htmpl_core::Result<()> {
/// let router = HtmlRouter::new().get("/", |_req: Request| async { Ok(h1("Hello")) });
/// Server::new(router)
///     .bind_and_serve(&ServerSettings::from_env()?)
///     .await
/// # }
/// ```
pub struct Server {
	handler: Arc<dyn Handler>,
	renderer: Arc<Renderer>,
}

impl Server {
	pub fn new(handler: impl Handler + 'static) -> Self {
		Self {
			handler: Arc::new(handler),
			renderer: Arc::new(Renderer::default()),
		}
	}

	pub fn with_render_options(mut self, options: RenderOptions) -> Self {
		self.renderer = Arc::new(Renderer::new(options));
		self
	}

	/// Binds `settings.addr` and serves with `settings.render`.
	pub async fn bind_and_serve(self, settings: &ServerSettings) -> Result<()> {
		let listener = TcpListener::bind(settings.addr).await?;
		self.with_render_options(settings.render.clone())
			.serve(listener)
			.await
	}

	/// Accepts connections until accepting fails.
	pub async fn serve(self, listener: TcpListener) -> Result<()> {
		self.serve_with_shutdown(listener, std::future::pending()).await
	}

	/// Accept connections until `shutdown` completes
	///
	/// Connections already accepted keep running on their own tasks.
	pub async fn serve_with_shutdown(
		self,
		listener: TcpListener,
		shutdown: impl Future<Output = ()>,
	) -> Result<()> {
		let local_addr = listener.local_addr()?;
		tracing::info!(addr = %local_addr, "listening on http://{local_addr}");
		tokio::pin!(shutdown);

		loop {
			tokio::select! {
				accepted = listener.accept() => {
					let (stream, remote_addr) = accepted?;
					let service = RequestService {
						handler: Arc::clone(&self.handler),
						renderer: Arc::clone(&self.renderer),
						remote_addr,
					};
					tokio::task::spawn(async move {
						if let Err(error) = handle_connection(stream, service).await {
							tracing::warn!(%remote_addr, %error, "connection error");
						}
					});
				}
				_ = &mut shutdown => {
					tracing::info!("shutdown requested, no longer accepting connections");
					return Ok(());
				}
			}
		}
	}
}

/// Serves `handler` on `listener` with default render options.
pub async fn serve(listener: TcpListener, handler: impl Handler + 'static) -> Result<()> {
	Server::new(handler).serve(listener).await
}

async fn handle_connection(stream: TcpStream, service: RequestService) -> Result<()> {
	http1::Builder::new()
		.serve_connection(TokioIo::new(stream), service)
		.await
		.map_err(|e| Error::Http(e.to_string()))
}

struct RequestService {
	handler: Arc<dyn Handler>,
	renderer: Arc<Renderer>,
	remote_addr: SocketAddr,
}

impl Service<hyper::Request<Incoming>> for RequestService {
	type Response = hyper::Response<Full<Bytes>>;
	type Error = Box<dyn std::error::Error + Send + Sync>;
	type Future =
		Pin<Box<dyn Future<Output = std::result::Result<Self::Response, Self::Error>> + Send>>;

	fn call(&self, req: hyper::Request<Incoming>) -> Self::Future {
		let handler = Arc::clone(&self.handler);
		let renderer = Arc::clone(&self.renderer);
		let remote_addr = self.remote_addr;

		Box::pin(async move {
			let (parts, body) = req.into_parts();
			let body = body.collect().await?.to_bytes();

			let mut request = Request::new(parts.method, parts.uri, parts.headers, body);
			request.extensions.insert(renderer);
			request.extensions.insert(remote_addr);

			let response = handler.handle(request).await.unwrap_or_else(|error| {
				tracing::warn!(%remote_addr, %error, "unhandled error");
				error.into()
			});

			let mut builder = hyper::Response::builder().status(response.status);
			for (name, value) in &response.headers {
				builder = builder.header(name, value);
			}
			Ok(builder.body(Full::new(response.body))?)
		})
	}
}
