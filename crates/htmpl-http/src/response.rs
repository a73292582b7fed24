//! Responses and conversion of render output into responses.

use async_trait::async_trait;
use bytes::Bytes;
use htmpl_core::{Child, Error, Fragment, Node, Renderer, Result, SafeHtml, Template, escape};
use http::header::{CONTENT_TYPE, HeaderName, HeaderValue};
use http::{HeaderMap, StatusCode};

/// `content-type` of every HTML response.
pub const TEXT_HTML: &str = "text/html; charset=utf-8";

/// An HTTP response.
#[derive(Debug, Clone)]
pub struct Response {
	pub status: StatusCode,
	pub headers: HeaderMap,
	pub body: Bytes,
}

impl Response {
	pub fn new(status: StatusCode) -> Self {
		Self {
			status,
			headers: HeaderMap::new(),
			body: Bytes::new(),
		}
	}

	pub fn ok() -> Self {
		Self::new(StatusCode::OK)
	}

	/// A 200 response with an HTML body
	///
	/// # Examples
	///
	/// ```
	/// use htmpl_http::Response;
	/// use http::StatusCode;
	///
	/// let response = Response::html("<p>Hi</p>");
	/// assert_eq!(response.status, StatusCode::OK);
	/// assert_eq!(response.header("content-type"), Some("text/html; charset=utf-8"));
	/// assert_eq!(response.text(), "<p>Hi</p>");
	/// ```
	pub fn html(body: impl Into<Bytes>) -> Self {
		Self::ok()
			.with_header(CONTENT_TYPE.as_str(), TEXT_HTML)
			.with_body(body)
	}

	pub fn not_found() -> Self {
		Self::html("<h1>Not Found</h1>").with_status(StatusCode::NOT_FOUND)
	}

	/// A 405 response listing the allowed methods.
	pub fn method_not_allowed(allow: &str) -> Self {
		Self::html("<h1>Method Not Allowed</h1>")
			.with_status(StatusCode::METHOD_NOT_ALLOWED)
			.with_header("allow", allow)
	}

	pub fn internal_server_error() -> Self {
		Self::html("<h1>Internal Server Error</h1>").with_status(StatusCode::INTERNAL_SERVER_ERROR)
	}

	pub fn with_status(mut self, status: StatusCode) -> Self {
		self.status = status;
		self
	}

	pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
		self.body = body.into();
		self
	}

	/// Sets a header. Invalid names or values are ignored.
	pub fn with_header(mut self, name: &str, value: &str) -> Self {
		if let Ok(name) = HeaderName::from_bytes(name.as_bytes())
			&& let Ok(value) = HeaderValue::from_str(value)
		{
			self.headers.insert(name, value);
		}
		self
	}

	/// A header value, if present and valid UTF-8.
	pub fn header(&self, name: &str) -> Option<&str> {
		self.headers.get(name).and_then(|value| value.to_str().ok())
	}

	/// The body as text, lossily decoded.
	pub fn text(&self) -> String {
		String::from_utf8_lossy(&self.body).into_owned()
	}
}

impl From<Error> for Response {
	fn from(error: Error) -> Self {
		let status =
			StatusCode::from_u16(error.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
		let reason = status.canonical_reason().unwrap_or("Error");
		let body = format!("<h1>{reason}</h1><p>{}</p>", escape(&error.to_string()));
		Response::html(body).with_status(status)
	}
}

/// Conversion of a handler's return value into a [`Response`].
///
/// Render output is rendered with the given [`Renderer`] and served as HTML.
#[async_trait]
pub trait IntoResponse: Send {
	async fn into_response(self, renderer: &Renderer) -> Result<Response>;
}

#[async_trait]
impl IntoResponse for Response {
	async fn into_response(self, _renderer: &Renderer) -> Result<Response> {
		Ok(self)
	}
}

#[async_trait]
impl IntoResponse for SafeHtml {
	async fn into_response(self, _renderer: &Renderer) -> Result<Response> {
		Ok(Response::html(self.into_string()))
	}
}

/// Plain text is escaped; only [`SafeHtml`] is sent verbatim.
#[async_trait]
impl IntoResponse for String {
	async fn into_response(self, _renderer: &Renderer) -> Result<Response> {
		Ok(Response::html(escape(&self).into_owned()))
	}
}

#[async_trait]
impl IntoResponse for &'static str {
	async fn into_response(self, _renderer: &Renderer) -> Result<Response> {
		Ok(Response::html(escape(self).into_owned()))
	}
}

macro_rules! render_into_response {
	($($ty:ty),*) => {
		$(
			#[async_trait]
			impl IntoResponse for $ty {
				async fn into_response(self, renderer: &Renderer) -> Result<Response> {
					let html = renderer.render(self).await?;
					Ok(Response::html(html.into_string()))
				}
			}
		)*
	};
}

render_into_response!(Node, Fragment, Template, Child);
