//! Incoming requests with the body already collected.

use bytes::Bytes;
use htmpl_core::{Error, Renderer, Result};
use htmpl_forms::FormValues;
use http::header::{CONTENT_TYPE, HeaderName};
use http::{Extensions, HeaderMap, HeaderValue, Method, Uri};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";

/// An HTTP request.
#[derive(Debug)]
pub struct Request {
	pub method: Method,
	pub uri: Uri,
	pub headers: HeaderMap,
	pub body: Bytes,
	/// Per-request data attached by the server, such as its [`Renderer`].
	pub extensions: Extensions,
}

impl Request {
	pub fn new(method: Method, uri: Uri, headers: HeaderMap, body: Bytes) -> Self {
		Self {
			method,
			uri,
			headers,
			body,
			extensions: Extensions::new(),
		}
	}

	/// Start building a request
	///
	/// # Examples
	///
	/// ```
	/// use htmpl_http::Request;
	/// use http::Method;
	///
	/// let request = Request::builder()
	///     .method(Method::POST)
	///     .uri("/login?next=/home")
	///     .header("HX-Request", "true")
	///     .body("email=a%40b.co")
	///     .build()
	///     .unwrap();
	///
	/// assert_eq!(request.path(), "/login");
	/// assert!(request.is_htmx());
	/// ```
	pub fn builder() -> RequestBuilder {
		RequestBuilder::default()
	}

	pub fn path(&self) -> &str {
		self.uri.path()
	}

	/// A header value, if present and valid UTF-8.
	pub fn header(&self, name: &str) -> Option<&str> {
		self.headers.get(name).and_then(|value| value.to_str().ok())
	}

	/// Decoded query parameters. A repeated key keeps its last value.
	pub fn query(&self) -> HashMap<String, String> {
		self.uri
			.query()
			.and_then(|query| serde_urlencoded::from_str::<Vec<(String, String)>>(query).ok())
			.map(|pairs| pairs.into_iter().collect())
			.unwrap_or_default()
	}

	/// Decode an `application/x-www-form-urlencoded` body
	///
	/// Every value is a JSON string. A repeated key keeps its last value. A
	/// body with another declared content type is rejected.
	///
	/// # Examples
	///
	/// ```
	/// use htmpl_http::Request;
	/// use http::Method;
	/// use serde_json::json;
	///
	/// let request = Request::builder()
	///     .method(Method::POST)
	///     .uri("/signup")
	///     .header("content-type", "application/x-www-form-urlencoded")
	///     .body("name=Ann+Lee&tag=a&tag=b")
	///     .build()
	///     .unwrap();
	///
	/// let values = request.form_data().unwrap();
	/// assert_eq!(values["name"], json!("Ann Lee"));
	/// assert_eq!(values["tag"], json!("b"));
	/// ```
	pub fn form_data(&self) -> Result<FormValues> {
		if let Some(content_type) = self.header(CONTENT_TYPE.as_str()) {
			let essence = content_type.split(';').next().unwrap_or_default().trim();
			if !essence.eq_ignore_ascii_case(FORM_URLENCODED) && !self.body.is_empty() {
				return Err(Error::BadRequest(format!(
					"expected {FORM_URLENCODED}, got {essence}"
				)));
			}
		}
		let pairs: Vec<(String, String)> = serde_urlencoded::from_bytes(&self.body)
			.map_err(|e| Error::BadRequest(format!("malformed form body: {e}")))?;
		Ok(pairs
			.into_iter()
			.map(|(name, value)| (name, Value::String(value)))
			.collect())
	}

	/// Whether the request was sent by htmx (`HX-Request: true`).
	pub fn is_htmx(&self) -> bool {
		self.header("hx-request") == Some("true")
	}

	/// The `id` of the target element (`HX-Target`).
	pub fn htmx_target(&self) -> Option<&str> {
		self.header("hx-target")
	}

	/// The `id` of the triggering element (`HX-Trigger`).
	pub fn htmx_trigger(&self) -> Option<&str> {
		self.header("hx-trigger")
	}

	/// The renderer the server attached, or a default one.
	pub fn renderer(&self) -> Arc<Renderer> {
		self.extensions
			.get::<Arc<Renderer>>()
			.cloned()
			.unwrap_or_default()
	}
}

/// Builder for [`Request`], mostly for tests.
#[derive(Debug, Default)]
pub struct RequestBuilder {
	method: Method,
	uri: Option<String>,
	headers: Vec<(String, String)>,
	body: Bytes,
}

impl RequestBuilder {
	pub fn method(mut self, method: Method) -> Self {
		self.method = method;
		self
	}

	pub fn uri(mut self, uri: impl Into<String>) -> Self {
		self.uri = Some(uri.into());
		self
	}

	pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.headers.push((name.into(), value.into()));
		self
	}

	pub fn body(mut self, body: impl Into<Bytes>) -> Self {
		self.body = body.into();
		self
	}

	/// Sets the body and declares it as a urlencoded form.
	pub fn form<T: serde::Serialize + ?Sized>(self, form: &T) -> Result<Self> {
		let body = serde_urlencoded::to_string(form).map_err(|e| Error::BadRequest(e.to_string()))?;
		Ok(self.header(CONTENT_TYPE.as_str(), FORM_URLENCODED).body(body))
	}

	pub fn build(self) -> Result<Request> {
		let uri: Uri = self
			.uri
			.as_deref()
			.unwrap_or("/")
			.parse()
			.map_err(|e| Error::Http(format!("invalid uri: {e}")))?;

		let mut headers = HeaderMap::new();
		for (name, value) in self.headers {
			let name = HeaderName::from_bytes(name.as_bytes())
				.map_err(|e| Error::Http(format!("invalid header name `{name}`: {e}")))?;
			let value = HeaderValue::from_str(&value)
				.map_err(|e| Error::Http(format!("invalid header value: {e}")))?;
			headers.append(name, value);
		}

		Ok(Request::new(self.method, uri, headers, self.body))
	}
}
