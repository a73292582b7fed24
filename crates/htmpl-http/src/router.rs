//! Exact-path routing and form routes.

use crate::handler::{FnHandler, Handler};
use crate::request::Request;
use crate::response::{IntoResponse, Response};
use async_trait::async_trait;
use htmpl_core::{FieldErrors, Result};
use htmpl_forms::{Form, FormModel, FormValues, Widget};
use http::Method;
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;

struct Route {
	method: Method,
	path: String,
	handler: Arc<dyn Handler>,
}

/// Routes requests by exact path and method.
///
/// An unknown path answers 404. A known path requested with another method
/// answers 405 with an `allow` header. Handler errors become error
/// responses through `From<Error> for Response`.
///
/// # Examples
///
/// ```
/// # tokio_test::block_on(async {
/// use htmpl_core::elements::h1;
/// use htmpl_http::{Handler, HtmlRouter, Request};
/// use http::{Method, StatusCode};
///
/// let router = HtmlRouter::new().get("/", |_req: Request| async { Ok(h1("Home")) });
///
/// let ok = router.handle(Request::builder().uri("/").build().unwrap()).await.unwrap();
/// assert_eq!(ok.text(), "<h1>Home</h1>");
///
/// let post = Request::builder().method(Method::POST).uri("/").build().unwrap();
/// let not_allowed = router.handle(post).await.unwrap();
/// assert_eq!(not_allowed.status, StatusCode::METHOD_NOT_ALLOWED);
/// assert_eq!(not_allowed.header("allow"), Some("GET"));
/// # });
/// ```
#[derive(Default)]
pub struct HtmlRouter {
	routes: Vec<Route>,
}

impl std::fmt::Debug for HtmlRouter {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_list()
			.entries(self.routes.iter().map(|r| format!("{} {}", r.method, r.path)))
			.finish()
	}
}

impl HtmlRouter {
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers `handler` for `method` and `path`, replacing any previous one.
	pub fn route(
		mut self,
		method: Method,
		path: impl Into<String>,
		handler: impl Handler + 'static,
	) -> Self {
		let path = path.into();
		tracing::info!(%method, %path, "route registered");
		let handler: Arc<dyn Handler> = Arc::new(handler);
		match self
			.routes
			.iter_mut()
			.find(|r| r.method == method && r.path == path)
		{
			Some(existing) => existing.handler = handler,
			None => self.routes.push(Route { method, path, handler }),
		}
		self
	}

	pub fn get<F, Fut, R>(self, path: impl Into<String>, func: F) -> Self
	where
		F: Fn(Request) -> Fut + Send + Sync + 'static,
		Fut: Future<Output = Result<R>> + Send + 'static,
		R: IntoResponse + 'static,
	{
		self.route(Method::GET, path, FnHandler::new(func))
	}

	pub fn post<F, Fut, R>(self, path: impl Into<String>, func: F) -> Self
	where
		F: Fn(Request) -> Fut + Send + Sync + 'static,
		Fut: Future<Output = Result<R>> + Send + 'static,
		R: IntoResponse + 'static,
	{
		self.route(Method::POST, path, FnHandler::new(func))
	}

	/// Serve the form for `T` at `path`
	///
	/// GET renders `page` with no values or errors. POST validates the
	/// submitted body: on failure `page` is rendered again with the submitted
	/// values and the field errors, with status 200; on success `on_valid`
	/// receives the parsed model.
	///
	/// # Examples
	///
	/// ```
	/// # tokio_test::block_on(async {
	/// use htmpl_core::elements::{h1, section};
	/// use htmpl_forms::{FieldSchema, FormModel, FormSchema, RenderForm};
	/// use htmpl_http::{Handler, HtmlRouter, Request};
	/// use serde::Deserialize;
	///
	/// #[derive(Deserialize)]
	/// struct Login {
	///     email: String,
	/// }
	///
	/// impl FormModel for Login {
	///     fn schema() -> FormSchema {
	///         FormSchema::new().field(FieldSchema::email("email"))
	///     }
	/// }
	///
	/// let router = HtmlRouter::new().form::<Login, _, _, _, _, _, _>(
	///     "/login",
	///     |form, values, errors| async move {
	///         let options = RenderForm::default().with_values(values).with_errors(errors);
	///         form.render("/login", options).map(|form| section((h1("Login"), form)))
	///     },
	///     |login: Login, _req| async move { Ok(h1(format!("Welcome, {}", login.email))) },
	/// );
	///
	/// let request = Request::builder()
	///     .method(http::Method::POST)
	///     .uri("/login")
	///     .form(&[("email", "ann@example.com")])
	///     .unwrap()
	///     .build()
	///     .unwrap();
	/// let response = router.handle(request).await.unwrap();
	/// assert_eq!(response.text(), "<h1>Welcome, ann@example.com</h1>");
	/// # });
	/// ```
	pub fn form<T, P, PFut, PR, V, VFut, VR>(
		self,
		path: impl Into<String>,
		page: P,
		on_valid: V,
	) -> Self
	where
		T: FormModel + Send + 'static,
		P: Fn(Form<T>, FormValues, FieldErrors) -> PFut + Send + Sync + 'static,
		PFut: Future<Output = Result<PR>> + Send + 'static,
		PR: IntoResponse + 'static,
		V: Fn(T, Request) -> VFut + Send + Sync + 'static,
		VFut: Future<Output = Result<VR>> + Send + 'static,
		VR: IntoResponse + 'static,
	{
		let path = path.into();
		let route = Arc::new(FormRoute {
			form: Form::<T>::new(),
			page,
			on_valid,
		});
		self.route(Method::GET, path.clone(), Arc::clone(&route))
			.route(Method::POST, path, route)
	}

	async fn dispatch(&self, request: Request) -> Result<Response> {
		let path = request.path();
		if let Some(route) = self
			.routes
			.iter()
			.find(|r| r.path == path && r.method == request.method)
		{
			return route.handler.handle(request).await;
		}

		let allowed: Vec<&str> = self
			.routes
			.iter()
			.filter(|r| r.path == path)
			.map(|r| r.method.as_str())
			.collect();
		if allowed.is_empty() {
			tracing::warn!(%path, "no route");
			return Ok(Response::not_found());
		}
		tracing::warn!(method = %request.method, %path, "method not allowed");
		Ok(Response::method_not_allowed(&allowed.join(", ")))
	}
}

#[async_trait]
impl Handler for HtmlRouter {
	async fn handle(&self, request: Request) -> Result<Response> {
		let method = request.method.clone();
		let path = request.path().to_string();
		Ok(self.dispatch(request).await.unwrap_or_else(|error| {
			tracing::warn!(%method, %path, %error, "handler failed");
			Response::from(error)
		}))
	}
}

struct FormRoute<T, P, V> {
	form: Form<T>,
	page: P,
	on_valid: V,
}

#[async_trait]
impl<T, P, PFut, PR, V, VFut, VR> Handler for FormRoute<T, P, V>
where
	T: FormModel + Send + 'static,
	P: Fn(Form<T>, FormValues, FieldErrors) -> PFut + Send + Sync,
	PFut: Future<Output = Result<PR>> + Send + 'static,
	PR: IntoResponse + 'static,
	V: Fn(T, Request) -> VFut + Send + Sync,
	VFut: Future<Output = Result<VR>> + Send + 'static,
	VR: IntoResponse + 'static,
{
	async fn handle(&self, request: Request) -> Result<Response> {
		let renderer = request.renderer();
		if request.method != Method::POST {
			let page = (self.page)(self.form.clone(), FormValues::new(), FieldErrors::new()).await?;
			return page.into_response(&renderer).await;
		}

		let mut values = request.form_data()?;
		for cfg in self.form.configs() {
			if cfg.widget == Widget::Checkbox && values.contains_key(&cfg.name) {
				values.insert(cfg.name.clone(), Value::Bool(true));
			}
		}

		match self.form.validate(&values) {
			Ok(model) => {
				let response = (self.on_valid)(model, request).await?;
				response.into_response(&renderer).await
			}
			Err(errors) => {
				tracing::debug!(
					path = %request.path(),
					errors = errors.len(),
					"re-rendering invalid form"
				);
				let page = (self.page)(self.form.clone(), values, errors).await?;
				page.into_response(&renderer).await
			}
		}
	}
}
