//! # htmpl-http
//!
//! Serving htmpl output over HTTP with hyper.
//!
//! - [`Request`] and [`Response`] with form decoding and htmx header helpers
//! - [`IntoResponse`] renders nodes, fragments, templates and safe strings
//!   into `text/html` responses
//! - [`HtmlRouter`] routes by method and exact path, and serves schema-driven
//!   forms with [`HtmlRouter::form`]
//! - [`Server`] runs any [`Handler`] on a tokio listener
//!
//! ```no_run
//! use htmpl_core::elements::{h1, p, section};
//! use htmpl_http::{HtmlRouter, Request, serve};
//! use tokio::net::TcpListener;
//!
//! # async fn run() -> htmpl_core::Result<()> {
//! let router = HtmlRouter::new().get("/", |req: Request| async move {
//!     let note = if req.is_htmx() { "partial" } else { "full page" };
//!     Ok(section((h1("Hello"), p(note))))
//! });
//! serve(TcpListener::bind("127.0.0.1:8000").await?, router).await
//! # }
//! ```

pub mod handler;
pub mod htmx;
pub mod request;
pub mod response;
pub mod router;
pub mod server;
pub mod settings;

pub use handler::{FnHandler, Handler};
pub use htmx::{TriggerAfter, htmx_redirect, htmx_refresh, htmx_retarget, htmx_trigger_event};
pub use request::{Request, RequestBuilder};
pub use response::{IntoResponse, Response, TEXT_HTML};
pub use router::HtmlRouter;
pub use server::{Server, serve};
pub use settings::{DEFAULT_ADDR, ServerSettings};
