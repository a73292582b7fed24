//! HTTP adapter: responses, routing, form routes and the hyper server.

pub use htmpl_http::*;
