//! Server loop integration tests
//!
//! Success Criteria:
//! 1. A request over TCP reaches the handler and returns its HTML
//! 2. The server's render options apply to handler output
//! 3. Shutdown stops the accept loop

use htmpl_core::elements::{br, p};
use htmpl_core::{RenderOptions, VoidStyle};
use htmpl_http::{HtmlRouter, Request, Server};
use rstest::*;
use std::net::SocketAddr;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::oneshot;

async fn fetch(addr: SocketAddr, raw_request: &str) -> String {
	let mut stream = TcpStream::connect(addr).await.unwrap();
	stream.write_all(raw_request.as_bytes()).await.unwrap();
	let mut buf = Vec::new();
	stream.read_to_end(&mut buf).await.unwrap();
	String::from_utf8(buf).unwrap()
}

fn router() -> HtmlRouter {
	HtmlRouter::new()
		.get("/", |_req: Request| async { Ok(p(("line", br(), "<next>"))) })
		.post("/echo", |req: Request| async move {
			let values = req.form_data()?;
			let name = values.get("name").and_then(|v| v.as_str()).unwrap_or_default().to_string();
			Ok::<_, htmpl_core::Error>(p(name))
		})
}

#[rstest]
#[tokio::test]
async fn test_serves_html_over_tcp() {
	let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
	let addr = listener.local_addr().unwrap();
	let (stop, stopped) = oneshot::channel::<()>();
	let server = tokio::spawn(
		Server::new(router())
			.with_render_options(RenderOptions::default().with_void_style(VoidStyle::Html5))
			.serve_with_shutdown(listener, async move {
				let _ = stopped.await;
			}),
	);

	let response = fetch(
		addr,
		"GET / HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
	)
	.await;
	assert!(response.starts_with("HTTP/1.1 200 OK"));
	assert!(response.to_ascii_lowercase().contains("content-type: text/html; charset=utf-8"));
	assert!(response.ends_with("<p>line<br>&lt;next&gt;</p>"));

	let body = "name=Ann+%3CLee%3E";
	let response = fetch(
		addr,
		&format!(
			"POST /echo HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\
			 Content-Type: application/x-www-form-urlencoded\r\nContent-Length: {}\r\n\r\n{body}",
			body.len()
		),
	)
	.await;
	assert!(response.ends_with("<p>Ann &lt;Lee&gt;</p>"));

	let missing = fetch(
		addr,
		"GET /missing HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
	)
	.await;
	assert!(missing.starts_with("HTTP/1.1 404 Not Found"));

	stop.send(()).unwrap();
	server.await.unwrap().unwrap();
}
