//! htmx response headers.
//!
//! The request-side headers are read with [`Request::is_htmx`],
//! [`Request::htmx_target`] and [`Request::htmx_trigger`].
//!
//! [`Request::is_htmx`]: crate::Request::is_htmx
//! [`Request::htmx_target`]: crate::Request::htmx_target
//! [`Request::htmx_trigger`]: crate::Request::htmx_trigger

use crate::response::Response;
use htmpl_core::SafeHtml;

/// When a triggered client event fires relative to the swap.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TriggerAfter {
	/// As soon as the response is received (`HX-Trigger`).
	Receive,
	/// After the settle step (`HX-Trigger-After-Settle`).
	#[default]
	Settle,
	/// After the swap (`HX-Trigger-After-Swap`).
	Swap,
}

impl TriggerAfter {
	pub fn header_name(self) -> &'static str {
		match self {
			TriggerAfter::Receive => "HX-Trigger",
			TriggerAfter::Settle => "HX-Trigger-After-Settle",
			TriggerAfter::Swap => "HX-Trigger-After-Swap",
		}
	}
}

/// Client-side redirect: an empty 200 with `HX-Redirect`.
///
/// # Examples
///
/// ```
/// use htmpl_http::htmx_redirect;
///
/// let response = htmx_redirect("/dashboard");
/// assert_eq!(response.status, 200);
/// assert_eq!(response.header("hx-redirect"), Some("/dashboard"));
/// ```
pub fn htmx_redirect(url: &str) -> Response {
	Response::ok().with_header("HX-Redirect", url)
}

/// Full page refresh on the client.
pub fn htmx_refresh() -> Response {
	Response::ok().with_header("HX-Refresh", "true")
}

/// Swap `content` into `target` instead of the element that asked.
pub fn htmx_retarget(content: SafeHtml, target: &str) -> Response {
	Response::html(content.into_string()).with_header("HX-Retarget", target)
}

/// Send `content` and fire `event` on the client
///
/// # Examples
///
/// ```
/// use htmpl_core::raw;
/// use htmpl_http::{TriggerAfter, htmx_trigger_event};
///
/// let response = htmx_trigger_event(raw("<p>Saved</p>"), "saved", TriggerAfter::default());
/// assert_eq!(response.header("hx-trigger-after-settle"), Some("saved"));
///
/// let response = htmx_trigger_event(raw(""), "saved", TriggerAfter::Receive);
/// assert_eq!(response.header("hx-trigger"), Some("saved"));
/// ```
pub fn htmx_trigger_event(content: SafeHtml, event: &str, after: TriggerAfter) -> Response {
	Response::html(content.into_string()).with_header(after.header_name(), event)
}

#[cfg(test)]
mod tests {
	use super::*;
	use htmpl_core::raw;
	use rstest::rstest;

	#[rstest]
	fn test_refresh() {
		assert_eq!(htmx_refresh().header("hx-refresh"), Some("true"));
	}

	#[rstest]
	fn test_retarget_keeps_content() {
		let response = htmx_retarget(raw("<li>new</li>"), "#list");
		assert_eq!(response.text(), "<li>new</li>");
		assert_eq!(response.header("hx-retarget"), Some("#list"));
	}

	#[rstest]
	fn test_trigger_after_swap() {
		let response = htmx_trigger_event(raw(""), "done", TriggerAfter::Swap);
		assert_eq!(response.header("hx-trigger-after-swap"), Some("done"));
		assert_eq!(response.header("hx-trigger"), None);
	}
}
