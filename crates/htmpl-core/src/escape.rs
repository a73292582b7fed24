//! HTML escaping.

use std::borrow::Cow;

const SPECIAL: [char; 5] = ['&', '<', '>', '"', '\''];

/// Escape HTML special characters
///
/// `&`, `<`, `>`, `"` and `'` are replaced in a single left-to-right pass;
/// every other character is copied unchanged. Input without special
/// characters is returned borrowed.
///
/// Escaping is not idempotent: an `&` produced by a previous pass is escaped
/// again. Wrap pre-escaped content in [`SafeHtml`](crate::SafeHtml) instead.
///
/// # Examples
///
/// ```
/// use htmpl_core::escape;
///
/// assert_eq!(escape("Hello, World!"), "Hello, World!");
/// assert_eq!(escape("<script>alert('XSS')</script>"),
///            "&lt;script&gt;alert(&#x27;XSS&#x27;)&lt;/script&gt;");
/// assert_eq!(escape("5 < 10 & 10 > 5"), "5 &lt; 10 &amp; 10 &gt; 5");
/// ```
pub fn escape(text: &str) -> Cow<'_, str> {
	if text.contains(SPECIAL) {
		let mut escaped = String::with_capacity(text.len() + 8);
		escape_into(text, &mut escaped);
		Cow::Owned(escaped)
	} else {
		Cow::Borrowed(text)
	}
}

/// Appends the escaped form of `text` to `out`.
pub fn escape_into(text: &str, out: &mut String) {
	for ch in text.chars() {
		match ch {
			'&' => out.push_str("&amp;"),
			'<' => out.push_str("&lt;"),
			'>' => out.push_str("&gt;"),
			'"' => out.push_str("&quot;"),
			'\'' => out.push_str("&#x27;"),
			_ => out.push(ch),
		}
	}
}
