//! Property tests for the escaper.

use htmpl_core::elements::div;
use htmpl_core::{SafeHtml, escape, render};
use proptest::prelude::*;

const SPECIAL: [char; 5] = ['&', '<', '>', '"', '\''];

proptest! {
	#[test]
	fn escaped_output_has_no_special_characters_except_entities(text in ".*") {
		let escaped = escape(&text);
		prop_assert!(!escaped.contains(['<', '>', '"', '\'']));
		// Every remaining `&` starts one of the five entities.
		for (idx, _) in escaped.match_indices('&') {
			let rest = &escaped[idx..];
			prop_assert!(
				["&amp;", "&lt;", "&gt;", "&quot;", "&#x27;"]
					.iter()
					.any(|entity| rest.starts_with(entity))
			);
		}
	}

	#[test]
	fn escaping_twice_differs_when_special_characters_present(
		prefix in "[a-z ]*",
		special in prop::sample::select(SPECIAL.to_vec()),
		suffix in "[a-z ]*",
	) {
		let text = format!("{prefix}{special}{suffix}");
		let once = escape(&text).into_owned();
		let twice = escape(&once).into_owned();
		prop_assert_ne!(once, twice);
	}

	#[test]
	fn other_characters_pass_through(text in "[^&<>\"']*") {
		prop_assert_eq!(&*escape(&text), text.as_str());
	}

	#[test]
	fn safe_concatenation_escapes_only_text(markup in "<[a-z]{1,5}>", text in ".*") {
		let joined = SafeHtml::new(markup.clone()) + text.as_str();
		prop_assert_eq!(joined.into_string(), format!("{markup}{}", escape(&text)));
	}

	#[test]
	fn rendered_text_never_leaks_markup(text in ".*") {
		let html = tokio_test::block_on(render(div(text.clone()))).unwrap();
		let inner = html
			.as_str()
			.strip_prefix("<div>")
			.and_then(|rest| rest.strip_suffix("</div>"))
			.unwrap();
		prop_assert!(!inner.contains(['<', '>', '"', '\'']));
		prop_assert_eq!(inner, &*escape(&text));
	}
}
