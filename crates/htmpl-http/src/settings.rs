//! Server settings from defaults, TOML or the environment.

use htmpl_core::{Error, RenderOptions, Result, VoidStyle};
use serde::{Deserialize, Serialize};
use std::net::{Ipv4Addr, SocketAddr};

/// Listen address used when none is configured.
pub const DEFAULT_ADDR: SocketAddr =
	SocketAddr::new(std::net::IpAddr::V4(Ipv4Addr::LOCALHOST), 8000);

/// Settings for [`Server`](crate::Server).
///
/// ```
/// use htmpl_core::VoidStyle;
/// use htmpl_http::ServerSettings;
///
/// let settings = ServerSettings::from_toml_str(
///     r#"
///     addr = "0.0.0.0:3000"
///
///     [render]
///     void_style = "html5"
///     "#,
/// )
/// .unwrap();
/// assert_eq!(settings.addr.port(), 3000);
/// assert_eq!(settings.render.void_style, VoidStyle::Html5);
/// assert!(!settings.render.concurrent_siblings);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
	pub addr: SocketAddr,
	pub render: RenderOptions,
}

impl Default for ServerSettings {
	fn default() -> Self {
		Self {
			addr: DEFAULT_ADDR,
			render: RenderOptions::default(),
		}
	}
}

impl ServerSettings {
	pub fn from_toml_str(source: &str) -> Result<Self> {
		toml::from_str(source).map_err(|e| Error::Config(e.to_string()))
	}

	/// Reads `HTMPL_ADDR`, `HTMPL_VOID_STYLE` and `HTMPL_CONCURRENT_SIBLINGS`
	/// over the defaults.
	pub fn from_env() -> Result<Self> {
		Self::from_lookup(|key| std::env::var(key).ok())
	}

	/// Like [`from_env`](Self::from_env), reading variables through `lookup`.
	pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
		let mut settings = Self::default();
		if let Some(addr) = lookup("HTMPL_ADDR") {
			settings.addr = addr
				.trim()
				.parse()
				.map_err(|e| Error::Config(format!("HTMPL_ADDR `{addr}`: {e}")))?;
		}
		if let Some(style) = lookup("HTMPL_VOID_STYLE") {
			settings.render.void_style = style.parse::<VoidStyle>()?;
		}
		if let Some(flag) = lookup("HTMPL_CONCURRENT_SIBLINGS") {
			settings.render.concurrent_siblings = parse_flag(&flag).ok_or_else(|| {
				Error::Config(format!("HTMPL_CONCURRENT_SIBLINGS `{flag}` is not a boolean"))
			})?;
		}
		Ok(settings)
	}
}

fn parse_flag(value: &str) -> Option<bool> {
	match value.trim().to_ascii_lowercase().as_str() {
		"1" | "true" | "yes" | "on" => Some(true),
		"0" | "false" | "no" | "off" => Some(false),
		_ => None,
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use std::collections::HashMap;

	fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
		let vars: HashMap<String, String> = vars
			.iter()
			.map(|(k, v)| (k.to_string(), v.to_string()))
			.collect();
		move |key| vars.get(key).cloned()
	}

	#[rstest]
	fn test_defaults() {
		let settings = ServerSettings::from_lookup(lookup(&[])).unwrap();
		assert_eq!(settings, ServerSettings::default());
		assert_eq!(settings.addr.to_string(), "127.0.0.1:8000");
	}

	#[rstest]
	fn test_env_overrides() {
		let settings = ServerSettings::from_lookup(lookup(&[
			("HTMPL_ADDR", "0.0.0.0:9000"),
			("HTMPL_VOID_STYLE", "html5"),
			("HTMPL_CONCURRENT_SIBLINGS", "yes"),
		]))
		.unwrap();
		assert_eq!(settings.addr.port(), 9000);
		assert_eq!(settings.render.void_style, VoidStyle::Html5);
		assert!(settings.render.concurrent_siblings);
	}

	#[rstest]
	#[case("HTMPL_ADDR", "localhost")]
	#[case("HTMPL_VOID_STYLE", "sgml")]
	#[case("HTMPL_CONCURRENT_SIBLINGS", "sometimes")]
	fn test_invalid_env_values(#[case] key: &str, #[case] value: &str) {
		let result = ServerSettings::from_lookup(lookup(&[(key, value)]));
		assert!(matches!(result, Err(Error::Config(_))));
	}

	#[rstest]
	fn test_toml_partial_and_invalid() {
		let settings =
			ServerSettings::from_toml_str("[render]\nconcurrent_siblings = true\n").unwrap();
		assert_eq!(settings.addr, DEFAULT_ADDR);
		assert!(settings.render.concurrent_siblings);

		let result = ServerSettings::from_toml_str("addr = 5");
		assert!(matches!(result, Err(Error::Config(_))));
	}
}
