//! Error taxonomy shared by every htmpl crate.

use std::collections::BTreeMap;

/// Field name to error message, as produced by form validation.
pub type FieldErrors = BTreeMap<String, String>;

/// The error type for rendering, caching, forms and the HTTP adapter.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	/// A render tree contains a value with no defined rendering.
	#[error("unsupported child type `{type_name}` at {path}")]
	UnsupportedChildType {
		/// Name of the offending value's type.
		type_name: &'static str,
		/// Tag path from the root to the offending child, e.g. `div > ul > li`.
		path: String,
	},
	/// Cache key construction failed.
	#[error("arguments cannot be used as a cache key: {0}")]
	UnhashableArguments(String),
	/// A form submission did not satisfy its schema.
	#[error("form validation failed for {} field(s)", .0.len())]
	ValidationFailed(FieldErrors),
	/// A form helper was called with a field the schema does not declare.
	#[error("unknown field: {0}")]
	UnknownField(String),
	/// A pending child or component failed to produce its content.
	#[error("component failed: {0}")]
	Component(String),
	/// The request could not be interpreted.
	#[error("bad request: {0}")]
	BadRequest(String),
	/// Settings could not be loaded or are invalid.
	#[error("invalid configuration: {0}")]
	Config(String),
	/// Response construction failed.
	#[error("HTTP error: {0}")]
	Http(String),
	#[error(transparent)]
	Io(#[from] std::io::Error),
}

impl Error {
	/// Wraps any displayable failure raised while resolving a component.
	///
	/// # Examples
	///
	/// ```
	/// use htmpl_core::Error;
	///
	/// let err = Error::component("database unavailable");
	/// assert_eq!(err.to_string(), "component failed: database unavailable");
	/// ```
	pub fn component(message: impl std::fmt::Display) -> Self {
		Self::Component(message.to_string())
	}

	/// HTTP status code used when this error escapes to a response.
	///
	/// # Examples
	///
	/// ```
	/// use htmpl_core::Error;
	///
	/// assert_eq!(Error::BadRequest("x".into()).status_code(), 400);
	/// assert_eq!(Error::UnknownField("x".into()).status_code(), 500);
	/// ```
	pub fn status_code(&self) -> u16 {
		match self {
			Error::BadRequest(_) => 400,
			Error::ValidationFailed(_) => 422,
			Error::UnsupportedChildType { .. }
			| Error::UnhashableArguments(_)
			| Error::UnknownField(_)
			| Error::Component(_)
			| Error::Config(_)
			| Error::Http(_)
			| Error::Io(_) => 500,
		}
	}
}

/// Result alias used across htmpl.
pub type Result<T> = std::result::Result<T, Error>;
