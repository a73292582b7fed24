//! Cache keys built from call arguments.

use htmpl_core::{Error, Result};
use serde::Serialize;
use serde_json::Value;
use std::fmt;

/// Canonical encoding of a call's arguments.
///
/// Arguments are serialized to JSON with object keys sorted, so two argument
/// values that serialize to the same data share a key no matter how their
/// maps were ordered. Arguments that JSON cannot represent (for example a map
/// with non-string keys) are rejected with [`Error::UnhashableArguments`].
///
/// # Examples
///
/// ```
/// use htmpl_cache::CacheKey;
/// use std::collections::HashMap;
///
/// let key = CacheKey::from_args(&("users", 3)).unwrap();
/// assert_eq!(key.as_str(), r#"["users",3]"#);
///
/// let bad: HashMap<(u8, u8), u8> = [((1, 2), 3)].into_iter().collect();
/// assert!(CacheKey::from_args(&bad).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey(String);

impl CacheKey {
	pub fn from_args<A: Serialize + ?Sized>(args: &A) -> Result<Self> {
		let value =
			serde_json::to_value(args).map_err(|e| Error::UnhashableArguments(e.to_string()))?;
		let mut encoded = String::new();
		write_canonical(&value, &mut encoded);
		Ok(Self(encoded))
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for CacheKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

fn write_canonical(value: &Value, out: &mut String) {
	match value {
		Value::Array(items) => {
			out.push('[');
			for (idx, item) in items.iter().enumerate() {
				if idx > 0 {
					out.push(',');
				}
				write_canonical(item, out);
			}
			out.push(']');
		}
		Value::Object(map) => {
			let mut entries: Vec<_> = map.iter().collect();
			entries.sort_by(|(a, _), (b, _)| a.cmp(b));
			out.push('{');
			for (idx, (name, item)) in entries.into_iter().enumerate() {
				if idx > 0 {
					out.push(',');
				}
				out.push_str(&Value::String(name.clone()).to_string());
				out.push(':');
				write_canonical(item, out);
			}
			out.push('}');
		}
		scalar => out.push_str(&scalar.to_string()),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde::Serialize;
	use std::collections::HashMap;

	#[derive(Serialize)]
	struct Props<'a> {
		title: &'a str,
		page: u32,
	}

	#[rstest]
	fn test_map_order_does_not_matter() {
		let a: HashMap<&str, i32> = [("x", 1), ("y", 2), ("z", 3)].into_iter().collect();
		let b: HashMap<&str, i32> = [("z", 3), ("x", 1), ("y", 2)].into_iter().collect();
		assert_eq!(CacheKey::from_args(&a).unwrap(), CacheKey::from_args(&b).unwrap());
		assert_eq!(CacheKey::from_args(&a).unwrap().as_str(), r#"{"x":1,"y":2,"z":3}"#);
	}

	#[rstest]
	fn test_struct_fields_are_sorted() {
		let key = CacheKey::from_args(&Props { title: "Home", page: 2 }).unwrap();
		assert_eq!(key.as_str(), r#"{"page":2,"title":"Home"}"#);
	}

	#[rstest]
	fn test_distinct_arguments_distinct_keys() {
		let a = CacheKey::from_args(&("a", 1)).unwrap();
		let b = CacheKey::from_args(&("a", 2)).unwrap();
		assert_ne!(a, b);
	}

	#[rstest]
	fn test_unhashable_arguments() {
		let bad: HashMap<Vec<u8>, u8> = [(vec![1], 1)].into_iter().collect();
		assert!(matches!(
			CacheKey::from_args(&bad),
			Err(Error::UnhashableArguments(_))
		));
	}
}
