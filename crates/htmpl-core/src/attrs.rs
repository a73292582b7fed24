//! Attribute values, name normalization and attribute lists.
//!
//! Attribute names given to builders pass through [`normalize_name`] once,
//! at the point they are attached to a node:
//!
//! - a reserved-word name such as `class_` or `for_` maps to the bare word;
//! - otherwise one trailing `_` is stripped and the remaining `_` become `-`
//!   (`data_user_id` becomes `data-user-id`, `hx_get` becomes `hx-get`);
//! - names already containing `-` or `:` are kept as given.

use crate::escape::escape_into;
use crate::safe::SafeHtml;
use std::borrow::Cow;

/// Names that cannot be written bare as Rust identifiers, or read better with
/// a trailing underscore, mapped to the HTML attribute they stand for.
const RESERVED: &[(&str, &str)] = &[
	("class_", "class"),
	("for_", "for"),
	("type_", "type"),
	("async_", "async"),
	("as_", "as"),
	("in_", "in"),
	("loop_", "loop"),
	("match_", "match"),
	("mod_", "mod"),
	("move_", "move"),
	("ref_", "ref"),
	("static_", "static"),
	("use_", "use"),
	("where_", "where"),
	("id_", "id"),
	("is_", "is"),
	("default_", "default"),
	("open_", "open"),
];

/// Normalizes an attribute name.
///
/// # Examples
///
/// ```
/// use htmpl_core::attrs::normalize_name;
///
/// assert_eq!(normalize_name("class_"), "class");
/// assert_eq!(normalize_name("data_user_id"), "data-user-id");
/// assert_eq!(normalize_name("hx-on:click"), "hx-on:click");
/// assert_eq!(normalize_name("href"), "href");
/// ```
pub fn normalize_name(name: impl Into<Cow<'static, str>>) -> Cow<'static, str> {
	let name = name.into();
	if let Some((_, bare)) = RESERVED.iter().find(|(alias, _)| *alias == name) {
		return Cow::Borrowed(*bare);
	}
	if name.contains(['-', ':']) || !name.contains('_') {
		return name;
	}
	let trimmed = name.strip_suffix('_').unwrap_or(&name);
	if trimmed.is_empty() {
		return name;
	}
	Cow::Owned(trimmed.replace('_', "-"))
}

/// The value of a single attribute.
#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
	Text(Cow<'static, str>),
	/// `true` renders the bare name, `false` omits the attribute.
	Bool(bool),
	Int(i64),
	Float(f64),
	/// Omitted from output.
	Absent,
}

impl AttrValue {
	/// Whether this value produces any output.
	pub fn is_present(&self) -> bool {
		!matches!(self, AttrValue::Absent | AttrValue::Bool(false))
	}

	/// Text form of the value, if it has one.
	pub fn as_text(&self) -> Option<Cow<'_, str>> {
		match self {
			AttrValue::Text(s) => Some(Cow::Borrowed(s.as_ref())),
			AttrValue::Int(n) => Some(Cow::Owned(n.to_string())),
			AttrValue::Float(n) => Some(Cow::Owned(n.to_string())),
			AttrValue::Bool(_) | AttrValue::Absent => None,
		}
	}
}

impl From<&'static str> for AttrValue {
	fn from(value: &'static str) -> Self {
		AttrValue::Text(Cow::Borrowed(value))
	}
}

impl From<String> for AttrValue {
	fn from(value: String) -> Self {
		AttrValue::Text(Cow::Owned(value))
	}
}

impl From<&String> for AttrValue {
	fn from(value: &String) -> Self {
		AttrValue::Text(Cow::Owned(value.clone()))
	}
}

impl From<Cow<'static, str>> for AttrValue {
	fn from(value: Cow<'static, str>) -> Self {
		AttrValue::Text(value)
	}
}

impl From<bool> for AttrValue {
	fn from(value: bool) -> Self {
		AttrValue::Bool(value)
	}
}

macro_rules! int_attr_value {
	($($ty:ty),*) => {
		$(
			impl From<$ty> for AttrValue {
				fn from(value: $ty) -> Self {
					AttrValue::Int(value as i64)
				}
			}
		)*
	};
}

int_attr_value!(i8, i16, i32, i64, u8, u16, u32, isize);

impl From<u64> for AttrValue {
	fn from(value: u64) -> Self {
		i64::try_from(value)
			.map(AttrValue::Int)
			.unwrap_or_else(|_| AttrValue::Text(Cow::Owned(value.to_string())))
	}
}

impl From<usize> for AttrValue {
	fn from(value: usize) -> Self {
		AttrValue::from(value as u64)
	}
}

impl From<f32> for AttrValue {
	fn from(value: f32) -> Self {
		AttrValue::Float(f64::from(value))
	}
}

impl From<f64> for AttrValue {
	fn from(value: f64) -> Self {
		AttrValue::Float(value)
	}
}

impl<T: Into<AttrValue>> From<Option<T>> for AttrValue {
	fn from(value: Option<T>) -> Self {
		value.map_or(AttrValue::Absent, Into::into)
	}
}

/// Ordered attribute list with normalized, unique names.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Attributes {
	entries: Vec<(Cow<'static, str>, AttrValue)>,
}

impl Attributes {
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets an attribute. A name that is already present keeps its position
	/// and takes the new value.
	pub fn set(&mut self, name: impl Into<Cow<'static, str>>, value: impl Into<AttrValue>) {
		let name = normalize_name(name);
		let value = value.into();
		match self.entries.iter_mut().find(|(existing, _)| *existing == name) {
			Some(entry) => entry.1 = value,
			None => self.entries.push((name, value)),
		}
	}

	/// Looks up an attribute by its normalized name.
	pub fn get(&self, name: &str) -> Option<&AttrValue> {
		self.entries
			.iter()
			.find(|(existing, _)| existing == name)
			.map(|(_, value)| value)
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, &AttrValue)> {
		self.entries.iter().map(|(name, value)| (name.as_ref(), value))
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Appends every present attribute to `out`, each with a leading space.
	pub fn write_to(&self, out: &mut String) {
		for (name, value) in &self.entries {
			write_attr(name, value, out);
		}
	}
}

impl<K, V> FromIterator<(K, V)> for Attributes
where
	K: Into<Cow<'static, str>>,
	V: Into<AttrValue>,
{
	fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
		let mut attrs = Attributes::new();
		for (name, value) in iter {
			attrs.set(name, value);
		}
		attrs
	}
}

impl<K, V> Extend<(K, V)> for Attributes
where
	K: Into<Cow<'static, str>>,
	V: Into<AttrValue>,
{
	fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
		for (name, value) in iter {
			self.set(name, value);
		}
	}
}

fn write_attr(name: &str, value: &AttrValue, out: &mut String) {
	match value {
		AttrValue::Absent | AttrValue::Bool(false) => {}
		AttrValue::Bool(true) => {
			out.push(' ');
			out.push_str(name);
		}
		other => {
			if let Some(text) = other.as_text() {
				out.push(' ');
				out.push_str(name);
				out.push_str("=\"");
				escape_into(&text, out);
				out.push('"');
			}
		}
	}
}

/// Renders one attribute on its own, without a leading space.
///
/// # Examples
///
/// ```
/// use htmpl_core::attr;
///
/// assert_eq!(attr("data_id", 5).as_str(), "data-id=\"5\"");
/// assert_eq!(attr("disabled", true).as_str(), "disabled");
/// assert!(attr("hidden", false).is_empty());
/// assert!(attr("title", None::<&str>).is_empty());
/// ```
pub fn attr(name: impl Into<Cow<'static, str>>, value: impl Into<AttrValue>) -> SafeHtml {
	let mut out = String::new();
	write_attr(&normalize_name(name), &value.into(), &mut out);
	SafeHtml::new(out.trim_start())
}
