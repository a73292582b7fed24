//! Server-side validation of submitted form values.
//!
//! Each declared field is checked on its own: presence, coercion to the
//! declared kind, then the declared constraints. When every field passes,
//! the coerced values are deserialized into the model and handed to
//! [`FormModel::clean`] for cross-field checks.

use crate::schema::{FieldKind, FieldSchema, FormModel, StringFormat};
use htmpl_core::FieldErrors;
use parking_lot::Mutex;
use regex::Regex;
use serde_json::{Map, Number, Value};
use std::collections::HashMap;
use std::sync::LazyLock;

/// Submitted values keyed by field name.
pub type FormValues = HashMap<String, Value>;

/// Error key for failures that belong to the form rather than one field.
pub const ALL_FIELDS_KEY: &str = "_all";

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9\-]+(\.[A-Za-z0-9\-]+)*\.[A-Za-z]{2,}$")
		.expect("email regex is valid")
});

static URL_RE: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"^https?://[^\s/$.?#][^\s]*$").expect("url regex is valid")
});

/// Compiled field patterns, `None` for patterns that failed to compile.
static PATTERNS: LazyLock<Mutex<HashMap<String, Option<Regex>>>> =
	LazyLock::new(|| Mutex::new(HashMap::new()));

/// The anchored regex for a field pattern, compiled on first use.
fn compiled_pattern(field: &str, pattern: &str) -> Option<Regex> {
	let mut patterns = PATTERNS.lock();
	if let Some(compiled) = patterns.get(pattern) {
		return compiled.clone();
	}
	// Anchored like the HTML `pattern` attribute the browser checks.
	let compiled = Regex::new(&format!("^(?:{pattern})$"))
		.inspect_err(|e| tracing::warn!(field, error = %e, "invalid pattern"))
		.ok();
	patterns.insert(pattern.to_string(), compiled.clone());
	compiled
}

/// Validate `values` against `T`'s schema
///
/// Empty strings count as missing. Values for undeclared fields are ignored.
///
/// # Examples
///
/// ```
/// use htmpl_forms::{FieldSchema, FormModel, FormSchema, FormValues, validate};
/// use serde::Deserialize;
/// use serde_json::json;
///
/// #[derive(Debug, Deserialize)]
/// struct Signup {
///     username: String,
///     age: i64,
/// }
///
/// impl FormModel for Signup {
///     fn schema() -> FormSchema {
///         FormSchema::new()
///             .field(FieldSchema::string("username").with_min_length(3))
///             .field(FieldSchema::integer("age").with_ge(18))
///     }
/// }
///
/// let mut values = FormValues::new();
/// values.insert("username".into(), json!("ann"));
/// values.insert("age".into(), json!("30"));
/// let signup: Signup = validate(&values).unwrap();
/// assert_eq!(signup.age, 30);
///
/// values.insert("username".into(), json!("al"));
/// let errors = validate::<Signup>(&values).unwrap_err();
/// assert_eq!(errors["username"], "String should have at least 3 characters");
/// ```
pub fn validate<T: FormModel>(values: &FormValues) -> Result<T, FieldErrors> {
	let schema = T::schema();
	let mut errors = FieldErrors::new();
	let mut object = Map::new();

	for field in schema.fields() {
		match check_field(field, values.get(&field.name)) {
			Ok(Some(value)) => {
				object.insert(field.name.clone(), value);
			}
			Ok(None) => {}
			Err(message) => {
				errors.insert(field.name.clone(), message);
			}
		}
	}

	if !errors.is_empty() {
		tracing::debug!(errors = errors.len(), "form validation failed");
		return Err(errors);
	}

	let model: T = serde_json::from_value(Value::Object(object)).map_err(|e| {
		tracing::debug!(error = %e, "form values do not fit the model");
		FieldErrors::from([(ALL_FIELDS_KEY.to_string(), e.to_string())])
	})?;

	model.clean().inspect_err(|errors| {
		tracing::debug!(errors = errors.len(), "form clean failed");
	})
}

/// Checks one field, returning the coerced value to deserialize.
fn check_field(field: &FieldSchema, raw: Option<&Value>) -> Result<Option<Value>, String> {
	let raw = raw.filter(|value| !is_blank(value));

	let Some(raw) = raw else {
		if let Some(default) = &field.default {
			return Ok(Some(default.clone()));
		}
		if field.is_required() {
			return Err("Field required".to_string());
		}
		return Ok(match field.kind {
			FieldKind::Boolean => Some(Value::Bool(false)),
			_ => None,
		});
	};

	let value = match field.kind {
		FieldKind::String => {
			let text = as_text(raw);
			check_string(field, &text)?;
			Value::String(text)
		}
		FieldKind::Integer => {
			let n = coerce_integer(raw).ok_or("Input should be a valid integer")?;
			check_bounds(field, n as f64)?;
			Value::Number(n.into())
		}
		FieldKind::Float => {
			let n = coerce_float(raw).ok_or("Input should be a valid number")?;
			check_bounds(field, n)?;
			Value::Number(Number::from_f64(n).ok_or("Input should be a valid number")?)
		}
		FieldKind::Boolean => {
			Value::Bool(coerce_bool(raw).ok_or("Input should be a valid boolean")?)
		}
	};
	Ok(Some(value))
}

fn check_string(field: &FieldSchema, text: &str) -> Result<(), String> {
	let len = text.chars().count();
	if let Some(min) = field.min_length
		&& len < min
	{
		return Err(format!("String should have at least {min} {}", characters(min)));
	}
	if let Some(max) = field.max_length
		&& len > max
	{
		return Err(format!("String should have at most {max} {}", characters(max)));
	}

	if let Some(pattern) = &field.pattern {
		let matched = compiled_pattern(&field.name, pattern).is_some_and(|re| re.is_match(text));
		if !matched {
			return Err(format!("String should match pattern '{pattern}'"));
		}
	}

	match field.format {
		Some(StringFormat::Email) if !EMAIL_RE.is_match(text) => {
			return Err("value is not a valid email address".to_string());
		}
		Some(StringFormat::Url) if !URL_RE.is_match(text) => {
			return Err("Input should be a valid URL".to_string());
		}
		_ => {}
	}

	if let Some(choices) = &field.choices
		&& !choices.iter().any(|choice| choice.value == text)
	{
		let allowed = choices
			.iter()
			.map(|choice| format!("'{}'", choice.value))
			.collect::<Vec<_>>()
			.join(", ");
		return Err(format!("Input should be one of {allowed}"));
	}
	Ok(())
}

fn check_bounds(field: &FieldSchema, n: f64) -> Result<(), String> {
	if let Some(ge) = field.ge
		&& n < ge
	{
		return Err(format!("Input should be greater than or equal to {ge}"));
	}
	if let Some(gt) = field.gt
		&& n <= gt
	{
		return Err(format!("Input should be greater than {gt}"));
	}
	if let Some(le) = field.le
		&& n > le
	{
		return Err(format!("Input should be less than or equal to {le}"));
	}
	if let Some(lt) = field.lt
		&& n >= lt
	{
		return Err(format!("Input should be less than {lt}"));
	}
	Ok(())
}

fn characters(n: usize) -> &'static str {
	if n == 1 { "character" } else { "characters" }
}

fn is_blank(value: &Value) -> bool {
	match value {
		Value::Null => true,
		Value::String(s) => s.is_empty(),
		_ => false,
	}
}

/// Text form of a submitted value.
pub(crate) fn as_text(value: &Value) -> String {
	match value {
		Value::Null => String::new(),
		Value::String(s) => s.clone(),
		other => other.to_string(),
	}
}

fn coerce_integer(value: &Value) -> Option<i64> {
	match value {
		Value::Number(n) => n
			.as_i64()
			.or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
		Value::String(s) => s.trim().parse().ok(),
		_ => None,
	}
}

fn coerce_float(value: &Value) -> Option<f64> {
	match value {
		Value::Number(n) => n.as_f64(),
		Value::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
		_ => None,
	}
}

fn coerce_bool(value: &Value) -> Option<bool> {
	match value {
		Value::Bool(b) => Some(*b),
		Value::Number(n) => match n.as_i64() {
			Some(0) => Some(false),
			Some(1) => Some(true),
			_ => None,
		},
		Value::String(s) => match s.to_ascii_lowercase().as_str() {
			"true" | "on" | "1" | "yes" | "y" => Some(true),
			"false" | "off" | "0" | "no" | "n" => Some(false),
			_ => None,
		},
		_ => None,
	}
}
