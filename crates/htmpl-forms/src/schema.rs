//! Form schema descriptors.
//!
//! A [`FormSchema`] lists a form's fields in display order. Each
//! [`FieldSchema`] records the value kind and the constraints the validator
//! enforces and the renderer turns into HTML5 attributes.

use htmpl_core::FieldErrors;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// The value type of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
	String,
	Integer,
	Float,
	Boolean,
}

/// Special string formats with their own input type and validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StringFormat {
	Email,
	Url,
	Password,
}

/// How a field is rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Widget {
	#[default]
	Input,
	Textarea,
	Select,
	Checkbox,
	Radio,
	Hidden,
}

/// One allowed value of a select or radio field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
	pub value: String,
	pub label: String,
}

impl Choice {
	pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
		Self {
			value: value.into(),
			label: label.into(),
		}
	}
}

/// Declaration of a single form field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSchema {
	pub name: String,
	pub kind: FieldKind,
	pub format: Option<StringFormat>,
	pub title: Option<String>,
	pub description: Option<String>,
	/// A field with a default is optional.
	pub default: Option<serde_json::Value>,
	/// Overrides the "required unless defaulted" rule.
	pub required: Option<bool>,
	pub min_length: Option<usize>,
	pub max_length: Option<usize>,
	pub ge: Option<f64>,
	pub gt: Option<f64>,
	pub le: Option<f64>,
	pub lt: Option<f64>,
	pub pattern: Option<String>,
	pub step: Option<f64>,
	/// Example values, joined into the placeholder.
	pub examples: Vec<String>,
	pub widget: Option<Widget>,
	pub choices: Option<Vec<Choice>>,
	pub rows: Option<u32>,
	pub role: Option<String>,
}

impl FieldSchema {
	/// Create a field of the given kind
	///
	/// # Examples
	///
	/// ```
	/// use htmpl_forms::{FieldKind, FieldSchema};
	///
	/// let field = FieldSchema::new("age", FieldKind::Integer);
	/// assert_eq!(field.name, "age");
	/// assert!(field.is_required());
	/// ```
	pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
		Self {
			name: name.into(),
			kind,
			format: None,
			title: None,
			description: None,
			default: None,
			required: None,
			min_length: None,
			max_length: None,
			ge: None,
			gt: None,
			le: None,
			lt: None,
			pattern: None,
			step: None,
			examples: Vec::new(),
			widget: None,
			choices: None,
			rows: None,
			role: None,
		}
	}

	pub fn string(name: impl Into<String>) -> Self {
		Self::new(name, FieldKind::String)
	}

	pub fn integer(name: impl Into<String>) -> Self {
		Self::new(name, FieldKind::Integer)
	}

	pub fn float(name: impl Into<String>) -> Self {
		Self::new(name, FieldKind::Float)
	}

	pub fn boolean(name: impl Into<String>) -> Self {
		Self::new(name, FieldKind::Boolean)
	}

	/// A string field validated as an email address.
	pub fn email(name: impl Into<String>) -> Self {
		Self::string(name).with_format(StringFormat::Email)
	}

	/// A string field validated as an http(s) URL.
	pub fn url(name: impl Into<String>) -> Self {
		Self::string(name).with_format(StringFormat::Url)
	}

	/// A string field rendered as a password input.
	pub fn password(name: impl Into<String>) -> Self {
		Self::string(name).with_format(StringFormat::Password)
	}

	/// A string field restricted to the given values, each its own label.
	///
	/// # Examples
	///
	/// ```
	/// use htmpl_forms::FieldSchema;
	///
	/// let field = FieldSchema::literal("plan", ["free", "pro"]);
	/// assert_eq!(field.choices.as_ref().map(Vec::len), Some(2));
	/// ```
	pub fn literal<I, S>(name: impl Into<String>, values: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		let choices = values
			.into_iter()
			.map(|value| {
				let value = value.into();
				Choice::new(value.clone(), value)
			})
			.collect();
		Self::string(name).with_choices(choices)
	}

	pub fn with_format(mut self, format: StringFormat) -> Self {
		self.format = Some(format);
		self
	}

	pub fn with_title(mut self, title: impl Into<String>) -> Self {
		self.title = Some(title.into());
		self
	}

	pub fn with_description(mut self, description: impl Into<String>) -> Self {
		self.description = Some(description.into());
		self
	}

	/// Set a default value, making the field optional
	///
	/// # Examples
	///
	/// ```
	/// use htmpl_forms::FieldSchema;
	/// use serde_json::json;
	///
	/// let field = FieldSchema::boolean("newsletter").with_default(json!(false));
	/// assert!(!field.is_required());
	/// ```
	pub fn with_default(mut self, default: serde_json::Value) -> Self {
		self.default = Some(default);
		self
	}

	pub fn with_required(mut self, required: bool) -> Self {
		self.required = Some(required);
		self
	}

	/// Set the minimum length for the field
	///
	/// # Examples
	///
	/// ```
	/// use htmpl_forms::FieldSchema;
	///
	/// let field = FieldSchema::string("username").with_min_length(3);
	/// assert_eq!(field.min_length, Some(3));
	/// ```
	pub fn with_min_length(mut self, min_length: usize) -> Self {
		self.min_length = Some(min_length);
		self
	}

	pub fn with_max_length(mut self, max_length: usize) -> Self {
		self.max_length = Some(max_length);
		self
	}

	/// Inclusive lower bound.
	pub fn with_ge(mut self, ge: impl Into<f64>) -> Self {
		self.ge = Some(ge.into());
		self
	}

	/// Exclusive lower bound.
	pub fn with_gt(mut self, gt: impl Into<f64>) -> Self {
		self.gt = Some(gt.into());
		self
	}

	/// Inclusive upper bound.
	pub fn with_le(mut self, le: impl Into<f64>) -> Self {
		self.le = Some(le.into());
		self
	}

	/// Exclusive upper bound.
	pub fn with_lt(mut self, lt: impl Into<f64>) -> Self {
		self.lt = Some(lt.into());
		self
	}

	pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
		self.pattern = Some(pattern.into());
		self
	}

	pub fn with_step(mut self, step: impl Into<f64>) -> Self {
		self.step = Some(step.into());
		self
	}

	pub fn with_examples<I, S>(mut self, examples: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.examples = examples.into_iter().map(Into::into).collect();
		self
	}

	pub fn with_widget(mut self, widget: Widget) -> Self {
		self.widget = Some(widget);
		self
	}

	pub fn with_choices(mut self, choices: Vec<Choice>) -> Self {
		self.choices = Some(choices);
		self
	}

	pub fn with_rows(mut self, rows: u32) -> Self {
		self.rows = Some(rows);
		self
	}

	pub fn with_role(mut self, role: impl Into<String>) -> Self {
		self.role = Some(role.into());
		self
	}

	/// Whether a value must be submitted.
	pub fn is_required(&self) -> bool {
		self.required.unwrap_or(self.default.is_none())
	}
}

/// The ordered fields of a form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormSchema {
	fields: Vec<FieldSchema>,
}

impl FormSchema {
	pub fn new() -> Self {
		Self::default()
	}

	/// Appends a field. A field with an existing name replaces it in place.
	pub fn field(mut self, field: FieldSchema) -> Self {
		match self.fields.iter_mut().find(|f| f.name == field.name) {
			Some(existing) => *existing = field,
			None => self.fields.push(field),
		}
		self
	}

	pub fn fields(&self) -> &[FieldSchema] {
		&self.fields
	}

	pub fn get(&self, name: &str) -> Option<&FieldSchema> {
		self.fields.iter().find(|f| f.name == name)
	}
}

/// A type that can be filled from a submitted form.
///
/// # Examples
///
/// ```
/// use htmpl_forms::{FieldSchema, FormModel, FormSchema};
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct Login {
///     email: String,
///     password: String,
/// }
///
/// impl FormModel for Login {
///     fn schema() -> FormSchema {
///         FormSchema::new()
///             .field(FieldSchema::email("email"))
///             .field(FieldSchema::password("password").with_min_length(8))
///     }
/// }
/// ```
pub trait FormModel: DeserializeOwned {
	fn schema() -> FormSchema;

	/// Cross-field checks run after every field is valid.
	fn clean(self) -> Result<Self, FieldErrors>
	where
		Self: Sized,
	{
		Ok(self)
	}
}
