//! Per-field rendering configuration inferred from a [`FieldSchema`].

use crate::schema::{Choice, FieldKind, FieldSchema, StringFormat, Widget};

/// Rows given to a textarea when none are declared.
pub const DEFAULT_ROWS: u32 = 4;

/// How a single field renders.
///
/// Built once per field by [`FieldConfig::from_schema`] and adjustable
/// afterwards through [`Form::configure_field`](crate::Form::configure_field).
#[derive(Debug, Clone, PartialEq)]
pub struct FieldConfig {
	pub name: String,
	pub label: String,
	/// The `type` attribute of an `<input>`.
	pub input_type: String,
	pub required: bool,
	pub placeholder: Option<String>,
	pub description: Option<String>,
	pub role: Option<String>,
	pub min: Option<f64>,
	pub max: Option<f64>,
	pub minlength: Option<usize>,
	pub maxlength: Option<usize>,
	pub pattern: Option<String>,
	pub step: Option<f64>,
	pub choices: Option<Vec<Choice>>,
	pub rows: u32,
	pub widget: Widget,
}

impl FieldConfig {
	/// Infer the configuration of a declared field
	///
	/// # Examples
	///
	/// ```
	/// use htmpl_forms::{FieldConfig, FieldSchema, Widget};
	///
	/// let cfg = FieldConfig::from_schema(&FieldSchema::integer("age").with_gt(17).with_lt(121));
	/// assert_eq!(cfg.input_type, "number");
	/// assert_eq!((cfg.min, cfg.max), (Some(18.0), Some(120.0)));
	///
	/// let cfg = FieldConfig::from_schema(&FieldSchema::string("first_name"));
	/// assert_eq!(cfg.label, "First Name");
	/// assert_eq!(cfg.widget, Widget::Input);
	/// ```
	pub fn from_schema(field: &FieldSchema) -> Self {
		let input_type = infer_input_type(field);

		let mut widget = field.widget.unwrap_or_default();
		if field.choices.is_some() && widget == Widget::Input {
			widget = Widget::Select;
		}
		if input_type == "checkbox" {
			widget = Widget::Checkbox;
		}

		let integer = field.kind == FieldKind::Integer;
		let min = match (field.ge, field.gt) {
			(_, Some(gt)) if integer => Some(gt + 1.0),
			(_, Some(gt)) => Some(gt),
			(ge, None) => ge,
		};
		let max = match (field.le, field.lt) {
			(_, Some(lt)) if integer => Some(lt - 1.0),
			(_, Some(lt)) => Some(lt),
			(le, None) => le,
		};

		let placeholder = (!field.examples.is_empty()).then(|| field.examples.join(", "));

		Self {
			name: field.name.clone(),
			label: field
				.title
				.clone()
				.unwrap_or_else(|| label_from_name(&field.name)),
			input_type: input_type.to_string(),
			required: field.is_required(),
			placeholder,
			description: field.description.clone(),
			role: field.role.clone(),
			min,
			max,
			minlength: field.min_length,
			maxlength: field.max_length,
			pattern: field.pattern.clone(),
			step: field.step,
			choices: field.choices.clone(),
			rows: field.rows.unwrap_or(DEFAULT_ROWS),
			widget,
		}
	}
}

/// `first_name` becomes `First Name`.
pub fn label_from_name(name: &str) -> String {
	name.split('_')
		.filter(|word| !word.is_empty())
		.map(|word| {
			let mut chars = word.chars();
			match chars.next() {
				Some(first) => first
					.to_uppercase()
					.chain(chars.flat_map(char::to_lowercase))
					.collect(),
				None => String::new(),
			}
		})
		.collect::<Vec<String>>()
		.join(" ")
}

/// The `<input type>` for a field: from its kind and format first, then
/// from its name for plain strings.
pub fn infer_input_type(field: &FieldSchema) -> &'static str {
	match field.kind {
		FieldKind::Integer | FieldKind::Float => return "number",
		FieldKind::Boolean => return "checkbox",
		FieldKind::String => {}
	}
	match field.format {
		Some(StringFormat::Email) => return "email",
		Some(StringFormat::Url) => return "url",
		Some(StringFormat::Password) => return "password",
		None => {}
	}

	let name = field.name.to_lowercase();
	let has = |needle: &str| name.contains(needle);
	if has("password") {
		"password"
	} else if has("email") {
		"email"
	} else if has("url") || has("website") {
		"url"
	} else if has("phone") || has("tel") {
		"tel"
	} else if has("date") && !has("time") {
		"date"
	} else if has("time") && !has("date") {
		"time"
	} else if has("datetime") {
		"datetime-local"
	} else if has("color") {
		"color"
	} else {
		"text"
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;

	#[rstest]
	#[case("password", "password")]
	#[case("confirm_password", "password")]
	#[case("work_email", "email")]
	#[case("homepage_url", "url")]
	#[case("website", "url")]
	#[case("phone", "tel")]
	#[case("birth_date", "date")]
	#[case("start_time", "time")]
	#[case("meeting_datetime", "datetime-local")]
	#[case("favorite_color", "color")]
	#[case("username", "text")]
	fn test_name_heuristics(#[case] name: &str, #[case] expected: &str) {
		assert_eq!(infer_input_type(&FieldSchema::string(name)), expected);
	}

	#[rstest]
	fn test_kind_beats_name() {
		assert_eq!(infer_input_type(&FieldSchema::integer("phone")), "number");
		assert_eq!(infer_input_type(&FieldSchema::float("price")), "number");
		assert_eq!(infer_input_type(&FieldSchema::boolean("email_me")), "checkbox");
		assert_eq!(infer_input_type(&FieldSchema::email("contact")), "email");
		assert_eq!(infer_input_type(&FieldSchema::password("secret")), "password");
		assert_eq!(infer_input_type(&FieldSchema::url("link")), "url");
	}

	#[rstest]
	#[case("first_name", "First Name")]
	#[case("email", "Email")]
	#[case("ZIP_code", "Zip Code")]
	#[case("_private", "Private")]
	fn test_label_from_name(#[case] name: &str, #[case] expected: &str) {
		assert_eq!(label_from_name(name), expected);
	}

	#[rstest]
	fn test_constraints_carry_over() {
		let cfg = FieldConfig::from_schema(
			&FieldSchema::string("username")
				.with_min_length(3)
				.with_max_length(20)
				.with_pattern("[a-z]+")
				.with_examples(["ann", "bob"])
				.with_description("Lowercase letters only"),
		);
		assert_eq!(cfg.minlength, Some(3));
		assert_eq!(cfg.maxlength, Some(20));
		assert_eq!(cfg.pattern.as_deref(), Some("[a-z]+"));
		assert_eq!(cfg.placeholder.as_deref(), Some("ann, bob"));
		assert_eq!(cfg.description.as_deref(), Some("Lowercase letters only"));
		assert!(cfg.required);
		assert_eq!(cfg.rows, DEFAULT_ROWS);
	}

	#[rstest]
	fn test_float_exclusive_bounds_are_kept() {
		let cfg = FieldConfig::from_schema(&FieldSchema::float("ratio").with_gt(0).with_lt(1));
		assert_eq!((cfg.min, cfg.max), (Some(0.0), Some(1.0)));
	}

	#[rstest]
	fn test_widget_inference() {
		let select = FieldConfig::from_schema(&FieldSchema::literal("plan", ["free", "pro"]));
		assert_eq!(select.widget, Widget::Select);

		let radio = FieldConfig::from_schema(
			&FieldSchema::literal("plan", ["free", "pro"]).with_widget(Widget::Radio),
		);
		assert_eq!(radio.widget, Widget::Radio);

		let checkbox = FieldConfig::from_schema(
			&FieldSchema::boolean("agree").with_default(json!(false)),
		);
		assert_eq!(checkbox.widget, Widget::Checkbox);
		assert!(!checkbox.required);
	}

	#[rstest]
	fn test_title_overrides_label() {
		let cfg = FieldConfig::from_schema(&FieldSchema::string("dob").with_title("Date of birth"));
		assert_eq!(cfg.label, "Date of birth");
	}
}
