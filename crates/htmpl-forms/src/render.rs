//! Rendering declared fields as HTML form controls.

use crate::config::FieldConfig;
use crate::schema::{FormModel, FormSchema, Widget};
use crate::validate::{FormValues, as_text, validate};
use htmpl_core::elements::{
	button, div, fieldset, form, input, label, legend, option, select, small, textarea,
};
use htmpl_core::{AttrValue, Attributes, Error, FieldErrors, Node, Result};
use serde_json::Value;
use std::borrow::Cow;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// A form for the model `T`, with one [`FieldConfig`] per declared field.
///
/// ```
/// # tokio_test::block_on(async {
/// use htmpl_forms::{FieldSchema, Form, FormModel, FormSchema, RenderForm};
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct Search {
///     q: String,
/// }
///
/// impl FormModel for Search {
///     fn schema() -> FormSchema {
///         FormSchema::new().field(FieldSchema::string("q").with_title("Query"))
///     }
/// }
///
/// let node = Form::<Search>::new()
///     .render("/search", RenderForm::default().with_method("get").with_submit_text("Go"))
///     .unwrap();
/// assert_eq!(
///     node.render().await.unwrap().as_str(),
///     "<form action=\"/search\" method=\"get\"><label>Query<input type=\"text\" name=\"q\" \
///      id=\"q\" value=\"\" required /></label><button type=\"submit\">Go</button></form>"
/// );
/// # });
/// ```
pub struct Form<T> {
	configs: Vec<FieldConfig>,
	_model: PhantomData<fn() -> T>,
}

impl<T> Clone for Form<T> {
	fn clone(&self) -> Self {
		Self {
			configs: self.configs.clone(),
			_model: PhantomData,
		}
	}
}

impl<T> fmt::Debug for Form<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Form").field("configs", &self.configs).finish()
	}
}

impl<T: FormModel> Form<T> {
	/// Builds the form from `T::schema()`.
	pub fn new() -> Self {
		Self::from_schema(&T::schema())
	}

	/// Validates submitted values against `T`.
	pub fn validate(&self, values: &FormValues) -> std::result::Result<T, FieldErrors> {
		validate::<T>(values)
	}
}

impl<T: FormModel> Default for Form<T> {
	fn default() -> Self {
		Self::new()
	}
}

impl<T> Form<T> {
	pub fn from_schema(schema: &FormSchema) -> Self {
		Self {
			configs: schema.fields().iter().map(FieldConfig::from_schema).collect(),
			_model: PhantomData,
		}
	}

	/// Field configurations in display order.
	pub fn configs(&self) -> &[FieldConfig] {
		&self.configs
	}

	pub fn config(&self, name: &str) -> Result<&FieldConfig> {
		self.configs
			.iter()
			.find(|cfg| cfg.name == name)
			.ok_or_else(|| Error::UnknownField(name.to_string()))
	}

	/// Adjust the configuration of one field
	///
	/// # Examples
	///
	/// ```
	/// use htmpl_forms::{FieldSchema, Form, FormSchema, Widget};
	///
	/// let schema = FormSchema::new().field(FieldSchema::string("bio"));
	/// let form = Form::<()>::from_schema(&schema)
	///     .configure_field("bio", |cfg| {
	///         cfg.widget = Widget::Textarea;
	///         cfg.rows = 8;
	///     })
	///     .unwrap();
	/// assert_eq!(form.config("bio").unwrap().rows, 8);
	/// assert!(form.clone().configure_field("nope", |_| {}).is_err());
	/// ```
	pub fn configure_field(mut self, name: &str, f: impl FnOnce(&mut FieldConfig)) -> Result<Self> {
		let cfg = self
			.configs
			.iter_mut()
			.find(|cfg| cfg.name == name)
			.ok_or_else(|| Error::UnknownField(name.to_string()))?;
		f(cfg);
		Ok(self)
	}

	/// Renders the whole form through its layout.
	pub fn render(&self, action: impl Into<String>, options: RenderForm<T>) -> Result<Node> {
		let mut form_attrs = Attributes::new();
		form_attrs.set("action", action.into());
		form_attrs.set("method", options.method);
		form_attrs.extend(
			options
				.attrs
				.iter()
				.map(|(name, value)| (name.to_string(), value.clone())),
		);

		let ctx = LayoutContext {
			values: &options.values,
			errors: &options.errors,
			submit_text: &options.submit_text,
			form_attrs: &form_attrs,
		};
		match &options.layout {
			Some(layout) => layout.layout(self, ctx),
			None => DefaultLayout.layout(self, ctx),
		}
	}

	/// Renders one field with its label and hint.
	pub fn render_field(
		&self,
		name: &str,
		value: Option<&Value>,
		error: Option<&str>,
	) -> Result<Node> {
		let cfg = self.config(name)?;
		let hint = render_hint(cfg, error);
		let node = match cfg.widget {
			Widget::Checkbox => label((
				render_checkbox(cfg, value, &Attributes::new()),
				cfg.label.clone(),
				hint,
			)),
			Widget::Radio => render_radio(cfg, value, hint),
			Widget::Hidden => render_hidden(cfg, value),
			Widget::Input | Widget::Select | Widget::Textarea => {
				let control = render_control(cfg, value, error, &Attributes::new());
				label((cfg.label.clone(), control, hint))
			}
		};
		Ok(node)
	}

	/// Renders the bare control of a field, without label or hint.
	///
	/// `extra` attributes are added last and override generated ones.
	pub fn input(
		&self,
		name: &str,
		value: Option<&Value>,
		error: Option<&str>,
		extra: &Attributes,
	) -> Result<Node> {
		let cfg = self.config(name)?;
		Ok(render_control(cfg, value, error, extra))
	}

	/// `<label for="name">Label</label>`
	pub fn label_for(&self, name: &str) -> Result<Node> {
		let cfg = self.config(name)?;
		Ok(label(cfg.label.clone()).attr("for", cfg.name.clone()))
	}

	/// The error message for `name`, if `errors` has one.
	pub fn error_for(&self, name: &str, errors: &FieldErrors) -> Option<Node> {
		errors.get(name).map(|message| {
			small(message.clone())
				.id(format!("{name}-error"))
				.class("error")
		})
	}

	/// Renders the named fields in the given order.
	pub fn fields(
		&self,
		names: &[&str],
		values: &FormValues,
		errors: &FieldErrors,
	) -> Result<Vec<Node>> {
		names
			.iter()
			.map(|name| {
				let error = errors.get(*name).map(String::as_str);
				self.render_field(name, values.get(*name), error)
			})
			.collect()
	}

	/// The named fields side by side in a `<div class="grid">`.
	pub fn inline(
		&self,
		names: &[&str],
		values: &FormValues,
		errors: &FieldErrors,
	) -> Result<Node> {
		Ok(div(self.fields(names, values, errors)?).class("grid"))
	}

	/// The named fields in a `<fieldset>` under a `<legend>`.
	pub fn group(
		&self,
		title: impl Into<String>,
		names: &[&str],
		values: &FormValues,
		errors: &FieldErrors,
	) -> Result<Node> {
		Ok(fieldset((legend(title.into()), self.fields(names, values, errors)?)))
	}
}

/// Options for [`Form::render`].
pub struct RenderForm<T> {
	pub method: String,
	pub values: FormValues,
	pub errors: FieldErrors,
	pub submit_text: String,
	/// Extra attributes for the `<form>` element.
	pub attrs: Attributes,
	/// Falls back to [`DefaultLayout`].
	pub layout: Option<Arc<dyn FormLayout<T>>>,
}

impl<T> Default for RenderForm<T> {
	fn default() -> Self {
		Self {
			method: "post".to_string(),
			values: FormValues::new(),
			errors: FieldErrors::new(),
			submit_text: "Submit".to_string(),
			attrs: Attributes::new(),
			layout: None,
		}
	}
}

impl<T> fmt::Debug for RenderForm<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("RenderForm")
			.field("method", &self.method)
			.field("values", &self.values)
			.field("errors", &self.errors)
			.field("submit_text", &self.submit_text)
			.field("attrs", &self.attrs)
			.field("layout", &self.layout.is_some())
			.finish()
	}
}

impl<T> RenderForm<T> {
	pub fn with_method(mut self, method: impl Into<String>) -> Self {
		self.method = method.into();
		self
	}

	pub fn with_values(mut self, values: FormValues) -> Self {
		self.values = values;
		self
	}

	pub fn with_errors(mut self, errors: FieldErrors) -> Self {
		self.errors = errors;
		self
	}

	pub fn with_submit_text(mut self, submit_text: impl Into<String>) -> Self {
		self.submit_text = submit_text.into();
		self
	}

	pub fn with_attr(
		mut self,
		name: impl Into<Cow<'static, str>>,
		value: impl Into<AttrValue>,
	) -> Self {
		self.attrs.set(name, value);
		self
	}

	pub fn with_layout(mut self, layout: impl FormLayout<T> + 'static) -> Self {
		self.layout = Some(Arc::new(layout));
		self
	}
}

/// What a layout receives besides the form itself.
#[derive(Debug, Clone, Copy)]
pub struct LayoutContext<'a> {
	pub values: &'a FormValues,
	pub errors: &'a FieldErrors,
	pub submit_text: &'a str,
	/// `action`, `method` and any extra attributes, in that order.
	pub form_attrs: &'a Attributes,
}

impl LayoutContext<'_> {
	/// A `<form>` element carrying the form attributes.
	pub fn form_element(&self) -> Node {
		form(()).attrs(
			self.form_attrs
				.iter()
				.map(|(name, value)| (name.to_string(), value.clone())),
		)
	}

	pub fn submit_button(&self) -> Node {
		button(self.submit_text.to_string()).attr("type", "submit")
	}
}

/// Arranges a form's fields inside a `<form>` element.
///
/// ```
/// use htmpl_core::{Result, Node, elements::h2};
/// use htmpl_forms::{Form, FormLayout, LayoutContext};
///
/// struct Titled(&'static str);
///
/// impl<T> FormLayout<T> for Titled {
///     fn layout(&self, form: &Form<T>, ctx: LayoutContext<'_>) -> Result<Node> {
///         let names: Vec<&str> = form.configs().iter().map(|c| c.name.as_str()).collect();
///         Ok(ctx
///             .form_element()
///             .child(h2(self.0))
///             .child(form.fields(&names, ctx.values, ctx.errors)?)
///             .child(ctx.submit_button()))
///     }
/// }
/// ```
pub trait FormLayout<T>: Send + Sync {
	fn layout(&self, form: &Form<T>, ctx: LayoutContext<'_>) -> Result<Node>;
}

/// Every field in declaration order, then a submit button.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultLayout;

impl<T> FormLayout<T> for DefaultLayout {
	fn layout(&self, form: &Form<T>, ctx: LayoutContext<'_>) -> Result<Node> {
		let mut fields = Vec::with_capacity(form.configs().len());
		for cfg in form.configs() {
			fields.push(form.render_field(
				&cfg.name,
				ctx.values.get(&cfg.name),
				ctx.errors.get(&cfg.name).map(String::as_str),
			)?);
		}
		Ok(ctx.form_element().child(fields).child(ctx.submit_button()))
	}
}

fn render_control(
	cfg: &FieldConfig,
	value: Option<&Value>,
	error: Option<&str>,
	extra: &Attributes,
) -> Node {
	let node = match cfg.widget {
		Widget::Select => render_select(cfg, value, error),
		Widget::Textarea => render_textarea(cfg, value, error),
		Widget::Checkbox => return render_checkbox(cfg, value, extra),
		Widget::Hidden => render_hidden(cfg, value),
		Widget::Input | Widget::Radio => render_input(cfg, value, error),
	};
	with_extra(node, extra)
}

fn with_extra(node: Node, extra: &Attributes) -> Node {
	node.attrs(extra.iter().map(|(name, value)| (name.to_string(), value.clone())))
}

fn render_input(cfg: &FieldConfig, value: Option<&Value>, error: Option<&str>) -> Node {
	let invalid = error.is_some();
	input()
		.attr("type", cfg.input_type.clone())
		.attr("name", cfg.name.clone())
		.attr("id", cfg.name.clone())
		.attr("value", value.map(as_text).unwrap_or_default())
		.attr("placeholder", cfg.placeholder.clone())
		.attr("required", cfg.required)
		.attr("minlength", cfg.minlength)
		.attr("maxlength", cfg.maxlength)
		.attr("min", cfg.min)
		.attr("max", cfg.max)
		.attr("pattern", cfg.pattern.clone())
		.attr("step", cfg.step)
		.attr("aria-invalid", invalid.then_some("true"))
		.attr("aria-describedby", invalid.then(|| format!("{}-error", cfg.name)))
}

fn render_textarea(cfg: &FieldConfig, value: Option<&Value>, error: Option<&str>) -> Node {
	let invalid = error.is_some();
	textarea(value.map(as_text).unwrap_or_default())
		.attr("name", cfg.name.clone())
		.attr("id", cfg.name.clone())
		.attr("placeholder", cfg.placeholder.clone())
		.attr("required", cfg.required)
		.attr("rows", cfg.rows)
		.attr("minlength", cfg.minlength)
		.attr("maxlength", cfg.maxlength)
		.attr("aria-invalid", invalid.then_some("true"))
		.attr("aria-describedby", invalid.then(|| format!("{}-error", cfg.name)))
}

fn render_select(cfg: &FieldConfig, value: Option<&Value>, error: Option<&str>) -> Node {
	let invalid = error.is_some();
	let current = value.map(as_text).unwrap_or_default();

	let placeholder = option("Select...")
		.attr("value", "")
		.attr("selected", current.is_empty())
		.attr("disabled", true);
	let options: Vec<Node> = cfg
		.choices
		.iter()
		.flatten()
		.map(|choice| {
			option(choice.label.clone())
				.attr("value", choice.value.clone())
				.attr("selected", choice.value == current)
		})
		.collect();

	select((placeholder, options))
		.attr("name", cfg.name.clone())
		.attr("id", cfg.name.clone())
		.attr("required", cfg.required)
		.attr("aria-invalid", invalid.then_some("true"))
		.attr("aria-describedby", invalid.then(|| format!("{}-error", cfg.name)))
}

fn render_checkbox(cfg: &FieldConfig, value: Option<&Value>, extra: &Attributes) -> Node {
	let node = input()
		.attr("type", "checkbox")
		.attr("name", cfg.name.clone())
		.attr("id", cfg.name.clone())
		.attr("checked", value.is_some_and(is_truthy))
		.attr("required", cfg.required)
		.attr("role", cfg.role.clone());
	with_extra(node, extra)
}

fn render_hidden(cfg: &FieldConfig, value: Option<&Value>) -> Node {
	input()
		.attr("type", "hidden")
		.attr("name", cfg.name.clone())
		.attr("value", value.map(as_text).unwrap_or_default())
}

fn render_radio(cfg: &FieldConfig, value: Option<&Value>, hint: Option<Node>) -> Node {
	let current = value.map(as_text).unwrap_or_default();
	let radios: Vec<Node> = cfg
		.choices
		.iter()
		.flatten()
		.map(|choice| {
			let radio = input()
				.attr("type", "radio")
				.attr("name", cfg.name.clone())
				.attr("id", format!("{}_{}", cfg.name, choice.value))
				.attr("value", choice.value.clone())
				.attr("checked", choice.value == current)
				.attr("required", cfg.required);
			label((radio, choice.label.clone()))
		})
		.collect();
	fieldset((legend(cfg.label.clone()), radios, hint))
}

/// The error when there is one, otherwise the description.
fn render_hint(cfg: &FieldConfig, error: Option<&str>) -> Option<Node> {
	match error {
		Some(message) => Some(
			small(message.to_string())
				.id(format!("{}-error", cfg.name))
				.class("error"),
		),
		None => cfg.description.clone().map(small),
	}
}

fn is_truthy(value: &Value) -> bool {
	match value {
		Value::Null => false,
		Value::Bool(b) => *b,
		Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
		Value::String(s) => !matches!(s.as_str(), "" | "false" | "off" | "0"),
		Value::Array(items) => !items.is_empty(),
		Value::Object(map) => !map.is_empty(),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::schema::{Choice, FieldSchema};
	use rstest::*;
	use serde_json::json;

	#[fixture]
	fn form() -> Form<()> {
		let schema = FormSchema::new()
			.field(
				FieldSchema::string("username")
					.with_min_length(3)
					.with_max_length(20)
					.with_description("Pick something memorable"),
			)
			.field(FieldSchema::integer("age").with_ge(18).with_le(120))
			.field(FieldSchema::boolean("agree").with_role("switch"))
			.field(FieldSchema::literal("plan", ["free", "pro"]))
			.field(
				FieldSchema::string("size")
					.with_choices(vec![Choice::new("s", "Small"), Choice::new("l", "Large")])
					.with_widget(Widget::Radio)
					.with_default(json!("s")),
			)
			.field(FieldSchema::string("token").with_widget(Widget::Hidden))
			.field(FieldSchema::string("notes").with_widget(Widget::Textarea).with_rows(2));
		Form::from_schema(&schema)
	}

	async fn html(node: Node) -> String {
		node.render().await.unwrap().into_string()
	}

	#[rstest]
	#[tokio::test]
	async fn test_text_input_with_hint(form: Form<()>) {
		let node = form.render_field("username", Some(&json!("ann")), None).unwrap();
		assert_eq!(
			html(node).await,
			"<label>Username<input type=\"text\" name=\"username\" id=\"username\" value=\"ann\" \
			 required minlength=\"3\" maxlength=\"20\" />\
			 <small>Pick something memorable</small></label>"
		);
	}

	#[rstest]
	#[tokio::test]
	async fn test_error_marks_input_invalid(form: Form<()>) {
		let error = "Input should be greater than or equal to 18";
		let node = form.render_field("age", Some(&json!("7")), Some(error)).unwrap();
		assert_eq!(
			html(node).await,
			"<label>Age<input type=\"number\" name=\"age\" id=\"age\" value=\"7\" required \
			 min=\"18\" max=\"120\" aria-invalid=\"true\" aria-describedby=\"age-error\" />\
			 <small id=\"age-error\" class=\"error\">\
			 Input should be greater than or equal to 18</small></label>"
		);
	}

	#[rstest]
	#[tokio::test]
	async fn test_checkbox_label_follows_input(form: Form<()>) {
		let node = form.render_field("agree", Some(&json!(true)), None).unwrap();
		assert_eq!(
			html(node).await,
			"<label><input type=\"checkbox\" name=\"agree\" id=\"agree\" checked required \
			 role=\"switch\" />Agree</label>"
		);
	}

	#[rstest]
	#[tokio::test]
	async fn test_select_marks_current_choice(form: Form<()>) {
		let empty = form.input("plan", None, None, &Attributes::new()).unwrap();
		assert_eq!(
			html(empty).await,
			"<select name=\"plan\" id=\"plan\" required><option value=\"\" selected disabled>\
			 Select...</option><option value=\"free\">free</option>\
			 <option value=\"pro\">pro</option></select>"
		);

		let chosen = form.input("plan", Some(&json!("pro")), None, &Attributes::new()).unwrap();
		assert!(html(chosen).await.contains("<option value=\"pro\" selected>pro</option>"));
	}

	#[rstest]
	#[tokio::test]
	async fn test_radio_group(form: Form<()>) {
		let node = form.render_field("size", Some(&json!("l")), None).unwrap();
		assert_eq!(
			html(node).await,
			"<fieldset><legend>Size</legend>\
			 <label><input type=\"radio\" name=\"size\" id=\"size_s\" value=\"s\" />Small</label>\
			 <label><input type=\"radio\" name=\"size\" id=\"size_l\" value=\"l\" checked />\
			 Large</label>\
			 </fieldset>"
		);
	}

	#[rstest]
	#[tokio::test]
	async fn test_hidden_and_textarea(form: Form<()>) {
		let hidden = form.render_field("token", Some(&json!("abc")), None).unwrap();
		assert_eq!(html(hidden).await, "<input type=\"hidden\" name=\"token\" value=\"abc\" />");

		let notes = form.input("notes", Some(&json!("<hi>")), None, &Attributes::new()).unwrap();
		assert_eq!(
			html(notes).await,
			"<textarea name=\"notes\" id=\"notes\" required rows=\"2\">&lt;hi&gt;</textarea>"
		);
	}

	#[rstest]
	#[tokio::test]
	async fn test_extra_attributes_override(form: Form<()>) {
		let extra: Attributes = [("class", "wide"), ("type", "search")].into_iter().collect();
		let node = form.input("username", None, None, &extra).unwrap();
		let out = html(node).await;
		assert!(out.starts_with("<input type=\"search\" name=\"username\""));
		assert!(out.ends_with("class=\"wide\" />"));
	}

	#[rstest]
	#[tokio::test]
	async fn test_label_and_error_helpers(form: Form<()>) {
		assert_eq!(
			html(form.label_for("age").unwrap()).await,
			"<label for=\"age\">Age</label>"
		);

		let errors = FieldErrors::from([("age".to_string(), "Too young".to_string())]);
		let node = form.error_for("age", &errors).unwrap();
		assert_eq!(html(node).await, "<small id=\"age-error\" class=\"error\">Too young</small>");
		assert!(form.error_for("username", &errors).is_none());
	}

	#[rstest]
	fn test_unknown_field_is_an_error(form: Form<()>) {
		let err = form.render_field("nope", None, None).unwrap_err();
		assert!(matches!(err, Error::UnknownField(name) if name == "nope"));
		assert!(form.label_for("nope").is_err());
		let fields = form.fields(&["username", "nope"], &FormValues::new(), &FieldErrors::new());
		assert!(fields.is_err());
	}

	#[rstest]
	#[tokio::test]
	async fn test_inline_and_group(form: Form<()>) {
		let values = FormValues::from([("token".to_string(), json!("t"))]);
		let inline = form.inline(&["token", "token"], &values, &FieldErrors::new()).unwrap();
		assert_eq!(
			html(inline).await,
			"<div class=\"grid\"><input type=\"hidden\" name=\"token\" value=\"t\" />\
			 <input type=\"hidden\" name=\"token\" value=\"t\" /></div>"
		);

		let group = form.group("Secret", &["token"], &values, &FieldErrors::new()).unwrap();
		assert_eq!(
			html(group).await,
			"<fieldset><legend>Secret</legend>\
			 <input type=\"hidden\" name=\"token\" value=\"t\" /></fieldset>"
		);
	}

	#[rstest]
	#[case(json!("on"), true)]
	#[case(json!("false"), false)]
	#[case(json!(0), false)]
	#[case(json!(null), false)]
	#[case(json!(true), true)]
	fn test_truthiness(#[case] value: Value, #[case] expected: bool) {
		assert_eq!(is_truthy(&value), expected);
	}
}
