//! Form rendering and validation integration tests
//!
//! Success Criteria:
//! 1. Declared constraints appear as HTML5 attributes
//! 2. Invalid submissions yield messages keyed by field name
//! 3. Re-rendering keeps submitted values and shows their errors
//! 4. Cross-field checks run only after every field is valid
//! 5. Custom layouts receive the same values and errors

use htmpl_core::elements::{div, h2};
use htmpl_core::{FieldErrors, Node, Result};
use htmpl_forms::{
	ALL_FIELDS_KEY, FieldSchema, Form, FormLayout, FormModel, FormSchema, FormValues, LayoutContext,
	RenderForm, Widget, validate,
};
use rstest::*;
use serde::Deserialize;
use serde_json::{Value, json};

#[derive(Debug, Deserialize)]
struct Signup {
	username: String,
	email: String,
	password: String,
	confirm: String,
	age: i64,
	#[serde(default)]
	newsletter: bool,
}

impl FormModel for Signup {
	fn schema() -> FormSchema {
		FormSchema::new()
			.field(FieldSchema::string("username").with_min_length(3).with_max_length(20))
			.field(FieldSchema::email("email").with_examples(["you@example.com"]))
			.field(FieldSchema::password("password").with_min_length(8))
			.field(FieldSchema::password("confirm").with_title("Confirm password"))
			.field(FieldSchema::integer("age").with_ge(18).with_le(120))
			.field(FieldSchema::boolean("newsletter").with_default(json!(false)))
	}

	fn clean(self) -> std::result::Result<Self, FieldErrors> {
		if self.password != self.confirm {
			return Err(FieldErrors::from([(
				"confirm".to_string(),
				"Passwords do not match".to_string(),
			)]));
		}
		Ok(self)
	}
}

// ============================================================================
// Fixtures
// ============================================================================

#[fixture]
fn submission() -> FormValues {
	[
		("username", "ann"),
		("email", "ann@example.com"),
		("password", "hunter2hunter2"),
		("confirm", "hunter2hunter2"),
		("age", "30"),
	]
	.into_iter()
	.map(|(k, v)| (k.to_string(), Value::from(v)))
	.collect()
}

async fn html(node: Node) -> String {
	node.render().await.unwrap().into_string()
}

// ============================================================================
// Rendering
// ============================================================================

#[rstest]
#[tokio::test]
async fn test_length_constraints_render_as_attributes() {
	let form = Form::<Signup>::new();
	let out = html(form.render_field("username", None, None).unwrap()).await;
	assert!(out.contains("minlength=\"3\""));
	assert!(out.contains("maxlength=\"20\""));
	assert!(out.contains("required"));
}

#[rstest]
#[tokio::test]
async fn test_full_form_default_layout() {
	let form = Form::<Signup>::new();
	let out = html(form.render("/signup", RenderForm::default()).unwrap()).await;

	assert!(out.starts_with("<form action=\"/signup\" method=\"post\">"));
	assert!(out.ends_with("<button type=\"submit\">Submit</button></form>"));
	assert!(out.contains(
		"type=\"email\" name=\"email\" id=\"email\" value=\"\" placeholder=\"you@example.com\""
	));
	assert!(out.contains("<label>Confirm password<input type=\"password\" name=\"confirm\""));
	assert!(out.contains("min=\"18\" max=\"120\""));
	assert!(out.contains(
		"<label><input type=\"checkbox\" name=\"newsletter\" id=\"newsletter\" />\
		 Newsletter</label>"
	));

	let order: Vec<usize> = ["username", "email", "password", "confirm", "age", "newsletter"]
		.iter()
		.map(|name| out.find(&format!("name=\"{name}\"")).unwrap())
		.collect();
	assert!(order.windows(2).all(|w| w[0] < w[1]));
}

#[rstest]
#[tokio::test]
async fn test_form_attributes_and_submit_text() {
	let form = Form::<Signup>::new();
	let options = RenderForm::default()
		.with_method("put")
		.with_submit_text("Create account")
		.with_attr("hx_post", "/signup")
		.with_attr("class_", "stack");
	let out = html(form.render("", options).unwrap()).await;
	assert!(
		out.starts_with("<form action=\"\" method=\"put\" hx-post=\"/signup\" class=\"stack\">")
	);
	assert!(out.contains("<button type=\"submit\">Create account</button>"));
}

// ============================================================================
// Round Trip
// ============================================================================

#[rstest]
#[tokio::test]
async fn test_short_username_round_trip(mut submission: FormValues) {
	submission.insert("username".into(), json!("al"));
	let form = Form::<Signup>::new();

	let errors = form.validate(&submission).unwrap_err();
	assert_eq!(errors.len(), 1);
	assert_eq!(errors["username"], "String should have at least 3 characters");

	let out = html(
		form.render(
			"/signup",
			RenderForm::default()
				.with_values(submission)
				.with_errors(errors),
		)
		.unwrap(),
	)
	.await;
	assert!(out.contains(
		"<input type=\"text\" name=\"username\" id=\"username\" value=\"al\" required \
		 minlength=\"3\" maxlength=\"20\" aria-invalid=\"true\" \
		 aria-describedby=\"username-error\" />\
		 <small id=\"username-error\" class=\"error\">\
		 String should have at least 3 characters</small>"
	));
	assert!(out.contains("value=\"ann@example.com\""));
}

#[rstest]
fn test_valid_submission_parses(submission: FormValues) {
	let signup: Signup = validate(&submission).unwrap();
	assert_eq!(signup.username, "ann");
	assert_eq!(signup.age, 30);
	assert!(!signup.newsletter);
}

#[rstest]
#[case("email", json!("not-an-email"), "value is not a valid email address")]
#[case("age", json!("seventeen"), "Input should be a valid integer")]
#[case("age", json!("17"), "Input should be greater than or equal to 18")]
#[case("age", json!("121"), "Input should be less than or equal to 120")]
#[case("password", json!(""), "Field required")]
fn test_field_errors(
	mut submission: FormValues,
	#[case] field: &str,
	#[case] value: Value,
	#[case] message: &str,
) {
	submission.insert(field.to_string(), value.clone());
	submission.insert("confirm".into(), value);
	let errors = validate::<Signup>(&submission).unwrap_err();
	assert_eq!(errors.get(field).map(String::as_str), Some(message));
}

#[rstest]
fn test_clean_runs_after_field_checks(mut submission: FormValues) {
	submission.insert("confirm".into(), json!("something-else"));
	let errors = validate::<Signup>(&submission).unwrap_err();
	assert_eq!(errors["confirm"], "Passwords do not match");

	submission.insert("age".into(), json!("3"));
	let errors = validate::<Signup>(&submission).unwrap_err();
	assert!(errors.contains_key("age"));
	assert!(!errors.contains_key("confirm"));
}

#[rstest]
fn test_checkbox_value_is_coerced(mut submission: FormValues) {
	submission.insert("newsletter".into(), json!("on"));
	let signup: Signup = validate(&submission).unwrap();
	assert!(signup.newsletter);
}

#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct Mismatched {
	name: String,
	extra: String,
}

impl FormModel for Mismatched {
	fn schema() -> FormSchema {
		FormSchema::new().field(FieldSchema::string("name"))
	}
}

#[rstest]
fn test_model_mismatch_reported_under_all_key() {
	let values = FormValues::from([("name".to_string(), json!("x"))]);
	let errors = validate::<Mismatched>(&values).unwrap_err();
	assert!(errors[ALL_FIELDS_KEY].contains("extra"));
}

// ============================================================================
// Custom Layout
// ============================================================================

struct TwoColumn;

impl FormLayout<Signup> for TwoColumn {
	fn layout(&self, form: &Form<Signup>, ctx: LayoutContext<'_>) -> Result<Node> {
		Ok(ctx
			.form_element()
			.child(h2("Create an account"))
			.child(form.inline(&["username", "email"], ctx.values, ctx.errors)?)
			.child(form.group("Security", &["password", "confirm"], ctx.values, ctx.errors)?)
			.child(div(form.fields(&["age"], ctx.values, ctx.errors)?))
			.child(ctx.submit_button()))
	}
}

#[rstest]
#[tokio::test]
async fn test_custom_layout(submission: FormValues) {
	let form = Form::<Signup>::new()
		.configure_field("age", |cfg| cfg.widget = Widget::Hidden)
		.unwrap();
	let out = html(
		form.render(
			"/signup",
			RenderForm::default()
				.with_values(submission)
				.with_layout(TwoColumn),
		)
		.unwrap(),
	)
	.await;

	assert!(out.starts_with(
		"<form action=\"/signup\" method=\"post\"><h2>Create an account</h2><div class=\"grid\">"
	));
	assert!(out.contains("<fieldset><legend>Security</legend>"));
	assert!(out.contains("<div><input type=\"hidden\" name=\"age\" value=\"30\" /></div>"));
	assert!(!out.contains("newsletter"));
}
