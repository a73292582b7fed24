//! Sign-up demo: a validated form, an HTMX search box and lazily loaded stats.
//!
//! ```text
//! HTMPL_ADDR=127.0.0.1:8000 RUST_LOG=htmpl_http=debug cargo run -p forms-app
//! ```

use htmpl::components::{
	AlertVariant, DocumentOptions, PageOptions, Theme, alert, card, htmx_scripts, lazy_load, nav,
	page, search_input,
};
use htmpl::elements::{a, footer, h1, li, p, section, small, ul};
use htmpl::forms::{FieldSchema, Form, FormModel, FormSchema, FormValues, RenderForm};
use htmpl::http::{HtmlRouter, Request, Server, ServerSettings};
use htmpl::{FieldErrors, IntoChild, Node, Result};
use parking_lot::Mutex;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::layer::SubscriberExt as _;
use tracing_subscriber::util::SubscriberInitExt as _;

#[derive(Debug, Clone, Deserialize)]
struct Signup {
	username: String,
	email: String,
	password: String,
	confirm: String,
	plan: String,
	#[serde(default)]
	newsletter: bool,
}

impl FormModel for Signup {
	fn schema() -> FormSchema {
		FormSchema::new()
			.field(
				FieldSchema::string("username")
					.with_min_length(3)
					.with_max_length(20)
					.with_pattern("[a-z0-9_]+")
					.with_description("Lowercase letters, digits and underscores"),
			)
			.field(FieldSchema::email("email").with_examples(["you@example.com"]))
			.field(FieldSchema::password("password").with_min_length(8))
			.field(FieldSchema::password("confirm").with_title("Confirm password"))
			.field(
				FieldSchema::literal("plan", ["free", "team", "enterprise"])
					.with_default(json!("free")),
			)
			.field(
				FieldSchema::boolean("newsletter")
					.with_title("Send me product news")
					.with_default(json!(false)),
			)
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

type Members = Arc<Mutex<Vec<Signup>>>;

async fn layout(title: &'static str, body: impl IntoChild) -> Result<Node> {
	let scripts = htmx_scripts(false).await?;
	let options = PageOptions::new()
		.with_nav(nav("htmpl", [("Home", "/"), ("Sign up", "/signup")]))
		.with_footer(footer(small("Built with htmpl")).class("container"))
		.with_document(
			DocumentOptions::new()
				.with_theme(Theme::Auto)
				.with_scripts(scripts),
		);
	Ok(page(title, body, options))
}

async fn home(members: Members) -> Result<Node> {
	let count = members.lock().len();
	let body = (
		h1("Members"),
		card(
			Some("Find a member"),
			(
				search_input("q", "/search", "#results", Duration::from_millis(300)),
				ul(()).id("results"),
			),
			None::<&str>,
		),
		lazy_load("/stats", Some(p(format!("{count} members")))),
	);
	layout("Members", body).await
}

/// List items for `#results`.
fn search(members: &Members, query: &str) -> Vec<Node> {
	let query = query.trim().to_lowercase();
	let matches: Vec<Node> = members
		.lock()
		.iter()
		.filter(|m| !query.is_empty() && m.username.contains(&query))
		.map(|m| li(format!("{} <{}>", m.username, m.email)))
		.collect();
	if matches.is_empty() {
		return vec![li(small("No matches"))];
	}
	matches
}

async fn signup_page(form: Form<Signup>, values: FormValues, errors: FieldErrors) -> Result<Node> {
	let notice = (!errors.is_empty())
		.then(|| alert("Please fix the errors below", AlertVariant::Error));
	let options = RenderForm::default()
		.with_values(values)
		.with_errors(errors)
		.with_submit_text("Create account");
	let body = section((h1("Sign up"), notice, form.render("/signup", options)?));
	layout("Sign up", body).await
}

async fn welcome(signup: Signup, members: Members) -> Result<Node> {
	tracing::info!(
		username = %signup.username,
		plan = %signup.plan,
		newsletter = signup.newsletter,
		"new member"
	);
	let message = format!("Welcome, {}! You are on the {} plan.", signup.username, signup.plan);
	members.lock().push(signup);
	layout(
		"Welcome",
		(alert(message, AlertVariant::Success), p(a("Back to members").attr("href", "/"))),
	)
	.await
}

fn router(members: Members) -> HtmlRouter {
	let home_members = Arc::clone(&members);
	let search_members = Arc::clone(&members);
	let stats_members = Arc::clone(&members);

	HtmlRouter::new()
		.get("/", move |_req: Request| home(Arc::clone(&home_members)))
		.get("/search", move |req: Request| {
			let members = Arc::clone(&search_members);
			async move {
				let query = req.query().get("q").cloned().unwrap_or_default();
				Ok(search(&members, &query).into_child())
			}
		})
		.get("/stats", move |_req: Request| {
			let count = stats_members.lock().len();
			async move { Ok(p(format!("{count} members, updated just now"))) }
		})
		.form(
			"/signup",
			|form: Form<Signup>, values, errors| signup_page(form, values, errors),
			move |signup: Signup, _req: Request| welcome(signup, Arc::clone(&members)),
		)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
	tracing_subscriber::registry()
		.with(
			tracing_subscriber::EnvFilter::try_from_default_env()
				.unwrap_or_else(|_| "forms_app=info,htmpl_http=info".into()),
		)
		.with(tracing_subscriber::fmt::layer())
		.init();

	let settings = ServerSettings::from_env()?;
	tracing::info!(addr = %settings.addr, "starting forms demo");

	let members: Members = Arc::default();
	Server::new(router(members)).bind_and_serve(&settings).await?;
	Ok(())
}
