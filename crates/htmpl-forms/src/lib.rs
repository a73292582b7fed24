//! # htmpl-forms
//!
//! HTML forms generated from a declared schema.
//!
//! A model implements [`FormModel`], listing its fields as a [`FormSchema`].
//! [`Form`] renders the fields as labelled controls carrying HTML5
//! validation attributes (`required`, `minlength`, `min`, `pattern`, ...),
//! and [`validate`] applies the same constraints on the server, returning
//! field-keyed messages that [`Form::render`] can show next to each field.
//!
//! ```
//! # tokio_test::block_on(async {
//! use htmpl_forms::{FieldSchema, Form, FormModel, FormSchema, FormValues, RenderForm};
//! use serde::Deserialize;
//! use serde_json::json;
//!
//! #[derive(Debug, Deserialize)]
//! struct Signup {
//!     username: String,
//! }
//!
//! impl FormModel for Signup {
//!     fn schema() -> FormSchema {
//!         FormSchema::new().field(FieldSchema::string("username").with_min_length(3))
//!     }
//! }
//!
//! let form = Form::<Signup>::new();
//! let values = FormValues::from([("username".to_string(), json!("al"))]);
//! let errors = form.validate(&values).unwrap_err();
//!
//! let html = form
//!     .render("/signup", RenderForm::default().with_values(values).with_errors(errors))
//!     .unwrap()
//!     .render()
//!     .await
//!     .unwrap();
//! assert!(html.as_str().contains("value=\"al\""));
//! assert!(html.as_str().contains("String should have at least 3 characters"));
//! # });
//! ```

pub mod config;
pub mod render;
pub mod schema;
pub mod validate;

pub use config::{FieldConfig, infer_input_type, label_from_name};
pub use render::{DefaultLayout, Form, FormLayout, LayoutContext, RenderForm};
pub use schema::{Choice, FieldKind, FieldSchema, FormModel, FormSchema, StringFormat, Widget};
pub use validate::{ALL_FIELDS_KEY, FormValues, validate};
