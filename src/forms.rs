//! Forms rendered and validated from a schema.
//!
//! See [`FormModel`] for declaring a model and [`Form`] for rendering it.

pub use htmpl_forms::*;
