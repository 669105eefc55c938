//! Statement templates for DbSync query generators.
//!
//! Each SQL dialect keeps its SELECT, UPDATE, DELETE, INSERT and comment
//! statements as template bodies rather than code. A generator builds the
//! escaped clause fragments, wraps them in [`QueryBindings`] or
//! [`CommentBindings`], and asks a [`TemplateRenderer`] for the final text.
//!
//! ```ignore
//! use dbsync_template::{QueryBindings, QueryTemplates, TemplateId, TemplateRenderer};
//!
//! let templates = QueryTemplates::from_sources(&SOURCES)?;
//! let bindings = QueryBindings::new("users", "main").columns(vec!["id".into()]);
//! let sql = templates.render_serialize(TemplateId::Select, &bindings)?;
//! ```

pub mod bindings;
pub mod renderer;
pub mod template;

pub use bindings::{CommentBindings, QueryBindings};
pub use renderer::{QueryTemplates, TemplateId, TemplateRenderer, TemplateSources};
pub use template::Template;
