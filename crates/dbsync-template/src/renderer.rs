//! Template sets and the renderer seam used by query generators.

use crate::template::Template;
use dbsync_core::{Error, Result, TemplateError, TemplateErrorKind};
use serde::Serialize;
use std::fmt;
use std::path::Path;

/// The five statement templates a dialect supplies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateId {
    Select,
    Update,
    Delete,
    Insert,
    Comment,
}

impl TemplateId {
    pub const ALL: [TemplateId; 5] = [
        TemplateId::Select,
        TemplateId::Update,
        TemplateId::Delete,
        TemplateId::Insert,
        TemplateId::Comment,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            TemplateId::Select => "Select",
            TemplateId::Update => "Update",
            TemplateId::Delete => "Delete",
            TemplateId::Insert => "Insert",
            TemplateId::Comment => "Comment",
        }
    }

    /// File name looked up by [`QueryTemplates::load_dir`].
    pub const fn file_name(self) -> &'static str {
        match self {
            TemplateId::Select => "select.liquid",
            TemplateId::Update => "update.liquid",
            TemplateId::Delete => "delete.liquid",
            TemplateId::Insert => "insert.liquid",
            TemplateId::Comment => "comment.liquid",
        }
    }

    const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Renders a named template against structured bindings.
pub trait TemplateRenderer {
    fn render(&self, id: TemplateId, bindings: &serde_json::Value) -> Result<String>;

    /// Serialize `bindings` and render.
    fn render_serialize<B: Serialize>(&self, id: TemplateId, bindings: &B) -> Result<String>
    where
        Self: Sized,
    {
        let json = serde_json::to_value(bindings).map_err(|e| {
            Error::Template(TemplateError {
                kind: TemplateErrorKind::Render,
                template: Some(id.name().to_string()),
                message: format!("bindings: {e}"),
            })
        })?;
        self.render(id, &json)
    }
}

/// Raw template bodies, one per [`TemplateId`].
#[derive(Debug, Clone, Copy)]
pub struct TemplateSources {
    pub select: &'static str,
    pub update: &'static str,
    pub delete: &'static str,
    pub insert: &'static str,
    pub comment: &'static str,
}

impl TemplateSources {
    pub const fn get(&self, id: TemplateId) -> &'static str {
        match id {
            TemplateId::Select => self.select,
            TemplateId::Update => self.update,
            TemplateId::Delete => self.delete,
            TemplateId::Insert => self.insert,
            TemplateId::Comment => self.comment,
        }
    }
}

/// A complete, parsed set of statement templates.
#[derive(Debug, Clone)]
pub struct QueryTemplates {
    templates: Vec<Template>,
}

impl QueryTemplates {
    /// Parse every body in `sources`.
    pub fn from_sources(sources: &TemplateSources) -> Result<Self> {
        let templates = TemplateId::ALL
            .iter()
            .map(|id| Template::parse(id.name(), sources.get(*id)))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { templates })
    }

    /// Parse templates from `dir`, using `defaults` for any missing file.
    #[tracing::instrument(level = "debug", skip(defaults), fields(dir = %dir.as_ref().display()))]
    pub fn load_dir(dir: impl AsRef<Path>, defaults: &TemplateSources) -> Result<Self> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Err(Error::Template(TemplateError {
                kind: TemplateErrorKind::Load,
                template: None,
                message: format!("template directory '{}' does not exist", dir.display()),
            }));
        }

        let mut templates = Vec::with_capacity(TemplateId::ALL.len());
        for id in TemplateId::ALL {
            let path = dir.join(id.file_name());
            let template = if path.is_file() {
                let body = std::fs::read_to_string(&path).map_err(|e| {
                    Error::Template(TemplateError {
                        kind: TemplateErrorKind::Load,
                        template: Some(id.name().to_string()),
                        message: format!("reading '{}': {e}", path.display()),
                    })
                })?;
                tracing::debug!(template = id.name(), path = %path.display(), "Loaded template override");
                Template::parse(id.name(), body)?
            } else {
                Template::parse(id.name(), defaults.get(id))?
            };
            templates.push(template);
        }
        Ok(Self { templates })
    }

    pub fn get(&self, id: TemplateId) -> Option<&Template> {
        self.templates.get(id.index())
    }

    /// Replace one template with a parsed `body`.
    pub fn with_template(mut self, id: TemplateId, body: impl Into<String>) -> Result<Self> {
        let parsed = Template::parse(id.name(), body)?;
        if let Some(slot) = self.templates.get_mut(id.index()) {
            *slot = parsed;
        }
        Ok(self)
    }
}

impl TemplateRenderer for QueryTemplates {
    fn render(&self, id: TemplateId, bindings: &serde_json::Value) -> Result<String> {
        let template = self.get(id).ok_or_else(|| {
            Error::Template(TemplateError {
                kind: TemplateErrorKind::Load,
                template: Some(id.name().to_string()),
                message: "template not loaded".to_string(),
            })
        })?;
        template.render(bindings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const SOURCES: TemplateSources = TemplateSources {
        select: "SELECT {{ Columns | join: \", \" }} FROM {{ TableName }};",
        update: "UPDATE {{ TableName }};",
        delete: "DELETE FROM {{ TableName }};",
        insert: "INSERT INTO {{ TableName }};",
        comment: "-- {{ Comment }}",
    };

    #[test]
    fn test_ids_map_to_their_bodies() {
        let templates = QueryTemplates::from_sources(&SOURCES).unwrap();
        for id in TemplateId::ALL {
            let template = templates.get(id).unwrap();
            assert_eq!(template.name(), id.name());
            assert_eq!(template.source(), SOURCES.get(id));
        }
    }

    #[test]
    fn test_render_by_id() {
        let templates = QueryTemplates::from_sources(&SOURCES).unwrap();
        let sql = templates
            .render(
                TemplateId::Select,
                &json!({"Columns": ["a", "b"], "TableName": "t"}),
            )
            .unwrap();
        assert_eq!(sql, "SELECT a, b FROM t;");
    }

    #[test]
    fn test_invalid_source_fails_with_template_name() {
        let broken = TemplateSources {
            update: "{% if Set %}",
            ..SOURCES
        };
        let err = QueryTemplates::from_sources(&broken).unwrap_err();
        assert!(err.to_string().contains("template 'Update'"));
    }

    #[test]
    fn test_load_dir_overrides_and_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("delete.liquid"), "DELETE {{ TableName }} NOW;").unwrap();

        let templates = QueryTemplates::load_dir(dir.path(), &SOURCES).unwrap();
        let bindings = json!({"TableName": "t"});
        assert_eq!(
            templates.render(TemplateId::Delete, &bindings).unwrap(),
            "DELETE t NOW;"
        );
        assert_eq!(
            templates.render(TemplateId::Insert, &bindings).unwrap(),
            "INSERT INTO t;"
        );
    }

    #[test]
    fn test_load_dir_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        let err = QueryTemplates::load_dir(&missing, &SOURCES).unwrap_err();
        assert!(matches!(
            err,
            Error::Template(TemplateError {
                kind: TemplateErrorKind::Load,
                ..
            })
        ));
    }

    #[test]
    fn test_with_template_replaces_body() {
        let templates = QueryTemplates::from_sources(&SOURCES)
            .unwrap()
            .with_template(TemplateId::Comment, "# {{ Comment }}")
            .unwrap();
        let out = templates
            .render_serialize(TemplateId::Comment, &json!({"Comment": "x"}))
            .unwrap();
        assert_eq!(out, "# x");
    }
}
