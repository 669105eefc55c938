//! Named bindings handed to statement templates.
//!
//! Field names are serialized in the casing the template bodies reference:
//! `TableName`, `Schema`, `Columns`, `Set`, `Where`, `Values`,
//! `IsIdentityInsert`, `Comment` and `isMultiLine`.

use serde::Serialize;

/// Bindings for the SELECT, UPDATE, DELETE and INSERT templates.
///
/// Clause fragments are already escaped; templates only join them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct QueryBindings {
    pub table_name: String,
    pub schema: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub columns: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub set: Option<Vec<String>>,
    #[serde(rename = "Where", skip_serializing_if = "Option::is_none")]
    pub where_clause: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_identity_insert: Option<bool>,
}

impl QueryBindings {
    pub fn new(table_name: impl Into<String>, schema: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
            schema: schema.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn columns(mut self, columns: Vec<String>) -> Self {
        self.columns = Some(columns);
        self
    }

    #[must_use]
    pub fn set(mut self, set: Vec<String>) -> Self {
        self.set = Some(set);
        self
    }

    #[must_use]
    pub fn where_clause(mut self, predicates: Vec<String>) -> Self {
        self.where_clause = Some(predicates);
        self
    }

    #[must_use]
    pub fn values(mut self, values: Vec<String>) -> Self {
        self.values = Some(values);
        self
    }

    #[must_use]
    pub fn identity_insert(mut self, enabled: bool) -> Self {
        self.is_identity_insert = Some(enabled);
        self
    }
}

/// Bindings for the comment template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommentBindings {
    #[serde(rename = "Comment")]
    pub comment: String,
    #[serde(rename = "isMultiLine")]
    pub is_multi_line: bool,
}

impl CommentBindings {
    /// Multi-line when the text contains a line break (`\n` or `\r`).
    pub fn new(comment: impl Into<String>) -> Self {
        let comment = comment.into();
        let is_multi_line = comment.contains(['\n', '\r']);
        Self {
            comment,
            is_multi_line,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_query_bindings_serialize_with_template_names() {
        let bindings = QueryBindings::new("users", "main")
            .set(vec!["name = 'x'".to_string()])
            .where_clause(vec!["id = '1'".to_string()]);
        let json = serde_json::to_value(&bindings).unwrap();
        assert_eq!(
            json,
            json!({
                "TableName": "users",
                "Schema": "main",
                "Set": ["name = 'x'"],
                "Where": ["id = '1'"],
            })
        );
    }

    #[test]
    fn test_identity_insert_flag_name() {
        let json = serde_json::to_value(QueryBindings::new("t", "s").identity_insert(true)).unwrap();
        assert_eq!(json["IsIdentityInsert"], json!(true));
    }

    #[test]
    fn test_comment_bindings() {
        let single = serde_json::to_value(CommentBindings::new("one line")).unwrap();
        assert_eq!(single, json!({"Comment": "one line", "isMultiLine": false}));

        let multi = CommentBindings::new("first\nsecond");
        assert!(multi.is_multi_line);

        assert!(CommentBindings::new("first\rsecond").is_multi_line);
    }
}
