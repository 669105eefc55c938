//! Built-in SQLite statement templates.
//!
//! SQLite has no identity-insert mode, so the INSERT body ignores
//! `IsIdentityInsert` and `Where`.

use dbsync_template::TemplateSources;

pub const SELECT: &str = "SELECT {{ Columns | join: \", \" }} FROM {{ Schema }}.{{ TableName }};";

pub const UPDATE: &str = "UPDATE {{ Schema }}.{{ TableName }} SET {{ Set | join: \", \" }} WHERE {{ Where | join: \" AND \" }};";

pub const DELETE: &str = "DELETE FROM {{ Schema }}.{{ TableName }} WHERE {{ Where | join: \" AND \" }};";

pub const INSERT: &str = "INSERT INTO {{ Schema }}.{{ TableName }} ({{ Columns | join: \", \" }}) VALUES ({{ Values | join: \", \" }});";

pub const COMMENT: &str = "{% if isMultiLine %}/*\n{{ Comment }}\n*/{% else %}-- {{ Comment }}{% endif %}";

pub const SQLITE_TEMPLATES: TemplateSources = TemplateSources {
    select: SELECT,
    update: UPDATE,
    delete: DELETE,
    insert: INSERT,
    comment: COMMENT,
};
