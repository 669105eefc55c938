//! Entity metadata for statement generation.
//!
//! An entity is a struct whose fields map to the columns of one table. Its
//! shape is described once, statically, by an [`EntityInfo`] holding one
//! [`FieldInfo`] per column. The descriptors are normally produced by
//! `#[derive(Entity)]` from `dbsync-macros`, but can be written by hand.

use crate::value::Value;

/// Metadata about one entity field / table column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldInfo {
    /// Rust field name
    pub name: &'static str,
    /// Database column name (may differ from field name)
    pub column_name: &'static str,
    /// Whether this column identifies a row for UPDATE/DELETE
    pub key: bool,
    /// Whether the database generates this column's value
    pub identity: bool,
    /// Whether this column is left out of INSERT column lists
    pub excluded: bool,
}

impl FieldInfo {
    /// Create a new field descriptor with all flags off.
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            column_name: name,
            key: false,
            identity: false,
            excluded: false,
        }
    }

    /// Set the database column name.
    pub const fn column(mut self, name: &'static str) -> Self {
        self.column_name = name;
        self
    }

    /// Mark as a key column.
    pub const fn key(mut self) -> Self {
        self.key = true;
        self
    }

    /// Mark as an identity (auto-generated) column.
    pub const fn identity(mut self) -> Self {
        self.identity = true;
        self
    }

    /// Mark as excluded from INSERT.
    pub const fn excluded(mut self) -> Self {
        self.excluded = true;
        self
    }
}

/// Table-level metadata for an entity type.
#[derive(Debug, Clone, Copy)]
pub struct EntityInfo {
    pub table_name: &'static str,
    /// Schema name; `None` lets the provider apply its default schema.
    pub schema: Option<&'static str>,
    pub fields: &'static [FieldInfo],
    /// Insert explicit values for identity columns even when excluded.
    pub insert_with_id: bool,
    /// Ask the dialect to wrap inserts in identity-insert handling.
    pub include_identity_insert: bool,
}

impl EntityInfo {
    /// Create table metadata with no schema and both insert flags off.
    pub const fn new(table_name: &'static str, fields: &'static [FieldInfo]) -> Self {
        Self {
            table_name,
            schema: None,
            fields,
            insert_with_id: false,
            include_identity_insert: false,
        }
    }

    pub const fn schema(mut self, schema: &'static str) -> Self {
        self.schema = Some(schema);
        self
    }

    pub const fn insert_with_id(mut self, generate_with_id: bool, identity_insert: bool) -> Self {
        self.insert_with_id = generate_with_id;
        self.include_identity_insert = identity_insert;
        self
    }

    /// All column names, in declaration order.
    pub fn column_names(&self) -> Vec<&'static str> {
        self.fields.iter().map(|f| f.column_name).collect()
    }

    /// Columns marked as keys, in declaration order.
    pub fn key_columns(&self) -> Vec<&'static str> {
        self.columns_where(|f| f.key)
    }

    /// Columns marked as identity, in declaration order.
    pub fn identity_columns(&self) -> Vec<&'static str> {
        self.columns_where(|f| f.identity)
    }

    /// Columns marked as excluded, in declaration order.
    pub fn excluded_columns(&self) -> Vec<&'static str> {
        self.columns_where(|f| f.excluded)
    }

    /// Look up a field by column name, falling back to the Rust field name.
    pub fn field(&self, name: &str) -> Option<&'static FieldInfo> {
        let fields: &'static [FieldInfo] = self.fields;
        fields
            .iter()
            .find(|f| f.column_name == name)
            .or_else(|| fields.iter().find(|f| f.name == name))
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.field(name).is_some()
    }

    fn columns_where(&self, pred: impl Fn(&FieldInfo) -> bool) -> Vec<&'static str> {
        self.fields
            .iter()
            .filter(|f| pred(f))
            .map(|f| f.column_name)
            .collect()
    }
}

/// Trait for types whose instances map to rows of a database table.
///
/// # Example
///
/// ```ignore
/// use dbsync::Entity;
///
/// #[derive(Entity)]
/// #[dbsync(table = "users")]
/// struct User {
///     #[dbsync(key, identity)]
///     id: i64,
///     name: String,
/// }
/// ```
pub trait Entity: Sized + Send + Sync + 'static {
    /// Static table metadata, built once per type.
    fn entity_info() -> &'static EntityInfo;

    /// Current field values as `(column name, value)` pairs in declaration order.
    fn to_row(&self) -> Vec<(&'static str, Value)>;

    /// Current value of one column, by column or field name.
    fn value_of(&self, column: &str) -> Option<Value> {
        let field = Self::entity_info().field(column)?;
        self.to_row()
            .into_iter()
            .find(|(name, _)| *name == field.column_name)
            .map(|(_, value)| value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Account {
        id: i64,
        owner: String,
        balance: f64,
    }

    static ACCOUNT_FIELDS: &[FieldInfo] = &[
        FieldInfo::new("id").key().identity(),
        FieldInfo::new("owner").column("owner name"),
        FieldInfo::new("balance").excluded(),
    ];

    static ACCOUNT_INFO: EntityInfo = EntityInfo::new("accounts", ACCOUNT_FIELDS)
        .schema("bank")
        .insert_with_id(true, false);

    impl Entity for Account {
        fn entity_info() -> &'static EntityInfo {
            &ACCOUNT_INFO
        }

        fn to_row(&self) -> Vec<(&'static str, Value)> {
            vec![
                ("id", Value::from(self.id)),
                ("owner name", Value::from(self.owner.clone())),
                ("balance", Value::from(self.balance)),
            ]
        }
    }

    #[test]
    fn test_column_classification() {
        let info = Account::entity_info();
        assert_eq!(info.column_names(), ["id", "owner name", "balance"]);
        assert_eq!(info.key_columns(), ["id"]);
        assert_eq!(info.identity_columns(), ["id"]);
        assert_eq!(info.excluded_columns(), ["balance"]);
        assert_eq!(info.schema, Some("bank"));
        assert!(info.insert_with_id);
        assert!(!info.include_identity_insert);
    }

    #[test]
    fn test_field_lookup_by_column_or_field_name() {
        let info = Account::entity_info();
        assert_eq!(info.field("owner name").map(|f| f.name), Some("owner"));
        assert_eq!(info.field("owner").map(|f| f.column_name), Some("owner name"));
        assert!(!info.has_column("missing"));
    }

    #[test]
    fn test_value_of() {
        let account = Account {
            id: 7,
            owner: "Ann".to_string(),
            balance: 1.5,
        };
        assert_eq!(account.value_of("id"), Some(Value::BigInt(7)));
        assert_eq!(account.value_of("owner"), Some(Value::from("Ann")));
        assert_eq!(account.value_of("nope"), None);
    }
}
