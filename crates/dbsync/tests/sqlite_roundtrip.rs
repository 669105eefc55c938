use dbsync::prelude::*;
use dbsync::{DEFAULT_SCHEMA_NAME, QUERY_ERROR_PREFIX};

#[derive(dbsync::Entity, Debug, Clone, PartialEq)]
#[dbsync(table = "users", insert_with_id)]
struct User {
    #[dbsync(key, identity)]
    id: i64,
    name: String,
    #[dbsync(column = "e mail")]
    email: Option<String>,
    #[dbsync(skip)]
    dirty: bool,
}

#[derive(dbsync::Entity, Debug, Clone)]
struct AuditEntry {
    #[dbsync(key)]
    code: String,
    #[dbsync(excluded)]
    created: String,
    message: String,
}

fn user(id: i64, name: &str, email: Option<&str>) -> User {
    User {
        id,
        name: name.to_string(),
        email: email.map(str::to_string),
        dirty: false,
    }
}

fn setup() -> (tempfile::TempDir, SqliteConnection) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sync.db");
    let conn = SqliteConnection::new(path.to_string_lossy().into_owned());
    conn.execute_raw(
        "CREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT NOT NULL, \"e mail\" TEXT);",
    )
    .unwrap();
    (dir, conn)
}

fn names(conn: &SqliteConnection, generator: &SqliteQueryGenerator) -> Vec<String> {
    let sql = generator
        .generate_select_query::<User>("users", &["id", "name"], None)
        .unwrap();
    let data = conn.execute_query(&sql, "users").unwrap();
    data.table("users")
        .unwrap()
        .rows()
        .iter()
        .map(|row| row.get_named::<String>("name").unwrap())
        .collect()
}

#[test]
fn derived_metadata() {
    let info = User::entity_info();
    assert_eq!(info.table_name, "users");
    assert_eq!(info.column_names(), ["id", "name", "e mail"]);
    assert_eq!(info.key_columns(), ["id"]);
    assert_eq!(info.identity_columns(), ["id"]);
    assert!(info.insert_with_id);

    let audit = AuditEntry::entity_info();
    assert_eq!(audit.table_name, "audit_entry");
    assert_eq!(audit.excluded_columns(), ["created"]);
}

#[test]
fn derived_to_row_reads_current_values() {
    let row = user(3, "Ann", None).to_row();
    assert_eq!(
        row,
        vec![
            ("id", Value::BigInt(3)),
            ("name", Value::Text("Ann".to_string())),
            ("e mail", Value::Null),
        ]
    );
}

#[test]
fn generated_statements_round_trip_through_sqlite() {
    let (_dir, conn) = setup();
    let generator = SqliteQueryGenerator::new().unwrap();

    let insert = generator
        .generate_insert_query(&user(1, "O'Brien", Some("ob@example.com")), &["id"], &[])
        .unwrap();
    assert_eq!(
        insert,
        "INSERT INTO main.users (id, name, \"e mail\") VALUES ('1', 'O''Brien', 'ob@example.com');"
    );
    conn.execute_raw(&insert).unwrap();
    conn.execute_raw(
        &generator
            .generate_insert_query(&user(2, "Bob", None), &[], &[])
            .unwrap(),
    )
    .unwrap();

    assert_eq!(names(&conn, &generator), ["O'Brien", "Bob"]);

    let update = generator
        .generate_update_query(
            &user(2, "Bob", None),
            &["id"],
            &[],
            &[("name", Value::from("Robert"))],
        )
        .unwrap();
    conn.execute_raw(&update).unwrap();
    assert_eq!(names(&conn, &generator), ["O'Brien", "Robert"]);

    let delete = generator
        .generate_delete_query(&user(1, "O'Brien", None), &["id"])
        .unwrap();
    conn.execute_raw(&delete).unwrap();
    assert_eq!(names(&conn, &generator), ["Robert"]);

    generator.dispose();
}

#[test]
fn null_key_values_match_with_is_null() {
    let (_dir, conn) = setup();
    let generator = SqliteQueryGenerator::new().unwrap();

    conn.execute_raw(
        &generator
            .generate_insert_query(&user(7, "Nobody", None), &[], &[])
            .unwrap(),
    )
    .unwrap();

    let delete = generator
        .generate_delete_query(&user(7, "Nobody", None), &["id", "e mail"])
        .unwrap();
    assert!(delete.ends_with("WHERE id = '7' AND \"e mail\" IS NULL;"));
    conn.execute_raw(&delete).unwrap();
    assert!(names(&conn, &generator).is_empty());
}

#[test]
fn comments_and_batches_execute() {
    let (_dir, conn) = setup();
    let generator = SqliteQueryGenerator::new().unwrap();

    let mut script = String::new();
    script.push_str(&generator.generate_comment("seed data\nrun 1").unwrap());
    script.push('\n');
    script.push_str(&generator.generate_batch_separator());
    script.push_str(
        &generator
            .generate_insert_query(&user(1, "Ann", None), &[], &[])
            .unwrap(),
    );
    script.push('\n');
    script.push_str(&generator.generate_comment("single line").unwrap());
    script.push('\n');
    script.push_str(
        &generator
            .generate_insert_query(&user(2, "Ben", None), &[], &[])
            .unwrap(),
    );

    conn.execute_raw(&script).unwrap();
    assert_eq!(names(&conn, &generator), ["Ann", "Ben"]);
}

#[test]
fn comment_text_stays_inert_when_executed() {
    let (_dir, conn) = setup();
    let generator = SqliteQueryGenerator::new().unwrap();
    conn.execute_raw(
        &generator
            .generate_insert_query(&user(1, "Ann", None), &[], &[])
            .unwrap(),
    )
    .unwrap();

    let comment = generator
        .generate_comment("note\n*/ DELETE FROM users; /*")
        .unwrap();
    conn.execute_raw(&comment).unwrap();
    assert_eq!(names(&conn, &generator), ["Ann"]);
}

#[test]
fn select_result_carries_table_label_and_types() {
    let (_dir, conn) = setup();
    conn.execute_raw("INSERT INTO users VALUES (1, 'Ann', NULL);").unwrap();

    let generator = SqliteQueryGenerator::new().unwrap();
    let sql = generator
        .generate_select_query::<User>("users", &["id", "name", "e mail"], Some(DEFAULT_SCHEMA_NAME))
        .unwrap();
    assert_eq!(sql, "SELECT id, name, \"e mail\" FROM main.users;");

    let data = conn.execute_query(&sql, "people").unwrap();
    assert!(data.table("users").is_none());
    let table = data.table("people").unwrap();
    let row = &table.rows()[0];
    assert_eq!(row.get_named::<i64>("id").unwrap(), 1);
    assert_eq!(row.get_by_name("e mail"), Some(&Value::Null));
}

#[test]
fn select_validation_happens_before_any_io() {
    let generator = SqliteQueryGenerator::new().unwrap();
    let err = generator
        .generate_select_query::<User>("users", &[], None)
        .unwrap_err();
    assert!(err.is_validation_error());
}

#[test]
fn failures_are_reported_not_swallowed() {
    let missing = SqliteConnection::new("/nonexistent_dir/nested/sync.db");
    assert!(missing.test_connection().is_err());

    let (_dir, conn) = setup();
    assert!(conn.test_connection().unwrap());
    let err = conn
        .execute_query("SELECT nope FROM users", "users")
        .unwrap_err();
    assert!(err.to_string().contains(QUERY_ERROR_PREFIX));
}

#[test]
fn connection_string_describes_the_file() {
    let conn = SqliteConnection::new("data/sync.db");
    assert_eq!(conn.connection_string(), "Data Source=data/sync.db;");
}
