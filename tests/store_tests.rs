use rusqlite::Connection;
use std::env;
use std::fs;

use vbsa::db::initialize::init_db;
use vbsa::db::pool::DbPool;
use vbsa::db::store::{self, keys, list_projects, next_id, scoped};
use vbsa::export::{ExportFormat, ExportLogic, ReportTable};
use vbsa::import::{ImportKind, import_rows, read_rows, summarize_errors};
use vbsa::models::people::User;

#[test]
fn test_next_id_follows_highest() {
    assert_eq!(next_id("USR", Vec::<&str>::new()), "USR-0001");
    assert_eq!(next_id("USR", ["USR-0001", "USR-0007", "VND-0042"]), "USR-0008");
    assert_eq!(next_id("VND", ["VND-0009", "bogus"]), "VND-0010");
}

#[test]
fn test_missing_key_loads_empty() {
    let pool = DbPool::in_memory().expect("in-memory db");
    let users: Vec<User> = store::load(&pool.conn, keys::USERS).expect("load");
    assert!(users.is_empty());
}

#[test]
fn test_projects_are_scoped() {
    let pool = DbPool::in_memory().expect("in-memory db");

    store::save(&pool.conn, &scoped("north", keys::VENUES), &["a".to_string()]).expect("save");
    store::save(&pool.conn, &scoped("south", keys::VENUES), &["b".to_string()]).expect("save");
    store::save(&pool.conn, &scoped("south", keys::ATTENDANCE), &Vec::<String>::new())
        .expect("save");
    store::save(&pool.conn, keys::USERS, &Vec::<User>::new()).expect("save");

    let north: Vec<String> = store::load(&pool.conn, &scoped("north", keys::VENUES)).expect("load");
    assert_eq!(north, vec!["a".to_string()]);

    assert_eq!(list_projects(&pool.conn).expect("projects"), vec!["north", "south"]);
}

#[test]
fn test_migration_backfills_user_ids() {
    let conn = Connection::open_in_memory().expect("open");

    // a store written before users carried an id
    conn.execute_batch(
        r#"
        CREATE TABLE store (
            key        TEXT PRIMARY KEY,
            value      TEXT NOT NULL DEFAULT '[]',
            updated_at TEXT NOT NULL
        );
        INSERT INTO store (key, value, updated_at) VALUES (
            'users',
            '[{"name":"Asha Rao","mobile":"9876543210","role":"Invigilator"},
              {"id":"USR-0003","name":"Vikram Shah","mobile":"9123456789","role":"Server Manager"},
              {"name":"Meera Iyer","mobile":"9000000002","role":"Invigilator"}]',
            '2026-01-01'
        );
        "#,
    )
    .expect("seed");

    init_db(&conn).expect("migrate");

    let users: Vec<User> = store::load(&conn, keys::USERS).expect("load");
    let ids: Vec<&str> = users.iter().map(|u| u.id.as_str()).collect();
    assert_eq!(ids, vec!["USR-0004", "USR-0003", "USR-0005"]);
    assert!(users.iter().all(|u| u.status == "Active" && !u.verified));

    // a second run leaves the ids alone
    init_db(&conn).expect("migrate again");
    let again: Vec<User> = store::load(&conn, keys::USERS).expect("load");
    assert_eq!(again, users);
}

#[test]
fn test_csv_export_reimports_quoted_fields() {
    let path = env::temp_dir().join("vbsa_roundtrip_users.csv");
    fs::remove_file(&path).ok();

    let mut table = ReportTable::new("Users", ImportKind::Users.headers());
    table.push(vec![
        "Shah, Vikram".into(),
        "9123456789".into(),
        "".into(),
        "Server Manager".into(),
        "VND-0001".into(),
    ]);
    table.push(vec![
        "Asha \"A\" Rao".into(),
        "9876543210".into(),
        "asha@example.com".into(),
        "Invigilator".into(),
        "".into(),
    ]);

    let written = ExportLogic::export(&table, ExportFormat::Csv, &path.to_string_lossy(), true)
        .expect("export");
    assert!(written);

    let rows = read_rows(&path, ImportKind::Users).expect("read");
    let mut names = Vec::new();
    let report = import_rows(rows, |row| {
        names.push(row.get("name").to_string());
        Ok(())
    });

    assert_eq!(report.imported, 2);
    assert!(report.errors.is_empty());
    assert_eq!(names, vec!["Shah, Vikram", "Asha \"A\" Rao"]);
}

#[test]
fn test_read_rows_rejects_missing_columns() {
    let path = env::temp_dir().join("vbsa_missing_columns.csv");
    fs::write(&path, "name,mobile\nAsha Rao,9876543210\n").expect("write");

    let err = read_rows(&path, ImportKind::Users).err().expect("missing columns");
    assert!(err.to_string().contains("role"));
}

#[test]
fn test_error_summary_truncates() {
    let errors: Vec<String> = (1..=7).map(|i| format!("Row {}: bad", i + 1)).collect();
    let summary = summarize_errors(&errors, 5);

    assert_eq!(summary.lines().count(), 6);
    assert!(summary.ends_with("...and 2 more errors"));
    assert_eq!(summarize_errors(&errors[..2], 5).lines().count(), 2);
}
