use crate::db::store::{self, keys};
use crate::ui::messages::success;
use rusqlite::{Connection, OptionalExtension, Result};
use serde_json::Value;

/// Ensure that the `log` table exists with the modern schema.
fn ensure_log_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

fn is_applied(conn: &Connection, version: &str) -> Result<bool> {
    let mut chk = conn.prepare(
        "SELECT 1 FROM log
         WHERE operation = 'migration_applied' AND target = ?1
         LIMIT 1",
    )?;
    Ok(chk.query_row([version], |_| Ok(())).optional()?.is_some())
}

fn mark_applied(conn: &Connection, version: &str, message: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO log (date, operation, target, message)
         VALUES (datetime('now'), 'migration_applied', ?1, ?2)",
        [version, message],
    )?;
    Ok(())
}

/// Key/value table holding one JSON array per key.
fn create_store_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS store (
            key        TEXT PRIMARY KEY,
            value      TEXT NOT NULL DEFAULT '[]',
            updated_at TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

/// Older user arrays were written before users carried an `id`.
/// Give every such entry a sequential `USR-nnnn` id, once.
fn backfill_user_ids(conn: &Connection) -> Result<usize> {
    let raw: Option<String> = conn
        .query_row(
            "SELECT value FROM store WHERE key = ?1",
            [keys::USERS],
            |row| row.get(0),
        )
        .optional()?;

    let Some(raw) = raw else {
        return Ok(0);
    };

    let mut users: Vec<Value> = serde_json::from_str(&raw)
        .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;

    let mut next = users
        .iter()
        .filter_map(|u| u.get("id").and_then(Value::as_str))
        .filter_map(|id| id.strip_prefix("USR-"))
        .filter_map(|n| n.parse::<u32>().ok())
        .max()
        .unwrap_or(0);

    let mut patched = 0;
    for user in users.iter_mut() {
        let Some(obj) = user.as_object_mut() else {
            continue;
        };
        let has_id = obj
            .get("id")
            .and_then(Value::as_str)
            .is_some_and(|s| !s.is_empty());
        if !has_id {
            next += 1;
            obj.insert("id".into(), Value::String(store::format_id("USR", next)));
            patched += 1;
        }
    }

    if patched > 0 {
        let json = serde_json::to_string(&users)
            .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;
        conn.execute(
            "UPDATE store SET value = ?1, updated_at = datetime('now') WHERE key = ?2",
            [json.as_str(), keys::USERS],
        )?;
    }

    Ok(patched)
}

/// Public entry point: run all pending migrations.
///
/// Invoked by db::initialize::init_db().
pub fn run_pending_migrations(conn: &Connection) -> Result<()> {
    ensure_log_table(conn)?;

    let version = "20260105_0001_create_store";
    if !is_applied(conn, version)? {
        create_store_table(conn)?;
        mark_applied(conn, version, "Created key/value store table")?;
        success(format!("Migration applied: {} → store table ready", version));
    } else {
        // stores created by hand before the migration log existed
        create_store_table(conn)?;
    }

    let version = "20260212_0002_backfill_user_ids";
    if !is_applied(conn, version)? {
        let patched = backfill_user_ids(conn)?;
        mark_applied(
            conn,
            version,
            &format!("Back-filled id on {} user record(s)", patched),
        )?;
        if patched > 0 {
            success(format!(
                "Migration applied: {} → {} user id(s) assigned",
                version, patched
            ));
        }
    }

    Ok(())
}
