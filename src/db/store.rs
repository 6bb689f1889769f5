//! Key/value persistence: every collection is one JSON array stored under a
//! fixed key and always replaced as a whole.

use crate::errors::AppResult;
use chrono::Local;
use rusqlite::{Connection, OptionalExtension, params};
use serde::Serialize;
use serde::de::DeserializeOwned;

pub mod keys {
    // master data, shared by every subproject
    pub const USERS: &str = "users";
    pub const VENDORS: &str = "vendors";
    pub const MANPOWER_ROLES: &str = "manpower_roles";
    pub const ASSET_TYPES: &str = "asset_types";

    // subproject workflow, see `scoped`
    pub const VENUES: &str = "venues";
    pub const SESSION_TEMPLATES: &str = "session_templates";
    pub const SESSION_DATES: &str = "session_dates";
    pub const SESSION_OVERRIDES: &str = "session_overrides";
    pub const PARTNER_MAPPINGS: &str = "partner_mappings";
    pub const USER_MAPPINGS: &str = "user_mappings";
    pub const DEVICE_LEDGER: &str = "device_ledger";
    pub const MAPPED_DEVICES: &str = "mapped_devices";
    pub const DEVICE_ACTIVITIES: &str = "device_activities";
    pub const ATTENDANCE: &str = "attendance";
    pub const CHECKLISTS: &str = "checklists";
    pub const EMERGENCY_USERS: &str = "emergency_users";
}

const PROJECT_PREFIX: &str = "subproject/";

/// Key of a collection that belongs to one subproject.
pub fn scoped(project: &str, key: &str) -> String {
    format!("{PROJECT_PREFIX}{project}/{key}")
}

/// Load the array stored under `key`; a missing key is an empty array.
pub fn load<T: DeserializeOwned>(conn: &Connection, key: &str) -> AppResult<Vec<T>> {
    let raw: Option<String> = conn
        .query_row("SELECT value FROM store WHERE key = ?1", [key], |row| {
            row.get(0)
        })
        .optional()?;

    match raw {
        Some(json) => Ok(serde_json::from_str(&json)?),
        None => Ok(Vec::new()),
    }
}

/// Replace the whole array stored under `key`.
pub fn save<T: Serialize>(conn: &Connection, key: &str, items: &[T]) -> AppResult<()> {
    let json = serde_json::to_string(items)?;
    let now = Local::now().to_rfc3339();

    let mut stmt = conn.prepare_cached(
        "INSERT INTO store (key, value, updated_at) VALUES (?1, ?2, ?3)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
    )?;
    stmt.execute(params![key, json, now])?;
    Ok(())
}

/// Names of the subprojects that have stored at least one collection.
pub fn list_projects(conn: &Connection) -> AppResult<Vec<String>> {
    let mut stmt = conn.prepare("SELECT key FROM store WHERE key LIKE 'subproject/%' ORDER BY key")?;
    let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

    let mut out: Vec<String> = Vec::new();
    for r in rows {
        let key = r?;
        if let Some(name) = key
            .strip_prefix(PROJECT_PREFIX)
            .and_then(|rest| rest.split('/').next())
            && !out.iter().any(|p| p == name)
        {
            out.push(name.to_string());
        }
    }
    Ok(out)
}

pub fn format_id(prefix: &str, n: u32) -> String {
    format!("{prefix}-{n:04}")
}

/// Next sequential id for `prefix`, one past the highest already in use.
pub fn next_id<'a, I>(prefix: &str, existing: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let max = existing
        .into_iter()
        .filter_map(|id| id.strip_prefix(prefix))
        .filter_map(|rest| rest.strip_prefix('-'))
        .filter_map(|n| n.parse::<u32>().ok())
        .max()
        .unwrap_or(0);
    format_id(prefix, max + 1)
}
