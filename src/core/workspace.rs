//! Access to the collections of one subproject.

use crate::core::sessions::expand_sessions;
use crate::db::store::{self, keys};
use crate::errors::AppResult;
use crate::models::session::{DateSessionOverride, SessionInstance, SessionTemplate};
use chrono::NaiveDate;
use rusqlite::Connection;
use serde::Serialize;
use serde::de::DeserializeOwned;

pub struct Workspace<'a> {
    pub conn: &'a Connection,
    pub project: &'a str,
}

impl<'a> Workspace<'a> {
    pub fn new(conn: &'a Connection, project: &'a str) -> Self {
        Self { conn, project }
    }

    /// Load a collection scoped to this subproject.
    pub fn load<T: DeserializeOwned>(&self, key: &str) -> AppResult<Vec<T>> {
        store::load(self.conn, &store::scoped(self.project, key))
    }

    pub fn save<T: Serialize>(&self, key: &str, items: &[T]) -> AppResult<()> {
        store::save(self.conn, &store::scoped(self.project, key), items)
    }

    /// Load a global master collection.
    pub fn load_master<T: DeserializeOwned>(&self, key: &str) -> AppResult<Vec<T>> {
        store::load(self.conn, key)
    }

    pub fn save_master<T: Serialize>(&self, key: &str, items: &[T]) -> AppResult<()> {
        store::save(self.conn, key, items)
    }

    /// Stored templates, or the two default sessions if none were saved yet.
    pub fn templates(&self) -> AppResult<Vec<SessionTemplate>> {
        let stored: Vec<SessionTemplate> = self.load(keys::SESSION_TEMPLATES)?;
        if stored.is_empty() {
            Ok(SessionTemplate::defaults())
        } else {
            Ok(stored)
        }
    }

    pub fn sessions(&self) -> AppResult<Vec<SessionInstance>> {
        let dates: Vec<NaiveDate> = self.load(keys::SESSION_DATES)?;
        let overrides: Vec<DateSessionOverride> = self.load(keys::SESSION_OVERRIDES)?;
        expand_sessions(&dates, &self.templates()?, &overrides)
    }
}
