pub mod commands;
pub mod parser;

use crate::config::Config;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::utils::time::parse_instant;
use chrono::{DateTime, Local};
use parser::Cli;

/// Resolved settings shared by every command handler.
pub struct AppContext {
    pub cfg: Config,
    pub project: String,
    pub now: DateTime<Local>,
}

impl AppContext {
    pub fn new(cli: &Cli, cfg: Config) -> AppResult<Self> {
        let project = cli
            .project
            .clone()
            .unwrap_or_else(|| cfg.default_project.clone());

        let now = match &cli.now {
            Some(s) => parse_instant(s)?,
            None => Local::now(),
        };

        Ok(Self { cfg, project, now })
    }

    pub fn open(&self) -> AppResult<DbPool> {
        DbPool::new(&self.cfg.database)
    }

    /// Name stamped on records as the acting operator.
    pub fn operator(&self) -> &str {
        &self.cfg.operator
    }
}
