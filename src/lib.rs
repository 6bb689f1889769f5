//! vbsa library root.
//! Exposes the CLI parser, the high-level run() function and the rule modules.

pub mod cli;
pub mod config;
pub mod core;
pub mod db;
pub mod errors;
pub mod export;
pub mod import;
pub mod models;
pub mod ui;
pub mod utils;

use clap::Parser;
use cli::AppContext;
use cli::commands;
use cli::parser::{Cli, Commands};
use config::Config;
use errors::AppResult;

/// Central command dispatcher
pub fn dispatch(cli: &Cli, ctx: &AppContext) -> AppResult<()> {
    match &cli.command {
        Commands::Init => commands::init::handle(cli),
        Commands::Config { .. } => commands::config::handle(&cli.command, &ctx.cfg),
        Commands::Log { .. } => commands::log::handle(&cli.command, ctx),
        Commands::Backup { .. } => commands::backup::handle(&cli.command, ctx),
        Commands::Project { action } => commands::venue::handle_project(action, ctx),
        Commands::Vendor { action } => commands::masters::handle_vendor(action, ctx),
        Commands::User { action } => commands::masters::handle_user(action, ctx),
        Commands::Role { action } => commands::masters::handle_role(action, ctx),
        Commands::AssetType { action } => commands::masters::handle_asset_type(action, ctx),
        Commands::Venue { action } => commands::venue::handle_venue(action, ctx),
        Commands::Map { action } => commands::venue::handle_map(action, ctx),
        Commands::Session { action } => commands::session::handle(action, ctx),
        Commands::Device { action } => commands::device::handle(action, ctx),
        Commands::Attendance { action } => commands::attendance::handle(action, ctx),
        Commands::Checklist { action } => commands::checklist::handle(action, ctx),
        Commands::Emergency { action } => commands::emergency::handle(action, ctx),
        Commands::Template { .. } | Commands::Import { .. } | Commands::Export { .. } => {
            commands::transfer::handle(&cli.command, ctx)
        }
    }
}

/// Entry point used by main.rs
pub fn run() -> AppResult<()> {
    let cli = Cli::parse();

    // config is loaded once; --db wins over the configured path
    let mut cfg = Config::load().unwrap_or_else(|e| {
        ui::messages::warning(format!("{}; using defaults", e));
        Config::default()
    });
    if let Some(custom_db) = &cli.db {
        cfg.database = custom_db.clone();
    }

    let ctx = AppContext::new(&cli, cfg)?;
    dispatch(&cli, &ctx)
}
