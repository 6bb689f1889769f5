use crate::cli::AppContext;
use crate::cli::parser::Commands;
use crate::core::backup::BackupLogic;
use crate::errors::AppResult;

pub fn handle(cmd: &Commands, ctx: &AppContext) -> AppResult<()> {
    if let Commands::Backup {
        file,
        compress,
        force,
    } = cmd
    {
        let pool = ctx.open()?;
        BackupLogic::backup(&pool, &ctx.cfg, file, *compress, *force)?;
    }

    Ok(())
}
