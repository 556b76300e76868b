use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::seed::SeedLogic;
use crate::db::store::RecordStore;
use crate::errors::AppResult;
use crate::ui::messages::{info, success};
use std::path::PathBuf;

/// Seed the record store from the configured (or given) dataset.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Seed { file } = cmd {
        let path = PathBuf::from(file.clone().unwrap_or_else(|| cfg.dataset.clone()));
        let mut store = RecordStore::open(&cfg.database)?;

        let inserted = SeedLogic::seed(&mut store, &path)?;
        if inserted == 0 {
            info("Database already seeded, nothing to do.");
        } else {
            success(format!("Seeded {} records from {}", inserted, path.display()));
        }
    }

    Ok(())
}
