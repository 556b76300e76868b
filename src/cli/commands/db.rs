use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::stats;
use crate::db::store::RecordStore;
use crate::errors::AppResult;
use crate::utils::colors::{CYAN, GREEN, RED, RESET};

/// Handle the `db` subcommand
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Db { check, info } = cmd {
        let store = RecordStore::open(&cfg.database)?;

        //
        // 1) INFO
        //
        if *info {
            stats::print_db_info(&store, &cfg.database)?;
        }

        //
        // 2) CHECK
        //
        if *check {
            println!("{}▶ Running integrity check…{}", CYAN, RESET);

            let integrity: String = store
                .conn
                .query_row("PRAGMA integrity_check;", [], |row| row.get(0))?;

            if integrity == "ok" {
                println!("{}✔ Integrity check passed.{}\n", GREEN, RESET);
            } else {
                println!("{}✘ Integrity check failed:{} {}\n", RED, RESET, integrity);
            }
        }
    }

    Ok(())
}
