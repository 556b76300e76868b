use crate::cli::parser::Cli;
use crate::config::Config;
use crate::db::log;
use crate::db::store::RecordStore;
use crate::errors::AppResult;

/// Handle the `init` command
///
/// This initializes:
///  - the config directory and file (skipped in test mode)
///  - the SQLite database file and its schema
pub fn handle(cli: &Cli) -> AppResult<()> {
    let cfg = Config::init_all(cli.db.clone(), cli.test)?;

    println!("⚙️  Initializing covidvisor…");
    if !cli.test {
        println!("📄 Config file : {}", Config::config_file().display());
    }
    println!("🗄️  Database   : {}", &cfg.database);

    let store = RecordStore::open(&cfg.database)?;

    println!("✅ Database initialized at {}", &cfg.database);

    log::audit(
        &store.conn,
        "init",
        "Database initialized",
        &format!("Database initialized at {}", &cfg.database),
    );

    println!("🎉 covidvisor initialization completed!");
    Ok(())
}
