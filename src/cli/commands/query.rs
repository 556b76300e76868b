use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::translator::Translator;
use crate::db::store::RecordStore;
use crate::errors::{AppError, AppResult};
use crate::utils::date;

/// Resolve a structured intent without the interpreters.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Query { intent, today } = cmd {
        let today = match today {
            Some(d) => date::parse_date(d).ok_or_else(|| AppError::InvalidDate(d.to_string()))?,
            None => date::today(),
        };

        let store = RecordStore::open(&cfg.database)?;
        let resolution = Translator::new(&store, today).process_query(intent)?;

        if resolution.is_custom {
            println!("custom query");
        } else {
            println!("{}", resolution.answer);
        }
    }

    Ok(())
}
