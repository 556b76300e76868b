use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::sessions::Sessions;
use crate::core::translator::Translator;
use crate::core::turn::{Answer, answer_text};
use crate::db::store::RecordStore;
use crate::errors::AppResult;
use crate::ui::messages::{info, warning};
use crate::utils::date;

/// One typed turn: start both interpreters, answer, shut them down.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Ask { question } = cmd {
        let store = RecordStore::open(&cfg.database)?;
        let mut sessions = Sessions::start(cfg)?;

        let translator = Translator::new(&store, date::today());
        let result = answer_text(
            &mut sessions.extractor,
            &mut sessions.freeform,
            &translator,
            question,
        );

        for e in sessions.close() {
            warning(e);
        }

        let answer = result?;
        if matches!(answer, Answer::FreeForm(_)) {
            info("No template matched, answered by the free-form interpreter.");
        }
        println!("{}", answer.text());
    }

    Ok(())
}
