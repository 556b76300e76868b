use crate::config::Config;
use crate::core::listen::{Interpreters, ListenLogic, Voice};
use crate::core::sessions::Sessions;
use crate::core::translator::Translator;
use crate::db::store::RecordStore;
use crate::errors::AppResult;
use crate::ui::messages::{header, info, warning};
use crate::utils::date;
use crate::voice::command::{CommandRecorder, CommandSpeaker, CommandTranscriber};
use std::fs;
use std::io;

/// Interactive voice loop.
pub fn handle(cfg: &Config) -> AppResult<()> {
    header("COVIDVisor");

    let mut recorder = CommandRecorder::from_config(cfg)?;
    let mut transcriber = CommandTranscriber::from_config(cfg)?;
    let mut speaker = CommandSpeaker::from_config(cfg)?;

    let mut sessions = Sessions::start(cfg)?;
    let store = match RecordStore::open(&cfg.database) {
        Ok(store) => store,
        Err(e) => {
            for err in sessions.close() {
                warning(err);
            }
            return Err(e);
        }
    };

    let workdir = std::env::temp_dir().join(format!("covidvisor-{}", std::process::id()));
    fs::create_dir_all(&workdir)?;

    let result = {
        let translator = Translator::new(&store, date::today());
        let mut interpreters = Interpreters {
            extractor: &mut sessions.extractor,
            freeform: &mut sessions.freeform,
        };
        let mut voice = Voice {
            recorder: &mut recorder,
            transcriber: &mut transcriber,
            speaker: &mut speaker,
        };

        ListenLogic::run(
            &mut |line: &mut String| io::stdin().read_line(line),
            &store,
            &translator,
            &mut interpreters,
            &mut voice,
            &workdir,
        )
    };

    fs::remove_dir_all(&workdir).ok();
    for e in sessions.close() {
        warning(e);
    }

    let summary = result?;
    info(format!(
        "{} answered, {} failed, {} discarded",
        summary.answered, summary.failed, summary.cancelled
    ));
    Ok(())
}
