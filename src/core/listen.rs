use crate::core::bridge::Interpreter;
use crate::core::translator::Translator;
use crate::core::turn::{Answer, answer_text};
use crate::db::log::audit;
use crate::db::store::RecordStore;
use crate::errors::AppResult;
use crate::ui::messages::{error, info, success, warning};
use crate::voice::{Recorder, Recording, Speaker, Transcriber};
use std::fs;
use std::io;
use std::path::Path;

/// Voice collaborators, constructed by the caller and passed in explicitly.
pub struct Voice<'a> {
    pub recorder: &'a mut dyn Recorder,
    pub transcriber: &'a mut dyn Transcriber,
    pub speaker: &'a mut dyn Speaker,
}

/// Interpreters used by one loop.
pub struct Interpreters<'a> {
    pub extractor: &'a mut dyn Interpreter,
    pub freeform: &'a mut dyn Interpreter,
}

/// Counters reported when the loop ends.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LoopSummary {
    pub answered: usize,
    pub failed: usize,
    pub cancelled: usize,
}

pub struct ListenLogic;

impl ListenLogic {
    /// Run turns until `q` or end of input. Failed turns are reported and
    /// the loop continues; only fatal errors end it early.
    ///
    /// `read_line` is called per prompt, so the recorder may read the same
    /// terminal in between.
    pub fn run<F>(
        read_line: &mut F,
        store: &RecordStore,
        translator: &Translator,
        interpreters: &mut Interpreters,
        voice: &mut Voice,
        workdir: &Path,
    ) -> AppResult<LoopSummary>
    where
        F: FnMut(&mut String) -> io::Result<usize>,
    {
        let mut summary = LoopSummary::default();

        loop {
            println!("PRESS ENTER TO START RECORDING OR TYPE 'q' TO QUIT");

            let mut line = String::new();
            if read_line(&mut line)? == 0 || line.trim().eq_ignore_ascii_case("q") {
                break;
            }

            match Self::turn(translator, interpreters, voice, workdir) {
                Ok(Some(_)) => summary.answered += 1,
                Ok(None) => {
                    warning("Recording discarded.");
                    summary.cancelled += 1;
                }
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => {
                    error(&e);
                    audit(&store.conn, "turn_failed", "listen", &e.to_string());
                    summary.failed += 1;
                }
            }
        }

        Ok(summary)
    }

    fn turn(
        translator: &Translator,
        interpreters: &mut Interpreters,
        voice: &mut Voice,
        workdir: &Path,
    ) -> AppResult<Option<Answer>> {
        let clip = match voice.recorder.record(workdir)? {
            Recording::Cancelled => return Ok(None),
            Recording::Clip(path) => path,
        };

        let text = voice.transcriber.transcribe(&clip);
        fs::remove_file(&clip).ok();
        let text = text?;
        info(format!("You asked: {}", text));

        let answer = answer_text(
            &mut *interpreters.extractor,
            &mut *interpreters.freeform,
            translator,
            &text,
        )?;
        success(answer.text());

        voice.speaker.speak(answer.text())?;
        Ok(Some(answer))
    }
}
