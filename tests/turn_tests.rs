use covidvisor::core::bridge::Interpreter;
use covidvisor::core::listen::{Interpreters, ListenLogic, LoopSummary, Voice};
use covidvisor::core::translator::Translator;
use covidvisor::core::turn::{Answer, answer_text};
use covidvisor::db::log::load_log;
use covidvisor::errors::{AppError, AppResult};
use covidvisor::voice::{Recorder, Recording, Speaker, Transcriber};
use std::collections::VecDeque;
use std::fs;
use std::io::BufRead;
use std::path::{Path, PathBuf};

mod common;
use common::{fixture_records, fixture_today, store_with};

/// Interpreter that replays canned answers and remembers what it was asked.
#[derive(Default)]
struct Scripted {
    answers: VecDeque<AppResult<String>>,
    asked: Vec<String>,
}

impl Scripted {
    fn with(answers: Vec<AppResult<String>>) -> Self {
        Self {
            answers: answers.into(),
            asked: Vec::new(),
        }
    }
}

impl Interpreter for Scripted {
    fn ask(&mut self, text: &str) -> AppResult<String> {
        self.asked.push(text.to_string());
        self.answers
            .pop_front()
            .unwrap_or_else(|| Err(AppError::InterpreterIo("no scripted answer".into())))
    }
}

#[test]
fn template_answer_does_not_touch_freeform() {
    let store = store_with("turn_template", &fixture_records());
    let translator = Translator::new(&store, fixture_today());

    let mut extractor = Scripted::with(vec![Ok(
        r#"{"intent":"sum_cases_duration","entities":{"location":"Kerala","duration":"all_time"}}"#.into(),
    )]);
    let mut freeform = Scripted::default();

    let answer = answer_text(
        &mut extractor,
        &mut freeform,
        &translator,
        "how many cases in kerala",
    )
    .expect("turn");

    assert_eq!(answer, Answer::Template("41".into()));
    assert_eq!(extractor.asked, ["how many cases in kerala"]);
    assert!(freeform.asked.is_empty());
}

#[test]
fn unknown_intent_falls_back_to_freeform_with_original_text() {
    let store = store_with("turn_fallback", &fixture_records());
    let translator = Translator::new(&store, fixture_today());

    let mut extractor = Scripted::with(vec![Ok(r#"{"intent":"symptoms","entities":{}}"#.into())]);
    let mut freeform = Scripted::with(vec![Ok("Fever and cough.".into())]);

    let answer = answer_text(
        &mut extractor,
        &mut freeform,
        &translator,
        "what are the symptoms",
    )
    .expect("turn");

    assert_eq!(answer, Answer::FreeForm("Fever and cough.".into()));
    assert_eq!(freeform.asked, ["what are the symptoms"]);
}

#[test]
fn decode_error_fails_the_turn() {
    let store = store_with("turn_decode", &fixture_records());
    let translator = Translator::new(&store, fixture_today());

    let mut extractor = Scripted::with(vec![Ok("Traceback (most recent call last)".into())]);
    let mut freeform = Scripted::default();

    let err = answer_text(&mut extractor, &mut freeform, &translator, "hi").expect_err("decode");
    assert!(matches!(err, AppError::Decode(_)));
    assert!(freeform.asked.is_empty());
}

struct FakeRecorder {
    clips: VecDeque<Recording>,
}

impl Recorder for FakeRecorder {
    fn record(&mut self, dir: &Path) -> AppResult<Recording> {
        let next = self.clips.pop_front().unwrap_or(Recording::Cancelled);
        if let Recording::Clip(name) = next {
            let path: PathBuf = dir.join(name);
            fs::write(&path, b"RIFF")?;
            return Ok(Recording::Clip(path));
        }
        Ok(Recording::Cancelled)
    }
}

struct FakeTranscriber {
    texts: VecDeque<AppResult<String>>,
}

impl Transcriber for FakeTranscriber {
    fn transcribe(&mut self, clip: &Path) -> AppResult<String> {
        assert!(clip.exists());
        self.texts
            .pop_front()
            .unwrap_or_else(|| Err(AppError::Transcription("nothing".into())))
    }
}

#[derive(Default)]
struct FakeSpeaker {
    spoken: Vec<String>,
}

impl Speaker for FakeSpeaker {
    fn speak(&mut self, text: &str) -> AppResult<()> {
        self.spoken.push(text.to_string());
        Ok(())
    }
}

#[test]
fn loop_reports_failed_turns_and_continues() {
    let store = store_with("turn_loop", &fixture_records());
    let translator = Translator::new(&store, fixture_today());

    let workdir = std::env::temp_dir().join("covidvisor_turn_loop");
    fs::create_dir_all(&workdir).expect("workdir");

    let mut extractor = Scripted::with(vec![
        Ok(r#"{"intent":"location_based","entities":{"case_type":"recovery_cases"}}"#.into()),
        Ok(r#"{"intent":"greeting","entities":{}}"#.into()),
    ]);
    let mut freeform = Scripted::with(vec![Ok("Hello there.".into())]);

    let mut recorder = FakeRecorder {
        clips: VecDeque::from([
            Recording::Clip("a.wav".into()),
            Recording::Clip("b.wav".into()),
            Recording::Cancelled,
            Recording::Clip("c.wav".into()),
        ]),
    };
    let mut transcriber = FakeTranscriber {
        texts: VecDeque::from([
            Ok("which state recovered most".to_string()),
            Err(AppError::Transcription("API unavailable".into())),
            Ok("hello".to_string()),
        ]),
    };
    let mut speaker = FakeSpeaker::default();

    // four turns, then quit
    let mut input = "\n\n\n\nq\n\n".as_bytes();
    let summary = {
        let mut interpreters = Interpreters {
            extractor: &mut extractor,
            freeform: &mut freeform,
        };
        let mut voice = Voice {
            recorder: &mut recorder,
            transcriber: &mut transcriber,
            speaker: &mut speaker,
        };
        ListenLogic::run(
            &mut |line: &mut String| input.read_line(line),
            &store,
            &translator,
            &mut interpreters,
            &mut voice,
            &workdir,
        )
        .expect("loop")
    };

    assert_eq!(
        summary,
        LoopSummary {
            answered: 2,
            failed: 1,
            cancelled: 1
        }
    );
    assert_eq!(speaker.spoken, ["Kerala", "Hello there."]);

    // clips are removed after transcription
    assert!(!workdir.join("a.wav").exists());
    assert!(!workdir.join("b.wav").exists());

    let failed: Vec<String> = load_log(&store.conn)
        .expect("log")
        .into_iter()
        .filter(|e| e.operation == "turn_failed")
        .map(|e| e.message)
        .collect();
    assert_eq!(failed.len(), 1);
    assert!(failed[0].contains("API unavailable"));
}

#[test]
fn loop_stops_at_end_of_input() {
    let store = store_with("turn_loop_eof", &fixture_records());
    let translator = Translator::new(&store, fixture_today());

    let mut extractor = Scripted::default();
    let mut freeform = Scripted::default();
    let mut recorder = FakeRecorder {
        clips: VecDeque::new(),
    };
    let mut transcriber = FakeTranscriber {
        texts: VecDeque::new(),
    };
    let mut speaker = FakeSpeaker::default();

    let mut input = "".as_bytes();
    let mut interpreters = Interpreters {
        extractor: &mut extractor,
        freeform: &mut freeform,
    };
    let mut voice = Voice {
        recorder: &mut recorder,
        transcriber: &mut transcriber,
        speaker: &mut speaker,
    };

    let summary = ListenLogic::run(
        &mut |line: &mut String| input.read_line(line),
        &store,
        &translator,
        &mut interpreters,
        &mut voice,
        &std::env::temp_dir(),
    )
    .expect("loop");

    assert_eq!(summary, LoopSummary::default());
}
