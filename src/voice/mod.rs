//! Process-boundary collaborators of the interactive loop: audio capture,
//! speech-to-text and text-to-speech.

pub mod command;

use crate::errors::AppResult;
use std::path::{Path, PathBuf};

/// Result of one capture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recording {
    Clip(PathBuf),
    Cancelled,
}

pub trait Recorder {
    /// Record into a new file under `dir` until the user stops.
    fn record(&mut self, dir: &Path) -> AppResult<Recording>;
}

pub trait Transcriber {
    fn transcribe(&mut self, clip: &Path) -> AppResult<String>;
}

pub trait Speaker {
    fn speak(&mut self, text: &str) -> AppResult<()>;
}
