//! Collaborators backed by external commands (`arecord`, `espeak`, ...).

use super::{Recorder, Recording, Speaker, Transcriber};
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use chrono::Local;
use std::fs;
use std::io::{self, BufRead};
use std::path::Path;
use std::process::{Command, Stdio};

/// Split a configured command line into program and arguments.
pub fn split_command(line: &str) -> AppResult<(String, Vec<String>)> {
    let mut parts = line.split_whitespace().map(str::to_string);
    let program = parts
        .next()
        .ok_or_else(|| AppError::Config(format!("empty command '{}'", line)))?;
    Ok((program, parts.collect()))
}

/// Records with a command that writes until killed; stopped by ENTER on stdin.
pub struct CommandRecorder {
    program: String,
    args: Vec<String>,
}

impl CommandRecorder {
    pub fn from_config(cfg: &Config) -> AppResult<Self> {
        let (program, args) = split_command(&cfg.recorder)?;
        Ok(Self { program, args })
    }
}

impl Recorder for CommandRecorder {
    fn record(&mut self, dir: &Path) -> AppResult<Recording> {
        let clip = dir.join(format!("clip-{}.wav", Local::now().format("%Y%m%d%H%M%S%3f")));

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .arg(&clip)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .spawn()
            .map_err(|e| AppError::Audio(format!("unable to initiate recording, {}", e)))?;

        println!("🎙️  Recording… press ENTER to stop (type 'c' then ENTER to discard)");
        let mut line = String::new();
        let read = io::stdin().lock().read_line(&mut line);

        // a recorder that already failed must not be mistaken for a stopped one
        if let Some(status) = child.try_wait()?
            && !status.success()
        {
            fs::remove_file(&clip).ok();
            return Err(AppError::Audio(format!("recorder exited with {}", status)));
        }

        let _ = child.kill();
        let _ = child.wait();
        read?;

        if line.trim().eq_ignore_ascii_case("c") {
            fs::remove_file(&clip).ok();
            return Ok(Recording::Cancelled);
        }
        if !clip.exists() {
            return Err(AppError::Audio("no audio was captured".to_string()));
        }
        Ok(Recording::Clip(clip))
    }
}

/// Runs `<command> <clip>` and reads the transcript from its stdout.
pub struct CommandTranscriber {
    program: String,
    args: Vec<String>,
}

impl CommandTranscriber {
    pub fn from_config(cfg: &Config) -> AppResult<Self> {
        let (program, args) = split_command(&cfg.transcriber)?;
        Ok(Self { program, args })
    }
}

impl Transcriber for CommandTranscriber {
    fn transcribe(&mut self, clip: &Path) -> AppResult<String> {
        let output = Command::new(&self.program)
            .args(&self.args)
            .arg(clip)
            .output()
            .map_err(|e| {
                AppError::Transcription(format!("unable to transcribe audio file, {}", e))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(AppError::Transcription(format!(
                "transcriber exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        let text = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if text.is_empty() {
            return Err(AppError::Transcription("empty transcript".to_string()));
        }
        Ok(text)
    }
}

/// Speaks by passing the text as the last argument of a TTS command.
pub struct CommandSpeaker {
    program: String,
    args: Vec<String>,
}

impl CommandSpeaker {
    pub fn from_config(cfg: &Config) -> AppResult<Self> {
        let (program, args) = split_command(&cfg.speaker)?;
        Ok(Self { program, args })
    }
}

impl Speaker for CommandSpeaker {
    fn speak(&mut self, text: &str) -> AppResult<()> {
        let status = Command::new(&self.program)
            .args(&self.args)
            .arg(text)
            .status()
            .map_err(|e| AppError::Speech(format!("unable to play text, {}", e)))?;

        if !status.success() {
            return Err(AppError::Speech(format!("speaker exited with {}", status)));
        }
        Ok(())
    }
}
