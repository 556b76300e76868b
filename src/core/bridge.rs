//! Long-lived interpreter subprocesses driven over stdin/stdout.
//!
//! Protocol: one request line in, one response out. `q\n` asks the
//! interpreter to exit. A background thread turns stdout into frames so every
//! `ask` can be bounded by a timeout.
//!
//! Responses are `\n`-terminated lines by default. Interpreters that never
//! terminate their answers are served with [`Framing::Quiet`].

use crate::config::Config;
use crate::errors::{AppError, AppResult};
use std::env;
use std::io::{self, BufRead, BufReader, Read, Write};
use std::path::PathBuf;
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::{Duration, Instant};

/// Sentinel line that asks the interpreter to exit.
pub const SHUTDOWN_SENTINEL: &[u8] = b"q\n";

/// Synchronous question → answer seam used by the turn logic.
pub trait Interpreter {
    fn ask(&mut self, text: &str) -> AppResult<String>;
}

/// How the end of a response is detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Framing {
    /// One `\n`-terminated line per response.
    Line,
    /// Everything written until stdout stays silent for the given window.
    Quiet(Duration),
}

/// How to launch one interpreter task.
#[derive(Debug, Clone)]
pub struct TaskDescriptor {
    pub name: String,
    pub program: String,
    pub args: Vec<String>,
    /// Isolated dependency environment (a virtualenv-style directory).
    pub env_dir: Option<PathBuf>,
    pub timeout: Duration,
    pub max_response_bytes: usize,
    pub framing: Framing,
}

impl TaskDescriptor {
    pub fn new(name: &str, program: &str, args: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            program: program.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
            env_dir: None,
            timeout: Duration::from_secs(30),
            max_response_bytes: 64 * 1024,
            framing: Framing::Line,
        }
    }

    /// Run `script` with the configured interpreter inside the configured environment.
    pub fn for_script(name: &str, script: &str, cfg: &Config) -> AppResult<Self> {
        let mut task = Self::new(name, &cfg.interpreter, &[script]);
        task.env_dir = Some(cfg.env_dir_path()?);
        task.timeout = cfg.ask_timeout();
        task.max_response_bytes = cfg.max_response_bytes;
        if let Some(idle) = cfg.response_idle() {
            task.framing = Framing::Quiet(idle);
        }
        Ok(task)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_response_bytes(mut self, limit: usize) -> Self {
        self.max_response_bytes = limit;
        self
    }

    pub fn with_framing(mut self, framing: Framing) -> Self {
        self.framing = framing;
        self
    }

    fn command(&self) -> AppResult<Command> {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit());

        if let Some(dir) = &self.env_dir {
            let bin = if cfg!(target_os = "windows") {
                dir.join("Scripts")
            } else {
                dir.join("bin")
            };
            let mut paths = vec![bin];
            if let Some(current) = env::var_os("PATH") {
                paths.extend(env::split_paths(&current));
            }
            let path = env::join_paths(paths).map_err(|e| {
                AppError::Startup(format!("invalid PATH for '{}': {}", self.name, e))
            })?;

            let prompt = dir
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| "venv".to_string());

            cmd.env("VIRTUAL_ENV", dir)
                .env("VIRTUAL_ENV_PROMPT", prompt)
                .env("PATH", path)
                .env_remove("PYTHONHOME");
        }

        Ok(cmd)
    }
}

enum Frame {
    Line(String),
    /// Raw stdout bytes, only produced under quiet framing.
    Chunk(Vec<u8>),
    TooLong(usize),
    Eof,
    Failed(io::Error),
}

/// One running interpreter. `ask` needs `&mut self`, so requests never overlap.
pub struct InterpreterSession {
    name: String,
    child: Child,
    stdin: Option<ChildStdin>,
    frames: Receiver<Frame>,
    timeout: Duration,
    framing: Framing,
    max_response_bytes: usize,
    /// Responses still owed to requests that timed out.
    stale: usize,
    closed: bool,
}

impl InterpreterSession {
    pub fn start(task: &TaskDescriptor) -> AppResult<Self> {
        let mut child = task.command()?.spawn().map_err(|e| {
            AppError::Startup(format!(
                "unable to start '{}' ({}): {}",
                task.name, task.program, e
            ))
        })?;

        let channels = child.stdin.take().zip(child.stdout.take());
        let Some((stdin, stdout)) = channels else {
            let _ = child.kill();
            let _ = child.wait();
            return Err(AppError::Startup(format!(
                "unable to attach stdin/stdout of '{}'",
                task.name
            )));
        };

        let (tx, rx) = mpsc::channel();
        let limit = task.max_response_bytes;
        let framing = task.framing;
        let spawned = thread::Builder::new()
            .name(format!("{}-stdout", task.name))
            .spawn(move || match framing {
                Framing::Line => read_lines(stdout, limit, tx),
                Framing::Quiet(_) => read_chunks(stdout, tx),
            });

        if let Err(e) = spawned {
            let _ = child.kill();
            let _ = child.wait();
            return Err(AppError::Startup(format!(
                "unable to read from '{}': {}",
                task.name, e
            )));
        }

        Ok(Self {
            name: task.name.clone(),
            child,
            stdin: Some(stdin),
            frames: rx,
            timeout: task.timeout,
            framing: task.framing,
            max_response_bytes: task.max_response_bytes,
            stale: 0,
            closed: false,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Send one request and wait at most `timeout` for its response.
    ///
    /// On timeout the session stays usable: the late response is dropped when
    /// it arrives. A closed stdout yields an empty answer.
    pub fn ask_within(&mut self, text: &str, timeout: Duration) -> AppResult<String> {
        let stdin = self.stdin.as_mut().ok_or_else(|| {
            AppError::InterpreterIo(format!("request channel of '{}' is closed", self.name))
        })?;

        let mut request = text.replace(['\r', '\n'], " ");
        request.push('\n');
        stdin
            .write_all(request.as_bytes())
            .and_then(|_| stdin.flush())
            .map_err(|e| {
                AppError::InterpreterIo(format!("unable to write to '{}': {}", self.name, e))
            })?;

        // no representable deadline means wait as long as it takes
        let deadline = Instant::now().checked_add(timeout);
        loop {
            let received = match deadline {
                Some(deadline) => {
                    let remaining = deadline.saturating_duration_since(Instant::now());
                    self.frames.recv_timeout(remaining)
                }
                None => self
                    .frames
                    .recv()
                    .map_err(|_| RecvTimeoutError::Disconnected),
            };
            let frame = match received {
                Ok(Frame::Chunk(first)) => self.gather(first),
                Ok(frame) => frame,
                Err(RecvTimeoutError::Timeout) => {
                    self.stale += 1;
                    return Err(AppError::Timeout(timeout));
                }
                Err(RecvTimeoutError::Disconnected) => return Ok(String::new()),
            };

            match frame {
                Frame::Line(_) | Frame::TooLong(_) if self.stale > 0 => {
                    self.stale -= 1;
                }
                Frame::Line(answer) => return Ok(answer),
                Frame::TooLong(limit) => {
                    return Err(AppError::InterpreterIo(format!(
                        "response from '{}' exceeds {} bytes",
                        self.name, limit
                    )));
                }
                // chunks are always gathered into a line above
                Frame::Chunk(_) | Frame::Eof => return Ok(String::new()),
                Frame::Failed(e) => {
                    return Err(AppError::InterpreterIo(format!(
                        "unable to read from '{}': {}",
                        self.name, e
                    )));
                }
            }
        }
    }

    /// Collect chunks following `first` until stdout is quiet for the idle window.
    fn gather(&self, first: Vec<u8>) -> Frame {
        let idle = match self.framing {
            Framing::Quiet(idle) => idle,
            Framing::Line => Duration::ZERO,
        };
        let mut buf = first;
        let mut overflow = false;

        loop {
            if buf.len() > self.max_response_bytes {
                overflow = true;
                buf.clear();
            }
            match self.frames.recv_timeout(idle) {
                Ok(Frame::Chunk(more)) => {
                    if !overflow {
                        buf.extend_from_slice(&more);
                    }
                }
                Ok(Frame::Failed(e)) => return Frame::Failed(e),
                // quiet, end of stream or reader gone: the response is complete
                Ok(_) | Err(_) => break,
            }
        }

        if overflow {
            return Frame::TooLong(self.max_response_bytes);
        }
        let text = String::from_utf8_lossy(&buf);
        Frame::Line(text.trim_end_matches(['\r', '\n']).to_string())
    }

    /// Send the shutdown sentinel, close stdin and wait for the process to exit.
    pub fn close(mut self) -> AppResult<()> {
        let mut stdin = self.stdin.take().ok_or_else(|| {
            AppError::Shutdown(format!("request channel of '{}' is already closed", self.name))
        })?;

        stdin
            .write_all(SHUTDOWN_SENTINEL)
            .and_then(|_| stdin.flush())
            .map_err(|e| {
                AppError::Shutdown(format!(
                    "unable to send close signal to '{}': {}",
                    self.name, e
                ))
            })?;
        drop(stdin);

        let status = self.child.wait().map_err(|e| {
            AppError::Shutdown(format!("unable to wait for '{}' to exit: {}", self.name, e))
        })?;
        self.closed = true;

        if !status.success() {
            return Err(AppError::Shutdown(format!(
                "'{}' exited with {}",
                self.name, status
            )));
        }
        Ok(())
    }
}

impl Interpreter for InterpreterSession {
    fn ask(&mut self, text: &str) -> AppResult<String> {
        let timeout = self.timeout;
        self.ask_within(text, timeout)
    }
}

impl Drop for InterpreterSession {
    fn drop(&mut self) {
        if !self.closed {
            let _ = self.child.kill();
            let _ = self.child.wait();
        }
    }
}

/// Split stdout into newline-terminated frames of at most `limit` bytes.
fn read_lines(stdout: ChildStdout, limit: usize, tx: Sender<Frame>) {
    let mut reader = BufReader::new(stdout);

    loop {
        let mut buf = Vec::new();
        let read = reader
            .by_ref()
            .take((limit as u64).saturating_add(1))
            .read_until(b'\n', &mut buf);

        let frame = match read {
            Ok(0) => {
                let _ = tx.send(Frame::Eof);
                return;
            }
            Ok(_) if buf.last() == Some(&b'\n') => {
                buf.pop();
                if buf.last() == Some(&b'\r') {
                    buf.pop();
                }
                Frame::Line(String::from_utf8_lossy(&buf).into_owned())
            }
            Ok(_) if buf.len() > limit => {
                // drop the rest of the oversized line
                if let Err(e) = reader.read_until(b'\n', &mut Vec::new()) {
                    let _ = tx.send(Frame::Failed(e));
                    return;
                }
                Frame::TooLong(limit)
            }
            // last line without a terminator
            Ok(_) => Frame::Line(String::from_utf8_lossy(&buf).into_owned()),
            Err(e) => {
                let _ = tx.send(Frame::Failed(e));
                return;
            }
        };

        if tx.send(frame).is_err() {
            return;
        }
    }
}

/// Forward stdout as raw chunks; the session decides where a response ends.
fn read_chunks(mut stdout: ChildStdout, tx: Sender<Frame>) {
    let mut buf = [0u8; 8192];

    loop {
        let frame = match stdout.read(&mut buf) {
            Ok(0) => {
                let _ = tx.send(Frame::Eof);
                return;
            }
            Ok(n) => Frame::Chunk(buf[..n].to_vec()),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => {
                let _ = tx.send(Frame::Failed(e));
                return;
            }
        };

        if tx.send(frame).is_err() {
            return;
        }
    }
}
