use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database: String,
    #[serde(default = "default_dataset")]
    pub dataset: String,
    #[serde(default = "default_interpreter")]
    pub interpreter: String,
    #[serde(default = "default_env_dir")]
    pub env_dir: String,
    #[serde(default = "default_intent_script")]
    pub intent_script: String,
    #[serde(default = "default_custom_script")]
    pub custom_script: String,
    #[serde(default = "default_ask_timeout")]
    pub ask_timeout_secs: u64,
    #[serde(default = "default_max_response")]
    pub max_response_bytes: usize,
    /// 0: responses are `\n`-terminated lines. Otherwise a response ends once
    /// stdout stays quiet for this many milliseconds.
    #[serde(default)]
    pub response_idle_ms: u64,
    #[serde(default = "default_recorder")]
    pub recorder: String,
    #[serde(default = "default_transcriber")]
    pub transcriber: String,
    #[serde(default = "default_speaker")]
    pub speaker: String,
}

fn default_dataset() -> String {
    "datasets/covid.csv".to_string()
}
fn default_interpreter() -> String {
    "python".to_string()
}
fn default_env_dir() -> String {
    "venv".to_string()
}
fn default_intent_script() -> String {
    "scripts/process_intent_and_parameters.py".to_string()
}
fn default_custom_script() -> String {
    "scripts/process_custom_query.py".to_string()
}
fn default_ask_timeout() -> u64 {
    30
}
fn default_max_response() -> usize {
    64 * 1024
}
fn default_recorder() -> String {
    "arecord -f cd".to_string()
}
fn default_transcriber() -> String {
    "transcribe".to_string()
}
fn default_speaker() -> String {
    "espeak".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self::with_database(Self::database_file())
    }
}

impl Config {
    fn with_database(db_path: PathBuf) -> Self {
        Self {
            database: db_path.to_string_lossy().to_string(),
            dataset: default_dataset(),
            interpreter: default_interpreter(),
            env_dir: default_env_dir(),
            intent_script: default_intent_script(),
            custom_script: default_custom_script(),
            ask_timeout_secs: default_ask_timeout(),
            max_response_bytes: default_max_response(),
            response_idle_ms: 0,
            recorder: default_recorder(),
            transcriber: default_transcriber(),
            speaker: default_speaker(),
        }
    }

    /// Return the standard configuration directory depending on the platform
    pub fn config_dir() -> PathBuf {
        if cfg!(target_os = "windows") {
            let appdata = env::var("APPDATA").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(appdata).join("covidvisor")
        } else {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".covidvisor")
        }
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("covidvisor.conf")
    }

    /// Return the full path of the SQLite database
    pub fn database_file() -> PathBuf {
        Self::config_dir().join("covidvisor.sqlite")
    }

    /// Load configuration from file, or return defaults if not found
    pub fn load() -> AppResult<Self> {
        let path = Self::config_file();
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path).map_err(|_| AppError::ConfigLoad)?;
        let mut cfg: Self = serde_yaml::from_str(&content).map_err(|_| AppError::ConfigLoad)?;
        cfg.database = expand_tilde(&cfg.database).to_string_lossy().to_string();
        cfg.dataset = expand_tilde(&cfg.dataset).to_string_lossy().to_string();
        Ok(cfg)
    }

    /// Write the default configuration; the database path may be overridden.
    /// In test mode the config file is left untouched.
    pub fn init_all(custom_db: Option<String>, is_test: bool) -> AppResult<Self> {
        let dir = Self::config_dir();

        let db_path = match custom_db {
            Some(name) => {
                let p = Path::new(&name);
                if p.is_absolute() {
                    p.to_path_buf()
                } else {
                    dir.join(p)
                }
            }
            None => dir.join("covidvisor.sqlite"),
        };

        let config = Self::with_database(db_path);

        if !is_test {
            fs::create_dir_all(&dir)?;
            let yaml = serde_yaml::to_string(&config).map_err(|_| AppError::ConfigSave)?;
            let mut file = fs::File::create(Self::config_file())?;
            file.write_all(yaml.as_bytes())?;
        }

        Ok(config)
    }

    pub fn ask_timeout(&self) -> Duration {
        Duration::from_secs(self.ask_timeout_secs)
    }

    pub fn response_idle(&self) -> Option<Duration> {
        (self.response_idle_ms > 0).then(|| Duration::from_millis(self.response_idle_ms))
    }

    /// Resolve the dependency environment directory against the working directory.
    pub fn env_dir_path(&self) -> AppResult<PathBuf> {
        let p = expand_tilde(&self.env_dir);
        if p.is_absolute() {
            return Ok(p);
        }
        Ok(env::current_dir()?.join(p))
    }
}

/// Expand a leading `~/` to the user's home directory.
pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(rest);
    }
    PathBuf::from(path)
}
