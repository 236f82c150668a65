//! Run configuration.
//!
//! Loaded once from a TOML or JSON file, then adjusted by command-line flags.
//! Legacy camelCase keys (`apiKey`, `dirPath`, ...) are accepted alongside
//! snake_case ones.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::cli::ConfigArgs;
use crate::fetch::{youtube, RetryPolicy};
use crate::store::history::FileNames;
use crate::store::JsonStore;

/// Environment variable that overrides `api_key` from the file.
pub const API_KEY_ENV: &str = "YOUTUBE_API_KEY";

const DEFAULT_PLAYLIST_FILE: &str = "playlist.json";
const DEFAULT_DIFF_FILE: &str = "diff.json";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_MAX_RETRIES: u32 = 3;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {message}", .path.display())]
    Parse { path: PathBuf, message: String },

    #[error("missing required setting `{0}`")]
    Missing(&'static str),

    #[error("invalid duration {value:?}: {source}")]
    InvalidDuration {
        value: String,
        #[source]
        source: humantime::DurationError,
    },
}

/// Raw file contents, every field optional.
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(alias = "apiKey")]
    api_key: Option<String>,
    #[serde(alias = "playlistId")]
    playlist_id: Option<String>,
    #[serde(alias = "dirPath")]
    dir_path: Option<PathBuf>,
    #[serde(alias = "playlistFileName")]
    playlist_file_name: Option<String>,
    #[serde(alias = "diffFileName")]
    diff_file_name: Option<String>,
    #[serde(alias = "keepHistory")]
    keep_history: Option<bool>,
    #[serde(alias = "requestTimeout")]
    request_timeout: Option<String>,
    #[serde(alias = "maxRetries")]
    max_retries: Option<u32>,
    #[serde(alias = "apiUrl")]
    api_url: Option<String>,
}

#[derive(Clone)]
pub struct Config {
    pub api_key: Option<String>,
    pub playlist_id: Option<String>,
    pub dir_path: PathBuf,
    pub playlist_file_name: String,
    pub diff_file_name: String,
    pub keep_history: bool,
    pub request_timeout: Duration,
    pub max_retries: u32,
    /// playlistItems endpoint, for proxies and mirrors
    pub api_url: String,
}

// keeps the api key out of logs
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("playlist_id", &self.playlist_id)
            .field("dir_path", &self.dir_path)
            .field("playlist_file_name", &self.playlist_file_name)
            .field("diff_file_name", &self.diff_file_name)
            .field("keep_history", &self.keep_history)
            .field("request_timeout", &self.request_timeout)
            .field("max_retries", &self.max_retries)
            .field("api_url", &self.api_url)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_key: None,
            playlist_id: None,
            dir_path: current_dir(),
            playlist_file_name: DEFAULT_PLAYLIST_FILE.to_string(),
            diff_file_name: DEFAULT_DIFF_FILE.to_string(),
            keep_history: false,
            request_timeout: DEFAULT_TIMEOUT,
            max_retries: DEFAULT_MAX_RETRIES,
            api_url: youtube::DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl Config {
    /// Build the config for a command: file, then environment, then `--dir`.
    pub fn from_args(args: &ConfigArgs) -> Result<Self, ConfigError> {
        let mut config = Self::load(args.config.as_deref())?;

        if let Ok(key) = std::env::var(API_KEY_ENV) {
            if !key.is_empty() {
                config.api_key = Some(key);
            }
        }
        if let Some(dir) = &args.dir {
            config.dir_path = dir.clone();
        }

        debug!(?config, "effective config");
        Ok(config)
    }

    /// Load from `path`, or from the first default location that exists.
    /// With no path and no file found, all defaults apply.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigError::NotFound(path.to_path_buf()));
                }
                Self::from_file(path)
            }
            None => match default_locations().into_iter().find(|p| p.exists()) {
                Some(path) => Self::from_file(&path),
                None => {
                    debug!("no config file found, using defaults");
                    Ok(Config::default())
                }
            },
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "loading config");

        let parse_error = |message: String| ConfigError::Parse {
            path: path.to_path_buf(),
            message,
        };

        let file: ConfigFile = if path.extension().is_some_and(|ext| ext == "json") {
            serde_json::from_str(&content).map_err(|e| parse_error(e.to_string()))?
        } else {
            toml::from_str(&content).map_err(|e| parse_error(e.to_string()))?
        };

        Self::from_parts(file)
    }

    fn from_parts(file: ConfigFile) -> Result<Self, ConfigError> {
        let defaults = Config::default();

        let request_timeout = match file.request_timeout {
            Some(value) => humantime::parse_duration(&value)
                .map_err(|source| ConfigError::InvalidDuration { value, source })?,
            None => defaults.request_timeout,
        };

        Ok(Config {
            api_key: file.api_key.filter(|k| !k.is_empty()),
            playlist_id: file.playlist_id.filter(|p| !p.is_empty()),
            dir_path: file
                .dir_path
                .filter(|d| !d.as_os_str().is_empty())
                .unwrap_or(defaults.dir_path),
            playlist_file_name: non_empty_or(file.playlist_file_name, defaults.playlist_file_name),
            diff_file_name: non_empty_or(file.diff_file_name, defaults.diff_file_name),
            keep_history: file.keep_history.unwrap_or(defaults.keep_history),
            request_timeout,
            max_retries: file.max_retries.unwrap_or(defaults.max_retries),
            api_url: non_empty_or(file.api_url, defaults.api_url),
        })
    }

    /// API key and playlist id, both required to fetch.
    pub fn credentials(&self) -> Result<(&str, &str), ConfigError> {
        let api_key = self.api_key.as_deref().ok_or(ConfigError::Missing("api_key"))?;
        let playlist_id = self
            .playlist_id
            .as_deref()
            .ok_or(ConfigError::Missing("playlist_id"))?;
        Ok((api_key, playlist_id))
    }

    pub fn file_names(&self) -> FileNames {
        FileNames::new(&self.playlist_file_name, &self.diff_file_name)
    }

    pub fn store(&self) -> JsonStore {
        JsonStore::new(&self.dir_path)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_retries: self.max_retries,
            ..RetryPolicy::default()
        }
    }
}

fn non_empty_or(value: Option<String>, default: String) -> String {
    value.filter(|v| !v.is_empty()).unwrap_or(default)
}

fn current_dir() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

/// `./config.toml`, `./config.json`, then the platform config directory.
fn default_locations() -> Vec<PathBuf> {
    let mut locations = vec![PathBuf::from("config.toml"), PathBuf::from("config.json")];
    if let Some(dirs) = directories::ProjectDirs::from("", "", "playlist-diff") {
        locations.push(dirs.config_dir().join("config.toml"));
    }
    locations
}
