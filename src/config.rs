//! Application configuration: the curated answer pool from disk and the
//! runtime settings read from the environment.

use std::{
    env, fs,
    io::{ErrorKind, Write},
    path::{Path, PathBuf},
    time::Duration,
};

use rand::seq::IndexedRandom;
use serde::Deserialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::services::metadata::spotify::SpotifyCredentials;

/// Default location on disk where the server looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/app.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "ARTIST_GUESSER_CONFIG_PATH";
/// Games expire after a day of inactivity unless configured otherwise.
const DEFAULT_GAME_TTL_SECS: u64 = 24 * 60 * 60;
const DEFAULT_PORT: u16 = 8080;

/// Startup configuration failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing environment variable `{0}`")]
    MissingEnvVar(&'static str),
    #[error("unknown storage backend `{0}` (expected redis or memory)")]
    UnknownBackend(String),
    #[error("failed to persist generated secret key to {path}")]
    PersistSecret {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone)]
/// Immutable game configuration shared across the application.
pub struct AppConfig {
    answers: Vec<String>,
    game_ttl: Option<Duration>,
}

impl AppConfig {
    /// Load the configuration from disk, falling back to the built-in answer pool.
    pub fn load() -> Self {
        Self::load_from(&resolve_config_path())
    }

    pub fn load_from(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str::<RawConfig>(&contents) {
                Ok(raw) => {
                    let app_config: Self = raw.into();
                    info!(
                        path = %path.display(),
                        answers = app_config.answers.len(),
                        "loaded answer pool from config"
                    );
                    app_config
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse config; falling back to defaults"
                    );
                    Self::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in defaults"
                );
                Self::default()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to defaults"
                );
                Self::default()
            }
        }
    }

    /// Build a configuration from an explicit answer pool.
    pub fn with_answers(answers: Vec<String>, game_ttl: Option<Duration>) -> Self {
        let answers = clean_answers(answers);
        if answers.is_empty() {
            return Self {
                game_ttl,
                ..Self::default()
            };
        }
        Self { answers, game_ttl }
    }

    pub fn answers(&self) -> &[String] {
        &self.answers
    }

    /// Expiry applied to stored games, `None` when games never expire.
    pub fn game_ttl(&self) -> Option<Duration> {
        self.game_ttl
    }

    /// Uniformly pick an artist name from the answer pool.
    pub fn random_answer(&self) -> Option<&str> {
        self.answers.choose(&mut rand::rng()).map(String::as_str)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            answers: default_answers(),
            game_ttl: Some(Duration::from_secs(DEFAULT_GAME_TTL_SECS)),
        }
    }
}

#[derive(Debug, Deserialize)]
/// JSON representation of the configuration file located at [`DEFAULT_CONFIG_PATH`].
struct RawConfig {
    #[serde(default)]
    answers: Vec<String>,
    #[serde(default = "default_ttl_secs")]
    game_ttl_secs: u64,
}

fn default_ttl_secs() -> u64 {
    DEFAULT_GAME_TTL_SECS
}

impl From<RawConfig> for AppConfig {
    fn from(value: RawConfig) -> Self {
        let ttl = (value.game_ttl_secs > 0).then(|| Duration::from_secs(value.game_ttl_secs));
        Self::with_answers(value.answers, ttl)
    }
}

fn clean_answers(answers: Vec<String>) -> Vec<String> {
    answers
        .into_iter()
        .map(|answer| answer.trim().to_owned())
        .filter(|answer| !answer.is_empty())
        .collect()
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

/// Built-in answer pool shipped with the binary.
fn default_answers() -> Vec<String> {
    [
        "Pitbull",
        "Taylor Swift",
        "Drake",
        "Adele",
        "Beyoncé",
        "Ed Sheeran",
        "Rihanna",
        "Kendrick Lamar",
        "Billie Eilish",
        "Bad Bunny",
        "The Weeknd",
        "Dua Lipa",
        "Coldplay",
        "Eminem",
        "Shakira",
    ]
    .into_iter()
    .map(str::to_owned)
    .collect()
}

/// Which [`GameStore`](crate::dao::game_store::GameStore) implementation to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Redis,
    Memory,
}

impl StorageBackend {
    fn parse(value: &str) -> Result<Self, ConfigError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "redis" => Ok(Self::Redis),
            "memory" => Ok(Self::Memory),
            other => Err(ConfigError::UnknownBackend(other.to_owned())),
        }
    }
}

/// Process settings read from the environment at startup.
#[derive(Debug, Clone)]
pub struct Settings {
    pub backend: StorageBackend,
    pub secret_key: Option<String>,
    pub spotify: SpotifyCredentials,
    pub user_email: Option<String>,
    pub port: u16,
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Read settings through `lookup`; blank values count as missing.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        let require = |name: &'static str| get(name).ok_or(ConfigError::MissingEnvVar(name));

        let backend = match get("STORAGE_BACKEND") {
            Some(value) => StorageBackend::parse(&value)?,
            None => StorageBackend::Redis,
        };

        Ok(Self {
            backend,
            secret_key: get("SECRET_KEY"),
            spotify: SpotifyCredentials {
                client_id: require("SPOTIFY_CLIENT_ID")?,
                client_secret: require("SPOTIFY_CLIENT_SECRET")?,
            },
            user_email: get("USER_EMAIL"),
            port: get("PORT")
                .and_then(|value| value.parse::<u16>().ok())
                .unwrap_or(DEFAULT_PORT),
        })
    }
}

/// Return the configured secret key, or generate one and append it to `env_path`.
pub fn ensure_secret_key(existing: Option<String>, env_path: &Path) -> Result<String, ConfigError> {
    if let Some(secret) = existing.filter(|secret| !secret.trim().is_empty()) {
        return Ok(secret);
    }

    let secret = hex::encode(rand::random::<[u8; 32]>());
    let persist = |source| ConfigError::PersistSecret {
        path: env_path.display().to_string(),
        source,
    };

    let needs_newline = match fs::read(env_path) {
        Ok(contents) => contents.last().is_some_and(|byte| *byte != b'\n'),
        Err(err) if err.kind() == ErrorKind::NotFound => false,
        Err(err) => return Err(persist(err)),
    };

    let mut file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(env_path)
        .map_err(persist)?;
    let separator = if needs_newline { "\n" } else { "" };
    writeln!(file, "{separator}SECRET_KEY={secret}").map_err(persist)?;

    warn!(path = %env_path.display(), "SECRET_KEY was not set; generated a new one");
    Ok(secret)
}
