//! Configuration loader
//!
//! Loads application configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If incomplete, falls back to loading from file
//! 3. Probes multiple paths for config files
//! 4. Falls back to built-in defaults when neither source is present
//!
//! ## Environment Variables
//! - `PAVILION_API_BASE_URL`: Backend origin, e.g. `http://localhost:5000/api`
//! - `PAVILION_API_TIMEOUT_MS`: Per-request timeout in milliseconds
//! - `PAVILION_CACHE_TTL_MS`: TTL for cached GET responses in milliseconds
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./config.json` or `./config.toml` (current working directory)
//! 2. `./pavilion.json` or `./pavilion.toml` (current working directory)
//! 3. `../config.json` or `../config.toml` (parent directory)
//! 4. Relative to executable location

use std::path::{Path, PathBuf};

use pavilion_domain::{ApiConfig, Config};
use thiserror::Error;

/// Errors raised while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required environment variable is absent.
    #[error("missing required environment variable: {0}")]
    MissingVariable(&'static str),

    /// A variable or field is present but unusable.
    #[error("invalid configuration value for {field}: {reason}")]
    InvalidValue {
        /// Name of the offending variable or field
        field: &'static str,
        /// Parse failure description
        reason: String,
    },

    /// The named file does not exist.
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    /// The file exists but cannot be read or parsed.
    #[error("failed to load config file {path}: {reason}")]
    UnreadableFile {
        /// Path that was probed or given explicitly
        path: PathBuf,
        /// Read or parse failure description
        reason: String,
    },
}

/// Load configuration with automatic fallback strategy
///
/// First attempts to load from environment variables, then from a probed
/// config file. When neither source is available the built-in defaults are
/// used, so a bare checkout talks to the default local backend.
///
/// # Errors
/// Returns `ConfigError` only when a source is present but malformed: a
/// non-numeric timeout variable, or a config file that exists but does not
/// parse.
pub fn load() -> Result<Config, ConfigError> {
    match load_from_env() {
        Ok(config) => {
            tracing::info!("configuration loaded from environment variables");
            return Ok(config);
        }
        Err(err @ ConfigError::InvalidValue { .. }) => return Err(err),
        Err(err) => {
            tracing::debug!(error = %err, "environment configuration incomplete, trying file");
        }
    }

    match probe_config_paths() {
        Some(path) => load_from_file(Some(path)),
        None => {
            tracing::info!("no configuration found, using built-in defaults");
            Ok(Config::default())
        }
    }
}

/// Load configuration from environment variables
///
/// `PAVILION_API_BASE_URL` must be present; the timeout and TTL variables
/// default when absent.
///
/// # Errors
/// Returns `ConfigError::MissingVariable` when the base URL is not set, or
/// `ConfigError::InvalidValue` when a numeric variable does not parse.
pub fn load_from_env() -> Result<Config, ConfigError> {
    let base_url = std::env::var("PAVILION_API_BASE_URL")
        .map_err(|_| ConfigError::MissingVariable("PAVILION_API_BASE_URL"))?;

    let defaults = ApiConfig::default();
    let timeout_ms = env_u64("PAVILION_API_TIMEOUT_MS", defaults.timeout_ms)?;
    let cache_ttl_ms = env_u64("PAVILION_CACHE_TTL_MS", defaults.cache_ttl_ms)?;

    Ok(Config { api: ApiConfig { base_url, timeout_ms, cache_ttl_ms } })
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns `ConfigError` if the file is missing, unreadable, or malformed.
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config, ConfigError> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(ConfigError::FileNotFound(p));
            }
            p
        }
        None => {
            probe_config_paths().ok_or_else(|| ConfigError::FileNotFound("config".into()))?
        }
    };

    tracing::info!(path = %config_path.display(), "loading configuration from file");

    let contents = std::fs::read_to_string(&config_path).map_err(|err| {
        ConfigError::UnreadableFile { path: config_path.clone(), reason: err.to_string() }
    })?;

    parse_config(&contents, &config_path)
}

/// Parse configuration from string content, detecting the format by file
/// extension (`.json` or `.toml`).
fn parse_config(contents: &str, path: &Path) -> Result<Config, ConfigError> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents).map_err(|err| ConfigError::UnreadableFile {
            path: path.to_path_buf(),
            reason: format!("invalid TOML: {err}"),
        }),
        "json" => serde_json::from_str(contents).map_err(|err| ConfigError::UnreadableFile {
            path: path.to_path_buf(),
            reason: format!("invalid JSON: {err}"),
        }),
        other => Err(ConfigError::UnreadableFile {
            path: path.to_path_buf(),
            reason: format!("unsupported config format: {other}"),
        }),
    }
}

/// Probe multiple paths for configuration files
///
/// Searches the current working directory, its parent, and the executable's
/// directory for `config.{json,toml}` and `pavilion.{json,toml}`.
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut candidates = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        candidates.extend(vec![
            cwd.join("config.json"),
            cwd.join("config.toml"),
            cwd.join("pavilion.json"),
            cwd.join("pavilion.toml"),
            cwd.join("../config.json"),
            cwd.join("../config.toml"),
        ]);
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            candidates.extend(vec![
                exe_dir.join("config.json"),
                exe_dir.join("config.toml"),
                exe_dir.join("pavilion.json"),
                exe_dir.join("pavilion.toml"),
            ]);
        }
    }

    candidates.into_iter().find(|path| path.exists())
}

fn env_u64(key: &'static str, default: u64) -> Result<u64, ConfigError> {
    match std::env::var(key) {
        Ok(value) => value
            .parse::<u64>()
            .map_err(|err| ConfigError::InvalidValue { field: key, reason: err.to_string() }),
        Err(_) => Ok(default),
    }
}
