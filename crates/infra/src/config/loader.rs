//! Configuration loader
//!
//! Loads application configuration from a file and environment variables.
//!
//! ## Loading Strategy
//! 1. `.env` is loaded into the process environment (see [`load_dotenv`])
//! 2. A config file is read when given explicitly or found by probing;
//!    otherwise built-in defaults are used
//! 3. Environment variables override individual settings
//! 4. The result is validated
//!
//! ## Environment Variables
//! - `DUNKBIN_USER`, `DUNKBIN_PASSWORD`: Dunkbin basic-auth credentials
//! - `DUNKBIN_USERS_URL`: users export endpoint
//! - `TWITCH_CLIENT_ID`, `TWITCH_CLIENT_SECRET`: Twitch application
//! - `TWITCH_ACCESS_TOKEN`, `TWITCH_REFRESH_TOKEN`: user tokens
//! - `TWITCH_TOKEN_URL`, `TWITCH_HELIX_URL`: endpoint overrides
//! - `DUNKSTATS_CHUNK_SIZE`: logins per Helix request
//! - `DUNKSTATS_MAX_RETRIES`: retries per request
//! - `DUNKSTATS_INTER_BATCH_DELAY_MS`: pause between chunks
//! - `DUNKSTATS_OUTPUT_PATH`: mapping artifact path
//! - `DUNKSTATS_COMPRESS_OUTPUT`: gzip the artifact (true/false)
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./dunkstats.toml` or `./dunkstats.json` (current working directory)
//! 2. `./config.toml` or `./config.json` (current working directory)
//! 3. `../config.toml` or `../config.json` (parent directory)
//! 4. Relative to executable location

use std::path::{Path, PathBuf};
use std::str::FromStr;

use dunkstats_domain::{Config, DunkstatsError, Result};

/// Load `.env` from the working directory or its ancestors.
///
/// Returns the path of the file that was loaded, if any. Variables already
/// set in the environment win.
pub fn load_dotenv() -> Option<PathBuf> {
    match dotenvy::dotenv() {
        Ok(path) => {
            tracing::debug!(path = %path.display(), "loaded .env file");
            Some(path)
        }
        Err(e) if e.not_found() => None,
        Err(e) => {
            tracing::warn!(error = %e, "failed to parse .env file");
            None
        }
    }
}

/// Load a specific `.env` file.
///
/// Returns `path` when the file existed and was loaded.
pub fn load_dotenv_from(path: &Path) -> Option<PathBuf> {
    match dotenvy::from_path(path) {
        Ok(()) => {
            tracing::debug!(path = %path.display(), "loaded .env file");
            Some(path.to_path_buf())
        }
        Err(e) if e.not_found() => None,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "failed to parse .env file");
            None
        }
    }
}

/// Load and validate configuration.
///
/// # Arguments
/// * `path` - Optional config file. If `None`, [`probe_config_paths`] is
///   used and a missing file falls back to defaults.
///
/// # Errors
/// Returns `DunkstatsError::Config` if:
/// - An explicit config file does not exist or cannot be parsed
/// - An environment variable has an invalid value
/// - Required settings are missing after merging
pub fn load(path: Option<PathBuf>) -> Result<Config> {
    let mut config = match path.or_else(probe_config_paths) {
        Some(path) => load_from_file(Some(path))?,
        None => {
            tracing::debug!("No config file found, using defaults");
            Config::default()
        }
    };

    apply_overrides(&mut config, |key| std::env::var(key).ok())?;
    config.validate()?;
    tracing::info!(
        chunk_size = config.fetch.chunk_size,
        max_retries = config.fetch.max_retries,
        output = %config.output.mapping_path,
        "Configuration loaded"
    );
    Ok(config)
}

/// Load configuration from environment variables only.
///
/// # Errors
/// Returns `DunkstatsError::Config` if a variable has an invalid value.
/// Missing variables keep their defaults; call [`Config::validate`] to
/// check completeness.
pub fn load_from_env() -> Result<Config> {
    let mut config = Config::default();
    apply_overrides(&mut config, |key| std::env::var(key).ok())?;
    Ok(config)
}

/// Apply overrides read through `lookup` (normally `std::env::var`).
///
/// Empty values are treated as unset.
///
/// # Errors
/// Returns `DunkstatsError::Config` naming the variable with an invalid
/// value.
pub fn apply_overrides<F>(config: &mut Config, lookup: F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

    if let Some(value) = get("DUNKBIN_USER") {
        config.dunkbin.username = value;
    }
    if let Some(value) = get("DUNKBIN_PASSWORD") {
        config.dunkbin.password = value;
    }
    if let Some(value) = get("DUNKBIN_USERS_URL") {
        config.dunkbin.users_url = value;
    }

    if let Some(value) = get("TWITCH_CLIENT_ID") {
        config.twitch.client_id = value;
    }
    if let Some(value) = get("TWITCH_CLIENT_SECRET") {
        config.twitch.client_secret = Some(value);
    }
    if let Some(value) = get("TWITCH_ACCESS_TOKEN") {
        config.twitch.access_token = Some(value);
    }
    if let Some(value) = get("TWITCH_REFRESH_TOKEN") {
        config.twitch.refresh_token = Some(value);
    }
    if let Some(value) = get("TWITCH_TOKEN_URL") {
        config.twitch.token_url = value;
    }
    if let Some(value) = get("TWITCH_HELIX_URL") {
        config.twitch.helix_users_url = value;
    }

    if let Some(value) = get("DUNKSTATS_CHUNK_SIZE") {
        config.fetch.chunk_size = parse_number("DUNKSTATS_CHUNK_SIZE", &value)?;
    }
    if let Some(value) = get("DUNKSTATS_MAX_RETRIES") {
        config.fetch.max_retries = parse_number("DUNKSTATS_MAX_RETRIES", &value)?;
    }
    if let Some(value) = get("DUNKSTATS_INTER_BATCH_DELAY_MS") {
        config.fetch.inter_batch_delay_ms = parse_number("DUNKSTATS_INTER_BATCH_DELAY_MS", &value)?;
    }
    if let Some(value) = get("DUNKSTATS_OUTPUT_PATH") {
        config.output.mapping_path = value;
    }
    if let Some(value) = get("DUNKSTATS_COMPRESS_OUTPUT") {
        config.output.compress = parse_bool(&value, config.output.compress);
    }

    Ok(())
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns `DunkstatsError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(DunkstatsError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            DunkstatsError::Config(
                "No config file found in any of the standard locations".to_string(),
            )
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| DunkstatsError::Config(format!("Failed to read config file: {e}")))?;

    parse_config(&contents, &config_path)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
///
/// # Errors
/// Returns `DunkstatsError::Config` if format is invalid or parsing fails.
fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| DunkstatsError::Config(format!("Invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| DunkstatsError::Config(format!("Invalid JSON format: {e}"))),
        _ => Err(DunkstatsError::Config(format!("Unsupported config format: {extension}"))),
    }
}

/// Probe multiple paths for configuration files
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    const NAMES: [&str; 4] = ["dunkstats.toml", "dunkstats.json", "config.toml", "config.json"];

    let mut candidates = Vec::new();

    // Try current working directory
    if let Ok(cwd) = std::env::current_dir() {
        candidates.extend(NAMES.iter().map(|name| cwd.join(name)));
        candidates.extend(NAMES[2..].iter().map(|name| cwd.join("..").join(name)));
    }

    // Try relative to executable
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            candidates.extend(NAMES.iter().map(|name| exe_dir.join(name)));
        }
    }

    // Return first existing candidate
    candidates.into_iter().find(|path| path.is_file())
}

fn parse_number<T>(key: &str, value: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| DunkstatsError::Config(format!("Invalid value for {key}: {e}")))
}

/// Parse boolean from a setting value
///
/// Accepts: `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive).
/// Anything else keeps `default`.
fn parse_bool(value: &str, default: bool) -> bool {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => true,
        "0" | "false" | "no" | "off" => false,
        _ => default,
    }
}
