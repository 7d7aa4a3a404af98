//! Configuration loading from environment variables.

use crate::constants::{
    DEFAULT_BODY_LIMIT, DEFAULT_LISTEN, DEFAULT_MAX_PASTE_SIZE, DEFAULT_SWEEP_INTERVAL_SECS,
    DEFAULT_TOKEN, DEFAULT_TTL_SECS, MAX_TTL_SECS,
};
use crate::service::ServiceOptions;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

/// Runtime configuration for barkpaste.
#[derive(Debug, Clone)]
pub struct Config {
    pub db_path: String,
    pub listen: String,
    pub default_ttl_secs: u64,
    pub max_paste_size: usize,
    pub body_limit: usize,
    pub default_token: String,
    pub sweep_interval_secs: u64,
}

/// Expand tilde (~) in paths to the user's home directory
fn expand_tilde(path: String) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = resolve_home_dir() {
            return home.join(rest).to_string_lossy().to_string();
        }
    }
    path
}

fn resolve_home_dir() -> Option<PathBuf> {
    if let Ok(home) = env::var("HOME") {
        if !home.trim().is_empty() {
            return Some(PathBuf::from(home));
        }
    }

    if let Ok(profile) = env::var("USERPROFILE") {
        if !profile.trim().is_empty() {
            return Some(PathBuf::from(profile));
        }
    }

    std::env::current_dir().ok()
}

fn default_db_path() -> String {
    let home = resolve_home_dir().unwrap_or_else(|| PathBuf::from("."));
    home.join(".cache")
        .join("barkpaste")
        .join("db")
        .to_string_lossy()
        .to_string()
}

fn parse_or_default<T, F>(lookup: &F, key: &str, default: T) -> T
where
    T: FromStr + Copy,
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        return default;
    };
    match raw.trim().parse() {
        Ok(value) => value,
        Err(_) => {
            tracing::warn!("Ignoring unparseable {}='{}', using default", key, raw);
            default
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Returns
    /// A populated [`Config`] with defaults applied when env vars are missing.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    ///
    /// Blank values are treated as missing. Numeric values that fail to parse
    /// fall back to their defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        Self {
            db_path: get("DB_PATH")
                .map(expand_tilde)
                .unwrap_or_else(default_db_path),
            listen: get("LISTEN").unwrap_or_else(|| DEFAULT_LISTEN.to_string()),
            default_ttl_secs: parse_or_default(&get, "PASTE_TTL", DEFAULT_TTL_SECS),
            max_paste_size: parse_or_default(&get, "MAX_PASTE_SIZE", DEFAULT_MAX_PASTE_SIZE),
            body_limit: parse_or_default(&get, "BODY_LIMIT", DEFAULT_BODY_LIMIT),
            default_token: get("DEFAULT_TOKEN").unwrap_or_else(|| DEFAULT_TOKEN.to_string()),
            sweep_interval_secs: parse_or_default(
                &get,
                "SWEEP_INTERVAL",
                DEFAULT_SWEEP_INTERVAL_SECS,
            ),
        }
    }

    /// Policy settings derived from this configuration.
    pub fn service_options(&self) -> ServiceOptions {
        ServiceOptions {
            default_ttl: chrono::Duration::seconds(
                i64::try_from(self.default_ttl_secs)
                    .unwrap_or(i64::MAX)
                    .min(MAX_TTL_SECS),
            ),
            size_limit: self.max_paste_size,
        }
    }

    /// Sweep cadence, or `None` when periodic sweeping is disabled.
    pub fn sweep_interval(&self) -> Option<std::time::Duration> {
        (self.sweep_interval_secs > 0)
            .then(|| std::time::Duration::from_secs(self.sweep_interval_secs))
    }
}
