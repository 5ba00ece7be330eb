//! Configuration management for Signals
//!
//! Configuration is loaded from environment variables, falling back to a
//! `.env` file in the working directory and then `~/.signals/.env`.

use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::Path;
use std::sync::{OnceLock, PoisonError, RwLock};

/// Main configuration struct for Signals
#[derive(Debug, Clone)]
pub struct Config {
    pub log_level: String,

    /// Client ids of automated integration channels that always receive
    /// unredacted reporter contact details (e.g. `CityControl`, Sigmax).
    pub trusted_integration_clients: Vec<String>,

    // Email notifications
    pub organization_name: String,
    pub email_from: String,
    pub reopened_email_enabled: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            trusted_integration_clients: vec!["citycontrol".to_string(), "sigmax".to_string()],
            organization_name: "Gemeente Amsterdam".to_string(),
            email_from: "noreply@example.com".to_string(),
            reopened_email_enabled: true,
        }
    }
}

static CACHED: RwLock<Option<Config>> = RwLock::new(None);

impl Config {
    /// Load configuration from environment variables
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(v) = env_value("LOG_LEVEL").filter(|v| !v.trim().is_empty()) {
            config.log_level = v.trim().to_lowercase();
        }
        if let Some(v) = env_value("SIGNALS_TRUSTED_INTEGRATION_CLIENTS") {
            config.trusted_integration_clients = v
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_lowercase)
                .collect();
        }
        if let Some(v) = env_value("SIGNALS_ORGANIZATION_NAME") {
            config.organization_name = v;
        }
        if let Some(v) = env_value("SIGNALS_EMAIL_FROM") {
            config.email_from = v;
        }
        if let Some(enabled) = env_value("SIGNALS_REOPENED_EMAIL_ENABLED").and_then(|v| parse_bool(&v))
        {
            config.reopened_email_enabled = enabled;
        }

        tracing::debug!(
            trusted_clients = config.trusted_integration_clients.len(),
            reopened_email = config.reopened_email_enabled,
            "loaded signals configuration"
        );
        config
    }

    /// Get the process-wide configuration.
    ///
    /// Parses the environment on first call and returns a clone of the cached
    /// value afterwards. Use [`Config::from_env`] when a fresh read is needed.
    #[must_use]
    pub fn get() -> Self {
        if let Some(config) = CACHED.read().unwrap_or_else(PoisonError::into_inner).as_ref() {
            return config.clone();
        }
        CACHED
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .get_or_insert_with(Self::from_env)
            .clone()
    }

    /// Forget the cached configuration so the next [`Config::get`] re-reads it.
    pub fn reset_cached() {
        *CACHED.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    /// True when `client_id` names a trusted automated integration channel.
    #[must_use]
    pub fn is_trusted_integration(&self, client_id: &str) -> bool {
        let needle = client_id.trim().to_lowercase();
        !needle.is_empty() && self.trusted_integration_clients.contains(&needle)
    }
}

/// `.env` in the working directory first, then `~/.signals/.env`.
static DOTENV_LAYERS: OnceLock<[HashMap<String, String>; 2]> = OnceLock::new();

#[cfg(test)]
thread_local! {
    static TEST_ENV_OVERRIDES: std::cell::RefCell<HashMap<String, String>> =
        std::cell::RefCell::new(HashMap::new());
}

/// Read a value with full precedence: process env, `.env`, `~/.signals/.env`.
#[must_use]
pub fn env_value(key: &str) -> Option<String> {
    #[cfg(test)]
    if let Some(v) = TEST_ENV_OVERRIDES.with(|cell| cell.borrow().get(key).cloned()) {
        return Some(v);
    }
    if let Ok(v) = env::var(key) {
        return Some(v);
    }
    DOTENV_LAYERS
        .get_or_init(|| {
            let user = dirs::home_dir()
                .map(|home| home.join(".signals").join(".env"))
                .map_or_else(HashMap::new, |path| load_dotenv_file(&path));
            [load_dotenv_file(Path::new(".env")), user]
        })
        .iter()
        .find_map(|layer| layer.get(key).cloned())
}

fn load_dotenv_file(path: &Path) -> HashMap<String, String> {
    fs::read_to_string(path)
        .map(|contents| parse_dotenv_contents(&contents))
        .unwrap_or_default()
}

/// Parse `KEY=value` lines. Blank lines, `#` comments and an optional
/// `export ` prefix are accepted; surrounding quotes are stripped.
#[must_use]
pub fn parse_dotenv_contents(contents: &str) -> HashMap<String, String> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| line.strip_prefix("export ").unwrap_or(line).split_once('='))
        .filter(|(key, _)| !key.trim().is_empty())
        .map(|(key, value)| (key.trim().to_string(), unquote(value)))
        .collect()
}

fn unquote(raw: &str) -> String {
    let trimmed = raw.trim();
    for quote in ['"', '\''] {
        if let Some(inner) = trimmed.strip_prefix(quote)
            && let Some(end) = inner.find(quote)
        {
            return inner[..end].to_string();
        }
    }
    // Unquoted values end at an inline comment.
    trimmed
        .split_once(" #")
        .map_or(trimmed, |(value, _)| value.trim_end())
        .to_string()
}

/// `None` for anything that is not a recognisable yes/no.
fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "y" => Some(true),
        "0" | "false" | "no" | "n" => Some(false),
        _ => None,
    }
}
