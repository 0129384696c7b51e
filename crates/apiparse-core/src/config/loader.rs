//! Config loader — reads `~/.apiparse/config.json`, then layers `.env` and
//! process environment on top.
//!
//! # Loading precedence
//! 1. Defaults (from `Config::default()`)
//! 2. JSON file at `~/.apiparse/config.json`
//! 3. Provider credential variables (`CLOUDFLARE_TOKEN`, `OPENAI_API_KEY`, `AWS_*`, …),
//!    including those from a `.env` file in the working directory
//! 4. `APIPARSE_<SECTION>__<FIELD>` overrides for endpoints, sampling, and HTTP

use std::path::{Path, PathBuf};
use std::sync::Once;

use tracing::{debug, info, warn};

use super::schema::Config;

static ENV_LOADER: Once = Once::new();

/// Default config file path.
pub fn get_config_path() -> PathBuf {
    crate::utils::get_data_path().join("config.json")
}

/// Load variables from `.env` in the working directory, once per process.
///
/// Variables already present in the environment win.
pub fn ensure_env_loaded() {
    ENV_LOADER.call_once(|| match dotenvy::dotenv() {
        Ok(path) => debug!("Loaded environment from {}", path.display()),
        Err(e) if e.not_found() => {}
        Err(e) => warn!("Failed to load .env: {}", e),
    });
}

/// Load configuration from the default path + env vars.
///
/// Falls back to `Config::default()` if the file doesn't exist or can't be parsed.
pub fn load_config(path: Option<&Path>) -> Config {
    ensure_env_loaded();

    let config_path = path.map(PathBuf::from).unwrap_or_else(get_config_path);

    apply_env_overrides(read_config_file(&config_path), |key| std::env::var(key).ok())
}

/// Read the JSON file alone, without env overrides.
fn read_config_file(path: &Path) -> Config {
    if !path.exists() {
        info!("No config file found at {}, using defaults", path.display());
        return Config::default();
    }

    debug!("Loading config from {}", path.display());

    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            warn!("Failed to read config file {}: {}", path.display(), e);
            return Config::default();
        }
    };

    match serde_json::from_str(&content) {
        Ok(config) => config,
        Err(e) => {
            warn!("Failed to parse config JSON {}: {}", path.display(), e);
            Config::default()
        }
    }
}

/// Save configuration to disk (pretty-printed JSON with camelCase keys).
pub fn save_config(config: &Config, path: Option<&Path>) -> std::io::Result<()> {
    let config_path = path.map(PathBuf::from).unwrap_or_else(get_config_path);

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(config)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;

    std::fs::write(&config_path, json)?;
    debug!("Config saved to {}", config_path.display());
    Ok(())
}

/// Apply environment overrides on top of a loaded config.
///
/// `lookup` returns the value of one variable; non-empty values win over the file.
///
/// Supported variables:
/// - `CLOUDFLARE_TOKEN`, `CLOUDFLARE_ACCOUNT_ID`
/// - `OPENAI_API_KEY`
/// - `AWS_ACCESS_KEY_ID`, `AWS_SECRET_ACCESS_KEY`, `AWS_SESSION_TOKEN`, `AWS_REGION`
/// - `APIPARSE_ENDPOINTS__WORKERS_AI_BASE`, `APIPARSE_ENDPOINTS__OPENAI_BASE`,
///   `APIPARSE_ENDPOINTS__BEDROCK_ENDPOINT`
/// - `APIPARSE_SAMPLING__OPENAI__TEMPERATURE`, `APIPARSE_SAMPLING__OPENAI__MAX_TOKENS`
/// - `APIPARSE_SAMPLING__BEDROCK__TEMPERATURE`, `APIPARSE_SAMPLING__BEDROCK__CLAUDE_MAX_TOKENS`
/// - `APIPARSE_HTTP__TIMEOUT_SECS`
pub fn apply_env_overrides<F>(mut config: Config, lookup: F) -> Config
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

    // Credentials
    let creds = &mut config.credentials;
    if let Some(val) = get("CLOUDFLARE_TOKEN") {
        creds.cloudflare_token = val;
    }
    if let Some(val) = get("CLOUDFLARE_ACCOUNT_ID") {
        creds.cloudflare_account_id = val;
    }
    if let Some(val) = get("OPENAI_API_KEY") {
        creds.openai_api_key = val;
    }
    if let Some(val) = get("AWS_ACCESS_KEY_ID") {
        creds.aws_access_key_id = val;
    }
    if let Some(val) = get("AWS_SECRET_ACCESS_KEY") {
        creds.aws_secret_access_key = val;
    }
    if let Some(val) = get("AWS_SESSION_TOKEN") {
        creds.aws_session_token = Some(val);
    }
    if let Some(val) = get("AWS_REGION") {
        creds.aws_region = val;
    }

    // Endpoints
    if let Some(val) = get("APIPARSE_ENDPOINTS__WORKERS_AI_BASE") {
        config.endpoints.workers_ai_base = val;
    }
    if let Some(val) = get("APIPARSE_ENDPOINTS__OPENAI_BASE") {
        config.endpoints.openai_base = val;
    }
    if let Some(val) = get("APIPARSE_ENDPOINTS__BEDROCK_ENDPOINT") {
        config.endpoints.bedrock_endpoint = Some(val);
    }

    // Sampling
    if let Some(t) = parse_var::<f64>(&get, "APIPARSE_SAMPLING__OPENAI__TEMPERATURE") {
        config.sampling.openai.temperature = t;
    }
    if let Some(n) = parse_var::<u32>(&get, "APIPARSE_SAMPLING__OPENAI__MAX_TOKENS") {
        config.sampling.openai.max_tokens = n;
    }
    if let Some(t) = parse_var::<f64>(&get, "APIPARSE_SAMPLING__BEDROCK__TEMPERATURE") {
        config.sampling.bedrock.temperature = t;
    }
    if let Some(n) = parse_var::<u32>(&get, "APIPARSE_SAMPLING__BEDROCK__CLAUDE_MAX_TOKENS") {
        config.sampling.bedrock.claude_max_tokens = n;
    }

    // HTTP
    if let Some(n) = parse_var::<u64>(&get, "APIPARSE_HTTP__TIMEOUT_SECS") {
        config.http.timeout_secs = n;
    }

    config
}

fn parse_var<T: std::str::FromStr>(get: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    let raw = get(key)?;
    match raw.parse::<T>() {
        Ok(v) => Some(v),
        Err(_) => {
            warn!("Ignoring {}={:?}: not a valid value", key, raw);
            None
        }
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
