use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    validate(&config)?;
    Ok(config)
}

/// Builds the runtime configuration from an optional file plus environment
///
/// The file (when given) supplies tuning; credentials always come from the
/// process environment so they never land in a config file on disk:
///
/// * `SERPER_API_KEY` - keyed search API credential
/// * `LLM_API_KEY` (or `OPENAI_API_KEY`) - LLM link-proposer credential
/// * `ALLOWED_ORIGIN` - CORS origin override
///
/// A missing credential leaves the corresponding source unavailable; it is
/// not an error at load time.
pub fn load(path: Option<&Path>) -> Result<Config, ConfigError> {
    let mut config = match path {
        Some(p) => load_config(p)?,
        None => Config::default(),
    };
    apply_env(&mut config);
    validate(&config)?;
    Ok(config)
}

/// Overlays environment-sourced settings onto a parsed configuration.
fn apply_env(config: &mut Config) {
    if let Some(key) = env_nonempty("SERPER_API_KEY") {
        config.discovery.serper.api_key = Some(key);
    }
    if let Some(key) = env_nonempty("LLM_API_KEY").or_else(|| env_nonempty("OPENAI_API_KEY")) {
        config.discovery.llm.api_key = Some(key);
    }
    if let Some(origin) = env_nonempty("ALLOWED_ORIGIN") {
        config.server.allowed_origin = origin;
    }
}

fn env_nonempty(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
