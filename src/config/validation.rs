use crate::config::types::{Config, DiscoveryConfig, FetchConfig, PipelineConfig, ServerConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_server_config(&config.server)?;
    validate_fetch_config(&config.fetch)?;
    validate_pipeline_config(&config.pipeline)?;
    validate_discovery_config(&config.discovery)?;
    Ok(())
}

/// Validates server configuration
fn validate_server_config(config: &ServerConfig) -> Result<(), ConfigError> {
    if config.bind_address.is_empty() {
        return Err(ConfigError::Validation(
            "bind_address cannot be empty".to_string(),
        ));
    }

    if config.allowed_origin.is_empty() {
        return Err(ConfigError::Validation(
            "allowed_origin cannot be empty; use \"*\" to allow any origin".to_string(),
        ));
    }

    if config.allowed_origin != "*" {
        Url::parse(&config.allowed_origin).map_err(|e| {
            ConfigError::Validation(format!(
                "allowed_origin must be \"*\" or a valid origin URL: {}",
                e
            ))
        })?;
    }

    Ok(())
}

/// Validates fetch configuration
fn validate_fetch_config(config: &FetchConfig) -> Result<(), ConfigError> {
    if config.connect_timeout_secs < 1 || config.connect_timeout_secs > 60 {
        return Err(ConfigError::Validation(format!(
            "connect_timeout_secs must be between 1 and 60, got {}",
            config.connect_timeout_secs
        )));
    }

    if config.request_timeout_secs < config.connect_timeout_secs {
        return Err(ConfigError::Validation(format!(
            "request_timeout_secs ({}) must be >= connect_timeout_secs ({})",
            config.request_timeout_secs, config.connect_timeout_secs
        )));
    }

    if config.retry.max_attempts < 1 || config.retry.max_attempts > 10 {
        return Err(ConfigError::Validation(format!(
            "retry.max_attempts must be between 1 and 10, got {}",
            config.retry.max_attempts
        )));
    }

    if config.retry.max_attempts > 1 && config.retry.delays_ms.is_empty() {
        return Err(ConfigError::Validation(
            "retry.delays_ms cannot be empty when retries are enabled".to_string(),
        ));
    }

    Ok(())
}

/// Validates pipeline configuration
fn validate_pipeline_config(config: &PipelineConfig) -> Result<(), ConfigError> {
    if config.max_concurrent_extractions < 1 || config.max_concurrent_extractions > 32 {
        return Err(ConfigError::Validation(format!(
            "max_concurrent_extractions must be between 1 and 32, got {}",
            config.max_concurrent_extractions
        )));
    }

    if config.over_ask_factor < 1 || config.over_ask_factor > 10 {
        return Err(ConfigError::Validation(format!(
            "over_ask_factor must be between 1 and 10, got {}",
            config.over_ask_factor
        )));
    }

    Ok(())
}

/// Validates discovery-source endpoints
fn validate_discovery_config(config: &DiscoveryConfig) -> Result<(), ConfigError> {
    validate_base_url("discovery.llm.api-base", &config.llm.api_base)?;
    validate_base_url("discovery.serper.api-base", &config.serper.api_base)?;
    validate_base_url("discovery.instant.api-base", &config.instant.api_base)?;

    if config.llm.model.is_empty() {
        return Err(ConfigError::Validation(
            "discovery.llm.model cannot be empty".to_string(),
        ));
    }

    // proxy-base is optional; empty disables the scrape step
    if !config.instant.proxy_base.is_empty() {
        validate_base_url("discovery.instant.proxy-base", &config.instant.proxy_base)?;
    }

    Ok(())
}

fn validate_base_url(field: &str, value: &str) -> Result<(), ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::Validation(format!("Invalid {}: {}", field, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "{} must use http or https, got '{}'",
            field,
            url.scheme()
        )));
    }

    Ok(())
}
