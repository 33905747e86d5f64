use super::{BindMode, Config};
use anyhow::Result;
use tracing::warn;

/// Validation errors for configuration.
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    pub path: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Validate a configuration object.
pub fn validate_config(config: &Config) -> Vec<ConfigValidationError> {
    let mut errors = Vec::new();

    if config.server.port == 0 {
        errors.push(ConfigValidationError {
            path: "server.port".to_string(),
            message: "Port must be greater than 0".to_string(),
        });
    }

    if config.server.bind == BindMode::Custom
        && config
            .server
            .custom_bind_host
            .as_deref()
            .map_or(true, |h| h.trim().is_empty())
    {
        errors.push(ConfigValidationError {
            path: "server.customBindHost".to_string(),
            message: "Custom bind mode requires a host".to_string(),
        });
    }

    if config.database.pool_size == 0 {
        errors.push(ConfigValidationError {
            path: "database.poolSize".to_string(),
            message: "Pool size must be greater than 0".to_string(),
        });
    }

    if config.database.path.is_none() {
        warn!("No database path configured; /api/advocates will report errors");
    }

    errors
}

/// Validate configuration and return Result.
pub fn validate_config_object(config: &Config) -> Result<()> {
    let errors = validate_config(config);
    if errors.is_empty() {
        Ok(())
    } else {
        let messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
        anyhow::bail!("Configuration validation failed:\n{}", messages.join("\n"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(validate_config(&Config::default()).is_empty());
    }

    #[test]
    fn zero_port_rejected() {
        let mut config = Config::default();
        config.server.port = 0;
        let errors = validate_config(&config);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].path, "server.port");
    }

    #[test]
    fn custom_bind_requires_host() {
        let mut config = Config::default();
        config.server.bind = BindMode::Custom;
        assert_eq!(validate_config(&config)[0].path, "server.customBindHost");

        config.server.custom_bind_host = Some("10.0.0.5".into());
        assert!(validate_config(&config).is_empty());
    }

    #[test]
    fn zero_pool_rejected_with_message() {
        let mut config = Config::default();
        config.database.pool_size = 0;
        let err = validate_config_object(&config).unwrap_err().to_string();
        assert!(err.contains("database.poolSize: Pool size must be greater than 0"));
    }
}
