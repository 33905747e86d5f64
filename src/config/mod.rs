mod defaults;
mod types;
mod validation;

pub use defaults::*;
pub use types::*;
pub use validation::*;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

/// Top-level service configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from file, environment, and defaults.
    pub fn load(path: Option<&str>) -> Result<Self> {
        let config_path = path.map(PathBuf::from).or_else(find_config_file);

        let mut config = match config_path {
            Some(ref p) if p.exists() => {
                info!("Loading config from {}", p.display());
                load_config_file(p)?
            }
            Some(ref p) if path.is_some() => {
                anyhow::bail!("Config file '{}' does not exist", p.display());
            }
            _ => {
                info!("No config file found, using defaults");
                Config::default()
            }
        };

        config.apply_env_overrides();

        Ok(config)
    }

    /// Write default configuration to a file.
    pub fn write_default(path: &str) -> Result<()> {
        let config = Config::default();
        let json = serde_json::to_string_pretty(&config)?;
        std::fs::write(path, json).with_context(|| format!("Failed to write config to '{path}'"))?;
        Ok(())
    }

    /// Apply environment variable overrides to the configuration.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(port) = var("ADVOCATES_PORT") {
            if let Ok(port) = port.parse() {
                self.server.port = port;
            }
        }

        if let Some(bind) = var("ADVOCATES_BIND") {
            if let Ok(mode) = bind.parse() {
                self.server.bind = mode;
            }
        }

        if let Some(url) = var("DATABASE_URL") {
            self.database.apply_url(&url);
        }
    }
}

/// Find the configuration file in standard locations.
fn find_config_file() -> Option<PathBuf> {
    for ext in ["json", "yaml", "yml", "toml"] {
        let path = PathBuf::from(format!("{CONFIG_FILE_STEM}.{ext}"));
        if path.exists() {
            return Some(path);
        }
    }

    let home_config = dirs::home_dir()?.join(STATE_DIR_NAME).join("config.json");
    home_config.exists().then_some(home_config)
}

/// Load configuration from a file path.
fn load_config_file(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
    parse_config(&content, path.extension().and_then(|e| e.to_str()))
        .with_context(|| format!("Failed to parse config file '{}'", path.display()))
}

fn parse_config(content: &str, extension: Option<&str>) -> Result<Config> {
    let config = match extension {
        Some("yaml") | Some("yml") => serde_yaml::from_str(content)?,
        Some("toml") => toml::from_str(content)?,
        _ => {
            // Try JSON5 first, then regular JSON
            json5::from_str(content).or_else(|_| {
                serde_json::from_str(content).map_err(|e| json5::Error::Message {
                    msg: e.to_string(),
                    location: None,
                })
            })?
        }
    };

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn parses_json5_with_comments() {
        let config = parse_config(
            r#"{
                // local dev
                server: { port: 8080, bind: "lan" },
                database: { path: "data/advocates.db" },
            }"#,
            Some("json"),
        )
        .unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.bind, BindMode::Lan);
        assert_eq!(config.database.path, Some(PathBuf::from("data/advocates.db")));
        assert_eq!(config.database.pool_size, DEFAULT_POOL_SIZE);
    }

    #[test]
    fn parses_yaml_and_toml() {
        let yaml = parse_config("database:\n  poolSize: 2\nlogging:\n  level: debug\n", Some("yaml"))
            .unwrap();
        assert_eq!(yaml.database.pool_size, 2);
        assert_eq!(yaml.logging.level, LoggingLevel::Debug);

        let toml = parse_config("[server]\nport = 9000\n", Some("toml")).unwrap();
        assert_eq!(toml.server.port, 9000);
        assert_eq!(toml.server.bind, BindMode::Loopback);
    }

    #[test]
    fn empty_object_gives_defaults() {
        let config = parse_config("{}", None).unwrap();
        assert_eq!(config.server.port, DEFAULT_SERVER_PORT);
        assert!(config.database.path.is_none());
    }

    #[test]
    fn env_overrides_apply() {
        let vars: HashMap<&str, &str> = [
            ("ADVOCATES_PORT", "4100"),
            ("ADVOCATES_BIND", "lan"),
            ("DATABASE_URL", "sqlite:///var/lib/advocates.db"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_overrides(|k| vars.get(k).map(|v| v.to_string()));
        assert_eq!(config.server.port, 4100);
        assert_eq!(config.server.bind, BindMode::Lan);
        assert_eq!(config.database.path, Some(PathBuf::from("/var/lib/advocates.db")));
    }

    #[test]
    fn invalid_env_values_are_ignored() {
        let mut config = Config::default();
        config.apply_overrides(|k| match k {
            "ADVOCATES_PORT" => Some("not-a-port".into()),
            "ADVOCATES_BIND" => Some("everywhere".into()),
            _ => None,
        });
        assert_eq!(config.server.port, DEFAULT_SERVER_PORT);
        assert_eq!(config.server.bind, BindMode::Loopback);
    }

    #[test]
    fn plain_database_path_is_accepted() {
        let mut db = DatabaseConfig::default();
        db.apply_url("advocates.db");
        assert_eq!(db.path, Some(PathBuf::from("advocates.db")));
    }

    #[test]
    fn write_default_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("advocates.json");
        Config::write_default(path.to_str().unwrap()).unwrap();
        let loaded = Config::load(path.to_str()).unwrap();
        assert_eq!(loaded.server.port, DEFAULT_SERVER_PORT);
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        assert!(Config::load(Some("/nonexistent/advocates.json")).is_err());
    }
}
