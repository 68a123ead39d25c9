//! Layered server configuration
//!
//! Sources, highest priority last:
//! 1. Built-in defaults
//! 2. Optional YAML file passed with `--config`
//! 3. Environment variables prefixed `REQTRACK_`, with `__` separating sections
//!    (`REQTRACK_DATABASE__URL` sets `database.url`)

use anyhow::{Context, Result};
use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const ENV_PREFIX: &str = "REQTRACK_";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub requirements_service: requirements_service::Config,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub bind_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:80".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://reqtrack.db?mode=rwc".to_string(),
            max_connections: 10,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive, overridden by `RUST_LOG`
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

impl AppConfig {
    /// Build the provider chain without extracting
    pub fn figment(file: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(path) = file {
            figment = figment.merge(Yaml::file(path));
        }
        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    pub fn load(file: Option<&Path>) -> Result<Self> {
        if let Some(path) = file {
            anyhow::ensure!(path.exists(), "config file {} does not exist", path.display());
        }
        Self::figment(file)
            .extract()
            .context("failed to load configuration")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn test_defaults() {
        Jail::expect_with(|_jail| {
            let config: AppConfig = AppConfig::figment(None).extract()?;
            assert_eq!(config.server.bind_addr, "0.0.0.0:80");
            assert_eq!(config.database.url, "sqlite://reqtrack.db?mode=rwc");
            assert_eq!(config.logging.format, LogFormat::Pretty);
            assert_eq!(config.requirements_service.api_prefix, "/api/v1");
            assert_eq!(config.requirements_service.max_login_attempts, 5);
            Ok(())
        });
    }

    #[test]
    fn test_yaml_then_env() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "reqtrack.yaml",
                r#"
server:
  bind_addr: "127.0.0.1:8080"
logging:
  format: json
requirements_service:
  project_name: "Acme Requirements"
  access_token_expire_minutes: 60
"#,
            )?;
            jail.set_env("REQTRACK_SERVER__BIND_ADDR", "127.0.0.1:9090");
            jail.set_env("REQTRACK_DATABASE__URL", "postgres://db/reqtrack");

            let config: AppConfig =
                AppConfig::figment(Some(Path::new("reqtrack.yaml"))).extract()?;
            assert_eq!(config.server.bind_addr, "127.0.0.1:9090");
            assert_eq!(config.database.url, "postgres://db/reqtrack");
            assert_eq!(config.logging.format, LogFormat::Json);
            assert_eq!(config.requirements_service.project_name, "Acme Requirements");
            assert_eq!(config.requirements_service.access_token_expire_minutes, 60);
            assert_eq!(config.requirements_service.login_lockout_minutes, 15);
            Ok(())
        });
    }

    #[test]
    fn test_unknown_service_key_is_rejected() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "bad.yaml",
                "requirements_service:\n  jwt_secrett: typo\n",
            )?;
            let result = AppConfig::figment(Some(Path::new("bad.yaml"))).extract::<AppConfig>();
            assert!(result.is_err());
            Ok(())
        });
    }

    #[test]
    fn test_missing_file_is_an_error() {
        assert!(AppConfig::load(Some(Path::new("/nonexistent/reqtrack.yaml"))).is_err());
    }
}
