use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable prefix, e.g. `DELIVERY__SERVER__PORT=9000`
pub const ENV_PREFIX: &str = "DELIVERY";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    /// "json" or "text"
    pub log_format: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            log_level: "info".to_string(),
            log_format: "text".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// SQLite connection URL (default: "sqlite://./data/delivery.db")
    pub url: String,
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://./data/delivery.db".to_string(),
            max_connections: 5,
        }
    }
}

/// Load configuration
///
/// Priority: environment (`DELIVERY__*`) > config file (optional) > built-in defaults
pub fn load_config(path: &Path) -> anyhow::Result<Config> {
    let server = ServerConfig::default();
    let database = DatabaseConfig::default();

    let config = config::Config::builder()
        .set_default("server.host", server.host)?
        .set_default("server.port", server.port as i64)?
        .set_default("server.log_level", server.log_level)?
        .set_default("server.log_format", server.log_format)?
        .set_default("database.url", database.url)?
        .set_default("database.max_connections", database.max_connections as i64)?
        .add_source(config::File::from(path).required(false))
        .add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"))
        .build()?;

    let cfg: Config = config.try_deserialize()?;
    validate_config(&cfg)?;

    Ok(cfg)
}

pub fn validate_config(cfg: &Config) -> anyhow::Result<()> {
    if cfg.server.host.parse::<std::net::IpAddr>().is_err() {
        anyhow::bail!("Server host '{}' is not a valid IP address", cfg.server.host);
    }

    if cfg.server.port == 0 {
        anyhow::bail!("Server port must be greater than zero");
    }

    match cfg.server.log_format.as_str() {
        "json" | "text" => {}
        other => anyhow::bail!("Invalid log format '{}': use 'json' or 'text'", other),
    }

    if cfg.database.url.trim().is_empty() {
        anyhow::bail!("Database URL cannot be empty");
    }

    if cfg.database.max_connections == 0 {
        anyhow::bail!("Database max_connections must be at least 1");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_config() -> Config {
        Config {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
                log_level: "info".to_string(),
                log_format: "json".to_string(),
            },
            database: DatabaseConfig {
                url: "sqlite::memory:".to_string(),
                max_connections: 1,
            },
        }
    }

    #[test]
    fn test_validate_config_accepts_valid() {
        assert!(validate_config(&create_test_config()).is_ok());
    }

    #[test]
    fn test_validate_config_rejects_bad_host() {
        let mut cfg = create_test_config();
        cfg.server.host = "not-an-ip".to_string();

        let result = validate_config(&cfg);
        assert!(result.unwrap_err().to_string().contains("not a valid IP address"));
    }

    #[test]
    fn test_validate_config_rejects_zero_port() {
        let mut cfg = create_test_config();
        cfg.server.port = 0;
        assert!(validate_config(&cfg).is_err());
    }

    #[test]
    fn test_validate_config_rejects_unknown_log_format() {
        let mut cfg = create_test_config();
        cfg.server.log_format = "xml".to_string();
        assert!(validate_config(&cfg).is_err());
    }

    #[test]
    fn test_validate_config_rejects_empty_pool() {
        let mut cfg = create_test_config();
        cfg.database.max_connections = 0;

        let result = validate_config(&cfg);
        assert!(result.unwrap_err().to_string().contains("max_connections"));
    }

    #[test]
    fn test_default_configs() {
        let server = ServerConfig::default();
        assert_eq!(server.host, "0.0.0.0");
        assert_eq!(server.port, 8080);

        let database = DatabaseConfig::default();
        assert!(database.url.starts_with("sqlite://"));
    }
}
