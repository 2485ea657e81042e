use delivery_manager::config::load_config;
use std::io::Write;
use std::path::Path;

#[test]
fn test_load_config_without_file_uses_defaults() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let config = load_config(&dir.path().join("missing.toml"))?;

    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.server.port, 8080);
    assert_eq!(config.server.log_level, "info");
    assert_eq!(config.server.log_format, "text");
    assert!(config.database.url.starts_with("sqlite://"));

    Ok(())
}

#[test]
fn test_load_config_from_file() -> anyhow::Result<()> {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile()?;
    writeln!(
        file,
        r#"
[server]
host = "127.0.0.1"
port = 9090
log_format = "json"

[database]
url = "sqlite://./var/deliveries.db"
"#
    )?;

    let config = load_config(file.path())?;

    assert_eq!(config.server.host, "127.0.0.1");
    assert_eq!(config.server.port, 9090);
    assert_eq!(config.server.log_format, "json");
    // Keys absent from the file keep their defaults
    assert_eq!(config.server.log_level, "info");
    assert_eq!(config.database.url, "sqlite://./var/deliveries.db");

    Ok(())
}

#[test]
fn test_invalid_file_values_are_rejected() -> anyhow::Result<()> {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile()?;
    writeln!(
        file,
        r#"
[server]
host = "localhost:8080"
"#
    )?;

    let err = load_config(file.path()).unwrap_err();
    assert!(err.to_string().contains("not a valid IP address"));

    Ok(())
}

#[test]
fn test_environment_overrides_defaults() -> anyhow::Result<()> {
    // Only this test touches the environment, and only this key
    std::env::set_var("DELIVERY__DATABASE__MAX_CONNECTIONS", "7");
    let result = load_config(Path::new("does-not-exist.toml"));
    std::env::remove_var("DELIVERY__DATABASE__MAX_CONNECTIONS");

    assert_eq!(result?.database.max_connections, 7);

    Ok(())
}
