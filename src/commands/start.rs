use anyhow::Result;
use colored::Colorize;
use delivery_manager::{config, init_tracing, server};
use std::path::Path;
use tracing::info;

/// Execute the start command
///
/// Loads configuration, initializes logging from it, then serves until a
/// shutdown signal arrives.
pub async fn execute(config_path: &Path) -> Result<()> {
    let cfg = config::load_config(config_path)?;

    init_tracing(&cfg.server.log_level, &cfg.server.log_format);

    println!("{}", "Starting delivery manager...".green());
    info!(
        config = %config_path.display(),
        log_level = %cfg.server.log_level,
        log_format = %cfg.server.log_format,
        "Configuration loaded"
    );

    server::start_server(cfg).await?;

    Ok(())
}
