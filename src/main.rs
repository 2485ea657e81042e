use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Cli::parse();

    // Tracing is initialized by `start` once the configured level is known
    match args.get_command() {
        cli::Commands::Start => {
            commands::start::execute(&args.config).await?;
        }
        cli::Commands::Test => {
            commands::test::execute(&args.config)?;
        }
        cli::Commands::Quote {
            distance_km,
            rate_per_km,
            weight_kg,
            rate_per_kg,
            urgency,
        } => {
            commands::quote::execute(&distance_km, &rate_per_km, &weight_kg, &rate_per_kg, &urgency)?;
        }
        cli::Commands::Version => {
            println!("Delivery Manager v{}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
