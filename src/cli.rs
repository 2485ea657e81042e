use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "delivery-manager", version, about = "Delivery Manager")]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config.toml", global = true)]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start the HTTP server (default)
    Start,

    /// Test configuration file validity
    Test,

    /// Price a shipment and print the cost breakdown
    Quote {
        /// Distance in kilometres
        #[arg(long, allow_hyphen_values = true)]
        distance_km: String,

        /// Price per kilometre
        #[arg(long, allow_hyphen_values = true)]
        rate_per_km: String,

        /// Weight in kilograms
        #[arg(long, allow_hyphen_values = true)]
        weight_kg: String,

        /// Price per kilogram
        #[arg(long, allow_hyphen_values = true)]
        rate_per_kg: String,

        /// normal or urgent
        #[arg(short, long, default_value = "normal")]
        urgency: String,
    },

    /// Show version information
    Version,
}

impl Cli {
    /// Get the command to execute, defaulting to Start if none provided
    pub fn get_command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Start)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_command_is_start() {
        let cli = Cli::try_parse_from(["delivery-manager"]).unwrap();
        assert!(matches!(cli.get_command(), Commands::Start));
        assert_eq!(cli.config, PathBuf::from("config.toml"));
    }

    #[test]
    fn test_cli_parsing_global_config() {
        let cli = Cli::try_parse_from(["delivery-manager", "test", "-c", "/etc/delivery.toml"])
            .unwrap();
        assert!(matches!(cli.get_command(), Commands::Test));
        assert_eq!(cli.config, PathBuf::from("/etc/delivery.toml"));
    }

    #[test]
    fn test_cli_parsing_quote() {
        let args = [
            "delivery-manager",
            "quote",
            "--distance-km",
            "10",
            "--rate-per-km",
            "2",
            "--weight-kg",
            "5",
            "--rate-per-kg",
            "3",
            "--urgency",
            "urgent",
        ];
        let cli = Cli::try_parse_from(args).unwrap();

        match cli.get_command() {
            Commands::Quote {
                distance_km,
                urgency,
                ..
            } => {
                assert_eq!(distance_km, "10");
                assert_eq!(urgency, "urgent");
            }
            _ => panic!("Expected Quote command"),
        }
    }

    #[test]
    fn test_cli_quote_defaults_to_normal() {
        let args = [
            "delivery-manager",
            "quote",
            "--distance-km",
            "10",
            "--rate-per-km",
            "2",
            "--weight-kg",
            "5",
            "--rate-per-kg",
            "3",
        ];
        let cli = Cli::try_parse_from(args).unwrap();
        assert!(matches!(
            cli.get_command(),
            Commands::Quote { urgency, .. } if urgency == "normal"
        ));
    }

    #[test]
    fn test_cli_quote_accepts_negative_amounts() {
        // Rejected later by the pricing engine, not by the argument parser
        let args = [
            "delivery-manager",
            "quote",
            "--distance-km",
            "-5",
            "--rate-per-km",
            "2",
            "--weight-kg",
            "5",
            "--rate-per-kg",
            "3",
        ];
        let cli = Cli::try_parse_from(args).unwrap();
        assert!(matches!(
            cli.get_command(),
            Commands::Quote { distance_km, .. } if distance_km == "-5"
        ));
    }

    #[test]
    fn test_cli_quote_requires_all_amounts() {
        let args = ["delivery-manager", "quote", "--distance-km", "10"];
        assert!(Cli::try_parse_from(args).is_err());
    }
}
