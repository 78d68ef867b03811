use std::io;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;

use crate::application::DEFAULT_MAX_ATTEMPTS;
use crate::config::{Config, DEFAULT_CURRENCY, DEFAULT_PIN};
use crate::io::{ExportFormat, DEFAULT_EXPORT_FILE};
use crate::logging;

mod commands;
mod shell;

pub use commands::*;
pub use shell::*;

/// Expense Tracker - PIN-gated daily and monthly expense totals
#[derive(Parser, Debug)]
#[command(name = "expense-tracker")]
#[command(about = "Track expenses by day and category, with daily and monthly totals")]
#[command(version)]
pub struct Cli {
    /// PIN required to open the tracker
    #[arg(long, env = "EXPENSE_TRACKER_PIN", default_value = DEFAULT_PIN, hide_env_values = true)]
    pub pin: String,

    /// PIN attempts allowed before the tracker exits
    #[arg(long, env = "EXPENSE_TRACKER_MAX_ATTEMPTS", default_value_t = DEFAULT_MAX_ATTEMPTS)]
    pub max_attempts: u32,

    /// File the report is exported to
    #[arg(short, long, env = "EXPENSE_TRACKER_OUTPUT", default_value = DEFAULT_EXPORT_FILE)]
    pub output: PathBuf,

    /// Export format
    #[arg(short, long, env = "EXPENSE_TRACKER_FORMAT", value_enum, default_value_t = ExportFormat::Text)]
    pub format: ExportFormat,

    /// Currency symbol shown in front of amounts
    #[arg(long, env = "EXPENSE_TRACKER_CURRENCY", default_value = DEFAULT_CURRENCY)]
    pub currency: String,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn config(&self) -> Result<Config> {
        let config = Config {
            pin: self.pin.clone(),
            max_attempts: self.max_attempts,
            export_path: self.output.clone(),
            export_format: self.format,
            currency: self.currency.clone(),
        };
        config.validate().context("Invalid configuration")
    }

    pub fn run(self) -> Result<()> {
        logging::init_tracing(self.verbose);
        let config = self.config()?;

        let stdin = io::stdin();
        let outcome = run_session(&config, stdin.lock(), io::stdout())?;
        if outcome == SessionOutcome::Locked {
            bail!("PIN not accepted after {} attempts", config.max_attempts);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::try_parse_from(["expense-tracker"]).unwrap();
        let config = cli.config().unwrap();

        assert_eq!(config.max_attempts, 3);
        assert_eq!(config.export_path, PathBuf::from("FinanceReport.txt"));
        assert_eq!(config.export_format, ExportFormat::Text);
        assert_eq!(config.currency, "₹");
    }

    #[test]
    fn test_cli_overrides() {
        let cli = Cli::try_parse_from([
            "expense-tracker",
            "--pin",
            "9876",
            "--max-attempts",
            "5",
            "-o",
            "out.json",
            "-f",
            "json",
            "--currency",
            "$",
        ])
        .unwrap();
        let config = cli.config().unwrap();

        assert_eq!(config.pin, "9876");
        assert_eq!(config.max_attempts, 5);
        assert_eq!(config.export_path, PathBuf::from("out.json"));
        assert_eq!(config.export_format, ExportFormat::Json);
        assert_eq!(config.currency, "$");
    }

    #[test]
    fn test_cli_rejects_bad_pin() {
        let cli = Cli::try_parse_from(["expense-tracker", "--pin", "12"]).unwrap();
        assert!(cli.config().is_err());
    }
}
