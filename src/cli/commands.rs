use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use crate::domain::{Category, Month};
use crate::io::ExportFormat;

/// One line typed at the tracker prompt.
#[derive(Parser, Debug)]
#[command(multicall = true, about = None, long_about = None)]
pub struct ShellLine {
    #[command(subcommand)]
    pub command: ShellCommand,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum ShellCommand {
    /// Add an expense
    Add {
        /// Amount to add (e.g., "50.00" or "50")
        #[arg(allow_hyphen_values = true)]
        amount: String,

        /// Category: Food, Rent, Utilities, Entertainment, Transport, Other
        #[arg(short, long, default_value_t = Category::Food)]
        category: Category,

        /// Date of the expense (YYYY-MM-DD, defaults to today)
        #[arg(short, long)]
        date: Option<NaiveDate>,
    },

    /// Subtract an amount from a recorded expense
    #[command(alias = "remove")]
    Delete {
        /// Amount to delete (e.g., "50.00" or "50")
        #[arg(allow_hyphen_values = true)]
        amount: String,

        /// Category the expense was recorded under
        #[arg(short, long, default_value_t = Category::Food)]
        category: Category,

        /// Date of the expense (YYYY-MM-DD, defaults to today)
        #[arg(short, long)]
        date: Option<NaiveDate>,
    },

    /// Show the expense report
    Show,

    /// Show the total for one day
    Day {
        /// Date (YYYY-MM-DD)
        date: NaiveDate,
    },

    /// Show the total for one month
    Month {
        /// Month (YYYY-MM)
        month: Month,
    },

    /// List the expense categories
    Categories,

    /// Export the report to a file
    Export {
        /// Output file (defaults to the configured export path)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format (defaults to the configured format)
        #[arg(short, long, value_enum)]
        format: Option<ExportFormat>,
    },

    /// Clear all recorded data
    Clear {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Leave the tracker
    #[command(alias = "exit")]
    Quit,
}

impl ShellCommand {
    /// Parse a prompt line using shell quoting rules.
    pub fn parse_line(line: &str) -> Result<Self, CommandParseError> {
        let words = shell_words::split(line)?;
        let parsed = ShellLine::try_parse_from(words)?;
        Ok(parsed.command)
    }
}

#[derive(thiserror::Error, Debug)]
pub enum CommandParseError {
    #[error("Could not split command line: {0}")]
    Quoting(#[from] shell_words::ParseError),

    #[error("{0}")]
    Usage(#[from] clap::Error),
}
