// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use std::io::Cursor;

use anyhow::Result;
use chrono::NaiveDate;
use expense_tracker::cli::{run_session, SessionOutcome};
use expense_tracker::config::Config;

/// Helper to parse a date string into NaiveDate
pub fn parse_date(date_str: &str) -> NaiveDate {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
}

/// Run a whole session over scripted input lines and capture what it printed.
pub fn run_script(config: &Config, lines: &[&str]) -> Result<(SessionOutcome, String)> {
    let mut input = lines.join("\n");
    input.push('\n');

    let mut output = Vec::new();
    let outcome = run_session(config, Cursor::new(input), &mut output)?;
    Ok((outcome, String::from_utf8(output)?))
}

/// Run a session over raw input bytes, for input that is not valid text.
pub fn run_bytes(config: &Config, input: &[u8]) -> Result<(SessionOutcome, String)> {
    let mut output = Vec::new();
    let outcome = run_session(config, Cursor::new(input), &mut output)?;
    Ok((outcome, String::from_utf8(output)?))
}

/// Test fixture: the March 2024 expenses used across scenarios
pub struct MarchExpenses;

impl MarchExpenses {
    pub const COMMANDS: [&'static str; 3] = [
        "add 100 -c Food -d 2024-03-01",
        "add 200 -c Rent -d 2024-03-01",
        "add 50 -c Food -d 2024-03-15",
    ];

    pub fn record(service: &mut expense_tracker::TrackerService) -> Result<()> {
        use expense_tracker::Category;

        service.add_expense("100", Category::Food, parse_date("2024-03-01"))?;
        service.add_expense("200", Category::Rent, parse_date("2024-03-01"))?;
        service.add_expense("50", Category::Food, parse_date("2024-03-15"))?;
        Ok(())
    }
}
