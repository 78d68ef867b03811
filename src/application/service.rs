use std::path::Path;

use chrono::NaiveDate;

use crate::domain::{format_cents, parse_cents, Category, Cents, Ledger, Month, ParseCentsError};
use crate::io::{ExportFormat, ExportSummary, Exporter};

use super::{AppError, ExpenseReport};

/// Application service over a single session's ledger.
/// This is what the shell (or any other front end) drives.
pub struct TrackerService {
    ledger: Ledger,
    currency: String,
}

/// Result of deleting an expense
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deletion {
    pub date: NaiveDate,
    pub category: Category,
    pub requested: Cents,
    /// Balance left on the record, `None` when the record was dropped.
    pub remaining: Option<Cents>,
}

impl TrackerService {
    pub fn new(currency: impl Into<String>) -> Self {
        Self {
            ledger: Ledger::new(),
            currency: currency.into(),
        }
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    /// Record an expense from the text the user typed.
    /// Returns the new balance for the date and category.
    pub fn add_expense(
        &mut self,
        amount: &str,
        category: Category,
        date: NaiveDate,
    ) -> Result<Cents, AppError> {
        let cents = parse_amount(amount)?;
        let balance = self.ledger.add(date, category.as_str(), cents)?;

        tracing::info!(
            %date,
            %category,
            amount = %format_cents(cents),
            balance = %format_cents(balance),
            "expense added"
        );
        Ok(balance)
    }

    /// Subtract an amount from a recorded expense.
    pub fn delete_expense(
        &mut self,
        amount: &str,
        category: Category,
        date: NaiveDate,
    ) -> Result<Deletion, AppError> {
        let cents = parse_amount(amount)?;
        let remaining = self
            .ledger
            .remove(date, category.as_str(), cents)
            .inspect_err(|err| tracing::warn!(%date, %category, "delete rejected: {err}"))?;

        tracing::info!(
            %date,
            %category,
            amount = %format_cents(cents),
            dropped = remaining.is_none(),
            "expense deleted"
        );
        Ok(Deletion {
            date,
            category,
            requested: cents,
            remaining,
        })
    }

    pub fn clear(&mut self) {
        self.ledger.clear();
        tracing::info!("all expenses cleared");
    }

    pub fn daily_total(&self, date: NaiveDate) -> Option<Cents> {
        self.ledger.daily_total(date)
    }

    pub fn monthly_total(&self, month: Month) -> Option<Cents> {
        self.ledger.monthly_total(month)
    }

    pub fn report(&self) -> ExpenseReport {
        ExpenseReport::build(&self.ledger)
    }

    pub fn render_report(&self) -> String {
        self.report().render(&self.currency)
    }

    /// Format an amount the way the report does.
    pub fn format_amount(&self, cents: Cents) -> String {
        format!("{}{}", self.currency, format_cents(cents))
    }

    /// Write the current ledger to `path`, overwriting any existing file.
    pub fn export(&self, path: &Path, format: ExportFormat) -> Result<ExportSummary, AppError> {
        Exporter::new(&self.ledger, &self.currency).write_file(path, format)
    }
}

/// Parse user-entered amount text. Negative amounts are rejected here so
/// the ledger only ever sees values it can store.
pub fn parse_amount(input: &str) -> Result<Cents, AppError> {
    let cents = parse_cents(input).map_err(|err| match err {
        ParseCentsError::Empty => AppError::InvalidAmount(err.to_string()),
        _ => AppError::InvalidAmount(format!("'{}' ({})", input.trim(), err)),
    })?;
    if cents < 0 {
        return Err(AppError::InvalidAmount(format!(
            "'{}' (amount must not be negative)",
            input.trim()
        )));
    }
    Ok(cents)
}
