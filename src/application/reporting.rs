use std::fmt::Write as _;

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::{format_cents, Cents, Ledger, Month};

pub const REPORT_TITLE: &str = "Expense Report";
pub const MONTHLY_SUMMARY_TITLE: &str = "Monthly Summary:";

/// Expense report built from a ledger, in snapshot order.
#[derive(Debug, Clone, Serialize)]
pub struct ExpenseReport {
    pub days: Vec<DaySummary>,
    pub months: Vec<MonthSummary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DaySummary {
    pub date: NaiveDate,
    pub categories: Vec<CategoryAmount>,
    pub total: Cents,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryAmount {
    pub category: String,
    pub amount: Cents,
}

#[derive(Debug, Clone, Serialize)]
pub struct MonthSummary {
    pub month: Month,
    pub total: Cents,
}

impl ExpenseReport {
    pub fn build(ledger: &Ledger) -> Self {
        let days = ledger
            .snapshot()
            .days()
            .map(|(date, day)| DaySummary {
                date,
                categories: day
                    .categories()
                    .map(|(category, amount)| CategoryAmount {
                        category: category.to_string(),
                        amount,
                    })
                    .collect(),
                total: ledger.daily_total(date).unwrap_or(0),
            })
            .collect();

        let months = ledger
            .totals()
            .monthly_totals()
            .map(|(month, total)| MonthSummary { month, total })
            .collect();

        Self { days, months }
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty() && self.months.is_empty()
    }

    /// Render the report as plain text, prefixing amounts with `currency`.
    pub fn render(&self, currency: &str) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = self.write_text(&mut out, currency);
        out
    }

    fn write_text(&self, out: &mut String, currency: &str) -> std::fmt::Result {
        writeln!(out, "{}", REPORT_TITLE)?;
        writeln!(out)?;

        for day in &self.days {
            writeln!(out, "{}:", day.date)?;
            for entry in &day.categories {
                writeln!(
                    out,
                    "  {}: {}{}",
                    entry.category,
                    currency,
                    format_cents(entry.amount)
                )?;
            }
            writeln!(out, "  Total: {}{}", currency, format_cents(day.total))?;
            writeln!(out)?;
        }

        writeln!(out, "{}", MONTHLY_SUMMARY_TITLE)?;
        for month in &self.months {
            writeln!(out, "  {}: {}{}", month.month, currency, format_cents(month.total))?;
        }

        Ok(())
    }
}
