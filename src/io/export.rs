use std::collections::BTreeMap;
use std::fmt;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, Utc};
use clap::ValueEnum;
use serde::Serialize;

use crate::application::{AppError, ExpenseReport};
use crate::domain::{format_cents, Cents, Ledger, Month, Snapshot};

/// File name the report is written to when no path is given.
pub const DEFAULT_EXPORT_FILE: &str = "FinanceReport.txt";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ExportFormat {
    /// The rendered text report
    #[default]
    Text,
    /// One row per expense record
    Csv,
    /// Records and totals as a JSON document
    Json,
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Text => "text",
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Full ledger dump for the JSON export.
#[derive(Debug, Serialize)]
pub struct LedgerExport<'a> {
    pub version: &'static str,
    pub exported_at: DateTime<Utc>,
    pub records: Snapshot<'a>,
    pub daily_totals: BTreeMap<NaiveDate, Cents>,
    pub monthly_totals: BTreeMap<Month, Cents>,
}

/// What an export wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    pub path: PathBuf,
    pub format: ExportFormat,
    pub days: usize,
    pub records: usize,
}

/// Writes ledger contents out in the supported formats.
pub struct Exporter<'a> {
    ledger: &'a Ledger,
    currency: &'a str,
}

impl<'a> Exporter<'a> {
    pub fn new(ledger: &'a Ledger, currency: &'a str) -> Self {
        Self { ledger, currency }
    }

    /// Write the rendered text report, byte for byte what the report view shows.
    pub fn export_text<W: Write>(&self, mut writer: W) -> io::Result<()> {
        let text = ExpenseReport::build(self.ledger).render(self.currency);
        writer.write_all(text.as_bytes())?;
        writer.flush()
    }

    /// Write one CSV row per expense record. Returns the number of rows.
    pub fn export_csv<W: Write>(&self, writer: W) -> Result<usize, csv::Error> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        csv_writer.write_record(["date", "month", "category", "amount"])?;

        let mut count = 0;
        for (date, day) in self.ledger.snapshot().days() {
            let month = Month::of(date).to_string();
            for (category, amount) in day.categories() {
                csv_writer.write_record([
                    date.to_string().as_str(),
                    month.as_str(),
                    category,
                    format_cents(amount).as_str(),
                ])?;
                count += 1;
            }
        }

        csv_writer.flush()?;
        Ok(count)
    }

    /// Write records and both roll-ups as pretty-printed JSON.
    pub fn export_json<W: Write>(&self, mut writer: W) -> io::Result<()> {
        let totals = self.ledger.totals();
        let export = LedgerExport {
            version: env!("CARGO_PKG_VERSION"),
            exported_at: Utc::now(),
            records: self.ledger.snapshot(),
            daily_totals: totals.daily_totals().collect(),
            monthly_totals: totals.monthly_totals().collect(),
        };

        serde_json::to_writer_pretty(&mut writer, &export)?;
        writer.write_all(b"\n")?;
        writer.flush()
    }

    pub fn export<W: Write>(&self, format: ExportFormat, writer: W) -> io::Result<()> {
        match format {
            ExportFormat::Text => self.export_text(writer),
            ExportFormat::Csv => self.export_csv(writer).map(|_| ()).map_err(io::Error::from),
            ExportFormat::Json => self.export_json(writer),
        }
    }

    /// Export to `path`, replacing any existing file.
    pub fn write_file(&self, path: &Path, format: ExportFormat) -> Result<ExportSummary, AppError> {
        let to_failure = |source: io::Error| AppError::ExportFailure {
            path: path.to_path_buf(),
            source,
        };

        let file = File::create(path).map_err(to_failure)?;
        let mut writer = BufWriter::new(file);
        self.export(format, &mut writer).map_err(to_failure)?;
        writer.flush().map_err(to_failure)?;

        let snapshot = self.ledger.snapshot();
        let summary = ExportSummary {
            path: path.to_path_buf(),
            format,
            days: snapshot.len(),
            records: snapshot.days().map(|(_, day)| day.len()).sum(),
        };
        tracing::info!(
            path = %summary.path.display(),
            format = %format,
            days = summary.days,
            records = summary.records,
            "report exported"
        );
        Ok(summary)
    }
}
