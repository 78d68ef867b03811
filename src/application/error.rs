use std::path::PathBuf;

use chrono::NaiveDate;
use thiserror::Error;

use crate::domain::LedgerError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Expense not found for deletion: no {category} expense on {date}")]
    RecordNotFound { date: NaiveDate, category: String },

    #[error("Error exporting to {}: {}", .path.display(), .source)]
    ExportFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::RecordNotFound { date, category } => {
                AppError::RecordNotFound { date, category }
            }
            LedgerError::InvalidAmount(_) | LedgerError::Overflow => {
                AppError::InvalidAmount(err.to_string())
            }
        }
    }
}
