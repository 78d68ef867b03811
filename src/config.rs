use std::path::PathBuf;

use thiserror::Error;

use crate::application::DEFAULT_MAX_ATTEMPTS;
use crate::io::{ExportFormat, DEFAULT_EXPORT_FILE};

pub const DEFAULT_PIN: &str = "1234";
pub const DEFAULT_CURRENCY: &str = "₹";
pub const PIN_LENGTH: usize = 4;

/// Validated session settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub pin: String,
    pub max_attempts: u32,
    pub export_path: PathBuf,
    pub export_format: ExportFormat,
    pub currency: String,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("PIN must be exactly {expected} characters, got {actual}")]
    InvalidPin { expected: usize, actual: usize },

    #[error("At least one PIN attempt must be allowed")]
    NoAttempts,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            pin: DEFAULT_PIN.to_string(),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            export_path: PathBuf::from(DEFAULT_EXPORT_FILE),
            export_format: ExportFormat::default(),
            currency: DEFAULT_CURRENCY.to_string(),
        }
    }
}

impl Config {
    pub fn validate(self) -> Result<Self, ConfigError> {
        let pin_len = self.pin.chars().count();
        if pin_len != PIN_LENGTH {
            return Err(ConfigError::InvalidPin {
                expected: PIN_LENGTH,
                actual: pin_len,
            });
        }
        if self.max_attempts == 0 {
            return Err(ConfigError::NoAttempts);
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default().validate().unwrap();
        assert_eq!(config.pin, "1234");
        assert_eq!(config.max_attempts, 3);
        assert_eq!(config.export_path, PathBuf::from("FinanceReport.txt"));
        assert_eq!(config.export_format, ExportFormat::Text);
    }

    #[test]
    fn test_pin_length_enforced() {
        let config = Config {
            pin: "12345".into(),
            ..Config::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidPin {
                expected: 4,
                actual: 5
            })
        );
    }

    #[test]
    fn test_zero_attempts_rejected() {
        let config = Config {
            max_attempts: 0,
            ..Config::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::NoAttempts));
    }
}
