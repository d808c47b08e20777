//! Configuration validation.
//!
//! Serde handles the syntactic side; this module checks value ranges and
//! emptiness. Validation returns every error found, not just the first.

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::{BodyConfig, ConnectionConfig};

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} must not be empty")]
    Empty { field: &'static str },

    #[error("{field} must be between 1 and 65535")]
    PortOutOfRange { field: &'static str },

    #[error("{field} is not a valid socket address: {value}")]
    InvalidAddress { field: &'static str, value: String },
}

/// Validate the connection settings the bot is about to use.
pub fn validate_connection(config: &ConnectionConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.host.trim().is_empty() {
        errors.push(ValidationError::Empty { field: "bot.host" });
    }
    if config.port == 0 {
        errors.push(ValidationError::PortOutOfRange { field: "bot.port" });
    }
    if config.username.trim().is_empty() {
        errors.push(ValidationError::Empty {
            field: "bot.username",
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validate a whole service configuration.
pub fn validate_config(config: &BodyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = validate_connection(&config.bot).err().unwrap_or_default();

    if config.http.host.trim().is_empty() {
        errors.push(ValidationError::Empty { field: "http.host" });
    }
    if config.http.port == 0 {
        errors.push(ValidationError::PortOutOfRange { field: "http.port" });
    }
    if let Some(addr) = &config.observability.metrics_address {
        if addr.parse::<SocketAddr>().is_err() {
            errors.push(ValidationError::InvalidAddress {
                field: "observability.metrics_address",
                value: addr.clone(),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(validate_config(&BodyConfig::default()).is_ok());
    }

    #[test]
    fn collects_all_connection_errors() {
        let config = ConnectionConfig {
            host: "  ".into(),
            port: 0,
            username: String::new(),
        };
        let errors = validate_connection(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors.contains(&ValidationError::PortOutOfRange { field: "bot.port" }));
    }

    #[test]
    fn rejects_bad_metrics_address() {
        let mut config = BodyConfig::default();
        config.observability.metrics_address = Some("not-an-addr".into());
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![ValidationError::InvalidAddress {
                field: "observability.metrics_address",
                value: "not-an-addr".into(),
            }]
        );
    }
}
