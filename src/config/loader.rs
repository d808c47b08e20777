//! Configuration loading from the process environment.

use thiserror::Error;

use crate::config::schema::{BodyConfig, DEFAULT_HTTP_PORT, DEFAULT_MC_PORT};
use crate::config::validation::{validate_config, ValidationError};

pub const ENV_MC_HOST: &str = "MC_HOST";
pub const ENV_MC_PORT: &str = "MC_PORT";
pub const ENV_MC_USERNAME: &str = "MC_USERNAME";
pub const ENV_HTTP_HOST: &str = "BOT_HOST";
pub const ENV_HTTP_PORT: &str = "BOT_PORT";
pub const ENV_METRICS_ADDR: &str = "BOT_METRICS_ADDR";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} is not a valid port: {value:?}")]
    InvalidPort { name: &'static str, value: String },

    #[error("validation failed: {}", join(.0))]
    Validation(Vec<ValidationError>),
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from the process environment.
pub fn load_from_env() -> Result<BodyConfig, ConfigError> {
    load_with(|name| std::env::var(name).ok())
}

/// Load configuration through an arbitrary variable lookup.
///
/// Unset or empty variables fall back to defaults. `MC_PORT` is lenient: a
/// value that is not a usable port falls back to 25565 with a warning.
/// `BOT_PORT` is strict because a listener on the wrong port is worse than
/// not starting.
pub fn load_with<F>(lookup: F) -> Result<BodyConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
    let mut config = BodyConfig::default();

    if let Some(host) = var(ENV_MC_HOST) {
        config.bot.host = host;
    }
    if let Some(raw) = var(ENV_MC_PORT) {
        config.bot.port = match parse_port(&raw) {
            Some(port) => port,
            None => {
                tracing::warn!(
                    variable = ENV_MC_PORT,
                    value = %raw,
                    fallback = DEFAULT_MC_PORT,
                    "Ignoring unusable port"
                );
                DEFAULT_MC_PORT
            }
        };
    }
    if let Some(username) = var(ENV_MC_USERNAME) {
        config.bot.username = username;
    }

    if let Some(host) = var(ENV_HTTP_HOST) {
        config.http.host = host;
    }
    config.http.port = match var(ENV_HTTP_PORT) {
        Some(raw) => parse_port(&raw).ok_or(ConfigError::InvalidPort {
            name: ENV_HTTP_PORT,
            value: raw,
        })?,
        None => DEFAULT_HTTP_PORT,
    };

    config.observability.metrics_address = var(ENV_METRICS_ADDR);

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

fn parse_port(raw: &str) -> Option<u16> {
    raw.trim().parse::<u16>().ok().filter(|port| *port != 0)
}
