//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the body
//! service. All types derive Serde traits so a loaded configuration can be
//! logged or dumped as JSON.

use serde::{Deserialize, Serialize};

/// Default game server host.
pub const DEFAULT_MC_HOST: &str = "localhost";
/// Default game server port.
pub const DEFAULT_MC_PORT: u16 = 25565;
/// Default bot username.
pub const DEFAULT_MC_USERNAME: &str = "agent";
/// Default HTTP bind host.
pub const DEFAULT_HTTP_HOST: &str = "127.0.0.1";
/// Default HTTP bind port.
pub const DEFAULT_HTTP_PORT: u16 = 3000;

/// Root configuration for the body service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct BodyConfig {
    /// HTTP listener configuration.
    pub http: HttpConfig,

    /// Game server connection used by the bot.
    pub bot: ConnectionConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Process lifecycle settings.
    pub lifecycle: LifecycleConfig,
}

/// HTTP listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Bind host (e.g., "127.0.0.1").
    pub host: String,

    /// Bind port.
    pub port: u16,

    /// Maximum accepted request body in bytes.
    pub body_limit_bytes: usize,
}

impl HttpConfig {
    /// `host:port` string suitable for binding.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HTTP_HOST.to_string(),
            port: DEFAULT_HTTP_PORT,
            body_limit_bytes: 100 * 1024,
        }
    }
}

/// Connection settings for the game server.
///
/// Immutable once a connection attempt starts: the manager clones the merged
/// value into the connector and never touches it again.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ConnectionConfig {
    /// Game server host.
    pub host: String,

    /// Game server port (1-65535).
    pub port: u16,

    /// Username the bot logs in with.
    pub username: String,
}

impl ConnectionConfig {
    /// Apply call-site overrides on top of this configuration.
    pub fn merged(&self, overrides: &ConnectionOverrides) -> Self {
        Self {
            host: overrides.host.clone().unwrap_or_else(|| self.host.clone()),
            port: overrides.port.unwrap_or(self.port),
            username: overrides
                .username
                .clone()
                .unwrap_or_else(|| self.username.clone()),
        }
    }
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_MC_HOST.to_string(),
            port: DEFAULT_MC_PORT,
            username: DEFAULT_MC_USERNAME.to_string(),
        }
    }
}

/// Partial connection configuration supplied at the call site.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ConnectionOverrides {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub username: Option<String>,
}

impl ConnectionOverrides {
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Default tracing filter when `RUST_LOG` is unset.
    pub log_filter: String,

    /// Prometheus exporter address; metrics export is disabled when unset.
    pub metrics_address: Option<String>,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_filter: "bot_body=info,tower_http=info".to_string(),
            metrics_address: None,
        }
    }
}

/// Process lifecycle configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LifecycleConfig {
    /// Install SIGINT/SIGTERM handlers that disconnect the bot and stop the
    /// server. Test harnesses turn this off.
    pub handle_signals: bool,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            handle_signals: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = BodyConfig::default();
        assert_eq!(config.bot.host, "localhost");
        assert_eq!(config.bot.port, 25565);
        assert_eq!(config.bot.username, "agent");
        assert_eq!(config.http.bind_address(), "127.0.0.1:3000");
        assert!(config.lifecycle.handle_signals);
        assert!(config.observability.metrics_address.is_none());
    }

    #[test]
    fn overrides_replace_only_given_fields() {
        let base = ConnectionConfig::default();
        let merged = base.merged(
            &ConnectionOverrides::default()
                .username("custom-bot")
                .port(12345),
        );
        assert_eq!(
            merged,
            ConnectionConfig {
                host: "localhost".into(),
                port: 12345,
                username: "custom-bot".into(),
            }
        );
    }

    #[test]
    fn empty_overrides_keep_base() {
        let base = ConnectionConfig {
            host: "mc.example.net".into(),
            port: 25570,
            username: "miner".into(),
        };
        assert_eq!(base.merged(&ConnectionOverrides::default()), base);
    }
}
