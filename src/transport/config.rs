//! Connection settings.

use std::time::Duration;

/// Default backend host
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default backend port
pub const DEFAULT_PORT: u16 = 8080;

/// Transport configuration options.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TransportConfig {
    /// Backend host name or address.
    pub host: String,
    /// Backend port.
    pub port: u16,
    /// Optional write timeout. `None` blocks until the peer drains the socket.
    pub write_timeout: Option<Duration>,
    /// Disable Nagle's algorithm so small frames go out immediately.
    pub nodelay: bool,
}

impl TransportConfig {
    /// Configuration for `host:port` with the remaining options defaulted.
    #[must_use]
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Self::default()
        }
    }

    /// Endpoint rendered as `host:port`.
    #[must_use]
    pub fn endpoint(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_owned(),
            port: DEFAULT_PORT,
            write_timeout: None,
            nodelay: true,
        }
    }
}
