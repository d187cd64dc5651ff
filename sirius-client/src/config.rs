//! Client configuration

use sirius_core::{RegionTable, TlsClientConfig};
use std::path::PathBuf;
use std::time::Duration;

/// How the channel to Sirius is secured
#[derive(Debug, Clone, Default)]
pub enum TlsMode {
    /// TLS verified against the system trust store
    #[default]
    SystemRoots,
    /// TLS verified against a custom CA, optionally with a client identity
    Custom(TlsClientConfig),
    /// Plaintext HTTP/2 (local development and tests only)
    Disabled,
}

/// Configuration for [`SiriusClient`](crate::SiriusClient)
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Connection timeout
    pub connect_timeout: Duration,
    /// Per-call timeout; none by default so long transfers are not cut off
    pub request_timeout: Option<Duration>,
    /// HTTP/2 keep-alive interval
    pub keep_alive_interval: Duration,
    /// Maximum encoded/decoded message size in bytes
    pub max_message_size: usize,
    /// Transport security
    pub tls: TlsMode,
    /// Region label -> endpoint table
    pub regions: RegionTable,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: None,
            keep_alive_interval: Duration::from_secs(60),
            max_message_size: 4 * 1024 * 1024, // 4 MB
            tls: TlsMode::SystemRoots,
            regions: RegionTable::builtin(),
        }
    }
}

impl ClientConfig {
    /// Create config from environment variables
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(secs) = env_u64("SIRIUS_CONNECT_TIMEOUT_SECS") {
            config.connect_timeout = Duration::from_secs(secs);
        }

        if let Some(secs) = env_u64("SIRIUS_REQUEST_TIMEOUT_SECS") {
            config.request_timeout = Some(Duration::from_secs(secs));
        }

        if let Ok(ca_cert) = std::env::var("SIRIUS_CA_CERT") {
            config.tls = TlsMode::Custom(TlsClientConfig {
                ca_cert_path: PathBuf::from(ca_cert),
                client_cert_path: std::env::var("SIRIUS_CLIENT_CERT").ok().map(PathBuf::from),
                client_key_path: std::env::var("SIRIUS_CLIENT_KEY").ok().map(PathBuf::from),
            });
        }

        config
    }

    /// Plaintext config, for talking to a local server
    pub fn insecure() -> Self {
        Self {
            tls: TlsMode::Disabled,
            ..Self::default()
        }
    }

    pub fn with_regions(mut self, regions: RegionTable) -> Self {
        self.regions = regions;
        self
    }
}

fn env_u64(key: &str) -> Option<u64> {
    std::env::var(key).ok().and_then(|v| v.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.connect_timeout, Duration::from_secs(10));
        assert!(config.request_timeout.is_none());
        assert!(matches!(config.tls, TlsMode::SystemRoots));
        assert!(config.max_message_size > sirius_core::MAX_CHUNK_SIZE);
        assert!(config.regions.resolve("us-west1").is_ok());
    }

    #[test]
    fn test_insecure_config() {
        let config = ClientConfig::insecure();
        assert!(matches!(config.tls, TlsMode::Disabled));
    }

    #[test]
    fn test_with_regions() {
        let config = ClientConfig::default()
            .with_regions(RegionTable::builtin().with_region("local", "localhost:50051"));
        assert_eq!(config.regions.resolve("local").unwrap(), "localhost:50051");
    }
}
