//! TLS utilities for Sirius gRPC connections.
//!
//! Sirius endpoints are public TLS servers, so the default is the system trust
//! store. A custom CA (and optionally a client identity for mTLS) can be
//! supplied for private deployments.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use tonic::transport::{Certificate, ClientTlsConfig, Identity};

use crate::error::{Result, SiriusError};

/// Client TLS configuration backed by PEM files.
#[derive(Debug, Clone)]
pub struct TlsClientConfig {
    /// Path to CA certificate for server verification
    pub ca_cert_path: PathBuf,
    /// Optional path to client certificate (mTLS)
    pub client_cert_path: Option<PathBuf>,
    /// Optional path to client private key (mTLS)
    pub client_key_path: Option<PathBuf>,
}

impl TlsClientConfig {
    pub fn with_ca_cert(ca_cert_path: impl Into<PathBuf>) -> Self {
        Self {
            ca_cert_path: ca_cert_path.into(),
            client_cert_path: None,
            client_key_path: None,
        }
    }
}

fn read_pem(path: &Path, what: &str) -> Result<Vec<u8>> {
    std::fs::read(path).map_err(|e| {
        SiriusError::Configuration(format!("Failed to read {} {:?}: {}", what, path, e))
    })
}

/// Check that a PEM file holds at least one certificate.
fn check_certs(path: &Path) -> Result<()> {
    let file = File::open(path).map_err(|e| {
        SiriusError::Configuration(format!("Failed to open certificate file {:?}: {}", path, e))
    })?;
    let mut reader = BufReader::new(file);
    let certs: std::result::Result<Vec<_>, _> = rustls_pemfile::certs(&mut reader).collect();
    let certs = certs.map_err(|e| {
        SiriusError::Configuration(format!("Failed to parse certificates from {:?}: {}", path, e))
    })?;
    if certs.is_empty() {
        return Err(SiriusError::Configuration(format!(
            "No certificates found in {:?}",
            path
        )));
    }
    Ok(())
}

/// Check that a PEM file holds a private key.
fn check_private_key(path: &Path) -> Result<()> {
    let file = File::open(path).map_err(|e| {
        SiriusError::Configuration(format!("Failed to open private key file {:?}: {}", path, e))
    })?;
    let mut reader = BufReader::new(file);
    rustls_pemfile::private_key(&mut reader)
        .map_err(|e| {
            SiriusError::Configuration(format!("Failed to parse private key from {:?}: {}", path, e))
        })?
        .ok_or_else(|| SiriusError::Configuration(format!("No private key found in {:?}", path)))?;
    Ok(())
}

/// TLS config trusting the system roots (tonic `tls-roots`), verifying `domain`.
pub fn system_roots_tls(domain: &str) -> ClientTlsConfig {
    ClientTlsConfig::new().domain_name(domain)
}

/// Create a tonic client TLS config from PEM files, verifying `domain`.
///
/// The files are parsed up front so a bad path or corrupt PEM fails here
/// rather than on the first handshake.
pub fn create_tonic_client_tls(config: &TlsClientConfig, domain: &str) -> Result<ClientTlsConfig> {
    check_certs(&config.ca_cert_path)?;
    let ca_cert = read_pem(&config.ca_cert_path, "CA certificate")?;

    let mut tls_config = ClientTlsConfig::new()
        .domain_name(domain)
        .ca_certificate(Certificate::from_pem(ca_cert));

    match (&config.client_cert_path, &config.client_key_path) {
        (Some(cert_path), Some(key_path)) => {
            check_certs(cert_path)?;
            check_private_key(key_path)?;
            let client_cert = read_pem(cert_path, "client certificate")?;
            let client_key = read_pem(key_path, "client key")?;
            tls_config = tls_config.identity(Identity::from_pem(client_cert, client_key));
        }
        (None, None) => {}
        _ => {
            return Err(SiriusError::Configuration(
                "Client certificate and key must be provided together".to_string(),
            ))
        }
    }

    Ok(tls_config)
}
