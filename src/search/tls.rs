//! Certificate pinning for clusters that ship self-signed HTTP certificates
//!
//! Elasticsearch prints the SHA-256 fingerprint of its generated HTTP CA on
//! first start. Pinning that digest lets the client trust the cluster without
//! installing the CA into the system store.

use crate::search::error::{SearchError, SearchResult};
use rustls::client::{ServerCertVerified, ServerCertVerifier};
use rustls::{Certificate, ClientConfig, ServerName};
use sha2::{Digest, Sha256};
use std::sync::Arc;
use std::time::SystemTime;

/// Accepts a server whose presented chain contains a certificate with the
/// expected SHA-256 digest.
#[derive(Debug, Clone)]
pub struct FingerprintVerifier {
    expected: [u8; 32],
}

impl FingerprintVerifier {
    /// Parse a hex fingerprint; colons, whitespace and case are ignored
    pub fn from_hex(fingerprint: &str) -> SearchResult<Self> {
        let cleaned: String = fingerprint
            .chars()
            .filter(|c| *c != ':' && !c.is_whitespace())
            .collect();

        let bytes = hex::decode(&cleaned).map_err(|e| {
            SearchError::InvalidConfiguration(format!("certificate fingerprint is not hex: {}", e))
        })?;

        let expected: [u8; 32] = bytes.try_into().map_err(|bytes: Vec<u8>| {
            SearchError::InvalidConfiguration(format!(
                "certificate fingerprint must be a SHA-256 digest (32 bytes), got {} bytes",
                bytes.len()
            ))
        })?;

        Ok(Self { expected })
    }

    /// Whether a DER-encoded certificate hashes to the pinned digest
    pub fn matches(&self, der: &[u8]) -> bool {
        Sha256::digest(der)[..] == self.expected[..]
    }
}

impl ServerCertVerifier for FingerprintVerifier {
    fn verify_server_cert(
        &self,
        end_entity: &Certificate,
        intermediates: &[Certificate],
        _server_name: &ServerName,
        _scts: &mut dyn Iterator<Item = &[u8]>,
        _ocsp_response: &[u8],
        _now: SystemTime,
    ) -> Result<ServerCertVerified, rustls::Error> {
        let pinned = std::iter::once(end_entity)
            .chain(intermediates)
            .any(|cert| self.matches(&cert.0));

        if pinned {
            Ok(ServerCertVerified::assertion())
        } else {
            tracing::warn!("Server certificate chain does not match the pinned fingerprint");
            Err(rustls::Error::General(
                "certificate fingerprint mismatch".to_string(),
            ))
        }
    }
}

/// TLS configuration trusting only the pinned certificate
pub fn pinned_client_config(fingerprint: &str) -> SearchResult<ClientConfig> {
    let verifier = FingerprintVerifier::from_hex(fingerprint)?;

    Ok(ClientConfig::builder()
        .with_safe_defaults()
        .with_custom_certificate_verifier(Arc::new(verifier))
        .with_no_client_auth())
}
