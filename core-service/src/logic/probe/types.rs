//! Probe Types
//!
//! Output shapes of the HTTP and certificate probes.
//! No network code here, only data structures.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Sentinel for "certificate could not be evaluated"
pub const DAYS_LEFT_UNKNOWN: i64 = -1;

// ============================================================================
// HTTP PROBE
// ============================================================================

/// Completed HTTP exchange
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpOutcome {
    pub status_code: u16,
    /// Wall time from request start to end of body, in milliseconds
    pub response_time_ms: u64,
    /// URL after following redirects
    pub final_url: String,
    /// `Server` response header, "Unknown" when absent
    pub server_header: String,
    /// Response header names as received
    pub header_names: Vec<String>,
    /// Response body size in bytes
    pub content_length: u64,
}

impl HttpOutcome {
    /// Case-insensitive header presence check
    pub fn has_header(&self, name: &str) -> bool {
        self.header_names.iter().any(|h| h.eq_ignore_ascii_case(name))
    }
}

/// Why the HTTP probe produced no response
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConnectivityError {
    /// Connect/DNS failure: nothing answered
    #[error("connection refused: {detail}")]
    Refused { detail: String },

    #[error("timed out after {after_secs}s")]
    Timeout { after_secs: u64 },

    #[error("TLS handshake failed: {detail}")]
    TlsHandshake { detail: String },

    /// Redirect loops, protocol errors, anything else
    #[error("{detail}")]
    Other { detail: String },
}

// ============================================================================
// CERTIFICATE PROBE
// ============================================================================

/// Certificate health as seen by the certificate probe
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertOutcome {
    pub valid: bool,
    /// Floored days until expiry, may be negative; -1 when not evaluated
    pub days_left: i64,
    pub expires: Option<DateTime<Utc>>,
    /// Issuer organization name
    pub issuer: Option<String>,
    /// Subject common name
    pub subject: Option<String>,
    pub error: Option<String>,
}

impl CertOutcome {
    /// Fold a probe failure into an invalid outcome
    pub fn from_failure(err: &CertificateError) -> Self {
        Self {
            valid: false,
            days_left: DAYS_LEFT_UNKNOWN,
            expires: None,
            issuer: None,
            subject: None,
            error: Some(err.to_string()),
        }
    }
}

/// Certificate probe failures. Display text is what ends up in threat descriptions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CertificateError {
    #[error("SSL connection timeout")]
    Timeout,

    #[error("SSL Error: {0}")]
    Tls(String),

    #[error("{0}")]
    Parse(String),

    #[error("{0}")]
    Other(String),
}

// ============================================================================
// PROBE RESULT
// ============================================================================

/// Everything learned about one domain in one cycle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeResult {
    pub domain: String,
    pub timestamp: DateTime<Utc>,
    pub http: Option<HttpOutcome>,
    pub http_error: Option<ConnectivityError>,
    pub certificate: Option<CertOutcome>,
}

impl ProbeResult {
    /// Empty result: no rule group applies until outcomes are attached
    pub fn new(domain: &str, timestamp: DateTime<Utc>) -> Self {
        Self {
            domain: domain.to_string(),
            timestamp,
            http: None,
            http_error: None,
            certificate: None,
        }
    }

    /// Attach the HTTP probe outcome
    pub fn with_http(mut self, outcome: Result<HttpOutcome, ConnectivityError>) -> Self {
        match outcome {
            Ok(http) => {
                self.http = Some(http);
                self.http_error = None;
            }
            Err(err) => {
                self.http = None;
                self.http_error = Some(err);
            }
        }
        self
    }

    /// Attach the certificate probe outcome; failures become invalid outcomes
    pub fn with_certificate(mut self, outcome: Result<CertOutcome, CertificateError>) -> Self {
        self.certificate = Some(match outcome {
            Ok(cert) => cert,
            Err(err) => CertOutcome::from_failure(&err),
        });
        self
    }

    /// Response body size, 0 when the site was unreachable
    pub fn payload_size(&self) -> u64 {
        self.http.as_ref().map_or(0, |h| h.content_length)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_cert_failure_uses_sentinel() {
        let result = ProbeResult::new("example.com", ts())
            .with_certificate(Err(CertificateError::Timeout));
        let cert = result.certificate.unwrap();
        assert!(!cert.valid);
        assert_eq!(cert.days_left, DAYS_LEFT_UNKNOWN);
        assert_eq!(cert.error.as_deref(), Some("SSL connection timeout"));
    }

    #[test]
    fn test_tls_error_text() {
        let err = CertificateError::Tls("invalid peer certificate: UnknownIssuer".into());
        assert_eq!(err.to_string(), "SSL Error: invalid peer certificate: UnknownIssuer");
    }

    #[test]
    fn test_header_lookup_ignores_case() {
        let http = HttpOutcome {
            status_code: 200,
            response_time_ms: 10,
            final_url: "https://example.com/".into(),
            server_header: "nginx".into(),
            header_names: vec!["strict-transport-security".into()],
            content_length: 0,
        };
        assert!(http.has_header("Strict-Transport-Security"));
        assert!(!http.has_header("X-Frame-Options"));
    }

    #[test]
    fn test_payload_size_zero_when_unreachable() {
        let result = ProbeResult::new("example.com", ts())
            .with_http(Err(ConnectivityError::Timeout { after_secs: 15 }));
        assert_eq!(result.payload_size(), 0);
        assert!(result.http.is_none());
    }
}
