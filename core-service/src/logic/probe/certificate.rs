//! Certificate Probe
//!
//! TLS handshake against `{domain}:443` using the platform trust store,
//! then reads expiry, issuer and subject from the leaf certificate.

use super::clock::{days_until, Clock};
use super::types::{CertOutcome, CertificateError};
use crate::constants;
use chrono::{DateTime, Utc};
use rustls::pki_types::ServerName;
use rustls::{ClientConfig, RootCertStore};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio_rustls::TlsConnector;

/// Certificate probe with a fixed trust store and timeout
pub struct CertificateProbe {
    connector: TlsConnector,
    timeout: Duration,
    port: u16,
}

impl CertificateProbe {
    /// Probe using the platform default trust store
    pub fn new(timeout: Duration) -> Result<Self, rustls::Error> {
        let native = rustls_native_certs::load_native_certs();
        for err in &native.errors {
            log::warn!("Trust store: {}", err);
        }

        let mut roots = RootCertStore::empty();
        let (added, ignored) = roots.add_parsable_certificates(native.certs);
        log::debug!("Loaded {} trust anchors ({} ignored)", added, ignored);
        if added == 0 {
            log::warn!("No trust anchors loaded - every certificate will be reported invalid");
        }

        Self::with_roots(roots, timeout)
    }

    /// Probe using an explicit trust store
    pub fn with_roots(roots: RootCertStore, timeout: Duration) -> Result<Self, rustls::Error> {
        let provider = Arc::new(rustls::crypto::ring::default_provider());
        let config = ClientConfig::builder_with_provider(provider)
            .with_safe_default_protocol_versions()?
            .with_root_certificates(roots)
            .with_no_client_auth();

        Ok(Self {
            connector: TlsConnector::from(Arc::new(config)),
            timeout,
            port: constants::HTTPS_PORT,
        })
    }

    /// Override the target port (443 by default)
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Handshake and evaluate the leaf certificate.
    /// The whole connect + handshake is bounded by the probe timeout.
    pub async fn probe<C: Clock>(&self, domain: &str, clock: &C) -> Result<CertOutcome, CertificateError> {
        let server_name = ServerName::try_from(domain.to_string())
            .map_err(|e| CertificateError::Other(format!("invalid server name {}: {}", domain, e)))?;

        let handshake = async {
            let tcp = TcpStream::connect((domain, self.port))
                .await
                .map_err(|e| CertificateError::Other(e.to_string()))?;

            let tls = self.connector
                .connect(server_name, tcp)
                .await
                .map_err(map_handshake_error)?;

            let (_, conn) = tls.get_ref();
            conn.peer_certificates()
                .and_then(|chain| chain.first())
                .map(|leaf| leaf.as_ref().to_vec())
                .ok_or_else(|| CertificateError::Parse("server presented no certificate".to_string()))
        };

        let der = tokio::time::timeout(self.timeout, handshake)
            .await
            .map_err(|_| CertificateError::Timeout)??;

        parse_certificate(&der, domain, clock.now())
    }
}

fn map_handshake_error(err: std::io::Error) -> CertificateError {
    use std::io::ErrorKind;

    if let Some(tls) = err.get_ref().and_then(|inner| inner.downcast_ref::<rustls::Error>()) {
        return CertificateError::Tls(tls.to_string());
    }

    match err.kind() {
        ErrorKind::TimedOut => CertificateError::Timeout,
        ErrorKind::InvalidData | ErrorKind::UnexpectedEof => CertificateError::Tls(err.to_string()),
        _ => CertificateError::Other(err.to_string()),
    }
}

/// Read expiry, issuer organization and subject CN from a DER certificate
pub fn parse_certificate(der: &[u8], domain: &str, now: DateTime<Utc>) -> Result<CertOutcome, CertificateError> {
    let (_, cert) = x509_parser::parse_x509_certificate(der)
        .map_err(|e| CertificateError::Parse(format!("certificate parse failed: {}", e)))?;

    let not_after = DateTime::<Utc>::from_timestamp(cert.validity().not_after.timestamp(), 0)
        .ok_or_else(|| CertificateError::Parse("certificate not-after out of range".to_string()))?;

    let issuer = cert.issuer()
        .iter_organization()
        .next()
        .and_then(|attr| attr.as_str().ok())
        .unwrap_or("Unknown")
        .to_string();

    let subject = cert.subject()
        .iter_common_name()
        .next()
        .and_then(|attr| attr.as_str().ok())
        .unwrap_or(domain)
        .to_string();

    Ok(CertOutcome {
        valid: true,
        days_left: days_until(not_after, now),
        expires: Some(not_after),
        issuer: Some(issuer),
        subject: Some(subject),
        error: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::probe::clock::FixedClock;
    use chrono::TimeZone;
    use rcgen::{date_time_ymd, CertificateParams, DistinguishedName, DnType, KeyPair};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 17, 12, 0, 0).unwrap()
    }

    fn make_cert(common_name: Option<&str>, org: Option<&str>, expiry: (i32, u8, u8)) -> Vec<u8> {
        let key = KeyPair::generate().unwrap();
        let mut params = CertificateParams::new(vec!["example.com".to_string()]).unwrap();
        let mut dn = DistinguishedName::new();
        if let Some(cn) = common_name {
            dn.push(DnType::CommonName, cn);
        }
        if let Some(org) = org {
            dn.push(DnType::OrganizationName, org);
        }
        params.distinguished_name = dn;
        params.not_before = date_time_ymd(2026, 1, 1);
        params.not_after = date_time_ymd(expiry.0, expiry.1, expiry.2);
        params.self_signed(&key).unwrap().der().to_vec()
    }

    #[test]
    fn test_parse_reads_fields_and_floors_days() {
        let der = make_cert(Some("www.example.com"), Some("Example Trust"), (2026, 10, 20));
        let outcome = parse_certificate(&der, "example.com", now()).unwrap();

        assert!(outcome.valid);
        // 2.5 days ahead floors to 2
        assert_eq!(outcome.days_left, 2);
        assert_eq!(outcome.issuer.as_deref(), Some("Example Trust"));
        assert_eq!(outcome.subject.as_deref(), Some("www.example.com"));
        assert_eq!(outcome.expires, Some(Utc.with_ymd_and_hms(2026, 10, 20, 0, 0, 0).unwrap()));
    }

    #[test]
    fn test_parse_expired_is_negative() {
        let der = make_cert(Some("example.com"), Some("Example Trust"), (2026, 10, 17));
        let outcome = parse_certificate(&der, "example.com", now()).unwrap();
        // expired 12 hours ago
        assert_eq!(outcome.days_left, -1);
    }

    #[test]
    fn test_parse_defaults_missing_names() {
        let der = make_cert(None, None, (2027, 1, 1));
        let outcome = parse_certificate(&der, "fallback.example", now()).unwrap();
        assert_eq!(outcome.issuer.as_deref(), Some("Unknown"));
        assert_eq!(outcome.subject.as_deref(), Some("fallback.example"));
    }

    #[test]
    fn test_parse_garbage_is_parse_error() {
        let err = parse_certificate(b"not a certificate", "example.com", now()).unwrap_err();
        assert!(matches!(err, CertificateError::Parse(_)));
    }

    #[tokio::test]
    async fn test_probe_refused_port_is_other() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let probe = CertificateProbe::with_roots(RootCertStore::empty(), Duration::from_secs(2))
            .unwrap()
            .with_port(port);
        let err = probe.probe("127.0.0.1", &FixedClock(now())).await.unwrap_err();
        assert!(matches!(err, CertificateError::Other(_)), "got {:?}", err);
    }

    #[tokio::test]
    async fn test_probe_silent_server_times_out() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        tokio::spawn(async move {
            let (_socket, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(5)).await;
        });

        let probe = CertificateProbe::with_roots(RootCertStore::empty(), Duration::from_millis(200))
            .unwrap()
            .with_port(port);
        let err = probe.probe("127.0.0.1", &FixedClock(now())).await.unwrap_err();
        assert_eq!(err, CertificateError::Timeout);
        assert_eq!(err.to_string(), "SSL connection timeout");
    }

    #[tokio::test]
    async fn test_probe_plaintext_server_is_tls_error() {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut hello = [0u8; 1024];
            let _ = socket.read(&mut hello).await;
            let _ = socket.write_all(b"HTTP/1.1 400 Bad Request\r\n\r\n").await;
            tokio::time::sleep(Duration::from_secs(3)).await;
        });

        let probe = CertificateProbe::with_roots(RootCertStore::empty(), Duration::from_secs(2))
            .unwrap()
            .with_port(port);
        let err = probe.probe("127.0.0.1", &FixedClock(now())).await.unwrap_err();
        assert!(matches!(err, CertificateError::Tls(_)), "got {:?}", err);
        assert!(err.to_string().starts_with("SSL Error: "));
    }
}
