//! Probe tests against a local rustls server

use super::*;
use chrono::{TimeZone, Utc};
use rcgen::{date_time_ymd, CertificateParams, DistinguishedName, DnType, KeyPair};
use rustls::pki_types::{CertificateDer, PrivateKeyDer, PrivatePkcs8KeyDer};
use rustls::{RootCertStore, ServerConfig};
use std::sync::Arc;
use tokio::io::AsyncReadExt;
use tokio::net::TcpListener;
use tokio_rustls::TlsAcceptor;

/// Self-signed `localhost` certificate valid 2020-01-01 .. 2090-01-01
fn localhost_cert() -> (CertificateDer<'static>, PrivateKeyDer<'static>) {
    let key = KeyPair::generate().unwrap();
    let mut params = CertificateParams::new(vec!["localhost".to_string()]).unwrap();
    let mut dn = DistinguishedName::new();
    dn.push(DnType::CommonName, "localhost");
    dn.push(DnType::OrganizationName, "Sensor Test Authority");
    params.distinguished_name = dn;
    params.not_before = date_time_ymd(2020, 1, 1);
    params.not_after = date_time_ymd(2090, 1, 1);

    let cert = params.self_signed(&key).unwrap();
    let key_der = PrivateKeyDer::Pkcs8(PrivatePkcs8KeyDer::from(key.serialize_der()));
    (cert.der().clone(), key_der)
}

/// HTTPS listener on 127.0.0.1 that completes handshakes and then waits
/// for the client to hang up
async fn spawn_tls_server(cert: CertificateDer<'static>, key: PrivateKeyDer<'static>) -> u16 {
    let provider = Arc::new(rustls::crypto::ring::default_provider());
    let config = ServerConfig::builder_with_provider(provider)
        .with_safe_default_protocol_versions()
        .unwrap()
        .with_no_client_auth()
        .with_single_cert(vec![cert], key)
        .unwrap();
    let acceptor = TlsAcceptor::from(Arc::new(config));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        while let Ok((tcp, _)) = listener.accept().await {
            let acceptor = acceptor.clone();
            tokio::spawn(async move {
                if let Ok(mut tls) = acceptor.accept(tcp).await {
                    let mut buf = [0u8; 1024];
                    let _ = tls.read(&mut buf).await;
                }
            });
        }
    });

    port
}

#[tokio::test]
async fn test_http_untrusted_certificate_is_tls_handshake() {
    let (cert, key) = localhost_cert();
    let port = spawn_tls_server(cert, key).await;

    let probe = HttpProbe::new(Duration::from_secs(5)).unwrap();
    let err = probe.probe_url(&format!("https://localhost:{}/", port)).await.unwrap_err();

    assert!(matches!(err, ConnectivityError::TlsHandshake { .. }), "got {:?}", err);
}

#[tokio::test]
async fn test_certificate_trusted_handshake_reads_leaf() {
    let (cert, key) = localhost_cert();
    let mut roots = RootCertStore::empty();
    roots.add(cert.clone()).unwrap();
    let port = spawn_tls_server(cert, key).await;

    let probe = CertificateProbe::with_roots(roots, Duration::from_secs(5))
        .unwrap()
        .with_port(port);
    // 31.5 days before expiry
    let clock = FixedClock(Utc.with_ymd_and_hms(2089, 11, 30, 12, 0, 0).unwrap());
    let outcome = probe.probe("localhost", &clock).await.unwrap();

    assert!(outcome.valid);
    assert_eq!(outcome.days_left, 31);
    assert_eq!(outcome.expires, Some(Utc.with_ymd_and_hms(2090, 1, 1, 0, 0, 0).unwrap()));
    assert_eq!(outcome.issuer.as_deref(), Some("Sensor Test Authority"));
    assert_eq!(outcome.subject.as_deref(), Some("localhost"));
    assert!(outcome.error.is_none());
}

#[tokio::test]
async fn test_certificate_untrusted_handshake_is_tls_error() {
    let (cert, key) = localhost_cert();
    let port = spawn_tls_server(cert, key).await;

    let probe = CertificateProbe::with_roots(RootCertStore::empty(), Duration::from_secs(5))
        .unwrap()
        .with_port(port);
    let clock = FixedClock(Utc.with_ymd_and_hms(2026, 10, 17, 0, 0, 0).unwrap());
    let err = probe.probe("localhost", &clock).await.unwrap_err();

    assert!(matches!(err, CertificateError::Tls(_)), "got {:?}", err);
}
