//! Probe Module
//!
//! Outbound checks against a monitored domain.
//!
//! ## Structure
//! - `types`: ProbeResult, HttpOutcome, CertOutcome and the failure taxonomy
//! - `clock`: injectable "now" for expiry math
//! - `http`: HTTP probe (status, timing, redirects, headers)
//! - `certificate`: TLS handshake + leaf certificate inspection
//!
//! Both probes always return structured outcomes; transport errors never
//! escape as raw errors.

pub mod types;
pub mod clock;
pub mod http;
pub mod certificate;

#[cfg(test)]
mod tests;

pub use types::{
    CertOutcome,
    CertificateError,
    ConnectivityError,
    HttpOutcome,
    ProbeResult,
    DAYS_LEFT_UNKNOWN,
};
pub use clock::{Clock, FixedClock, SystemClock};
pub use http::HttpProbe;
pub use certificate::CertificateProbe;

use std::time::Duration;
use thiserror::Error;

/// Probe construction failures (startup only)
#[derive(Debug, Error)]
pub enum ProbeSetupError {
    #[error("HTTP client setup failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("TLS setup failed: {0}")]
    Tls(#[from] rustls::Error),
}

/// Anything that can turn a domain into a ProbeResult
#[allow(async_fn_in_trait)]
pub trait DomainProber {
    async fn probe(&mut self, domain: &str) -> ProbeResult;
}

/// Real network prober: HTTP probe first, then the certificate probe
pub struct LiveProber<C: Clock = SystemClock> {
    http: HttpProbe,
    certificate: CertificateProbe,
    clock: C,
}

impl LiveProber<SystemClock> {
    pub fn new(http_timeout: Duration, cert_timeout: Duration) -> Result<Self, ProbeSetupError> {
        Ok(Self {
            http: HttpProbe::new(http_timeout)?,
            certificate: CertificateProbe::new(cert_timeout)?,
            clock: SystemClock,
        })
    }
}

impl<C: Clock> LiveProber<C> {
    /// Swap the clock (tests, replay)
    pub fn with_clock<D: Clock>(self, clock: D) -> LiveProber<D> {
        LiveProber {
            http: self.http,
            certificate: self.certificate,
            clock,
        }
    }
}

impl<C: Clock> DomainProber for LiveProber<C> {
    async fn probe(&mut self, domain: &str) -> ProbeResult {
        let timestamp = self.clock.now();

        let http = self.http.probe(domain).await;
        if let Err(ref e) = http {
            log::debug!("[{}] HTTP probe failed: {}", domain, e);
        }

        let certificate = self.certificate.probe(domain, &self.clock).await;
        if let Err(ref e) = certificate {
            log::debug!("[{}] Certificate probe failed: {}", domain, e);
        }

        ProbeResult::new(domain, timestamp)
            .with_http(http)
            .with_certificate(certificate)
    }
}
