//! Demo Prober
//!
//! Synthetic probe results from a seeded RNG. Output goes through the real
//! classifier, so demo uploads carry the same threat types as live ones.

use chrono::Duration;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::logic::probe::{
    CertOutcome, CertificateError, Clock, ConnectivityError, DomainProber, HttpOutcome,
    ProbeResult, SystemClock,
};
use crate::logic::threat::SECURITY_HEADERS;

/// Status codes and their relative weights
const STATUS_TABLE: [(u16, u32); 7] = [
    (200, 80),
    (301, 4),
    (404, 4),
    (403, 3),
    (429, 2),
    (500, 3),
    (503, 4),
];

/// Latency bands (min, max, weight), in milliseconds
const LATENCY_TABLE: [(u64, u64, u32); 4] = [
    (40, 1500, 75),
    (1501, 3000, 10),
    (3001, 5000, 10),
    (5001, 9000, 5),
];

/// Certificate days-left bands (min, max, weight)
const CERT_DAYS_TABLE: [(i64, i64, u32); 3] = [
    (0, 7, 5),
    (8, 30, 10),
    (31, 365, 85),
];

const ISSUERS: [&str; 4] = [
    "Let's Encrypt",
    "DigiCert Inc",
    "Sectigo Limited",
    "Google Trust Services",
];

/// Probability that the HTTP probe fails outright
const HTTP_FAILURE_RATE: f64 = 0.08;
/// Probability that the certificate probe fails
const CERT_FAILURE_RATE: f64 = 0.06;
/// Probability that each security header is present
const HEADER_PRESENT_RATE: f64 = 0.6;

/// Seeded synthetic prober
pub struct DemoProber<C: Clock = SystemClock> {
    rng: StdRng,
    clock: C,
}

impl DemoProber<SystemClock> {
    /// Same seed, same sequence of results (given the same clock)
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            clock: SystemClock,
        }
    }
}

impl<C: Clock> DemoProber<C> {
    pub fn with_clock<D: Clock>(self, clock: D) -> DemoProber<D> {
        DemoProber { rng: self.rng, clock }
    }

    /// Generate one synthetic result
    pub fn generate(&mut self, domain: &str) -> ProbeResult {
        let timestamp = self.clock.now();
        let http = self.gen_http();
        let certificate = self.gen_certificate(domain);

        ProbeResult::new(domain, timestamp)
            .with_http(http)
            .with_certificate(certificate)
    }

    fn gen_http(&mut self) -> Result<HttpOutcome, ConnectivityError> {
        if self.rng.gen_bool(HTTP_FAILURE_RATE) {
            return Err(match self.rng.gen_range(0..4) {
                0 => ConnectivityError::Refused { detail: "Connection refused (os error 111)".to_string() },
                1 => ConnectivityError::Timeout { after_secs: crate::constants::DEFAULT_HTTP_TIMEOUT_SECS },
                2 => ConnectivityError::TlsHandshake { detail: "invalid peer certificate: UnknownIssuer".to_string() },
                _ => ConnectivityError::Other { detail: "too many redirects".to_string() },
            });
        }

        let status_code = STATUS_TABLE
            .choose_weighted(&mut self.rng, |entry| entry.1)
            .map(|entry| entry.0)
            .unwrap_or(200);

        let (low, high) = LATENCY_TABLE
            .choose_weighted(&mut self.rng, |entry| entry.2)
            .map(|entry| (entry.0, entry.1))
            .unwrap_or((40, 1500));
        let response_time_ms = self.rng.gen_range(low..=high);

        let mut header_names = vec!["content-type".to_string(), "date".to_string()];
        for name in SECURITY_HEADERS {
            if self.rng.gen_bool(HEADER_PRESENT_RATE) {
                header_names.push(name.to_ascii_lowercase());
            }
        }

        Ok(HttpOutcome {
            status_code,
            response_time_ms,
            final_url: String::new(),
            server_header: ["nginx", "cloudflare", "Apache", "Unknown"]
                .choose(&mut self.rng)
                .copied()
                .unwrap_or("Unknown")
                .to_string(),
            header_names,
            content_length: self.rng.gen_range(256..=200_000),
        })
    }

    fn gen_certificate(&mut self, domain: &str) -> Result<CertOutcome, CertificateError> {
        if self.rng.gen_bool(CERT_FAILURE_RATE) {
            return Err(if self.rng.gen_bool(0.5) {
                CertificateError::Timeout
            } else {
                CertificateError::Tls("invalid peer certificate: UnknownIssuer".to_string())
            });
        }

        let (low, high) = CERT_DAYS_TABLE
            .choose_weighted(&mut self.rng, |entry| entry.2)
            .map(|entry| (entry.0, entry.1))
            .unwrap_or((31, 365));
        let days_left = self.rng.gen_range(low..=high);

        Ok(CertOutcome {
            valid: true,
            days_left,
            expires: Some(self.clock.now() + Duration::days(days_left) + Duration::hours(1)),
            issuer: ISSUERS.choose(&mut self.rng).map(|s| s.to_string()),
            subject: Some(domain.to_string()),
            error: None,
        })
    }
}

impl<C: Clock> DomainProber for DemoProber<C> {
    async fn probe(&mut self, domain: &str) -> ProbeResult {
        let mut result = self.generate(domain);
        if let Some(http) = result.http.as_mut() {
            http.final_url = format!("https://{}/", domain);
        }
        result
    }
}
