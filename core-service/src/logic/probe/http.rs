//! HTTP Probe
//!
//! GET `https://{domain}`, follow redirects, time the full exchange.
//! Transport errors are mapped onto `ConnectivityError`, never returned raw.

use super::types::{ConnectivityError, HttpOutcome};
use crate::constants;
use reqwest::header::SERVER;
use reqwest::redirect::Policy;
use std::error::Error as StdError;
use std::time::{Duration, Instant};

/// HTTP probe with its own client and timeout
pub struct HttpProbe {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpProbe {
    /// Build the probe client. Fails only if the TLS backend cannot initialize.
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .use_rustls_tls()
            .timeout(timeout)
            .redirect(Policy::limited(constants::MAX_REDIRECTS))
            .user_agent(constants::USER_AGENT)
            .build()?;

        Ok(Self { client, timeout })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Probe the domain over HTTPS
    pub async fn probe(&self, domain: &str) -> Result<HttpOutcome, ConnectivityError> {
        self.probe_url(&format!("https://{}", domain)).await
    }

    /// Probe an explicit URL
    pub async fn probe_url(&self, url: &str) -> Result<HttpOutcome, ConnectivityError> {
        let start = Instant::now();

        let mut response = self.client
            .get(url)
            .send()
            .await
            .map_err(|e| self.classify(&e))?;

        let status_code = response.status().as_u16();
        let final_url = response.url().to_string();
        let server_header = response.headers()
            .get(SERVER)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("Unknown")
            .to_string();
        let header_names: Vec<String> = response.headers()
            .keys()
            .map(|k| k.as_str().to_string())
            .collect();

        // Only the size is kept, so the body is counted chunk by chunk
        let mut content_length: u64 = 0;
        while let Some(chunk) = response.chunk().await.map_err(|e| self.classify(&e))? {
            content_length += chunk.len() as u64;
        }
        let response_time_ms = (start.elapsed().as_secs_f64() * 1000.0).round() as u64;

        log::debug!("HTTP {} -> {} in {}ms ({} bytes)", url, status_code, response_time_ms, content_length);

        Ok(HttpOutcome {
            status_code,
            response_time_ms,
            final_url,
            server_header,
            header_names,
            content_length,
        })
    }

    fn classify(&self, err: &reqwest::Error) -> ConnectivityError {
        classify_error(err, self.timeout)
    }
}

/// Map a reqwest failure onto the connectivity taxonomy.
/// Order matters: a TLS failure also reports `is_connect()`.
fn classify_error(err: &reqwest::Error, timeout: Duration) -> ConnectivityError {
    let detail = error_chain(err);

    if err.is_timeout() {
        ConnectivityError::Timeout { after_secs: timeout.as_secs() }
    } else if is_tls_failure(err) {
        ConnectivityError::TlsHandshake { detail }
    } else if err.is_connect() {
        ConnectivityError::Refused { detail }
    } else {
        ConnectivityError::Other { detail }
    }
}

/// Rendered rustls errors that can surface with the typed error lost
const TLS_ERROR_MARKERS: [&str; 7] = [
    "invalid peer certificate",
    "received fatal alert",
    "peer is incompatible",
    "peer misbehaved",
    "received corrupt message",
    "peer sent no certificates",
    "invalid certificate",
];

/// Walk the source chain looking for a rustls error.
///
/// Every level is checked as a typed `rustls::Error`, through the payload of
/// any `io::Error` (whose `source()` skips its own payload), and finally by
/// the rendered rustls message.
pub(crate) fn is_tls_failure(err: &(dyn StdError + 'static)) -> bool {
    let mut current: Option<&(dyn StdError + 'static)> = Some(err);

    while let Some(e) = current {
        if e.is::<rustls::Error>() {
            return true;
        }
        if let Some(inner) = e.downcast_ref::<std::io::Error>().and_then(|io| io.get_ref()) {
            if is_tls_failure(inner) {
                return true;
            }
        }
        if looks_like_tls_error(&e.to_string()) {
            return true;
        }
        current = e.source();
    }

    false
}

fn looks_like_tls_error(message: &str) -> bool {
    let message = message.to_ascii_lowercase();
    TLS_ERROR_MARKERS.iter().any(|marker| message.contains(marker))
}

/// "outer: inner: root" rendering of an error and its sources
pub(crate) fn error_chain(err: &(dyn StdError + 'static)) -> String {
    let mut parts = vec![err.to_string()];
    let mut current = err.source();

    while let Some(e) = current {
        let text = e.to_string();
        if !parts.iter().any(|p| p == &text) {
            parts.push(text);
        }
        current = e.source();
    }

    parts.join(": ")
}
