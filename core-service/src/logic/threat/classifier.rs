//! Threat Classifier
//!
//! Only classify logic - no types, no I/O.
//! Input: ProbeResult
//! Output: ordered Vec<ThreatRecord>
//!
//! Rule groups run in a fixed order: connectivity, status code, latency,
//! security headers, certificate. Every matching group contributes at most
//! one record. A missing outcome switches its groups off.

use super::rules::{
    ClassificationThresholds, SECURITY_HEADERS, SEVERITY_CERT_CRITICAL, SEVERITY_CERT_INVALID,
    SEVERITY_CERT_WARNING, SEVERITY_CLIENT_ERROR, SEVERITY_CONNECTION_REFUSED,
    SEVERITY_CONNECTION_TIMEOUT, SEVERITY_LATENCY_CRITICAL, SEVERITY_LATENCY_WARNING,
    SEVERITY_MISSING_HEADERS, SEVERITY_SERVER_ERROR, SEVERITY_TLS_HANDSHAKE,
};
use super::types::{ThreatRecord, ThreatType};
use crate::logic::probe::{CertOutcome, ConnectivityError, HttpOutcome, ProbeResult};

// ============================================================================
// MAIN CLASSIFICATION FUNCTION
// ============================================================================

/// Classify with default thresholds
pub fn classify(result: &ProbeResult) -> Vec<ThreatRecord> {
    classify_with_thresholds(result, &ClassificationThresholds::default())
}

/// Classification with custom thresholds
///
/// Pure and deterministic: the same input always yields the same list.
pub fn classify_with_thresholds(
    result: &ProbeResult,
    thresholds: &ClassificationThresholds,
) -> Vec<ThreatRecord> {
    let domain = result.domain.as_str();
    let mut threats = Vec::new();

    match (&result.http, &result.http_error) {
        (Some(http), _) => {
            threats.extend(status_rule(domain, http));
            threats.extend(latency_rule(domain, http, thresholds));
            threats.extend(header_rule(domain, http, thresholds));
        }
        (None, Some(err)) => {
            threats.extend(connectivity_rule(domain, err));
        }
        (None, None) => {}
    }

    if let Some(cert) = &result.certificate {
        threats.extend(certificate_rule(domain, cert, thresholds));
    }

    threats
}

// ============================================================================
// RULE GROUPS
// ============================================================================

/// a. HTTP probe failed outright
fn connectivity_rule(domain: &str, err: &ConnectivityError) -> Option<ThreatRecord> {
    match err {
        ConnectivityError::Refused { .. } => Some(ThreatRecord::new(
            domain,
            ThreatType::ServiceDown,
            SEVERITY_CONNECTION_REFUSED,
            "Connection refused - service completely unreachable",
        )),
        ConnectivityError::Timeout { after_secs } => Some(ThreatRecord::new(
            domain,
            ThreatType::ServiceDown,
            SEVERITY_CONNECTION_TIMEOUT,
            &format!("Connection timeout after {}s", after_secs),
        )),
        ConnectivityError::TlsHandshake { detail } => Some(ThreatRecord::new(
            domain,
            ThreatType::SslInvalid,
            SEVERITY_TLS_HANDSHAKE,
            &format!("SSL error during HTTP request: {}", detail),
        )),
        ConnectivityError::Other { .. } => None,
    }
}

/// b. Server and client errors; 404 is exempt
fn status_rule(domain: &str, http: &HttpOutcome) -> Option<ThreatRecord> {
    let status = http.status_code;

    if status >= 500 {
        Some(ThreatRecord::new(
            domain,
            ThreatType::ServiceDown,
            SEVERITY_SERVER_ERROR,
            &format!("HTTP {} - Service returning server error", status),
        ))
    } else if (400..500).contains(&status) && status != 404 {
        Some(ThreatRecord::new(
            domain,
            ThreatType::ServiceDegraded,
            SEVERITY_CLIENT_ERROR,
            &format!("HTTP {} - Unexpected client error", status),
        ))
    } else {
        None
    }
}

/// c. Highest latency band wins
fn latency_rule(domain: &str, http: &HttpOutcome, t: &ClassificationThresholds) -> Option<ThreatRecord> {
    let ms = http.response_time_ms;

    if ms > t.latency_critical_ms {
        Some(ThreatRecord::new(
            domain,
            ThreatType::PerformanceDegradation,
            SEVERITY_LATENCY_CRITICAL,
            &format!(
                "Response time {}ms exceeds {} threshold",
                ms,
                format_threshold(t.latency_critical_ms)
            ),
        ))
    } else if ms > t.latency_warning_ms {
        Some(ThreatRecord::new(
            domain,
            ThreatType::PerformanceDegradation,
            SEVERITY_LATENCY_WARNING,
            &format!("Response time {}ms - slow response", ms),
        ))
    } else {
        None
    }
}

/// d. Too many security headers missing
fn header_rule(domain: &str, http: &HttpOutcome, t: &ClassificationThresholds) -> Option<ThreatRecord> {
    let missing = missing_security_headers(http);

    if missing.len() >= t.min_missing_headers {
        Some(ThreatRecord::new(
            domain,
            ThreatType::Misconfiguration,
            SEVERITY_MISSING_HEADERS,
            &format!("Missing security headers: {}", missing.join(", ")),
        ))
    } else {
        None
    }
}

/// e. Certificate health, priority order: invalid > critical > warning
fn certificate_rule(domain: &str, cert: &CertOutcome, t: &ClassificationThresholds) -> Option<ThreatRecord> {
    if !cert.valid {
        return Some(ThreatRecord::new(
            domain,
            ThreatType::SslInvalid,
            SEVERITY_CERT_INVALID,
            &format!("SSL certificate invalid: {}", cert.error.as_deref().unwrap_or("Unknown")),
        ));
    }

    let days = cert.days_left;
    if days <= t.cert_critical_days {
        Some(ThreatRecord::new(
            domain,
            ThreatType::SslExpiring,
            SEVERITY_CERT_CRITICAL,
            &format!("SSL certificate expires in {} days!", days),
        ))
    } else if days <= t.cert_warning_days {
        Some(ThreatRecord::new(
            domain,
            ThreatType::SslExpiring,
            SEVERITY_CERT_WARNING,
            &format!("SSL certificate expires in {} days", days),
        ))
    } else {
        None
    }
}

// ============================================================================
// HELPERS
// ============================================================================

/// Missing recommended headers, in the fixed check order
pub fn missing_security_headers(http: &HttpOutcome) -> Vec<&'static str> {
    SECURITY_HEADERS
        .iter()
        .copied()
        .filter(|name| !http.has_header(name))
        .collect()
}

/// 5000 -> "5s", 2500 -> "2500ms"
fn format_threshold(ms: u64) -> String {
    if ms % 1000 == 0 {
        format!("{}s", ms / 1000)
    } else {
        format!("{}ms", ms)
    }
}

// ============================================================================
// TESTS
// ============================================================================
