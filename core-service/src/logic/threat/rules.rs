//! Threat Classification Rules & Thresholds
//!
//! Thresholds and fixed severities for the rule groups.
//! No classify logic here - only constants and config.

use serde::{Deserialize, Serialize};

use super::types::Severity;

// ============================================================================
// THRESHOLDS (defaults)
// ============================================================================

/// Above this = critical latency band
pub const LATENCY_CRITICAL_MS: u64 = 5000;

/// Above this (and not critical) = warning latency band
pub const LATENCY_WARNING_MS: u64 = 3000;

/// At or below this = certificate expiry is critical
pub const CERT_CRITICAL_DAYS: i64 = 7;

/// At or below this (and not critical) = certificate expiry warning
pub const CERT_WARNING_DAYS: i64 = 30;

/// Minimum missing security headers before reporting
pub const MIN_MISSING_HEADERS: usize = 3;

/// Checked in this order; descriptions list missing names in the same order
pub const SECURITY_HEADERS: [&str; 4] = [
    "Strict-Transport-Security",
    "X-Content-Type-Options",
    "X-Frame-Options",
    "Content-Security-Policy",
];

// ============================================================================
// SEVERITIES (fixed per rule)
// ============================================================================

pub const SEVERITY_CONNECTION_REFUSED: Severity = Severity::new(10);
pub const SEVERITY_CONNECTION_TIMEOUT: Severity = Severity::new(9);
pub const SEVERITY_TLS_HANDSHAKE: Severity = Severity::new(8);

pub const SEVERITY_SERVER_ERROR: Severity = Severity::new(9);
pub const SEVERITY_CLIENT_ERROR: Severity = Severity::new(5);

pub const SEVERITY_LATENCY_CRITICAL: Severity = Severity::new(6);
pub const SEVERITY_LATENCY_WARNING: Severity = Severity::new(4);

pub const SEVERITY_MISSING_HEADERS: Severity = Severity::new(4);

pub const SEVERITY_CERT_INVALID: Severity = Severity::new(9);
pub const SEVERITY_CERT_CRITICAL: Severity = Severity::new(8);
pub const SEVERITY_CERT_WARNING: Severity = Severity::new(5);

// ============================================================================
// CONFIGURABLE THRESHOLDS
// ============================================================================

/// Thresholds passed into the classifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationThresholds {
    pub latency_critical_ms: u64,
    pub latency_warning_ms: u64,
    pub cert_critical_days: i64,
    pub cert_warning_days: i64,
    pub min_missing_headers: usize,
}

impl Default for ClassificationThresholds {
    fn default() -> Self {
        Self {
            latency_critical_ms: LATENCY_CRITICAL_MS,
            latency_warning_ms: LATENCY_WARNING_MS,
            cert_critical_days: CERT_CRITICAL_DAYS,
            cert_warning_days: CERT_WARNING_DAYS,
            min_missing_headers: MIN_MISSING_HEADERS,
        }
    }
}
