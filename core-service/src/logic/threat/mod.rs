//! Threat Module
//!
//! Turns a ProbeResult into severity-scored threat records.
//! This is the CORE STEP - the only place with decision logic.
//!
//! ## Structure
//! - `types`: Core types (ThreatType, Severity, ThreatRecord)
//! - `rules`: Thresholds, severities and the security header set
//! - `classifier`: Classification logic
//!
//! ## Usage
//! ```ignore
//! use crate::logic::threat::{classify, ThreatType};
//!
//! for threat in classify(&probe_result) {
//!     println!("[sev:{}] {}: {}", threat.severity, threat.threat_type, threat.description);
//! }
//! ```

pub mod types;
pub mod rules;
pub mod classifier;


pub use types::{
    Severity,
    ThreatRecord,
    ThreatType,
};

pub use rules::{
    ClassificationThresholds,
    CERT_CRITICAL_DAYS,
    CERT_WARNING_DAYS,
    LATENCY_CRITICAL_MS,
    LATENCY_WARNING_MS,
    MIN_MISSING_HEADERS,
    SECURITY_HEADERS,
};

pub use classifier::{classify, classify_with_thresholds, missing_security_headers};
