//! Threat Types
//!
//! Core types for threat records.
//! No logic here - only data structures.

use serde::{Deserialize, Serialize};

use crate::constants::{HTTPS_PORT, MONITOR_SRC_IP};

// ============================================================================
// THREAT TYPE
// ============================================================================

/// Closed set of threat types the classifier can emit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThreatType {
    /// Unreachable or returning 5xx
    ServiceDown,
    /// Unexpected 4xx
    ServiceDegraded,
    /// Slow response
    PerformanceDegradation,
    /// Missing security headers
    Misconfiguration,
    /// Certificate or TLS failure
    SslInvalid,
    /// Certificate close to expiry
    SslExpiring,
}

impl ThreatType {
    pub const ALL: [ThreatType; 6] = [
        ThreatType::ServiceDown,
        ThreatType::ServiceDegraded,
        ThreatType::PerformanceDegradation,
        ThreatType::Misconfiguration,
        ThreatType::SslInvalid,
        ThreatType::SslExpiring,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ThreatType::ServiceDown => "service_down",
            ThreatType::ServiceDegraded => "service_degraded",
            ThreatType::PerformanceDegradation => "performance_degradation",
            ThreatType::Misconfiguration => "misconfiguration",
            ThreatType::SslInvalid => "ssl_invalid",
            ThreatType::SslExpiring => "ssl_expiring",
        }
    }
}

impl std::fmt::Display for ThreatType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// SEVERITY
// ============================================================================

/// Urgency score, always within 1..=10
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub struct Severity(u8);

impl Severity {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 10;

    /// Out-of-range values are clamped
    pub const fn new(value: u8) -> Self {
        if value < Self::MIN {
            Severity(Self::MIN)
        } else if value > Self::MAX {
            Severity(Self::MAX)
        } else {
            Severity(value)
        }
    }

    pub fn value(&self) -> u8 {
        self.0
    }
}

impl From<u8> for Severity {
    fn from(value: u8) -> Self {
        Severity::new(value)
    }
}

impl From<Severity> for u8 {
    fn from(severity: Severity) -> Self {
        severity.0
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// THREAT RECORD
// ============================================================================

/// One classified anomaly, as uploaded to the collector
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreatRecord {
    pub threat_type: ThreatType,
    pub severity: Severity,
    pub src_ip: String,
    pub dst_ip: String,
    pub dst_port: u16,
    /// Always "[{domain}] {condition}"
    pub description: String,
}

impl ThreatRecord {
    /// Record attributed from the monitor to `domain:443`
    pub fn new(domain: &str, threat_type: ThreatType, severity: Severity, condition: &str) -> Self {
        Self {
            threat_type,
            severity,
            src_ip: MONITOR_SRC_IP.to_string(),
            dst_ip: domain.to_string(),
            dst_port: HTTPS_PORT,
            description: format!("[{}] {}", domain, condition),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_clamps() {
        assert_eq!(Severity::new(0).value(), 1);
        assert_eq!(Severity::new(11).value(), 10);
        assert_eq!(Severity::new(7).value(), 7);
    }

    #[test]
    fn test_record_wire_shape() {
        let record = ThreatRecord::new(
            "example.com",
            ThreatType::SslExpiring,
            Severity::new(8),
            "SSL certificate expires in 3 days!",
        );
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["threat_type"], "ssl_expiring");
        assert_eq!(json["severity"], 8);
        assert_eq!(json["src_ip"], "0.0.0.0");
        assert_eq!(json["dst_ip"], "example.com");
        assert_eq!(json["dst_port"], 443);
        assert_eq!(json["description"], "[example.com] SSL certificate expires in 3 days!");
    }

    #[test]
    fn test_deserialized_severity_is_clamped() {
        let record: ThreatRecord = serde_json::from_str(
            r#"{"threat_type":"service_down","severity":42,"src_ip":"0.0.0.0",
                "dst_ip":"a.example","dst_port":443,"description":"[a.example] x"}"#,
        ).unwrap();
        assert_eq!(record.severity.value(), 10);
    }
}
