//! Sensor Identity Module
//!
//! Deterministic sensor ids, stable across restarts so the collector can
//! correlate time series.
//!
//! Two derivations:
//! - per domain: `http-monitor-{domain with dots as dashes}`
//! - per host: `sensor-{hostname}-{8 hex of UUIDv5(DNS, hostname)}`

use serde::Serialize;
use uuid::Uuid;

/// Identity presented to the collector
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct SensorIdentity(String);

impl SensorIdentity {
    /// One sensor per monitored domain
    pub fn for_domain(domain: &str) -> Self {
        Self(format!("http-monitor-{}", domain.replace('.', "-")))
    }

    /// One sensor per host
    pub fn for_host(hostname: &str) -> Self {
        let digest = Uuid::new_v5(&Uuid::NAMESPACE_DNS, hostname.as_bytes())
            .simple()
            .to_string();
        Self(format!("sensor-{}-{}", hostname, &digest[..8]))
    }

    /// Host identity of the machine we run on
    pub fn local_host() -> Self {
        let hostname = hostname::get()
            .map(|h| h.to_string_lossy().to_string())
            .unwrap_or_else(|_| "unknown".to_string());
        Self::for_host(&hostname)
    }

    /// Operator-supplied id, used verbatim
    pub fn explicit(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SensorIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// How each domain's upload is attributed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentityMode {
    PerDomain,
    /// Same identity for every domain (host identity or explicit id)
    Fixed(SensorIdentity),
}

impl IdentityMode {
    pub fn resolve(&self, domain: &str) -> SensorIdentity {
        match self {
            IdentityMode::PerDomain => SensorIdentity::for_domain(domain),
            IdentityMode::Fixed(id) => id.clone(),
        }
    }
}
