//! Central Configuration Constants
//!
//! Single source of truth for defaults and fixed wire values.

/// App version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// App name
pub const APP_NAME: &str = "Domain Health Sensor";

/// Sent with every outbound request
pub const USER_AGENT: &str = concat!("domain-health-sensor/", env!("CARGO_PKG_VERSION"));

// ============================================
// Timeouts & scheduling (seconds)
// ============================================

/// HTTP probe timeout
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 15;

/// Certificate probe timeout (connect + handshake)
pub const DEFAULT_CERT_TIMEOUT_SECS: u64 = 10;

/// Collector upload timeout
pub const DEFAULT_UPLOAD_TIMEOUT_SECS: u64 = 30;

/// Pause between cycles, measured from cycle completion
pub const DEFAULT_INTERVAL_SECS: u64 = 120;

/// Redirect hops followed by the HTTP probe
pub const MAX_REDIRECTS: usize = 10;

// ============================================
// Fixed wire values
// ============================================

/// Probed port and the dst_port of every record
pub const HTTPS_PORT: u16 = 443;

/// Source address on threat records
pub const MONITOR_SRC_IP: &str = "0.0.0.0";

/// Source label on evidence records
pub const MONITOR_SRC_LABEL: &str = "monitor";

/// Protocol label on evidence records
pub const EVIDENCE_PROTOCOL: &str = "HTTPS";
