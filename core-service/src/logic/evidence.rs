//! Evidence Recorder
//!
//! One compact transaction summary per domain per cycle.

use serde::{Deserialize, Serialize};

use crate::constants::{EVIDENCE_PROTOCOL, HTTPS_PORT, MONITOR_SRC_LABEL};
use crate::logic::probe::ProbeResult;

/// Summary of one monitored exchange ("packets" on the wire)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvidenceRecord {
    pub src: String,
    pub dst: String,
    pub port: u16,
    pub protocol: String,
    /// Response payload bytes, 0 when unreachable
    pub size: u64,
}

/// Build the evidence record for a probe result
pub fn record(result: &ProbeResult) -> EvidenceRecord {
    EvidenceRecord {
        src: MONITOR_SRC_LABEL.to_string(),
        dst: result.domain.clone(),
        port: HTTPS_PORT,
        protocol: EVIDENCE_PROTOCOL.to_string(),
        size: result.payload_size(),
    }
}
