//! Cloud Sync Module - Sensor to Collector Communication
//!
//! This module handles:
//! - Upload payload assembly (identity + threats + evidence)
//! - Best-effort delivery to `/sensors/upload` (at most once, no retry)
//! - Surfacing collector directives (block_ip)
//! - The per-domain cycle runner and the interval loop

pub mod client;
pub mod sync;

pub use client::{
    CollectorClient,
    CollectorConfig,
    Directive,
    TransportError,
    UploadPayload,
    UploadReceipt,
};
pub use sync::{
    check_domain,
    run_cycle,
    run_loop,
    run_until_shutdown,
    CycleReport,
    DomainCheck,
    DomainReport,
    SyncConfig,
};
