//! Logic Module - Probing, Classification & Delivery
//!
//! Pipeline per domain: `probe` -> `threat` -> `evidence` -> `cloud_sync`.
//!
//! - `probe/` - HTTP and certificate probes, ProbeResult
//! - `threat/` - deterministic threat classifier
//! - `evidence` - per-cycle transaction summary
//! - `identity/` - sensor id derivation
//! - `cloud_sync/` - collector client and cycle runner
//! - `demo` - seeded synthetic prober

pub mod probe;
pub mod threat;
pub mod evidence;
pub mod identity;
pub mod cloud_sync;
pub mod demo;
