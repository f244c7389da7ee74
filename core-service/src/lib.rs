//! Domain Health Sensor
//!
//! Probes HTTPS endpoints for availability, latency and certificate health,
//! classifies the results into threat records and uploads them to a collector.

pub mod constants;
pub mod config;
pub mod logic;
