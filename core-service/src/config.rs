//! Configuration module
//!
//! Command-line arguments, each with an environment variable fallback.

use clap::Parser;

use crate::constants::{
    DEFAULT_CERT_TIMEOUT_SECS, DEFAULT_HTTP_TIMEOUT_SECS, DEFAULT_INTERVAL_SECS,
    DEFAULT_UPLOAD_TIMEOUT_SECS,
};
use crate::logic::cloud_sync::{CollectorConfig, SyncConfig};
use crate::logic::identity::{IdentityMode, SensorIdentity};

/// Monitors HTTPS endpoints and reports threats to a collector
#[derive(Debug, Parser)]
#[command(name = "domain-health-sensor", version)]
pub struct SensorArgs {
    /// Collector API base URL (e.g. https://soc.example.com/api/v1)
    #[arg(long, env = "SENSOR_API_URL")]
    pub api_url: String,

    /// Company API key
    #[arg(long, env = "SENSOR_API_KEY", hide_env_values = true)]
    pub api_key: String,

    /// Company ID
    #[arg(long, env = "SENSOR_COMPANY_ID")]
    pub company_id: String,

    /// Domains to monitor (space or comma separated)
    #[arg(long, env = "SENSOR_DOMAINS", value_delimiter = ',', num_args = 1.., required = true)]
    pub domains: Vec<String>,

    /// Seconds to wait after a cycle completes
    #[arg(
        long,
        env = "SENSOR_INTERVAL",
        default_value_t = DEFAULT_INTERVAL_SECS,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub interval: u64,

    /// Run one cycle and exit
    #[arg(long)]
    pub once: bool,

    /// Use synthetic probe results instead of the network
    #[arg(long)]
    pub demo: bool,

    /// Seed for demo mode (random if unset)
    #[arg(long, env = "SENSOR_DEMO_SEED", requires = "demo")]
    pub seed: Option<u64>,

    /// Fixed sensor ID for every domain
    #[arg(long, env = "SENSOR_ID", conflicts_with = "host_identity")]
    pub sensor_id: Option<String>,

    /// Derive one sensor ID from the hostname instead of one per domain
    #[arg(long)]
    pub host_identity: bool,

    /// HTTP probe timeout in seconds
    #[arg(long, default_value_t = DEFAULT_HTTP_TIMEOUT_SECS, value_parser = clap::value_parser!(u64).range(1..))]
    pub http_timeout: u64,

    /// Certificate probe timeout in seconds
    #[arg(long, default_value_t = DEFAULT_CERT_TIMEOUT_SECS, value_parser = clap::value_parser!(u64).range(1..))]
    pub cert_timeout: u64,

    /// Collector upload timeout in seconds
    #[arg(long, default_value_t = DEFAULT_UPLOAD_TIMEOUT_SECS, value_parser = clap::value_parser!(u64).range(1..))]
    pub upload_timeout: u64,
}

impl SensorArgs {
    /// Trimmed, non-empty domains in the order given
    pub fn domain_list(&self) -> Vec<String> {
        self.domains
            .iter()
            .map(|d| d.trim())
            .filter(|d| !d.is_empty())
            .map(str::to_string)
            .collect()
    }

    pub fn identity_mode(&self) -> IdentityMode {
        if let Some(id) = &self.sensor_id {
            IdentityMode::Fixed(SensorIdentity::explicit(id.clone()))
        } else if self.host_identity {
            IdentityMode::Fixed(SensorIdentity::local_host())
        } else {
            IdentityMode::PerDomain
        }
    }

    pub fn collector_config(&self) -> CollectorConfig {
        CollectorConfig::new(&self.api_url, &self.api_key, &self.company_id)
            .with_timeout(self.upload_timeout)
    }

    pub fn sync_config(&self) -> SyncConfig {
        let mut config = SyncConfig::new(self.domain_list());
        config.interval_secs = self.interval;
        config.once = self.once;
        config.identity = self.identity_mode();
        config
    }
}
