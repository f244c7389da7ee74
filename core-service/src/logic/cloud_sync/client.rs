//! Collector API Client
//!
//! HTTP client for the `/sensors/upload` endpoint.

use serde::{Deserialize, Deserializer, Serialize};
use std::time::Duration;
use thiserror::Error;

use crate::constants;
use crate::logic::evidence::EvidenceRecord;
use crate::logic::identity::SensorIdentity;
use crate::logic::threat::ThreatRecord;

/// Collector connection settings
#[derive(Clone)]
pub struct CollectorConfig {
    /// Base API url, without trailing slash
    pub api_url: String,
    pub api_key: String,
    pub company_id: String,
    pub timeout_seconds: u64,
}

impl CollectorConfig {
    pub fn new(api_url: &str, api_key: &str, company_id: &str) -> Self {
        Self {
            api_url: api_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            company_id: company_id.to_string(),
            timeout_seconds: constants::DEFAULT_UPLOAD_TIMEOUT_SECS,
        }
    }

    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout_seconds = seconds;
        self
    }

    pub fn upload_url(&self) -> String {
        format!("{}/sensors/upload", self.api_url)
    }
}

impl std::fmt::Debug for CollectorConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CollectorConfig")
            .field("api_url", &self.api_url)
            .field("api_key", &"***")
            .field("company_id", &self.company_id)
            .field("timeout_seconds", &self.timeout_seconds)
            .finish()
    }
}

// Request/Response types

/// Upload body
#[derive(Serialize)]
pub struct UploadPayload {
    pub api_key: String,
    pub company_id: String,
    pub sensor_id: SensorIdentity,
    pub threats: Vec<ThreatRecord>,
    pub packets: Vec<EvidenceRecord>,
}

impl std::fmt::Debug for UploadPayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadPayload")
            .field("company_id", &self.company_id)
            .field("sensor_id", &self.sensor_id)
            .field("threats", &self.threats.len())
            .field("packets", &self.packets.len())
            .finish()
    }
}

/// Collector reply. Missing and `null` fields both read as defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UploadResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub processed_threats: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub processed_packets: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub commands: Vec<CollectorCommand>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Raw command as sent by the collector
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CollectorCommand {
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub target: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
}

/// Actionable command surfaced to the caller. Executing it is up to them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    BlockIp { target: String, reason: String },
}

impl CollectorCommand {
    fn to_directive(&self) -> Option<Directive> {
        match self.action.as_deref() {
            Some("block_ip") => match &self.target {
                Some(target) => Some(Directive::BlockIp {
                    target: target.clone(),
                    reason: self.reason.clone().unwrap_or_default(),
                }),
                None => {
                    log::warn!("Ignoring block_ip command without target");
                    None
                }
            },
            other => {
                log::debug!("Ignoring collector command: {:?}", other);
                None
            }
        }
    }
}

/// Accepted upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadReceipt {
    pub processed_threats: i64,
    pub processed_packets: i64,
    /// Number of commands received, including ignored ones
    pub command_count: usize,
    pub directives: Vec<Directive>,
}

impl From<UploadResponse> for UploadReceipt {
    fn from(response: UploadResponse) -> Self {
        let directives = response.commands
            .iter()
            .filter_map(CollectorCommand::to_directive)
            .collect();

        Self {
            processed_threats: response.processed_threats,
            processed_packets: response.processed_packets,
            command_count: response.commands.len(),
            directives,
        }
    }
}

/// Collector API client
pub struct CollectorClient {
    config: CollectorConfig,
    http_client: reqwest::Client,
}

impl CollectorClient {
    /// Create new collector client
    pub fn new(config: CollectorConfig) -> Result<Self, reqwest::Error> {
        let http_client = reqwest::Client::builder()
            .use_rustls_tls()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(constants::USER_AGENT)
            .build()?;

        Ok(Self { config, http_client })
    }

    pub fn config(&self) -> &CollectorConfig {
        &self.config
    }

    /// Package one domain's cycle output with this client's credentials
    pub fn assemble(
        &self,
        sensor_id: SensorIdentity,
        threats: Vec<ThreatRecord>,
        packets: Vec<EvidenceRecord>,
    ) -> UploadPayload {
        UploadPayload {
            api_key: self.config.api_key.clone(),
            company_id: self.config.company_id.clone(),
            sensor_id,
            threats,
            packets,
        }
    }

    /// Deliver a payload once. No retry: the caller logs and moves on.
    pub async fn upload(&self, payload: &UploadPayload) -> Result<UploadReceipt, TransportError> {
        let url = self.config.upload_url();

        let response = self.http_client
            .post(&url)
            .json(payload)
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        if response.status().is_success() {
            let body: UploadResponse = response.json().await
                .map_err(|e| TransportError::Parse(e.to_string()))?;
            Ok(UploadReceipt::from(body))
        } else {
            let status = response.status().as_u16();
            let error_text = response.text().await.unwrap_or_default();
            log::debug!("Collector rejected upload ({}): {}", status, error_text);
            Err(TransportError::Server(status))
        }
    }
}

/// Upload failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Server error: {0}")]
    Server(u16),

    #[error("Parse error: {0}")]
    Parse(String),
}
