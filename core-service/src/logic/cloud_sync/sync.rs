//! Cycle Runner
//!
//! Probe -> classify -> record evidence -> upload, one domain at a time,
//! then sleep and repeat. Failures stay scoped to their domain.

use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;

use super::client::{CollectorClient, Directive, TransportError, UploadReceipt};
use crate::constants;
use crate::logic::evidence::{self, EvidenceRecord};
use crate::logic::identity::{IdentityMode, SensorIdentity};
use crate::logic::probe::{DomainProber, ProbeResult};
use crate::logic::threat::{classify_with_thresholds, ClassificationThresholds, ThreatRecord};

/// Sync configuration
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Domains, probed in this order
    pub domains: Vec<String>,
    /// Pause after each completed cycle
    pub interval_secs: u64,
    /// Run a single cycle and return
    pub once: bool,
    pub identity: IdentityMode,
    pub thresholds: ClassificationThresholds,
}

impl SyncConfig {
    pub fn new(domains: Vec<String>) -> Self {
        Self {
            domains,
            interval_secs: constants::DEFAULT_INTERVAL_SECS,
            once: false,
            identity: IdentityMode::PerDomain,
            thresholds: ClassificationThresholds::default(),
        }
    }
}

/// Probe output and everything derived from it
#[derive(Debug, Clone)]
pub struct DomainCheck {
    pub result: ProbeResult,
    pub threats: Vec<ThreatRecord>,
    pub evidence: EvidenceRecord,
}

/// Outcome of one domain within a cycle
#[derive(Debug, Clone)]
pub struct DomainReport {
    pub domain: String,
    pub sensor_id: SensorIdentity,
    pub threat_count: usize,
    pub upload: Result<UploadReceipt, TransportError>,
}

/// Outcome of one full pass over the domain list
#[derive(Debug, Clone, Default)]
pub struct CycleReport {
    pub domains: Vec<DomainReport>,
}

impl CycleReport {
    /// Directives from every accepted upload, in domain order
    pub fn directives(&self) -> Vec<&Directive> {
        self.domains
            .iter()
            .filter_map(|d| d.upload.as_ref().ok())
            .flat_map(|receipt| receipt.directives.iter())
            .collect()
    }

    pub fn failed_uploads(&self) -> usize {
        self.domains.iter().filter(|d| d.upload.is_err()).count()
    }

    pub fn total_threats(&self) -> usize {
        self.domains.iter().map(|d| d.threat_count).sum()
    }
}

/// Probe a domain and derive its threats and evidence
pub async fn check_domain<P: DomainProber>(
    prober: &mut P,
    domain: &str,
    thresholds: &ClassificationThresholds,
) -> DomainCheck {
    let result = prober.probe(domain).await;
    let threats = classify_with_thresholds(&result, thresholds);
    let evidence = evidence::record(&result);

    DomainCheck { result, threats, evidence }
}

/// One pass over all domains. Uploads are sent in domain order.
pub async fn run_cycle<P: DomainProber>(
    prober: &mut P,
    client: &CollectorClient,
    config: &SyncConfig,
) -> CycleReport {
    let mut report = CycleReport::default();

    for domain in &config.domains {
        log::info!("Checking {} ...", domain);

        let check = check_domain(prober, domain, &config.thresholds).await;
        log_check(&check);

        let sensor_id = config.identity.resolve(domain);
        let threat_count = check.threats.len();
        let payload = client.assemble(sensor_id.clone(), check.threats, vec![check.evidence]);

        let upload = client.upload(&payload).await;
        match &upload {
            Ok(receipt) => log::info!(
                "  -> SOC upload OK: {} threats, {} packets | Commands: {}",
                receipt.processed_threats,
                receipt.processed_packets,
                receipt.command_count
            ),
            Err(e) => log::error!("  -> SOC upload failed: {}", e),
        }

        report.domains.push(DomainReport {
            domain: domain.clone(),
            sensor_id,
            threat_count,
            upload,
        });
    }

    report
}

/// Repeat cycles until `once` is set or Ctrl-C / SIGTERM arrives.
/// The interval is measured from the end of each cycle.
pub async fn run_loop<P: DomainProber>(prober: &mut P, client: &CollectorClient, config: &SyncConfig) {
    run_until_shutdown(prober, client, config, shutdown_signal()).await
}

/// Repeat cycles until `once` is set or `shutdown` resolves.
///
/// `shutdown` is polled for the whole run, during cycles as well as
/// between them. A cycle interrupted by shutdown is abandoned.
pub async fn run_until_shutdown<P, S>(
    prober: &mut P,
    client: &CollectorClient,
    config: &SyncConfig,
    shutdown: S,
) where
    P: DomainProber,
    S: Future,
{
    let interval = Duration::from_secs(config.interval_secs);
    tokio::pin!(shutdown);

    loop {
        let report = tokio::select! {
            report = run_cycle(prober, client, config) => report,
            _ = &mut shutdown => {
                log::info!("Shutdown requested during cycle. Exiting.");
                return;
            }
        };

        for directive in report.directives() {
            handle_directive(directive);
        }

        log::info!(
            "Cycle complete: {} domains, {} threats, {} failed uploads",
            report.domains.len(),
            report.total_threats(),
            report.failed_uploads()
        );

        if config.once {
            log::info!("Single run complete. Exiting.");
            return;
        }

        log::info!("Next check in {}s...", config.interval_secs);
        log::info!("{}", "-".repeat(40));

        tokio::select! {
            _ = sleep(interval) => {}
            _ = &mut shutdown => {
                log::info!("Shutdown requested. Exiting.");
                return;
            }
        }
    }
}

/// Resolves on SIGINT (Ctrl-C) or, on Unix, SIGTERM.
/// A handler that cannot be installed never resolves.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log::error!("Failed to install Ctrl-C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                log::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => log::info!("Received SIGINT (Ctrl-C)"),
        () = terminate => log::info!("Received SIGTERM"),
    }
}

fn log_check(check: &DomainCheck) {
    let result = &check.result;

    match (&result.http, &result.http_error) {
        (Some(http), _) => log::info!("  HTTP: {} ({}ms)", http.status_code, http.response_time_ms),
        (None, Some(err)) => log::warn!("  HTTP: UNREACHABLE ({})", err),
        (None, None) => log::warn!("  HTTP: UNREACHABLE"),
    }

    match &result.certificate {
        Some(cert) if cert.valid => log::info!(
            "  SSL: OK ({} days left, issuer: {})",
            cert.days_left,
            cert.issuer.as_deref().unwrap_or("?")
        ),
        Some(cert) => log::warn!("  SSL: INVALID - {}", cert.error.as_deref().unwrap_or("Unknown")),
        None => log::warn!("  SSL: not evaluated"),
    }

    if check.threats.is_empty() {
        log::info!("  No threats detected");
    }
    for t in &check.threats {
        log::warn!("  THREAT [sev:{}] {}: {}", t.severity, t.threat_type, t.description);
    }
}

/// Directives are reported, not executed
fn handle_directive(directive: &Directive) {
    match directive {
        Directive::BlockIp { target, reason } => {
            log::warn!("BLOCK IP: {} (reason: {})", target, reason);
        }
    }
}
