//! Domain Health Sensor - Main Entry Point

use anyhow::{bail, Context, Result};
use clap::Parser;
use std::time::Duration;

use domain_health_sensor::config::SensorArgs;
use domain_health_sensor::constants;
use domain_health_sensor::logic::cloud_sync::{self, CollectorClient};
use domain_health_sensor::logic::demo::DemoProber;
use domain_health_sensor::logic::probe::LiveProber;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .init();

    let args = SensorArgs::parse();
    let sync_config = args.sync_config();
    if sync_config.domains.is_empty() {
        bail!("No domains to monitor");
    }

    let banner = "=".repeat(60);
    log::info!("{}", banner);
    log::info!("{} v{}", constants::APP_NAME, constants::APP_VERSION);
    log::info!("{}", banner);
    log::info!("API: {}", args.collector_config().api_url);
    log::info!("Company: {}", args.company_id);
    log::info!("Domains: {}", sync_config.domains.join(", "));
    log::info!("Interval: {}s", sync_config.interval_secs);
    log::info!("{}", banner);

    let client = CollectorClient::new(args.collector_config())
        .context("Failed to create collector HTTP client")?;

    // Single-threaded: domains are probed strictly one after another
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to create tokio runtime")?;

    if args.demo {
        let seed = args.seed.unwrap_or_else(rand::random);
        log::info!("Mode: DEMO (seed {})", seed);

        let mut prober = DemoProber::seeded(seed);
        rt.block_on(cloud_sync::run_loop(&mut prober, &client, &sync_config));
    } else {
        log::info!("Mode: LIVE");

        let mut prober = LiveProber::new(
            Duration::from_secs(args.http_timeout),
            Duration::from_secs(args.cert_timeout),
        )
        .context("Failed to initialize probes")?;
        rt.block_on(cloud_sync::run_loop(&mut prober, &client, &sync_config));
    }

    Ok(())
}
