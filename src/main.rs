mod config;
mod error;
mod monitor;
mod notify;
mod staking;

use std::sync::Arc;

use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::MonitorConfig;
use crate::error::AppError;
use crate::monitor::Monitor;
use crate::notify::SlackNotifier;
use crate::staking::DashboardClient;

// Initialize logging and tracing
fn init_tracing() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,monitor=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    dotenv::dotenv().ok();
    let config = MonitorConfig::from_env().map_err(|e| AppError::Config(e.to_string()))?;

    info!("{}", "=".repeat(60));
    info!("🚀 Aztec Coinbase Monitor starting");
    info!("Provider ID: {}", config.provider_id);
    info!("API URL: {}", config.staking_api_url);
    info!("Poll Interval: {}s", config.poll_interval);
    info!("Keystore Path: {}", config.keystore_path.display());
    info!("Data Path: {}", config.data_path.display());
    info!(
        "Slack Notifications: {}",
        if config.slack_webhook_url.is_empty() {
            "Disabled"
        } else {
            "Enabled"
        }
    );
    info!(
        "Error Alert Threshold: {} consecutive failures",
        config.error_alert_threshold
    );
    info!("Error Alert Cooldown: {}s", config.error_alert_cooldown);
    info!("{}", "=".repeat(60));

    // The keystore and data volumes must be mounted before the loop starts.
    if !config.keystore_path.exists() {
        error!(
            "Keystore path does not exist: {}",
            config.keystore_path.display()
        );
        std::process::exit(1);
    }
    if !config.data_path.exists() {
        error!("Data path does not exist: {}", config.data_path.display());
        std::process::exit(1);
    }

    let source = Arc::new(DashboardClient::new(
        &config.staking_api_url,
        &config.provider_id,
    ));
    let notifier = Arc::new(SlackNotifier::new(config.slack_webhook_url.clone()));

    let mut monitor = Monitor::new(config, source, notifier);
    monitor.run().await;

    Ok(())
}
