use std::path::PathBuf;

/// Monitor configuration, sourced from environment variables
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Staking provider identity on the dashboard
    pub provider_id: String,
    /// Base URL of the staking dashboard API
    pub staking_api_url: String,
    /// Seconds between reconciliation cycles
    pub poll_interval: u64,
    /// Slack incoming-webhook URL; empty disables notifications
    pub slack_webhook_url: String,
    /// Directory holding sequencers.json (shared with the validator)
    pub keystore_path: PathBuf,
    /// Directory holding monitor-owned state and snapshot files
    pub data_path: PathBuf,
    /// Consecutive failures before an error alert fires
    pub error_alert_threshold: u32,
    /// Seconds between error alerts
    pub error_alert_cooldown: u64,
}

impl MonitorConfig {
    pub fn from_env() -> Result<Self, config::ConfigError> {
        Ok(Self {
            provider_id: std::env::var("PROVIDER_ID").unwrap_or_default(),
            staking_api_url: std::env::var("STAKING_API_URL").unwrap_or_default(),
            poll_interval: parse_env("MONITOR_POLL_INTERVAL", 300)?,
            slack_webhook_url: std::env::var("SLACK_WEBHOOK_URL").unwrap_or_default(),
            keystore_path: std::env::var("KEYSTORE_PATH")
                .unwrap_or_else(|_| "/keystore".to_string())
                .into(),
            data_path: std::env::var("DATA_PATH")
                .unwrap_or_else(|_| "/data".to_string())
                .into(),
            error_alert_threshold: parse_env("ERROR_ALERT_THRESHOLD", 3)?,
            error_alert_cooldown: parse_env("ERROR_ALERT_COOLDOWN", 3600)?,
        })
    }

    /// sequencers.json lives in the keystore volume (read/write)
    pub fn sequencers_file(&self) -> PathBuf {
        self.keystore_path.join("sequencers.json")
    }

    /// Known-mapping state file, in the data volume
    pub fn state_file(&self) -> PathBuf {
        self.data_path.join("coinbase-monitor-state.json")
    }

    /// Audit snapshot of the latest mapping set, in the data volume
    pub fn mappings_file(&self) -> PathBuf {
        self.data_path.join("coinbase-mappings.json")
    }
}

fn parse_env<T>(name: &str, default: T) -> Result<T, config::ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(name) {
        Ok(raw) => raw.parse::<T>().map_err(|e| {
            config::ConfigError::Message(format!(
                "{} must be an unsigned integer, got '{}': {}",
                name, raw, e
            ))
        }),
        Err(_) => Ok(default),
    }
}
