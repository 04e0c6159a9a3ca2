use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::error::{AppError, AppResult};
use crate::staking::models::ProviderData;

const FETCH_TIMEOUT_SECS: u64 = 30;
const USER_AGENT: &str = "Aztec-Coinbase-Monitor/1.0";

/// Source of delegation data for one provider. The monitor treats any
/// non-success outcome uniformly, whatever the transport-level cause.
#[async_trait]
pub trait ProviderSource: Send + Sync {
    async fn fetch_provider(&self) -> AppResult<ProviderData>;
}

/// Staking dashboard API client.
pub struct DashboardClient {
    client: Client,
    url: String,
}

impl DashboardClient {
    pub fn new(base_url: &str, provider_id: &str) -> Self {
        Self {
            client: Client::new(),
            url: format!("{}/providers/{}", base_url, provider_id),
        }
    }
}

#[async_trait]
impl ProviderSource for DashboardClient {
    async fn fetch_provider(&self) -> AppResult<ProviderData> {
        debug!("Fetching provider data from {}", self.url);

        let response = self
            .client
            .get(&self.url)
            .header("User-Agent", USER_AGENT)
            .timeout(Duration::from_secs(FETCH_TIMEOUT_SECS))
            .send()
            .await
            .map_err(|e| classify_request_error(&self.url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Fetch(format!(
                "HTTP error {}: {}",
                status.as_u16(),
                self.url
            )));
        }

        response
            .json::<ProviderData>()
            .await
            .map_err(|e| AppError::Fetch(format!("JSON parse error: {}", e)))
    }
}

fn classify_request_error(url: &str, error: reqwest::Error) -> AppError {
    if error.is_timeout() {
        AppError::Fetch(format!(
            "Request timeout after {}s: {}",
            FETCH_TIMEOUT_SECS, url
        ))
    } else if error.is_connect() {
        AppError::Fetch(format!("Connection error: {}", error))
    } else {
        AppError::Fetch(format!("Request failed: {}", error))
    }
}
