// Coinbase Monitor
//
// Sequential reconciliation cycles: fetch the provider's delegations,
// diff them against the known-mapping state, patch sequencers.json,
// notify. One cycle runs at a time; a failed cycle stops at the point of
// failure and the next cycle starts over from disk state.

pub mod address;
pub mod alerts;
pub mod reconcile;
pub mod sequencers;
pub mod store;

use std::sync::Arc;

use chrono::Utc;
use tokio::time::Duration;
use tracing::{debug, error, info, warn};

use crate::config::MonitorConfig;
use crate::error::AppError;
use crate::monitor::alerts::ErrorTracker;
use crate::monitor::sequencers::CoinbasePatcher;
use crate::monitor::store::MonitorState;
use crate::notify::format;
use crate::notify::NotificationSink;
use crate::staking::ProviderSource;

/// The reconciliation daemon: one provider, one sequencers file.
pub struct Monitor {
    config: MonitorConfig,
    source: Arc<dyn ProviderSource>,
    notifier: Arc<dyn NotificationSink>,
    patcher: CoinbasePatcher,
    tracker: ErrorTracker,
}

impl Monitor {
    pub fn new(
        config: MonitorConfig,
        source: Arc<dyn ProviderSource>,
        notifier: Arc<dyn NotificationSink>,
    ) -> Self {
        let patcher = CoinbasePatcher::new(config.sequencers_file());
        let tracker = ErrorTracker::new(config.error_alert_threshold, config.error_alert_cooldown);
        Self {
            config,
            source,
            notifier,
            patcher,
            tracker,
        }
    }

    /// Run reconciliation cycles forever with a fixed sleep between them.
    /// The first cycle starts immediately.
    pub async fn run(&mut self) {
        loop {
            self.run_cycle().await;

            info!("Sleeping for {} seconds...", self.config.poll_interval);
            tokio::time::sleep(Duration::from_secs(self.config.poll_interval)).await;
        }
    }

    /// One full cycle: check, then announce recovery if a failing streak
    /// that had alerted just ended. Returns the check outcome.
    pub async fn run_cycle(&mut self) -> bool {
        let success = self.check().await;

        if success {
            if let Some(failures) = self.tracker.note_success() {
                let message = format::recovery_message(&self.config.provider_id, failures);
                self.notifier.send(&message).await;
            }
        }

        success
    }

    /// Fetch, reconcile, patch and persist once. Returns false when the
    /// cycle failed and should simply be retried next tick.
    async fn check(&mut self) -> bool {
        info!("Running check for provider {}", self.config.provider_id);

        let provider = match self.source.fetch_provider().await {
            Ok(data) => data,
            Err(e) => {
                self.alert_failure(&e).await;
                warn!("Could not fetch provider data, will retry next cycle");
                return false;
            }
        };

        let provider_name = provider.display_name(&self.config.provider_id);
        info!(
            "Provider: {}, Delegators: {}, Total Staked: {} AZTEC",
            provider_name,
            provider.delegators,
            format::format_token_amount(&provider.total_staked)
        );

        let mut state = MonitorState::load(&self.config.state_file()).await;
        let (all_mappings, new_or_changed) = reconcile::reconcile(&provider.stakes, &mut state);
        info!(
            "Found {} total stakes, {} new/changed",
            all_mappings.len(),
            new_or_changed.len()
        );

        // Audit snapshot; a failed write never stops the cycle.
        if let Err(e) = store::save_mappings_snapshot(
            &self.config.mappings_file(),
            &self.config.provider_id,
            &all_mappings,
        )
        .await
        {
            error!("Failed to save mappings file: {}", e);
        }

        if !new_or_changed.is_empty() {
            let message = format::new_delegation_message(
                &new_or_changed,
                &provider_name,
                &self.config.provider_id,
            );
            self.notifier.send(&message).await;
        }

        if !all_mappings.is_empty() {
            match self.patcher.apply(&all_mappings).await {
                Ok(outcome) if !outcome.changes.is_empty() => {
                    info!("Made {} coinbase updates", outcome.updates);
                    let message = format::coinbase_update_message(
                        &outcome.changes,
                        &provider_name,
                        &self.config.provider_id,
                        &provider.total_staked,
                    );
                    self.notifier.send(&message).await;
                }
                Ok(_) => {
                    debug!("No coinbase updates needed");
                }
                Err(e) => {
                    self.alert_failure(&e).await;
                    return false;
                }
            }
        }

        if let Err(e) = state.save(&self.config.state_file()).await {
            error!("Failed to save state file: {}", e);
        }

        info!("Check complete");
        true
    }

    /// Count a failed cycle and push an error alert once the tracker gates
    /// open. The tracker is only marked when the sink accepted the alert,
    /// so an undelivered alert never arms a recovery announcement.
    async fn alert_failure(&mut self, error: &AppError) {
        self.tracker.note_failure(error.kind_label());
        debug!(
            "Failure streak: {} ({})",
            self.tracker.consecutive_failures(),
            self.tracker.last_error_type().unwrap_or("unknown")
        );

        let now = Utc::now();
        if self.tracker.should_alert(now) {
            let message = format::error_alert_message(
                &self.config.provider_id,
                error.kind_label(),
                error.detail(),
                self.tracker.consecutive_failures(),
                self.config.poll_interval,
            );
            if self.notifier.send(&message).await {
                self.tracker.mark_alerted(now);
            }
        }
    }
}
