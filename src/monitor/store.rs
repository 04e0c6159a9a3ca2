use std::collections::HashMap;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::{debug, warn};

use crate::error::{AppError, AppResult};
use crate::monitor::reconcile::Mapping;

/// Durable record of attester → split-contract mappings already seen.
///
/// Keys in `known_stakes` are normalized attester addresses; values keep
/// the casing the dashboard reported.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MonitorState {
    #[serde(default)]
    pub known_stakes: HashMap<String, String>,
    #[serde(default)]
    pub last_updated: Option<DateTime<Utc>>,
}

impl MonitorState {
    /// Load the state file. A missing or unparsable document resets to an
    /// empty state: the sequencers file remains the source of truth, so a
    /// lost diff classification self-heals on the next cycle.
    pub async fn load(path: &Path) -> Self {
        match fs::read(path).await {
            Ok(bytes) => match serde_json::from_slice(&bytes) {
                Ok(state) => state,
                Err(e) => {
                    warn!(
                        "State file {} is corrupt ({}), starting fresh",
                        path.display(),
                        e
                    );
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }

    /// Persist the state with a fresh timestamp.
    pub async fn save(&mut self, path: &Path) -> AppResult<()> {
        self.last_updated = Some(Utc::now());
        let json = serde_json::to_vec_pretty(self)
            .map_err(|e| AppError::State(format!("serialize state: {}", e)))?;
        fs::write(path, json)
            .await
            .map_err(|e| AppError::State(format!("write {}: {}", path.display(), e)))?;
        debug!("💾 State file saved: {}", path.display());
        Ok(())
    }
}

#[derive(Debug, Serialize)]
struct MappingsSnapshot<'a> {
    last_updated: DateTime<Utc>,
    provider_id: &'a str,
    mappings: &'a [Mapping],
}

/// Write the audit snapshot of the latest mapping set. Overwritten every
/// cycle whether or not anything changed; never read back by the monitor.
pub async fn save_mappings_snapshot(
    path: &Path,
    provider_id: &str,
    mappings: &[Mapping],
) -> AppResult<()> {
    let snapshot = MappingsSnapshot {
        last_updated: Utc::now(),
        provider_id,
        mappings,
    };
    let json = serde_json::to_vec_pretty(&snapshot)
        .map_err(|e| AppError::State(format!("serialize mappings: {}", e)))?;
    fs::write(path, json)
        .await
        .map_err(|e| AppError::State(format!("write {}: {}", path.display(), e)))?;
    debug!("💾 Mappings file saved: {}", path.display());
    Ok(())
}
