// Sequencers patcher - rewrites coinbase addresses in sequencers.json
//
// The file is owned by the validator process; the monitor reads and
// rewrites it wholesale, touching nothing but the targeted coinbase
// values. Writes go through a temp file + rename so the validator never
// observes a half-written document, and are skipped entirely when no
// entry changed.

use std::collections::HashMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tokio::fs;
use tracing::info;

use crate::error::{AppError, AppResult};
use crate::monitor::address::normalize_address;
use crate::monitor::reconcile::Mapping;

/// One validator entry. Only `coinbase` is ever touched; every other key
/// round-trips verbatim through the flattened map.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidatorEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coinbase: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The whole sequencers document; unknown top-level keys are preserved.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SequencersFile {
    #[serde(default)]
    pub validators: Vec<ValidatorEntry>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A coinbase rewrite applied to one validator entry.
#[derive(Debug, Clone, Serialize)]
pub struct CoinbaseChange {
    pub attester: String,
    pub old_coinbase: String,
    pub new_coinbase: String,
}

/// Result of one patch pass over the sequencers file.
#[derive(Debug, Default)]
pub struct PatchOutcome {
    pub updates: usize,
    pub changes: Vec<CoinbaseChange>,
}

/// Applies split-contract mappings onto the validator list.
pub struct CoinbasePatcher {
    path: PathBuf,
}

impl CoinbasePatcher {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Apply the current mapping batch to the sequencers file.
    ///
    /// A missing or malformed file is a hard error and mutates nothing.
    /// A write failure after patching is reported as an error so callers
    /// never mistake it for an applied update.
    pub async fn apply(&self, mappings: &[Mapping]) -> AppResult<PatchOutcome> {
        let mut doc = self.load().await?;

        let lookup = build_lookup(mappings);
        let changes = patch_validators(&mut doc, &lookup);
        let outcome = PatchOutcome {
            updates: changes.len(),
            changes,
        };

        if outcome.updates > 0 {
            self.persist(&doc).await?;
            info!(
                "Updated {} coinbase addresses in {}",
                outcome.updates,
                self.path.display()
            );
        }

        Ok(outcome)
    }

    async fn load(&self) -> AppResult<SequencersFile> {
        let bytes = fs::read(&self.path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                AppError::SequencersRead(format!(
                    "Sequencers file not found: {}",
                    self.path.display()
                ))
            } else {
                AppError::SequencersRead(format!("{}: {}", self.path.display(), e))
            }
        })?;

        serde_json::from_slice(&bytes)
            .map_err(|e| AppError::SequencersParse(format!("{}: {}", self.path.display(), e)))
    }

    /// Write the whole document back via temp file + rename. The temp file
    /// lives next to the target so the rename stays on one filesystem.
    async fn persist(&self, doc: &SequencersFile) -> AppResult<()> {
        let json = serde_json::to_vec_pretty(doc)
            .map_err(|e| AppError::SequencersWrite(format!("serialize: {}", e)))?;

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, &json)
            .await
            .map_err(|e| AppError::SequencersWrite(format!("{}: {}", tmp.display(), e)))?;
        fs::rename(&tmp, &self.path).await.map_err(|e| {
            AppError::SequencersWrite(format!("rename into {}: {}", self.path.display(), e))
        })?;

        Ok(())
    }
}

/// Build the attester → split-contract lookup from the current batch.
/// Later entries win on key collision, matching input order.
fn build_lookup(mappings: &[Mapping]) -> HashMap<String, String> {
    mappings
        .iter()
        .map(|m| {
            (
                normalize_address(&m.attester_address),
                m.split_contract.clone(),
            )
        })
        .collect()
}

/// Rewrite coinbase fields in place and return the changes in validator
/// order. The match key is each entry's *current* coinbase value, so an
/// entry that was already rewritten to its split contract no longer
/// matches the original attester key. Matching is case-insensitive; the
/// written value keeps the mapping's original casing.
pub(crate) fn patch_validators(
    doc: &mut SequencersFile,
    lookup: &HashMap<String, String>,
) -> Vec<CoinbaseChange> {
    let mut changes = Vec::new();

    for validator in &mut doc.validators {
        let current = validator.coinbase.as_deref().unwrap_or("");
        let normalized = normalize_address(current);

        if let Some(new_coinbase) = lookup.get(&normalized) {
            if normalize_address(new_coinbase) != normalized {
                changes.push(CoinbaseChange {
                    attester: current.to_string(),
                    old_coinbase: current.to_string(),
                    new_coinbase: new_coinbase.clone(),
                });
                validator.coinbase = Some(new_coinbase.clone());
            }
        }
    }

    changes
}
