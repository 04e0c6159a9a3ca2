use serde::{Deserialize, Serialize};

use crate::monitor::address::normalize_address;
use crate::monitor::store::MonitorState;
use crate::staking::models::DelegationRecord;

/// One attester → split-contract association extracted from the dashboard,
/// with the delegation details carried along for notifications and the
/// audit snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mapping {
    pub attester_address: String,
    pub split_contract: String,
    pub staked_amount: String,
    pub staker_address: String,
    pub tx_hash: String,
    pub block_number: String,
}

/// Diff freshly fetched delegation records against the known-mapping state.
///
/// Returns the full mapping set plus the subset that is new or changed,
/// both in input order. Records missing an attester or split-contract
/// address are malformed upstream data and are skipped silently. The state
/// is updated in place as changes are found, so a later record for the
/// same attester within one batch is classified against the value the
/// earlier record just wrote; the caller persists the state once per cycle.
pub fn reconcile(
    records: &[DelegationRecord],
    state: &mut MonitorState,
) -> (Vec<Mapping>, Vec<Mapping>) {
    let mut all_mappings = Vec::new();
    let mut new_or_changed = Vec::new();

    for record in records {
        if record.attester_address.is_empty() || record.split_contract_address.is_empty() {
            continue;
        }

        let mapping = Mapping {
            attester_address: record.attester_address.clone(),
            split_contract: record.split_contract_address.clone(),
            staked_amount: record.staked_amount.clone(),
            staker_address: record.staker_address.clone(),
            tx_hash: record.tx_hash.clone(),
            block_number: record.block_number.clone(),
        };

        let key = normalize_address(&mapping.attester_address);
        let known_split = state.known_stakes.get(&key).map(String::as_str).unwrap_or("");

        if normalize_address(known_split) != normalize_address(&mapping.split_contract) {
            state
                .known_stakes
                .insert(key, mapping.split_contract.clone());
            new_or_changed.push(mapping.clone());
        }

        all_mappings.push(mapping);
    }

    (all_mappings, new_or_changed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(attester: &str, split: &str) -> DelegationRecord {
        DelegationRecord {
            attester_address: attester.to_string(),
            split_contract_address: split.to_string(),
            staked_amount: "200000000000000000000000".to_string(),
            staker_address: "0xDelegator".to_string(),
            tx_hash: "0xTx".to_string(),
            block_number: "1000".to_string(),
        }
    }

    #[test]
    fn test_fresh_state_classifies_everything_as_new() {
        let records = vec![
            record("0x1111", "0xAAAA"),
            record("0x2222", "0xBBBB"),
            record("0x3333", "0xCCCC"),
        ];
        let mut state = MonitorState::default();

        let (all, changed) = reconcile(&records, &mut state);

        assert_eq!(all.len(), 3);
        assert_eq!(changed.len(), 3);
        assert_eq!(
            state.known_stakes.get("0x1111"),
            Some(&"0xAAAA".to_string())
        );
    }

    #[test]
    fn test_second_run_with_same_records_is_idempotent() {
        let records = vec![record("0x1111", "0xAAAA"), record("0x2222", "0xBBBB")];
        let mut state = MonitorState::default();

        reconcile(&records, &mut state);
        let (all, changed) = reconcile(&records, &mut state);

        assert_eq!(all.len(), 2);
        assert!(changed.is_empty());
    }

    #[test]
    fn test_changed_split_contract_is_reclassified() {
        let mut state = MonitorState::default();
        reconcile(&[record("0x1111", "0xAAAA")], &mut state);

        let (_, changed) = reconcile(&[record("0x1111", "0xDDDD")], &mut state);

        assert_eq!(changed.len(), 1);
        assert_eq!(changed[0].split_contract, "0xDDDD");
        assert_eq!(
            state.known_stakes.get("0x1111"),
            Some(&"0xDDDD".to_string())
        );
    }

    #[test]
    fn test_comparison_is_case_insensitive() {
        let mut state = MonitorState::default();
        reconcile(&[record("0x1111", "0xAAAA")], &mut state);

        // Same contract, different casing: not a change.
        let (_, changed) = reconcile(&[record("0X1111", "0xaaaa")], &mut state);
        assert!(changed.is_empty());
    }

    #[test]
    fn test_malformed_records_are_skipped() {
        let records = vec![
            record("", "0xAAAA"),
            record("0x2222", ""),
            record("0x3333", "0xCCCC"),
        ];
        let mut state = MonitorState::default();

        let (all, changed) = reconcile(&records, &mut state);

        assert_eq!(all.len(), 1);
        assert_eq!(changed.len(), 1);
        assert_eq!(all[0].attester_address, "0x3333");
    }

    #[test]
    fn test_duplicate_attester_later_record_wins() {
        let records = vec![record("0x1111", "0xAAAA"), record("0x1111", "0xBBBB")];
        let mut state = MonitorState::default();

        let (all, changed) = reconcile(&records, &mut state);

        // Both records are classified: the first against the empty store,
        // the second against the value the first just wrote.
        assert_eq!(all.len(), 2);
        assert_eq!(changed.len(), 2);
        assert_eq!(
            state.known_stakes.get("0x1111"),
            Some(&"0xBBBB".to_string())
        );
    }

    #[test]
    fn test_duplicate_attester_same_split_not_reclassified() {
        let records = vec![record("0x1111", "0xAAAA"), record("0x1111", "0xAAAA")];
        let mut state = MonitorState::default();

        let (all, changed) = reconcile(&records, &mut state);

        assert_eq!(all.len(), 2);
        assert_eq!(changed.len(), 1);
    }
}
