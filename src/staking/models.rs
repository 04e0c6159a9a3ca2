use serde::{Deserialize, Serialize};

fn default_amount() -> String {
    "0".to_string()
}

/// One delegation reported by the staking dashboard. Every field is
/// tolerant of absence; records without an attester or split-contract
/// address are dropped later by the reconciler.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DelegationRecord {
    #[serde(default)]
    pub attester_address: String,
    #[serde(default)]
    pub split_contract_address: String,
    #[serde(default = "default_amount")]
    pub staked_amount: String,
    #[serde(default)]
    pub staker_address: String,
    #[serde(default)]
    pub tx_hash: String,
    #[serde(default)]
    pub block_number: String,
}

/// Provider payload from `GET /providers/{id}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderData {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default = "default_amount")]
    pub total_staked: String,
    #[serde(default)]
    pub delegators: u64,
    #[serde(default)]
    pub stakes: Vec<DelegationRecord>,
}

impl ProviderData {
    /// Display name, falling back to the provider id when the dashboard
    /// did not report one.
    pub fn display_name(&self, provider_id: &str) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| format!("Provider {}", provider_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserializes_dashboard_payload() {
        let payload = serde_json::json!({
            "id": 123,
            "name": "TestProvider",
            "totalStaked": "1600000000000000000000000",
            "delegators": 8,
            "stakes": [
                {
                    "attesterAddress": "0x1111111111111111111111111111111111111111",
                    "splitContractAddress": "0xAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA",
                    "stakedAmount": "200000000000000000000000",
                    "stakerAddress": "0xDelegator1",
                    "txHash": "0xTx1",
                    "blockNumber": "1000"
                }
            ]
        });

        let provider: ProviderData = serde_json::from_value(payload).unwrap();
        assert_eq!(provider.display_name("123"), "TestProvider");
        assert_eq!(provider.total_staked, "1600000000000000000000000");
        assert_eq!(provider.delegators, 8);
        assert_eq!(provider.stakes.len(), 1);
        assert_eq!(
            provider.stakes[0].split_contract_address,
            "0xAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA"
        );
    }

    #[test]
    fn test_missing_fields_default() {
        let provider: ProviderData =
            serde_json::from_value(serde_json::json!({ "stakes": [{}] })).unwrap();

        assert_eq!(provider.display_name("42"), "Provider 42");
        assert_eq!(provider.total_staked, "0");
        assert_eq!(provider.delegators, 0);
        assert_eq!(provider.stakes[0].attester_address, "");
        assert_eq!(provider.stakes[0].staked_amount, "0");
    }
}
