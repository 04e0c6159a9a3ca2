// Notification Message Builders
//
// All Slack text lives here so the monitor loop never assembles strings
// inline. Formatting mirrors the dashboard conventions: wei amounts are
// rendered as whole AZTEC tokens, long addresses are shortened.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::monitor::reconcile::Mapping;
use crate::monitor::sequencers::CoinbaseChange;

/// Render a wei string as whole tokens with thousands separators.
/// Non-integer input is passed through untouched.
pub fn format_token_amount(raw: &str) -> String {
    // Wei amounts are integer strings; a fractional value is malformed.
    if raw.contains('.') {
        return raw.to_string();
    }
    let wei: Decimal = match raw.parse() {
        Ok(value) => value,
        Err(_) => return raw.to_string(),
    };
    let tokens = (wei / dec!(1_000_000_000_000_000_000)).round();
    group_thousands(&tokens.to_string())
}

fn group_thousands(value: &str) -> String {
    let (sign, digits) = match value.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", value),
    };
    let mut grouped = String::from(sign);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

/// Shorten a hex address to `0x12345678...abcdef12` form. Truncation is
/// by character, never inside a code point.
pub fn short_address(addr: &str) -> String {
    let len = addr.chars().count();
    if len <= 18 {
        return addr.to_string();
    }
    let head: String = addr.chars().take(10).collect();
    let tail: String = addr.chars().skip(len - 8).collect();
    format!("{}...{}", head, tail)
}

pub fn error_alert_message(
    provider_id: &str,
    error_type: &str,
    error_message: &str,
    consecutive_failures: u32,
    retry_secs: u64,
) -> String {
    format!(
        "🚨 *Aztec Coinbase Monitor Error*\n\n\
         Provider ID: {}\n\
         Error Type: {}\n\n\
         `{}`\n\n\
         Consecutive failures: {}\n\
         Will retry in {} seconds.",
        provider_id, error_type, error_message, consecutive_failures, retry_secs
    )
}

pub fn recovery_message(provider_id: &str, failures: u32) -> String {
    format!(
        "✅ *Aztec Coinbase Monitor Recovered*\n\n\
         Provider ID: {}\n\
         Service resumed normal operation after {} failed attempt(s).",
        provider_id, failures
    )
}

pub fn coinbase_update_message(
    changes: &[CoinbaseChange],
    provider_name: &str,
    provider_id: &str,
    total_staked: &str,
) -> String {
    let change_lines: Vec<String> = changes
        .iter()
        .map(|change| {
            format!(
                "• Attester: `{}`\n  Split Contract: `{}`",
                short_address(&change.attester),
                change.new_coinbase
            )
        })
        .collect();

    format!(
        "🔔 *Aztec Coinbase Update*\n\n\
         Provider: {} (ID: {})\n\
         Total Staked: {} AZTEC\n\n\
         *{} coinbase address(es) updated:*\n\n\
         {}\n\n\
         ✅ `sequencers.json` has been automatically updated.\n\
         ⚠️ *Restart your validator to apply changes.*",
        provider_name,
        provider_id,
        format_token_amount(total_staked),
        changes.len(),
        change_lines.join("\n\n")
    )
}

pub fn new_delegation_message(
    mappings: &[Mapping],
    provider_name: &str,
    provider_id: &str,
) -> String {
    let delegation_lines: Vec<String> = mappings
        .iter()
        .map(|mapping| {
            format!(
                "• Attester: `{}`\n  Split Contract: `{}`\n  Staked: {} AZTEC",
                short_address(&mapping.attester_address),
                mapping.split_contract,
                format_token_amount(&mapping.staked_amount)
            )
        })
        .collect();

    format!(
        "🆕 *New Aztec Delegation(s) Detected*\n\n\
         Provider: {} (ID: {})\n\n\
         *{} new delegation(s):*\n\n\
         {}",
        provider_name,
        provider_id,
        mappings.len(),
        delegation_lines.join("\n\n")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_mapping() -> Mapping {
        Mapping {
            attester_address: "0x1234567890abcdef1234567890abcdef12345678".to_string(),
            split_contract: "0xAABBCCDDEEFF00112233445566778899AABBCCDD".to_string(),
            staked_amount: "200000000000000000000000".to_string(),
            staker_address: "0x9999999999999999999999999999999999999999".to_string(),
            tx_hash: "0xfeed".to_string(),
            block_number: "100".to_string(),
        }
    }

    #[test]
    fn test_format_token_amount() {
        assert_eq!(format_token_amount("200000000000000000000000"), "200,000");
        assert_eq!(
            format_token_amount("1600000000000000000000000"),
            "1,600,000"
        );
        assert_eq!(format_token_amount("1000000000000000000"), "1");
        assert_eq!(format_token_amount("0"), "0");
    }

    #[test]
    fn test_format_token_amount_passes_through_garbage() {
        assert_eq!(format_token_amount("invalid"), "invalid");
        assert_eq!(format_token_amount(""), "");
        assert_eq!(format_token_amount("1.5"), "1.5");
    }

    #[test]
    fn test_short_address() {
        assert_eq!(
            short_address("0x1234567890abcdef1234567890abcdef12345678"),
            "0x12345678...12345678"
        );
        assert_eq!(short_address("0xabc"), "0xabc");
    }

    #[test]
    fn test_short_address_multibyte_input() {
        // 11 characters but 29 bytes; short by character count.
        let padded = format!("0x{}", "€".repeat(9));
        assert_eq!(short_address(&padded), padded);

        let long = format!("0x{}", "€".repeat(20));
        assert_eq!(
            short_address(&long),
            format!("0x{}...{}", "€".repeat(8), "€".repeat(8))
        );
    }

    #[test]
    fn test_error_alert_message_contents() {
        let message = error_alert_message("42", "API Fetch Failed", "HTTP error 503", 3, 300);
        assert!(message.contains("🚨 *Aztec Coinbase Monitor Error*"));
        assert!(message.contains("Provider ID: 42"));
        assert!(message.contains("Error Type: API Fetch Failed"));
        assert!(message.contains("`HTTP error 503`"));
        assert!(message.contains("Consecutive failures: 3"));
        assert!(message.contains("Will retry in 300 seconds."));
    }

    #[test]
    fn test_recovery_message_contents() {
        let message = recovery_message("42", 5);
        assert!(message.contains("✅ *Aztec Coinbase Monitor Recovered*"));
        assert!(message.contains("after 5 failed attempt(s)."));
    }

    #[test]
    fn test_coinbase_update_message_contents() {
        let changes = vec![CoinbaseChange {
            attester: "0x1234567890abcdef1234567890abcdef12345678".to_string(),
            old_coinbase: "0xold".to_string(),
            new_coinbase: "0xAABBCCDDEEFF00112233445566778899AABBCCDD".to_string(),
        }];
        let message =
            coinbase_update_message(&changes, "Acme Staking", "42", "1600000000000000000000000");
        assert!(message.contains("🔔 *Aztec Coinbase Update*"));
        assert!(message.contains("Provider: Acme Staking (ID: 42)"));
        assert!(message.contains("Total Staked: 1,600,000 AZTEC"));
        assert!(message.contains("*1 coinbase address(es) updated:*"));
        assert!(message.contains("• Attester: `0x12345678...12345678`"));
        assert!(message.contains("Split Contract: `0xAABBCCDDEEFF00112233445566778899AABBCCDD`"));
        assert!(message.contains("⚠️ *Restart your validator to apply changes.*"));
    }

    #[test]
    fn test_new_delegation_message_contents() {
        let message = new_delegation_message(&[sample_mapping()], "Acme Staking", "42");
        assert!(message.contains("🆕 *New Aztec Delegation(s) Detected*"));
        assert!(message.contains("*1 new delegation(s):*"));
        assert!(message.contains("Staked: 200,000 AZTEC"));
    }
}
