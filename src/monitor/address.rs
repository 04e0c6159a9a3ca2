/// Normalize an Ethereum address to lowercase for comparison.
///
/// Every address equality check and map key in the monitor goes through
/// this first; raw casing is only kept for display and for values written
/// back into sequencers.json.
pub fn normalize_address(addr: &str) -> String {
    addr.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_address() {
        assert_eq!(normalize_address("0xABCD"), "0xabcd");
        assert_eq!(normalize_address("0xabcd"), "0xabcd");
        assert_eq!(normalize_address(""), "");
    }

    #[test]
    fn test_normalize_is_case_invariant() {
        let addr = "0xAbCdEf1234567890aBcDeF1234567890AbCdEf12";
        assert_eq!(
            normalize_address(&addr.to_uppercase()),
            normalize_address(&addr.to_lowercase())
        );
        assert_eq!(normalize_address(addr), normalize_address(&addr.to_uppercase()));
    }
}
