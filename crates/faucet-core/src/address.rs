//! recipient classification
//!
//! a recipient is either a literal address or an ens name. literal addresses
//! follow the ethers rules: optional `0x` prefix, 40 hex digits, and if the
//! digits are mixed case they must match the EIP-55 checksum.

use ethers::types::Address;
use ethers::utils::to_checksum;

/// reserved suffix for ens names
pub const ENS_SUFFIX: &str = ".eth";

/// what a typed recipient string turned out to be
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RecipientKind {
    Empty,
    Address(Address),
    EnsCandidate(String),
    Invalid,
}

impl RecipientKind {
    pub fn is_address(&self) -> bool {
        matches!(self, RecipientKind::Address(_))
    }

    pub fn is_ens(&self) -> bool {
        matches!(self, RecipientKind::EnsCandidate(_))
    }
}

/// classify raw input from the recipient field
pub fn classify(input: &str) -> RecipientKind {
    let input = input.trim();
    if input.is_empty() {
        return RecipientKind::Empty;
    }
    if is_ens_candidate(input) {
        // namehash is case sensitive, labels are stored lowercase
        return RecipientKind::EnsCandidate(input.to_lowercase());
    }
    match parse_address(input) {
        Some(address) => RecipientKind::Address(address),
        None => RecipientKind::Invalid,
    }
}

/// true for `name.eth` style input (suffix match is case-insensitive)
pub fn is_ens_candidate(input: &str) -> bool {
    input.len() > ENS_SUFFIX.len()
        && input.is_char_boundary(input.len() - ENS_SUFFIX.len())
        && input[input.len() - ENS_SUFFIX.len()..].eq_ignore_ascii_case(ENS_SUFFIX)
}

/// parse a literal address, enforcing the checksum on mixed-case input
pub fn parse_address(input: &str) -> Option<Address> {
    let body = input
        .strip_prefix("0x")
        .or_else(|| input.strip_prefix("0X"))
        .unwrap_or(input);

    if body.len() != 40 || !body.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }

    let bytes = hex::decode(body).ok()?;
    let address = Address::from_slice(&bytes);

    let has_lower = body.bytes().any(|b| b.is_ascii_lowercase());
    let has_upper = body.bytes().any(|b| b.is_ascii_uppercase());
    if has_lower && has_upper {
        let checksummed = to_checksum(&address, None);
        if checksummed[2..] != *body {
            return None;
        }
    }

    Some(address)
}

/// short label for an address, e.g. `0x742d…b22d`
pub fn truncate_address(address: &Address) -> String {
    let full = to_checksum(address, None);
    format!("{}…{}", &full[..6], &full[full.len() - 4..])
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const CHECKSUMMED: &str = "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed";

    #[test]
    fn test_zero_address_is_valid() {
        let kind = classify("0x0000000000000000000000000000000000000000");
        assert_eq!(kind, RecipientKind::Address(Address::zero()));
    }

    #[test]
    fn test_checksum_enforced_on_mixed_case() {
        assert!(classify(CHECKSUMMED).is_address());

        // flip the case of one letter
        let broken = CHECKSUMMED.replacen("aAeb", "aaeb", 1);
        assert_eq!(classify(&broken), RecipientKind::Invalid);
    }

    #[test]
    fn test_single_case_skips_checksum() {
        assert!(classify(&CHECKSUMMED.to_lowercase()).is_address());
        let upper = format!("0x{}", CHECKSUMMED[2..].to_uppercase());
        assert!(classify(&upper).is_address());
    }

    #[test]
    fn test_prefix_optional() {
        assert!(classify(&CHECKSUMMED[2..]).is_address());
    }

    #[test]
    fn test_bad_lengths_and_chars() {
        assert_eq!(classify("0x1234"), RecipientKind::Invalid);
        assert_eq!(classify("0xZZ00000000000000000000000000000000000000"), RecipientKind::Invalid);
        assert_eq!(classify("hello"), RecipientKind::Invalid);
    }

    #[test]
    fn test_ens_candidates() {
        assert_eq!(
            classify("vitalik.eth"),
            RecipientKind::EnsCandidate("vitalik.eth".into())
        );
        assert_eq!(classify(".eth"), RecipientKind::Invalid);
        assert!(classify("Sub.Name.ETH").is_ens());
    }

    #[test]
    fn test_ens_names_are_lowercased() {
        assert_eq!(
            classify("Vitalik.ETH"),
            RecipientKind::EnsCandidate("vitalik.eth".into())
        );
        assert_eq!(
            classify(" Sub.Name.Eth "),
            RecipientKind::EnsCandidate("sub.name.eth".into())
        );
    }

    #[test]
    fn test_empty_and_whitespace() {
        assert_eq!(classify(""), RecipientKind::Empty);
        assert_eq!(classify("   "), RecipientKind::Empty);
        assert!(classify("  vitalik.eth ").is_ens());
    }

    #[test]
    fn test_truncate() {
        let address: Address = CHECKSUMMED.parse().unwrap();
        assert_eq!(truncate_address(&address), "0x5aAe…eAed");
    }

    proptest! {
        #[test]
        fn prop_eth_suffix_is_never_an_address(name in "[a-zA-Z0-9-]{1,40}") {
            let input = format!("{}.eth", name);
            prop_assert_eq!(classify(&input), RecipientKind::EnsCandidate(input.to_lowercase()));
        }

        #[test]
        fn prop_checksummed_addresses_accepted(bytes in proptest::array::uniform20(any::<u8>())) {
            let address = Address::from(bytes);
            let checksummed = to_checksum(&address, None);
            prop_assert_eq!(classify(&checksummed), RecipientKind::Address(address));
        }
    }
}
