//! well-known chain ids

/// (chain id, label)
pub const KNOWN_CHAINS: &[(u64, &str)] = &[
    (1, "Ethereum Mainnet"),
    (5, "Goerli"),
    (10, "OP Mainnet"),
    (137, "Polygon"),
    (1337, "Local Geth (dev)"),
    (8453, "Base"),
    (17000, "Holesky"),
    (31337, "Anvil / Hardhat"),
    (42161, "Arbitrum One"),
    (80002, "Polygon Amoy"),
    (84532, "Base Sepolia"),
    (560048, "Hoodi"),
    (11155111, "Sepolia"),
    (11155420, "OP Sepolia"),
];

/// label for a chain id, `Chain {id}` if unknown
pub fn network_label(chain_id: u64) -> String {
    KNOWN_CHAINS
        .iter()
        .find(|(id, _)| *id == chain_id)
        .map(|(_, label)| (*label).to_string())
        .unwrap_or_else(|| format!("Chain {}", chain_id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_and_unknown() {
        assert_eq!(network_label(1337), "Local Geth (dev)");
        assert_eq!(network_label(11155111), "Sepolia");
        assert_eq!(network_label(424242), "Chain 424242");
    }

    #[test]
    fn test_ids_unique() {
        let mut ids: Vec<u64> = KNOWN_CHAINS.iter().map(|(id, _)| *id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), KNOWN_CHAINS.len());
    }
}
