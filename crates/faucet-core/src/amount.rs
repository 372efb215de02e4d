//! transfer amount, held as whole tenths of an ether

use ethers::types::U256;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 0.1 ETH in wei
const WEI_PER_TENTH: u64 = 100_000_000_000_000_000;

/// amount selectable on the slider: 0.1 ..= 10 ETH in 0.1 steps
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Amount {
    tenths: u32,
}

impl Amount {
    pub const MIN_TENTHS: u32 = 1;
    pub const MAX_TENTHS: u32 = 100;
    pub const MIN: Amount = Amount { tenths: Self::MIN_TENTHS };
    pub const MAX: Amount = Amount { tenths: Self::MAX_TENTHS };
    pub const ONE_ETH: Amount = Amount { tenths: 10 };

    /// slider marks shown under the amount selector
    pub const MARKS: [Amount; 4] = [
        Amount { tenths: 1 },
        Amount { tenths: 10 },
        Amount { tenths: 50 },
        Amount { tenths: 100 },
    ];

    /// exact constructor, `None` when out of bounds
    pub fn from_tenths(tenths: u32) -> Option<Self> {
        (Self::MIN_TENTHS..=Self::MAX_TENTHS)
            .contains(&tenths)
            .then_some(Self { tenths })
    }

    /// snap a slider value to the nearest step and clamp into bounds
    pub fn from_eth_f64(eth: f64) -> Self {
        let tenths = if eth.is_finite() {
            (eth * 10.0).round().clamp(Self::MIN_TENTHS as f64, Self::MAX_TENTHS as f64) as u32
        } else {
            Self::MIN_TENTHS
        };
        Self { tenths }
    }

    pub fn tenths(&self) -> u32 {
        self.tenths
    }

    pub fn as_eth_f64(&self) -> f64 {
        self.tenths as f64 / 10.0
    }

    pub fn to_wei(&self) -> U256 {
        U256::from(self.tenths) * U256::from(WEI_PER_TENTH)
    }
}

impl Default for Amount {
    fn default() -> Self {
        Self::ONE_ETH
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.tenths / 10;
        let frac = self.tenths % 10;
        if frac == 0 {
            write!(f, "{}", whole)
        } else {
            write!(f, "{}.{}", whole, frac)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ethers::utils::parse_ether;

    #[test]
    fn test_bounds() {
        assert!(Amount::from_tenths(0).is_none());
        assert!(Amount::from_tenths(101).is_none());
        assert_eq!(Amount::from_tenths(1), Some(Amount::MIN));
        assert_eq!(Amount::from_tenths(100), Some(Amount::MAX));
    }

    #[test]
    fn test_slider_quantization() {
        assert_eq!(Amount::from_eth_f64(0.0), Amount::MIN);
        assert_eq!(Amount::from_eth_f64(42.0), Amount::MAX);
        assert_eq!(Amount::from_eth_f64(2.449).tenths(), 24);
        assert_eq!(Amount::from_eth_f64(0.30000000000000004).tenths(), 3);
        assert_eq!(Amount::from_eth_f64(f64::NAN), Amount::MIN);
    }

    #[test]
    fn test_display() {
        assert_eq!(Amount::MIN.to_string(), "0.1");
        assert_eq!(Amount::ONE_ETH.to_string(), "1");
        assert_eq!(Amount::from_tenths(55).unwrap().to_string(), "5.5");
        assert_eq!(Amount::MAX.to_string(), "10");
    }

    #[test]
    fn test_wei_matches_parse_ether() {
        for tenths in [1, 10, 55, 100] {
            let amount = Amount::from_tenths(tenths).unwrap();
            assert_eq!(amount.to_wei(), parse_ether(amount.to_string()).unwrap());
        }
    }
}
