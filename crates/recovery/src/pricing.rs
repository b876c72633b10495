//! Message prices in honey.
//!
//! Honey is an internal unit of relative message pricing: it sets the price of
//! one message type relative to another, irrespective of any reference
//! currency. An external oracle converts an amount of honey into the
//! settlement currency (wei by default).
//!
//! The placeholder prices derive from the average monthly bandwidth cost in
//! the US, roughly $0.35 per GB, which is 8 636 144 578 wei per 4 KiB chunk.
//! A retrieve request is priced at 10% of that and a chunk delivery at 90%.

use alloy_primitives::U256;

/// Price of a retrieve request, in honey.
pub const RETRIEVE_REQUEST_PRICE: u64 = 863_614_458;

/// Price of a chunk delivery, in honey.
pub const CHUNK_DELIVERY_PRICE: u64 = 7_772_530_120;

/// Default price of one honey in the settlement currency (wei).
pub const DEFAULT_HONEY_PRICE: u64 = 1;

/// A source of honey prices in the settlement currency.
pub trait HoneyOracle {
    /// Returns the price of one honey.
    fn honey_price(&self) -> U256;

    /// Converts `honey` into the settlement currency.
    fn price(&self, honey: u64) -> U256 {
        U256::from(honey).saturating_mul(self.honey_price())
    }
}

/// An oracle quoting a constant honey price.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedHoneyOracle(U256);

impl FixedHoneyOracle {
    /// Creates an oracle quoting `price` per honey.
    pub const fn new(price: U256) -> Self {
        Self(price)
    }
}

impl Default for FixedHoneyOracle {
    fn default() -> Self {
        Self(U256::from_limbs([DEFAULT_HONEY_PRICE, 0, 0, 0]))
    }
}

impl HoneyOracle for FixedHoneyOracle {
    fn honey_price(&self) -> U256 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_prices() {
        // Request and delivery together cost one chunk's worth of bandwidth.
        assert_eq!(RETRIEVE_REQUEST_PRICE + CHUNK_DELIVERY_PRICE, 8_636_144_578);
        assert!(CHUNK_DELIVERY_PRICE > 8 * RETRIEVE_REQUEST_PRICE);
    }

    #[test]
    fn test_default_oracle_is_identity() {
        let oracle = FixedHoneyOracle::default();
        assert_eq!(
            oracle.price(CHUNK_DELIVERY_PRICE),
            U256::from(CHUNK_DELIVERY_PRICE)
        );
    }

    #[test]
    fn test_fixed_oracle_scales() {
        let oracle = FixedHoneyOracle::new(U256::from(1_000u64));
        assert_eq!(
            oracle.price(RETRIEVE_REQUEST_PRICE),
            U256::from(863_614_458_000u64)
        );
        assert_eq!(FixedHoneyOracle::new(U256::MAX).price(2), U256::MAX);
    }
}
