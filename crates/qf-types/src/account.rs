use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::{AssetError, QfResult};

/// A single allocated position inside an account snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocatedAsset {
    pub symbol: String,
    /// Allocation as a percentage of the account, 0 to 100
    pub allocation: Decimal,
    /// Current market value of the position
    pub value: Decimal,
    /// Annualised expected return, if an estimate exists
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_return: Option<Decimal>,
}

impl AllocatedAsset {
    pub fn new(symbol: &str, allocation: Decimal, value: Decimal) -> Self {
        Self {
            symbol: symbol.to_string(),
            allocation,
            value,
            expected_return: None,
        }
    }

    pub fn with_expected_return(mut self, expected_return: Decimal) -> Self {
        self.expected_return = Some(expected_return);
        self
    }
}

/// Point-in-time account state supplied by the caller.
///
/// Never persisted by the engine; every call must supply a fresh snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountSnapshot {
    /// Balance the account started from (drawdown reference)
    pub initial_balance: Decimal,
    pub assets: Vec<AllocatedAsset>,
}

impl AccountSnapshot {
    pub fn new(initial_balance: Decimal) -> Self {
        Self {
            initial_balance,
            assets: Vec::new(),
        }
    }

    pub fn with_assets(mut self, assets: Vec<AllocatedAsset>) -> Self {
        self.assets = assets;
        self
    }

    /// Sum of current position values.
    pub fn current_total_value(&self) -> Decimal {
        self.assets.iter().map(|a| a.value).sum()
    }

    /// Check the snapshot invariants: non-negative balance and values,
    /// allocations in [0, 100].
    pub fn validate(&self) -> QfResult<()> {
        if self.initial_balance < Decimal::ZERO {
            return Err(AssetError::NegativeBalance {
                balance: self.initial_balance,
            }
            .into());
        }
        for asset in &self.assets {
            if asset.allocation < Decimal::ZERO || asset.allocation > Decimal::from(100) {
                return Err(AssetError::AllocationOutOfRange {
                    symbol: asset.symbol.clone(),
                    allocation: asset.allocation,
                }
                .into());
            }
            if asset.value < Decimal::ZERO {
                return Err(AssetError::NegativeValue {
                    symbol: asset.symbol.clone(),
                    value: asset.value,
                }
                .into());
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_snapshot_total_value() {
        let account = AccountSnapshot::new(dec!(10000)).with_assets(vec![
            AllocatedAsset::new("BTC", dec!(60), dec!(6000)),
            AllocatedAsset::new("ETH", dec!(40), dec!(4000)),
        ]);
        assert_eq!(account.current_total_value(), dec!(10000));
    }

    #[test]
    fn test_empty_snapshot_total_is_zero() {
        let account = AccountSnapshot::new(dec!(10000));
        assert_eq!(account.current_total_value(), Decimal::ZERO);
    }

    #[test]
    fn test_validate_rejects_negative_balance() {
        let account = AccountSnapshot::new(dec!(-1));
        assert!(account.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_allocation_above_100() {
        let account = AccountSnapshot::new(dec!(10000))
            .with_assets(vec![AllocatedAsset::new("BTC", dec!(120), dec!(12000))]);
        assert!(account.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_negative_value() {
        let account = AccountSnapshot::new(dec!(10000))
            .with_assets(vec![AllocatedAsset::new("BTC", dec!(50), dec!(-100))]);
        assert!(account.validate().is_err());
    }

    #[test]
    fn test_snapshot_serialization_roundtrip() {
        let account = AccountSnapshot::new(dec!(10000)).with_assets(vec![
            AllocatedAsset::new("BTC", dec!(100), dec!(9000)).with_expected_return(dec!(0.12)),
        ]);
        let json = serde_json::to_string(&account).unwrap();
        let deserialized: AccountSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(account, deserialized);
    }
}
