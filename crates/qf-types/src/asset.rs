use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::{AssetError, QfResult};

/// One holding or candidate holding supplied by a market-data collaborator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    /// Unique ticker symbol (e.g. "BTC")
    pub symbol: String,
    /// Display name
    pub name: String,
    /// Current fraction of the portfolio, 0 to 1
    pub weight: Decimal,
    /// Annualised expected return as a decimal
    pub expected_return: Decimal,
    /// Annualised standard deviation, >= 0
    pub volatility: Decimal,
    /// Unit price in currency terms
    pub price: Decimal,
}

impl Asset {
    pub fn new(symbol: &str, name: &str, price: Decimal) -> Self {
        Self {
            symbol: symbol.to_string(),
            name: name.to_string(),
            weight: Decimal::ZERO,
            expected_return: Decimal::ZERO,
            volatility: Decimal::ZERO,
            price,
        }
    }

    pub fn with_weight(mut self, weight: Decimal) -> Self {
        self.weight = weight;
        self
    }

    pub fn with_expected_return(mut self, expected_return: Decimal) -> Self {
        self.expected_return = expected_return;
        self
    }

    pub fn with_volatility(mut self, volatility: Decimal) -> Self {
        self.volatility = volatility;
        self
    }

    /// Check the per-asset invariants: volatility >= 0 and weight in [0, 1].
    pub fn validate(&self) -> QfResult<()> {
        if self.volatility < Decimal::ZERO {
            return Err(AssetError::NegativeVolatility {
                symbol: self.symbol.clone(),
                volatility: self.volatility,
            }
            .into());
        }
        if self.weight < Decimal::ZERO || self.weight > Decimal::ONE {
            return Err(AssetError::WeightOutOfRange {
                symbol: self.symbol.clone(),
                weight: self.weight,
            }
            .into());
        }
        Ok(())
    }
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.symbol, self.name)
    }
}

/// Validate a caller-supplied asset list at the engine boundary.
///
/// Contract violations are rejected before any calculation consumes them;
/// an empty list is not an error (degenerate inputs produce defined
/// defaults downstream).
pub fn validate_assets(assets: &[Asset]) -> QfResult<()> {
    for asset in assets {
        asset.validate()?;
    }
    Ok(())
}

/// An analyst view: an overridden expected return with a confidence,
/// blended Black-Litterman-style into the base estimate before
/// optimization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalystView {
    pub symbol: String,
    pub expected_return: Decimal,
    /// 0 = ignore the view entirely, 1 = replace the base estimate
    pub confidence: Decimal,
}

/// Risk tolerance buckets
///
/// The account-level risk API uses low/medium/high for the same three
/// buckets; those spellings are accepted as serde aliases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskTolerance {
    #[serde(alias = "low")]
    Conservative,
    #[serde(alias = "medium")]
    Moderate,
    #[serde(alias = "high")]
    Aggressive,
}

impl RiskTolerance {
    /// The fixed constant table backing this tolerance selection.
    pub fn profile(&self) -> ToleranceProfile {
        match self {
            RiskTolerance::Conservative => ToleranceProfile {
                max_single_allocation: Decimal::new(20, 2), // 20%
                max_volatile_allocation: Decimal::new(30, 2), // 30%
                max_drawdown: Decimal::new(15, 2),          // 15%
                sharpe_threshold: Decimal::ONE,
                risk_multiplier: Decimal::new(5, 1), // 0.5
            },
            RiskTolerance::Moderate => ToleranceProfile {
                max_single_allocation: Decimal::new(30, 2), // 30%
                max_volatile_allocation: Decimal::new(50, 2), // 50%
                max_drawdown: Decimal::new(25, 2),          // 25%
                sharpe_threshold: Decimal::new(75, 2),
                risk_multiplier: Decimal::ONE,
            },
            RiskTolerance::Aggressive => ToleranceProfile {
                max_single_allocation: Decimal::new(40, 2), // 40%
                max_volatile_allocation: Decimal::new(70, 2), // 70%
                max_drawdown: Decimal::new(40, 2),          // 40%
                sharpe_threshold: Decimal::new(5, 1),
                risk_multiplier: Decimal::new(15, 1), // 1.5
            },
        }
    }

    /// Stop width multiplier for ATR-style stop placement.
    pub fn stop_multiplier(&self) -> Decimal {
        match self {
            RiskTolerance::Conservative => Decimal::new(15, 1), // 1.5
            RiskTolerance::Moderate => Decimal::from(2),
            RiskTolerance::Aggressive => Decimal::from(3),
        }
    }
}

impl fmt::Display for RiskTolerance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RiskTolerance::Conservative => "conservative",
            RiskTolerance::Moderate => "moderate",
            RiskTolerance::Aggressive => "aggressive",
        };
        write!(f, "{}", s)
    }
}

/// Constant table backing a tolerance selection. Defined once, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToleranceProfile {
    /// Maximum allocation to any single asset
    pub max_single_allocation: Decimal,
    /// Maximum combined allocation to high-volatility assets
    pub max_volatile_allocation: Decimal,
    /// Maximum acceptable drawdown
    pub max_drawdown: Decimal,
    /// Minimum acceptable Sharpe ratio
    pub sharpe_threshold: Decimal,
    /// Scalar applied to every optimized weight
    pub risk_multiplier: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_asset_builder_chain() {
        let asset = Asset::new("BTC", "Bitcoin", dec!(50000))
            .with_weight(dec!(0.25))
            .with_expected_return(dec!(0.15))
            .with_volatility(dec!(0.6));
        assert_eq!(asset.symbol, "BTC");
        assert_eq!(asset.weight, dec!(0.25));
        assert_eq!(asset.volatility, dec!(0.6));
    }

    #[test]
    fn test_validate_rejects_negative_volatility() {
        let asset = Asset::new("BTC", "Bitcoin", dec!(50000)).with_volatility(dec!(-0.1));
        assert!(asset.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_weight_above_one() {
        let asset = Asset::new("BTC", "Bitcoin", dec!(50000)).with_weight(dec!(1.2));
        assert!(asset.validate().is_err());
    }

    #[test]
    fn test_validate_assets_accepts_empty() {
        assert!(validate_assets(&[]).is_ok());
    }

    #[test]
    fn test_tolerance_multipliers() {
        assert_eq!(
            RiskTolerance::Conservative.profile().risk_multiplier,
            dec!(0.5)
        );
        assert_eq!(RiskTolerance::Moderate.profile().risk_multiplier, dec!(1.0));
        assert_eq!(
            RiskTolerance::Aggressive.profile().risk_multiplier,
            dec!(1.5)
        );
    }

    #[test]
    fn test_stop_multipliers() {
        assert_eq!(RiskTolerance::Conservative.stop_multiplier(), dec!(1.5));
        assert_eq!(RiskTolerance::Moderate.stop_multiplier(), dec!(2.0));
        assert_eq!(RiskTolerance::Aggressive.stop_multiplier(), dec!(3.0));
    }

    #[test]
    fn test_tolerance_aliases_deserialize() {
        let t: RiskTolerance = serde_json::from_str("\"low\"").unwrap();
        assert_eq!(t, RiskTolerance::Conservative);
        let t: RiskTolerance = serde_json::from_str("\"aggressive\"").unwrap();
        assert_eq!(t, RiskTolerance::Aggressive);
    }

    #[test]
    fn test_asset_serialization_roundtrip() {
        let asset = Asset::new("ETH", "Ethereum", dec!(3000))
            .with_weight(dec!(0.4))
            .with_volatility(dec!(0.7));
        let json = serde_json::to_string(&asset).unwrap();
        let deserialized: Asset = serde_json::from_str(&json).unwrap();
        assert_eq!(asset, deserialized);
    }
}
