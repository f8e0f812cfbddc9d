//! Per-symbol risk profiles.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Score assumed for symbols with no tabled profile.
pub const DEFAULT_SCORE: Decimal = Decimal::from_parts(5, 0, 0, false, 1); // 0.5

/// Per-symbol risk characteristics consumed by the optimizer and the risk
/// engine.
///
/// All three scores are decimals in [0, 1]: volatility is an annualised
/// standard deviation estimate, correlation is the asset's typical
/// correlation with the broad crypto market, liquidity is depth relative
/// to the most liquid venue pairs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AssetProfile {
    pub volatility: Decimal,
    pub correlation: Decimal,
    pub liquidity: Decimal,
}

impl AssetProfile {
    /// Profile assumed for unknown symbols.
    pub fn unknown() -> Self {
        AssetProfile {
            volatility: DEFAULT_SCORE,
            correlation: DEFAULT_SCORE,
            liquidity: DEFAULT_SCORE,
        }
    }
}

/// Trait for asset profile providers (static tables, statistical estimators, etc.)
pub trait AssetProfileProvider: Send + Sync + std::fmt::Debug {
    /// Check if this provider has a tabled profile for the given symbol
    fn supports_symbol(&self, symbol: &str) -> bool;

    /// Return the risk profile for a symbol, falling back to the unknown
    /// profile rather than failing
    fn profile(&self, symbol: &str) -> AssetProfile;

    /// Get provider name
    fn name(&self) -> &str;

    /// Get provider configuration
    fn config(&self) -> serde_json::Value;
}

/// Fixed lookup table for the major crypto symbols; everything else gets
/// the 0.5 default profile
#[derive(Debug, Clone, Default)]
pub struct StaticProfileProvider;

/// Symbols treated as core crypto assets.
const CRYPTO_SYMBOLS: &[&str] = &[
    "BTC", "ETH", "BNB", "SOL", "ADA", "XRP", "DOT", "AVAX", "LINK", "DOGE",
];

impl StaticProfileProvider {
    pub fn new() -> Self {
        Self
    }

    /// Whether the symbol belongs to the core crypto allow-list.
    pub fn is_crypto(symbol: &str) -> bool {
        let upper = symbol.to_uppercase();
        CRYPTO_SYMBOLS.contains(&upper.as_str())
    }
}

impl AssetProfileProvider for StaticProfileProvider {
    fn supports_symbol(&self, symbol: &str) -> bool {
        Self::is_crypto(symbol)
    }

    fn profile(&self, symbol: &str) -> AssetProfile {
        let entry = |vol: i64, corr: i64, liq: i64| AssetProfile {
            volatility: Decimal::new(vol, 2),
            correlation: Decimal::new(corr, 2),
            liquidity: Decimal::new(liq, 2),
        };
        match symbol.to_uppercase().as_str() {
            "BTC" => entry(60, 50, 95),
            "ETH" => entry(70, 70, 90),
            "BNB" => entry(75, 65, 80),
            "SOL" => entry(90, 75, 70),
            "ADA" => entry(80, 70, 65),
            "XRP" => entry(85, 60, 75),
            "DOT" => entry(85, 75, 60),
            "AVAX" => entry(95, 75, 55),
            "LINK" => entry(80, 70, 60),
            "DOGE" => entry(100, 55, 70),
            _ => AssetProfile::unknown(),
        }
    }

    fn name(&self) -> &str {
        "static"
    }

    fn config(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "static",
            "supported_symbols": CRYPTO_SYMBOLS,
            "default_score": DEFAULT_SCORE.to_string()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_default_score_value() {
        assert_eq!(DEFAULT_SCORE, dec!(0.5));
    }

    #[test]
    fn test_known_symbol() {
        let p = StaticProfileProvider::new().profile("BTC");
        assert_eq!(p.volatility, dec!(0.60));
        assert_eq!(p.liquidity, dec!(0.95));
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let provider = StaticProfileProvider::new();
        assert_eq!(provider.profile("sol"), provider.profile("SOL"));
    }

    #[test]
    fn test_unknown_symbol_defaults() {
        let p = StaticProfileProvider::new().profile("NOCOIN");
        assert_eq!(p.volatility, DEFAULT_SCORE);
        assert_eq!(p.correlation, DEFAULT_SCORE);
        assert_eq!(p.liquidity, DEFAULT_SCORE);
    }

    #[test]
    fn test_supports_symbol() {
        let provider = StaticProfileProvider::new();
        assert!(provider.supports_symbol("BTC"));
        assert!(provider.supports_symbol("eth"));
        assert!(!provider.supports_symbol("SPX"));
    }
}
