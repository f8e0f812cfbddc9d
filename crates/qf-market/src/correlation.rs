//! Heuristic correlation estimation.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;

use qf_types::{validate_assets, Asset, CorrelationMatrix, QfResult};

use crate::profiles::StaticProfileProvider;

/// Trait for correlation estimation strategies.
///
/// The contract is "produce a valid correlation matrix from asset
/// metadata"; the heuristic model below is one legal implementation, and a
/// historical-return estimator can replace it without changing any
/// downstream component.
pub trait CorrelationEstimator: Send + Sync + std::fmt::Debug {
    /// Estimate an NxN correlation matrix for the given assets
    fn estimate(&self, assets: &[Asset]) -> QfResult<CorrelationMatrix>;

    /// Get estimator name
    fn name(&self) -> &str;
}

/// Heuristic estimator: pairs where both symbols are on the crypto
/// allow-list draw from a high correlation band (0.60-0.90), mixed or
/// non-crypto pairs from a low band (0.00-0.40).
///
/// This is a modeling simplification keyed off asset metadata, not a
/// statistical estimate.
#[derive(Debug, Clone, Default)]
pub struct HeuristicCorrelationModel {
    /// Seed for reproducible matrices; entropy-seeded when absent.
    seed: Option<u64>,
}

impl HeuristicCorrelationModel {
    pub fn new() -> Self {
        Self { seed: None }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

impl CorrelationEstimator for HeuristicCorrelationModel {
    fn estimate(&self, assets: &[Asset]) -> QfResult<CorrelationMatrix> {
        validate_assets(assets)?;

        let n = assets.len();
        let mut rng = match self.seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::seed_from_u64(rand::thread_rng().gen()),
        };

        let mut values = vec![vec![Decimal::ONE; n]; n];
        for i in 0..n {
            for j in (i + 1)..n {
                let both_crypto = StaticProfileProvider::is_crypto(&assets[i].symbol)
                    && StaticProfileProvider::is_crypto(&assets[j].symbol);
                let sampled: f64 = if both_crypto {
                    rng.gen_range(0.60..0.90)
                } else {
                    rng.gen_range(0.0..0.40)
                };
                let fallback = if both_crypto {
                    Decimal::new(75, 2)
                } else {
                    Decimal::new(20, 2)
                };
                let rho = Decimal::from_f64_retain(sampled)
                    .unwrap_or(fallback)
                    .round_dp(4);
                values[i][j] = rho;
                values[j][i] = rho;
            }
        }

        CorrelationMatrix::from_values(values)
    }

    fn name(&self) -> &str {
        "heuristic"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn asset(symbol: &str) -> Asset {
        Asset::new(symbol, symbol, dec!(100))
            .with_weight(dec!(0.25))
            .with_expected_return(dec!(0.10))
            .with_volatility(dec!(0.8))
    }

    fn estimate(symbols: &[&str]) -> CorrelationMatrix {
        let assets: Vec<Asset> = symbols.iter().map(|s| asset(s)).collect();
        HeuristicCorrelationModel::new()
            .with_seed(7)
            .estimate(&assets)
            .unwrap()
    }

    #[test]
    fn test_unit_diagonal_and_symmetry() {
        let m = estimate(&["BTC", "ETH", "SOL", "NOCOIN"]);
        for i in 0..m.size() {
            assert_eq!(m.get(i, i), Decimal::ONE);
            for j in 0..m.size() {
                assert_eq!(m.get(i, j), m.get(j, i));
            }
        }
    }

    #[test]
    fn test_crypto_pairs_in_high_band() {
        let m = estimate(&["BTC", "ETH"]);
        let rho = m.get(0, 1);
        assert!(rho >= dec!(0.60) && rho <= dec!(0.90), "rho={}", rho);
    }

    #[test]
    fn test_mixed_pairs_in_low_band() {
        let m = estimate(&["BTC", "SPX"]);
        let rho = m.get(0, 1);
        assert!(rho >= Decimal::ZERO && rho <= dec!(0.40), "rho={}", rho);
    }

    #[test]
    fn test_seeded_estimates_reproduce() {
        let a = estimate(&["BTC", "ETH", "ADA"]);
        let b = estimate(&["BTC", "ETH", "ADA"]);
        assert_eq!(a, b);
    }

    #[test]
    fn test_empty_asset_list_yields_empty_matrix() {
        let m = HeuristicCorrelationModel::new()
            .with_seed(1)
            .estimate(&[])
            .unwrap();
        assert_eq!(m.size(), 0);
    }

    #[test]
    fn test_negative_volatility_rejected() {
        let bad = Asset::new("BTC", "Bitcoin", dec!(100)).with_volatility(dec!(-0.5));
        let result = HeuristicCorrelationModel::new().with_seed(1).estimate(&[bad]);
        assert!(result.is_err());
    }
}
