//! Inverse-volatility weight optimization.

use rust_decimal::Decimal;
use std::collections::HashMap;
use tracing::{debug, warn};

use qf_types::{
    validate_assets, AnalystView, Asset, CorrelationMatrix, OptimizationError, QfResult,
    RiskTolerance,
};

/// Per-asset weight floor applied before renormalization.
pub const MIN_WEIGHT: Decimal = Decimal::from_parts(5, 0, 0, false, 2); // 0.05

/// Per-asset weight cap applied before renormalization.
pub const MAX_WEIGHT: Decimal = Decimal::from_parts(40, 0, 0, false, 2); // 0.40

/// Weight optimizer: inverse-volatility base weights shaped by expected
/// return, risk tolerance, and correlation with the rest of the book.
///
/// Produces a new asset list with updated weights; the input is never
/// mutated. Weights are clamped to [0.05, 0.40] and renormalized to sum
/// to 1. The renormalization can push a weight slightly outside the clamp
/// band; the band is intentionally not re-applied afterwards, matching the
/// distribution the rebalance materiality thresholds were tuned against.
#[derive(Debug, Clone)]
pub struct WeightOptimizer {
    tolerance: RiskTolerance,
    target_return: Option<Decimal>,
    views: Vec<AnalystView>,
}

impl WeightOptimizer {
    pub fn new(tolerance: RiskTolerance) -> Self {
        Self {
            tolerance,
            target_return: None,
            views: Vec::new(),
        }
    }

    /// Switch the return adjustment to target-relative mode.
    pub fn with_target_return(mut self, target: Decimal) -> Self {
        self.target_return = Some(target);
        self
    }

    /// Blend analyst views into the base expected returns before optimizing.
    pub fn with_views(mut self, views: Vec<AnalystView>) -> Self {
        self.views = views;
        self
    }

    /// Compute normalized target weights for the given assets.
    ///
    /// Always produces a result for valid input: a single asset trivially
    /// weights to 1, an empty list yields an empty list.
    pub fn optimize(
        &self,
        assets: &[Asset],
        correlations: &CorrelationMatrix,
    ) -> QfResult<Vec<Asset>> {
        validate_assets(assets)?;
        let n = assets.len();

        if correlations.size() != n {
            return Err(qf_types::CorrelationError::SizeMismatch {
                expected: n,
                actual: correlations.size(),
            }
            .into());
        }
        if let Some(target) = self.target_return {
            if target <= Decimal::ZERO {
                return Err(OptimizationError::NonPositiveTargetReturn { target }.into());
            }
        }
        for view in &self.views {
            if view.confidence < Decimal::ZERO || view.confidence > Decimal::ONE {
                return Err(OptimizationError::ConfidenceOutOfRange {
                    symbol: view.symbol.clone(),
                    confidence: view.confidence,
                }
                .into());
            }
        }
        if n == 0 {
            return Ok(Vec::new());
        }

        // Black-Litterman-style shrinkage: blended = base*(1-c) + view*c
        let blended = self.blend_views(assets);

        // Base weight per asset proportional to inverse volatility
        let mut weights = inverse_volatility_base(assets);

        let profile = self.tolerance.profile();
        for i in 0..n {
            let return_adj = self.return_adjustment(blended[i]);
            let risk_adj = risk_adjustment(assets[i].volatility, self.tolerance);
            let correlation_penalty = Decimal::ONE
                - Decimal::new(3, 1) * correlations.mean_abs_correlation(i); // 0.3 penalty strength
            weights[i] *= return_adj * risk_adj * correlation_penalty * profile.risk_multiplier;
        }

        let mut weights = clamp_weights(&weights);
        normalize_weights(&mut weights);

        for (i, w) in weights.iter().enumerate() {
            if *w < MIN_WEIGHT || *w > MAX_WEIGHT {
                warn!(
                    symbol = %assets[i].symbol,
                    weight = %w,
                    "renormalization moved weight outside the clamp band"
                );
            }
        }

        debug!(n_assets = n, tolerance = %self.tolerance, "weight optimization complete");

        Ok(assets
            .iter()
            .zip(weights.iter())
            .map(|(asset, w)| Asset {
                weight: *w,
                ..asset.clone()
            })
            .collect())
    }

    /// Blend analyst views into base expected returns. Views naming an
    /// unknown symbol are skipped with a warning.
    fn blend_views(&self, assets: &[Asset]) -> Vec<Decimal> {
        let by_symbol: HashMap<&str, &AnalystView> =
            self.views.iter().map(|v| (v.symbol.as_str(), v)).collect();
        for view in &self.views {
            if !assets.iter().any(|a| a.symbol == view.symbol) {
                warn!(symbol = %view.symbol, "analyst view for unknown symbol ignored");
            }
        }
        assets
            .iter()
            .map(|asset| match by_symbol.get(asset.symbol.as_str()) {
                Some(view) => {
                    asset.expected_return * (Decimal::ONE - view.confidence)
                        + view.expected_return * view.confidence
                }
                None => asset.expected_return,
            })
            .collect()
    }

    fn return_adjustment(&self, expected_return: Decimal) -> Decimal {
        match self.target_return {
            // Floored so a weak asset keeps a token weight instead of going negative
            Some(target) => (expected_return / target).max(Decimal::new(1, 1)),
            None => (expected_return + Decimal::ONE) / Decimal::from(2),
        }
    }
}

/// Inverse-volatility base weights, normalized to sum to 1.
///
/// Zero-volatility assets use the unknown-symbol default volatility of 0.5
/// instead of dividing by zero.
fn inverse_volatility_base(assets: &[Asset]) -> Vec<Decimal> {
    let mut base: Vec<Decimal> = assets
        .iter()
        .map(|a| {
            let vol = if a.volatility.is_zero() {
                Decimal::new(5, 1) // 0.5 default
            } else {
                a.volatility
            };
            Decimal::ONE / vol
        })
        .collect();
    normalize_weights(&mut base);
    base
}

fn risk_adjustment(volatility: Decimal, tolerance: RiskTolerance) -> Decimal {
    match tolerance {
        RiskTolerance::Conservative => {
            let vol = if volatility.is_zero() {
                Decimal::new(5, 1)
            } else {
                volatility
            };
            (Decimal::ONE / vol).min(Decimal::ONE)
        }
        RiskTolerance::Moderate => Decimal::ONE,
        RiskTolerance::Aggressive => (volatility * Decimal::new(12, 1)).max(Decimal::ONE),
    }
}

/// Clamp every weight into [MIN_WEIGHT, MAX_WEIGHT].
fn clamp_weights(weights: &[Decimal]) -> Vec<Decimal> {
    weights
        .iter()
        .map(|w| (*w).max(MIN_WEIGHT).min(MAX_WEIGHT))
        .collect()
}

/// Normalize weights in place to sum to 1.
fn normalize_weights(weights: &mut [Decimal]) {
    let total: Decimal = weights.iter().sum();
    if !total.is_zero() {
        for w in weights.iter_mut() {
            *w /= total;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qf_market::{CorrelationEstimator, HeuristicCorrelationModel};
    use rust_decimal_macros::dec;

    fn asset(symbol: &str, expected_return: Decimal, volatility: Decimal) -> Asset {
        Asset::new(symbol, symbol, dec!(100))
            .with_expected_return(expected_return)
            .with_volatility(volatility)
    }

    fn three_assets() -> Vec<Asset> {
        vec![
            asset("BTC", dec!(0.15), dec!(0.7)),
            asset("ETH", dec!(0.15), dec!(0.8)),
            asset("SOL", dec!(0.15), dec!(1.0)),
        ]
    }

    fn matrix_for(assets: &[Asset]) -> CorrelationMatrix {
        HeuristicCorrelationModel::new()
            .with_seed(42)
            .estimate(assets)
            .unwrap()
    }

    #[test]
    fn test_weights_sum_to_one() {
        for tolerance in [
            RiskTolerance::Conservative,
            RiskTolerance::Moderate,
            RiskTolerance::Aggressive,
        ] {
            let assets = three_assets();
            let m = matrix_for(&assets);
            let optimized = WeightOptimizer::new(tolerance).optimize(&assets, &m).unwrap();
            let total: Decimal = optimized.iter().map(|a| a.weight).sum();
            assert!(
                (total - Decimal::ONE).abs() < dec!(0.000000001),
                "{}: weights sum to {}",
                tolerance,
                total
            );
        }
    }

    #[test]
    fn test_inverse_volatility_bias() {
        // Equal returns, moderate tolerance: the 0.7-vol asset must not be
        // weighted below the 1.0-vol asset.
        let assets = three_assets();
        let m = matrix_for(&assets);
        let optimized = WeightOptimizer::new(RiskTolerance::Moderate)
            .optimize(&assets, &m)
            .unwrap();
        assert!(
            optimized[0].weight >= optimized[2].weight,
            "low-vol {} < high-vol {}",
            optimized[0].weight,
            optimized[2].weight
        );
        for a in &optimized {
            assert!(a.weight >= dec!(0.04) && a.weight <= dec!(0.41), "{}", a.weight);
        }
    }

    #[test]
    fn test_clamp_bounds_pre_renormalization() {
        let raw = vec![dec!(0.01), dec!(0.5), dec!(0.2), dec!(-0.1)];
        let clamped = clamp_weights(&raw);
        for w in &clamped {
            assert!(*w >= MIN_WEIGHT && *w <= MAX_WEIGHT, "{}", w);
        }
        // In-range values pass through untouched
        assert_eq!(clamped[2], dec!(0.2));
    }

    #[test]
    fn test_single_asset_weights_to_one() {
        let assets = vec![asset("BTC", dec!(0.12), dec!(0.6))];
        let m = matrix_for(&assets);
        let optimized = WeightOptimizer::new(RiskTolerance::Moderate)
            .optimize(&assets, &m)
            .unwrap();
        assert_eq!(optimized[0].weight, Decimal::ONE);
    }

    #[test]
    fn test_empty_asset_list_yields_empty_output() {
        let optimized = WeightOptimizer::new(RiskTolerance::Moderate)
            .optimize(&[], &CorrelationMatrix::identity(0))
            .unwrap();
        assert!(optimized.is_empty());
    }

    #[test]
    fn test_input_assets_not_mutated() {
        let assets = three_assets();
        let m = matrix_for(&assets);
        let _ = WeightOptimizer::new(RiskTolerance::Moderate)
            .optimize(&assets, &m)
            .unwrap();
        for a in &assets {
            assert_eq!(a.weight, Decimal::ZERO);
        }
    }

    #[test]
    fn test_view_blending_shifts_weight() {
        let assets = vec![
            asset("BTC", dec!(0.10), dec!(0.8)),
            asset("ETH", dec!(0.10), dec!(0.8)),
        ];
        let m = matrix_for(&assets);

        let without = WeightOptimizer::new(RiskTolerance::Moderate)
            .optimize(&assets, &m)
            .unwrap();
        let with = WeightOptimizer::new(RiskTolerance::Moderate)
            .with_views(vec![AnalystView {
                symbol: "BTC".into(),
                expected_return: dec!(0.60),
                confidence: dec!(1.0),
            }])
            .optimize(&assets, &m)
            .unwrap();

        assert!(
            with[0].weight > without[0].weight,
            "bullish view should raise BTC weight: {} vs {}",
            with[0].weight,
            without[0].weight
        );
    }

    #[test]
    fn test_view_confidence_zero_is_noop() {
        let assets = three_assets();
        let m = matrix_for(&assets);
        let plain = WeightOptimizer::new(RiskTolerance::Moderate)
            .optimize(&assets, &m)
            .unwrap();
        let viewed = WeightOptimizer::new(RiskTolerance::Moderate)
            .with_views(vec![AnalystView {
                symbol: "BTC".into(),
                expected_return: dec!(0.99),
                confidence: Decimal::ZERO,
            }])
            .optimize(&assets, &m)
            .unwrap();
        for (a, b) in plain.iter().zip(viewed.iter()) {
            assert_eq!(a.weight, b.weight);
        }
    }

    #[test]
    fn test_target_return_floor() {
        // Negative expected return against a target floors at 0.1 rather
        // than producing a negative weight.
        let optimizer =
            WeightOptimizer::new(RiskTolerance::Moderate).with_target_return(dec!(0.10));
        assert_eq!(optimizer.return_adjustment(dec!(-0.05)), dec!(0.1));
        assert_eq!(optimizer.return_adjustment(dec!(0.20)), dec!(2));
    }

    #[test]
    fn test_risk_adjustment_by_tolerance() {
        assert_eq!(
            risk_adjustment(dec!(2.0), RiskTolerance::Conservative),
            dec!(0.5)
        );
        assert_eq!(
            risk_adjustment(dec!(0.5), RiskTolerance::Conservative),
            Decimal::ONE
        );
        assert_eq!(
            risk_adjustment(dec!(2.0), RiskTolerance::Moderate),
            Decimal::ONE
        );
        assert_eq!(
            risk_adjustment(dec!(2.0), RiskTolerance::Aggressive),
            dec!(2.4)
        );
        assert_eq!(
            risk_adjustment(dec!(0.5), RiskTolerance::Aggressive),
            Decimal::ONE
        );
    }

    #[test]
    fn test_invalid_confidence_rejected() {
        let assets = three_assets();
        let m = matrix_for(&assets);
        let result = WeightOptimizer::new(RiskTolerance::Moderate)
            .with_views(vec![AnalystView {
                symbol: "BTC".into(),
                expected_return: dec!(0.5),
                confidence: dec!(1.5),
            }])
            .optimize(&assets, &m);
        assert!(result.is_err());
    }

    #[test]
    fn test_zero_target_return_rejected() {
        let assets = three_assets();
        let m = matrix_for(&assets);
        let result = WeightOptimizer::new(RiskTolerance::Moderate)
            .with_target_return(Decimal::ZERO)
            .optimize(&assets, &m);
        assert!(result.is_err());
    }

    #[test]
    fn test_matrix_size_mismatch_rejected() {
        let assets = three_assets();
        let m = CorrelationMatrix::identity(2);
        let result = WeightOptimizer::new(RiskTolerance::Moderate).optimize(&assets, &m);
        assert!(result.is_err());
    }

    #[test]
    fn test_zero_volatility_uses_default() {
        // Must not divide by zero; the 0.5 default volatility applies.
        let assets = vec![
            asset("STABLE", dec!(0.02), Decimal::ZERO),
            asset("BTC", dec!(0.15), dec!(0.6)),
        ];
        let m = matrix_for(&assets);
        let optimized = WeightOptimizer::new(RiskTolerance::Conservative)
            .optimize(&assets, &m)
            .unwrap();
        let total: Decimal = optimized.iter().map(|a| a.weight).sum();
        assert!((total - Decimal::ONE).abs() < dec!(0.000000001));
    }
}
