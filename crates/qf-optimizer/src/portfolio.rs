//! Portfolio-level aggregation of optimized weights.

use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use qf_types::{validate_assets, Asset, CorrelationMatrix, OptimizationError, QfResult};

/// A point-in-time portfolio aggregate derived from an optimized asset
/// list. Never persisted; reconstructed per call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioSnapshot {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,

    pub assets: Vec<Asset>,
    /// Weighted price sum scaled by the caller's unit convention.
    pub total_value: Decimal,
    /// Weight-linear combination of asset expected returns.
    pub expected_return: Decimal,
    /// Square root of the weight-quadratic variance through the
    /// correlation matrix.
    pub volatility: Decimal,
    /// Excess return per unit of volatility; 0 when volatility is 0.
    pub sharpe_ratio: Decimal,
    /// Heuristic proxy (volatility * 2.5), not a historical measurement.
    pub max_drawdown: Decimal,
    /// Weighted average asset vol / portfolio vol; 1 when volatility is 0.
    pub diversification_ratio: Decimal,
    /// Herfindahl-Hirschman index of weights.
    pub hhi_concentration: Decimal,
}

/// Stateless portfolio constructor.
#[derive(Debug, Clone)]
pub struct PortfolioCalculator {
    /// Caller-supplied unit convention (e.g. lot size) applied to the
    /// weighted price sum.
    scale_factor: Decimal,
}

impl Default for PortfolioCalculator {
    fn default() -> Self {
        Self {
            scale_factor: Decimal::ONE,
        }
    }
}

impl PortfolioCalculator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_scale_factor(mut self, scale_factor: Decimal) -> Self {
        self.scale_factor = scale_factor;
        self
    }

    /// Aggregate an optimized asset list into an overall portfolio object.
    ///
    /// Weight sets not summing to 1 (within 0.001) are rejected; an empty
    /// asset list produces a zeroed snapshot rather than an error.
    pub fn compute(
        &self,
        assets: &[Asset],
        correlations: &CorrelationMatrix,
    ) -> QfResult<PortfolioSnapshot> {
        validate_assets(assets)?;
        let n = assets.len();
        if correlations.size() != n {
            return Err(qf_types::CorrelationError::SizeMismatch {
                expected: n,
                actual: correlations.size(),
            }
            .into());
        }

        if n == 0 {
            return Ok(PortfolioSnapshot {
                id: Uuid::new_v4(),
                timestamp: Utc::now(),
                assets: Vec::new(),
                total_value: Decimal::ZERO,
                expected_return: Decimal::ZERO,
                volatility: Decimal::ZERO,
                sharpe_ratio: Decimal::ZERO,
                max_drawdown: Decimal::ZERO,
                diversification_ratio: Decimal::ONE,
                hhi_concentration: Decimal::ZERO,
            });
        }

        let weight_sum: Decimal = assets.iter().map(|a| a.weight).sum();
        if (weight_sum - Decimal::ONE).abs() > Decimal::new(1, 3) {
            return Err(OptimizationError::WeightSumMismatch { sum: weight_sum }.into());
        }

        let total_value: Decimal = assets
            .iter()
            .map(|a| a.weight * a.price * self.scale_factor)
            .sum();

        let expected_return: Decimal =
            assets.iter().map(|a| a.weight * a.expected_return).sum();

        // variance = sum_i sum_j w_i w_j vol_i vol_j rho_ij
        let mut variance = Decimal::ZERO;
        for i in 0..n {
            for j in 0..n {
                variance += assets[i].weight
                    * assets[j].weight
                    * assets[i].volatility
                    * assets[j].volatility
                    * correlations.get(i, j);
            }
        }
        let variance_f64 = variance.to_f64().unwrap_or(0.0).max(0.0);
        let volatility = Decimal::from_f64_retain(variance_f64.sqrt()).unwrap_or_default();

        let risk_free_rate = Decimal::new(2, 2); // 2% risk-free rate
        let sharpe_ratio = if volatility.is_zero() {
            Decimal::ZERO
        } else {
            (expected_return - risk_free_rate) / volatility
        };

        let max_drawdown = volatility * Decimal::new(25, 1); // 2.5x volatility proxy

        let weighted_avg_vol: Decimal = assets.iter().map(|a| a.weight * a.volatility).sum();
        let diversification_ratio = if volatility.is_zero() {
            Decimal::ONE
        } else {
            weighted_avg_vol / volatility
        };

        let hhi_concentration: Decimal = assets.iter().map(|a| a.weight * a.weight).sum();

        for a in assets {
            if a.weight > Decimal::new(40, 2) {
                warn!(symbol = %a.symbol, weight = %a.weight, "concentrated position");
            }
        }
        if volatility > Decimal::new(80, 2) {
            warn!(volatility = %volatility, "portfolio volatility above broad market level");
        }

        Ok(PortfolioSnapshot {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            assets: assets.to_vec(),
            total_value,
            expected_return,
            volatility,
            sharpe_ratio,
            max_drawdown,
            diversification_ratio,
            hhi_concentration,
        })
    }
}
