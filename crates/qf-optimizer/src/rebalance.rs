//! Rebalance recommendations from current vs. target weights.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use qf_types::{validate_assets, Asset, QfResult};

/// Trade direction closing the gap between current and target weight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RebalanceAction {
    Buy,
    Sell,
    Hold,
}

impl RebalanceAction {
    /// Classify a weight delta, treating anything under the materiality
    /// threshold as a hold.
    pub fn from_delta(delta: Decimal, materiality: Decimal) -> Self {
        if delta.abs() < materiality {
            RebalanceAction::Hold
        } else if delta > Decimal::ZERO {
            RebalanceAction::Buy
        } else {
            RebalanceAction::Sell
        }
    }
}

/// Urgency bucket for a recommendation, derived from the delta magnitude
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RebalancePriority {
    High,
    Medium,
    Low,
}

impl RebalancePriority {
    fn rank(&self) -> u8 {
        match self {
            RebalancePriority::High => 0,
            RebalancePriority::Medium => 1,
            RebalancePriority::Low => 2,
        }
    }
}

/// A single buy/sell action closing the gap between current and target
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RebalanceRecommendation {
    pub symbol: String,
    pub current_weight: Decimal,
    pub target_weight: Decimal,
    pub action: RebalanceAction,
    /// Absolute weight delta
    pub magnitude: Decimal,
    pub priority: RebalancePriority,
}

/// Diffs current holdings against an optimized target allocation and emits
/// prioritized buy/sell actions.
#[derive(Debug, Clone)]
pub struct RebalancePlanner {
    /// Weight deltas below this threshold are not worth trading.
    pub materiality_threshold: Decimal,
    /// Deltas above this magnitude are high priority.
    pub high_priority_threshold: Decimal,
    /// Deltas above this magnitude (but not high) are medium priority.
    pub medium_priority_threshold: Decimal,
}

impl Default for RebalancePlanner {
    fn default() -> Self {
        Self {
            materiality_threshold: Decimal::new(5, 2),       // 5%
            high_priority_threshold: Decimal::new(15, 2),    // 15%
            medium_priority_threshold: Decimal::new(10, 2),  // 10%
        }
    }
}

impl RebalancePlanner {
    pub fn new() -> Self {
        Self::default()
    }

    fn priority(&self, magnitude: Decimal) -> RebalancePriority {
        if magnitude > self.high_priority_threshold {
            RebalancePriority::High
        } else if magnitude > self.medium_priority_threshold {
            RebalancePriority::Medium
        } else {
            RebalancePriority::Low
        }
    }

    /// Diff current vs. target weights into prioritized actions.
    ///
    /// Deltas under the materiality threshold are suppressed. The result is
    /// stable-sorted by priority (high before medium before low); ties keep
    /// target-list order. Assets missing from the current list count as
    /// weight 0.
    pub fn plan(
        &self,
        current: &[Asset],
        target: &[Asset],
    ) -> QfResult<Vec<RebalanceRecommendation>> {
        validate_assets(target)?;

        let current_weights: HashMap<&str, Decimal> = current
            .iter()
            .map(|a| (a.symbol.as_str(), a.weight))
            .collect();

        let mut recommendations: Vec<RebalanceRecommendation> = target
            .iter()
            .filter_map(|asset| {
                let current = current_weights
                    .get(asset.symbol.as_str())
                    .copied()
                    .unwrap_or(Decimal::ZERO);
                let delta = asset.weight - current;
                let action = RebalanceAction::from_delta(delta, self.materiality_threshold);
                if action == RebalanceAction::Hold {
                    return None;
                }
                let magnitude = delta.abs();
                Some(RebalanceRecommendation {
                    symbol: asset.symbol.clone(),
                    current_weight: current,
                    target_weight: asset.weight,
                    action,
                    magnitude,
                    priority: self.priority(magnitude),
                })
            })
            .collect();

        // sort_by_key is stable, preserving input order within a priority
        recommendations.sort_by_key(|r| r.priority.rank());

        Ok(recommendations)
    }
}
