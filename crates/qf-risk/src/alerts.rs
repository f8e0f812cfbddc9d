//! Risk alert types and threshold evaluation.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::metrics::AccountRiskSnapshot;

/// Severity class of a risk alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskSeverity {
    /// Informational — within normal operating range.
    Info,
    /// Warning — a soft limit breached.
    Warning,
    /// Critical — a hard limit breached; action required.
    Critical,
}

/// Discriminant for the kind of risk alert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RiskAlertKind {
    /// Account drawdown from its initial balance exceeds the limit.
    DrawdownExceeded {
        current_drawdown: Decimal,
        limit: Decimal,
    },
    /// A single position dominates the book.
    ConcentrationExceeded {
        allocation_pct: Decimal,
        limit_pct: Decimal,
    },
    /// Allocation-weighted volatility score is elevated.
    VolatilityElevated { score: Decimal, limit: Decimal },
    /// Allocation-weighted liquidity score fell below the floor.
    LiquidityDepleted { score: Decimal, floor: Decimal },
}

/// A single threshold breach, ranked by urgency (higher = more urgent).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAlert {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub severity: RiskSeverity,
    pub kind: RiskAlertKind,
    pub message: String,
    pub recommended_action: String,
    /// Integer urgency scale; alerts sort descending by this.
    pub urgency: u8,
}

impl RiskAlert {
    /// Create a new alert.
    pub fn new(
        severity: RiskSeverity,
        kind: RiskAlertKind,
        message: String,
        recommended_action: String,
        urgency: u8,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            severity,
            kind,
            message,
            recommended_action,
            urgency,
        }
    }
}

/// Fixed threshold table for alert generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertThresholds {
    /// Concentration risk above this percentage is critical.
    pub max_concentration_pct: Decimal,
    /// Volatility score above this level is a warning.
    pub max_volatility_score: Decimal,
    /// Drawdown fraction above this level is critical.
    pub max_drawdown: Decimal,
    /// Liquidity score below this floor is a warning.
    pub min_liquidity_score: Decimal,
}

impl Default for AlertThresholds {
    fn default() -> Self {
        Self {
            max_concentration_pct: Decimal::from(50),
            max_volatility_score: Decimal::from(70),
            max_drawdown: Decimal::new(15, 2), // 15%
            min_liquidity_score: Decimal::from(30),
        }
    }
}

impl AlertThresholds {
    /// Threshold the metric battery into severity-ranked alerts.
    ///
    /// Every threshold is evaluated independently; a snapshot breaching
    /// several fires one alert per breach. Output is sorted descending by
    /// urgency. Alerts are ephemeral and not deduplicated across calls.
    pub fn evaluate(&self, snapshot: &AccountRiskSnapshot) -> Vec<RiskAlert> {
        let mut alerts: Vec<RiskAlert> = Vec::new();
        let hundred = Decimal::from(100);

        if snapshot.current_drawdown > self.max_drawdown {
            alerts.push(RiskAlert::new(
                RiskSeverity::Critical,
                RiskAlertKind::DrawdownExceeded {
                    current_drawdown: snapshot.current_drawdown,
                    limit: self.max_drawdown,
                },
                format!(
                    "Account is {:.1}% below its initial balance",
                    snapshot.current_drawdown * hundred
                ),
                "Cut position sizes and review open risk until the drawdown recovers".into(),
                10,
            ));
        }

        if snapshot.concentration_risk > self.max_concentration_pct {
            alerts.push(RiskAlert::new(
                RiskSeverity::Critical,
                RiskAlertKind::ConcentrationExceeded {
                    allocation_pct: snapshot.concentration_risk,
                    limit_pct: self.max_concentration_pct,
                },
                format!(
                    "Largest position holds {:.1}% of the portfolio",
                    snapshot.concentration_risk
                ),
                "Trim the dominant position and spread the proceeds across the book".into(),
                9,
            ));
        }

        if snapshot.volatility_score > self.max_volatility_score {
            alerts.push(RiskAlert::new(
                RiskSeverity::Warning,
                RiskAlertKind::VolatilityElevated {
                    score: snapshot.volatility_score,
                    limit: self.max_volatility_score,
                },
                format!(
                    "Portfolio volatility score at {:.1} of 100",
                    snapshot.volatility_score
                ),
                "Shift allocation toward lower-volatility assets".into(),
                7,
            ));
        }

        if snapshot.liquidity_score < self.min_liquidity_score {
            alerts.push(RiskAlert::new(
                RiskSeverity::Warning,
                RiskAlertKind::LiquidityDepleted {
                    score: snapshot.liquidity_score,
                    floor: self.min_liquidity_score,
                },
                format!(
                    "Portfolio liquidity score down to {:.1} of 100",
                    snapshot.liquidity_score
                ),
                "Rotate into deeper markets to keep exits orderly".into(),
                6,
            ));
        }

        alerts.sort_by(|a, b| b.urgency.cmp(&a.urgency));
        alerts
    }
}
