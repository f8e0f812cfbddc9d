//! Account-level risk assessment pipeline for Quantfolio.
//!
//! Provides:
//! - Portfolio-level risk metrics (VaR, CVaR, concentration, correlation,
//!   liquidity, drawdown, beta, Sharpe)
//! - Threshold-based alert generation with severity ranking
//! - A caller-owned monitor that recomputes metrics per snapshot and emits
//!   alerts via a channel
//! - Position sizing (Kelly criterion, volatility adjustment) and
//!   ATR-style stop-loss / take-profit placement

pub mod alerts;
pub mod metrics;
pub mod monitor;
pub mod sizing;

pub use alerts::{AlertThresholds, RiskAlert, RiskAlertKind, RiskSeverity};
pub use metrics::{AccountRiskSnapshot, RiskMetricsCalculator};
pub use monitor::RiskMonitor;
pub use sizing::{
    PositionSize, PositionSizeRequest, PositionSizer, StopCalculator, StopLevels,
};
