//! # qf-optimizer
//!
//! Target-weight optimization and rebalance planning for Quantfolio.
//!
//! Provides inverse-volatility weight optimization with analyst-view
//! blending, portfolio-level aggregation (value, return, volatility,
//! Sharpe, drawdown estimate), and prioritized rebalance recommendations.

mod portfolio;
mod rebalance;
mod weights;

pub use portfolio::{PortfolioCalculator, PortfolioSnapshot};
pub use rebalance::{
    RebalanceAction, RebalancePlanner, RebalancePriority, RebalanceRecommendation,
};
pub use weights::{WeightOptimizer, MAX_WEIGHT, MIN_WEIGHT};
