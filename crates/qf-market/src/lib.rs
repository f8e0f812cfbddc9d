//! Asset metadata providers for Quantfolio.
//!
//! Provides:
//! - Pluggable per-symbol risk profiles (volatility, correlation class, liquidity)
//! - Pluggable correlation matrix estimation with a heuristic default
//!
//! Both capabilities are trait-based so a statistical estimator over
//! historical returns can replace the shipped tables without touching the
//! optimizer or the risk engine.

pub mod correlation;
pub mod profiles;

pub use correlation::{CorrelationEstimator, HeuristicCorrelationModel};
pub use profiles::{AssetProfile, AssetProfileProvider, StaticProfileProvider, DEFAULT_SCORE};
