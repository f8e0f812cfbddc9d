//! Monte Carlo forward return simulation.
//!
//! Each path accumulates daily log-return steps of
//! `mu/252 + z * sigma/sqrt(252)` with standard normal `z` and converts to
//! a simple return via `exp(cumulative) - 1`. Paths are independent and
//! seeded individually, so runs are reproducible under a fixed seed and
//! safe to generate in parallel.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use tracing::debug;

use qf_optimizer::PortfolioSnapshot;
use qf_types::{QfResult, SimulationError};

const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Minimum number of paths for a statistically usable distribution.
const MIN_SIMULATIONS: u32 = 100;

/// Configuration for a Monte Carlo run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Number of independent paths.
    pub simulations: u32,
    /// Path length in trading days.
    pub horizon_days: u32,
    /// Seed for reproducible runs; entropy-seeded when absent.
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            simulations: 1_000,
            horizon_days: 30,
            seed: None,
        }
    }
}

impl SimulationConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_simulations(mut self, simulations: u32) -> Self {
        self.simulations = simulations;
        self
    }

    pub fn with_horizon_days(mut self, horizon_days: u32) -> Self {
        self.horizon_days = horizon_days;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

/// Outcome distribution of a simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    /// Final simple return of every path, in generation order.
    pub outcomes: Vec<f64>,
    pub mean: f64,
    pub median: f64,
    pub std_dev: f64,
    pub percentile_5: f64,
    pub percentile_95: f64,
}

/// Stateless Monte Carlo simulator.
pub struct MonteCarloSimulator;

impl MonteCarloSimulator {
    /// Simulate forward returns for annualised portfolio statistics.
    pub fn run(
        config: &SimulationConfig,
        expected_return: f64,
        volatility: f64,
    ) -> QfResult<SimulationResult> {
        if config.simulations < MIN_SIMULATIONS {
            return Err(SimulationError::TooFewPaths {
                requested: config.simulations,
                minimum: MIN_SIMULATIONS,
            }
            .into());
        }
        if config.horizon_days < 1 {
            return Err(SimulationError::EmptyHorizon.into());
        }
        if volatility < 0.0 {
            return Err(SimulationError::NegativeVolatility { volatility }.into());
        }

        let base_seed = config.seed.unwrap_or_else(rand::random);
        let daily_return = expected_return / TRADING_DAYS_PER_YEAR;
        let daily_volatility = volatility / TRADING_DAYS_PER_YEAR.sqrt();
        let horizon = config.horizon_days;

        // Paths do not interact, so generation parallelizes freely; the
        // per-path seed keeps the run reproducible regardless of thread
        // interleaving.
        let outcomes: Vec<f64> = (0..config.simulations as u64)
            .into_par_iter()
            .map(|path| {
                let mut rng = ChaCha8Rng::seed_from_u64(base_seed.wrapping_add(path));
                let mut cumulative = 0.0_f64;
                for _ in 0..horizon {
                    cumulative += daily_return + standard_normal(&mut rng) * daily_volatility;
                }
                cumulative.exp() - 1.0
            })
            .collect();

        let mut sorted = outcomes.clone();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        let n = sorted.len() as f64;
        let mean = sorted.iter().sum::<f64>() / n;
        let median = if sorted.len() % 2 == 0 {
            let mid = sorted.len() / 2;
            (sorted[mid - 1] + sorted[mid]) / 2.0
        } else {
            sorted[sorted.len() / 2]
        };
        let variance = sorted.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;

        debug!(
            simulations = config.simulations,
            horizon_days = config.horizon_days,
            "simulation complete"
        );

        Ok(SimulationResult {
            outcomes,
            mean,
            median,
            std_dev: variance.sqrt(),
            percentile_5: percentile_sorted(&sorted, 5.0),
            percentile_95: percentile_sorted(&sorted, 95.0),
        })
    }

    /// Simulate forward returns for a constructed portfolio.
    pub fn run_portfolio(
        config: &SimulationConfig,
        portfolio: &PortfolioSnapshot,
    ) -> QfResult<SimulationResult> {
        Self::run(
            config,
            portfolio.expected_return.to_f64().unwrap_or(0.0),
            portfolio.volatility.to_f64().unwrap_or(0.0),
        )
    }
}

// ---------- normal variate helper (no external dep) ----------

/// Standard normal variate via the Box-Muller transform.
fn standard_normal(rng: &mut ChaCha8Rng) -> f64 {
    let u1: f64 = 1.0 - rng.gen::<f64>(); // shift into (0, 1] so ln() is finite
    let u2: f64 = rng.gen();
    (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()
}

/// Percentile from a sorted slice using linear interpolation.
fn percentile_sorted(sorted: &[f64], p: f64) -> f64 {
    if sorted.len() == 1 {
        return sorted[0];
    }
    let rank = p / 100.0 * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    if lower == upper {
        sorted[lower]
    } else {
        let frac = rank - lower as f64;
        sorted[lower] * (1.0 - frac) + sorted[upper] * frac
    }
}
