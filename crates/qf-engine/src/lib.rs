// Quantfolio forward simulation engine
// Monte Carlo return-path generation over portfolio aggregates

pub mod simulation;

pub use simulation::{MonteCarloSimulator, SimulationConfig, SimulationResult};
