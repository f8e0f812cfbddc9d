use qf_engine::{MonteCarloSimulator, SimulationConfig};
use qf_market::{CorrelationEstimator, HeuristicCorrelationModel, StaticProfileProvider};
use qf_optimizer::{PortfolioCalculator, RebalancePlanner, WeightOptimizer};
use qf_risk::{AlertThresholds, RiskMetricsCalculator};
use qf_types::*;
use rust_decimal::Decimal;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("📊 Quantfolio Basic Usage Example");

    // Candidate holdings from a market-data collaborator
    let assets = vec![
        Asset::new("BTC", "Bitcoin", Decimal::from(50000))
            .with_weight(Decimal::new(34, 2))
            .with_expected_return(Decimal::new(15, 2))
            .with_volatility(Decimal::new(60, 2)),
        Asset::new("ETH", "Ethereum", Decimal::from(3000))
            .with_weight(Decimal::new(33, 2))
            .with_expected_return(Decimal::new(18, 2))
            .with_volatility(Decimal::new(70, 2)),
        Asset::new("SOL", "Solana", Decimal::from(150))
            .with_weight(Decimal::new(33, 2))
            .with_expected_return(Decimal::new(25, 2))
            .with_volatility(Decimal::new(90, 2)),
    ];

    // Correlation model (seeded for a reproducible demo)
    let correlations = HeuristicCorrelationModel::new().with_seed(42).estimate(&assets)?;
    println!("Estimated a {}x{} correlation matrix", correlations.size(), correlations.size());

    // Optimize target weights
    let optimized = WeightOptimizer::new(RiskTolerance::Moderate).optimize(&assets, &correlations)?;
    for asset in &optimized {
        println!("  {} -> target weight {:.4}", asset.symbol, asset.weight);
    }

    // Aggregate into a portfolio snapshot
    let portfolio = PortfolioCalculator::new().compute(&optimized, &correlations)?;
    println!(
        "Portfolio: return {:.4}, volatility {:.4}, Sharpe {:.4}",
        portfolio.expected_return, portfolio.volatility, portfolio.sharpe_ratio
    );

    // Rebalance plan against current holdings
    let recommendations = RebalancePlanner::new().plan(&assets, &optimized)?;
    println!("{} rebalance recommendation(s)", recommendations.len());

    // Account-level risk metrics and alerts
    let account = AccountSnapshot::new(Decimal::from(10000)).with_assets(vec![
        AllocatedAsset::new("BTC", Decimal::from(70), Decimal::from(6300)),
        AllocatedAsset::new("ETH", Decimal::from(30), Decimal::from(2700)),
    ]);
    let risk = RiskMetricsCalculator::compute(&account, &StaticProfileProvider::new())?;
    println!(
        "Risk: concentration {:.1}%, overall score {:.1}",
        risk.concentration_risk, risk.overall_risk_score
    );
    for alert in AlertThresholds::default().evaluate(&risk) {
        println!("  [{}] {}", alert.urgency, alert.message);
    }

    // Forward Monte Carlo distribution
    let config = SimulationConfig::new().with_simulations(1_000).with_seed(42);
    let simulation = MonteCarloSimulator::run_portfolio(&config, &portfolio)?;
    println!(
        "30-day outlook: median {:.4}, p5 {:.4}, p95 {:.4}",
        simulation.median, simulation.percentile_5, simulation.percentile_95
    );

    Ok(())
}
