use thiserror::Error;

/// Main error type for the Quantfolio engine
#[derive(Error, Debug)]
pub enum QfError {
    #[error("Asset error: {0}")]
    Asset(#[from] AssetError),

    #[error("Correlation error: {0}")]
    Correlation(#[from] CorrelationError),

    #[error("Optimization error: {0}")]
    Optimization(#[from] OptimizationError),

    #[error("Risk error: {0}")]
    Risk(#[from] RiskError),

    #[error("Simulation error: {0}")]
    Simulation(#[from] SimulationError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Asset-level contract violations
#[derive(Error, Debug)]
pub enum AssetError {
    #[error("Negative volatility for {symbol}: {volatility}")]
    NegativeVolatility {
        symbol: String,
        volatility: rust_decimal::Decimal,
    },

    #[error("Weight for {symbol} is {weight}, expected a fraction in [0, 1]")]
    WeightOutOfRange {
        symbol: String,
        weight: rust_decimal::Decimal,
    },

    #[error("Allocation for {symbol} is {allocation}%, expected a percentage in [0, 100]")]
    AllocationOutOfRange {
        symbol: String,
        allocation: rust_decimal::Decimal,
    },

    #[error("Negative position value for {symbol}: {value}")]
    NegativeValue {
        symbol: String,
        value: rust_decimal::Decimal,
    },

    #[error("Negative account balance: {balance}")]
    NegativeBalance { balance: rust_decimal::Decimal },
}

/// Correlation matrix violations
#[derive(Error, Debug)]
pub enum CorrelationError {
    #[error("Row {row} has {len} columns, expected {expected}")]
    NotSquare {
        row: usize,
        len: usize,
        expected: usize,
    },

    #[error("Diagonal entry [{index},{index}] is {value}, expected 1")]
    NonUnitDiagonal {
        index: usize,
        value: rust_decimal::Decimal,
    },

    #[error("Matrix is not symmetric at [{row},{col}]")]
    Asymmetric { row: usize, col: usize },

    #[error("Entry [{row},{col}] is {value}, outside [-1, 1]")]
    OutOfRange {
        row: usize,
        col: usize,
        value: rust_decimal::Decimal,
    },

    #[error("Matrix is {actual}x{actual} but {expected} assets were supplied")]
    SizeMismatch { expected: usize, actual: usize },
}

/// Weight optimization errors
#[derive(Error, Debug)]
pub enum OptimizationError {
    #[error("Target return must be positive, got {target}")]
    NonPositiveTargetReturn { target: rust_decimal::Decimal },

    #[error("View confidence for {symbol} is {confidence}, expected [0, 1]")]
    ConfidenceOutOfRange {
        symbol: String,
        confidence: rust_decimal::Decimal,
    },

    #[error("Weights sum to {sum}, expected 1")]
    WeightSumMismatch { sum: rust_decimal::Decimal },
}

/// Position sizing and stop placement errors
#[derive(Error, Debug)]
pub enum RiskError {
    #[error("Account balance must be positive, got {balance}")]
    NonPositiveBalance { balance: rust_decimal::Decimal },

    #[error("Risk per trade is {pct}%, expected (0, 100]")]
    RiskPerTradeOutOfRange { pct: rust_decimal::Decimal },

    #[error("Stop-loss distance must be positive, got {distance}")]
    NonPositiveStopDistance { distance: rust_decimal::Decimal },

    #[error("Volatility must be positive, got {volatility}")]
    NonPositiveVolatility { volatility: rust_decimal::Decimal },

    #[error("Win rate is {win_rate}, expected (0, 1)")]
    WinRateOutOfRange { win_rate: rust_decimal::Decimal },

    #[error("Average win/loss ratio must be positive, got {ratio}")]
    NonPositiveWinLossRatio { ratio: rust_decimal::Decimal },

    #[error("Entry price must be positive, got {price}")]
    NonPositiveEntryPrice { price: rust_decimal::Decimal },

    #[error("Risk/reward ratio must be positive, got {ratio}")]
    NonPositiveRewardRatio { ratio: rust_decimal::Decimal },
}

/// Monte Carlo simulation errors
#[derive(Error, Debug)]
pub enum SimulationError {
    #[error("Requested {requested} paths, minimum is {minimum}")]
    TooFewPaths { requested: u32, minimum: u32 },

    #[error("Time horizon must be at least one step")]
    EmptyHorizon,

    #[error("Volatility must be >= 0, got {volatility}")]
    NegativeVolatility { volatility: f64 },
}

/// Result type alias for Quantfolio operations
pub type QfResult<T> = Result<T, QfError>;

/// Macro for creating validation errors
#[macro_export]
macro_rules! validation_error {
    ($($arg:tt)*) => {
        QfError::Validation(format!($($arg)*))
    };
}

/// Macro for creating internal errors
#[macro_export]
macro_rules! internal_error {
    ($($arg:tt)*) => {
        QfError::Internal(format!($($arg)*))
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn test_error_display() {
        let error = AssetError::NegativeVolatility {
            symbol: "BTC".to_string(),
            volatility: Decimal::new(-5, 1),
        };

        assert!(error.to_string().contains("Negative volatility"));
        assert!(error.to_string().contains("BTC"));
    }

    #[test]
    fn test_error_conversion() {
        let asset_error = AssetError::NegativeBalance {
            balance: Decimal::from(-100),
        };
        let qf_error: QfError = asset_error.into();

        match qf_error {
            QfError::Asset(_) => (),
            _ => panic!("Expected Asset error"),
        }
    }

    #[test]
    fn test_macros() {
        let _validation_err = validation_error!("Invalid value: {}", 42);
        let _internal_err = internal_error!("Something went wrong");
    }
}
