use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::{CorrelationError, QfResult};

/// Square, symmetric correlation matrix with unit diagonal.
///
/// Invariants are checked on construction; downstream components may rely
/// on them without re-validating.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CorrelationMatrix {
    values: Vec<Vec<Decimal>>,
}

impl CorrelationMatrix {
    /// Build a matrix from raw values, rejecting anything malformed.
    pub fn from_values(values: Vec<Vec<Decimal>>) -> QfResult<Self> {
        validate_correlation_values(&values)?;
        Ok(CorrelationMatrix { values })
    }

    /// Identity matrix: N uncorrelated assets.
    pub fn identity(n: usize) -> Self {
        let values = (0..n)
            .map(|i| {
                (0..n)
                    .map(|j| if i == j { Decimal::ONE } else { Decimal::ZERO })
                    .collect()
            })
            .collect();
        CorrelationMatrix { values }
    }

    pub fn size(&self) -> usize {
        self.values.len()
    }

    pub fn get(&self, i: usize, j: usize) -> Decimal {
        self.values[i][j]
    }

    pub fn values(&self) -> &[Vec<Decimal>] {
        &self.values
    }

    /// Mean absolute correlation between asset `i` and every other asset.
    pub fn mean_abs_correlation(&self, i: usize) -> Decimal {
        let n = self.size();
        if n < 2 {
            return Decimal::ZERO;
        }
        let sum: Decimal = (0..n)
            .filter(|&j| j != i)
            .map(|j| self.values[i][j].abs())
            .sum();
        sum / Decimal::from(n - 1)
    }
}

fn validate_correlation_values(values: &[Vec<Decimal>]) -> QfResult<()> {
    let n = values.len();
    for (i, row) in values.iter().enumerate() {
        if row.len() != n {
            return Err(CorrelationError::NotSquare {
                row: i,
                len: row.len(),
                expected: n,
            }
            .into());
        }
    }
    let tolerance = Decimal::new(1, 7); // 1e-7
    for i in 0..n {
        if (values[i][i] - Decimal::ONE).abs() > tolerance {
            return Err(CorrelationError::NonUnitDiagonal {
                index: i,
                value: values[i][i],
            }
            .into());
        }
        for j in (i + 1)..n {
            if (values[i][j] - values[j][i]).abs() > tolerance {
                return Err(CorrelationError::Asymmetric { row: i, col: j }.into());
            }
            if values[i][j] < Decimal::from(-1) || values[i][j] > Decimal::ONE {
                return Err(CorrelationError::OutOfRange {
                    row: i,
                    col: j,
                    value: values[i][j],
                }
                .into());
            }
        }
    }
    Ok(())
}
