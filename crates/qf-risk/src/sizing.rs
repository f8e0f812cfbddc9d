//! Position sizing and stop placement.
//!
//! Pure formulas with no internal state: a Kelly-capped, volatility-adjusted
//! position size and ATR-style stop-loss / take-profit levels. Inputs that
//! would divide by zero are rejected at the boundary so no NaN or infinity
//! can escape.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

use qf_types::{QfResult, RiskError, RiskTolerance};

/// Input for position sizing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionSizeRequest {
    pub account_balance: Decimal,
    /// Percent of the account risked per trade (e.g. 2 for 2%)
    pub risk_per_trade_pct: Decimal,
    /// Distance from entry to stop in price terms
    pub stop_loss_distance: Decimal,
    /// Annualised volatility of the traded asset
    pub volatility: Decimal,
    /// Probability of a winning trade, 0 to 1 exclusive
    pub win_rate: Decimal,
    /// Average win divided by average loss
    pub avg_win_loss_ratio: Decimal,
}

/// Position sizing result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionSize {
    /// Units affordable at the per-trade risk budget
    pub risk_based_size: Decimal,
    /// Haircut applied for volatility above the reference level
    pub volatility_adjustment: Decimal,
    /// Kelly fraction of capital, floored at 0
    pub kelly_fraction: Decimal,
    /// Final recommendation: the smaller of the risk-based and Kelly caps
    pub optimal_size: Decimal,
}

/// Stateless position sizer.
pub struct PositionSizer;

impl PositionSizer {
    /// Size a position from the per-trade risk budget and the Kelly
    /// criterion.
    ///
    /// A negative-edge Kelly clamps to zero (no position) rather than going
    /// short.
    pub fn size(request: &PositionSizeRequest) -> QfResult<PositionSize> {
        validate_size_request(request)?;

        let risk_based_size = request.account_balance * request.risk_per_trade_pct
            / Decimal::from(100)
            / request.stop_loss_distance;

        // Shrink above the 0.2 reference volatility, never scale up
        let volatility_adjustment =
            (Decimal::new(2, 1) / request.volatility).min(Decimal::ONE);

        // Kelly: f* = (p*b - q) / b
        let p = request.win_rate;
        let q = Decimal::ONE - p;
        let b = request.avg_win_loss_ratio;
        let full_kelly = (p * b - q) / b;
        let kelly_fraction = if full_kelly <= Decimal::ZERO {
            warn!(win_rate = %p, ratio = %b, "negative edge: Kelly recommends no position");
            Decimal::ZERO
        } else {
            full_kelly
        };

        let optimal_size = (risk_based_size * volatility_adjustment)
            .min(request.account_balance * kelly_fraction);

        Ok(PositionSize {
            risk_based_size,
            volatility_adjustment,
            kelly_fraction,
            optimal_size,
        })
    }
}

fn validate_size_request(request: &PositionSizeRequest) -> QfResult<()> {
    if request.account_balance <= Decimal::ZERO {
        return Err(RiskError::NonPositiveBalance {
            balance: request.account_balance,
        }
        .into());
    }
    if request.risk_per_trade_pct <= Decimal::ZERO
        || request.risk_per_trade_pct > Decimal::from(100)
    {
        return Err(RiskError::RiskPerTradeOutOfRange {
            pct: request.risk_per_trade_pct,
        }
        .into());
    }
    if request.stop_loss_distance <= Decimal::ZERO {
        return Err(RiskError::NonPositiveStopDistance {
            distance: request.stop_loss_distance,
        }
        .into());
    }
    if request.volatility <= Decimal::ZERO {
        return Err(RiskError::NonPositiveVolatility {
            volatility: request.volatility,
        }
        .into());
    }
    if request.win_rate <= Decimal::ZERO || request.win_rate >= Decimal::ONE {
        return Err(RiskError::WinRateOutOfRange {
            win_rate: request.win_rate,
        }
        .into());
    }
    if request.avg_win_loss_ratio <= Decimal::ZERO {
        return Err(RiskError::NonPositiveWinLossRatio {
            ratio: request.avg_win_loss_ratio,
        }
        .into());
    }
    Ok(())
}

/// Stop-loss and take-profit levels around an entry price
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StopLevels {
    /// ATR proxy derived from price and volatility
    pub atr: Decimal,
    pub stop_loss: Decimal,
    pub take_profit: Decimal,
    pub risk_multiplier: Decimal,
    pub risk_reward_ratio: Decimal,
}

/// ATR-style stop placement.
#[derive(Debug, Clone)]
pub struct StopCalculator {
    /// Reward-to-risk ratio for the take-profit.
    risk_reward_ratio: Decimal,
}

impl Default for StopCalculator {
    fn default() -> Self {
        Self {
            risk_reward_ratio: Decimal::from(2),
        }
    }
}

impl StopCalculator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_risk_reward_ratio(mut self, ratio: Decimal) -> Self {
        self.risk_reward_ratio = ratio;
        self
    }

    /// Place stop-loss and take-profit levels around an entry.
    ///
    /// The ATR proxy is a fixed fraction (0.1) of price-level volatility;
    /// the stop width multiplier comes from the risk tolerance (1.5 / 2.0 /
    /// 3.0). A stop that would go negative is floored at zero.
    pub fn levels(
        &self,
        entry_price: Decimal,
        volatility: Decimal,
        risk_level: RiskTolerance,
    ) -> QfResult<StopLevels> {
        if entry_price <= Decimal::ZERO {
            return Err(RiskError::NonPositiveEntryPrice { price: entry_price }.into());
        }
        if volatility <= Decimal::ZERO {
            return Err(RiskError::NonPositiveVolatility { volatility }.into());
        }
        if self.risk_reward_ratio <= Decimal::ZERO {
            return Err(RiskError::NonPositiveRewardRatio {
                ratio: self.risk_reward_ratio,
            }
            .into());
        }

        let risk_multiplier = risk_level.stop_multiplier();
        let atr = entry_price * volatility * Decimal::new(1, 1); // 0.1 ATR fraction

        let mut stop_loss = entry_price - atr * risk_multiplier;
        if stop_loss < Decimal::ZERO {
            warn!(%entry_price, %volatility, "stop width exceeds entry price; stop floored at 0");
            stop_loss = Decimal::ZERO;
        }

        let take_profit = entry_price + (entry_price - stop_loss) * self.risk_reward_ratio;

        Ok(StopLevels {
            atr,
            stop_loss,
            take_profit,
            risk_multiplier,
            risk_reward_ratio: self.risk_reward_ratio,
        })
    }
}
