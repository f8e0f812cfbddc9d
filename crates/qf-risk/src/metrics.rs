//! Risk metrics computation.
//!
//! [`RiskMetricsCalculator`] takes an account snapshot and a per-symbol
//! profile provider and produces an [`AccountRiskSnapshot`] that captures
//! the current risk posture.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use qf_market::AssetProfileProvider;
use qf_types::{AccountSnapshot, QfResult};

/// A point-in-time snapshot of account-level risk metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountRiskSnapshot {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,

    /// Number of allocated positions.
    pub num_positions: usize,

    // --- composition ---
    /// 100 minus average absolute deviation from equal allocation, 0-100.
    pub diversification_score: Decimal,
    /// Allocation-weighted asset volatility scaled to 0-100.
    pub volatility_score: Decimal,
    /// Allocation-weighted asset liquidity scaled to 0-100.
    pub liquidity_score: Decimal,
    /// Largest single-asset allocation percentage.
    pub concentration_risk: Decimal,
    /// Mean pairwise average correlation scaled to 0-100.
    pub correlation_risk: Decimal,
    /// Weighted blend of the component scores.
    pub overall_risk_score: Decimal,

    // --- drawdown ---
    /// Fractional decline from the initial balance, floored at 0.
    pub current_drawdown: Decimal,

    // --- VaR / tail ---
    /// 1-day 95% parametric VaR in currency terms.
    pub portfolio_var: Decimal,
    /// 95% Conditional VaR (expected shortfall) in currency terms.
    pub portfolio_cvar: Decimal,

    // --- market sensitivity ---
    /// Sensitivity to the reference crypto market.
    pub beta: Decimal,
    /// Excess return per unit of volatility; 0 when volatility is 0.
    pub sharpe_ratio: Decimal,
}

/// Stateless calculator for account risk metrics.
pub struct RiskMetricsCalculator;

impl RiskMetricsCalculator {
    /// Compute the full metric battery from an account snapshot.
    ///
    /// Empty and single-asset accounts are defined edge cases, not errors:
    /// an empty account scores 0 diversification, 100 liquidity, and 0 for
    /// concentration and correlation.
    pub fn compute(
        account: &AccountSnapshot,
        profiles: &dyn AssetProfileProvider,
    ) -> QfResult<AccountRiskSnapshot> {
        account.validate()?;

        let n = account.assets.len();
        let hundred = Decimal::from(100);

        let asset_profiles: Vec<_> = account
            .assets
            .iter()
            .map(|a| profiles.profile(&a.symbol))
            .collect();

        // --- diversification: distance from an equal-weight book ---
        let diversification_score = if n == 0 {
            Decimal::ZERO
        } else {
            let equal = hundred / Decimal::from(n);
            let avg_deviation: Decimal = account
                .assets
                .iter()
                .map(|a| (a.allocation - equal).abs())
                .sum::<Decimal>()
                / Decimal::from(n);
            (hundred - avg_deviation).max(Decimal::ZERO).min(hundred)
        };

        let portfolio_volatility: Decimal = account
            .assets
            .iter()
            .zip(asset_profiles.iter())
            .map(|(a, p)| a.allocation / hundred * p.volatility)
            .sum();
        let volatility_score = (portfolio_volatility * hundred)
            .max(Decimal::ZERO)
            .min(hundred);

        // No assets = no liquidity risk, by convention
        let liquidity_score = if n == 0 {
            hundred
        } else {
            account
                .assets
                .iter()
                .zip(asset_profiles.iter())
                .map(|(a, p)| a.allocation / hundred * p.liquidity)
                .sum::<Decimal>()
                * hundred
        };

        let concentration_risk = account
            .assets
            .iter()
            .map(|a| a.allocation)
            .fold(Decimal::ZERO, |acc, v| acc.max(v));

        // --- mean pairwise average correlation (needs at least 2 assets) ---
        let correlation_risk = if n < 2 {
            Decimal::ZERO
        } else {
            let mut sum = Decimal::ZERO;
            let mut pairs = 0u32;
            for i in 0..n {
                for j in (i + 1)..n {
                    sum += (asset_profiles[i].correlation + asset_profiles[j].correlation)
                        / Decimal::from(2);
                    pairs += 1;
                }
            }
            sum / Decimal::from(pairs) * hundred
        };

        let overall_risk_score = Decimal::new(4, 1) * volatility_score
            + Decimal::new(3, 1) * concentration_risk
            + Decimal::new(2, 1) * correlation_risk
            + Decimal::new(1, 1) * (hundred - diversification_score);

        // --- drawdown ---
        let current_total = account.current_total_value();
        let current_drawdown = if account.initial_balance.is_zero() {
            Decimal::ZERO
        } else {
            ((account.initial_balance - current_total) / account.initial_balance)
                .max(Decimal::ZERO)
        };

        // --- VaR / CVaR (parametric, 95% one-tail) ---
        let portfolio_var = Decimal::new(1645, 3) * portfolio_volatility * current_total;
        let portfolio_cvar = Decimal::new(2063, 3) * portfolio_volatility * current_total;

        // --- beta against the reference crypto market (vol 0.8) ---
        let weighted_correlation: Decimal = account
            .assets
            .iter()
            .zip(asset_profiles.iter())
            .map(|(a, p)| a.allocation / hundred * p.correlation)
            .sum();
        let beta = weighted_correlation * portfolio_volatility / Decimal::new(8, 1);

        // --- Sharpe (positions without a return estimate contribute 0) ---
        let expected_return: Decimal = account
            .assets
            .iter()
            .map(|a| a.allocation / hundred * a.expected_return.unwrap_or(Decimal::ZERO))
            .sum();
        let risk_free_rate = Decimal::new(2, 2); // 2% risk-free rate
        let sharpe_ratio = if portfolio_volatility.is_zero() {
            Decimal::ZERO
        } else {
            (expected_return - risk_free_rate) / portfolio_volatility
        };

        Ok(AccountRiskSnapshot {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            num_positions: n,
            diversification_score,
            volatility_score,
            liquidity_score,
            concentration_risk,
            correlation_risk,
            overall_risk_score,
            current_drawdown,
            portfolio_var,
            portfolio_cvar,
            beta,
            sharpe_ratio,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qf_market::StaticProfileProvider;
    use qf_types::AllocatedAsset;
    use rust_decimal_macros::dec;

    fn position(symbol: &str, allocation: Decimal, value: Decimal) -> AllocatedAsset {
        AllocatedAsset::new(symbol, allocation, value)
    }

    fn compute(account: &AccountSnapshot) -> AccountRiskSnapshot {
        RiskMetricsCalculator::compute(account, &StaticProfileProvider::new()).unwrap()
    }

    #[test]
    fn empty_account_defaults() {
        let account = AccountSnapshot::new(dec!(10000));
        let snap = compute(&account);
        assert_eq!(snap.num_positions, 0);
        assert_eq!(snap.diversification_score, Decimal::ZERO);
        assert_eq!(snap.liquidity_score, dec!(100));
        assert_eq!(snap.concentration_risk, Decimal::ZERO);
        assert_eq!(snap.correlation_risk, Decimal::ZERO);
        assert_eq!(snap.volatility_score, Decimal::ZERO);
        assert_eq!(snap.sharpe_ratio, Decimal::ZERO);
    }

    #[test]
    fn single_asset_full_allocation() {
        let account = AccountSnapshot::new(dec!(10000))
            .with_assets(vec![position("BTC", dec!(100), dec!(10000))]);
        let snap = compute(&account);
        assert_eq!(snap.concentration_risk, dec!(100));
        // N=1 is trivially equal-weighted
        assert_eq!(snap.diversification_score, dec!(100));
        assert_eq!(snap.correlation_risk, Decimal::ZERO);
    }

    #[test]
    fn two_asset_metric_values() {
        // BTC profile: vol 0.60, corr 0.50; ETH: vol 0.70, corr 0.70
        let account = AccountSnapshot::new(dec!(12000)).with_assets(vec![
            position("BTC", dec!(60), dec!(6000)),
            position("ETH", dec!(40), dec!(4000)),
        ]);
        let snap = compute(&account);

        assert_eq!(snap.volatility_score, dec!(64));
        assert_eq!(snap.correlation_risk, dec!(60));
        assert_eq!(snap.concentration_risk, dec!(60));
        assert_eq!(snap.diversification_score, dec!(90));
        // 0.4*64 + 0.3*60 + 0.2*60 + 0.1*(100-90)
        assert_eq!(snap.overall_risk_score, dec!(56.6));
    }

    #[test]
    fn drawdown_from_initial_balance() {
        let account = AccountSnapshot::new(dec!(12000)).with_assets(vec![
            position("BTC", dec!(60), dec!(6000)),
            position("ETH", dec!(40), dec!(4000)),
        ]);
        let snap = compute(&account);
        // Value fell from 12k to 10k
        assert!(
            (snap.current_drawdown - dec!(0.1666666667)).abs() < dec!(0.0001),
            "drawdown={}",
            snap.current_drawdown
        );
    }

    #[test]
    fn drawdown_floors_at_zero_when_in_profit() {
        let account = AccountSnapshot::new(dec!(8000))
            .with_assets(vec![position("BTC", dec!(100), dec!(10000))]);
        assert_eq!(compute(&account).current_drawdown, Decimal::ZERO);
    }

    #[test]
    fn zero_initial_balance_yields_zero_drawdown() {
        let account = AccountSnapshot::new(Decimal::ZERO)
            .with_assets(vec![position("BTC", dec!(100), dec!(1000))]);
        assert_eq!(compute(&account).current_drawdown, Decimal::ZERO);
    }

    #[test]
    fn var_and_cvar_values() {
        let account = AccountSnapshot::new(dec!(12000)).with_assets(vec![
            position("BTC", dec!(60), dec!(6000)),
            position("ETH", dec!(40), dec!(4000)),
        ]);
        let snap = compute(&account);
        // portfolio vol 0.64, value 10000
        assert_eq!(snap.portfolio_var, dec!(10528));
        assert_eq!(snap.portfolio_cvar, dec!(13203.2));
        assert!(snap.portfolio_cvar > snap.portfolio_var);
    }

    #[test]
    fn beta_against_reference_market() {
        let account = AccountSnapshot::new(dec!(12000)).with_assets(vec![
            position("BTC", dec!(60), dec!(6000)),
            position("ETH", dec!(40), dec!(4000)),
        ]);
        let snap = compute(&account);
        // weighted corr 0.58 * vol 0.64 / 0.8
        assert_eq!(snap.beta, dec!(0.464));
    }

    #[test]
    fn sharpe_with_expected_returns() {
        let account = AccountSnapshot::new(dec!(10000)).with_assets(vec![
            AllocatedAsset::new("BTC", dec!(100), dec!(10000)).with_expected_return(dec!(0.14)),
        ]);
        let snap = compute(&account);
        // (0.14 - 0.02) / 0.60
        assert_eq!(snap.sharpe_ratio, dec!(0.2));
    }

    #[test]
    fn unknown_symbols_use_default_profile() {
        let account = AccountSnapshot::new(dec!(10000))
            .with_assets(vec![position("NOCOIN", dec!(100), dec!(10000))]);
        let snap = compute(&account);
        assert_eq!(snap.volatility_score, dec!(50));
        assert_eq!(snap.liquidity_score, dec!(50));
    }

    #[test]
    fn negative_allocation_rejected() {
        let account = AccountSnapshot::new(dec!(10000))
            .with_assets(vec![position("BTC", dec!(-5), dec!(1000))]);
        let result = RiskMetricsCalculator::compute(&account, &StaticProfileProvider::new());
        assert!(result.is_err());
    }

    #[test]
    fn snapshot_serialization_roundtrip() {
        let account = AccountSnapshot::new(dec!(10000))
            .with_assets(vec![position("BTC", dec!(100), dec!(9000))]);
        let snap = compute(&account);
        let json = serde_json::to_string(&snap).unwrap();
        let deserialized: AccountRiskSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(snap.concentration_risk, deserialized.concentration_risk);
        assert_eq!(snap.current_drawdown, deserialized.current_drawdown);
    }
}
