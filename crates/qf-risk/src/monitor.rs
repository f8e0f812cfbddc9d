//! Risk monitor — per-snapshot evaluation with alert emission.
//!
//! The [`RiskMonitor`] accepts account snapshots, recomputes risk metrics,
//! checks the configured thresholds, and emits [`RiskAlert`]s via a
//! channel. The caller owns the monitor and the receiving end of the
//! channel; there is no background loop or ambient global state.

use crossbeam_channel::Sender;
use tracing::{info, warn};

use qf_market::AssetProfileProvider;
use qf_types::{AccountSnapshot, QfResult};

use crate::alerts::{AlertThresholds, RiskAlert, RiskSeverity};
use crate::metrics::{AccountRiskSnapshot, RiskMetricsCalculator};

/// Caller-owned risk monitor.
///
/// Call [`RiskMonitor::update`] after every account change. Alerts are
/// emitted on the channel supplied at construction time.
pub struct RiskMonitor {
    thresholds: AlertThresholds,
    alert_tx: Sender<RiskAlert>,
    last_snapshot: Option<AccountRiskSnapshot>,
}

impl RiskMonitor {
    /// Create a new risk monitor.
    pub fn new(thresholds: AlertThresholds, alert_tx: Sender<RiskAlert>) -> Self {
        Self {
            thresholds,
            alert_tx,
            last_snapshot: None,
        }
    }

    /// Get the most recently computed risk snapshot, if any.
    pub fn last_snapshot(&self) -> Option<&AccountRiskSnapshot> {
        self.last_snapshot.as_ref()
    }

    /// Main entry point: recompute risk metrics, check thresholds, emit
    /// alerts.
    ///
    /// Returns the freshly computed snapshot.
    pub fn update(
        &mut self,
        account: &AccountSnapshot,
        profiles: &dyn AssetProfileProvider,
    ) -> QfResult<AccountRiskSnapshot> {
        let snapshot = RiskMetricsCalculator::compute(account, profiles)?;

        for alert in self.thresholds.evaluate(&snapshot) {
            self.emit(alert);
        }

        self.last_snapshot = Some(snapshot.clone());
        Ok(snapshot)
    }

    fn emit(&self, alert: RiskAlert) {
        match alert.severity {
            RiskSeverity::Critical => warn!(%alert.message, "RISK CRITICAL"),
            RiskSeverity::Warning => warn!(%alert.message, "RISK WARNING"),
            RiskSeverity::Info => info!(%alert.message, "RISK INFO"),
        }
        // Best-effort send; if the receiver is dropped we just log.
        let _ = self.alert_tx.try_send(alert);
    }
}
