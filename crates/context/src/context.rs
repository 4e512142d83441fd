//! The immutable snapshot shared by every task in one cycle.

use chrono::{DateTime, Utc};
use lifeline_config::AppConfig;
use lifeline_core::{CycleId, SurvivalTier};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Financial state of the account, captured once at the start of a cycle.
///
/// Fields are private and there is no public constructor: only
/// [`ContextBuilder`](crate::ContextBuilder) creates one, and nothing can
/// change it afterwards. Share it between tasks behind an `Arc`.
///
/// `S` is the storage handle type; it is carried through untouched.
pub struct CycleContext<S> {
    pub(crate) cycle_id: CycleId,
    pub(crate) started_at: DateTime<Utc>,
    pub(crate) credit_balance: u64,
    pub(crate) currency_balance: f64,
    pub(crate) survival_tier: SurvivalTier,
    pub(crate) low_compute_multiplier: f64,
    pub(crate) config: Arc<AppConfig>,
    pub(crate) storage: Arc<S>,
}

impl<S> CycleContext<S> {
    pub fn cycle_id(&self) -> &CycleId {
        &self.cycle_id
    }

    /// Wall-clock time at which assembly began.
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Spendable credit in cents.
    pub fn credit_balance(&self) -> u64 {
        self.credit_balance
    }

    /// Underlying currency balance in major units.
    pub fn currency_balance(&self) -> f64 {
        self.currency_balance
    }

    pub fn survival_tier(&self) -> SurvivalTier {
        self.survival_tier
    }

    pub fn low_compute_multiplier(&self) -> f64 {
        self.low_compute_multiplier
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn storage(&self) -> &Arc<S> {
        &self.storage
    }

    /// Whether downstream work should apply the low-compute multiplier.
    pub fn is_low_compute(&self) -> bool {
        self.survival_tier.is_constrained()
    }

    /// The serialisable part of the context (no config, no storage).
    pub fn summary(&self) -> CycleSummary {
        CycleSummary {
            cycle_id: self.cycle_id.clone(),
            started_at: self.started_at,
            credit_balance: self.credit_balance,
            currency_balance: self.currency_balance,
            survival_tier: self.survival_tier,
            low_compute_multiplier: self.low_compute_multiplier,
        }
    }
}

impl<S> fmt::Debug for CycleContext<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CycleContext")
            .field("cycle_id", &self.cycle_id)
            .field("started_at", &self.started_at)
            .field("credit_balance", &self.credit_balance)
            .field("currency_balance", &self.currency_balance)
            .field("survival_tier", &self.survival_tier)
            .field("low_compute_multiplier", &self.low_compute_multiplier)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// A plain-data view of a [`CycleContext`], for logs and JSON output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CycleSummary {
    pub cycle_id: CycleId,
    pub started_at: DateTime<Utc>,
    pub credit_balance: u64,
    pub currency_balance: f64,
    pub survival_tier: SurvivalTier,
    pub low_compute_multiplier: f64,
}
