//! Context builder — assembles one [`CycleContext`] per heartbeat cycle.
//!
//! Assembly never fails. A balance source that errors, hangs up, or reports
//! nonsense costs the cycle its balance (it runs as if the account were
//! empty), never the cycle itself.

use crate::context::CycleContext;
use chrono::Utc;
use lifeline_config::AppConfig;
use lifeline_core::balance::validate_amount;
use lifeline_core::{BalanceSource, CycleId, TierClassifier, credits_from_currency};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Builds cycle contexts from a balance source and a tier classifier.
///
/// Cheap to clone; concurrent builds share nothing but the process-wide
/// cycle id counter.
#[derive(Clone)]
pub struct ContextBuilder {
    balance: Arc<dyn BalanceSource>,
    classifier: Arc<dyn TierClassifier>,
}

impl ContextBuilder {
    pub fn new(balance: Arc<dyn BalanceSource>, classifier: Arc<dyn TierClassifier>) -> Self {
        Self {
            balance,
            classifier,
        }
    }

    /// A builder classifying with the thresholds from `config.tiers`.
    pub fn from_config(balance: Arc<dyn BalanceSource>, config: &AppConfig) -> Self {
        Self::new(balance, Arc::new(config.tiers.classifier()))
    }

    /// Assemble the context for a new cycle.
    ///
    /// With no `account` (or a blank one) the balance source is not called
    /// and both balances are zero. Otherwise it is called exactly once with
    /// the address as given, and both balance fields derive from that single
    /// answer.
    pub async fn build<S>(
        &self,
        storage: Arc<S>,
        config: Arc<AppConfig>,
        account: Option<&str>,
    ) -> CycleContext<S> {
        let cycle_id = CycleId::generate();
        let started_at = Utc::now();

        let account = account.filter(|a| !a.trim().is_empty());
        let currency_balance = match account {
            Some(address) => self.fetch_balance(&cycle_id, address).await,
            None => 0.0,
        };

        let credit_balance = credits_from_currency(currency_balance);
        let survival_tier = self.classifier.classify(credit_balance);
        let low_compute_multiplier = config.low_compute_multiplier();

        info!(
            cycle_id = %cycle_id,
            credit_balance,
            tier = %survival_tier,
            low_compute_multiplier,
            "Cycle context assembled"
        );

        CycleContext {
            cycle_id,
            started_at,
            credit_balance,
            currency_balance,
            survival_tier,
            low_compute_multiplier,
            config,
            storage,
        }
    }

    async fn fetch_balance(&self, cycle_id: &CycleId, address: &str) -> f64 {
        let fetched = self
            .balance
            .currency_balance(address)
            .await
            .and_then(validate_amount);

        match fetched {
            Ok(balance) => {
                debug!(
                    cycle_id = %cycle_id,
                    source = self.balance.name(),
                    currency_balance = balance,
                    credit_balance = credits_from_currency(balance),
                    "Balance derived"
                );
                balance
            }
            Err(e) => {
                warn!(
                    cycle_id = %cycle_id,
                    source = self.balance.name(),
                    address,
                    error = %e,
                    "Balance lookup failed, treating balance as zero for this cycle"
                );
                0.0
            }
        }
    }
}
