//! Fixed balance source — reports the same amount for every account.

use async_trait::async_trait;
use lifeline_core::BalanceSource;
use lifeline_core::error::BalanceError;

/// A balance source that never touches the network.
pub struct FixedBalanceSource {
    amount: f64,
}

impl FixedBalanceSource {
    pub fn new(amount: f64) -> Self {
        Self { amount }
    }
}

#[async_trait]
impl BalanceSource for FixedBalanceSource {
    fn name(&self) -> &str {
        "fixed"
    }

    async fn currency_balance(&self, _address: &str) -> Result<f64, BalanceError> {
        Ok(self.amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn returns_configured_amount_for_any_address() {
        let source = FixedBalanceSource::new(12.5);
        assert_eq!(source.currency_balance("0xabc").await.unwrap(), 12.5);
        assert_eq!(source.currency_balance("anything").await.unwrap(), 12.5);
        assert_eq!(source.name(), "fixed");
    }
}
