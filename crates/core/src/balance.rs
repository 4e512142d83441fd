//! Balance trait — where a heartbeat cycle learns how much money it has.
//!
//! A [`BalanceSource`] reports an account's balance in major currency units
//! (dollars, not cents). The heartbeat converts that figure into integer
//! credits with [`credits_from_currency`]: one currency unit is 100 credits.

use async_trait::async_trait;
use crate::error::BalanceError;

/// Number of credit units per currency unit.
pub const CREDITS_PER_UNIT: f64 = 100.0;

/// The core BalanceSource trait.
///
/// Implementations: JSON-RPC token balance, fixed (offline), and scripted
/// mocks in tests.
#[async_trait]
pub trait BalanceSource: Send + Sync {
    /// The source name (e.g., "rpc", "fixed").
    fn name(&self) -> &str;

    /// Fetch the current currency balance of `address`, in major units.
    async fn currency_balance(&self, address: &str) -> std::result::Result<f64, BalanceError>;
}

/// Convert a currency amount into whole credits: `floor(amount * 100)`.
///
/// Callers pass amounts already checked by [`validate_amount`]; anything
/// below zero saturates to 0.
pub fn credits_from_currency(amount: f64) -> u64 {
    (amount * CREDITS_PER_UNIT).floor() as u64
}

/// Reject amounts no real balance can have (negative, NaN, infinite).
pub fn validate_amount(amount: f64) -> std::result::Result<f64, BalanceError> {
    if amount.is_finite() && amount >= 0.0 {
        Ok(amount)
    } else {
        Err(BalanceError::InvalidAmount(amount))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credits_floor_fractional_cents() {
        assert_eq!(credits_from_currency(12.3456), 1234);
        assert_eq!(credits_from_currency(0.009), 0);
        assert_eq!(credits_from_currency(7.0), 700);
    }

    #[test]
    fn credits_of_zero_is_zero() {
        assert_eq!(credits_from_currency(0.0), 0);
    }

    #[test]
    fn validate_amount_accepts_non_negative() {
        assert_eq!(validate_amount(0.0).unwrap(), 0.0);
        assert_eq!(validate_amount(42.5).unwrap(), 42.5);
    }

    #[test]
    fn validate_amount_rejects_garbage() {
        assert!(validate_amount(-0.01).is_err());
        assert!(validate_amount(f64::NAN).is_err());
        assert!(validate_amount(f64::INFINITY).is_err());
    }

    struct Constant(f64);

    #[async_trait]
    impl BalanceSource for Constant {
        fn name(&self) -> &str {
            "constant"
        }

        async fn currency_balance(&self, _address: &str) -> Result<f64, BalanceError> {
            Ok(self.0)
        }
    }

    #[tokio::test]
    async fn trait_objects_are_usable() {
        let source: Box<dyn BalanceSource> = Box::new(Constant(3.5));
        assert_eq!(source.name(), "constant");
        assert_eq!(source.currency_balance("0xabc").await.unwrap(), 3.5);
    }
}
