//! Error types for the Lifeline domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error variant.

use thiserror::Error;

/// The top-level error type for Lifeline operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Balance errors ---
    #[error("Balance error: {0}")]
    Balance(#[from] BalanceError),

    // --- Cycle id errors ---
    #[error("Invalid cycle id: {0}")]
    InvalidCycleId(String),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

/// Failures of a [`BalanceSource`](crate::BalanceSource) lookup.
///
/// Inside a heartbeat cycle every variant is absorbed: the cycle logs it and
/// proceeds with a zero balance.
#[derive(Debug, Clone, Error)]
pub enum BalanceError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Balance request failed: {message} (status: {status_code})")]
    Http { status_code: u16, message: String },

    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("Invalid balance response: {0}")]
    InvalidResponse(String),

    #[error("Invalid account address: {0}")]
    InvalidAddress(String),

    #[error("Invalid balance amount: {0}")]
    InvalidAmount(f64),

    #[error("Balance source not configured: {0}")]
    NotConfigured(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_error_displays_status() {
        let err = Error::Balance(BalanceError::Http {
            status_code: 503,
            message: "Service Unavailable".into(),
        });
        assert!(err.to_string().contains("503"));
        assert!(err.to_string().contains("Service Unavailable"));
    }

    #[test]
    fn rpc_error_displays_code() {
        let err = BalanceError::Rpc {
            code: -32000,
            message: "execution reverted".into(),
        };
        assert_eq!(err.to_string(), "RPC error -32000: execution reverted");
    }

    #[test]
    fn balance_error_converts_into_top_level() {
        let err: Error = BalanceError::InvalidAddress("nope".into()).into();
        assert!(matches!(err, Error::Balance(BalanceError::InvalidAddress(_))));
    }
}
