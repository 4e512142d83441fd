//! Balance source implementations for Lifeline.
//!
//! - [`RpcBalanceSource`]: ERC-20 `balanceOf` over Ethereum JSON-RPC
//! - [`FixedBalanceSource`]: a constant, for offline runs

pub mod fixed;
pub mod rpc;

pub use fixed::FixedBalanceSource;
pub use rpc::RpcBalanceSource;
