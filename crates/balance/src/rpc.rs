//! JSON-RPC balance source.
//!
//! Reads an ERC-20 token balance with a single `eth_call` to
//! `balanceOf(address)` and scales the raw integer by the token's decimals.
//! Works with any Ethereum-compatible node (Base, mainnet, local anvil).

use async_trait::async_trait;
use lifeline_config::BalanceConfig;
use lifeline_core::BalanceSource;
use lifeline_core::error::BalanceError;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

/// `keccak256("balanceOf(address)")[..4]`
const BALANCE_OF_SELECTOR: &str = "70a08231";

/// An ERC-20 balance source backed by an Ethereum JSON-RPC endpoint.
pub struct RpcBalanceSource {
    rpc_url: String,
    token_contract: String,
    decimals: u32,
    client: reqwest::Client,
}

impl RpcBalanceSource {
    /// Create a new RPC balance source.
    pub fn new(
        rpc_url: impl Into<String>,
        token_contract: &str,
        decimals: u32,
        timeout: Duration,
    ) -> Result<Self, BalanceError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| BalanceError::NotConfigured(format!("HTTP client: {e}")))?;

        let token_contract = format!("0x{}", normalize_address(token_contract)?);

        Ok(Self {
            rpc_url: rpc_url.into(),
            token_contract,
            decimals,
            client,
        })
    }

    /// Create a source from the `[balance]` config section.
    pub fn from_config(config: &BalanceConfig) -> Result<Self, BalanceError> {
        Self::new(
            config.rpc_url.clone(),
            &config.token_contract,
            config.decimals,
            Duration::from_secs(config.timeout_secs),
        )
    }

    fn request_body(&self, holder: &str) -> serde_json::Value {
        serde_json::json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "eth_call",
            "params": [
                {
                    "to": self.token_contract,
                    "data": format!("0x{BALANCE_OF_SELECTOR}{holder:0>64}"),
                },
                "latest"
            ],
        })
    }
}

#[async_trait]
impl BalanceSource for RpcBalanceSource {
    fn name(&self) -> &str {
        "rpc"
    }

    async fn currency_balance(&self, address: &str) -> Result<f64, BalanceError> {
        let holder = normalize_address(address)?;
        let body = self.request_body(&holder);

        debug!(token = %self.token_contract, holder = %address, "Requesting token balance");

        let response = self
            .client
            .post(&self.rpc_url)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| BalanceError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        if status != 200 {
            let error_body = response.text().await.unwrap_or_default();
            warn!(status, body = %error_body, "Balance RPC returned error");
            return Err(BalanceError::Http {
                status_code: status,
                message: error_body,
            });
        }

        let rpc: RpcResponse = response
            .json()
            .await
            .map_err(|e| BalanceError::InvalidResponse(format!("Failed to parse response: {e}")))?;

        if let Some(err) = rpc.error {
            return Err(BalanceError::Rpc {
                code: err.code,
                message: err.message,
            });
        }

        let result = rpc
            .result
            .ok_or_else(|| BalanceError::InvalidResponse("No result in response".into()))?;

        let raw = parse_quantity(&result)?;
        Ok(scale(raw, self.decimals))
    }
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<String>,
    #[serde(default)]
    error: Option<RpcErrorBody>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorBody {
    code: i64,
    #[serde(default)]
    message: String,
}

/// Validate a `0x`-prefixed 20-byte hex address; returns the 40 lowercase
/// hex digits without prefix.
fn normalize_address(address: &str) -> Result<String, BalanceError> {
    let trimmed = address.trim();
    let hex = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .ok_or_else(|| BalanceError::InvalidAddress(address.to_string()))?;

    if hex.len() != 40 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(BalanceError::InvalidAddress(address.to_string()));
    }
    Ok(hex.to_ascii_lowercase())
}

/// Parse a hex-encoded uint256 that must fit in 128 bits.
fn parse_quantity(result: &str) -> Result<u128, BalanceError> {
    let hex = result
        .strip_prefix("0x")
        .ok_or_else(|| BalanceError::InvalidResponse(format!("not a hex quantity: {result}")))?;

    // A call to an address without code returns an empty "0x".
    if hex.is_empty() {
        return Err(BalanceError::InvalidResponse(
            "empty result (is the token contract deployed?)".into(),
        ));
    }

    let significant = hex.trim_start_matches('0');
    if significant.is_empty() {
        return Ok(0);
    }
    if significant.len() > 32 {
        return Err(BalanceError::InvalidResponse(format!(
            "balance exceeds 128 bits: {result}"
        )));
    }
    u128::from_str_radix(significant, 16)
        .map_err(|e| BalanceError::InvalidResponse(format!("bad hex quantity {result}: {e}")))
}

fn scale(raw: u128, decimals: u32) -> f64 {
    raw as f64 / 10f64.powi(decimals as i32)
}
