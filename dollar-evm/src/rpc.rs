use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use alloy_primitives::{hex, Address};
use anyhow::Error;
use reqwest::header::CONTENT_TYPE;
use serde_json::{json, Value as JsonValue};
use tracing::trace;

/// Minimal JSON-RPC client for an EVM node.
pub struct RpcClient {
    url: String,
    client: reqwest::Client,
    request_id: AtomicU64,
}

impl RpcClient {
    pub fn new(url: &str, request_timeout: Duration) -> Result<Self, Error> {
        let client = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()?;

        Ok(Self {
            url: url.to_string(),
            client,
            request_id: AtomicU64::new(0),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub async fn call(&self, method: &str, params: JsonValue) -> Result<JsonValue, Error> {
        let id = self.request_id.fetch_add(1, Ordering::Relaxed) + 1;
        let request = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        });

        trace!("RPC request #{} {}", id, method);

        let response = self
            .client
            .post(&self.url)
            .header(CONTENT_TYPE, "application/json")
            .body(request.to_string())
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        parse_response(&response)
    }

    /// Executes a read-only call against the latest block and returns the raw
    /// return data.
    pub async fn eth_call(&self, to: Address, data: &[u8]) -> Result<Vec<u8>, Error> {
        let result = self
            .call(
                "eth_call",
                json!([
                    {
                        "to": to.to_string(),
                        "data": format!("0x{}", hex::encode(data)),
                    },
                    "latest",
                ]),
            )
            .await?;

        let result = result
            .as_str()
            .ok_or(Error::msg("eth_call result is not a hex string"))?;

        decode_hex(result)
    }

    pub async fn chain_id(&self) -> Result<u64, Error> {
        let result = self.call("eth_chainId", json!([])).await?;

        let result = result
            .as_str()
            .ok_or(Error::msg("eth_chainId result is not a hex string"))?;

        u64::from_str_radix(result.trim_start_matches("0x"), 16).map_err(Error::from)
    }
}

fn parse_response(response: &str) -> Result<JsonValue, Error> {
    let mut response_json = JsonValue::from_str(response)?;

    if let Some(error) = response_json.get("error") {
        let code = error["code"].as_i64().unwrap_or_default();
        let message = error["message"].as_str().unwrap_or("unknown error");

        return Err(Error::msg(format!("RPC error {}: {}", code, message)));
    }

    match response_json.get_mut("result") {
        Some(result) => Ok(result.take()),
        None => Err(Error::msg("RPC response has no result")),
    }
}

fn decode_hex(value: &str) -> Result<Vec<u8>, Error> {
    hex::decode(value.trim_start_matches("0x")).map_err(Error::from)
}
