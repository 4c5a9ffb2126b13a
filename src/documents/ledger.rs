//! Ledger collaborator: read-only `documentExists(string)` contract calls.

use alloy_primitives::{Address, Bytes};
use alloy_sol_types::{SolCall, sol};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::HashSet;
use std::time::Duration;

use super::error::LedgerError;
use crate::config::ChainConfig;

sol! {
    function documentExists(string cid) external view returns (bool);
}

#[async_trait]
pub trait Ledger: Send + Sync {
    /// Whether `cid` is registered on this chain.
    async fn document_exists(&self, cid: &str) -> Result<bool, LedgerError>;

    /// Chain name for logs.
    fn chain(&self) -> &str;
}

/// JSON-RPC request structure
#[derive(Serialize)]
struct JsonRpcRequest<T> {
    jsonrpc: &'static str,
    method: &'static str,
    params: T,
    id: u64,
}

/// JSON-RPC response structure
#[derive(Deserialize)]
struct JsonRpcResponse<T> {
    result: Option<T>,
    error: Option<JsonRpcError>,
}

#[derive(Deserialize)]
struct JsonRpcError {
    code: i64,
    message: String,
}

/// EVM chain reached over JSON-RPC `eth_call`.
#[derive(Debug)]
pub struct EvmLedger {
    client: reqwest::Client,
    chain: String,
    rpc_url: String,
    contract: Address,
}

impl EvmLedger {
    pub fn new(config: &ChainConfig, timeout: Duration) -> Result<Self, LedgerError> {
        let contract: Address = config.contract_address.parse().map_err(|e| {
            LedgerError::Config(format!(
                "Invalid contract address for {}: {}",
                config.name, e
            ))
        })?;

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LedgerError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            chain: config.name.clone(),
            rpc_url: config.rpc_url.clone(),
            contract,
        })
    }

    async fn rpc_call<T, R>(&self, method: &'static str, params: T) -> Result<R, LedgerError>
    where
        T: Serialize,
        R: for<'de> Deserialize<'de>,
    {
        let request = JsonRpcRequest {
            jsonrpc: "2.0",
            method,
            params,
            id: 1,
        };

        let response = self
            .client
            .post(&self.rpc_url)
            .json(&request)
            .send()
            .await
            .map_err(|e| LedgerError::RpcConnection(format!("HTTP request failed: {}", e)))?;

        let rpc_response: JsonRpcResponse<R> = response
            .json()
            .await
            .map_err(|e| LedgerError::RpcConnection(format!("Failed to parse response: {}", e)))?;

        if let Some(error) = rpc_response.error {
            return Err(LedgerError::Rpc {
                code: error.code,
                message: error.message,
            });
        }

        rpc_response
            .result
            .ok_or_else(|| LedgerError::Parse("No result in RPC response".to_string()))
    }
}

#[async_trait]
impl Ledger for EvmLedger {
    async fn document_exists(&self, cid: &str) -> Result<bool, LedgerError> {
        let data = documentExistsCall {
            cid: cid.to_string(),
        }
        .abi_encode();
        let call = json!({
            "to": self.contract.to_string(),
            "data": Bytes::from(data),
        });
        let result: Bytes = self.rpc_call("eth_call", (call, "latest")).await?;
        documentExistsCall::abi_decode_returns(&result)
            .map_err(|e| LedgerError::Parse(format!("Failed to decode documentExists: {}", e)))
    }

    fn chain(&self) -> &str {
        &self.chain
    }
}

/// In-memory ledger for local runs and tests.
#[derive(Debug, Default)]
pub struct MockLedger {
    chain: String,
    registered: HashSet<String>,
    unreachable: bool,
}

impl MockLedger {
    pub fn new(chain: &str) -> Self {
        Self {
            chain: chain.to_string(),
            ..Self::default()
        }
    }

    pub fn with_document(mut self, cid: &str) -> Self {
        self.registered.insert(cid.to_string());
        self
    }

    /// Every read fails with a connection error.
    pub fn unreachable(mut self) -> Self {
        self.unreachable = true;
        self
    }
}

#[async_trait]
impl Ledger for MockLedger {
    async fn document_exists(&self, cid: &str) -> Result<bool, LedgerError> {
        if self.unreachable {
            return Err(LedgerError::RpcConnection(format!(
                "{} node unreachable",
                self.chain
            )));
        }
        Ok(self.registered.contains(cid))
    }

    fn chain(&self) -> &str {
        &self.chain
    }
}
