use crate::{
    config::RpcConfig,
    errors::{AppError, RpcError},
};
use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::{Deserialize, de::DeserializeOwned};
use serde_json::{Value, json};
use solana_sdk::hash::Hash;
use std::str::FromStr;
use tracing::{debug, error};

/// The two network reads an action needs.
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Lamports an account with `data_len` bytes must hold to be rent exempt.
    async fn minimum_balance_for_rent_exemption(&self, data_len: usize) -> Result<u64, RpcError>;

    async fn latest_blockhash(&self) -> Result<Hash, RpcError>;
}

/// Solana JSON-RPC over HTTP.
#[derive(Clone)]
pub struct RpcClient {
    url: Url,
    client: Client,
}

#[derive(Deserialize)]
struct RpcResponse<T> {
    result: Option<T>,
    error: Option<RpcErrorObject>,
}

#[derive(Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

#[derive(Deserialize)]
struct WithContext<T> {
    value: T,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LatestBlockhash {
    blockhash: String,
}

impl<T> RpcResponse<T> {
    fn into_result(self) -> Result<T, RpcError> {
        if let Some(err) = self.error {
            return Err(RpcError::Rpc {
                code: err.code,
                message: err.message,
            });
        }

        self.result
            .ok_or_else(|| RpcError::InvalidResponse("missing `result`".to_string()))
    }
}

impl RpcClient {
    pub fn new(config: &RpcConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| AppError::Server(format!("failed to build RPC client: {e}")))?;

        Ok(Self {
            url: config.endpoint(),
            client,
        })
    }

    async fn call<T>(&self, method: &str, params: Value) -> Result<T, RpcError>
    where
        T: DeserializeOwned,
    {
        let request = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params,
        });

        debug!(method, "RpcClient POST");

        let resp = self
            .client
            .post(self.url.clone())
            .json(&request)
            .send()
            .await?;

        let status = resp.status();
        let body_text = resp.text().await?;

        let body: RpcResponse<T> = serde_json::from_str(&body_text).map_err(|e| {
            // the URL may carry an API key, keep it out of the logs
            error!(
                method,
                status = %status,
                response_body = %body_text,
                error = %e,
                "RpcClient failed to parse response"
            );
            RpcError::InvalidResponse(format!("{status}: {e}"))
        })?;

        body.into_result()
    }
}

#[async_trait]
impl ChainClient for RpcClient {
    async fn minimum_balance_for_rent_exemption(&self, data_len: usize) -> Result<u64, RpcError> {
        self.call("getMinimumBalanceForRentExemption", json!([data_len]))
            .await
    }

    async fn latest_blockhash(&self) -> Result<Hash, RpcError> {
        let response: WithContext<LatestBlockhash> =
            self.call("getLatestBlockhash", json!([])).await?;

        Hash::from_str(&response.value.blockhash)
            .map_err(|e| RpcError::InvalidResponse(format!("invalid blockhash: {e}")))
    }
}
