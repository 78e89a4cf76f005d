#![allow(dead_code)]

pub mod mock_upstream;

use async_trait::async_trait;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, Response},
};
use clap::Parser;
use limit_blink::{
    cli::Args,
    config::Config,
    errors::{OrderApiError, RpcError},
    order::{OrderProvider, OrderRequest},
    rpc::ChainClient,
    server::build_with,
};
use solana_sdk::{
    hash::Hash,
    instruction::{AccountMeta, Instruction},
    pubkey::Pubkey,
};
use std::sync::{
    Arc, LazyLock, Mutex,
    atomic::{AtomicUsize, Ordering},
};
use tower::ServiceExt;

pub const VALID_ACCOUNT: &str = "4Nd1mBQtrMJVYVfKf2PJy9NZUZdTAsp7D4xWLs4gDB4T";
pub const RECIPIENT: &str = "9WzDXwBbmkg8ZTbNMqUxvQRAyrZzDsGYdLVL9zYtAWWM";
pub const PUBLIC_URL: &str = "https://blinks.example.com";
pub const MINIMUM_BALANCE: u64 = 890_880;

static INIT_LOGGING: LazyLock<()> = LazyLock::new(|| {
    tracing_subscriber::fmt::init();
});

pub fn initialize_logging() {
    let _ = INIT_LOGGING;
}

pub fn config_from(inputs: &[&str]) -> Arc<Config> {
    let args = Args::try_parse_from(inputs).expect("Invalid test arguments");

    Arc::new(Config::from_args(args).expect("Invalid test configuration"))
}

pub fn test_config(extra: &[&str]) -> Arc<Config> {
    let mut inputs = vec!["testing", "--public-url", PUBLIC_URL];
    inputs.extend_from_slice(extra);

    config_from(&inputs)
}

/// Counts every call so tests can assert nothing reached the network.
pub struct MockChain {
    pub blockhash: Hash,
    pub rent_calls: AtomicUsize,
    pub blockhash_calls: AtomicUsize,
}

impl Default for MockChain {
    fn default() -> Self {
        Self {
            blockhash: Hash::new_from_array([7; 32]),
            rent_calls: AtomicUsize::new(0),
            blockhash_calls: AtomicUsize::new(0),
        }
    }
}

impl MockChain {
    pub fn calls(&self) -> usize {
        self.rent_calls.load(Ordering::SeqCst) + self.blockhash_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChainClient for MockChain {
    async fn minimum_balance_for_rent_exemption(&self, _data_len: usize) -> Result<u64, RpcError> {
        self.rent_calls.fetch_add(1, Ordering::SeqCst);
        Ok(MINIMUM_BALANCE)
    }

    async fn latest_blockhash(&self) -> Result<Hash, RpcError> {
        self.blockhash_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.blockhash)
    }
}

#[derive(Default)]
pub struct MockOrders {
    pub requests: Mutex<Vec<OrderRequest>>,
    pub fail: bool,
}

impl MockOrders {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn requests(&self) -> Vec<OrderRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl OrderProvider for MockOrders {
    async fn create_order(&self, request: &OrderRequest) -> Result<Vec<Instruction>, OrderApiError> {
        self.requests.lock().unwrap().push(request.clone());

        if self.fail {
            return Err(OrderApiError::Status {
                status: 500,
                body: "order program unavailable".to_string(),
            });
        }

        Ok(vec![Instruction::new_with_bytes(
            Pubkey::new_unique(),
            &[42],
            vec![
                AccountMeta::new(request.owner, true),
                AccountMeta::new(request.base, true),
            ],
        )])
    }
}

pub struct TestApp {
    pub router: Router,
    pub chain: Arc<MockChain>,
    pub orders: Arc<MockOrders>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with(test_config(&[]), MockOrders::default())
    }

    pub fn with(config: Arc<Config>, orders: MockOrders) -> Self {
        initialize_logging();

        let chain = Arc::new(MockChain::default());
        let orders = Arc::new(orders);
        let router = build_with(config, chain.clone(), orders.clone());

        Self {
            router,
            chain,
            orders,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> (Response<Body>, Vec<u8>) {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Request failed");

        let (parts, body) = response.into_parts();
        let bytes = to_bytes(body, usize::MAX)
            .await
            .expect("Failed to read response body");

        (Response::from_parts(parts, Body::empty()), bytes.to_vec())
    }

    pub fn total_calls(&self) -> usize {
        self.chain.calls() + self.orders.requests.lock().unwrap().len()
    }
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub fn options(uri: &str) -> Request<Body> {
    Request::builder()
        .method("OPTIONS")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub fn post(uri: &str, body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(body.into())
        .unwrap()
}

pub fn account_body(account: &str) -> String {
    serde_json::json!({ "account": account }).to_string()
}
