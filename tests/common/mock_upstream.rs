use axum::{Json, Router, http::StatusCode, response::IntoResponse, routing::post};
use base64::{Engine, engine::general_purpose::STANDARD};
use serde_json::{Value, json};
use solana_sdk::{
    hash::Hash,
    instruction::{AccountMeta, Instruction},
    message::Message,
    pubkey::Pubkey,
    transaction::Transaction,
};
use std::{
    str::FromStr,
    sync::{Arc, Mutex},
};

pub const ORDER_PROGRAM: &str = "jupoNjAxXgZ4rjzxzPMP4oxduvQsQtZzyknqvzYNrNu";

/// One HTTP server playing both the Solana RPC node (`POST /`) and the
/// limit-order API (`POST /createOrder`).
pub struct MockUpstream {
    pub url: String,
    pub blockhash: Hash,
    pub rpc_methods: Arc<Mutex<Vec<String>>>,
    pub order_bodies: Arc<Mutex<Vec<Value>>>,
}

#[derive(Clone)]
struct MockState {
    blockhash: Hash,
    minimum_balance: u64,
    order_status: StatusCode,
    rpc_methods: Arc<Mutex<Vec<String>>>,
    order_bodies: Arc<Mutex<Vec<Value>>>,
}

impl MockUpstream {
    pub async fn healthy() -> Self {
        Self::start(StatusCode::OK).await
    }

    pub async fn order_api_failing() -> Self {
        Self::start(StatusCode::INTERNAL_SERVER_ERROR).await
    }

    async fn start(order_status: StatusCode) -> Self {
        let state = MockState {
            blockhash: Hash::new_from_array([3; 32]),
            minimum_balance: super::MINIMUM_BALANCE,
            order_status,
            rpc_methods: Arc::default(),
            order_bodies: Arc::default(),
        };

        let mock_app = Router::new()
            .route(
                "/",
                post({
                    let state = state.clone();
                    move |Json(request): Json<Value>| rpc(state.clone(), request)
                }),
            )
            .route(
                "/createOrder",
                post({
                    let state = state.clone();
                    move |Json(body): Json<Value>| create_order(state.clone(), body)
                }),
            );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let url = format!("http://{addr}/");

        tokio::spawn(async move {
            axum::serve(listener, mock_app).await.unwrap();
        });

        tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;

        Self {
            url,
            blockhash: state.blockhash,
            rpc_methods: state.rpc_methods,
            order_bodies: state.order_bodies,
        }
    }

    pub fn rpc_methods(&self) -> Vec<String> {
        self.rpc_methods.lock().unwrap().clone()
    }

    pub fn order_bodies(&self) -> Vec<Value> {
        self.order_bodies.lock().unwrap().clone()
    }
}

async fn rpc(state: MockState, request: Value) -> Json<Value> {
    let method = request["method"].as_str().unwrap_or_default().to_string();
    state.rpc_methods.lock().unwrap().push(method.clone());

    let response = match method.as_str() {
        "getMinimumBalanceForRentExemption" => json!({
            "jsonrpc": "2.0",
            "id": request["id"],
            "result": state.minimum_balance,
        }),
        "getLatestBlockhash" => json!({
            "jsonrpc": "2.0",
            "id": request["id"],
            "result": {
                "context": { "slot": 1 },
                "value": {
                    "blockhash": state.blockhash.to_string(),
                    "lastValidBlockHeight": 100,
                },
            },
        }),
        _ => json!({
            "jsonrpc": "2.0",
            "id": request["id"],
            "error": { "code": -32601, "message": "Method not found" },
        }),
    };

    Json(response)
}

async fn create_order(state: MockState, body: Value) -> impl IntoResponse {
    state.order_bodies.lock().unwrap().push(body.clone());

    if !state.order_status.is_success() {
        return (state.order_status, "upstream exploded".to_string()).into_response();
    }

    let owner = Pubkey::from_str(body["owner"].as_str().unwrap()).unwrap();
    let base = Pubkey::from_str(body["base"].as_str().unwrap()).unwrap();
    let instruction = Instruction::new_with_bytes(
        Pubkey::from_str(ORDER_PROGRAM).unwrap(),
        &[1, 2, 3, 4],
        vec![
            AccountMeta::new(owner, true),
            AccountMeta::new(base, true),
        ],
    );
    let transaction = Transaction::new_unsigned(Message::new(&[instruction], Some(&owner)));
    let tx = STANDARD.encode(bincode::serialize(&transaction).unwrap());

    Json(json!({ "tx": tx })).into_response()
}
