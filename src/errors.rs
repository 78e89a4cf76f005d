use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use solana_sdk::pubkey::Pubkey;
use std::io;
use thiserror::Error;
use tracing::{error, warn};

/// Fallback body for anything we do not want to expose verbatim.
pub const UNKNOWN_ERROR_MESSAGE: &str = "An unknown error occurred";

#[derive(Error, Debug, Clone)]
pub enum AppError {
    #[error("Server startup error: {0}")]
    Server(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<io::Error> for AppError {
    fn from(err: io::Error) -> Self {
        error!("I/O Error occurred: {err}");
        AppError::Server(err.to_string())
    }
}

/// Every way an action request can fail.
///
/// All variants are rendered as `400 Bad Request` with a plain-text body, which
/// is what wallets and Blink unfurlers display to the user. Only `Unknown`
/// hides its payload: the detail is logged for operators and replaced with
/// [`UNKNOWN_ERROR_MESSAGE`] on the wire.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ActionError {
    #[error("Invalid input query parameter: {0}")]
    InvalidParameter(&'static str),

    #[error("Invalid \"account\" provided")]
    InvalidAccount,

    #[error("account may not be rent exempt: {0}")]
    InsufficientAmount(Pubkey),

    #[error("An unknown error occurred")]
    Unknown(String),
}

impl ActionError {
    pub fn unknown(detail: impl Into<String>) -> Self {
        Self::Unknown(detail.into())
    }
}

impl From<RpcError> for ActionError {
    fn from(err: RpcError) -> Self {
        Self::Unknown(format!("RPC error: {err}"))
    }
}

impl From<OrderApiError> for ActionError {
    fn from(err: OrderApiError) -> Self {
        Self::Unknown(format!("Limit order API error: {err}"))
    }
}

impl IntoResponse for ActionError {
    fn into_response(self) -> Response {
        match &self {
            ActionError::Unknown(detail) => error!("Action failed: {detail}"),
            _ => warn!("Action rejected: {self}"),
        }

        (StatusCode::BAD_REQUEST, self.to_string()).into_response()
    }
}

#[derive(Error, Debug)]
pub enum RpcError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON-RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("Invalid RPC response: {0}")]
    InvalidResponse(String),
}

#[derive(Error, Debug)]
pub enum OrderApiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to decode order transaction: {0}")]
    Decode(String),
}
