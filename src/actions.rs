//! Wire types of the Solana Actions protocol.

use crate::errors::ActionError;
use base64::{Engine, engine::general_purpose::STANDARD};
use serde::{Deserialize, Serialize};
use solana_sdk::transaction::Transaction;

/// Response of an action `GET` (and `OPTIONS`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ActionGetResponse {
    pub title: String,
    pub icon: String,
    pub description: String,
    /// Ignored by wallets whenever `links.actions` is present.
    pub label: String,
    pub links: ActionLinks,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ActionLinks {
    pub actions: Vec<LinkedAction>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LinkedAction {
    pub label: String,
    /// May contain `{name}` placeholders the wallet fills from `parameters`.
    pub href: String,
    pub parameters: Vec<ActionParameter>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ActionParameter {
    pub name: String,
    pub label: String,
    pub required: bool,
}

impl ActionParameter {
    pub fn required(name: &str, label: &str) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            required: true,
        }
    }
}

/// Response of an action `POST`: an unsigned transaction for the wallet.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ActionPostResponse {
    /// Base64 of the wire-format transaction, signatures zeroed.
    pub transaction: String,
    pub message: String,
}

impl ActionPostResponse {
    pub fn new(transaction: &Transaction, message: impl Into<String>) -> Result<Self, ActionError> {
        let bytes = bincode::serialize(transaction)
            .map_err(|e| ActionError::unknown(format!("Failed to serialize transaction: {e}")))?;

        Ok(Self {
            transaction: STANDARD.encode(bytes),
            message: message.into(),
        })
    }
}

/// `actions.json` served at the origin root so Blink clients can map
/// website URLs to action endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ActionsJson {
    pub rules: Vec<ActionRule>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ActionRule {
    pub path_pattern: String,
    pub api_path: String,
}

impl Default for ActionsJson {
    fn default() -> Self {
        Self {
            rules: vec![
                ActionRule {
                    path_pattern: "/*".to_string(),
                    api_path: "/api/actions/*".to_string(),
                },
                // idempotent rule as the fallback
                ActionRule {
                    path_pattern: "/api/actions/**".to_string(),
                    api_path: "/api/actions/**".to_string(),
                },
            ],
        }
    }
}
