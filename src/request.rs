use crate::errors::ActionError;
use serde::Deserialize;
use solana_sdk::pubkey::Pubkey;
use std::str::FromStr;

/// Body of an action `POST`, as sent by the wallet.
///
/// Wallets may send more fields than `account` (e.g. `type`, `data`); they
/// are accepted and ignored.
#[derive(Debug, Deserialize, PartialEq, Eq)]
pub struct ActionPostRequest {
    pub account: String,
}

/// Extracts the caller's wallet address from a raw `POST` body.
///
/// A body that is not JSON at all is an [`ActionError::Unknown`]; a JSON body
/// without a well-formed `account` is [`ActionError::InvalidAccount`].
pub fn validate_account(body: &[u8]) -> Result<Pubkey, ActionError> {
    let value: serde_json::Value = serde_json::from_slice(body)
        .map_err(|e| ActionError::unknown(format!("Request body is not valid JSON: {e}")))?;

    let request: ActionPostRequest =
        serde_json::from_value(value).map_err(|_| ActionError::InvalidAccount)?;

    Pubkey::from_str(&request.account).map_err(|_| ActionError::InvalidAccount)
}
