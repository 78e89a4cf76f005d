use crate::{
    config::LimitOrderConfig,
    errors::{AppError, OrderApiError},
    order::{OrderProvider, OrderRequest},
};
use async_trait::async_trait;
use base64::{Engine, engine::general_purpose::STANDARD};
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, serde_as};
use solana_sdk::{
    instruction::{AccountMeta, Instruction},
    message::Message,
    pubkey::Pubkey,
    transaction::Transaction,
};
use tracing::{debug, error};

/// Client of the limit-order program's HTTP API.
#[derive(Clone)]
pub struct LimitOrderApi {
    base_url: Url,
    client: Client,
    referral_account: Pubkey,
    referral_name: String,
}

#[serde_as]
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateOrderBody<'a> {
    #[serde_as(as = "DisplayFromStr")]
    owner: Pubkey,
    #[serde_as(as = "DisplayFromStr")]
    in_amount: u64,
    #[serde_as(as = "DisplayFromStr")]
    out_amount: u64,
    #[serde_as(as = "DisplayFromStr")]
    input_mint: Pubkey,
    #[serde_as(as = "DisplayFromStr")]
    output_mint: Pubkey,
    expired_at: Option<i64>,
    #[serde_as(as = "DisplayFromStr")]
    base: Pubkey,
    #[serde_as(as = "DisplayFromStr")]
    referral_account: Pubkey,
    referral_name: &'a str,
}

#[derive(Deserialize)]
struct CreateOrderResponse {
    /// Base64 legacy transaction holding the order instructions.
    tx: String,
}

impl LimitOrderApi {
    pub fn new(config: &LimitOrderConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| AppError::Server(format!("failed to build limit order client: {e}")))?;

        Ok(Self {
            base_url: config.api_url.clone(),
            client,
            referral_account: config.referral_account,
            referral_name: config.referral_name.clone(),
        })
    }

    fn body<'a>(&'a self, request: &OrderRequest) -> CreateOrderBody<'a> {
        CreateOrderBody {
            owner: request.owner,
            in_amount: request.in_amount,
            out_amount: request.out_amount,
            input_mint: request.input_mint,
            output_mint: request.output_mint,
            expired_at: request.expired_at,
            base: request.base,
            referral_account: self.referral_account,
            referral_name: &self.referral_name,
        }
    }
}

#[async_trait]
impl OrderProvider for LimitOrderApi {
    async fn create_order(&self, request: &OrderRequest) -> Result<Vec<Instruction>, OrderApiError> {
        let url = self
            .base_url
            .join("createOrder")
            .map_err(|e| OrderApiError::Decode(format!("invalid API URL: {e}")))?;

        debug!(url = %url, owner = %request.owner, base = %request.base, "LimitOrderApi POST");

        let resp = self
            .client
            .post(url.clone())
            .json(&self.body(request))
            .send()
            .await?;

        let status = resp.status();
        let body_text = resp.text().await?;

        if !status.is_success() {
            error!(url = %url, status = %status, response_body = %body_text, "LimitOrderApi request failed");

            return Err(OrderApiError::Status {
                status: status.as_u16(),
                body: body_text,
            });
        }

        let response: CreateOrderResponse = serde_json::from_str(&body_text)
            .map_err(|e| OrderApiError::Decode(format!("unexpected response: {e}")))?;

        decode_instructions(&response.tx)
    }
}

/// Unpacks the instructions of a base64 wire transaction.
pub fn decode_instructions(tx: &str) -> Result<Vec<Instruction>, OrderApiError> {
    let bytes = STANDARD
        .decode(tx)
        .map_err(|e| OrderApiError::Decode(format!("invalid base64: {e}")))?;

    let transaction: Transaction = bincode::deserialize(&bytes)
        .map_err(|e| OrderApiError::Decode(format!("invalid transaction: {e}")))?;

    instructions_from_message(&transaction.message)
}

/// Inverse of [`Message::new`]: account roles come from the legacy header
/// layout (writable signers, readonly signers, writable, readonly).
fn instructions_from_message(message: &Message) -> Result<Vec<Instruction>, OrderApiError> {
    let keys = &message.account_keys;
    let header = &message.header;
    let num_signers = header.num_required_signatures as usize;
    let num_writable_signers = num_signers.saturating_sub(header.num_readonly_signed_accounts as usize);
    let num_writable_unsigned = keys
        .len()
        .saturating_sub(num_signers)
        .saturating_sub(header.num_readonly_unsigned_accounts as usize);

    let key_at = |index: u8| {
        keys.get(index as usize).copied().ok_or_else(|| {
            OrderApiError::Decode(format!("account index {index} out of bounds"))
        })
    };

    message
        .instructions
        .iter()
        .map(|compiled| {
            let program_id = key_at(compiled.program_id_index)?;

            let accounts = compiled
                .accounts
                .iter()
                .map(|&index| {
                    let pubkey = key_at(index)?;
                    let index = index as usize;
                    let is_signer = index < num_signers;
                    let is_writable = if is_signer {
                        index < num_writable_signers
                    } else {
                        index - num_signers < num_writable_unsigned
                    };

                    Ok(AccountMeta {
                        pubkey,
                        is_signer,
                        is_writable,
                    })
                })
                .collect::<Result<Vec<_>, OrderApiError>>()?;

            Ok(Instruction {
                program_id,
                accounts,
                data: compiled.data.clone(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    fn sample_instructions() -> Vec<Instruction> {
        let owner = Pubkey::new_unique();
        let base = Pubkey::new_unique();
        let program = Pubkey::new_unique();

        vec![
            Instruction::new_with_bytes(
                program,
                &[7, 7, 7],
                vec![
                    AccountMeta::new(owner, true),
                    AccountMeta::new_readonly(base, true),
                    AccountMeta::new(Pubkey::new_unique(), false),
                    AccountMeta::new_readonly(Pubkey::new_unique(), false),
                ],
            ),
            Instruction::new_with_bytes(
                program,
                &[],
                vec![AccountMeta::new(owner, true)],
            ),
        ]
    }

    #[test]
    fn test_decode_instructions_roundtrips_message() {
        let instructions = sample_instructions();
        let payer = instructions[0].accounts[0].pubkey;
        let transaction = Transaction::new_unsigned(Message::new(&instructions, Some(&payer)));
        let encoded = STANDARD.encode(bincode::serialize(&transaction).unwrap());

        let decoded = decode_instructions(&encoded).unwrap();

        assert_eq!(decoded, instructions);
    }

    #[test]
    fn test_decode_instructions_rejects_garbage() {
        assert!(matches!(
            decode_instructions("%%%"),
            Err(OrderApiError::Decode(_))
        ));
        assert!(matches!(
            decode_instructions(&STANDARD.encode([1, 2, 3])),
            Err(OrderApiError::Decode(_))
        ));
    }

    #[test]
    fn test_create_order_body() {
        let api = LimitOrderApi::new(&LimitOrderConfig {
            api_url: Url::parse("https://jup.ag/api/limit/v1/").unwrap(),
            referral_account: Pubkey::new_from_array([1; 32]),
            referral_name: "limitBlink".to_string(),
            request_timeout: Duration::from_secs(5),
        })
        .unwrap();

        let request = OrderRequest {
            owner: Pubkey::new_from_array([2; 32]),
            in_amount: 100_000,
            out_amount: 200_000,
            input_mint: Pubkey::new_from_array([3; 32]),
            output_mint: Pubkey::new_from_array([4; 32]),
            expired_at: None,
            base: Pubkey::new_from_array([5; 32]),
        };

        let body = serde_json::to_value(api.body(&request)).unwrap();

        assert_eq!(
            body,
            serde_json::json!({
                "owner": Pubkey::new_from_array([2; 32]).to_string(),
                "inAmount": "100000",
                "outAmount": "200000",
                "inputMint": Pubkey::new_from_array([3; 32]).to_string(),
                "outputMint": Pubkey::new_from_array([4; 32]).to_string(),
                "expiredAt": null,
                "base": Pubkey::new_from_array([5; 32]).to_string(),
                "referralAccount": Pubkey::new_from_array([1; 32]).to_string(),
                "referralName": "limitBlink",
            })
        );
    }
}
