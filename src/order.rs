//! Turning validated parameters into an unsigned limit-order transaction.

use crate::{
    actions::ActionPostResponse,
    config::OrderConfig,
    errors::{ActionError, OrderApiError},
    rpc::ChainClient,
    types::BaseUnits,
};
use async_trait::async_trait;
use solana_sdk::{
    instruction::Instruction,
    message::Message,
    native_token::LAMPORTS_PER_SOL,
    pubkey::Pubkey,
    signature::{Keypair, Signer},
    transaction::Transaction,
};
use tracing::debug;

/// Everything the order program needs to open one limit order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderRequest {
    pub owner: Pubkey,
    pub in_amount: BaseUnits,
    pub out_amount: BaseUnits,
    pub input_mint: Pubkey,
    pub output_mint: Pubkey,
    /// Unix timestamp; `None` never expires.
    pub expired_at: Option<i64>,
    /// Seeds the order account address, so it must be fresh for every order.
    pub base: Pubkey,
}

impl OrderRequest {
    /// Builds a request with a freshly generated base key.
    pub fn new(
        owner: Pubkey,
        in_amount: BaseUnits,
        out_amount: BaseUnits,
        mints: &OrderConfig,
    ) -> Self {
        let base = Keypair::new();

        Self {
            owner,
            in_amount,
            out_amount,
            input_mint: mints.input_mint,
            output_mint: mints.output_mint,
            expired_at: None,
            base: base.pubkey(),
        }
    }
}

/// Creates the instructions that open a limit order.
#[async_trait]
pub trait OrderProvider: Send + Sync {
    async fn create_order(&self, request: &OrderRequest) -> Result<Vec<Instruction>, OrderApiError>;
}

/// Rejects transfers that would leave a fresh zero-data account below the
/// rent-exemption minimum.
pub async fn ensure_rent_exempt(
    chain: &dyn ChainClient,
    to: &Pubkey,
    amount_in_sol: f64,
) -> Result<(), ActionError> {
    // plain system accounts that only hold SOL have no data
    let minimum_balance = chain.minimum_balance_for_rent_exemption(0).await?;

    if amount_in_sol * (LAMPORTS_PER_SOL as f64) < minimum_balance as f64 {
        return Err(ActionError::InsufficientAmount(*to));
    }

    Ok(())
}

/// Delegates `request` to the order provider and wraps the returned
/// instructions into a transaction paid by `fee_payer`.
pub async fn build_order_transaction(
    chain: &dyn ChainClient,
    orders: &dyn OrderProvider,
    request: &OrderRequest,
    fee_payer: &Pubkey,
) -> Result<Transaction, ActionError> {
    let instructions = orders.create_order(request).await?;

    debug!(
        base = %request.base,
        instructions = instructions.len(),
        "Limit order instructions created"
    );

    let message = Message::new(&instructions, Some(fee_payer));
    let mut transaction = Transaction::new_unsigned(message);

    transaction.message.recent_blockhash = chain.latest_blockhash().await?;

    Ok(transaction)
}

/// Full `POST` pipeline after validation: order, transaction, envelope.
pub async fn respond_with_order(
    chain: &dyn ChainClient,
    orders: &dyn OrderProvider,
    request: &OrderRequest,
    fee_payer: &Pubkey,
    message: &str,
) -> Result<ActionPostResponse, ActionError> {
    let transaction = build_order_transaction(chain, orders, request, fee_payer).await?;

    ActionPostResponse::new(&transaction, message)
}
