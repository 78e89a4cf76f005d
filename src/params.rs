//! Query-string resolution for the action endpoints.
//!
//! Wallets call action URLs with loosely-typed query strings. Everything in
//! here turns those into typed values, falling back to the configured
//! [`ActionDefaults`] for anything absent, and rejects malformed input with
//! [`ActionError::InvalidParameter`] naming the offending parameter. No I/O.

use crate::{config::ActionDefaults, errors::ActionError, types::BaseUnits};
use solana_sdk::pubkey::Pubkey;
use std::str::FromStr;
use url::form_urlencoded;

pub const TO: &str = "to";
pub const AMOUNT: &str = "amount";
pub const AMOUNT_IN_SOL: &str = "amountInSOL";
pub const AMOUNT_IN_USDC: &str = "amountInUSDC";

pub const SOL_DECIMALS: u32 = 9;
pub const USDC_DECIMALS: u32 = 6;

/// Decoded `key=value` pairs of a raw query string, in request order.
#[derive(Debug, Default, Clone)]
pub struct QueryParams(Vec<(String, String)>);

impl QueryParams {
    pub fn parse(raw: Option<&str>) -> Self {
        let pairs = raw
            .map(|raw| form_urlencoded::parse(raw.as_bytes()).into_owned().collect())
            .unwrap_or_default();

        Self(pairs)
    }

    /// First value for `name`. An empty value counts as absent.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
            .filter(|value| !value.is_empty())
    }
}

/// Parameters of the `/api/actions/limit` action.
#[derive(Debug, Clone, PartialEq)]
pub struct TransferParams {
    pub to: Pubkey,
    /// In SOL, strictly positive.
    pub amount: f64,
}

/// Parameters of the `/api/actions/dca` action, already scaled to base units.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LimitOrderParams {
    pub to: Pubkey,
    /// Lamports.
    pub in_amount: BaseUnits,
    /// USDC micro-units.
    pub out_amount: BaseUnits,
}

pub fn resolve_to(query: &QueryParams, default: Pubkey) -> Result<Pubkey, ActionError> {
    match query.get(TO) {
        Some(value) => Pubkey::from_str(value).map_err(|_| ActionError::InvalidParameter(TO)),
        None => Ok(default),
    }
}

pub fn resolve_amount(
    query: &QueryParams,
    name: &'static str,
    default: f64,
) -> Result<f64, ActionError> {
    let amount = match query.get(name) {
        Some(value) => value
            .trim()
            .parse::<f64>()
            .map_err(|_| ActionError::InvalidParameter(name))?,
        None => default,
    };

    if !amount.is_finite() || amount <= 0.0 {
        return Err(ActionError::InvalidParameter(name));
    }

    Ok(amount)
}

/// Scales a human amount (e.g. `1.5` SOL) into integer base units.
///
/// Fails when the result is zero or does not fit into `u64`.
pub fn to_base_units(
    amount: f64,
    decimals: u32,
    name: &'static str,
) -> Result<BaseUnits, ActionError> {
    let scaled = (amount * 10f64.powi(decimals as i32)).round();

    if !scaled.is_finite() || scaled < 1.0 || scaled >= u64::MAX as f64 {
        return Err(ActionError::InvalidParameter(name));
    }

    Ok(scaled as BaseUnits)
}

pub fn resolve_transfer(
    query: &QueryParams,
    defaults: &ActionDefaults,
) -> Result<TransferParams, ActionError> {
    let to = resolve_to(query, defaults.to_address)?;
    let amount = resolve_amount(query, AMOUNT, defaults.amount)?;

    Ok(TransferParams { to, amount })
}

pub fn resolve_limit_order(
    query: &QueryParams,
    defaults: &ActionDefaults,
) -> Result<LimitOrderParams, ActionError> {
    let to = resolve_to(query, defaults.to_address)?;

    let in_amount = resolve_amount(query, AMOUNT_IN_SOL, defaults.amount_in_sol)?;
    let in_amount = to_base_units(in_amount, SOL_DECIMALS, AMOUNT_IN_SOL)?;

    let out_amount = resolve_amount(query, AMOUNT_IN_USDC, defaults.amount_in_usdc)?;
    let out_amount = to_base_units(out_amount, USDC_DECIMALS, AMOUNT_IN_USDC)?;

    Ok(LimitOrderParams {
        to,
        in_amount,
        out_amount,
    })
}
