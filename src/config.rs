use crate::cli::Args;
use crate::errors::AppError;
use crate::types::BaseUnits;
use solana_sdk::pubkey::Pubkey;
use std::net::IpAddr;
use std::str::FromStr;
use std::time::Duration;
use tracing::Level;
use url::Url;

pub const DEFAULT_RPC_URL: &str = "https://api.mainnet-beta.solana.com";
pub const DEFAULT_LIMIT_ORDER_API_URL: &str = "https://jup.ag/api/limit/v1/";
pub const DEFAULT_TO_ADDRESS: &str = "GqkJ3UoKTScvXiaJUxrGJ9QD847LAj2DTvMzqjaT2tJm";
pub const DEFAULT_REFERRAL_ACCOUNT: &str = "GqkJ3UoKTScvXiaJUxrGJ9QD847LAj2DTvMzqjaT2tJm";
/// Wrapped SOL.
pub const DEFAULT_INPUT_MINT: &str = "So11111111111111111111111111111111111111112";
/// USDC.
pub const DEFAULT_OUTPUT_MINT: &str = "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v";

#[derive(Clone, Debug)]
pub struct Config {
    pub server_address: IpAddr,
    pub server_port: u16,
    pub log_level: Level,
    pub public_url: Option<Url>,
    pub rpc: RpcConfig,
    pub limit_order: LimitOrderConfig,
    pub defaults: ActionDefaults,
    pub order: OrderConfig,
}

#[derive(Clone, Debug)]
pub struct RpcConfig {
    pub url: Url,
    pub api_key: Option<String>,
    pub request_timeout: Duration,
}

impl RpcConfig {
    /// The URL requests are actually sent to, with the API key attached.
    pub fn endpoint(&self) -> Url {
        let mut url = self.url.clone();

        if let Some(api_key) = &self.api_key {
            url.query_pairs_mut().append_pair("api-key", api_key);
        }

        url
    }
}

#[derive(Clone, Debug)]
pub struct LimitOrderConfig {
    pub api_url: Url,
    pub referral_account: Pubkey,
    pub referral_name: String,
    pub request_timeout: Duration,
}

/// Values used when a query parameter is absent.
#[derive(Clone, Debug, PartialEq)]
pub struct ActionDefaults {
    pub to_address: Pubkey,
    /// In SOL.
    pub amount: f64,
    pub amount_in_sol: f64,
    pub amount_in_usdc: f64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OrderConfig {
    pub input_mint: Pubkey,
    pub output_mint: Pubkey,
    pub fixed_in_amount: BaseUnits,
    pub fixed_out_amount: BaseUnits,
}

fn parse_pubkey(flag: &str, value: &str) -> Result<Pubkey, AppError> {
    Pubkey::from_str(value)
        .map_err(|_| AppError::Config(format!("--{flag} is not a valid address: {value}")))
}

fn parse_url(flag: &str, value: &str) -> Result<Url, AppError> {
    Url::parse(value).map_err(|e| AppError::Config(format!("--{flag} is not a valid URL: {e}")))
}

fn positive_amount(flag: &str, value: f64) -> Result<f64, AppError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(AppError::Config(format!(
            "--{flag} must be a positive number"
        )))
    }
}

impl Config {
    pub fn from_args(args: Args) -> Result<Self, AppError> {
        let public_url = args
            .public_url
            .as_deref()
            .map(|url| parse_url("public-url", url))
            .transpose()?;

        let request_timeout = Duration::from_secs(args.request_timeout_secs);

        let rpc = RpcConfig {
            url: parse_url("rpc-url", &args.rpc_url)?,
            api_key: args.rpc_api_key.filter(|key| !key.is_empty()),
            request_timeout,
        };

        let mut api_url = parse_url("limit-order-api-url", &args.limit_order_api_url)?;
        // `Url::join` drops the last segment unless the base ends with a slash
        if !api_url.path().ends_with('/') {
            api_url.set_path(&format!("{}/", api_url.path()));
        }

        let limit_order = LimitOrderConfig {
            api_url,
            referral_account: parse_pubkey("referral-account", &args.referral_account)?,
            referral_name: args.referral_name,
            request_timeout,
        };

        let defaults = ActionDefaults {
            to_address: parse_pubkey("default-to-address", &args.default_to_address)?,
            amount: positive_amount("default-amount", args.default_amount)?,
            amount_in_sol: positive_amount("default-amount-in-sol", args.default_amount_in_sol)?,
            amount_in_usdc: positive_amount("default-amount-in-usdc", args.default_amount_in_usdc)?,
        };

        let order = OrderConfig {
            input_mint: parse_pubkey("input-mint", &args.input_mint)?,
            output_mint: parse_pubkey("output-mint", &args.output_mint)?,
            fixed_in_amount: args.fixed_in_amount,
            fixed_out_amount: args.fixed_out_amount,
        };

        Ok(Config {
            server_address: args.server_address,
            server_port: args.server_port,
            log_level: args.log_level.into(),
            public_url,
            rpc,
            limit_order,
            defaults,
            order,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("https://api.mainnet-beta.solana.com", None, "https://api.mainnet-beta.solana.com/")]
    #[case(
        "https://mainnet.helius-rpc.com/",
        Some("abc"),
        "https://mainnet.helius-rpc.com/?api-key=abc"
    )]
    #[case(
        "https://rpc.example.com/?region=eu",
        Some("k&y"),
        "https://rpc.example.com/?region=eu&api-key=k%26y"
    )]
    fn test_rpc_endpoint(#[case] url: &str, #[case] api_key: Option<&str>, #[case] expected: &str) {
        let rpc = RpcConfig {
            url: Url::parse(url).unwrap(),
            api_key: api_key.map(String::from),
            request_timeout: Duration::from_secs(1),
        };

        assert_eq!(rpc.endpoint().as_str(), expected);
    }

    #[rstest]
    #[case(1.0, true)]
    #[case(0.000_000_001, true)]
    #[case(0.0, false)]
    #[case(-1.0, false)]
    #[case(f64::NAN, false)]
    #[case(f64::INFINITY, false)]
    fn test_positive_amount(#[case] value: f64, #[case] expected_ok: bool) {
        assert_eq!(positive_amount("amount", value).is_ok(), expected_ok);
    }
}
