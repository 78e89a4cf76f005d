use crate::config::{
    Config, DEFAULT_INPUT_MINT, DEFAULT_LIMIT_ORDER_API_URL, DEFAULT_OUTPUT_MINT,
    DEFAULT_REFERRAL_ACCOUNT, DEFAULT_RPC_URL, DEFAULT_TO_ADDRESS,
};
use crate::errors::AppError;
use crate::types::LogLevel;
use clap::{CommandFactory, Parser};
use std::net::IpAddr;
use std::path::PathBuf;
use twelf::{Layer, config};

const ENV_PREFIX: &str = "LIMIT_BLINK_";

#[derive(Parser, Debug, Clone)]
#[command(author,
          version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("GIT_REVISION"), ")"),
          about,
          long_about = None)]
#[config]
pub struct Args {
    #[arg(long, default_value = "0.0.0.0")]
    pub server_address: IpAddr,

    #[arg(long, default_value = "3000")]
    pub server_port: u16,

    #[arg(long, default_value = "info")]
    pub log_level: LogLevel,

    #[arg(long, help = "Path to an existing configuration file")]
    #[serde(default)]
    pub config: Option<PathBuf>,

    /// Origin used in action links and icons, e.g. `https://blinks.example.com`.
    /// Derived from the `Host` header when unset.
    #[arg(long)]
    pub public_url: Option<String>,

    #[arg(long, default_value = DEFAULT_RPC_URL)]
    pub rpc_url: String,

    /// Appended to the RPC URL as `?api-key=` (Helius style).
    #[arg(long)]
    pub rpc_api_key: Option<String>,

    #[arg(long, default_value = "30")]
    pub request_timeout_secs: u64,

    #[arg(long, default_value = DEFAULT_LIMIT_ORDER_API_URL)]
    pub limit_order_api_url: String,

    #[arg(long, default_value = DEFAULT_REFERRAL_ACCOUNT)]
    pub referral_account: String,

    #[arg(long, default_value = "limitBlink")]
    pub referral_name: String,

    #[arg(long, default_value = DEFAULT_TO_ADDRESS)]
    pub default_to_address: String,

    /// Default for `amount`, in SOL.
    #[arg(long, default_value = "1.0")]
    pub default_amount: f64,

    #[arg(long, default_value = "1.0")]
    pub default_amount_in_sol: f64,

    #[arg(long, default_value = "1.0")]
    pub default_amount_in_usdc: f64,

    /// Order input amount of the `/api/actions/limit` action, in base units.
    #[arg(long, default_value = "100000")]
    pub fixed_in_amount: u64,

    /// Order output amount of the `/api/actions/limit` action, in base units.
    #[arg(long, default_value = "100000")]
    pub fixed_out_amount: u64,

    #[arg(long, default_value = DEFAULT_INPUT_MINT)]
    pub input_mint: String,

    #[arg(long, default_value = DEFAULT_OUTPUT_MINT)]
    pub output_mint: String,
}

fn get_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("limit-blink").join("config.toml"))
}

impl Args {
    /// Layers, lowest priority first: TOML file, `LIMIT_BLINK_*` environment, CLI flags.
    fn parse_args(config_path: Option<PathBuf>) -> Result<Args, AppError> {
        let matches = Self::command().get_matches();

        let mut config_layers = vec![
            Layer::Env(Some(String::from(ENV_PREFIX))),
            Layer::Clap(matches),
        ];

        if let Some(path) = config_path.as_ref().filter(|path| path.exists()) {
            config_layers.insert(0, Layer::Toml(path.clone()));
        }

        Self::with_layers(&config_layers).map_err(|e| match e {
            twelf::Error::Toml(_) => AppError::Config(format!(
                "Failed to parse config file '{}'",
                config_path
                    .as_ref()
                    .map(|p| p.to_string_lossy().to_string())
                    .unwrap_or_default()
            )),
            _ => AppError::Config(e.to_string()),
        })
    }

    pub fn init() -> Result<Config, AppError> {
        let initial_args = Args::parse();

        if let Some(path) = initial_args.config.as_ref() {
            if !path.exists() {
                return Err(AppError::Config(format!(
                    "Config file '{}' does not exist",
                    path.to_string_lossy()
                )));
            }
        }

        let config_path = initial_args.config.or_else(get_config_path);
        let arguments = Args::parse_args(config_path)?;

        Config::from_args(arguments)
    }
}
