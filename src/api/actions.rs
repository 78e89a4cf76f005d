pub mod dca;
pub mod limit;

use crate::{config::Config, errors::ActionError};
use axum::{
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};
use std::net::SocketAddr;
use url::Url;

pub const ICON_PATH: &str = "/solana_devs.jpg";

const HOST: &str = "host";
const X_FORWARDED_PROTO: &str = "x-forwarded-proto";

/// Origin that links and icons in descriptors are resolved against.
///
/// `--public-url` wins; otherwise the `Host` header (and `X-Forwarded-Proto`
/// behind a proxy), and as a last resort the bound address.
pub fn request_origin(config: &Config, headers: &HeaderMap) -> Result<Url, ActionError> {
    if let Some(public_url) = &config.public_url {
        return Ok(public_url.clone());
    }

    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
    };

    let scheme = header(X_FORWARDED_PROTO)
        .and_then(|proto| proto.split(',').next())
        .map(str::trim)
        .unwrap_or("http");

    let origin = match header(HOST) {
        Some(host) => format!("{scheme}://{host}"),
        None => format!(
            "http://{}",
            SocketAddr::new(config.server_address, config.server_port)
        ),
    };

    Url::parse(&origin)
        .map_err(|e| ActionError::unknown(format!("invalid request origin '{origin}': {e}")))
}

pub fn absolute_url(origin: &Url, path: &str) -> Result<Url, ActionError> {
    origin
        .join(path)
        .map_err(|e| ActionError::unknown(format!("cannot join '{path}' onto {origin}: {e}")))
}

pub async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, "Not Found")
}
