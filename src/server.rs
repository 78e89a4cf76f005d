pub mod logging;
pub mod routes;
pub mod state;

use crate::{
    config::Config,
    errors::AppError,
    limit_order::LimitOrderApi,
    middlewares::{cors::actions_headers, errors::error_middleware},
    order::OrderProvider,
    rpc::{ChainClient, RpcClient},
};
use axum::{Router, middleware::from_fn};
use routes::get_api_routes;
use state::AppState;
use std::sync::Arc;
use tower::Layer;
use tower_http::normalize_path::NormalizePathLayer;
use tracing::info;

/// Builds the `Router` with the production collaborators.
pub fn build(config: Arc<Config>) -> Result<Router, AppError> {
    let chain = Arc::new(RpcClient::new(&config.rpc)?);
    let orders = Arc::new(LimitOrderApi::new(&config.limit_order)?);

    info!(
        rpc = %config.rpc.url,
        limit_order_api = %config.limit_order.api_url,
        "Collaborators configured"
    );

    Ok(build_with(config, chain, orders))
}

/// Builds the `Router` around arbitrary collaborators.
pub fn build_with(
    config: Arc<Config>,
    chain: Arc<dyn ChainClient>,
    orders: Arc<dyn OrderProvider>,
) -> Router {
    let app_state = AppState {
        config,
        chain,
        orders,
    };

    // the CORS layer is outermost so rewritten error responses carry it too
    let inner = get_api_routes()
        .with_state(app_state)
        .layer(from_fn(error_middleware))
        .layer(from_fn(actions_headers));

    let inner = NormalizePathLayer::trim_trailing_slash().layer(inner);

    Router::new().fallback_service(inner)
}
