use crate::{config::Config, order::OrderProvider, rpc::ChainClient};
use axum::extract::State;
use std::sync::Arc;

/// Shared, read-only handles. Nothing in here changes between requests.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub chain: Arc<dyn ChainClient>,
    pub orders: Arc<dyn OrderProvider>,
}

pub type AppStateExt = State<AppState>;
