use super::state::AppState;
use crate::api::{
    actions::{self, dca, limit},
    actions_json, root,
};
use axum::{Router, routing::get};

pub fn get_api_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(root::route))
        .route(
            actions_json::PATH,
            get(actions_json::route).options(actions_json::route),
        )
        .route(
            limit::PATH,
            get(limit::get_route)
                .options(limit::get_route)
                .post(limit::post_route),
        )
        .route(
            dca::PATH,
            get(dca::get_route)
                .options(dca::get_route)
                .post(dca::post_route),
        )
        .fallback(actions::not_found)
}
