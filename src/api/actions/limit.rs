use super::{ICON_PATH, absolute_url, request_origin};
use crate::{
    actions::{ActionGetResponse, ActionLinks, ActionParameter, ActionPostResponse, LinkedAction},
    errors::ActionError,
    order::{OrderRequest, ensure_rent_exempt, respond_with_order},
    params::{
        AMOUNT, AMOUNT_IN_SOL, AMOUNT_IN_USDC, QueryParams, SOL_DECIMALS, resolve_transfer,
        to_base_units,
    },
    request::validate_account,
    server::state::AppStateExt,
};
use axum::{
    Json,
    body::Bytes,
    extract::{RawQuery, State},
    http::HeaderMap,
};
use tracing::{debug, warn};
use url::Url;

pub const PATH: &str = "/api/actions/limit";
pub const MESSAGE: &str = "DCA order";

/// The descriptor does not depend on the query: `to` and `amount` are only
/// validated.
pub fn descriptor(origin: &Url) -> Result<ActionGetResponse, ActionError> {
    let href = absolute_url(origin, PATH)?;
    let icon = absolute_url(origin, ICON_PATH)?;

    Ok(ActionGetResponse {
        title: "Actions Example - Transfer Native SOL".to_string(),
        icon: icon.to_string(),
        description: "Transfer SOL to another Solana wallet".to_string(),
        label: "Transfer".to_string(),
        links: ActionLinks {
            actions: vec![LinkedAction {
                label: "DCA".to_string(),
                href: href.to_string(),
                parameters: vec![
                    ActionParameter::required(AMOUNT_IN_USDC, "USDC"),
                    ActionParameter::required(AMOUNT_IN_SOL, "SOL"),
                ],
            }],
        },
    })
}

pub async fn get_route(
    State(state): AppStateExt,
    headers: HeaderMap,
    RawQuery(query): RawQuery,
) -> Result<Json<ActionGetResponse>, ActionError> {
    let query = QueryParams::parse(query.as_deref());
    resolve_transfer(&query, &state.config.defaults)?;

    let origin = request_origin(&state.config, &headers)?;

    Ok(Json(descriptor(&origin)?))
}

pub async fn post_route(
    State(state): AppStateExt,
    RawQuery(query): RawQuery,
    body: Bytes,
) -> Result<Json<ActionPostResponse>, ActionError> {
    let query = QueryParams::parse(query.as_deref());
    let params = resolve_transfer(&query, &state.config.defaults)?;
    let account = validate_account(&body)?;

    debug!(to = %params.to, amount = params.amount, %account, "Validated limit action");

    ensure_rent_exempt(state.chain.as_ref(), &params.to, params.amount).await?;

    let order = &state.config.order;
    if to_base_units(params.amount, SOL_DECIMALS, AMOUNT).ok() != Some(order.fixed_in_amount) {
        // The order is sized by configuration, not by `amount`.
        warn!(
            amount = params.amount,
            fixed_in_amount = order.fixed_in_amount,
            "Requested amount differs from the configured order size"
        );
    }

    let request = OrderRequest::new(
        params.to,
        order.fixed_in_amount,
        order.fixed_out_amount,
        order,
    );

    let response = respond_with_order(
        state.chain.as_ref(),
        state.orders.as_ref(),
        &request,
        &account,
        MESSAGE,
    )
    .await?;

    Ok(Json(response))
}
