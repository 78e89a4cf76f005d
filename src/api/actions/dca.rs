use super::{ICON_PATH, absolute_url, request_origin};
use crate::{
    actions::{ActionGetResponse, ActionLinks, ActionParameter, ActionPostResponse, LinkedAction},
    errors::ActionError,
    order::{OrderRequest, respond_with_order},
    params::{
        AMOUNT_IN_SOL, AMOUNT_IN_USDC, LimitOrderParams, QueryParams, TO, resolve_limit_order,
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
use tracing::debug;
use url::Url;

pub const PATH: &str = "/api/actions/dca";
pub const MESSAGE: &str = "Limit order";

/// The linked href carries `to` and leaves both amounts as `{placeholders}`
/// for the Blink client to fill in.
pub fn descriptor(origin: &Url, params: &LimitOrderParams) -> Result<ActionGetResponse, ActionError> {
    let base = absolute_url(origin, PATH)?;
    let icon = absolute_url(origin, ICON_PATH)?;

    // Braces must survive verbatim, so the query is not url-encoded.
    let href = format!(
        "{base}?{TO}={to}&{AMOUNT_IN_SOL}={{{AMOUNT_IN_SOL}}}&{AMOUNT_IN_USDC}={{{AMOUNT_IN_USDC}}}",
        to = params.to,
    );

    Ok(ActionGetResponse {
        title: "DCA Blink - SOL to USDC".to_string(),
        icon: icon.to_string(),
        description: "Place a limit order selling SOL for USDC at your price".to_string(),
        label: "Transfer".to_string(),
        links: ActionLinks {
            actions: vec![LinkedAction {
                label: "Place order".to_string(),
                href,
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
    let params = resolve_limit_order(&query, &state.config.defaults)?;

    let origin = request_origin(&state.config, &headers)?;

    Ok(Json(descriptor(&origin, &params)?))
}

pub async fn post_route(
    State(state): AppStateExt,
    RawQuery(query): RawQuery,
    body: Bytes,
) -> Result<Json<ActionPostResponse>, ActionError> {
    let query = QueryParams::parse(query.as_deref());
    let params = resolve_limit_order(&query, &state.config.defaults)?;
    let account = validate_account(&body)?;

    debug!(
        to = %params.to,
        in_amount = params.in_amount,
        out_amount = params.out_amount,
        %account,
        "Validated dca action"
    );

    let request = OrderRequest::new(
        params.to,
        params.in_amount,
        params.out_amount,
        &state.config.order,
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
