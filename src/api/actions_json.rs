use crate::actions::ActionsJson;
use axum::Json;

pub const PATH: &str = "/actions.json";

pub async fn route() -> Json<ActionsJson> {
    Json(ActionsJson::default())
}
