use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use uuid::Uuid;

use crate::AppState;
use crate::handlers::reject;
use crate::models::unit::{ErrorBody, UnitNode};
use crate::services::tree;

/// `GET /nodes/{id}`: materialized unit, with the full subtree for
/// categories.
pub async fn get_node(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<UnitNode>, (StatusCode, Json<ErrorBody>)> {
    tree::get_info(state.store.as_ref(), id)
        .await
        .map(Json)
        .map_err(reject)
}
