use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use uuid::Uuid;

use crate::AppState;
use crate::handlers::reject;
use crate::models::unit::ErrorBody;
use crate::services::deletion;

/// `DELETE /delete/{id}`: remove a unit and, for categories, its resolved
/// descendants.
pub async fn delete_unit(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, (StatusCode, Json<ErrorBody>)> {
    deletion::delete_by_id(state.store.as_ref(), id)
        .await
        .map(|()| StatusCode::OK)
        .map_err(reject)
}
