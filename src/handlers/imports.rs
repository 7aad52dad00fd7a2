use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use crate::AppState;
use crate::handlers::reject;
use crate::models::unit::{ErrorBody, ImportRequest};
use crate::services::import;

/// `POST /imports`: import new units and/or new versions of existing units.
pub async fn import_units(
    State(state): State<AppState>,
    Json(request): Json<ImportRequest>,
) -> Result<StatusCode, (StatusCode, Json<ErrorBody>)> {
    import::import_units(state.store.as_ref(), request)
        .await
        .map(|()| StatusCode::OK)
        .map_err(reject)
}
