use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;

use crate::AppState;
use crate::handlers::reject;
use crate::models::unit::{ErrorBody, SalesQuery, StatisticResponse};
use crate::services::sales;

/// `GET /sales?date=`: offers updated in the 24 hours up to and including
/// the given instant.
pub async fn get_sales(
    State(state): State<AppState>,
    Query(query): Query<SalesQuery>,
) -> Result<Json<StatisticResponse>, (StatusCode, Json<ErrorBody>)> {
    sales::get_sales(state.store.as_ref(), query.date)
        .await
        .map(Json)
        .map_err(reject)
}
