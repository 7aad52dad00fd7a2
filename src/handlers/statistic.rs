use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use uuid::Uuid;

use crate::AppState;
use crate::handlers::reject;
use crate::models::unit::{ErrorBody, StatisticQuery, StatisticResponse};
use crate::services::history;

/// `GET /node/{id}/statistic?start_date=&end_date=`: update history over the
/// half-open window `[start_date, end_date)`. Statistics of deleted units are
/// unavailable.
pub async fn get_statistic(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<StatisticQuery>,
) -> Result<Json<StatisticResponse>, (StatusCode, Json<ErrorBody>)> {
    history::get_statistic(
        state.store.as_ref(),
        id,
        query.start_date,
        query.end_date,
    )
    .await
    .map(Json)
    .map_err(reject)
}
