//! HTTP handlers.
//!
//! The engine reports typed failures; the wire contract is flat. Every
//! catalog error kind becomes `400 Validation Failed` and store failures
//! become `500 Internal error`, with the specific kind logged before it is
//! flattened away.

pub mod delete;
pub mod imports;
pub mod nodes;
pub mod sales;
pub mod statistic;

use axum::Json;
use axum::http::StatusCode;

use crate::error::CatalogError;
use crate::models::unit::ErrorBody;

pub(crate) fn reject(error: CatalogError) -> (StatusCode, Json<ErrorBody>) {
    match error {
        CatalogError::Store(err) => {
            tracing::error!(error = %err, "store failure");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorBody {
                    code: 500,
                    message: "Internal error".to_string(),
                }),
            )
        }
        other => {
            tracing::warn!(error = %other, "request rejected");
            (
                StatusCode::BAD_REQUEST,
                Json(ErrorBody {
                    code: 400,
                    message: "Validation Failed".to_string(),
                }),
            )
        }
    }
}
