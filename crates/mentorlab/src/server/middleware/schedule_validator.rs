//! Rejects requests referencing an unknown schedule before the handler runs.

use std::sync::Arc;

use axum::extract::{Path, Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use tracing::warn;

use crate::server::types::ApiErrorType;
use crate::types::AppState;

/// Middleware for the `/schedule/:schedule_id` routes: a request whose
/// schedule id does not exist gets a 404 here, so every handler behind this
/// layer can assume the schedule is real.
pub async fn validate_schedule(
    State(s): State<Arc<AppState>>,
    Path(schedule_id): Path<i64>,
    req: Request,
    next: Next,
) -> Response {
    match s.db.get_schedule(schedule_id) {
        Ok(Some(_)) => next.run(req).await,
        Ok(None) => {
            warn!("Request for unknown schedule {}", schedule_id);
            ApiErrorType::from((
                StatusCode::NOT_FOUND,
                "Schedule not found",
                Some(format!("schedule {}", schedule_id)),
            ))
            .into_response()
        }
        Err(e) => ApiErrorType::from((
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to look up schedule",
            Some(e.to_string()),
        ))
        .into_response(),
    }
}
