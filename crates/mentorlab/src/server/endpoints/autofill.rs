//! The auto-fill endpoint.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Local;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{error, info};

use crate::scheduling::{self, AutoFillParameters};
use crate::server::util::schedule_error_to_response;
use crate::types::AppState;

#[derive(Debug, Deserialize)]
pub struct AutoFillRequest {
    /// Term whose availability submissions feed the run.
    pub term: String,

    #[serde(flatten)]
    pub params: AutoFillParameters,
}

/// POST /schedule/:schedule_id/auto_fill
///
/// Plans from a snapshot of the schedule and the term's availability, then
/// applies the proposals one by one. Per-item write failures are listed in
/// the report rather than failing the run.
pub async fn post_auto_fill(
    Path(schedule_id): Path<i64>,
    State(s): State<Arc<AppState>>,
    Json(req): Json<AutoFillRequest>,
) -> Response {
    info!(
        "POST /schedule/{}/auto_fill - term {} (max_per_slot={}, max_slots_per_mentor={}, fill_empty_only={})",
        schedule_id,
        req.term,
        req.params.max_per_slot,
        req.params.max_slots_per_mentor,
        req.params.fill_empty_only
    );

    let today = Local::now().date_naive();
    match scheduling::run_auto_fill(&s.db, schedule_id, &req.term, &req.params, today) {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(e) => {
            error!("Auto-fill on schedule {} failed: {}", schedule_id, e);
            schedule_error_to_response(e)
        }
    }
}
