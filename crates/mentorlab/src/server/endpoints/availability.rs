//! Availability endpoints: submissions in, per-slot aggregates out.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Local;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::{error, info};

use crate::scheduling::{self, grid, Slot};
use crate::server::types::ApiErrorType;
use crate::server::util::schedule_error_to_response;
use crate::types::AppState;

#[derive(Debug, Deserialize)]
pub struct SlotSubmission {
    pub weekday: i64,
    pub hour: i64,
}

#[derive(Debug, Deserialize)]
pub struct SubmitAvailabilityRequest {
    pub slots: Vec<SlotSubmission>,
}

/// GET /availability/:term
///
/// All submissions for a term, grouped per mentor.
pub async fn get_availability(
    Path(term): Path<String>,
    State(s): State<Arc<AppState>>,
) -> Response {
    info!("GET /availability/{}", term);

    let mentors = match s.db.list_mentors() {
        Ok(mentors) => mentors,
        Err(e) => return storage_failure(e),
    };

    match scheduling::load_availability(&s.db, &term, &mentors) {
        Ok(entries) => {
            let response: Vec<_> = entries
                .into_iter()
                .map(|entry| {
                    json!({
                        "mentor_id": entry.mentor_id,
                        "mentor_name": entry.mentor_name,
                        "slots": entry
                            .slots
                            .iter()
                            .map(|slot| json!({ "weekday": slot.weekday, "hour": slot.hour }))
                            .collect::<Vec<_>>(),
                    })
                })
                .collect();
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => storage_failure(e),
    }
}

/// GET /availability/:term/aggregated
///
/// Inverts eligible mentors' submissions into "who is available in slot X",
/// keyed by the canonical slot key.
pub async fn get_aggregated_availability(
    Path(term): Path<String>,
    State(s): State<Arc<AppState>>,
) -> Response {
    info!("GET /availability/{}/aggregated", term);

    let today = Local::now().date_naive();
    let eligible = match s.db.list_mentors() {
        Ok(mentors) => mentors
            .into_iter()
            .filter(|m| scheduling::mentor_is_eligible(m, today))
            .collect::<Vec<_>>(),
        Err(e) => return storage_failure(e),
    };

    match scheduling::load_availability(&s.db, &term, &eligible) {
        Ok(entries) => {
            let aggregated = grid::aggregate_availability(&entries);
            (StatusCode::OK, Json(aggregated)).into_response()
        }
        Err(e) => storage_failure(e),
    }
}

/// POST /availability/:term/mentors/:mentor_id
///
/// Replaces the mentor's submission for the term wholesale; a resubmission
/// supersedes rather than merges. Any out-of-range slot rejects the whole
/// request before the store is touched.
pub async fn post_submit_availability(
    Path((term, mentor_id)): Path<(String, i64)>,
    State(s): State<Arc<AppState>>,
    Json(req): Json<SubmitAvailabilityRequest>,
) -> Response {
    info!(
        "POST /availability/{}/mentors/{} - {} slots",
        term,
        mentor_id,
        req.slots.len()
    );

    let mut slots = Vec::with_capacity(req.slots.len());
    for submitted in &req.slots {
        match Slot::new(submitted.weekday, submitted.hour) {
            Ok(slot) => slots.push(slot),
            Err(e) => return schedule_error_to_response(e),
        }
    }

    match s.db.replace_availability(&term, mentor_id, &slots) {
        Ok(stored) => (StatusCode::OK, Json(json!({ "stored": stored }))).into_response(),
        Err(e) => {
            error!(
                "Failed to store availability for mentor {}: {}",
                mentor_id, e
            );
            schedule_error_to_response(e)
        }
    }
}

fn storage_failure(e: scheduling::ScheduleError) -> Response {
    ApiErrorType::from((
        StatusCode::INTERNAL_SERVER_ERROR,
        "Failed to fetch availability",
        Some(e.to_string()),
    ))
    .into_response()
}
