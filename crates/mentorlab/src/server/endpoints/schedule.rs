//! Schedule and block endpoints: the manual editing surface of the grid.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::{error, info};

use crate::db::types::DbScheduleBlock;
use crate::scheduling::editor;
use crate::server::types::ApiErrorType;
use crate::server::util::schedule_error_to_response;
use crate::types::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateScheduleRequest {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct AssignBlockRequest {
    pub mentor_id: i64,
    pub weekday: i64,
    pub hour: i64,
}

#[derive(Debug, Deserialize)]
pub struct MoveBlockRequest {
    pub weekday: i64,
    pub hour: i64,
}

fn block_json(block: &DbScheduleBlock) -> serde_json::Value {
    json!({
        "id": block.block_id,
        "schedule_id": block.schedule_id,
        "mentor_id": block.mentor_id,
        "weekday": block.weekday,
        "hour": block.hour,
    })
}

/// GET /schedules
pub async fn get_schedules(State(s): State<Arc<AppState>>) -> Response {
    info!("GET /schedules");

    match s.db.list_schedules() {
        Ok(schedules) => {
            let response: Vec<_> = schedules
                .into_iter()
                .map(|sched| {
                    json!({
                        "id": sched.schedule_id,
                        "name": sched.name,
                        "is_active": sched.is_active,
                    })
                })
                .collect();
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => ApiErrorType::from((
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to fetch schedules",
            Some(e.to_string()),
        ))
        .into_response(),
    }
}

/// POST /schedules
pub async fn post_create_schedule(
    State(s): State<Arc<AppState>>,
    Json(req): Json<CreateScheduleRequest>,
) -> Response {
    info!("POST /schedules - Creating schedule {:?}", req.name);

    match s.db.create_schedule(&req.name) {
        Ok(schedule) => (
            StatusCode::OK,
            Json(json!({
                "id": schedule.schedule_id,
                "name": schedule.name,
                "is_active": schedule.is_active,
            })),
        )
            .into_response(),
        Err(e) => {
            error!("Failed to create schedule: {}", e);
            schedule_error_to_response(e)
        }
    }
}

/// POST /schedules/:schedule_id/activate
pub async fn post_activate_schedule(
    Path(schedule_id): Path<i64>,
    State(s): State<Arc<AppState>>,
) -> Response {
    info!("POST /schedules/{}/activate", schedule_id);

    match s.db.activate_schedule(schedule_id) {
        Ok(()) => (StatusCode::OK, Json(json!({ "activated": schedule_id }))).into_response(),
        Err(e) => schedule_error_to_response(e),
    }
}

/// GET /schedule/active
///
/// Returns the canonical schedule together with its blocks.
pub async fn get_active_schedule(State(s): State<Arc<AppState>>) -> Response {
    info!("GET /schedule/active");

    let schedule = match s.db.active_schedule() {
        Ok(Some(schedule)) => schedule,
        Ok(None) => {
            return ApiErrorType::from((StatusCode::NOT_FOUND, "No active schedule"))
                .into_response()
        }
        Err(e) => {
            return ApiErrorType::from((
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to fetch active schedule",
                Some(e.to_string()),
            ))
            .into_response()
        }
    };

    match s.db.list_blocks(schedule.schedule_id) {
        Ok(blocks) => (
            StatusCode::OK,
            Json(json!({
                "id": schedule.schedule_id,
                "name": schedule.name,
                "blocks": blocks.iter().map(block_json).collect::<Vec<_>>(),
            })),
        )
            .into_response(),
        Err(e) => ApiErrorType::from((
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to fetch blocks",
            Some(e.to_string()),
        ))
        .into_response(),
    }
}

/// GET /schedule/:schedule_id/blocks
pub async fn get_blocks(
    Path(schedule_id): Path<i64>,
    State(s): State<Arc<AppState>>,
) -> Response {
    info!("GET /schedule/{}/blocks", schedule_id);

    match s.db.list_blocks(schedule_id) {
        Ok(blocks) => (
            StatusCode::OK,
            Json(blocks.iter().map(block_json).collect::<Vec<_>>()),
        )
            .into_response(),
        Err(e) => ApiErrorType::from((
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to fetch blocks",
            Some(e.to_string()),
        ))
        .into_response(),
    }
}

/// POST /schedule/:schedule_id/blocks
///
/// Manual assignment. The per-slot capacity cap is not enforced here; only
/// an exact duplicate of an existing assignment is rejected.
pub async fn post_assign_block(
    Path(schedule_id): Path<i64>,
    State(s): State<Arc<AppState>>,
    Json(req): Json<AssignBlockRequest>,
) -> Response {
    info!(
        "POST /schedule/{}/blocks - mentor {} at ({}, {})",
        schedule_id, req.mentor_id, req.weekday, req.hour
    );

    match editor::assign_block(&s.db, schedule_id, req.mentor_id, req.weekday, req.hour) {
        Ok(block) => (StatusCode::OK, Json(block_json(&block))).into_response(),
        Err(e) => schedule_error_to_response(e),
    }
}

/// POST /schedule/:schedule_id/clear
///
/// Removes every block of the schedule. Destructive and user-confirmed on
/// the client side; the grid is either emptied or the error is reported.
pub async fn post_clear_schedule(
    Path(schedule_id): Path<i64>,
    State(s): State<Arc<AppState>>,
) -> Response {
    info!("POST /schedule/{}/clear", schedule_id);

    match editor::clear_schedule(&s.db, schedule_id) {
        Ok(removed) => (StatusCode::OK, Json(json!({ "removed": removed }))).into_response(),
        Err(e) => {
            error!("Failed to clear schedule {}: {}", schedule_id, e);
            schedule_error_to_response(e)
        }
    }
}

/// POST /blocks/:block_id/move
///
/// Moves a block in place, preserving its id. Moving onto the current
/// coordinates is a no-op and is reported with `moved: false`.
pub async fn post_move_block(
    Path(block_id): Path<i64>,
    State(s): State<Arc<AppState>>,
    Json(req): Json<MoveBlockRequest>,
) -> Response {
    info!(
        "POST /blocks/{}/move - to ({}, {})",
        block_id, req.weekday, req.hour
    );

    match editor::move_block(&s.db, block_id, req.weekday, req.hour) {
        Ok(outcome) => {
            let mut body = block_json(&outcome.block);
            body["moved"] = json!(outcome.moved);
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(e) => schedule_error_to_response(e),
    }
}

/// POST /blocks/:block_id/remove
pub async fn post_remove_block(
    Path(block_id): Path<i64>,
    State(s): State<Arc<AppState>>,
) -> Response {
    info!("POST /blocks/{}/remove", block_id);

    match editor::remove_block(&s.db, block_id) {
        Ok(()) => (StatusCode::OK, Json(json!({ "removed": true }))).into_response(),
        Err(e) => schedule_error_to_response(e),
    }
}
