//! Advisory traffic endpoints.
//!
//! Traffic history never constrains assignment; if it cannot be loaded the
//! grid keeps working, so reads degrade to an empty list instead of failing.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::{info, warn};

use crate::scheduling::grid;
use crate::server::types::ApiErrorType;
use crate::types::AppState;

#[derive(Debug, Deserialize)]
pub struct TrafficRow {
    pub weekday: i64,
    pub hour: i64,
    pub avg_people: f64,
    pub sample_count: i64,
}

/// GET /traffic/:term
pub async fn get_traffic(Path(term): Path<String>, State(s): State<Arc<AppState>>) -> Response {
    info!("GET /traffic/{}", term);

    let rows = match s.db.list_traffic(&term) {
        Ok(rows) => rows,
        Err(e) => {
            // Advisory data only; an empty overlay is better than an error.
            warn!("Traffic history unavailable for {}: {}", term, e);
            Vec::new()
        }
    };

    let response: Vec<_> = rows
        .into_iter()
        .map(|row| {
            json!({
                "weekday": row.weekday,
                "hour": row.hour,
                "avg_people": row.avg_people,
                "sample_count": row.sample_count,
            })
        })
        .collect();
    (StatusCode::OK, Json(response)).into_response()
}

/// POST /traffic/:term
///
/// Replaces a term's traffic history wholesale; the importer feeds this with
/// already-validated headcount averages.
pub async fn post_replace_traffic(
    Path(term): Path<String>,
    State(s): State<Arc<AppState>>,
    Json(rows): Json<Vec<TrafficRow>>,
) -> Response {
    info!("POST /traffic/{} - {} rows", term, rows.len());

    let mut validated = Vec::with_capacity(rows.len());
    for row in &rows {
        if !grid::weekday_in_range(row.weekday) || !grid::hour_in_range(row.hour) {
            return ApiErrorType::from((
                StatusCode::BAD_REQUEST,
                "Invalid request",
                Some(format!(
                    "traffic row ({}, {}) is outside the weekly grid",
                    row.weekday, row.hour
                )),
            ))
            .into_response();
        }
        validated.push((
            row.weekday as u8,
            row.hour as u8,
            row.avg_people,
            row.sample_count,
        ));
    }

    match s.db.replace_traffic(&term, &validated) {
        Ok(stored) => (StatusCode::OK, Json(json!({ "stored": stored }))).into_response(),
        Err(e) => ApiErrorType::from((
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to store traffic history",
            Some(e.to_string()),
        ))
        .into_response(),
    }
}
