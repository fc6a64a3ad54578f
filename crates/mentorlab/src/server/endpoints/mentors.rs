//! Mentor roster endpoint.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Local;
use serde_json::json;
use std::sync::Arc;
use tracing::info;

use crate::scheduling;
use crate::server::types::ApiErrorType;
use crate::types::AppState;

/// GET /mentors
///
/// The mentors the engine may assign: active and not past expiration.
pub async fn get_eligible_mentors(State(s): State<Arc<AppState>>) -> Response {
    info!("GET /mentors");

    let today = Local::now().date_naive();
    match s.db.list_mentors() {
        Ok(mentors) => {
            let response: Vec<_> = mentors
                .iter()
                .filter(|m| scheduling::mentor_is_eligible(m, today))
                .map(|m| {
                    json!({
                        "id": m.mentor_id,
                        "user_id": m.user_id,
                        "name": m.name,
                        "email": m.email,
                        "expires_on": m.expires_on,
                    })
                })
                .collect();
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => ApiErrorType::from((
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to fetch mentors",
            Some(e.to_string()),
        ))
        .into_response(),
    }
}
