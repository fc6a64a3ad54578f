//! Helpers shared by the endpoint handlers.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::scheduling::ScheduleError;
use crate::server::types::ApiErrorType;

/// Converts a scheduling error to the API response for it.
///
/// Validation failures are client errors; conflicts and stale references get
/// their own statuses so the editor can treat them as no-ops or refresh its
/// view; everything else is a server error.
pub fn schedule_error_to_response(error: ScheduleError) -> Response {
    let (status, message) = if error.is_validation() {
        (StatusCode::BAD_REQUEST, "Invalid request")
    } else if error.is_conflict() {
        (StatusCode::CONFLICT, "Already assigned")
    } else if error.is_not_found() {
        (StatusCode::NOT_FOUND, "Not found")
    } else if matches!(error, ScheduleError::NoAvailability { .. }) {
        (
            StatusCode::UNPROCESSABLE_ENTITY,
            "No availability submitted for this term",
        )
    } else {
        (StatusCode::INTERNAL_SERVER_ERROR, "Storage failure")
    };

    ApiErrorType::from((status, message, Some(error.to_string()))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (
                ScheduleError::InvalidSlot {
                    weekday: 9,
                    hour: 10,
                },
                StatusCode::BAD_REQUEST,
            ),
            (
                ScheduleError::DuplicateAssignment {
                    mentor_id: 1,
                    slot_label: "Monday 10:00".to_string(),
                },
                StatusCode::CONFLICT,
            ),
            (
                ScheduleError::BlockNotFound { block_id: 7 },
                StatusCode::NOT_FOUND,
            ),
            (
                ScheduleError::NoAvailability {
                    term: "FA26".to_string(),
                },
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
        ];

        for (error, expected) in cases {
            let response = schedule_error_to_response(error);
            assert_eq!(response.status(), expected);
        }
    }
}
