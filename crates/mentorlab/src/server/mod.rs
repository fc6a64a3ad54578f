use std::sync::Arc;

use axum::routing::{get, post};
use axum::{middleware as mw, Router};

use crate::server::endpoints::{autofill, availability, mentors, schedule, status, traffic};
use crate::server::middleware::*;
use crate::types::AppState;

mod endpoints;
mod middleware;
mod types;
mod util;

/// Creates a router that can be used by `axum`.
///
/// # Parameters
/// - `app_state`: The app server state.
///
/// # Returns
/// The router.
pub fn create_router(app_state: Arc<AppState>) -> Router {
    // Routes operating on one schedule's grid; the layer rejects unknown
    // schedule ids before any handler runs.
    let schedule_router = Router::new()
        .route(
            "/blocks",
            get(schedule::get_blocks).post(schedule::post_assign_block),
        )
        .route("/clear", post(schedule::post_clear_schedule))
        .route("/auto_fill", post(autofill::post_auto_fill))
        .layer(mw::from_fn_with_state(
            app_state.clone(),
            schedule_validator::validate_schedule,
        ));

    Router::new()
        .route("/health", get(status::get_health))
        .route(
            "/schedules",
            get(schedule::get_schedules).post(schedule::post_create_schedule),
        )
        .route(
            "/schedules/:schedule_id/activate",
            post(schedule::post_activate_schedule),
        )
        .route("/schedule/active", get(schedule::get_active_schedule))
        .nest("/schedule/:schedule_id", schedule_router)
        .route("/blocks/:block_id/move", post(schedule::post_move_block))
        .route("/blocks/:block_id/remove", post(schedule::post_remove_block))
        .route("/availability/:term", get(availability::get_availability))
        .route(
            "/availability/:term/aggregated",
            get(availability::get_aggregated_availability),
        )
        .route(
            "/availability/:term/mentors/:mentor_id",
            post(availability::post_submit_availability),
        )
        .route(
            "/traffic/:term",
            get(traffic::get_traffic).post(traffic::post_replace_traffic),
        )
        .route("/mentors", get(mentors::get_eligible_mentors))
        .with_state(app_state.clone())
}
