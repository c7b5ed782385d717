// libs/appointment-cell/src/router.rs
use axum::{
    routing::{get, post, put},
    Router,
};

use crate::handlers::{self, BookingState};

pub fn booking_routes(state: BookingState) -> Router {
    Router::new()
        .route("/{doctor_id}", post(handlers::start_booking))
        .route(
            "/{doctor_id}/{draft_id}",
            get(handlers::get_booking).delete(handlers::discard_booking),
        )
        .route("/{doctor_id}/{draft_id}/schedule", put(handlers::update_schedule))
        .route("/{doctor_id}/{draft_id}/details", put(handlers::update_details))
        .route("/{doctor_id}/{draft_id}/next", post(handlers::next_step))
        .route("/{doctor_id}/{draft_id}/back", post(handlers::previous_step))
        .route("/{doctor_id}/{draft_id}/submit", post(handlers::submit_booking))
        .route(
            "/{doctor_id}/{draft_id}/acknowledge",
            post(handlers::acknowledge_booking),
        )
        .with_state(state)
}
