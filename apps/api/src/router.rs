use std::sync::Arc;

use axum::{response::Redirect, Router};

use appointment_cell::{handlers::BookingState, router::booking_routes};
use doctor_cell::router::doctor_routes;
use shared_config::AppConfig;

pub fn create_router(state: Arc<AppConfig>) -> Router {
    Router::new()
        .merge(doctor_routes(state.clone()))
        .nest("/book-appointment", booking_routes(BookingState::new(state)))
        // Unknown paths go back to the listing
        .fallback(|| async { Redirect::to("/") })
}
