use std::sync::Arc;

use axum::{routing::get, Router};

use shared_config::AppConfig;

use crate::handlers;

pub fn doctor_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", get(handlers::list_doctors))
        .route("/suggestions", get(handlers::get_suggestions))
        .route("/specialties", get(handlers::get_specialties))
        .route("/doctors/{doctor_id}", get(handlers::get_doctor))
        .with_state(state)
}
