use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde_json::{json, Value};

use shared_config::AppConfig;
use shared_models::error::AppError;

use crate::models::{Doctor, DoctorError, DoctorListing};
use crate::services::{
    directory::DirectoryService,
    filter_store::FilterStore,
    query::{ListingQuery, SuggestionQuery},
    suggestions::{specialty_catalog, suggest, MAX_SUGGESTIONS},
};

/// `GET /`: the doctor listing for the filters in the query string.
#[axum::debug_handler]
pub async fn list_doctors(
    State(state): State<Arc<AppConfig>>,
    Query(query): Query<ListingQuery>,
) -> Json<DoctorListing> {
    let requested_page = query.page();
    let mut store = FilterStore::from_filters(query.filters());
    let directory = DirectoryService::new(&state);

    Json(directory.load_listing(&mut store, requested_page).await)
}

#[axum::debug_handler]
pub async fn get_doctor(
    State(state): State<Arc<AppConfig>>,
    Path(doctor_id): Path<String>,
) -> Result<Json<Doctor>, AppError> {
    let directory = DirectoryService::new(&state);
    let doctor = directory.find_doctor(&doctor_id).await?;

    Ok(Json(doctor))
}

#[axum::debug_handler]
pub async fn get_suggestions(
    State(state): State<Arc<AppConfig>>,
    Query(query): Query<SuggestionQuery>,
) -> Result<Json<Value>, AppError> {
    let search_term = query.search.unwrap_or_default();

    let directory = DirectoryService::new(&state);
    let doctors = directory
        .fetch_doctors()
        .await
        .map_err(|e| DoctorError::SourceUnavailable(format!("{:#}", e)))?;

    let suggestions = suggest(&doctors, &search_term, MAX_SUGGESTIONS);

    Ok(Json(json!({
        "search": search_term,
        "suggestions": suggestions,
        "total": suggestions.len()
    })))
}

#[axum::debug_handler]
pub async fn get_specialties(
    State(state): State<Arc<AppConfig>>,
) -> Result<Json<Value>, AppError> {
    let directory = DirectoryService::new(&state);
    let doctors = directory
        .fetch_doctors()
        .await
        .map_err(|e| DoctorError::SourceUnavailable(format!("{:#}", e)))?;

    let specialties = specialty_catalog(&doctors);

    Ok(Json(json!({
        "specialties": specialties,
        "total": specialties.len()
    })))
}
