// libs/appointment-cell/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{Local, NaiveDateTime};
use serde_json::json;
use tracing::{debug, error, warn};
use uuid::Uuid;

use doctor_cell::{models::DoctorError, services::directory::DirectoryService};
use shared_config::AppConfig;
use shared_models::error::AppError;

use crate::models::{
    BookingDraft, PatientDetailsRequest, ScheduleSelectionRequest, WizardError,
};
use crate::services::{
    sessions::BookingSessionStore,
    slots::SlotGenerator,
    submission::{BookingSubmitter, SimulatedSubmitter},
    wizard::BookingWizard,
};

// ==============================================================================
// STATE
// ==============================================================================

#[derive(Clone)]
pub struct BookingState {
    pub config: Arc<AppConfig>,
    pub sessions: BookingSessionStore,
    pub submitter: Arc<dyn BookingSubmitter>,
}

impl BookingState {
    pub fn new(config: Arc<AppConfig>) -> Self {
        let submitter = Arc::new(SimulatedSubmitter::from_config(&config));
        Self {
            sessions: BookingSessionStore::from_config(&config),
            config,
            submitter,
        }
    }

    pub fn with_submitter(mut self, submitter: Arc<dyn BookingSubmitter>) -> Self {
        self.submitter = submitter;
        self
    }
}

fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}

fn doctor_not_found(doctor_id: &str) -> Response {
    warn!("Booking requested for unknown doctor {}", doctor_id);
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "title": "Doctor Not Found",
            "message": "We couldn't find the doctor you're looking for.",
            "back_link": "/"
        })),
    )
        .into_response()
}

// ==============================================================================
// DRAFT LIFECYCLE
// ==============================================================================

/// `POST /book-appointment/{doctor_id}`: open a draft at step 1.
#[axum::debug_handler]
pub async fn start_booking(
    State(state): State<BookingState>,
    Path(doctor_id): Path<String>,
) -> Result<Response, AppError> {
    debug!("Opening booking draft for doctor {}", doctor_id);

    let directory = DirectoryService::new(&state.config);
    let doctor = match directory.find_doctor(&doctor_id).await {
        Ok(doctor) => doctor,
        Err(DoctorError::NotFound) => return Ok(doctor_not_found(&doctor_id)),
        Err(e) => return Err(e.into()),
    };

    let slots = SlotGenerator::from_seed_option(state.config.slot_availability_seed);
    let wizard = BookingWizard::open(&doctor, local_now(), slots);
    let draft = wizard.draft().clone();
    state.sessions.insert(wizard).await;

    Ok((StatusCode::CREATED, Json(draft)).into_response())
}

#[axum::debug_handler]
pub async fn get_booking(
    State(state): State<BookingState>,
    Path((doctor_id, draft_id)): Path<(String, Uuid)>,
) -> Result<Json<BookingDraft>, AppError> {
    let draft = state.sessions.get(&doctor_id, draft_id).await?;
    Ok(Json(draft))
}

/// Navigating away from the booking page.
#[axum::debug_handler]
pub async fn discard_booking(
    State(state): State<BookingState>,
    Path((doctor_id, draft_id)): Path<(String, Uuid)>,
) -> Result<StatusCode, AppError> {
    state.sessions.remove(&doctor_id, draft_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// "Back to doctors" from the confirmation screen.
#[axum::debug_handler]
pub async fn acknowledge_booking(
    State(state): State<BookingState>,
    Path((doctor_id, draft_id)): Path<(String, Uuid)>,
) -> Result<StatusCode, AppError> {
    state.sessions.acknowledge(&doctor_id, draft_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ==============================================================================
// STEP EDITS
// ==============================================================================

#[axum::debug_handler]
pub async fn update_schedule(
    State(state): State<BookingState>,
    Path((doctor_id, draft_id)): Path<(String, Uuid)>,
    Json(selection): Json<ScheduleSelectionRequest>,
) -> Result<Json<BookingDraft>, AppError> {
    let now = local_now();
    let draft = state
        .sessions
        .update(&doctor_id, draft_id, |wizard| {
            wizard.apply_schedule(selection, now)?;
            Ok(wizard.draft().clone())
        })
        .await?;

    Ok(Json(draft))
}

#[axum::debug_handler]
pub async fn update_details(
    State(state): State<BookingState>,
    Path((doctor_id, draft_id)): Path<(String, Uuid)>,
    Json(details): Json<PatientDetailsRequest>,
) -> Result<Json<BookingDraft>, AppError> {
    let draft = state
        .sessions
        .update(&doctor_id, draft_id, |wizard| {
            wizard.update_details(details)?;
            Ok(wizard.draft().clone())
        })
        .await?;

    Ok(Json(draft))
}

// ==============================================================================
// NAVIGATION
// ==============================================================================

#[axum::debug_handler]
pub async fn next_step(
    State(state): State<BookingState>,
    Path((doctor_id, draft_id)): Path<(String, Uuid)>,
) -> Result<Json<BookingDraft>, AppError> {
    let draft = state
        .sessions
        .update(&doctor_id, draft_id, |wizard| {
            wizard.next()?;
            Ok(wizard.draft().clone())
        })
        .await?;

    Ok(Json(draft))
}

#[axum::debug_handler]
pub async fn previous_step(
    State(state): State<BookingState>,
    Path((doctor_id, draft_id)): Path<(String, Uuid)>,
) -> Result<Json<BookingDraft>, AppError> {
    let draft = state
        .sessions
        .update(&doctor_id, draft_id, |wizard| {
            wizard.back()?;
            Ok(wizard.draft().clone())
        })
        .await?;

    Ok(Json(draft))
}

/// `POST .../submit`: the draft sits in `Submitting` while the submitter
/// runs; the session lock is released for the duration. The submitter and
/// the outcome write run on their own task so a dropped request cannot
/// strand the draft in `Submitting`.
#[axum::debug_handler]
pub async fn submit_booking(
    State(state): State<BookingState>,
    Path((doctor_id, draft_id)): Path<(String, Uuid)>,
) -> Result<Json<BookingDraft>, AppError> {
    let request = state
        .sessions
        .update(&doctor_id, draft_id, |wizard| wizard.begin_submission())
        .await?;

    let sessions = state.sessions.clone();
    let submitter = Arc::clone(&state.submitter);
    let task = tokio::spawn(async move {
        let outcome = submitter.submit(&request).await;

        sessions
            .update(&doctor_id, draft_id, |wizard| match outcome {
                Ok(reference) => {
                    wizard.complete_submission(&request, reference)?;
                    Ok(wizard.draft().clone())
                }
                Err(e) => {
                    let detail = e.to_string();
                    wizard.fail_submission(&detail)?;
                    Err(WizardError::SubmissionFailed(detail))
                }
            })
            .await
    });

    let draft = task.await.map_err(|e| {
        error!("Booking submission task for draft {} failed: {}", draft_id, e);
        AppError::Internal("Booking submission did not finish".to_string())
    })??;

    Ok(Json(draft))
}
