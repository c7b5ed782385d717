// libs/appointment-cell/src/models.rs
use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use doctor_cell::models::{ConsultationType, Doctor};
use shared_models::error::AppError;

// ==============================================================================
// WIZARD STEPS
// ==============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    Scheduling,
    Details,
    Confirm,
    Submitting,
    Complete,
}

impl WizardStep {
    /// Position in the three-step progress bar.
    pub fn number(&self) -> u8 {
        match self {
            WizardStep::Scheduling => 1,
            WizardStep::Details => 2,
            WizardStep::Confirm | WizardStep::Submitting | WizardStep::Complete => 3,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, WizardStep::Complete)
    }
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WizardStep::Scheduling => write!(f, "scheduling"),
            WizardStep::Details => write!(f, "details"),
            WizardStep::Confirm => write!(f, "confirm"),
            WizardStep::Submitting => write!(f, "submitting"),
            WizardStep::Complete => write!(f, "complete"),
        }
    }
}

// ==============================================================================
// SCHEDULE
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    /// 24-hour `HH:MM`.
    pub time: String,
    pub available: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleField {
    Date,
    Time,
    ConsultationType,
}

// ==============================================================================
// PATIENT DETAILS
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub reason: String,
    pub is_new_patient: bool,
    pub agree_to_terms: bool,
}

impl Default for PatientForm {
    fn default() -> Self {
        Self {
            first_name: String::new(),
            last_name: String::new(),
            email: String::new(),
            phone: String::new(),
            reason: String::new(),
            is_new_patient: true,
            agree_to_terms: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatientField {
    FirstName,
    LastName,
    Email,
    Phone,
    Reason,
    AgreeToTerms,
}

impl PatientField {
    pub fn as_str(&self) -> &'static str {
        match self {
            PatientField::FirstName => "first_name",
            PatientField::LastName => "last_name",
            PatientField::Email => "email",
            PatientField::Phone => "phone",
            PatientField::Reason => "reason",
            PatientField::AgreeToTerms => "agree_to_terms",
        }
    }
}

pub type FieldErrors = BTreeMap<PatientField, String>;

// ==============================================================================
// DRAFT
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoctorSummary {
    pub id: String,
    pub name: String,
    pub specialty: Option<String>,
    pub qualification: String,
    pub clinic_name: String,
    pub location: String,
    pub fees: String,
    pub video_consult: bool,
    pub in_clinic: bool,
}

impl From<&Doctor> for DoctorSummary {
    fn from(doctor: &Doctor) -> Self {
        Self {
            id: doctor.id.clone(),
            name: doctor.name.clone(),
            specialty: doctor.primary_specialty().map(str::to_string),
            qualification: doctor.qualification.clone(),
            clinic_name: doctor.clinic_name.clone(),
            location: doctor.location.clone(),
            fees: doctor.fees.clone(),
            video_consult: doctor.video_consult,
            in_clinic: doctor.in_clinic,
        }
    }
}

impl DoctorSummary {
    pub fn offers(&self, mode: ConsultationType) -> bool {
        match mode {
            ConsultationType::VideoConsult => self.video_consult,
            ConsultationType::InClinic => self.in_clinic,
        }
    }
}

/// Everything the booking page holds while the user works through it.
/// Lives only as long as the session that opened it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingDraft {
    pub draft_id: Uuid,
    pub doctor: DoctorSummary,
    pub step: WizardStep,
    pub step_number: u8,
    pub date_options: Vec<NaiveDate>,
    pub selected_date: Option<NaiveDate>,
    pub time_slots: Vec<TimeSlot>,
    pub selected_time: Option<String>,
    pub consultation_type: Option<ConsultationType>,
    pub patient: PatientForm,
    pub errors: FieldErrors,
    pub submission_error: Option<String>,
    pub confirmation: Option<BookingConfirmation>,
    pub created_at: DateTime<Utc>,
}

/// Snapshot handed to the submitter once the draft leaves `Confirm`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingRequest {
    pub draft_id: Uuid,
    pub doctor_id: String,
    pub doctor_name: String,
    pub date: NaiveDate,
    pub time: String,
    pub consultation_type: ConsultationType,
    pub patient: PatientForm,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingConfirmation {
    pub reference: String,
    pub doctor_name: String,
    pub date: NaiveDate,
    /// e.g. "Friday, October 16, 2026"
    pub date_label: String,
    pub time: String,
    pub consultation_type: ConsultationType,
    pub consultation_label: String,
    pub location: String,
}

// ==============================================================================
// REQUEST DTOs
// ==============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScheduleSelectionRequest {
    pub date: Option<NaiveDate>,
    pub time: Option<String>,
    pub consultation_type: Option<ConsultationType>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PatientDetailsRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub reason: Option<String>,
    pub is_new_patient: Option<bool>,
    pub agree_to_terms: Option<bool>,
}

// ==============================================================================
// ERRORS
// ==============================================================================

pub const SUBMISSION_FAILED_MESSAGE: &str =
    "There was an error booking your appointment. Please try again.";

#[derive(Debug, Error)]
pub enum WizardError {
    #[error("Please select a date, time and consultation type")]
    IncompleteSchedule { missing: Vec<ScheduleField> },

    #[error("Please correct the highlighted fields")]
    InvalidDetails(FieldErrors),

    #[error("Cannot {action} from the {from} step")]
    InvalidTransition { from: WizardStep, action: &'static str },

    #[error("Appointments can only be booked within the next 14 days, not on {0}")]
    DateOutOfRange(NaiveDate),

    #[error("Time slot {0} is not available")]
    SlotUnavailable(String),

    #[error("This doctor does not offer {}", .0.label())]
    ConsultationUnavailable(ConsultationType),

    #[error("There was an error booking your appointment. Please try again.")]
    SubmissionFailed(String),

    #[error("Booking session not found")]
    DraftNotFound,
}

impl From<WizardError> for AppError {
    fn from(err: WizardError) -> Self {
        match err {
            WizardError::IncompleteSchedule { ref missing } => AppError::ValidationFailed {
                message: err.to_string(),
                fields: missing
                    .iter()
                    .map(|field| {
                        let name = match field {
                            ScheduleField::Date => "date",
                            ScheduleField::Time => "time",
                            ScheduleField::ConsultationType => "consultation_type",
                        };
                        (name.to_string(), "Required".to_string())
                    })
                    .collect(),
            },
            WizardError::InvalidDetails(ref errors) => AppError::ValidationFailed {
                message: err.to_string(),
                fields: errors
                    .iter()
                    .map(|(field, message)| (field.as_str().to_string(), message.clone()))
                    .collect(),
            },
            WizardError::InvalidTransition { .. } => AppError::Conflict(err.to_string()),
            WizardError::DateOutOfRange(_)
            | WizardError::SlotUnavailable(_)
            | WizardError::ConsultationUnavailable(_) => AppError::BadRequest(err.to_string()),
            WizardError::SubmissionFailed(ref detail) => {
                tracing::error!("Error booking appointment: {}", detail);
                AppError::ExternalService(err.to_string())
            }
            WizardError::DraftNotFound => AppError::NotFound(err.to_string()),
        }
    }
}
