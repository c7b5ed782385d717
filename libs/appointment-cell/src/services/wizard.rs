use chrono::{NaiveDate, NaiveDateTime, Utc};
use tracing::{debug, info, warn};
use uuid::Uuid;

use doctor_cell::models::{ConsultationType, Doctor};

use crate::models::{
    BookingConfirmation, BookingDraft, BookingRequest, DoctorSummary, PatientDetailsRequest,
    PatientField, ScheduleField, ScheduleSelectionRequest, WizardError, WizardStep,
    SUBMISSION_FAILED_MESSAGE,
};
use crate::services::slots::{date_options, SlotGenerator};
use crate::services::submission::BookingSubmitter;
use crate::services::validation::validate_patient_form;

pub const ONLINE_LOCATION: &str = "Online";

/// One patient's pass through the three booking steps for a single doctor.
///
/// Steps only move along `valid_transitions`; schedule edits are accepted in
/// `Scheduling` and patient edits in `Details`.
#[derive(Debug, Clone)]
pub struct BookingWizard {
    draft: BookingDraft,
    slots: SlotGenerator,
}

impl BookingWizard {
    /// Opens on today's date with the doctor's preferred consultation mode.
    pub fn open(doctor: &Doctor, now: NaiveDateTime, mut slots: SlotGenerator) -> Self {
        let today = now.date();
        let time_slots = slots.time_slots(today, now);

        let draft = BookingDraft {
            draft_id: Uuid::new_v4(),
            doctor: DoctorSummary::from(doctor),
            step: WizardStep::Scheduling,
            step_number: WizardStep::Scheduling.number(),
            date_options: date_options(today),
            selected_date: Some(today),
            time_slots,
            selected_time: None,
            consultation_type: doctor.default_consultation(),
            patient: Default::default(),
            errors: Default::default(),
            submission_error: None,
            confirmation: None,
            created_at: Utc::now(),
        };

        info!("Opened booking draft {} for doctor {}", draft.draft_id, doctor.id);
        Self { draft, slots }
    }

    pub fn id(&self) -> Uuid {
        self.draft.draft_id
    }

    pub fn step(&self) -> WizardStep {
        self.draft.step
    }

    pub fn draft(&self) -> &BookingDraft {
        &self.draft
    }

    pub fn doctor_id(&self) -> &str {
        &self.draft.doctor.id
    }

    /// Every step reachable from `step` in one move.
    pub fn valid_transitions(step: WizardStep) -> Vec<WizardStep> {
        match step {
            WizardStep::Scheduling => vec![WizardStep::Details],
            WizardStep::Details => vec![WizardStep::Scheduling, WizardStep::Confirm],
            WizardStep::Confirm => vec![WizardStep::Details, WizardStep::Submitting],
            WizardStep::Submitting => vec![WizardStep::Confirm, WizardStep::Complete],
            // Terminal
            WizardStep::Complete => vec![],
        }
    }

    fn transition(&mut self, to: WizardStep, action: &'static str) -> Result<(), WizardError> {
        let from = self.draft.step;
        if !Self::valid_transitions(from).contains(&to) {
            warn!("Invalid wizard transition attempted: {} -> {}", from, to);
            return Err(WizardError::InvalidTransition { from, action });
        }

        self.draft.step = to;
        self.draft.step_number = to.number();
        info!("Booking draft {} moved {} -> {}", self.draft.draft_id, from, to);
        Ok(())
    }

    fn require_step(&self, expected: WizardStep, action: &'static str) -> Result<(), WizardError> {
        if self.draft.step != expected {
            warn!(
                "Rejected '{}' on draft {} in step {}",
                action, self.draft.draft_id, self.draft.step
            );
            return Err(WizardError::InvalidTransition { from: self.draft.step, action });
        }
        Ok(())
    }

    // ==========================================================================
    // STEP 1: SCHEDULE
    // ==========================================================================

    /// Picks a day from the booking window. The slot grid is regenerated and
    /// any chosen time is cleared.
    pub fn select_date(&mut self, date: NaiveDate, now: NaiveDateTime) -> Result<(), WizardError> {
        self.require_step(WizardStep::Scheduling, "change the date")?;

        if !self.draft.date_options.contains(&date) {
            return Err(WizardError::DateOutOfRange(date));
        }

        self.draft.time_slots = self.slots.time_slots(date, now);
        self.draft.selected_date = Some(date);
        self.draft.selected_time = None;
        debug!("Draft {} selected date {}", self.draft.draft_id, date);
        Ok(())
    }

    pub fn select_time(&mut self, time: &str) -> Result<(), WizardError> {
        self.require_step(WizardStep::Scheduling, "change the time")?;

        let open = self
            .draft
            .time_slots
            .iter()
            .any(|slot| slot.time == time && slot.available);
        if !open {
            return Err(WizardError::SlotUnavailable(time.to_string()));
        }

        self.draft.selected_time = Some(time.to_string());
        debug!("Draft {} selected time {}", self.draft.draft_id, time);
        Ok(())
    }

    pub fn select_consultation(&mut self, mode: ConsultationType) -> Result<(), WizardError> {
        self.require_step(WizardStep::Scheduling, "change the consultation type")?;

        if !self.draft.doctor.offers(mode) {
            return Err(WizardError::ConsultationUnavailable(mode));
        }

        self.draft.consultation_type = Some(mode);
        Ok(())
    }

    /// Applies whichever parts of the selection are present. The date goes
    /// first so a time in the same request is checked against the new grid.
    /// Either every part lands or the draft is left as it was.
    pub fn apply_schedule(
        &mut self,
        selection: ScheduleSelectionRequest,
        now: NaiveDateTime,
    ) -> Result<(), WizardError> {
        self.require_step(WizardStep::Scheduling, "change the schedule")?;

        let mut staged = self.clone();
        if let Some(mode) = selection.consultation_type {
            staged.select_consultation(mode)?;
        }
        if let Some(date) = selection.date {
            staged.select_date(date, now)?;
        }
        if let Some(time) = selection.time {
            staged.select_time(&time)?;
        }

        *self = staged;
        Ok(())
    }

    pub fn missing_schedule(&self) -> Vec<ScheduleField> {
        let mut missing = Vec::new();
        if self.draft.selected_date.is_none() {
            missing.push(ScheduleField::Date);
        }
        if self.draft.selected_time.is_none() {
            missing.push(ScheduleField::Time);
        }
        if self.draft.consultation_type.is_none() {
            missing.push(ScheduleField::ConsultationType);
        }
        missing
    }

    // ==========================================================================
    // STEP 2: PATIENT DETAILS
    // ==========================================================================

    /// Writes the provided fields. Each written field loses its error.
    pub fn update_details(&mut self, details: PatientDetailsRequest) -> Result<(), WizardError> {
        self.require_step(WizardStep::Details, "edit patient details")?;

        let patient = &mut self.draft.patient;
        let mut touched = Vec::new();

        if let Some(value) = details.first_name {
            patient.first_name = value;
            touched.push(PatientField::FirstName);
        }
        if let Some(value) = details.last_name {
            patient.last_name = value;
            touched.push(PatientField::LastName);
        }
        if let Some(value) = details.email {
            patient.email = value;
            touched.push(PatientField::Email);
        }
        if let Some(value) = details.phone {
            patient.phone = value;
            touched.push(PatientField::Phone);
        }
        if let Some(value) = details.reason {
            patient.reason = value;
            touched.push(PatientField::Reason);
        }
        if let Some(value) = details.is_new_patient {
            patient.is_new_patient = value;
        }
        if let Some(value) = details.agree_to_terms {
            patient.agree_to_terms = value;
            touched.push(PatientField::AgreeToTerms);
        }

        for field in touched {
            self.draft.errors.remove(&field);
        }
        Ok(())
    }

    // ==========================================================================
    // NAVIGATION
    // ==========================================================================

    /// Guarded forward move out of `Scheduling` or `Details`.
    pub fn next(&mut self) -> Result<WizardStep, WizardError> {
        match self.draft.step {
            WizardStep::Scheduling => {
                let missing = self.missing_schedule();
                if !missing.is_empty() {
                    debug!("Draft {} missing schedule fields {:?}", self.draft.draft_id, missing);
                    return Err(WizardError::IncompleteSchedule { missing });
                }
                self.transition(WizardStep::Details, "advance")?;
            }
            WizardStep::Details => {
                let errors = validate_patient_form(&self.draft.patient);
                self.draft.errors = errors.clone();
                if !errors.is_empty() {
                    return Err(WizardError::InvalidDetails(errors));
                }
                self.transition(WizardStep::Confirm, "advance")?;
            }
            from => return Err(WizardError::InvalidTransition { from, action: "advance" }),
        }
        Ok(self.draft.step)
    }

    pub fn back(&mut self) -> Result<WizardStep, WizardError> {
        let target = match self.draft.step {
            WizardStep::Details => WizardStep::Scheduling,
            WizardStep::Confirm => WizardStep::Details,
            from => return Err(WizardError::InvalidTransition { from, action: "go back" }),
        };
        self.transition(target, "go back")?;
        Ok(self.draft.step)
    }

    // ==========================================================================
    // STEP 3: SUBMISSION
    // ==========================================================================

    /// Moves to `Submitting` and hands back what the submitter needs.
    pub fn begin_submission(&mut self) -> Result<BookingRequest, WizardError> {
        self.require_step(WizardStep::Confirm, "submit")?;

        let (Some(date), Some(time), Some(consultation_type)) = (
            self.draft.selected_date,
            self.draft.selected_time.clone(),
            self.draft.consultation_type,
        ) else {
            return Err(WizardError::IncompleteSchedule { missing: self.missing_schedule() });
        };

        self.transition(WizardStep::Submitting, "submit")?;
        self.draft.submission_error = None;

        Ok(BookingRequest {
            draft_id: self.draft.draft_id,
            doctor_id: self.draft.doctor.id.clone(),
            doctor_name: self.draft.doctor.name.clone(),
            date,
            time,
            consultation_type,
            patient: self.draft.patient.clone(),
        })
    }

    pub fn complete_submission(
        &mut self,
        request: &BookingRequest,
        reference: String,
    ) -> Result<BookingConfirmation, WizardError> {
        self.require_step(WizardStep::Submitting, "complete the booking")?;

        let location = if self.draft.doctor.location.trim().is_empty() {
            ONLINE_LOCATION.to_string()
        } else {
            self.draft.doctor.location.clone()
        };

        let confirmation = BookingConfirmation {
            reference,
            doctor_name: request.doctor_name.clone(),
            date: request.date,
            date_label: format_long_date(request.date),
            time: request.time.clone(),
            consultation_type: request.consultation_type,
            consultation_label: request.consultation_type.label().to_string(),
            location,
        };

        self.transition(WizardStep::Complete, "complete the booking")?;
        self.draft.confirmation = Some(confirmation.clone());
        Ok(confirmation)
    }

    /// Back to `Confirm` with the alert text recorded on the draft.
    pub fn fail_submission(&mut self, detail: &str) -> Result<(), WizardError> {
        self.require_step(WizardStep::Submitting, "record a failed booking")?;
        self.transition(WizardStep::Confirm, "record a failed booking")?;
        self.draft.submission_error = Some(SUBMISSION_FAILED_MESSAGE.to_string());
        warn!("Booking draft {} submission failed: {}", self.draft.draft_id, detail);
        Ok(())
    }

    /// The user has seen the confirmation; only a completed draft may go.
    pub fn acknowledge(&self) -> Result<(), WizardError> {
        self.require_step(WizardStep::Complete, "acknowledge the booking")
    }

    /// Runs the whole submission in place. Callers sharing the wizard behind a
    /// lock should use the begin/complete/fail steps instead.
    pub async fn submit(
        &mut self,
        submitter: &dyn BookingSubmitter,
    ) -> Result<BookingConfirmation, WizardError> {
        let request = self.begin_submission()?;
        match submitter.submit(&request).await {
            Ok(reference) => self.complete_submission(&request, reference),
            Err(e) => {
                let detail = e.to_string();
                self.fail_submission(&detail)?;
                Err(WizardError::SubmissionFailed(detail))
            }
        }
    }
}

/// "Friday, October 16, 2026"
pub fn format_long_date(date: NaiveDate) -> String {
    date.format("%A, %B %-d, %Y").to_string()
}
