use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::models::{FieldErrors, PatientField, PatientForm};

static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\S+@\S+\.\S+").expect("email pattern is valid"));

pub const PHONE_DIGITS: usize = 10;

/// Field-level problems with the patient form. Empty means the form can
/// advance to confirmation.
pub fn validate_patient_form(form: &PatientForm) -> FieldErrors {
    let mut errors = FieldErrors::new();

    if form.first_name.trim().is_empty() {
        errors.insert(PatientField::FirstName, "First name is required".to_string());
    }

    if form.last_name.trim().is_empty() {
        errors.insert(PatientField::LastName, "Last name is required".to_string());
    }

    if form.email.trim().is_empty() {
        errors.insert(PatientField::Email, "Email is required".to_string());
    } else if !is_valid_email(&form.email) {
        errors.insert(PatientField::Email, "Email is invalid".to_string());
    }

    if form.phone.trim().is_empty() {
        errors.insert(PatientField::Phone, "Phone number is required".to_string());
    } else if phone_digits(&form.phone).len() != PHONE_DIGITS {
        errors.insert(PatientField::Phone, "Phone number must be 10 digits".to_string());
    }

    if form.reason.trim().is_empty() {
        errors.insert(PatientField::Reason, "Reason for visit is required".to_string());
    }

    if !form.agree_to_terms {
        errors.insert(PatientField::AgreeToTerms, "You must agree to the terms".to_string());
    }

    debug!("Patient form validated with {} error(s)", errors.len());
    errors
}

/// Unanchored: any `x@y.z` run inside the input is accepted.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

pub fn phone_digits(phone: &str) -> String {
    phone.chars().filter(char::is_ascii_digit).collect()
}
