use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;
use tracing::{debug, info};

use shared_config::AppConfig;

use crate::models::{BookingRequest, WizardError};

pub const REFERENCE_PREFIX: &str = "APT-";
pub const REFERENCE_LENGTH: usize = 6;
const REFERENCE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Where a confirmed draft is sent. Returns the booking reference.
#[async_trait]
pub trait BookingSubmitter: Send + Sync {
    async fn submit(&self, request: &BookingRequest) -> Result<String, WizardError>;
}

/// Stands in for a booking backend: waits, then always accepts.
#[derive(Debug, Clone)]
pub struct SimulatedSubmitter {
    delay: Duration,
}

impl SimulatedSubmitter {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(Duration::from_millis(config.booking_submit_delay_ms))
    }
}

#[async_trait]
impl BookingSubmitter for SimulatedSubmitter {
    async fn submit(&self, request: &BookingRequest) -> Result<String, WizardError> {
        debug!(
            "Submitting booking for doctor {} on {} at {}",
            request.doctor_id, request.date, request.time
        );

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let reference = generate_reference(&mut rand::thread_rng());
        info!("Appointment {} booked with {}", reference, request.doctor_name);

        Ok(reference)
    }
}

/// `APT-` followed by six upper-case alphanumerics.
pub fn generate_reference<R: Rng + ?Sized>(rng: &mut R) -> String {
    let suffix: String = (0..REFERENCE_LENGTH)
        .map(|_| REFERENCE_ALPHABET[rng.gen_range(0..REFERENCE_ALPHABET.len())] as char)
        .collect();
    format!("{}{}", REFERENCE_PREFIX, suffix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use doctor_cell::models::ConsultationType;
    use rand::{rngs::StdRng, SeedableRng};
    use uuid::Uuid;

    use crate::models::PatientForm;

    fn is_reference(value: &str) -> bool {
        value.len() == REFERENCE_PREFIX.len() + REFERENCE_LENGTH
            && value.starts_with(REFERENCE_PREFIX)
            && value[REFERENCE_PREFIX.len()..]
                .chars()
                .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
    }

    #[test]
    fn test_reference_format() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..50 {
            let reference = generate_reference(&mut rng);
            assert!(is_reference(&reference), "bad reference {}", reference);
        }
    }

    #[tokio::test]
    async fn test_simulated_submitter_accepts() {
        let submitter = SimulatedSubmitter::new(Duration::from_millis(5));
        let request = BookingRequest {
            draft_id: Uuid::new_v4(),
            doctor_id: "111".to_string(),
            doctor_name: "Alice Menon".to_string(),
            date: NaiveDate::from_ymd_opt(2026, 10, 20).unwrap(),
            time: "10:30".to_string(),
            consultation_type: ConsultationType::VideoConsult,
            patient: PatientForm::default(),
        };

        let reference = submitter.submit(&request).await.unwrap();
        assert!(is_reference(&reference));
    }
}
