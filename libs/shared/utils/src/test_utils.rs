use std::sync::Arc;

use serde_json::{json, Value};

use shared_config::AppConfig;

/// Path the mock upstream serves the doctor document on.
pub const MOCK_SOURCE_PATH: &str = "/campus-api-mock/doctors.json";

pub struct TestConfig {
    pub doctors_api_url: String,
    pub booking_submit_delay_ms: u64,
    pub slot_availability_seed: Option<u64>,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            doctors_api_url: format!("http://localhost:54321{}", MOCK_SOURCE_PATH),
            booking_submit_delay_ms: 0,
            slot_availability_seed: Some(42),
        }
    }
}

impl TestConfig {
    /// Point the config at a mock server base URI.
    pub fn with_source(base_uri: &str) -> Self {
        Self {
            doctors_api_url: format!("{}{}", base_uri, MOCK_SOURCE_PATH),
            ..Self::default()
        }
    }

    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            doctors_api_url: self.doctors_api_url.clone(),
            booking_submit_delay_ms: self.booking_submit_delay_ms,
            slot_availability_seed: self.slot_availability_seed,
            ..AppConfig::default()
        }
    }

    pub fn to_arc(&self) -> Arc<AppConfig> {
        Arc::new(self.to_app_config())
    }
}

/// Raw upstream payloads shaped like the real doctor endpoint.
pub struct MockDoctorResponses;

impl MockDoctorResponses {
    pub fn doctor_record(
        id: &str,
        name: &str,
        specialities: &[&str],
        experience: &str,
        fees: &str,
        video_consult: bool,
        in_clinic: bool,
    ) -> Value {
        let specialities: Vec<Value> = specialities
            .iter()
            .map(|name| json!({ "name": name }))
            .collect();

        json!({
            "id": id,
            "name": name,
            "name_initials": name.chars().take(2).collect::<String>(),
            "photo": format!("https://example.com/photos/{}.jpg", id),
            "doctor_introduction": format!("{} is a practising physician.", name),
            "specialities": specialities,
            "fees": fees,
            "experience": experience,
            "languages": ["English"],
            "clinic": {
                "name": format!("{} Clinic", name),
                "address": {
                    "locality": "Koramangala",
                    "city": "Bangalore",
                    "address_line1": "1st Main Road",
                    "location": "12.9352,77.6245",
                    "logo_url": ""
                }
            },
            "video_consult": video_consult,
            "in_clinic": in_clinic
        })
    }

    /// A small, varied directory: seven doctors across four specialties.
    pub fn directory() -> Value {
        json!([
            Self::doctor_record("111", "Dr. Alice Menon", &["Dentist"], "13 Years of experience", "₹ 500", true, true),
            Self::doctor_record("112", "Dr. Bob Varghese", &["General Physician"], "5 Years of experience", "₹ 300", false, true),
            Self::doctor_record("113", "Dr. Carol Dsouza", &["Dermatologist", "Cosmetologist"], "21 Years of experience", "₹ 800", true, false),
            Self::doctor_record("114", "Dr. Dinesh Rao", &["General Physician"], "9 Years of experience", "₹ 300", true, true),
            Self::doctor_record("115", "Dr. Esha Kapoor", &["Dentist", "Orthodontist"], "2 Years of experience", "₹ 250", false, true),
            Self::doctor_record("116", "Dr. Farah Ali", &[], "Fresh graduate", "Free", true, false),
            Self::doctor_record("117", "Dr. Gaurav Nair", &["Dermatologist"], "13 Years of experience", "₹ 650", false, true),
        ])
    }

    pub fn error_response(message: &str) -> Value {
        json!({ "error": { "message": message } })
    }
}
