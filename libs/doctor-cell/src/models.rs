use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;

use shared_models::error::AppError;

// ==============================================================================
// RAW UPSTREAM RECORDS
// ==============================================================================

/// Accept a field only when it has the expected JSON type; anything else is
/// read as absent instead of failing the whole record.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawDoctor {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub specialities: Option<Vec<RawSpeciality>>,
    /// Alternate shape seen in older payloads: a bare list of names.
    #[serde(default, deserialize_with = "lenient")]
    pub specialties: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient")]
    pub experience: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub fees: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub video_consult: Option<bool>,
    #[serde(default, deserialize_with = "lenient")]
    pub in_clinic: Option<bool>,
    #[serde(default, deserialize_with = "lenient")]
    pub photo: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub qualification: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub doctor_introduction: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub clinic: Option<RawClinic>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSpeciality {
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawClinic {
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub qualification: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub address: Option<RawAddress>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawAddress {
    #[serde(default, deserialize_with = "lenient")]
    pub locality: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub city: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub address_line1: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub logo_url: Option<String>,
}

// ==============================================================================
// NORMALIZED DOCTOR
// ==============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Doctor {
    pub id: String,
    pub name: String,
    pub specialties: Vec<String>,
    /// Display text as served upstream, e.g. "13 Years of experience".
    pub experience: String,
    pub experience_years: u32,
    /// Display text as served upstream, e.g. "₹ 500".
    pub fees: String,
    pub fee_value: u64,
    pub video_consult: bool,
    pub in_clinic: bool,
    pub photo_url: Option<String>,
    pub qualification: String,
    pub introduction: Option<String>,
    pub clinic_name: String,
    pub location: String,
    pub coordinates: Option<GeoPoint>,
}

impl Doctor {
    pub fn offers(&self, mode: ConsultationType) -> bool {
        match mode {
            ConsultationType::VideoConsult => self.video_consult,
            ConsultationType::InClinic => self.in_clinic,
        }
    }

    /// Video is preferred when the doctor offers both.
    pub fn default_consultation(&self) -> Option<ConsultationType> {
        if self.video_consult {
            Some(ConsultationType::VideoConsult)
        } else if self.in_clinic {
            Some(ConsultationType::InClinic)
        } else {
            None
        }
    }

    pub fn primary_specialty(&self) -> Option<&str> {
        self.specialties.first().map(String::as_str)
    }
}

// ==============================================================================
// FILTER STATE
// ==============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ConsultationType {
    VideoConsult,
    InClinic,
}

impl ConsultationType {
    pub fn as_query_value(&self) -> &'static str {
        match self {
            ConsultationType::VideoConsult => "videoConsult",
            ConsultationType::InClinic => "inClinic",
        }
    }

    pub fn from_query_value(value: &str) -> Option<Self> {
        match value {
            "videoConsult" => Some(ConsultationType::VideoConsult),
            "inClinic" => Some(ConsultationType::InClinic),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ConsultationType::VideoConsult => "Video Consultation",
            ConsultationType::InClinic => "In-Clinic Visit",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortBy {
    Fees,
    Experience,
}

impl SortBy {
    pub fn as_query_value(&self) -> &'static str {
        match self {
            SortBy::Fees => "fees",
            SortBy::Experience => "experience",
        }
    }

    pub fn from_query_value(value: &str) -> Option<Self> {
        match value {
            "fees" => Some(SortBy::Fees),
            "experience" => Some(SortBy::Experience),
            _ => None,
        }
    }
}

/// The user's current search, filter and sort selections.
///
/// `specialties` keeps insertion order for display; matching ignores order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    pub search_term: String,
    pub consultation_type: Option<ConsultationType>,
    pub specialties: Vec<String>,
    pub sort_by: Option<SortBy>,
}

impl FilterState {
    pub fn is_default(&self) -> bool {
        self == &FilterState::default()
    }
}

// ==============================================================================
// RESPONSE DTOs
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoctorSuggestion {
    pub id: String,
    pub name: String,
    pub specialty: Option<String>,
    pub photo_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageView<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub page_size: usize,
    pub total_items: usize,
    pub total_pages: usize,
    pub scroll_to_top: bool,
}

impl<T> PageView<T> {
    pub fn map<U, F>(self, f: F) -> PageView<U>
    where
        F: FnMut(T) -> U,
    {
        PageView {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            page_size: self.page_size,
            total_items: self.total_items,
            total_pages: self.total_pages,
            scroll_to_top: self.scroll_to_top,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoctorListing {
    pub filters: FilterState,
    /// Canonical query string for the active filters, without the leading `?`.
    pub query: String,
    pub doctors: PageView<Doctor>,
    pub total: usize,
    pub specialties: Vec<String>,
    pub has_active_filters: bool,
    pub message: Option<String>,
    pub error: Option<String>,
}

// ==============================================================================
// ERRORS
// ==============================================================================

#[derive(Debug, Error)]
pub enum DoctorError {
    #[error("Doctor not found")]
    NotFound,

    #[error("Failed to fetch doctors. Please try again later.")]
    SourceUnavailable(String),
}

impl From<DoctorError> for AppError {
    fn from(err: DoctorError) -> Self {
        match err {
            DoctorError::NotFound => AppError::NotFound(err.to_string()),
            DoctorError::SourceUnavailable(ref detail) => {
                tracing::error!("Doctor source unavailable: {}", detail);
                AppError::ExternalService(err.to_string())
            }
        }
    }
}
