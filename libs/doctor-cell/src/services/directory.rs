use anyhow::{Context, Result};
use serde_json::Value;
use tracing::{debug, error, info};

use shared_config::AppConfig;
use shared_datasource::DataSourceClient;

use crate::models::{Doctor, DoctorError, DoctorListing};
use crate::services::filter_store::FilterStore;
use crate::services::listing::{build_listing, unavailable_listing};
use crate::services::mapper::map_doctors;

pub struct DirectoryService {
    source: DataSourceClient,
}

impl DirectoryService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            source: DataSourceClient::new(config),
        }
    }

    /// Fetch and normalize the full doctor list. No retry.
    pub async fn fetch_doctors(&self) -> Result<Vec<Doctor>> {
        debug!("Fetching doctors from {}", self.source.source_url());

        let payload: Value = self
            .source
            .fetch()
            .await
            .context("Error fetching doctors")?;

        let doctors = map_doctors(payload);
        info!("Loaded {} doctors", doctors.len());
        Ok(doctors)
    }

    pub async fn find_doctor(&self, doctor_id: &str) -> Result<Doctor, DoctorError> {
        let doctors = self
            .fetch_doctors()
            .await
            .map_err(|e| DoctorError::SourceUnavailable(format!("{:#}", e)))?;

        doctors
            .into_iter()
            .find(|doctor| doctor.id == doctor_id)
            .ok_or(DoctorError::NotFound)
    }

    /// Listing for the given location. A failed fetch still yields a
    /// listing, empty and carrying the generic error message.
    pub async fn load_listing(&self, store: &mut FilterStore, requested_page: usize) -> DoctorListing {
        match self.fetch_doctors().await {
            Ok(doctors) => build_listing(&doctors, store, requested_page),
            Err(e) => {
                error!("Error fetching doctors: {:#}", e);
                let unavailable = DoctorError::SourceUnavailable(format!("{:#}", e));
                unavailable_listing(store, &unavailable.to_string())
            }
        }
    }
}
