use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

use shared_config::AppConfig;

use crate::models::{BookingDraft, WizardError};
use crate::services::wizard::BookingWizard;

pub const DEFAULT_DRAFT_TTL: Duration = Duration::from_secs(30 * 60);

/// In-memory drafts keyed by draft id. Drafts are never persisted and vanish
/// when discarded, acknowledged, older than the TTL, or when the process exits.
#[derive(Debug, Clone)]
pub struct BookingSessionStore {
    drafts: Arc<RwLock<HashMap<Uuid, BookingWizard>>>,
    ttl: Duration,
}

impl Default for BookingSessionStore {
    fn default() -> Self {
        Self::with_ttl(DEFAULT_DRAFT_TTL)
    }
}

impl BookingSessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            drafts: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::with_ttl(Duration::from_secs(
            config.booking_draft_ttl_minutes.saturating_mul(60),
        ))
    }

    /// Sweeps expired drafts before storing the new one.
    pub async fn insert(&self, wizard: BookingWizard) -> Uuid {
        let id = wizard.id();
        let mut drafts = self.drafts.write().await;
        let swept = Self::sweep(&mut drafts, self.ttl, Utc::now());
        if swept > 0 {
            info!("Dropped {} expired booking drafts", swept);
        }
        drafts.insert(id, wizard);
        debug!("Stored booking draft {}", id);
        id
    }

    /// Drops every draft created more than the TTL before `now`.
    pub async fn purge_expired(&self, now: DateTime<Utc>) -> usize {
        let mut drafts = self.drafts.write().await;
        Self::sweep(&mut drafts, self.ttl, now)
    }

    fn sweep(drafts: &mut HashMap<Uuid, BookingWizard>, ttl: Duration, now: DateTime<Utc>) -> usize {
        let before = drafts.len();
        drafts.retain(|_, wizard| {
            (now - wizard.draft().created_at)
                .to_std()
                .map_or(true, |age| age <= ttl)
        });
        before - drafts.len()
    }

    /// Snapshot of the draft, scoped to the doctor in the URL.
    pub async fn get(&self, doctor_id: &str, id: Uuid) -> Result<BookingDraft, WizardError> {
        let drafts = self.drafts.read().await;
        drafts
            .get(&id)
            .filter(|wizard| wizard.doctor_id() == doctor_id)
            .map(|wizard| wizard.draft().clone())
            .ok_or(WizardError::DraftNotFound)
    }

    /// Runs `f` against the draft under the write lock. `f` is synchronous so
    /// the lock is never held across an await.
    pub async fn update<F, R>(&self, doctor_id: &str, id: Uuid, f: F) -> Result<R, WizardError>
    where
        F: FnOnce(&mut BookingWizard) -> Result<R, WizardError>,
    {
        let mut drafts = self.drafts.write().await;
        let wizard = drafts
            .get_mut(&id)
            .filter(|wizard| wizard.doctor_id() == doctor_id)
            .ok_or(WizardError::DraftNotFound)?;
        f(wizard)
    }

    pub async fn remove(&self, doctor_id: &str, id: Uuid) -> Result<(), WizardError> {
        let mut drafts = self.drafts.write().await;
        match drafts.get(&id) {
            Some(wizard) if wizard.doctor_id() == doctor_id => {
                drafts.remove(&id);
                info!("Discarded booking draft {}", id);
                Ok(())
            }
            _ => Err(WizardError::DraftNotFound),
        }
    }

    /// Drops a completed draft once its confirmation has been seen.
    pub async fn acknowledge(&self, doctor_id: &str, id: Uuid) -> Result<(), WizardError> {
        let mut drafts = self.drafts.write().await;
        drafts
            .get(&id)
            .filter(|wizard| wizard.doctor_id() == doctor_id)
            .ok_or(WizardError::DraftNotFound)?
            .acknowledge()?;

        drafts.remove(&id);
        info!("Booking draft {} acknowledged and released", id);
        Ok(())
    }

    pub async fn len(&self) -> usize {
        self.drafts.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.drafts.read().await.is_empty()
    }
}
