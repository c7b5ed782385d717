use std::env;
use std::str::FromStr;
use tracing::warn;

pub const DEFAULT_DOCTORS_API_URL: &str =
    "https://srijandubey.github.io/campus-api-mock/SRM-C1-25.json";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub doctors_api_url: String,
    pub server_host: String,
    pub server_port: u16,
    pub booking_submit_delay_ms: u64,
    pub slot_availability_seed: Option<u64>,
    /// Drafts older than this are dropped from the session store.
    pub booking_draft_ttl_minutes: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            doctors_api_url: DEFAULT_DOCTORS_API_URL.to_string(),
            server_host: "0.0.0.0".to_string(),
            server_port: 3000,
            booking_submit_delay_ms: 1500,
            slot_availability_seed: None,
            booking_draft_ttl_minutes: 30,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let config = Self {
            doctors_api_url: env::var("DOCTORS_API_URL")
                .unwrap_or_else(|_| {
                    warn!("DOCTORS_API_URL not set, using default");
                    defaults.doctors_api_url.clone()
                }),
            server_host: env::var("SERVER_HOST")
                .unwrap_or_else(|_| defaults.server_host.clone()),
            server_port: parse_var("SERVER_PORT").unwrap_or(defaults.server_port),
            booking_submit_delay_ms: parse_var("BOOKING_SUBMIT_DELAY_MS")
                .unwrap_or(defaults.booking_submit_delay_ms),
            slot_availability_seed: parse_var("SLOT_AVAILABILITY_SEED"),
            booking_draft_ttl_minutes: parse_var("BOOKING_DRAFT_TTL_MINUTES")
                .unwrap_or(defaults.booking_draft_ttl_minutes),
        };

        if !config.is_configured() {
            warn!("Application not fully configured - doctor data source URL is empty");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        !self.doctors_api_url.trim().is_empty()
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

fn parse_var<T: FromStr>(key: &str) -> Option<T> {
    let raw = env::var(key).ok()?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!("{} has an unparsable value {:?}, using default", key, raw);
            None
        }
    }
}
