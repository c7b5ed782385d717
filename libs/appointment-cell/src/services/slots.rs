use chrono::{Duration, NaiveDate, NaiveDateTime, Timelike};
use rand::{rngs::StdRng, Rng, SeedableRng};
use tracing::debug;

use crate::models::TimeSlot;

/// Today plus the following 13 days.
pub const BOOKING_WINDOW_DAYS: i64 = 14;
pub const FIRST_SLOT_HOUR: u32 = 9;
pub const LAST_SLOT_HOUR: u32 = 17;
pub const SLOT_MINUTES: [u32; 2] = [0, 30];
pub const SLOT_AVAILABILITY: f64 = 0.7;

pub fn date_options(today: NaiveDate) -> Vec<NaiveDate> {
    (0..BOOKING_WINDOW_DAYS)
        .map(|offset| today + Duration::days(offset))
        .collect()
}

/// Produces the half-hour grid for a day with randomly withheld slots.
///
/// Seeded generators repeat the same availability sequence, which is what
/// tests and demos rely on.
#[derive(Debug, Clone)]
pub struct SlotGenerator {
    rng: StdRng,
}

impl SlotGenerator {
    pub fn seeded(seed: u64) -> Self {
        Self { rng: StdRng::seed_from_u64(seed) }
    }

    pub fn from_entropy() -> Self {
        Self { rng: StdRng::from_entropy() }
    }

    pub fn from_seed_option(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::seeded(seed),
            None => Self::from_entropy(),
        }
    }

    /// Slots for `date` as seen at `now`. On the current day every hour up to
    /// and including the current one is dropped.
    pub fn time_slots(&mut self, date: NaiveDate, now: NaiveDateTime) -> Vec<TimeSlot> {
        let first_hour = if date == now.date() {
            FIRST_SLOT_HOUR.max(now.hour() + 1)
        } else {
            FIRST_SLOT_HOUR
        };

        let mut slots = Vec::new();
        for hour in first_hour..=LAST_SLOT_HOUR {
            for minute in SLOT_MINUTES {
                slots.push(TimeSlot {
                    time: format!("{:02}:{:02}", hour, minute),
                    available: self.rng.gen_bool(SLOT_AVAILABILITY),
                });
            }
        }

        debug!(
            "Generated {} slots for {} ({} available)",
            slots.len(),
            date,
            slots.iter().filter(|s| s.available).count()
        );
        slots
    }
}
