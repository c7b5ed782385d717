use serde_json::Value;
use tracing::{debug, warn};

use crate::models::{Doctor, GeoPoint, RawDoctor};

/// Normalize the upstream document into doctors.
///
/// A payload that is not an array yields no doctors. Records that are not
/// objects are skipped; everything else is mapped field by field.
pub fn map_doctors(payload: Value) -> Vec<Doctor> {
    let Value::Array(records) = payload else {
        warn!("Doctor payload is not an array, treating as empty");
        return Vec::new();
    };

    let total = records.len();
    let doctors: Vec<Doctor> = records
        .into_iter()
        .enumerate()
        .filter_map(|(index, record)| match serde_json::from_value::<RawDoctor>(record) {
            Ok(raw) => Some(map_raw_doctor(index, raw)),
            Err(e) => {
                warn!("Skipping doctor record {}: {}", index, e);
                None
            }
        })
        .collect();

    debug!("Mapped {} of {} doctor records", doctors.len(), total);
    doctors
}

pub fn map_raw_doctor(index: usize, mut raw: RawDoctor) -> Doctor {
    let id = match raw.id.take() {
        Some(Value::String(s)) if !s.trim().is_empty() => s,
        Some(Value::Number(n)) => n.to_string(),
        _ => format!("doc-{}", index + 1),
    };

    let specialties = normalize_specialties(&raw);
    let experience = raw.experience.unwrap_or_default();
    let fees = raw.fees.unwrap_or_default();
    let clinic = raw.clinic.unwrap_or_default();
    let address = clinic.address.unwrap_or_default();

    let qualification = raw
        .qualification
        .filter(|q| !q.trim().is_empty())
        .or(clinic.qualification)
        .unwrap_or_default();

    Doctor {
        id,
        name: raw.name.unwrap_or_default(),
        specialties,
        experience_years: parse_experience_years(&experience),
        experience,
        fee_value: parse_fee(&fees),
        fees,
        video_consult: raw.video_consult.unwrap_or(false),
        in_clinic: raw.in_clinic.unwrap_or(false),
        photo_url: raw.photo.filter(|p| !p.trim().is_empty()),
        qualification,
        introduction: raw.doctor_introduction.filter(|i| !i.trim().is_empty()),
        clinic_name: clinic.name.unwrap_or_default(),
        location: address.locality.unwrap_or_default(),
        coordinates: address.location.as_deref().and_then(parse_coordinates),
    }
}

/// `specialities[].name` wins; the flat `specialties` list is only read when
/// the object form is absent.
fn normalize_specialties(raw: &RawDoctor) -> Vec<String> {
    let names: Vec<String> = match (&raw.specialities, &raw.specialties) {
        (Some(objects), _) => objects.iter().filter_map(|s| s.name.clone()).collect(),
        (None, Some(names)) => names.clone(),
        (None, None) => Vec::new(),
    };

    names
        .into_iter()
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
        .collect()
}

/// Every digit in the string, read as one number. "₹ 500" is 500; anything
/// without digits, or too large to hold, is 0.
pub fn parse_fee(fees: &str) -> u64 {
    let digits: String = fees.chars().filter(char::is_ascii_digit).collect();
    digits.parse().unwrap_or(0)
}

/// The first run of digits. "13 Years of experience" is 13.
pub fn parse_experience_years(experience: &str) -> u32 {
    let digits: String = experience
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(char::is_ascii_digit)
        .collect();
    digits.parse().unwrap_or(0)
}

/// Parse `"lat,long"`.
pub fn parse_coordinates(location: &str) -> Option<GeoPoint> {
    let (lat, lng) = location.split_once(',')?;
    let latitude: f64 = lat.trim().parse().ok()?;
    let longitude: f64 = lng.trim().parse().ok()?;

    let in_range = (-90.0..=90.0).contains(&latitude) && (-180.0..=180.0).contains(&longitude);
    in_range.then_some(GeoPoint { latitude, longitude })
}
