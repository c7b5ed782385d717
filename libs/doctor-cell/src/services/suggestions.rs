use std::collections::BTreeSet;

use crate::models::{Doctor, DoctorSuggestion};

pub const MAX_SUGGESTIONS: usize = 3;

/// Autocomplete: the first `limit` doctors whose name contains the term.
/// An empty term suggests nothing.
pub fn suggest(doctors: &[Doctor], search_term: &str, limit: usize) -> Vec<DoctorSuggestion> {
    if search_term.is_empty() {
        return Vec::new();
    }
    let needle = search_term.to_lowercase();

    doctors
        .iter()
        .filter(|doctor| doctor.name.to_lowercase().contains(&needle))
        .take(limit)
        .map(|doctor| DoctorSuggestion {
            id: doctor.id.clone(),
            name: doctor.name.clone(),
            specialty: doctor.primary_specialty().map(str::to_string),
            photo_url: doctor.photo_url.clone(),
        })
        .collect()
}

/// Distinct specialty names across all doctors, sorted.
pub fn specialty_catalog(doctors: &[Doctor]) -> Vec<String> {
    doctors
        .iter()
        .flat_map(|doctor| doctor.specialties.iter().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
