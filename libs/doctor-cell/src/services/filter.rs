use crate::models::{Doctor, FilterState};

/// Keep the doctors matching every active filter, in their original order.
///
/// Accepts anything yielding `&Doctor`, so a filtered list can be filtered
/// again without copying.
pub fn filter_doctors<'a, I>(doctors: I, filters: &FilterState) -> Vec<&'a Doctor>
where
    I: IntoIterator<Item = &'a Doctor>,
{
    doctors
        .into_iter()
        .filter(|doctor| matches_filters(doctor, filters))
        .collect()
}

pub fn matches_filters(doctor: &Doctor, filters: &FilterState) -> bool {
    matches_name(doctor, &filters.search_term)
        && matches_consultation(doctor, filters)
        && matches_specialties(doctor, &filters.specialties)
}

fn matches_name(doctor: &Doctor, search_term: &str) -> bool {
    if search_term.trim().is_empty() {
        return true;
    }
    doctor
        .name
        .to_lowercase()
        .contains(&search_term.to_lowercase())
}

fn matches_consultation(doctor: &Doctor, filters: &FilterState) -> bool {
    filters
        .consultation_type
        .map_or(true, |mode| doctor.offers(mode))
}

// A doctor without any recorded specialty never satisfies a specialty filter.
fn matches_specialties(doctor: &Doctor, wanted: &[String]) -> bool {
    if wanted.is_empty() {
        return true;
    }
    doctor.specialties.iter().any(|have| {
        wanted
            .iter()
            .any(|want| have.to_lowercase() == want.to_lowercase())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ConsultationType;
    use crate::services::test_support::doctor;

    fn names<'a>(doctors: &[&'a Doctor]) -> Vec<&'a str> {
        doctors.iter().map(|d| d.name.as_str()).collect()
    }

    #[test]
    fn test_search_is_case_insensitive_substring() {
        let doctors = vec![doctor("Alice", &[], "0", "0"), doctor("Bob", &[], "0", "0")];
        let filters = FilterState {
            search_term: "a".to_string(),
            ..FilterState::default()
        };

        assert_eq!(names(&filter_doctors(&doctors, &filters)), vec!["Alice"]);
    }

    #[test]
    fn test_blank_search_matches_all() {
        let doctors = vec![doctor("Alice", &[], "0", "0"), doctor("", &[], "0", "0")];
        let filters = FilterState {
            search_term: "   ".to_string(),
            ..FilterState::default()
        };

        assert_eq!(filter_doctors(&doctors, &filters).len(), 2);
    }

    #[test]
    fn test_consultation_mode_requires_flag() {
        let mut video = doctor("Video", &[], "0", "0");
        video.video_consult = true;
        let mut clinic = doctor("Clinic", &[], "0", "0");
        clinic.in_clinic = true;
        let doctors = vec![video, clinic];

        let filters = FilterState {
            consultation_type: Some(ConsultationType::InClinic),
            ..FilterState::default()
        };
        assert_eq!(names(&filter_doctors(&doctors, &filters)), vec!["Clinic"]);

        let filters = FilterState {
            consultation_type: Some(ConsultationType::VideoConsult),
            ..FilterState::default()
        };
        assert_eq!(names(&filter_doctors(&doctors, &filters)), vec!["Video"]);
    }

    #[test]
    fn test_specialty_match_any_case_insensitive() {
        let doctors = vec![
            doctor("Derm", &["Dermatologist"], "0", "0"),
            doctor("Dent", &["Dentist", "Orthodontist"], "0", "0"),
            doctor("None", &[], "0", "0"),
            doctor("Gp", &["General Physician"], "0", "0"),
        ];
        let filters = FilterState {
            specialties: vec!["dentist".to_string(), "DERMATOLOGIST".to_string()],
            ..FilterState::default()
        };

        assert_eq!(names(&filter_doctors(&doctors, &filters)), vec!["Derm", "Dent"]);
    }

    #[test]
    fn test_filters_combine_and_preserve_order() {
        let mut a = doctor("Dr. Anand", &["Dentist"], "0", "0");
        a.video_consult = true;
        let mut b = doctor("Dr. Anita", &["Dentist"], "0", "0");
        b.video_consult = false;
        let mut c = doctor("Dr. Arun", &["Dentist"], "0", "0");
        c.video_consult = true;
        let doctors = vec![a, b, c];

        let filters = FilterState {
            search_term: "dr. a".to_string(),
            consultation_type: Some(ConsultationType::VideoConsult),
            specialties: vec!["Dentist".to_string()],
            sort_by: None,
        };

        assert_eq!(
            names(&filter_doctors(&doctors, &filters)),
            vec!["Dr. Anand", "Dr. Arun"]
        );
    }

    #[test]
    fn test_filtering_is_idempotent() {
        let mut doctors = vec![
            doctor("Alice", &["Dentist"], "0", "0"),
            doctor("Alan", &["Cardiologist"], "0", "0"),
            doctor("Bob", &["Dentist"], "0", "0"),
        ];
        doctors[0].in_clinic = true;
        doctors[2].in_clinic = true;

        let cases = [
            FilterState::default(),
            FilterState {
                search_term: "al".to_string(),
                ..FilterState::default()
            },
            FilterState {
                consultation_type: Some(ConsultationType::InClinic),
                specialties: vec!["dentist".to_string()],
                ..FilterState::default()
            },
        ];

        for filters in cases {
            let once = filter_doctors(&doctors, &filters);
            let twice = filter_doctors(once.iter().copied(), &filters);
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn test_source_list_is_untouched() {
        let doctors = vec![doctor("Bob", &[], "0", "0"), doctor("Alice", &[], "0", "0")];
        let before = doctors.clone();

        let filters = FilterState {
            search_term: "alice".to_string(),
            ..FilterState::default()
        };
        let _ = filter_doctors(&doctors, &filters);

        assert_eq!(doctors, before);
    }
}
