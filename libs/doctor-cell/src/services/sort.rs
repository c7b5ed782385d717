use crate::models::{Doctor, SortBy};

/// Order doctors by the selected key. Both orderings are stable, so equal
/// keys keep the order they came in with; no key leaves the list unchanged.
pub fn sort_doctors<'a>(mut doctors: Vec<&'a Doctor>, sort_by: Option<SortBy>) -> Vec<&'a Doctor> {
    match sort_by {
        Some(SortBy::Fees) => doctors.sort_by_key(|doctor| doctor.fee_value),
        Some(SortBy::Experience) => {
            doctors.sort_by(|a, b| b.experience_years.cmp(&a.experience_years))
        }
        None => {}
    }
    doctors
}
