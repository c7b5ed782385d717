use tracing::debug;

use crate::models::{ConsultationType, Doctor, FilterState, SortBy};
use crate::services::filter::filter_doctors;
use crate::services::pagination::clamp_page;
use crate::services::query::{from_query_string, to_query_string};
use crate::services::sort::sort_doctors;

/// Owner of the active filters, kept in step with a location history.
///
/// Every filter change serializes the filters, pushes the query string as a
/// new history entry and resets the page to 1. `back` and `forward` move
/// through that history and restore the filters it recorded without pushing
/// anything new.
#[derive(Debug, Clone)]
pub struct FilterStore {
    filters: FilterState,
    page: usize,
    history: Vec<String>,
    cursor: usize,
}

impl Default for FilterStore {
    fn default() -> Self {
        Self::from_query("")
    }
}

impl FilterStore {
    /// Initial load: the filters come from the current location.
    pub fn from_query(query: &str) -> Self {
        Self::from_filters(from_query_string(query))
    }

    /// Initial load from filters already read off the request.
    pub fn from_filters(filters: FilterState) -> Self {
        let location = to_query_string(&filters);

        Self {
            filters,
            page: 1,
            history: vec![location],
            cursor: 0,
        }
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn page(&self) -> usize {
        self.page
    }

    /// Query string of the current history entry.
    pub fn location(&self) -> &str {
        &self.history[self.cursor]
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn set_filters(&mut self, filters: FilterState) {
        self.filters = filters;
        self.page = 1;

        let location = to_query_string(&self.filters);
        debug!("Pushing filter location {:?}", location);

        // A new entry discards anything ahead of the cursor.
        self.history.truncate(self.cursor + 1);
        self.history.push(location);
        self.cursor = self.history.len() - 1;
    }

    pub fn update<F>(&mut self, change: F)
    where
        F: FnOnce(&mut FilterState),
    {
        let mut next = self.filters.clone();
        change(&mut next);
        self.set_filters(next);
    }

    pub fn set_search_term(&mut self, term: &str) {
        self.update(|f| f.search_term = term.to_string());
    }

    pub fn toggle_consultation(&mut self, mode: ConsultationType) {
        self.update(|f| {
            f.consultation_type = if f.consultation_type == Some(mode) {
                None
            } else {
                Some(mode)
            };
        });
    }

    pub fn toggle_specialty(&mut self, specialty: &str) {
        let specialty = specialty.trim();
        if specialty.is_empty() {
            return;
        }
        self.update(|f| {
            let existing = f
                .specialties
                .iter()
                .position(|s| s.eq_ignore_ascii_case(specialty));
            if let Some(pos) = existing {
                f.specialties.remove(pos);
            } else {
                f.specialties.push(specialty.to_string());
            }
        });
    }

    pub fn toggle_sort(&mut self, sort: SortBy) {
        self.update(|f| {
            f.sort_by = if f.sort_by == Some(sort) { None } else { Some(sort) };
        });
    }

    pub fn reset(&mut self) {
        self.set_filters(FilterState::default());
    }

    /// Whether the panel's "Clear All" applies: any consultation, specialty
    /// or sort selection. The search box is not part of the panel.
    pub fn has_active_panel_filters(&self) -> bool {
        self.filters.consultation_type.is_some()
            || !self.filters.specialties.is_empty()
            || self.filters.sort_by.is_some()
    }

    pub fn can_go_back(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_go_forward(&self) -> bool {
        self.cursor + 1 < self.history.len()
    }

    pub fn back(&mut self) -> bool {
        if !self.can_go_back() {
            return false;
        }
        self.cursor -= 1;
        self.restore_location();
        true
    }

    pub fn forward(&mut self) -> bool {
        if !self.can_go_forward() {
            return false;
        }
        self.cursor += 1;
        self.restore_location();
        true
    }

    fn restore_location(&mut self) {
        self.filters = from_query_string(&self.history[self.cursor]);
        self.page = 1;
    }

    /// Move to `requested`, clamped to the pages `total_pages` allows.
    pub fn go_to_page(&mut self, requested: usize, total_pages: usize) -> usize {
        self.page = clamp_page(requested, total_pages);
        self.page
    }

    /// Filtered then sorted view of `doctors` under the active filters.
    pub fn visible_doctors<'a>(&self, doctors: &'a [Doctor]) -> Vec<&'a Doctor> {
        let filtered = filter_doctors(doctors, &self.filters);
        sort_doctors(filtered, self.filters.sort_by)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::doctor;

    #[test]
    fn test_initial_load_reads_location() {
        let store = FilterStore::from_query("?search=ali&sort=fees&specialties=Dentist");

        assert_eq!(store.filters().search_term, "ali");
        assert_eq!(store.filters().sort_by, Some(SortBy::Fees));
        assert_eq!(store.filters().specialties, vec!["Dentist"]);
        assert_eq!(store.location(), "search=ali&specialties=Dentist&sort=fees");
        assert_eq!(store.history_len(), 1);
        assert_eq!(store.page(), 1);
    }

    #[test]
    fn test_every_change_pushes_and_resets_page() {
        let mut store = FilterStore::default();
        store.go_to_page(3, 5);
        assert_eq!(store.page(), 3);

        store.set_search_term("bob");
        assert_eq!(store.page(), 1);
        assert_eq!(store.location(), "search=bob");

        store.toggle_consultation(ConsultationType::VideoConsult);
        assert_eq!(store.location(), "search=bob&consultation=videoConsult");
        assert_eq!(store.history_len(), 3);
    }

    #[test]
    fn test_toggles_clear_on_second_selection() {
        let mut store = FilterStore::default();

        store.toggle_consultation(ConsultationType::InClinic);
        store.toggle_consultation(ConsultationType::InClinic);
        assert_eq!(store.filters().consultation_type, None);

        store.toggle_sort(SortBy::Experience);
        store.toggle_sort(SortBy::Fees);
        assert_eq!(store.filters().sort_by, Some(SortBy::Fees));
        store.toggle_sort(SortBy::Fees);
        assert_eq!(store.filters().sort_by, None);

        store.toggle_specialty("Dentist");
        store.toggle_specialty("Cardiologist");
        store.toggle_specialty("Dentist");
        store.toggle_specialty("  ");
        assert_eq!(store.filters().specialties, vec!["Cardiologist"]);
    }

    #[test]
    fn test_specialty_toggle_ignores_case() {
        let mut store = FilterStore::default();

        store.toggle_specialty("Dentist");
        store.toggle_specialty("dentist");

        assert!(store.filters().specialties.is_empty());
        assert_eq!(store.location(), "");
    }

    #[test]
    fn test_back_and_forward_restore_without_pushing() {
        let mut store = FilterStore::default();
        store.set_search_term("a");
        store.toggle_sort(SortBy::Fees);
        assert_eq!(store.history_len(), 3);

        assert!(store.back());
        assert_eq!(store.filters().search_term, "a");
        assert_eq!(store.filters().sort_by, None);

        assert!(store.back());
        assert!(store.filters().is_default());
        assert!(!store.back());

        assert!(store.forward());
        assert!(store.forward());
        assert_eq!(store.filters().sort_by, Some(SortBy::Fees));
        assert!(!store.forward());
        assert_eq!(store.history_len(), 3);
    }

    #[test]
    fn test_change_after_back_drops_forward_entries() {
        let mut store = FilterStore::default();
        store.set_search_term("a");
        store.set_search_term("ab");
        store.back();

        store.toggle_specialty("Dentist");

        assert!(!store.can_go_forward());
        assert_eq!(store.location(), "search=a&specialties=Dentist");
        assert_eq!(store.history_len(), 3);
    }

    #[test]
    fn test_reset_and_panel_flag() {
        let mut store = FilterStore::from_query("search=x");
        assert!(!store.has_active_panel_filters());

        store.toggle_specialty("Dentist");
        assert!(store.has_active_panel_filters());

        store.reset();
        assert!(store.filters().is_default());
        assert_eq!(store.location(), "");
    }

    #[test]
    fn test_visible_doctors_filters_then_sorts() {
        let doctors = vec![
            doctor("Alice", &["Dentist"], "10 Years", "500"),
            doctor("Bob", &["Dentist"], "5 Years", "300"),
            doctor("Alan", &["Dentist"], "3 Years", "100"),
        ];
        let store = FilterStore::from_query("search=al&sort=fees");

        let names: Vec<&str> = store
            .visible_doctors(&doctors)
            .iter()
            .map(|d| d.name.as_str())
            .collect();
        assert_eq!(names, vec!["Alan", "Alice"]);
    }
}
