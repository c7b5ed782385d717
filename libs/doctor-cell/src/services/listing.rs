use crate::models::{Doctor, DoctorListing};
use crate::services::filter_store::FilterStore;
use crate::services::pagination::{paginate, PAGE_SIZE};
use crate::services::query::to_query_string;
use crate::services::suggestions::specialty_catalog;

pub const NO_MATCHES_MESSAGE: &str = "No doctors found matching your criteria.";

/// Run the listing pipeline: filter, sort, then cut out the requested page.
///
/// The store's page is moved to the clamped page so callers see the page
/// that was actually served.
pub fn build_listing(doctors: &[Doctor], store: &mut FilterStore, requested_page: usize) -> DoctorListing {
    let visible = store.visible_doctors(doctors);
    let total = visible.len();

    let page = paginate(&visible, requested_page, PAGE_SIZE);
    store.go_to_page(page.page, page.total_pages);

    DoctorListing {
        filters: store.filters().clone(),
        query: to_query_string(store.filters()),
        doctors: page.map(Doctor::clone),
        total,
        specialties: specialty_catalog(doctors),
        has_active_filters: store.has_active_panel_filters(),
        message: (total == 0).then(|| NO_MATCHES_MESSAGE.to_string()),
        error: None,
    }
}

/// The listing shown when the doctor source could not be read: no doctors,
/// the filters as requested, and a user-facing error.
pub fn unavailable_listing(store: &FilterStore, error: &str) -> DoctorListing {
    let mut listing = build_listing(&[], &mut store.clone(), 1);
    listing.message = None;
    listing.error = Some(error.to_string());
    listing
}
