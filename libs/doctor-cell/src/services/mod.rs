pub mod directory;
pub mod filter;
pub mod filter_store;
pub mod listing;
pub mod mapper;
pub mod pagination;
pub mod query;
pub mod sort;
pub mod suggestions;

pub use directory::DirectoryService;
pub use filter::filter_doctors;
pub use filter_store::FilterStore;
pub use listing::build_listing;
pub use mapper::map_doctors;
pub use pagination::{paginate, PAGE_SIZE};
pub use query::{from_query_string, to_query_string, ListingQuery, SuggestionQuery};
pub use sort::sort_doctors;
pub use suggestions::{specialty_catalog, suggest, MAX_SUGGESTIONS};
