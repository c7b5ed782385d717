use std::borrow::Cow;

use serde::Deserialize;

use crate::models::{ConsultationType, FilterState, SortBy};

pub const SEARCH_PARAM: &str = "search";
pub const CONSULTATION_PARAM: &str = "consultation";
pub const SPECIALTIES_PARAM: &str = "specialties";
pub const SORT_PARAM: &str = "sort";
pub const PAGE_PARAM: &str = "page";

/// Serialize filters into a query string (no leading `?`).
///
/// Parameters are written in a fixed order and empty selections are left
/// out, so equal filters always produce the same string. Specialty names are
/// joined with `,` before escaping, which means a name containing a comma
/// does not survive a round trip.
pub fn to_query_string(filters: &FilterState) -> String {
    let mut pairs: Vec<(&str, Cow<'_, str>)> = Vec::new();

    if !filters.search_term.is_empty() {
        pairs.push((SEARCH_PARAM, Cow::Borrowed(filters.search_term.as_str())));
    }
    if let Some(mode) = filters.consultation_type {
        pairs.push((CONSULTATION_PARAM, Cow::Borrowed(mode.as_query_value())));
    }
    if !filters.specialties.is_empty() {
        pairs.push((SPECIALTIES_PARAM, Cow::Owned(filters.specialties.join(","))));
    }
    if let Some(sort) = filters.sort_by {
        pairs.push((SORT_PARAM, Cow::Borrowed(sort.as_query_value())));
    }

    pairs
        .iter()
        .map(|(key, value)| format!("{}={}", key, urlencoding::encode(value)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Listing parameters as they arrive on the wire. Values stay raw strings so
/// an unknown mode or a non-numeric page reads as unset instead of rejecting
/// the request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ListingQuery {
    pub search: Option<String>,
    pub consultation: Option<String>,
    pub specialties: Option<String>,
    pub sort: Option<String>,
    pub page: Option<String>,
}

impl ListingQuery {
    /// Unknown consultation or sort values read as unset. Empty and repeated
    /// specialty names are dropped.
    pub fn filters(&self) -> FilterState {
        let mut specialties: Vec<String> = Vec::new();
        if let Some(joined) = &self.specialties {
            for name in joined.split(',') {
                if !name.is_empty() && !specialties.iter().any(|s| s.eq_ignore_ascii_case(name)) {
                    specialties.push(name.to_string());
                }
            }
        }

        FilterState {
            search_term: self.search.clone().unwrap_or_default(),
            consultation_type: self
                .consultation
                .as_deref()
                .and_then(ConsultationType::from_query_value),
            specialties,
            sort_by: self.sort.as_deref().and_then(SortBy::from_query_value),
        }
    }

    /// Requested page; anything unparsable is page 1.
    pub fn page(&self) -> usize {
        self.page
            .as_deref()
            .and_then(|page| page.trim().parse::<usize>().ok())
            .unwrap_or(1)
    }

    /// Build from a raw query string. Repeated keys keep their first value.
    pub fn parse(query: &str) -> Self {
        let mut parsed = Self::default();
        for (key, value) in parse_pairs(query) {
            let slot = match key.as_str() {
                SEARCH_PARAM => &mut parsed.search,
                CONSULTATION_PARAM => &mut parsed.consultation,
                SPECIALTIES_PARAM => &mut parsed.specialties,
                SORT_PARAM => &mut parsed.sort,
                PAGE_PARAM => &mut parsed.page,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value);
            }
        }
        parsed
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SuggestionQuery {
    pub search: Option<String>,
}

/// Rebuild filters from a query string, with or without the leading `?`.
pub fn from_query_string(query: &str) -> FilterState {
    ListingQuery::parse(query).filters()
}

/// Decoded `key=value` pairs in order. A string that is not form-encoded
/// yields no pairs.
fn parse_pairs(query: &str) -> Vec<(String, String)> {
    let query = query.strip_prefix('?').unwrap_or(query);
    serde_urlencoded::from_str(query).unwrap_or_default()
}
