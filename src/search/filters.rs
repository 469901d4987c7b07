use super::geo::distance_between;
use super::sorting::SortKey;
use super::{Coordinate, Listing};

/// Active search criteria. Every predicate is conjunctive: a listing must
/// pass all of them. An inactive predicate (empty query, empty sport set,
/// no radius, zero rating) passes everything.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchFilters {
    pub query: String,
    pub sports: Vec<String>,
    pub max_distance_km: Option<f64>,
    pub min_rating: f64,
    pub sort: SortKey,
}

impl Default for SearchFilters {
    fn default() -> Self {
        SearchFilters {
            query: String::new(),
            sports: Vec::new(),
            max_distance_km: None,
            min_rating: 0.0,
            sort: SortKey::Distance,
        }
    }
}

/// Partial update merged over the current filters by
/// [`AdvancedSearch::update_filters`](super::AdvancedSearch::update_filters).
/// `max_distance_km` is doubly optional so a patch can distinguish "leave as
/// is" (`None`) from "clear the radius" (`Some(None)`).
#[derive(Debug, Clone, Default)]
pub struct SearchFiltersPatch {
    pub query: Option<String>,
    pub sports: Option<Vec<String>>,
    pub max_distance_km: Option<Option<f64>>,
    pub min_rating: Option<f64>,
    pub sort: Option<SortKey>,
}

impl SearchFilters {
    pub fn merge(&mut self, patch: SearchFiltersPatch) {
        if let Some(query) = patch.query {
            self.query = query;
        }
        if let Some(sports) = patch.sports {
            self.sports = sports;
        }
        if let Some(max_distance_km) = patch.max_distance_km {
            self.max_distance_km = max_distance_km;
        }
        if let Some(min_rating) = patch.min_rating {
            self.min_rating = min_rating;
        }
        if let Some(sort) = patch.sort {
            self.sort = sort;
        }
    }
}

/// Return the listings passing all active predicates, in input order.
pub fn apply_filters(
    listings: &[Listing],
    filters: &SearchFilters,
    origin: Option<Coordinate>,
) -> Vec<Listing> {
    listings
        .iter()
        .filter(|l| matches_filters(l, filters, origin))
        .cloned()
        .collect()
}

pub fn matches_filters(
    listing: &Listing,
    filters: &SearchFilters,
    origin: Option<Coordinate>,
) -> bool {
    matches_query(listing, &filters.query)
        && matches_sports(listing, &filters.sports)
        && matches_distance(listing, filters.max_distance_km, origin)
        && matches_rating(listing, filters.min_rating)
}

/// Case-insensitive substring over name, description and city.
fn matches_query(listing: &Listing, query: &str) -> bool {
    let q = query.trim();
    if q.is_empty() {
        return true;
    }
    let q = q.to_lowercase();
    listing.name.to_lowercase().contains(&q)
        || listing.description.to_lowercase().contains(&q)
        || listing.city.to_lowercase().contains(&q)
}

/// Set intersection, case-sensitive tag equality.
fn matches_sports(listing: &Listing, selected: &[String]) -> bool {
    if selected.is_empty() {
        return true;
    }
    listing
        .sports
        .iter()
        .any(|tag| selected.iter().any(|s| s == tag))
}

/// Only active when both an origin and a radius are known. While active,
/// listings without coordinates are excluded.
fn matches_distance(
    listing: &Listing,
    max_distance_km: Option<f64>,
    origin: Option<Coordinate>,
) -> bool {
    let (Some(origin), Some(max_km)) = (origin, max_distance_km) else {
        return true;
    };
    match listing.coordinate {
        Some(coord) => distance_between(origin, coord) <= max_km,
        None => false,
    }
}

fn matches_rating(listing: &Listing, min_rating: f64) -> bool {
    if min_rating <= 0.0 {
        return true;
    }
    listing.average_rating >= min_rating
}
