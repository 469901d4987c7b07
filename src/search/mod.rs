//! Filter/sort pipeline over the directory collections (estabelecimentos and
//! grupos). Pure and synchronous: the web layer fetches the rows wholesale,
//! maps them into [`Listing`] values and everything here runs in memory.

pub mod advanced;
pub mod filters;
pub mod geo;
pub mod sorting;

pub use advanced::{AdvancedSearch, SearchResults};
pub use filters::{apply_filters, SearchFilters, SearchFiltersPatch};
pub use sorting::{sort_listings, SortKey};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingKind {
    Establishment,
    Group,
}

impl ListingKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ListingKind::Establishment => "establishment",
            ListingKind::Group => "group",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

/// Unified search record for an establishment or a sports group.
#[derive(Debug, Clone)]
pub struct Listing {
    pub id: String,
    pub kind: ListingKind,
    pub name: String,
    pub description: String,
    pub city: String,
    pub coordinate: Option<Coordinate>,
    /// Sport tags, compared case-sensitively.
    pub sports: Vec<String>,
    /// 0.0 when the listing has no reviews yet.
    pub average_rating: f64,
    pub review_count: i64,
    pub main_photo_url: Option<String>,
}
