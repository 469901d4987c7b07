use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use super::filters::{apply_filters, SearchFilters, SearchFiltersPatch};
use super::sorting::sort_listings;
use super::{Coordinate, Listing};

#[derive(Debug, Clone, Default)]
pub struct SearchResults {
    pub establishments: Vec<Listing>,
    pub groups: Vec<Listing>,
    pub total: usize,
}

/// Aggregates the filter/sort pipeline over the two directory collections and
/// memoizes its output: the pipeline only reruns when the listings, the
/// filters or the origin actually change. Listing changes bump a revision
/// counter; filters and origin are fingerprinted by value.
pub struct AdvancedSearch {
    establishments: Vec<Listing>,
    groups: Vec<Listing>,
    filters: SearchFilters,
    origin: Option<Coordinate>,
    revision: u64,
    cached: Option<(u64, u64, SearchResults)>,
}

impl AdvancedSearch {
    pub fn new(establishments: Vec<Listing>, groups: Vec<Listing>) -> Self {
        AdvancedSearch {
            establishments,
            groups,
            filters: SearchFilters::default(),
            origin: None,
            revision: 0,
            cached: None,
        }
    }

    pub fn filters(&self) -> &SearchFilters {
        &self.filters
    }

    pub fn origin(&self) -> Option<Coordinate> {
        self.origin
    }

    pub fn update_filters(&mut self, patch: SearchFiltersPatch) {
        self.filters.merge(patch);
    }

    pub fn clear_filters(&mut self) {
        self.filters = SearchFilters::default();
    }

    pub fn set_origin(&mut self, origin: Option<Coordinate>) {
        self.origin = origin;
    }

    pub fn set_listings(&mut self, establishments: Vec<Listing>, groups: Vec<Listing>) {
        self.establishments = establishments;
        self.groups = groups;
        self.revision += 1;
    }

    /// Filtered and sorted collections plus the combined count. Recomputes
    /// only when listings, filters or origin changed since the last call.
    pub fn results(&mut self) -> &SearchResults {
        let fingerprint = self.fingerprint();
        let fresh = matches!(
            &self.cached,
            Some((rev, fp, _)) if *rev == self.revision && *fp == fingerprint
        );
        if !fresh {
            let establishments = sort_listings(
                apply_filters(&self.establishments, &self.filters, self.origin),
                self.filters.sort,
                self.origin,
            );
            let groups = sort_listings(
                apply_filters(&self.groups, &self.filters, self.origin),
                self.filters.sort,
                self.origin,
            );
            let total = establishments.len() + groups.len();
            self.cached = Some((
                self.revision,
                fingerprint,
                SearchResults {
                    establishments,
                    groups,
                    total,
                },
            ));
        }
        &self.cached.as_ref().unwrap().2
    }

    fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.filters.query.hash(&mut hasher);
        self.filters.sports.hash(&mut hasher);
        self.filters
            .max_distance_km
            .map(f64::to_bits)
            .hash(&mut hasher);
        self.filters.min_rating.to_bits().hash(&mut hasher);
        self.filters.sort.as_str().hash(&mut hasher);
        self.origin
            .map(|c| (c.latitude.to_bits(), c.longitude.to_bits()))
            .hash(&mut hasher);
        hasher.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::{ListingKind, SortKey};

    fn listing(kind: ListingKind, name: &str, rating: f64) -> Listing {
        Listing {
            id: name.to_lowercase(),
            kind,
            name: name.to_string(),
            description: String::new(),
            city: "São Paulo - SP".to_string(),
            coordinate: None,
            sports: vec!["Futebol".to_string()],
            average_rating: rating,
            review_count: 0,
            main_photo_url: None,
        }
    }

    fn build() -> AdvancedSearch {
        AdvancedSearch::new(
            vec![
                listing(ListingKind::Establishment, "Arena Central", 4.5),
                listing(ListingKind::Establishment, "Arena Norte", 3.0),
            ],
            vec![listing(ListingKind::Group, "Grupo do Parque", 4.0)],
        )
    }

    #[test]
    fn defaults_return_everything_in_input_order() {
        let mut search = build();
        let results = search.results();
        assert_eq!(results.total, 3);
        assert_eq!(results.establishments[0].name, "Arena Central");
        assert_eq!(results.establishments[1].name, "Arena Norte");
        assert_eq!(results.groups[0].name, "Grupo do Parque");
    }

    #[test]
    fn update_filters_recomputes() {
        let mut search = build();
        assert_eq!(search.results().total, 3);

        search.update_filters(SearchFiltersPatch {
            min_rating: Some(4.0),
            ..SearchFiltersPatch::default()
        });
        let results = search.results();
        assert_eq!(results.total, 2);
        assert_eq!(results.establishments.len(), 1);
        assert_eq!(results.groups.len(), 1);
    }

    #[test]
    fn clear_filters_restores_full_set() {
        let mut search = build();
        search.update_filters(SearchFiltersPatch {
            query: Some("norte".to_string()),
            sort: Some(SortKey::Rating),
            ..SearchFiltersPatch::default()
        });
        assert_eq!(search.results().total, 1);

        search.clear_filters();
        assert_eq!(search.results().total, 3);
        assert_eq!(search.filters().query, "");
    }

    #[test]
    fn unchanged_inputs_reuse_the_cached_results() {
        let mut search = build();
        let first = search.results() as *const SearchResults;
        let second = search.results() as *const SearchResults;
        // Same allocation: nothing was recomputed between the calls.
        assert_eq!(first, second);
    }

    #[test]
    fn set_listings_invalidates_the_cache() {
        let mut search = build();
        assert_eq!(search.results().total, 3);

        search.set_listings(
            vec![listing(ListingKind::Establishment, "Arena Central", 4.5)],
            Vec::new(),
        );
        assert_eq!(search.results().total, 1);
    }

    #[test]
    fn origin_change_invalidates_the_cache() {
        let mut search = build();
        search.update_filters(SearchFiltersPatch {
            max_distance_km: Some(Some(10.0)),
            ..SearchFiltersPatch::default()
        });
        // Radius without origin: predicate inactive, everything passes.
        assert_eq!(search.results().total, 3);

        // Origin present: the fixture listings have no coordinates and the
        // active distance predicate now excludes them.
        search.set_origin(Some(Coordinate {
            latitude: -23.55,
            longitude: -46.63,
        }));
        assert_eq!(search.results().total, 0);
    }
}
