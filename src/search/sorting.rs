use std::cmp::Ordering;

use super::geo::distance_between;
use super::{Coordinate, Listing};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Distance,
    Rating,
    Name,
}

impl SortKey {
    pub fn as_str(self) -> &'static str {
        match self {
            SortKey::Distance => "distance",
            SortKey::Rating => "rating",
            SortKey::Name => "name",
        }
    }

    pub fn parse(input: Option<&str>) -> SortKey {
        match input.unwrap_or("distance") {
            "rating" => SortKey::Rating,
            "name" => SortKey::Name,
            _ => SortKey::Distance,
        }
    }
}

/// Stable sort by the given key. All comparators leave equal-key listings in
/// their input order (`sort_by` on a Vec is stable).
pub fn sort_listings(
    mut listings: Vec<Listing>,
    key: SortKey,
    origin: Option<Coordinate>,
) -> Vec<Listing> {
    match key {
        SortKey::Distance => {
            // Without an origin there is nothing to measure against; the
            // input order stands.
            let Some(origin) = origin else {
                return listings;
            };
            let mut keyed: Vec<(Option<f64>, Listing)> = listings
                .into_iter()
                .map(|l| (l.coordinate.map(|c| distance_between(origin, c)), l))
                .collect();
            keyed.sort_by(|a, b| cmp_distance(a.0, b.0));
            keyed.into_iter().map(|(_, l)| l).collect()
        }
        SortKey::Rating => {
            listings.sort_by(|a, b| {
                b.average_rating
                    .partial_cmp(&a.average_rating)
                    .unwrap_or(Ordering::Equal)
                    .then(b.review_count.cmp(&a.review_count))
            });
            listings
        }
        SortKey::Name => {
            // Locale-naive, case-sensitive, matching the source ordering.
            listings.sort_by(|a, b| a.name.cmp(&b.name));
            listings
        }
    }
}

/// Ascending by distance; listings without coordinates sort last.
fn cmp_distance(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(da), Some(db)) => da.partial_cmp(&db).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::ListingKind;

    fn listing(name: &str, coordinate: Option<Coordinate>) -> Listing {
        Listing {
            id: name.to_lowercase(),
            kind: ListingKind::Group,
            name: name.to_string(),
            description: String::new(),
            city: String::new(),
            coordinate,
            sports: Vec::new(),
            average_rating: 0.0,
            review_count: 0,
            main_photo_url: None,
        }
    }

    fn sp() -> Coordinate {
        Coordinate {
            latitude: -23.55,
            longitude: -46.63,
        }
    }

    fn rio() -> Coordinate {
        Coordinate {
            latitude: -22.90,
            longitude: -43.17,
        }
    }

    #[test]
    fn distance_sort_orders_ascending_from_origin() {
        let input = vec![listing("Rio", Some(rio())), listing("SP", Some(sp()))];
        let out = sort_listings(input, SortKey::Distance, Some(sp()));
        assert_eq!(out[0].name, "SP");
        assert_eq!(out[1].name, "Rio");
        let d = distance_between(sp(), rio());
        assert!(d > 342.0 && d < 378.0, "got {}", d);
    }

    #[test]
    fn distance_sort_puts_coordinateless_last_in_input_order() {
        let input = vec![
            listing("Sem Local A", None),
            listing("Rio", Some(rio())),
            listing("Sem Local B", None),
            listing("SP", Some(sp())),
        ];
        let out = sort_listings(input, SortKey::Distance, Some(sp()));
        let names: Vec<&str> = out.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["SP", "Rio", "Sem Local A", "Sem Local B"]);
    }

    #[test]
    fn distance_sort_without_origin_keeps_input_order() {
        let input = vec![listing("B", Some(rio())), listing("A", Some(sp()))];
        let out = sort_listings(input, SortKey::Distance, None);
        assert_eq!(out[0].name, "B");
        assert_eq!(out[1].name, "A");
    }

    #[test]
    fn rating_sort_is_descending_and_stable_on_ties() {
        let mut a = listing("Primeiro 4.5", None);
        a.average_rating = 4.5;
        let mut b = listing("Segundo 4.5", None);
        b.average_rating = 4.5;
        let mut c = listing("Nota 3.0", None);
        c.average_rating = 3.0;

        let out = sort_listings(vec![a, b, c], SortKey::Rating, None);
        let names: Vec<&str> = out.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["Primeiro 4.5", "Segundo 4.5", "Nota 3.0"]);
    }

    #[test]
    fn rating_ties_break_on_review_count() {
        let mut a = listing("Poucas Avaliações", None);
        a.average_rating = 4.5;
        a.review_count = 3;
        let mut b = listing("Muitas Avaliações", None);
        b.average_rating = 4.5;
        b.review_count = 40;

        let out = sort_listings(vec![a, b], SortKey::Rating, None);
        assert_eq!(out[0].name, "Muitas Avaliações");
    }

    #[test]
    fn name_sort_is_case_sensitive_bytewise() {
        let input = vec![listing("arena", None), listing("Zebra", None)];
        let out = sort_listings(input, SortKey::Name, None);
        // Uppercase sorts before lowercase under byte-wise comparison.
        assert_eq!(out[0].name, "Zebra");
        assert_eq!(out[1].name, "arena");
    }

    #[test]
    fn name_sort_is_stable_for_equal_names() {
        let mut a = listing("Arena", None);
        a.id = "first".to_string();
        let mut b = listing("Arena", None);
        b.id = "second".to_string();
        let out = sort_listings(vec![a, b], SortKey::Name, None);
        assert_eq!(out[0].id, "first");
        assert_eq!(out[1].id, "second");
    }

    #[test]
    fn distance_sort_is_monotone_over_adjacent_pairs() {
        let coords = [
            Some(rio()),
            Some(sp()),
            None,
            Some(Coordinate {
                latitude: -25.43,
                longitude: -49.27,
            }),
        ];
        let input: Vec<Listing> = coords
            .iter()
            .enumerate()
            .map(|(i, c)| listing(&format!("L{}", i), *c))
            .collect();
        let out = sort_listings(input, SortKey::Distance, Some(sp()));
        let dists: Vec<Option<f64>> = out
            .iter()
            .map(|l| l.coordinate.map(|c| distance_between(sp(), c)))
            .collect();
        for pair in dists.windows(2) {
            if let (Some(a), Some(b)) = (pair[0], pair[1]) {
                assert!(a <= b);
            }
        }
    }
}
