use serde::Deserialize;
use sqlx::SqlitePool;

use crate::database::{establishment_repo, group_repo};
use crate::models::{EstablishmentRow, SportGroupRow};
use crate::search::geo::{bounding_box, distance_between};
use crate::search::{
    AdvancedSearch, Coordinate, Listing, ListingKind, SearchFiltersPatch, SortKey,
};

const DIRECTORY_FETCH_LIMIT: i64 = 500;

#[derive(Debug, Deserialize, Default)]
pub struct DirectoryQuery {
    pub q: Option<String>,
    /// Comma-separated sport tags, e.g. "Futebol,Vôlei".
    pub esportes: Option<String>,
    #[serde(default, deserialize_with = "crate::services::empty_as_none_f64")]
    pub raio_km: Option<f64>,
    #[serde(default, deserialize_with = "crate::services::empty_as_none_f64")]
    pub nota_min: Option<f64>,
    pub ordem: Option<String>, // distance|rating|name
    #[serde(default, deserialize_with = "crate::services::empty_as_none_f64")]
    pub lat: Option<f64>,
    #[serde(default, deserialize_with = "crate::services::empty_as_none_f64")]
    pub lon: Option<f64>,
    pub notice: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectoryScope {
    All,
    Establishments,
    Groups,
}

/// Echo of the applied criteria, pre-rendered for the filter form.
#[derive(Clone, Default)]
pub struct AppliedSearchFilters {
    pub query: String,
    pub selected_sports: Vec<String>,
    pub sports_csv: String,
    pub radius_value: String,
    pub min_rating_value: String,
    pub sort: String,
    pub lat_value: String,
    pub lon_value: String,
    pub has_origin: bool,
    pub has_notice: bool,
    pub notice_message: String,
}

#[derive(Clone)]
pub struct SportOptionView {
    pub name: String,
    pub selected: bool,
}

pub struct ListingCardView {
    pub listing_id: String,
    pub kind: String,
    pub kind_label: String,
    pub detail_path: String,
    pub name: String,
    pub city: String,
    pub snippet: String,
    pub sports: Vec<String>,
    pub rating_label: String,
    pub review_count: i64,
    pub has_distance: bool,
    pub distance_label: String,
    pub has_photo: bool,
    pub photo_url: String,
}

pub struct DirectoryPageData {
    pub title: String,
    pub establishments: Vec<ListingCardView>,
    pub groups: Vec<ListingCardView>,
    pub total: usize,
    pub filters: AppliedSearchFilters,
    pub sport_options: Vec<SportOptionView>,
}

pub async fn build_directory_page(
    pool: &SqlitePool,
    query: &DirectoryQuery,
    scope: DirectoryScope,
) -> sqlx::Result<DirectoryPageData> {
    let origin = query
        .lat
        .zip(query.lon)
        .map(|(latitude, longitude)| Coordinate {
            latitude,
            longitude,
        });
    let bbox = origin.and_then(|o| {
        query
            .raio_km
            .map(|radius| bounding_box(o.latitude, o.longitude, radius))
    });

    let establishment_rows = match scope {
        DirectoryScope::Groups => Vec::new(),
        _ => establishment_repo::list_all(pool, bbox, DIRECTORY_FETCH_LIMIT).await?,
    };
    let group_rows = match scope {
        DirectoryScope::Establishments => Vec::new(),
        _ => group_repo::list_all(pool, bbox, DIRECTORY_FETCH_LIMIT).await?,
    };

    let establishments = establishment_rows
        .into_iter()
        .map(establishment_to_listing)
        .collect();
    let groups = group_rows.into_iter().map(group_to_listing).collect();

    Ok(assemble_directory(establishments, groups, query, scope))
}

/// Pure assembly over already-fetched listings: runs the filter/sort core
/// and shapes the template views. Split from the SQL load so the directory
/// flow is testable against in-memory fixtures.
pub fn assemble_directory(
    establishments: Vec<Listing>,
    groups: Vec<Listing>,
    query: &DirectoryQuery,
    scope: DirectoryScope,
) -> DirectoryPageData {
    let origin = query
        .lat
        .zip(query.lon)
        .map(|(latitude, longitude)| Coordinate {
            latitude,
            longitude,
        });
    let selected_sports = parse_sports_csv(query.esportes.as_deref());
    let sort = SortKey::parse(query.ordem.as_deref());

    let mut sport_names: Vec<String> = Vec::new();
    for listing in establishments.iter().chain(groups.iter()) {
        for tag in &listing.sports {
            if !sport_names.iter().any(|s| s == tag) {
                sport_names.push(tag.clone());
            }
        }
    }
    sport_names.sort();

    let mut search = AdvancedSearch::new(establishments, groups);
    search.set_origin(origin);
    search.update_filters(SearchFiltersPatch {
        query: Some(query.q.clone().unwrap_or_default()),
        sports: Some(selected_sports.clone()),
        max_distance_km: Some(query.raio_km.filter(|r| *r > 0.0)),
        min_rating: Some(query.nota_min.unwrap_or(0.0)),
        sort: Some(sort),
    });
    let results = search.results();

    let establishments: Vec<ListingCardView> = results
        .establishments
        .iter()
        .map(|l| listing_card(l, origin))
        .collect();
    let groups: Vec<ListingCardView> = results
        .groups
        .iter()
        .map(|l| listing_card(l, origin))
        .collect();
    let total = results.total;

    let sport_options = sport_names
        .into_iter()
        .map(|name| {
            let selected = selected_sports.iter().any(|s| s == &name);
            SportOptionView { name, selected }
        })
        .collect();

    let title = match scope {
        DirectoryScope::All => "Buscar".to_string(),
        DirectoryScope::Establishments => "Estabelecimentos".to_string(),
        DirectoryScope::Groups => "Grupos esportivos".to_string(),
    };

    DirectoryPageData {
        title,
        establishments,
        groups,
        total,
        filters: applied_filters(query, &selected_sports, sort, origin),
        sport_options,
    }
}

fn applied_filters(
    query: &DirectoryQuery,
    selected_sports: &[String],
    sort: SortKey,
    origin: Option<Coordinate>,
) -> AppliedSearchFilters {
    let notice_message = query
        .notice
        .as_deref()
        .map(crate::services::notice_message)
        .unwrap_or_default();
    AppliedSearchFilters {
        query: query.q.clone().unwrap_or_default(),
        selected_sports: selected_sports.to_vec(),
        sports_csv: selected_sports.join(","),
        radius_value: query
            .raio_km
            .filter(|r| *r > 0.0)
            .map(|r| format!("{}", r))
            .unwrap_or_default(),
        min_rating_value: query
            .nota_min
            .filter(|n| *n > 0.0)
            .map(|n| format!("{}", n))
            .unwrap_or_default(),
        sort: sort.as_str().to_string(),
        lat_value: origin.map(|o| format!("{}", o.latitude)).unwrap_or_default(),
        lon_value: origin
            .map(|o| format!("{}", o.longitude))
            .unwrap_or_default(),
        has_origin: origin.is_some(),
        has_notice: !notice_message.is_empty(),
        notice_message,
    }
}

fn parse_sports_csv(raw: Option<&str>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    let Some(raw) = raw else {
        return out;
    };
    for part in raw.split(',') {
        let t = part.trim();
        if t.is_empty() {
            continue;
        }
        if !out.iter().any(|s| s == t) {
            out.push(t.to_string());
        }
        if out.len() >= 10 {
            break;
        }
    }
    out
}

pub(crate) fn listing_card(listing: &Listing, origin: Option<Coordinate>) -> ListingCardView {
    let distance_km = origin
        .zip(listing.coordinate)
        .map(|(o, c)| distance_between(o, c));
    let (kind, kind_label, base_path) = match listing.kind {
        ListingKind::Establishment => ("establishment", "Estabelecimento", "/estabelecimentos"),
        ListingKind::Group => ("group", "Grupo", "/grupos"),
    };

    ListingCardView {
        listing_id: listing.id.clone(),
        kind: kind.to_string(),
        kind_label: kind_label.to_string(),
        detail_path: format!("{}/{}", base_path, listing.id),
        name: listing.name.clone(),
        city: listing.city.clone(),
        snippet: snippet(&listing.description),
        sports: listing.sports.clone(),
        rating_label: format!("{:.1}", listing.average_rating),
        review_count: listing.review_count,
        has_distance: distance_km.is_some(),
        distance_label: distance_km
            .map(|d| format!("{:.1} km", d))
            .unwrap_or_default(),
        has_photo: listing.main_photo_url.is_some(),
        photo_url: listing.main_photo_url.clone().unwrap_or_default(),
    }
}

fn snippet(description: &str) -> String {
    let trimmed = description.trim();
    if trimmed.chars().count() <= 140 {
        return trimmed.to_string();
    }
    let cut: String = trimmed.chars().take(140).collect();
    format!("{}…", cut.trim_end())
}

pub fn establishment_to_listing(row: EstablishmentRow) -> Listing {
    Listing {
        id: row.establishment_id,
        kind: ListingKind::Establishment,
        name: row.name,
        description: row.description.unwrap_or_default(),
        city: city_label(row.city.as_deref(), row.state.as_deref()),
        coordinate: row
            .latitude
            .zip(row.longitude)
            .map(|(latitude, longitude)| Coordinate {
                latitude,
                longitude,
            }),
        sports: parse_string_array_json(row.sports.as_deref()),
        average_rating: row.average_rating.unwrap_or(0.0),
        review_count: row.review_count.unwrap_or(0),
        main_photo_url: main_photo(row.main_photo_url.as_deref(), row.photos.as_deref()),
    }
}

pub fn group_to_listing(row: SportGroupRow) -> Listing {
    Listing {
        id: row.group_id,
        kind: ListingKind::Group,
        name: row.name,
        description: row.description.unwrap_or_default(),
        city: city_label(row.city.as_deref(), row.state.as_deref()),
        coordinate: row
            .latitude
            .zip(row.longitude)
            .map(|(latitude, longitude)| Coordinate {
                latitude,
                longitude,
            }),
        sports: parse_string_array_json(row.sports.as_deref()),
        average_rating: row.average_rating.unwrap_or(0.0),
        review_count: row.review_count.unwrap_or(0),
        main_photo_url: main_photo(row.main_photo_url.as_deref(), row.photos.as_deref()),
    }
}

fn city_label(city: Option<&str>, state: Option<&str>) -> String {
    let city = city.map(str::trim).filter(|s| !s.is_empty());
    let state = state.map(str::trim).filter(|s| !s.is_empty());
    match (city, state) {
        (Some(c), Some(s)) => format!("{} - {}", c, s),
        (Some(c), None) => c.to_string(),
        _ => String::new(),
    }
}

pub fn parse_string_array_json(raw: Option<&str>) -> Vec<String> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Vec::new();
    };
    serde_json::from_str::<Vec<String>>(raw).unwrap_or_default()
}

#[derive(Debug, Deserialize)]
struct PhotoJson {
    url: Option<String>,
    is_main: Option<bool>,
}

/// The dedicated main_photo_url column wins; otherwise the photo marked
/// is_main in the JSON list, otherwise the first one.
fn main_photo(main_photo_url: Option<&str>, photos_json: Option<&str>) -> Option<String> {
    if let Some(url) = main_photo_url.map(str::trim).filter(|s| !s.is_empty()) {
        return Some(url.to_string());
    }
    let raw = photos_json.map(str::trim).filter(|s| !s.is_empty())?;
    let photos: Vec<PhotoJson> = serde_json::from_str(raw).ok()?;
    let pick = photos
        .iter()
        .find(|p| p.is_main.unwrap_or(false))
        .or_else(|| photos.first())?;
    pick.url
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sports_csv_trims_dedupes_and_caps() {
        let parsed = parse_sports_csv(Some(" Futebol, Vôlei ,,Futebol"));
        assert_eq!(parsed, vec!["Futebol".to_string(), "Vôlei".to_string()]);
        assert!(parse_sports_csv(None).is_empty());
    }

    #[test]
    fn city_label_joins_city_and_state() {
        assert_eq!(city_label(Some("São Paulo"), Some("SP")), "São Paulo - SP");
        assert_eq!(city_label(Some("São Paulo"), None), "São Paulo");
        assert_eq!(city_label(None, Some("SP")), "");
    }

    #[test]
    fn main_photo_prefers_column_then_is_main_then_first() {
        assert_eq!(
            main_photo(Some("direct.jpg"), None),
            Some("direct.jpg".to_string())
        );
        let photos = r#"[{"url":"a.jpg","is_main":false},{"url":"b.jpg","is_main":true}]"#;
        assert_eq!(main_photo(None, Some(photos)), Some("b.jpg".to_string()));
        let photos = r#"[{"url":"a.jpg"},{"url":"b.jpg"}]"#;
        assert_eq!(main_photo(None, Some(photos)), Some("a.jpg".to_string()));
        assert_eq!(main_photo(None, Some("not json")), None);
    }

    #[test]
    fn snippet_truncates_on_char_boundary() {
        let short = snippet("quadra coberta");
        assert_eq!(short, "quadra coberta");
        let long = "ã".repeat(200);
        let cut = snippet(&long);
        assert!(cut.chars().count() <= 141);
        assert!(cut.ends_with('…'));
    }
}
