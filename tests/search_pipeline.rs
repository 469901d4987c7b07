//! Directory pipeline exercised end to end over in-memory listings: the same
//! assembly the /busca handler uses, minus the SQL load.

use nucleo_esporte::search::{Coordinate, Listing, ListingKind};
use nucleo_esporte::services::search_service::{
    assemble_directory, DirectoryQuery, DirectoryScope,
};

fn establishment(
    id: &str,
    name: &str,
    city: &str,
    coordinate: Option<(f64, f64)>,
    sports: &[&str],
    rating: f64,
    reviews: i64,
) -> Listing {
    Listing {
        id: id.to_string(),
        kind: ListingKind::Establishment,
        name: name.to_string(),
        description: format!("Espaço de treino: {}", name),
        city: city.to_string(),
        coordinate: coordinate.map(|(latitude, longitude)| Coordinate {
            latitude,
            longitude,
        }),
        sports: sports.iter().map(|s| s.to_string()).collect(),
        average_rating: rating,
        review_count: reviews,
        main_photo_url: None,
    }
}

fn sao_paulo() -> Listing {
    establishment(
        "e-sp",
        "Arena Paulista",
        "São Paulo - SP",
        Some((-23.55, -46.63)),
        &["Futebol"],
        4.5,
        12,
    )
}

fn rio() -> Listing {
    establishment(
        "e-rj",
        "Clube Carioca",
        "Rio de Janeiro - RJ",
        Some((-22.90, -43.17)),
        &["Vôlei"],
        4.0,
        30,
    )
}

#[test]
fn sport_tag_filter_selects_the_matching_establishment() {
    let query = DirectoryQuery {
        esportes: Some("Futebol".to_string()),
        ..DirectoryQuery::default()
    };
    let page = assemble_directory(vec![sao_paulo(), rio()], Vec::new(), &query, DirectoryScope::All);
    assert_eq!(page.total, 1);
    assert_eq!(page.establishments[0].name, "Arena Paulista");
}

#[test]
fn distance_sort_from_sao_paulo_puts_the_local_arena_first() {
    let query = DirectoryQuery {
        ordem: Some("distance".to_string()),
        lat: Some(-23.55),
        lon: Some(-46.63),
        ..DirectoryQuery::default()
    };
    let page = assemble_directory(vec![rio(), sao_paulo()], Vec::new(), &query, DirectoryScope::All);
    assert_eq!(page.establishments[0].name, "Arena Paulista");
    assert_eq!(page.establishments[1].name, "Clube Carioca");

    // ~360 km ± 5%, surfaced on the card label.
    assert!(page.establishments[1].has_distance);
    let km: f64 = page.establishments[1]
        .distance_label
        .trim_end_matches(" km")
        .replace(',', ".")
        .parse()
        .unwrap();
    assert!(km > 342.0 && km < 378.0, "got {}", km);
}

#[test]
fn rating_sort_keeps_equal_ratings_in_input_order() {
    let a = establishment("a", "Primeira", "São Paulo - SP", None, &[], 4.5, 1);
    let b = establishment("b", "Segunda", "São Paulo - SP", None, &[], 4.5, 1);
    let c = establishment("c", "Terceira", "São Paulo - SP", None, &[], 3.0, 9);
    let query = DirectoryQuery {
        ordem: Some("rating".to_string()),
        ..DirectoryQuery::default()
    };
    let page = assemble_directory(vec![a, b, c], Vec::new(), &query, DirectoryScope::All);
    let names: Vec<&str> = page
        .establishments
        .iter()
        .map(|c| c.name.as_str())
        .collect();
    assert_eq!(names, vec!["Primeira", "Segunda", "Terceira"]);
}

#[test]
fn radius_filter_drops_coordinateless_listings() {
    let no_coords = establishment("x", "Sem Endereço", "São Paulo - SP", None, &[], 5.0, 3);
    let query = DirectoryQuery {
        raio_km: Some(10.0),
        lat: Some(-23.55),
        lon: Some(-46.63),
        ..DirectoryQuery::default()
    };
    let page = assemble_directory(
        vec![no_coords, sao_paulo()],
        Vec::new(),
        &query,
        DirectoryScope::All,
    );
    assert_eq!(page.total, 1);
    assert_eq!(page.establishments[0].name, "Arena Paulista");
}

#[test]
fn default_query_returns_everything_in_input_order() {
    let page = assemble_directory(
        vec![rio(), sao_paulo()],
        vec![establishment("g", "Grupo da Lagoa", "Rio de Janeiro - RJ", None, &["Corrida"], 0.0, 0)],
        &DirectoryQuery::default(),
        DirectoryScope::All,
    );
    assert_eq!(page.total, 3);
    assert_eq!(page.establishments[0].name, "Clube Carioca");
    assert_eq!(page.establishments[1].name, "Arena Paulista");
    assert_eq!(page.groups[0].name, "Grupo da Lagoa");
}

#[test]
fn text_query_matches_city_case_insensitively() {
    let query = DirectoryQuery {
        q: Some("rio de janeiro".to_string()),
        ..DirectoryQuery::default()
    };
    let page = assemble_directory(vec![sao_paulo(), rio()], Vec::new(), &query, DirectoryScope::All);
    assert_eq!(page.total, 1);
    assert_eq!(page.establishments[0].name, "Clube Carioca");
}

#[test]
fn sport_options_reflect_the_full_collection_and_selection() {
    let query = DirectoryQuery {
        esportes: Some("Futebol".to_string()),
        ..DirectoryQuery::default()
    };
    let page = assemble_directory(vec![sao_paulo(), rio()], Vec::new(), &query, DirectoryScope::All);
    let futebol = page.sport_options.iter().find(|o| o.name == "Futebol").unwrap();
    let volei = page.sport_options.iter().find(|o| o.name == "Vôlei").unwrap();
    assert!(futebol.selected);
    assert!(!volei.selected);
}
