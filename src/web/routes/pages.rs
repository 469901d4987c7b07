use std::sync::OnceLock;

use askama::Template;
use axum::{
    extract::Query,
    http::{StatusCode, Uri},
    response::{Html, IntoResponse},
};
use serde::Deserialize;

/// One marketing landing. The whole set is near-identical by design: same
/// template, copy varies by sport/city.
pub struct LandingPage {
    pub path: String,
    pub title: String,
    pub headline: String,
    pub blurb: String,
    pub interest: String,
    pub city: String,
}

const SPORTS: &[(&str, &str)] = &[
    ("futebol", "Futebol"),
    ("volei", "Vôlei"),
    ("basquete", "Basquete"),
    ("natacao", "Natação"),
    ("corrida", "Corrida"),
    ("tenis", "Tênis"),
    ("jiu-jitsu", "Jiu-Jitsu"),
    ("musculacao", "Musculação"),
];

const CITIES: &[(&str, &str, &str)] = &[
    ("sao-paulo", "São Paulo", "SP"),
    ("rio-de-janeiro", "Rio de Janeiro", "RJ"),
    ("belo-horizonte", "Belo Horizonte", "MG"),
    ("curitiba", "Curitiba", "PR"),
    ("porto-alegre", "Porto Alegre", "RS"),
    ("salvador", "Salvador", "BA"),
    ("fortaleza", "Fortaleza", "CE"),
    ("recife", "Recife", "PE"),
    ("brasilia", "Brasília", "DF"),
    ("goiania", "Goiânia", "GO"),
];

// (path, title, headline)
const STATIC_PAGES: &[(&str, &str, &str)] = &[
    ("/sobre", "Sobre nós", "O esporte aproxima. A gente conecta."),
    ("/contato", "Contato", "Fale com o Núcleo do Esporte"),
    ("/parceiros", "Parceiros", "Cresça junto com a nossa comunidade"),
    ("/como-funciona", "Como funciona", "Encontre, avalie e pratique"),
    ("/para-academias", "Para academias", "Sua academia na vitrine certa"),
    ("/para-clubes", "Para clubes", "Mais atletas no seu clube"),
    ("/para-grupos", "Para grupos", "Seu grupo de treino, sempre cheio"),
    ("/para-atletas", "Para atletas", "Seu próximo treino está aqui"),
    ("/planos", "Planos", "Comece grátis, evolua quando quiser"),
    ("/indique-um-amigo", "Indique um amigo", "Treinar junto é melhor"),
    ("/termos", "Termos de uso", "Termos de uso"),
    ("/privacidade", "Privacidade", "Política de privacidade"),
];

static PAGES: OnceLock<Vec<LandingPage>> = OnceLock::new();

pub fn all() -> &'static [LandingPage] {
    PAGES.get_or_init(build_pages)
}

fn build_pages() -> Vec<LandingPage> {
    let mut pages = Vec::new();

    for (sport_slug, sport) in SPORTS {
        for (city_slug, city, state) in CITIES {
            pages.push(LandingPage {
                path: format!("/{}-em-{}", sport_slug, city_slug),
                title: format!("{} em {} - {}", sport, city, state),
                headline: format!("Pratique {} em {}", sport, city),
                blurb: format!(
                    "Encontre os melhores lugares e grupos de {} em {} - {}. \
                     Compare avaliações, veja distâncias e entre em contato direto.",
                    sport, city, state
                ),
                interest: sport.to_string(),
                city: format!("{} - {}", city, state),
            });
        }
    }

    for (path, title, headline) in STATIC_PAGES {
        pages.push(LandingPage {
            path: path.to_string(),
            title: title.to_string(),
            headline: headline.to_string(),
            blurb: "O Núcleo do Esporte conecta atletas, estabelecimentos e grupos \
                    esportivos em todo o Brasil."
                .to_string(),
            interest: String::new(),
            city: String::new(),
        });
    }

    pages
}

#[derive(Template)]
#[template(path = "landing.html")]
pub struct LandingTemplate {
    pub title: String,
    pub headline: String,
    pub blurb: String,
    pub interest: String,
    pub city: String,
    pub return_path: String,
    pub has_notice: bool,
    pub notice_message: String,
}

#[derive(Debug, Deserialize, Default)]
pub struct LandingQuery {
    pub notice: Option<String>,
}

pub async fn landing_handler(Query(query): Query<LandingQuery>, uri: Uri) -> impl IntoResponse {
    let Some(page) = all().iter().find(|p| p.path == uri.path()) else {
        return StatusCode::NOT_FOUND.into_response();
    };

    let notice_message = query
        .notice
        .as_deref()
        .map(crate::services::notice_message)
        .unwrap_or_default();
    let template = LandingTemplate {
        title: page.title.clone(),
        headline: page.headline.clone(),
        blurb: page.blurb.clone(),
        interest: page.interest.clone(),
        city: page.city.clone(),
        return_path: page.path.clone(),
        has_notice: !notice_message.is_empty(),
        notice_message,
    };
    Html(template.render().unwrap()).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn the_landing_set_is_large_and_unique() {
        let pages = all();
        assert!(pages.len() >= 90, "got {}", pages.len());
        let mut paths: Vec<&str> = pages.iter().map(|p| p.path.as_str()).collect();
        paths.sort();
        paths.dedup();
        assert_eq!(paths.len(), pages.len());
        assert!(pages.iter().all(|p| p.path.starts_with('/')));
    }

    #[test]
    fn sport_city_pages_carry_their_combination() {
        let page = all()
            .iter()
            .find(|p| p.path == "/futebol-em-sao-paulo")
            .unwrap();
        assert!(page.title.contains("Futebol"));
        assert!(page.city.contains("São Paulo"));
    }
}
