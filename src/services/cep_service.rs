use serde::Deserialize;
use serde::Serialize;
use tracing::warn;

use crate::services::validation::validate_cep;

#[derive(Debug, Serialize, Clone)]
pub struct CepAddress {
    pub cep: String,
    pub street: String,
    pub district: String,
    pub city: String,
    pub state: String,
}

#[derive(Debug, Deserialize)]
struct CepHit {
    cep: Option<String>,
    logradouro: Option<String>,
    bairro: Option<String>,
    localidade: Option<String>,
    cidade: Option<String>,
    uf: Option<String>,
    estado: Option<String>,
    erro: Option<bool>,
}

/// Address lookup for the registration/profile forms, ViaCEP-compatible.
/// Upstream failures degrade to Err(()): the form keeps working, the user
/// types the address by hand.
pub async fn lookup_cep(raw_cep: &str) -> Result<Option<CepAddress>, ()> {
    let Ok(cep) = validate_cep(raw_cep) else {
        return Ok(None);
    };

    let base_url =
        std::env::var("CEP_API_URL").unwrap_or_else(|_| "https://viacep.com.br/ws".to_string());
    let url = format!("{}/{}/json", base_url.trim_end_matches('/'), cep);

    let client = reqwest::Client::new();
    let resp = match client.get(&url).send().await {
        Ok(r) => r,
        Err(e) => {
            warn!("CEP upstream unreachable: {}", e);
            return Err(());
        }
    };

    if !resp.status().is_success() {
        warn!("CEP upstream non-OK: {}", resp.status());
        return Err(());
    }

    let hit: CepHit = match resp.json().await {
        Ok(data) => data,
        Err(e) => {
            warn!("CEP upstream JSON parse failed: {}", e);
            return Err(());
        }
    };

    if hit.erro.unwrap_or(false) {
        return Ok(None);
    }

    Ok(Some(CepAddress {
        cep: hit.cep.unwrap_or(cep),
        street: hit.logradouro.unwrap_or_default(),
        district: hit.bairro.unwrap_or_default(),
        city: hit.localidade.or(hit.cidade).unwrap_or_default(),
        state: hit.uf.or(hit.estado).unwrap_or_default(),
    }))
}

#[derive(Debug, Deserialize)]
struct GeoHit {
    lat: Option<f64>,
    lon: Option<f64>,
    lng: Option<f64>,
    latitude: Option<f64>,
    longitude: Option<f64>,
}

/// Coordinate lookup for the geo backfill, against a geocoding upstream that
/// answers per-CEP. Tolerant of the usual field-name variants.
pub async fn geocode_cep(raw_cep: &str) -> Result<Option<(f64, f64)>, ()> {
    let Ok(cep) = validate_cep(raw_cep) else {
        return Ok(None);
    };

    let base_url = std::env::var("CEP_GEO_API_URL")
        .unwrap_or_else(|_| "https://cep.localhost/api/v1/geo".to_string());
    let url = format!("{}/{}", base_url.trim_end_matches('/'), cep);

    let client = reqwest::Client::new();
    let resp = match client.get(&url).send().await {
        Ok(r) => r,
        Err(e) => {
            warn!("CEP geocode upstream unreachable: {}", e);
            return Err(());
        }
    };

    if !resp.status().is_success() {
        warn!("CEP geocode upstream non-OK: {}", resp.status());
        return Err(());
    }

    let hit: GeoHit = match resp.json().await {
        Ok(data) => data,
        Err(e) => {
            warn!("CEP geocode upstream JSON parse failed: {}", e);
            return Err(());
        }
    };

    let lat = hit.lat.or(hit.latitude);
    let lon = hit.lon.or(hit.lng).or(hit.longitude);
    Ok(lat.zip(lon))
}
