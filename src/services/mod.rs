use serde::{Deserialize, Deserializer};

pub mod cep_service;
pub mod favorite_service;
pub mod listing_geo_service;
pub mod listing_service;
pub mod promo_service;
pub mod registration_service;
pub mod review_service;
pub mod search_service;
pub mod session_service;
pub mod user_service;
pub mod validation;
pub mod waitlist_service;

/// HTML forms submit empty strings for untouched numeric fields; treat those
/// as absent instead of failing the whole query parse.
pub(crate) fn empty_as_none_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|s| s.trim().parse().ok()))
}

pub(crate) fn empty_as_none_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|s| s.trim().parse().ok()))
}

/// Shared notice-code vocabulary for the `?notice=` redirects. Unknown codes
/// render as nothing rather than leaking internals.
pub fn notice_message(code: &str) -> String {
    match code {
        "favorite_saved" => "Adicionado aos favoritos.",
        "favorite_removed" => "Removido dos favoritos.",
        "review_ok" => "Avaliação enviada. Obrigado!",
        "already_reviewed" => "Você já avaliou este local.",
        "review_removed" => "Avaliação removida.",
        "invalid_rating" => "Escolha uma nota de 1 a 5.",
        "profile_ok" => "Perfil atualizado.",
        "promo_applied" => "Código promocional aplicado!",
        "promo_not_found" => "Código promocional não encontrado.",
        "promo_expired" => "Este código promocional expirou.",
        "promo_exhausted" => "Este código promocional atingiu o limite de usos.",
        "promo_inactive" => "Este código promocional não está mais ativo.",
        "promo_already_used" => "Você já usou este código promocional.",
        "waitlist_ok" => "Pronto! Você entrou na lista de espera.",
        "waitlist_duplicate" => "Este e-mail já está na lista de espera.",
        "waitlist_invalid" => "Informe um e-mail válido.",
        "error" => "Algo deu errado. Tente novamente.",
        _ => "",
    }
    .to_string()
}
