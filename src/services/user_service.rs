use serde::Deserialize;
use sqlx::SqlitePool;
use tracing::warn;

use crate::database::user_repo;
use crate::services::cep_service;
use crate::services::registration_service::FieldError;
use crate::services::validation::{validate_cep, validate_cpf, validate_phone};

pub struct ProfileView {
    pub name: String,
    pub email: String,
    pub cpf_value: String,
    pub phone_value: String,
    pub cep_value: String,
    pub city_value: String,
    pub state_value: String,
    pub role_label: String,
    pub referral_code: String,
    pub profile_complete: bool,
    pub has_notice: bool,
    pub notice_message: String,
}

pub async fn load_profile_view(
    pool: &SqlitePool,
    user_id: &str,
    notice: Option<&str>,
) -> sqlx::Result<Option<ProfileView>> {
    let Some(user) = user_repo::load_by_id(pool, user_id).await? else {
        return Ok(None);
    };

    let notice_message = notice
        .map(crate::services::notice_message)
        .unwrap_or_default();
    Ok(Some(ProfileView {
        name: user.name.unwrap_or_default(),
        email: user.email.unwrap_or_default(),
        cpf_value: user.cpf.unwrap_or_default(),
        phone_value: user.phone.unwrap_or_default(),
        cep_value: user.cep.unwrap_or_default(),
        city_value: user.city.unwrap_or_default(),
        state_value: user.state.unwrap_or_default(),
        role_label: role_label(user.role.as_deref()),
        referral_code: user.referral_code.unwrap_or_default(),
        profile_complete: user.profile_complete.unwrap_or(0) == 1,
        has_notice: !notice_message.is_empty(),
        notice_message,
    }))
}

fn role_label(role: Option<&str>) -> String {
    match role.unwrap_or("") {
        "supporter" => "Apoiador",
        "establishment" => "Estabelecimento",
        "group" => "Grupo esportivo",
        "admin" => "Administrador",
        _ => "Visitante",
    }
    .to_string()
}

#[derive(Debug, Deserialize)]
pub struct ProfileUpdateForm {
    pub cpf: String,
    pub telefone: String,
    pub cep: String,
    pub cidade: Option<String>,
    pub estado: Option<String>,
}

#[derive(Debug)]
pub enum ProfileUpdateOutcome {
    Updated,
    Invalid(Vec<FieldError>),
}

/// Profile completion. City/state come from the CEP lookup when the form
/// left them blank; a lookup failure just leaves them for manual entry.
pub async fn update_profile(
    pool: &SqlitePool,
    user_id: &str,
    form: &ProfileUpdateForm,
) -> sqlx::Result<ProfileUpdateOutcome> {
    let mut errors = Vec::new();
    let cpf = match validate_cpf(&form.cpf) {
        Ok(v) => v,
        Err(msg) => {
            errors.push(FieldError {
                field: "cpf",
                message: msg.to_string(),
            });
            String::new()
        }
    };
    let phone = match validate_phone(&form.telefone) {
        Ok(v) => v,
        Err(msg) => {
            errors.push(FieldError {
                field: "telefone",
                message: msg.to_string(),
            });
            String::new()
        }
    };
    let cep = match validate_cep(&form.cep) {
        Ok(v) => v,
        Err(msg) => {
            errors.push(FieldError {
                field: "cep",
                message: msg.to_string(),
            });
            String::new()
        }
    };
    if !errors.is_empty() {
        return Ok(ProfileUpdateOutcome::Invalid(errors));
    }

    let mut city = form
        .cidade
        .as_deref()
        .map(str::trim)
        .unwrap_or("")
        .to_string();
    let mut state = form
        .estado
        .as_deref()
        .map(str::trim)
        .unwrap_or("")
        .to_string();
    if city.is_empty() || state.is_empty() {
        match cep_service::lookup_cep(&cep).await {
            Ok(Some(address)) => {
                if city.is_empty() {
                    city = address.city;
                }
                if state.is_empty() {
                    state = address.state;
                }
            }
            Ok(None) => {}
            Err(()) => warn!("CEP lookup unavailable during profile update"),
        }
    }

    user_repo::update_profile(pool, user_id, &cpf, &phone, &cep, &city, &state).await?;
    Ok(ProfileUpdateOutcome::Updated)
}

/// Admin gate for /admin routes. Lookup failures count as "not admin".
pub async fn is_admin(pool: &SqlitePool, user_id: &str) -> bool {
    match user_repo::load_role(pool, user_id).await {
        Ok(role) => role.as_deref() == Some("admin"),
        Err(e) => {
            warn!("Role lookup failed for {}: {}", user_id, e);
            false
        }
    }
}
