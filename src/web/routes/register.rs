use askama::Template;
use axum::{
    extract::{Query, State},
    response::{Html, IntoResponse, Redirect},
    Form,
};
use serde::Deserialize;
use sqlx::SqlitePool;
use tracing::warn;

use crate::services::registration_service::{
    self, FieldError, RegistrationForm, RegistrationOutcome,
};

pub struct FieldErrorView {
    pub field: String,
    pub message: String,
}

#[derive(Template)]
#[template(path = "register.html")]
pub struct RegisterTemplate {
    pub selected_kind: String,
    pub errors: Vec<FieldErrorView>,
    pub has_errors: bool,
    pub banner_message: String,
    pub has_banner: bool,
}

#[derive(Debug, Deserialize, Default)]
pub struct RegisterPageQuery {
    pub tipo: Option<String>,
}

pub async fn register_page(Query(query): Query<RegisterPageQuery>) -> Html<String> {
    let template = RegisterTemplate {
        selected_kind: query.tipo.unwrap_or_else(|| "apoiador".to_string()),
        errors: Vec::new(),
        has_errors: false,
        banner_message: String::new(),
        has_banner: false,
    };
    Html(template.render().unwrap())
}

fn error_page(selected_kind: String, errors: Vec<FieldError>, banner: &str) -> Html<String> {
    let errors: Vec<FieldErrorView> = errors
        .into_iter()
        .map(|e| FieldErrorView {
            field: e.field.to_string(),
            message: e.message,
        })
        .collect();
    let template = RegisterTemplate {
        selected_kind,
        has_errors: !errors.is_empty(),
        errors,
        banner_message: banner.to_string(),
        has_banner: !banner.is_empty(),
    };
    Html(template.render().unwrap())
}

/// Final wizard submit. The flat form becomes the tagged request here, at
/// the boundary; everything after works on the typed payload.
pub async fn register_handler(
    State(pool): State<SqlitePool>,
    Form(form): Form<RegistrationForm>,
) -> impl IntoResponse {
    let selected_kind = form.tipo.clone().unwrap_or_else(|| "apoiador".to_string());

    let request = match form.into_request() {
        Ok(request) => request,
        Err(errors) => return error_page(selected_kind, errors, "").into_response(),
    };

    match registration_service::register(&pool, request).await {
        Ok(RegistrationOutcome::Created { referral_code, .. }) => {
            Redirect::to(&format!("/login?cadastro=ok&indicacao={}", referral_code))
                .into_response()
        }
        Ok(RegistrationOutcome::Invalid(errors)) => {
            error_page(selected_kind, errors, "").into_response()
        }
        Ok(RegistrationOutcome::RateLimited) => error_page(
            selected_kind,
            Vec::new(),
            "Muitas tentativas de cadastro. Aguarde uma hora e tente novamente.",
        )
        .into_response(),
        Ok(RegistrationOutcome::EmailTaken) => error_page(
            selected_kind,
            Vec::new(),
            "Este e-mail já está cadastrado. Faça login ou recupere sua senha.",
        )
        .into_response(),
        Ok(RegistrationOutcome::CpfTaken) => error_page(
            selected_kind,
            Vec::new(),
            "Este CPF já está cadastrado.",
        )
        .into_response(),
        Err(e) => {
            warn!("Registration failed: {}", e);
            error_page(
                selected_kind,
                Vec::new(),
                "Não foi possível concluir o cadastro. Tente novamente.",
            )
            .into_response()
        }
    }
}
