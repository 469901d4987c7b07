use askama::Template;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect},
    Extension, Form,
};
use serde::Deserialize;
use sqlx::SqlitePool;
use tracing::warn;

use crate::services::user_service::{self, ProfileUpdateForm, ProfileUpdateOutcome, ProfileView};
use crate::web::middleware::auth::AuthenticatedUser;

pub struct FieldErrorView {
    pub field: String,
    pub message: String,
}

#[derive(Template)]
#[template(path = "profile.html")]
pub struct ProfileTemplate {
    pub profile: ProfileView,
    pub errors: Vec<FieldErrorView>,
    pub has_errors: bool,
}

#[derive(Debug, Deserialize, Default)]
pub struct ProfileQuery {
    pub notice: Option<String>,
}

pub async fn profile_page(
    Extension(auth_user): Extension<AuthenticatedUser>,
    Query(query): Query<ProfileQuery>,
    State(pool): State<SqlitePool>,
) -> impl IntoResponse {
    render_profile(&pool, &auth_user.id, query.notice.as_deref(), Vec::new()).await
}

async fn render_profile(
    pool: &SqlitePool,
    user_id: &str,
    notice: Option<&str>,
    errors: Vec<FieldErrorView>,
) -> axum::response::Response {
    let view = match user_service::load_profile_view(pool, user_id, notice).await {
        Ok(v) => v,
        Err(e) => {
            warn!("Profile load failed for {}: {}", user_id, e);
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let Some(view) = view else {
        return StatusCode::NOT_FOUND.into_response();
    };

    let template = ProfileTemplate {
        profile: view,
        has_errors: !errors.is_empty(),
        errors,
    };
    Html(template.render().unwrap()).into_response()
}

pub async fn profile_update_handler(
    Extension(auth_user): Extension<AuthenticatedUser>,
    State(pool): State<SqlitePool>,
    Form(form): Form<ProfileUpdateForm>,
) -> impl IntoResponse {
    match user_service::update_profile(&pool, &auth_user.id, &form).await {
        Ok(ProfileUpdateOutcome::Updated) => {
            Redirect::to("/perfil?notice=profile_ok").into_response()
        }
        Ok(ProfileUpdateOutcome::Invalid(errors)) => {
            let errors = errors
                .into_iter()
                .map(|e| FieldErrorView {
                    field: e.field.to_string(),
                    message: e.message,
                })
                .collect();
            render_profile(&pool, &auth_user.id, None, errors).await
        }
        Err(e) => {
            warn!("Profile update failed for {}: {}", auth_user.id, e);
            Redirect::to("/perfil?notice=error").into_response()
        }
    }
}
