use askama::Template;
use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Redirect},
    Extension, Form,
};
use serde::Deserialize;
use sqlx::SqlitePool;
use tracing::warn;

use crate::services::promo_service::{self, PromoStatsView};
use crate::web::middleware::auth::AuthenticatedUser;

#[derive(Debug, Deserialize)]
pub struct PromoForm {
    pub codigo: String,
}

pub async fn promo_apply_handler(
    Extension(auth_user): Extension<AuthenticatedUser>,
    State(pool): State<SqlitePool>,
    Form(form): Form<PromoForm>,
) -> impl IntoResponse {
    let notice = match promo_service::apply_code(&pool, &auth_user.id, &form.codigo).await {
        Ok(notice) => notice,
        Err(e) => {
            warn!("Promo apply failed: {}", e);
            "error"
        }
    };
    Redirect::to(&format!("/perfil?notice={}", notice))
}

#[derive(Template)]
#[template(path = "admin_promos.html")]
pub struct AdminPromosTemplate {
    pub stats: Vec<PromoStatsView>,
}

/// Usage dashboard, admin only. Non-admins get 404, not 403: the route's
/// existence is not advertised.
pub async fn admin_promos_handler(
    Extension(auth_user): Extension<AuthenticatedUser>,
    State(pool): State<SqlitePool>,
) -> impl IntoResponse {
    if !auth_user.is_admin {
        return StatusCode::NOT_FOUND.into_response();
    }

    let stats = match promo_service::load_usage_stats(&pool).await {
        Ok(stats) => stats,
        Err(e) => {
            warn!("Promo stats load failed: {}", e);
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let template = AdminPromosTemplate { stats };
    Html(template.render().unwrap()).into_response()
}
