use askama::Template;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse},
    Extension,
};
use sqlx::SqlitePool;
use tracing::warn;

use crate::services::search_service::{self, DirectoryQuery, DirectoryScope};
use crate::web::middleware::auth::AuthenticatedUser;

#[derive(Template)]
#[template(path = "directory.html")]
pub struct DirectoryTemplate {
    pub title: String,
    pub show_establishments: bool,
    pub show_groups: bool,
    pub establishments: Vec<search_service::ListingCardView>,
    pub groups: Vec<search_service::ListingCardView>,
    pub total: usize,
    pub filters: search_service::AppliedSearchFilters,
    pub sport_options: Vec<search_service::SportOptionView>,
    pub form_action: String,
}

async fn directory_response(
    pool: &SqlitePool,
    query: &DirectoryQuery,
    scope: DirectoryScope,
    form_action: &str,
) -> axum::response::Response {
    let data = match search_service::build_directory_page(pool, query, scope).await {
        Ok(data) => data,
        Err(e) => {
            warn!("Directory load failed: {}", e);
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let template = DirectoryTemplate {
        title: data.title,
        show_establishments: scope != DirectoryScope::Groups,
        show_groups: scope != DirectoryScope::Establishments,
        establishments: data.establishments,
        groups: data.groups,
        total: data.total,
        filters: data.filters,
        sport_options: data.sport_options,
        form_action: form_action.to_string(),
    };
    Html(template.render().unwrap()).into_response()
}

pub async fn busca_handler(
    Extension(_auth_user): Extension<AuthenticatedUser>,
    Query(query): Query<DirectoryQuery>,
    State(pool): State<SqlitePool>,
) -> impl IntoResponse {
    directory_response(&pool, &query, DirectoryScope::All, "/busca").await
}

pub async fn establishments_handler(
    Extension(_auth_user): Extension<AuthenticatedUser>,
    Query(query): Query<DirectoryQuery>,
    State(pool): State<SqlitePool>,
) -> impl IntoResponse {
    directory_response(
        &pool,
        &query,
        DirectoryScope::Establishments,
        "/estabelecimentos",
    )
    .await
}

pub async fn groups_handler(
    Extension(_auth_user): Extension<AuthenticatedUser>,
    Query(query): Query<DirectoryQuery>,
    State(pool): State<SqlitePool>,
) -> impl IntoResponse {
    directory_response(&pool, &query, DirectoryScope::Groups, "/grupos").await
}
