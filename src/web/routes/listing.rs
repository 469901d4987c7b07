use askama::Template;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect},
    Extension, Form,
};
use serde::Deserialize;
use sqlx::SqlitePool;
use tracing::warn;

use crate::search::ListingKind;
use crate::services::favorite_service;
use crate::services::listing_service::{self, ListingDetailView};
use crate::services::review_service;
use crate::web::middleware::auth::AuthenticatedUser;

#[derive(Template)]
#[template(path = "listing_detail.html")]
pub struct ListingDetailTemplate {
    pub listing: ListingDetailView,
    pub has_notice: bool,
    pub notice_message: String,
}

#[derive(Debug, Deserialize, Default)]
pub struct DetailQuery {
    pub notice: Option<String>,
}

async fn detail_response(
    pool: &SqlitePool,
    kind: ListingKind,
    listing_id: &str,
    viewer_id: &str,
    notice: Option<&str>,
) -> axum::response::Response {
    let view = match listing_service::load_listing_detail(pool, kind, listing_id, viewer_id).await
    {
        Ok(v) => v,
        Err(e) => {
            warn!("Listing detail load failed for {}: {}", listing_id, e);
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let Some(view) = view else {
        return StatusCode::NOT_FOUND.into_response();
    };

    let notice_message = notice
        .map(crate::services::notice_message)
        .unwrap_or_default();
    let template = ListingDetailTemplate {
        listing: view,
        has_notice: !notice_message.is_empty(),
        notice_message,
    };
    Html(template.render().unwrap()).into_response()
}

pub async fn establishment_detail_handler(
    Extension(auth_user): Extension<AuthenticatedUser>,
    Path(establishment_id): Path<String>,
    Query(query): Query<DetailQuery>,
    State(pool): State<SqlitePool>,
) -> impl IntoResponse {
    detail_response(
        &pool,
        ListingKind::Establishment,
        &establishment_id,
        &auth_user.id,
        query.notice.as_deref(),
    )
    .await
}

pub async fn group_detail_handler(
    Extension(auth_user): Extension<AuthenticatedUser>,
    Path(group_id): Path<String>,
    Query(query): Query<DetailQuery>,
    State(pool): State<SqlitePool>,
) -> impl IntoResponse {
    detail_response(
        &pool,
        ListingKind::Group,
        &group_id,
        &auth_user.id,
        query.notice.as_deref(),
    )
    .await
}

#[derive(Template)]
#[template(path = "favorites.html")]
pub struct FavoritesTemplate {
    pub cards: Vec<crate::services::search_service::ListingCardView>,
    pub total: usize,
    pub has_notice: bool,
    pub notice_message: String,
}

pub async fn favorites_handler(
    Extension(auth_user): Extension<AuthenticatedUser>,
    Query(query): Query<DetailQuery>,
    State(pool): State<SqlitePool>,
) -> impl IntoResponse {
    let data = match favorite_service::build_favorites_page(
        &pool,
        &auth_user.id,
        query.notice.as_deref(),
    )
    .await
    {
        Ok(data) => data,
        Err(e) => {
            warn!("Favorites load failed for {}: {}", auth_user.id, e);
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let template = FavoritesTemplate {
        cards: data.cards,
        total: data.total,
        has_notice: data.has_notice,
        notice_message: data.notice_message,
    };
    Html(template.render().unwrap()).into_response()
}

#[derive(Debug, Deserialize)]
pub struct FavoriteCommandForm {
    pub kind: String, // establishment|group
    pub return_to: Option<String>,
}

pub async fn favorite_command_handler(
    Extension(auth_user): Extension<AuthenticatedUser>,
    Path(listing_id): Path<String>,
    State(pool): State<SqlitePool>,
    Form(form): Form<FavoriteCommandForm>,
) -> impl IntoResponse {
    if form.kind != "establishment" && form.kind != "group" {
        return StatusCode::BAD_REQUEST.into_response();
    }

    let notice =
        match favorite_service::toggle_favorite(&pool, &auth_user.id, &listing_id, &form.kind)
            .await
        {
            Ok(notice) => notice,
            Err(e) => {
                warn!("Favorite toggle failed: {}", e);
                "error"
            }
        };

    redirect_with_notice(form.return_to.as_deref(), &listing_id, &form.kind, notice)
}

#[derive(Debug, Deserialize)]
pub struct ReviewCommandForm {
    pub kind: String,   // establishment|group
    pub action: String, // create|remove
    pub nota: Option<i64>,
    pub comentario: Option<String>,
    pub return_to: Option<String>,
}

pub async fn review_command_handler(
    Extension(auth_user): Extension<AuthenticatedUser>,
    Path(listing_id): Path<String>,
    State(pool): State<SqlitePool>,
    Form(form): Form<ReviewCommandForm>,
) -> impl IntoResponse {
    if form.kind != "establishment" && form.kind != "group" {
        return StatusCode::BAD_REQUEST.into_response();
    }

    let result = match form.action.as_str() {
        "create" => {
            review_service::create_review(
                &pool,
                &auth_user.id,
                &listing_id,
                &form.kind,
                form.nota.unwrap_or(0),
                form.comentario.as_deref(),
            )
            .await
        }
        "remove" => {
            review_service::remove_review(&pool, &auth_user.id, &listing_id, &form.kind).await
        }
        _ => return StatusCode::BAD_REQUEST.into_response(),
    };

    let notice = match result {
        Ok(notice) => notice,
        Err(e) => {
            warn!("Review command failed: {}", e);
            "error"
        }
    };

    redirect_with_notice(form.return_to.as_deref(), &listing_id, &form.kind, notice)
}

fn redirect_with_notice(
    return_to: Option<&str>,
    listing_id: &str,
    kind: &str,
    notice: &str,
) -> axum::response::Response {
    if let Some(target) = return_to.and_then(sanitize_return_to) {
        let sep = if target.contains('?') { "&" } else { "?" };
        return Redirect::to(&format!("{}{}notice={}", target, sep, notice)).into_response();
    }

    let base = match kind {
        "group" => "/grupos",
        _ => "/estabelecimentos",
    };
    Redirect::to(&format!("{}/{}?notice={}", base, listing_id, notice)).into_response()
}

fn sanitize_return_to(target: &str) -> Option<String> {
    let t = target.trim();
    if t.starts_with('/') && !t.starts_with("//") && !t.contains("://") {
        Some(t.to_string())
    } else {
        None
    }
}
