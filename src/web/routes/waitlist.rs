use axum::{
    extract::State,
    response::{IntoResponse, Redirect},
    Form,
};
use serde::Deserialize;
use sqlx::SqlitePool;
use tracing::warn;

use crate::services::waitlist_service::{self, WaitlistForm};

#[derive(Debug, Deserialize)]
pub struct WaitlistPostForm {
    pub email: String,
    pub cidade: Option<String>,
    pub interesse: Option<String>,
    pub return_to: Option<String>,
}

/// Waitlist signup posted from the landing pages; lands back on the page the
/// visitor came from, carrying the outcome notice.
pub async fn waitlist_handler(
    State(pool): State<SqlitePool>,
    Form(form): Form<WaitlistPostForm>,
) -> impl IntoResponse {
    let signup = WaitlistForm {
        email: form.email,
        cidade: form.cidade,
        interesse: form.interesse,
    };
    let notice = match waitlist_service::join_waitlist(&pool, &signup).await {
        Ok(notice) => notice,
        Err(e) => {
            warn!("Waitlist signup failed: {}", e);
            "error".to_string()
        }
    };

    let target = form
        .return_to
        .as_deref()
        .filter(|s| s.starts_with('/') && !s.starts_with("//") && !s.contains("://"))
        .unwrap_or("/como-funciona");
    let sep = if target.contains('?') { "&" } else { "?" };
    Redirect::to(&format!("{}{}notice={}", target, sep, notice))
}
