use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use base64::{engine::general_purpose, Engine as _};
use serde::Deserialize;
use sqlx::SqlitePool;

use crate::database::current_user_repo;
use crate::services::user_service;

/// Session context for the request, resolved once here and torn down with
/// the request. Handlers never look at cookies or roles themselves.
#[derive(Clone, Debug)]
pub struct AuthenticatedUser {
    pub id: String,
    pub is_admin: bool,
}

#[derive(Deserialize)]
struct JwtPayload {
    sub: String,
}

pub async fn require_auth(State(pool): State<SqlitePool>, mut request: Request, next: Next) -> Response {
    // Extract cookies from request
    let token = request
        .headers()
        .get(header::COOKIE)
        .and_then(|hv| hv.to_str().ok())
        .and_then(|cookies| {
            cookies
                .split("; ")
                .find(|c| c.starts_with("access_token="))
                .and_then(|c| c.strip_prefix("access_token="))
        });

    if let Some(token) = token {
        // Parse JWT payload (middle part); the auth provider signed it, we
        // only read the subject.
        let parts: Vec<&str> = token.split('.').collect();
        if parts.len() == 3 {
            if let Ok(payload_bytes) = general_purpose::URL_SAFE_NO_PAD.decode(parts[1]) {
                if let Ok(payload) = serde_json::from_slice::<JwtPayload>(&payload_bytes) {
                    let is_admin = user_service::is_admin(&pool, &payload.sub).await;
                    request.extensions_mut().insert(AuthenticatedUser {
                        id: payload.sub,
                        is_admin,
                    });

                    return next.run(request).await;
                }
            }
        }
    }

    // Fallback for offline/local usage: use the current_user table
    if let Ok(Some(user_id)) = current_user_repo::load_current_user_id(&pool).await {
        let is_admin = user_service::is_admin(&pool, &user_id).await;
        request.extensions_mut().insert(AuthenticatedUser {
            id: user_id,
            is_admin,
        });
        return next.run(request).await;
    }

    // No valid token or parse error, return 401
    Response::builder()
        .status(401)
        .body(axum::body::Body::from("Não autorizado - faça login"))
        .unwrap()
}
