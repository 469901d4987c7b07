use askama::Template;
use axum::{
    extract::State,
    http::header,
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use cookie::Cookie;
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::SqlitePool;
use tracing::{error, warn};

use crate::database::auth_events_repo;

const LOGIN_RATE_LIMIT: i64 = 10;
const LOGIN_RATE_WINDOW: &str = "-15 minutes";

#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub error_message: String,
}

#[derive(Deserialize)]
pub struct LoginForm {
    email: String,
    senha: String,
}

#[derive(Deserialize, Serialize)]
struct AuthResponse {
    access_token: String,
    refresh_token: String,
}

#[derive(Deserialize)]
struct AuthServiceResponse {
    #[serde(rename = "success")]
    _success: bool,
    data: AuthResponse,
}

fn auth_api_url() -> String {
    std::env::var("AUTH_API_URL")
        .unwrap_or_else(|_| "http://auth.localhost:8080/api/v1/auth".to_string())
}

pub async fn login_page() -> Html<String> {
    let template = LoginTemplate {
        error_message: String::new(),
    };
    Html(template.render().unwrap())
}

fn login_error(message: impl Into<String>) -> Html<String> {
    let template = LoginTemplate {
        error_message: message.into(),
    };
    Html(template.render().unwrap())
}

/// Forwards the credentials to the hosted auth provider and stores the
/// returned token pair as HttpOnly cookies. No retry: a failed attempt
/// re-renders the form and the user tries again.
pub async fn login_handler(
    State(pool): State<SqlitePool>,
    Form(form): Form<LoginForm>,
) -> Result<Response, Html<String>> {
    let identifier = form.email.trim().to_lowercase();
    match auth_events_repo::count_recent(&pool, "login", &identifier, LOGIN_RATE_WINDOW).await {
        Ok(recent) if recent >= LOGIN_RATE_LIMIT => {
            return Err(login_error(
                "Muitas tentativas de login. Aguarde alguns minutos.",
            ));
        }
        Ok(_) => {}
        Err(e) => warn!("Login rate-limit check failed: {}", e),
    }
    if let Err(e) = auth_events_repo::log_event(&pool, "login", &identifier).await {
        warn!("Login event log failed: {}", e);
    }

    let client = reqwest::Client::new();
    let url = format!("{}/login", auth_api_url().trim_end_matches('/'));

    let response = client
        .post(&url)
        .json(&json!({
            "email": form.email,
            "password": form.senha,
        }))
        .send()
        .await;

    let resp = match response {
        Ok(resp) => resp,
        Err(e) => {
            error!("Auth provider unreachable: {}", e);
            return Err(login_error("Não foi possível falar com o servidor de login. Tente novamente."));
        }
    };

    let status = resp.status();
    if !status.is_success() {
        error!("Auth provider error: {}", status);
        return Err(login_error("E-mail ou senha incorretos."));
    }

    let body_text = resp.text().await.unwrap_or_default();
    let auth_resp: AuthResponse = match serde_json::from_str::<AuthServiceResponse>(&body_text) {
        Ok(wrapper) => wrapper.data,
        Err(e) => {
            error!("Auth response parse failed: {}", e);
            return Err(login_error("Resposta inesperada do servidor de login."));
        }
    };

    let mut access_cookie = Cookie::new("access_token", auth_resp.access_token.clone());
    access_cookie.set_path("/");
    access_cookie.set_http_only(true);
    access_cookie.set_same_site(cookie::SameSite::Lax);

    let mut refresh_cookie = Cookie::new("refresh_token", auth_resp.refresh_token);
    refresh_cookie.set_path("/");
    refresh_cookie.set_http_only(true);
    refresh_cookie.set_same_site(cookie::SameSite::Lax);

    let mut response = Redirect::to("/busca").into_response();
    response.headers_mut().append(
        header::SET_COOKIE,
        access_cookie.to_string().parse().unwrap(),
    );
    response.headers_mut().append(
        header::SET_COOKIE,
        refresh_cookie.to_string().parse().unwrap(),
    );

    Ok(response)
}

pub async fn logout_handler() -> Response {
    // Clear cookies
    let mut access_cookie = Cookie::new("access_token", "");
    access_cookie.set_path("/");
    access_cookie.set_http_only(true);
    access_cookie.set_same_site(cookie::SameSite::Lax);
    access_cookie.set_max_age(None);

    let mut refresh_cookie = Cookie::new("refresh_token", "");
    refresh_cookie.set_path("/");
    refresh_cookie.set_http_only(true);
    refresh_cookie.set_same_site(cookie::SameSite::Lax);
    refresh_cookie.set_max_age(None);

    let mut response = Redirect::to("/login").into_response();
    response.headers_mut().append(
        header::SET_COOKIE,
        access_cookie.to_string().parse().unwrap(),
    );
    response.headers_mut().append(
        header::SET_COOKIE,
        refresh_cookie.to_string().parse().unwrap(),
    );

    response
}
