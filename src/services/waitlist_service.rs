use serde::Deserialize;
use sqlx::SqlitePool;
use tracing::warn;

use crate::database::waitlist_repo;
use crate::services::validation::validate_email;

#[derive(Debug, Deserialize)]
pub struct WaitlistForm {
    pub email: String,
    pub cidade: Option<String>,
    pub interesse: Option<String>,
}

/// Waitlist signup from the landing pages. Returns a notice code; the
/// assigned position only matters for the success message.
pub async fn join_waitlist(pool: &SqlitePool, form: &WaitlistForm) -> sqlx::Result<String> {
    let Ok(email) = validate_email(&form.email) else {
        return Ok("waitlist_invalid".to_string());
    };

    let city = form
        .cidade
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());
    let interest = form
        .interesse
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());

    match waitlist_repo::insert_entry(pool, &email, city, interest).await {
        Ok(position) => {
            tracing::info!("waitlist signup #{} for {}", position, email);
            Ok("waitlist_ok".to_string())
        }
        Err(e) if e.to_string().to_uppercase().contains("UNIQUE") => {
            Ok("waitlist_duplicate".to_string())
        }
        Err(e) => {
            warn!("Waitlist insert failed: {}", e);
            Err(e)
        }
    }
}
