use axum::{extract::Path, response::IntoResponse, Json};
use serde_json::json;

use crate::services::cep_service;

/// CEP lookup used by the registration and profile forms to autofill the
/// address. Failures degrade to an empty result so the form never blocks.
pub async fn cep_lookup_handler(Path(cep): Path<String>) -> impl IntoResponse {
    match cep_service::lookup_cep(&cep).await {
        Ok(Some(address)) => Json(json!({ "found": true, "address": address })),
        Ok(None) => Json(json!({ "found": false })),
        Err(()) => Json(json!({ "found": false, "degraded": true })),
    }
}
