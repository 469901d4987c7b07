use sqlx::SqlitePool;

const SQL_LOAD_CURRENT_USER_ID: &str = r#"
SELECT user_id
FROM current_user
LIMIT 1
"#;

/// Offline/local fallback identity when no auth cookie is present.
pub async fn load_current_user_id(pool: &SqlitePool) -> sqlx::Result<Option<String>> {
    sqlx::query_scalar(SQL_LOAD_CURRENT_USER_ID)
        .fetch_optional(pool)
        .await
}
