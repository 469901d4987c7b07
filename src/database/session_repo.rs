use sqlx::SqlitePool;

const SQL_DELETE_EXPIRED: &str = r#"
DELETE FROM sessions
WHERE datetime(expires_at) < datetime('now')
"#;

pub async fn delete_expired(pool: &SqlitePool) -> sqlx::Result<u64> {
    let res = sqlx::query(SQL_DELETE_EXPIRED).execute(pool).await?;
    Ok(res.rows_affected())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    #[tokio::test]
    async fn removes_only_expired_sessions() {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        sqlx::query(
            r#"
            CREATE TABLE sessions (
              token TEXT PRIMARY KEY,
              user_id TEXT NOT NULL,
              expires_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&pool)
        .await
        .unwrap();
        sqlx::query(
            "INSERT INTO sessions VALUES \
             ('velha', 'u1', datetime('now', '-1 day')), \
             ('valida', 'u1', datetime('now', '+1 day'))",
        )
        .execute(&pool)
        .await
        .unwrap();

        assert_eq!(delete_expired(&pool).await.unwrap(), 1);
        let left: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sessions")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(left, 1);
    }
}
