use sqlx::SqlitePool;
use uuid::Uuid;

const SQL_INSERT_EVENT: &str = r#"
INSERT INTO auth_events (
  event_id,
  kind,
  identifier,
  occurred_at
) VALUES (?, ?, ?, datetime('now'))
"#;

const SQL_COUNT_RECENT: &str = r#"
SELECT COUNT(*)
FROM auth_events
WHERE kind = ?1
  AND identifier = ?2
  AND datetime(occurred_at) >= datetime('now', ?3)
"#;

/// Rate-limit log. kind is login|registration; identifier is whatever the
/// caller limits on (email, normally).
pub async fn log_event(pool: &SqlitePool, kind: &str, identifier: &str) -> sqlx::Result<()> {
    sqlx::query(SQL_INSERT_EVENT)
        .bind(Uuid::new_v4().to_string())
        .bind(kind)
        .bind(identifier)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn count_recent(
    pool: &SqlitePool,
    kind: &str,
    identifier: &str,
    window: &str, // SQLite modifier, e.g. "-1 hour"
) -> sqlx::Result<i64> {
    sqlx::query_scalar(SQL_COUNT_RECENT)
        .bind(kind)
        .bind(identifier)
        .bind(window)
        .fetch_one(pool)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn test_pool() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        sqlx::query(
            r#"
            CREATE TABLE auth_events (
              event_id TEXT PRIMARY KEY,
              kind TEXT NOT NULL,
              identifier TEXT NOT NULL,
              occurred_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&pool)
        .await
        .unwrap();
        pool
    }

    #[tokio::test]
    async fn counts_only_matching_kind_and_identifier_in_window() {
        let pool = test_pool().await;
        log_event(&pool, "registration", "a@b.com").await.unwrap();
        log_event(&pool, "registration", "a@b.com").await.unwrap();
        log_event(&pool, "login", "a@b.com").await.unwrap();
        log_event(&pool, "registration", "outra@b.com").await.unwrap();
        // An old event outside the window.
        sqlx::query(
            "INSERT INTO auth_events (event_id, kind, identifier, occurred_at) \
             VALUES ('old', 'registration', 'a@b.com', datetime('now', '-2 hours'))",
        )
        .execute(&pool)
        .await
        .unwrap();

        let count = count_recent(&pool, "registration", "a@b.com", "-1 hour")
            .await
            .unwrap();
        assert_eq!(count, 2);
    }
}
