use sqlx::SqlitePool;
use uuid::Uuid;

const SQL_NEXT_POSITION: &str = r#"
SELECT COALESCE(MAX(position), 0) + 1
FROM waitlist_entries
"#;

const SQL_INSERT_ENTRY: &str = r#"
INSERT INTO waitlist_entries (
  entry_id,
  email,
  city,
  interest,
  position,
  created_at
) VALUES (?, ?, ?, ?, ?, datetime('now'))
"#;

/// Append to the waitlist and return the assigned position. The position
/// counter and the insert share a transaction; a duplicate email surfaces as
/// the UNIQUE violation for the caller to translate.
pub async fn insert_entry(
    pool: &SqlitePool,
    email: &str,
    city: Option<&str>,
    interest: Option<&str>,
) -> sqlx::Result<i64> {
    let mut tx = pool.begin().await?;
    let position: i64 = sqlx::query_scalar(SQL_NEXT_POSITION)
        .fetch_one(&mut *tx)
        .await?;
    sqlx::query(SQL_INSERT_ENTRY)
        .bind(Uuid::new_v4().to_string())
        .bind(email)
        .bind(city)
        .bind(interest)
        .bind(position)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;
    Ok(position)
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
            CREATE TABLE waitlist_entries (
              entry_id TEXT PRIMARY KEY,
              email TEXT NOT NULL UNIQUE,
              city TEXT,
              interest TEXT,
              position INTEGER NOT NULL,
              created_at TEXT
            )
            "#,
        )
        .execute(&pool)
        .await
        .unwrap();
        pool
    }

    #[tokio::test]
    async fn positions_are_sequential() {
        let pool = test_pool().await;
        assert_eq!(
            insert_entry(&pool, "a@b.com", Some("São Paulo"), None)
                .await
                .unwrap(),
            1
        );
        assert_eq!(insert_entry(&pool, "c@d.com", None, None).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let pool = test_pool().await;
        insert_entry(&pool, "a@b.com", None, None).await.unwrap();
        let err = insert_entry(&pool, "a@b.com", None, None).await.unwrap_err();
        assert!(err.to_string().to_uppercase().contains("UNIQUE"));
    }
}
