use sqlx::SqlitePool;
use uuid::Uuid;

use crate::models::{PromoCodeRow, PromoUsageRow};

const SQL_LOAD_CODE: &str = r#"
SELECT code, description, max_uses, used_count, expires_at, is_active
FROM promo_codes
WHERE code = ?1
"#;

const SQL_ALREADY_REDEEMED: &str = r#"
SELECT COUNT(*)
FROM promo_redemptions
WHERE code = ?1 AND user_id = ?2
"#;

// The guard rides on the UPDATE itself: two concurrent redemptions of the
// last slot race on rows_affected, not on a stale SELECT.
const SQL_CONSUME_USE: &str = r#"
UPDATE promo_codes
SET used_count = used_count + 1
WHERE code = ?1 AND used_count < max_uses
"#;

const SQL_INSERT_REDEMPTION: &str = r#"
INSERT INTO promo_redemptions (
  redemption_id,
  code,
  user_id,
  redeemed_at
) VALUES (?, ?, ?, datetime('now'))
"#;

const SQL_USAGE_STATS: &str = r#"
SELECT
    p.code, p.description, p.max_uses, p.used_count,
    COUNT(r.redemption_id) AS redemption_count
FROM promo_codes p
LEFT JOIN promo_redemptions r ON r.code = p.code
GROUP BY p.code
ORDER BY p.code
"#;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromoOutcome {
    Applied,
    NotFound,
    Inactive,
    Expired,
    Exhausted,
    AlreadyRedeemed,
}

/// Apply a promo code for a user: one guarded counter increment plus the
/// redemption record, in a single transaction.
pub async fn apply_promo_code(
    pool: &SqlitePool,
    code: &str,
    user_id: &str,
) -> sqlx::Result<PromoOutcome> {
    let mut tx = pool.begin().await?;

    let Some(promo) = sqlx::query_as::<_, PromoCodeRow>(SQL_LOAD_CODE)
        .bind(code)
        .fetch_optional(&mut *tx)
        .await?
    else {
        return Ok(PromoOutcome::NotFound);
    };

    if promo.is_active == 0 {
        return Ok(PromoOutcome::Inactive);
    }

    if let Some(expires_at) = promo.expires_at.as_deref() {
        let expired: i64 = sqlx::query_scalar("SELECT datetime(?1) < datetime('now')")
            .bind(expires_at)
            .fetch_one(&mut *tx)
            .await?;
        if expired == 1 {
            return Ok(PromoOutcome::Expired);
        }
    }

    let redeemed: i64 = sqlx::query_scalar(SQL_ALREADY_REDEEMED)
        .bind(code)
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await?;
    if redeemed > 0 {
        return Ok(PromoOutcome::AlreadyRedeemed);
    }

    let consumed = sqlx::query(SQL_CONSUME_USE)
        .bind(code)
        .execute(&mut *tx)
        .await?;
    if consumed.rows_affected() == 0 {
        return Ok(PromoOutcome::Exhausted);
    }

    sqlx::query(SQL_INSERT_REDEMPTION)
        .bind(Uuid::new_v4().to_string())
        .bind(code)
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(PromoOutcome::Applied)
}

pub async fn usage_stats(pool: &SqlitePool) -> sqlx::Result<Vec<PromoUsageRow>> {
    sqlx::query_as::<_, PromoUsageRow>(SQL_USAGE_STATS)
        .fetch_all(pool)
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
        for ddl in [
            r#"
            CREATE TABLE promo_codes (
              code TEXT PRIMARY KEY,
              description TEXT,
              max_uses INTEGER NOT NULL,
              used_count INTEGER NOT NULL DEFAULT 0,
              expires_at TEXT,
              is_active INTEGER NOT NULL DEFAULT 1
            )
            "#,
            r#"
            CREATE TABLE promo_redemptions (
              redemption_id TEXT PRIMARY KEY,
              code TEXT NOT NULL,
              user_id TEXT NOT NULL,
              redeemed_at TEXT,
              UNIQUE (code, user_id)
            )
            "#,
        ] {
            sqlx::query(ddl).execute(&pool).await.unwrap();
        }
        pool
    }

    async fn seed_code(pool: &SqlitePool, code: &str, max_uses: i64, expires_at: Option<&str>) {
        sqlx::query(
            "INSERT INTO promo_codes (code, description, max_uses, expires_at) VALUES (?, 'teste', ?, ?)",
        )
        .bind(code)
        .bind(max_uses)
        .bind(expires_at)
        .execute(pool)
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn applies_until_exhausted() {
        let pool = test_pool().await;
        seed_code(&pool, "BEMVINDO", 2, None).await;

        assert_eq!(
            apply_promo_code(&pool, "BEMVINDO", "u1").await.unwrap(),
            PromoOutcome::Applied
        );
        assert_eq!(
            apply_promo_code(&pool, "BEMVINDO", "u2").await.unwrap(),
            PromoOutcome::Applied
        );
        assert_eq!(
            apply_promo_code(&pool, "BEMVINDO", "u3").await.unwrap(),
            PromoOutcome::Exhausted
        );

        let stats = usage_stats(&pool).await.unwrap();
        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].used_count, 2);
        assert_eq!(stats[0].redemption_count, 2);
    }

    #[tokio::test]
    async fn same_user_cannot_redeem_twice() {
        let pool = test_pool().await;
        seed_code(&pool, "BEMVINDO", 10, None).await;

        apply_promo_code(&pool, "BEMVINDO", "u1").await.unwrap();
        assert_eq!(
            apply_promo_code(&pool, "BEMVINDO", "u1").await.unwrap(),
            PromoOutcome::AlreadyRedeemed
        );
    }

    #[tokio::test]
    async fn unknown_expired_and_inactive_codes_are_distinguished() {
        let pool = test_pool().await;
        seed_code(&pool, "VENCIDO", 10, Some("2020-01-01 00:00:00")).await;
        seed_code(&pool, "PAUSADO", 10, None).await;
        sqlx::query("UPDATE promo_codes SET is_active = 0 WHERE code = 'PAUSADO'")
            .execute(&pool)
            .await
            .unwrap();

        assert_eq!(
            apply_promo_code(&pool, "NAOEXISTE", "u1").await.unwrap(),
            PromoOutcome::NotFound
        );
        assert_eq!(
            apply_promo_code(&pool, "VENCIDO", "u1").await.unwrap(),
            PromoOutcome::Expired
        );
        assert_eq!(
            apply_promo_code(&pool, "PAUSADO", "u1").await.unwrap(),
            PromoOutcome::Inactive
        );
    }
}
