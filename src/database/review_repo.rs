use sqlx::SqlitePool;

use crate::models::ReviewRow;

const SQL_INSERT_REVIEW: &str = r#"
INSERT INTO reviews (
  review_id,
  user_id,
  listing_id,
  listing_kind,
  rating,
  comment,
  created_at
) VALUES (?, ?, ?, ?, ?, ?, datetime('now'))
"#;

const SQL_DELETE_OWN_REVIEW: &str = r#"
DELETE FROM reviews
WHERE user_id = ?1 AND listing_id = ?2
"#;

const SQL_LIST_FOR_LISTING: &str = r#"
SELECT
    r.review_id, r.user_id, r.listing_id, r.listing_kind, r.rating,
    r.comment, r.created_at, u.name AS author_name
FROM reviews r
LEFT JOIN users u ON u.user_id = r.user_id
WHERE r.listing_id = ?1
ORDER BY r.created_at DESC
"#;

const SQL_REFRESH_ESTABLISHMENT_AGGREGATES: &str = r#"
UPDATE establishments
SET average_rating = (
      SELECT COALESCE(AVG(rating), 0) FROM reviews WHERE listing_id = ?1
    ),
    review_count = (
      SELECT COUNT(*) FROM reviews WHERE listing_id = ?1
    )
WHERE establishment_id = ?1
"#;

const SQL_REFRESH_GROUP_AGGREGATES: &str = r#"
UPDATE sport_groups
SET average_rating = (
      SELECT COALESCE(AVG(rating), 0) FROM reviews WHERE listing_id = ?1
    ),
    review_count = (
      SELECT COUNT(*) FROM reviews WHERE listing_id = ?1
    )
WHERE group_id = ?1
"#;

pub struct NewReview<'a> {
    pub review_id: &'a str,
    pub user_id: &'a str,
    pub listing_id: &'a str,
    pub listing_kind: &'a str, // establishment|group
    pub rating: i64,
    pub comment: Option<&'a str>,
}

/// Insert a review and recompute the listing aggregates in one transaction,
/// so average_rating/review_count never drift from the stored reviews.
pub async fn insert_review_and_refresh(
    pool: &SqlitePool,
    review: NewReview<'_>,
) -> sqlx::Result<()> {
    let mut tx = pool.begin().await?;
    sqlx::query(SQL_INSERT_REVIEW)
        .bind(review.review_id)
        .bind(review.user_id)
        .bind(review.listing_id)
        .bind(review.listing_kind)
        .bind(review.rating)
        .bind(review.comment)
        .execute(&mut *tx)
        .await?;
    let refresh = match review.listing_kind {
        "group" => SQL_REFRESH_GROUP_AGGREGATES,
        _ => SQL_REFRESH_ESTABLISHMENT_AGGREGATES,
    };
    sqlx::query(refresh)
        .bind(review.listing_id)
        .execute(&mut *tx)
        .await?;
    tx.commit().await
}

pub async fn delete_review_and_refresh(
    pool: &SqlitePool,
    user_id: &str,
    listing_id: &str,
    listing_kind: &str,
) -> sqlx::Result<u64> {
    let mut tx = pool.begin().await?;
    let res = sqlx::query(SQL_DELETE_OWN_REVIEW)
        .bind(user_id)
        .bind(listing_id)
        .execute(&mut *tx)
        .await?;
    let refresh = match listing_kind {
        "group" => SQL_REFRESH_GROUP_AGGREGATES,
        _ => SQL_REFRESH_ESTABLISHMENT_AGGREGATES,
    };
    sqlx::query(refresh)
        .bind(listing_id)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;
    Ok(res.rows_affected())
}

pub async fn list_for_listing(
    pool: &SqlitePool,
    listing_id: &str,
) -> sqlx::Result<Vec<ReviewRow>> {
    sqlx::query_as::<_, ReviewRow>(SQL_LIST_FOR_LISTING)
        .bind(listing_id)
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
            CREATE TABLE reviews (
              review_id TEXT PRIMARY KEY,
              user_id TEXT NOT NULL,
              listing_id TEXT NOT NULL,
              listing_kind TEXT NOT NULL,
              rating INTEGER NOT NULL,
              comment TEXT,
              created_at TEXT,
              UNIQUE (user_id, listing_id)
            )
            "#,
            r#"
            CREATE TABLE users (
              user_id TEXT PRIMARY KEY,
              name TEXT
            )
            "#,
            r#"
            CREATE TABLE establishments (
              establishment_id TEXT PRIMARY KEY,
              average_rating REAL DEFAULT 0,
              review_count INTEGER DEFAULT 0
            )
            "#,
        ] {
            sqlx::query(ddl).execute(&pool).await.unwrap();
        }
        sqlx::query("INSERT INTO establishments (establishment_id) VALUES ('e1')")
            .execute(&pool)
            .await
            .unwrap();
        pool
    }

    async fn aggregates(pool: &SqlitePool) -> (f64, i64) {
        sqlx::query_as::<_, (f64, i64)>(
            "SELECT average_rating, review_count FROM establishments WHERE establishment_id = 'e1'",
        )
        .fetch_one(pool)
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn insert_refreshes_listing_aggregates() {
        let pool = test_pool().await;
        for (i, rating) in [5, 4].iter().enumerate() {
            insert_review_and_refresh(
                &pool,
                NewReview {
                    review_id: &format!("r{}", i),
                    user_id: &format!("u{}", i),
                    listing_id: "e1",
                    listing_kind: "establishment",
                    rating: *rating,
                    comment: None,
                },
            )
            .await
            .unwrap();
        }

        let (avg, count) = aggregates(&pool).await;
        assert!((avg - 4.5).abs() < 1e-9);
        assert_eq!(count, 2);
    }

    #[tokio::test]
    async fn delete_restores_the_zero_default() {
        let pool = test_pool().await;
        insert_review_and_refresh(
            &pool,
            NewReview {
                review_id: "r1",
                user_id: "u1",
                listing_id: "e1",
                listing_kind: "establishment",
                rating: 3,
                comment: Some("razoável"),
            },
        )
        .await
        .unwrap();

        assert_eq!(
            delete_review_and_refresh(&pool, "u1", "e1", "establishment")
                .await
                .unwrap(),
            1
        );
        let (avg, count) = aggregates(&pool).await;
        assert!(avg.abs() < 1e-9);
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn second_review_by_same_user_is_rejected() {
        let pool = test_pool().await;
        let review = |id: &'static str, rating: i64| NewReview {
            review_id: id,
            user_id: "u1",
            listing_id: "e1",
            listing_kind: "establishment",
            rating,
            comment: None,
        };
        insert_review_and_refresh(&pool, review("r1", 5)).await.unwrap();

        let err = insert_review_and_refresh(&pool, review("r2", 1))
            .await
            .unwrap_err();
        assert!(err.to_string().to_uppercase().contains("UNIQUE"));
        // The failed transaction must not have touched the aggregates.
        let (avg, count) = aggregates(&pool).await;
        assert!((avg - 5.0).abs() < 1e-9);
        assert_eq!(count, 1);
    }
}
