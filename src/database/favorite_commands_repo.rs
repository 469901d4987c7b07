use sqlx::SqlitePool;

use crate::models::FavoriteRow;

const SQL_INSERT_FAVORITE: &str = r#"
INSERT INTO favorites (
  favorite_id,
  user_id,
  listing_id,
  listing_kind,
  created_at
) VALUES (?, ?, ?, ?, datetime('now'))
"#;

const SQL_DELETE_FAVORITE: &str = r#"
DELETE FROM favorites
WHERE user_id = ?1 AND listing_id = ?2
"#;

const SQL_IS_FAVORITED: &str = r#"
SELECT COUNT(*)
FROM favorites
WHERE user_id = ?1 AND listing_id = ?2
"#;

const SQL_LIST_FOR_USER: &str = r#"
SELECT favorite_id, user_id, listing_id, listing_kind, created_at
FROM favorites
WHERE user_id = ?1
ORDER BY created_at DESC
"#;

pub struct NewFavorite<'a> {
    pub favorite_id: &'a str,
    pub user_id: &'a str,
    pub listing_id: &'a str,
    pub listing_kind: &'a str, // establishment|group
}

pub async fn insert_favorite(pool: &SqlitePool, fav: NewFavorite<'_>) -> sqlx::Result<u64> {
    let res = sqlx::query(SQL_INSERT_FAVORITE)
        .bind(fav.favorite_id)
        .bind(fav.user_id)
        .bind(fav.listing_id)
        .bind(fav.listing_kind)
        .execute(pool)
        .await?;
    Ok(res.rows_affected())
}

pub async fn delete_favorite(
    pool: &SqlitePool,
    user_id: &str,
    listing_id: &str,
) -> sqlx::Result<u64> {
    let res = sqlx::query(SQL_DELETE_FAVORITE)
        .bind(user_id)
        .bind(listing_id)
        .execute(pool)
        .await?;
    Ok(res.rows_affected())
}

pub async fn is_favorited(
    pool: &SqlitePool,
    user_id: &str,
    listing_id: &str,
) -> sqlx::Result<bool> {
    let count: i64 = sqlx::query_scalar(SQL_IS_FAVORITED)
        .bind(user_id)
        .bind(listing_id)
        .fetch_one(pool)
        .await?;
    Ok(count > 0)
}

pub async fn list_for_user(pool: &SqlitePool, user_id: &str) -> sqlx::Result<Vec<FavoriteRow>> {
    sqlx::query_as::<_, FavoriteRow>(SQL_LIST_FOR_USER)
        .bind(user_id)
        .fetch_all(pool)
        .await
}
