use sqlx::SqlitePool;
use uuid::Uuid;

use crate::database::review_repo;
use crate::database::review_repo::NewReview;

/// Create a review and return the notice code for the redirect. A duplicate
/// (the user already reviewed this listing) is reported as its own notice
/// instead of a generic error.
pub async fn create_review(
    pool: &SqlitePool,
    user_id: &str,
    listing_id: &str,
    listing_kind: &str,
    rating: i64,
    comment: Option<&str>,
) -> sqlx::Result<&'static str> {
    if !(1..=5).contains(&rating) {
        return Ok("invalid_rating");
    }

    let review_id = Uuid::new_v4().to_string();
    let comment = comment.map(str::trim).filter(|s| !s.is_empty());
    let result = review_repo::insert_review_and_refresh(
        pool,
        NewReview {
            review_id: &review_id,
            user_id,
            listing_id,
            listing_kind,
            rating,
            comment,
        },
    )
    .await;

    match result {
        Ok(()) => Ok("review_ok"),
        Err(e) => {
            let msg = e.to_string().to_lowercase();
            if msg.contains("unique") || msg.contains("duplicate") {
                Ok("already_reviewed")
            } else {
                Err(e)
            }
        }
    }
}

pub async fn remove_review(
    pool: &SqlitePool,
    user_id: &str,
    listing_id: &str,
    listing_kind: &str,
) -> sqlx::Result<&'static str> {
    review_repo::delete_review_and_refresh(pool, user_id, listing_id, listing_kind).await?;
    Ok("review_removed")
}
