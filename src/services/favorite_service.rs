use sqlx::SqlitePool;
use uuid::Uuid;

use crate::database::{establishment_repo, favorite_commands_repo, group_repo};
use crate::database::favorite_commands_repo::NewFavorite;
use crate::search::Listing;
use crate::services::search_service::{
    establishment_to_listing, group_to_listing, listing_card, ListingCardView,
};

/// Toggle a favorite for the user and report the resulting state as a notice
/// code. Two rapid toggles race on the UNIQUE(user_id, listing_id) row; the
/// insert that loses the race still lands on "saved" because the stored state
/// is what it asked for.
pub async fn toggle_favorite(
    pool: &SqlitePool,
    user_id: &str,
    listing_id: &str,
    listing_kind: &str,
) -> sqlx::Result<&'static str> {
    if favorite_commands_repo::is_favorited(pool, user_id, listing_id).await? {
        favorite_commands_repo::delete_favorite(pool, user_id, listing_id).await?;
        return Ok("favorite_removed");
    }

    let favorite_id = Uuid::new_v4().to_string();
    let inserted = favorite_commands_repo::insert_favorite(
        pool,
        NewFavorite {
            favorite_id: &favorite_id,
            user_id,
            listing_id,
            listing_kind,
        },
    )
    .await;

    match inserted {
        Ok(_) => Ok("favorite_saved"),
        Err(e) if e.to_string().to_uppercase().contains("UNIQUE") => Ok("favorite_saved"),
        Err(e) => Err(e),
    }
}

pub struct FavoritesPageData {
    pub cards: Vec<ListingCardView>,
    pub total: usize,
    pub has_notice: bool,
    pub notice_message: String,
}

/// The favorites page re-reads the listing collections wholesale and joins
/// in memory, same as the directory views: the sets are small and the page
/// always reflects the reconciled stored state.
pub async fn build_favorites_page(
    pool: &SqlitePool,
    user_id: &str,
    notice: Option<&str>,
) -> sqlx::Result<FavoritesPageData> {
    let favorites = favorite_commands_repo::list_for_user(pool, user_id).await?;

    let establishments: Vec<Listing> = establishment_repo::list_all(pool, None, 500)
        .await?
        .into_iter()
        .map(establishment_to_listing)
        .collect();
    let groups: Vec<Listing> = group_repo::list_all(pool, None, 500)
        .await?
        .into_iter()
        .map(group_to_listing)
        .collect();

    let mut cards = Vec::new();
    for fav in &favorites {
        let listing = establishments
            .iter()
            .chain(groups.iter())
            .find(|l| l.id == fav.listing_id);
        if let Some(listing) = listing {
            cards.push(listing_card(listing, None));
        }
    }

    let notice_message = notice
        .map(crate::services::notice_message)
        .unwrap_or_default();
    Ok(FavoritesPageData {
        total: cards.len(),
        cards,
        has_notice: !notice_message.is_empty(),
        notice_message,
    })
}
