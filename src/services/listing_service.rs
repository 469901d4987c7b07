use sqlx::SqlitePool;

use crate::database::{establishment_repo, favorite_commands_repo, group_repo, review_repo};
use crate::models::ReviewRow;
use crate::search::{Listing, ListingKind};
use crate::services::search_service::{establishment_to_listing, group_to_listing};

pub struct ReviewView {
    pub author: String,
    pub rating: i64,
    pub stars: String,
    pub comment: String,
    pub created_at: String,
    pub is_own: bool,
}

pub struct ListingDetailView {
    pub listing_id: String,
    pub kind: String,
    pub kind_label: String,
    pub name: String,
    pub city: String,
    pub description: String,
    pub sports: Vec<String>,
    pub rating_label: String,
    pub review_count: i64,
    pub has_photo: bool,
    pub photo_url: String,
    pub address: String,
    pub price_label: String,
    pub schedule_label: String,
    pub member_count_label: String,
    pub is_favorited: bool,
    pub viewer_has_review: bool,
    pub reviews: Vec<ReviewView>,
    pub favorite_action: String,
    pub review_action: String,
    pub return_path: String,
}

pub async fn load_listing_detail(
    pool: &SqlitePool,
    kind: ListingKind,
    listing_id: &str,
    viewer_user_id: &str,
) -> sqlx::Result<Option<ListingDetailView>> {
    let (listing, address, price_label, schedule_label, member_count_label) = match kind {
        ListingKind::Establishment => {
            let Some(row) = establishment_repo::load_by_id(pool, listing_id).await? else {
                return Ok(None);
            };
            let address = row.address.clone().unwrap_or_default();
            let price_label = row
                .price_level
                .filter(|p| (1..=4).contains(p))
                .map(|p| "$".repeat(p as usize))
                .unwrap_or_default();
            (
                establishment_to_listing(row),
                address,
                price_label,
                String::new(),
                String::new(),
            )
        }
        ListingKind::Group => {
            let Some(row) = group_repo::load_by_id(pool, listing_id).await? else {
                return Ok(None);
            };
            let schedule = row.meeting_schedule.clone().unwrap_or_default();
            let members = row
                .member_count
                .filter(|m| *m > 0)
                .map(|m| format!("{} integrantes", m))
                .unwrap_or_default();
            (
                group_to_listing(row),
                String::new(),
                String::new(),
                schedule,
                members,
            )
        }
    };

    let is_favorited =
        favorite_commands_repo::is_favorited(pool, viewer_user_id, listing_id).await?;
    let review_rows = review_repo::list_for_listing(pool, listing_id).await?;
    let reviews: Vec<ReviewView> = review_rows
        .iter()
        .map(|r| review_view(r, viewer_user_id))
        .collect();
    let viewer_has_review = reviews.iter().any(|r| r.is_own);

    Ok(Some(detail_view(
        listing,
        address,
        price_label,
        schedule_label,
        member_count_label,
        is_favorited,
        viewer_has_review,
        reviews,
    )))
}

#[allow(clippy::too_many_arguments)]
fn detail_view(
    listing: Listing,
    address: String,
    price_label: String,
    schedule_label: String,
    member_count_label: String,
    is_favorited: bool,
    viewer_has_review: bool,
    reviews: Vec<ReviewView>,
) -> ListingDetailView {
    let (kind, kind_label, base_path) = match listing.kind {
        ListingKind::Establishment => ("establishment", "Estabelecimento", "/estabelecimentos"),
        ListingKind::Group => ("group", "Grupo", "/grupos"),
    };
    ListingDetailView {
        kind: kind.to_string(),
        kind_label: kind_label.to_string(),
        name: listing.name,
        city: listing.city,
        description: listing.description,
        sports: listing.sports,
        rating_label: format!("{:.1}", listing.average_rating),
        review_count: listing.review_count,
        has_photo: listing.main_photo_url.is_some(),
        photo_url: listing.main_photo_url.unwrap_or_default(),
        address,
        price_label,
        schedule_label,
        member_count_label,
        is_favorited,
        viewer_has_review,
        reviews,
        favorite_action: format!("/listings/{}/favorite", listing.id),
        review_action: format!("/listings/{}/reviews", listing.id),
        return_path: format!("{}/{}", base_path, listing.id),
        listing_id: listing.id,
    }
}

fn review_view(row: &ReviewRow, viewer_user_id: &str) -> ReviewView {
    let rating = row.rating.clamp(0, 5);
    ReviewView {
        author: row
            .author_name
            .clone()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "Atleta".to_string()),
        rating,
        stars: "★".repeat(rating as usize) + &"☆".repeat((5 - rating) as usize),
        comment: row.comment.clone().unwrap_or_default(),
        created_at: row
            .created_at
            .as_deref()
            .map(|s| s.get(0..10).unwrap_or(s).to_string())
            .unwrap_or_default(),
        is_own: row.user_id == viewer_user_id,
    }
}
