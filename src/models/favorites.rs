#[derive(Debug, Clone, sqlx::FromRow)]
pub struct FavoriteRow {
    pub favorite_id: String,
    pub user_id: String,
    pub listing_id: String,
    /// establishment|group
    pub listing_kind: String,
    pub created_at: Option<String>,
}
