#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ReviewRow {
    pub review_id: String,
    pub user_id: String,
    pub listing_id: String,
    pub listing_kind: String,
    pub rating: i64,
    pub comment: Option<String>,
    pub created_at: Option<String>,
    /// Joined from users; absent when the author was removed.
    pub author_name: Option<String>,
}
