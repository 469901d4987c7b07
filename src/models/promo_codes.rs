#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PromoCodeRow {
    pub code: String,
    pub description: Option<String>,
    pub max_uses: i64,
    pub used_count: i64,
    pub expires_at: Option<String>,
    pub is_active: i64,
}

/// Aggregated usage line for the admin page.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PromoUsageRow {
    pub code: String,
    pub description: Option<String>,
    pub max_uses: i64,
    pub used_count: i64,
    pub redemption_count: i64,
}
