#[derive(Debug, Clone, sqlx::FromRow)]
pub struct WaitlistEntryRow {
    pub entry_id: String,
    pub email: String,
    pub city: Option<String>,
    pub interest: Option<String>,
    pub position: i64,
    pub created_at: Option<String>,
}
