#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UsersRow {
    pub user_id: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub cpf: Option<String>,
    pub phone: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub cep: Option<String>,
    /// supporter|establishment|group|admin
    pub role: Option<String>,
    pub referral_code: Option<String>,
    pub profile_complete: Option<i64>,
    pub created_at: Option<String>,
}
