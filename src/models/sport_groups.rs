#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SportGroupRow {
    pub group_id: String,
    pub name: String,
    pub description: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// JSON array of sport tag strings.
    pub sports: Option<String>,
    pub average_rating: Option<f64>,
    pub review_count: Option<i64>,
    pub meeting_schedule: Option<String>,
    pub member_count: Option<i64>,
    pub main_photo_url: Option<String>,
    /// JSON array of {url, is_main} photo objects.
    pub photos: Option<String>,
    pub owner_user_id: Option<String>,
}
