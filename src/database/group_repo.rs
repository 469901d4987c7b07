use sqlx::{sqlite::SqliteArguments, Arguments, SqlitePool};

use crate::models::SportGroupRow;

pub const SQL_GROUPS_BASE: &str = r#"
SELECT
    g.group_id, g.name, g.description, g.city, g.state, g.latitude,
    g.longitude, g.sports, g.average_rating, g.review_count,
    g.meeting_schedule, g.member_count, g.main_photo_url, g.photos,
    g.owner_user_id
FROM sport_groups g
WHERE (g.is_deleted = 0 OR g.is_deleted IS NULL)
"#;

const SQL_LOAD_BY_ID: &str = r#"
SELECT
    g.group_id, g.name, g.description, g.city, g.state, g.latitude,
    g.longitude, g.sports, g.average_rating, g.review_count,
    g.meeting_schedule, g.member_count, g.main_photo_url, g.photos,
    g.owner_user_id
FROM sport_groups g
WHERE g.group_id = ?1
  AND (g.is_deleted = 0 OR g.is_deleted IS NULL)
"#;

pub async fn list_all(
    pool: &SqlitePool,
    bbox: Option<(f64, f64, f64, f64)>,
    limit: i64,
) -> sqlx::Result<Vec<SportGroupRow>> {
    let mut sql = String::from(SQL_GROUPS_BASE);
    let mut args = SqliteArguments::default();

    if let Some((min_lat, max_lat, min_lon, max_lon)) = bbox {
        sql.push_str(
            " AND (g.latitude IS NULL OR (g.latitude BETWEEN ? AND ? AND g.longitude BETWEEN ? AND ?))",
        );
        args.add(min_lat);
        args.add(max_lat);
        args.add(min_lon);
        args.add(max_lon);
    }

    sql.push_str(" ORDER BY g.name LIMIT ?");
    args.add(limit);

    sqlx::query_as_with::<_, SportGroupRow, _>(&sql, args)
        .fetch_all(pool)
        .await
}

pub async fn load_by_id(pool: &SqlitePool, group_id: &str) -> sqlx::Result<Option<SportGroupRow>> {
    sqlx::query_as::<_, SportGroupRow>(SQL_LOAD_BY_ID)
        .bind(group_id)
        .fetch_optional(pool)
        .await
}

const SQL_INSERT_GROUP: &str = r#"
INSERT INTO sport_groups (
  group_id,
  name,
  city,
  state,
  meeting_schedule,
  sports,
  owner_user_id,
  average_rating,
  review_count,
  member_count,
  is_deleted
) VALUES (?, ?, ?, ?, ?, ?, ?, 0, 0, 1, 0)
"#;

pub struct NewSportGroup<'a> {
    pub group_id: &'a str,
    pub name: &'a str,
    pub city: Option<&'a str>,
    pub state: Option<&'a str>,
    pub meeting_schedule: Option<&'a str>,
    /// JSON array of sport tags.
    pub sports: &'a str,
    pub owner_user_id: &'a str,
}

pub async fn insert_group(pool: &SqlitePool, group: NewSportGroup<'_>) -> sqlx::Result<u64> {
    let res = sqlx::query(SQL_INSERT_GROUP)
        .bind(group.group_id)
        .bind(group.name)
        .bind(group.city)
        .bind(group.state)
        .bind(group.meeting_schedule)
        .bind(group.sports)
        .bind(group.owner_user_id)
        .execute(pool)
        .await?;
    Ok(res.rows_affected())
}
