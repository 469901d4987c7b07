use sqlx::{sqlite::SqliteArguments, Arguments, SqlitePool};

use crate::models::EstablishmentRow;

pub const SQL_ESTABLISHMENTS_BASE: &str = r#"
SELECT
    e.establishment_id, e.name, e.description, e.city, e.state, e.cep,
    e.address, e.latitude, e.longitude, e.sports, e.average_rating,
    e.review_count, e.price_level, e.main_photo_url, e.photos,
    e.owner_user_id
FROM establishments e
WHERE (e.is_deleted = 0 OR e.is_deleted IS NULL)
"#;

const SQL_LOAD_BY_ID: &str = r#"
SELECT
    e.establishment_id, e.name, e.description, e.city, e.state, e.cep,
    e.address, e.latitude, e.longitude, e.sports, e.average_rating,
    e.review_count, e.price_level, e.main_photo_url, e.photos,
    e.owner_user_id
FROM establishments e
WHERE e.establishment_id = ?1
  AND (e.is_deleted = 0 OR e.is_deleted IS NULL)
"#;

const SQL_LIST_MISSING_GEO: &str = r#"
SELECT
    e.establishment_id, e.name, e.description, e.city, e.state, e.cep,
    e.address, e.latitude, e.longitude, e.sports, e.average_rating,
    e.review_count, e.price_level, e.main_photo_url, e.photos,
    e.owner_user_id
FROM establishments e
WHERE (e.is_deleted = 0 OR e.is_deleted IS NULL)
  AND (e.latitude IS NULL OR e.longitude IS NULL)
  AND e.cep IS NOT NULL
  AND e.cep != ''
LIMIT ?1
"#;

const SQL_UPDATE_GEO: &str = r#"
UPDATE establishments
SET latitude = ?2, longitude = ?3
WHERE establishment_id = ?1
"#;

const SQL_INSERT_ESTABLISHMENT: &str = r#"
INSERT INTO establishments (
  establishment_id,
  name,
  city,
  state,
  cep,
  address,
  sports,
  price_level,
  owner_user_id,
  average_rating,
  review_count,
  is_deleted
) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, 0, 0, 0)
"#;

/// Directory load. The whole (small) collection is fetched and filtered in
/// memory; the optional bbox only pre-trims candidates when a radius filter
/// is active.
pub async fn list_all(
    pool: &SqlitePool,
    bbox: Option<(f64, f64, f64, f64)>,
    limit: i64,
) -> sqlx::Result<Vec<EstablishmentRow>> {
    let mut sql = String::from(SQL_ESTABLISHMENTS_BASE);
    let mut args = SqliteArguments::default();

    if let Some((min_lat, max_lat, min_lon, max_lon)) = bbox {
        sql.push_str(
            " AND (e.latitude IS NULL OR (e.latitude BETWEEN ? AND ? AND e.longitude BETWEEN ? AND ?))",
        );
        args.add(min_lat);
        args.add(max_lat);
        args.add(min_lon);
        args.add(max_lon);
    }

    sql.push_str(" ORDER BY e.name LIMIT ?");
    args.add(limit);

    sqlx::query_as_with::<_, EstablishmentRow, _>(&sql, args)
        .fetch_all(pool)
        .await
}

pub async fn load_by_id(
    pool: &SqlitePool,
    establishment_id: &str,
) -> sqlx::Result<Option<EstablishmentRow>> {
    sqlx::query_as::<_, EstablishmentRow>(SQL_LOAD_BY_ID)
        .bind(establishment_id)
        .fetch_optional(pool)
        .await
}

pub async fn list_missing_geo(
    pool: &SqlitePool,
    limit: i64,
) -> sqlx::Result<Vec<EstablishmentRow>> {
    sqlx::query_as::<_, EstablishmentRow>(SQL_LIST_MISSING_GEO)
        .bind(limit)
        .fetch_all(pool)
        .await
}

pub struct NewEstablishment<'a> {
    pub establishment_id: &'a str,
    pub name: &'a str,
    pub city: Option<&'a str>,
    pub state: Option<&'a str>,
    pub cep: Option<&'a str>,
    pub address: Option<&'a str>,
    /// JSON array of sport tags.
    pub sports: &'a str,
    pub price_level: Option<i64>,
    pub owner_user_id: &'a str,
}

pub async fn insert_establishment(
    pool: &SqlitePool,
    establishment: NewEstablishment<'_>,
) -> sqlx::Result<u64> {
    let res = sqlx::query(SQL_INSERT_ESTABLISHMENT)
        .bind(establishment.establishment_id)
        .bind(establishment.name)
        .bind(establishment.city)
        .bind(establishment.state)
        .bind(establishment.cep)
        .bind(establishment.address)
        .bind(establishment.sports)
        .bind(establishment.price_level)
        .bind(establishment.owner_user_id)
        .execute(pool)
        .await?;
    Ok(res.rows_affected())
}

pub async fn update_geo(
    pool: &SqlitePool,
    establishment_id: &str,
    latitude: f64,
    longitude: f64,
) -> sqlx::Result<u64> {
    let res = sqlx::query(SQL_UPDATE_GEO)
        .bind(establishment_id)
        .bind(latitude)
        .bind(longitude)
        .execute(pool)
        .await?;
    Ok(res.rows_affected())
}
