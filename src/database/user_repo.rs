use sqlx::SqlitePool;

use crate::models::UsersRow;

const SQL_LOAD_BY_ID: &str = r#"
SELECT
    user_id, name, email, cpf, phone, city, state, cep, role,
    referral_code, profile_complete, created_at
FROM users
WHERE user_id = ?1
"#;

const SQL_INSERT_USER: &str = r#"
INSERT INTO users (
  user_id,
  name,
  email,
  cpf,
  phone,
  city,
  state,
  cep,
  role,
  referral_code,
  profile_complete,
  created_at
) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, 0, datetime('now'))
"#;

const SQL_UPDATE_PROFILE: &str = r#"
UPDATE users
SET cpf = ?2, phone = ?3, cep = ?4, city = ?5, state = ?6, profile_complete = 1
WHERE user_id = ?1
"#;

const SQL_EMAIL_EXISTS: &str = "SELECT COUNT(*) FROM users WHERE email = ?1";
const SQL_CPF_EXISTS: &str = "SELECT COUNT(*) FROM users WHERE cpf = ?1";
const SQL_REFERRAL_EXISTS: &str = "SELECT COUNT(*) FROM users WHERE referral_code = ?1";
const SQL_LOAD_ROLE: &str = "SELECT role FROM users WHERE user_id = ?1";

pub struct NewUser<'a> {
    pub user_id: &'a str,
    pub name: &'a str,
    pub email: &'a str,
    pub cpf: &'a str,
    pub phone: &'a str,
    pub city: Option<&'a str>,
    pub state: Option<&'a str>,
    pub cep: Option<&'a str>,
    pub role: &'a str, // supporter|establishment|group
    pub referral_code: &'a str,
}

pub async fn load_by_id(pool: &SqlitePool, user_id: &str) -> sqlx::Result<Option<UsersRow>> {
    sqlx::query_as::<_, UsersRow>(SQL_LOAD_BY_ID)
        .bind(user_id)
        .fetch_optional(pool)
        .await
}

pub async fn insert_user(pool: &SqlitePool, user: NewUser<'_>) -> sqlx::Result<u64> {
    let res = sqlx::query(SQL_INSERT_USER)
        .bind(user.user_id)
        .bind(user.name)
        .bind(user.email)
        .bind(user.cpf)
        .bind(user.phone)
        .bind(user.city)
        .bind(user.state)
        .bind(user.cep)
        .bind(user.role)
        .bind(user.referral_code)
        .execute(pool)
        .await?;
    Ok(res.rows_affected())
}

pub async fn update_profile(
    pool: &SqlitePool,
    user_id: &str,
    cpf: &str,
    phone: &str,
    cep: &str,
    city: &str,
    state: &str,
) -> sqlx::Result<u64> {
    let res = sqlx::query(SQL_UPDATE_PROFILE)
        .bind(user_id)
        .bind(cpf)
        .bind(phone)
        .bind(cep)
        .bind(city)
        .bind(state)
        .execute(pool)
        .await?;
    Ok(res.rows_affected())
}

pub async fn email_exists(pool: &SqlitePool, email: &str) -> sqlx::Result<bool> {
    let count: i64 = sqlx::query_scalar(SQL_EMAIL_EXISTS)
        .bind(email)
        .fetch_one(pool)
        .await?;
    Ok(count > 0)
}

pub async fn cpf_exists(pool: &SqlitePool, cpf: &str) -> sqlx::Result<bool> {
    let count: i64 = sqlx::query_scalar(SQL_CPF_EXISTS)
        .bind(cpf)
        .fetch_one(pool)
        .await?;
    Ok(count > 0)
}

pub async fn referral_code_exists(pool: &SqlitePool, code: &str) -> sqlx::Result<bool> {
    let count: i64 = sqlx::query_scalar(SQL_REFERRAL_EXISTS)
        .bind(code)
        .fetch_one(pool)
        .await?;
    Ok(count > 0)
}

pub async fn load_role(pool: &SqlitePool, user_id: &str) -> sqlx::Result<Option<String>> {
    // The column itself is nullable, hence the double Option.
    let role: Option<Option<String>> = sqlx::query_scalar(SQL_LOAD_ROLE)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;
    Ok(role.flatten())
}
