use sqlx::SqlitePool;

use crate::database::promo_code_repo;
use crate::database::promo_code_repo::PromoOutcome;

pub async fn apply_code(
    pool: &SqlitePool,
    user_id: &str,
    raw_code: &str,
) -> sqlx::Result<&'static str> {
    let code = raw_code.trim().to_uppercase();
    if code.is_empty() {
        return Ok("promo_not_found");
    }

    let outcome = promo_code_repo::apply_promo_code(pool, &code, user_id).await?;
    Ok(match outcome {
        PromoOutcome::Applied => "promo_applied",
        PromoOutcome::NotFound => "promo_not_found",
        PromoOutcome::Inactive => "promo_inactive",
        PromoOutcome::Expired => "promo_expired",
        PromoOutcome::Exhausted => "promo_exhausted",
        PromoOutcome::AlreadyRedeemed => "promo_already_used",
    })
}

pub struct PromoStatsView {
    pub code: String,
    pub description: String,
    pub usage_label: String,
    pub redemption_count: i64,
}

pub async fn load_usage_stats(pool: &SqlitePool) -> sqlx::Result<Vec<PromoStatsView>> {
    let rows = promo_code_repo::usage_stats(pool).await?;
    Ok(rows
        .into_iter()
        .map(|r| PromoStatsView {
            usage_label: format!("{} / {}", r.used_count, r.max_uses),
            code: r.code,
            description: r.description.unwrap_or_default(),
            redemption_count: r.redemption_count,
        })
        .collect())
}
