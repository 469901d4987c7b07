use sqlx::SqlitePool;
use tracing::warn;

use crate::database::establishment_repo;
use crate::services::cep_service;

#[derive(Debug, Default)]
pub struct BackfillReport {
    pub candidates: usize,
    pub updated: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Fill in missing establishment coordinates from the CEP geocoding
/// upstream. Skipped = the upstream doesn't know the CEP; failed = the
/// upstream call itself broke.
pub async fn backfill_listing_geo(pool: &SqlitePool, limit: i64) -> sqlx::Result<BackfillReport> {
    let rows = establishment_repo::list_missing_geo(pool, limit).await?;
    let mut report = BackfillReport {
        candidates: rows.len(),
        ..BackfillReport::default()
    };

    for row in rows {
        let Some(cep) = row.cep.as_deref().map(str::trim).filter(|s| !s.is_empty()) else {
            report.skipped += 1;
            continue;
        };
        match cep_service::geocode_cep(cep).await {
            Ok(Some((latitude, longitude))) => {
                establishment_repo::update_geo(pool, &row.establishment_id, latitude, longitude)
                    .await?;
                report.updated += 1;
            }
            Ok(None) => {
                report.skipped += 1;
            }
            Err(()) => {
                warn!("geocode failed for establishment {}", row.establishment_id);
                report.failed += 1;
            }
        }
    }

    Ok(report)
}
