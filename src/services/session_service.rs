use std::time::Duration;

use sqlx::SqlitePool;
use tracing::{info, warn};

use crate::database::session_repo;

const CLEANUP_INTERVAL: Duration = Duration::from_secs(3600);

pub async fn run_session_cleanup(pool: &SqlitePool) -> sqlx::Result<u64> {
    let removed = session_repo::delete_expired(pool).await?;
    if removed > 0 {
        info!("session cleanup: removed {} expired sessions", removed);
    }
    Ok(removed)
}

/// Hourly expired-session sweep for the lifetime of the server.
pub fn spawn_cleanup_task(pool: SqlitePool) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(CLEANUP_INTERVAL);
        loop {
            ticker.tick().await;
            if let Err(e) = run_session_cleanup(&pool).await {
                warn!("session cleanup failed: {}", e);
            }
        }
    });
}
