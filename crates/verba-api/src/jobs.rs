//! Background jobs for periodic maintenance tasks.

use sqlx::PgPool;
use std::time::Duration;
use tokio::time::interval;

use crate::auth::refresh_token;

/// Start all background jobs
///
/// Returns the join handles so shutdown can abort them.
pub fn start_background_jobs(pool: PgPool) -> Vec<tokio::task::JoinHandle<()>> {
    vec![tokio::spawn(periodic_token_cleanup_job(pool))]
}

/// Sweep expired refresh tokens every 6 hours
///
/// Expired rows are already invisible to lookups, which filter on
/// `expires_at`; the sweep only keeps the table from growing without bound.
async fn periodic_token_cleanup_job(pool: PgPool) {
    // Wait 1 hour before the first run to avoid startup contention
    tokio::time::sleep(Duration::from_secs(3600)).await;

    let mut interval = interval(Duration::from_secs(21600)); // 6 hours

    loop {
        interval.tick().await;

        match refresh_token::cleanup_expired_tokens(&pool).await {
            Ok(deleted) if deleted > 0 => {
                tracing::info!(deleted, "swept expired refresh tokens");
            }
            Ok(_) => {
                tracing::debug!("no expired refresh tokens to sweep");
            }
            Err(e) => {
                tracing::error!("refresh token sweep failed: {e}");
            }
        }
    }
}
