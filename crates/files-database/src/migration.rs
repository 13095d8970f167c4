//! Schema setup for the PostgreSQL stores.

use sqlx::PgPool;
use sqlx::migrate::Migrator;

use files_core::error::{AppError, ErrorKind};
use files_core::result::AppResult;

/// The SQL files under `migrations/`, embedded at build time.
static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

/// Bring the schema behind `pool` up to date. Versions already recorded in
/// `_sqlx_migrations` are skipped, so every process may call this on startup.
pub async fn run_migrations(pool: &PgPool) -> AppResult<()> {
    let versions = MIGRATOR.iter().count();
    tracing::debug!(versions, "Applying schema migrations");

    MIGRATOR
        .run(pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Schema migration failed", e))?;

    tracing::info!(versions, "Schema up to date");
    Ok(())
}
