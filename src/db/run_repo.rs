use sqlx::PgPool;
use uuid::Uuid;

use crate::models::ResolutionRun;

/// Append one audit row for a resolver run.
#[allow(clippy::too_many_arguments)]
pub async fn insert_run(
    pool: &PgPool,
    run_id: Uuid,
    bets_found: i32,
    bets_processed: i32,
    bets_resolved: i32,
    bets_skipped: i32,
    errors: i32,
    duration_ms: i64,
    notes: Option<&str>,
) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        INSERT INTO resolution_runs
            (run_id, bets_found, bets_processed, bets_resolved, bets_skipped, errors, duration_ms, notes)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        "#,
    )
    .bind(run_id)
    .bind(bets_found)
    .bind(bets_processed)
    .bind(bets_resolved)
    .bind(bets_skipped)
    .bind(errors)
    .bind(duration_ms)
    .bind(notes)
    .execute(pool)
    .await?;

    Ok(())
}

/// Most recent audit rows, newest first.
pub async fn get_recent_runs(pool: &PgPool, limit: i64) -> anyhow::Result<Vec<ResolutionRun>> {
    let runs = sqlx::query_as::<_, ResolutionRun>(
        "SELECT * FROM resolution_runs ORDER BY created_at DESC LIMIT $1",
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(runs)
}
