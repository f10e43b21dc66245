use std::time::Duration;

use sqlx::PgPool;
use uuid::Uuid;

use crate::models::ResolutionLock;

/// Singleton lock key for the resolver.
pub const RESOLVER_LOCK: &str = "bet_resolver";

/// Atomically claim the resolver lock for `run_id`.
///
/// The insert wins when no row exists; the conflict update wins only
/// when the existing holder's TTL has expired. Either way the claiming
/// run id comes back; no row back means a live holder kept the lock.
pub async fn try_acquire(pool: &PgPool, run_id: Uuid, ttl: Duration) -> anyhow::Result<bool> {
    let claimed: Option<(Uuid,)> = sqlx::query_as(
        r#"
        INSERT INTO resolution_locks (lock_name, run_id, acquired_at, expires_at)
        VALUES ($1, $2, NOW(), NOW() + make_interval(secs => $3))
        ON CONFLICT (lock_name) DO UPDATE
            SET run_id = EXCLUDED.run_id,
                acquired_at = NOW(),
                expires_at = EXCLUDED.expires_at
            WHERE resolution_locks.expires_at < NOW()
        RETURNING run_id
        "#,
    )
    .bind(RESOLVER_LOCK)
    .bind(run_id)
    .bind(ttl.as_secs_f64())
    .fetch_optional(pool)
    .await?;

    Ok(claimed.is_some())
}

/// Drop the resolver lock. Unconditional: the TTL covers the case where
/// a crashed holder never reaches this.
pub async fn release(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::query("DELETE FROM resolution_locks WHERE lock_name = $1")
        .bind(RESOLVER_LOCK)
        .execute(pool)
        .await?;

    Ok(())
}

/// Current lock row, if any.
pub async fn get_lock(pool: &PgPool) -> anyhow::Result<Option<ResolutionLock>> {
    let lock = sqlx::query_as::<_, ResolutionLock>(
        "SELECT * FROM resolution_locks WHERE lock_name = $1",
    )
    .bind(RESOLVER_LOCK)
    .fetch_optional(pool)
    .await?;

    Ok(lock)
}
