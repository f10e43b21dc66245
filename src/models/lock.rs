use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Singleton mutual-exclusion row for the resolver.
///
/// At most one row exists per `lock_name`; `expires_at` lets a new run
/// reclaim the lock after a crashed holder.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ResolutionLock {
    pub lock_name: String,
    pub run_id: Uuid,
    pub acquired_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}
