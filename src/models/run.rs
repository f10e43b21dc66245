use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Append-only audit row for one resolver run.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ResolutionRun {
    pub id: Uuid,
    pub run_id: Uuid,
    pub bets_found: i32,
    pub bets_processed: i32,
    pub bets_resolved: i32,
    pub bets_skipped: i32,
    pub errors: i32,
    pub duration_ms: i64,
    pub notes: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}
