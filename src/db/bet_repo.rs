use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{Bet, BetStatus};

/// Fields accepted when logging a new wager.
#[derive(Debug, Clone)]
pub struct NewBet {
    pub source: String,
    pub home_team: String,
    pub away_team: String,
    pub fixture_id: Option<i64>,
    pub league: Option<String>,
    pub kickoff_at: Option<DateTime<Utc>>,
    pub market: String,
    pub odds: Decimal,
    pub stake: Option<Decimal>,
    pub note: Option<String>,
}

/// Insert a new pending bet.
pub async fn insert_bet(pool: &PgPool, bet: &NewBet) -> anyhow::Result<Bet> {
    let inserted = sqlx::query_as::<_, Bet>(
        r#"
        INSERT INTO bets (source, home_team, away_team, fixture_id, league, kickoff_at, market, odds, stake, note)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        RETURNING *
        "#,
    )
    .bind(&bet.source)
    .bind(&bet.home_team)
    .bind(&bet.away_team)
    .bind(bet.fixture_id)
    .bind(&bet.league)
    .bind(bet.kickoff_at)
    .bind(&bet.market)
    .bind(bet.odds)
    .bind(bet.stake)
    .bind(&bet.note)
    .fetch_one(pool)
    .await?;

    Ok(inserted)
}

/// Most recently logged bets.
pub async fn list_bets(pool: &PgPool, limit: i64) -> anyhow::Result<Vec<Bet>> {
    let bets = sqlx::query_as::<_, Bet>(
        "SELECT * FROM bets ORDER BY created_at DESC LIMIT $1",
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(bets)
}

pub async fn get_bet(pool: &PgPool, id: Uuid) -> anyhow::Result<Option<Bet>> {
    let bet = sqlx::query_as::<_, Bet>("SELECT * FROM bets WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(bet)
}

/// Pending bets eligible for automated resolution.
///
/// Eligible means: still pending, carries a fixture reference, and the
/// kickoff either passed `cutoff` or was never recorded. Ordered by
/// kickoff ascending with unknown kickoffs last, so long-overdue bets
/// win the batch cap.
pub async fn get_resolvable_bets(
    pool: &PgPool,
    cutoff: DateTime<Utc>,
    limit: i64,
) -> anyhow::Result<Vec<Bet>> {
    let bets = sqlx::query_as::<_, Bet>(
        r#"
        SELECT * FROM bets
        WHERE status = 'pending'
          AND fixture_id IS NOT NULL
          AND (kickoff_at IS NULL OR kickoff_at <= $1)
        ORDER BY kickoff_at ASC NULLS LAST
        LIMIT $2
        "#,
    )
    .bind(cutoff)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(bets)
}

/// Re-read a bet's current status just before settlement.
pub async fn get_bet_status(pool: &PgPool, id: Uuid) -> anyhow::Result<Option<String>> {
    let row: Option<(String,)> = sqlx::query_as("SELECT status FROM bets WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(row.map(|(s,)| s))
}

/// Apply a settlement, guarded so it only lands while the bet is still
/// pending. Returns false when another writer got there first.
pub async fn settle_bet(
    pool: &PgPool,
    id: Uuid,
    status: BetStatus,
    profit_loss: Option<Decimal>,
) -> anyhow::Result<bool> {
    let result = sqlx::query(
        r#"
        UPDATE bets
        SET status = $2, profit_loss = $3, settled_at = NOW()
        WHERE id = $1 AND status = 'pending'
        "#,
    )
    .bind(id)
    .bind(status.as_str())
    .bind(profit_loss)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Manual status override (cashout, corrections the evaluator cannot
/// make). Unconditional, unlike `settle_bet`.
pub async fn override_status(
    pool: &PgPool,
    id: Uuid,
    status: BetStatus,
    profit_loss: Option<Decimal>,
) -> anyhow::Result<Option<Bet>> {
    let bet = sqlx::query_as::<_, Bet>(
        r#"
        UPDATE bets
        SET status = $2, profit_loss = $3, settled_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(status.as_str())
    .bind(profit_loss)
    .fetch_optional(pool)
    .await?;

    Ok(bet)
}
