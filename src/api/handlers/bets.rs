use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

use crate::db::bet_repo::{self, NewBet};
use crate::errors::AppError;
use crate::models::{Bet, BetStatus};
use crate::AppState;

const VALID_SOURCES: &[&str] = &["chat", "daily_picks", "manual"];
const MIN_ODDS: Decimal = Decimal::from_parts(101, 0, 0, false, 2); // 1.01

#[derive(Debug, Deserialize)]
pub struct CreateBetRequest {
    pub source: Option<String>,
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

/// POST /api/bets — log a new pending wager.
pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<CreateBetRequest>,
) -> Result<Json<Bet>, AppError> {
    let source = req.source.unwrap_or_else(|| "manual".into());
    if !VALID_SOURCES.contains(&source.as_str()) {
        return Err(AppError::BadRequest(format!("invalid source: {source}")));
    }
    if req.market.trim().is_empty() {
        return Err(AppError::BadRequest("market is required".into()));
    }
    if req.odds < MIN_ODDS {
        return Err(AppError::BadRequest("odds must be at least 1.01".into()));
    }
    if let Some(stake) = req.stake {
        if stake < Decimal::ZERO {
            return Err(AppError::BadRequest("stake must not be negative".into()));
        }
    }

    let bet = bet_repo::insert_bet(
        &state.db,
        &NewBet {
            source,
            home_team: req.home_team,
            away_team: req.away_team,
            fixture_id: req.fixture_id,
            league: req.league,
            kickoff_at: req.kickoff_at,
            market: req.market,
            odds: req.odds,
            stake: req.stake,
            note: req.note,
        },
    )
    .await?;

    Ok(Json(bet))
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub limit: Option<i64>,
}

/// GET /api/bets — most recently logged bets.
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Bet>>, AppError> {
    let limit = query.limit.unwrap_or(50).clamp(1, 200);
    let bets = bet_repo::list_bets(&state.db, limit).await?;
    Ok(Json(bets))
}

#[derive(Debug, Deserialize)]
pub struct OverrideStatusRequest {
    pub status: String,
    pub profit_loss: Option<Decimal>,
}

/// PATCH /api/bets/:id — manual status override (cashout, corrections).
pub async fn override_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<OverrideStatusRequest>,
) -> Result<Json<Bet>, AppError> {
    let Some(status) = BetStatus::from_str(&req.status) else {
        return Err(AppError::BadRequest(format!("invalid status: {}", req.status)));
    };

    let bet = bet_repo::override_status(&state.db, id, status, req.profit_loss)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("bet {id} not found")))?;

    tracing::info!(bet_id = %id, status = %status, "Bet status manually overridden");
    Ok(Json(bet))
}
