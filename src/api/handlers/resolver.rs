use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;

use crate::errors::AppError;
use crate::models::ResolutionRun;
use crate::services::resolver::{self, RunStats};
use crate::AppState;

/// POST /api/resolver/run — trigger one resolution run on demand.
///
/// Runs inline and returns the run statistics; lock contention with the
/// scheduled loop surfaces as a "skipped: locked" note, not an error.
pub async fn run(State(state): State<AppState>) -> Json<RunStats> {
    let stats = resolver::run_resolution(
        &state.db,
        &state.fixture_client,
        &state.resolver_config,
    )
    .await;

    Json(stats)
}

#[derive(Debug, Deserialize)]
pub struct RunsQuery {
    pub limit: Option<i64>,
}

/// GET /api/resolver/runs — recent audit records, newest first.
pub async fn runs(
    State(state): State<AppState>,
    Query(query): Query<RunsQuery>,
) -> Result<Json<Vec<ResolutionRun>>, AppError> {
    let limit = query.limit.unwrap_or(20).clamp(1, 100);
    let runs = resolver::recent_runs(&state.db, limit).await?;
    Ok(Json(runs))
}
